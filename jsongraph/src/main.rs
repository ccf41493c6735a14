use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use ariadne::Source;
use canopy::{Graph, JsonValue, LayoutConfig};
use clap::{ArgAction, Parser as ClapParser};
use tracing::*;

mod config;
mod document;
mod emit;
mod logging;
mod parser;
mod spanned;

#[derive(Debug, ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to a JSON file, or `-` to read standard input.
    #[arg(required_unless_present = "config_template")]
    input: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = emit::Format::Json)]
    format: emit::Format,

    /// Header text of the root node.
    #[arg(long, default_value = canopy::DEFAULT_ROOT_LABEL)]
    root_label: String,

    /// Configuration file. Defaults to `jsongraph.toml` in the working directory, if present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a configuration file template with all defaults and exit.
    #[arg(long)]
    config_template: bool,

    /// Increase log verbosity (-v, -vv, -vvv). `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Args::parse();

    logging::setup_logging(cli.verbose);

    debug!(?cli);

    if cli.config_template {
        print!("{}", config::template());
        return Ok(());
    }

    let Some(input) = &cli.input else {
        bail!("no input given");
    };

    let config = config::load(cli.config.as_deref())?;
    let (path, src) = read_input(input)?;

    let mut diagnostics = Vec::new();
    let doc = document::parse_document(&path, &src, &mut diagnostics);

    for diagnostic in diagnostics {
        diagnostic.eprint((&path, Source::from(&src)))?;
    }

    let Some(doc) = doc else {
        bail!("failed to parse JSON from `{path}`");
    };

    let graph = visualize(&doc, &cli.root_label, &LayoutConfig::from(&config.layout))?;
    let mut rendered = emit::render(&graph, cli.format, config.max_inline_items)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match &cli.output {
        Some(output) => std::fs::write(output, rendered)
            .with_context(|| format!("failed to write `{}`", output.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<(String, String)> {
    if input == Path::new("-") {
        let mut src = String::new();
        std::io::stdin()
            .read_to_string(&mut src)
            .context("failed to read standard input")?;
        return Ok(("<stdin>".to_string(), src));
    }

    match std::fs::read_to_string(input) {
        Ok(src) => Ok((input.display().to_string(), src)),
        Err(e) => {
            error!(path = ?input, "failed to read input");
            Err(e).with_context(|| format!("failed to read file `{}`", input.display()))
        }
    }
}

fn visualize(
    doc: &JsonValue,
    root_label: &str,
    layout_config: &LayoutConfig,
) -> anyhow::Result<Graph> {
    let graph = canopy::build(doc, root_label);
    canopy::layout(graph, layout_config).context("failed to lay out graph")
}
