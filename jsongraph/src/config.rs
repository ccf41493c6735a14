use std::path::Path;

use anyhow::{bail, Context};
use canopy::{LayoutConfig, RoutingStyle};
use confique::Config as DeriveConfig;
use tracing::*;

/// Looked up in the working directory when `--config` is not given. Missing is fine.
pub const DEFAULT_CONFIG_FILE: &str = "jsongraph.toml";

#[derive(Debug, DeriveConfig)]
pub struct Config {
    #[config(nested)]
    pub layout: LayoutSection,

    /// Array nodes in the `outline` output list at most this many items followed by a
    /// "N more items" line. Leave unset to list every item.
    #[config(env = "JSONGRAPH_MAX_INLINE_ITEMS")]
    pub max_inline_items: Option<usize>,
}

/// Layout constants. All lengths are in layout units (pixels when rendered 1:1).
#[derive(Debug, DeriveConfig)]
pub struct LayoutSection {
    /// Gap between adjacent columns.
    #[config(default = 80.0, env = "JSONGRAPH_COLUMN_GAP")]
    pub column_gap: f64,

    /// Free space kept below every node. Nodes that collide with an already placed node slide
    /// down in steps of this size.
    #[config(default = 40.0, env = "JSONGRAPH_VERTICAL_SPACING")]
    pub vertical_spacing: f64,

    #[config(default = 50.0)]
    pub left_padding: f64,

    #[config(default = 40.0)]
    pub top_padding: f64,

    #[config(default = 200.0)]
    pub min_node_width: f64,

    #[config(default = 400.0)]
    pub max_node_width: f64,

    /// Estimated width of one character of node text.
    #[config(default = 8.0)]
    pub char_width: f64,

    #[config(default = 40.0)]
    pub horizontal_padding: f64,

    #[config(default = 40.0)]
    pub header_height: f64,

    #[config(default = 24.0)]
    pub row_height: f64,

    #[config(default = 20.0)]
    pub body_padding: f64,

    /// Either "step" or "smoothstep".
    #[config(default = "smoothstep")]
    pub edge_style: RoutingStyle,
}

impl From<&LayoutSection> for LayoutConfig {
    fn from(section: &LayoutSection) -> Self {
        LayoutConfig {
            column_gap: section.column_gap,
            vertical_spacing: section.vertical_spacing,
            left_padding: section.left_padding,
            top_padding: section.top_padding,
            min_node_width: section.min_node_width,
            max_node_width: section.max_node_width,
            char_width: section.char_width,
            horizontal_padding: section.horizontal_padding,
            header_height: section.header_height,
            row_height: section.row_height,
            body_padding: section.body_padding,
            edge_style: section.edge_style,
        }
    }
}

/// Environment variables override the file, which overrides the defaults. An explicitly
/// requested file must exist; the default one may not.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let builder = Config::builder().env();
    let builder = match explicit {
        Some(path) => {
            if !path.is_file() {
                error!(path = ?path, "config file not found");
                bail!("config file `{}` does not exist", path.display());
            }
            builder.file(path)
        }
        None => builder.file(DEFAULT_CONFIG_FILE),
    };

    let config = builder
        .load()
        .context("failed to load configuration")?;
    debug!(?config);
    Ok(config)
}

pub fn template() -> String {
    confique::toml::template::<Config>(confique::toml::FormatOptions::default())
}
