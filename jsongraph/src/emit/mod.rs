mod dot;
mod outline;

pub use dot::to_dot;
pub use outline::to_outline;

use canopy::Graph;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// The laid-out graph as JSON, for renderers.
    Json,
    /// Graphviz DOT with pinned node positions.
    Dot,
    /// Human-readable listing, column by column.
    Outline,
}

pub fn render(
    graph: &Graph,
    format: Format,
    max_inline_items: Option<usize>,
) -> anyhow::Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(graph)?,
        Format::Dot => to_dot(graph),
        Format::Outline => to_outline(graph, max_inline_items)?,
    })
}
