use std::collections::HashMap;

use canopy::{Graph, GraphNode, NodeKind, ValueType};
use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use tracing::*;

/// Graphviz points per inch; `width`/`height` are in inches, `pos` in points.
const POINTS_PER_INCH: f64 = 72.0;

/// Graphviz DOT with every node pinned where the layout put it. Render with `neato -n2` (or
/// `neato -n`) so the positions are kept as-is.
pub fn to_dot(graph: &Graph) -> String {
    let mut digraph: DiGraph<String, String> = DiGraph::new();
    let mut name_to_id: HashMap<&str, NodeIndex> = HashMap::new();

    for node in &graph.nodes {
        let idx = digraph.add_node(label(node));
        name_to_id.insert(node.id.as_str(), idx);
    }

    for edge in &graph.edges {
        match (
            name_to_id.get(edge.source.as_str()),
            name_to_id.get(edge.target.as_str()),
        ) {
            (Some(&source), Some(&target)) => {
                digraph.add_edge(source, target, edge.source_property_key.clone());
            }
            _ => warn!(edge = %edge.id, "skipping edge with unknown endpoint"),
        }
    }

    trace!(nodes = digraph.node_count(), edges = digraph.edge_count());

    let edge_attributes =
        |_: &DiGraph<String, String>, _: EdgeReference<'_, String>| String::new();
    let node_attributes = |_: &DiGraph<String, String>, (idx, _): (NodeIndex, &String)| {
        attributes(&graph.nodes[idx.index()])
    };

    format!(
        "{}",
        Dot::with_attr_getters(
            &digraph,
            &[DotConfig::EdgeNoLabel],
            &edge_attributes,
            &node_attributes,
        )
    )
}

/// Title line followed by one line per row.
fn label(node: &GraphNode) -> String {
    let mut lines = vec![node.title()];
    match &node.kind {
        NodeKind::Object { properties } => lines.extend(
            properties
                .iter()
                .map(|p| format!("{}: {}", p.key, quoted(p.value_type, &p.display_value))),
        ),
        NodeKind::Array { items } => lines.extend(
            items
                .iter()
                .map(|i| format!("[{}] {}", i.index, quoted(i.value_type, &i.display_value))),
        ),
        NodeKind::Value {
            value_type,
            display_value,
        } => lines.push(quoted(*value_type, display_value)),
    }
    lines.join("\n")
}

fn attributes(node: &GraphNode) -> String {
    let mut attrs = String::from("shape=box, fontname=monospace");
    if let (Some(position), Some(size)) = (node.position, node.size) {
        // Graphviz puts the origin bottom-left and positions node centers.
        let x = position.x + size.width / 2.0;
        let y = -(position.y + size.height / 2.0);
        attrs.push_str(&format!(
            ", pos=\"{x},{y}!\", width={}, height={}, fixedsize=true",
            size.width / POINTS_PER_INCH,
            size.height / POINTS_PER_INCH
        ));
    }
    attrs
}

pub(crate) fn quoted(value_type: ValueType, display_value: &str) -> String {
    match value_type {
        ValueType::String => format!("\"{display_value}\""),
        _ => display_value.to_string(),
    }
}
