//! Column layout for graphs produced by [`crate::build`].
//!
//! Nodes are placed in columns by depth, left to right. Inside a column every node tries to sit
//! level with its parent and slides down until it no longer overlaps a node already placed in
//! that column (see [`occupancy`]).

mod config;
mod occupancy;
mod tree;

use index_vec::IndexVec;
use thiserror::Error;
use tracing::*;

pub use config::LayoutConfig;

use crate::graph::{EdgeRouting, Graph, GraphNode, Point, Size};
use occupancy::Occupancy;
use tree::Tree;

index_vec::define_index_type! {
    pub(crate) struct NodeIdx = usize;
}

/// Inconsistent input handed to [`layout`]. All of these indicate a bug in whatever built the
/// graph (or a bad configuration); none can arise from a graph produced by [`crate::build`].
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("edge `{edge}` references unknown node `{node}`")]
    UnknownNode { edge: String, node: String },
    #[error("node id `{node}` appears more than once")]
    DuplicateNode { node: String },
    #[error("node `{node}` has two parents: `{first}` and `{second}`")]
    MultipleParents {
        node: String,
        first: String,
        second: String,
    },
    #[error("node `{node}` is not reachable from any root")]
    Unreachable { node: String },
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
}

/// Assign every node a size and position, and every edge its routing.
///
/// Deterministic: the same graph and configuration always produce the same layout.
pub fn layout(mut graph: Graph, config: &LayoutConfig) -> Result<Graph, LayoutError> {
    config.validate()?;

    let tree = Tree::from_graph(&graph)?;
    let sizes = graph
        .nodes
        .iter()
        .map(|node| estimate_size(node, config))
        .collect::<IndexVec<NodeIdx, Size>>();
    let columns = tree.columns();

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        columns = columns.len(),
        "laying out graph"
    );

    let mut x = config.left_padding;
    let mut column_x = Vec::with_capacity(columns.len());
    for column in &columns {
        column_x.push(x);
        let width = column
            .iter()
            .map(|&idx| sizes[idx].width)
            .fold(0.0, f64::max);
        x += width + config.column_gap;
    }

    let total_height = columns
        .iter()
        .map(|column| {
            column
                .iter()
                .map(|&idx| sizes[idx].height + config.vertical_spacing)
                .sum::<f64>()
        })
        .fold(0.0, f64::max);

    let mut ys: IndexVec<NodeIdx, f64> = IndexVec::from_vec(vec![0.0; graph.nodes.len()]);

    for (depth, column) in columns.iter().enumerate() {
        let mut order = column.clone();
        if depth > 0 {
            // Parents live in the previous column and are already placed. Stable, so siblings
            // keep member order.
            order.sort_by(|&a, &b| {
                let parent_y = |idx: NodeIdx| tree.parent[idx].map_or(0.0, |p| ys[p]);
                parent_y(a).total_cmp(&parent_y(b))
            });
        }

        let mut cursor = config.top_padding;
        if depth == 0 && order.len() == 1 {
            cursor = (total_height - sizes[order[0]].height) / 2.0;
        }

        let mut occupancy = Occupancy::new(config.vertical_spacing);
        for idx in order {
            let height = sizes[idx].height;
            let preferred = tree.parent[idx].map_or(cursor, |p| ys[p]);
            let y = occupancy.claim(preferred, height + config.vertical_spacing);
            trace!(node = %graph.nodes[idx.index()].id, depth, preferred, y);
            ys[idx] = y;
            cursor = y + height + config.vertical_spacing;
        }
    }

    let positions = tree
        .depth
        .iter_enumerated()
        .map(|(idx, &depth)| Point {
            x: column_x[depth],
            y: ys[idx],
        })
        .collect::<IndexVec<NodeIdx, Point>>();

    for (edge, &(source, target)) in graph.edges.iter_mut().zip(&tree.edges) {
        let source_node = &graph.nodes[source.index()];
        let row = source_node.row_of(&edge.source_property_key);
        if row.is_none() {
            warn!(edge = %edge.id, key = %edge.source_property_key, "edge key matches no row of its source");
        }

        let from = Point {
            x: positions[source].x + sizes[source].width,
            y: match row {
                Some(row) => {
                    positions[source].y
                        + config.header_height
                        + (row as f64 + 0.5) * config.row_height
                }
                None => positions[source].y + sizes[source].height / 2.0,
            },
        };
        let to = Point {
            x: positions[target].x,
            y: positions[target].y + sizes[target].height / 2.0,
        };
        let bend = (from.x + to.x) / 2.0;

        edge.target_handle = None;
        edge.routing = Some(EdgeRouting {
            style: config.edge_style,
            points: vec![
                from,
                Point { x: bend, y: from.y },
                Point { x: bend, y: to.y },
                to,
            ],
        });
    }

    for (idx, node) in graph.nodes.iter_mut().enumerate() {
        let idx = NodeIdx::from_usize(idx);
        node.depth = tree.depth[idx];
        node.size = Some(sizes[idx]);
        node.position = Some(positions[idx]);
    }

    Ok(graph)
}

/// Header, one fixed-height line per row, then padding. Width follows the longest row, clamped.
fn estimate_size(node: &GraphNode, config: &LayoutConfig) -> Size {
    let height =
        config.header_height + node.rows() as f64 * config.row_height + config.body_padding;
    let text_width = node.longest_row() as f64 * config.char_width + config.horizontal_padding;

    Size {
        width: text_width.clamp(config.min_node_width, config.max_node_width),
        height,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::graph::{GraphEdge, NodeKind, RoutingStyle};
    use crate::{build_default, JsonValue};

    fn laid_out(value: serde_json::Value) -> Graph {
        layout(build_default(&JsonValue::from(value)), &LayoutConfig::default()).unwrap()
    }

    fn position(graph: &Graph, id: &str) -> Point {
        graph.node(id).unwrap().position.unwrap()
    }

    fn size(graph: &Graph, id: &str) -> Size {
        graph.node(id).unwrap().size.unwrap()
    }

    #[test]
    fn nested_object_columns() {
        let graph = laid_out(json!({ "user": { "name": "Alice", "age": 30 } }));
        let config = LayoutConfig::default();

        let root = position(&graph, "root");
        let user = position(&graph, "root-user");
        assert_eq!(root.x, config.left_padding);
        assert_eq!(
            user.x,
            config.left_padding + size(&graph, "root").width + config.column_gap
        );
        assert_eq!(user.x, 330.0);

        // Column heights: 84 + 40 and 108 + 40, so the lone root is centered in 148.
        assert_eq!(size(&graph, "root"), Size { width: 200.0, height: 84.0 });
        assert_eq!(size(&graph, "root-user"), Size { width: 200.0, height: 108.0 });
        assert_eq!(root.y, 32.0);
        assert_eq!(user.y, root.y);
        assert_eq!(graph.node("root-user").unwrap().depth, 1);
    }

    #[test]
    fn siblings_slide_below_each_other() {
        let graph = laid_out(json!({ "a": [1, 2, 3] }));

        let ys = ["root-a-0", "root-a-1", "root-a-2"]
            .map(|id| position(&graph, id).y);
        assert_eq!(position(&graph, "root").y, 144.0);
        assert_eq!(ys, [144.0, 304.0, 464.0]);
    }

    #[test]
    fn width_follows_longest_row_within_bounds() {
        let config = LayoutConfig::default();
        let long = "x".repeat(30);
        let graph = laid_out(json!({ "k": long, "deep": { "text": "y".repeat(100) } }));

        // "deep" + "object" is shorter than "k" + 30 chars: 31 * 8 + 40.
        assert_eq!(size(&graph, "root").width, 288.0);
        assert_eq!(size(&graph, "root-deep").width, config.max_node_width);
    }

    #[test]
    fn value_nodes_have_one_row() {
        let graph = laid_out(json!([true]));
        assert_eq!(size(&graph, "root-value-0").height, 84.0);
    }

    #[test]
    fn edges_run_from_property_row_to_target_left_edge() {
        let graph = laid_out(json!({ "id": 1, "user": { "name": "Alice" } }));
        let config = LayoutConfig::default();
        let root = position(&graph, "root");
        let user = position(&graph, "root-user");

        let edge = &graph.edges[0];
        assert_eq!(edge.target_handle, None);
        let routing = edge.routing.as_ref().unwrap();
        assert_eq!(routing.style, RoutingStyle::SmoothStep);

        let from = routing.points[0];
        let to = routing.points[3];
        assert_eq!(from.x, root.x + size(&graph, "root").width);
        // "user" is the second row.
        assert_eq!(from.y, root.y + config.header_height + 1.5 * config.row_height);
        assert_eq!(to.x, user.x);
        assert_eq!(to.y, user.y + size(&graph, "root-user").height / 2.0);
        assert_eq!(routing.points[1].x, routing.points[2].x);
        assert_eq!(routing.points[1].y, from.y);
        assert_eq!(routing.points[2].y, to.y);
    }

    #[test]
    fn configured_edge_style_and_cleared_target_handle() {
        let mut graph = build_default(&JsonValue::from(json!({ "o": {} })));
        graph.edges[0].target_handle = Some("left".into());
        let config = LayoutConfig {
            edge_style: RoutingStyle::Step,
            ..Default::default()
        };
        let graph = layout(graph, &config).unwrap();
        assert_eq!(graph.edges[0].target_handle, None);
        assert_eq!(graph.edges[0].routing.as_ref().unwrap().style, RoutingStyle::Step);
    }

    #[test]
    fn children_follow_parent_order_across_columns() {
        // `b` sits below `a`, so `b`'s child must not be placed above `a`'s children.
        let graph = laid_out(json!({
            "a": { "x": { }, "y": { } },
            "b": { "z": { } },
        }));
        let column = ["root-a-x", "root-a-y", "root-b-z"].map(|id| position(&graph, id).y);
        assert!(column[0] < column[1] && column[1] < column[2], "{column:?}");
        assert!(position(&graph, "root-b-z").y >= position(&graph, "root-b").y);
    }

    #[test]
    fn several_roots_stack_from_top_padding() {
        let node = |id: &str| {
            GraphNode::new(
                id.to_string(),
                id.to_string(),
                0,
                NodeKind::Object {
                    properties: Vec::new(),
                },
            )
        };
        let graph = Graph {
            nodes: vec![node("one"), node("two")],
            edges: Vec::new(),
        };
        let graph = layout(graph, &LayoutConfig::default()).unwrap();
        assert_eq!(position(&graph, "one").y, 40.0);
        // 40 + 60 + 40 is free and on the slide grid.
        assert_eq!(position(&graph, "two").y, 140.0);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let mut graph = build_default(&JsonValue::from(json!({ "o": {} })));
        graph.edges.push(GraphEdge::new("root", "nowhere", "o"));
        assert_eq!(
            layout(graph, &LayoutConfig::default()),
            Err(LayoutError::UnknownNode {
                edge: "root-nowhere".into(),
                node: "nowhere".into(),
            })
        );
    }

    #[test]
    fn second_parent_is_an_error() {
        let mut graph = build_default(&JsonValue::from(json!({ "o": {}, "p": {} })));
        graph.edges.push(GraphEdge::new("root-p", "root-o", "x"));
        assert_eq!(
            layout(graph, &LayoutConfig::default()),
            Err(LayoutError::MultipleParents {
                node: "root-o".into(),
                first: "root".into(),
                second: "root-p".into(),
            })
        );
    }

    #[test]
    fn cycles_are_unreachable() {
        let mut graph = build_default(&JsonValue::from(json!({ "o": { "p": {} } })));
        // root-o and root-o-p now only point at each other.
        graph.edges.retain(|e| e.source != "root");
        graph.edges.push(GraphEdge::new("root-o-p", "root-o", "q"));
        assert!(matches!(
            layout(graph, &LayoutConfig::default()),
            Err(LayoutError::Unreachable { .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_an_error() {
        let mut graph = build_default(&JsonValue::from(json!({})));
        graph.nodes.push(graph.nodes[0].clone());
        assert_eq!(
            layout(graph, &LayoutConfig::default()),
            Err(LayoutError::DuplicateNode { node: "root".into() })
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = LayoutConfig {
            min_node_width: 10.0,
            max_node_width: 5.0,
            ..Default::default()
        };
        let graph = build_default(&JsonValue::from(json!({})));
        assert!(matches!(
            layout(graph, &config),
            Err(LayoutError::InvalidConfig(_))
        ));
    }
}
