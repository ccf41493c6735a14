//! JSON document to node/edge graph.
//!
//! Each step of the descent returns the [`Graph`] fragment rooted at the value it was handed and
//! the caller splices fragments together, so nodes come out in pre-order: a node is always
//! emitted before its descendants, and siblings follow member (or index) order.

use std::borrow::Cow;

use indexmap::IndexMap;
use tracing::*;

use crate::graph::{ArrayItem, Graph, GraphEdge, GraphNode, NodeKind, PropertyEntry, ValueType};
use crate::json::{array_summary, JsonValue};

pub const DEFAULT_ROOT_LABEL: &str = "Root";

/// Id of the root node of every built graph.
pub const ROOT_ID: &str = "root";

/// Member name used when the document itself is not an object. The root node is always an
/// object node; a bare array or scalar becomes its single property under this key.
pub const SYNTHETIC_ROOT_KEY: &str = "value";

/// Build the graph for `json`, labelling the root node `root_label`.
///
/// Node ids are derived from the path to each value (`root-customer-address`,
/// `root-items-0`, ...), so structurally identical documents always produce identical ids.
pub fn build(json: &JsonValue, root_label: &str) -> Graph {
    let graph = match json {
        JsonValue::Object(members) => object_node(
            ROOT_ID.to_string(),
            root_label.to_string(),
            0,
            &entries(members),
        ),
        other => {
            debug!(kind = other.kind_desc(), "wrapping non-object document in a root object");
            object_node(
                ROOT_ID.to_string(),
                root_label.to_string(),
                0,
                &[(SYNTHETIC_ROOT_KEY, other)],
            )
        }
    };

    debug!(nodes = graph.nodes.len(), edges = graph.edges.len(), "built graph");
    graph
}

pub fn build_default(json: &JsonValue) -> Graph {
    build(json, DEFAULT_ROOT_LABEL)
}

fn entries(members: &IndexMap<String, JsonValue>) -> Vec<(&str, &JsonValue)> {
    members.iter().map(|(k, v)| (k.as_str(), v)).collect()
}

fn object_node(id: String, label: String, depth: usize, members: &[(&str, &JsonValue)]) -> Graph {
    let mut properties = Vec::with_capacity(members.len());
    let mut descendants = Graph::default();

    for &(key, value) in members {
        let property = match value {
            JsonValue::Object(inner) => {
                let child_id = child_id(&id, key);
                let child =
                    object_node(child_id.clone(), key.to_string(), depth + 1, &entries(inner));
                descendants.edges.push(GraphEdge::new(&id, &child_id, key));
                descendants.append(child);

                PropertyEntry {
                    key: key.to_string(),
                    value_type: ValueType::Object,
                    display_value: value.display_value(),
                    child_node_id: Some(child_id),
                }
            }
            JsonValue::Array(elements) => {
                let base = child_id(&id, key);
                let mut first = None;

                for (index, element) in elements.iter().enumerate() {
                    let element_id = format!("{base}-{index}");
                    let fragment = element_node(
                        element_id.clone(),
                        format!("{key}[{index}]"),
                        depth + 1,
                        element,
                    );
                    // Every element edge leaves from the array's row.
                    descendants.edges.push(GraphEdge::new(&id, &element_id, key));
                    descendants.append(fragment);
                    first.get_or_insert(element_id);
                }

                PropertyEntry {
                    key: key.to_string(),
                    value_type: ValueType::Array,
                    display_value: array_summary(elements.len()),
                    child_node_id: first,
                }
            }
            JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_) => {
                PropertyEntry {
                    key: key.to_string(),
                    value_type: value.value_type(),
                    display_value: value.display_value(),
                    child_node_id: None,
                }
            }
        };
        properties.push(property);
    }

    trace!(%id, depth, properties = properties.len(), "object node");

    let mut graph = Graph::default();
    graph.nodes.push(GraphNode::new(
        id,
        label,
        depth,
        NodeKind::Object { properties },
    ));
    graph.append(descendants);
    graph
}

/// A single array element. Objects recurse as usual, scalars become value nodes and nested
/// arrays become array nodes whose own elements are expanded below them.
fn element_node(id: String, label: String, depth: usize, value: &JsonValue) -> Graph {
    match value {
        JsonValue::Object(members) => object_node(id, label, depth, &entries(members)),
        JsonValue::Array(elements) => {
            let mut items = Vec::with_capacity(elements.len());
            let mut descendants = Graph::default();

            for (index, element) in elements.iter().enumerate() {
                let element_id = format!("{id}-{index}");
                let fragment =
                    element_node(element_id.clone(), format!("[{index}]"), depth + 1, element);
                descendants
                    .edges
                    .push(GraphEdge::new(&id, &element_id, &index.to_string()));
                descendants.append(fragment);

                items.push(ArrayItem {
                    index,
                    value_type: element.value_type(),
                    display_value: element.display_value(),
                    child_node_id: element_id,
                });
            }

            let mut graph = Graph::default();
            graph
                .nodes
                .push(GraphNode::new(id, label, depth, NodeKind::Array { items }));
            graph.append(descendants);
            graph
        }
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_) => {
            Graph {
                nodes: vec![GraphNode::new(
                    id,
                    label,
                    depth,
                    NodeKind::Value {
                        value_type: value.value_type(),
                        display_value: value.display_value(),
                    },
                )],
                edges: Vec::new(),
            }
        }
    }
}

fn child_id(parent: &str, key: &str) -> String {
    format!("{parent}-{}", escape_segment(key))
}

/// `-` separates id segments, so it (and the escape character itself) must not appear raw in a
/// key segment.
fn escape_segment(key: &str) -> Cow<'_, str> {
    if !key.contains(['-', '%']) {
        return Cow::Borrowed(key);
    }

    let mut escaped = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '-' => escaped.push_str("%2D"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
