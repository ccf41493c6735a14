use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag carried by every row so renderers can style (and quote) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Null => "null",
            ValueType::Object => "object",
            ValueType::Array => "array",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `key: value` row of an object node.
///
/// `child_node_id` is set iff the row leads somewhere: always for objects, and for arrays with at
/// least one element (it then names the first element's node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyEntry {
    pub key: String,
    pub value_type: ValueType,
    pub display_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_node_id: Option<String>,
}

impl PropertyEntry {
    /// Id of the anchor that outgoing edges of this row attach to, if the row owns any.
    pub fn source_handle(&self) -> Option<String> {
        self.child_node_id.as_ref().map(|_| handle_id(&self.key))
    }
}

/// One `[index] value` row of an array node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayItem {
    pub index: usize,
    pub value_type: ValueType,
    pub display_value: String,
    pub child_node_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Object {
        properties: Vec<PropertyEntry>,
    },
    Array {
        items: Vec<ArrayItem>,
    },
    #[serde(rename_all = "camelCase")]
    Value {
        value_type: ValueType,
        display_value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub depth: usize,
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Set by layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Set by layout. Top-left corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

impl GraphNode {
    pub fn new(id: String, label: String, depth: usize, kind: NodeKind) -> Self {
        Self {
            id,
            label,
            depth,
            kind,
            size: None,
            position: None,
        }
    }

    /// Header text: `{label}` for objects, `[label]` for arrays and the bare label for values.
    pub fn title(&self) -> String {
        match &self.kind {
            NodeKind::Object { .. } => format!("{{{}}}", self.label),
            NodeKind::Array { .. } => format!("[{}]", self.label),
            NodeKind::Value { .. } => self.label.clone(),
        }
    }

    /// Number of content rows below the header.
    pub fn rows(&self) -> usize {
        match &self.kind {
            NodeKind::Object { properties } => properties.len(),
            NodeKind::Array { items } => items.len(),
            NodeKind::Value { .. } => 1,
        }
    }

    /// Character count of the longest row, key and value together.
    pub fn longest_row(&self) -> usize {
        match &self.kind {
            NodeKind::Object { properties } => properties
                .iter()
                .map(|p| p.key.chars().count() + p.display_value.chars().count())
                .max()
                .unwrap_or(0),
            NodeKind::Array { items } => items
                .iter()
                .map(|i| format!("[{}]", i.index).len() + i.display_value.chars().count())
                .max()
                .unwrap_or(0),
            NodeKind::Value { display_value, .. } => display_value.chars().count(),
        }
    }

    /// Row that an edge keyed by `key` leaves from.
    pub fn row_of(&self, key: &str) -> Option<usize> {
        match &self.kind {
            NodeKind::Object { properties } => properties.iter().position(|p| p.key == key),
            NodeKind::Array { items } => {
                let index = key.parse::<usize>().ok()?;
                items.iter().position(|i| i.index == index)
            }
            NodeKind::Value { .. } => None,
        }
    }

    pub fn properties(&self) -> &[PropertyEntry] {
        match &self.kind {
            NodeKind::Object { properties } => properties,
            _ => &[],
        }
    }

    pub fn items(&self) -> &[ArrayItem] {
        match &self.kind {
            NodeKind::Array { items } => items,
            _ => &[],
        }
    }
}

/// Orthogonal routing flavours understood by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStyle {
    Step,
    #[default]
    SmoothStep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRouting {
    pub style: RoutingStyle,
    /// Source anchor, two bends, target anchor.
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_property_key: String,
    pub source_handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    /// Set by layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<EdgeRouting>,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str, source_property_key: &str) -> Self {
        Self {
            id: format!("{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
            source_property_key: source_property_key.to_string(),
            source_handle: handle_id(source_property_key),
            target_handle: None,
            routing: None,
        }
    }
}

pub fn handle_id(key: &str) -> String {
    format!("property-{key}")
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges leaving `id`, in emission order.
    pub fn outgoing<'g>(&'g self, id: &'g str) -> impl Iterator<Item = &'g GraphEdge> + 'g {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn incoming<'g>(&'g self, id: &'g str) -> impl Iterator<Item = &'g GraphEdge> + 'g {
        self.edges.iter().filter(move |e| e.target == id)
    }

    pub(crate) fn append(&mut self, mut other: Graph) {
        self.nodes.append(&mut other.nodes);
        self.edges.append(&mut other.edges);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{build_default, JsonValue};

    #[test]
    fn rows_and_handles() {
        let graph = build_default(&JsonValue::from(json!({
            "id": 7,
            "tags": ["a", "bb"],
            "none": [],
        })));

        let root = &graph.nodes[0];
        assert_eq!(root.title(), "{Root}");
        assert_eq!(root.rows(), 3);
        // "tags" + "array[2]"
        assert_eq!(root.longest_row(), 12);
        assert_eq!(root.row_of("tags"), Some(1));
        assert_eq!(root.row_of("missing"), None);

        let handles = root
            .properties()
            .iter()
            .map(PropertyEntry::source_handle)
            .collect::<Vec<_>>();
        assert_eq!(handles, [None, Some("property-tags".to_string()), None]);

        let value = graph.node("root-tags-1").unwrap();
        assert_eq!(value.title(), "tags[1]");
        assert_eq!(value.rows(), 1);
        assert_eq!(value.longest_row(), 2);
        assert_eq!(value.row_of("0"), None);
        assert!(value.properties().is_empty());
    }

    #[test]
    fn array_rows_are_found_by_index() {
        let graph = build_default(&JsonValue::from(json!({ "m": [[10, 20]] })));
        let inner = graph.node("root-m-0").unwrap();
        assert_eq!(inner.row_of("1"), Some(1));
        assert_eq!(inner.row_of("x"), None);
        // "[1]" + "20"
        assert_eq!(inner.longest_row(), 5);
    }

    #[test]
    fn edge_lookups() {
        let graph = build_default(&JsonValue::from(json!({ "a": {}, "b": [1, 2] })));

        let out = graph.outgoing("root").map(|e| e.target.as_str()).collect::<Vec<_>>();
        assert_eq!(out, ["root-a", "root-b-0", "root-b-1"]);
        let into = graph.incoming("root-b-1").map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(into, ["root-root-b-1"]);
        assert_eq!(graph.incoming("root").count(), 0);
    }

    #[test]
    fn serialized_field_names() {
        let graph = build_default(&JsonValue::from(json!({ "v": [null] })));
        let value = serde_json::to_value(&graph).unwrap();

        assert_eq!(value["nodes"][1]["type"], "value");
        assert_eq!(value["nodes"][1]["valueType"], "null");
        assert_eq!(value["nodes"][1]["displayValue"], "null");
        assert_eq!(value["edges"][0]["sourcePropertyKey"], "v");
        assert!(value["nodes"][0].get("position").is_none());
    }

    #[test]
    fn routing_style_names() {
        assert_eq!(serde_json::to_value(RoutingStyle::SmoothStep).unwrap(), "smoothstep");
        assert_eq!(serde_json::to_value(RoutingStyle::Step).unwrap(), "step");
        assert_eq!(
            serde_json::from_str::<RoutingStyle>(r#""smoothstep""#).unwrap(),
            RoutingStyle::default()
        );
        assert!(serde_json::from_str::<RoutingStyle>(r#""smooth-step""#).is_err());
    }
}
