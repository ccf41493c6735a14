//! Turn a JSON document into a graph of boxes and arrows, and lay that graph out in columns.
//!
//! [`build`] walks a [`JsonValue`] and produces one node per object, array element and nested
//! array, connected by edges that remember which row of the parent they leave from. [`layout`]
//! then sizes every node from its contents and places it, depth by depth, so that children sit
//! to the right of and as level as possible with their parent, without overlapping.
//!
//! Both steps are pure and deterministic. Rebuilding from scratch on every edit is the intended
//! use; node ids are derived from JSON paths, so identical documents yield identical ids and a
//! renderer can diff successive graphs.
//!
//! ```
//! use canopy::{build_default, layout, JsonValue, LayoutConfig};
//!
//! let doc = JsonValue::from(serde_json::json!({ "user": { "name": "Alice" } }));
//! let graph = layout(build_default(&doc), &LayoutConfig::default()).unwrap();
//! assert_eq!(graph.nodes.len(), 2);
//! ```

mod builder;
mod graph;
mod json;
mod layout;
pub mod preview;


pub use builder::{build, build_default, DEFAULT_ROOT_LABEL, ROOT_ID, SYNTHETIC_ROOT_KEY};
pub use graph::{
    handle_id, ArrayItem, EdgeRouting, Graph, GraphEdge, GraphNode, NodeKind, Point,
    PropertyEntry, RoutingStyle, Size, ValueType,
};
pub use indexmap::IndexMap;
pub use json::JsonValue;
pub use layout::{layout, LayoutConfig, LayoutError};
