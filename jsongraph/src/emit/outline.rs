use std::collections::BTreeMap;
use std::fmt::{self, Write};

use canopy::preview::preview_items;
use canopy::{Graph, GraphNode, NodeKind};

use super::dot::quoted;

/// Plain-text listing of the graph, column by column.
pub fn to_outline(graph: &Graph, max_inline_items: Option<usize>) -> Result<String, fmt::Error> {
    let mut columns: BTreeMap<usize, Vec<&GraphNode>> = BTreeMap::new();
    for node in &graph.nodes {
        columns.entry(node.depth).or_default().push(node);
    }

    let mut out = String::new();
    for (depth, mut nodes) in columns {
        // Top to bottom, as drawn.
        nodes.sort_by(|a, b| {
            let y = |n: &GraphNode| n.position.map_or(0.0, |p| p.y);
            y(a).total_cmp(&y(b))
        });

        writeln!(out, "column {depth}")?;
        for node in nodes {
            write_node(&mut out, node, max_inline_items)?;
        }
    }
    Ok(out)
}

fn write_node(
    out: &mut impl Write,
    node: &GraphNode,
    max_inline_items: Option<usize>,
) -> fmt::Result {
    write!(out, "  {} ({})", node.title(), node.id)?;
    if let (Some(position), Some(size)) = (node.position, node.size) {
        write!(
            out,
            " at ({}, {}) {}x{}",
            position.x, position.y, size.width, size.height
        )?;
    }
    writeln!(out)?;

    match &node.kind {
        NodeKind::Object { properties } => {
            for p in properties {
                write!(out, "    {}: {}", p.key, quoted(p.value_type, &p.display_value))?;
                if let Some(child) = &p.child_node_id {
                    write!(out, " -> {child}")?;
                }
                writeln!(out)?;
            }
        }
        NodeKind::Array { items } => {
            let preview = preview_items(items, max_inline_items);
            for i in preview.shown {
                writeln!(
                    out,
                    "    [{}] {} -> {}",
                    i.index,
                    quoted(i.value_type, &i.display_value),
                    i.child_node_id
                )?;
            }
            if let Some(more) = preview.more_label() {
                writeln!(out, "    ... {more}")?;
            }
        }
        NodeKind::Value {
            value_type,
            display_value,
        } => {
            writeln!(out, "    {}", quoted(*value_type, display_value))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use canopy::{build_default, layout, JsonValue, LayoutConfig};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lists_columns_and_rows() {
        let doc = JsonValue::from(serde_json::json!({
            "user": { "name": "Alice", "age": 30 },
            "tags": ["a"],
        }));
        let graph = layout(build_default(&doc), &LayoutConfig::default()).unwrap();

        let outline = to_outline(&graph, None).unwrap();
        let lines = outline.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "column 0");
        assert!(lines[1].starts_with("  {Root} (root) at (50, "), "{outline}");
        assert_eq!(lines[2], "    user: object -> root-user");
        assert_eq!(lines[3], "    tags: array[1] -> root-tags-0");
        assert_eq!(lines[4], "column 1");
        assert!(outline.contains("    name: \"Alice\"\n    age: 30\n"), "{outline}");
        assert!(outline.contains("  tags[0] (root-tags-0)"), "{outline}");
    }

    #[test]
    fn long_arrays_are_cut_off() {
        let doc = JsonValue::from(serde_json::json!({ "m": [[1, 2, 3, 4]] }));
        let graph = build_default(&doc);

        let outline = to_outline(&graph, Some(2)).unwrap();
        assert!(outline.contains("    [1] 2 -> root-m-0-1\n    ... 2 more items\n"), "{outline}");
        assert!(!outline.contains("[2] 3"), "{outline}");

        let full = to_outline(&graph, None).unwrap();
        assert!(full.contains("[3] 4 -> root-m-0-3"), "{full}");
        assert!(!full.contains("more items"), "{full}");
    }
}
