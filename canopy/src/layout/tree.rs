use std::collections::{HashMap, VecDeque};

use index_vec::IndexVec;
use tracing::*;

use crate::graph::Graph;
use crate::layout::{LayoutError, NodeIdx};

/// Parent/child structure of a graph, indexed by node position.
#[derive(Debug)]
pub(crate) struct Tree {
    pub(crate) parent: IndexVec<NodeIdx, Option<NodeIdx>>,
    pub(crate) depth: IndexVec<NodeIdx, usize>,
    /// `(source, target)` for every edge, in edge order.
    pub(crate) edges: Vec<(NodeIdx, NodeIdx)>,
}

impl Tree {
    /// Resolve edge endpoints and compute depths by a breadth-first walk from every root (node
    /// without an incoming edge), in node order.
    pub(crate) fn from_graph(graph: &Graph) -> Result<Self, LayoutError> {
        let count = graph.nodes.len();

        let mut lookup: HashMap<&str, NodeIdx> = HashMap::with_capacity(count);
        for (i, node) in graph.nodes.iter().enumerate() {
            if lookup.insert(node.id.as_str(), NodeIdx::from_usize(i)).is_some() {
                return Err(LayoutError::DuplicateNode {
                    node: node.id.clone(),
                });
            }
        }

        let mut parent: IndexVec<NodeIdx, Option<NodeIdx>> = IndexVec::from_vec(vec![None; count]);
        let mut children: IndexVec<NodeIdx, Vec<NodeIdx>> =
            IndexVec::from_vec(vec![Vec::new(); count]);
        let mut edges = Vec::with_capacity(graph.edges.len());

        for edge in &graph.edges {
            let resolve = |id: &str| {
                lookup
                    .get(id)
                    .copied()
                    .ok_or_else(|| LayoutError::UnknownNode {
                        edge: edge.id.clone(),
                        node: id.to_string(),
                    })
            };
            let source = resolve(&edge.source)?;
            let target = resolve(&edge.target)?;

            if let Some(existing) = parent[target] {
                return Err(LayoutError::MultipleParents {
                    node: edge.target.clone(),
                    first: graph.nodes[existing.index()].id.clone(),
                    second: edge.source.clone(),
                });
            }
            parent[target] = Some(source);
            children[source].push(target);
            edges.push((source, target));
        }

        let mut depth: IndexVec<NodeIdx, Option<usize>> = IndexVec::from_vec(vec![None; count]);
        let mut queue = VecDeque::new();
        for (idx, p) in parent.iter_enumerated() {
            if p.is_none() {
                depth[idx] = Some(0);
                queue.push_back(idx);
            }
        }
        trace!(roots = queue.len());

        while let Some(idx) = queue.pop_front() {
            let next = depth[idx].map(|d| d + 1);
            for &child in &children[idx] {
                depth[child] = next;
                queue.push_back(child);
            }
        }

        // With at most one parent per node, anything the walk missed sits on a cycle.
        let depth = depth
            .into_iter_enumerated()
            .map(|(idx, d)| {
                d.ok_or_else(|| LayoutError::Unreachable {
                    node: graph.nodes[idx.index()].id.clone(),
                })
            })
            .collect::<Result<IndexVec<NodeIdx, usize>, _>>()?;

        Ok(Tree {
            parent,
            depth,
            edges,
        })
    }

    /// Node indices grouped by depth, each group in node order.
    pub(crate) fn columns(&self) -> Vec<Vec<NodeIdx>> {
        let mut columns: Vec<Vec<NodeIdx>> = Vec::new();
        for (idx, &depth) in self.depth.iter_enumerated() {
            if columns.len() <= depth {
                columns.resize_with(depth + 1, Vec::new);
            }
            columns[depth].push(idx);
        }
        columns
    }
}
