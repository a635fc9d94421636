use crate::Point;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;
use tracing::debug;

/// Weight given to edges announced without one
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Errors raised by malformed structural notifications
#[derive(Debug, Error, PartialEq)]
pub enum MirrorError<N, E>
where
    N: fmt::Debug,
    E: fmt::Debug,
{
    #[error("node {0:?} already exists")]
    DuplicateNode(N),

    #[error("edge {0:?} already exists")]
    DuplicateEdge(E),

    #[error("edge {edge:?} references unknown node {node:?}")]
    UnknownEndpoint { edge: E, node: N },

    #[error("edge {edge:?} has a non finite weight {weight}")]
    InvalidWeight { edge: E, weight: f64 },
}

/// Per-node state owned by the engine
#[derive(Debug, Clone)]
pub struct NodeRecord<N> {
    pub(crate) id: N,
    /// Depth from the closest root, `None` when unreachable
    pub(crate) level: Option<usize>,
    /// Index within the sibling group (box or row)
    pub(crate) order: usize,
    pub(crate) parent: Option<N>,
    pub(crate) position: Point,
    /// Last position handed to the host
    pub(crate) published: Option<Point>,
    /// Moved since last publish
    pub(crate) changed: bool,
}

impl<N> NodeRecord<N> {
    fn new(id: N) -> Self {
        Self {
            id,
            level: None,
            order: 0,
            parent: None,
            position: Point::default(),
            published: None,
            changed: false,
        }
    }

    pub fn id(&self) -> &N {
        &self.id
    }
}

#[derive(Debug, Clone)]
pub struct EdgeRecord<E> {
    pub(crate) id: E,
    pub(crate) directed: bool,
    pub(crate) weight: f64,
    /// Set by the spanning tree reduction
    pub(crate) in_tree: bool,
}

impl<E> EdgeRecord<E> {
    pub fn id(&self) -> &E {
        &self.id
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn in_tree(&self) -> bool {
        self.in_tree
    }
}

/// Private copy of the host topology.
///
/// Indices are dense and follow insertion order. Removing an element moves
/// the last element of the same kind into the freed slot, so the id maps are
/// patched after every removal.
#[derive(Debug, Clone)]
pub struct Mirror<N, E> {
    graph: Graph<NodeRecord<N>, EdgeRecord<E>>,
    nodes: HashMap<N, NodeIndex>,
    edges: HashMap<E, EdgeIndex>,
}

impl<N, E> Default for Mirror<N, E> {
    fn default() -> Self {
        Self {
            graph: Graph::new(),
            nodes: HashMap::new(),
            edges: HashMap::new(),
        }
    }
}

impl<N, E> Mirror<N, E>
where
    N: Clone + Eq + Hash + fmt::Debug,
    E: Clone + Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: N) -> Result<NodeIndex, MirrorError<N, E>> {
        if self.nodes.contains_key(&id) {
            return Err(MirrorError::DuplicateNode(id));
        }

        let index = self.graph.add_node(NodeRecord::new(id.clone()));
        self.nodes.insert(id, index);
        Ok(index)
    }

    /// Remove a node and its incident edges. Returns `false` if the node
    /// was not present.
    pub fn remove_node(&mut self, id: &N) -> bool {
        let Some(index) = self.nodes.remove(id) else {
            debug!("Ignoring removal of unknown node {id:?}");
            return false;
        };

        for edge in self.incident_edges(index).into_iter().rev() {
            self.remove_edge_at(edge);
        }

        self.graph.remove_node(index);
        if index.index() < self.graph.node_count() {
            let moved = self.graph[index].id.clone();
            self.nodes.insert(moved, index);
        }

        true
    }

    pub fn add_edge(
        &mut self,
        id: E,
        from: &N,
        to: &N,
        directed: bool,
        weight: f64,
    ) -> Result<EdgeIndex, MirrorError<N, E>> {
        if self.edges.contains_key(&id) {
            return Err(MirrorError::DuplicateEdge(id));
        }
        if !weight.is_finite() {
            return Err(MirrorError::InvalidWeight { edge: id, weight });
        }

        let source = self.endpoint(&id, from)?;
        let target = self.endpoint(&id, to)?;

        let index = self.graph.add_edge(
            source,
            target,
            EdgeRecord {
                id: id.clone(),
                directed,
                weight,
                in_tree: false,
            },
        );
        self.edges.insert(id, index);
        Ok(index)
    }

    /// Returns `false` if the edge was not present
    pub fn remove_edge(&mut self, id: &E) -> bool {
        match self.edges.get(id) {
            Some(&index) => {
                self.remove_edge_at(index);
                true
            }
            None => {
                debug!("Ignoring removal of unknown edge {id:?}");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.nodes.clear();
        self.edges.clear();
    }

    fn endpoint(&self, edge: &E, node: &N) -> Result<NodeIndex, MirrorError<N, E>> {
        self.nodes
            .get(node)
            .copied()
            .ok_or_else(|| MirrorError::UnknownEndpoint {
                edge: edge.clone(),
                node: node.clone(),
            })
    }

    fn remove_edge_at(&mut self, index: EdgeIndex) {
        if let Some(record) = self.graph.remove_edge(index) {
            self.edges.remove(&record.id);
        }
        if index.index() < self.graph.edge_count() {
            let moved = self.graph[index].id.clone();
            self.edges.insert(moved, index);
        }
    }
}

impl<N, E> Mirror<N, E> {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> {
        self.graph.edge_indices()
    }

    pub fn node(&self, index: NodeIndex) -> &NodeRecord<N> {
        &self.graph[index]
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut NodeRecord<N> {
        &mut self.graph[index]
    }

    pub fn edge(&self, index: EdgeIndex) -> &EdgeRecord<E> {
        &self.graph[index]
    }

    pub(crate) fn edge_mut(&mut self, index: EdgeIndex) -> &mut EdgeRecord<E> {
        &mut self.graph[index]
    }

    /// Every edge touching `node`, in ascending index order, self loops once
    pub fn incident_edges(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .chain(self.graph.edges_directed(node, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// Directed edges pointing at `node` plus all undirected incident edges
    pub fn entering_edges(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        self.incident_edges(node)
            .into_iter()
            .filter(|&e| {
                let record = &self.graph[e];
                !record.directed || self.endpoints(e).1 == node
            })
            .collect()
    }

    pub fn degree(&self, node: NodeIndex) -> usize {
        self.incident_edges(node).len()
    }

    pub fn endpoints(&self, edge: EdgeIndex) -> (NodeIndex, NodeIndex) {
        // Indices handed out by this mirror are always valid
        self.graph
            .edge_endpoints(edge)
            .unwrap_or((NodeIndex::end(), NodeIndex::end()))
    }

    /// The endpoint of `edge` that is not `node`
    pub fn opposite(&self, edge: EdgeIndex, node: NodeIndex) -> NodeIndex {
        let (source, target) = self.endpoints(edge);
        if source == node {
            target
        } else {
            source
        }
    }
}

impl<N, E> Mirror<N, E>
where
    N: Eq + Hash,
{
    pub fn index_of(&self, id: &N) -> Option<NodeIndex> {
        self.nodes.get(id).copied()
    }
}
