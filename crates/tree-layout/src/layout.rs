use crate::events::{GraphEvent, PositionChanged, PositionSink};
use crate::geometry::extend;
use crate::mirror::{Mirror, MirrorError, DEFAULT_EDGE_WEIGHT};
use crate::roots::select_roots;
use crate::strategy::{Plan, Strategy};
use crate::{Bounds, Forest, Hierarchical, Point};
use chrono::{DateTime, Utc};
use derive_more::Display;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while computing a layout
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError<N>
where
    N: fmt::Debug,
{
    /// A configured root does not exist in the graph
    #[error("unknown root node {0:?}")]
    UnknownNode(N),
}

/// What a compute call ended up doing
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Topology unchanged since the last layout
    Clean,
    /// Nothing to lay out
    EmptyGraph,
    /// Positions were recomputed
    Relaid,
}

/// Report of a single compute call
#[derive(Debug, Clone, PartialEq)]
pub struct Step<N> {
    pub status: StepStatus,

    /// Number of nodes whose position changed
    pub moved: usize,

    /// Nodes the roots do not reach. They keep their previous coordinates
    /// and are left out of the moved count and the bounds.
    pub unreachable: Vec<N>,
}

impl<N> Step<N> {
    fn new(status: StepStatus) -> Self {
        Self {
            status,
            moved: 0,
            unreachable: Vec::new(),
        }
    }
}

/// Aggregate figures of the most recent compute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub moved: usize,

    /// Nodes in the graph when the last compute ran
    pub node_count: usize,

    /// Extent of every positioned node, `None` before the first layout
    pub bounds: Option<Bounds>,

    pub last_step: Option<DateTime<Utc>>,
}

impl Metrics {
    /// Share of the nodes that did not move, 1.0 meaning a stable layout
    pub fn stabilization(&self) -> f64 {
        if self.node_count == 0 {
            1.0
        } else {
            1.0 - self.moved as f64 / self.node_count as f64
        }
    }
}

/// Layout engine fed by structural notifications.
///
/// Notifications only update the mirrored topology and mark the layout as
/// dirty; positions are recomputed on the next [`Layout::compute`] call,
/// which then publishes the nodes that actually moved.
#[derive(Debug, Clone)]
pub struct Layout<N, E, S> {
    strategy: S,
    mirror: Mirror<N, E>,
    roots: Vec<N>,
    dirty: bool,
    moved: usize,
    node_count: usize,
    bounds: Option<Bounds>,
    last_step: Option<DateTime<Utc>>,
}

/// Spanning tree and box based layout
pub type HierarchicalLayout<N, E> = Layout<N, E, Hierarchical>;

/// Row per level layout for forests
pub type ForestLayout<N, E> = Layout<N, E, Forest>;

impl<N, E, S: Default> Default for Layout<N, E, S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<N, E, S> Layout<N, E, S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            mirror: Mirror::default(),
            roots: Vec::new(),
            dirty: false,
            moved: 0,
            node_count: 0,
            bounds: None,
            last_step: None,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Change the strategy configuration, forcing a full layout
    pub fn set_strategy(&mut self, strategy: S) {
        self.strategy = strategy;
        self.dirty = true;
    }

    pub fn mirror(&self) -> &Mirror<N, E> {
        &self.mirror
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            moved: self.moved,
            node_count: self.node_count,
            bounds: self.bounds,
            last_step: self.last_step,
        }
    }
}

impl<N, E, S> Layout<N, E, S>
where
    N: Clone + Eq + Hash + fmt::Debug,
    E: Clone + Eq + Hash + fmt::Debug,
    S: Strategy,
{
    pub fn algorithm_name(&self) -> &'static str {
        S::NAME
    }

    pub fn node_added(&mut self, id: N) -> Result<(), MirrorError<N, E>> {
        debug!("Node added: {id:?}");
        self.mirror.add_node(id)?;
        self.dirty = true;
        Ok(())
    }

    pub fn node_removed(&mut self, id: &N) {
        debug!("Node removed: {id:?}");
        self.mirror.remove_node(id);
        self.dirty = true;
    }

    pub fn edge_added(
        &mut self,
        id: E,
        from: &N,
        to: &N,
        directed: bool,
    ) -> Result<(), MirrorError<N, E>> {
        self.weighted_edge_added(id, from, to, directed, DEFAULT_EDGE_WEIGHT)
    }

    pub fn weighted_edge_added(
        &mut self,
        id: E,
        from: &N,
        to: &N,
        directed: bool,
        weight: f64,
    ) -> Result<(), MirrorError<N, E>> {
        debug!("Edge added: {id:?} {from:?} -> {to:?}, directed: {directed}, weight: {weight}");
        self.mirror.add_edge(id, from, to, directed, weight)?;
        self.dirty = true;
        Ok(())
    }

    pub fn edge_removed(&mut self, id: &E) {
        debug!("Edge removed: {id:?}");
        self.mirror.remove_edge(id);
        self.dirty = true;
    }

    pub fn graph_cleared(&mut self) {
        debug!("Graph cleared");
        self.mirror.clear();
        self.dirty = true;
    }

    /// Apply a recorded notification
    pub fn apply(&mut self, event: GraphEvent<N, E>) -> Result<(), MirrorError<N, E>> {
        match event {
            GraphEvent::NodeAdded(id) => self.node_added(id)?,
            GraphEvent::NodeRemoved(id) => self.node_removed(&id),
            GraphEvent::EdgeAdded {
                id,
                from,
                to,
                directed,
                weight,
            } => self.weighted_edge_added(
                id,
                &from,
                &to,
                directed,
                weight.unwrap_or(DEFAULT_EDGE_WEIGHT),
            )?,
            GraphEvent::EdgeRemoved(id) => self.edge_removed(&id),
            GraphEvent::GraphCleared => self.graph_cleared(),
        }
        Ok(())
    }

    /// Replace the configured roots. An empty list selects the node with
    /// the highest degree on every layout.
    pub fn set_roots<I>(&mut self, roots: I)
    where
        I: IntoIterator<Item = N>,
    {
        self.roots = roots.into_iter().collect();
        self.dirty = true;
    }

    /// Run one layout and publish cycle.
    ///
    /// Positions are only recomputed when the topology changed since the
    /// last successful call. Either way, nodes flagged as moved are sent to
    /// `sink` once and unflagged.
    ///
    /// # Errors
    /// Returns an error if a configured root does not exist. The previous
    /// layout is kept and the next call will try again.
    pub fn compute(&mut self, sink: &mut dyn PositionSink<N>) -> Result<Step<N>, LayoutError<N>> {
        let step = if !self.dirty {
            Step::new(StepStatus::Clean)
        } else if self.mirror.is_empty() {
            debug!("Empty graph, nothing to lay out");
            self.dirty = false;
            self.bounds = None;
            Step::new(StepStatus::EmptyGraph)
        } else {
            let roots = select_roots(&self.mirror, &self.roots)?;
            debug!(
                "Laying out {} nodes from roots {:?}",
                self.mirror.node_count(),
                roots
                    .iter()
                    .map(|&root| self.mirror.node(root).id())
                    .collect::<Vec<_>>()
            );

            let plan = self.strategy.plan(&mut self.mirror, &roots);
            self.dirty = false;
            self.detect_changes(plan)
        };

        self.moved = step.moved;
        self.node_count = self.mirror.node_count();
        self.publish(sink);
        self.last_step = Some(Utc::now());
        Ok(step)
    }

    /// Store the new positions and flag the nodes that moved
    fn detect_changes(&mut self, plan: Plan) -> Step<N> {
        let mut step = Step::new(StepStatus::Relaid);
        step.unreachable = plan
            .levels
            .unreached()
            .map(|node| self.mirror.node(node).id().clone())
            .collect();
        let mut bounds = None;

        let nodes: Vec<_> = self.mirror.node_indices().collect();
        for node in nodes {
            let i = node.index();
            let parent = plan.levels.parent[i].map(|p| self.mirror.node(p).id().clone());
            let record = self.mirror.node_mut(node);
            record.level = plan.levels.level[i];
            record.parent = parent;
            record.order = plan.order[i];

            let Some(position) = plan.positions[i] else {
                continue;
            };

            record.position = position;
            if record.published != Some(position) {
                record.published = Some(position);
                record.changed = true;
                step.moved += 1;
            }
            extend(&mut bounds, position);
        }

        if !step.unreachable.is_empty() {
            warn!(
                "{} nodes are not reachable from the roots and keep their position: {:?}",
                step.unreachable.len(),
                step.unreachable
            );
        }

        self.bounds = bounds;
        step
    }

    fn publish(&mut self, sink: &mut dyn PositionSink<N>) {
        let nodes: Vec<_> = self.mirror.node_indices().collect();
        for node in nodes {
            let record = self.mirror.node_mut(node);
            if !record.changed {
                continue;
            }

            record.changed = false;
            sink.position_changed(PositionChanged {
                node: record.id.clone(),
                x: record.position.x,
                y: record.position.y,
                z: 0.0,
            });
        }
    }

    /// Level of a node in the last layout, `None` if unknown or unreachable
    pub fn level(&self, id: &N) -> Option<usize> {
        let index = self.mirror.index_of(id)?;
        self.mirror.node(index).level
    }

    pub fn parent(&self, id: &N) -> Option<&N> {
        let index = self.mirror.index_of(id)?;
        self.mirror.node(index).parent.as_ref()
    }

    /// Current coordinates of a node, stale for unreachable nodes
    pub fn position(&self, id: &N) -> Option<Point> {
        let index = self.mirror.index_of(id)?;
        Some(self.mirror.node(index).position)
    }

    /// Index of a node among its siblings in the last layout
    pub fn order(&self, id: &N) -> Option<usize> {
        let index = self.mirror.index_of(id)?;
        let record = self.mirror.node(index);
        record.level.map(|_| record.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Orientation, Vec2};
    use test_log::test;

    type Events = Vec<PositionChanged<&'static str>>;

    fn path() -> HierarchicalLayout<&'static str, &'static str> {
        let mut layout = HierarchicalLayout::default();
        for node in ["a", "b", "c", "d"] {
            layout.node_added(node).unwrap();
        }
        layout.edge_added("ab", &"a", &"b", false).unwrap();
        layout.edge_added("bc", &"b", &"c", false).unwrap();
        layout.edge_added("cd", &"c", &"d", false).unwrap();
        layout
    }

    fn star() -> HierarchicalLayout<&'static str, &'static str> {
        let mut layout = HierarchicalLayout::default();
        for node in ["l0", "l1", "h", "l2", "l3"] {
            layout.node_added(node).unwrap();
        }
        for leaf in ["l0", "l1", "l2", "l3"] {
            layout.edge_added(leaf, &"h", &leaf, false).unwrap();
        }
        layout
    }

    #[test]
    fn single_node_is_its_own_root() {
        let mut layout: HierarchicalLayout<&str, &str> = HierarchicalLayout::default();
        layout.node_added("only").unwrap();

        let mut events = Events::new();
        let step = layout.compute(&mut events).unwrap();

        assert_eq!(step.status, StepStatus::Relaid);
        assert_eq!(step.moved, 1);
        assert_eq!(layout.level(&"only"), Some(0));
        assert_eq!(
            events,
            vec![PositionChanged {
                node: "only",
                x: 0.0,
                y: 0.5,
                z: 0.0
            }]
        );

        events.clear();
        let step = layout.compute(&mut events).unwrap();
        assert_eq!(step.status, StepStatus::Clean);
        assert_eq!(step.moved, 0);
        assert!(events.is_empty());
        assert_eq!(layout.metrics().stabilization(), 1.0);
    }

    #[test]
    fn path_levels_follow_distance_from_root() {
        let mut layout = path();
        layout.set_roots(["a"]);

        let mut events = Events::new();
        let step = layout.compute(&mut events).unwrap();
        assert_eq!(step.moved, 4);
        assert_eq!(events.len(), 4);

        for (node, level) in [("a", 0), ("b", 1), ("c", 2), ("d", 3)] {
            assert_eq!(layout.level(&node), Some(level));
        }
        assert_eq!(layout.parent(&"c"), Some(&"b"));
        assert_eq!(layout.parent(&"a"), None);

        let bounds = layout.metrics().bounds.unwrap();
        events.clear();
        let step = layout.compute(&mut events).unwrap();
        assert_eq!(step.moved, 0);
        assert!(events.is_empty());
        assert_eq!(layout.metrics().bounds, Some(bounds));
    }

    #[test]
    fn relayout_without_moves_publishes_nothing() {
        let mut layout = path();
        layout.set_roots(["a"]);
        layout.compute(&mut Events::new()).unwrap();

        // Adding and removing an edge marks the layout dirty but moves nothing
        layout.edge_added("ad", &"a", &"d", false).unwrap();
        layout.edge_removed(&"ad");
        assert!(layout.is_dirty());

        let mut events = Events::new();
        let step = layout.compute(&mut events).unwrap();
        assert_eq!(step.status, StepStatus::Relaid);
        assert_eq!(step.moved, 0);
        assert!(events.is_empty());
        assert_eq!(layout.metrics().stabilization(), 1.0);
    }

    #[test]
    fn star_centre_is_auto_selected() {
        let mut layout = star();
        let mut events = Events::new();
        layout.compute(&mut events).unwrap();

        assert_eq!(layout.level(&"h"), Some(0));
        let mut xs = Vec::new();
        for leaf in ["l0", "l1", "l2", "l3"] {
            assert_eq!(layout.level(&leaf), Some(1));
            assert_eq!(layout.parent(&leaf), Some(&"h"));
            xs.push(layout.position(&leaf).unwrap().x);
        }
        assert_eq!(xs, vec![-2.5, -1.25, 0.0, 1.25]);
        assert_eq!(layout.order(&"l3"), Some(3));
    }

    #[test]
    fn disconnected_leaf_is_left_out() {
        let mut layout = star();
        layout.compute(&mut Events::new()).unwrap();
        let stale = layout.position(&"l3").unwrap();

        layout.edge_removed(&"l3");
        let mut events = Events::new();
        let step = layout.compute(&mut events).unwrap();

        assert_eq!(step.unreachable, vec!["l3"]);
        assert_eq!(layout.level(&"l3"), None);
        assert_eq!(layout.parent(&"l3"), None);
        assert_eq!(layout.order(&"l3"), None);
        assert_eq!(layout.position(&"l3"), Some(stale));

        // l0 keeps its spot, l1 and l2 close ranks
        assert_eq!(step.moved, 2);
        assert!(events.iter().all(|e| e.node == "l1" || e.node == "l2"));

        let bounds = layout.metrics().bounds.unwrap();
        assert!(!bounds.contains(stale));
        assert_eq!(layout.metrics().stabilization(), 1.0 - 2.0 / 5.0);
    }

    #[test]
    fn other_components_are_not_laid_out() {
        let mut layout: HierarchicalLayout<&str, &str> = HierarchicalLayout::default();
        for node in ["a", "b", "c", "x", "y"] {
            layout.node_added(node).unwrap();
        }
        layout.edge_added("ab", &"a", &"b", false).unwrap();
        layout.edge_added("bc", &"b", &"c", false).unwrap();
        layout.edge_added("xy", &"x", &"y", false).unwrap();

        let mut events = Events::new();
        let step = layout.compute(&mut events).unwrap();

        assert_eq!(layout.level(&"b"), Some(0));
        assert_eq!(step.unreachable, vec!["x", "y"]);
        assert_eq!(layout.position(&"x"), Some(Point::default()));
        assert!(events.iter().all(|e| e.node != "x" && e.node != "y"));

        // Explicit roots may cover every component
        layout.set_roots(["a", "x"]);
        let step = layout.compute(&mut events).unwrap();
        assert!(step.unreachable.is_empty());
        assert_eq!(layout.level(&"y"), Some(1));
        assert_eq!(layout.position(&"x"), Some(Point::new(2.5, 0.5)));
    }

    #[test]
    fn unknown_root_keeps_previous_layout() {
        let mut layout = path();
        layout.set_roots(["a"]);
        layout.compute(&mut Events::new()).unwrap();
        let before = layout.metrics();

        layout.set_roots(["a", "missing"]);
        let mut events = Events::new();
        assert_eq!(
            layout.compute(&mut events),
            Err(LayoutError::UnknownNode("missing"))
        );
        assert!(events.is_empty());
        assert!(layout.is_dirty());
        assert_eq!(layout.metrics().moved, before.moved);
        assert_eq!(layout.metrics().bounds, before.bounds);
        assert_eq!(layout.level(&"d"), Some(3));

        layout.set_roots(["d"]);
        layout.compute(&mut events).unwrap();
        assert_eq!(layout.level(&"a"), Some(3));
    }

    #[test]
    fn empty_graph_is_a_no_op() {
        let mut layout: ForestLayout<&str, &str> = ForestLayout::default();
        layout.node_added("a").unwrap();
        layout.node_removed(&"a");

        let step = layout.compute(&mut Events::new()).unwrap();
        assert_eq!(step.status, StepStatus::EmptyGraph);
        assert_eq!(layout.metrics().bounds, None);
        assert_eq!(layout.metrics().stabilization(), 1.0);
        assert!(layout.metrics().last_step.is_some());
    }

    #[test]
    fn stabilization_counts_nodes_of_the_last_compute() {
        let mut layout: HierarchicalLayout<&str, &str> = HierarchicalLayout::default();
        let nodes = ["n0", "n1", "n2", "n3", "n4"];
        for node in nodes {
            layout.node_added(node).unwrap();
        }
        layout.set_roots(nodes);
        layout.compute(&mut Events::new()).unwrap();

        for node in &nodes[1..] {
            layout.node_removed(node);
        }
        let metrics = layout.metrics();
        assert_eq!(metrics.moved, 5);
        assert_eq!(metrics.node_count, 5);
        assert_eq!(metrics.stabilization(), 0.0);

        // Removed roots would fail the next compute
        layout.set_roots(["n0"]);
        layout.compute(&mut Events::new()).unwrap();
        let metrics = layout.metrics();
        assert_eq!(metrics.node_count, 1);
        assert!((0.0..=1.0).contains(&metrics.stabilization()));
    }

    #[test]
    fn malformed_notifications_leave_layout_clean() {
        let mut layout = path();
        layout.compute(&mut Events::new()).unwrap();

        assert!(layout.node_added("a").is_err());
        assert!(layout.edge_added("ax", &"a", &"x", false).is_err());
        assert!(!layout.is_dirty());
    }

    #[test]
    fn identical_histories_give_identical_positions() {
        let history = || {
            let mut layout = star();
            layout.node_added("z").unwrap();
            layout.weighted_edge_added("zl0", &"z", &"l0", false, 0.5).unwrap();
            layout.weighted_edge_added("zh", &"z", &"h", false, 3.0).unwrap();
            layout.node_removed(&"l2");
            layout.set_strategy(Hierarchical::new(Orientation::Horizontal));
            let mut events = Events::new();
            layout.compute(&mut events).unwrap();
            events
        };

        assert_eq!(history(), history());
    }

    #[test]
    fn forest_rows_are_evenly_spaced() {
        let mut layout: ForestLayout<&str, &str> = ForestLayout::default();
        for node in ["r", "a", "b", "a0", "a1", "b0", "b1"] {
            layout.node_added(node).unwrap();
        }
        for (child, parent) in [
            ("a", "r"),
            ("b", "r"),
            ("a0", "a"),
            ("a1", "a"),
            ("b0", "b"),
            ("b1", "b"),
        ] {
            layout.edge_added(child, &child, &parent, true).unwrap();
        }
        layout.set_roots(["r"]);
        layout.compute(&mut Events::new()).unwrap();

        let canvas = layout.strategy().canvas;
        for (row, size) in [
            (vec!["r"], 1.0),
            (vec!["a", "b"], 2.0),
            (vec!["a0", "a1", "b0", "b1"], 4.0),
        ] {
            let xs: Vec<f64> = row.iter().map(|n| layout.position(n).unwrap().x).collect();
            for pair in xs.windows(2) {
                assert!(pair[1] > pair[0]);
                assert_eq!(pair[1] - pair[0], canvas.x / size);
            }
            assert_eq!(xs[0], canvas.x / size / 2.0);
        }
        assert_eq!(layout.level(&"b1"), Some(2));
        assert_eq!(layout.algorithm_name(), "Forest");
    }

    #[test]
    fn forest_canvas_is_configurable() {
        let mut layout: ForestLayout<&str, &str> =
            ForestLayout::new(Forest::new(Vec2::new(100.0, 10.0)));
        layout.node_added("a").unwrap();
        layout.compute(&mut Events::new()).unwrap();
        assert_eq!(layout.position(&"a"), Some(Point::new(50.0, 5.0)));
    }

    #[test]
    fn clearing_the_graph_forgets_nodes() {
        let mut layout = path();
        layout.compute(&mut Events::new()).unwrap();

        layout.graph_cleared();
        assert_eq!(layout.mirror().node_count(), 0);
        assert_eq!(layout.level(&"a"), None);

        layout.node_added("a").unwrap();
        let mut events = Events::new();
        let step = layout.compute(&mut events).unwrap();
        assert_eq!(step.moved, 1);
        assert_eq!(events.len(), 1);
    }
}
