use crate::events::{GraphEvent, PositionSink};
use crate::layout::{Layout, LayoutError, Metrics, Step};
use crate::mirror::MirrorError;
use crate::strategy::Strategy;
use std::fmt;
use std::hash::Hash;

/// A layout engine driven by a host graph
///
/// This trait is object safe so that a host can pick the layout strategy at
/// runtime and keep a `Box<dyn LayoutEngine<N, E>>`:
/// - `N` identifies nodes in the host graph
/// - `E` identifies edges in the host graph
pub trait LayoutEngine<N, E>
where
    N: fmt::Debug,
    E: fmt::Debug,
{
    /// Name of the layout algorithm, for diagnostics and labels
    fn algorithm_name(&self) -> &'static str;

    /// Forward a structural notification from the host graph
    ///
    /// # Errors
    /// Returns an error for notifications that would corrupt the topology
    /// (duplicate ids, edges to unknown nodes, non finite weights)
    fn notify(&mut self, event: GraphEvent<N, E>) -> Result<(), MirrorError<N, E>>;

    /// Replace the configured roots, an empty list meaning automatic
    fn set_roots(&mut self, roots: Vec<N>);

    /// Relayout if needed and publish the nodes that moved
    ///
    /// # Errors
    /// Returns an error if a configured root is not part of the graph
    fn compute(&mut self, sink: &mut dyn PositionSink<N>) -> Result<Step<N>, LayoutError<N>>;

    /// Figures of the last compute
    fn metrics(&self) -> Metrics;
}

impl<N, E, S> LayoutEngine<N, E> for Layout<N, E, S>
where
    N: Clone + Eq + Hash + fmt::Debug,
    E: Clone + Eq + Hash + fmt::Debug,
    S: Strategy,
{
    fn algorithm_name(&self) -> &'static str {
        Layout::algorithm_name(self)
    }

    fn notify(&mut self, event: GraphEvent<N, E>) -> Result<(), MirrorError<N, E>> {
        self.apply(event)
    }

    fn set_roots(&mut self, roots: Vec<N>) {
        Layout::set_roots(self, roots)
    }

    fn compute(&mut self, sink: &mut dyn PositionSink<N>) -> Result<Step<N>, LayoutError<N>> {
        Layout::compute(self, sink)
    }

    fn metrics(&self) -> Metrics {
        Layout::metrics(self)
    }
}
