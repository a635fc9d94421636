use serde::{Deserialize, Serialize};

/// Structural notification sent by the host graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent<N, E> {
    NodeAdded(N),
    NodeRemoved(N),
    EdgeAdded {
        id: E,
        from: N,
        to: N,
        directed: bool,
        /// Spanning tree weight, the default weight when absent
        #[serde(default)]
        weight: Option<f64>,
    },
    EdgeRemoved(E),
    GraphCleared,
}

/// A node moved during the last compute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionChanged<N> {
    pub node: N,
    pub x: f64,
    pub y: f64,
    /// Always 0, layouts are planar
    pub z: f64,
}

/// Receiver of position updates
pub trait PositionSink<N> {
    fn position_changed(&mut self, event: PositionChanged<N>);
}

// Blanket implementation for closures
impl<N, F> PositionSink<N> for F
where
    F: FnMut(PositionChanged<N>),
{
    fn position_changed(&mut self, event: PositionChanged<N>) {
        self(event)
    }
}

impl<N> PositionSink<N> for Vec<PositionChanged<N>> {
    fn position_changed(&mut self, event: PositionChanged<N>) {
        self.push(event);
    }
}
