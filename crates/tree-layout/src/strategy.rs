use crate::levels::Levels;
use crate::mirror::Mirror;
use crate::Point;
use petgraph::graph::NodeIndex;

/// Result of one planning pass, indexed by node index
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub levels: Levels,

    /// Computed positions, `None` for nodes the roots do not reach
    pub positions: Vec<Option<Point>>,

    /// Index of each node within its sibling group
    pub order: Vec<usize>,
}

/// A way of turning the mirrored topology into positions
pub trait Strategy {
    /// Name reported to the host
    const NAME: &'static str;

    /// Compute levels and positions from the given, already resolved, roots.
    ///
    /// The mirror is mutable so that strategies can record per-edge state
    /// such as spanning tree membership.
    fn plan<N, E>(&self, mirror: &mut Mirror<N, E>, roots: &[NodeIndex]) -> Plan;
}
