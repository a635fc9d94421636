//! Tree and forest layouts for graph viewers
//!
//! This crate computes 2D positions for the nodes of tree-shaped graphs. A
//! host feeds the engine structural notifications as its graph changes and
//! asks for a new layout whenever it wants to redraw; only the nodes whose
//! position changed are reported back.
//!
//! # Layouts
//!
//! - [`HierarchicalLayout`]: reduces the graph to a minimum spanning forest
//!   and hangs every group of siblings in a box below its parent
//! - [`ForestLayout`]: follows the edges as they are and draws each level as
//!   an evenly spaced row
//!
//! # Example
//!
//! ```
//! use tree_layout::{HierarchicalLayout, PositionChanged};
//!
//! let mut layout = HierarchicalLayout::<&str, &str>::default();
//! layout.node_added("root").unwrap();
//! layout.node_added("leaf").unwrap();
//! layout.edge_added("e", &"root", &"leaf", false).unwrap();
//!
//! let mut moved: Vec<PositionChanged<&str>> = Vec::new();
//! let step = layout.compute(&mut moved).unwrap();
//! assert_eq!(step.moved, 2);
//! assert_eq!(layout.level(&"leaf"), Some(1));
//!
//! // Nothing changed, nothing is published
//! moved.clear();
//! layout.compute(&mut moved).unwrap();
//! assert!(moved.is_empty());
//! ```

mod engine;
mod events;
mod forest;
mod geometry;
mod hierarchical;
mod layout;
mod levels;
mod mirror;
mod roots;
mod strategy;

// Re-export core types and traits
pub use engine::LayoutEngine;
pub use events::{GraphEvent, PositionChanged, PositionSink};
pub use geometry::{Bounds, Point, Vec2};
pub use levels::Levels;
pub use mirror::{EdgeRecord, Mirror, MirrorError, NodeRecord, DEFAULT_EDGE_WEIGHT};
pub use strategy::{Plan, Strategy};

// Re-export layout types
pub use forest::Forest;
pub use hierarchical::{Hierarchical, Orientation};
pub use layout::{ForestLayout, HierarchicalLayout, Layout, LayoutError, Metrics, Step, StepStatus};

// Re-export petgraph indices used by the mirror
pub use petgraph::graph::{EdgeIndex, NodeIndex};
