//! UI components: the diagram canvas and the insight sidebar.

pub mod arch_graph;
pub mod sidebar;
