//! Interactive cloud-architecture diagram component.
//!
//! Renders a fixed service topology on an HTML canvas with:
//! - Force-directed positioning with rank-based left-to-right flow
//! - Pan, zoom, and node dragging interactions
//! - Curved, labeled connectors with directional arrowheads
//! - Click selection wired to a host-provided callback
//!
//! # Example
//!
//! ```ignore
//! use cloudflow_map::{ArchData, ArchLink, ArchNode, ArchitectureGraph, NodeKind};
//!
//! let data = ArchData {
//!     nodes: vec![
//!         ArchNode { id: "fe".into(), name: "Frontend".into(), kind: NodeKind::Frontend, .. },
//!         ArchNode { id: "be".into(), name: "Backend API".into(), kind: NodeKind::BackendApi, .. },
//!     ],
//!     links: vec![
//!         ArchLink { source: "fe".into(), target: "be".into(), label: "JSON API".into() },
//!     ],
//! };
//!
//! view! {
//!     <ArchitectureGraph
//!         data=data
//!         selected=selected_id
//!         on_node_click=move |node| log::info!("picked {}", node.id)
//!     />
//! }
//! ```

mod component;
mod render;
pub mod simulation;
pub mod state;
pub mod theme;
mod types;

pub use component::ArchitectureGraph;
pub use state::GraphState;
pub use theme::Theme;
pub use types::{ArchData, ArchLink, ArchNode, NodeKind};
