//! Diagram data structures for input to the architecture graph component.

use serde::Deserialize;

/// Category of an architecture node. Drives the icon and accent color
/// through the presentation catalog in [`super::theme`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
	/// End-user client originating requests.
	User,
	/// Entry point distributing incoming traffic.
	LoadBalancer,
	/// Web tier serving the user interface.
	Frontend,
	/// Service tier handling application logic.
	BackendApi,
	/// Durable relational or document storage.
	Database,
	/// In-memory store for hot data.
	Cache,
	/// Generative or analytical model endpoint.
	AiModel,
	/// Third-party dependency outside the system boundary.
	ExternalService,
}

/// A node in the architecture diagram.
#[derive(Clone, Debug, Deserialize)]
pub struct ArchNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Display name rendered inside the node box.
	pub name: String,
	/// Node category. Serialized as `type` in the wire format.
	#[serde(rename = "type")]
	pub kind: NodeKind,
	/// Free text shown in the sidebar and fed to the analysis prompt.
	pub description: String,
	/// Flow ordering hint; lower ranks settle further left.
	pub rank: u32,
}

/// A directed connection between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct ArchLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Short caption drawn near the connector midpoint.
	pub label: String,
}

/// Complete diagram data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ArchData {
	/// Diagram nodes, in input order.
	pub nodes: Vec<ArchNode>,
	/// Directed connections between nodes.
	pub links: Vec<ArchLink>,
}
