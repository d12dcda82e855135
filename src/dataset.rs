//! The built-in topology and the optional DOM override.
//!
//! The application ships with a fixed reference architecture. A page can
//! replace it by embedding JSON in a `<script id="architecture-data">`
//! element; anything unparseable falls back to the built-in dataset.

use log::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::components::arch_graph::{ArchData, ArchLink, ArchNode, NodeKind};

fn node(id: &str, name: &str, kind: NodeKind, description: &str, rank: u32) -> ArchNode {
	ArchNode {
		id: id.to_string(),
		name: name.to_string(),
		kind,
		description: description.to_string(),
		rank,
	}
}

fn link(source: &str, target: &str, label: &str) -> ArchLink {
	ArchLink {
		source: source.to_string(),
		target: target.to_string(),
		label: label.to_string(),
	}
}

/// The reference cloud architecture: a request path from the browser
/// through a load balancer, frontend, and backend to its data stores and
/// third-party services.
pub fn sample_architecture() -> ArchData {
	ArchData {
		nodes: vec![
			node(
				"user",
				"Browser / Client",
				NodeKind::User,
				"End-user device initiating requests via HTTPS.",
				0,
			),
			node(
				"lb",
				"Cloud Load Balancer",
				NodeKind::LoadBalancer,
				"Global HTTPS Load Balancer managing incoming traffic.",
				1,
			),
			node(
				"fe",
				"Frontend (Cloud Run)",
				NodeKind::Frontend,
				"React application serving dynamic content.",
				2,
			),
			node(
				"be",
				"Backend API",
				NodeKind::BackendApi,
				"Handles business logic and authentication.",
				3,
			),
			node(
				"cache",
				"Memorystore",
				NodeKind::Cache,
				"Redis for frequent query results.",
				4,
			),
			node(
				"db",
				"Cloud SQL",
				NodeKind::Database,
				"PostgreSQL relational database.",
				4,
			),
			node(
				"ai",
				"Gemini AI",
				NodeKind::AiModel,
				"Generative AI for intelligence.",
				5,
			),
			node(
				"ext",
				"External APIs",
				NodeKind::ExternalService,
				"Stripe, Auth0, or other third-party services.",
				5,
			),
		],
		links: vec![
			link("user", "lb", "HTTPS"),
			link("lb", "fe", "Proxy"),
			link("fe", "be", "JSON API"),
			link("be", "db", "Queries"),
			link("be", "cache", "Cache"),
			link("be", "ai", "Analysis"),
			link("be", "ext", "External"),
		],
	}
}

/// Dataset from a script element with id="architecture-data", if present
/// and valid. Expected format: JSON with { nodes: [...], links: [...] }.
fn load_override() -> Option<ArchData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("architecture-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<ArchData>(&json_text) {
		Ok(data) => {
			info!(
				"cloudflow-map: loaded {} nodes, {} links from page data",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("cloudflow-map: failed to parse page data: {}", e);
			None
		}
	}
}

/// The topology to display: the page override when one parses, otherwise
/// the built-in reference architecture.
pub fn load_architecture() -> ArchData {
	load_override().unwrap_or_else(sample_architecture)
}
