//! CloudFlow Map: interactive cloud-architecture explorer.
//!
//! This crate renders a fixed service topology as a force-directed canvas
//! diagram, left-to-right by request flow, with pan/zoom/drag interaction
//! and a sidebar that asks a generation model to explain the traffic
//! through the system or through one selected node.

use leptos::prelude::*;
use leptos_meta::*;
use log::{info, warn, Level};

pub mod components;
pub mod dataset;
pub mod services;

pub use components::arch_graph::{
	ArchData, ArchLink, ArchNode, ArchitectureGraph, GraphState, NodeKind,
};
pub use components::sidebar::InfoSidebar;

use services::insight::{fetch_insight, InsightError, FALLBACK_MESSAGE};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("cloudflow-map: logging initialized");
}

/// Whether a click on `clicked` should replace the current selection.
/// Re-clicking the selected node is a no-op, so the analysis already in
/// flight for it is not restarted.
pub fn selection_should_update(current: Option<&ArchNode>, clicked: &ArchNode) -> bool {
	current.is_none_or(|node| node.id != clicked.id)
}

/// Main application component: brand header, diagram canvas, status bar,
/// and the insight sidebar.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let data = dataset::load_architecture();
	let data_for_graph = data.clone();
	let data_signal = Signal::derive(move || data_for_graph.clone());

	let selected_node: RwSignal<Option<ArchNode>> = RwSignal::new(None);
	let explanation = RwSignal::new(String::new());
	let loading = RwSignal::new(false);
	// Monotonic request id; a response only lands if no newer request
	// started while it was in flight.
	let generation: RwSignal<u64> = RwSignal::new(0);

	let request_insight = move |focus: Option<ArchNode>| {
		let data = data.clone();
		let my_generation = generation.get_untracked() + 1;
		generation.set(my_generation);
		loading.set(true);
		explanation.set(String::new());

		leptos::task::spawn_local(async move {
			let focus_name = focus.as_ref().map(|n| n.name.as_str());
			let result = fetch_insight(&data, focus_name).await;

			if generation.get_untracked() != my_generation {
				return;
			}

			let text = match result {
				Ok(text) => text,
				Err(InsightError::Empty) => {
					if focus.is_some() {
						"No specific explanation found for this node.".to_string()
					} else {
						"No explanation generated.".to_string()
					}
				}
				Err(e) => {
					warn!("cloudflow-map: analysis request failed: {}", e);
					FALLBACK_MESSAGE.to_string()
				}
			};
			explanation.set(text);
			loading.set(false);
		});
	};

	// Whole-system analysis once on startup.
	let initial_request = request_insight.clone();
	Effect::new(move |_| {
		initial_request(None);
	});

	let click_request = request_insight.clone();
	let on_node_click = move |node: ArchNode| {
		let update = selected_node
			.with_untracked(|current| selection_should_update(current.as_ref(), &node));
		if !update {
			return;
		}
		selected_node.set(Some(node.clone()));
		click_request(Some(node));
	};

	let clear_request = request_insight.clone();
	let on_clear = move |_: ()| {
		selected_node.set(None);
		clear_request(None);
	};

	let on_reset = move |_| {
		if let Some(window) = web_sys::window() {
			let _ = window.location().reload();
		}
	};

	let selected_id = Signal::derive(move || selected_node.get().map(|n| n.id));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="CloudFlow Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="app-shell">
			<main class="map-pane">
				<header class="map-header">
					<div class="brand">
						<div class="brand-mark">"\u{26a1}"</div>
						<div>
							<h1>"CloudFlow " <span class="brand-accent">"Map"</span></h1>
							<div class="status-line">
								<span class="live-dot"></span>
								<span class="live-label">"System Live"</span>
							</div>
						</div>
					</div>
					<div class="header-actions">
						<button class="ghost-button">"EXPORT PDF"</button>
						<button class="primary-button" on:click=on_reset>
							"RESET LAYOUT"
						</button>
					</div>
				</header>

				<div class="map-canvas">
					<ArchitectureGraph
						data=data_signal
						selected=selected_id
						on_node_click=on_node_click
					/>
					<div class="map-overlay">
						<h2>
							<span class="trace-dot"></span>
							<span class="trace-dot delayed"></span>
							"Architecture Topology"
						</h2>
						<p>"Real-time Traffic Trace"</p>
					</div>
				</div>

				<footer class="status-bar">
					<div class="legend">
						<div class="legend-item">
							<span class="legend-dot compute"></span>
							"Compute Node"
						</div>
						<div class="legend-item">
							<span class="legend-dot storage"></span>
							"Storage"
						</div>
						<div class="legend-item">
							<span class="legend-dot gemini"></span>
							"Gemini API"
						</div>
					</div>
					<div class="build-info">"V2.4.0-STABLE // LATENCY: 24MS // REGION: GLOBAL"</div>
				</footer>
			</main>

			<aside class="sidebar-pane">
				<InfoSidebar
					selected=selected_node
					explanation=explanation
					loading=loading
					on_clear=on_clear
				/>
			</aside>
		</div>
	}
}
