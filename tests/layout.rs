//! End-to-end layout and interaction tests against the pure state layer.
//!
//! Everything here runs on the host target: the simulation, the pointer
//! contract, dataset resolution, and prompt assembly are all plain Rust
//! with no browser in sight.

// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::collections::HashSet;

use cloudflow_map::components::arch_graph::simulation::DragIntent;
use cloudflow_map::components::arch_graph::state::{GraphState, ZOOM_MAX, ZOOM_MIN};
use cloudflow_map::dataset::sample_architecture;
use cloudflow_map::services::insight::build_prompt;
use cloudflow_map::{selection_should_update, ArchData, ArchLink, ArchNode, NodeKind};

const WIDTH: f64 = 1920.0;
const HEIGHT: f64 = 1080.0;
/// Minimum center separation enforced by the collision constraint.
const MIN_SEPARATION: f64 = 100.0;

fn settled_sample() -> GraphState {
	let mut state = GraphState::new(&sample_architecture(), WIDTH, HEIGHT);
	state.sim.settle();
	state
}

fn index_of(state: &GraphState, id: &str) -> usize {
	state
		.nodes()
		.iter()
		.position(|n| n.id == id)
		.unwrap_or_else(|| panic!("no node '{id}'"))
}

fn x_of(state: &GraphState, id: &str) -> f64 {
	state.positions()[index_of(state, id)].x
}

fn node(id: &str, rank: u32) -> ArchNode {
	ArchNode {
		id: id.to_string(),
		name: id.to_uppercase(),
		kind: NodeKind::BackendApi,
		description: format!("{id} service"),
		rank,
	}
}

fn link(source: &str, target: &str) -> ArchLink {
	ArchLink {
		source: source.to_string(),
		target: target.to_string(),
		label: "RPC".to_string(),
	}
}

#[test]
fn layout_settles_without_overlap() {
	let state = settled_sample();
	assert!(state.sim.is_settled());

	let positions = state.positions();
	for i in 0..positions.len() {
		assert!(positions[i].x.is_finite() && positions[i].y.is_finite());
		for j in (i + 1)..positions.len() {
			let dx = positions[i].x - positions[j].x;
			let dy = positions[i].y - positions[j].y;
			let dist = (dx * dx + dy * dy).sqrt();
			assert!(
				dist >= MIN_SEPARATION - 1e-6,
				"nodes {i} and {j} rest {dist:.2} apart"
			);
		}
	}
}

#[test]
fn ranks_order_left_to_right() {
	let state = settled_sample();

	assert!(x_of(&state, "user") < x_of(&state, "lb"));
	assert!(x_of(&state, "lb") < x_of(&state, "fe"));
	assert!(x_of(&state, "fe") < x_of(&state, "be"));
	assert!(x_of(&state, "be") < x_of(&state, "cache").min(x_of(&state, "db")));
	assert!(
		x_of(&state, "cache").max(x_of(&state, "db"))
			< x_of(&state, "ai").min(x_of(&state, "ext"))
	);
}

#[test]
fn links_point_forward() {
	let state = settled_sample();
	for link in state.links() {
		let (s, t) = (
			&state.positions()[link.source],
			&state.positions()[link.target],
		);
		assert!(t.x > s.x, "link {} -> {} runs backward", link.source, link.target);
	}
}

#[test]
fn press_pins_node_before_next_integration() {
	let mut state = GraphState::new(&sample_architecture(), WIDTH, HEIGHT);
	let be = index_of(&state, "be");
	let user = index_of(&state, "user");
	let held = (state.positions()[be].x, state.positions()[be].y);
	let free = (state.positions()[user].x, state.positions()[user].y);

	state.sim.queue(DragIntent::Grab { index: be });
	state.tick();

	// The grabbed node is fixed from the very tick that drains the
	// intent, while unpinned nodes keep moving under full forces.
	assert_eq!((state.positions()[be].x, state.positions()[be].y), held);
	assert_eq!(state.positions()[be].vx, 0.0);
	assert!((state.positions()[user].x, state.positions()[user].y) != free);
}

#[test]
fn full_gesture_leaves_no_pins() {
	let mut state = GraphState::new(&sample_architecture(), WIDTH, HEIGHT);
	let be = index_of(&state, "be");
	let (nx, ny) = (state.positions()[be].x, state.positions()[be].y);

	state.pointer_down(nx, ny);
	state.pointer_move(nx + 120.0, ny + 40.0);
	let clicked = state.pointer_up(nx + 120.0, ny + 40.0);
	state.tick();

	assert_eq!(clicked, None);
	assert_eq!(state.sim.pinned_count(), 0);
	assert_eq!(state.sim.alpha_target(), 0.0);
	state.sim.settle();
	assert!(state.sim.is_settled());
}

#[test]
fn short_gesture_counts_as_click() {
	let data = ArchData {
		nodes: vec![node("solo", 0)],
		links: vec![],
	};
	let mut state = GraphState::new(&data, 800.0, 600.0);
	let (nx, ny) = (state.positions()[0].x, state.positions()[0].y);

	state.pointer_down(nx, ny);
	state.pointer_move(nx + 3.0, ny);
	assert_eq!(state.pointer_up(nx + 3.0, ny), Some(0));
}

#[test]
fn return_trip_is_still_a_drag() {
	let data = ArchData {
		nodes: vec![node("solo", 0)],
		links: vec![],
	};
	let mut state = GraphState::new(&data, 800.0, 600.0);
	let (nx, ny) = (state.positions()[0].x, state.positions()[0].y);

	// Wander past the click slop, then release back at the press point.
	state.pointer_down(nx, ny);
	state.pointer_move(nx + 5.0, ny);
	assert_eq!(state.pointer_up(nx, ny), None);
}

#[test]
fn pointer_leave_releases_without_click() {
	let mut state = GraphState::new(&sample_architecture(), WIDTH, HEIGHT);
	let be = index_of(&state, "be");
	let (nx, ny) = (state.positions()[be].x, state.positions()[be].y);

	state.pointer_down(nx, ny);
	state.tick();
	assert_eq!(state.sim.pinned_count(), 1);

	state.release_pointer();
	state.tick();
	assert_eq!(state.sim.pinned_count(), 0);
	assert!(!state.is_dragging());
}

#[test]
fn cursor_reflects_hover_and_drag() {
	let data = ArchData {
		nodes: vec![node("solo", 0)],
		links: vec![],
	};
	let mut state = GraphState::new(&data, 800.0, 600.0);
	let (nx, ny) = (state.positions()[0].x, state.positions()[0].y);

	// Idle over empty space, hover over the box, grab, release. These are
	// the strings the canvas handlers write into the cursor style.
	assert_eq!(state.cursor(10.0, 10.0), "grab");
	assert_eq!(state.cursor(nx, ny), "pointer");
	state.pointer_down(nx, ny);
	assert_eq!(state.cursor(nx, ny), "grabbing");
	state.release_pointer();
	assert_eq!(state.cursor(nx, ny), "pointer");
}

#[test]
fn background_drag_pans_view() {
	let mut state = GraphState::new(&sample_architecture(), WIDTH, HEIGHT);

	state.pointer_down(10.0, 10.0);
	state.pointer_move(40.0, 30.0);
	assert_eq!(state.view.x, 30.0);
	assert_eq!(state.view.y, 20.0);
	assert_eq!(state.pointer_up(40.0, 30.0), None);
	assert_eq!(state.sim.pinned_count(), 0);
}

#[test]
fn wheel_zoom_clamps_at_bounds() {
	let mut state = GraphState::new(&sample_architecture(), WIDTH, HEIGHT);

	for _ in 0..50 {
		state.apply_zoom(400.0, 300.0, -1.0);
	}
	assert_eq!(state.view.k, ZOOM_MAX);

	for _ in 0..100 {
		state.apply_zoom(400.0, 300.0, 1.0);
	}
	assert_eq!(state.view.k, ZOOM_MIN);
}

#[test]
fn zoom_keeps_cursor_point_fixed() {
	let mut state = GraphState::new(&sample_architecture(), WIDTH, HEIGHT);
	let (sx, sy) = (512.0, 384.0);

	let before = state.view.screen_to_graph(sx, sy);
	state.apply_zoom(sx, sy, -1.0);
	let after = state.view.screen_to_graph(sx, sy);

	assert!((before.0 - after.0).abs() < 1e-9);
	assert!((before.1 - after.1).abs() < 1e-9);
}

#[test]
fn hit_test_matches_box_extents() {
	let data = ArchData {
		nodes: vec![node("solo", 0)],
		links: vec![],
	};
	let state = GraphState::new(&data, 800.0, 600.0);
	let (nx, ny) = (state.positions()[0].x, state.positions()[0].y);

	assert_eq!(state.node_at_position(nx + 69.9, ny + 39.9), Some(0));
	assert_eq!(state.node_at_position(nx - 69.9, ny - 39.9), Some(0));
	assert_eq!(state.node_at_position(nx + 70.1, ny), None);
	assert_eq!(state.node_at_position(nx, ny + 40.1), None);
}

#[test]
fn overlapping_nodes_hit_topmost() {
	let data = ArchData {
		nodes: vec![node("below", 0), node("above", 0)],
		links: vec![],
	};
	let state = GraphState::new(&data, 800.0, 600.0);

	// Both seed boxes cover the canvas center; the later node draws on
	// top, so it wins the hit test.
	assert_eq!(state.node_at_position(400.0, 300.0), Some(1));
}

#[test]
fn empty_dataset_is_inert() {
	let mut state = GraphState::new(&ArchData::default(), 800.0, 600.0);
	state.tick();
	state.sim.settle();

	assert!(state.nodes().is_empty());
	assert!(state.links().is_empty());
	assert_eq!(state.node_at_position(400.0, 300.0), None);
}

#[test]
fn uniform_ranks_settle_at_left_padding() {
	let data = ArchData {
		nodes: vec![node("a", 0), node("b", 0), node("c", 0)],
		links: vec![],
	};
	let mut state = GraphState::new(&data, 800.0, 600.0);
	state.sim.settle();

	let mean: f64 =
		state.positions().iter().map(|n| n.x).sum::<f64>() / state.positions().len() as f64;
	for n in state.positions() {
		assert!(n.x.is_finite() && n.y.is_finite());
	}
	assert!((mean - 150.0).abs() < 25.0, "mean x was {mean:.1}");
}

#[test]
fn stale_intents_are_discarded() {
	let mut state = GraphState::new(&sample_architecture(), WIDTH, HEIGHT);

	state.sim.queue(DragIntent::Grab { index: 99 });
	state.sim.queue(DragIntent::Move { index: 99, x: 0.0, y: 0.0 });
	state.sim.queue(DragIntent::Release { index: 99 });
	state.tick();

	assert_eq!(state.sim.pinned_count(), 0);
}

#[test]
fn unknown_link_endpoints_are_dropped() {
	let data = ArchData {
		nodes: vec![node("a", 0), node("b", 1)],
		links: vec![link("a", "b"), link("ghost", "b"), link("a", "phantom")],
	};
	let mut state = GraphState::new(&data, 800.0, 600.0);

	assert_eq!(state.links().len(), 1);
	assert_eq!(state.links()[0].source, 0);
	assert_eq!(state.links()[0].target, 1);
	state.sim.settle();
}

#[test]
fn sample_topology_is_consistent() {
	let data = sample_architecture();
	assert_eq!(data.nodes.len(), 8);
	assert_eq!(data.links.len(), 7);

	let ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids.len(), data.nodes.len(), "duplicate node id");
	for link in &data.links {
		assert!(ids.contains(link.source.as_str()), "unknown source {}", link.source);
		assert!(ids.contains(link.target.as_str()), "unknown target {}", link.target);
	}

	assert_eq!(data.nodes[0].id, "user");
	assert_eq!(data.nodes[0].rank, 0);
	assert!(data.nodes.iter().all(|n| n.rank <= 5));
}

#[test]
fn wire_format_parses_screaming_snake_kinds() {
	let json = r#"{
		"nodes": [
			{"id": "db", "name": "Cloud SQL", "type": "DATABASE",
			 "description": "PostgreSQL relational database.", "rank": 4},
			{"id": "lb", "name": "Cloud Load Balancer", "type": "LOAD_BALANCER",
			 "description": "Global HTTPS Load Balancer.", "rank": 1}
		],
		"links": [
			{"source": "lb", "target": "db", "label": "Queries"}
		]
	}"#;

	let data: ArchData = serde_json::from_str(json).unwrap();
	assert_eq!(data.nodes[0].kind, NodeKind::Database);
	assert_eq!(data.nodes[1].kind, NodeKind::LoadBalancer);
	assert_eq!(data.links[0].label, "Queries");
}

#[test]
fn prompt_lists_nodes_and_connections() {
	let prompt = build_prompt(&sample_architecture(), None);

	assert!(prompt.starts_with("Analyze the following cloud architecture:"));
	assert!(prompt.contains("NODES:"));
	assert!(prompt.contains("CONNECTIONS:"));
	assert!(prompt.contains("Cloud SQL (DATABASE): PostgreSQL relational database."));
	assert!(prompt.contains("be connects to db via Queries"));
	assert!(prompt.contains("Provide a comprehensive end-to-end traffic flow analysis."));
	assert!(!prompt.contains("Focus specifically"));
	assert!(prompt.ends_with("Use bullet points for steps."));
}

#[test]
fn prompt_switches_focus_sentence() {
	let prompt = build_prompt(&sample_architecture(), Some("Backend API"));

	assert!(prompt.contains("Focus specifically on the traffic flowing through: Backend API."));
	assert!(!prompt.contains("comprehensive end-to-end"));
}

#[test]
fn reclicking_selected_node_is_ignored() {
	let be = node("be", 3);
	let db = node("db", 4);

	assert!(selection_should_update(None, &be));
	assert!(!selection_should_update(Some(&be), &be));
	assert!(selection_should_update(Some(&be), &db));
}
