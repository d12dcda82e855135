//! Interaction state for the diagram canvas.
//!
//! Everything here is plain math over the simulation and a view transform.
//! DOM events are reduced to screen coordinates before they arrive, so the
//! whole pointer contract is exercisable without a browser.

use std::collections::HashMap;

use super::simulation::{DragIntent, SimNode, Simulation};
use super::types::{ArchData, ArchNode};

/// Node box width in graph units.
pub const NODE_WIDTH: f64 = 140.0;
/// Node box height in graph units.
pub const NODE_HEIGHT: f64 = 80.0;
/// Lower zoom bound.
pub const ZOOM_MIN: f64 = 0.4;
/// Upper zoom bound.
pub const ZOOM_MAX: f64 = 2.0;
/// Screen-pixel travel below which press and release count as a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Pan/zoom mapping from graph space to screen space.
#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
	/// Screen X of the graph origin.
	pub x: f64,
	/// Screen Y of the graph origin.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl ViewTransform {
	/// Invert the transform for a screen point.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}
}

/// An in-progress node drag.
#[derive(Clone, Copy, Debug)]
struct DragState {
	index: usize,
	start_sx: f64,
	start_sy: f64,
	/// Grab offset from the node center, in graph units.
	offset_x: f64,
	offset_y: f64,
	/// Greatest screen-pixel distance from the press point so far.
	travel: f64,
}

/// An in-progress background pan.
#[derive(Clone, Copy, Debug)]
struct PanState {
	start_sx: f64,
	start_sy: f64,
	origin_x: f64,
	origin_y: f64,
}

/// A link with endpoints resolved to simulation indices.
#[derive(Clone, Debug)]
pub struct ResolvedLink {
	/// Simulation index of the source node.
	pub source: usize,
	/// Simulation index of the target node.
	pub target: usize,
	/// Caption drawn near the connector midpoint.
	pub label: String,
}

/// Owns the simulation plus everything the pointer can change: the view
/// transform, the active drag or pan, and the resolved link list.
pub struct GraphState {
	/// The layout engine driving node positions.
	pub sim: Simulation,
	/// Pan and zoom mapping from graph space to the canvas.
	pub view: ViewTransform,
	/// Canvas width in CSS pixels.
	pub width: f64,
	/// Canvas height in CSS pixels.
	pub height: f64,
	nodes: Vec<ArchNode>,
	links: Vec<ResolvedLink>,
	drag: Option<DragState>,
	pan: Option<PanState>,
}

impl GraphState {
	/// Build the layout for a dataset. Nodes keep their input order as
	/// simulation indices; links with an unknown endpoint are dropped with
	/// a warning rather than failing the whole diagram.
	pub fn new(data: &ArchData, width: f64, height: f64) -> Self {
		let mut sim = Simulation::new(width, height);

		let mut id_to_idx = HashMap::new();
		for node in &data.nodes {
			let idx = sim.add_node(node.rank);
			id_to_idx.insert(node.id.clone(), idx);
		}

		let mut links = Vec::with_capacity(data.links.len());
		for link in &data.links {
			let Some(&source) = id_to_idx.get(&link.source) else {
				log::warn!("dropping link with unknown source '{}'", link.source);
				continue;
			};
			let Some(&target) = id_to_idx.get(&link.target) else {
				log::warn!("dropping link with unknown target '{}'", link.target);
				continue;
			};
			sim.add_link(source, target);
			links.push(ResolvedLink { source, target, label: link.label.clone() });
		}

		Self {
			sim,
			view: ViewTransform::default(),
			width,
			height,
			nodes: data.nodes.clone(),
			links,
			drag: None,
			pan: None,
		}
	}

	/// Node metadata, aligned with simulation indices.
	pub fn nodes(&self) -> &[ArchNode] {
		&self.nodes
	}

	/// Simulated positions, aligned with [`Self::nodes`].
	pub fn positions(&self) -> &[SimNode] {
		self.sim.nodes()
	}

	/// Links resolved to simulation indices.
	pub fn links(&self) -> &[ResolvedLink] {
		&self.links
	}

	/// Advance the layout one frame.
	pub fn tick(&mut self) {
		self.sim.tick();
	}

	/// Propagate a canvas resize and nudge the cooled layout toward the
	/// new rank targets.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.set_bounds(width, height);
		self.sim.reheat(0.3);
	}

	/// Topmost node whose box contains the graph-space point. Later nodes
	/// draw above earlier ones, so the scan runs back to front.
	pub fn node_at_position(&self, gx: f64, gy: f64) -> Option<usize> {
		self.sim
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(_, node)| {
				(gx - node.x).abs() <= NODE_WIDTH / 2.0 && (gy - node.y).abs() <= NODE_HEIGHT / 2.0
			})
			.map(|(idx, _)| idx)
	}

	/// True while a node is being dragged.
	pub fn is_dragging(&self) -> bool {
		self.drag.is_some()
	}

	/// Cursor for the pointer's current position.
	pub fn cursor(&self, sx: f64, sy: f64) -> &'static str {
		if self.drag.is_some() {
			return "grabbing";
		}
		let (gx, gy) = self.view.screen_to_graph(sx, sy);
		if self.node_at_position(gx, gy).is_some() {
			"pointer"
		} else {
			"grab"
		}
	}

	/// Press: grab the node under the pointer, or start a background pan.
	/// A grab always pins; whether it was a click is decided on release.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let (gx, gy) = self.view.screen_to_graph(sx, sy);
		if let Some(index) = self.node_at_position(gx, gy) {
			let node = &self.sim.nodes()[index];
			self.drag = Some(DragState {
				index,
				start_sx: sx,
				start_sy: sy,
				offset_x: node.x - gx,
				offset_y: node.y - gy,
				travel: 0.0,
			});
			self.sim.queue(DragIntent::Grab { index });
		} else {
			self.pan = Some(PanState {
				start_sx: sx,
				start_sy: sy,
				origin_x: self.view.x,
				origin_y: self.view.y,
			});
		}
	}

	/// Move: follow the pointer with the grabbed node, or pan the view.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(drag) = &mut self.drag {
			let dist = ((sx - drag.start_sx).powi(2) + (sy - drag.start_sy).powi(2)).sqrt();
			drag.travel = drag.travel.max(dist);
			let (gx, gy) = self.view.screen_to_graph(sx, sy);
			self.sim.queue(DragIntent::Move {
				index: drag.index,
				x: gx + drag.offset_x,
				y: gy + drag.offset_y,
			});
		} else if let Some(pan) = &self.pan {
			self.view.x = pan.origin_x + (sx - pan.start_sx);
			self.view.y = pan.origin_y + (sy - pan.start_sy);
		}
	}

	/// Release: unpin and end the gesture. Returns the node index when the
	/// gesture stayed within the click slop, i.e. a selection click.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<usize> {
		self.pan = None;
		let drag = self.drag.take()?;
		self.sim.queue(DragIntent::Release { index: drag.index });

		let dist = ((sx - drag.start_sx).powi(2) + (sy - drag.start_sy).powi(2)).sqrt();
		(drag.travel.max(dist) < CLICK_SLOP).then_some(drag.index)
	}

	/// Abandon any gesture without producing a click, for pointer-leave.
	pub fn release_pointer(&mut self) {
		if let Some(drag) = self.drag.take() {
			self.sim.queue(DragIntent::Release { index: drag.index });
		}
		self.pan = None;
	}

	/// Wheel zoom about the cursor. The graph point under the pointer
	/// stays put while `k` scales, clamped to the zoom bounds.
	pub fn apply_zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let k = (self.view.k * factor).clamp(ZOOM_MIN, ZOOM_MAX);
		let ratio = k / self.view.k;
		self.view.x = sx - (sx - self.view.x) * ratio;
		self.view.y = sy - (sy - self.view.y) * ratio;
		self.view.k = k;
	}
}
