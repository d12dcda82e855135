//! Force-directed layout simulation.
//!
//! A self-contained take on the d3-force model tuned for left-to-right
//! architecture diagrams: spring links, inverse-square charge repulsion, a
//! rank-derived horizontal bias, a weak vertical centering pull, and a
//! minimum-separation collision constraint, all advanced by the familiar
//! alpha/velocity-decay cooling schedule.
//!
//! Pointer handlers never touch node state directly. They queue
//! [`DragIntent`]s and [`Simulation::tick`] drains the queue at the start of
//! each step, so a pin is always visible to the very next integration pass.
//! The [`Simulation`] struct itself is the handle; whoever owns it owns the
//! lifecycle.

use std::f64::consts::PI;

/// Alpha target held while a node is being dragged.
const DRAG_ALPHA_TARGET: f64 = 0.3;
/// Upper bound on collision resolution passes per tick.
const COLLIDE_PASSES: usize = 4;
/// Base radius of the phyllotaxis placement spiral.
const INITIAL_RADIUS: f64 = 10.0;

/// Tuning constants for the layout forces and the cooling schedule.
#[derive(Clone, Debug)]
pub struct LayoutParams {
	/// Rest length of every link spring.
	pub link_distance: f64,
	/// Pairwise charge strength; negative repels.
	pub charge_strength: f64,
	/// Pull toward the rank-derived X target.
	pub rank_strength: f64,
	/// Pull toward vertical mid-canvas.
	pub center_strength: f64,
	/// Minimum allowed center-to-center separation.
	pub collide_distance: f64,
	/// Horizontal inset reserved at both canvas edges.
	pub padding: f64,
	/// Alpha threshold below which integration pauses.
	pub alpha_min: f64,
	/// Per-tick interpolation rate of alpha toward its target.
	pub alpha_decay: f64,
	/// Fraction of velocity retained per tick.
	pub velocity_decay: f64,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			link_distance: 180.0,
			charge_strength: -2000.0,
			rank_strength: 2.0,
			center_strength: 0.1,
			collide_distance: 100.0,
			padding: 150.0,
			alpha_min: 0.001,
			// Roughly 300 ticks from alpha 1.0 down to alpha_min.
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			velocity_decay: 0.6,
		}
	}
}

/// A simulated body: position, velocity, optional pin, and the rank that
/// drives its horizontal target.
#[derive(Clone, Debug)]
pub struct SimNode {
	/// Current X position in graph units.
	pub x: f64,
	/// Current Y position in graph units.
	pub y: f64,
	/// X velocity carried between ticks.
	pub vx: f64,
	/// Y velocity carried between ticks.
	pub vy: f64,
	/// Pinned X, `Some` while dragged; overrides integration.
	pub fx: Option<f64>,
	/// Pinned Y, `Some` while dragged; overrides integration.
	pub fy: Option<f64>,
	/// Flow ordering hint copied from the source record.
	pub rank: u32,
}

impl SimNode {
	/// True while the node is held at a drag position.
	pub fn pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// A queued pointer-initiated mutation. Applied in order at the start of
/// the next tick, before any force reads node state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragIntent {
	/// Pin the node at its current position and reheat the simulation.
	Grab { index: usize },
	/// Follow the pointer: move an existing pin to new graph coordinates.
	Move { index: usize, x: f64, y: f64 },
	/// Release the pin; the node is subject to forces again.
	Release { index: usize },
}

#[derive(Clone, Copy, Debug)]
struct SimLink {
	source: usize,
	target: usize,
}

/// The layout engine. One instance per mounted diagram, owned by the
/// component's graph context and passed explicitly wherever positions are
/// read or perturbed.
pub struct Simulation {
	params: LayoutParams,
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	intents: Vec<DragIntent>,
	alpha: f64,
	alpha_target: f64,
	width: f64,
	height: f64,
	max_rank: u32,
	jiggle_state: u32,
}

impl Simulation {
	/// Create an empty simulation over a canvas of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self::with_params(width, height, LayoutParams::default())
	}

	/// Create an empty simulation with explicit tuning.
	pub fn with_params(width: f64, height: f64, params: LayoutParams) -> Self {
		Self {
			params,
			nodes: Vec::new(),
			links: Vec::new(),
			intents: Vec::new(),
			alpha: 1.0,
			alpha_target: 0.0,
			width,
			height,
			max_rank: 0,
			jiggle_state: 1,
		}
	}

	/// Add a node and return its index. The position is seeded on a
	/// phyllotaxis spiral around the canvas center so first-tick
	/// coordinates are always finite and distinct.
	pub fn add_node(&mut self, rank: u32) -> usize {
		let i = self.nodes.len();
		let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
		let angle = i as f64 * PI * (3.0 - 5.0_f64.sqrt());
		self.nodes.push(SimNode {
			x: self.width / 2.0 + radius * angle.cos(),
			y: self.height / 2.0 + radius * angle.sin(),
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			rank,
		});
		self.max_rank = self.max_rank.max(rank);
		i
	}

	/// Add a link between two node indices. Out-of-range or self
	/// referencing endpoints are dropped; id resolution happens upstream.
	pub fn add_link(&mut self, source: usize, target: usize) {
		if source < self.nodes.len() && target < self.nodes.len() && source != target {
			self.links.push(SimLink { source, target });
		}
	}

	/// Current node states, indexed as returned by [`Self::add_node`].
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Current cooling factor.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Value alpha is currently relaxing toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Number of currently pinned nodes.
	pub fn pinned_count(&self) -> usize {
		self.nodes.iter().filter(|n| n.pinned()).count()
	}

	/// True once alpha has cooled below threshold with no reheat pending.
	/// The caller may skip ticking until the next reheat or drag.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min
	}

	/// Raise alpha so a near-rest layout resumes visible motion.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
	}

	/// Update canvas bounds; rank targets and vertical centering follow on
	/// the next tick.
	pub fn set_bounds(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Queue a pointer intent for the next tick.
	pub fn queue(&mut self, intent: DragIntent) {
		self.intents.push(intent);
	}

	/// Advance one step: drain queued intents, cool alpha toward its
	/// target, accumulate forces into velocities, integrate, then resolve
	/// collisions by direct displacement.
	pub fn tick(&mut self) {
		self.apply_intents();

		if self.is_settled() || self.nodes.is_empty() {
			return;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

		self.apply_link_force();
		self.apply_charge_force();
		self.apply_rank_force();
		self.apply_center_force();
		self.integrate();
		self.resolve_collisions();
	}

	/// Tick until the layout settles. Capped so a held alpha target cannot
	/// spin forever.
	pub fn settle(&mut self) {
		for _ in 0..1000 {
			if self.is_settled() {
				break;
			}
			self.tick();
		}
	}

	fn apply_intents(&mut self) {
		let n = self.nodes.len();
		// Intents referencing nodes that no longer exist are stale; the
		// guard in each arm drops them.
		for intent in std::mem::take(&mut self.intents) {
			match intent {
				DragIntent::Grab { index } if index < n => {
					let node = &mut self.nodes[index];
					node.fx = Some(node.x);
					node.fy = Some(node.y);
					self.alpha_target = DRAG_ALPHA_TARGET;
				}
				DragIntent::Move { index, x, y } if index < n => {
					let node = &mut self.nodes[index];
					if node.pinned() {
						node.fx = Some(x);
						node.fy = Some(y);
					}
				}
				DragIntent::Release { index } if index < n => {
					let node = &mut self.nodes[index];
					node.fx = None;
					node.fy = None;
					self.alpha_target = 0.0;
				}
				_ => {}
			}
		}
	}

	fn apply_link_force(&mut self) {
		if self.links.is_empty() {
			return;
		}

		// Degree-derived stiffness and bias: hubs move less than leaves.
		let mut degree = vec![0u32; self.nodes.len()];
		for li in 0..self.links.len() {
			degree[self.links[li].source] += 1;
			degree[self.links[li].target] += 1;
		}

		let alpha = self.alpha;
		let distance = self.params.link_distance;

		for li in 0..self.links.len() {
			let SimLink { source, target } = self.links[li];
			let (ds, dt) = (degree[source] as f64, degree[target] as f64);
			let strength = 1.0 / ds.min(dt);
			let bias = ds / (ds + dt);

			let (s, t) = (&self.nodes[source], &self.nodes[target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 && dy == 0.0 {
				dx = jiggle(&mut self.jiggle_state);
				dy = jiggle(&mut self.jiggle_state);
			}

			let len = (dx * dx + dy * dy).sqrt();
			let l = (len - distance) / len * alpha * strength;
			let (px, py) = (dx * l, dy * l);

			self.nodes[target].vx -= px * bias;
			self.nodes[target].vy -= py * bias;
			self.nodes[source].vx += px * (1.0 - bias);
			self.nodes[source].vy += py * (1.0 - bias);
		}
	}

	fn apply_charge_force(&mut self) {
		// Exact pairwise evaluation; diagram-sized inputs make the n^2
		// cost irrelevant and keep the force free of tree bookkeeping.
		let n = self.nodes.len();
		let w = self.params.charge_strength * self.alpha;

		for i in 0..n {
			for j in (i + 1)..n {
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				if dx == 0.0 && dy == 0.0 {
					dx = jiggle(&mut self.jiggle_state);
					dy = jiggle(&mut self.jiggle_state);
				}
				// Squared distance clamped below 1 to bound the force
				// between near-coincident nodes.
				let d2 = (dx * dx + dy * dy).max(1.0);
				let f = w / d2;

				self.nodes[i].vx += dx * f;
				self.nodes[i].vy += dy * f;
				self.nodes[j].vx -= dx * f;
				self.nodes[j].vy -= dy * f;
			}
		}
	}

	fn apply_rank_force(&mut self) {
		let padding = self.params.padding;
		let span = (self.width - 2.0 * padding).max(0.0);
		// max_rank 0 would divide by zero; all-equal ranks share the left
		// padding edge and repulsion spreads them out.
		let max_rank = self.max_rank.max(1) as f64;
		let k = self.params.rank_strength * self.alpha;

		for node in &mut self.nodes {
			let target = padding + node.rank as f64 / max_rank * span;
			node.vx += (target - node.x) * k;
		}
	}

	fn apply_center_force(&mut self) {
		let cy = self.height / 2.0;
		let k = self.params.center_strength * self.alpha;
		for node in &mut self.nodes {
			node.vy += (cy - node.y) * k;
		}
	}

	fn integrate(&mut self) {
		let decay = self.params.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= decay;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= decay;
					node.y += node.vy;
				}
			}
		}
	}

	fn resolve_collisions(&mut self) {
		let min_dist = self.params.collide_distance;
		let n = self.nodes.len();

		for _ in 0..COLLIDE_PASSES {
			let mut moved = false;
			for i in 0..n {
				for j in (i + 1)..n {
					let mut dx = self.nodes[j].x - self.nodes[i].x;
					let mut dy = self.nodes[j].y - self.nodes[i].y;
					if dx == 0.0 && dy == 0.0 {
						dx = jiggle(&mut self.jiggle_state);
						dy = jiggle(&mut self.jiggle_state);
					}
					let dist = (dx * dx + dy * dy).sqrt();
					if dist >= min_dist {
						continue;
					}

					let overlap = min_dist - dist;
					let (ux, uy) = (dx / dist, dy / dist);

					// A pinned node never moves; its counterpart absorbs
					// the full correction. Two pinned nodes stay put.
					let (wi, wj) = match (self.nodes[i].pinned(), self.nodes[j].pinned()) {
						(false, false) => (0.5, 0.5),
						(true, false) => (0.0, 1.0),
						(false, true) => (1.0, 0.0),
						(true, true) => (0.0, 0.0),
					};

					self.nodes[i].x -= ux * overlap * wi;
					self.nodes[i].y -= uy * overlap * wi;
					self.nodes[j].x += ux * overlap * wj;
					self.nodes[j].y += uy * overlap * wj;
					if wi + wj > 0.0 {
						moved = true;
					}
				}
			}
			if !moved {
				break;
			}
		}
	}
}

/// Deterministic sub-pixel offset for coincident points, so no force ever
/// divides by zero. Plain LCG, seeded per simulation.
fn jiggle(state: &mut u32) -> f64 {
	*state = state.wrapping_mul(1103515245).wrapping_add(12345);
	((*state & 0xFFFF) as f64 / 65536.0 - 0.5) * 1e-6
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pair_distance(sim: &Simulation, a: usize, b: usize) -> f64 {
		let (na, nb) = (&sim.nodes()[a], &sim.nodes()[b]);
		((na.x - nb.x).powi(2) + (na.y - nb.y).powi(2)).sqrt()
	}

	#[test]
	fn seeds_are_finite_and_distinct() {
		let mut sim = Simulation::new(800.0, 600.0);
		for rank in 0..6 {
			sim.add_node(rank);
		}
		for node in sim.nodes() {
			assert!(node.x.is_finite() && node.y.is_finite());
		}
		for i in 0..6 {
			for j in (i + 1)..6 {
				assert!(pair_distance(&sim, i, j) > 1e-9);
			}
		}
	}

	#[test]
	fn pinned_node_holds_position_while_neighbors_move() {
		let mut sim = Simulation::new(800.0, 600.0);
		let a = sim.add_node(0);
		let b = sim.add_node(1);
		sim.add_link(a, b);

		sim.queue(DragIntent::Grab { index: a });
		sim.tick();
		let held = (sim.nodes()[a].x, sim.nodes()[a].y);
		let free_before = (sim.nodes()[b].x, sim.nodes()[b].y);

		for _ in 0..50 {
			sim.tick();
		}

		assert_eq!((sim.nodes()[a].x, sim.nodes()[a].y), held);
		assert_eq!(sim.nodes()[a].vx, 0.0);
		let free_after = (sim.nodes()[b].x, sim.nodes()[b].y);
		assert!(free_before != free_after);
	}

	#[test]
	fn grab_reheats_and_release_cools() {
		let mut sim = Simulation::new(800.0, 600.0);
		let a = sim.add_node(0);
		sim.add_node(1);
		sim.settle();
		assert!(sim.is_settled());

		sim.queue(DragIntent::Grab { index: a });
		sim.tick();
		assert!(!sim.is_settled());
		assert!((sim.alpha_target() - 0.3).abs() < 1e-12);

		sim.queue(DragIntent::Release { index: a });
		sim.tick();
		assert_eq!(sim.alpha_target(), 0.0);
		sim.settle();
		assert!(sim.is_settled());
		assert_eq!(sim.pinned_count(), 0);
	}

	#[test]
	fn empty_simulation_ticks_as_noop() {
		let mut sim = Simulation::new(800.0, 600.0);
		sim.tick();
		sim.settle();
		assert!(sim.nodes().is_empty());
	}

	#[test]
	fn self_and_out_of_range_links_are_dropped() {
		let mut sim = Simulation::new(800.0, 600.0);
		let a = sim.add_node(0);
		sim.add_link(a, a);
		sim.add_link(a, 7);
		// A bad link would make the link force index out of bounds.
		sim.settle();
	}
}
