//! Visual styling for the architecture diagram.
//!
//! Node kinds map to their accent color, caption, and icon through a single
//! static catalog, so adding a kind means adding one table row. The rest of
//! the palette lives in plain style structs consumed by the renderer.

use super::types::NodeKind;

/// An RGBA color with helpers for CSS output and shading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Fully opaque color from RGB components.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color from RGB components and an alpha in `0.0..=1.0`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with a different alpha.
	pub fn with_alpha(&self, a: f64) -> Self {
		Self { a, ..*self }
	}

	/// Blend toward white by `amount` in `0.0..=1.0`.
	pub fn lighten(&self, amount: f64) -> Self {
		let t = amount.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * t) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * t) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * t) as u8,
			a: self.a,
		}
	}

	/// Blend toward black by `amount` in `0.0..=1.0`.
	pub fn darken(&self, amount: f64) -> Self {
		let t = 1.0 - amount.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * t) as u8,
			g: (self.g as f64 * t) as u8,
			b: (self.b as f64 * t) as u8,
			a: self.a,
		}
	}

	/// CSS color string, hex when opaque and `rgba(...)` otherwise.
	pub fn to_css(&self) -> String {
		if self.a >= 1.0 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Per-kind presentation: caption, accent color, and icon path data.
#[derive(Clone, Copy, Debug)]
pub struct KindStyle {
	/// Caption drawn under the node name, underscores shown as spaces.
	pub name: &'static str,
	/// Accent used for the node's left edge bar and icon stroke.
	pub accent: Color,
	/// SVG path data for the 24x24 kind glyph.
	pub icon: &'static str,
}

/// Kind presentation catalog, indexed by [`NodeKind`] discriminant.
static KIND_CATALOG: [KindStyle; 8] = [
	KindStyle {
		name: "USER",
		accent: Color::rgb(148, 163, 184),
		icon: "M12 4.354a4 4 0 110 5.292M15 21H3v-1a6 6 0 0112 0v1zm0 0h6v-1a6 6 0 00-9-5.197M13 7a4 4 0 11-8 0 4 4 0 018 0z",
	},
	KindStyle {
		name: "LOAD_BALANCER",
		accent: Color::rgb(245, 158, 11),
		icon: "M8 7h12m0 0l-4-4m4 4l-4 4m0 6H4m0 0l4 4m-4-4l4-4",
	},
	KindStyle {
		name: "FRONTEND",
		accent: Color::rgb(16, 185, 129),
		icon: "M9.75 17L9 20l-1 1h8l-1-1-.75-3M3 13h18M5 17h14a2 2 0 002-2V5a2 2 0 00-2-2H5a2 2 0 00-2 2v10a2 2 0 002 2z",
	},
	KindStyle {
		name: "BACKEND_API",
		accent: Color::rgb(59, 130, 246),
		icon: "M5 12h14M5 12l4-4m-4 4l4 4m5 0l4-4m-4 4l4 4",
	},
	KindStyle {
		name: "DATABASE",
		accent: Color::rgb(239, 68, 68),
		icon: "M4 7v10c0 2.21 3.582 4 8 4s8-1.79 8-4V7M4 7c0 2.21 3.582 4 8 4s8-1.79 8-4M4 7c0-2.21 3.582-4 8-4s8 1.79 8 4m0 5c0 2.21-3.582 4-8 4s-8-1.79-8-4",
	},
	KindStyle {
		name: "CACHE",
		accent: Color::rgb(6, 182, 212),
		icon: "M13 10V3L4 14h7v7l9-11h-7z",
	},
	KindStyle {
		name: "AI_MODEL",
		accent: Color::rgb(139, 92, 246),
		icon: "M9.663 17h4.673M12 3v1m6.364 1.636l-.707.707M21 12h-1M4 12H3m3.343-5.657l-.707-.707m2.828 9.9a5 5 0 117.072 0l-.548.547A3.374 3.374 0 0014 18.469V19a2 2 0 11-4 0v-.531c0-.895-.356-1.754-.988-2.386l-.548-.547z",
	},
	KindStyle {
		name: "EXTERNAL_SERVICE",
		accent: Color::rgb(100, 116, 139),
		icon: "M10 20l4-16m4 4l4 4-4 4M6 16l-4-4 4-4",
	},
];

/// Presentation entry for a node kind.
pub fn kind_style(kind: NodeKind) -> &'static KindStyle {
	&KIND_CATALOG[kind as usize]
}

/// The whole catalog in [`NodeKind`] discriminant order.
pub fn kind_styles() -> &'static [KindStyle; 8] {
	&KIND_CATALOG
}

/// Canvas background styling.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Radial gradient center color.
	pub center: Color,
	/// Radial gradient edge color.
	pub edge: Color,
	/// Opacity of the darkened vignette ring.
	pub vignette_alpha: f64,
}

/// Connector styling shared by every edge.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Stroke color of the connector curve.
	pub color: Color,
	/// Stroke width of the connector curve.
	pub width: f64,
	/// Opacity applied to the curve and the arrowhead fill.
	pub opacity: f64,
	/// Control point X offset from the segment midpoint; with the Y
	/// offset this gives every connector the same gentle upward bow.
	pub control_dx: f64,
	/// Control point Y offset from the segment midpoint.
	pub control_dy: f64,
	/// Arrowhead fill color.
	pub arrow_color: Color,
	/// Arrowhead length; half of it is the base half-width.
	pub arrow_size: f64,
	/// Distance from the target center back to the arrow tip, tuned so the
	/// head emerges from under the node box.
	pub arrow_inset: f64,
	/// Label text color.
	pub label_color: Color,
	/// CSS font shorthand for the label.
	pub label_font: &'static str,
	/// Label X offset from the segment midpoint.
	pub label_dx: f64,
	/// Label Y offset from the segment midpoint.
	pub label_dy: f64,
}

/// Node box styling shared by every node; the accent comes from the kind
/// catalog.
#[derive(Clone, Debug)]
pub struct NodeBoxStyle {
	/// Box fill for unselected nodes.
	pub fill: Color,
	/// Box fill for the selected node.
	pub fill_selected: Color,
	/// Border color for unselected nodes.
	pub stroke: Color,
	/// Border color for the selected node.
	pub stroke_selected: Color,
	/// Border stroke width.
	pub border_width: f64,
	/// Corner radius of the rounded box.
	pub corner_radius: f64,
	/// Shadow color used for the selection glow.
	pub glow: Color,
	/// Shadow blur radius of the selection glow.
	pub glow_blur: f64,
	/// Node name text color.
	pub name_color: Color,
	/// CSS font shorthand for the node name.
	pub name_font: &'static str,
	/// Kind caption text color.
	pub caption_color: Color,
	/// CSS font shorthand for the kind caption.
	pub caption_font: &'static str,
}

/// Full diagram theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background styling.
	pub background: BackgroundStyle,
	/// Connector styling.
	pub edge: EdgeStyle,
	/// Node box styling.
	pub node: NodeBoxStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				center: Color::rgb(15, 23, 42),
				edge: Color::rgb(10, 15, 30),
				vignette_alpha: 0.15,
			},
			edge: EdgeStyle {
				color: Color::rgb(51, 65, 85),
				width: 2.0,
				opacity: 0.6,
				control_dx: 20.0,
				control_dy: -20.0,
				arrow_color: Color::rgb(71, 85, 105),
				arrow_size: 12.0,
				arrow_inset: 66.0,
				label_color: Color::rgb(100, 116, 139),
				label_font: "500 10px sans-serif",
				label_dx: 10.0,
				label_dy: -15.0,
			},
			node: NodeBoxStyle {
				fill: Color::rgb(15, 23, 42),
				fill_selected: Color::rgb(30, 41, 59),
				stroke: Color::rgb(30, 41, 59),
				stroke_selected: Color::rgb(59, 130, 246),
				border_width: 2.0,
				corner_radius: 12.0,
				glow: Color::rgba(59, 130, 246, 0.7),
				glow_blur: 18.0,
				name_color: Color::rgb(248, 250, 252),
				name_font: "700 12px sans-serif",
				caption_color: Color::rgb(100, 116, 139),
				caption_font: "600 9px sans-serif",
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn catalog_covers_every_kind() {
		let kinds = [
			NodeKind::User,
			NodeKind::LoadBalancer,
			NodeKind::Frontend,
			NodeKind::BackendApi,
			NodeKind::Database,
			NodeKind::Cache,
			NodeKind::AiModel,
			NodeKind::ExternalService,
		];
		assert_eq!(kinds.len(), kind_styles().len());
		for kind in kinds {
			let style = kind_style(kind);
			assert!(!style.name.is_empty());
			assert!(style.icon.starts_with('M'));
		}
	}

	#[test]
	fn kind_lookups_match_wire_names() {
		assert_eq!(kind_style(NodeKind::Database).name, "DATABASE");
		assert_eq!(kind_style(NodeKind::LoadBalancer).name, "LOAD_BALANCER");
		assert_eq!(kind_style(NodeKind::Database).accent.to_css(), "#ef4444");
		assert_eq!(kind_style(NodeKind::AiModel).accent.to_css(), "#8b5cf6");
	}

	#[test]
	fn css_output_switches_on_alpha() {
		assert_eq!(Color::rgb(59, 130, 246).to_css(), "#3b82f6");
		assert_eq!(
			Color::rgb(59, 130, 246).with_alpha(0.5).to_css(),
			"rgba(59, 130, 246, 0.5)"
		);
	}

	#[test]
	fn shading_stays_in_range() {
		let c = Color::rgb(16, 185, 129);
		let lighter = c.lighten(0.2);
		let darker = c.darken(0.2);
		assert!(lighter.r >= c.r && lighter.g >= c.g && lighter.b >= c.b);
		assert!(darker.r <= c.r && darker.g <= c.g && darker.b <= c.b);
		assert_eq!(c.lighten(2.0), Color::rgb(255, 255, 255));
	}
}
