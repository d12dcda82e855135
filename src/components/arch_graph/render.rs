//! Canvas rendering for the architecture diagram.
//!
//! Pure projection: reads positions from the layout state and draws one
//! frame. Passes run in z-order, background in screen space, then edges
//! with arrowheads and labels, then node boxes in graph space so boxes
//! cover the connector ends, and finally a screen-space vignette.

use web_sys::{CanvasRenderingContext2d, Path2d};

use super::state::{GraphState, NODE_HEIGHT, NODE_WIDTH};
use super::theme::{kind_style, kind_styles, Color, Theme};

/// Icon glyph offset from the node center.
const ICON_OFFSET_X: f64 = -12.0;
const ICON_OFFSET_Y: f64 = -28.0;
/// Stroke width of the icon glyph.
const ICON_STROKE: f64 = 1.5;
/// Accent bar width at the node's left edge.
const ACCENT_WIDTH: f64 = 4.0;
/// Baseline offsets of the name and kind caption from the node center.
const NAME_DY: f64 = 15.0;
const CAPTION_DY: f64 = 30.0;

/// Parse each catalog icon into a reusable [`Path2d`]. An entry that fails
/// to parse renders no glyph rather than failing the frame.
pub fn build_icon_paths() -> Vec<Option<Path2d>> {
	kind_styles()
		.iter()
		.map(|style| Path2d::new_with_path_string(style.icon).ok())
		.collect()
}

/// Renders one complete frame.
pub fn render(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	icons: &[Option<Path2d>],
	selected: Option<&str>,
) {
	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.view.x, state.view.y);
	let _ = ctx.scale(state.view.k, state.view.k);

	draw_links(state, ctx, theme);
	draw_nodes(state, ctx, theme, icons, selected);

	ctx.restore();

	if theme.background.vignette_alpha > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let radius = state.width.max(state.height) * 0.75;

	let gradient = ctx
		.create_radial_gradient(cx, cy, 0.0, cx, cy, radius)
		.unwrap();
	gradient
		.add_color_stop(0.0, &theme.background.center.to_css())
		.unwrap();
	gradient
		.add_color_stop(1.0, &theme.background.edge.to_css())
		.unwrap();

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let outer = (state.width * state.width + state.height * state.height).sqrt() / 2.0;

	let gradient = ctx
		.create_radial_gradient(cx, cy, outer * 0.5, cx, cy, outer)
		.unwrap();
	gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)").unwrap();
	gradient
		.add_color_stop(
			1.0,
			&format!("rgba(0, 0, 0, {})", theme.background.vignette_alpha),
		)
		.unwrap();

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let nodes = state.positions();

	ctx.set_line_width(theme.edge.width);
	ctx.set_stroke_style_str(&theme.edge.color.with_alpha(theme.edge.opacity).to_css());

	for link in state.links() {
		let (s, t) = (&nodes[link.source], &nodes[link.target]);
		if !(s.x.is_finite() && s.y.is_finite() && t.x.is_finite() && t.y.is_finite()) {
			continue;
		}

		let (mx, my) = ((s.x + t.x) / 2.0, (s.y + t.y) / 2.0);
		let (cx, cy) = (mx + theme.edge.control_dx, my + theme.edge.control_dy);

		ctx.begin_path();
		ctx.move_to(s.x, s.y);
		let _ = ctx.quadratic_curve_to(cx, cy, t.x, t.y);
		ctx.stroke();

		draw_arrowhead(ctx, theme, cx, cy, t.x, t.y);
	}

	ctx.set_font(theme.edge.label_font);
	ctx.set_text_align("center");
	ctx.set_fill_style_str(&theme.edge.label_color.to_css());
	for link in state.links() {
		let (s, t) = (&nodes[link.source], &nodes[link.target]);
		if !(s.x.is_finite() && s.y.is_finite() && t.x.is_finite() && t.y.is_finite()) {
			continue;
		}
		let (mx, my) = ((s.x + t.x) / 2.0, (s.y + t.y) / 2.0);
		let _ = ctx.fill_text(&link.label, mx + theme.edge.label_dx, my + theme.edge.label_dy);
	}
}

/// Triangle head oriented along the curve's end tangent, from the control
/// point toward the target.
fn draw_arrowhead(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	cx: f64,
	cy: f64,
	ex: f64,
	ey: f64,
) {
	let (dx, dy) = (ex - cx, ey - cy);
	let len = (dx * dx + dy * dy).sqrt();
	if len < 1e-6 {
		return;
	}
	let (ux, uy) = (dx / len, dy / len);

	let (tip_x, tip_y) = (ex - ux * theme.edge.arrow_inset, ey - uy * theme.edge.arrow_inset);
	let (back_x, back_y) = (tip_x - ux * theme.edge.arrow_size, tip_y - uy * theme.edge.arrow_size);
	let (px, py) = (
		-uy * theme.edge.arrow_size * 0.5,
		ux * theme.edge.arrow_size * 0.5,
	);

	ctx.set_fill_style_str(&theme.edge.arrow_color.with_alpha(theme.edge.opacity).to_css());
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	icons: &[Option<Path2d>],
	selected: Option<&str>,
) {
	ctx.set_text_align("center");

	for (meta, node) in state.nodes().iter().zip(state.positions()) {
		if !(node.x.is_finite() && node.y.is_finite()) {
			continue;
		}

		let is_selected = selected == Some(meta.id.as_str());
		let style = kind_style(meta.kind);
		let left = node.x - NODE_WIDTH / 2.0;
		let top = node.y - NODE_HEIGHT / 2.0;

		let fill = if is_selected { theme.node.fill_selected } else { theme.node.fill };
		let stroke = if is_selected { theme.node.stroke_selected } else { theme.node.stroke };

		rounded_rect_path(ctx, left, top, NODE_WIDTH, NODE_HEIGHT, theme.node.corner_radius);
		if is_selected {
			ctx.set_shadow_color(&theme.node.glow.to_css());
			ctx.set_shadow_blur(theme.node.glow_blur);
		}
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();
		ctx.set_line_width(theme.node.border_width);
		ctx.set_stroke_style_str(&stroke.to_css());
		ctx.stroke();
		if is_selected {
			ctx.set_shadow_blur(0.0);
			ctx.set_shadow_color("rgba(0, 0, 0, 0)");
		}

		draw_accent_bar(ctx, style.accent, left, top);

		if let Some(Some(path)) = icons.get(meta.kind as usize) {
			ctx.save();
			let _ = ctx.translate(node.x + ICON_OFFSET_X, node.y + ICON_OFFSET_Y);
			ctx.set_line_width(ICON_STROKE);
			ctx.set_line_cap("round");
			ctx.set_line_join("round");
			ctx.set_stroke_style_str(&style.accent.to_css());
			ctx.stroke_with_path(path);
			ctx.restore();
		}

		ctx.set_font(theme.node.name_font);
		ctx.set_fill_style_str(&theme.node.name_color.to_css());
		let _ = ctx.fill_text(&meta.name, node.x, node.y + NAME_DY);

		ctx.set_font(theme.node.caption_font);
		ctx.set_fill_style_str(&theme.node.caption_color.to_css());
		let _ = ctx.fill_text(&style.name.replace('_', " "), node.x, node.y + CAPTION_DY);
	}
}

/// Kind-colored strip along the node's left edge, shaded top to bottom.
fn draw_accent_bar(ctx: &CanvasRenderingContext2d, accent: Color, left: f64, top: f64) {
	let gradient = ctx.create_linear_gradient(left, top, left, top + NODE_HEIGHT);
	gradient
		.add_color_stop(0.0, &accent.lighten(0.12).to_css())
		.unwrap();
	gradient
		.add_color_stop(1.0, &accent.darken(0.08).to_css())
		.unwrap();

	rounded_rect_path(ctx, left, top, ACCENT_WIDTH, NODE_HEIGHT, 2.0);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

/// Rounded-rectangle path via corner arcs, left on the context for the
/// caller to fill or stroke.
fn rounded_rect_path(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	w: f64,
	h: f64,
	radius: f64,
) {
	let r = radius.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn icon_slots_align_with_the_kind_catalog() {
		// Parsing path data needs a browser canvas, so the slots stay
		// unparsed here; the renderer indexes them by kind discriminant
		// and skips any entry that holds no glyph.
		let icons: Vec<Option<Path2d>> = kind_styles().iter().map(|_| None).collect();
		assert_eq!(icons.len(), 8);
		assert!(icons.get(7).is_some());
		assert!(icons.get(8).is_none());
	}
}
