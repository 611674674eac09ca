//! Canvas rendering for the block graph.
//!
//! Rendering uses two passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edges, then blocks with their titles (world space)

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::graph::{EdgeKind, Language, Point, PositionedBlock, RoutedEdge};

use super::config::{GraphConfig, LineStyle};
use super::state::BlockGraphState;
use super::theme::{Color, Theme};

/// Renders the current scene to the canvas.
pub fn render(state: &BlockGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let scene = state.scene();
	let [a, b, c, d, e, f] = state.viewport.transform_matrix();

	ctx.save();
	let _ = ctx.transform(a, b, c, d, e, f);
	let _ = ctx.translate(-scene.view_box.x, -scene.view_box.y);

	for edge in &scene.edges {
		draw_edge(ctx, edge, &state.config, theme);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	let selected = state.navigation.selected();
	for p in &scene.positioned {
		let dimmed = scene.categories.is_dimmed(&p.block.id);
		let highlighted = selected == Some(p.block.id.as_str())
			|| state.hovered.as_deref() == Some(p.block.id.as_str());
		let container = state.graph.has_children(&p.block.id);
		draw_block(ctx, p, state.config.language, theme, dimmed, highlighted, container);
	}

	ctx.restore();
}

fn draw_edge(ctx: &CanvasRenderingContext2d, edge: &RoutedEdge, config: &GraphConfig, theme: &Theme) {
	let (color, style) = match edge.edge.kind {
		EdgeKind::Prerequisite => (theme.edge.prerequisite, config.prerequisite_line_style),
		EdgeKind::Parent => (theme.edge.parent, config.parent_line_style),
	};

	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(theme.edge.width);
	set_dash(ctx, style);

	let (start, end) = (edge.start, edge.end);
	let (dx, dy) = (end.x - start.x, end.y - start.y);
	let dist = dx.hypot(dy);
	if dist < 0.001 {
		return;
	}

	// Bend along the dominant axis so banded edges read as flowing between levels.
	let (c1, c2) = if dx.abs() < dy.abs() {
		let mid = (start.y + end.y) / 2.0;
		(Point::new(start.x, mid), Point::new(end.x, mid))
	} else {
		let mid = (start.x + end.x) / 2.0;
		(Point::new(mid, start.y), Point::new(mid, end.y))
	};

	ctx.begin_path();
	ctx.move_to(start.x, start.y);
	ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
	ctx.stroke();

	if edge.edge.kind == EdgeKind::Prerequisite {
		draw_arrow(ctx, c2, end, theme.edge.arrow_size, color);
	}
}

fn set_dash(ctx: &CanvasRenderingContext2d, style: LineStyle) {
	let pattern = js_sys::Array::new();
	if let Some((dash, gap)) = style.dash_pattern() {
		pattern.push(&JsValue::from_f64(dash));
		pattern.push(&JsValue::from_f64(gap));
	}
	let _ = ctx.set_line_dash(&pattern);
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, from: Point, tip: Point, size: f64, color: Color) {
	let (dx, dy) = (tip.x - from.x, tip.y - from.y);
	let len = dx.hypot(dy);
	if len < 0.001 {
		return;
	}
	let (ux, uy) = (dx / len, dy / len);
	let (px, py) = (-uy, ux);
	let (bx, by) = (tip.x - ux * size, tip.y - uy * size);

	ctx.set_fill_style_str(&color.to_css());
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(bx + px * size * 0.5, by + py * size * 0.5);
	ctx.line_to(bx - px * size * 0.5, by - py * size * 0.5);
	ctx.close_path();
	ctx.fill();
}

fn draw_block(
	ctx: &CanvasRenderingContext2d,
	p: &PositionedBlock,
	language: Language,
	theme: &Theme,
	dimmed: bool,
	highlighted: bool,
	container: bool,
) {
	let style = &theme.block;
	let r = &p.position;

	ctx.save();
	if dimmed {
		ctx.set_global_alpha(style.dimmed_alpha);
	}

	rounded_rect(ctx, r.x, r.y, r.width, r.height, style.corner_radius);
	let fill = if container { style.container_fill } else { style.fill };
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();

	let (border, width) = if highlighted {
		(style.highlight_border, style.border_width * 2.0)
	} else {
		(style.border, style.border_width)
	};
	ctx.set_stroke_style_str(&border.to_css());
	ctx.set_line_width(width);
	ctx.stroke();

	ctx.set_fill_style_str(&style.text.to_css());
	ctx.set_font(&format!("{}px sans-serif", style.font_size));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	let max_width = r.width - style.padding * 2.0;
	let line_height = style.font_size * 1.25;
	let max_lines = ((r.height - style.padding) / line_height).floor().max(1.0) as usize;
	let lines = wrap_text(ctx, p.block.title.get(language), max_width, max_lines);

	let center = r.center();
	let top = center.y - (lines.len() as f64 - 1.0) * line_height / 2.0;
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, center.x, top + i as f64 * line_height);
	}

	ctx.restore();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, radius: f64) {
	let r = radius.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

/// Greedy word wrap using the canvas font metrics. The last line is
/// truncated with an ellipsis when the text does not fit in `max_lines`.
fn wrap_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64, max_lines: usize) -> Vec<String> {
	let measure = |s: &str| ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0);
	let mut lines: Vec<String> = Vec::new();
	let mut current = String::new();

	for word in text.split_whitespace() {
		let candidate = if current.is_empty() {
			word.to_string()
		} else {
			format!("{current} {word}")
		};
		if measure(&candidate) <= max_width || current.is_empty() {
			current = candidate;
		} else {
			lines.push(std::mem::replace(&mut current, word.to_string()));
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}

	if lines.len() > max_lines {
		lines.truncate(max_lines);
		if let Some(last) = lines.last_mut() {
			while !last.is_empty() && measure(&format!("{last}…")) > max_width {
				last.pop();
			}
			last.push('…');
		}
	}
	lines
}
