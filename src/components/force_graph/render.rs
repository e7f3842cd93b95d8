use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ChartState;
use crate::geometry::{PathCommand, Point, link_path};

const BACKGROUND: &str = "#ffffff";
const LINK_COLOR: &str = "rgba(120, 120, 120, 0.8)";
const LINK_DIMMED: &str = "rgba(120, 120, 120, 0.2)";
const LINK_HIGHLIGHT: &str = "#ff0000";

pub fn render(state: &ChartState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &ChartState, ctx: &CanvasRenderingContext2d) {
	let positions = state.positions();
	let has_hover = state.hovered.is_some();

	for link in &state.links {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&link.source), positions.get(&link.target))
		else {
			continue;
		};

		let color = if !has_hover {
			LINK_COLOR
		} else if state.is_highlighted(link.source) && state.is_highlighted(link.target) {
			LINK_HIGHLIGHT
		} else {
			LINK_DIMMED
		};
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(link.width);

		ctx.begin_path();
		for command in link_path(Point::new(x1, y1), Point::new(x2, y2)) {
			match command {
				PathCommand::MoveTo(p) => ctx.move_to(p.x, p.y),
				PathCommand::LineTo(p) => ctx.line_to(p.x, p.y),
			}
		}
		ctx.stroke();
	}
}

fn draw_nodes(state: &ChartState, ctx: &CanvasRenderingContext2d) {
	let has_hover = state.hovered.is_some();

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font("11px sans-serif");

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let dimmed = has_hover && !state.is_highlighted(node.index());

		ctx.set_global_alpha(if dimmed { 0.35 } else { 1.0 });
		ctx.begin_path();
		let _ = ctx.arc(x, y, info.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();

		if state.hovered == Some(node.index()) {
			ctx.set_stroke_style_str(LINK_HIGHLIGHT);
			ctx.set_line_width(2.0 / state.transform.k);
			ctx.stroke();
		}

		ctx.set_fill_style_str("white");
		let _ = ctx.fill_text(&info.id, x, y);
		ctx.set_global_alpha(1.0);
	});
}
