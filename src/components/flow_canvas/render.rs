//! Canvas rendering for the scenario graph.
//!
//! Passes, back to front:
//! 1. Background and grid (screen space)
//! 2. Edges, then the pending connection line (canvas space)
//! 3. Nodes in insertion order, so later nodes sit on top

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasState, DELETE_SIZE, NODE_HEIGHT, NODE_WIDTH, delete_button_origin};
use super::theme::{GridVariant, Theme};
use crate::editor::{GraphModel, Node, NodeId, Position};

/// Longest label drawn before truncation.
const MAX_LABEL_CHARS: usize = 20;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &CanvasState,
	graph: &GraphModel,
	selected: Option<&NodeId>,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) {
	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.viewport.x, state.viewport.y);
	let _ = ctx.scale(state.viewport.k, state.viewport.k);

	draw_edges(graph, ctx, theme);
	draw_connect_preview(state, graph, ctx, theme);
	for node in graph.nodes() {
		let selected = selected == Some(&node.id);
		let hovered = state.hovered.as_ref() == Some(&node.id);
		draw_node(ctx, node, theme, selected, hovered);
	}

	ctx.restore();
}

fn draw_background(state: &CanvasState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	ctx.set_fill_style_str(&bg.color.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let step = bg.grid_spacing * state.viewport.k;
	if step < 6.0 {
		return;
	}
	let (ox, oy) = (
		state.viewport.x.rem_euclid(step),
		state.viewport.y.rem_euclid(step),
	);

	match bg.grid_variant {
		GridVariant::Lines => {
			ctx.set_stroke_style_str(&bg.grid_color.to_css());
			ctx.set_line_width(1.0);
			ctx.begin_path();
			let mut x = ox;
			while x < state.width {
				ctx.move_to(x, 0.0);
				ctx.line_to(x, state.height);
				x += step;
			}
			let mut y = oy;
			while y < state.height {
				ctx.move_to(0.0, y);
				ctx.line_to(state.width, y);
				y += step;
			}
			ctx.stroke();
		}
		GridVariant::Dots => {
			ctx.set_fill_style_str(&bg.grid_color.to_css());
			let mut x = ox;
			while x < state.width {
				let mut y = oy;
				while y < state.height {
					ctx.fill_rect(x - 0.75, y - 0.75, 1.5, 1.5);
					y += step;
				}
				x += step;
			}
		}
	}
}

/// Right-middle of a node box, where outgoing edges start.
fn source_anchor(node: &Node) -> Position {
	Position::new(node.position.x + NODE_WIDTH, node.position.y + NODE_HEIGHT / 2.0)
}

/// Left-middle of a node box, where incoming edges end.
fn target_anchor(node: &Node) -> Position {
	Position::new(node.position.x, node.position.y + NODE_HEIGHT / 2.0)
}

fn draw_edges(graph: &GraphModel, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_stroke_style_str(&theme.edge.color.to_css());
	ctx.set_fill_style_str(&theme.edge.color.to_css());
	ctx.set_line_width(theme.edge.width);

	for edge in graph.edges() {
		let (Some(src), Some(tgt)) = (graph.node(&edge.source), graph.node(&edge.target)) else {
			continue;
		};
		if edge.source == edge.target {
			draw_self_loop(ctx, src, theme);
			continue;
		}
		draw_edge(ctx, source_anchor(src), target_anchor(tgt), theme);
	}
}

/// Horizontal-tangent cubic from `from` to `to`, with an arrowhead at `to`.
fn draw_edge(ctx: &CanvasRenderingContext2d, from: Position, to: Position, theme: &Theme) {
	let bend = ((to.x - from.x).abs() / 2.0).max(30.0);
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.bezier_curve_to(from.x + bend, from.y, to.x - bend, to.y, to.x, to.y);
	ctx.stroke();
	draw_arrow(ctx, to, theme.edge.arrow_size);
}

fn draw_self_loop(ctx: &CanvasRenderingContext2d, node: &Node, theme: &Theme) {
	let from = source_anchor(node);
	let to = target_anchor(node);
	let top = node.position.y - 30.0;
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.bezier_curve_to(from.x + 40.0, top, to.x - 40.0, top, to.x, to.y);
	ctx.stroke();
	draw_arrow(ctx, to, theme.edge.arrow_size);
}

/// Arrowhead pointing right with its tip at `tip`.
fn draw_arrow(ctx: &CanvasRenderingContext2d, tip: Position, size: f64) {
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(tip.x - size, tip.y - size * 0.5);
	ctx.line_to(tip.x - size, tip.y + size * 0.5);
	ctx.close_path();
	ctx.fill();
}

fn draw_connect_preview(
	state: &CanvasState,
	graph: &GraphModel,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) {
	let Some(source) = state.connect.source.as_ref().and_then(|id| graph.node(id)) else {
		return;
	};
	ctx.set_stroke_style_str(&theme.edge.preview_color.to_css());
	ctx.set_fill_style_str(&theme.edge.preview_color.to_css());
	ctx.set_line_width(theme.edge.width * 1.5);
	draw_edge(ctx, source_anchor(source), state.connect.cursor, theme);
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	theme: &Theme,
	selected: bool,
	hovered: bool,
) {
	let style = &theme.node;
	let Position { x, y } = node.position;

	let (border, width) = if selected {
		(style.selected_border, 2.5)
	} else if hovered {
		(style.hover_border, 2.0)
	} else {
		(style.border, 1.0)
	};
	let fill = if hovered {
		style.hover_border.lighten(0.85)
	} else {
		style.fill
	};

	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill_rect(x, y, NODE_WIDTH, NODE_HEIGHT);
	ctx.set_stroke_style_str(&border.to_css());
	ctx.set_line_width(width);
	ctx.stroke_rect(x, y, NODE_WIDTH, NODE_HEIGHT);

	// Connection handles
	ctx.set_fill_style_str(&border.to_css());
	for anchor in [source_anchor(node), target_anchor(node)] {
		ctx.begin_path();
		let _ = ctx.arc(anchor.x, anchor.y, 3.5, 0.0, 2.0 * PI);
		ctx.fill();
	}

	ctx.set_fill_style_str(&style.text.to_css());
	ctx.set_font(&style.label_font);
	let _ = ctx.fill_text(&truncate(&node.data.label), x + 10.0, y + 20.0);

	if let Some(kind) = node.data.node_type.as_deref().filter(|t| !t.is_empty()) {
		ctx.set_fill_style_str(&style.subtext.to_css());
		ctx.set_font(&style.type_font);
		let _ = ctx.fill_text(&truncate(kind), x + 10.0, y + 37.0);
	}

	if hovered || selected {
		draw_delete_button(ctx, node, theme);
	}
}

fn draw_delete_button(ctx: &CanvasRenderingContext2d, node: &Node, theme: &Theme) {
	let (left, top) = delete_button_origin(node);
	ctx.set_fill_style_str(&theme.node.delete_fill.to_css());
	ctx.fill_rect(left, top, DELETE_SIZE, DELETE_SIZE);

	let inset = 4.0;
	ctx.set_stroke_style_str("#ffffff");
	ctx.set_line_width(1.5);
	ctx.begin_path();
	ctx.move_to(left + inset, top + inset);
	ctx.line_to(left + DELETE_SIZE - inset, top + DELETE_SIZE - inset);
	ctx.move_to(left + DELETE_SIZE - inset, top + inset);
	ctx.line_to(left + inset, top + DELETE_SIZE - inset);
	ctx.stroke();
}

fn truncate(text: &str) -> String {
	if text.chars().count() <= MAX_LABEL_CHARS {
		return text.to_string();
	}
	let mut out: String = text.chars().take(MAX_LABEL_CHARS - 1).collect();
	out.push('…');
	out
}
