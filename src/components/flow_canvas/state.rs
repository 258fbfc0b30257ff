//! Canvas interaction state: view transform, pointer gestures and hit testing.
//!
//! Graph content lives in the [`EditorSession`](crate::editor::EditorSession);
//! this only tracks what the pointer is doing and how the canvas is panned
//! and zoomed.

use crate::editor::{CanvasProjection, GraphModel, Node, NodeId, Position, Viewport};

/// Node box size in canvas units. Node positions are the box's top-left corner.
pub const NODE_WIDTH: f64 = 160.0;
pub const NODE_HEIGHT: f64 = 48.0;
/// Side of the delete affordance in the node's top-right corner.
pub const DELETE_SIZE: f64 = 14.0;

/// Pointer travel (screen pixels) below which a press-release counts as a click.
const CLICK_SLOP: f64 = 3.0;

/// What lies under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub enum Hit {
	Node(NodeId),
	DeleteButton(NodeId),
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_id: Option<NodeId>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Tracks a connection being dragged out of a node.
#[derive(Clone, Debug, Default)]
pub struct ConnectState {
	pub source: Option<NodeId>,
	/// Current pointer position in canvas space.
	pub cursor: Position,
}

/// View transform and pointer gestures of one canvas.
#[derive(Clone, Debug, Default)]
pub struct CanvasState {
	pub viewport: Viewport,
	pub drag: DragState,
	pub pan: PanState,
	pub connect: ConnectState,
	pub hovered: Option<NodeId>,
	pub width: f64,
	pub height: f64,
}

impl CanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			..Default::default()
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Record where the container sits on screen and return `client` relative to it.
	pub fn locate(&mut self, client_x: f64, client_y: f64, left: f64, top: f64) -> Position {
		self.viewport.origin = Position::new(left, top);
		Position::new(client_x - left, client_y - top)
	}

	/// Topmost node (last drawn) under a container-relative point.
	pub fn hit_test(&self, graph: &GraphModel, point: Position) -> Option<Hit> {
		let p = self.viewport.project(point);
		graph.nodes().iter().rev().find_map(|node| {
			if in_delete_button(node, p) {
				Some(Hit::DeleteButton(node.id.clone()))
			} else if in_node(node, p) {
				Some(Hit::Node(node.id.clone()))
			} else {
				None
			}
		})
	}

	pub fn begin_drag(&mut self, node: &Node, point: Position) {
		self.drag = DragState {
			node_id: Some(node.id.clone()),
			start_x: point.x,
			start_y: point.y,
			node_start: node.position,
			moved: false,
		};
	}

	/// New canvas position for the dragged node, if a drag is active.
	pub fn drag_to(&mut self, point: Position) -> Option<(NodeId, Position)> {
		let id = self.drag.node_id.clone()?;
		let (dx, dy) = (point.x - self.drag.start_x, point.y - self.drag.start_y);
		if !self.drag.moved && dx.hypot(dy) < CLICK_SLOP {
			return None;
		}
		self.drag.moved = true;
		let k = self.viewport.k;
		Some((
			id,
			Position::new(self.drag.node_start.x + dx / k, self.drag.node_start.y + dy / k),
		))
	}

	pub fn begin_pan(&mut self, point: Position) {
		self.pan = PanState {
			active: true,
			start_x: point.x,
			start_y: point.y,
			transform_start_x: self.viewport.x,
			transform_start_y: self.viewport.y,
		};
	}

	pub fn pan_to(&mut self, point: Position) {
		if self.pan.active {
			self.viewport.x = self.pan.transform_start_x + (point.x - self.pan.start_x);
			self.viewport.y = self.pan.transform_start_y + (point.y - self.pan.start_y);
		}
	}

	pub fn begin_connect(&mut self, source: NodeId, point: Position) {
		self.connect = ConnectState {
			source: Some(source),
			cursor: self.viewport.project(point),
		};
	}

	/// Zoom by `factor` around the middle of the canvas.
	pub fn zoom_centered(&mut self, factor: f64) {
		let centre = Position::new(self.width / 2.0, self.height / 2.0);
		self.viewport.zoom_at(centre, factor);
	}

	/// Frame every node in the view. An empty graph resets pan and zoom.
	pub fn fit_view(&mut self, graph: &GraphModel) {
		let mut nodes = graph.nodes().iter();
		let Some(first) = nodes.next() else {
			self.viewport = Viewport {
				origin: self.viewport.origin,
				..Default::default()
			};
			return;
		};
		let (mut min, mut max) = (first.position, first.position);
		for node in nodes {
			min.x = min.x.min(node.position.x);
			min.y = min.y.min(node.position.y);
			max.x = max.x.max(node.position.x);
			max.y = max.y.max(node.position.y);
		}
		max.x += NODE_WIDTH;
		max.y += NODE_HEIGHT;
		self.viewport.fit(min, max, self.width, self.height);
	}

	/// End every gesture, returning the drag and connect state that was active.
	pub fn release(&mut self) -> (DragState, ConnectState) {
		self.pan.active = false;
		(
			std::mem::take(&mut self.drag),
			std::mem::take(&mut self.connect),
		)
	}
}

fn in_node(node: &Node, p: Position) -> bool {
	let Position { x, y } = node.position;
	p.x >= x && p.x <= x + NODE_WIDTH && p.y >= y && p.y <= y + NODE_HEIGHT
}

fn in_delete_button(node: &Node, p: Position) -> bool {
	let (left, top) = delete_button_origin(node);
	p.x >= left && p.x <= left + DELETE_SIZE && p.y >= top && p.y <= top + DELETE_SIZE
}

/// Top-left corner of the node's delete affordance in canvas space.
pub fn delete_button_origin(node: &Node) -> (f64, f64) {
	(
		node.position.x + NODE_WIDTH - DELETE_SIZE - 4.0,
		node.position.y + 4.0,
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::editor::{NodeData, NodeKind};

	fn graph() -> GraphModel {
		let mut graph = GraphModel::default();
		for (id, x, y) in [("a", 0.0, 0.0), ("b", 100.0, 20.0)] {
			graph
				.add_node(Node {
					id: NodeId::from(id),
					kind: NodeKind::CustomNode,
					position: Position::new(x, y),
					data: NodeData::default(),
				})
				.unwrap();
		}
		graph
	}

	#[test]
	fn topmost_node_wins() {
		let state = CanvasState::new(800.0, 600.0);
		assert_eq!(
			state.hit_test(&graph(), Position::new(120.0, 40.0)),
			Some(Hit::Node(NodeId::from("b")))
		);
		assert_eq!(
			state.hit_test(&graph(), Position::new(10.0, 10.0)),
			Some(Hit::Node(NodeId::from("a")))
		);
		assert_eq!(state.hit_test(&graph(), Position::new(500.0, 500.0)), None);
	}

	#[test]
	fn delete_corner_is_its_own_target() {
		let state = CanvasState::new(800.0, 600.0);
		let graph = graph();
		let (left, top) = delete_button_origin(graph.node(&NodeId::from("b")).unwrap());
		assert_eq!(
			state.hit_test(&graph, Position::new(left + 2.0, top + 2.0)),
			Some(Hit::DeleteButton(NodeId::from("b")))
		);
	}

	#[test]
	fn hit_test_follows_zoom() {
		let mut state = CanvasState::new(800.0, 600.0);
		state.viewport.k = 2.0;
		assert_eq!(
			state.hit_test(&graph(), Position::new(300.0, 50.0)),
			Some(Hit::Node(NodeId::from("b")))
		);
	}

	#[test]
	fn small_jitter_is_not_a_drag() {
		let mut state = CanvasState::new(800.0, 600.0);
		let graph = graph();
		state.begin_drag(graph.node(&NodeId::from("a")).unwrap(), Position::new(10.0, 10.0));
		assert_eq!(state.drag_to(Position::new(11.0, 11.0)), None);

		let (id, pos) = state.drag_to(Position::new(30.0, 15.0)).unwrap();
		assert_eq!(id, NodeId::from("a"));
		assert_eq!(pos, Position::new(20.0, 5.0));

		let (drag, _) = state.release();
		assert!(drag.moved);
		assert!(state.drag.node_id.is_none());
	}

	#[test]
	fn pan_moves_viewport() {
		let mut state = CanvasState::new(800.0, 600.0);
		state.begin_pan(Position::new(10.0, 10.0));
		state.pan_to(Position::new(40.0, 0.0));
		assert_eq!((state.viewport.x, state.viewport.y), (30.0, -10.0));
		state.release();
		state.pan_to(Position::new(100.0, 100.0));
		assert_eq!((state.viewport.x, state.viewport.y), (30.0, -10.0));
	}

	#[test]
	fn fit_view_shows_every_node() {
		let mut state = CanvasState::new(800.0, 600.0);
		state.viewport.x = -5000.0;
		let graph = graph();
		state.fit_view(&graph);

		for node in graph.nodes() {
			let p = node.position;
			for corner in [p, Position::new(p.x + NODE_WIDTH, p.y + NODE_HEIGHT)] {
				let on_screen = state.viewport.canvas_to_container(corner);
				assert!(on_screen.x >= 0.0 && on_screen.x <= 800.0);
				assert!(on_screen.y >= 0.0 && on_screen.y <= 600.0);
			}
		}

		state.fit_view(&GraphModel::default());
		assert_eq!((state.viewport.x, state.viewport.y, state.viewport.k), (0.0, 0.0, 1.0));
	}

	#[test]
	fn zoom_controls_keep_centre_fixed() {
		let mut state = CanvasState::new(800.0, 600.0);
		let centre = Position::new(400.0, 300.0);
		let before = state.viewport.project(centre);
		state.zoom_centered(1.2);
		let after = state.viewport.project(centre);
		assert!((state.viewport.k - 1.2).abs() < 1e-9);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
	}

	#[test]
	fn locate_records_container_origin() {
		let mut state = CanvasState::new(800.0, 600.0);
		let p = state.locate(120.0, 80.0, 20.0, 10.0);
		assert_eq!(p, Position::new(100.0, 70.0));
		assert_eq!(
			state.viewport.screen_to_canvas(Position::new(120.0, 80.0)),
			Position::new(100.0, 70.0)
		);
	}
}
