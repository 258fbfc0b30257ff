//! Turning palette drops into new nodes.

use log::debug;

use super::graph::GraphModel;
use super::ids::IdGenerator;
use super::types::{Node, NodeId, NodeKind, PaletteItem, Position};

/// Maps pointer coordinates to canvas space.
///
/// Implemented by whatever owns the canvas element: it knows where the
/// container sits on screen and how the canvas is currently panned and zoomed.
pub trait CanvasProjection {
	/// Screen-space position of the canvas container's top-left corner.
	fn container_origin(&self) -> Position;

	/// Apply the inverse pan/zoom transform to a container-relative point.
	fn project(&self, relative: Position) -> Position;

	/// Screen-space pointer to canvas space.
	fn screen_to_canvas(&self, pointer: Position) -> Position {
		let origin = self.container_origin();
		self.project(Position::new(pointer.x - origin.x, pointer.y - origin.y))
	}
}

/// Container placement plus pan and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Container origin in screen space.
	pub origin: Position,
	/// Horizontal pan offset in container pixels.
	pub x: f64,
	/// Vertical pan offset in container pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			origin: Position::default(),
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl Viewport {
	/// Smallest zoom factor.
	pub const MIN_ZOOM: f64 = 0.1;
	/// Largest zoom factor.
	pub const MAX_ZOOM: f64 = 10.0;
	/// Fraction of the container left empty on each side of fitted content.
	pub const FIT_PADDING: f64 = 0.1;
	/// Largest zoom a fit picks, so a lone node is not blown up.
	pub const FIT_MAX_ZOOM: f64 = 2.0;

	/// Canvas-space point to container-relative pixels.
	pub fn canvas_to_container(&self, p: Position) -> Position {
		Position::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Zoom by `factor` keeping the container point `anchor` fixed.
	pub fn zoom_at(&mut self, anchor: Position, factor: f64) {
		let new_k = (self.k * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = anchor.x - (anchor.x - self.x) * ratio;
		self.y = anchor.y - (anchor.y - self.y) * ratio;
		self.k = new_k;
	}

	/// Pan and zoom so the canvas rectangle `min..max` sits centred in a
	/// `width` x `height` container. A container with no area is ignored.
	pub fn fit(&mut self, min: Position, max: Position, width: f64, height: f64) {
		if width <= 0.0 || height <= 0.0 {
			return;
		}
		let span_x = (max.x - min.x).max(1.0);
		let span_y = (max.y - min.y).max(1.0);
		let usable = 1.0 - 2.0 * Self::FIT_PADDING;
		let k = (width * usable / span_x)
			.min(height * usable / span_y)
			.clamp(Self::MIN_ZOOM, Self::FIT_MAX_ZOOM);
		self.k = k;
		self.x = width / 2.0 - (min.x + max.x) / 2.0 * k;
		self.y = height / 2.0 - (min.y + max.y) / 2.0 * k;
	}
}

impl CanvasProjection for Viewport {
	fn container_origin(&self) -> Position {
		self.origin
	}

	fn project(&self, relative: Position) -> Position {
		Position::new((relative.x - self.x) / self.k, (relative.y - self.y) / self.k)
	}
}

/// A drop on the canvas: pointer position plus the raw drag payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropEvent {
	/// Pointer position in screen space.
	pub pointer: Position,
	/// Data attached under the drag payload media type.
	pub payload: Option<String>,
}

/// Parse the palette descriptor carried by a drag, if any.
pub fn parse_payload(payload: Option<&str>) -> Option<PaletteItem> {
	let raw = payload?.trim();
	if raw.is_empty() {
		return None;
	}
	match serde_json::from_str::<Option<PaletteItem>>(raw) {
		Ok(item) => item,
		Err(e) => {
			debug!("ignoring drop with malformed payload: {e}");
			None
		}
	}
}

/// Create a node for `event` and append it to `graph`.
///
/// Returns `None`, leaving everything untouched, when the payload is missing
/// or malformed. Every successful drop allocates a fresh id, so repeating the
/// same drop creates another node.
pub fn place(
	event: &DropEvent,
	projection: &impl CanvasProjection,
	ids: &mut IdGenerator,
	graph: &mut GraphModel,
) -> Option<NodeId> {
	let item = parse_payload(event.payload.as_deref())?;
	let position = projection.screen_to_canvas(event.pointer);

	// Loaded scenarios may carry ids the generator has not seen.
	let mut id = ids.next_id();
	while graph.contains_node(&id) {
		id = ids.next_id();
	}

	let node = Node {
		id: id.clone(),
		kind: NodeKind::CustomNode,
		position,
		data: item.to_node_data(),
	};
	match graph.add_node(node) {
		Ok(()) => {
			debug!("placed node {} at ({}, {})", id, position.x, position.y);
			Some(id)
		}
		Err(e) => {
			debug!("drop rejected: {e}");
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn drop_at(x: f64, y: f64, payload: &str) -> DropEvent {
		DropEvent {
			pointer: Position::new(x, y),
			payload: Some(payload.to_string()),
		}
	}

	#[test]
	fn drop_lands_relative_to_container() {
		let viewport = Viewport {
			origin: Position::new(20.0, 10.0),
			..Default::default()
		};
		let mut ids = IdGenerator::default();
		let mut graph = GraphModel::default();
		let existing = place(
			&drop_at(0.0, 0.0, r#"{"type":"npc"}"#),
			&viewport,
			&mut ids,
			&mut graph,
		)
		.unwrap();

		let id = place(
			&drop_at(120.0, 80.0, r#"{"name":"Boss","type":"enemy"}"#),
			&viewport,
			&mut ids,
			&mut graph,
		)
		.unwrap();

		assert_ne!(id, existing);
		let node = graph.node(&id).unwrap();
		assert_eq!(node.data.label, "Boss");
		assert_eq!(node.data.node_type.as_deref(), Some("enemy"));
		assert_eq!(node.position, Position::new(100.0, 70.0));
		assert_eq!(node.kind, NodeKind::CustomNode);
	}

	#[test]
	fn drop_accounts_for_pan_and_zoom() {
		let viewport = Viewport {
			origin: Position::new(20.0, 10.0),
			x: 50.0,
			y: -30.0,
			k: 2.0,
		};
		let canvas = viewport.screen_to_canvas(Position::new(120.0, 80.0));
		assert_eq!(canvas, Position::new(25.0, 50.0));
		assert_eq!(
			viewport.canvas_to_container(canvas),
			Position::new(100.0, 70.0)
		);
	}

	#[test]
	fn unnamed_item_gets_type_label() {
		let mut ids = IdGenerator::default();
		let mut graph = GraphModel::default();
		let id = place(
			&drop_at(0.0, 0.0, r#"{"type":"treasure","image":"chest.png"}"#),
			&Viewport::default(),
			&mut ids,
			&mut graph,
		)
		.unwrap();
		let data = &graph.node(&id).unwrap().data;
		assert_eq!(data.label, "treasure node");
		assert_eq!(data.image.as_deref(), Some("chest.png"));
	}

	#[test]
	fn bad_payloads_are_ignored() {
		let mut ids = IdGenerator::default();
		let mut graph = GraphModel::default();
		for payload in [None, Some(""), Some("null"), Some("{not json"), Some("42")] {
			let event = DropEvent {
				pointer: Position::new(1.0, 1.0),
				payload: payload.map(str::to_string),
			};
			assert!(place(&event, &Viewport::default(), &mut ids, &mut graph).is_none());
		}
		assert!(graph.nodes().is_empty());
		assert_eq!(ids.next_id().as_str(), "dndnode_0");
	}

	#[test]
	fn repeated_drop_creates_distinct_nodes() {
		let mut ids = IdGenerator::default();
		let mut graph = GraphModel::default();
		let event = drop_at(5.0, 5.0, r#"{"name":"Guard","type":"npc"}"#);
		let first = place(&event, &Viewport::default(), &mut ids, &mut graph).unwrap();
		let second = place(&event, &Viewport::default(), &mut ids, &mut graph).unwrap();
		assert_ne!(first, second);
		assert_eq!(graph.nodes().len(), 2);
		assert_eq!(graph.node(&first).unwrap().position, Position::new(5.0, 5.0));
	}

	#[test]
	fn zoom_at_keeps_anchor_fixed() {
		let mut viewport = Viewport::default();
		let anchor = Position::new(200.0, 100.0);
		let before = viewport.project(anchor);
		viewport.zoom_at(anchor, 1.1);
		let after = viewport.project(anchor);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);

		viewport.zoom_at(anchor, 1e6);
		assert_eq!(viewport.k, Viewport::MAX_ZOOM);
	}

	#[test]
	fn fit_frames_content_with_padding() {
		let mut viewport = Viewport {
			origin: Position::new(5.0, 5.0),
			..Default::default()
		};
		viewport.fit(Position::new(0.0, 0.0), Position::new(100.0, 50.0), 200.0, 100.0);

		assert!((viewport.k - 1.6).abs() < 1e-9);
		let top_left = viewport.canvas_to_container(Position::new(0.0, 0.0));
		let bottom_right = viewport.canvas_to_container(Position::new(100.0, 50.0));
		assert!((top_left.x - 20.0).abs() < 1e-9 && (top_left.y - 10.0).abs() < 1e-9);
		assert!((bottom_right.x - 180.0).abs() < 1e-9 && (bottom_right.y - 90.0).abs() < 1e-9);
		assert_eq!(viewport.origin, Position::new(5.0, 5.0));
	}

	#[test]
	fn fit_caps_zoom_and_ignores_empty_container() {
		let mut viewport = Viewport::default();
		viewport.fit(Position::new(10.0, 10.0), Position::new(12.0, 12.0), 800.0, 600.0);
		assert_eq!(viewport.k, Viewport::FIT_MAX_ZOOM);
		let centre = viewport.canvas_to_container(Position::new(11.0, 11.0));
		assert!((centre.x - 400.0).abs() < 1e-9 && (centre.y - 300.0).abs() < 1e-9);

		let before = viewport;
		viewport.fit(Position::new(0.0, 0.0), Position::new(100.0, 100.0), 0.0, 600.0);
		assert_eq!(viewport, before);
	}
}
