//! Graph data structures shared by the editor, the canvas and the scenario store.
//!
//! Field names and casing follow the JSON stored in scenario rows, so these
//! types round-trip through the remote store unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Media type under which the palette attaches its item descriptor to a drag.
pub const DRAG_PAYLOAD_TYPE: &str = "application/reactflow";

/// Identifier of a node, unique within an editing session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
	/// Wrap a raw id.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The raw id.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for NodeId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Identifier of an edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
	/// Wrap a raw id.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The raw id.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for EdgeId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A point in either screen or canvas space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Position {
	/// A point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Rendering variant of a node. Only one variant exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
	#[default]
	/// Image, label and type card.
	#[serde(rename = "customNode")]
	CustomNode,
}

/// Domain attributes of a node.
///
/// Deletion is not stored here; the canvas calls
/// [`EditorSession::delete_node`](super::session::EditorSession::delete_node)
/// with the node's id instead.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
	#[serde(default)]
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub node_type: Option<String>,
}

/// A partial update to [`NodeData`]. `None` fields leave the target untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeDataPatch {
	pub label: Option<String>,
	pub image: Option<String>,
	pub description: Option<String>,
	pub notes: Option<String>,
	pub node_type: Option<String>,
}

impl NodeData {
	/// Shallow-merge `patch` into this data, keeping every field it omits.
	pub fn merge(&mut self, patch: NodeDataPatch) {
		if let Some(label) = patch.label {
			self.label = label;
		}
		if let Some(image) = patch.image {
			self.image = Some(image);
		}
		if let Some(description) = patch.description {
			self.description = Some(description);
		}
		if let Some(notes) = patch.notes {
			self.notes = Some(notes);
		}
		if let Some(node_type) = patch.node_type {
			self.node_type = Some(node_type);
		}
	}
}

/// A placed node on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: NodeId,
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	#[serde(default)]
	pub position: Position,
	#[serde(default)]
	pub data: NodeData,
}

/// A directed connection between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
	pub id: EdgeId,
	/// Source node ID.
	pub source: NodeId,
	/// Target node ID.
	pub target: NodeId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_handle: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target_handle: Option<String>,
}

/// A request from the canvas to connect two nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
	pub source: NodeId,
	pub target: NodeId,
	pub source_handle: Option<String>,
	pub target_handle: Option<String>,
}

impl Connection {
	/// A connection between two nodes' default handles.
	pub fn new(source: NodeId, target: NodeId) -> Self {
		Self {
			source,
			target,
			source_handle: None,
			target_handle: None,
		}
	}

	/// Edge identifier derived from endpoints and handles.
	pub fn edge_id(&self) -> EdgeId {
		EdgeId::new(format!(
			"edge-{}{}-{}{}",
			self.source,
			self.source_handle.as_deref().unwrap_or_default(),
			self.target,
			self.target_handle.as_deref().unwrap_or_default(),
		))
	}

	/// The edge this connection creates.
	pub fn into_edge(self) -> Edge {
		Edge {
			id: self.edge_id(),
			source: self.source,
			target: self.target,
			source_handle: self.source_handle,
			target_handle: self.target_handle,
		}
	}
}

/// Template dragged from the palette describing a node to create.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteItem {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(rename = "type", default)]
	pub item_type: String,
	#[serde(default)]
	pub image: Option<String>,
	#[serde(default)]
	pub notes: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
}

impl PaletteItem {
	/// Label for a node created from this item: the name, or `"{type} node"`
	/// when the name is missing or empty.
	pub fn label(&self) -> String {
		match self.name.as_deref() {
			Some(name) if !name.is_empty() => name.to_string(),
			_ => format!("{} node", self.item_type),
		}
	}

	/// Data for a node created from this item.
	pub fn to_node_data(&self) -> NodeData {
		NodeData {
			label: self.label(),
			image: self.image.clone(),
			description: self.description.clone(),
			notes: self.notes.clone(),
			node_type: Some(self.item_type.clone()),
		}
	}
}

/// Full copy of the graph at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}
