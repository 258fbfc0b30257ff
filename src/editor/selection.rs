//! Which node the edit panel is bound to, and routing of its edits.

use log::debug;

use super::graph::GraphModel;
use super::types::{Node, NodeData, NodeDataPatch, NodeId};

/// Fields submitted by the edit panel.
///
/// `name` becomes the node label and `item_type` its `nodeType`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeEdit {
	pub name: String,
	pub image: String,
	pub description: String,
	pub notes: String,
	pub item_type: String,
}

impl NodeEdit {
	/// Prefill an edit form from existing node data.
	pub fn from_data(data: &NodeData) -> Self {
		Self {
			name: data.label.clone(),
			image: data.image.clone().unwrap_or_default(),
			description: data.description.clone().unwrap_or_default(),
			notes: data.notes.clone().unwrap_or_default(),
			item_type: data.node_type.clone().unwrap_or_default(),
		}
	}
}

impl From<NodeEdit> for NodeDataPatch {
	fn from(edit: NodeEdit) -> Self {
		Self {
			label: Some(edit.name),
			image: Some(edit.image),
			description: Some(edit.description),
			notes: Some(edit.notes),
			node_type: Some(edit.item_type),
		}
	}
}

/// The single "active" node and a snapshot of its data at click time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
	selected_node_id: Option<NodeId>,
	selected_node_data: Option<NodeData>,
}

impl Selection {
	/// Id of the selected node.
	pub fn selected_node_id(&self) -> Option<&NodeId> {
		self.selected_node_id.as_ref()
	}

	/// Node data as it was when the node was clicked.
	pub fn selected_node_data(&self) -> Option<&NodeData> {
		self.selected_node_data.as_ref()
	}

	/// The only way the selection changes.
	pub fn on_node_click(&mut self, node: &Node) {
		debug!("selected node {}", node.id);
		self.selected_node_id = Some(node.id.clone());
		self.selected_node_data = Some(node.data.clone());
	}

	/// Merge `patch` into the selected node.
	///
	/// Returns `false` without touching the graph when nothing is selected or
	/// the selected node no longer exists.
	pub fn on_update_node(&self, graph: &mut GraphModel, patch: impl Into<NodeDataPatch>) -> bool {
		let Some(id) = self.selected_node_id.as_ref() else {
			debug!("edit dropped: no node selected");
			return false;
		};
		match graph.update_node_data(id, patch.into()) {
			Ok(()) => true,
			Err(e) => {
				debug!("edit dropped: {e}");
				false
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::editor::types::{NodeKind, Position};

	fn graph_with(ids: &[&str]) -> GraphModel {
		let mut graph = GraphModel::default();
		for id in ids {
			graph
				.add_node(Node {
					id: NodeId::from(*id),
					kind: NodeKind::CustomNode,
					position: Position::default(),
					data: NodeData {
						label: id.to_string(),
						image: Some(format!("{id}.png")),
						..Default::default()
					},
				})
				.unwrap();
		}
		graph
	}

	fn edit(name: &str) -> NodeEdit {
		NodeEdit {
			name: name.into(),
			image: "new.png".into(),
			description: "d".into(),
			notes: "n".into(),
			item_type: "enemy".into(),
		}
	}

	#[test]
	fn click_then_update_touches_only_clicked_node() {
		let mut graph = graph_with(&["a", "b", "c"]);
		let mut selection = Selection::default();
		let clicked = graph.node(&NodeId::from("b")).unwrap().clone();
		selection.on_node_click(&clicked);

		assert!(selection.on_update_node(&mut graph, edit("Renamed")));

		let b = &graph.node(&NodeId::from("b")).unwrap().data;
		assert_eq!(b.label, "Renamed");
		assert_eq!(b.image.as_deref(), Some("new.png"));
		assert_eq!(b.node_type.as_deref(), Some("enemy"));
		for other in ["a", "c"] {
			let data = &graph.node(&NodeId::from(other)).unwrap().data;
			assert_eq!(data.label, other);
			assert_eq!(data.image, Some(format!("{other}.png")));
		}
	}

	#[test]
	fn click_snapshots_data() {
		let graph = graph_with(&["a"]);
		let mut selection = Selection::default();
		selection.on_node_click(graph.node(&NodeId::from("a")).unwrap());
		assert_eq!(selection.selected_node_id(), Some(&NodeId::from("a")));
		assert_eq!(selection.selected_node_data().unwrap().label, "a");
	}

	#[test]
	fn update_without_selection_is_dropped() {
		let mut graph = graph_with(&["a"]);
		let selection = Selection::default();
		assert!(!selection.on_update_node(&mut graph, edit("X")));
		assert_eq!(graph.node(&NodeId::from("a")).unwrap().data.label, "a");
	}

	#[test]
	fn stale_selection_is_dropped() {
		let mut graph = graph_with(&["a", "b"]);
		let mut selection = Selection::default();
		selection.on_node_click(&graph.node(&NodeId::from("a")).unwrap().clone());
		graph.remove_node(&NodeId::from("a"));

		assert!(!selection.on_update_node(&mut graph, edit("X")));
		assert_eq!(graph.nodes().len(), 1);
		assert_eq!(graph.nodes()[0].data.label, "b");
	}

	#[test]
	fn partial_patch_keeps_other_fields() {
		let mut graph = graph_with(&["a"]);
		let mut selection = Selection::default();
		selection.on_node_click(&graph.node(&NodeId::from("a")).unwrap().clone());
		let patch = NodeDataPatch {
			notes: Some("only notes".into()),
			..Default::default()
		};
		assert!(selection.on_update_node(&mut graph, patch));
		let data = &graph.node(&NodeId::from("a")).unwrap().data;
		assert_eq!(data.label, "a");
		assert_eq!(data.image.as_deref(), Some("a.png"));
		assert_eq!(data.notes.as_deref(), Some("only notes"));
	}

	#[test]
	fn edit_prefill_round_trips_labels() {
		let data = NodeData {
			label: "Boss".into(),
			node_type: Some("enemy".into()),
			..Default::default()
		};
		let form = NodeEdit::from_data(&data);
		assert_eq!(form.name, "Boss");
		assert_eq!(form.item_type, "enemy");
		assert_eq!(form.notes, "");
	}
}
