//! The editing session: one owner for the graph, its id generator, the
//! selection and the current scenario id.
//!
//! All mutations are synchronous and run to completion. Scenario requests
//! take a [`snapshot`](EditorSession::snapshot) before awaiting and hand
//! their result back through [`apply_loaded`](EditorSession::apply_loaded)
//! or [`record_saved`](EditorSession::record_saved), so a load finishing
//! after further edits replaces those edits.

use log::debug;

use super::error::GraphError;
use super::graph::{EdgePolicy, GraphModel};
use super::ids::IdGenerator;
use super::placement::{self, CanvasProjection, DropEvent};
use super::selection::Selection;
use super::store::ScenarioId;
use super::sync::{LoadedScenario, SavedScenario};
use super::types::{Connection, EdgeId, GraphSnapshot, Node, NodeDataPatch, NodeId, Position};

/// A node change reported by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
	/// The node was dragged to `position`.
	Position { id: NodeId, position: Position },
	/// The node was deleted.
	Remove { id: NodeId },
}

/// An edge change reported by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
	/// The edge was deleted.
	Remove { id: EdgeId },
}

/// Graph, id generator, selection and scenario id for one editor.
#[derive(Clone, Debug, Default)]
pub struct EditorSession {
	graph: GraphModel,
	ids: IdGenerator,
	selection: Selection,
	scenario_id: Option<ScenarioId>,
}

impl EditorSession {
	/// An empty session drawing ids from `ids`.
	pub fn new(ids: IdGenerator, policy: EdgePolicy) -> Self {
		Self {
			graph: GraphModel::new(policy),
			ids,
			selection: Selection::default(),
			scenario_id: None,
		}
	}

	/// The graph being edited.
	pub fn graph(&self) -> &GraphModel {
		&self.graph
	}

	/// The current node selection.
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// Id of the scenario last loaded or saved in this session.
	pub fn scenario_id(&self) -> Option<&ScenarioId> {
		self.scenario_id.as_ref()
	}

	/// Copy of the graph to hand to a scenario request.
	pub fn snapshot(&self) -> GraphSnapshot {
		self.graph.snapshot()
	}

	/// Place a dropped palette item. Returns the new node's id.
	pub fn drop_item(&mut self, event: &DropEvent, projection: &impl CanvasProjection) -> Option<NodeId> {
		placement::place(event, projection, &mut self.ids, &mut self.graph)
	}

	/// Add an edge for a canvas connection.
	pub fn connect(&mut self, connection: Connection) -> Result<EdgeId, GraphError> {
		let id = self.graph.connect(connection)?;
		debug!("connected {id}");
		Ok(id)
	}

	/// Select `id`. Returns `false` if the node does not exist.
	pub fn click_node(&mut self, id: &NodeId) -> bool {
		match self.graph.node(id) {
			Some(node) => {
				self.selection.on_node_click(node);
				true
			}
			None => false,
		}
	}

	/// Route an edit-panel submission to the selected node.
	pub fn update_selected(&mut self, patch: impl Into<NodeDataPatch>) -> bool {
		self.selection.on_update_node(&mut self.graph, patch)
	}

	/// The delete entry point for node affordances on the canvas.
	pub fn delete_node(&mut self, id: &NodeId) -> Option<Node> {
		self.graph.remove_node(id)
	}

	/// Apply node moves and removals reported by the canvas.
	pub fn apply_node_changes(&mut self, changes: impl IntoIterator<Item = NodeChange>) {
		for change in changes {
			match change {
				NodeChange::Position { id, position } => {
					if let Err(e) = self.graph.move_node(&id, position) {
						debug!("ignoring move: {e}");
					}
				}
				NodeChange::Remove { id } => {
					self.graph.remove_node(&id);
				}
			}
		}
	}

	/// Apply edge removals reported by the canvas.
	pub fn apply_edge_changes(&mut self, changes: impl IntoIterator<Item = EdgeChange>) {
		for change in changes {
			match change {
				EdgeChange::Remove { id } => {
					self.graph.remove_edge(&id);
				}
			}
		}
	}

	/// Replace the whole graph with a loaded scenario and remember its id.
	pub fn apply_loaded(&mut self, loaded: LoadedScenario) {
		let GraphSnapshot { nodes, edges } = loaded.snapshot;
		self.ids.advance_past(nodes.iter().map(|n| &n.id));
		self.graph.replace_all(nodes, edges);
		self.scenario_id = Some(loaded.scenario_id);
	}

	/// Remember the id a save produced so later updates target it.
	pub fn record_saved(&mut self, saved: &SavedScenario) {
		self.scenario_id = Some(saved.id.clone());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::editor::placement::Viewport;
	use crate::editor::selection::NodeEdit;
	use crate::editor::store::MemoryScenarioStore;
	use crate::editor::sync::{LoadOutcome, ScenarioSync};

	fn drop_item(session: &mut EditorSession, name: &str, x: f64, y: f64) -> NodeId {
		let event = DropEvent {
			pointer: Position::new(x, y),
			payload: Some(format!(r#"{{"name":"{name}","type":"npc"}}"#)),
		};
		session.drop_item(&event, &Viewport::default()).unwrap()
	}

	fn graph_of(session: &EditorSession) -> GraphSnapshot {
		let mut snapshot = session.snapshot();
		snapshot.nodes.sort_by(|a, b| a.id.cmp(&b.id));
		snapshot.edges.sort_by(|a, b| a.id.cmp(&b.id));
		snapshot
	}

	#[test]
	fn click_then_edit_updates_clicked_node() {
		let mut session = EditorSession::default();
		let a = drop_item(&mut session, "A", 0.0, 0.0);
		let b = drop_item(&mut session, "B", 10.0, 0.0);

		assert!(session.click_node(&b));
		assert!(session.update_selected(NodeEdit {
			name: "Boss".into(),
			item_type: "enemy".into(),
			..Default::default()
		}));

		assert_eq!(session.graph().node(&b).unwrap().data.label, "Boss");
		assert_eq!(session.graph().node(&a).unwrap().data.label, "A");
	}

	#[test]
	fn clicking_unknown_node_keeps_selection() {
		let mut session = EditorSession::default();
		let a = drop_item(&mut session, "A", 0.0, 0.0);
		session.click_node(&a);
		assert!(!session.click_node(&NodeId::from("ghost")));
		assert_eq!(session.selection().selected_node_id(), Some(&a));
	}

	#[test]
	fn delete_node_cascades() {
		let mut session = EditorSession::default();
		let a = drop_item(&mut session, "A", 0.0, 0.0);
		let b = drop_item(&mut session, "B", 0.0, 0.0);
		let c = drop_item(&mut session, "C", 0.0, 0.0);
		session.connect(Connection::new(a.clone(), b.clone())).unwrap();
		session.connect(Connection::new(b.clone(), c.clone())).unwrap();

		session.delete_node(&a);
		assert_eq!(session.graph().nodes().len(), 2);
		assert_eq!(session.graph().edges().len(), 1);
		assert_eq!(session.graph().edges()[0].source, b);
	}

	#[test]
	fn change_events_move_and_remove() {
		let mut session = EditorSession::default();
		let a = drop_item(&mut session, "A", 0.0, 0.0);
		let b = drop_item(&mut session, "B", 0.0, 0.0);
		let edge = session.connect(Connection::new(a.clone(), b.clone())).unwrap();

		session.apply_node_changes([NodeChange::Position {
			id: a.clone(),
			position: Position::new(40.0, 50.0),
		}]);
		assert_eq!(
			session.graph().node(&a).unwrap().position,
			Position::new(40.0, 50.0)
		);

		session.apply_edge_changes([EdgeChange::Remove { id: edge }]);
		assert!(session.graph().edges().is_empty());

		session.apply_node_changes([NodeChange::Remove { id: b.clone() }]);
		assert!(!session.graph().contains_node(&b));
	}

	#[tokio::test]
	async fn save_then_load_restores_snapshot() {
		let sync = ScenarioSync::new(MemoryScenarioStore::new());
		let mut session = EditorSession::default();
		let a = drop_item(&mut session, "A", 0.0, 0.0);
		let b = drop_item(&mut session, "B", 30.0, 40.0);
		session.connect(Connection::new(a, b.clone())).unwrap();
		let before = graph_of(&session);

		let saved = sync.save("S", session.snapshot()).await.unwrap();
		session.record_saved(&saved);
		assert_eq!(session.scenario_id(), Some(&saved.id));

		session.delete_node(&b);
		let LoadOutcome::Found(loaded) = sync.load("S").await.unwrap() else {
			panic!("scenario not found");
		};
		session.apply_loaded(loaded);
		assert_eq!(graph_of(&session), before);
	}

	#[tokio::test]
	async fn load_missing_leaves_graph_alone() {
		let sync = ScenarioSync::new(MemoryScenarioStore::new());
		let mut session = EditorSession::default();
		drop_item(&mut session, "A", 0.0, 0.0);
		let before = graph_of(&session);

		let outcome = sync.load("missing").await.unwrap();
		assert_eq!(outcome, LoadOutcome::NotFound);
		if let LoadOutcome::Found(loaded) = outcome {
			session.apply_loaded(loaded);
		}
		assert_eq!(graph_of(&session), before);
		assert_eq!(session.scenario_id(), None);
	}

	#[tokio::test]
	async fn update_uses_session_scenario_id() {
		let sync = ScenarioSync::new(MemoryScenarioStore::new());
		let mut session = EditorSession::default();
		assert!(sync
			.update(session.scenario_id(), session.snapshot())
			.await
			.is_err());
		assert_eq!(sync.store().requests(), 0);

		let saved = sync.save("S", session.snapshot()).await.unwrap();
		session.record_saved(&saved);
		drop_item(&mut session, "A", 0.0, 0.0);
		sync.update(session.scenario_id(), session.snapshot())
			.await
			.unwrap();
		assert_eq!(sync.store().rows()[0].nodes.len(), 1);
	}

	#[test]
	fn strict_policy_still_loads_stored_self_loops() {
		let mut origin = EditorSession::default();
		let a = drop_item(&mut origin, "A", 0.0, 0.0);
		origin.connect(Connection::new(a.clone(), a)).unwrap();
		let snapshot = origin.snapshot();
		assert_eq!(snapshot.edges.len(), 1);

		let mut session = EditorSession::new(
			IdGenerator::default(),
			EdgePolicy {
				allow_self_loops: false,
			},
		);
		session.apply_loaded(LoadedScenario {
			scenario_id: ScenarioId::Int(7),
			name: "S".into(),
			snapshot: snapshot.clone(),
		});
		assert_eq!(session.snapshot(), snapshot);
	}

	#[test]
	fn drops_after_load_do_not_reuse_loaded_ids() {
		let mut origin = EditorSession::default();
		for i in 0..3 {
			drop_item(&mut origin, &format!("N{i}"), 0.0, 0.0);
		}

		let mut session = EditorSession::default();
		session.apply_loaded(LoadedScenario {
			scenario_id: ScenarioId::Int(1),
			name: "S".into(),
			snapshot: origin.snapshot(),
		});
		let fresh = drop_item(&mut session, "New", 0.0, 0.0);
		assert_eq!(fresh.as_str(), "dndnode_3");
		assert_eq!(session.graph().nodes().len(), 4);
	}
}
