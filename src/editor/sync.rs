//! Save, load and update of whole-graph scenarios.
//!
//! Every operation reads or returns a full [`GraphSnapshot`] and performs a
//! single store request. Applying a loaded snapshot to the session is left
//! to the caller so the graph stays editable while a request is in flight.

use log::{info, warn};

use super::error::SyncError;
use super::store::{NewScenario, ScenarioId, ScenarioStore};
use super::types::GraphSnapshot;

/// Result of a successful save.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedScenario {
	/// Id assigned by the store.
	pub id: ScenarioId,
	pub snapshot: GraphSnapshot,
}

/// A scenario fetched by name.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedScenario {
	/// Id of the matched row.
	pub scenario_id: ScenarioId,
	pub name: String,
	pub snapshot: GraphSnapshot,
}

/// Outcome of a load that reached the store.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
	/// The first row with the requested name.
	Found(LoadedScenario),
	/// No row has the requested name.
	NotFound,
}

/// Scenario operations over some [`ScenarioStore`].
#[derive(Debug)]
pub struct ScenarioSync<S> {
	store: S,
}

impl<S: ScenarioStore> ScenarioSync<S> {
	/// Run scenario operations against `store`.
	pub fn new(store: S) -> Self {
		Self { store }
	}

	/// The underlying store.
	pub fn store(&self) -> &S {
		&self.store
	}

	/// Insert a new row named `name`. Duplicate names are allowed.
	pub async fn save(&self, name: &str, snapshot: GraphSnapshot) -> Result<SavedScenario, SyncError> {
		let scenario = NewScenario {
			name: name.to_string(),
			nodes: snapshot.nodes,
			edges: snapshot.edges,
		};
		match self.store.insert(scenario).await {
			Ok(record) => {
				info!(
					"saved scenario {:?} as {} ({} nodes, {} edges)",
					record.name,
					record.id,
					record.nodes.len(),
					record.edges.len()
				);
				Ok(SavedScenario {
					snapshot: record.snapshot(),
					id: record.id,
				})
			}
			Err(e) => {
				warn!("failed to save scenario {name:?}: {e}");
				Err(e.into())
			}
		}
	}

	/// Fetch the first row named `name` in store order.
	pub async fn load(&self, name: &str) -> Result<LoadOutcome, SyncError> {
		let rows = self.store.select_by_name(name).await.map_err(|e| {
			warn!("failed to load scenario {name:?}: {e}");
			SyncError::from(e)
		})?;
		let Some(record) = rows.into_iter().next() else {
			info!("no scenario named {name:?}");
			return Ok(LoadOutcome::NotFound);
		};
		info!(
			"loaded scenario {:?} ({}): {} nodes, {} edges",
			record.name,
			record.id,
			record.nodes.len(),
			record.edges.len()
		);
		Ok(LoadOutcome::Found(LoadedScenario {
			snapshot: record.snapshot(),
			scenario_id: record.id,
			name: record.name,
		}))
	}

	/// Overwrite row `scenario_id` with `snapshot`.
	///
	/// Fails with [`SyncError::MissingScenarioId`] before contacting the
	/// store when no id is given.
	pub async fn update(
		&self,
		scenario_id: Option<&ScenarioId>,
		snapshot: GraphSnapshot,
	) -> Result<GraphSnapshot, SyncError> {
		let Some(id) = scenario_id else {
			warn!("update requested without a scenario id");
			return Err(SyncError::MissingScenarioId);
		};
		let rows = self.store.update(id, &snapshot).await.map_err(|e| {
			warn!("failed to update scenario {id}: {e}");
			SyncError::from(e)
		})?;
		if rows.is_empty() {
			warn!("update matched no scenario with id {id}");
			return Err(SyncError::UnknownScenario(id.clone()));
		}
		info!(
			"updated scenario {id} ({} nodes, {} edges)",
			snapshot.nodes.len(),
			snapshot.edges.len()
		);
		Ok(snapshot)
	}
}
