//! Scenario records and the store they live in.
//!
//! A scenario row is `{id, name, nodes, edges}` with nodes and edges kept as
//! opaque JSON arrays. The store assigns `id` on insert.

use std::cell::{Cell, RefCell};
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::StoreError;
use super::types::{Edge, GraphSnapshot, Node};

/// Store-assigned scenario key. Numeric or textual depending on the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioId {
	/// Integer primary key.
	Int(i64),
	/// Textual key such as a UUID.
	Text(String),
}

impl fmt::Display for ScenarioId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ScenarioId::Int(id) => write!(f, "{id}"),
			ScenarioId::Text(id) => f.write_str(id),
		}
	}
}

/// A scenario about to be inserted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewScenario {
	pub name: String,
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

/// A scenario row as returned by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
	pub id: ScenarioId,
	pub name: String,
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}

impl ScenarioRecord {
	/// The stored graph.
	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
		}
	}
}

/// Insert / select-by-name / update-by-id over the `scenarios` collection.
///
/// Each call is exactly one round trip. Futures are not `Send` so browser
/// fetch-based clients can implement this.
#[async_trait(?Send)]
pub trait ScenarioStore {
	/// Insert one row and return it with its assigned id.
	async fn insert(&self, scenario: NewScenario) -> Result<ScenarioRecord, StoreError>;

	/// Every row whose name equals `name`, in the store's own stable order.
	async fn select_by_name(&self, name: &str) -> Result<Vec<ScenarioRecord>, StoreError>;

	/// Overwrite nodes and edges of row `id`. Returns the rows that matched.
	async fn update(
		&self,
		id: &ScenarioId,
		snapshot: &GraphSnapshot,
	) -> Result<Vec<ScenarioRecord>, StoreError>;
}

#[async_trait(?Send)]
impl<T: ScenarioStore + ?Sized> ScenarioStore for Box<T> {
	async fn insert(&self, scenario: NewScenario) -> Result<ScenarioRecord, StoreError> {
		(**self).insert(scenario).await
	}

	async fn select_by_name(&self, name: &str) -> Result<Vec<ScenarioRecord>, StoreError> {
		(**self).select_by_name(name).await
	}

	async fn update(
		&self,
		id: &ScenarioId,
		snapshot: &GraphSnapshot,
	) -> Result<Vec<ScenarioRecord>, StoreError> {
		(**self).update(id, snapshot).await
	}
}

/// In-process store for offline use and tests.
#[derive(Debug, Default)]
pub struct MemoryScenarioStore {
	rows: RefCell<Vec<ScenarioRecord>>,
	next_id: Cell<i64>,
	requests: Cell<usize>,
	fail_with: RefCell<Option<StoreError>>,
}

impl MemoryScenarioStore {
	pub fn new() -> Self {
		Self {
			next_id: Cell::new(1),
			..Default::default()
		}
	}

	/// Number of requests served so far, failed ones included.
	pub fn requests(&self) -> usize {
		self.requests.get()
	}

	pub fn rows(&self) -> Vec<ScenarioRecord> {
		self.rows.borrow().clone()
	}

	/// Make every following request fail with `error` (or succeed again with `None`).
	pub fn set_failure(&self, error: Option<StoreError>) {
		*self.fail_with.borrow_mut() = error;
	}

	fn begin(&self) -> Result<(), StoreError> {
		self.requests.set(self.requests.get() + 1);
		match self.fail_with.borrow().clone() {
			Some(e) => Err(e),
			None => Ok(()),
		}
	}
}

#[async_trait(?Send)]
impl ScenarioStore for MemoryScenarioStore {
	async fn insert(&self, scenario: NewScenario) -> Result<ScenarioRecord, StoreError> {
		self.begin()?;
		let id = self.next_id.get().max(1);
		self.next_id.set(id + 1);
		let record = ScenarioRecord {
			id: ScenarioId::Int(id),
			name: scenario.name,
			nodes: scenario.nodes,
			edges: scenario.edges,
		};
		self.rows.borrow_mut().push(record.clone());
		Ok(record)
	}

	async fn select_by_name(&self, name: &str) -> Result<Vec<ScenarioRecord>, StoreError> {
		self.begin()?;
		Ok(self
			.rows
			.borrow()
			.iter()
			.filter(|r| r.name == name)
			.cloned()
			.collect())
	}

	async fn update(
		&self,
		id: &ScenarioId,
		snapshot: &GraphSnapshot,
	) -> Result<Vec<ScenarioRecord>, StoreError> {
		self.begin()?;
		let mut rows = self.rows.borrow_mut();
		let updated = rows
			.iter_mut()
			.filter(|r| &r.id == id)
			.map(|r| {
				r.nodes = snapshot.nodes.clone();
				r.edges = snapshot.edges.clone();
				r.clone()
			})
			.collect();
		Ok(updated)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scenario_id_accepts_numbers_and_text() {
		let int: ScenarioId = serde_json::from_str("7").unwrap();
		assert_eq!(int, ScenarioId::Int(7));
		let text: ScenarioId = serde_json::from_str(r#""0b1c-uuid""#).unwrap();
		assert_eq!(text.to_string(), "0b1c-uuid");
	}

	#[test]
	fn record_tolerates_missing_collections() {
		let record: ScenarioRecord = serde_json::from_str(r#"{"id":3,"name":"empty"}"#).unwrap();
		assert_eq!(record.id, ScenarioId::Int(3));
		assert!(record.nodes.is_empty());
	}

	#[tokio::test]
	async fn memory_store_assigns_increasing_ids() {
		let store = MemoryScenarioStore::new();
		let a = store
			.insert(NewScenario {
				name: "a".into(),
				nodes: vec![],
				edges: vec![],
			})
			.await
			.unwrap();
		let b = store
			.insert(NewScenario {
				name: "a".into(),
				nodes: vec![],
				edges: vec![],
			})
			.await
			.unwrap();
		assert_eq!(a.id, ScenarioId::Int(1));
		assert_eq!(b.id, ScenarioId::Int(2));

		let found = store.select_by_name("a").await.unwrap();
		assert_eq!(found.len(), 2);
		assert_eq!(found[0].id, a.id);
		assert_eq!(store.requests(), 3);
	}
}
