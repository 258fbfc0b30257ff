//! Error types for graph mutation and scenario persistence.

use super::store::ScenarioId;
use super::types::{EdgeId, NodeId};

/// A graph mutation that would break referential integrity or edge policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
	/// A node with this id is already present.
	#[error("node `{0}` already exists")]
	DuplicateNode(NodeId),

	/// No node has this id.
	#[error("node `{0}` does not exist")]
	UnknownNode(NodeId),

	/// An edge endpoint names a node that is not present.
	#[error("edge `{edge}` references missing node `{node}`")]
	UnknownEndpoint { edge: EdgeId, node: NodeId },

	/// Source and target are the same node and the policy forbids it.
	#[error("self-loop on node `{0}` is not allowed")]
	SelfLoop(NodeId),

	/// An edge with this id, or these endpoints and handles, exists.
	#[error("edge `{0}` already exists")]
	DuplicateEdge(EdgeId),
}

/// Failure talking to the remote scenario store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
	/// The request never produced a response.
	#[error("scenario store unreachable: {0}")]
	Transport(String),

	/// The store answered with a non-success status.
	#[error("scenario store rejected request ({status}): {body}")]
	Status { status: u16, body: String },

	/// The response body was not the expected rows.
	#[error("unexpected scenario store response: {0}")]
	Decode(String),
}

/// Failure of a save, load or update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
	/// Update was requested before any load or save.
	#[error("no scenario id; load or save a scenario before updating")]
	MissingScenarioId,

	/// Update matched no stored row.
	#[error("scenario `{0}` does not exist in the store")]
	UnknownScenario(ScenarioId),

	/// The store request itself failed.
	#[error(transparent)]
	Store(#[from] StoreError),
}
