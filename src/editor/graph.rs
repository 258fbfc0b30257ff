//! The node/edge collections rendered by the canvas.
//!
//! Every edge's endpoints name nodes present in the model. Removing a node
//! removes every edge touching it in the same call.

use log::debug;

use super::error::GraphError;
use super::types::{Connection, Edge, EdgeId, GraphSnapshot, Node, NodeDataPatch, NodeId, Position};

/// Rules applied when edges are added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgePolicy {
	/// Whether an edge may start and end on the same node.
	pub allow_self_loops: bool,
}

impl Default for EdgePolicy {
	fn default() -> Self {
		Self {
			allow_self_loops: true,
		}
	}
}

/// Node and edge collections in insertion order.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	policy: EdgePolicy,
}

impl GraphModel {
	/// An empty model applying `policy` to new edges.
	pub fn new(policy: EdgePolicy) -> Self {
		Self {
			policy,
			..Default::default()
		}
	}

	/// The edge rules in force.
	pub fn policy(&self) -> EdgePolicy {
		self.policy
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Look up a node by id.
	pub fn node(&self, id: &NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| &n.id == id)
	}

	/// Whether a node with `id` exists.
	pub fn contains_node(&self, id: &NodeId) -> bool {
		self.node(id).is_some()
	}

	/// Append a node. Ids must be unique.
	pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
		if self.contains_node(&node.id) {
			return Err(GraphError::DuplicateNode(node.id));
		}
		self.nodes.push(node);
		Ok(())
	}

	/// Remove a node and every edge touching it. Returns the removed node.
	pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
		let idx = self.nodes.iter().position(|n| &n.id == id)?;
		let node = self.nodes.remove(idx);
		let dropped = self.remove_edges_touching(id);
		debug!("removed node {} and {} edge(s)", id, dropped.len());
		Some(node)
	}

	/// Remove every edge whose source or target is `id`.
	pub fn remove_edges_touching(&mut self, id: &NodeId) -> Vec<Edge> {
		let (dropped, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
			.into_iter()
			.partition(|e| &e.source == id || &e.target == id);
		self.edges = kept;
		dropped
	}

	/// Append an edge, enforcing endpoint existence, the self-loop policy
	/// and id uniqueness.
	pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
		self.insert_edge(edge, true)
	}

	fn insert_edge(&mut self, edge: Edge, enforce_policy: bool) -> Result<(), GraphError> {
		for endpoint in [&edge.source, &edge.target] {
			if !self.contains_node(endpoint) {
				return Err(GraphError::UnknownEndpoint {
					edge: edge.id.clone(),
					node: endpoint.clone(),
				});
			}
		}
		if enforce_policy && edge.source == edge.target && !self.policy.allow_self_loops {
			return Err(GraphError::SelfLoop(edge.source));
		}
		if self.edges.iter().any(|e| e.id == edge.id) {
			return Err(GraphError::DuplicateEdge(edge.id));
		}
		self.edges.push(edge);
		Ok(())
	}

	/// Turn a canvas connection into an edge and add it.
	///
	/// A connection matching an existing edge's endpoints and handles is
	/// rejected as a duplicate.
	pub fn connect(&mut self, connection: Connection) -> Result<EdgeId, GraphError> {
		let duplicate = self.edges.iter().find(|e| {
			e.source == connection.source
				&& e.target == connection.target
				&& e.source_handle == connection.source_handle
				&& e.target_handle == connection.target_handle
		});
		if let Some(existing) = duplicate {
			return Err(GraphError::DuplicateEdge(existing.id.clone()));
		}
		let edge = connection.into_edge();
		let id = edge.id.clone();
		self.add_edge(edge)?;
		Ok(id)
	}

	/// Remove one edge by id. Returns the removed edge.
	pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
		let idx = self.edges.iter().position(|e| &e.id == id)?;
		Some(self.edges.remove(idx))
	}

	/// Set a node's canvas position.
	pub fn move_node(&mut self, id: &NodeId, position: Position) -> Result<(), GraphError> {
		let node = self
			.nodes
			.iter_mut()
			.find(|n| &n.id == id)
			.ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
		node.position = position;
		Ok(())
	}

	/// Shallow-merge `patch` into the node's data.
	pub fn update_node_data(&mut self, id: &NodeId, patch: NodeDataPatch) -> Result<(), GraphError> {
		let node = self
			.nodes
			.iter_mut()
			.find(|n| &n.id == id)
			.ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
		node.data.merge(patch);
		Ok(())
	}

	/// Replace both collections wholesale.
	///
	/// Edges whose endpoints are missing from `nodes`, and nodes repeating an
	/// earlier id, are dropped so the model stays consistent. The self-loop
	/// policy governs new edges only; stored self-loops are kept.
	pub fn replace_all(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
		self.nodes.clear();
		self.edges.clear();
		for node in nodes {
			if let Err(e) = self.add_node(node) {
				debug!("replace_all: skipping node: {e}");
			}
		}
		for edge in edges {
			if let Err(e) = self.insert_edge(edge, false) {
				debug!("replace_all: skipping edge: {e}");
			}
		}
	}

	/// Clone both collections for persistence.
	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
		}
	}
}
