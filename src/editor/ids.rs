//! Session-scoped node identifier allocation.

use super::types::NodeId;

/// Prefix used for node identifiers minted by drops.
pub const DEFAULT_ID_PREFIX: &str = "dndnode_";

/// Mints node identifiers as `prefix + ordinal`, starting at ordinal 0.
///
/// Owned by the editing session, so two sessions never share a counter.
/// The counter only moves forward: an identifier handed out once is never
/// handed out again by the same generator.
#[derive(Clone, Debug)]
pub struct IdGenerator {
	prefix: String,
	next: u64,
}

impl Default for IdGenerator {
	fn default() -> Self {
		Self::new(DEFAULT_ID_PREFIX)
	}
}

impl IdGenerator {
	/// A generator starting at `{prefix}0`.
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			next: 0,
		}
	}

	/// The prefix every minted id carries.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Mint the next id.
	pub fn next_id(&mut self) -> NodeId {
		let id = NodeId::new(format!("{}{}", self.prefix, self.next));
		self.next += 1;
		id
	}

	/// Move the counter past every identifier in `ids` that carries this
	/// generator's prefix. Never moves the counter backwards.
	pub fn advance_past<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>) {
		let highest = ids
			.into_iter()
			.filter_map(|id| id.as_str().strip_prefix(self.prefix.as_str()))
			.filter_map(|ordinal| ordinal.parse::<u64>().ok())
			.max();
		if let Some(ordinal) = highest {
			self.next = self.next.max(ordinal.saturating_add(1));
		}
	}
}
