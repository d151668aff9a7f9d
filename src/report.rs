//! Diagnostics for flat input that doesn't describe a clean tree.
//!
//! None of these stop a build. They describe where nodes ended up, or why they didn't.

use thiserror::Error;

/// Something about the input that the builder resolved by fallback rather than by the plain parent relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum Anomaly {
	/// The node's parent id matches no item and isn't the root id.
	#[error("item {item_id:?} references missing parent {}", display_parent(.parent_id))]
	Orphan { item_id: String, parent_id: Option<String> },

	/// Another node with the same id came first and received the children.
	#[error("item id {item_id:?} is not unique; this occurrence was placed as a leaf")]
	DuplicateId { item_id: String },

	/// The node was reached again below an item whose id equals the root id.
	/// Only its first placement is kept.
	#[error("item {item_id:?} was reached again below the item named like the root id; kept its first placement")]
	Revisited { item_id: String },

	/// The node's parent chain doesn't reach the top level, because it loops or passes through a dropped orphan.
	#[error("item {item_id:?} is not connected to the top level and was not placed")]
	Unreachable { item_id: String },

	/// A sort callback returned a different number of siblings than it received.
	#[error("sort function changed a level's length from {before} to {after}")]
	SortChangedLength { before: usize, after: usize },
}

fn display_parent(parent_id: &Option<String>) -> String {
	parent_id.as_ref().map_or_else(|| "<none>".to_owned(), |parent_id| format!("{:?}", parent_id))
}

/// What a build did with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
	/// Number of nodes present in the output.
	pub placed: usize,
	pub anomalies: Vec<Anomaly>,
}
impl BuildReport {
	#[must_use]
	pub fn is_clean(&self) -> bool {
		self.anomalies.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Anomaly> {
		self.anomalies.iter()
	}

	/// The ids of orphaned items, in scan order.
	pub fn orphans(&self) -> impl Iterator<Item = &str> {
		self.anomalies.iter().filter_map(|anomaly| match anomaly {
			Anomaly::Orphan { item_id, .. } => Some(item_id.as_str()),
			_ => None,
		})
	}
}
impl<'a> IntoIterator for &'a BuildReport {
	type Item = &'a Anomaly;
	type IntoIter = core::slice::Iter<'a, Anomaly>;

	fn into_iter(self) -> Self::IntoIter {
		self.anomalies.iter()
	}
}
