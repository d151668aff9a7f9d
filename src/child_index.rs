//! Parent lookup for the builder.

use crate::node::FlatNode;
use core::hash::BuildHasher;
use hashbrown::{hash_map::DefaultHashBuilder, HashMap, HashSet};

/// Parent id → positions of that parent's children in scan order, built in one pass.
///
/// Also remembers every item id, so dangling parent references can be told apart.
pub struct ChildIndex<'a, S = DefaultHashBuilder>
where
	S: BuildHasher,
{
	children: HashMap<&'a str, Vec<usize>, S>,
	items: HashSet<&'a str, S>,
}
impl<'a, S> ChildIndex<'a, S>
where
	S: Default + BuildHasher,
{
	#[must_use]
	pub fn from_nodes<D: 'a>(nodes: &[&'a FlatNode<D>]) -> Self {
		let mut children: HashMap<&'a str, Vec<usize>, S> = HashMap::with_hasher(S::default());
		let mut items = HashSet::with_capacity_and_hasher(nodes.len(), S::default());
		for (i, &node) in nodes.iter().enumerate() {
			items.insert(node.item_id.as_str());
			if let Some(parent_id) = node.parent_id() {
				children.entry(parent_id).or_default().push(i);
			}
		}
		Self { children, items }
	}
}
impl<'a, S> ChildIndex<'a, S>
where
	S: BuildHasher,
{
	/// Empty if `parent_id` has no children.
	#[must_use]
	pub fn children_of(&self, parent_id: &str) -> &[usize] {
		self.children.get(parent_id).map_or(&[][..], Vec::as_slice)
	}

	#[must_use]
	pub fn contains_item(&self, item_id: &str) -> bool {
		self.items.contains(item_id)
	}

	/// The number of distinct item ids.
	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}
}
