//! The flat input and nested output shapes.

use crate::walk;
use core::{
	hash::{Hash, Hasher},
	mem::{self, ManuallyDrop},
	ptr, slice,
};
#[cfg(feature = "serde")]
use dep_serde::{Deserialize, Serialize};
use indexmap::IndexMap;

/// One entry of a flat tree: an item that names its parent by id instead of containing its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(crate = "dep_serde", rename_all = "camelCase"))]
pub struct FlatNode<D> {
	pub item_id: String,
	/// [`None`] is the default root sentinel.
	pub parent_id: Option<String>,
	/// Opaque to the builder.
	pub data: D,
}
impl<D> FlatNode<D> {
	pub fn new(item_id: impl Into<String>, parent_id: Option<&str>, data: D) -> Self {
		Self {
			item_id: item_id.into(),
			parent_id: parent_id.map(Into::into),
			data,
		}
	}

	#[must_use]
	pub fn parent_id(&self) -> Option<&str> {
		self.parent_id.as_deref()
	}
}

/// Flat nodes keyed by their `item_id`.
///
/// Insertion order is the default sibling order of the built tree.
pub type FlatTreeMapping<D> = IndexMap<String, FlatNode<D>>;

/// One level of a nested tree.
pub type TreeNodeList<D> = Vec<TreeNode<D>>;

/// A [`FlatNode`] together with its resolved children.
///
/// Dropping, cloning, comparing and hashing don't recurse, so they work at any depth.
/// [`Debug`] formatting and the `serde` implementations do recurse and need stack proportional to the tree's depth.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(crate = "dep_serde", rename_all = "camelCase"))]
pub struct TreeNode<D> {
	pub item_id: String,
	pub parent_id: Option<String>,
	pub data: D,
	pub children: TreeNodeList<D>,
}
impl<D> TreeNode<D> {
	#[must_use]
	pub fn new(flat: FlatNode<D>, children: TreeNodeList<D>) -> Self {
		let FlatNode { item_id, parent_id, data } = flat;
		Self {
			item_id,
			parent_id,
			data,
			children,
		}
	}

	#[must_use]
	pub fn leaf(flat: FlatNode<D>) -> Self {
		Self::new(flat, Vec::new())
	}

	#[must_use]
	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	#[must_use]
	pub fn parent_id(&self) -> Option<&str> {
		self.parent_id.as_deref()
	}

	/// Drops the children, returning the node to its flat form.
	#[must_use]
	pub fn into_flat(self) -> FlatNode<D> {
		let mut this = ManuallyDrop::new(self);
		drop(mem::take(&mut this.children));
		unsafe {
			//SAFETY: `this` is never dropped or used again, so each field is moved out exactly once.
			// The remaining `children` is an empty `Vec` without allocation.
			FlatNode {
				item_id: ptr::read(&this.item_id),
				parent_id: ptr::read(&this.parent_id),
				data: ptr::read(&this.data),
			}
		}
	}

	fn same_node(&self, other: &Self) -> bool
	where
		D: PartialEq,
	{
		self.item_id == other.item_id && self.parent_id == other.parent_id && self.data == other.data && self.children.len() == other.children.len()
	}
}
impl<D: Clone> TreeNode<D> {
	fn with_children(&self, children: TreeNodeList<D>) -> Self {
		Self {
			item_id: self.item_id.clone(),
			parent_id: self.parent_id.clone(),
			data: self.data.clone(),
			children,
		}
	}
}

impl<D> Drop for TreeNode<D> {
	fn drop(&mut self) {
		let mut pending = mem::take(&mut self.children);
		while let Some(mut node) = pending.pop() {
			pending.append(&mut node.children);
		}
	}
}

impl<D: Clone> Clone for TreeNode<D> {
	fn clone(&self) -> Self {
		let mut levels = vec![(None, self.children.iter(), TreeNodeList::with_capacity(self.children.len()))];
		let children = loop {
			let next = match levels.last_mut() {
				Some((_, pending, _)) => pending.next(),
				None => break Vec::new(),
			};

			if let Some(child) = next {
				levels.push((Some(child), child.children.iter(), TreeNodeList::with_capacity(child.children.len())));
				continue;
			}

			let (source, _, built) = match levels.pop() {
				Some(finished) => finished,
				None => break Vec::new(),
			};
			match (source, levels.last_mut()) {
				(Some(source), Some((_, _, parent_built))) => parent_built.push(source.with_children(built)),
				_ => break built,
			}
		};
		self.with_children(children)
	}
}

/// Pre-order with child counts identifies a tree's shape, so comparing node by node suffices.
impl<D: PartialEq> PartialEq for TreeNode<D> {
	fn eq(&self, other: &Self) -> bool {
		let mut a = walk::iter_depth_first(slice::from_ref(self));
		let mut b = walk::iter_depth_first(slice::from_ref(other));
		loop {
			match (a.next(), b.next()) {
				(None, None) => return true,
				(Some((_, a)), Some((_, b))) if a.same_node(b) => (),
				_ => return false,
			}
		}
	}
}
impl<D: Eq> Eq for TreeNode<D> {}

impl<D: Hash> Hash for TreeNode<D> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		for (_, node) in walk::iter_depth_first(slice::from_ref(self)) {
			node.item_id.hash(state);
			node.parent_id.hash(state);
			node.data.hash(state);
			node.children.len().hash(state);
		}
	}
}

/// Collects nodes into a [`FlatTreeMapping`], keyed by `item_id`.
///
/// Later duplicates replace earlier entries in place, keeping the first one's position.
pub fn to_mapping<D>(nodes: impl IntoIterator<Item = FlatNode<D>>) -> FlatTreeMapping<D> {
	nodes.into_iter().map(|node| (node.item_id.clone(), node)).collect()
}
