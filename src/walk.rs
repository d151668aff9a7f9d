//! Read-only traversal of built trees.

use crate::node::TreeNode;
use core::slice;

/// Total number of nodes across all levels.
#[must_use]
pub fn count<D>(level: &[TreeNode<D>]) -> usize {
	iter_depth_first(level).count()
}

/// Pre-order traversal, yielding each node with its depth (0 for the given level).
///
/// Doesn't recurse, so arbitrarily deep trees are fine.
pub fn iter_depth_first<D>(level: &[TreeNode<D>]) -> DepthFirst<'_, D> {
	DepthFirst { stack: vec![level.iter()] }
}

/// Finds the first node with `item_id` in pre-order.
#[must_use]
pub fn find<'a, D>(level: &'a [TreeNode<D>], item_id: &str) -> Option<&'a TreeNode<D>> {
	iter_depth_first(level).map(|(_, node)| node).find(|node| node.item_id == item_id)
}

/// See [`iter_depth_first`].
#[derive(Debug, Clone)]
pub struct DepthFirst<'a, D> {
	stack: Vec<slice::Iter<'a, TreeNode<D>>>,
}
impl<'a, D> Iterator for DepthFirst<'a, D> {
	type Item = (usize, &'a TreeNode<D>);

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let depth = self.stack.len().checked_sub(1)?;
			match self.stack.last_mut()?.next() {
				Some(node) => {
					if !node.children.is_empty() {
						self.stack.push(node.children.iter());
					}
					return Some((depth, node));
				}
				None => {
					self.stack.pop();
				}
			}
		}
	}
}
