//! Turning flat nodes into nested levels.
//!
//! ```
//! use flattened_tree::{build_tree, FlatNode};
//!
//! let nodes = vec![
//! 	FlatNode::new("1", None, "root"),
//! 	FlatNode::new("2", Some("1"), "first"),
//! 	FlatNode::new("3", Some("1"), "second"),
//! 	FlatNode::new("4", Some("2"), "nested"),
//! ];
//!
//! let tree = build_tree(None, &nodes, None);
//! assert_eq!(tree.len(), 1);
//! assert_eq!(tree[0].children[0].item_id, "2");
//! assert_eq!(tree[0].children[0].children[0].item_id, "4");
//! assert!(tree[0].children[1].is_leaf());
//! ```

use crate::{
	child_index::ChildIndex,
	node::{FlatNode, FlatTreeMapping, TreeNode, TreeNodeList},
	report::{Anomaly, BuildReport},
	walk,
};
use core::{cmp::Ordering, fmt, slice};
use hashbrown::{hash_map::DefaultHashBuilder, HashSet};
use tracing::{debug, instrument, level_filters::STATIC_MAX_LEVEL, trace, warn, Level};

/// Reorders one level of siblings. Must return a permutation of its input.
pub type SortFn<'s, D> = dyn Fn(TreeNodeList<D>) -> TreeNodeList<D> + 's;

/// Builds the nested levels below `root_id`, which is the `parent_id` of top level nodes.
///
/// `nodes` is the scan order, which becomes the sibling order at each level unless `sort` is given.
/// `sort` is applied to every level, including the top level.
///
/// Orphans are dropped. Use [`TreeBuilder`] for other options or to get a [`BuildReport`].
#[must_use]
pub fn build_tree<D: Clone>(root_id: Option<&str>, nodes: &[FlatNode<D>], sort: Option<&SortFn<'_, D>>) -> TreeNodeList<D> {
	let mut builder = TreeBuilder::new(root_id);
	builder.sort = sort;
	builder.build(nodes)
}

/// As [`build_tree`], scanning `mapping` in insertion order.
#[must_use]
pub fn build_tree_from_mapping<D: Clone>(root_id: Option<&str>, mapping: &FlatTreeMapping<D>, sort: Option<&SortFn<'_, D>>) -> TreeNodeList<D> {
	let mut builder = TreeBuilder::new(root_id);
	builder.sort = sort;
	builder.build_mapping(mapping)
}

/// Adapts a comparator into a level sort for [`TreeBuilder::sort`] or [`build_tree`].
///
/// The sort is stable, so equal siblings keep their scan order.
pub fn sort_by<D>(compare: impl Fn(&TreeNode<D>, &TreeNode<D>) -> Ordering) -> impl Fn(TreeNodeList<D>) -> TreeNodeList<D> {
	move |mut level| {
		level.sort_by(&compare);
		level
	}
}

/// What to do with nodes whose `parent_id` matches neither the root id nor any item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrphanPolicy {
	/// Leave them, and everything below them, out of the tree.
	Drop,
	/// Place them at the top level, in scan order among the regular top level nodes.
	Promote,
}
impl Default for OrphanPolicy {
	fn default() -> Self {
		Self::Drop
	}
}

/// Configurable tree building.
///
/// # Malformed input
///
/// Nothing here fails:
///
/// - Orphans follow [`OrphanPolicy`].
/// - If several nodes share an `item_id`, the first one reached while building gets that id's children.
///   Later ones are placed as leaves under their own parent.
/// - Each id is expanded at most once, so parent cycles always terminate.
///   A cycle that doesn't hang off the top level is left out entirely.
/// - If the root id is also an item's id, nodes can be reached both at the top level and below that item.
///   Each node keeps only its first placement.
/// - A sort function that changes a level's length is used as-is.
///
/// Each of these is recorded in the [`BuildReport`] from [`build_with_report`](`TreeBuilder::build_with_report`).
pub struct TreeBuilder<'s, D> {
	root_id: Option<&'s str>,
	sort: Option<&'s SortFn<'s, D>>,
	orphans: OrphanPolicy,
}
impl<'s, D> fmt::Debug for TreeBuilder<'s, D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TreeBuilder")
			.field("root_id", &self.root_id)
			.field("sort", &self.sort.map(|_| "<function>"))
			.field("orphans", &self.orphans)
			.finish()
	}
}
impl<'s, D> Clone for TreeBuilder<'s, D> {
	fn clone(&self) -> Self {
		Self {
			root_id: self.root_id,
			sort: self.sort,
			orphans: self.orphans,
		}
	}
}

struct Frame<'i> {
	/// [`None`] for the top level.
	node: Option<usize>,
	pending: slice::Iter<'i, usize>,
}

impl<'s, D> TreeBuilder<'s, D> {
	#[must_use]
	pub fn new(root_id: Option<&'s str>) -> Self {
		Self {
			root_id,
			sort: None,
			orphans: OrphanPolicy::default(),
		}
	}

	#[must_use]
	pub fn sort(mut self, sort: &'s SortFn<'s, D>) -> Self {
		self.sort = Some(sort);
		self
	}

	#[must_use]
	pub fn orphans(mut self, policy: OrphanPolicy) -> Self {
		self.orphans = policy;
		self
	}

	#[must_use]
	pub fn root_id(&self) -> Option<&'s str> {
		self.root_id
	}
}
impl<'s, D: Clone> TreeBuilder<'s, D> {
	#[must_use]
	pub fn build(&self, nodes: &[FlatNode<D>]) -> TreeNodeList<D> {
		self.build_with_report(nodes).0
	}

	#[must_use]
	pub fn build_mapping(&self, mapping: &FlatTreeMapping<D>) -> TreeNodeList<D> {
		self.build_mapping_with_report(mapping).0
	}

	#[must_use]
	pub fn build_with_report(&self, nodes: &[FlatNode<D>]) -> (TreeNodeList<D>, BuildReport) {
		self.build_refs(&nodes.iter().collect::<Vec<_>>())
	}

	#[must_use]
	pub fn build_mapping_with_report(&self, mapping: &FlatTreeMapping<D>) -> (TreeNodeList<D>, BuildReport) {
		self.build_refs(&mapping.values().collect::<Vec<_>>())
	}

	#[instrument(skip(self, nodes), fields(nodes = nodes.len(), orphans = ?self.orphans, sorted = self.sort.is_some()))]
	fn build_refs(&self, nodes: &[&FlatNode<D>]) -> (TreeNodeList<D>, BuildReport) {
		let index = ChildIndex::<DefaultHashBuilder>::from_nodes(nodes);
		let mut report = BuildReport::default();

		let mut top = Vec::new();
		for (i, &node) in nodes.iter().enumerate() {
			if node.parent_id() == self.root_id {
				top.push(i);
			} else if node.parent_id().map_or(true, |parent_id| !index.contains_item(parent_id)) {
				log_anomaly(i, Anomaly::Orphan {
					item_id: node.item_id.clone(),
					parent_id: node.parent_id.clone(),
				}, &mut report);
				if self.orphans == OrphanPolicy::Promote {
					top.push(i);
				}
			}
		}

		let mut reached = vec![false; nodes.len()];
		let mut claimed = HashSet::with_capacity(index.len());
		let mut levels = vec![(
			Frame {
				node: None,
				pending: top.iter(),
			},
			TreeNodeList::with_capacity(top.len()),
		)];

		let tree = loop {
			let next = match levels.last_mut() {
				Some((frame, _)) => frame.pending.next().copied(),
				None => break Vec::new(),
			};

			if let Some(i) = next {
				let node = nodes[i];
				if reached[i] {
					log_anomaly(i, Anomaly::Revisited { item_id: node.item_id.clone() }, &mut report);
					continue;
				}
				reached[i] = true;
				if claimed.insert(node.item_id.as_str()) {
					let children = index.children_of(&node.item_id);
					if cfg!(feature = "dangerous-logging") {
						trace!(position = i, item_id = %node.item_id, children = children.len(), "Expanding item.");
					} else {
						trace!(position = i, children = children.len(), "Expanding item.");
					}
					levels.push((
						Frame {
							node: Some(i),
							pending: children.iter(),
						},
						TreeNodeList::with_capacity(children.len()),
					));
				} else {
					log_anomaly(i, Anomaly::DuplicateId { item_id: node.item_id.clone() }, &mut report);
					if let Some((_, built)) = levels.last_mut() {
						built.push(TreeNode::leaf(node.clone()));
					}
				}
				continue;
			}

			let (frame, built) = match levels.pop() {
				Some(finished) => finished,
				None => break Vec::new(),
			};
			let built = self.arrange(built, &mut report);
			match (frame.node, levels.last_mut()) {
				(Some(i), Some((_, parent_built))) => parent_built.push(TreeNode::new(nodes[i].clone(), built)),
				_ => break built,
			}
		};

		for (i, &node) in nodes.iter().enumerate() {
			if !reached[i] && node.parent_id().map_or(false, |parent_id| index.contains_item(parent_id)) {
				log_anomaly(i, Anomaly::Unreachable { item_id: node.item_id.clone() }, &mut report);
			}
		}

		report.placed = walk::count(&tree);
		debug!(placed = report.placed, top_level = tree.len(), anomalies = report.anomalies.len(), "Built tree.");
		(tree, report)
	}

	fn arrange(&self, level: TreeNodeList<D>, report: &mut BuildReport) -> TreeNodeList<D> {
		let sort = match self.sort {
			Some(sort) => sort,
			None => return level,
		};

		let before = level.len();
		let sorted = sort(level);
		if sorted.len() != before {
			if STATIC_MAX_LEVEL >= Level::WARN {
				warn!(before, after = sorted.len(), "Sort function changed the number of siblings. Using its output anyway.");
			}
			report.anomalies.push(Anomaly::SortChangedLength { before, after: sorted.len() });
		}
		sorted
	}
}

fn log_anomaly(position: usize, anomaly: Anomaly, report: &mut BuildReport) {
	if STATIC_MAX_LEVEL >= Level::WARN {
		if cfg!(feature = "dangerous-logging") {
			warn!(position, "{}", anomaly);
		} else {
			let kind = match anomaly {
				Anomaly::Orphan { .. } => "orphan",
				Anomaly::DuplicateId { .. } => "duplicate id",
				Anomaly::Revisited { .. } => "revisited",
				Anomaly::Unreachable { .. } => "unreachable",
				Anomaly::SortChangedLength { .. } => "sort changed length",
			};
			warn!(position, kind, "Item placed by fallback.");
		}
	}
	report.anomalies.push(anomaly);
}
