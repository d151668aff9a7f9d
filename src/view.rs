//! Caller-side memoization for tree views that render from a shared flat mapping.
//!
//! ```
//! use flattened_tree::{node::to_mapping, FlatNode, FlattenedTreeView};
//! use std::rc::Rc;
//!
//! let data = Rc::new(to_mapping(vec![
//! 	FlatNode::new("1", None, ()),
//! 	FlatNode::new("2", Some("1"), ()),
//! ]));
//! let mut view = FlattenedTreeView::new(Rc::clone(&data));
//!
//! let first = view.tree();
//! assert_eq!(first[0].children[0].item_id, "2");
//!
//! // Same mapping instance: nothing is rebuilt.
//! view.set_data(Rc::clone(&data));
//! assert!(Rc::ptr_eq(&first, &view.tree()));
//! ```

use crate::{
	build::{SortFn, TreeBuilder},
	node::{FlatTreeMapping, TreeNodeList},
	OrphanPolicy,
};
use core::{cell::RefCell, fmt};
use std::rc::Rc;
use tracing::{debug, trace};

/// Holds a flat mapping and the tree built from it, rebuilding only when an input changes.
///
/// Changes are detected by identity: a different [`Rc`] for the data or sort function, or a different root id.
/// Mutating a mapping in place behind the same [`Rc`] is not detected. Swap in a new [`Rc`] instead.
pub struct FlattenedTreeView<D> {
	data: Rc<FlatTreeMapping<D>>,
	root_id: Option<String>,
	sort: Option<Rc<SortFn<'static, D>>>,
	orphans: OrphanPolicy,
	cache: RefCell<Option<Rc<TreeNodeList<D>>>>,
}
impl<D: fmt::Debug> fmt::Debug for FlattenedTreeView<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlattenedTreeView")
			.field("data", &self.data)
			.field("root_id", &self.root_id)
			.field("sort", &self.sort.as_ref().map(|_| "<function>"))
			.field("orphans", &self.orphans)
			.field("cached", &self.cache.borrow().is_some())
			.finish()
	}
}

impl<D> FlattenedTreeView<D> {
	/// A view with [`None`] as root id, no sort and dropped orphans.
	#[must_use]
	pub fn new(data: Rc<FlatTreeMapping<D>>) -> Self {
		Self {
			data,
			root_id: None,
			sort: None,
			orphans: OrphanPolicy::Drop,
			cache: RefCell::new(None),
		}
	}

	#[must_use]
	pub fn with_root_id(mut self, root_id: Option<&str>) -> Self {
		self.set_root_id(root_id);
		self
	}

	#[must_use]
	pub fn with_sort(mut self, sort: Rc<SortFn<'static, D>>) -> Self {
		self.set_sort(Some(sort));
		self
	}

	#[must_use]
	pub fn with_orphans(mut self, orphans: OrphanPolicy) -> Self {
		self.set_orphans(orphans);
		self
	}

	#[must_use]
	pub fn data(&self) -> &Rc<FlatTreeMapping<D>> {
		&self.data
	}

	pub fn set_data(&mut self, data: Rc<FlatTreeMapping<D>>) {
		if !Rc::ptr_eq(&self.data, &data) {
			self.data = data;
			self.invalidate("data");
		}
	}

	pub fn set_root_id(&mut self, root_id: Option<&str>) {
		if self.root_id.as_deref() != root_id {
			self.root_id = root_id.map(Into::into);
			self.invalidate("root id");
		}
	}

	pub fn set_sort(&mut self, sort: Option<Rc<SortFn<'static, D>>>) {
		let same = match (&self.sort, &sort) {
			(Some(a), Some(b)) => Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>(),
			(None, None) => true,
			_ => false,
		};
		if !same {
			self.sort = sort;
			self.invalidate("sort");
		}
	}

	pub fn set_orphans(&mut self, orphans: OrphanPolicy) {
		if self.orphans != orphans {
			self.orphans = orphans;
			self.invalidate("orphan policy");
		}
	}

	fn invalidate(&mut self, reason: &'static str) {
		if self.cache.get_mut().take().is_some() {
			trace!(reason, "Invalidated cached tree.");
		}
	}
}
impl<D: Clone> FlattenedTreeView<D> {
	/// The current tree, built on first access after a change.
	#[must_use]
	pub fn tree(&self) -> Rc<TreeNodeList<D>> {
		if let Some(tree) = &*self.cache.borrow() {
			return Rc::clone(tree);
		}

		let mut builder = TreeBuilder::new(self.root_id.as_deref()).orphans(self.orphans);
		if let Some(sort) = &self.sort {
			builder = builder.sort(&**sort);
		}
		let tree = Rc::new(builder.build_mapping(&self.data));
		debug!(items = self.data.len(), top_level = tree.len(), "Rebuilt flattened tree view.");
		*self.cache.borrow_mut() = Some(Rc::clone(&tree));
		tree
	}

	/// Hands the current tree to `render`, which is where a tree view component would take over.
	pub fn render<R>(&self, render: impl FnOnce(&TreeNodeList<D>) -> R) -> R {
		render(&self.tree())
	}
}
