//! Builds nested trees from flat, parent-id keyed node collections.
//!
//! The input is a list (or [`FlatTreeMapping`]) of [`FlatNode`]s, each naming its parent by id.
//! The output is a [`TreeNodeList`] in which every node directly contains its children,
//! which is the shape hierarchical tree views render from.
//!
//! Malformed input never fails: see [`TreeBuilder`] for how orphans, duplicate ids and cycles are placed,
//! and [`BuildReport`] to find out whether any of that happened.

#![doc(html_root_url = "https://docs.rs/flattened-tree/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod build;
mod child_index;
pub mod node;
pub mod report;
pub mod view;
pub mod walk;

pub use build::{build_tree, build_tree_from_mapping, sort_by, OrphanPolicy, TreeBuilder};
pub use node::{FlatNode, FlatTreeMapping, TreeNode, TreeNodeList};
pub use report::{Anomaly, BuildReport};
pub use view::FlattenedTreeView;
