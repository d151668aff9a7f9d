use flattened_tree::{
	build_tree, build_tree_from_mapping,
	build::SortFn,
	node::to_mapping,
	sort_by,
	walk::{self, find},
	Anomaly, FlatNode, OrphanPolicy, TreeBuilder, TreeNode, TreeNodeList,
};


fn ids<D>(level: &[TreeNode<D>]) -> Vec<&str> {
	level.iter().map(|node| node.item_id.as_str()).collect()
}

fn scenario() -> Vec<FlatNode<&'static str>> {
	vec![
		FlatNode::new("1", None, "one"),
		FlatNode::new("2", Some("1"), "two"),
		FlatNode::new("3", Some("1"), "three"),
		FlatNode::new("4", Some("2"), "four"),
	]
}

#[test]
fn nested_scenario() {
	logging_::init();

	let tree = build_tree(None, &scenario(), None);
	assert_eq!(ids(&tree), ["1"]);
	assert_eq!(ids(&tree[0].children), ["2", "3"]);
	assert_eq!(ids(&tree[0].children[0].children), ["4"]);
	assert!(tree[0].children[1].is_leaf());
	assert_eq!(tree[0].children[0].data, "two");
	assert_eq!(tree[0].children[0].parent_id(), Some("1"));
}

#[test]
fn mapping_scan_order() {
	logging_::init();

	let mapping = to_mapping(vec![
		FlatNode::new("3", Some("1"), ()),
		FlatNode::new("1", None, ()),
		FlatNode::new("2", Some("1"), ()),
	]);
	let tree = build_tree_from_mapping(None, &mapping, None);
	assert_eq!(ids(&tree[0].children), ["3", "2"]);
}

#[test]
fn input_untouched() {
	let nodes = scenario();
	let before = nodes.clone();
	let _ = build_tree(None, &nodes, None);
	assert_eq!(nodes, before);
}

#[test]
fn sort_every_level() {
	logging_::init();

	let nodes = vec![
		FlatNode::new("b", None, 2),
		FlatNode::new("a", None, 1),
		FlatNode::new("b2", Some("b"), 20),
		FlatNode::new("b1", Some("b"), 10),
		FlatNode::new("b12", Some("b1"), 12),
		FlatNode::new("b11", Some("b1"), 11),
	];
	let by_data: &SortFn<'_, i32> = &sort_by(|a: &TreeNode<i32>, b: &TreeNode<i32>| a.data.cmp(&b.data));
	let tree = build_tree(None, &nodes, Some(by_data));
	assert_eq!(ids(&tree), ["a", "b"]);
	assert_eq!(ids(&tree[1].children), ["b1", "b2"]);
	assert_eq!(ids(&tree[1].children[0].children), ["b11", "b12"]);
}

#[test]
fn sort_sees_unsorted_built_levels() {
	let nodes = scenario();
	let seen = std::cell::RefCell::new(Vec::new());
	let record = |level: TreeNodeList<&'static str>| -> TreeNodeList<&'static str> {
		seen.borrow_mut().push(level.iter().map(|node| node.item_id.clone()).collect::<Vec<_>>());
		level.into_iter().rev().collect()
	};
	let sort: &SortFn<'_, &'static str> = &record;
	let tree = build_tree(None, &nodes, Some(sort));

	// Children are finished (and sorted) before their parent level.
	assert_eq!(*seen.borrow(), [vec![], vec!["4"], vec![], vec!["2", "3"], vec!["1"]]);
	assert_eq!(ids(&tree[0].children), ["3", "2"]);
}

#[test]
fn orphans_dropped_by_default() {
	logging_::init();

	let mut nodes = scenario();
	nodes.push(FlatNode::new("5", Some("missing"), "five"));
	nodes.push(FlatNode::new("6", Some("5"), "six"));

	let (tree, report) = TreeBuilder::new(None).build_with_report(&nodes);
	assert_eq!(walk::count(&tree), 4);
	assert!(find(&tree, "5").is_none());
	assert!(find(&tree, "6").is_none());
	assert_eq!(
		report.anomalies,
		[
			Anomaly::Orphan {
				item_id: "5".to_owned(),
				parent_id: Some("missing".to_owned()),
			},
			Anomaly::Unreachable { item_id: "6".to_owned() },
		]
	);
}

#[test]
fn orphans_promoted() {
	logging_::init();

	let mut nodes = scenario();
	nodes.insert(1, FlatNode::new("5", Some("missing"), "five"));
	nodes.push(FlatNode::new("6", Some("5"), "six"));

	let (tree, report) = TreeBuilder::new(None).orphans(OrphanPolicy::Promote).build_with_report(&nodes);
	assert_eq!(ids(&tree), ["1", "5"]);
	assert_eq!(ids(&tree[1].children), ["6"]);
	assert_eq!(report.placed, nodes.len());
	assert_eq!(report.orphans().collect::<Vec<_>>(), ["5"]);
}

#[test]
fn two_cycle_terminates() {
	logging_::init();

	let nodes = vec![FlatNode::new("A", Some("B"), ()), FlatNode::new("B", Some("A"), ())];
	let tree = build_tree(None, &nodes, None);
	assert!(tree.is_empty());
}

#[test]
fn self_parent_terminates() {
	let nodes = vec![FlatNode::new("root", None, ()), FlatNode::new("A", Some("A"), ())];
	let (tree, report) = TreeBuilder::new(None).build_with_report(&nodes);
	assert_eq!(ids(&tree), ["root"]);
	assert_eq!(report.anomalies, [Anomaly::Unreachable { item_id: "A".to_owned() }]);
}

#[test]
fn cycle_through_duplicate_id_terminates() {
	logging_::init();

	// "x" is reachable from the top level and again below itself.
	let nodes = vec![
		FlatNode::new("x", None, 0),
		FlatNode::new("y", Some("x"), 1),
		FlatNode::new("x", Some("y"), 2),
		FlatNode::new("z", Some("x"), 3),
	];
	let (tree, report) = TreeBuilder::new(None).build_with_report(&nodes);
	assert_eq!(ids(&tree), ["x"]);
	assert_eq!(ids(&tree[0].children), ["y", "z"]);
	assert_eq!(ids(&tree[0].children[0].children), ["x"]);
	assert!(tree[0].children[0].children[0].is_leaf());
	assert_eq!(report.placed, 4);
	assert_eq!(report.anomalies, [Anomaly::DuplicateId { item_id: "x".to_owned() }]);
}

#[test]
fn cycle_through_root_named_item() {
	logging_::init();

	let nodes = vec![FlatNode::new("a", Some("r"), ()), FlatNode::new("r", Some("a"), ())];
	let (tree, report) = TreeBuilder::new(Some("r")).build_with_report(&nodes);
	assert_eq!(ids(&tree), ["a"]);
	assert_eq!(ids(&tree[0].children), ["r"]);
	assert!(tree[0].children[0].is_leaf());
	assert_eq!(report.placed, 2);
	assert_eq!(report.anomalies, [Anomaly::Revisited { item_id: "a".to_owned() }]);
}

#[test]
fn promoted_root_named_item_keeps_first_placement() {
	// "r" has no parent, so it's an orphan under the root id "r", while "a" is a top level node.
	let nodes = vec![FlatNode::new("a", Some("r"), ()), FlatNode::new("r", None, ())];
	let (tree, report) = TreeBuilder::new(Some("r")).orphans(OrphanPolicy::Promote).build_with_report(&nodes);
	assert_eq!(ids(&tree), ["a", "r"]);
	assert!(tree[1].is_leaf());
	assert_eq!(report.placed, 2);
	assert_eq!(
		report.anomalies,
		[
			Anomaly::Orphan {
				item_id: "r".to_owned(),
				parent_id: None,
			},
			Anomaly::Revisited { item_id: "a".to_owned() },
		]
	);
}

#[test]
fn deep_chain() {
	const DEPTH: usize = 100_000;

	let nodes: Vec<_> = (0..DEPTH)
		.map(|i| {
			let parent = i.checked_sub(1).map(|parent| parent.to_string());
			FlatNode::new(i.to_string(), parent.as_deref(), ())
		})
		.collect();
	let tree = build_tree(None, &nodes, None);
	assert_eq!(walk::count(&tree), DEPTH);
	let deepest = walk::iter_depth_first(&tree).last().map(|(depth, node)| (depth, node.item_id.clone()));
	assert_eq!(deepest, Some((DEPTH - 1, (DEPTH - 1).to_string())));

	let copy = tree.clone();
	assert!(copy == tree);
	drop(copy);
}
