use tagmap_layout::{
    AutoLayoutOptions, Point, PositionedNode, RankDir, WorkspaceEdge, WorkspaceNode, auto_layout,
    auto_layout_routed,
};

fn edges(pairs: &[(&str, &str)]) -> Vec<WorkspaceEdge> {
    pairs
        .iter()
        .map(|&(s, t)| WorkspaceEdge::new(s, t))
        .collect()
}

fn position_of(out: &[PositionedNode], id: &str) -> Point {
    out.iter()
        .find(|n| n.id == id)
        .map(|n| n.position)
        .unwrap_or_else(|| panic!("missing node {id}"))
}

#[test]
fn chain_flows_left_to_right_with_pinned_root() {
    let nodes = vec![
        WorkspaceNode::root("a"),
        WorkspaceNode::new("b"),
        WorkspaceNode::new("c"),
    ];
    let out = auto_layout(
        &nodes,
        &edges(&[("a", "b"), ("b", "c")]),
        None,
        &AutoLayoutOptions::default(),
    );

    assert_eq!(
        out.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        ["a", "b", "c"]
    );
    assert_eq!(position_of(&out, "a"), Point::new(50.0, 0.0));
    assert_eq!(position_of(&out, "b"), Point::new(280.0, 0.0));
    assert_eq!(position_of(&out, "c"), Point::new(560.0, 0.0));
}

#[test]
fn parent_is_centered_on_its_children() {
    let nodes = vec![
        WorkspaceNode::new("root"),
        WorkspaceNode::new("a"),
        WorkspaceNode::new("b"),
    ];
    let out = auto_layout(
        &nodes,
        &edges(&[("root", "a"), ("root", "b")]),
        Some("root"),
        &AutoLayoutOptions::default(),
    );

    assert_eq!(position_of(&out, "root"), Point::new(50.0, 100.0));
    assert_eq!(position_of(&out, "a"), Point::new(280.0, 0.0));
    assert_eq!(position_of(&out, "b"), Point::new(280.0, 200.0));
}

#[test]
fn top_to_bottom_stacks_ranks_vertically() {
    let nodes = vec![
        WorkspaceNode::new("a"),
        WorkspaceNode::new("b"),
        WorkspaceNode::new("c"),
    ];
    let options = AutoLayoutOptions {
        rankdir: RankDir::TB,
        ..AutoLayoutOptions::default()
    };
    let out = auto_layout(&nodes, &edges(&[("a", "b"), ("b", "c")]), None, &options);

    assert_eq!(position_of(&out, "a"), Point::new(0.0, 0.0));
    assert_eq!(position_of(&out, "b"), Point::new(0.0, 220.0));
    assert_eq!(position_of(&out, "c"), Point::new(0.0, 440.0));
}

#[test]
fn cycles_are_laid_out_and_keep_their_direction() {
    let nodes = vec![
        WorkspaceNode::new("a"),
        WorkspaceNode::new("b"),
        WorkspaceNode::new("c"),
    ];
    let layout = auto_layout_routed(
        &nodes,
        &edges(&[("a", "b"), ("b", "c"), ("c", "a")]),
        None,
        &AutoLayoutOptions::default(),
    );

    let xs: Vec<f64> = ["a", "b", "c"]
        .iter()
        .map(|id| position_of(&layout.nodes, id).x)
        .collect();
    assert_eq!(xs, [0.0, 280.0, 560.0]);

    let back = layout
        .edges
        .iter()
        .find(|e| e.source == "c" && e.target == "a")
        .expect("back edge routed");
    let first = back.points.first().expect("points");
    let last = back.points.last().expect("points");
    assert!((560.0..=740.0).contains(&first.x), "starts on c: {first:?}");
    assert!((0.0..=180.0).contains(&last.x), "ends on a: {last:?}");
}

#[test]
fn long_edges_bend_through_intermediate_ranks() {
    let nodes = vec![
        WorkspaceNode::new("a"),
        WorkspaceNode::new("b"),
        WorkspaceNode::new("c"),
    ];
    let layout = auto_layout_routed(
        &nodes,
        &edges(&[("a", "b"), ("b", "c"), ("a", "c")]),
        None,
        &AutoLayoutOptions::default(),
    );

    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(layout.edges.len(), 3);
    let long = &layout.edges[2];
    assert_eq!((long.source.as_str(), long.target.as_str()), ("a", "c"));
    assert_eq!(long.points.len(), 3);
    assert!(long.points[1].x > 180.0 && long.points[1].x < 560.0);

    let short = &layout.edges[0];
    assert_eq!(short.points.len(), 2);
    assert_eq!(layout.width, 740.0);
}

#[test]
fn dangling_edges_and_self_loops_are_skipped() {
    let nodes = vec![WorkspaceNode::new("a"), WorkspaceNode::new("b")];
    let layout = auto_layout_routed(
        &nodes,
        &edges(&[("a", "b"), ("a", "ghost"), ("b", "b")]),
        None,
        &AutoLayoutOptions::default(),
    );

    assert_eq!(layout.nodes.len(), 2);
    assert_eq!(layout.edges.len(), 1);
    assert_eq!(position_of(&layout.nodes, "b"), Point::new(280.0, 0.0));
}

#[test]
fn empty_input_yields_empty_layout() {
    let layout = auto_layout_routed(&[], &[], None, &AutoLayoutOptions::default());
    assert!(layout.nodes.is_empty());
    assert!(layout.edges.is_empty());
    assert_eq!((layout.width, layout.height), (0.0, 0.0));
}

#[test]
fn layout_is_deterministic() {
    let nodes: Vec<WorkspaceNode> = ["r", "a", "b", "c", "d", "e"]
        .iter()
        .map(|id| WorkspaceNode::new(*id))
        .collect();
    let pairs = [
        ("r", "a"),
        ("r", "b"),
        ("a", "c"),
        ("b", "c"),
        ("b", "d"),
        ("a", "e"),
        ("e", "r"),
    ];
    let first = auto_layout(&nodes, &edges(&pairs), Some("r"), &AutoLayoutOptions::default());
    let second = auto_layout(&nodes, &edges(&pairs), Some("r"), &AutoLayoutOptions::default());
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
}

#[test]
fn options_deserialize_with_defaults() {
    let options: AutoLayoutOptions =
        serde_json::from_str(r#"{"rankdir":"TB","nodeSep":40}"#).unwrap();
    assert_eq!(options.rankdir, RankDir::TB);
    assert_eq!(options.node_sep, 40.0);
    assert_eq!(options.node_width, 180.0);
    assert_eq!(options.root_pin_x, 50.0);
}
