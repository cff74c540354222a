use super::*;
use crate::model::{NodeKind, Point};
use std::f64::consts::PI;

fn build(materials: &[Material], focus: &Focus) -> TagMindMap {
    build_tag_mind_map(materials, &[], focus, &GenerationConfig::default())
}

fn assert_close(actual: Point, x: f64, y: f64) {
    assert!(
        (actual.x - x).abs() < 1e-6 && (actual.y - y).abs() < 1e-6,
        "expected ({x}, {y}), got ({}, {})",
        actual.x,
        actual.y
    );
}

fn ids(map: &TagMindMap) -> Vec<&str> {
    map.nodes.iter().map(|n| n.id.as_str()).collect()
}

fn frontend_forest() -> Vec<TagCategory> {
    vec![
        TagCategory::leaf("fe", "Frontend").with_children(vec![
            TagCategory::leaf("js", "JavaScript").with_children(vec![
                TagCategory::leaf("react", "React")
                    .with_children(vec![TagCategory::leaf("hooks", "Hooks")]),
                TagCategory::leaf("vue", "Vue"),
            ]),
            TagCategory::leaf("css", "CSS"),
        ]),
        TagCategory::leaf("be", "Backend"),
    ]
}

#[test]
fn web_js_css_corpus_yields_three_nodes_and_two_dashed_edges() {
    let materials = vec![
        Material::new("X", ["web", "js"]),
        Material::new("Y", ["web", "css"]),
    ];
    let map = build(&materials, &Focus::None);

    assert_eq!(map.mode, BuildMode::Corpus);
    assert_eq!(map.central_label, "web");
    assert_eq!(ids(&map), ["central", "tag-0", "tag-1"]);
    assert_eq!(map.nodes[1].label, "js");
    assert_eq!(map.nodes[2].label, "css");
    assert_eq!(map.nodes[0].kind, NodeKind::Central);

    assert_eq!(map.edges.len(), 2);
    for edge in &map.edges {
        assert_eq!(edge.level, 1);
        assert_eq!(edge.source_id, "central");
        assert!(edge.style_hints.dashed);
        assert_eq!(edge.style_hints.stroke_width, 6.0);
        assert_eq!(edge.style_hints.emphasis, 1.0);
    }
    assert_eq!(map.edges[0].id, "edge-central-tag-0");

    assert_close(map.nodes[0].position, 0.0, 0.0);
    assert_close(map.nodes[1].position, 300.0, 0.0);
    assert_close(map.nodes[2].position, -300.0, 0.0);
}

#[test]
fn central_is_the_most_frequent_tag() {
    let materials = vec![
        Material::new("m1", ["A", "B"]),
        Material::new("m2", ["A", "C"]),
        Material::new("m3", ["A"]),
    ];
    let map = build(&materials, &Focus::None);
    assert_eq!(map.central_label, "A");
    assert_eq!(map.nodes[0].attached_materials.len(), 3);
    assert_eq!(map.nodes[0].full_path, ["A"]);
}

#[test]
fn ties_go_to_the_first_encountered_tag() {
    let materials = vec![Material::new("m1", ["B", "A"]), Material::new("m2", ["A", "B"])];
    assert_eq!(build(&materials, &Focus::None).central_label, "B");
}

#[test]
fn selected_corpus_tag_overrides_frequency() {
    let materials = vec![
        Material::new("m1", ["A", "B"]),
        Material::new("m2", ["A", "C"]),
    ];
    let map = build(&materials, &Focus::selected("C"));
    assert_eq!(map.mode, BuildMode::Corpus);
    assert_eq!(map.central_label, "C");
    assert_eq!(map.nodes[1].label, "A");
    // B hangs under A because C itself never co-occurs with B.
    assert_eq!(map.nodes[2].label, "B");
    assert_eq!(map.nodes[2].full_path, ["C", "A", "B"]);
}

#[test]
fn second_level_tags_are_not_repeated_across_parents() {
    let materials = vec![
        Material::new("m1", ["A", "F1"]),
        Material::new("m2", ["A", "F2"]),
        Material::new("m3", ["F1", "X"]),
        Material::new("m4", ["F2", "X"]),
        Material::new("m5", ["A"]),
    ];
    let map = build(&materials, &Focus::None);

    assert_eq!(ids(&map), ["central", "tag-0", "tag-1", "tag-0-0"]);
    let x = map.node("tag-0-0").unwrap();
    assert_eq!(x.label, "X");
    assert_eq!(x.level, 2);
    assert_eq!(x.full_path, ["A", "F1", "X"]);
    assert_eq!(
        x.attached_materials
            .iter()
            .map(|m| m.title.as_str())
            .collect::<Vec<_>>(),
        ["m3", "m4"]
    );
    assert_close(x.position, 500.0, 0.0);

    let edge = map.edges.iter().find(|e| e.target_id == "tag-0-0").unwrap();
    assert_eq!(edge.source_id, "tag-0");
    assert!(!edge.style_hints.dashed);
    assert_eq!(edge.style_hints.stroke_width, 5.5);
    assert!((edge.style_hints.emphasis - 0.9).abs() < 1e-9);

    let labels: Vec<&str> = map.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels.iter().filter(|l| **l == "X").count(), 1);
}

#[test]
fn generation_is_deterministic() {
    let materials = vec![
        Material::new("m1", ["rust", "async", "tokio"]),
        Material::new("m2", ["rust", "serde"]),
        Material::new("m3", ["serde", "json", "async"]),
    ];
    let focus = Focus::query("rust");
    assert_eq!(build(&materials, &focus), build(&materials, &focus));
}

#[test]
fn fan_out_caps_limit_each_level() {
    let mut tags = vec!["C".to_string()];
    tags.extend((0..12).map(|i| format!("t{i}")));
    let materials = vec![Material::new("m", tags)];

    let map = build(&materials, &Focus::None);
    let first = map.nodes.iter().filter(|n| n.level == 1).count();
    let second: Vec<&str> = map
        .nodes
        .iter()
        .filter(|n| n.level == 2)
        .map(|n| n.label.as_str())
        .collect();
    assert_eq!(first, 10);
    assert_eq!(second, ["t10", "t11"]);
    assert!(map.nodes.iter().all(|n| n.level <= 2));

    let config = GenerationConfig {
        max_first_level: 3,
        max_children_per_tag: 1,
        ..GenerationConfig::default()
    };
    let small = build_tag_mind_map(&materials, &[], &Focus::None, &config);
    let labels: Vec<&str> = small.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, ["C", "t0", "t1", "t2", "t3", "t4", "t5"]);
}

#[test]
fn first_ring_radius_grows_with_sibling_count() {
    let mut tags = vec!["C".to_string()];
    tags.extend((0..8).map(|i| format!("t{i}")));
    let map = build(&[Material::new("m", tags)], &Focus::None);
    // 8 siblings * 60 = 480 > 300
    assert_close(map.nodes[1].position, 480.0, 0.0);
    assert_close(map.nodes[3].position, 0.0, 480.0);
}

#[test]
fn query_attaches_search_material_leaves_in_a_row() {
    let materials = vec![
        Material::new("Rust book", ["rust", "systems"]),
        Material::new("Rustlings", ["rust"]),
        Material::new("Go tour", ["go"]),
    ];
    let map = build(&materials, &Focus::query("RUST"));

    let leaves: Vec<_> = map
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Material)
        .collect();
    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[0].id, "search-0");
    assert_eq!(leaves[0].label, "Rust book");
    assert_eq!(leaves[0].level, 1);
    assert_eq!(leaves[0].attached_materials, [materials[0].clone()]);
    assert_close(leaves[0].position, -220.0, 300.0);
    assert_close(leaves[1].position, 0.0, 300.0);

    let edge = map.edges.iter().find(|e| e.target_id == "search-1").unwrap();
    assert!(edge.style_hints.dashed);
}

#[test]
fn search_leaves_respect_their_cap() {
    let materials: Vec<Material> = (0..8)
        .map(|i| Material::new(format!("note {i}"), ["misc"]))
        .collect();
    let map = build(&materials, &Focus::query("note"));
    let leaves = map
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Material)
        .count();
    assert_eq!(leaves, 5);
}

#[test]
fn materials_per_tag_adds_leaves_under_childless_tags() {
    let materials = vec![
        Material::new("X", ["web", "js"]),
        Material::new("Y", ["web", "css"]),
    ];
    let config = GenerationConfig {
        materials_per_tag: 1,
        ..GenerationConfig::default()
    };
    let map = build_tag_mind_map(&materials, &[], &Focus::None, &config);

    assert_eq!(
        ids(&map),
        ["central", "tag-0", "tag-1", "material-0-0", "material-1-0"]
    );
    let leaf = map.node("material-0-0").unwrap();
    assert_eq!(leaf.kind, NodeKind::Material);
    assert_eq!(leaf.label, "X");
    assert_eq!(leaf.level, 2);
    assert_eq!(leaf.full_path, ["web", "js", "X"]);
    assert_close(leaf.position, 450.0, 0.0);
}

#[test]
fn selected_taxonomy_category_drives_the_levels() {
    let forest = frontend_forest();
    let map = build_tag_mind_map(
        &[],
        &forest,
        &Focus::selected("Frontend"),
        &GenerationConfig::default(),
    );

    assert_eq!(map.mode, BuildMode::Taxonomy);
    assert_eq!(map.central_label, "Frontend");
    let labels: Vec<(&str, u32)> = map
        .nodes
        .iter()
        .map(|n| (n.label.as_str(), n.level))
        .collect();
    assert_eq!(
        labels,
        [
            ("Frontend", 0),
            ("JavaScript", 1),
            ("CSS", 1),
            ("React", 2),
            ("Vue", 2),
            ("Hooks", 3),
        ]
    );

    let js = map.node("tag-0").unwrap();
    assert_close(js.position, 300.0, 0.0);

    let wedge = PI / 1.5;
    let react_angle = -wedge / 2.0;
    let react = map.node("tag-0-0").unwrap();
    let (rx, ry) = (300.0 + 220.0 * react_angle.cos(), 220.0 * react_angle.sin());
    assert_close(react.position, rx, ry);
    assert_eq!(react.full_path, ["Frontend", "JavaScript", "React"]);

    let vue = map.node("tag-0-1").unwrap();
    assert_close(
        vue.position,
        300.0 + 220.0 * (wedge / 2.0).cos(),
        220.0 * (wedge / 2.0).sin(),
    );

    let hooks = map.node("tag-0-0-0").unwrap();
    assert_close(
        hooks.position,
        rx + 180.0 * react_angle.cos(),
        ry + 180.0 * react_angle.sin(),
    );
}

#[test]
fn query_matches_taxonomy_case_insensitively() {
    let forest = frontend_forest();
    let materials = vec![
        Material::new("Vue guide", ["Vue"]),
        Material::new("CSS tricks", ["CSS"]),
    ];
    let map = build_tag_mind_map(
        &materials,
        &forest,
        &Focus::query("vu"),
        &GenerationConfig::default(),
    );

    assert_eq!(map.mode, BuildMode::Taxonomy);
    assert_eq!(map.central_label, "Vue");
    assert_eq!(map.nodes[0].full_path, ["Frontend", "JavaScript", "Vue"]);
    assert_eq!(map.nodes[0].attached_materials.len(), 1);
    assert_eq!(ids(&map), ["central", "search-0"]);
    assert_close(map.nodes[1].position, 0.0, 300.0);
}

#[test]
fn unknown_taxonomy_label_falls_back_to_corpus_mode() {
    let forest = frontend_forest();
    let materials = vec![Material::new("m", ["web", "js"])];
    let map = build_tag_mind_map(
        &materials,
        &forest,
        &Focus::selected("Databases"),
        &GenerationConfig::default(),
    );
    assert_eq!(map.mode, BuildMode::Corpus);
    assert_eq!(map.central_label, "web");
}

#[test]
fn empty_input_degrades_to_a_lone_central_node() {
    let map = build(&[], &Focus::None);
    assert_eq!(map.mode, BuildMode::Empty);
    assert_eq!(map.nodes.len(), 1);
    assert!(map.edges.is_empty());
    assert_eq!(map.central_label, "");
    assert_eq!(map.clone().require_content(), Err(Error::EmptyInput));

    let named = build(&[], &Focus::selected("ghost"));
    assert_eq!(named.central_label, "ghost");
    assert_eq!(named.mode, BuildMode::Empty);
}

#[test]
fn require_content_passes_populated_maps_through() {
    let materials = vec![Material::new("m", ["a", "b"])];
    let map = build(&materials, &Focus::None);
    assert_eq!(map.clone().require_content(), Ok(map));
}

#[test]
fn edge_style_bottoms_out() {
    let shallow = edge_style(1, true);
    assert_eq!(shallow.stroke_width, 6.0);
    assert!(shallow.dashed);

    let deep = edge_style(20, false);
    assert_eq!(deep.stroke_width, 2.0);
    assert_eq!(deep.emphasis, 0.6);
    assert!(!deep.dashed);
}

#[test]
fn focus_serializes_with_kind_tag() {
    let json = serde_json::to_value(Focus::query("rust")).unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "query", "value": "rust" }));
    let back: Focus = serde_json::from_value(json).unwrap();
    assert_eq!(back.query_text(), Some("rust"));
}
