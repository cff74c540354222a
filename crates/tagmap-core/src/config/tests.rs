use super::*;
use serde_json::json;

#[test]
fn dotted_lookups_walk_nested_objects() {
    let cfg = MapConfig::from_value(json!({
        "generate": { "maxFirstLevel": 4, "label": "x" },
        "radial": { "corpusWedge": 1.5 }
    }));
    assert_eq!(cfg.get_usize("generate.maxFirstLevel"), Some(4));
    assert_eq!(cfg.get_f64("radial.corpusWedge"), Some(1.5));
    assert_eq!(cfg.get_f64("radial.missing"), None);
    assert_eq!(cfg.get_usize("generate.label"), None);
}

#[test]
fn get_usize_accepts_integral_floats_only() {
    let cfg = MapConfig::from_value(json!({ "a": 3.0, "b": 2.5, "c": -1 }));
    assert_eq!(cfg.get_usize("a"), Some(3));
    assert_eq!(cfg.get_usize("b"), None);
    assert_eq!(cfg.get_usize("c"), None);
}

#[test]
fn set_value_creates_intermediate_objects() {
    let mut cfg = MapConfig::from_value(json!("not an object"));
    cfg.set_value("generate.materialsPerTag", json!(2));
    assert_eq!(cfg.get_usize("generate.materialsPerTag"), Some(2));
}

#[test]
fn deep_merge_overrides_leaves_and_keeps_siblings() {
    let mut cfg = MapConfig::from_value(json!({
        "generate": { "maxFirstLevel": 4, "maxChildrenPerTag": 2 }
    }));
    cfg.deep_merge(&json!({ "generate": { "maxFirstLevel": 8 }, "radial": { "materialOffset": 90 } }));
    assert_eq!(cfg.get_usize("generate.maxFirstLevel"), Some(8));
    assert_eq!(cfg.get_usize("generate.maxChildrenPerTag"), Some(2));
    assert_eq!(cfg.get_f64("radial.materialOffset"), Some(90.0));
}

#[test]
fn later_layers_win_over_earlier_ones() {
    let mut cfg = MapConfig::empty_object();
    cfg.deep_merge(&json!({ "generate": { "maxFirstLevel": 3, "materialsPerTag": 1 } }));
    cfg.deep_merge(&json!({ "generate": { "maxFirstLevel": 6 } }));
    cfg.set_value("generate.maxFirstLevel", json!(2));
    let g = GenerationConfig::from_config(&cfg);
    assert_eq!(g.max_first_level, 2);
    assert_eq!(g.materials_per_tag, 1);
}

#[test]
fn generation_config_defaults_match_documented_constants() {
    let g = GenerationConfig::from_config(&MapConfig::default());
    assert_eq!(g, GenerationConfig::default());
    assert_eq!(g.max_first_level, 10);
    assert_eq!(g.max_children_per_tag, 5);
    assert_eq!(g.max_search_materials, 5);
    assert_eq!(g.materials_per_tag, 0);
    assert_eq!(g.radial.min_first_radius, 300.0);
    assert_eq!(g.radial.taxonomy_wedge, std::f64::consts::PI / 1.5);
}

#[test]
fn generation_config_ignores_negative_geometry() {
    let cfg = MapConfig::from_value(json!({
        "radial": { "corpusTagOffset": -10, "searchRowY": -300 }
    }));
    let g = GenerationConfig::from_config(&cfg);
    assert_eq!(g.radial.corpus_tag_offset, 200.0);
    assert_eq!(g.radial.search_row_y, -300.0);
}
