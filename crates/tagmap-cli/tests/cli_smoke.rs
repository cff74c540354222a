use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(rel: &str) -> String {
    let path = repo_root().join("fixtures").join(rel);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path.to_string_lossy().to_string()
}

fn run(args: &[&str]) -> Output {
    let exe = assert_cmd::cargo_bin!("tagmap-cli");
    Command::new(exe)
        .current_dir(repo_root())
        .env_remove("TAGMAP_LOG")
        .args(args)
        .output()
        .expect("spawn tagmap-cli")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn generate_builds_the_corpus_map() {
    let out = stdout_json(&run(&["generate", &fixture("corpus/web.json")]));

    assert_eq!(out["mode"], "corpus");
    assert_eq!(out["centralLabel"], "web");
    assert_eq!(out["nodes"].as_array().map(Vec::len), Some(8));
    assert_eq!(out["edges"].as_array().map(Vec::len), Some(7));
}

#[test]
fn generate_honours_config_and_selection() {
    let out = stdout_json(&run(&[
        "generate",
        "--select",
        "css",
        "--config",
        &fixture("config/compact.json"),
        &fixture("corpus/web.json"),
    ]));
    assert_eq!(out["centralLabel"], "css");
}

fn first_level_tags(out: &serde_json::Value) -> usize {
    out["nodes"]
        .as_array()
        .map(|nodes| {
            nodes
                .iter()
                .filter(|n| n["level"] == 1 && n["kind"] == "tag")
                .count()
        })
        .unwrap_or(0)
}

#[test]
fn config_layers_merge_in_order_and_set_wins() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let wide = tmp.path().join("wide.json");
    fs::write(&wide, r#"{ "generate": { "maxFirstLevel": 4 } }"#).expect("write");
    let wide = wide.to_string_lossy().to_string();
    let corpus = fixture("corpus/web.json");
    let compact = fixture("config/compact.json");

    let layered = stdout_json(&run(&["generate", "--config", &compact, "--config", &wide, &corpus]));
    assert_eq!(first_level_tags(&layered), 4);
    // materialsPerTag from the first file survives the second one.
    let materials = layered["nodes"]
        .as_array()
        .map(|nodes| nodes.iter().filter(|n| n["kind"] == "material").count());
    assert!(materials.is_some_and(|m| m > 0));

    let overridden = stdout_json(&run(&[
        "generate",
        "--config",
        &compact,
        "--set",
        "generate.maxFirstLevel=2",
        "--set",
        "generate.materialsPerTag=0",
        &corpus,
    ]));
    assert_eq!(first_level_tags(&overridden), 2);
    assert!(
        overridden["nodes"]
            .as_array()
            .is_some_and(|nodes| nodes.iter().all(|n| n["kind"] != "material"))
    );

    let exe = assert_cmd::cargo_bin!("tagmap-cli");
    Command::new(exe)
        .args(["generate", "--set", "no-equals-sign", &corpus])
        .assert()
        .code(2);
}

#[test]
fn strict_generate_fails_on_empty_corpus() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let empty = tmp.path().join("empty.json");
    fs::write(&empty, "[]").expect("write");

    let exe = assert_cmd::cargo_bin!("tagmap-cli");
    Command::new(exe)
        .args(["generate", "--strict", empty.to_string_lossy().as_ref()])
        .assert()
        .code(3);

    let lenient = stdout_json(&run(&["generate", empty.to_string_lossy().as_ref()]));
    assert_eq!(lenient["mode"], "empty");
}

#[test]
fn outline_and_validate_read_a_stored_map() {
    let path = fixture("mindmap/rust.json");

    let output = run(&["outline", &path]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "mindmap\n  root((Rust))\n    Ownership\n      Borrowing\n    Traits&#58; &#40;generics&#41;\n"
    );

    let output = run(&["validate", &path]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
}

#[test]
fn editing_commands_chain_through_files() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let created = stdout_json(&run(&[
        "new", "--title", "Plan", "--owner", "u1", "--root-text", "Plan",
    ]));
    assert_eq!(created["nodes"].as_array().map(Vec::len), Some(1));
    let root_id = created["rootNode"]["id"].as_str().expect("root id").to_string();

    let map_path = tmp.path().join("map.json");
    fs::write(&map_path, created.to_string()).expect("write");
    let added = stdout_json(&run(&[
        "add",
        "--parent",
        &root_id,
        "--text",
        "Read",
        map_path.to_string_lossy().as_ref(),
    ]));
    assert_eq!(added["nodes"].as_array().map(Vec::len), Some(2));
    assert_eq!(added["rootNode"]["children"].as_array().map(Vec::len), Some(1));

    fs::write(&map_path, added.to_string()).expect("write");
    let output = run(&["remove", "--node", &root_id, map_path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("root"));

    let output = run(&["outline", map_path.to_string_lossy().as_ref()]);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "mindmap\n  root((Plan))\n    Read\n"
    );
}

#[test]
fn layout_commands_position_nodes() {
    let out = stdout_json(&run(&["layout", &fixture("mindmap/rust.json")]));
    let nodes = out["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0]["id"], "node-1");
    assert_eq!(nodes[0]["position"]["x"], 50.0);

    let tmp = tempfile::tempdir().expect("tempdir");
    let workspace = tmp.path().join("workspace.json");
    fs::write(
        &workspace,
        r#"{"nodes":[{"id":"r","position":{"x":0,"y":0}},{"id":"a"},{"id":"b"}],
            "edges":[{"source":"r","target":"a"},{"source":"r","target":"b"}]}"#,
    )
    .expect("write");

    let out = stdout_json(&run(&[
        "subtree",
        "--root",
        "r",
        workspace.to_string_lossy().as_ref(),
    ]));
    assert_eq!(out["nodes"][1]["position"]["x"], 150.0);
    assert_eq!(out["nodes"][1]["position"]["y"], -50.0);
    assert_eq!(out["nodes"][2]["position"]["y"], 50.0);

    let out = stdout_json(&run(&[
        "auto-layout",
        "--routed",
        workspace.to_string_lossy().as_ref(),
    ]));
    assert_eq!(out["edges"].as_array().map(Vec::len), Some(2));
}

#[test]
fn unknown_flags_print_usage() {
    let exe = assert_cmd::cargo_bin!("tagmap-cli");
    Command::new(exe).arg("--bogus").assert().code(2);
}
