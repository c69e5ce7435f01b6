//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

/// Path of the compiled layer-queries binary
pub fn binary() -> &'static str {
    env!("CARGO_BIN_EXE_layer-queries")
}

/// Run the binary against `tool_dir` with colors disabled
pub fn run_in_dir(tool_dir: &Path, args: &[&str]) -> Output {
    Command::new(binary())
        .arg("--dir")
        .arg(tool_dir)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LAYER_QUERIES_DIR")
        .env_remove("LAYER_QUERIES_COLOR")
        .output()
        .expect("Failed to execute layer-queries binary")
}

/// Run the binary and assert it succeeded, returning stdout
pub fn run_ok(tool_dir: &Path, args: &[&str]) -> String {
    let output = run_in_dir(tool_dir, args);
    assert!(
        output.status.success(),
        "layer-queries {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Write a project file with a `cities` and a `roads` layer
pub fn write_sample_project(tool_dir: &Path) {
    let project = serde_json::json!({
        "layers": [
            {
                "name": "cities",
                "fields": ["city", "state", "pop"],
                "features": [
                    {"city": "Austin", "state": "TX", "pop": 961855},
                    {"city": "Dallas", "state": "TX", "pop": 1304379},
                    {"city": "Boston", "state": "MA", "pop": 675647}
                ],
                "subset_string": ""
            },
            {
                "name": "roads",
                "features": [{"kind": "primary"}, {"kind": "service"}]
            }
        ]
    });
    std::fs::write(
        tool_dir.join("project.json"),
        serde_json::to_string_pretty(&project).unwrap(),
    )
    .unwrap();
}

/// Subset string currently stored for `layer` in the project file
pub fn subset_string(tool_dir: &Path, layer: &str) -> String {
    let text = std::fs::read_to_string(tool_dir.join("project.json")).unwrap();
    let project: serde_json::Value = serde_json::from_str(&text).unwrap();
    project["layers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["name"] == layer)
        .and_then(|l| l["subset_string"].as_str())
        .unwrap_or_default()
        .to_string()
}
