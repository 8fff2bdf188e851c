use std::path::Path;
use std::process::{Command, Output};

use handoff_lib::types::ChangeEntry;
use handoff_lib::HandoffOutput;
use serde_json::json;
use tempfile::TempDir;

fn run_cmd(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_handoff"))
        .args(args)
        .output()
        .expect("run handoff command")
}

fn parse_json(stdout: &[u8]) -> HandoffOutput {
    serde_json::from_slice(stdout).expect("output should be valid JSON")
}

fn color(sass: &str, value: &str) -> serde_json::Value {
    json!({
        "id": sass,
        "name": sass,
        "machineName": sass.trim_start_matches("$color-"),
        "value": value,
        "blend": "normal",
        "sass": sass,
    })
}

fn write_snapshot(path: &Path, colors: Vec<serde_json::Value>) {
    let doc = json!({
        "timestamp": "2024-05-01T10:00:00+00:00",
        "design": { "color": colors, "typography": [], "effect": [] },
        "components": {
            "button": [{
                "componentType": "design",
                "id": "design-theme-light-state-default",
                "name": "button",
                "description": "",
                "theme": "light",
                "state": "default",
                "parts": {
                    "$": [
                        { "name": "OPACITY", "opacity": 0.5 },
                        { "name": "SPACING", "paddingTop": 8.0, "paddingRight": 12.0,
                          "paddingBottom": 8.0, "paddingLeft": 12.0, "spacing": 4.0 }
                    ],
                    "label": [
                        { "name": "TYPOGRAPHY", "fontFamily": "Inter", "fontSize": 14.0,
                          "textCase": "UPPER" }
                    ]
                }
            }]
        },
        "assets": { "icons": [], "logos": [] }
    });
    std::fs::write(path, serde_json::to_string_pretty(&doc).unwrap()).expect("write snapshot");
}

#[test]
fn diff_reports_added_changed_and_deleted_colors() {
    let dir = TempDir::new().expect("tempdir");
    let prev = dir.path().join("prev.json");
    let new = dir.path().join("new.json");
    write_snapshot(
        &prev,
        vec![color("$color-red", "#ff0000"), color("$color-gray", "#888888")],
    );
    write_snapshot(
        &new,
        vec![color("$color-red", "#ee0000"), color("$color-blue", "#0000ff")],
    );

    let out = run_cmd(&[
        "diff",
        "--prev",
        prev.to_str().unwrap(),
        "--new",
        new.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(0));
    let HandoffOutput::Diff(diff) = parse_json(&out.stdout) else {
        panic!("expected diff output");
    };
    let record = diff.changelog.expect("changes expected");
    assert!(record.assets.is_none());
    let colors = record.design.and_then(|d| d.colors).expect("color changes");
    assert_eq!(colors.len(), 3);
    assert!(matches!(&colors[0], ChangeEntry::Change { new, .. } if new.value == "#ee0000"));
    assert!(matches!(&colors[1], ChangeEntry::Add { object } if object.sass == "$color-blue"));
    assert!(matches!(&colors[2], ChangeEntry::Delete { object } if object.sass == "$color-gray"));
}

#[test]
fn diff_of_identical_snapshots_is_null() {
    let dir = TempDir::new().expect("tempdir");
    let snap = dir.path().join("tokens.json");
    write_snapshot(&snap, vec![color("$color-red", "#ff0000")]);

    let out = run_cmd(&[
        "diff",
        "--prev",
        snap.to_str().unwrap(),
        "--new",
        snap.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(0));
    let raw: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(raw["mode"], "diff");
    assert!(raw["changelog"].is_null());
}

#[test]
fn transform_writes_css_and_scss() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("tokens.json");
    write_snapshot(&input, vec![color("$color-red", "#ff0000")]);
    let exportables = dir.path().join("exportables");
    std::fs::create_dir_all(&exportables).unwrap();
    std::fs::write(
        exportables.join("button.yaml"),
        "id: button\noptions:\n  exporter:\n    search: Buttons\n  transformer:\n    rootSelector: .btn\n    tokenPrefix: ds\n",
    )
    .unwrap();
    let out_dir = dir.path().join("css");

    let out = run_cmd(&[
        "transform",
        "--input",
        input.to_str().unwrap(),
        "--exportables",
        exportables.to_str().unwrap(),
        "--output-dir",
        out_dir.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(0));
    let HandoffOutput::Transform(summary) = parse_json(&out.stdout) else {
        panic!("expected transform output");
    };
    // 1 color + opacity + 5 spacing + 3 typography
    assert_eq!(summary.variables, 10);

    let css = std::fs::read_to_string(out_dir.join("tokens.css")).expect("tokens.css");
    assert!(css.contains(":root {\n  --color-red: #ff0000;\n}"));
    assert!(css.contains(".btn {"));
    assert!(css.contains("--ds-button-light-default-opacity: 0.5;"));
    assert!(css.contains("--ds-button-light-default-padding-right: 12px;"));
    assert!(css.contains("--ds-button-light-default-gap: 4px;"));
    assert!(css.contains("--ds-button-light-default-label-font-family: Inter;"));
    assert!(css.contains("--ds-button-light-default-label-text-transform: uppercase;"));

    let scss = std::fs::read_to_string(out_dir.join("tokens.scss")).expect("tokens.scss");
    assert!(scss.contains("$color-red: #ff0000;"));
    assert!(scss.contains("$ds-button-light-default-label-font-size: 14px;"));
}
