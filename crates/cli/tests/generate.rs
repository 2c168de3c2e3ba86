use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write(dir: &Path, rel: &str, content: impl AsRef<str>) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content.as_ref()).unwrap();
}

fn make_config(anchor: &str) -> String {
    format!(
        r#"
version = 1
profile = "test"

[profiles.test]
responses_dir = "{{{{config_dir}}}}/responses"
fallback_anchor = "{anchor}"
"#
    )
}

const DOC: &str = r#"# Clinical Trial Application

## Introduction

<!-- cc tag="cc_intro" title="Introduction" -->
[Introduction will be generated here]
<!-- /cc -->

## Methodology

<!-- cc tag="cc_methodology" title="Methodology Section" -->
<!-- /cc -->

<!-- cc:selection -->
<!-- /cc:selection -->
"#;

#[test]
fn generate_fills_section_placeholder() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "config.toml", make_config("end"));
    write(root, "responses/methodology.txt", "Study Design: randomized.\\nPatients: adults.\n");
    write(root, "cta.md", DOC);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rgen"));
    cmd.arg("--config")
        .arg(root.join("config.toml"))
        .arg("generate")
        .arg("methodology")
        .arg("--doc")
        .arg(root.join("cta.md"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   rgen generate"))
        .stdout(predicate::str::contains("section: methodology"))
        .stdout(predicate::str::contains(
            "result: replaced content control #1 (Methodology Section)",
        ));

    let content = fs::read_to_string(root.join("cta.md")).unwrap();
    assert!(content.contains(
        "<!-- cc tag=\"cc_methodology\" title=\"Methodology Section\" -->\nStudy Design: randomized.\nPatients: adults.\n<!-- /cc -->"
    ));
    assert!(!content.contains("\\n"));
    assert!(content.contains("[Introduction will be generated here]"));
}

#[test]
fn generate_falls_back_when_placeholder_missing() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "config.toml", make_config("end"));
    write(root, "responses/objectives.txt", "Primary: safety.");
    write(root, "cta.md", DOC);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rgen"));
    cmd.arg("--config")
        .arg(root.join("config.toml"))
        .arg("generate")
        .arg("objectives")
        .arg("--doc")
        .arg(root.join("cta.md"));

    cmd.assert().success().stdout(predicate::str::contains(
        "result: placeholder not found; appended paragraph at end of document",
    ));

    let content = fs::read_to_string(root.join("cta.md")).unwrap();
    assert!(content.starts_with(DOC));
    assert!(content.ends_with("\nPrimary: safety.\n"));
}

#[test]
fn generate_start_anchor_prepends() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "config.toml", make_config("start"));
    write(root, "responses/objectives.txt", "Primary: safety.");
    write(root, "cta.md", DOC);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rgen"));
    cmd.arg("--config")
        .arg(root.join("config.toml"))
        .arg("generate")
        .arg("objectives")
        .arg("--doc")
        .arg(root.join("cta.md"));

    cmd.assert().success();

    let content = fs::read_to_string(root.join("cta.md")).unwrap();
    assert!(content.starts_with("Primary: safety.\n\n# Clinical Trial Application"));
}

#[test]
fn generate_freeform_replaces_selection() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "config.toml", make_config("end"));
    write(root, "responses/freeform.txt", "A free-form paragraph.");
    write(root, "cta.md", DOC);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rgen"));
    cmd.arg("--config")
        .arg(root.join("config.toml"))
        .arg("generate")
        .arg("--prompt")
        .arg("Summarise the dosing schedule")
        .arg("--doc")
        .arg(root.join("cta.md"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("section: (free-form)"))
        .stdout(predicate::str::contains("result: replaced active selection"));

    let content = fs::read_to_string(root.join("cta.md")).unwrap();
    assert!(content.contains(
        "<!-- cc:selection -->\nA free-form paragraph.\n<!-- /cc:selection -->"
    ));
}

#[test]
fn generate_unknown_section_fails_without_touching_document() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "config.toml", make_config("end"));
    write(root, "cta.md", DOC);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rgen"));
    cmd.arg("--config")
        .arg(root.join("config.toml"))
        .arg("generate")
        .arg("appendix")
        .arg("--doc")
        .arg(root.join("cta.md"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("FAIL rgen generate"))
        .stderr(predicate::str::contains("unknown section 'appendix'"));

    assert_eq!(fs::read_to_string(root.join("cta.md")).unwrap(), DOC);
}

#[test]
fn generate_missing_response_fails() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "config.toml", make_config("end"));
    write(root, "cta.md", DOC);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rgen"));
    cmd.arg("--config")
        .arg(root.join("config.toml"))
        .arg("generate")
        .arg("intro")
        .arg("--doc")
        .arg(root.join("cta.md"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("content generation failed"));

    assert_eq!(fs::read_to_string(root.join("cta.md")).unwrap(), DOC);
}

#[test]
fn generate_uses_builtin_texts_without_responses_dir() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    write(root, "config.toml", "version = 1\n[profiles.default]\nlatency_ms = 0\n");
    write(root, "cta.md", DOC);

    for section in ["intro", "objectives", "methodology"] {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rgen"));
        cmd.arg("--config")
            .arg(root.join("config.toml"))
            .arg("generate")
            .arg(section)
            .arg("--doc")
            .arg(root.join("cta.md"));
        cmd.assert().success().stdout(predicate::str::contains(format!("section: {section}")));
    }

    let content = fs::read_to_string(root.join("cta.md")).unwrap();
    assert!(content.contains(
        "<!-- cc tag=\"cc_intro\" title=\"Introduction\" -->\nCongenital Adrenal Hyperplasia (CAH) represents"
    ));
    assert!(content.contains(
        "<!-- cc tag=\"cc_methodology\" title=\"Methodology Section\" -->\nStudy Design: This Phase 2"
    ));
    assert!(content.contains("<!-- /cc:selection -->\n\nPrimary Objectives:\n1. To evaluate"));
    assert!(content.ends_with("including fatigue, mood, and overall well-being.\n"));
}
