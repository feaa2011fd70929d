use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn expand_respects_syntax_from_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("custom.toml");
    fs::write(
        &config_path,
        r#"[expand]
syntax = "css"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path())
        .args(["expand", "p", "--config"])
        .arg(config_path.as_os_str());
    cmd.assert().success().stdout("padding:${0};\n");
}

#[test]
fn zen_toml_in_working_directory_is_picked_up() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("zen.toml"),
        r#"[expand]
insert_final_tabstop = true
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path()).args(["expand", "br"]);
    cmd.assert().success().stdout("<br>${0}\n");
}

#[test]
fn custom_profile_from_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("custom.toml");
    fs::write(
        &config_path,
        r#"[profiles.shout]
tag_case = "upper"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path())
        .args(["expand", "p", "--profile", "shout", "--config"])
        .arg(config_path.as_os_str());
    cmd.assert().success().stdout("<P>${0}</P>\n");
}

#[test]
fn user_snippets_file() {
    let dir = tempdir().unwrap();
    let snippets = dir.path().join("snippets.json");
    fs::write(&snippets, r#"{"html": {"snippets": {"hi": "Hello!"}}}"#).unwrap();

    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path())
        .args(["expand", "hi", "--snippets"])
        .arg(snippets.as_os_str());
    cmd.assert().success().stdout("Hello!\n");
}

#[test]
fn missing_config_file_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path())
        .args(["expand", "p", "--config", "nope.toml"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
