use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn expand_is_the_default_command() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path()).arg("ul>li*2");
    cmd.assert()
        .success()
        .stdout("<ul>\n\t<li>${1}</li>\n\t<li>${2}</li>\n</ul>\n");
}

#[test]
fn expand_with_syntax_flag() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path())
        .args(["expand", "m", "--syntax", "css"]);
    cmd.assert().success().stdout("margin:${0};\n");
}

#[test]
fn extract_prints_json() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path()).args(["expand", "a", "--extract"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["text"], "<a href=\"\"></a>");
    assert_eq!(json["tabstops"].as_array().unwrap().len(), 2);
    assert_eq!(json["tabstops"][0]["group"], 1);
}

#[test]
fn malformed_abbreviation_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path()).args(["expand", "div>(p"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unbalanced delimiter"));
}

#[test]
fn wrap_reads_stdin() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path())
        .args(["wrap", "ul>li*"])
        .write_stdin("one\ntwo\n");
    cmd.assert()
        .success()
        .stdout("<ul>\n\t<li>one</li>\n\t<li>two</li>\n</ul>\n");
}

#[test]
fn wrap_reads_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("text.txt");
    fs::write(&input, "hello\n").unwrap();

    let mut cmd = cargo_bin_cmd!("zen");
    cmd.current_dir(dir.path())
        .arg("wrap")
        .arg("p")
        .arg(input.as_os_str());
    cmd.assert().success().stdout("<p>hello</p>\n");
}
