//! Tests for the macron binary.

mod common;

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

use common::{temp_config, temp_file, BAN_COMMANDS};

fn macron_cmd(config: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_macron"));
    cmd.arg("--config").arg(config);
    cmd
}

fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
        .collect()
}

#[test]
fn test_help_lists_subcommands() {
    let output = Command::new(env!("CARGO_BIN_EXE_macron"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tokens"));
    assert!(stdout.contains("parse"));
    assert!(stdout.contains("repl"));
}

#[test]
fn test_tokens_prints_fragments() {
    let (_dir, config) = temp_config("");
    let output = macron_cmd(&config)
        .args(["tokens", "--", "-flag=\"a b\"", "word"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["flag"], "flag");
    assert_eq!(lines[1]["value"], "a b");
    assert_eq!(lines[1]["quoted"], true);
    assert_eq!(lines[2]["value"], "word");
    assert_eq!(lines[2]["quoted"], false);
}

#[test]
fn test_parse_prints_bag() {
    let (_cfg_dir, config) = temp_config("");
    let (_dir, schema) = temp_file("commands.toml", BAN_COMMANDS);

    let output = macron_cmd(&config)
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--reply", "earlier message", "--", "@alice", "-duration", "1d", "spam", "links"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bag: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(bag["raw"], "@alice -duration 1d spam links");
    assert_eq!(bag["positional"][0]["value"]["value"], "@alice");
    assert_eq!(bag["named"]["duration"]["value"]["value"], "1d");
    assert_eq!(bag["reply"], "earlier message");
}

#[test]
fn test_parse_error_exits_with_code_2() {
    let (_cfg_dir, config) = temp_config("");
    let (_dir, schema) = temp_file("commands.toml", BAN_COMMANDS);

    let output = macron_cmd(&config)
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--command", "b", "--", "@alice", "-duration", "soon"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let error: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(error["error"]["argument"], "duration");
}

#[test]
fn test_parse_unknown_command_fails() {
    let (_cfg_dir, config) = temp_config("");
    let (_dir, schema) = temp_file("commands.toml", BAN_COMMANDS);

    let output = macron_cmd(&config)
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--command", "mute", "--", "@alice"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no command 'mute'"));
}

#[test]
fn test_invalid_config_fails() {
    let (_cfg_dir, config) = temp_config("[commands]\nprefix = \"\"\n");
    let output = macron_cmd(&config)
        .args(["tokens", "hello"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("prefix"));
}

#[test]
fn test_repl_dispatches_lines() {
    let (_cfg_dir, config) = temp_config("");
    let (_dir, schema) = temp_file("commands.toml", BAN_COMMANDS);

    let mut child = macron_cmd(&config)
        .arg("repl")
        .arg("--schema")
        .arg(&schema)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"!ban @alice -silent\nhello\n\n!b\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["command"], "ban");
    assert_eq!(lines[0]["arguments"]["named"]["silent"]["value"]["value"], true);
    assert_eq!(lines[0]["arguments"]["rest"]["text"]["value"]["value"], "no reason given");
    assert_eq!(lines[1]["no_match"], true);
    assert_eq!(lines[2]["command"], "ban");
    assert_eq!(lines[2]["error"]["argument"], "user");
}
