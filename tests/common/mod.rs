//! Shared test utilities.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

/// Command file used by the loader and CLI tests.
pub const BAN_COMMANDS: &str = r#"
prefix = "!"

[[command]]
name = "ban"
aliases = ["b"]
description = "Ban a user"

[[command.argument]]
name = "user"
type = "entity"
required = true

[[command.argument]]
name = "duration"
type = "duration"
kind = "named"

[[command.argument]]
name = "silent"
type = "bool"
kind = "named"

[[command.argument]]
name = "reason"
type = "string"
kind = "rest"
default = "no reason given"
"#;

/// Write `content` to `name` inside a fresh temp dir.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (temp_dir, path)
}

/// Create a temporary config file.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    temp_file("config.toml", content)
}
