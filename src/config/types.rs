use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::args::BoolFlagPolicy;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub duration: DurationConfig,
}

/// Command routing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Prefix for commands that don't set their own (default: ".").
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

/// Argument parser behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// "presence_only" (default) or "inline_value".
    #[serde(default)]
    pub bool_flags: BoolFlagPolicy,
    /// Error on undeclared flags that nothing could absorb (default: false).
    #[serde(default)]
    pub reject_unknown_flags: bool,
}

/// Extra duration units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationConfig {
    /// Suffix → duration expression in the built-in grammar (e.g. `fn = "2w"`).
    #[serde(default)]
    pub units: BTreeMap<String, String>,
}

fn default_prefix() -> String {
    ".".to_string()
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}
