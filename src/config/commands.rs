//! TOML command files: declarative command and argument definitions.
//!
//! ```toml
//! prefix = "!"
//!
//! [[command]]
//! name = "ban"
//! aliases = ["b"]
//! description = "Ban a user"
//!
//! [[command.argument]]
//! name = "user"
//! type = "entity"
//! kind = "positional"
//!
//! [[command.argument]]
//! name = "duration"
//! type = "duration"
//! kind = "named"
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::args::{ArgumentDefinition, ArgumentKind, ArgumentType, Schema};
use crate::command::Command;
use crate::config::loader::{read_toml, ConfigError};
use crate::error::SchemaError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandFile {
    /// Overrides the configured default prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_true")]
    pub outgoing: bool,
    #[serde(default)]
    pub incoming: bool,
    #[serde(default, rename = "argument")]
    pub arguments: Vec<ArgumentSpec>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindSpec {
    #[default]
    Positional,
    Named,
    Rest,
    Variadic,
}

impl From<KindSpec> for ArgumentKind {
    fn from(kind: KindSpec) -> Self {
        match kind {
            KindSpec::Positional => ArgumentKind::Positional,
            KindSpec::Named => ArgumentKind::Named,
            KindSpec::Rest => ArgumentKind::Rest {
                collects_multiple: false,
            },
            KindSpec::Variadic => ArgumentKind::Rest {
                collects_multiple: true,
            },
        }
    }
}

/// A default may be written as a TOML string, integer, float or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultSpec {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for DefaultSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSpec::Bool(b) => write!(f, "{}", b),
            DefaultSpec::Int(i) => write!(f, "{}", i),
            DefaultSpec::Float(x) => write!(f, "{}", x),
            DefaultSpec::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ArgumentType,
    #[serde(default)]
    pub kind: KindSpec,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<DefaultSpec>,
    #[serde(default)]
    pub description: String,
}

fn default_true() -> bool {
    true
}

impl From<&ArgumentSpec> for ArgumentDefinition {
    fn from(spec: &ArgumentSpec) -> Self {
        ArgumentDefinition {
            name: spec.name.clone(),
            ty: spec.ty,
            kind: spec.kind.into(),
            required: spec.required,
            default: spec.default.as_ref().map(ToString::to_string),
            description: spec.description.clone(),
        }
    }
}

impl CommandSpec {
    pub fn schema(&self) -> Result<Schema, SchemaError> {
        Schema::new(self.arguments.iter().map(ArgumentDefinition::from).collect())
    }

    /// Build a handler-less command; the caller attaches the handler.
    pub fn to_command<C, R>(&self) -> Result<Command<C, R>, ConfigError> {
        let schema = self.schema().map_err(|source| ConfigError::InvalidSchema {
            command: self.name.clone(),
            source,
        })?;

        let mut command = Command::new(&self.name)
            .with_aliases(self.aliases.iter().cloned())
            .with_usage(&self.usage)
            .with_description(&self.description)
            .with_hidden(self.hidden)
            .with_outgoing(self.outgoing)
            .with_incoming(self.incoming)
            .with_arguments(schema);
        if let Some(prefix) = &self.prefix {
            command = command.with_prefix(prefix);
        }
        Ok(command)
    }
}

impl CommandFile {
    /// Load a command file and check every command's schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file: CommandFile = read_toml(path)?;
        file.validate()?;
        Ok(file)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, spec) in self.commands.iter().enumerate() {
            if self.commands[..index].iter().any(|c| c.name == spec.name) {
                return Err(ConfigError::ValidationError {
                    message: format!("Command '{}' is defined more than once", spec.name),
                });
            }
            spec.schema().map_err(|source| ConfigError::InvalidSchema {
                command: spec.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands
            .iter()
            .find(|c| c.name == name || c.aliases.iter().any(|a| a == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAN: &str = r#"
prefix = "!"

[[command]]
name = "ban"
aliases = ["b"]
description = "Ban a user"

[[command.argument]]
name = "user"
type = "entity"

[[command.argument]]
name = "duration"
type = "duration"
kind = "named"

[[command.argument]]
name = "silent"
type = "bool"
kind = "named"
default = false

[[command.argument]]
name = "reason"
type = "string"
kind = "rest"
"#;

    #[test]
    fn parses_command_file() {
        let file: CommandFile = toml::from_str(BAN).unwrap();
        file.validate().unwrap();
        assert_eq!(file.prefix.as_deref(), Some("!"));

        let ban = file.command("b").unwrap();
        assert_eq!(ban.name, "ban");
        assert!(ban.outgoing);
        assert!(!ban.incoming);

        let schema = ban.schema().unwrap();
        assert_eq!(schema.positional_count(), 1);
        assert_eq!(schema.named("silent").unwrap().default.as_deref(), Some("false"));
        assert_eq!(
            schema.rest().unwrap().kind,
            ArgumentKind::Rest {
                collects_multiple: false
            }
        );
    }

    #[test]
    fn variadic_kind() {
        let spec: ArgumentSpec =
            toml::from_str("name = \"ids\"\ntype = \"int\"\nkind = \"variadic\"").unwrap();
        let def = ArgumentDefinition::from(&spec);
        assert_eq!(
            def.kind,
            ArgumentKind::Rest {
                collects_multiple: true
            }
        );
    }

    #[test]
    fn rejects_invalid_schema() {
        let file: CommandFile = toml::from_str(
            r#"
[[command]]
name = "x"
[[command.argument]]
name = "a"
type = "string"
kind = "rest"
[[command.argument]]
name = "b"
type = "string"
kind = "variadic"
"#,
        )
        .unwrap();
        assert!(matches!(
            file.validate(),
            Err(ConfigError::InvalidSchema { ref command, .. }) if command == "x"
        ));
    }
}
