//! Argument schema: the handler-declared list of expected arguments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// The type of value an argument accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    String,
    Int,
    Float,
    Bool,
    /// Unresolved reference to a directory identity (`@handle` or numeric id).
    Entity,
    /// Binds the externally supplied reply-context; takes no text.
    Reply,
    /// Human-readable duration expression (`3d`, `1w2h`).
    Duration,
}

impl ArgumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentType::String => "string",
            ArgumentType::Int => "int",
            ArgumentType::Float => "float",
            ArgumentType::Bool => "bool",
            ArgumentType::Entity => "entity",
            ArgumentType::Reply => "reply",
            ArgumentType::Duration => "duration",
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an argument is located in the command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Matched by left-to-right position.
    Positional,
    /// Matched by `-name`.
    Named,
    /// Catches everything after the positional slots are filled.
    ///
    /// With `collects_multiple` the remainder is split into individually
    /// coerced values; without it the remainder is one trimmed string.
    Rest { collects_multiple: bool },
}

/// A single argument definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub ty: ArgumentType,
    pub kind: ArgumentKind,
    pub required: bool,
    /// Raw default text, coerced like user input when bound.
    pub default: Option<String>,
    pub description: String,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, ty: ArgumentType, kind: ArgumentKind) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
            required: false,
            default: None,
            description: String::new(),
        }
    }

    pub fn positional(name: impl Into<String>, ty: ArgumentType) -> Self {
        Self::new(name, ty, ArgumentKind::Positional)
    }

    pub fn named(name: impl Into<String>, ty: ArgumentType) -> Self {
        Self::new(name, ty, ArgumentKind::Named)
    }

    /// Single trailing string capture.
    pub fn rest(name: impl Into<String>, ty: ArgumentType) -> Self {
        Self::new(
            name,
            ty,
            ArgumentKind::Rest {
                collects_multiple: false,
            },
        )
    }

    /// Multi-value trailing capture.
    pub fn variadic(name: impl Into<String>, ty: ArgumentType) -> Self {
        Self::new(
            name,
            ty,
            ArgumentKind::Rest {
                collects_multiple: true,
            },
        )
    }

    /// Reply-context slot. Its kind is never consulted.
    pub fn reply(name: impl Into<String>) -> Self {
        Self::new(name, ArgumentType::Reply, ArgumentKind::Positional)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_reply(&self) -> bool {
        self.ty == ArgumentType::Reply
    }

    /// Check if this definition is the named flag `name`.
    pub fn matches_flag(&self, name: &str) -> bool {
        !self.is_reply() && self.kind == ArgumentKind::Named && self.name == name
    }

    fn usage_fragment(&self) -> Option<String> {
        if self.is_reply() {
            return None;
        }
        let fragment = match self.kind {
            ArgumentKind::Positional if self.required => format!("<{}>", self.name),
            ArgumentKind::Positional => format!("[{}]", self.name),
            ArgumentKind::Named => {
                let flag = if self.ty == ArgumentType::Bool {
                    format!("-{}", self.name)
                } else {
                    format!("-{} <{}>", self.name, self.ty)
                };
                if self.required {
                    flag
                } else {
                    format!("[{}]", flag)
                }
            }
            ArgumentKind::Rest { .. } if self.required => format!("<{}...>", self.name),
            ArgumentKind::Rest { .. } => format!("[{}...]", self.name),
        };
        Some(fragment)
    }
}

/// A validated, ordered list of argument definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    definitions: Vec<ArgumentDefinition>,
    positional: Vec<usize>,
    rest: Option<usize>,
}

impl Schema {
    /// Validate and index a list of definitions.
    ///
    /// # Errors
    /// Fails on empty or duplicate names, on more than one rest definition,
    /// and on a positional default that binding order can never reach.
    pub fn new(definitions: Vec<ArgumentDefinition>) -> Result<Self, SchemaError> {
        let mut positional = Vec::new();
        let mut rest: Option<usize> = None;
        let mut optional_gap: Option<&str> = None;

        for (index, def) in definitions.iter().enumerate() {
            if def.name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if definitions[..index].iter().any(|d| d.name == def.name) {
                return Err(SchemaError::DuplicateName {
                    name: def.name.clone(),
                });
            }
            if def.is_reply() {
                continue;
            }

            match def.kind {
                ArgumentKind::Positional => {
                    if let (Some(after), Some(_)) = (optional_gap, &def.default) {
                        return Err(SchemaError::UnreachableDefault {
                            name: def.name.clone(),
                            after: after.to_string(),
                        });
                    }
                    if !def.required && def.default.is_none() && optional_gap.is_none() {
                        optional_gap = Some(&def.name);
                    }
                    positional.push(index);
                }
                ArgumentKind::Named => {}
                ArgumentKind::Rest { .. } => {
                    if let Some(first) = rest {
                        return Err(SchemaError::MultipleRest {
                            first: definitions[first].name.clone(),
                            second: def.name.clone(),
                        });
                    }
                    rest = Some(index);
                }
            }
        }

        Ok(Self {
            definitions,
            positional,
            rest,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// All definitions in declaration order.
    pub fn definitions(&self) -> &[ArgumentDefinition] {
        &self.definitions
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Look up a declared named flag by exact name.
    pub fn named(&self, flag: &str) -> Option<&ArgumentDefinition> {
        self.definitions.iter().find(|d| d.matches_flag(flag))
    }

    /// The `index`-th positional definition in declaration order.
    pub fn positional(&self, index: usize) -> Option<&ArgumentDefinition> {
        self.positional.get(index).map(|&i| &self.definitions[i])
    }

    pub fn positional_count(&self) -> usize {
        self.positional.len()
    }

    pub fn rest(&self) -> Option<&ArgumentDefinition> {
        self.rest.map(|i| &self.definitions[i])
    }

    /// One-line usage synopsis, e.g. `<user> [-duration <duration>] [-silent]`.
    pub fn usage(&self) -> String {
        self.definitions
            .iter()
            .filter_map(ArgumentDefinition::usage_fragment)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
