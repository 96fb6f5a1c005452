//! Error types shared by the parser, the bag accessors and the schema builder.

use std::fmt;

use thiserror::Error;

use crate::args::ArgumentType;

/// Which kind of slot a missing argument was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Positional,
    Named,
    Rest,
    Reply,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotKind::Positional => "positional",
            SlotKind::Named => "named",
            SlotKind::Rest => "rest",
            SlotKind::Reply => "reply",
        };
        f.write_str(name)
    }
}

/// The immediate cause of an [`ArgumentError`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentErrorKind {
    /// A flag-shaped token matched no declared named argument and nothing
    /// else could absorb it (only raised with `reject_unknown_flags`).
    #[error("unknown flag '-{flag}'")]
    UnknownNamedFlag { flag: String },

    /// A non-boolean flag was the last token of the input.
    #[error("flag is missing its value")]
    MissingFlagValue,

    /// Raw text did not parse as the declared type.
    #[error("cannot parse '{raw}' as {expected}: {reason}")]
    TypeCoercion {
        expected: ArgumentType,
        raw: String,
        reason: String,
    },

    /// A required argument was not supplied and has no default.
    #[error("required {kind} argument missing")]
    MissingRequired { kind: SlotKind },

    /// The resolver found no identity for the raw reference.
    #[error("entity not found: {raw}")]
    EntityNotFound { raw: String },

    /// An accessor asked for an argument that was never bound.
    #[error("argument not bound")]
    Unbound,

    /// An accessor asked for a different type than the bound value holds.
    #[error("expected {expected} value, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
}

/// A structured argument failure: the argument's name plus the cause.
///
/// This never carries user-facing prose; callers format their own reply
/// from `argument` and `kind`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("argument '{argument}': {kind}")]
pub struct ArgumentError {
    pub argument: String,
    pub kind: ArgumentErrorKind,
}

impl ArgumentError {
    pub fn new(argument: impl Into<String>, kind: ArgumentErrorKind) -> Self {
        Self {
            argument: argument.into(),
            kind,
        }
    }

    pub(crate) fn coercion(
        argument: &str,
        expected: ArgumentType,
        raw: &str,
        reason: impl fmt::Display,
    ) -> Self {
        Self::new(
            argument,
            ArgumentErrorKind::TypeCoercion {
                expected,
                raw: raw.to_string(),
                reason: reason.to_string(),
            },
        )
    }

    pub(crate) fn missing(argument: &str, kind: SlotKind) -> Self {
        Self::new(argument, ArgumentErrorKind::MissingRequired { kind })
    }
}

/// Errors raised while assembling a [`Schema`](crate::args::Schema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("argument '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("only one rest argument is allowed, found '{first}' and '{second}'")]
    MultipleRest { first: String, second: String },

    #[error("positional argument '{name}' has a default but follows optional positional '{after}'")]
    UnreachableDefault { name: String, after: String },

    #[error("argument name must not be empty")]
    EmptyName,
}
