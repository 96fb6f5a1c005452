//! macron: command argument parsing and dispatch for chat bots.
//!
//! Users type `.<command> <free-form text>`; the [`args`] module turns that
//! text into typed arguments against a declared [`Schema`](args::Schema),
//! and the [`command`] module routes messages to handlers.

pub mod args;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{ArgumentError, ArgumentErrorKind, SchemaError, SlotKind};
