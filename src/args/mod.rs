//! Command argument parsing for macron.
//!
//! Raw command text is turned into typed arguments in one pass:
//!
//! ```text
//! Text + Schema (+ reply) → Tokenize ⇄ Bind → Coerce → Defaults/Required → ArgumentBag
//! ```
//!
//! Every stage is a pure function of its inputs. Entity references stay
//! unresolved until a handler asks for them through an [`EntityResolver`].

mod bag;
mod binder;
mod duration;
mod entity;
mod schema;
mod tokenizer;
mod value;

pub use bag::{ArgumentBag, ArgumentKey, ParsedArgument, RestValue};
pub use binder::{parse_arguments, Binder, BinderOptions, BoolFlagPolicy};
pub use duration::{DurationError, DurationGrammar, HumanDuration};
pub use entity::{resolve_entity, EntityNotFound, EntityResolver, MemoryDirectory, Peer};
pub use schema::{ArgumentDefinition, ArgumentKind, ArgumentType, Schema};
pub use tokenizer::{Fragment, Tokenizer, ValueToken};
pub use value::{coerce, parse_bool, CoercionError, Value};
