//! Binder: walks the command text once and fills an [`ArgumentBag`].
//!
//! ```text
//! text → Tokenizer ─┬─ declared flag ──────────→ named
//!                   ├─ open positional slot ───→ positional (declaration order)
//!                   ├─ rest / variadic slot ───→ rest
//!                   └─ no slot left ───────────→ discarded
//! ```
//!
//! After the scan, defaults are bound and required slots are checked. Any
//! failure aborts the whole parse.

use serde::{Deserialize, Serialize};

use crate::args::bag::{ArgumentBag, ParsedArgument, RestValue};
use crate::args::duration::DurationGrammar;
use crate::args::schema::{ArgumentDefinition, ArgumentKind, ArgumentType, Schema};
use crate::args::tokenizer::Tokenizer;
use crate::args::value::{coerce, parse_bool, Value};
use crate::error::{ArgumentError, ArgumentErrorKind, SlotKind};

/// How a boolean named flag treats the token after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolFlagPolicy {
    /// The flag is `true` when present; the next token is never inspected.
    #[default]
    PresenceOnly,
    /// A following `true`/`false` literal is consumed as the flag's value.
    /// Anything else is left alone and the flag is `true`. A value given
    /// with `=` (`-silent=false`) must be a literal.
    InlineValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinderOptions {
    pub bool_flags: BoolFlagPolicy,
    /// Fail on an undeclared flag that no open slot could take as a value,
    /// instead of discarding it with the rest of the trailing input.
    pub reject_unknown_flags: bool,
    pub durations: DurationGrammar,
}

/// Stateless apart from its options; one binder can serve any number of
/// concurrent parses.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    options: BinderOptions,
}

/// Parse `text` against `schema` with default options.
pub fn parse_arguments<R>(
    text: &str,
    schema: &Schema,
    reply: Option<R>,
) -> Result<ArgumentBag<R>, ArgumentError> {
    Binder::default().bind(text, schema, reply)
}

impl Binder {
    pub fn new(options: BinderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// Bind `text` to `schema`. `reply` is stored in the bag as-is and
    /// satisfies reply-typed definitions.
    pub fn bind<R>(
        &self,
        text: &str,
        schema: &Schema,
        reply: Option<R>,
    ) -> Result<ArgumentBag<R>, ArgumentError> {
        let mut bag = ArgumentBag::new(text, reply);
        let mut tokens = Tokenizer::new(text);
        let mut filled = 0;

        loop {
            tokens.skip_whitespace();
            if tokens.is_exhausted() {
                break;
            }
            let mark = tokens.offset();

            if let Some(flag) = tokens.next_flag() {
                if let Some(def) = schema.named(flag) {
                    self.bind_flag(def, &mut tokens, &mut bag)?;
                    continue;
                }

                let absorbable = filled < schema.positional_count() || schema.rest().is_some();
                if self.options.reject_unknown_flags && !absorbable {
                    return Err(ArgumentError::new(
                        flag,
                        ArgumentErrorKind::UnknownNamedFlag {
                            flag: flag.to_string(),
                        },
                    ));
                }
                tracing::trace!(flag, "undeclared flag rescanned as value");
                tokens.seek(mark);
            }

            if let Some(def) = schema.positional(filled) {
                let Some(token) = tokens.next_value() else {
                    break;
                };
                let value = self.coerce(def, &token.text)?;
                bag.push_positional(ParsedArgument::new(&def.name, value, token.text));
                filled += 1;
                continue;
            }

            match schema.rest() {
                Some(def) if matches!(def.kind, ArgumentKind::Rest { collects_multiple: true }) => {
                    let Some(token) = tokens.next_value() else {
                        break;
                    };
                    let value = self.coerce(def, &token.text)?;
                    bag.push_rest_value(ParsedArgument::new(&def.name, value, token.text));
                }
                Some(def) => {
                    if let Some(rest) = tokens.take_remainder() {
                        let value = self.coerce(def, rest)?;
                        bag.set_rest(RestValue::Text(ParsedArgument::new(&def.name, value, rest)));
                    }
                    break;
                }
                None => {
                    let discarded = tokens.take_remainder().unwrap_or_default();
                    tracing::trace!(discarded, "trailing input ignored");
                    break;
                }
            }
        }

        self.finish(schema, &mut bag)?;
        Ok(bag)
    }

    fn bind_flag<R>(
        &self,
        def: &ArgumentDefinition,
        tokens: &mut Tokenizer<'_>,
        bag: &mut ArgumentBag<R>,
    ) -> Result<(), ArgumentError> {
        if def.ty == ArgumentType::Bool {
            let value = match self.options.bool_flags {
                BoolFlagPolicy::PresenceOnly => true,
                BoolFlagPolicy::InlineValue if tokens.after_equals() => {
                    return self.bind_flag_value(def, tokens, bag);
                }
                BoolFlagPolicy::InlineValue => inline_bool(tokens).unwrap_or(true),
            };
            bag.insert_named(ParsedArgument::new(
                &def.name,
                Value::Bool(value),
                value.to_string(),
            ));
            return Ok(());
        }

        self.bind_flag_value(def, tokens, bag)
    }

    fn bind_flag_value<R>(
        &self,
        def: &ArgumentDefinition,
        tokens: &mut Tokenizer<'_>,
        bag: &mut ArgumentBag<R>,
    ) -> Result<(), ArgumentError> {
        let token = tokens
            .next_value()
            .ok_or_else(|| ArgumentError::new(&def.name, ArgumentErrorKind::MissingFlagValue))?;
        let value = self.coerce(def, &token.text)?;
        bag.insert_named(ParsedArgument::new(&def.name, value, token.text));
        Ok(())
    }

    fn coerce(&self, def: &ArgumentDefinition, raw: &str) -> Result<Value, ArgumentError> {
        coerce(raw, def.ty, &self.options.durations)
            .map_err(|err| ArgumentError::coercion(&def.name, def.ty, raw, err))
    }

    /// Bind defaults and check required slots, in declaration order.
    fn finish<R>(&self, schema: &Schema, bag: &mut ArgumentBag<R>) -> Result<(), ArgumentError> {
        for def in schema.definitions() {
            if def.is_reply() {
                if def.required && bag.reply().is_none() {
                    return Err(ArgumentError::missing(&def.name, SlotKind::Reply));
                }
                continue;
            }

            let (bound, slot) = match def.kind {
                ArgumentKind::Positional => (bag.is_bound(&def.name), SlotKind::Positional),
                ArgumentKind::Named => (bag.is_bound(&def.name), SlotKind::Named),
                ArgumentKind::Rest { .. } => (bag.rest().is_some(), SlotKind::Rest),
            };
            if bound {
                continue;
            }

            match (&def.default, def.kind) {
                (Some(default), ArgumentKind::Positional) => {
                    let value = self.coerce(def, default)?;
                    bag.push_positional(ParsedArgument::new(&def.name, value, default.as_str()));
                }
                (Some(default), ArgumentKind::Named) => {
                    let value = self.coerce(def, default)?;
                    bag.insert_named(ParsedArgument::new(&def.name, value, default.as_str()));
                }
                (Some(default), ArgumentKind::Rest { collects_multiple }) => {
                    let arg =
                        ParsedArgument::new(&def.name, Value::Str(default.clone()), default.as_str());
                    bag.set_rest(if collects_multiple {
                        RestValue::Values(vec![arg])
                    } else {
                        RestValue::Text(arg)
                    });
                }
                (None, _) if def.required => {
                    return Err(ArgumentError::missing(&def.name, slot));
                }
                (None, _) => continue,
            }
            tracing::trace!(argument = %def.name, "bound default");
        }
        Ok(())
    }
}

/// Consume the next token only if it is a boolean literal.
fn inline_bool(tokens: &mut Tokenizer<'_>) -> Option<bool> {
    let mark = tokens.offset();
    let parsed = tokens.next_value().and_then(|token| parse_bool(&token.text));
    if parsed.is_none() {
        tokens.seek(mark);
    }
    parsed
}
