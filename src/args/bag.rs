//! Argument bag: the typed, read-only result handed to command handlers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::args::duration::HumanDuration;
use crate::args::entity::{resolve_entity, EntityResolver};
use crate::args::value::Value;
use crate::error::{ArgumentError, ArgumentErrorKind};

/// One bound argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedArgument {
    pub name: String,
    pub value: Value,
    /// The text before coercion (after quote and escape removal).
    pub raw: String,
}

impl ParsedArgument {
    pub fn new(name: impl Into<String>, value: Value, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            raw: raw.into(),
        }
    }
}

/// What the catch-all slot captured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestValue {
    /// The trimmed remainder of the input as one value.
    Text(ParsedArgument),
    /// Individually scanned and coerced values, in input order.
    Values(Vec<ParsedArgument>),
}

/// Address of a bound argument: a name (`&str`) or a positional index (`usize`).
pub trait ArgumentKey {
    fn lookup<'b, R>(&self, bag: &'b ArgumentBag<R>) -> Option<&'b ParsedArgument>;

    /// Name used in errors when the key is unbound.
    fn label(&self) -> String;
}

impl ArgumentKey for &str {
    fn lookup<'b, R>(&self, bag: &'b ArgumentBag<R>) -> Option<&'b ParsedArgument> {
        bag.get(self)
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

impl ArgumentKey for usize {
    fn lookup<'b, R>(&self, bag: &'b ArgumentBag<R>) -> Option<&'b ParsedArgument> {
        bag.positional.get(*self)
    }

    fn label(&self) -> String {
        format!("#{}", self)
    }
}

/// Parsed arguments for a single invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentBag<R = ()> {
    positional: Vec<ParsedArgument>,
    named: BTreeMap<String, ParsedArgument>,
    rest: Option<RestValue>,
    raw: String,
    reply: Option<R>,
}

impl<R> ArgumentBag<R> {
    pub(crate) fn new(raw: &str, reply: Option<R>) -> Self {
        Self {
            positional: Vec::new(),
            named: BTreeMap::new(),
            rest: None,
            raw: raw.to_string(),
            reply,
        }
    }

    pub(crate) fn push_positional(&mut self, arg: ParsedArgument) {
        self.positional.push(arg);
    }

    pub(crate) fn insert_named(&mut self, arg: ParsedArgument) {
        self.named.insert(arg.name.clone(), arg);
    }

    pub(crate) fn set_rest(&mut self, rest: RestValue) {
        self.rest = Some(rest);
    }

    pub(crate) fn push_rest_value(&mut self, arg: ParsedArgument) {
        match &mut self.rest {
            Some(RestValue::Values(values)) => values.push(arg),
            _ => self.rest = Some(RestValue::Values(vec![arg])),
        }
    }

    pub(crate) fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The original argument text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The reply-context, present iff the invoking message was a reply.
    pub fn reply(&self) -> Option<&R> {
        self.reply.as_ref()
    }

    pub fn into_reply(self) -> Option<R> {
        self.reply
    }

    pub fn positional(&self) -> &[ParsedArgument] {
        &self.positional
    }

    pub fn named(&self) -> &BTreeMap<String, ParsedArgument> {
        &self.named
    }

    pub fn rest(&self) -> Option<&RestValue> {
        self.rest.as_ref()
    }

    /// Find a bound argument by name: named first, then positional, then rest.
    pub fn get(&self, name: &str) -> Option<&ParsedArgument> {
        if let Some(arg) = self.named.get(name) {
            return Some(arg);
        }
        if let Some(arg) = self.positional.iter().find(|a| a.name == name) {
            return Some(arg);
        }
        match &self.rest {
            Some(RestValue::Text(arg)) if arg.name == name => Some(arg),
            _ => None,
        }
    }

    pub fn value<K: ArgumentKey>(&self, key: K) -> Option<&Value> {
        key.lookup(self).map(|arg| &arg.value)
    }

    fn typed<'b, K, T>(
        &'b self,
        key: K,
        expected: &'static str,
        extract: impl FnOnce(&'b Value) -> Option<T>,
    ) -> Result<Option<T>, ArgumentError>
    where
        K: ArgumentKey,
    {
        let Some(arg) = key.lookup(self) else {
            return Ok(None);
        };
        match extract(&arg.value) {
            Some(value) => Ok(Some(value)),
            None => Err(ArgumentError::new(
                &arg.name,
                ArgumentErrorKind::WrongType {
                    expected,
                    found: arg.value.type_name(),
                },
            )),
        }
    }

    pub fn string<K: ArgumentKey>(&self, key: K) -> Result<Option<&str>, ArgumentError> {
        self.typed(key, "string", |v| match v {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn int<K: ArgumentKey>(&self, key: K) -> Result<Option<i64>, ArgumentError> {
        self.typed(key, "int", |v| match v {
            Value::Int(i) => Some(*i),
            _ => None,
        })
    }

    pub fn float<K: ArgumentKey>(&self, key: K) -> Result<Option<f64>, ArgumentError> {
        self.typed(key, "float", |v| match v {
            Value::Float(f) => Some(*f),
            _ => None,
        })
    }

    /// A boolean flag; absent means `false`.
    pub fn flag<K: ArgumentKey>(&self, key: K) -> Result<bool, ArgumentError> {
        let value = self.typed(key, "bool", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })?;
        Ok(value.unwrap_or(false))
    }

    /// `None` is the "no duration" sentinel (callers treat it as permanent);
    /// `Some(HumanDuration::ZERO)` was explicitly given.
    pub fn duration<K: ArgumentKey>(&self, key: K) -> Result<Option<HumanDuration>, ArgumentError> {
        self.typed(key, "duration", |v| match v {
            Value::Duration(d) => Some(*d),
            _ => None,
        })
    }

    /// The raw, unresolved entity reference.
    pub fn entity<K: ArgumentKey>(&self, key: K) -> Result<Option<&str>, ArgumentError> {
        self.typed(key, "entity", |v| match v {
            Value::Entity(raw) => Some(raw.as_str()),
            _ => None,
        })
    }

    /// The single-string rest capture. `None` for multi-value captures.
    pub fn rest_text(&self) -> Option<&str> {
        match &self.rest {
            Some(RestValue::Text(arg)) => Some(&arg.raw),
            _ => None,
        }
    }

    /// Values of a multi-value rest capture; empty otherwise.
    pub fn rest_values(&self) -> &[ParsedArgument] {
        match &self.rest {
            Some(RestValue::Values(values)) => values,
            _ => &[],
        }
    }

    /// Resolve an entity argument through the caller's directory.
    ///
    /// # Errors
    /// `Unbound` if nothing is bound under `key`, `WrongType` if the bound
    /// value is not an entity, `EntityNotFound` if the lookup fails.
    pub fn resolve_entity<K, E>(&self, key: K, resolver: &E) -> Result<E::Identity, ArgumentError>
    where
        K: ArgumentKey,
        E: EntityResolver + ?Sized,
    {
        let Some(arg) = key.lookup(self) else {
            return Err(ArgumentError::new(key.label(), ArgumentErrorKind::Unbound));
        };
        match &arg.value {
            Value::Entity(raw) => resolve_argument(&arg.name, raw, resolver),
            other => Err(ArgumentError::new(
                &arg.name,
                ArgumentErrorKind::WrongType {
                    expected: "entity",
                    found: other.type_name(),
                },
            )),
        }
    }

    /// Resolve the single-string rest capture. `Ok(None)` when none was bound.
    pub fn resolve_rest_entity<E>(&self, resolver: &E) -> Result<Option<E::Identity>, ArgumentError>
    where
        E: EntityResolver + ?Sized,
    {
        match &self.rest {
            Some(RestValue::Text(arg)) => resolve_argument(&arg.name, &arg.raw, resolver).map(Some),
            Some(RestValue::Values(_)) | None => Ok(None),
        }
    }

    /// Resolve every value of a multi-value rest capture, in order.
    pub fn resolve_rest_entities<E>(&self, resolver: &E) -> Result<Vec<E::Identity>, ArgumentError>
    where
        E: EntityResolver + ?Sized,
    {
        self.rest_values()
            .iter()
            .map(|arg| resolve_argument(&arg.name, &arg.raw, resolver))
            .collect()
    }
}

fn resolve_argument<E>(name: &str, raw: &str, resolver: &E) -> Result<E::Identity, ArgumentError>
where
    E: EntityResolver + ?Sized,
{
    resolve_entity(resolver, raw).map_err(|err| {
        ArgumentError::new(name, ArgumentErrorKind::EntityNotFound { raw: err.raw })
    })
}
