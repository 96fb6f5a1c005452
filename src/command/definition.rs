//! A single chat command: its names, argument schema and handler.

use std::fmt;
use std::sync::Arc;

use crate::args::{ArgumentBag, Schema};

/// Handler invoked with the caller's context and the parsed arguments.
pub type Handler<C, R> = Arc<dyn Fn(&C, ArgumentBag<R>) -> anyhow::Result<()> + Send + Sync>;

pub struct Command<C, R = ()> {
    /// Name without prefix (e.g. "ban").
    pub name: String,
    pub aliases: Vec<String>,
    /// Short usage text; generated from the schema when empty.
    pub usage: String,
    pub description: String,
    /// Overrides the registry's default prefix.
    pub prefix: Option<String>,
    /// Left out of help listings.
    pub hidden: bool,
    /// Responds to messages sent by the bot's own account.
    pub outgoing: bool,
    /// Responds to messages from others.
    pub incoming: bool,
    pub schema: Schema,
    handler: Option<Handler<C, R>>,
}

impl<C, R> Command<C, R> {
    /// New command that only answers outgoing messages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            usage: String::new(),
            description: String::new(),
            prefix: None,
            hidden: false,
            outgoing: true,
            incoming: false,
            schema: Schema::empty(),
            handler: None,
        }
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_outgoing(mut self, outgoing: bool) -> Self {
        self.outgoing = outgoing;
        self
    }

    pub fn with_incoming(mut self, incoming: bool) -> Self {
        self.incoming = incoming;
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_arguments(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&C, ArgumentBag<R>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn handler(&self) -> Option<&Handler<C, R>> {
        self.handler.as_ref()
    }

    /// Usage line without prefix, e.g. `ban <user> [-silent]`.
    pub fn usage_line(&self) -> String {
        if !self.usage.is_empty() {
            return self.usage.clone();
        }
        let synopsis = self.schema.usage();
        if synopsis.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, synopsis)
        }
    }

    /// If `text` invokes this command, return the argument text after it.
    ///
    /// The prefixed name (or an alias) must be followed by whitespace or the
    /// end of the text, and the message direction must be enabled. Commands
    /// without a handler never match.
    pub fn match_text<'t>(&self, text: &'t str, default_prefix: &str, outgoing: bool) -> Option<&'t str> {
        if self.handler.is_none() {
            return None;
        }
        if (outgoing && !self.outgoing) || (!outgoing && !self.incoming) {
            return None;
        }

        let prefix = self.prefix.as_deref().unwrap_or(default_prefix);
        let after_prefix = text.strip_prefix(prefix)?;
        std::iter::once(&self.name)
            .chain(&self.aliases)
            .find_map(|name| {
                let rest = after_prefix.strip_prefix(name.as_str())?;
                match rest.chars().next() {
                    None => Some(rest),
                    Some(c) if c.is_whitespace() => Some(rest.trim()),
                    Some(_) => None,
                }
            })
    }
}

impl<C, R> fmt::Debug for Command<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("prefix", &self.prefix)
            .field("hidden", &self.hidden)
            .field("outgoing", &self.outgoing)
            .field("incoming", &self.incoming)
            .field("schema", &self.schema)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
