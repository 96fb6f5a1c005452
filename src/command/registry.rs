//! Module and command registry with prefix-based dispatch.

use thiserror::Error;

use crate::args::Binder;
use crate::command::definition::Command;
use crate::error::ArgumentError;

/// A named group of related commands.
#[derive(Debug)]
pub struct Module<C, R = ()> {
    pub name: String,
    pub description: String,
    commands: Vec<Command<C, R>>,
}

impl<C, R> Module<C, R> {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: Command<C, R>) {
        self.commands.push(command);
    }

    pub fn with_command(mut self, command: Command<C, R>) -> Self {
        self.add_command(command);
        self
    }

    pub fn commands(&self) -> &[Command<C, R>] {
        &self.commands
    }
}

/// A message as seen by the dispatcher.
#[derive(Debug, Clone)]
pub struct IncomingMessage<R = ()> {
    pub text: String,
    /// Sent by the bot's own account.
    pub outgoing: bool,
    /// The message this one replies to, if any.
    pub reply: Option<R>,
}

impl<R> IncomingMessage<R> {
    pub fn outgoing(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outgoing: true,
            reply: None,
        }
    }

    pub fn incoming(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            outgoing: false,
            reply: None,
        }
    }

    pub fn with_reply(mut self, reply: R) -> Self {
        self.reply = Some(reply);
        self
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No registered command matched the message.
    NoMatch,
    Handled { command: String },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid arguments for '{command}': {source}")]
    InvalidArguments {
        command: String,
        #[source]
        source: ArgumentError,
    },

    #[error("command '{command}' failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Holds every module and routes messages to the first matching command.
#[derive(Debug)]
pub struct Registry<C, R = ()> {
    default_prefix: String,
    modules: Vec<Module<C, R>>,
    binder: Binder,
}

impl<C, R> Registry<C, R> {
    pub fn new(default_prefix: impl Into<String>) -> Self {
        Self {
            default_prefix: default_prefix.into(),
            modules: Vec::new(),
            binder: Binder::default(),
        }
    }

    pub fn with_binder(mut self, binder: Binder) -> Self {
        self.binder = binder;
        self
    }

    pub fn add_module(&mut self, module: Module<C, R>) {
        self.modules.push(module);
    }

    pub fn default_prefix(&self) -> &str {
        &self.default_prefix
    }

    pub fn modules(&self) -> &[Module<C, R>] {
        &self.modules
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command<C, R>> {
        self.modules.iter().flat_map(|m| m.commands.iter())
    }

    /// One `prefix + usage: description` line per visible command.
    pub fn help_lines(&self) -> Vec<String> {
        self.commands()
            .filter(|cmd| !cmd.hidden)
            .map(|cmd| {
                let prefix = cmd.prefix.as_deref().unwrap_or(&self.default_prefix);
                if cmd.description.is_empty() {
                    format!("{}{}", prefix, cmd.usage_line())
                } else {
                    format!("{}{}: {}", prefix, cmd.usage_line(), cmd.description)
                }
            })
            .collect()
    }

    /// The first command that `message` invokes, with its argument text.
    pub fn find<'m>(&self, message: &'m IncomingMessage<R>) -> Option<(&Command<C, R>, &'m str)> {
        self.commands().find_map(|cmd| {
            cmd.match_text(&message.text, &self.default_prefix, message.outgoing)
                .map(|args| (cmd, args))
        })
    }

    /// Parse the message's arguments and run the matching command's handler.
    pub fn dispatch(&self, ctx: &C, message: IncomingMessage<R>) -> Result<Dispatch, DispatchError> {
        let Some((command, text)) = self.find(&message) else {
            return Ok(Dispatch::NoMatch);
        };
        let Some(handler) = command.handler() else {
            return Ok(Dispatch::NoMatch);
        };
        let name = command.name.clone();
        tracing::debug!(command = %name, args = text, "dispatching command");

        let text = text.to_string();
        let bag = self
            .binder
            .bind(&text, &command.schema, message.reply)
            .map_err(|source| DispatchError::InvalidArguments {
                command: name.clone(),
                source,
            })?;

        handler(ctx, bag).map_err(|source| DispatchError::Handler {
            command: name.clone(),
            source,
        })?;
        Ok(Dispatch::Handled { command: name })
    }
}
