use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;

use macron::args::{Binder, Tokenizer};
use macron::command::{Dispatch, DispatchError, IncomingMessage, Module, Registry};
use macron::config::{CommandFile, Config};
use macron::logging::init_tracing;
use macron::ArgumentError;

#[derive(Debug, Parser)]
#[command(name = "macron", version, about = "Parse chat command text against argument schemas")]
struct Cli {
    /// Config file (default: platform config dir/macron/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Print the lexical fragments of TEXT
    Tokens {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Parse TEXT against one command of a schema file and print the result as JSON
    Parse {
        /// TOML command file
        #[arg(long)]
        schema: PathBuf,
        /// Command to parse for (default: the only command in the file)
        #[arg(long = "command")]
        name: Option<String>,
        /// Simulate replying to a message with this text
        #[arg(long)]
        reply: Option<String>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Read messages from stdin and dispatch them to the schema file's commands
    Repl {
        /// TOML command file
        #[arg(long)]
        schema: PathBuf,
        /// Treat messages as coming from someone else
        #[arg(long)]
        incoming: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let binder = Binder::new(config.binder_options()?);

    match cli.command {
        Cmd::Tokens { text } => print_tokens(&text.join(" ")),
        Cmd::Parse {
            schema,
            name,
            reply,
            text,
        } => parse(&binder, &schema, name.as_deref(), reply, &text.join(" ")),
        Cmd::Repl { schema, incoming } => repl(binder, &config, &schema, incoming),
    }
}

fn print_tokens(text: &str) -> anyhow::Result<()> {
    for fragment in Tokenizer::new(text) {
        println!("{}", serde_json::to_string(&fragment_json(&fragment))?);
    }
    Ok(())
}

fn fragment_json(fragment: &macron::args::Fragment<'_>) -> serde_json::Value {
    match fragment {
        macron::args::Fragment::Flag(name) => json!({ "flag": name }),
        macron::args::Fragment::Value(token) => {
            json!({ "value": token.text, "quoted": token.quoted })
        }
    }
}

fn error_json(err: &ArgumentError) -> serde_json::Value {
    json!({ "error": { "argument": err.argument, "message": err.kind.to_string() } })
}

fn parse(
    binder: &Binder,
    schema_path: &Path,
    name: Option<&str>,
    reply: Option<String>,
    text: &str,
) -> anyhow::Result<()> {
    let file = CommandFile::load(schema_path)?;
    let spec = match name {
        Some(name) => file
            .command(name)
            .with_context(|| format!("no command '{}' in {}", name, schema_path.display()))?,
        None => match file.commands.as_slice() {
            [only] => only,
            [] => bail!("{} defines no commands", schema_path.display()),
            _ => bail!("{} defines several commands, pick one with --command", schema_path.display()),
        },
    };

    let schema = spec.schema()?;
    match binder.bind(text, &schema, reply) {
        Ok(bag) => {
            println!("{}", serde_json::to_string_pretty(&bag)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&error_json(&err))?);
            std::process::exit(2);
        }
    }
}

fn repl(binder: Binder, config: &Config, schema_path: &Path, incoming: bool) -> anyhow::Result<()> {
    let file = CommandFile::load(schema_path)?;
    let prefix = file
        .prefix
        .clone()
        .unwrap_or_else(|| config.commands.prefix.clone());

    let mut module = Module::new("schema", schema_path.display().to_string());
    for spec in &file.commands {
        let name = spec.name.clone();
        let command = spec.to_command::<(), String>()?.with_handler(move |_, bag| {
            let line = json!({ "command": name, "arguments": bag });
            println!("{}", serde_json::to_string(&line)?);
            Ok(())
        });
        module.add_command(command);
    }

    let mut registry = Registry::new(prefix).with_binder(binder);
    registry.add_module(module);

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let message = if incoming {
            IncomingMessage::incoming(line)
        } else {
            IncomingMessage::outgoing(line)
        };

        match registry.dispatch(&(), message) {
            Ok(Dispatch::Handled { .. }) => {}
            Ok(Dispatch::NoMatch) => {
                println!("{}", json!({ "no_match": true }));
            }
            Err(DispatchError::InvalidArguments { command, source }) => {
                let mut value = error_json(&source);
                value["command"] = json!(command);
                println!("{}", value);
            }
            Err(err @ DispatchError::Handler { .. }) => return Err(err.into()),
        }
    }
    Ok(())
}
