mod commands;
mod loader;
mod types;

pub use commands::{ArgumentSpec, CommandFile, CommandSpec, DefaultSpec, KindSpec};
pub use loader::ConfigError;
pub use types::{CommandsConfig, Config, DurationConfig, ParserConfig};
