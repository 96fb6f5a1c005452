//! Integration tests for command matching and dispatch.

use std::cell::RefCell;

use macron::args::{ArgumentDefinition, ArgumentType, Binder, BinderOptions, Schema};
use macron::command::{Command, Dispatch, DispatchError, IncomingMessage, Module, Registry};
use macron::ArgumentErrorKind;

/// Records what each handler saw.
type Log = RefCell<Vec<String>>;

fn ban_command() -> Command<Log, String> {
    let schema = Schema::new(vec![
        ArgumentDefinition::positional("user", ArgumentType::String).required(),
        ArgumentDefinition::named("silent", ArgumentType::Bool),
        ArgumentDefinition::rest("reason", ArgumentType::String),
    ])
    .unwrap();

    Command::new("ban")
        .with_aliases(["b", "kick"])
        .with_description("Ban a user")
        .with_arguments(schema)
        .with_handler(|log: &Log, bag| {
            let user = bag.string("user")?.unwrap_or_default();
            let reason = bag.rest_text().unwrap_or("none").to_string();
            let silent = bag.flag("silent")?;
            log.borrow_mut().push(format!("ban {} silent={} reason={}", user, silent, reason));
            Ok(())
        })
}

fn echo_command() -> Command<Log, String> {
    Command::new("echo")
        .with_prefix("!")
        .with_incoming(true)
        .with_outgoing(false)
        .with_arguments(Schema::new(vec![ArgumentDefinition::rest("text", ArgumentType::String)]).unwrap())
        .with_handler(|log: &Log, bag| {
            let reply = bag.reply().cloned().unwrap_or_default();
            log.borrow_mut()
                .push(format!("echo {} reply={}", bag.rest_text().unwrap_or(""), reply));
            Ok(())
        })
}

fn registry() -> Registry<Log, String> {
    let mut registry = Registry::new(".");
    registry.add_module(
        Module::new("moderation", "Moderation tools")
            .with_command(ban_command())
            .with_command(echo_command())
            .with_command(Command::new("secret").with_hidden(true).with_handler(|log: &Log, _| {
                log.borrow_mut().push("secret".into());
                Ok(())
            }))
            .with_command(Command::new("fail").with_handler(|_: &Log, _| anyhow::bail!("boom"))),
    );
    registry
}

// =============================================================================
// MATCHING TESTS
// =============================================================================

#[test]
fn dispatches_by_name_and_alias() {
    let registry = registry();
    let log = Log::default();

    let outcome = registry
        .dispatch(&log, IncomingMessage::outgoing(".ban alice -silent spam"))
        .unwrap();
    assert_eq!(outcome, Dispatch::Handled { command: "ban".into() });

    registry.dispatch(&log, IncomingMessage::outgoing(".kick bob")).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["ban alice silent=true reason=spam", "ban bob silent=false reason=none"]
    );
}

#[test]
fn name_must_end_at_whitespace() {
    let registry = registry();
    let log = Log::default();
    let outcome = registry
        .dispatch(&log, IncomingMessage::outgoing(".banana alice"))
        .unwrap();
    assert_eq!(outcome, Dispatch::NoMatch);
    assert!(log.borrow().is_empty());
}

#[test]
fn missing_prefix_does_not_match() {
    let registry = registry();
    let log = Log::default();
    assert_eq!(
        registry.dispatch(&log, IncomingMessage::outgoing("ban alice")).unwrap(),
        Dispatch::NoMatch
    );
}

#[test]
fn command_prefix_overrides_default() {
    let registry = registry();
    let log = Log::default();

    let message = IncomingMessage::incoming("!echo hi there").with_reply("original".to_string());
    registry.dispatch(&log, message).unwrap();
    assert_eq!(
        registry.dispatch(&log, IncomingMessage::incoming(".echo hi")).unwrap(),
        Dispatch::NoMatch
    );
    assert_eq!(*log.borrow(), vec!["echo hi there reply=original"]);
}

#[test]
fn direction_filters_apply() {
    let registry = registry();
    let log = Log::default();

    // ban is outgoing only, echo incoming only
    assert_eq!(
        registry.dispatch(&log, IncomingMessage::incoming(".ban alice")).unwrap(),
        Dispatch::NoMatch
    );
    assert_eq!(
        registry.dispatch(&log, IncomingMessage::outgoing("!echo hi")).unwrap(),
        Dispatch::NoMatch
    );
}

#[test]
fn command_without_handler_never_matches() {
    let mut registry: Registry<Log, String> = Registry::new(".");
    registry.add_module(Module::new("stub", "").with_command(Command::new("ban")));
    let log = Log::default();
    assert_eq!(
        registry.dispatch(&log, IncomingMessage::outgoing(".ban alice")).unwrap(),
        Dispatch::NoMatch
    );
}

#[test]
fn registry_exposes_prefix_and_modules() {
    let registry = registry();
    assert_eq!(registry.default_prefix(), ".");
    assert_eq!(registry.modules().len(), 1);
    assert_eq!(registry.modules()[0].name, "moderation");
    assert_eq!(registry.modules()[0].commands().len(), 4);
    assert_eq!(registry.commands().count(), 4);
}

#[test]
fn find_returns_trimmed_argument_text() {
    let registry = registry();
    let message = IncomingMessage::outgoing(".b   alice  reason  ");
    let (command, text) = registry.find(&message).unwrap();
    assert_eq!(command.name, "ban");
    assert_eq!(text, "alice  reason");
}

// =============================================================================
// ERROR TESTS
// =============================================================================

#[test]
fn invalid_arguments_are_reported_with_command_name() {
    let registry = registry();
    let log = Log::default();
    let err = registry
        .dispatch(&log, IncomingMessage::outgoing(".ban"))
        .unwrap_err();
    match err {
        DispatchError::InvalidArguments { command, source } => {
            assert_eq!(command, "ban");
            assert_eq!(source.argument, "user");
            assert!(matches!(source.kind, ArgumentErrorKind::MissingRequired { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(log.borrow().is_empty());
}

#[test]
fn handler_errors_propagate() {
    let registry = registry();
    let err = registry
        .dispatch(&Log::default(), IncomingMessage::outgoing(".fail"))
        .unwrap_err();
    assert!(matches!(err, DispatchError::Handler { ref command, .. } if command == "fail"));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn registry_binder_options_are_used() {
    let binder = Binder::new(BinderOptions {
        reject_unknown_flags: true,
        ..BinderOptions::default()
    });
    let schema = Schema::new(vec![
        ArgumentDefinition::positional("user", ArgumentType::String),
        ArgumentDefinition::named("silent", ArgumentType::Bool),
    ])
    .unwrap();
    let mute = Command::new("mute")
        .with_arguments(schema)
        .with_handler(|_: &Log, _| Ok(()));
    let mut registry: Registry<Log> = Registry::new(".").with_binder(binder);
    registry.add_module(Module::new("moderation", "").with_command(mute));

    let err = registry
        .dispatch(&Log::default(), IncomingMessage::outgoing(".mute alice -slient"))
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidArguments { .. }));
}

// =============================================================================
// HELP TESTS
// =============================================================================

#[test]
fn help_lists_visible_commands_with_their_prefix() {
    let lines = registry().help_lines();
    assert_eq!(
        lines,
        vec![
            ".ban <user> [-silent] [reason...]: Ban a user".to_string(),
            "!echo [text...]".to_string(),
            ".fail".to_string(),
        ]
    );
}

#[test]
fn explicit_usage_replaces_generated_one() {
    let command: Command<Log> = Command::new("ban").with_usage("ban <user> [reason]");
    assert_eq!(command.usage_line(), "ban <user> [reason]");
}
