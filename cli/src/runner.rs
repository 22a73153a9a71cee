//! A minimal run loop for loaded app definitions.
//!
//! Definitions loaded from YAML or JSON carry no actions, so running one
//! only exercises what the help layer does on the way to an action: the
//! completion trigger, `--init-completion`, `--help`, `--version` and the
//! `help` command.

use command_help::complete::check_shell_complete_flag;
use command_help::{
    Completer, HelpConfig, HelpDispatcher, HelpError, check_help, check_init_completion,
    check_version,
};
use command_help_core::{App, Command, Context, Flag, Sinks, help_command};
use tracing::debug;

/// Adds the built-in help command and flags a program would register.
pub fn prepare(mut app: App) -> App {
    if app.command("help").is_none() {
        app.commands.push(help_command());
    }
    if app.find_flag("help").is_none() {
        app.flags.push(Flag::help());
    }
    if !app.hide_version && !app.version.is_empty() && app.find_flag("version").is_none() {
        app.flags.push(Flag::version());
    }
    if app.enable_shell_completion && app.find_flag("init-completion").is_none() {
        app.flags.push(Flag::init_completion());
    }
    app
}

/// Flag values and positionals split out of an argument vector.
#[derive(Debug, Default)]
pub struct Parsed<'a> {
    pub command: Option<&'a Command>,
    pub args: Vec<String>,
    pub bools: Vec<String>,
    pub strings: Vec<(String, String)>,
}

/// Splits `argv` (program name first) into flags, the deepest named
/// command and the remaining positionals.
///
/// Flags are looked up in the bound command first, then globally. Unknown
/// flags are recorded as set booleans. Everything after `--` is positional.
pub fn parse<'a>(app: &'a App, argv: &[String]) -> Parsed<'a> {
    let mut parsed = Parsed::default();
    let mut tokens = argv.iter().skip(1);
    let mut positional_only = false;

    while let Some(token) = tokens.next() {
        if positional_only {
            parsed.args.push(token.clone());
            continue;
        }
        if token == "-" || !token.starts_with('-') {
            let next = match parsed.command {
                Some(command) => command.find_subcommand(token),
                None if parsed.args.is_empty() => app.command(token),
                None => None,
            };
            match next {
                Some(command) if parsed.args.is_empty() => parsed.command = Some(command),
                _ => parsed.args.push(token.clone()),
            }
            continue;
        }
        if token == "--" {
            positional_only = true;
            continue;
        }

        let body = token.trim_start_matches('-');
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (body, None),
        };
        let flag = parsed
            .command
            .and_then(|c| c.flags.iter().find(|f| f.has_name(name)))
            .or_else(|| app.find_flag(name));

        match flag {
            Some(flag) if !flag.is_bool() => {
                let value = inline.or_else(|| tokens.next().cloned()).unwrap_or_default();
                parsed.strings.push((name.to_string(), value));
            }
            _ => parsed.bools.push(name.to_string()),
        }
    }

    parsed
}

/// Runs `app` on `argv` the way a program built on the help layer would.
///
/// # Errors
///
/// [`HelpError::NoHelpTopic`] for `help <unknown>`, [`HelpError::InvalidShell`]
/// for an unsupported `--init-completion` value.
pub fn run<'a>(
    app: &'a App,
    config: &HelpConfig,
    argv: &[String],
    sinks: Sinks<'a>,
) -> Result<(), HelpError> {
    let (shell_complete, stripped) = check_shell_complete_flag(app, argv);
    let parsed = parse(app, &stripped);
    debug!(
        command = parsed.command.map(|c| c.name.as_str()).unwrap_or(""),
        shell_complete,
        "Running app"
    );

    let mut ctx = Context::new(app, sinks)
        .with_raw_args(argv.iter().cloned())
        .with_args(parsed.args)
        .with_shell_complete(shell_complete);
    if let Some(command) = parsed.command {
        ctx = ctx.with_command(command);
    }
    for name in &parsed.bools {
        ctx = ctx.with_bool(name, true);
    }
    for (name, value) in &parsed.strings {
        ctx = ctx.with_string(name, value);
    }

    let dispatcher = HelpDispatcher::new(config);
    let completer = Completer::new(config);

    if check_init_completion(&mut ctx)? {
        return Ok(());
    }

    let Some(command) = parsed.command else {
        if completer.check_completions(&mut ctx) {
            return Ok(());
        }
        if check_version(&ctx) && !check_help(&ctx) {
            dispatcher.show_version(&mut ctx);
            return Ok(());
        }
        return dispatcher.show_app_help(&mut ctx);
    };

    if completer.check_command_completions(&mut ctx, &command.name) {
        return Ok(());
    }
    if command.name == "help" {
        return dispatcher.help_action(&mut ctx);
    }
    if dispatcher.check_subcommand_help(&mut ctx) {
        return Ok(());
    }
    if let Some(first) = ctx.args().first().cloned() {
        if first == "help" {
            let rest: Vec<String> = ctx.args()[1..].to_vec();
            let mut ctx = ctx.with_args(rest);
            return dispatcher.help_subcommand_action(&mut ctx);
        }
    }
    dispatcher.show_subcommand_help(&mut ctx)
}
