//! Shell completion candidates.
//!
//! When the shell asks for completions the program is re-run with the
//! completion trigger flag appended, so the token being completed is the
//! next-to-last raw argument. A token starting with `-` is completed among
//! flags, anything else among commands. Candidates are written one per line.

use std::io::{self, Write};

use command_help_core::{App, Command, Context, Flag, dashed_name, split_aliases};
use tracing::debug;

use crate::config::HelpConfig;
use crate::script::COMPLETION_FLAG;

/// Writes the names of the visible commands, one per line.
///
/// With `name_usage_pairs` each line is `name:usage` instead, which zsh can
/// show as a description next to the candidate.
pub fn print_command_suggestions(
    commands: &[Command],
    out: &mut dyn Write,
    name_usage_pairs: bool,
) -> io::Result<()> {
    for command in commands.iter().filter(|c| c.is_visible()) {
        for name in command.names() {
            if name_usage_pairs {
                writeln!(out, "{name}:{}", command.usage)?;
            } else {
                writeln!(out, "{name}")?;
            }
        }
    }
    Ok(())
}

/// Returns `true` if any alias of `flag_name`, written with its dashes,
/// appears verbatim in `raw_args`.
///
/// # Examples
///
/// ```
/// use command_help::complete::cli_arg_contains;
///
/// let args = ["tool".to_string(), "-v".to_string()];
/// assert!(cli_arg_contains("verbose, v", &args));
/// assert!(!cli_arg_contains("quiet, q", &args));
/// ```
pub fn cli_arg_contains(flag_name: &str, raw_args: &[String]) -> bool {
    split_aliases(flag_name)
        .map(dashed_name)
        .any(|dashed| raw_args.iter().any(|arg| *arg == dashed))
}

/// Writes the flag spellings that complete `last_arg`.
///
/// A candidate must extend the typed prefix (an exact match is not
/// suggested), and flags already given on the command line under any alias
/// are left out. After `--` only long names are offered.
pub fn print_flag_suggestions(
    last_arg: &str,
    flags: &[Flag],
    raw_args: &[String],
    out: &mut dyn Write,
) -> io::Result<()> {
    let prefix = last_arg.strip_prefix('-').unwrap_or(last_arg);
    let prefix = prefix.strip_prefix('-').unwrap_or(prefix);
    let long_only = last_arg.starts_with("--");

    for flag in flags.iter().filter(|f| f.is_visible()) {
        if cli_arg_contains(&flag.name, raw_args) {
            continue;
        }
        for name in flag.names() {
            if long_only && name.chars().count() == 1 {
                continue;
            }
            if name.starts_with(prefix) && name != prefix {
                writeln!(out, "{}", dashed_name(name))?;
            }
        }
    }
    Ok(())
}

/// Detects the completion trigger flag at the end of `args`.
///
/// Returns whether completion was requested and the arguments with the
/// trigger removed. Nothing is stripped unless `app` has shell completion
/// enabled.
///
/// ```
/// use command_help::complete::check_shell_complete_flag;
/// use command_help_core::App;
///
/// let args = vec!["tool".to_string(), "--generate-bash-completion".to_string()];
///
/// let app = App::new("tool").with_shell_completion();
/// assert_eq!(check_shell_complete_flag(&app, &args), (true, vec!["tool".to_string()]));
///
/// let disabled = App::new("tool");
/// assert_eq!(check_shell_complete_flag(&disabled, &args), (false, args.clone()));
/// ```
pub fn check_shell_complete_flag(app: &App, args: &[String]) -> (bool, Vec<String>) {
    if !app.enable_shell_completion {
        return (false, args.to_vec());
    }
    match args.split_last() {
        Some((last, rest)) if last.strip_prefix("--") == Some(COMPLETION_FLAG) => {
            (true, rest.to_vec())
        }
        _ => (false, args.to_vec()),
    }
}

/// Completion entry points driven by a [`Context`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Completer {
    name_usage_pairs: bool,
}

impl Completer {
    pub fn new(config: &HelpConfig) -> Self {
        Self {
            name_usage_pairs: config.zsh_autocomplete_hack,
        }
    }

    /// Generic completion, optionally scoped to `command`.
    ///
    /// Flags are offered when the token being completed starts with `-`:
    /// the app's global flags, then the command's own. Otherwise the
    /// command's subcommands are offered, or the app's commands when not
    /// scoped.
    pub fn complete_with_flags(&self, ctx: &mut Context<'_>, command: Option<&Command>) {
        let app = ctx.app;
        let raw_args = ctx.raw_args().to_vec();
        if let Err(err) = self.write_candidates(app, command, &raw_args, ctx.writer()) {
            debug!(error = %err, "Failed to write completions");
        }
    }

    fn write_candidates(
        &self,
        app: &App,
        command: Option<&Command>,
        raw_args: &[String],
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let Some(last_arg) = completing_flag(raw_args) else {
            let commands = command.map_or(app.commands.as_slice(), |c| c.subcommands.as_slice());
            return print_command_suggestions(commands, out, self.name_usage_pairs);
        };

        print_flag_suggestions(last_arg, &app.flags, raw_args, out)?;
        if let Some(command) = command {
            print_flag_suggestions(last_arg, &command.flags, raw_args, out)?;
        }
        Ok(())
    }

    /// App-level generic completion.
    pub fn default_app_complete(&self, ctx: &mut Context<'_>) {
        self.complete_with_flags(ctx, None);
    }

    /// Runs the app's completion callback, or the generic app completion.
    pub fn show_completions(&self, ctx: &mut Context<'_>) {
        let app = ctx.app;
        match &app.shell_complete {
            Some(callback) => {
                let complete = callback.as_fn();
                complete(ctx);
            }
            None => self.default_app_complete(ctx),
        }
    }

    /// Runs the completion of the command called `name`.
    ///
    /// A command without its own callback gets generic completion scoped to
    /// it. Unknown names produce no output.
    pub fn show_command_completions(&self, ctx: &mut Context<'_>, name: &str) {
        let Some(command) = find_command(ctx, name) else {
            debug!(command = %name, "No command to complete");
            return;
        };
        match &command.shell_complete {
            Some(callback) => {
                let complete = callback.as_fn();
                complete(ctx);
            }
            None => self.complete_with_flags(ctx, Some(command)),
        }
    }

    /// Prints app completions when the invocation is a completion request
    /// that does not name a command. Returns whether it printed.
    pub fn check_completions(&self, ctx: &mut Context<'_>) -> bool {
        if !ctx.shell_complete() {
            return false;
        }
        if ctx.args().first().is_some_and(|first| ctx.app.command(first).is_some()) {
            return false;
        }
        self.show_completions(ctx);
        true
    }

    /// Prints completions for `name` when the invocation is a completion
    /// request. Returns whether it printed.
    pub fn check_command_completions(&self, ctx: &mut Context<'_>, name: &str) -> bool {
        if !ctx.shell_complete() {
            return false;
        }
        self.show_command_completions(ctx, name);
        true
    }
}

/// The token being completed, when it is a flag.
fn completing_flag(raw_args: &[String]) -> Option<&str> {
    if raw_args.len() <= 2 {
        return None;
    }
    let last_arg = raw_args[raw_args.len() - 2].as_str();
    last_arg.starts_with('-').then_some(last_arg)
}

/// Subcommands of the bound command shadow top-level commands; the bound
/// command matches its own name.
fn find_command<'a>(ctx: &Context<'a>, name: &str) -> Option<&'a Command> {
    let app: &'a App = ctx.app;
    if let Some(bound) = ctx.command {
        if let Some(sub) = bound.find_subcommand(name) {
            return Some(sub);
        }
        if bound.has_name(name) {
            return Some(bound);
        }
    }
    app.command(name)
}
