//! Help dispatch across app, command and subcommand-listing scopes.
//!
//! The [`HelpDispatcher`] decides which template and which data object to
//! render for a help request, and resolves `help <name>` lookups with the
//! app's command-not-found fallback. The actual printing goes through the
//! replaceable [`HelpHooks`].

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use command_help_core::{App, Command, Context, Flag, HELP_FLAG_NAME, Sinks, VERSION_FLAG_NAME};
use minijinja::Value;
use tracing::debug;

use crate::config::HelpConfig;
use crate::error::{HelpError, Result};
use crate::render::{FunctionTable, Renderer};
use crate::templates::{APP_HELP_TEMPLATE, COMMAND_HELP_TEMPLATE, SUBCOMMAND_HELP_TEMPLATE};
use crate::view::{AppView, CommandView};

/// Prints `template` rendered against `data`.
pub type HelpPrinterFn = dyn Fn(&mut Sinks<'_>, &str, &Value) + Send + Sync;

/// Prints `template` rendered against `data` with extra template functions.
pub type HelpPrinterCustomFn = dyn Fn(&mut Sinks<'_>, &str, &Value, &FunctionTable) + Send + Sync;

/// Prints the app version.
pub type VersionPrinterFn = dyn Fn(&mut Context<'_>) + Send + Sync;

/// Replaceable printing functions used by the dispatcher.
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use command_help::{HelpDispatcher, HelpHooks};
/// use command_help_core::{App, Context, Sinks};
///
/// let hooks = HelpHooks::default().with_version_printer(|ctx| {
///     let name = ctx.app.name.clone();
///     let _ = writeln!(ctx.writer(), "{name} (custom)");
/// });
/// let dispatcher = HelpDispatcher::with_hooks(hooks);
///
/// let app = App::new("tool").with_version("1.0");
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let mut ctx = Context::new(&app, Sinks::new(&mut out, &mut err));
/// dispatcher.show_version(&mut ctx);
/// drop(ctx);
/// assert_eq!(String::from_utf8(out).unwrap(), "tool (custom)\n");
/// ```
#[derive(Clone)]
pub struct HelpHooks {
    pub help_printer: Arc<HelpPrinterFn>,
    pub help_printer_custom: Arc<HelpPrinterCustomFn>,
    pub version_printer: Arc<VersionPrinterFn>,
}

impl HelpHooks {
    /// Default hooks backed by `renderer`.
    pub fn new(renderer: Renderer) -> Self {
        Self {
            help_printer: Arc::new(move |sinks: &mut Sinks<'_>, template: &str, data: &Value| {
                renderer.render(sinks, template, data)
            }),
            help_printer_custom: Arc::new(
                move |sinks: &mut Sinks<'_>, template: &str, data: &Value, functions: &FunctionTable| {
                    renderer.render_custom(sinks, template, data, functions)
                },
            ),
            version_printer: Arc::new(print_version),
        }
    }

    pub fn with_help_printer(
        mut self,
        f: impl Fn(&mut Sinks<'_>, &str, &Value) + Send + Sync + 'static,
    ) -> Self {
        self.help_printer = Arc::new(f);
        self
    }

    pub fn with_help_printer_custom(
        mut self,
        f: impl Fn(&mut Sinks<'_>, &str, &Value, &FunctionTable) + Send + Sync + 'static,
    ) -> Self {
        self.help_printer_custom = Arc::new(f);
        self
    }

    pub fn with_version_printer(
        mut self,
        f: impl Fn(&mut Context<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.version_printer = Arc::new(f);
        self
    }
}

impl Default for HelpHooks {
    fn default() -> Self {
        Self::new(Renderer::default())
    }
}

impl fmt::Debug for HelpHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpHooks").finish_non_exhaustive()
    }
}

/// Default version printer: `<name> version <version>`.
pub fn print_version(ctx: &mut Context<'_>) {
    let app = ctx.app;
    if let Err(err) = writeln!(ctx.writer(), "{} version {}", app.name, app.version) {
        debug!(error = %err, "Failed to print version");
    }
}

/// Returns `true` if any alias of the built-in version flag is set.
pub fn check_version(ctx: &Context<'_>) -> bool {
    Flag::boolean(VERSION_FLAG_NAME)
        .names()
        .into_iter()
        .any(|name| ctx.bool(name))
}

/// Returns `true` if any alias of the built-in help flag is set.
pub fn check_help(ctx: &Context<'_>) -> bool {
    Flag::boolean(HELP_FLAG_NAME)
        .names()
        .into_iter()
        .any(|name| ctx.bool(name))
}

/// Finds the command `name` refers to from where the context stands.
///
/// Subcommands of the bound command are tried first, then the bound
/// command itself, then the app's top-level commands. Returns the parent
/// the command was found under, if any.
fn resolve_topic<'a>(
    ctx: &Context<'a>,
    name: &str,
) -> Option<(Option<&'a Command>, &'a Command)> {
    let app: &'a App = ctx.app;
    if let Some(bound) = ctx.command {
        if let Some(sub) = bound.find_subcommand(name) {
            return Some((Some(bound), sub));
        }
        if bound.has_name(name) {
            return Some((parent_of(app, bound), bound));
        }
    }
    app.command(name).map(|command| (None, command))
}

/// The command directly containing `target`, searching the whole tree.
fn parent_of<'a>(app: &'a App, target: &Command) -> Option<&'a Command> {
    fn search<'a>(commands: &'a [Command], target: &Command) -> Option<&'a Command> {
        commands.iter().find_map(|c| {
            if c.subcommands.iter().any(|s| std::ptr::eq(s, target)) {
                Some(c)
            } else {
                search(&c.subcommands, target)
            }
        })
    }
    search(&app.commands, target)
}

/// Chooses and prints help templates.
#[derive(Debug, Clone, Default)]
pub struct HelpDispatcher {
    hooks: HelpHooks,
}

impl HelpDispatcher {
    /// Dispatcher with the default hooks configured from `config`.
    pub fn new(config: &HelpConfig) -> Self {
        Self::with_hooks(HelpHooks::new(Renderer::new(config.template_error_debug)))
    }

    pub fn with_hooks(hooks: HelpHooks) -> Self {
        Self { hooks }
    }

    pub fn hooks(&self) -> &HelpHooks {
        &self.hooks
    }

    /// Prints app help, using the app's custom template when it has one.
    ///
    /// Custom templates can call `extra_info()` when the app provides an
    /// extra-info callback. Printing is best-effort, so this always
    /// succeeds.
    pub fn show_app_help(&self, ctx: &mut Context<'_>) -> Result<()> {
        let app = ctx.app;
        let data = Value::from_serialize(AppView::new(app));

        let Some(template) = &app.custom_help_template else {
            (self.hooks.help_printer)(ctx.sinks(), APP_HELP_TEMPLATE, &data);
            return Ok(());
        };

        let mut functions = FunctionTable::new();
        if let Some(extra) = app.extra_info.clone() {
            functions.insert("extra_info", move |_| {
                let info = extra.as_fn();
                Ok(Value::from_serialize(info()))
            });
        }
        (self.hooks.help_printer_custom)(ctx.sinks(), template, &data, &functions);
        Ok(())
    }

    /// Prints help for the command called `name`.
    ///
    /// An empty `name` prints the command listing: for the bound command
    /// when it has subcommands, for the app otherwise. Any other `name` is
    /// looked up by name or alias among the bound command's subcommands,
    /// then the bound command itself, then the app's top-level commands. A
    /// subcommand of the bound command therefore shadows a top-level command
    /// of the same name; unbind the context to reach the top-level one.
    /// Unknown names go to the app's command-not-found callback when one is
    /// set.
    ///
    /// # Errors
    ///
    /// [`HelpError::NoHelpTopic`] (exit code 3) when `name` is unknown and
    /// no callback is configured.
    pub fn show_command_help(&self, ctx: &mut Context<'_>, name: &str) -> Result<()> {
        let app = ctx.app;

        if name.is_empty() {
            let data = match ctx.command.filter(|c| !c.subcommands.is_empty()) {
                Some(container) => Value::from_serialize(CommandView::in_scope(
                    app,
                    parent_of(app, container),
                    container,
                )),
                None => Value::from_serialize(AppView::new(app)),
            };
            (self.hooks.help_printer)(ctx.sinks(), SUBCOMMAND_HELP_TEMPLATE, &data);
            return Ok(());
        }

        if let Some((parent, command)) = resolve_topic(ctx, name) {
            let data = Value::from_serialize(CommandView::in_scope(app, parent, command));
            match &command.custom_help_template {
                Some(template) => (self.hooks.help_printer_custom)(
                    ctx.sinks(),
                    template,
                    &data,
                    &FunctionTable::new(),
                ),
                None => (self.hooks.help_printer)(ctx.sinks(), COMMAND_HELP_TEMPLATE, &data),
            }
            return Ok(());
        }

        match &app.command_not_found {
            Some(callback) => {
                debug!(command = %name, "No help topic, delegating to command-not-found");
                let not_found = callback.as_fn();
                not_found(ctx, name);
                Ok(())
            }
            None => Err(HelpError::NoHelpTopic(name.to_string())),
        }
    }

    /// Prints help for the command the context is bound to.
    ///
    /// A bound command with subcommands, or no bound command at all, gets
    /// the command listing instead.
    pub fn show_subcommand_help(&self, ctx: &mut Context<'_>) -> Result<()> {
        match ctx.command {
            Some(command) if command.subcommands.is_empty() => {
                self.show_command_help(ctx, &command.name)
            }
            _ => self.show_command_help(ctx, ""),
        }
    }

    pub fn show_version(&self, ctx: &mut Context<'_>) {
        (self.hooks.version_printer)(ctx);
    }

    /// Prints app help and terminates the process with `code`.
    pub fn show_app_help_and_exit(&self, ctx: &mut Context<'_>, code: i32) -> ! {
        let _ = self.show_app_help(ctx);
        std::process::exit(code)
    }

    /// Prints command help and terminates the process with `code`.
    pub fn show_command_help_and_exit(&self, ctx: &mut Context<'_>, name: &str, code: i32) -> ! {
        if let Err(err) = self.show_command_help(ctx, name) {
            debug!(error = %err, "Command help failed before exit");
        }
        std::process::exit(code)
    }

    /// Action of the app-level `help` command: `help <name>` shows that
    /// command, bare `help` shows the app.
    pub fn help_action(&self, ctx: &mut Context<'_>) -> Result<()> {
        match ctx.args().first().cloned() {
            Some(name) => self.show_command_help(ctx, &name),
            None => self.show_app_help(ctx),
        }
    }

    /// Action of a container command's `help` subcommand.
    pub fn help_subcommand_action(&self, ctx: &mut Context<'_>) -> Result<()> {
        match ctx.args().first().cloned() {
            Some(name) => self.show_command_help(ctx, &name),
            None => self.show_subcommand_help(ctx),
        }
    }

    /// Prints help for `name` when `-h`/`--help` is set.
    pub fn check_command_help(&self, ctx: &mut Context<'_>, name: &str) -> bool {
        if !(ctx.bool("h") || ctx.bool("help")) {
            return false;
        }
        if let Err(err) = self.show_command_help(ctx, name) {
            debug!(error = %err, "Command help failed");
        }
        true
    }

    /// Prints subcommand help when `-h`/`--help` is set.
    pub fn check_subcommand_help(&self, ctx: &mut Context<'_>) -> bool {
        if !(ctx.bool("h") || ctx.bool("help")) {
            return false;
        }
        if let Err(err) = self.show_subcommand_help(ctx) {
            debug!(error = %err, "Subcommand help failed");
        }
        true
    }
}
