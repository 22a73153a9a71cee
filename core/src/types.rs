//! Command tree type definitions.
//!
//! This module defines the data model the help and completion layers read:
//! flags with comma-separated alias sets, commands with aliases and
//! categories, and the application root. The types are designed for
//! serialization with [`serde`] so an app definition can be loaded from YAML
//! or JSON; callbacks are attached in code and never serialized.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::Context;

/// Name of the built-in help flag (alias set).
pub const HELP_FLAG_NAME: &str = "help, h";

/// Name of the built-in version flag (alias set).
pub const VERSION_FLAG_NAME: &str = "version, v";

/// Name of the flag that asks for a shell completion script.
pub const INIT_COMPLETION_FLAG_NAME: &str = "init-completion";

/// Completion callback attached to an [`App`] or [`Command`].
pub type CompleteFn = dyn Fn(&mut Context<'_>) + Send + Sync;

/// Callback invoked when help is requested for an unknown command.
pub type CommandNotFoundFn = dyn Fn(&mut Context<'_>, &str) + Send + Sync;

/// Callback producing auxiliary key/value data for custom app templates.
pub type ExtraInfoFn = dyn Fn() -> BTreeMap<String, String> + Send + Sync;

/// Shared, cloneable handle to a callback.
///
/// [`Callback::as_fn`] borrows the underlying function so it can be called:
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
///
/// use command_help_core::{Callback, ExtraInfoFn};
///
/// let f: Arc<ExtraInfoFn> = Arc::new(|| BTreeMap::from([("k".to_string(), "v".to_string())]));
/// let cb = Callback::new(f);
/// let info = cb.as_fn();
/// assert_eq!(info()["k"], "v");
/// ```
pub struct Callback<F: ?Sized>(Arc<F>);

impl<F: ?Sized> Callback<F> {
    /// Wraps an already shared function.
    pub fn new(f: Arc<F>) -> Self {
        Self(f)
    }

    /// The wrapped function.
    pub fn as_fn(&self) -> &F {
        &self.0
    }
}

impl<F: ?Sized> Clone for Callback<F> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<F: ?Sized> Deref for Callback<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.0
    }
}

impl<F: ?Sized> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Splits a comma-separated alias set into trimmed, non-empty aliases.
///
/// ```
/// use command_help_core::split_aliases;
///
/// assert_eq!(split_aliases("verbose, v,").collect::<Vec<_>>(), vec!["verbose", "v"]);
/// ```
pub fn split_aliases(alias_set: &str) -> impl Iterator<Item = &str> {
    alias_set.split(',').map(str::trim).filter(|n| !n.is_empty())
}

/// Returns `name` with the dash prefix a user would type for it.
///
/// Single-character names get one dash, longer names get two.
///
/// # Examples
///
/// ```
/// use command_help_core::dashed_name;
///
/// assert_eq!(dashed_name("v"), "-v");
/// assert_eq!(dashed_name("verbose"), "--verbose");
/// ```
pub fn dashed_name(name: &str) -> String {
    let count = name.chars().count().min(2);
    format!("{}{}", "-".repeat(count), name)
}

/// Whether a flag is a boolean switch or takes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    /// Boolean switch (the default).
    #[default]
    Bool,
    /// Flag followed by a value.
    Value,
}

/// A flag identified by a comma-separated alias set.
///
/// The first alias is canonical; the others are short or long spellings of
/// the same flag. Aliases are case-sensitive.
///
/// # Examples
///
/// ```
/// use command_help_core::Flag;
///
/// let verbose = Flag::boolean("verbose, v").with_usage("Enable verbose output");
/// assert_eq!(verbose.names(), vec!["verbose", "v"]);
/// assert!(verbose.has_name("v"));
/// assert_eq!(verbose.to_string(), "--verbose, -v\tEnable verbose output");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flag {
    /// Comma-separated alias set, canonical name first.
    pub name: String,
    /// One-line description shown in help.
    pub usage: String,
    /// Hidden flags are omitted from help and completion.
    pub hidden: bool,
    /// Boolean switch or value flag.
    pub kind: FlagKind,
    /// Value placeholder shown in help for value flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Flag {
    /// Creates a boolean flag.
    pub fn boolean(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Creates a flag that takes a value.
    ///
    /// ```
    /// use command_help_core::Flag;
    ///
    /// let output = Flag::with_value("output, o").with_placeholder("FILE");
    /// assert_eq!(output.to_string(), "--output FILE, -o FILE\t");
    /// ```
    pub fn with_value(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FlagKind::Value,
            ..Default::default()
        }
    }

    /// Adds a usage line.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// Sets the value placeholder.
    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    /// Marks the flag as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// The built-in `--help, -h` flag.
    pub fn help() -> Self {
        Self::boolean(HELP_FLAG_NAME).with_usage("show help")
    }

    /// The built-in `--version, -v` flag.
    pub fn version() -> Self {
        Self::boolean(VERSION_FLAG_NAME).with_usage("print the version")
    }

    /// The built-in `--init-completion` flag.
    pub fn init_completion() -> Self {
        Self::with_value(INIT_COMPLETION_FLAG_NAME)
            .with_placeholder("SHELL")
            .with_usage("generate completion code. Value must be 'bash' or 'zsh'")
    }

    /// Trimmed aliases in declaration order; empty entries are dropped.
    pub fn names(&self) -> Vec<&str> {
        split_aliases(&self.name).collect()
    }

    /// Canonical (first) alias.
    pub fn canonical_name(&self) -> &str {
        self.names().first().copied().unwrap_or("")
    }

    /// Returns `true` if `name` is one of this flag's aliases.
    pub fn has_name(&self, name: &str) -> bool {
        self.names().contains(&name)
    }

    /// Returns `true` unless the flag is hidden.
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// Returns `true` for boolean switches.
    pub fn is_bool(&self) -> bool {
        self.kind == FlagKind::Bool
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self.kind {
            FlagKind::Bool => String::new(),
            FlagKind::Value => format!(" {}", self.placeholder.as_deref().unwrap_or("value")),
        };
        let names = self
            .names()
            .into_iter()
            .map(|n| format!("{}{value}", dashed_name(n)))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{names}\t{}", self.usage)
    }
}

/// An author credited in app help.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Author {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} <{email}>", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Commands sharing one category label.
///
/// The uncategorized group has an empty name.
#[derive(Debug, Clone)]
pub struct CommandCategory<'a> {
    pub name: &'a str,
    pub commands: Vec<&'a Command>,
}

/// Groups visible commands by category, ordered by category name.
///
/// The uncategorized group sorts first because its name is empty.
/// Categories whose commands are all hidden are dropped.
fn visible_categories(commands: &[Command]) -> Vec<CommandCategory<'_>> {
    let mut groups: BTreeMap<&str, Vec<&Command>> = BTreeMap::new();
    for command in commands.iter().filter(|c| c.is_visible()) {
        groups
            .entry(command.category.as_deref().unwrap_or(""))
            .or_default()
            .push(command);
    }
    groups
        .into_iter()
        .map(|(name, commands)| CommandCategory { name, commands })
        .collect()
}

/// A command or subcommand.
///
/// # Examples
///
/// ```
/// use command_help_core::{Command, Flag};
///
/// let build = Command::new("build")
///     .with_alias("b")
///     .with_usage("Builds the project.")
///     .with_flag(Flag::boolean("release, r"))
///     .with_subcommand(Command::new("docs"));
///
/// assert_eq!(build.names(), vec!["build", "b"]);
/// assert!(build.has_name("b"));
/// assert!(build.find_subcommand("docs").is_some());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    /// One-line description shown in listings.
    pub usage: String,
    /// Replaces the generated usage line when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args_usage: Option<String>,
    /// Listing group; `None` renders without a sub-header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub flags: Vec<Flag>,
    pub subcommands: Vec<Command>,
    pub hidden: bool,
    /// Template used instead of the default command template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_help_template: Option<String>,
    /// Full name shown in help (e.g. `tool build`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_name: Option<String>,
    #[serde(skip)]
    pub shell_complete: Option<Callback<CompleteFn>>,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_args_usage(mut self, args_usage: &str) -> Self {
        self.args_usage = Some(args_usage.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_subcommand(mut self, sub: Command) -> Self {
        self.subcommands.push(sub);
        self
    }

    pub fn with_help_template(mut self, template: &str) -> Self {
        self.custom_help_template = Some(template.to_string());
        self
    }

    pub fn with_shell_complete(
        mut self,
        f: impl Fn(&mut Context<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.shell_complete = Some(Callback::new(Arc::new(f)));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Primary name followed by aliases.
    pub fn names(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .collect()
    }

    /// Returns `true` if `name` is the primary name or an alias.
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// Finds a direct subcommand by name or alias.
    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|s| s.has_name(name))
    }

    pub fn visible_flags(&self) -> Vec<&Flag> {
        self.flags.iter().filter(|f| f.is_visible()).collect()
    }

    pub fn visible_subcommands(&self) -> Vec<&Command> {
        self.subcommands.iter().filter(|c| c.is_visible()).collect()
    }

    pub fn visible_categories(&self) -> Vec<CommandCategory<'_>> {
        visible_categories(&self.subcommands)
    }
}

/// Root of the command tree.
///
/// # Examples
///
/// ```
/// use command_help_core::{App, Command};
///
/// let app = App::new("tool")
///     .with_version("1.0")
///     .with_command(Command::new("build").with_alias("b"));
///
/// assert_eq!(app.command("b").unwrap().name, "build");
/// assert!(app.command("deploy").is_none());
/// assert_eq!(app.help_name(), "tool");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    pub name: String,
    /// Name shown in usage lines; defaults to `name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_name: Option<String>,
    pub usage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args_usage: Option<String>,
    pub version: String,
    pub hide_version: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub authors: Vec<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// Global flags.
    pub flags: Vec<Flag>,
    pub commands: Vec<Command>,
    /// Template used instead of the default app template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_help_template: Option<String>,
    /// Accept the completion trigger flag as the last argument.
    pub enable_shell_completion: bool,
    #[serde(skip)]
    pub command_not_found: Option<Callback<CommandNotFoundFn>>,
    #[serde(skip)]
    pub shell_complete: Option<Callback<CompleteFn>>,
    #[serde(skip)]
    pub extra_info: Option<Callback<ExtraInfoFn>>,
}

impl App {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.authors.push(author);
        self
    }

    pub fn with_copyright(mut self, copyright: &str) -> Self {
        self.copyright = Some(copyright.to_string());
        self
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_help_template(mut self, template: &str) -> Self {
        self.custom_help_template = Some(template.to_string());
        self
    }

    pub fn with_shell_completion(mut self) -> Self {
        self.enable_shell_completion = true;
        self
    }

    pub fn with_command_not_found(
        mut self,
        f: impl Fn(&mut Context<'_>, &str) + Send + Sync + 'static,
    ) -> Self {
        self.command_not_found = Some(Callback::new(Arc::new(f)));
        self
    }

    pub fn with_shell_complete(
        mut self,
        f: impl Fn(&mut Context<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.shell_complete = Some(Callback::new(Arc::new(f)));
        self
    }

    pub fn with_extra_info(
        mut self,
        f: impl Fn() -> BTreeMap<String, String> + Send + Sync + 'static,
    ) -> Self {
        self.extra_info = Some(Callback::new(Arc::new(f)));
        self
    }

    /// Name used in generated usage lines.
    pub fn help_name(&self) -> &str {
        self.help_name.as_deref().unwrap_or(&self.name)
    }

    /// Finds a top-level command by name or alias.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.has_name(name))
    }

    /// Finds a global flag by any of its aliases.
    pub fn find_flag(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.has_name(name))
    }

    pub fn visible_flags(&self) -> Vec<&Flag> {
        self.flags.iter().filter(|f| f.is_visible()).collect()
    }

    pub fn visible_commands(&self) -> Vec<&Command> {
        self.commands.iter().filter(|c| c.is_visible()).collect()
    }

    pub fn visible_categories(&self) -> Vec<CommandCategory<'_>> {
        visible_categories(&self.commands)
    }
}

/// The built-in `help` command.
///
/// Its action is provided by the help layer; this is only the definition
/// that gets listed alongside the app's own commands.
pub fn help_command() -> Command {
    Command::new("help")
        .with_alias("h")
        .with_usage("Shows a list of commands or help for one command")
        .with_args_usage("[command]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_names_are_trimmed() {
        let flag = Flag::boolean(" verbose ,v, ");
        assert_eq!(flag.names(), vec!["verbose", "v"]);
        assert_eq!(flag.canonical_name(), "verbose");
    }

    #[test]
    fn test_split_aliases_drops_empty_entries() {
        assert_eq!(split_aliases("verbose,").collect::<Vec<_>>(), vec!["verbose"]);
        assert_eq!(split_aliases(" , ").count(), 0);
    }

    #[test]
    fn test_callbacks_are_callable_through_as_fn() {
        let app = App::new("tool")
            .with_extra_info(|| BTreeMap::from([("build".to_string(), "42".to_string())]));
        let extra = app.extra_info.clone().unwrap();
        let info = extra.as_fn();
        assert_eq!(info()["build"], "42");
    }

    #[test]
    fn test_flag_display_uses_dash_arity() {
        let flag = Flag::boolean("v, verbose").with_usage("talk more");
        assert_eq!(flag.to_string(), "-v, --verbose\ttalk more");
    }

    #[test]
    fn test_value_flag_display_defaults_placeholder() {
        let flag = Flag::with_value("config, c").with_usage("config file");
        assert_eq!(flag.to_string(), "--config value, -c value\tconfig file");
    }

    #[test]
    fn test_author_display() {
        assert_eq!(Author::new("Ana").to_string(), "Ana");
        assert_eq!(
            Author::new("Ana").with_email("ana@example.com").to_string(),
            "Ana <ana@example.com>"
        );
    }

    #[test]
    fn test_app_command_lookup_by_alias() {
        let app = App::new("tool").with_command(Command::new("build").with_alias("b"));
        assert!(app.command("build").is_some());
        assert!(app.command("b").is_some());
        assert!(app.command("B").is_none());
    }

    #[test]
    fn test_visible_categories_group_and_sort() {
        let app = App::new("tool")
            .with_command(Command::new("zeta").with_category("ops"))
            .with_command(Command::new("alpha"))
            .with_command(Command::new("beta").with_category("dev"))
            .with_command(Command::new("gamma").with_category("ops"))
            .with_command(Command::new("secret").with_category("hidden").hidden());

        let categories = app.visible_categories();
        let names: Vec<&str> = categories.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["", "dev", "ops"]);

        let ops: Vec<&str> = categories[2].commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(ops, vec!["zeta", "gamma"]);
    }

    #[test]
    fn test_hidden_items_are_not_visible() {
        let cmd = Command::new("build")
            .with_flag(Flag::boolean("debug").hidden())
            .with_flag(Flag::boolean("release"))
            .with_subcommand(Command::new("internal").hidden());

        assert_eq!(cmd.visible_flags().len(), 1);
        assert!(cmd.visible_subcommands().is_empty());
    }

    #[test]
    fn test_app_deserializes_from_yaml() {
        let yaml = r#"
name: tool
version: "1.0"
flags:
  - name: "verbose, v"
    usage: verbose output
commands:
  - name: build
    aliases: [b]
    usage: Builds the project.
    flags:
      - name: "target, t"
        kind: value
"#;
        let app: App = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(app.name, "tool");
        assert_eq!(app.flags[0].names(), vec!["verbose", "v"]);
        assert_eq!(app.commands[0].flags[0].kind, FlagKind::Value);
        assert!(app.command_not_found.is_none());
    }
}
