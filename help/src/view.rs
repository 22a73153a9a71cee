//! Serializable snapshots of apps and commands handed to help templates.
//!
//! Optional fields are flattened to empty strings so templates can test
//! them with `{% if field %}` and never print `none`.

use command_help_core::{App, Command, CommandCategory};
use serde::Serialize;

/// A command as it appears in a listing row.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSummary {
    pub name: String,
    pub names: Vec<String>,
    pub usage: String,
    pub category: String,
    pub hidden: bool,
}

impl CommandSummary {
    fn new(command: &Command) -> Self {
        Self {
            name: command.name.clone(),
            names: command.names().into_iter().map(String::from).collect(),
            usage: command.usage.clone(),
            category: command.category.clone().unwrap_or_default(),
            hidden: command.hidden,
        }
    }
}

/// A category sub-header with its visible commands.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub name: String,
    pub visible_commands: Vec<CommandSummary>,
}

fn categories(groups: Vec<CommandCategory<'_>>) -> Vec<CategoryView> {
    groups
        .into_iter()
        .map(|group| CategoryView {
            name: group.name.to_string(),
            visible_commands: group.commands.into_iter().map(CommandSummary::new).collect(),
        })
        .collect()
}

/// Template data for app-level help and the top-level command listing.
#[derive(Debug, Clone, Serialize)]
pub struct AppView {
    pub name: String,
    pub help_name: String,
    pub usage: String,
    pub usage_text: String,
    pub args_usage: String,
    pub version: String,
    pub hide_version: bool,
    pub description: String,
    pub authors: Vec<String>,
    pub copyright: String,
    pub commands: Vec<CommandSummary>,
    pub visible_commands: Vec<CommandSummary>,
    pub visible_categories: Vec<CategoryView>,
    /// Rendered `names<TAB>usage` lines of the visible global flags.
    pub visible_flags: Vec<String>,
}

impl AppView {
    pub fn new(app: &App) -> Self {
        Self {
            name: app.name.clone(),
            help_name: app.help_name().to_string(),
            usage: app.usage.clone(),
            usage_text: app.usage_text.clone().unwrap_or_default(),
            args_usage: app.args_usage.clone().unwrap_or_default(),
            version: app.version.clone(),
            hide_version: app.hide_version,
            description: app.description.clone().unwrap_or_default(),
            authors: app.authors.iter().map(ToString::to_string).collect(),
            copyright: app.copyright.clone().unwrap_or_default(),
            commands: app.commands.iter().map(CommandSummary::new).collect(),
            visible_commands: app
                .visible_commands()
                .into_iter()
                .map(CommandSummary::new)
                .collect(),
            visible_categories: categories(app.visible_categories()),
            visible_flags: app.visible_flags().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Template data for a single command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandView {
    pub name: String,
    pub names: Vec<String>,
    pub help_name: String,
    pub usage: String,
    pub usage_text: String,
    pub args_usage: String,
    pub description: String,
    pub category: String,
    pub subcommands: Vec<CommandSummary>,
    pub visible_commands: Vec<CommandSummary>,
    pub visible_categories: Vec<CategoryView>,
    pub visible_flags: Vec<String>,
}

impl CommandView {
    /// `help_name` defaults to `<app help name> <command name>`.
    pub fn new(app: &App, command: &Command) -> Self {
        Self::in_scope(app, None, command)
    }

    /// View of `command` listed under `parent`; the default `help_name`
    /// then includes the parent's path.
    pub fn in_scope(app: &App, parent: Option<&Command>, command: &Command) -> Self {
        let prefix = match parent {
            Some(parent) => parent
                .help_name
                .clone()
                .unwrap_or_else(|| format!("{} {}", app.help_name(), parent.name)),
            None => app.help_name().to_string(),
        };
        let help_name = command
            .help_name
            .clone()
            .unwrap_or_else(|| format!("{prefix} {}", command.name));
        Self {
            name: command.name.clone(),
            names: command.names().into_iter().map(String::from).collect(),
            help_name,
            usage: command.usage.clone(),
            usage_text: command.usage_text.clone().unwrap_or_default(),
            args_usage: command.args_usage.clone().unwrap_or_default(),
            description: command.description.clone().unwrap_or_default(),
            category: command.category.clone().unwrap_or_default(),
            subcommands: command.subcommands.iter().map(CommandSummary::new).collect(),
            visible_commands: command
                .visible_subcommands()
                .into_iter()
                .map(CommandSummary::new)
                .collect(),
            visible_categories: categories(command.visible_categories()),
            visible_flags: command.visible_flags().iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use command_help_core::{Author, Flag};

    use super::*;

    #[test]
    fn test_app_view_hides_hidden_entries() {
        let app = App::new("tool")
            .with_flag(Flag::boolean("debug").hidden())
            .with_flag(Flag::boolean("verbose, v"))
            .with_command(Command::new("build"))
            .with_command(Command::new("internal").hidden());

        let view = AppView::new(&app);
        assert_eq!(view.commands.len(), 2);
        assert_eq!(view.visible_commands.len(), 1);
        assert_eq!(view.visible_flags, vec!["--verbose, -v\t".to_string()]);
    }

    #[test]
    fn test_author_strings() {
        let app = App::new("tool").with_author(Author::new("Ana").with_email("ana@example.com"));
        assert_eq!(AppView::new(&app).authors, vec!["Ana <ana@example.com>"]);
    }

    #[test]
    fn test_command_help_name_defaults_to_path() {
        let app = App::new("tool");
        let build = Command::new("build");
        assert_eq!(CommandView::new(&app, &build).help_name, "tool build");

        let mut named = Command::new("build");
        named.help_name = Some("tool b".to_string());
        assert_eq!(CommandView::new(&app, &named).help_name, "tool b");
    }

    #[test]
    fn test_nested_help_name_includes_parent() {
        let app = App::new("tool");
        let remote = Command::new("remote").with_subcommand(Command::new("add"));
        let view = CommandView::in_scope(&app, Some(&remote), &remote.subcommands[0]);
        assert_eq!(view.help_name, "tool remote add");
    }
}
