//! App definition validation.
//!
//! Catches structural mistakes in a command tree before it reaches the help
//! and completion layers: empty names, repeated aliases inside one flag, and
//! commands in the same scope that answer to the same name.
//!
//! # Examples
//!
//! ```
//! use command_help_core::*;
//!
//! let app = App::new("tool").with_flag(Flag::boolean("verbose, v"));
//! assert!(validate_app(&app).is_empty());
//!
//! // Invalid: the same alias twice in one flag
//! let bad = App::new("tool").with_flag(Flag::boolean("verbose, v, v"));
//! assert!(!validate_app(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{App, Command, Flag};

/// App validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// App name is empty or whitespace-only.
    #[error("app name cannot be empty")]
    EmptyAppName,
    /// A command has no name.
    #[error("command name cannot be empty (under '{0}')")]
    EmptyCommandName(String),
    /// Command names are typed as words, not flags.
    #[error("command name cannot start with '-': {0}")]
    InvalidCommandName(String),
    /// A flag has no usable alias.
    #[error("flag must define at least one name")]
    EmptyFlagName,
    /// One alias occurs twice within a flag's alias set.
    #[error("duplicate alias '{alias}' in flag '{flag}'")]
    DuplicateFlagAlias { flag: String, alias: String },
    /// Two commands in the same scope share a name or alias.
    #[error("duplicate command in scope: {0}")]
    DuplicateCommand(String),
}

/// Validates an app definition.
///
/// Returns the first problem found, or an empty list.
///
/// # Examples
///
/// ```
/// use command_help_core::*;
///
/// let app = App::new("tool")
///     .with_command(Command::new("build").with_alias("b"))
///     .with_command(Command::new("bench").with_alias("b"));
/// assert_eq!(
///     validate_app(&app),
///     vec![ValidationError::DuplicateCommand("b".to_string())]
/// );
/// ```
pub fn validate_app(app: &App) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if app.name.trim().is_empty() {
        errors.push(ValidationError::EmptyAppName);
        return errors;
    }

    errors.extend(validate_flags(&app.flags));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_commands(&app.commands, &app.name));
    errors
}

fn validate_commands(commands: &[Command], parent: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for command in commands {
        let name = command.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyCommandName(parent.to_string()));
            return errors;
        }

        for alias in command.names() {
            if alias.starts_with('-') {
                errors.push(ValidationError::InvalidCommandName(alias.to_string()));
                return errors;
            }
            if !seen.insert(alias) {
                errors.push(ValidationError::DuplicateCommand(alias.to_string()));
                return errors;
            }
        }

        errors.extend(validate_flags(&command.flags));
        if !errors.is_empty() {
            return errors;
        }

        errors.extend(validate_commands(&command.subcommands, name));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_flags(flags: &[Flag]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for flag in flags {
        let names = flag.names();
        if names.is_empty() {
            errors.push(ValidationError::EmptyFlagName);
            return errors;
        }

        let mut seen = HashSet::new();
        for alias in names {
            if !seen.insert(alias) {
                errors.push(ValidationError::DuplicateFlagAlias {
                    flag: flag.name.clone(),
                    alias: alias.to_string(),
                });
                return errors;
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_app_rejects_empty_name() {
        let errors = validate_app(&App::new("  "));
        assert_eq!(errors, vec![ValidationError::EmptyAppName]);
    }

    #[test]
    fn test_validate_app_rejects_empty_flag() {
        let app = App::new("tool").with_flag(Flag::boolean(" , "));
        assert_eq!(validate_app(&app), vec![ValidationError::EmptyFlagName]);
    }

    #[test]
    fn test_aliases_are_case_sensitive() {
        let app = App::new("tool").with_flag(Flag::boolean("verbose, V, v"));
        assert!(validate_app(&app).is_empty());
    }

    #[test]
    fn test_validate_nested_duplicate_alias() {
        let app = App::new("tool").with_command(
            Command::new("remote").with_subcommand(Command::new("add").with_flag(Flag::boolean("force, f, force"))),
        );

        assert_eq!(
            validate_app(&app),
            vec![ValidationError::DuplicateFlagAlias {
                flag: "force, f, force".to_string(),
                alias: "force".to_string(),
            }]
        );
    }

    #[test]
    fn test_same_name_in_different_scopes_is_allowed() {
        let app = App::new("tool")
            .with_command(Command::new("list"))
            .with_command(Command::new("remote").with_subcommand(Command::new("list")));
        assert!(validate_app(&app).is_empty());
    }

    #[test]
    fn test_validate_rejects_dashed_command_name() {
        let app = App::new("tool").with_command(Command::new("build").with_alias("-b"));
        assert_eq!(
            validate_app(&app),
            vec![ValidationError::InvalidCommandName("-b".to_string())]
        );
    }

    #[test]
    fn test_empty_subcommand_name_reports_parent() {
        let app = App::new("tool").with_command(Command::new("remote").with_subcommand(Command::new("")));
        assert_eq!(
            validate_app(&app),
            vec![ValidationError::EmptyCommandName("remote".to_string())]
        );
    }
}
