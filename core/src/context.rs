//! Per-invocation context.
//!
//! A [`Context`] binds parsed flag values to an [`App`] (and optionally one
//! of its commands), together with the positional arguments, the raw
//! process arguments and the output sinks. Contexts are built by the
//! argument parser for a single dispatch and dropped afterwards.

use std::collections::HashMap;
use std::io::Write;

use crate::types::{App, Command, Flag};

/// Output and diagnostic writers used by one invocation.
pub struct Sinks<'a> {
    /// Regular output (help text, completions, scripts).
    pub out: &'a mut dyn Write,
    /// Diagnostics (template errors).
    pub err: &'a mut dyn Write,
}

impl<'a> Sinks<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }
}

/// Parsed view of one invocation.
///
/// # Examples
///
/// ```
/// use command_help_core::{App, Context, Flag, Sinks};
///
/// let app = App::new("tool").with_flag(Flag::boolean("verbose, V"));
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let ctx = Context::new(&app, Sinks::new(&mut out, &mut err))
///     .with_raw_args(["tool", "-V", "build"])
///     .with_args(["build"])
///     .with_bool("V", true);
///
/// assert!(ctx.bool("verbose"));
/// assert!(ctx.is_set("verbose"));
/// assert_eq!(ctx.args().first().map(String::as_str), Some("build"));
/// ```
pub struct Context<'a> {
    /// Application being run.
    pub app: &'a App,
    /// Command the invocation resolved to, if any.
    pub command: Option<&'a Command>,
    args: Vec<String>,
    raw_args: Vec<String>,
    bools: HashMap<String, bool>,
    strings: HashMap<String, String>,
    shell_complete: bool,
    sinks: Sinks<'a>,
}

impl<'a> Context<'a> {
    pub fn new(app: &'a App, sinks: Sinks<'a>) -> Self {
        Self {
            app,
            command: None,
            args: Vec::new(),
            raw_args: Vec::new(),
            bools: HashMap::new(),
            strings: HashMap::new(),
            shell_complete: false,
            sinks,
        }
    }

    /// Binds the context to a command.
    pub fn with_command(mut self, command: &'a Command) -> Self {
        self.command = Some(command);
        self
    }

    /// Sets the positional arguments left after flag parsing.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the full process argument vector, program name first.
    pub fn with_raw_args<I, S>(mut self, raw_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw_args = raw_args.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the invocation as a shell-completion request.
    pub fn with_shell_complete(mut self, shell_complete: bool) -> Self {
        self.shell_complete = shell_complete;
        self
    }

    /// Records a parsed boolean flag value.
    pub fn with_bool(mut self, name: &str, value: bool) -> Self {
        self.bools.insert(name.to_string(), value);
        self
    }

    /// Records a parsed string flag value.
    pub fn with_string(mut self, name: &str, value: &str) -> Self {
        self.strings.insert(name.to_string(), value.to_string());
        self
    }

    /// Positional arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full process argument vector.
    pub fn raw_args(&self) -> &[String] {
        &self.raw_args
    }

    pub fn shell_complete(&self) -> bool {
        self.shell_complete
    }

    /// Boolean value of the flag known by `name` (any alias).
    pub fn bool(&self, name: &str) -> bool {
        self.keys_for(name)
            .iter()
            .any(|key| self.bools.get(*key).copied().unwrap_or(false))
    }

    /// String value of the flag known by `name` (any alias).
    pub fn string(&self, name: &str) -> Option<&str> {
        self.keys_for(name)
            .iter()
            .find_map(|key| self.strings.get(*key))
            .map(String::as_str)
    }

    /// Returns `true` if the flag known by `name` was given explicitly.
    pub fn is_set(&self, name: &str) -> bool {
        self.keys_for(name)
            .iter()
            .any(|key| self.bools.contains_key(*key) || self.strings.contains_key(*key))
    }

    pub fn sinks(&mut self) -> &mut Sinks<'a> {
        &mut self.sinks
    }

    pub fn writer(&mut self) -> &mut dyn Write {
        &mut *self.sinks.out
    }

    pub fn err_writer(&mut self) -> &mut dyn Write {
        &mut *self.sinks.err
    }

    /// All aliases of the flag `name` belongs to, or just `name` when no
    /// declared flag carries it. Command flags shadow global flags.
    fn keys_for<'n>(&'n self, name: &'n str) -> Vec<&'n str> {
        let declared = self
            .command
            .and_then(|c| c.flags.iter().find(|f| f.has_name(name)))
            .or_else(|| self.app.find_flag(name));
        match declared {
            Some(flag) => Flag::names(flag),
            None => vec![name],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Command;

    #[test]
    fn test_undeclared_flag_is_looked_up_by_name() {
        let app = App::new("tool");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let ctx = Context::new(&app, Sinks::new(&mut out, &mut err)).with_bool("help", true);

        assert!(ctx.bool("help"));
        assert!(!ctx.bool("h"));
        assert!(!ctx.is_set("version"));
    }

    #[test]
    fn test_command_flags_resolve_aliases() {
        let app = App::new("tool");
        let build = Command::new("build").with_flag(Flag::with_value("target, t"));
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let ctx = Context::new(&app, Sinks::new(&mut out, &mut err))
            .with_command(&build)
            .with_string("t", "x86_64");

        assert_eq!(ctx.string("target"), Some("x86_64"));
        assert!(ctx.is_set("target"));
        assert!(!ctx.bool("target"));
    }

    #[test]
    fn test_writer_reaches_output_sink() {
        let app = App::new("tool");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        {
            let mut ctx = Context::new(&app, Sinks::new(&mut out, &mut err));
            writeln!(ctx.writer(), "hello").unwrap();
            writeln!(ctx.err_writer(), "oops").unwrap();
        }
        assert_eq!(out, b"hello\n");
        assert_eq!(err, b"oops\n");
    }
}
