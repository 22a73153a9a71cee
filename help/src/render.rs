//! Template rendering for help text.
//!
//! Help templates are [`minijinja`] templates evaluated against a
//! serialized view of an app or command. Rendered text goes through a
//! [`TabWriter`] so `name<TAB>usage` rows line up.
//!
//! Rendering is best-effort: a failure leaves the output sink untouched and
//! is only reported on the error sink when the renderer was built with
//! `debug` enabled.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use command_help_core::Sinks;
use minijinja::value::Rest;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior, Value};
use tracing::{debug, error};

use crate::error::RenderError;
use crate::tabwriter::TabWriter;

/// A function callable from templates.
pub type TemplateFunction = Arc<dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync>;

/// Named functions made available to a template.
///
/// Later insertions replace earlier ones with the same name, which is how
/// caller-supplied functions override the built-in `join`.
///
/// # Examples
///
/// ```
/// use command_help::FunctionTable;
/// use minijinja::Value;
///
/// let table = FunctionTable::with_builtins()
///     .with("shout", |args| Ok(Value::from(args[0].to_string().to_uppercase())));
/// assert!(table.contains("join"));
/// assert!(table.contains("shout"));
/// ```
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: BTreeMap<String, TemplateFunction>,
}

impl FunctionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the built-in `join(seq, sep)`.
    pub fn with_builtins() -> Self {
        Self::new().with("join", join)
    }

    /// Adds or replaces a function.
    pub fn insert(
        &mut self,
        name: &str,
        f: impl Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    ) {
        self.functions.insert(name.to_string(), Arc::new(f));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(
        mut self,
        name: &str,
        f: impl Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    ) -> Self {
        self.insert(name, f);
        self
    }

    /// Copies every entry of `other` into this table, replacing entries
    /// with the same name.
    pub fn extend(&mut self, other: &FunctionTable) {
        for (name, f) in &other.functions {
            self.functions.insert(name.clone(), Arc::clone(f));
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Function names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    fn register(&self, env: &mut Environment<'_>) {
        for (name, f) in &self.functions {
            let f = Arc::clone(f);
            env.add_function(name.clone(), move |args: Rest<Value>| f(&args.0));
        }
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}

/// `join(seq, sep)`: concatenates the items of `seq` separated by `sep`.
fn join(args: &[Value]) -> Result<Value, Error> {
    let [items, sep] = args else {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("join expects 2 arguments, got {}", args.len()),
        ));
    };
    let sep = sep.as_str().ok_or_else(|| {
        Error::new(ErrorKind::InvalidOperation, "join separator must be a string")
    })?;
    let parts: Vec<String> = items.try_iter()?.map(|item| item.to_string()).collect();
    Ok(Value::from(parts.join(sep)))
}

fn environment<'source>(functions: &FunctionTable) -> Environment<'source> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Lenient);
    functions.register(&mut env);
    env
}

/// Renders help templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    debug: bool,
}

impl Renderer {
    /// Creates a renderer; `debug` reports swallowed errors on the error
    /// sink.
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Renders `template` against `data` and writes the aligned result.
    ///
    /// `functions` is merged over the built-in table. Nothing is written to
    /// `out` unless the template rendered completely.
    ///
    /// # Errors
    ///
    /// [`RenderError::Parse`] for invalid template syntax,
    /// [`RenderError::Execute`] when evaluation fails and
    /// [`RenderError::Io`] when `out` rejects the text.
    pub fn try_render(
        &self,
        out: &mut dyn Write,
        template: &str,
        data: &Value,
        functions: &FunctionTable,
    ) -> Result<(), RenderError> {
        let mut table = FunctionTable::with_builtins();
        table.extend(functions);

        let env = environment(&table);
        let tmpl = env.template_from_str(template).map_err(RenderError::Parse)?;
        let text = tmpl.render(data).map_err(RenderError::Execute)?;

        let mut writer = TabWriter::new(out);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Best-effort rendering with extra template functions.
    pub fn render_custom(
        &self,
        sinks: &mut Sinks<'_>,
        template: &str,
        data: &Value,
        functions: &FunctionTable,
    ) {
        let Err(err) = self.try_render(&mut *sinks.out, template, data, functions) else {
            return;
        };

        if let RenderError::Parse(_) = err {
            error!(error = %err, "Help template does not parse");
        } else {
            debug!(error = %err, "Help template failed to render");
        }

        if self.debug {
            let _ = writeln!(sinks.err, "CLI TEMPLATE ERROR: {err:#?}");
        }
    }

    /// Best-effort rendering with only the built-in functions.
    pub fn render(&self, sinks: &mut Sinks<'_>, template: &str, data: &Value) {
        self.render_custom(sinks, template, data, &FunctionTable::new());
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn empty() -> Value {
        Value::from_serialize(serde_json::json!({}))
    }

    fn render_to_strings(renderer: Renderer, template: &str, data: &Value) -> (String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        renderer.render(&mut Sinks::new(&mut out, &mut err), template, data);
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_join_builtin() {
        let data = Value::from_serialize(serde_json::json!({"names": ["build", "b"]}));
        let (out, _) = render_to_strings(Renderer::default(), "{{ join(names, \", \") }}", &data);
        assert_eq!(out, "build, b");
    }

    #[test]
    fn test_custom_function_overrides_builtin() {
        let data = Value::from_serialize(serde_json::json!({"names": ["a", "b"]}));
        let functions = FunctionTable::new().with("join", |_| Ok(Value::from("overridden")));
        let mut out = Vec::new();
        Renderer::default()
            .try_render(&mut out, "{{ join(names, \"-\") }}", &data, &functions)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "overridden");
    }

    #[test]
    fn test_trailing_newline_is_kept() {
        let (out, _) = render_to_strings(Renderer::default(), "hello\n", &empty());
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn test_tab_escape_is_aligned() {
        let data = Value::from_serialize(serde_json::json!({"rows": [["ab", "x"], ["abcd", "y"]]}));
        let template = "{% for row in rows %}{{ row[0] }}{{ \"\\t\" }}{{ row[1] }}\n{% endfor %}";
        let (out, _) = render_to_strings(Renderer::default(), template, &data);
        assert_eq!(out, "ab    x\nabcd  y\n");
    }

    #[test]
    fn test_execution_error_is_silent_without_debug() {
        let (out, err) = render_to_strings(Renderer::new(false), "{{ missing_fn() }}", &empty());
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_execution_error_is_reported_with_debug() {
        let (out, err) = render_to_strings(Renderer::new(true), "{{ missing_fn() }}", &empty());
        assert!(out.is_empty());
        assert!(err.starts_with("CLI TEMPLATE ERROR:"));
    }

    #[test]
    fn test_parse_error_is_classified() {
        let mut out = Vec::new();
        let result = Renderer::default().try_render(
            &mut out,
            "{% if %}",
            &empty(),
            &FunctionTable::new(),
        );
        assert!(matches!(result, Err(RenderError::Parse(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_closed_sink_is_tolerated() {
        let mut out = ClosedSink;
        let mut err = Vec::new();
        Renderer::new(true).render(&mut Sinks::new(&mut out, &mut err), "text", &empty());
        assert!(String::from_utf8(err).unwrap().contains("CLI TEMPLATE ERROR"));
    }

    #[test]
    fn test_join_rejects_wrong_arity() {
        let mut out = Vec::new();
        let result = Renderer::default().try_render(
            &mut out,
            "{{ join(names) }}",
            &Value::from_serialize(serde_json::json!({"names": ["a"]})),
            &FunctionTable::new(),
        );
        assert!(matches!(result, Err(RenderError::Execute(_))));
    }
}
