//! Loading app definitions from YAML or JSON.
//!
//! Callbacks cannot be serialized, so a loaded [`App`] carries only data;
//! embedders attach callbacks afterwards with the `with_*` builders.

use std::path::Path;

use tracing::debug;

use crate::error::{AppError, Result};
use crate::types::App;
use crate::validate::validate_app;

impl App {
    /// Parses and validates an app definition from YAML text.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_help_core::App;
    ///
    /// let app = App::from_yaml_str("name: tool\nversion: \"1.0\"\n").unwrap();
    /// assert_eq!(app.version, "1.0");
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let app: App = serde_yaml::from_str(text)?;
        app.validated()
    }

    /// Parses and validates an app definition from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let app: App = serde_json::from_str(text)?;
        app.validated()
    }

    /// Loads an app definition from a file.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::IoError`] if the file cannot be read, a parse
    /// error for malformed input, or [`AppError::Invalid`] when validation
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), json = is_json, "Loading app definition");
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    fn validated(self) -> Result<Self> {
        let errors = validate_app(&self);
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(AppError::Invalid(errors))
        }
    }
}
