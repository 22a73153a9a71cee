//! Runtime switches for the help layer.
//!
//! Two behaviours are controlled by well-known environment variables in
//! programs built on this library. They are read once, at the outer layer,
//! into a [`HelpConfig`] that is then passed explicitly to the dispatcher
//! and the completion engine.
//!
//! # Example YAML
//!
//! ```yaml
//! template_error_debug: true
//! zsh_autocomplete_hack: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Non-empty value enables template error diagnostics.
pub const TEMPLATE_ERROR_DEBUG_ENV: &str = "CLI_TEMPLATE_ERROR_DEBUG";

/// Value `1` switches command completions to `name:usage` pairs.
pub const ZSH_AUTOCOMPLETE_HACK_ENV: &str = "_CLI_ZSH_AUTOCOMPLETE_HACK";

/// Help layer configuration.
///
/// # Examples
///
/// ```
/// use command_help::HelpConfig;
///
/// let config = HelpConfig::from_lookup(|name| match name {
///     "CLI_TEMPLATE_ERROR_DEBUG" => Some("yes".to_string()),
///     _ => None,
/// });
/// assert!(config.template_error_debug);
/// assert!(!config.zsh_autocomplete_hack);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpConfig {
    /// Report swallowed template errors on the error sink.
    pub template_error_debug: bool,
    /// Print `name:usage` command candidates for zsh.
    pub zsh_autocomplete_hack: bool,
}

impl HelpConfig {
    /// Reads both toggles from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Reads both toggles through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().with_lookup_overrides(lookup)
    }

    /// Turns toggles on when their environment variables say so. Toggles
    /// already enabled stay enabled.
    pub fn with_env_overrides(self) -> Self {
        self.with_lookup_overrides(|name| std::env::var(name).ok())
    }

    fn with_lookup_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if lookup(TEMPLATE_ERROR_DEBUG_ENV).is_some_and(|v| !v.is_empty()) {
            self.template_error_debug = true;
        }
        if lookup(ZSH_AUTOCOMPLETE_HACK_ENV).as_deref() == Some("1") {
            self.zsh_autocomplete_hack = true;
        }
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::HelpError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::HelpError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults_are_off() {
        let config = HelpConfig::from_lookup(lookup(&[]));
        assert_eq!(config, HelpConfig::default());
    }

    #[test]
    fn test_empty_debug_value_stays_off() {
        let config = HelpConfig::from_lookup(lookup(&[(TEMPLATE_ERROR_DEBUG_ENV, "")]));
        assert!(!config.template_error_debug);
    }

    #[test]
    fn test_zsh_hack_requires_exact_one() {
        let on = HelpConfig::from_lookup(lookup(&[(ZSH_AUTOCOMPLETE_HACK_ENV, "1")]));
        let off = HelpConfig::from_lookup(lookup(&[(ZSH_AUTOCOMPLETE_HACK_ENV, "true")]));
        assert!(on.zsh_autocomplete_hack);
        assert!(!off.zsh_autocomplete_hack);
    }

    #[test]
    fn test_yaml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("help.yaml");
        let config = HelpConfig {
            template_error_debug: true,
            zsh_autocomplete_hack: false,
        };
        config.save(&path).unwrap();
        assert_eq!(HelpConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: HelpConfig = serde_yaml::from_str("zsh_autocomplete_hack: true\n").unwrap();
        assert!(config.zsh_autocomplete_hack);
        assert!(!config.template_error_debug);
    }
}
