//! Error types for help rendering and completion.

use thiserror::Error;

/// Exit code for a help request naming an unknown command.
pub const NO_HELP_TOPIC_EXIT_CODE: i32 = 3;

/// Errors returned to callers of the help layer.
#[derive(Debug, Error)]
pub enum HelpError {
    /// Help was requested for a command that does not exist and no
    /// command-not-found callback is configured.
    #[error("No help topic for '{0}'")]
    NoHelpTopic(String),

    /// `--init-completion` was given a shell this layer cannot generate.
    #[error("--init-completion value cannot be '{0}'")]
    InvalidShell(String),

    /// Writing generated output or reading configuration failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl HelpError {
    /// Process exit status for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_help::HelpError;
    ///
    /// assert_eq!(HelpError::NoHelpTopic("deploy".into()).exit_code(), 3);
    /// assert_eq!(HelpError::InvalidShell("fish".into()).exit_code(), 1);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            HelpError::NoHelpTopic(_) => NO_HELP_TOPIC_EXIT_CODE,
            HelpError::InvalidShell(_) | HelpError::IoError(_) | HelpError::YamlError(_) => 1,
        }
    }
}

/// Failures while rendering a help template.
///
/// These never reach callers of the dispatcher: rendering is best-effort and
/// the renderer only logs them (see [`Renderer`](crate::Renderer)).
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template text is not valid template syntax.
    #[error("template parse error: {0}")]
    Parse(#[source] minijinja::Error),

    /// The template failed while being evaluated against its data.
    #[error("template execution error: {0}")]
    Execute(#[source] minijinja::Error),

    /// The output sink rejected the rendered text.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`HelpError`].
pub type Result<T> = std::result::Result<T, HelpError>;
