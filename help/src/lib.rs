//! Help text and shell completion for command-line apps.
//!
//! This crate renders help for an [`App`](command_help_core::App) built with
//! `command-help-core`, suggests completion candidates when the shell asks
//! for them, and generates the bash and zsh snippets that wire the shell's
//! tab key to the program.
//!
//! # Main entry points
//!
//! - [`HelpDispatcher`]: app help, command help, the subcommand listing,
//!   the version line and the `help` command actions.
//! - [`Completer`]: flag and command candidates for a completion request.
//! - [`check_init_completion`]: prints a completion script for
//!   `--init-completion bash|zsh`.
//! - [`Renderer`]: best-effort template rendering with aligned columns.
//!
//! Runtime switches (template error diagnostics, `name:usage` candidates)
//! are carried by [`HelpConfig`], usually built once with
//! [`HelpConfig::from_env`].
//!
//! # Example
//!
//! ```
//! use command_help::{HelpConfig, HelpDispatcher};
//! use command_help_core::{App, Command, Context, Sinks};
//!
//! let app = App::new("tool")
//!     .with_usage("does things")
//!     .with_command(Command::new("build").with_alias("b").with_usage("Builds the project."))
//!     .with_command(Command::new("run").with_usage("Runs it."));
//!
//! let dispatcher = HelpDispatcher::new(&HelpConfig::default());
//! let (mut out, mut err) = (Vec::new(), Vec::new());
//! {
//!     let mut ctx = Context::new(&app, Sinks::new(&mut out, &mut err));
//!     dispatcher.show_app_help(&mut ctx).unwrap();
//! }
//!
//! let help = String::from_utf8(out).unwrap();
//! assert!(help.starts_with("NAME:\n   tool - does things\n"));
//! assert!(help.contains("     build, b  Builds the project.\n"));
//! assert!(help.contains("     run       Runs it.\n"));
//! ```

pub mod complete;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod render;
pub mod script;
pub mod tabwriter;
pub mod templates;
pub mod view;

pub use complete::Completer;
pub use config::HelpConfig;
pub use dispatch::{HelpDispatcher, HelpHooks, check_help, check_version, print_version};
pub use error::{HelpError, NO_HELP_TOPIC_EXIT_CODE, RenderError, Result};
pub use render::{FunctionTable, Renderer, TemplateFunction};
pub use script::{COMPLETION_FLAG, Shell, bash_completion_code, check_init_completion, zsh_completion_code};
pub use tabwriter::TabWriter;
pub use templates::{APP_HELP_TEMPLATE, COMMAND_HELP_TEMPLATE, SUBCOMMAND_HELP_TEMPLATE};
pub use view::{AppView, CommandView};
