//! Core command tree types for help rendering and shell completion.
//!
//! This crate defines the read-only model the help layer works on:
//!
//! - [`Flag`]: a flag identified by a comma-separated alias set, with a
//!   visibility bit and a boolean/value kind.
//! - [`Command`]: a named command with aliases, usage text, a category,
//!   flags and nested subcommands.
//! - [`App`]: the root of the tree, with global flags, metadata and
//!   optional callbacks (command-not-found, completion, extra template info).
//! - [`Context`]: a per-invocation view binding parsed flag values and
//!   arguments to an app, with its output [`Sinks`].
//!
//! Validation ([`validate_app`]) catches structural errors such as repeated
//! aliases inside a flag or commands sharing a name. App definitions can be
//! loaded from YAML or JSON with [`App::load`].
//!
//! # Example
//!
//! ```
//! use command_help_core::*;
//!
//! let app = App::new("tool")
//!     .with_version("1.0")
//!     .with_flag(Flag::boolean("verbose, v").with_usage("Enable verbose output"))
//!     .with_command(
//!         Command::new("build")
//!             .with_alias("b")
//!             .with_usage("Builds the project.")
//!             .with_flag(Flag::with_value("target, t")),
//!     );
//!
//! assert_eq!(app.command("b").unwrap().name, "build");
//! assert!(app.find_flag("verbose").is_some());
//! assert!(validate_app(&app).is_empty());
//! ```

mod context;
mod error;
mod load;
mod types;
mod validate;

pub use context::{Context, Sinks};
pub use error::{AppError, Result};
pub use types::*;
pub use validate::{ValidationError, validate_app};
