//! Install-time completion scripts.
//!
//! The generated snippet makes the shell call the program again with the
//! partial command line followed by `--generate-bash-completion`, and offers
//! whatever lines it prints as candidates.

use std::fmt;
use std::io::Write;

use command_help_core::{Context, INIT_COMPLETION_FLAG_NAME};
use tracing::debug;

use crate::error::{HelpError, Result};

/// Name of the flag that switches a program into completion mode.
pub const COMPLETION_FLAG: &str = "generate-bash-completion";

const ZSH_PREAMBLE: &str = "autoload -U compinit && compinit;\nautoload -U bashcompinit && bashcompinit;";

/// Shells a completion script can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Shell {
    Bash,
    Zsh,
}

impl Shell {
    /// Parses the value given to `--init-completion`.
    ///
    /// ```
    /// use command_help::Shell;
    ///
    /// assert_eq!(Shell::from_name("zsh"), Some(Shell::Zsh));
    /// assert_eq!(Shell::from_name("fish"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bash" => Some(Shell::Bash),
            "zsh" => Some(Shell::Zsh),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
        }
    }

    /// Completion script for `prog` in this shell's dialect.
    pub fn script(self, prog: &str) -> String {
        match self {
            Shell::Bash => bash_completion_code(prog),
            Shell::Zsh => zsh_completion_code(prog),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bash completion snippet for `prog`, without a trailing newline.
pub fn bash_completion_code(prog: &str) -> String {
    format!(
        r#"_cli_bash_autocomplete() {{
     local cur opts base;
     COMPREPLY=();
     cur="${{COMP_WORDS[COMP_CWORD]}}";
     opts=$( ${{COMP_WORDS[@]:0:$COMP_CWORD}} --{COMPLETION_FLAG} );
     COMPREPLY=( $(compgen -W "${{opts}}" -- ${{cur}}) );
     return 0;
}};
complete -F _cli_bash_autocomplete {prog}"#
    )
}

/// Zsh completion snippet for `prog`: the bash snippet loaded through
/// zsh's bash compatibility layer.
pub fn zsh_completion_code(prog: &str) -> String {
    format!("{ZSH_PREAMBLE}\n{}", bash_completion_code(prog))
}

/// Prints a completion script when `--init-completion` is set.
///
/// The program name is taken from the first raw argument. Returns
/// `Ok(false)` when the flag is not set.
///
/// # Errors
///
/// [`HelpError::InvalidShell`] for a shell other than `bash` or `zsh`, in
/// which case nothing is printed, and [`HelpError::IoError`] when the
/// output sink fails.
pub fn check_init_completion(ctx: &mut Context<'_>) -> Result<bool> {
    let Some(value) = ctx.string(INIT_COMPLETION_FLAG_NAME).map(str::to_string) else {
        return Ok(false);
    };

    let shell = Shell::from_name(&value).ok_or(HelpError::InvalidShell(value))?;
    let prog = ctx.raw_args().first().cloned().unwrap_or_default();
    debug!(shell = %shell, prog = %prog, "Printing completion script");

    write!(ctx.writer(), "{}", shell.script(&prog))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use command_help_core::{App, Flag, Sinks};

    use super::*;

    const BASH_TOOL: &str = r#"_cli_bash_autocomplete() {
     local cur opts base;
     COMPREPLY=();
     cur="${COMP_WORDS[COMP_CWORD]}";
     opts=$( ${COMP_WORDS[@]:0:$COMP_CWORD} --generate-bash-completion );
     COMPREPLY=( $(compgen -W "${opts}" -- ${cur}) );
     return 0;
};
complete -F _cli_bash_autocomplete tool"#;

    fn init(value: &str) -> (Result<bool>, String) {
        let app = App::new("tool").with_flag(Flag::init_completion());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let result = {
            let mut ctx = Context::new(&app, Sinks::new(&mut out, &mut err))
                .with_raw_args(["tool", "--init-completion", value])
                .with_string("init-completion", value);
            check_init_completion(&mut ctx)
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_bash_script_text() {
        assert_eq!(bash_completion_code("tool"), BASH_TOOL);
    }

    #[test]
    fn test_zsh_script_is_preamble_plus_bash() {
        assert_eq!(
            zsh_completion_code("tool"),
            format!("autoload -U compinit && compinit;\nautoload -U bashcompinit && bashcompinit;\n{BASH_TOOL}")
        );
    }

    #[test]
    fn test_init_completion_prints_script() {
        let (result, out) = init("bash");
        assert!(result.unwrap());
        assert_eq!(out, BASH_TOOL);
    }

    #[test]
    fn test_init_completion_rejects_unknown_shell() {
        let (result, out) = init("fish");
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "--init-completion value cannot be 'fish'");
        assert_eq!(err.exit_code(), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_init_completion_not_set() {
        let app = App::new("tool");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut ctx = Context::new(&app, Sinks::new(&mut out, &mut err));
        assert!(!check_init_completion(&mut ctx).unwrap());
    }
}
