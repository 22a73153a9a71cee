mod runner;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use command_help::{AppView, CommandView, HelpConfig, HelpDispatcher, HelpError, Shell};
use command_help_core::{App, AppError, Context, Sinks};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "help-render")]
#[command(about = "Render help text and shell completions for app definitions")]
struct Cli {
    /// Help layer settings (YAML). Environment toggles still apply.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print app help, or help for one command.
    Show(ShowArgs),
    /// Print the version line.
    Version(AppArgs),
    /// Print the data a help template is rendered against, as JSON.
    Data(ShowArgs),
    /// Print a shell completion script.
    Script(ScriptArgs),
    /// Check an app definition for structural errors.
    Validate(AppArgs),
    /// Run the app on the given arguments (help, version and completion only).
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct AppArgs {
    /// App definition file (YAML, or JSON with a .json extension).
    #[arg(long)]
    app: PathBuf,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[command(flatten)]
    app: AppArgs,
    /// Command to show; an empty name shows the command listing.
    command: Option<String>,
}

#[derive(Debug, Args)]
struct ScriptArgs {
    /// Target shell.
    #[arg(long)]
    shell: Shell,
    /// Program name the script registers completion for.
    #[arg(long)]
    prog: String,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    app: AppArgs,
    /// Arguments passed to the app, without the program name.
    #[arg(last = true)]
    args: Vec<String>,
}

/// Failure reported by `main`: message plus process exit code.
#[derive(Debug)]
struct Failure {
    message: String,
    code: i32,
}

impl From<HelpError> for Failure {
    fn from(err: HelpError) -> Self {
        Self {
            code: err.exit_code(),
            message: err.to_string(),
        }
    }
}

impl From<AppError> for Failure {
    fn from(err: AppError) -> Self {
        Self {
            code: 1,
            message: err.to_string(),
        }
    }
}

impl From<io::Error> for Failure {
    fn from(err: io::Error) -> Self {
        HelpError::from(err).into()
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_ansi(false)
        .compact()
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Command::Show(args) => run_show(args, &config),
        Command::Version(args) => run_version(args, &config),
        Command::Data(args) => run_data(args),
        Command::Script(args) => run_script(args),
        Command::Validate(args) => run_validate(args),
        Command::Run(args) => run_app(args, &config),
    });

    if let Err(failure) = result {
        eprintln!("Error: {}", failure.message);
        std::process::exit(failure.code);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<HelpConfig, Failure> {
    let config = match path {
        Some(path) => HelpConfig::load(path)?,
        None => HelpConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn load_app(args: &AppArgs) -> Result<App, Failure> {
    Ok(runner::prepare(App::load(&args.app)?))
}

/// Runs `f` with a context writing to stdout and stderr.
fn with_context<T>(app: &App, f: impl FnOnce(&mut Context<'_>) -> T) -> T {
    let stdout = io::stdout();
    let (mut out, mut err) = (stdout.lock(), io::stderr());
    let mut ctx = Context::new(app, Sinks::new(&mut out, &mut err));
    f(&mut ctx)
}

fn run_show(args: ShowArgs, config: &HelpConfig) -> Result<(), Failure> {
    let app = load_app(&args.app)?;
    let dispatcher = HelpDispatcher::new(config);
    with_context(&app, |ctx| match &args.command {
        Some(name) => dispatcher.show_command_help(ctx, name),
        None => dispatcher.show_app_help(ctx),
    })?;
    Ok(())
}

fn run_version(args: AppArgs, config: &HelpConfig) -> Result<(), Failure> {
    let app = load_app(&args)?;
    let dispatcher = HelpDispatcher::new(config);
    with_context(&app, |ctx| dispatcher.show_version(ctx));
    Ok(())
}

fn run_data(args: ShowArgs) -> Result<(), Failure> {
    let app = load_app(&args.app)?;
    let raw = match args.command.as_deref() {
        None | Some("") => serde_json::to_string_pretty(&AppView::new(&app)),
        Some(name) => {
            let command = app
                .command(name)
                .ok_or_else(|| HelpError::NoHelpTopic(name.to_string()))?;
            serde_json::to_string_pretty(&CommandView::new(&app, command))
        }
    }
    .map_err(|err| Failure {
        code: 1,
        message: format!("Failed to serialize template data: {err}"),
    })?;
    println!("{raw}");
    Ok(())
}

fn run_script(args: ScriptArgs) -> Result<(), Failure> {
    let mut out = io::stdout().lock();
    write!(out, "{}", args.shell.script(&args.prog))?;
    out.flush()?;
    Ok(())
}

fn run_validate(args: AppArgs) -> Result<(), Failure> {
    // Loading validates; a structural problem surfaces as AppError::Invalid.
    let app = App::load(&args.app)?;
    println!(
        "Validated '{}': {} command(s), {} global flag(s).",
        app.name,
        app.commands.len(),
        app.flags.len()
    );
    Ok(())
}

fn run_app(args: RunArgs, config: &HelpConfig) -> Result<(), Failure> {
    let app = load_app(&args.app)?;
    let argv: Vec<String> = std::iter::once(app.name.clone()).chain(args.args).collect();

    let stdout = io::stdout();
    let (mut out, mut err) = (stdout.lock(), io::stderr());
    runner::run(&app, config, &argv, Sinks::new(&mut out, &mut err))?;
    out.flush()?;
    Ok(())
}
