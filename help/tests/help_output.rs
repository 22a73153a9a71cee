//! Integration tests for rendered help text.

use std::path::PathBuf;

use command_help::{HelpConfig, HelpDispatcher, HelpError};
use command_help_core::{App, Author, Command, Context, Flag, Sinks};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn greet() -> App {
    App::load(fixture("greet.yaml")).expect("fixture app should load")
}

/// Runs `f` against a fresh context and returns (stdout, stderr).
fn capture<F>(app: &App, f: F) -> (String, String)
where
    F: FnOnce(&mut Context<'_>),
{
    let (mut out, mut err) = (Vec::new(), Vec::new());
    {
        let mut ctx = Context::new(app, Sinks::new(&mut out, &mut err));
        f(&mut ctx);
    }
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

fn dispatcher() -> HelpDispatcher {
    HelpDispatcher::new(&HelpConfig::default())
}

#[test]
fn test_app_help_full_text() {
    let app = greet();
    let (out, err) = capture(&app, |ctx| dispatcher().show_app_help(ctx).unwrap());

    let expected = "\
NAME:
   greet - fight the loneliness!

USAGE:
   greet [global options] command [command options] [arguments...]

VERSION:
   0.1.0

AUTHORS:
   Ana <ana@example.com>
   Bo

COMMANDS:
     hello, hi  say hello
   templates:
     add         add a template
     remove, rm  remove a template

GLOBAL OPTIONS:
   --lang LANG, -l LANG  language for the greeting
   --verbose             talk more

COPYRIGHT:
   (c) 2026 Example
";
    assert_eq!(out, expected);
    assert!(err.is_empty());
}

#[test]
fn test_app_help_lists_build_command() {
    let app = App::new("tool")
        .with_version("1.0")
        .with_command(Command::new("build").with_alias("b").with_usage("Builds the project."));
    let (out, _) = capture(&app, |ctx| dispatcher().show_app_help(ctx).unwrap());

    assert!(out.contains("COMMANDS:\n"));
    assert!(out.contains("     build, b  Builds the project.\n"));
    assert!(out.contains("VERSION:\n   1.0\n"));
}

#[test]
fn test_single_author_heading() {
    let app = App::new("tool").with_author(Author::new("Ana"));
    let (out, _) = capture(&app, |ctx| dispatcher().show_app_help(ctx).unwrap());
    assert!(out.contains("\nAUTHOR:\n   Ana\n"));
    assert!(!out.contains("AUTHORS:"));
}

#[test]
fn test_hidden_version_is_omitted() {
    let mut app = App::new("tool").with_version("1.0");
    app.hide_version = true;
    let (out, _) = capture(&app, |ctx| dispatcher().show_app_help(ctx).unwrap());
    assert!(!out.contains("VERSION:"));
}

#[test]
fn test_command_help_text() {
    let app = greet();
    let (out, _) = capture(&app, |ctx| dispatcher().show_command_help(ctx, "hi").unwrap());

    let expected = concat!(
        "NAME:\n",
        "   greet hello - say hello\n",
        "\n",
        "USAGE:\n",
        "   greet hello [command options] [arguments...]\n",
        "\n",
        "OPTIONS:\n",
        "   --loud  shout it\n",
        "   \n",
    );
    assert_eq!(out, expected);
}

#[test]
fn test_command_help_shows_category() {
    let app = greet();
    let (out, _) = capture(&app, |ctx| dispatcher().show_command_help(ctx, "rm").unwrap());
    assert!(out.starts_with("NAME:\n   greet remove - remove a template\n"));
    assert!(out.contains("\nCATEGORY:\n   templates\n"));
    assert!(!out.contains("OPTIONS:"));
}

#[test]
fn test_subcommand_listing_for_empty_name() {
    let app = greet();
    let (out, _) = capture(&app, |ctx| dispatcher().show_command_help(ctx, "").unwrap());

    assert!(out.starts_with("NAME:\n   greet - fight the loneliness!\n"));
    assert!(out.contains("USAGE:\n   greet command [command options] [arguments...]\n"));
    assert!(out.contains("     hello, hi  say hello\n"));
    assert!(out.contains("   templates:\n"));
    assert!(!out.contains("debug-dump"));
    assert!(!out.contains("--trace"));
}

#[test]
fn test_subcommand_help_equals_command_help() {
    let app = greet();
    let hello = app.command("hello").unwrap();

    let (mut bound, mut err) = (Vec::new(), Vec::new());
    {
        let mut ctx = Context::new(&app, Sinks::new(&mut bound, &mut err)).with_command(hello);
        dispatcher().show_subcommand_help(&mut ctx).unwrap();
    }
    let (named, _) = capture(&app, |ctx| dispatcher().show_command_help(ctx, "hello").unwrap());
    assert_eq!(String::from_utf8(bound).unwrap(), named);
}

#[test]
fn test_unknown_topic_error() {
    let app = greet();
    let mut outcome = None;
    let (out, _) = capture(&app, |ctx| outcome = Some(dispatcher().show_command_help(ctx, "deploy")));

    match outcome.unwrap() {
        Err(err @ HelpError::NoHelpTopic(_)) => {
            assert_eq!(err.exit_code(), 3);
            assert_eq!(err.to_string(), "No help topic for 'deploy'");
        }
        other => panic!("expected NoHelpTopic, got {other:?}"),
    }
    assert!(out.is_empty());
}

#[test]
fn test_custom_app_template_with_extra_info() {
    let app = App::new("tool")
        .with_help_template("{{ name }} built {{ extra_info()[\"built\"] }}\n")
        .with_extra_info(|| [("built".to_string(), "today".to_string())].into());
    let (out, _) = capture(&app, |ctx| dispatcher().show_app_help(ctx).unwrap());
    assert_eq!(out, "tool built today\n");
}

#[test]
fn test_broken_custom_template_with_debug() {
    let app = App::new("tool").with_help_template("{{ nope() }}");
    let config = HelpConfig {
        template_error_debug: true,
        ..Default::default()
    };

    let (out, err) = capture(&app, |ctx| HelpDispatcher::new(&config).show_app_help(ctx).unwrap());
    assert!(out.is_empty());
    assert!(err.starts_with("CLI TEMPLATE ERROR:"));

    let (out, err) = capture(&app, |ctx| dispatcher().show_app_help(ctx).unwrap());
    assert!(out.is_empty());
    assert!(err.is_empty());
}

#[test]
fn test_help_flag_triggers_command_help() {
    let app = greet().with_flag(Flag::help());
    let (mut out, mut err) = (Vec::new(), Vec::new());
    {
        let mut ctx = Context::new(&app, Sinks::new(&mut out, &mut err)).with_bool("h", true);
        assert!(command_help::check_help(&ctx));
        assert!(dispatcher().check_command_help(&mut ctx, "add"));
    }
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("NAME:\n   greet add - add a template\n"));
}
