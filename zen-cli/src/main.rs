// Command-line interface for zen
//
// This binary expands abbreviations into markup from the shell or from editor
// integrations that prefer spawning a process over linking zen-core.
//
// Usage:
//  zen <abbreviation> [--syntax <name>] [--profile <name>]   - Expand (default)
//  zen expand <abbreviation> [--extract]                      - Same as above (explicit)
//  zen wrap <abbreviation> [<file>]                           - Wrap file or stdin contents
//  zen snippets [--syntax <name>]                             - List the visible vocabulary
//  zen --list-filters | --list-profiles | --list-preferences
//
// Configuration:
//
// `zen.toml` in the working directory is picked up when present; `--config` layers an
// explicit file on top. `--snippets` loads a user vocabulary JSON file, overriding the
// `expand.snippets` setting. Command-line flags win over both.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;
use zen_config::{Loader, ZenConfig};
use zen_core::{ExpandOptions, Expander};

const SUBCOMMANDS: &[&str] = &["expand", "wrap", "snippets", "help"];

fn syntax_arg() -> Arg {
    Arg::new("syntax")
        .long("syntax")
        .short('s')
        .value_name("NAME")
        .help("Syntax of the document (html, xml, xsl, haml, css, scss, less, ...)")
        .value_hint(ValueHint::Other)
}

fn profile_arg() -> Arg {
    Arg::new("profile")
        .long("profile")
        .short('p')
        .value_name("NAME")
        .help("Output profile (xhtml, html, xml, plain, line or one from the config)")
        .value_hint(ValueHint::Other)
}

fn extract_arg() -> Arg {
    Arg::new("extract")
        .long("extract")
        .help("Print clean text and tabstop ranges as JSON")
        .action(ArgAction::SetTrue)
}

fn final_tabstop_arg() -> Arg {
    Arg::new("final-tabstop")
        .long("final-tabstop")
        .help("Append a final ${0} caret when the output has none")
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("zen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Expand abbreviations into markup")
        .long_about(
            "zen expands short abbreviations into full markup with editor tabstops.\n\n\
            Commands:\n  \
            - expand:   Expand an abbreviation (default command)\n  \
            - wrap:     Wrap text read from a file or stdin with an abbreviation\n  \
            - snippets: List snippets and abbreviations of a syntax\n\n\
            Examples:\n  \
            zen 'ul>li.item$*3'                 # Expand as HTML\n  \
            zen m10 --syntax css                # Stylesheet snippet\n  \
            zen expand 'a' --extract            # JSON with tabstop ranges\n  \
            printf 'a\\nb' | zen wrap 'ul>li*'   # One li per line",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a zen.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("snippets-file")
                .long("snippets")
                .value_name("PATH")
                .help("Path to a user vocabulary JSON file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("list-filters")
                .long("list-filters")
                .help("List available output filters")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-profiles")
                .long("list-profiles")
                .help("List available output profiles")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-preferences")
                .long("list-preferences")
                .help("List preferences with their current values")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("expand")
                .about("Expand an abbreviation (default command)")
                .arg(
                    Arg::new("abbreviation")
                        .help("Abbreviation to expand, a trailing |filter adds filters")
                        .required(true)
                        .index(1),
                )
                .arg(syntax_arg())
                .arg(profile_arg())
                .arg(extract_arg())
                .arg(final_tabstop_arg()),
        )
        .subcommand(
            Command::new("wrap")
                .about("Wrap text with an abbreviation")
                .long_about(
                    "Wrap text with an abbreviation.\n\n\
                    Each line goes to an implicitly repeated element (li*), or the whole\n\
                    text lands in the innermost element. $# marks where the text goes.\n\
                    The text is read from <input> or, when absent, from stdin.",
                )
                .arg(
                    Arg::new("abbreviation")
                        .help("Abbreviation to wrap with")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("input")
                        .help("File holding the text to wrap (defaults to stdin)")
                        .index(2)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(syntax_arg())
                .arg(profile_arg())
                .arg(extract_arg())
                .arg(final_tabstop_arg()),
        )
        .subcommand(
            Command::new("snippets")
                .about("List snippets and abbreviations visible from a syntax")
                .arg(syntax_arg()),
        )
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // A bare abbreviation means `expand`
    let args = if args.len() > 1
        && !args[1].starts_with('-')
        && !SUBCOMMANDS.contains(&args[1].as_str())
    {
        let mut injected = vec![args[0].clone(), "expand".to_string()];
        injected.extend_from_slice(&args[1..]);
        injected
    } else {
        args
    };

    let matches = build_cli().get_matches_from(&args);
    init_tracing(matches.get_flag("verbose"));

    let config = load_cli_config(&matches);
    let expander = build_expander(&config, &matches);

    if matches.get_flag("list-filters") {
        handle_list_filters_command(&expander);
        return;
    }
    if matches.get_flag("list-profiles") {
        handle_list_profiles_command(&expander);
        return;
    }
    if matches.get_flag("list-preferences") {
        handle_list_preferences_command(&expander);
        return;
    }

    match matches.subcommand() {
        Some(("expand", sub_matches)) => {
            let abbreviation = required(sub_matches, "abbreviation");
            let options = expand_options(&config, sub_matches);
            handle_expand_command(&expander, abbreviation, None, &options, sub_matches.get_flag("extract"));
        }
        Some(("wrap", sub_matches)) => {
            let abbreviation = required(sub_matches, "abbreviation");
            let text = read_input(sub_matches.get_one::<String>("input").map(|s| s.as_str()));
            let options = expand_options(&config, sub_matches);
            handle_expand_command(
                &expander,
                abbreviation,
                Some(&text),
                &options,
                sub_matches.get_flag("extract"),
            );
        }
        Some(("snippets", sub_matches)) => {
            let syntax = sub_matches
                .get_one::<String>("syntax")
                .cloned()
                .unwrap_or_else(|| config.expand.syntax.clone());
            handle_snippets_command(&expander, &syntax);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Missing required argument <{name}>");
            std::process::exit(2);
        }
    }
}

fn load_cli_config(matches: &ArgMatches) -> ZenConfig {
    let loader = Loader::new().with_optional_file("zen.toml");
    let loader = match matches.get_one::<String>("config") {
        Some(path) => loader.with_file(path),
        None => loader,
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn build_expander(config: &ZenConfig, matches: &ArgMatches) -> Expander {
    let mut expander = Expander::with_defaults().unwrap_or_else(|err| {
        eprintln!("Failed to load the built-in vocabulary: {err}");
        std::process::exit(1);
    });

    if let Err(err) = config.apply(&mut expander) {
        eprintln!("Failed to apply configuration: {err}");
        std::process::exit(1);
    }

    if let Some(path) = matches.get_one::<String>("snippets-file") {
        debug!(path = %path, "loading user vocabulary");
        if let Err(err) = zen_config::load_vocabulary(&mut expander, Path::new(path)) {
            eprintln!("Failed to load snippets: {err}");
            std::process::exit(1);
        }
        // Reapply variables on top of the replaced user tier
        for (name, value) in &config.variables {
            expander.resources_mut().set_variable(name, value);
        }
    }
    expander
}

/// Configured defaults with the command-line flags layered on top
fn expand_options(config: &ZenConfig, matches: &ArgMatches) -> ExpandOptions {
    let mut options = config.expand_options();
    if let Some(syntax) = matches.get_one::<String>("syntax") {
        options.syntax = syntax.clone();
    }
    if let Some(profile) = matches.get_one::<String>("profile") {
        options = options.with_profile(profile.as_str());
    }
    if matches.get_flag("final-tabstop") {
        options.insert_final_tabstop = true;
    }
    options
}

fn read_input(path: Option<&str>) -> String {
    match path {
        Some(path) => fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading file '{path}': {e}");
            std::process::exit(1);
        }),
        None => {
            let mut text = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut text) {
                eprintln!("Error reading stdin: {e}");
                std::process::exit(1);
            }
            text
        }
    }
}

/// Handle the expand and wrap commands
fn handle_expand_command(
    expander: &Expander,
    abbreviation: &str,
    wrap_text: Option<&str>,
    options: &ExpandOptions,
    extract: bool,
) {
    let result = match wrap_text {
        Some(text) => expander.wrap(abbreviation, text, options),
        None => expander.expand(abbreviation, options),
    };
    let output = result.unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });

    if extract {
        let extracted = zen_core::tabstops::extract(&output);
        match serde_json::to_string_pretty(&extracted) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{output}");
    }
}

/// Handle the snippets command
fn handle_snippets_command(expander: &Expander, syntax: &str) {
    if !expander.resources().has_syntax(syntax) {
        eprintln!("Unknown syntax '{syntax}'");
        std::process::exit(1);
    }
    let snippets = expander.resources().all_snippets(syntax);
    let width = snippets.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for entry in snippets.values() {
        let value = entry.value.replace('\n', "\\n");
        println!("{:width$}  {value}", entry.name);
    }
}

/// Handle the list-filters command
fn handle_list_filters_command(expander: &Expander) {
    println!("Available filters:\n");
    let filters = expander.filters();
    for name in filters.list_filters() {
        let description = filters.get(&name).map(|f| f.description()).unwrap_or_default();
        println!("  {name:<8} {description}");
    }
}

/// Handle the list-profiles command
fn handle_list_profiles_command(expander: &Expander) {
    println!("Available profiles:\n");
    for name in expander.profiles().list() {
        println!("  {name}");
    }
}

/// Handle the list-preferences command
fn handle_list_preferences_command(expander: &Expander) {
    for info in expander.preferences().list() {
        println!("{} = {:?}", info.name, info.value.to_string());
        println!("    {}", info.description);
    }
}
