use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the syntaxes in zen-core/src/resources/snippets.json
// We need to duplicate this here since build scripts can't access src/ modules
const KNOWN_SYNTAXES: &[&str] = &["html", "xml", "xsl", "haml", "css", "scss", "less"];

// Mirror of the predefined profiles in zen-core/src/profile.rs
const KNOWN_PROFILES: &[&str] = &["xhtml", "html", "xml", "plain", "line"];

fn expansion_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("syntax")
            .long("syntax")
            .short('s')
            .value_parser(clap::builder::PossibleValuesParser::new(KNOWN_SYNTAXES))
            .value_hint(ValueHint::Other),
    )
    .arg(
        Arg::new("profile")
            .long("profile")
            .short('p')
            .value_parser(clap::builder::PossibleValuesParser::new(KNOWN_PROFILES))
            .value_hint(ValueHint::Other),
    )
    .arg(Arg::new("extract").long("extract").action(ArgAction::SetTrue))
    .arg(
        Arg::new("final-tabstop")
            .long("final-tabstop")
            .action(ArgAction::SetTrue),
    )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("zen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Expand abbreviations into markup")
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("snippets-file")
                .long("snippets")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(Arg::new("list-filters").long("list-filters").action(ArgAction::SetTrue))
        .arg(Arg::new("list-profiles").long("list-profiles").action(ArgAction::SetTrue))
        .arg(
            Arg::new("list-preferences")
                .long("list-preferences")
                .action(ArgAction::SetTrue),
        )
        .subcommand(expansion_args(
            Command::new("expand").arg(Arg::new("abbreviation").index(1)),
        ))
        .subcommand(expansion_args(
            Command::new("wrap")
                .arg(Arg::new("abbreviation").index(1))
                .arg(Arg::new("input").index(2).value_hint(ValueHint::FilePath)),
        ))
        .subcommand(
            Command::new("snippets").arg(
                Arg::new("syntax")
                    .long("syntax")
                    .short('s')
                    .value_parser(clap::builder::PossibleValuesParser::new(KNOWN_SYNTAXES)),
            ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "zen", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "zen", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "zen", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
