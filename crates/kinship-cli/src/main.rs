//! Kinship CLI - compute and maintain family relationships from a family file.

use clap::Parser;
use kinship_cli::commands;
use kinship_cli::{Cli, CliError, Command, Config, Formatter, Session};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Run a command; `Ok(false)` means it completed but found problems.
fn run(cli: Cli) -> kinship_cli::Result<bool> {
    let config = Config::load(cli.config.as_deref())?;

    // Determine output format and color
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let file = cli.file.or(config.family_file);
    let open = || -> kinship_cli::Result<Session> {
        let file = file.as_deref().ok_or(CliError::NoFamilyFile)?;
        Session::open(file, cli.family.as_deref(), config.kinship.clone())
    };

    let output = match cli.command {
        Command::Label(args) => commands::execute_label(args, &open()?, &formatter)?,
        Command::Path(args) => commands::execute_path(args, &open()?, &formatter)?,
        Command::Set(args) => commands::execute_set(args, &mut open()?, &formatter)?,
        Command::RemoveMember(args) => {
            commands::execute_remove_member(args, &mut open()?, &formatter)?
        }
        Command::RemoveRelationship(args) => {
            commands::execute_remove_relationship(args, &mut open()?, &formatter)?
        }
        Command::Members => commands::execute_members(&open()?, &formatter)?,
        Command::Rules(args) => commands::execute_rules(args, &config.kinship, &formatter)?,
        Command::Check => {
            let file = file.as_deref().ok_or(CliError::NoFamilyFile)?;
            let (report, passed) = commands::execute_check(file, &formatter)?;
            println!("{}", report);
            if !passed {
                eprintln!("{}", formatter.error("Integrity check failed"));
            }
            return Ok(passed);
        }
    };

    println!("{}", output);
    Ok(true)
}
