//! nds-verify CLI
//!
//! Generate No-Intro submission XML for Nintendo DS cart dumps made with
//! GodMode9 or GodMode9i.

mod commands;
mod error;
mod interrupt;
mod prompt;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "nds-verify")]
#[command(about = "Generate No-Intro submission XML for DS cart dumps", long_about = None)]
struct Cli {
    /// Settings file (defaults to ~/.config/nds-verify/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for `generate`.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Decrypted ROM image (.nds)
    rom: PathBuf,

    /// Dump log (defaults to the ROM path with a .txt extension)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Encrypted-image hash report; pasted on stdin when omitted
    #[arg(long)]
    encrypted_report: Option<PathBuf>,

    /// No-Intro DS DAT to match against (overrides settings)
    #[arg(long)]
    dat: Option<PathBuf>,

    /// TOML file with all manual answers (no prompting)
    #[arg(long)]
    answers: Option<PathBuf>,

    /// Output directory (defaults to settings, then the ROM's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the result instead of writing it
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print the record as JSON instead of XML
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a dump, match it against the DAT and write the submission XML
    Generate(GenerateArgs),

    /// Parse a dump log and show what was read
    Log {
        /// GodMode9 / GodMode9i dump log
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the resolved settings
    Show,

    /// Print the settings file path
    Path,

    /// Write a commented default settings file
    Init,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli
        .config
        .unwrap_or_else(nds_verify_lib::settings_path);

    let result: Result<(), CliError> = match cli.command {
        Commands::Generate(args) => commands::generate::run_generate(args, &config_path),
        Commands::Log { path, json } => commands::dump_log::run_log(&path, json),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&config_path),
            ConfigAction::Path => commands::config::run_config_path(&config_path),
            ConfigAction::Init => commands::config::run_config_init(&config_path),
        },
    };

    if let Err(e) = result {
        eprintln!(
            "{} {}",
            "Error:".if_supports_color(Stderr, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

/// Info messages print bare; other levels get a colored prefix.
/// `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            log::Level::Warn => writeln!(
                buf,
                "{} {}",
                "\u{26A0}".if_supports_color(Stderr, |t| t.yellow()),
                record.args()
            ),
            log::Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stderr, |t| t.red()),
                record.args()
            ),
            level => writeln!(
                buf,
                "{}",
                format!("[{} {}] {}", level, record.target(), record.args())
                    .if_supports_color(Stderr, |t| t.dimmed())
            ),
        })
        .init();
}
