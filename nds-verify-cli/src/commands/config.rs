use std::path::Path;

use nds_verify_lib::settings::write_default;
use nds_verify_lib::{Settings, SettingsError};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::error::CliError;

/// Show the resolved settings and where they came from.
pub(crate) fn run_config_show(path: &Path) -> Result<(), CliError> {
    log::info!(
        "{}",
        "nds-verify Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    let status = if path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found, using defaults)"
            .if_supports_color(Stdout, |t| t.dimmed())
            .to_string()
    };
    log::info!(
        "  Settings file: {} {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        status,
    );

    let settings = Settings::load(path)?;
    let dumper = if settings.dumper.is_empty() {
        "not set".if_supports_color(Stdout, |t| t.yellow()).to_string()
    } else {
        settings.dumper.clone()
    };
    log::info!(
        "  {} {}",
        "dumper:".if_supports_color(Stdout, |t| t.cyan()),
        dumper
    );

    let dat = match settings.active_dat_path() {
        Some(p) => p.display().to_string(),
        None => "disabled".if_supports_color(Stdout, |t| t.dimmed()).to_string(),
    };
    log::info!(
        "  {} {}",
        "DAT:".if_supports_color(Stdout, |t| t.cyan()),
        dat
    );
    log::info!("");

    let serialized = toml::to_string_pretty(&settings).map_err(SettingsError::from)?;
    println!("{}", serialized);
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

/// Write the default settings template.
pub(crate) fn run_config_init(path: &Path) -> Result<(), CliError> {
    if write_default(path)? {
        log::info!(
            "{} {}",
            "Wrote".if_supports_color(Stdout, |t| t.green()),
            path.display(),
        );
        log::info!("Set `dumper` before generating submissions.");
    } else {
        log::warn!("{} already exists, leaving it unchanged", path.display());
    }
    Ok(())
}
