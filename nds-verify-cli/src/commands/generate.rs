use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use nds_verify_core::ImageHashes;
use nds_verify_dat::{Catalog, CatalogMatch, hash_file, pair, parse_dat_file, parse_encrypted_report};
use nds_verify_lib::{
    ExportOptions, LogFields, ReconciledRecord, Settings, UserInput, log_parser, reconcile,
    to_xml, validate, write_submission,
};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::GenerateArgs;
use crate::error::CliError;
use crate::interrupt::Interrupt;
use crate::prompt::Prompter;

/// Run the generate command.
pub(crate) fn run_generate(args: GenerateArgs, config_path: &Path) -> Result<(), CliError> {
    let settings = Settings::load(config_path)?;
    let vocab = &settings.vocabulary;
    let mut prompter = Prompter::stdio();

    if !args.rom.is_file() {
        return Err(CliError::other(format!(
            "ROM not found: {}",
            args.rom.display()
        )));
    }

    let log_path = args
        .log
        .clone()
        .unwrap_or_else(|| args.rom.with_extension("txt"));
    let log_text = fs::read_to_string(&log_path).map_err(|e| {
        CliError::other(format!(
            "Cannot read dump log {}: {}. Put the GodMode9 log next to the ROM or pass --log.",
            log_path.display(),
            e
        ))
    })?;
    let fields = log_parser::parse(&log_text)?;
    log::info!(
        "{} {} ({})",
        "Dump log:".if_supports_color(Stdout, |t| t.bold()),
        log_path.display(),
        fields.layout,
    );

    let decrypted = hash_rom(&args.rom)?;
    log::info!(
        "{} {} bytes, SHA-1 {}",
        "Decrypted:".if_supports_color(Stdout, |t| t.bold()),
        decrypted.size,
        decrypted.sha1,
    );

    let report = match &args.encrypted_report {
        Some(path) => fs::read_to_string(path)?,
        None => prompter.pasted_block(
            "Paste the encrypted image's hash report (size, CRC32, MD5, SHA1, SHA256), then an empty line:",
        )?,
    };
    let hashes = pair(decrypted, parse_encrypted_report(&report)?)?;

    let catalog_match = match args.dat.as_deref().or_else(|| settings.active_dat_path()) {
        Some(dat_path) => find_match(dat_path, &fields, &hashes.0)?,
        None => None,
    };

    let input = match &args.answers {
        Some(path) => toml::from_str::<UserInput>(&fs::read_to_string(path)?)?,
        None => prompter.collect_input(vocab, &fields, catalog_match.as_ref())?,
    };

    let record = reconcile(vocab, &fields, hashes, catalog_match.as_ref(), &input)?;
    validate(vocab, &record)?;
    print_summary(&record);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let options = ExportOptions {
        dumper: settings.dumper.clone(),
    };
    if args.dry_run {
        print!("{}", to_xml(&record, &options)?);
        return Ok(());
    }

    let dir = output_dir(&args, &settings);
    let path = write_submission(&record, &options, &dir)?;
    log::info!(
        "{} {}",
        "XML written to".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}

/// Hash the decrypted image with a byte progress bar. Ctrl-C during the
/// pass cancels it.
fn hash_rom(path: &Path) -> Result<ImageHashes, CliError> {
    let total = fs::metadata(path)?.len();
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "  {spinner:.cyan} Hashing [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        )
        .expect("static pattern")
        .progress_chars("=> "),
    );

    let progress = |done: u64, _total: u64| pb.set_position(done);
    let interrupt = Interrupt::listen();
    let cancel = interrupt.as_ref().map(Interrupt::arm);
    let result = hash_file(path, Some(&progress), cancel);
    if let Some(interrupt) = &interrupt {
        interrupt.disarm();
    }
    pb.finish_and_clear();
    Ok(result?)
}

fn find_match(
    dat_path: &Path,
    fields: &LogFields,
    decrypted: &ImageHashes,
) -> Result<Option<CatalogMatch>, CliError> {
    let catalog = Catalog::from_dat(parse_dat_file(dat_path)?);
    log::debug!("Loaded {} DAT entries from {}", catalog.len(), dat_path.display());

    let Some(m) = catalog.match_hashes(decrypted)? else {
        log::info!(
            "{}",
            "No match found in DAT.".if_supports_color(Stdout, |t| t.yellow())
        );
        return Ok(None);
    };

    log::info!(
        "{} {} (No-Intro ID {})",
        "Match found in DAT:".if_supports_color(Stdout, |t| t.green()),
        m.entry.display_name,
        m.entry.id,
    );
    if let Some(serial) = &m.entry.serial {
        if serial != &fields.internal_serial {
            log::warn!(
                "DAT serial {} differs from the cart's internal serial {}",
                serial,
                fields.internal_serial
            );
        }
    }
    Ok(Some(m))
}

fn print_summary(record: &ReconciledRecord) {
    log::info!("");
    log::info!(
        "  {} {}",
        "Game:".if_supports_color(Stdout, |t| t.cyan()),
        record.game_name
    );
    log::info!(
        "  {} {} (cart: {})",
        "Region:".if_supports_color(Stdout, |t| t.cyan()),
        record.archive_region,
        record.dump_region
    );
    log::info!(
        "  {} {} (checked: {})",
        "Languages:".if_supports_color(Stdout, |t| t.cyan()),
        record.languages_joined(),
        record.language_checked
    );
    for tag in [&record.revision_tag, &record.special_tag].into_iter().flatten() {
        log::info!(
            "  {} {}",
            "Tag:".if_supports_color(Stdout, |t| t.cyan()),
            tag
        );
    }
    log::info!("");
}

fn output_dir(args: &GenerateArgs, settings: &Settings) -> PathBuf {
    args.output
        .clone()
        .or_else(|| settings.output_dir.clone())
        .or_else(|| args.rom.parent().map(Path::to_path_buf))
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."))
}
