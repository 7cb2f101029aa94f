use std::path::Path;

use nds_verify_lib::log_parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::error::CliError;

/// Parse a dump log and print its fields.
pub(crate) fn run_log(path: &Path, json: bool) -> Result<(), CliError> {
    let text = std::fs::read_to_string(path)?;
    let fields = log_parser::parse(&text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Layout:".if_supports_color(Stdout, |t| t.bold()),
        fields.layout,
    );

    let none = "<none>".to_string();
    let rows: [(&str, &String); 10] = [
        ("Internal serial", &fields.internal_serial),
        ("Product code", &fields.product_code),
        ("Revision", &fields.revision),
        ("Cart ID", &fields.cart_id),
        ("Platform", &fields.platform),
        ("Save type", &fields.save_type),
        ("Save chip ID", fields.save_chip_id.as_ref().unwrap_or(&none)),
        ("Padding byte", fields.padding_byte.as_ref().unwrap_or(&none)),
        ("Dump date", &fields.dump_date),
        ("Tool", &fields.tool),
    ];
    for (label, value) in rows {
        println!(
            "  {} {}",
            format!("{:<16}", format!("{label}:")).if_supports_color(Stdout, |t| t.cyan()),
            value,
        );
    }
    Ok(())
}
