//! No-Intro submission XML for a validated record.
//!
//! ```xml
//! <datafile>
//!     <game name="...">
//!         <archive name region languages langchecked [number] [version] [special]/>
//!         <source>
//!             <details section d_date ... comment1 [comment2] originalformat/>
//!             <serials media_serial1 media_serial2 pcb_serial [box_serial] [box_barcode]/>
//!             <file format="Decrypted" .../>
//!             <file format="Encrypted" .../>
//!         </source>
//!     </game>
//! </datafile>
//! ```

use std::path::{Path, PathBuf};

use nds_verify_core::ImageHashes;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::error::ExportError;
use crate::record::ReconciledRecord;

/// Values that come from settings rather than from the record.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub dumper: String,
}

/// Start tag with attributes in insertion order.
///
/// Values are escaped here so that newlines survive attribute-value
/// normalization on the reading side.
struct Element {
    start: BytesStart<'static>,
}

impl Element {
    fn new(name: &'static str) -> Self {
        Self {
            start: BytesStart::new(name),
        }
    }

    fn attr(mut self, key: &str, value: &str) -> Self {
        let escaped = quick_xml::escape::escape(value)
            .replace('\n', "&#10;")
            .replace('\r', "&#13;");
        self.start
            .push_attribute(Attribute::from((key.as_bytes(), escaped.as_bytes())));
        self
    }

    fn attr_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.attr(key, v),
            _ => self,
        }
    }
}

/// Render a record as a submission document.
pub fn to_xml(record: &ReconciledRecord, options: &ExportOptions) -> Result<String, ExportError> {
    if options.dumper.trim().is_empty() {
        return Err(ExportError::MissingSetting("dumper"));
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("datafile")))?;
    writer.write_event(Event::Start(
        Element::new("game").attr("name", &record.game_name).start,
    ))?;

    let languages = record.languages_joined();
    let archive = Element::new("archive")
        .attr("name", &record.game_name)
        .attr("region", &record.archive_region)
        .attr("languages", &languages)
        .attr("langchecked", record.language_checked.as_str())
        .attr_opt("number", record.catalog_id.as_deref())
        .attr_opt("version", record.revision_tag.as_deref())
        .attr_opt("special", record.special_tag.as_deref());
    writer.write_event(Event::Empty(archive.start))?;

    writer.write_event(Event::Start(BytesStart::new("source")))?;

    let mut comment1 = format!("Cart ID: {}", record.cart_id);
    if let Some(chip) = &record.save_chip_id {
        comment1.push_str(&format!("\nSave chip ID: {chip}"));
    }
    let comment2 = (!record.manual_serials.is_empty())
        .then(|| format!("Manual serial(s): {}", record.manual_serials.join(", ")));
    let details = Element::new("details")
        .attr("section", "Trusted Dump")
        .attr("region", &record.dump_region)
        .attr("d_date", &record.dump_date)
        .attr("d_date_info", "1")
        .attr("r_date", "")
        .attr("r_date_info", "0")
        .attr("dumper", options.dumper.trim())
        .attr("project", "No-Intro")
        .attr("tool", &record.tool)
        .attr("comment1", &comment1)
        .attr_opt("comment2", comment2.as_deref())
        .attr("originalformat", "Decrypted");
    writer.write_event(Event::Empty(details.start))?;

    let mut serials = Element::new("serials")
        .attr("media_serial1", &record.front_serial)
        .attr("media_serial2", &record.back_serial)
        .attr("pcb_serial", &record.pcb_serial);
    if !record.is_loose {
        serials = serials
            .attr_opt("box_serial", Some(&record.box_serial))
            .attr_opt("box_barcode", Some(&record.box_barcode));
    }
    writer.write_event(Event::Empty(serials.start))?;

    for (format, hashes) in [
        ("Decrypted", &record.decrypted),
        ("Encrypted", &record.encrypted),
    ] {
        writer.write_event(Event::Empty(
            file_element(format, hashes, &record.internal_serial).start,
        ))?;
    }

    writer.write_event(Event::End(BytesEnd::new("source")))?;
    writer.write_event(Event::End(BytesEnd::new("game")))?;
    writer.write_event(Event::End(BytesEnd::new("datafile")))?;

    let mut xml = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    xml.push('\n');
    Ok(xml)
}

fn file_element(format: &str, hashes: &ImageHashes, serial: &str) -> Element {
    Element::new("file")
        .attr("format", format)
        .attr("extension", "nds")
        .attr("size", &hashes.size.to_string())
        .attr("crc32", hashes.crc32.as_str())
        .attr("md5", hashes.md5.as_str())
        .attr("sha1", hashes.sha1.as_str())
        .attr("sha256", hashes.sha256.as_str())
        .attr("serial", serial)
}

/// `"<game> - <dumper> - <date>.xml"`, with characters that cannot appear
/// in file names replaced by `_`.
pub fn output_file_name(record: &ReconciledRecord, dumper: &str) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c => c,
            })
            .collect()
    };
    format!(
        "{} - {} - {}.xml",
        clean(&record.game_name),
        clean(dumper.trim()),
        record.dump_date
    )
}

/// Render and write the submission into `dir`. Returns the written path.
pub fn write_submission(
    record: &ReconciledRecord,
    options: &ExportOptions,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let xml = to_xml(record, options)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(output_file_name(record, &options.dumper));
    std::fs::write(&path, xml)?;
    log::debug!("Wrote submission to {}", path.display());
    Ok(path)
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
