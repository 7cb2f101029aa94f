//! Parser for GodMode9 / GodMode9i cart dump logs.
//!
//! Both tools write a `Label : value` text file next to the dump. The first
//! six lines are the same for every tool; what follows depends on the tool
//! family, on whether the cart has a save chip, and on whether the tool is
//! new enough to print the padding byte:
//!
//! ```text
//! Title        : POKEMON PL
//! Product Code : CPUE-01
//! Revision     : 0
//! Cart ID      : C2FF0000
//! Platform     : NDS
//! Save Type    : FLASH 512kB
//! Save chip ID : 0xC22015        (GodMode9i omits this line without a save chip)
//! Padding Byte : FF              (newer GodMode9i only)
//! Timestamp    : 2023-05-01 12:34:56
//! GM9i Version : 3.4.1
//! ```
//!
//! Every known arrangement is listed in [`LAYOUTS`]. The active one is found
//! by probing line prefixes, then applied as data: a new tool variant is a
//! new table row.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::MalformedLogError;

/// Save type value written when the cart has no save chip.
pub const SAVE_TYPE_NONE: &str = "NONE";

/// Save chip value GodMode9 writes when the cart has no save chip.
const NO_SAVE_CHIP: &str = "<none>";

const PADDING_LABEL: &str = "Padding Byte : ";

/// Tool families that write dump logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToolFamily {
    /// GodMode9 (3DS)
    GodMode9,
    /// GodMode9i (DSi)
    GodMode9i,
}

impl ToolFamily {
    /// Name used in the record's tool field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GodMode9 => "GodMode9",
            Self::GodMode9i => "GodMode9i",
        }
    }

    /// First token of the version line, which identifies the family.
    fn token(&self) -> &'static str {
        match self {
            Self::GodMode9 => "GM9",
            Self::GodMode9i => "GM9i",
        }
    }

    /// GodMode9i prints chip ids as `0x...`.
    fn strips_hex_prefix(&self) -> bool {
        matches!(self, Self::GodMode9i)
    }
}

impl std::fmt::Display for ToolFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The axes that decide a log's line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LayoutKey {
    pub family: ToolFamily,
    /// Save type is `NONE`
    pub save_none: bool,
    /// A `Padding Byte` line is present
    pub padding: bool,
}

impl std::fmt::Display for LayoutKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.family,
            if self.save_none { "no save chip" } else { "save chip" },
            if self.padding { "padding line" } else { "no padding line" },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ProductCode,
    Revision,
    CartId,
    Platform,
    SaveType,
    SaveChipId,
    PaddingByte,
    Timestamp,
    ToolVersion,
}

/// One expected line: which field, where, and the label it must start with.
#[derive(Debug, Clone, Copy)]
struct LineSpec {
    field: Field,
    line: usize,
    label: &'static str,
}

const fn row(field: Field, line: usize, label: &'static str) -> LineSpec {
    LineSpec { field, line, label }
}

/// Lines shared by every layout (line 0 is the title and is not used).
const HEADER: [LineSpec; 5] = [
    row(Field::ProductCode, 1, "Product Code : "),
    row(Field::Revision, 2, "Revision     : "),
    row(Field::CartId, 3, "Cart ID      : "),
    row(Field::Platform, 4, "Platform     : "),
    row(Field::SaveType, 5, "Save Type    : "),
];

struct Layout {
    key: LayoutKey,
    tail: &'static [LineSpec],
}

impl Layout {
    fn version_line(&self) -> Option<&LineSpec> {
        self.tail.iter().find(|s| s.field == Field::ToolVersion)
    }
}

const GM9_TAIL: &[LineSpec] = &[
    row(Field::SaveChipId, 6, "Save chip ID : "),
    row(Field::Timestamp, 7, "Timestamp    : "),
    row(Field::ToolVersion, 8, "GM9 Version  : "),
];

const fn key(family: ToolFamily, save_none: bool, padding: bool) -> LayoutKey {
    LayoutKey {
        family,
        save_none,
        padding,
    }
}

/// Every known layout. GodMode9 keeps the save chip line (as `<none>`) and
/// never prints a padding byte; GodMode9i drops the save chip line when
/// there is no save chip.
const LAYOUTS: &[Layout] = &[
    Layout {
        key: key(ToolFamily::GodMode9, false, false),
        tail: GM9_TAIL,
    },
    Layout {
        key: key(ToolFamily::GodMode9, true, false),
        tail: GM9_TAIL,
    },
    Layout {
        key: key(ToolFamily::GodMode9i, false, false),
        tail: &[
            row(Field::SaveChipId, 6, "Save chip ID : "),
            row(Field::Timestamp, 7, "Timestamp    : "),
            row(Field::ToolVersion, 8, "GM9i Version : "),
        ],
    },
    Layout {
        key: key(ToolFamily::GodMode9i, false, true),
        tail: &[
            row(Field::SaveChipId, 6, "Save chip ID : "),
            row(Field::PaddingByte, 7, PADDING_LABEL),
            row(Field::Timestamp, 8, "Timestamp    : "),
            row(Field::ToolVersion, 9, "GM9i Version : "),
        ],
    },
    Layout {
        key: key(ToolFamily::GodMode9i, true, false),
        tail: &[
            row(Field::Timestamp, 6, "Timestamp    : "),
            row(Field::ToolVersion, 7, "GM9i Version : "),
        ],
    },
    Layout {
        key: key(ToolFamily::GodMode9i, true, true),
        tail: &[
            row(Field::PaddingByte, 6, PADDING_LABEL),
            row(Field::Timestamp, 7, "Timestamp    : "),
            row(Field::ToolVersion, 8, "GM9i Version : "),
        ],
    },
];

/// Fields read from one dump log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFields {
    /// First four characters of the product code, e.g. "CPUE"
    pub internal_serial: String,
    pub product_code: String,
    pub revision: String,
    pub cart_id: String,
    /// "NDS", "DSi Enhanced", ...
    pub platform: String,
    /// Save type, or [`SAVE_TYPE_NONE`]
    pub save_type: String,
    /// `None` when the log states there is no save chip
    pub save_chip_id: Option<String>,
    pub padding_byte: Option<String>,
    /// `YYYY-MM-DD`
    pub dump_date: String,
    /// Tool name and version, e.g. "GodMode9i 3.4.1"
    pub tool: String,
    pub layout: LayoutKey,
}

/// Parse a dump log.
pub fn parse(log_text: &str) -> Result<LogFields, MalformedLogError> {
    let lines: Vec<&str> = log_text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();

    let mut values = FieldValues::default();
    for row in &HEADER {
        values.set(row.field, read_line(&lines, row, "common header")?);
    }

    let save_type = values.get(Field::SaveType).unwrap_or_default();
    let layout = detect_layout(&lines, save_type == SAVE_TYPE_NONE)?;
    let layout_name = layout.key.to_string();
    log::debug!("Dump log layout: {layout_name}");

    for row in layout.tail {
        values.set(row.field, read_line(&lines, row, &layout_name)?);
    }

    values.into_fields(layout, &layout_name)
}

/// Pick the layout row that matches the log.
///
/// The padding line sits right after the save chip line (or where it would
/// be), so its prefix is probed first. The family is then the one whose
/// version token is found on its row's version line.
fn detect_layout(lines: &[&str], save_none: bool) -> Result<&'static Layout, MalformedLogError> {
    let padding_index = if save_none { 6 } else { 7 };
    let padding = lines
        .get(padding_index)
        .is_some_and(|l| l.starts_with(PADDING_LABEL));

    let mut last_probe = padding_index;
    for family in [ToolFamily::GodMode9i, ToolFamily::GodMode9] {
        let wanted = key(family, save_none, padding);
        let Some(layout) = LAYOUTS.iter().find(|l| l.key == wanted) else {
            continue;
        };
        let Some(version) = layout.version_line() else {
            continue;
        };
        last_probe = version.line;
        let token = lines
            .get(version.line)
            .and_then(|l| l.split_whitespace().next());
        if token == Some(family.token()) {
            return Ok(layout);
        }
    }

    Err(MalformedLogError::new(
        last_probe,
        format!(
            "any tool, {}, {}",
            if save_none { "no save chip" } else { "save chip" },
            if padding { "padding line" } else { "no padding line" },
        ),
        "no known tool version line",
    ))
}

fn read_line<'a>(
    lines: &[&'a str],
    row: &LineSpec,
    layout: &str,
) -> Result<&'a str, MalformedLogError> {
    let line = lines.get(row.line).ok_or_else(|| {
        MalformedLogError::new(row.line, layout, format!("missing {:?} line", row.field))
    })?;
    let value = line.strip_prefix(row.label).ok_or_else(|| {
        MalformedLogError::new(
            row.line,
            layout,
            format!("expected label {:?}, found {:?}", row.label.trim_end(), line),
        )
    })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(MalformedLogError::new(
            row.line,
            layout,
            format!("empty {:?} value", row.field),
        ));
    }
    Ok(value)
}

/// Raw values collected while walking a layout.
#[derive(Default)]
struct FieldValues<'a> {
    values: Vec<(Field, &'a str)>,
}

impl<'a> FieldValues<'a> {
    fn set(&mut self, field: Field, value: &'a str) {
        self.values.push((field, value));
    }

    fn get(&self, field: Field) -> Option<&'a str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| *v)
    }

    fn line_of(layout: &Layout, field: Field) -> usize {
        HEADER
            .iter()
            .chain(layout.tail)
            .find(|s| s.field == field)
            .map_or(0, |s| s.line)
    }

    fn require(&self, layout: &Layout, layout_name: &str, field: Field) -> Result<&'a str, MalformedLogError> {
        self.get(field).ok_or_else(|| {
            MalformedLogError::new(
                Self::line_of(layout, field),
                layout_name,
                format!("layout has no {:?} line", field),
            )
        })
    }

    fn into_fields(self, layout: &Layout, layout_name: &str) -> Result<LogFields, MalformedLogError> {
        let family = layout.key.family;
        let product_code = self.require(layout, layout_name, Field::ProductCode)?;
        let internal_serial: String = product_code.chars().take(4).collect();
        if internal_serial.chars().count() < 4 {
            return Err(MalformedLogError::new(
                Self::line_of(layout, Field::ProductCode),
                layout_name,
                format!("product code {product_code:?} is shorter than 4 characters"),
            ));
        }

        let timestamp = self.require(layout, layout_name, Field::Timestamp)?;
        let dump_date = timestamp
            .get(..10)
            .filter(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").is_ok())
            .ok_or_else(|| {
                MalformedLogError::new(
                    Self::line_of(layout, Field::Timestamp),
                    layout_name,
                    format!("timestamp {timestamp:?} does not start with a YYYY-MM-DD date"),
                )
            })?;

        let save_chip_id = match self.get(Field::SaveChipId) {
            None => None,
            Some(NO_SAVE_CHIP) => None,
            Some(chip) if family.strips_hex_prefix() => Some(
                chip.strip_prefix("0x")
                    .or_else(|| chip.strip_prefix("0X"))
                    .unwrap_or(chip)
                    .to_string(),
            ),
            Some(chip) => Some(chip.to_string()),
        };

        let version = self.require(layout, layout_name, Field::ToolVersion)?;

        Ok(LogFields {
            internal_serial,
            product_code: product_code.to_string(),
            revision: self.require(layout, layout_name, Field::Revision)?.to_string(),
            cart_id: self.require(layout, layout_name, Field::CartId)?.to_string(),
            platform: self.require(layout, layout_name, Field::Platform)?.to_string(),
            save_type: self.require(layout, layout_name, Field::SaveType)?.to_string(),
            save_chip_id,
            padding_byte: self.get(Field::PaddingByte).map(str::to_string),
            dump_date: dump_date.to_string(),
            tool: format!("{} {}", family.name(), version),
            layout: layout.key,
        })
    }
}

#[cfg(test)]
#[path = "tests/log_parser_tests.rs"]
mod tests;
