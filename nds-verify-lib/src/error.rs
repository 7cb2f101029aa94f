use thiserror::Error;

/// A dump log that does not match any known layout.
///
/// The log is the authoritative source for cart identity, so this is
/// always fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed dump log at line {line_index} ({layout}): {reason}")]
pub struct MalformedLogError {
    /// 0-based line index
    pub line_index: usize,
    /// The layout variant that was being applied
    pub layout: String,
    pub reason: String,
}

impl MalformedLogError {
    pub fn new(line_index: usize, layout: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            line_index,
            layout: layout.into(),
            reason: reason.into(),
        }
    }
}

/// A record field that could not be resolved from the available sources.
///
/// When the offending value came from the user, the caller can ask again;
/// when it came from the log or catalog it cannot be fixed by re-prompting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot resolve {field}: {reason}")]
pub struct ReconciliationError {
    pub field: &'static str,
    pub reason: String,
}

impl ReconciliationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, "a value is required")
    }
}

/// A finished record that breaks a format or vocabulary rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid record field {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors loading or saving the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors rendering a record for submission.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Missing export setting: {0}")]
    MissingSetting(&'static str),
}
