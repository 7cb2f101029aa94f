use nds_verify_core::InvalidHashError;

/// Errors that can occur while loading or querying a DAT catalog.
#[derive(Debug, thiserror::Error)]
pub enum DatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid DAT file: {0}")]
    InvalidDat(String),

    #[error("Catalog name {name:?} has no region: {reason}")]
    InvalidName { name: String, reason: String },
}

impl DatError {
    pub fn invalid_dat(msg: impl Into<String>) -> Self {
        Self::InvalidDat(msg.into())
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from hashing an image or reading an externally produced hash report.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Hashing was cancelled; the pass has to be restarted from the beginning.
    #[error("Hashing cancelled after {processed} bytes")]
    Cancelled { processed: u64 },

    #[error(transparent)]
    InvalidHash(#[from] InvalidHashError),

    #[error("Malformed hash report at line {line}: {reason}")]
    MalformedReport { line: usize, reason: String },

    /// The external tool reported a different image size than the one hashed
    /// locally, so the two hash sets do not describe the same dump.
    #[error("Image size mismatch: decrypted image is {decrypted} bytes, encrypted report says {encrypted}")]
    SizeMismatch { decrypted: u64, encrypted: u64 },
}

impl HashError {
    pub fn malformed_report(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedReport {
            line,
            reason: reason.into(),
        }
    }
}
