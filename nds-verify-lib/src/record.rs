use nds_verify_core::ImageHashes;
use serde::{Deserialize, Serialize};

/// Whether the in-game languages were checked against the declared list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageChecked {
    Yes,
    No,
    #[serde(rename = "unk", alias = "unknown")]
    Unknown,
}

impl LanguageChecked {
    /// Value written to the submission's `langchecked` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unknown => "unk",
        }
    }
}

impl std::fmt::Display for LanguageChecked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reconciled description of one cart and its dump.
///
/// Built by [`crate::reconcile::reconcile`] and checked by
/// [`crate::validate::validate`] before it is exported. Optional text
/// fields that do not apply (box fields on a loose cart, for instance)
/// are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledRecord {
    pub game_name: String,
    /// Region of the catalog entry (or the user's region without one)
    pub archive_region: String,
    /// Region of the physical cart in hand
    pub dump_region: String,
    /// Language codes; empty when left blank intentionally
    pub languages: Vec<String>,
    pub language_checked: LanguageChecked,
    pub catalog_id: Option<String>,
    /// "Rev N"
    pub revision_tag: Option<String>,
    /// "NDSi Enhanced"
    pub special_tag: Option<String>,
    pub decrypted: ImageHashes,
    pub encrypted: ImageHashes,
    pub internal_serial: String,
    /// `YYYY-MM-DD`
    pub dump_date: String,
    pub tool: String,
    pub cart_id: String,
    pub save_chip_id: Option<String>,
    pub front_serial: String,
    pub back_serial: String,
    pub pcb_serial: String,
    pub manual_serials: Vec<String>,
    pub box_serial: String,
    pub box_barcode: String,
    pub is_loose: bool,
}

impl ReconciledRecord {
    /// Languages as a comma-separated list.
    pub fn languages_joined(&self) -> String {
        self.languages.join(",")
    }
}
