//! Turn a cart dump into a validated No-Intro submission record.
//!
//! The pipeline is: [`log_parser::parse`] the dump log, hash both images
//! (`nds_verify_dat::combine`), look the decrypted image up in the catalog,
//! then [`reconcile::reconcile`] everything with the user's input and gate
//! the result through [`validate::validate`] before [`export`] renders it.

pub mod error;
pub mod export;
pub mod input;
pub mod log_parser;
pub mod reconcile;
pub mod record;
pub mod settings;
pub mod validate;

pub use error::{
    ExportError, MalformedLogError, ReconciliationError, SettingsError, ValidationError,
};
pub use export::{ExportOptions, output_file_name, to_xml, write_submission};
pub use input::UserInput;
pub use log_parser::{LayoutKey, LogFields, ToolFamily};
pub use reconcile::reconcile;
pub use record::{LanguageChecked, ReconciledRecord};
pub use settings::{Settings, settings_path};
pub use validate::validate;
