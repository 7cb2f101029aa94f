//! Shared value types for nds-verify: digest algorithms, normalized hex
//! digests, per-image hash sets, and the closed vocabularies every
//! submission record is checked against.

pub mod checksum;
pub mod error;
pub mod vocabulary;

pub use checksum::{HashAlgorithm, HexDigest, ImageHashes, normalize};
pub use error::InvalidHashError;
pub use vocabulary::Vocabulary;
