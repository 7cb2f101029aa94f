use thiserror::Error;

use crate::checksum::HashAlgorithm;

/// A digest string that is not valid hex of the expected length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {algorithm} digest: {value:?}")]
pub struct InvalidHashError {
    pub algorithm: HashAlgorithm,
    pub value: String,
}

impl InvalidHashError {
    pub fn new(algorithm: HashAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }
}
