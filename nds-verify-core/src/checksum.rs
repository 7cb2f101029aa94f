use serde::Serialize;

use crate::error::InvalidHashError;

/// Digest algorithms recorded for every dumped image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HashAlgorithm {
    /// CRC-32 (IEEE)
    Crc32,
    /// MD5 (128-bit)
    Md5,
    /// SHA-1 (160-bit)
    Sha1,
    /// SHA-256 (256-bit)
    Sha256,
}

impl HashAlgorithm {
    /// All algorithms, in the order they appear in reports and records.
    pub const ALL: [HashAlgorithm; 4] = [Self::Crc32, Self::Md5, Self::Sha1, Self::Sha256];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Crc32 => "CRC-32",
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
        }
    }

    /// Number of hex characters in a digest of this algorithm.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Crc32 => 8,
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A lowercase hex digest.
///
/// Only constructed through [`normalize`] or [`HexDigest::from_bytes`], so
/// the string is always lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexDigest(String);

impl HexDigest {
    /// Hex-encode raw digest output.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this digest has the length `algorithm` produces.
    pub fn fits(&self, algorithm: HashAlgorithm) -> bool {
        self.0.len() == algorithm.hex_len()
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl std::fmt::Display for HexDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a digest reported by an external tool.
///
/// Surrounding whitespace is trimmed and the value is lower-cased. CRC-32
/// values are left-padded with zeros, since tools print them as integers.
/// Anything that is not hex of exactly the algorithm's length is rejected.
pub fn normalize(algorithm: HashAlgorithm, raw: &str) -> Result<HexDigest, InvalidHashError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InvalidHashError::new(algorithm, raw));
    }

    let mut value = trimmed.to_ascii_lowercase();
    if algorithm == HashAlgorithm::Crc32 && value.len() < algorithm.hex_len() {
        value = format!("{:0>8}", value);
    }

    if value.len() != algorithm.hex_len() {
        return Err(InvalidHashError::new(algorithm, raw));
    }
    Ok(HexDigest(value))
}

/// Size and digests of one image variant (decrypted or encrypted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageHashes {
    /// Image size in bytes
    pub size: u64,
    pub crc32: HexDigest,
    pub md5: HexDigest,
    pub sha1: HexDigest,
    pub sha256: HexDigest,
}

impl ImageHashes {
    pub fn digest(&self, algorithm: HashAlgorithm) -> &HexDigest {
        match algorithm {
            HashAlgorithm::Crc32 => &self.crc32,
            HashAlgorithm::Md5 => &self.md5,
            HashAlgorithm::Sha1 => &self.sha1,
            HashAlgorithm::Sha256 => &self.sha256,
        }
    }
}

#[cfg(test)]
#[path = "tests/checksum_tests.rs"]
mod tests;
