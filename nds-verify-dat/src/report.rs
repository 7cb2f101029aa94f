//! Encrypted-image hash reports.
//!
//! The encrypted image is hashed by an external tool, which prints five
//! `Label: value` lines in a fixed order:
//!
//! ```text
//! Size:   134217728
//! CRC32:  1A2B3C4D
//! MD5:    ...
//! SHA1:   ...
//! SHA256: ...
//! ```
//!
//! Labels vary between tool versions ("Encrypted SHA1", "SHA-1"), so each
//! line is checked for its keyword rather than an exact label.

use std::io::Read;

use nds_verify_core::{HashAlgorithm, HexDigest, ImageHashes, normalize};

use crate::error::HashError;
use crate::hasher::{HashOptions, hash_reader};

/// Keyword expected in each report label, in line order.
const REPORT_LABELS: [&str; 5] = ["SIZE", "CRC32", "MD5", "SHA1", "SHA256"];

/// Upper-case a label and drop separators so "SHA-1", "Sha1" and
/// "Encrypted SHA1" all contain "SHA1".
fn label_key(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Value of report line `i`, after checking its label keyword.
fn report_value<'a>(lines: &[&'a str], i: usize) -> Result<&'a str, HashError> {
    let keyword = REPORT_LABELS[i];
    let Some((label, value)) = lines[i].split_once(':') else {
        return Err(HashError::malformed_report(i, "missing ':' separator"));
    };
    if !label_key(label).contains(keyword) {
        return Err(HashError::malformed_report(
            i,
            format!("expected a {keyword} line, found label {:?}", label.trim()),
        ));
    }
    Ok(value.trim())
}

/// Parse the external tool's five-line report for the encrypted image.
pub fn parse_encrypted_report(text: &str) -> Result<ImageHashes, HashError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.len() != REPORT_LABELS.len() {
        return Err(HashError::malformed_report(
            lines.len().min(REPORT_LABELS.len()),
            format!(
                "expected {} non-empty lines, found {}",
                REPORT_LABELS.len(),
                lines.len()
            ),
        ));
    }

    let raw_size = report_value(&lines, 0)?;
    let size = raw_size
        .parse()
        .map_err(|_| HashError::malformed_report(0, format!("invalid size {raw_size:?}")))?;
    let digest = |i: usize, algorithm: HashAlgorithm| -> Result<HexDigest, HashError> {
        Ok(normalize(algorithm, report_value(&lines, i)?)?)
    };

    Ok(ImageHashes {
        size,
        crc32: digest(1, HashAlgorithm::Crc32)?,
        md5: digest(2, HashAlgorithm::Md5)?,
        sha1: digest(3, HashAlgorithm::Sha1)?,
        sha256: digest(4, HashAlgorithm::Sha256)?,
    })
}

/// Hash the decrypted image and pair it with the encrypted report.
///
/// Both sets must describe images of the same size; a mismatch means the
/// external tool ran on a different file than the one hashed here.
pub fn combine<R: Read + ?Sized>(
    decrypted: &mut R,
    encrypted_report: &str,
    options: &HashOptions<'_>,
) -> Result<(ImageHashes, ImageHashes), HashError> {
    let decrypted = hash_reader(decrypted, options)?;
    let encrypted = parse_encrypted_report(encrypted_report)?;
    pair(decrypted, encrypted)
}

/// Pair two already computed hash sets, enforcing equal sizes.
pub fn pair(
    decrypted: ImageHashes,
    encrypted: ImageHashes,
) -> Result<(ImageHashes, ImageHashes), HashError> {
    if decrypted.size != encrypted.size {
        return Err(HashError::SizeMismatch {
            decrypted: decrypted.size,
            encrypted: encrypted.size,
        });
    }
    Ok((decrypted, encrypted))
}
