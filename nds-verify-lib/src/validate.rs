//! Final gate before a record is exported.
//!
//! Checks run in a fixed order and stop at the first violation.

use chrono::NaiveDate;
use nds_verify_core::vocabulary::NO_LANGUAGE;
use nds_verify_core::{HashAlgorithm, ImageHashes, Vocabulary};

use crate::error::ValidationError;
use crate::input::is_barcode;
use crate::reconcile::DSI_ENHANCED_TAG;
use crate::record::{LanguageChecked, ReconciledRecord};

pub fn validate(vocab: &Vocabulary, record: &ReconciledRecord) -> Result<(), ValidationError> {
    if record.game_name.trim().is_empty() {
        return Err(ValidationError::new("game_name", "empty"));
    }

    check_regions(vocab, record)?;
    check_languages(vocab, record)?;

    check_digests("decrypted", &record.decrypted)?;
    check_digests("encrypted", &record.encrypted)?;
    if record.decrypted.size != record.encrypted.size {
        return Err(ValidationError::new(
            "size",
            format!(
                "decrypted {} != encrypted {}",
                record.decrypted.size, record.encrypted.size
            ),
        ));
    }

    if record.is_loose {
        if !record.box_serial.is_empty() {
            return Err(ValidationError::new("box_serial", "set on a loose cart"));
        }
        if !record.box_barcode.is_empty() {
            return Err(ValidationError::new("box_barcode", "set on a loose cart"));
        }
        if !record.manual_serials.is_empty() {
            return Err(ValidationError::new("manual_serials", "set on a loose cart"));
        }
    }
    if !is_barcode(&record.box_barcode) {
        return Err(ValidationError::new(
            "box_barcode",
            format!("{:?} may only contain digits and spaces", record.box_barcode),
        ));
    }

    if !vocab.has_front_serial_prefix(&record.front_serial) {
        return Err(ValidationError::new(
            "front_serial",
            format!("{:?} has no known platform prefix", record.front_serial),
        ));
    }
    if record.internal_serial.chars().count() != 4 {
        return Err(ValidationError::new(
            "internal_serial",
            format!("{:?} is not 4 characters", record.internal_serial),
        ));
    }

    if let Some(tag) = &record.revision_tag {
        let valid = tag
            .strip_prefix("Rev ")
            .is_some_and(|n| !n.is_empty() && n != "0");
        if !valid {
            return Err(ValidationError::new(
                "revision_tag",
                format!("{tag:?} is not \"Rev N\""),
            ));
        }
    }
    if let Some(tag) = &record.special_tag {
        if tag != DSI_ENHANCED_TAG {
            return Err(ValidationError::new(
                "special_tag",
                format!("unknown tag {tag:?}"),
            ));
        }
    }

    if NaiveDate::parse_from_str(&record.dump_date, "%Y-%m-%d").is_err() {
        return Err(ValidationError::new(
            "dump_date",
            format!("{:?} is not YYYY-MM-DD", record.dump_date),
        ));
    }

    Ok(())
}

fn check_regions(vocab: &Vocabulary, record: &ReconciledRecord) -> Result<(), ValidationError> {
    for (field, region) in [
        ("archive_region", &record.archive_region),
        ("dump_region", &record.dump_region),
    ] {
        if !vocab.is_region(region) {
            return Err(ValidationError::new(
                field,
                format!("{region:?} is not a known region"),
            ));
        }
    }
    if record.archive_region != record.dump_region
        && !vocab.must_disambiguate(&record.archive_region)
    {
        return Err(ValidationError::new(
            "dump_region",
            format!(
                "{:?} differs from archive region {:?}, which covers a single market",
                record.dump_region, record.archive_region
            ),
        ));
    }
    Ok(())
}

fn check_languages(vocab: &Vocabulary, record: &ReconciledRecord) -> Result<(), ValidationError> {
    if let Some(code) = record.languages.iter().find(|c| !vocab.is_language(c)) {
        return Err(ValidationError::new(
            "languages",
            format!("{code:?} is not a known language code"),
        ));
    }
    if record.languages.len() > 1 && record.languages.iter().any(|c| c == NO_LANGUAGE) {
        return Err(ValidationError::new(
            "languages",
            format!("{NO_LANGUAGE:?} combined with other codes"),
        ));
    }

    if record.catalog_id.is_none() && record.language_checked != LanguageChecked::Yes {
        return Err(ValidationError::new(
            "language_checked",
            "must be yes for a dump with no catalog match",
        ));
    }
    if record.languages.is_empty() && record.language_checked != LanguageChecked::No {
        return Err(ValidationError::new(
            "languages",
            format!(
                "empty while languages checked is {}",
                record.language_checked
            ),
        ));
    }
    Ok(())
}

fn check_digests(image: &str, hashes: &ImageHashes) -> Result<(), ValidationError> {
    for algorithm in HashAlgorithm::ALL {
        let digest = hashes.digest(algorithm);
        if !digest.fits(algorithm) {
            return Err(ValidationError::new(
                "hashes",
                format!(
                    "{image} {algorithm} \"{digest}\" is not {} hex digits",
                    algorithm.hex_len()
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
