//! Merge the log, hashes, catalog match and user input into one record.
//!
//! Authority, highest first: the catalog (name, region, id, language tag),
//! the dump log (serial, revision, platform, cart and save chip ids, date,
//! tool), the computed hashes, then the user. A value from a higher source
//! is never replaced by a lower one; user input for a field the catalog
//! already settled is ignored.

use nds_verify_core::{ImageHashes, Vocabulary};
use nds_verify_dat::CatalogMatch;

use crate::error::ReconciliationError;
use crate::input::{
    UserInput, check_box_barcode, check_front_serial, check_game_name, check_region,
    parse_languages, split_serial_list, tag_languages,
};
use crate::log_parser::LogFields;
use crate::record::{LanguageChecked, ReconciledRecord};

/// Platform value that marks a DSi-enhanced cart.
pub const DSI_ENHANCED_PLATFORM: &str = "DSi Enhanced";

/// Special tag recorded for DSi-enhanced carts.
pub const DSI_ENHANCED_TAG: &str = "NDSi Enhanced";

/// Game identity: name, archive region, dump region, catalog id.
struct Identity {
    game_name: String,
    archive_region: String,
    dump_region: String,
    catalog_id: Option<String>,
}

/// Build a record from everything known about one dump.
///
/// Fails on the first field that cannot be resolved. Errors on `region`,
/// `dump_region`, `game_name`, `languages`, `language_checked`,
/// `front_serial` and `box_barcode` can be fixed by asking the user again;
/// errors on `archive_region` and `size` come from the catalog or the
/// hashes and cannot.
pub fn reconcile(
    vocab: &Vocabulary,
    fields: &LogFields,
    hashes: (ImageHashes, ImageHashes),
    catalog_match: Option<&CatalogMatch>,
    input: &UserInput,
) -> Result<ReconciledRecord, ReconciliationError> {
    let (decrypted, encrypted) = hashes;
    if decrypted.size != encrypted.size {
        return Err(ReconciliationError::new(
            "size",
            format!(
                "decrypted image is {} bytes but encrypted image is {} bytes",
                decrypted.size, encrypted.size
            ),
        ));
    }

    let identity = resolve_identity(vocab, catalog_match, input)?;
    let (languages, language_checked) = resolve_languages(vocab, catalog_match, input)?;

    let revision_tag = (fields.revision != "0").then(|| format!("Rev {}", fields.revision));
    let special_tag =
        (fields.platform == DSI_ENHANCED_PLATFORM).then(|| DSI_ENHANCED_TAG.to_string());

    let front_serial = check_front_serial(vocab, &input.front_serial)?;

    let (box_serial, box_barcode, manual_serials) = if input.is_loose {
        if !input.box_serial.is_empty()
            || !input.box_barcode.is_empty()
            || !input.manual_serials.is_empty()
        {
            log::debug!("Loose cart: ignoring box and manual serials");
        }
        (String::new(), String::new(), Vec::new())
    } else {
        (
            input.box_serial.trim().to_string(),
            check_box_barcode(&input.box_barcode)?,
            split_serial_list(&input.manual_serials),
        )
    };

    Ok(ReconciledRecord {
        game_name: identity.game_name,
        archive_region: identity.archive_region,
        dump_region: identity.dump_region,
        languages,
        language_checked,
        catalog_id: identity.catalog_id,
        revision_tag,
        special_tag,
        decrypted,
        encrypted,
        internal_serial: fields.internal_serial.clone(),
        dump_date: fields.dump_date.clone(),
        tool: fields.tool.clone(),
        cart_id: fields.cart_id.clone(),
        save_chip_id: fields.save_chip_id.clone(),
        front_serial,
        back_serial: input.back_serial.trim().to_string(),
        pcb_serial: input.pcb_serial.trim().to_string(),
        manual_serials,
        box_serial,
        box_barcode,
        is_loose: input.is_loose,
    })
}

fn resolve_identity(
    vocab: &Vocabulary,
    catalog_match: Option<&CatalogMatch>,
    input: &UserInput,
) -> Result<Identity, ReconciliationError> {
    let Some(m) = catalog_match else {
        let game_name = check_game_name(
            input
                .game_name
                .as_deref()
                .ok_or_else(|| ReconciliationError::required("game_name"))?,
        )?;
        let region = check_region(
            vocab,
            "region",
            input
                .region
                .as_deref()
                .ok_or_else(|| ReconciliationError::required("region"))?,
        )?;
        return Ok(Identity {
            game_name,
            archive_region: region.clone(),
            dump_region: region,
            catalog_id: None,
        });
    };

    let region = &m.name.region;
    if !vocab.is_region(region) {
        return Err(ReconciliationError::new(
            "archive_region",
            format!(
                "catalog entry {:?} has region {region:?}, which is not a known region",
                m.entry.display_name
            ),
        ));
    }

    let dump_region = if vocab.must_disambiguate(region) {
        let raw = input
            .dump_region
            .as_deref()
            .ok_or_else(|| ReconciliationError::required("dump_region"))?;
        check_region(vocab, "dump_region", raw)?
    } else {
        region.clone()
    };

    Ok(Identity {
        game_name: m.name.game_name.clone(),
        archive_region: region.clone(),
        dump_region,
        catalog_id: Some(m.entry.id.clone()),
    })
}

fn resolve_languages(
    vocab: &Vocabulary,
    catalog_match: Option<&CatalogMatch>,
    input: &UserInput,
) -> Result<(Vec<String>, LanguageChecked), ReconciliationError> {
    let user_languages = || -> Result<Vec<String>, ReconciliationError> {
        let raw = input
            .languages
            .as_deref()
            .ok_or_else(|| ReconciliationError::required("languages"))?;
        parse_languages(vocab, raw)
    };

    let Some(m) = catalog_match else {
        // An unmatched dump is new to the database, so languages must be checked.
        if let Some(checked) = input.language_checked {
            if checked != LanguageChecked::Yes {
                log::debug!("No catalog match: language check forced to yes (was {checked})");
            }
        }
        return Ok((user_languages()?, LanguageChecked::Yes));
    };

    let checked = input
        .language_checked
        .ok_or_else(|| ReconciliationError::required("language_checked"))?;

    let from_tag = m
        .name
        .language_tag
        .as_deref()
        .and_then(|tag| tag_languages(vocab, tag));
    if let Some(languages) = from_tag {
        return Ok((languages, checked));
    }

    let has_user_list = input
        .languages
        .as_deref()
        .is_some_and(|l| !l.trim().is_empty());
    if !has_user_list && checked == LanguageChecked::No {
        return Ok((Vec::new(), checked));
    }
    Ok((user_languages()?, checked))
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
