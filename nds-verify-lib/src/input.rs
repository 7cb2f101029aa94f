//! Manually supplied values and the predicates that accept them.
//!
//! The library never talks to the user. Whoever collects [`UserInput`]
//! (an interactive prompt, an answers file) runs each raw value through the
//! matching predicate here and asks again on `Err`.

use nds_verify_core::Vocabulary;
use nds_verify_core::vocabulary::NO_LANGUAGE;
use serde::{Deserialize, Serialize};

use crate::error::ReconciliationError;
use crate::record::LanguageChecked;

/// Everything the user supplies or confirms for one dump.
///
/// Fields that only matter in some situations (game name and region without
/// a catalog match, dump region for multi-market catalog regions) are
/// optional; the reconciler reports the ones it needed but did not get.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub game_name: Option<String>,
    /// Region when the dump has no catalog match
    pub region: Option<String>,
    /// Region of the cart in hand when the catalog region spans several markets
    pub dump_region: Option<String>,
    /// Comma-separated language codes
    pub languages: Option<String>,
    pub language_checked: Option<LanguageChecked>,
    pub front_serial: String,
    pub back_serial: String,
    pub pcb_serial: String,
    pub is_loose: bool,
    pub box_serial: String,
    /// Digits and spaces, e.g. "0 45496 73649 4"
    pub box_barcode: String,
    /// Comma-separated manual serials
    pub manual_serials: String,
}

pub fn check_game_name(raw: &str) -> Result<String, ReconciliationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ReconciliationError::required("game_name"));
    }
    Ok(name.to_string())
}

/// Accept a region from the closed region set. `field` names the record
/// field being filled so the error points at it.
pub fn check_region(
    vocab: &Vocabulary,
    field: &'static str,
    raw: &str,
) -> Result<String, ReconciliationError> {
    let region = raw.trim();
    if vocab.is_region(region) {
        Ok(region.to_string())
    } else {
        Err(ReconciliationError::new(
            field,
            format!("{region:?} is not a known region"),
        ))
    }
}

/// Parse a comma-separated language list.
///
/// Every token must be a known code; one bad token rejects the whole list.
/// The list must not be empty, and the "no language" code stands alone.
pub fn parse_languages(vocab: &Vocabulary, raw: &str) -> Result<Vec<String>, ReconciliationError> {
    let codes: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if codes.is_empty() {
        return Err(ReconciliationError::required("languages"));
    }
    if let Some(bad) = codes.iter().find(|c| !vocab.is_language(c)) {
        return Err(ReconciliationError::new(
            "languages",
            format!("{bad:?} is not a known language code"),
        ));
    }
    if let Some(dup) = codes
        .iter()
        .enumerate()
        .find_map(|(i, c)| codes[..i].contains(c).then_some(c))
    {
        return Err(ReconciliationError::new(
            "languages",
            format!("{dup:?} is listed more than once"),
        ));
    }
    if codes.len() > 1 && codes.iter().any(|c| c == NO_LANGUAGE) {
        return Err(ReconciliationError::new(
            "languages",
            format!("{NO_LANGUAGE:?} cannot be combined with other codes"),
        ));
    }
    Ok(codes)
}

/// Languages encoded in a catalog language tag, or `None` when the tag is
/// something else (a special-edition label, for instance).
pub fn tag_languages(vocab: &Vocabulary, tag: &str) -> Option<Vec<String>> {
    parse_languages(vocab, tag).ok()
}

/// Read a yes/no answer; anything else means "unknown".
pub fn parse_language_checked(raw: &str) -> LanguageChecked {
    match raw.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('y') => LanguageChecked::Yes,
        Some('n') => LanguageChecked::No,
        _ => LanguageChecked::Unknown,
    }
}

/// Accept a front label serial starting with a known platform prefix.
pub fn check_front_serial(vocab: &Vocabulary, raw: &str) -> Result<String, ReconciliationError> {
    let serial = raw.trim();
    if vocab.has_front_serial_prefix(serial) {
        Ok(serial.to_string())
    } else {
        Err(ReconciliationError::new(
            "front_serial",
            format!(
                "{serial:?} does not start with one of {}",
                vocab.front_serial_prefixes.join(", ")
            ),
        ))
    }
}

/// Whether a barcode is made of digits and spaces only. Empty is allowed.
pub fn is_barcode(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit() || c == ' ')
}

pub fn check_box_barcode(raw: &str) -> Result<String, ReconciliationError> {
    let barcode = raw.trim();
    if is_barcode(barcode) {
        Ok(barcode.to_string())
    } else {
        Err(ReconciliationError::new(
            "box_barcode",
            format!("{barcode:?} may only contain digits and spaces"),
        ))
    }
}

/// Split a comma-separated serial list, dropping empty entries.
pub fn split_serial_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_name() {
        assert_eq!(check_game_name("  Tetris DS ").unwrap(), "Tetris DS");
        assert!(check_game_name("   ").is_err());
        assert_eq!(check_game_name("AC/DC Live").unwrap(), "AC/DC Live");
    }

    #[test]
    fn test_region() {
        let vocab = Vocabulary::default();
        assert_eq!(check_region(&vocab, "region", "Japan, USA").unwrap(), "Japan, USA");
        let err = check_region(&vocab, "dump_region", "Atlantis").unwrap_err();
        assert_eq!(err.field, "dump_region");
        assert!(check_region(&vocab, "region", "usa").is_err());
    }

    #[test]
    fn test_languages_all_or_nothing() {
        let vocab = Vocabulary::default();
        assert_eq!(
            parse_languages(&vocab, "En, Fr,De").unwrap(),
            vec!["En", "Fr", "De"]
        );
        assert!(parse_languages(&vocab, "En,Xx").is_err());
        assert!(parse_languages(&vocab, "").is_err());
        assert!(parse_languages(&vocab, " , ").is_err());
    }

    #[test]
    fn test_no_language_stands_alone() {
        let vocab = Vocabulary::default();
        assert_eq!(parse_languages(&vocab, "nolang").unwrap(), vec!["nolang"]);
        assert!(parse_languages(&vocab, "En,nolang").is_err());
    }

    #[test]
    fn test_repeated_language_rejected() {
        let vocab = Vocabulary::default();
        let err = parse_languages(&vocab, "En,En,En").unwrap_err();
        assert_eq!(err.field, "languages");
        assert!(err.reason.contains("more than once"));
        assert!(parse_languages(&vocab, "En,Fr,En").is_err());
    }

    #[test]
    fn test_tag_languages() {
        let vocab = Vocabulary::default();
        assert_eq!(
            tag_languages(&vocab, "En,Fr,De,Es,It"),
            Some(vec![
                "En".to_string(),
                "Fr".into(),
                "De".into(),
                "Es".into(),
                "It".into()
            ])
        );
        assert_eq!(tag_languages(&vocab, "Rev 1"), None);
        assert_eq!(tag_languages(&vocab, "Demo"), None);
    }

    #[test]
    fn test_language_checked() {
        assert_eq!(parse_language_checked("y"), LanguageChecked::Yes);
        assert_eq!(parse_language_checked("Yes"), LanguageChecked::Yes);
        assert_eq!(parse_language_checked("no"), LanguageChecked::No);
        assert_eq!(parse_language_checked("?"), LanguageChecked::Unknown);
        assert_eq!(parse_language_checked(""), LanguageChecked::Unknown);
    }

    #[test]
    fn test_front_serial() {
        let vocab = Vocabulary::default();
        assert_eq!(check_front_serial(&vocab, "NTR-CPUE-USA").unwrap(), "NTR-CPUE-USA");
        assert!(check_front_serial(&vocab, "TWL-IRBO-USA").is_ok());
        assert!(check_front_serial(&vocab, "AGB-BPEE-USA").is_err());
        assert!(check_front_serial(&vocab, "NT").is_err());
    }

    #[test]
    fn test_box_barcode() {
        assert_eq!(check_box_barcode(" 0 45496 73649 4 ").unwrap(), "0 45496 73649 4");
        assert_eq!(check_box_barcode("").unwrap(), "");
        assert!(check_box_barcode("0-45496").is_err());
    }

    #[test]
    fn test_split_serial_list() {
        assert_eq!(
            split_serial_list("NTR-CPUE-USA, , UNIT-AAA"),
            vec!["NTR-CPUE-USA", "UNIT-AAA"]
        );
        assert!(split_serial_list("").is_empty());
    }

    #[test]
    fn test_user_input_from_toml() {
        let input: UserInput = toml::from_str(
            r#"
            language_checked = "unknown"
            front_serial = "NTR-CPUE-USA"
            is_loose = true
            "#,
        )
        .unwrap();
        assert_eq!(input.language_checked, Some(LanguageChecked::Unknown));
        assert!(input.is_loose);
        assert_eq!(input.game_name, None);
        assert_eq!(input.box_barcode, "");
    }
}
