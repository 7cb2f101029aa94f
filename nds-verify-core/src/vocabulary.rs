//! Closed vocabularies for submission records.
//!
//! The built-in sets mirror what the No-Intro DS database accepts. A
//! [`Vocabulary`] is built once per run (optionally overridden from the
//! settings file) and handed to whoever needs to check a value; nothing
//! reads the constants directly except [`Vocabulary::default`].

use serde::{Deserialize, Serialize};

/// Region names accepted in archive and dump regions.
pub const REGIONS: &[&str] = &[
    "Australia",
    "Brazil",
    "Canada",
    "China",
    "Denmark",
    "Europe",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Italy",
    "Japan",
    "Korea",
    "Mexico",
    "Netherlands",
    "Norway",
    "Russia",
    "Scandinavia",
    "Spain",
    "Sweden",
    "United Kingdom",
    "Unknown",
    "USA",
    "World",
    "Japan, USA",
    "USA, Australia",
    "USA, Europe",
];

/// Language codes (ISO 639-1 derived, plus regional variants).
pub const LANGUAGES: &[&str] = &[
    "Cs", "Da", "De", "El", "En", "Es", "Es-XL", "Fi", "Fr", "Fr-CA", "Hu", "It", "Ja", "Ko",
    "Nl", "No", "Pl", "Pt", "Pt-BR", "Ru", "Sv", "Tr", "Zh", NO_LANGUAGE,
];

/// Sentinel for software without any language content.
pub const NO_LANGUAGE: &str = "nolang";

/// Platform prefixes printed on the front label of a DS-family cart.
pub const FRONT_SERIAL_PREFIXES: &[&str] = &["NTR", "TWL", "UTL"];

/// Catalog regions that cover more than one physical market. When a
/// catalog entry names one of these, the cart in hand may carry a narrower
/// region and the dump region is asked for separately.
pub const DISAMBIGUATE_REGIONS: &[&str] = &[
    "World",
    "Europe",
    "Scandinavia",
    "Japan, USA",
    "USA, Australia",
    "USA, Europe",
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// The closed sets a record is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub regions: Vec<String>,
    pub languages: Vec<String>,
    pub front_serial_prefixes: Vec<String>,
    pub disambiguate_regions: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            regions: owned(REGIONS),
            languages: owned(LANGUAGES),
            front_serial_prefixes: owned(FRONT_SERIAL_PREFIXES),
            disambiguate_regions: owned(DISAMBIGUATE_REGIONS),
        }
    }
}

impl Vocabulary {
    pub fn is_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    pub fn is_language(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l == code)
    }

    /// Whether a catalog region needs a separately supplied dump region.
    pub fn must_disambiguate(&self, region: &str) -> bool {
        self.disambiguate_regions.iter().any(|r| r == region)
    }

    /// Whether the first three characters of a front serial are an
    /// allowed platform prefix.
    pub fn has_front_serial_prefix(&self, serial: &str) -> bool {
        match serial.get(..3) {
            Some(prefix) => self.front_serial_prefixes.iter().any(|p| p == prefix),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sets() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.regions.len(), 27);
        assert_eq!(vocab.languages.len(), 24);
        assert!(vocab.is_region("Japan, USA"));
        assert!(!vocab.is_region("usa"));
        assert!(vocab.is_language("Pt-BR"));
        assert!(vocab.is_language(NO_LANGUAGE));
        assert!(!vocab.is_language("en"));
    }

    #[test]
    fn test_disambiguation_subset_is_in_regions() {
        let vocab = Vocabulary::default();
        for region in &vocab.disambiguate_regions {
            assert!(vocab.is_region(region), "{region} missing from regions");
        }
        assert!(vocab.must_disambiguate("Europe"));
        assert!(!vocab.must_disambiguate("USA"));
    }

    #[test]
    fn test_front_serial_prefix() {
        let vocab = Vocabulary::default();
        assert!(vocab.has_front_serial_prefix("NTR-CPUE-USA"));
        assert!(vocab.has_front_serial_prefix("TWL-IRBO-EUR"));
        assert!(!vocab.has_front_serial_prefix("CTR-AAAA"));
        assert!(!vocab.has_front_serial_prefix("NT"));
        assert!(!vocab.has_front_serial_prefix(""));
    }
}
