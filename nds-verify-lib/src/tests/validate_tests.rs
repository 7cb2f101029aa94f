use super::*;
use nds_verify_core::{HexDigest, normalize};

fn image(seed: &str) -> ImageHashes {
    ImageHashes {
        size: 67108864,
        crc32: normalize(HashAlgorithm::Crc32, &seed.repeat(8)).unwrap(),
        md5: normalize(HashAlgorithm::Md5, &seed.repeat(32)).unwrap(),
        sha1: normalize(HashAlgorithm::Sha1, &seed.repeat(40)).unwrap(),
        sha256: normalize(HashAlgorithm::Sha256, &seed.repeat(64)).unwrap(),
    }
}

fn record() -> ReconciledRecord {
    ReconciledRecord {
        game_name: "Tetris DS".into(),
        archive_region: "Japan, USA".into(),
        dump_region: "USA".into(),
        languages: vec!["En".into()],
        language_checked: LanguageChecked::Yes,
        catalog_id: Some("0123".into()),
        revision_tag: Some("Rev 1".into()),
        special_tag: None,
        decrypted: image("c"),
        encrypted: image("d"),
        internal_serial: "ATRE".into(),
        dump_date: "2022-11-30".into(),
        tool: "GodMode9 v2.1.1".into(),
        cart_id: "C2FF01C2".into(),
        save_chip_id: None,
        front_serial: "NTR-ATRE-USA".into(),
        back_serial: "ATRE-01".into(),
        pcb_serial: "DI-01".into(),
        manual_serials: vec!["NTR-ATRE-USA".into()],
        box_serial: "NTR-ATRE-USA".into(),
        box_barcode: "0 45496 73602 9".into(),
        is_loose: false,
    }
}

fn field_of(record: &ReconciledRecord) -> &'static str {
    validate(&Vocabulary::default(), record).unwrap_err().field
}

#[test]
fn test_valid_record_passes() {
    validate(&Vocabulary::default(), &record()).unwrap();
}

#[test]
fn test_loose_cart_with_barcode_rejected() {
    let r = ReconciledRecord {
        is_loose: true,
        box_serial: String::new(),
        manual_serials: Vec::new(),
        ..record()
    };
    assert_eq!(field_of(&r), "box_barcode");
}

#[test]
fn test_loose_cart_with_box_serial_rejected() {
    let r = ReconciledRecord {
        is_loose: true,
        ..record()
    };
    assert_eq!(field_of(&r), "box_serial");
}

#[test]
fn test_loose_cart_with_manual_rejected() {
    let r = ReconciledRecord {
        is_loose: true,
        box_serial: String::new(),
        box_barcode: String::new(),
        ..record()
    };
    assert_eq!(field_of(&r), "manual_serials");
}

#[test]
fn test_unknown_region_rejected() {
    let r = ReconciledRecord {
        dump_region: "Atlantis".into(),
        ..record()
    };
    assert_eq!(field_of(&r), "dump_region");
}

#[test]
fn test_region_split_only_for_multi_market() {
    let r = ReconciledRecord {
        archive_region: "Japan".into(),
        dump_region: "USA".into(),
        ..record()
    };
    assert_eq!(field_of(&r), "dump_region");
}

#[test]
fn test_unknown_language_rejected() {
    let r = ReconciledRecord {
        languages: vec!["En".into(), "Klingon".into()],
        ..record()
    };
    assert_eq!(field_of(&r), "languages");
}

#[test]
fn test_empty_languages_need_unchecked() {
    let mut r = ReconciledRecord {
        languages: Vec::new(),
        ..record()
    };
    assert_eq!(field_of(&r), "languages");

    r.language_checked = LanguageChecked::No;
    validate(&Vocabulary::default(), &r).unwrap();
}

#[test]
fn test_unmatched_dump_needs_checked_languages() {
    let r = ReconciledRecord {
        catalog_id: None,
        archive_region: "USA".into(),
        language_checked: LanguageChecked::Unknown,
        ..record()
    };
    assert_eq!(field_of(&r), "language_checked");
}

#[test]
fn test_wrong_digest_length_rejected() {
    let mut r = record();
    r.encrypted.crc32 = HexDigest::from_bytes(&[0xde, 0xad, 0xbe]);
    let err = validate(&Vocabulary::default(), &r).unwrap_err();
    assert_eq!(err.field, "hashes");
    assert!(err.reason.contains("encrypted"), "{err}");
}

#[test]
fn test_size_mismatch_rejected() {
    let mut r = record();
    r.encrypted.size += 1;
    assert_eq!(field_of(&r), "size");
}

#[test]
fn test_front_serial_prefix() {
    let r = ReconciledRecord {
        front_serial: "AGB-ATRE-USA".into(),
        ..record()
    };
    assert_eq!(field_of(&r), "front_serial");
}

#[test]
fn test_revision_tag_format() {
    let r = ReconciledRecord {
        revision_tag: Some("Revision 1".into()),
        ..record()
    };
    assert_eq!(field_of(&r), "revision_tag");

    let r = ReconciledRecord {
        revision_tag: Some("Rev 0".into()),
        ..record()
    };
    assert_eq!(field_of(&r), "revision_tag");
}

#[test]
fn test_special_tag_value() {
    let r = ReconciledRecord {
        special_tag: Some("Demo".into()),
        ..record()
    };
    assert_eq!(field_of(&r), "special_tag");
}

#[test]
fn test_dump_date_format() {
    let r = ReconciledRecord {
        dump_date: "30/11/2022".into(),
        ..record()
    };
    assert_eq!(field_of(&r), "dump_date");
}

#[test]
fn test_vocabulary_override_applies() {
    let mut vocab = Vocabulary::default();
    vocab.front_serial_prefixes = vec!["AGB".into()];
    assert!(validate(&vocab, &record()).is_err());

    let r = ReconciledRecord {
        front_serial: "AGB-ATRE-USA".into(),
        ..record()
    };
    validate(&vocab, &r).unwrap();
}
