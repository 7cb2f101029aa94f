use super::*;

const HEADER_SAVE: &str = "\
Title        : POKEMON PL
Product Code : CPUE-01
Revision     : 0
Cart ID      : C2FF0000
Platform     : NDS
Save Type    : FLASH 512kB
";

const HEADER_NONE: &str = "\
Title        : TETRIS DS
Product Code : ATRE-00
Revision     : 1
Cart ID      : C2FF01C2
Platform     : DSi Enhanced
Save Type    : NONE
";

fn gm9_save() -> String {
    format!(
        "{HEADER_SAVE}Save chip ID : C22015\n\
         Timestamp    : 2023-05-01 12:34:56\n\
         GM9 Version  : v2.1.1\n"
    )
}

fn gm9i_save(padding: bool) -> String {
    let pad = if padding { "Padding Byte : FF\n" } else { "" };
    format!(
        "{HEADER_SAVE}Save chip ID : 0xC22015\n\
         {pad}Timestamp    : 2023-05-01 12:34:56\n\
         GM9i Version : 3.4.1\n"
    )
}

fn gm9i_none(padding: bool) -> String {
    let pad = if padding { "Padding Byte : 00\n" } else { "" };
    format!(
        "{HEADER_NONE}{pad}Timestamp    : 2022-11-30 08:00:00\n\
         GM9i Version : 3.4.1\n"
    )
}

#[test]
fn test_parse_gm9_with_save() {
    let fields = parse(&gm9_save()).unwrap();
    assert_eq!(fields.internal_serial, "CPUE");
    assert_eq!(fields.product_code, "CPUE-01");
    assert_eq!(fields.revision, "0");
    assert_eq!(fields.cart_id, "C2FF0000");
    assert_eq!(fields.platform, "NDS");
    assert_eq!(fields.save_type, "FLASH 512kB");
    assert_eq!(fields.save_chip_id.as_deref(), Some("C22015"));
    assert_eq!(fields.padding_byte, None);
    assert_eq!(fields.dump_date, "2023-05-01");
    assert_eq!(fields.tool, "GodMode9 v2.1.1");
    assert_eq!(fields.layout.family, ToolFamily::GodMode9);
}

#[test]
fn test_gm9i_save_layouts_agree_with_gm9() {
    let gm9 = parse(&gm9_save()).unwrap();
    for padding in [false, true] {
        let fields = parse(&gm9i_save(padding)).unwrap();
        assert_eq!(fields.layout.padding, padding);
        assert_eq!(fields.layout.family, ToolFamily::GodMode9i);
        assert_eq!(fields.internal_serial, gm9.internal_serial);
        assert_eq!(fields.revision, gm9.revision);
        assert_eq!(fields.cart_id, gm9.cart_id);
        assert_eq!(fields.save_type, gm9.save_type);
        assert_eq!(fields.save_chip_id, gm9.save_chip_id);
        assert_eq!(fields.dump_date, gm9.dump_date);
        assert_eq!(fields.tool, "GodMode9i 3.4.1");
    }
}

#[test]
fn test_gm9i_padding_byte_kept() {
    let fields = parse(&gm9i_save(true)).unwrap();
    assert_eq!(fields.padding_byte.as_deref(), Some("FF"));
}

#[test]
fn test_gm9i_no_save_layouts_agree() {
    let plain = parse(&gm9i_none(false)).unwrap();
    let padded = parse(&gm9i_none(true)).unwrap();

    for fields in [&plain, &padded] {
        assert_eq!(fields.internal_serial, "ATRE");
        assert_eq!(fields.revision, "1");
        assert_eq!(fields.platform, "DSi Enhanced");
        assert_eq!(fields.save_type, SAVE_TYPE_NONE);
        assert_eq!(fields.save_chip_id, None);
        assert_eq!(fields.dump_date, "2022-11-30");
        assert!(fields.layout.save_none);
    }
    assert!(!plain.layout.padding);
    assert!(padded.layout.padding);
    assert_eq!(padded.padding_byte.as_deref(), Some("00"));
}

#[test]
fn test_gm9_none_save_chip_is_absent() {
    let log = format!(
        "{HEADER_NONE}Save chip ID : <none>\n\
         Timestamp    : 2022-11-30 08:00:00\n\
         GM9 Version  : v2.1.1\n"
    );
    let fields = parse(&log).unwrap();
    assert_eq!(fields.save_chip_id, None);
    assert_eq!(fields.layout, LayoutKey {
        family: ToolFamily::GodMode9,
        save_none: true,
        padding: false,
    });
}

#[test]
fn test_crlf_line_endings() {
    let log = gm9i_save(true).replace('\n', "\r\n");
    let fields = parse(&log).unwrap();
    assert_eq!(fields.tool, "GodMode9i 3.4.1");
    assert_eq!(fields.save_chip_id.as_deref(), Some("C22015"));
}

#[test]
fn test_missing_trailing_newline() {
    let log = gm9_save();
    let fields = parse(log.trim_end()).unwrap();
    assert_eq!(fields.tool, "GodMode9 v2.1.1");
}

#[test]
fn test_header_label_mismatch_names_line() {
    let log = gm9_save().replace("Cart ID      : ", "Cart Id: ");
    let err = parse(&log).unwrap_err();
    assert_eq!(err.line_index, 3);
    assert_eq!(err.layout, "common header");
}

#[test]
fn test_truncated_log_fails() {
    let log: String = gm9i_save(false).lines().take(8).map(|l| format!("{l}\n")).collect();
    let err = parse(&log).unwrap_err();
    assert!(err.reason.contains("no known tool version line"), "{err}");
}

#[test]
fn test_truncated_header_fails() {
    let err = parse("Title        : X\nProduct Code : ABCD-00\n").unwrap_err();
    assert_eq!(err.line_index, 2);
}

#[test]
fn test_unknown_tool_fails() {
    let log = gm9_save().replace("GM9 Version  : v2.1.1", "XYZ Version  : 1.0");
    assert!(parse(&log).is_err());
}

#[test]
fn test_tail_label_mismatch_names_layout() {
    let log = gm9i_save(false).replace("Timestamp    : ", "Dumped on    : ");
    let err = parse(&log).unwrap_err();
    assert_eq!(err.line_index, 7);
    assert!(err.layout.starts_with("GodMode9i"), "{}", err.layout);
}

#[test]
fn test_bad_timestamp_fails() {
    let log = gm9_save().replace("2023-05-01", "2023-13-45");
    let err = parse(&log).unwrap_err();
    assert_eq!(err.line_index, 7);
}

#[test]
fn test_short_product_code_fails() {
    let log = gm9_save().replace("CPUE-01", "CPU");
    let err = parse(&log).unwrap_err();
    assert_eq!(err.line_index, 1);
}

#[test]
fn test_internal_serial_counts_characters() {
    let log = gm9_save().replace("CPUE-01", "éAB-01");
    let fields = parse(&log).unwrap();
    assert_eq!(fields.internal_serial, "éAB-");
    assert_eq!(fields.internal_serial.chars().count(), 4);
}

#[test]
fn test_short_non_ascii_product_code_fails() {
    let log = gm9_save().replace("CPUE-01", "éAB");
    let err = parse(&log).unwrap_err();
    assert_eq!(err.line_index, 1);
}

#[test]
fn test_empty_value_fails() {
    let log = gm9_save().replace("Cart ID      : C2FF0000", "Cart ID      : ");
    let err = parse(&log).unwrap_err();
    assert_eq!(err.line_index, 3);
}
