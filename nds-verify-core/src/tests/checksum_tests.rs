use super::*;

#[test]
fn test_md5_accepts_32_lowercase_hex() {
    let d = normalize(HashAlgorithm::Md5, "fcd6bcb56c1689fcef28b57c22475bad").unwrap();
    assert_eq!(d.as_str(), "fcd6bcb56c1689fcef28b57c22475bad");
    assert!(d.fits(HashAlgorithm::Md5));
}

#[test]
fn test_md5_rejects_31_chars() {
    let err = normalize(HashAlgorithm::Md5, "fcd6bcb56c1689fcef28b57c22475ba").unwrap_err();
    assert_eq!(err.algorithm, HashAlgorithm::Md5);
    assert_eq!(err.value, "fcd6bcb56c1689fcef28b57c22475ba");
}

#[test]
fn test_rejects_non_hex() {
    assert!(normalize(HashAlgorithm::Md5, "fcd6bcb56c1689fcef28b57c22475bag").is_err());
    assert!(normalize(HashAlgorithm::Crc32, "d797 8eeb").is_err());
    assert!(normalize(HashAlgorithm::Sha1, "").is_err());
}

#[test]
fn test_uppercase_and_whitespace_normalized() {
    let d = normalize(
        HashAlgorithm::Sha1,
        "  1ADC95BEBE9EEA8C112D40CD04AB7A8D75C4F961\r\n",
    )
    .unwrap();
    assert_eq!(d.as_str(), "1adc95bebe9eea8c112d40cd04ab7a8d75c4f961");
}

#[test]
fn test_crc32_left_padded() {
    let d = normalize(HashAlgorithm::Crc32, "1A2B3C").unwrap();
    assert_eq!(d.as_str(), "001a2b3c");
}

#[test]
fn test_padding_only_applies_to_crc32() {
    // A short SHA-256 is a truncated digest, not an integer rendering
    assert!(normalize(HashAlgorithm::Sha256, "abcdef").is_err());
}

#[test]
fn test_crc32_too_long() {
    assert!(normalize(HashAlgorithm::Crc32, "d7978eeb0").is_err());
}

#[test]
fn test_from_bytes() {
    let d = HexDigest::from_bytes(&[0xd7, 0x97, 0x8e, 0xeb]);
    assert_eq!(d.to_string(), "d7978eeb");
    assert!(d.fits(HashAlgorithm::Crc32));
    assert!(!d.fits(HashAlgorithm::Md5));
}

#[test]
fn test_hex_lengths() {
    let lens: Vec<usize> = HashAlgorithm::ALL.iter().map(|a| a.hex_len()).collect();
    assert_eq!(lens, vec![8, 32, 40, 64]);
}
