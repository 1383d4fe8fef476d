use super::*;

fn wrapped(data: &[u8]) -> Vec<u8> {
    wrap_with_header(data, data.len(), 0).expect("small payload fits")
}

#[test]
fn test_wrap_and_unwrap_roundtrip() {
    let data = b"hello housing market";
    let bytes = wrapped(data);
    assert_eq!(&bytes[..4], b"HSIM");
    assert_eq!(bytes.len(), HEADER_SIZE + data.len());

    let (header, payload) = unwrap_header(&bytes).expect("unwrap should succeed");
    assert_eq!(header.format_version, HEADER_FORMAT_VERSION);
    assert_eq!(header.flags, 0);
    assert!(!header.is_compressed());
    assert_eq!(header.uncompressed_size, data.len() as u32);
    assert_eq!(header.stored_size, data.len() as u32);
    assert_eq!(payload, data);
}

#[test]
fn test_compressed_flag_and_sizes_are_recorded() {
    let bytes = wrap_with_header(b"abc", 4096, FLAG_COMPRESSED).unwrap();
    let (header, payload) = unwrap_header(&bytes).unwrap();
    assert!(header.is_compressed());
    assert_eq!(header.uncompressed_size, 4096);
    assert_eq!(payload, b"abc");
}

#[test]
fn test_missing_magic_rejected() {
    let err = unwrap_header(b"\x00\x01\x02\x03some other file").unwrap_err();
    assert!(matches!(err, SaveError::InvalidHeader(_)), "got: {err}");
    assert!(format!("{err}").contains("HSIM"));
}

#[test]
fn test_empty_file_rejected() {
    assert!(matches!(
        unwrap_header(b""),
        Err(SaveError::InvalidHeader(_))
    ));
}

#[test]
fn test_truncated_header_detected() {
    let err = unwrap_header(b"HSIM\x01\x00").unwrap_err();
    assert!(format!("{err}").contains("too short"), "got: {err}");
}

#[test]
fn test_truncated_payload_detected() {
    let mut bytes = wrapped(b"a payload that loses its tail");
    bytes.truncate(bytes.len() - 5);
    let err = unwrap_header(&bytes).unwrap_err();
    assert!(matches!(err, SaveError::InvalidHeader(_)), "got: {err}");
}

#[test]
fn test_corrupted_checksum_detected() {
    let mut bytes = wrapped(b"test payload");
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    match unwrap_header(&bytes) {
        Err(SaveError::ChecksumMismatch { expected, found }) => {
            assert_eq!(expected, xxh32(b"test payload", 0));
            assert_ne!(expected, found);
        }
        other => panic!("expected checksum mismatch, got {other:?}"),
    }
}

#[test]
fn test_future_header_version_rejected() {
    let mut bytes = wrapped(b"test payload");
    bytes[4..8].copy_from_slice(&999u32.to_le_bytes());

    let err = unwrap_header(&bytes).unwrap_err();
    assert!(matches!(
        err,
        SaveError::VersionMismatch {
            expected_max: HEADER_FORMAT_VERSION,
            found: 999
        }
    ));
}
