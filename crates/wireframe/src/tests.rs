use crate::*;
use crate::num::*;

// ============================================================================
//  REQUEST HEADERS
// ============================================================================

#[test]
fn test_request_header_without_hash() -> Result<()> {
    let header = build_request_header(1, 7, 3, None)?;
    assert_eq!(header, vec![1, 7, 3, 0]);
    Ok(())
}

#[test]
fn test_request_header_with_hash() -> Result<()> {
    let hash = [0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7];
    let header = build_request_header(2, 9, 4, Some(&hash[..]))?;
    assert_eq!(header.len(), 12);
    assert_eq!(&header[..4], &[2, 9, 4, 1]);
    assert_eq!(&header[4..], &hash);
    Ok(())
}

#[test]
fn test_request_header_rejects_bad_hash_length() {
    assert_eq!(build_request_header(1, 1, 1, Some(&[1u8, 2, 3][..])), Err(Error::HashLength(3)));
    assert_eq!(build_request_header(1, 1, 1, Some(&[0u8; 9][..])), Err(Error::HashLength(9)));
    assert_eq!(build_request_header(1, 1, 1, Some(&[][..])), Err(Error::HashLength(0)));
}

#[test]
fn test_request_parse_inverts_build() -> Result<()> {
    let header = RequestHeader::new(1, 2, 3).with_hash([9; 8]);
    let raw = build_request(&header, b"payload");

    let (parsed, body) = parse_request_header(&raw)?;
    assert_eq!(parsed, header);
    assert_eq!(body, b"payload");

    let plain = build_request(&RequestHeader::new(1, 2, 3), b"x");
    let (parsed, body) = parse_request_header(&plain)?;
    assert!(!parsed.has_hash());
    assert_eq!(body, b"x");
    Ok(())
}

#[test]
fn test_request_parse_truncated() {
    assert_eq!(
        parse_request_header(&[1, 2]),
        Err(Error::Truncated { needed: 4, available: 2 })
    );
    assert_eq!(
        parse_request_header(&[1, 2, 3, 1, 0xff]),
        Err(Error::Truncated { needed: 12, available: 5 })
    );
}

// ============================================================================
//  RESPONSE PARSING
// ============================================================================

#[test]
fn test_response_with_hash() {
    let mut raw = vec![1, 5, 1];
    raw.extend_from_slice(&[10, 11, 12, 13, 14, 15, 16, 17]);
    raw.extend_from_slice(b"body");

    let frame = parse_response(&raw);
    assert_eq!(frame.protocol_version, 1);
    assert_eq!(frame.service_id, 5);
    assert_eq!(frame.hash, Some([10, 11, 12, 13, 14, 15, 16, 17]));
    assert_eq!(frame.body, b"body");
    assert_eq!(frame.body.as_ptr(), raw[11..].as_ptr());
}

#[test]
fn test_response_without_hash() {
    let frame = parse_response(&[1, 5, 0, 0xde, 0xad]);
    assert!(!frame.has_hash());
    assert_eq!(frame.body, &[0xde, 0xad]);
}

#[test]
fn test_response_short_input_is_empty() {
    assert!(parse_response(&[]).is_empty());
    assert!(parse_response(&[1, 2]).is_empty());
    // flag claims a hash but only 4 hash bytes follow
    let frame = parse_response(&[1, 2, 1, 0, 0, 0, 0]);
    assert!(frame.is_empty());
    assert_eq!(frame, ResponseFrame::default());
}

#[test]
fn test_response_header_only() {
    let frame = parse_response(&[1, 2, 1, 1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(frame.hash, Some([1, 2, 3, 4, 5, 6, 7, 8]));
    assert!(frame.body.is_empty());
}

#[test]
fn test_build_response_roundtrip() {
    let raw = build_response(3, 4, Some([7; 8]), b"ok");
    assert_eq!(raw.len(), 3 + 8 + 2);
    let frame = parse_response(&raw);
    assert_eq!(frame.hash, Some([7; 8]));
    assert_eq!(frame.body, b"ok");
}

// ============================================================================
//  STATUS CODES
// ============================================================================

#[test]
fn test_terminal_status_codes() {
    assert!(!is_terminal_tx_status(0));
    assert!(!is_terminal_tx_status(1));
    assert!(!is_terminal_tx_status(2));
    assert!(is_terminal_tx_status(3));
    assert!(is_terminal_tx_status(4));
    for code in 100..=105 {
        assert!(is_terminal_tx_status(code), "code {}", code);
    }
    assert!(!is_terminal_tx_status(42));
}

#[test]
fn test_status_failure_classification() {
    assert!(!TxStatus::Included.is_failure());
    assert!(TxStatus::Dropped.is_failure());
    assert!(TxStatus::QueueFull.is_failure());
    assert!(!TxStatus::Queued.is_failure());
    assert_eq!(TxStatus::from_code(TxStatus::WalletLocked.code()), Some(TxStatus::WalletLocked));
}

// ============================================================================
//  WORD HELPERS
// ============================================================================

#[test]
fn test_round_up() {
    assert_eq!(round_up(0, 16), 0);
    assert_eq!(round_up(1, 16), 16);
    assert_eq!(round_up(16, 16), 16);
    assert_eq!(round_up(17, 32), 32);
    assert_eq!(round_up(5, 0), 5);
}

#[test]
fn test_padding() {
    assert_eq!(pad_left(&[1, 2], 4, 0), vec![0, 0, 1, 2]);
    assert_eq!(pad_left(&[0x80], 3, 0xff), vec![0xff, 0xff, 0x80]);
    assert_eq!(pad_left(&[1, 2, 3], 2, 0), vec![1, 2, 3]);
    assert_eq!(pad_right(&[1], 4), vec![1, 0, 0, 0]);
    assert_eq!(pad_right(&[], 4), Vec::<u8>::new());
}

#[test]
fn test_word_conversions() {
    let word = uint_to_word(0x0102, 32);
    assert_eq!(word.len(), 32);
    assert_eq!(word_to_u128(&word), 0x0102);
    assert_eq!(word_to_usize(&word), Some(0x0102));

    let mut high = vec![0u8; 32];
    high[0] = 1;
    assert_eq!(word_to_usize(&high), None);

    assert_eq!(word_to_i128(&[0xff; 16]), -1);
    assert_eq!(int_to_bytes(-2, 1), vec![0xfe]);
    assert_eq!(uint_to_bytes(0x1234, 2), vec![0x12, 0x34]);
}

#[test]
fn test_read_word_bounds() {
    let data = [0u8; 20];
    assert!(read_word(&data, 4, 16).is_some());
    assert!(read_word(&data, 5, 16).is_none());
    assert!(read_word(&data, usize::MAX, 16).is_none());
}
