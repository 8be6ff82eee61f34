use crate::*;
use std::collections::HashSet;

// ============================================================================
//  KNOWN ANSWERS
// ============================================================================

#[test]
fn test_keccak256_empty() {
    assert_eq!(
        hex::encode(keccak256(b"")),
        "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    );
}

#[test]
fn test_keccak256_abc() {
    assert_eq!(
        hex::encode(keccak256(b"abc")),
        "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
    );
}

#[test]
fn test_keccak256_selector() {
    // ERC-20 transfer selector
    let digest = keccak256(b"transfer(address,uint256)");
    assert_eq!(hex::encode(&digest[..4]), "a9059cbb");
}

// ============================================================================
//  SPONGE BEHAVIOUR
// ============================================================================

#[test]
fn test_incremental_matches_oneshot_across_block_boundaries() {
    let data: Vec<u8> = (0..=255u8).cycle().take(500).collect();
    let expected = keccak256(&data);

    // Splits straddle the 136-byte rate boundary, including the exact edge.
    for split in [0, 1, 135, 136, 137, 271, 272, 499, 500] {
        let mut hasher = Keccak::v256();
        hasher.update(&data[..split]);
        hasher.update(&data[split..]);
        assert_eq!(hasher.finalize(), expected, "split at {}", split);
    }
}

#[test]
fn test_padding_fills_last_byte_of_block() {
    // 135 bytes leaves one free byte, so 0x01 and 0x80 collapse into 0x81.
    let short = vec![0x61u8; 135];
    let full = vec![0x61u8; 136];
    assert_ne!(keccak256(&short), keccak256(&full));
}

#[test]
fn test_no_collisions_on_short_corpus() {
    let mut seen = HashSet::new();
    for i in 0u32..2048 {
        let input = i.to_be_bytes();
        let trimmed = &input[input.iter().position(|&b| b != 0).unwrap_or(3)..];
        assert!(seen.insert(keccak256(trimmed)), "collision at {}", i);
    }
    assert!(seen.insert(keccak256(b"")));
}

#[test]
fn test_long_squeeze_is_prefix_stable() {
    let mut short = [0u8; 32];
    let mut long = [0u8; 300];
    let mut a = Keccak::v256();
    a.update(b"squeeze");
    let b = a.clone();
    a.finalize_into(&mut short);
    b.finalize_into(&mut long);
    assert_eq!(&long[..32], &short[..]);
    assert_ne!(&long[136..168], &long[..32]);
}

// ============================================================================
//  LEGACY ENTRY POINT
// ============================================================================

#[test]
#[allow(deprecated)]
fn test_variable_hash_matches_keccak256() -> Result<()> {
    let hashed = variable_hash("0x616263", 1088, 32)?;
    assert_eq!(hashed, hex::encode(keccak256(b"abc")));
    Ok(())
}

#[test]
#[allow(deprecated)]
fn test_variable_hash_keccak512_empty() -> Result<()> {
    let hashed = variable_hash("", 576, 64)?;
    assert_eq!(
        hashed,
        "0eab42de4c3ceb9235fc91acffe746b29c29a8c366b7c60e4e67c466f36a4304\
         c00fa9caf9d87976ba469bcbe06713b435f091ef2769fb160cdab33d3670680e"
    );
    Ok(())
}

#[test]
#[allow(deprecated)]
fn test_variable_hash_rejects_bad_input() {
    assert_eq!(variable_hash("00", 0, 32), Err(Error::InvalidRate(0)));
    assert_eq!(variable_hash("00", 1087, 32), Err(Error::InvalidRate(1087)));
    assert_eq!(variable_hash("00", 1600, 32), Err(Error::InvalidRate(1600)));
    assert!(matches!(variable_hash("zz", 1088, 32), Err(Error::InvalidHex(_))));
}
