//! Big-endian word helpers shared by the framer and the ABI codec.
//!
//! Words are 16 or 32 bytes wide. Integers never exceed 128 bits, so the high
//! half of a 32-byte word is always zero (or sign fill) on well-formed input.

/// Rounds `n` up to the next multiple of `unit`.
pub fn round_up(n: usize, unit: usize) -> usize {
    if unit == 0 {
        return n;
    }
    n.div_ceil(unit) * unit
}

/// Left-pads `bytes` with `fill` up to `width`.
///
/// Input longer than `width` is returned unchanged.
pub fn pad_left(bytes: &[u8], width: usize, fill: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(width.max(bytes.len()));
    out.resize(width.saturating_sub(bytes.len()), fill);
    out.extend_from_slice(bytes);
    out
}

/// Right-pads `bytes` with zeros up to the next multiple of `unit`.
pub fn pad_right(bytes: &[u8], unit: usize) -> Vec<u8> {
    let mut out = bytes.to_vec();
    out.resize(round_up(bytes.len(), unit), 0);
    out
}

/// Encodes an unsigned integer as a big-endian word of `width` bytes.
pub fn uint_to_word(value: u128, width: usize) -> Vec<u8> {
    pad_left(&value.to_be_bytes(), width, 0x00)
}

/// Writes an unsigned integer word into `out` at `at`.
///
/// `out[at..at + width]` must already exist.
pub fn write_uint_word(out: &mut [u8], at: usize, value: u128, width: usize) {
    let word = uint_to_word(value, width);
    out[at..at + width].copy_from_slice(&word[word.len() - width..]);
}

/// Returns the `width`-byte word starting at `offset`, or `None` if it does not fit.
pub fn read_word(data: &[u8], offset: usize, width: usize) -> Option<&[u8]> {
    let end = offset.checked_add(width)?;
    data.get(offset..end)
}

/// Interprets the low 16 bytes of a big-endian word as `u128`.
pub fn word_to_u128(word: &[u8]) -> u128 {
    let mut buf = [0u8; 16];
    let take = word.len().min(16);
    buf[16 - take..].copy_from_slice(&word[word.len() - take..]);
    u128::from_be_bytes(buf)
}

/// Interprets the low 16 bytes of a big-endian word as a two's-complement `i128`.
pub fn word_to_i128(word: &[u8]) -> i128 {
    word_to_u128(word) as i128
}

/// Interprets a big-endian word as an offset or count.
///
/// Returns `None` when the value cannot be a position in memory.
pub fn word_to_usize(word: &[u8]) -> Option<usize> {
    let high = word.len().saturating_sub(16);
    if word[..high].iter().any(|&b| b != 0) {
        return None;
    }
    usize::try_from(word_to_u128(word)).ok()
}

/// Returns the minimal two's-complement big-endian bytes of `value` at `width` bytes.
pub fn int_to_bytes(value: i128, width: usize) -> Vec<u8> {
    let full = value.to_be_bytes();
    full[16 - width.min(16)..].to_vec()
}

/// Returns `value` as big-endian bytes truncated to `width` bytes.
pub fn uint_to_bytes(value: u128, width: usize) -> Vec<u8> {
    let full = value.to_be_bytes();
    full[16 - width.min(16)..].to_vec()
}
