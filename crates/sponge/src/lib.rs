//! # Sponge
//!
//! A small, dependency-light Keccak implementation.
//!
//! ## Philosophy
//!
//! - **Pure**: Every entry point is a function of its input. No state survives a call.
//! - **Byte-Exact**: Original Keccak padding (domain byte `0x01`), not the SHA-3 variant.
//!   This is the digest used for ABI selectors and event topics.
//!
//! ## Entry Points
//!
//! - [`keccak256`]: the 32-byte digest with a 1088-bit rate.
//! - [`Keccak`]: incremental hasher for streamed input.
//! - [`variable_hash`]: deprecated, arbitrary rate and output length over a hex message.

mod keccak;

#[cfg(test)]
mod tests;

pub use keccak::Keccak;
pub use keccak::keccak_f;

/// Width of the Keccak-f[1600] state in bytes.
pub const STATE_BYTES: usize = 200;

/// Rate of Keccak-256 in bits.
pub const KECCAK256_RATE_BITS: usize = 1088;

/// Sponge construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rate must be a non-zero multiple of 8 bits, strictly below the state width.
    InvalidRate(usize),
    /// Message was not valid hexadecimal.
    InvalidHex(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidRate(bits) => write!(f, "Invalid sponge rate: {} bits", bits),
            Error::InvalidHex(msg) => write!(f, "Invalid hex message: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Self::InvalidHex(e.to_string())
    }
}

/// Specialized `Result` for sponge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Computes the Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize_into(&mut out);
    out
}

/// Hashes a hex-encoded message with an arbitrary rate and output length.
///
/// Accepts an optional `0x` prefix. The result is lowercase hex without prefix.
///
/// # Errors
/// Returns `Error::InvalidRate` for rates that are zero, not byte-aligned, or
/// leave no capacity, and `Error::InvalidHex` for malformed messages.
#[deprecated(note = "legacy hash path; use `keccak256` or `Keccak` instead")]
pub fn variable_hash(hex_message: &str, rate_bits: usize, out_bytes: usize) -> Result<String> {
    let stripped = hex_message.strip_prefix("0x").unwrap_or(hex_message);
    let message = hex::decode(stripped)?;

    let mut hasher = Keccak::with_rate(rate_bits)?;
    hasher.update(&message);
    let mut out = vec![0u8; out_bytes];
    hasher.finalize_into(&mut out);
    Ok(hex::encode(out))
}
