//! # Scalar Kinds
//!
//! The closed set of scalar kinds and the per-kind contract: type-string
//! matching, leaf encoding, leaf decoding and token conversion.
//!
//! ## Leaf Layout
//!
//! A leaf is the canonical unpadded byte form of one scalar:
//!
//! | Kind           | Leaf bytes                                   |
//! |----------------|----------------------------------------------|
//! | `Address`      | 20 bytes                                     |
//! | `Bool`         | 1 byte, `0` or `1`                           |
//! | `Bytes(n)`     | n bytes                                      |
//! | `DynamicBytes` | the data                                     |
//! | `Int(bits)`    | `bits / 8` bytes, two's complement           |
//! | `Uint(bits)`   | `bits / 8` bytes                             |
//! | `Real`         | 16 bytes, two's complement 64.64 fixed point |
//! | `Ureal`        | 16 bytes, unsigned 64.64 fixed point         |
//! | `SString`      | UTF-8 bytes                                  |

use std::fmt;

use wireframe::num;

use crate::error::Error;
use crate::error::Result;
use crate::token::Token;

/// Native protocol word: 128-bit integers.
pub const WORD: usize = 16;

/// Doubled unit used by addresses and wide fixed bytes.
pub const WIDE_WORD: usize = 32;

/// Fractional bits of `real`/`ureal`.
pub const REAL_FRACTION_BITS: u32 = 64;

const REAL_SCALE: f64 = (1u128 << REAL_FRACTION_BITS) as f64;

/// A scalar ABI kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiKind {
    Address,
    Bool,
    /// `bytesN`, N in `1..=32`.
    Bytes(u8),
    DynamicBytes,
    /// `intN`, N in `8..=128` step 8.
    Int(u16),
    /// `uintN`, N in `8..=128` step 8.
    Uint(u16),
    Real,
    Ureal,
    SString,
}

impl AbiKind {
    /// Wire word size in bytes.
    pub fn word_size(self) -> usize {
        match self {
            AbiKind::Address => WIDE_WORD,
            AbiKind::Bytes(n) if n as usize > WORD => WIDE_WORD,
            _ => WORD,
        }
    }

    /// True for kinds whose encoded size depends on the value.
    pub fn is_dynamic(self) -> bool {
        matches!(self, AbiKind::DynamicBytes | AbiKind::SString)
    }

    /// True if `other` belongs to the same family, ignoring widths.
    pub fn same_family(self, other: AbiKind) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }

    /// Parses a scalar kind name such as `uint64` or `bytes20`.
    ///
    /// Bare `int`/`uint` mean 128 bits.
    pub fn parse(name: &str) -> Option<AbiKind> {
        match name {
            "address" => return Some(AbiKind::Address),
            "bool" => return Some(AbiKind::Bool),
            "bytes" => return Some(AbiKind::DynamicBytes),
            "string" => return Some(AbiKind::SString),
            "real" => return Some(AbiKind::Real),
            "ureal" => return Some(AbiKind::Ureal),
            "int" => return Some(AbiKind::Int(128)),
            "uint" => return Some(AbiKind::Uint(128)),
            _ => {}
        }

        if let Some(width) = name.strip_prefix("bytes") {
            let n = parse_width(width)?;
            return (1..=32).contains(&n).then_some(AbiKind::Bytes(n as u8));
        }
        if let Some(bits) = name.strip_prefix("uint") {
            return parse_bits(bits).map(AbiKind::Uint);
        }
        if let Some(bits) = name.strip_prefix("int") {
            return parse_bits(bits).map(AbiKind::Int);
        }
        None
    }

    /// Checks a full type descriptor (with array suffixes) against this kind's family.
    ///
    /// Never fails; malformed descriptors return `false`.
    pub fn matches_type_string(self, s: &str) -> bool {
        crate::types::AbiType::parse(s).is_ok_and(|ty| ty.kind().same_family(self))
    }

    /// Pads one leaf into its wire form.
    ///
    /// Static kinds become exactly one word. Dynamic kinds become a length word
    /// (byte count) followed by the data right-padded to whole words.
    pub fn encode(self, leaf: &[u8]) -> Vec<u8> {
        let word = self.word_size();
        match self {
            AbiKind::DynamicBytes | AbiKind::SString => {
                let mut out = num::uint_to_word(leaf.len() as u128, word);
                out.extend(num::pad_right(leaf, word));
                out
            }
            AbiKind::Int(_) | AbiKind::Real => {
                let negative = leaf.first().is_some_and(|b| b & 0x80 != 0);
                num::pad_left(leaf, word, if negative { 0xff } else { 0x00 })
            }
            _ => num::pad_left(leaf, word, 0x00),
        }
    }

    /// Hex form of [`AbiKind::encode`].
    pub fn encode_hex(self, leaf: &[u8]) -> String {
        hex::encode(self.encode(leaf))
    }

    /// Decodes one scalar at `offset`.
    ///
    /// For dynamic kinds `offset` points at the length word. Missing bytes
    /// decode as the zero value instead of failing.
    ///
    /// # Errors
    /// Returns `Error::InvalidUtf8` if string data is not UTF-8.
    pub fn decode(self, data: &[u8], offset: usize) -> Result<Token> {
        let word_size = self.word_size();
        let Some(word) = num::read_word(data, offset, word_size) else {
            return Ok(self.zero());
        };

        let token = match self {
            AbiKind::Address => {
                let mut addr = [0u8; 20];
                addr.copy_from_slice(&word[word_size - 20..]);
                Token::Address(addr)
            }
            AbiKind::Bool => Token::Bool(word.iter().any(|&b| b != 0)),
            AbiKind::Bytes(n) => Token::FixedBytes(word[word_size - n as usize..].to_vec()),
            AbiKind::Int(_) => Token::Int(num::word_to_i128(word)),
            AbiKind::Uint(_) => Token::Uint(num::word_to_u128(word)),
            AbiKind::Real => Token::Real(num::word_to_i128(word) as f64 / REAL_SCALE),
            AbiKind::Ureal => Token::Real(num::word_to_u128(word) as f64 / REAL_SCALE),
            AbiKind::DynamicBytes | AbiKind::SString => {
                let data = num::word_to_usize(word)
                    .and_then(|len| num::read_word(data, offset + word_size, len));
                let Some(bytes) = data else {
                    return Ok(self.zero());
                };
                match self {
                    AbiKind::SString => {
                        let s = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
                        Token::String(s.to_string())
                    }
                    _ => Token::Bytes(bytes.to_vec()),
                }
            }
        };
        Ok(token)
    }

    /// The value truncated input decodes to.
    pub fn zero(self) -> Token {
        match self {
            AbiKind::Address => Token::Address([0; 20]),
            AbiKind::Bool => Token::Bool(false),
            AbiKind::Bytes(n) => Token::FixedBytes(vec![0; n as usize]),
            AbiKind::DynamicBytes => Token::Bytes(Vec::new()),
            AbiKind::Int(_) => Token::Int(0),
            AbiKind::Uint(_) => Token::Uint(0),
            AbiKind::Real | AbiKind::Ureal => Token::Real(0.0),
            AbiKind::SString => Token::String(String::new()),
        }
    }

    /// Converts a scalar token into this kind's leaf bytes.
    ///
    /// Integer kinds also accept decimal or `0x` hex literals as `Token::String`;
    /// address and byte kinds accept `0x` hex strings.
    ///
    /// # Errors
    /// Rejects tokens of another family, values outside the kind's range,
    /// negative values for unsigned kinds and byte strings of the wrong length.
    pub fn leaf_from_token(self, token: &Token) -> Result<Vec<u8>> {
        match (self, token) {
            (AbiKind::Address, Token::Address(a)) => Ok(a.to_vec()),
            (AbiKind::Address, Token::String(s)) => exact_len(parse_hex(s)?, 20),

            (AbiKind::Bool, Token::Bool(b)) => Ok(vec![*b as u8]),

            (AbiKind::Bytes(n), Token::FixedBytes(b) | Token::Bytes(b)) => exact_len(b.clone(), n as usize),
            (AbiKind::Bytes(n), Token::String(s)) => exact_len(parse_hex(s)?, n as usize),

            (AbiKind::DynamicBytes, Token::Bytes(b) | Token::FixedBytes(b)) => Ok(b.clone()),
            (AbiKind::DynamicBytes, Token::String(s)) => parse_hex(s),

            (AbiKind::SString, Token::String(s)) => Ok(s.as_bytes().to_vec()),

            (AbiKind::Int(bits), Token::Int(v)) => int_leaf(*v, bits),
            (AbiKind::Int(bits), Token::Uint(v)) => {
                let v = i128::try_from(*v).map_err(|_| Error::Overflow(v.to_string()))?;
                int_leaf(v, bits)
            }
            (AbiKind::Int(bits), Token::String(s)) => int_leaf(parse_int_literal(s)?, bits),

            (AbiKind::Uint(bits), Token::Uint(v)) => uint_leaf(*v, bits),
            (AbiKind::Uint(bits), Token::Int(v)) => {
                let v = u128::try_from(*v).map_err(|_| Error::NegativeUnsigned(v.to_string()))?;
                uint_leaf(v, bits)
            }
            (AbiKind::Uint(bits), Token::String(s)) => uint_leaf(parse_uint_literal(s)?, bits),

            (AbiKind::Real, Token::Real(v)) => real_leaf(*v),
            (AbiKind::Real, Token::Int(v)) => {
                let raw = v.checked_mul(1i128 << REAL_FRACTION_BITS).ok_or_else(|| Error::Overflow(v.to_string()))?;
                Ok(raw.to_be_bytes().to_vec())
            }
            (AbiKind::Ureal, Token::Real(v)) => ureal_leaf(*v),
            (AbiKind::Ureal, Token::Uint(v)) => {
                let raw = v.checked_mul(1u128 << REAL_FRACTION_BITS).ok_or_else(|| Error::Overflow(v.to_string()))?;
                Ok(raw.to_be_bytes().to_vec())
            }

            (kind, token) => Err(Error::TypeMismatch {
                expected: kind.to_string(),
                found: token.variant_name().to_string(),
            }),
        }
    }

    /// Converts a leaf back into a token. The inverse of [`AbiKind::leaf_from_token`].
    pub fn token_from_leaf(self, leaf: &[u8]) -> Result<Token> {
        match self {
            AbiKind::DynamicBytes => Ok(Token::Bytes(leaf.to_vec())),
            AbiKind::SString => std::str::from_utf8(leaf)
                .map(|s| Token::String(s.to_string()))
                .map_err(|_| Error::InvalidUtf8),
            _ => self.decode(&self.encode(leaf), 0),
        }
    }
}

impl fmt::Display for AbiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiKind::Address => write!(f, "address"),
            AbiKind::Bool => write!(f, "bool"),
            AbiKind::Bytes(n) => write!(f, "bytes{}", n),
            AbiKind::DynamicBytes => write!(f, "bytes"),
            AbiKind::Int(bits) => write!(f, "int{}", bits),
            AbiKind::Uint(bits) => write!(f, "uint{}", bits),
            AbiKind::Real => write!(f, "real"),
            AbiKind::Ureal => write!(f, "ureal"),
            AbiKind::SString => write!(f, "string"),
        }
    }
}

// Helpers

/// Digits only, no sign, no leading zero.
fn parse_width(s: &str) -> Option<u16> {
    if s.is_empty() || s.starts_with('0') || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_bits(s: &str) -> Option<u16> {
    let bits = parse_width(s)?;
    (bits % 8 == 0 && (8..=128).contains(&bits)).then_some(bits)
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(stripped)?)
}

fn exact_len(bytes: Vec<u8>, expected: usize) -> Result<Vec<u8>> {
    if bytes.len() != expected {
        return Err(Error::InvalidLength { expected, found: bytes.len() });
    }
    Ok(bytes)
}

fn int_leaf(v: i128, bits: u16) -> Result<Vec<u8>> {
    if bits < 128 {
        let half = 1i128 << (bits - 1);
        if v < -half || v >= half {
            return Err(Error::Overflow(format!("{} does not fit int{}", v, bits)));
        }
    }
    Ok(num::int_to_bytes(v, bits as usize / 8))
}

fn uint_leaf(v: u128, bits: u16) -> Result<Vec<u8>> {
    if bits < 128 && v >> bits != 0 {
        return Err(Error::Overflow(format!("{} does not fit uint{}", v, bits)));
    }
    Ok(num::uint_to_bytes(v, bits as usize / 8))
}

fn real_leaf(v: f64) -> Result<Vec<u8>> {
    let scaled = v * REAL_SCALE;
    // i128::MAX as f64 rounds up to 2^127, which is itself out of range.
    if !scaled.is_finite() || scaled < i128::MIN as f64 || scaled >= i128::MAX as f64 {
        return Err(Error::Overflow(v.to_string()));
    }
    Ok((scaled as i128).to_be_bytes().to_vec())
}

fn ureal_leaf(v: f64) -> Result<Vec<u8>> {
    if v < 0.0 {
        return Err(Error::NegativeUnsigned(v.to_string()));
    }
    let scaled = v * REAL_SCALE;
    if !scaled.is_finite() || scaled >= u128::MAX as f64 {
        return Err(Error::Overflow(v.to_string()));
    }
    Ok((scaled as u128).to_be_bytes().to_vec())
}

/// Parses a decimal or `0x` hex literal as an unsigned magnitude.
fn parse_uint_literal(s: &str) -> Result<u128> {
    let s = s.trim();
    if s.starts_with('-') {
        return Err(Error::NegativeUnsigned(s.to_string()));
    }
    parse_magnitude(s)
}

/// Parses a decimal or `0x` hex literal with an optional leading `-`.
fn parse_int_literal(s: &str) -> Result<i128> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let magnitude = parse_magnitude(digits)?;
    if negative {
        // -2^127 is representable, 2^127 is not
        if magnitude > i128::MAX as u128 + 1 {
            return Err(Error::Overflow(s.to_string()));
        }
        Ok((magnitude as i128).wrapping_neg())
    } else {
        i128::try_from(magnitude).map_err(|_| Error::Overflow(s.to_string()))
    }
}

fn parse_magnitude(s: &str) -> Result<u128> {
    let (digits, radix) = match s.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    u128::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        std::num::IntErrorKind::PosOverflow => Error::Overflow(s.to_string()),
        _ => Error::TypeMismatch { expected: "numeric literal".into(), found: s.to_string() },
    })
}
