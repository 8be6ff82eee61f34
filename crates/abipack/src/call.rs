//! # Argument Lists and Selectors
//!
//! A call payload is the heads of every argument back to back, followed by
//! the tails of the dynamic ones. A function is addressed by the first four
//! bytes of the Keccak-256 digest of its canonical signature.

use std::fmt;

use crate::error::Error;
use crate::error::Result;
use crate::token::Token;
use crate::types::AbiType;
use crate::value::AbiValue;

/// Length of a function selector.
pub const SELECTOR_LEN: usize = 4;

/// Total head length of an argument list.
pub fn head_length(args: &[AbiValue]) -> usize {
    args.iter().map(AbiValue::static_part_length).sum()
}

/// Head offset of each argument.
pub fn head_offsets(args: &[AbiValue]) -> Vec<usize> {
    let mut at = 0;
    args.iter()
        .map(|arg| {
            let offset = at;
            at += arg.static_part_length();
            offset
        })
        .collect()
}

/// Encodes an argument list.
pub fn encode_args(args: &[AbiValue]) -> Vec<u8> {
    let mut out = vec![0u8; head_length(args)];
    for (arg, at) in args.iter().zip(head_offsets(args)) {
        arg.encode_into(at, &mut out);
    }
    out
}

/// Hex form of [`encode_args`].
pub fn encode_args_hex(args: &[AbiValue]) -> String {
    hex::encode(encode_args(args))
}

/// Decodes an argument list laid out as [`encode_args`] produces.
///
/// # Errors
/// Propagates per-argument decode errors. Truncation is not an error.
pub fn decode_args(types: &[AbiType], data: &[u8]) -> Result<Vec<Token>> {
    let mut at = 0;
    let mut out = Vec::with_capacity(types.len());
    for ty in types {
        out.push(ty.decode(data, at)?);
        at += ty.static_part_length();
    }
    Ok(out)
}

/// Pairs types with tokens into values.
///
/// # Errors
/// Returns `Error::ArgumentCount` if the lists differ in length, or the first
/// conversion error.
pub fn values_from_tokens(types: &[AbiType], tokens: &[Token]) -> Result<Vec<AbiValue>> {
    if types.len() != tokens.len() {
        return Err(Error::ArgumentCount { expected: types.len(), found: tokens.len() });
    }
    types
        .iter()
        .zip(tokens)
        .map(|(ty, token)| AbiValue::copy_from(ty.clone(), token))
        .collect()
}

/// A parsed function or event signature such as `transfer(address,uint128)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<AbiType>,
}

impl Signature {
    /// Parses `name(type,type,...)`. Whitespace around types is ignored.
    ///
    /// # Errors
    /// Returns `Error::InvalidSignature` if the shape is wrong or a type does not parse.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidSignature(s.to_string());

        let s = s.trim();
        let open = s.find('(').ok_or_else(invalid)?;
        let body = s[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
        let name = &s[..open];
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid());
        }

        let params = if body.trim().is_empty() {
            Vec::new()
        } else {
            body.split(',')
                .map(|t| AbiType::parse(t.trim()).map_err(|_| invalid()))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self { name: name.to_string(), params })
    }

    /// The 4-byte function selector of the canonical form.
    pub fn selector(&self) -> [u8; SELECTOR_LEN] {
        let digest = sponge::keccak256(self.to_string().as_bytes());
        let mut out = [0u8; SELECTOR_LEN];
        out.copy_from_slice(&digest[..SELECTOR_LEN]);
        out
    }

    /// The 32-byte event topic of the canonical form.
    pub fn topic(&self) -> [u8; 32] {
        sponge::keccak256(self.to_string().as_bytes())
    }

    /// Encodes a call: selector, then the argument list.
    ///
    /// # Errors
    /// Returns `Error::ArgumentCount` or a conversion error.
    pub fn encode_call(&self, args: &[Token]) -> Result<Vec<u8>> {
        let values = values_from_tokens(&self.params, args)?;
        let mut out = self.selector().to_vec();
        out.extend(encode_args(&values));
        Ok(out)
    }
}

impl fmt::Display for Signature {
    /// Canonical form: no spaces, widths spelled out.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

/// Selector of a function signature string.
pub fn function_selector(signature: &str) -> Result<[u8; SELECTOR_LEN]> {
    Ok(Signature::parse(signature)?.selector())
}

/// Topic of an event signature string.
pub fn event_topic(signature: &str) -> Result<[u8; 32]> {
    Ok(Signature::parse(signature)?.topic())
}

/// Encodes a call from a signature string and argument tokens.
pub fn encode_call(signature: &str, args: &[Token]) -> Result<Vec<u8>> {
    Signature::parse(signature)?.encode_call(args)
}

/// Parses a list of type descriptors.
pub fn parse_types<S: AsRef<str>>(types: &[S]) -> Result<Vec<AbiType>> {
    types.iter().map(|t| AbiType::parse(t.as_ref())).collect()
}
