//! # Tokens
//!
//! The language-level value tree. Callers build tokens to encode and receive
//! tokens from decode; nesting mirrors the type's array dimensions.

use std::fmt;

/// A decoded or to-be-encoded ABI value.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Address([u8; 20]),
    Bool(bool),
    /// `bytesN`: exactly N bytes.
    FixedBytes(Vec<u8>),
    /// Dynamic `bytes`.
    Bytes(Vec<u8>),
    Int(i128),
    Uint(u128),
    /// Fixed-point `real`/`ureal`, carried as a float.
    Real(f64),
    String(String),
    Array(Vec<Token>),
}

impl Token {
    /// Name of the variant, for error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Bool(_) => "bool",
            Token::FixedBytes(_) => "fixed bytes",
            Token::Bytes(_) => "bytes",
            Token::Int(_) => "int",
            Token::Uint(_) => "uint",
            Token::Real(_) => "real",
            Token::String(_) => "string",
            Token::Array(_) => "array",
        }
    }

    pub fn as_array(&self) -> Option<&[Token]> {
        match self {
            Token::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Token::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Token::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Address(a) => write!(f, "0x{}", hex::encode(a)),
            Token::Bool(b) => write!(f, "{}", b),
            Token::FixedBytes(b) | Token::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Token::Int(v) => write!(f, "{}", v),
            Token::Uint(v) => write!(f, "{}", v),
            Token::Real(v) => write!(f, "{}", v),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Token {
    fn from(v: bool) -> Self {
        Token::Bool(v)
    }
}

impl From<u128> for Token {
    fn from(v: u128) -> Self {
        Token::Uint(v)
    }
}

impl From<i128> for Token {
    fn from(v: i128) -> Self {
        Token::Int(v)
    }
}

impl From<&str> for Token {
    fn from(v: &str) -> Self {
        Token::String(v.to_string())
    }
}

impl From<String> for Token {
    fn from(v: String) -> Self {
        Token::String(v)
    }
}

impl From<[u8; 20]> for Token {
    fn from(v: [u8; 20]) -> Self {
        Token::Address(v)
    }
}

impl<T: Into<Token>> From<Vec<T>> for Token {
    fn from(items: Vec<T>) -> Self {
        Token::Array(items.into_iter().map(Into::into).collect())
    }
}
