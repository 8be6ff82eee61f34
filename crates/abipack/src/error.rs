//! # Error Definitions
//!
//! Every way an ABI value can be rejected. Truncated wire data is not here:
//! decoding treats missing bytes as zero.

/// ABI codec errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A type descriptor did not parse.
    InvalidTypeString(String),
    /// A function signature did not parse.
    InvalidSignature(String),
    /// A token did not fit the scalar kind it was given to.
    TypeMismatch { expected: String, found: String },
    /// Nesting of the input disagrees with the type's dimensions.
    ShapeMismatch(String),
    /// One array level held items of different variants.
    MixedArray(String),
    /// A fixed-size array was given more elements than it holds.
    TooManyElements { expected: usize, found: usize },
    /// A byte string had the wrong length for its kind.
    InvalidLength { expected: usize, found: usize },
    /// A numeric value or literal exceeds the range of its kind.
    Overflow(String),
    /// An unsigned kind was given a negative value.
    NegativeUnsigned(String),
    /// A hex literal did not parse.
    InvalidHex(String),
    /// Decoded string data is not valid UTF-8.
    InvalidUtf8,
    /// A decoded element count cannot fit in the buffer.
    LengthOutOfBounds(usize),
    /// The number of values does not match the number of types.
    ArgumentCount { expected: usize, found: usize },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidTypeString(s) => write!(f, "Invalid type string: {:?}", s),
            Error::InvalidSignature(s) => write!(f, "Invalid signature: {:?}", s),
            Error::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Error::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            Error::MixedArray(msg) => write!(f, "Mixed array: {}", msg),
            Error::TooManyElements { expected, found } => {
                write!(f, "Too many elements: fixed array holds {}, got {}", expected, found)
            }
            Error::InvalidLength { expected, found } => {
                write!(f, "Invalid length: expected {} bytes, got {}", expected, found)
            }
            Error::Overflow(v) => write!(f, "Value out of range: {}", v),
            Error::NegativeUnsigned(v) => write!(f, "Negative value for unsigned kind: {}", v),
            Error::InvalidHex(s) => write!(f, "Invalid hex: {}", s),
            Error::LengthOutOfBounds(n) => write!(f, "Decoded length {} exceeds buffer", n),
            Error::ArgumentCount { expected, found } => {
                write!(f, "Argument count mismatch: expected {}, got {}", expected, found)
            }
            Error::InvalidUtf8 => write!(f, "Decoded string is not valid UTF-8"),
        }
    }
}

impl std::error::Error for Error {}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Self::InvalidHex(e.to_string())
    }
}

/// Specialized `Result` for ABI operations.
pub type Result<T> = std::result::Result<T, Error>;
