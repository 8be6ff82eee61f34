//! # Wireframe
//!
//! Fixed-offset headers for the node byte protocol.
//!
//! ## Format
//!
//! - **Request**: `[version][service][function][has_hash: 0|1][hash: 8?][body..]`
//! - **Response**: `[version][service][has_hash: 0|1][hash: 8?][body..]`
//!
//! The 8-byte hash correlates a response with the request that caused it.
//! Replies may arrive out of order; the hash is the only link.
//!
//! ## Invariants
//! - **Pure**: No I/O, no shared state. Safe to call from any thread.
//! - **Tolerant Parsing**: Short responses parse to an empty frame, never an error.
//! - **Strict Building**: A correlation hash must be exactly [`HASH_LEN`] bytes.

pub mod frame;
pub mod num;
pub mod status;

#[cfg(test)]
mod tests;

pub use frame::HASH_LEN;
pub use frame::RequestHeader;
pub use frame::ResponseFrame;
pub use frame::build_request;
pub use frame::build_request_header;
pub use frame::build_response;
pub use frame::parse_request_header;
pub use frame::parse_response;
pub use status::TxStatus;
pub use status::is_terminal_tx_status;

/// Framing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A correlation hash was supplied with the wrong length.
    HashLength(usize),
    /// A request buffer ended before its header did.
    Truncated { needed: usize, available: usize },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::HashLength(len) => {
                write!(f, "Correlation hash must be {} bytes, got {}", HASH_LEN, len)
            }
            Error::Truncated { needed, available } => {
                write!(f, "Frame truncated: needed {} bytes, {} available", needed, available)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for framing operations.
pub type Result<T> = std::result::Result<T, Error>;
