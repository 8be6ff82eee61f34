//! # Transport Abstraction
//!
//! A minimal, async interface for moving frames between the client and a node.
//!
//! ## Philosophy
//!
//! - **Byte-Oriented**: The transport knows nothing about headers, hashes or ABI
//!   values. It moves opaque buffers.
//! - **Unordered**: Replies may arrive in any order. Matching them to requests is
//!   the client's job, done through the correlation hash.

use std::fmt;

/// Errors that occur at the network/transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The node is unreachable or the connection was dropped.
    ConnectionLost(String),
    /// The node rejected the payload size.
    PayloadTooLarge,
    /// Generic I/O error or internal transport failure.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::PayloadTooLarge => write!(f, "Payload too large for transport"),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// A full-duplex pipe of frames.
///
/// This trait is object-safe (`Arc<dyn Transport>`).
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends one frame.
    async fn send(&self, payload: &[u8]) -> Result<()>;

    /// Waits for the next inbound frame. `Ok(None)` means the stream closed.
    ///
    /// # Invariants
    /// - Only one task calls `recv` at a time (the client's pump).
    /// - Must not interpret the payload.
    async fn recv(&self) -> Result<Option<Vec<u8>>>;
}
