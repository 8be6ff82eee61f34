use crate::transport;

/// Client errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Transport(transport::Error),
    Abi(abipack::Error),
    Cache(ttlcache::Error),
    /// No reply within the request timeout.
    Timeout,
    /// The reply arrived after the request left the in-flight table.
    Expired,
    /// The pump dropped the waiter without answering.
    ChannelClosed,
    /// The client was closed.
    Closed,
    /// The reply names a different service than the request.
    ServiceMismatch { expected: u8, received: u8 },
    /// The reply speaks a different protocol version.
    VersionMismatch { expected: u8, received: u8 },
    /// The hash source kept returning hashes already in flight.
    HashExhausted,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Abi(e) => write!(f, "ABI error: {}", e),
            Self::Cache(e) => write!(f, "Cache error: {}", e),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Expired => write!(f, "Reply arrived for an expired request"),
            Self::ChannelClosed => write!(f, "Response channel closed"),
            Self::Closed => write!(f, "Client closed"),
            Self::ServiceMismatch { expected, received } => {
                write!(f, "Service mismatch: expected {}, received {}", expected, received)
            }
            Self::VersionMismatch { expected, received } => {
                write!(f, "Protocol version mismatch: expected {}, received {}", expected, received)
            }
            Self::HashExhausted => write!(f, "Could not find a free correlation hash"),
        }
    }
}

impl std::error::Error for Error {}

impl From<transport::Error> for Error {
    fn from(e: transport::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<abipack::Error> for Error {
    fn from(e: abipack::Error) -> Self {
        Self::Abi(e)
    }
}

impl From<ttlcache::Error> for Error {
    fn from(e: ttlcache::Error) -> Self {
        match e {
            ttlcache::Error::Closed => Self::Closed,
            other => Self::Cache(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
