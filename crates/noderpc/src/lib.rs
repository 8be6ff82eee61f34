//! # Noderpc
//!
//! Where the codec, the framer and the in-flight cache meet: a client that
//! frames requests, sends them over a pluggable [`Transport`] and routes the
//! node's replies back to their callers.
//!
//! ## Flow
//!
//! 1. The caller encodes arguments (`abipack`) or brings raw bytes.
//! 2. The client draws a correlation hash from its [`HashSource`], records the
//!    request in its in-flight table (`ttlcache`) and sends a framed request (`wireframe`).
//! 3. The pump task parses each inbound frame, looks the hash up and completes
//!    the matching caller.
//!
//! ## Invariants
//! - **One Receiver**: Only the pump calls [`Transport::recv`].
//! - **Caller-Owned Deadline**: The cache expiring an entry is not an error by
//!   itself; the caller learns about a lost reply through its own timeout.
//! - **No Sequencing**: The client never orders or retries calls. Replies may
//!   complete in any order.

pub mod client;
pub mod config;
pub mod error;
pub mod hash_source;
pub mod mock_transport;
pub mod transport;


pub use client::Client;
pub use client::Reply;
pub use config::ClientConfig;
pub use error::Error;
pub use error::Result;
pub use hash_source::HashSource;
pub use hash_source::RandomHashSource;
pub use transport::Transport;
