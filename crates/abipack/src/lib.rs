//! # Abipack
//!
//! A Solidity-style ABI codec over the node protocol's 16-byte words.
//!
//! ## Architecture
//!
//! - [`AbiKind`]: the closed set of scalar kinds and their per-kind contract
//!   (type-string matching, padding, decoding).
//! - [`AbiType`]: a kind wrapped in array dimensions, parsed from descriptors
//!   like `uint64[3][]`.
//! - [`AbiValue`]: a type plus a validated payload tree, built from [`Token`]s.
//! - [`call`]: argument lists, signatures and selectors.
//!
//! ## Words
//!
//! The native word is 16 bytes (128-bit integers). Addresses and `bytesN` with
//! N > 16 use a doubled 32-byte word. Pointers and counts are written in the
//! word size of the kind they belong to.
//!
//! ## Invariants
//! - **Pure**: No shared state. Every function can be called from any thread.
//! - **Tolerant Decoding**: Reads past the end of the buffer produce zero values,
//!   matching what existing nodes expect. Callers must not trust a zero at face value.
//! - **Strict Construction**: Malformed input is rejected when a value is built,
//!   never silently truncated.

pub mod call;
pub mod error;
pub mod kind;
mod layer;
pub mod token;
pub mod types;
pub mod value;


pub use call::Signature;
pub use call::decode_args;
pub use call::encode_args;
pub use call::encode_call;
pub use call::event_topic;
pub use call::function_selector;
pub use error::Error;
pub use error::Result;
pub use kind::AbiKind;
pub use token::Token;
pub use types::AbiType;
pub use types::ArgClass;
pub use types::Dim;
pub use types::set_type;
pub use value::AbiValue;
pub use value::Node;
