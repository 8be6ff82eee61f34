//! # Protocol Frames
//!
//! Builds and parses the fixed prefixes of request and response frames.
//!
//! ## Invariants
//! - The hash flag byte and the presence of 8 hash bytes always agree.
//! - Body offsets are derived from the flag, never from the buffer length.

use crate::Error;
use crate::Result;

/// Length of a correlation hash.
pub const HASH_LEN: usize = 8;

/// `[version][service][function][has_hash]`
pub const REQUEST_PREFIX_LEN: usize = 4;

/// `[version][service][has_hash]`
pub const RESPONSE_PREFIX_LEN: usize = 3;

/// Index of the hash flag inside a response prefix.
pub const RESPONSE_HASH_FLAG: usize = 2;

/// The header of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    pub protocol_version: u8,
    pub service_id: u8,
    pub function_id: u8,
    pub hash: Option<[u8; HASH_LEN]>,
}

impl RequestHeader {
    pub fn new(protocol_version: u8, service_id: u8, function_id: u8) -> Self {
        Self { protocol_version, service_id, function_id, hash: None }
    }

    /// Attaches a correlation hash.
    pub fn with_hash(mut self, hash: [u8; HASH_LEN]) -> Self {
        self.hash = Some(hash);
        self
    }

    pub fn has_hash(&self) -> bool {
        self.hash.is_some()
    }

    /// Encoded size of this header.
    pub fn len(&self) -> usize {
        REQUEST_PREFIX_LEN + if self.has_hash() { HASH_LEN } else { 0 }
    }

    /// Writes the header onto the end of `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[
            self.protocol_version,
            self.service_id,
            self.function_id,
            self.has_hash() as u8,
        ]);
        if let Some(hash) = &self.hash {
            out.extend_from_slice(hash);
        }
    }

    /// Returns the encoded header.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        self.encode_into(&mut out);
        out
    }
}

/// Builds a request header from loose parts.
///
/// # Errors
/// Returns `Error::HashLength` if `hash` is present but not exactly 8 bytes.
pub fn build_request_header(
    protocol_version: u8,
    service_id: u8,
    function_id: u8,
    hash: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let mut header = RequestHeader::new(protocol_version, service_id, function_id);
    if let Some(hash) = hash {
        let hash: [u8; HASH_LEN] = hash.try_into().map_err(|_| Error::HashLength(hash.len()))?;
        header = header.with_hash(hash);
    }
    Ok(header.encode())
}

/// Builds a complete request frame.
pub fn build_request(header: &RequestHeader, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(header.len() + body.len());
    header.encode_into(&mut out);
    out.extend_from_slice(body);
    out
}

/// Parses a request frame into its header and body.
///
/// Request parsing is strict; this is the node side of the protocol and is
/// mostly useful for test doubles.
///
/// # Errors
/// Returns `Error::Truncated` if the buffer ends inside the header.
pub fn parse_request_header(raw: &[u8]) -> Result<(RequestHeader, &[u8])> {
    if raw.len() < REQUEST_PREFIX_LEN {
        return Err(Error::Truncated { needed: REQUEST_PREFIX_LEN, available: raw.len() });
    }

    let mut header = RequestHeader::new(raw[0], raw[1], raw[2]);
    let mut body_start = REQUEST_PREFIX_LEN;

    if raw[3] != 0 {
        let end = REQUEST_PREFIX_LEN + HASH_LEN;
        let Some(hash) = raw.get(REQUEST_PREFIX_LEN..end) else {
            return Err(Error::Truncated { needed: end, available: raw.len() });
        };
        // the slice is exactly HASH_LEN long
        let mut buf = [0u8; HASH_LEN];
        buf.copy_from_slice(hash);
        header = header.with_hash(buf);
        body_start = end;
    }

    Ok((header, &raw[body_start..]))
}

/// A parsed response frame, borrowing its body from the raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseFrame<'a> {
    pub protocol_version: u8,
    pub service_id: u8,
    pub hash: Option<[u8; HASH_LEN]>,
    pub body: &'a [u8],
}

impl<'a> ResponseFrame<'a> {
    pub fn has_hash(&self) -> bool {
        self.hash.is_some()
    }

    /// True when parsing found nothing usable.
    pub fn is_empty(&self) -> bool {
        self.hash.is_none() && self.body.is_empty()
    }
}

/// Parses a response frame.
///
/// Never fails: a buffer shorter than its declared header yields an empty frame.
pub fn parse_response(raw: &[u8]) -> ResponseFrame<'_> {
    if raw.len() < RESPONSE_PREFIX_LEN {
        return ResponseFrame::default();
    }

    let protocol_version = raw[0];
    let service_id = raw[1];

    if raw[RESPONSE_HASH_FLAG] == 0 {
        return ResponseFrame {
            protocol_version,
            service_id,
            hash: None,
            body: &raw[RESPONSE_PREFIX_LEN..],
        };
    }

    let body_start = RESPONSE_PREFIX_LEN + HASH_LEN;
    if raw.len() < body_start {
        return ResponseFrame::default();
    }

    let mut hash = [0u8; HASH_LEN];
    hash.copy_from_slice(&raw[RESPONSE_PREFIX_LEN..body_start]);

    ResponseFrame {
        protocol_version,
        service_id,
        hash: Some(hash),
        body: &raw[body_start..],
    }
}

/// Builds a response frame. The node side of [`parse_response`].
pub fn build_response(
    protocol_version: u8,
    service_id: u8,
    hash: Option<[u8; HASH_LEN]>,
    body: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(RESPONSE_PREFIX_LEN + HASH_LEN + body.len());
    out.extend_from_slice(&[protocol_version, service_id, hash.is_some() as u8]);
    if let Some(hash) = &hash {
        out.extend_from_slice(hash);
    }
    out.extend_from_slice(body);
    out
}
