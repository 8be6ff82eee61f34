//! # Layered Encode/Decode
//!
//! The recursive core shared by every kind. One recursion level per array
//! dimension; the remaining dimensions and the offset are threaded explicitly.
//!
//! ## Layout
//!
//! Every node has a static part of `static_len(kind, dims)` bytes at a position
//! chosen by its parent:
//!
//! - **Fixed dimension**: the children's static parts, back to back, each
//!   `child_stride` apart. Missing children leave their slot zeroed.
//! - **Scalar**: the padded word.
//! - **Indirect node** (dynamic dimension, or dynamic scalar): a pointer word
//!   holding the absolute offset of its content, which is appended to the tail.
//!   Array content is `[count][children static parts]`; scalar content is
//!   `[length][data padded]`.
//!
//! Pointers are absolute positions in the whole encoded buffer.
//!
//! ## Decode budget
//!
//! In a well-formed buffer the element regions of every dynamic array are
//! disjoint, so their `count * stride` sum never exceeds the buffer length.
//! One decode shares a byte budget of `data.len()` across all dynamic levels.
//! Pointers that fold several arrays onto the same bytes run it dry and fail
//! with `Error::LengthOutOfBounds` instead of fanning out.

use wireframe::num;

use crate::error::Error;
use crate::error::Result;
use crate::kind::AbiKind;
use crate::token::Token;
use crate::types::Dim;
use crate::types::child_stride;
use crate::types::is_indirect;
use crate::value::Node;

/// Writes the static part of `node` at `at` and appends any content it points to.
///
/// `out[at..at + static_len(kind, dims)]` must already exist and be zeroed.
///
/// # Panics
/// Panics if the payload nesting disagrees with `dims`. `AbiValue` construction
/// rules this out.
pub(crate) fn encode_static(kind: AbiKind, dims: &[Dim], node: &Node, at: usize, out: &mut Vec<u8>) {
    let word = kind.word_size();

    if is_indirect(kind, dims) {
        let pointer = out.len();
        num::write_uint_word(out, at, pointer as u128, word);
        encode_content(kind, dims, node, out);
        return;
    }

    match (dims.split_first(), node) {
        (None, Node::Leaf(leaf)) => {
            let padded = kind.encode(leaf);
            out[at..at + padded.len()].copy_from_slice(&padded);
        }
        (Some((Dim::Fixed(n), inner)), Node::List(children)) => {
            let stride = child_stride(kind, inner);
            for (i, child) in children.iter().take(*n).enumerate() {
                encode_static(kind, inner, child, at + i * stride, out);
            }
        }
        _ => unreachable!("payload nesting does not match {} dimensions", dims.len()),
    }
}

/// Appends the content of an indirect node to the tail.
fn encode_content(kind: AbiKind, dims: &[Dim], node: &Node, out: &mut Vec<u8>) {
    match (dims.split_first(), node) {
        (None, Node::Leaf(leaf)) => out.extend(kind.encode(leaf)),
        (Some((Dim::Dynamic, inner)), Node::List(children)) => {
            let word = kind.word_size();
            out.extend(num::uint_to_word(children.len() as u128, word));

            let stride = child_stride(kind, inner);
            let start = out.len();
            out.resize(start + children.len() * stride, 0);
            for (i, child) in children.iter().enumerate() {
                encode_static(kind, inner, child, start + i * stride, out);
            }
        }
        _ => unreachable!("payload nesting does not match {} dimensions", dims.len()),
    }
}

/// Decodes a node whose static part starts at `offset`.
///
/// `budget` is the number of bytes dynamic arrays may still claim.
pub(crate) fn decode_static(
    kind: AbiKind,
    dims: &[Dim],
    data: &[u8],
    offset: usize,
    budget: &mut usize,
) -> Result<Token> {
    if is_indirect(kind, dims) {
        let pointer = read_position(data, offset, kind.word_size());
        return decode_content(kind, dims, data, pointer, budget);
    }

    match dims.split_first() {
        None => kind.decode(data, offset),
        Some((Dim::Fixed(n), inner)) => {
            let stride = child_stride(kind, inner);
            let items = (0..*n)
                .map(|i| decode_static(kind, inner, data, offset.saturating_add(i * stride), budget))
                .collect::<Result<Vec<_>>>()?;
            Ok(Token::Array(items))
        }
        Some((Dim::Dynamic, _)) => unreachable!("dynamic dimensions are indirect"),
    }
}

/// Decodes the content an indirect node points at.
fn decode_content(kind: AbiKind, dims: &[Dim], data: &[u8], pointer: usize, budget: &mut usize) -> Result<Token> {
    let Some((_, inner)) = dims.split_first() else {
        return kind.decode(data, pointer);
    };

    let word = kind.word_size();
    let count = read_position(data, pointer, word);
    let stride = child_stride(kind, inner);
    let claim = count.saturating_mul(stride);
    if claim > *budget {
        return Err(Error::LengthOutOfBounds(count));
    }
    *budget -= claim;

    let first = pointer.saturating_add(word);
    let items = (0..count)
        .map(|i| decode_static(kind, inner, data, first.saturating_add(i.saturating_mul(stride)), budget))
        .collect::<Result<Vec<_>>>()?;
    Ok(Token::Array(items))
}

/// Reads a pointer or count word.
///
/// Out-of-bounds reads give 0; values too large to be positions give `usize::MAX`,
/// which then reads as out of bounds.
fn read_position(data: &[u8], offset: usize, word: usize) -> usize {
    match num::read_word(data, offset, word) {
        Some(bytes) => num::word_to_usize(bytes).unwrap_or(usize::MAX),
        None => 0,
    }
}
