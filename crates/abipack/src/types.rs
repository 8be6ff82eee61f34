//! # Types and Shapes
//!
//! An `AbiType` is a scalar kind wrapped in zero or more array dimensions.
//!
//! ## Dimension Order
//!
//! Dimensions are stored outermost first. The descriptor `address[3][]` is a
//! dynamic array of `address[3]`, so its dimensions are `[Dynamic, Fixed(3)]`:
//! the textual suffixes read innermost first.

use std::fmt;

use wireframe::num;

use crate::error::Error;
use crate::error::Result;
use crate::kind::AbiKind;
use crate::layer;
use crate::token::Token;

/// The maximum number of array dimensions on one type.
pub const MAX_DIMENSIONS: usize = 16;

/// The maximum number of scalar slots a fully fixed type may span.
pub const MAX_STATIC_SLOTS: usize = 1 << 20;

/// One array dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Length travels on the wire (`[]`).
    Dynamic,
    /// Length is part of the type (`[n]`, n >= 1).
    Fixed(usize),
}

/// How an argument is laid out relative to the head of an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgClass {
    Static,
    Dynamic,
    StaticArray,
    DynamicArray,
}

impl ArgClass {
    /// True when the argument's head slot holds a pointer.
    pub fn is_dynamic(self) -> bool {
        matches!(self, ArgClass::Dynamic | ArgClass::DynamicArray)
    }
}

/// A scalar kind plus its array dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiType {
    kind: AbiKind,
    /// Outermost first.
    dims: Vec<Dim>,
}

impl AbiType {
    /// Builds a type from parts.
    ///
    /// # Errors
    /// Returns `Error::InvalidTypeString` for out-of-range kind widths, zero-length
    /// fixed dimensions, too many dimensions, or fixed arrays too large to lay out.
    pub fn new(kind: AbiKind, dims: Vec<Dim>) -> Result<Self> {
        let valid_kind = match kind {
            AbiKind::Bytes(n) => (1..=32).contains(&n),
            AbiKind::Int(bits) | AbiKind::Uint(bits) => bits % 8 == 0 && (8..=128).contains(&bits),
            _ => true,
        };
        if !valid_kind {
            return Err(Error::InvalidTypeString(kind.to_string()));
        }
        if dims.len() > MAX_DIMENSIONS || dims.contains(&Dim::Fixed(0)) {
            return Err(Error::InvalidTypeString(render(kind, &dims)));
        }

        let mut slots: usize = 1;
        for dim in &dims {
            if let Dim::Fixed(n) = dim {
                slots = slots.saturating_mul(*n);
            }
        }
        if slots > MAX_STATIC_SLOTS {
            return Err(Error::InvalidTypeString(render(kind, &dims)));
        }

        Ok(Self { kind, dims })
    }

    /// A scalar type.
    pub fn scalar(kind: AbiKind) -> Self {
        Self { kind, dims: Vec::new() }
    }

    /// Parses a descriptor such as `uint128`, `string[]` or `address[3][]`.
    ///
    /// # Errors
    /// Returns `Error::InvalidTypeString` if the descriptor is malformed.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidTypeString(s.to_string());

        let base_end = s.find('[').unwrap_or(s.len());
        let kind = AbiKind::parse(&s[..base_end]).ok_or_else(invalid)?;

        // Suffixes read innermost first.
        let mut dims = Vec::new();
        let mut rest = &s[base_end..];
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[').ok_or_else(invalid)?;
            let close = inner.find(']').ok_or_else(invalid)?;
            let size = &inner[..close];
            let dim = if size.is_empty() {
                Dim::Dynamic
            } else if size.bytes().all(|b| b.is_ascii_digit()) {
                Dim::Fixed(size.parse().map_err(|_| invalid())?)
            } else {
                return Err(invalid());
            };
            dims.push(dim);
            rest = &inner[close + 1..];
        }
        dims.reverse();

        Self::new(kind, dims).map_err(|_| invalid())
    }

    pub fn kind(&self) -> AbiKind {
        self.kind
    }

    /// Dimensions, outermost first.
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    pub fn is_array(&self) -> bool {
        !self.dims.is_empty()
    }

    pub fn word_size(&self) -> usize {
        self.kind.word_size()
    }

    /// The argument class implied by kind and shape.
    pub fn arg_class(&self) -> ArgClass {
        if self.dims.is_empty() {
            if self.kind.is_dynamic() { ArgClass::Dynamic } else { ArgClass::Static }
        } else if self.dims.contains(&Dim::Dynamic) {
            ArgClass::DynamicArray
        } else {
            ArgClass::StaticArray
        }
    }

    /// True if any part of an encoding lands in the dynamic tail.
    pub fn has_tail(&self) -> bool {
        self.kind.is_dynamic() || self.dims.contains(&Dim::Dynamic)
    }

    /// Bytes this type occupies in the head of an encoding.
    pub fn static_part_length(&self) -> usize {
        static_len(self.kind, &self.dims)
    }

    /// The element type one dimension in, or `None` for scalars.
    pub fn element(&self) -> Option<AbiType> {
        let (_, inner) = self.dims.split_first()?;
        Some(Self { kind: self.kind, dims: inner.to_vec() })
    }

    /// Decodes a value of this type whose head starts at `offset`.
    ///
    /// Truncated input yields zero values. The result's nesting mirrors the dimensions.
    ///
    /// # Errors
    /// Returns `Error::LengthOutOfBounds` for element counts the buffer cannot
    /// hold, summed over every dynamic level, and
    /// `Error::InvalidUtf8` for malformed strings.
    pub fn decode(&self, data: &[u8], offset: usize) -> Result<Token> {
        let mut budget = data.len();
        layer::decode_static(self.kind, &self.dims, data, offset, &mut budget)
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for dim in self.dims.iter().rev() {
            match dim {
                Dim::Dynamic => write!(f, "[]")?,
                Dim::Fixed(n) => write!(f, "[{}]", n)?,
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for AbiType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parses a type descriptor.
pub fn set_type(s: &str) -> Result<AbiType> {
    AbiType::parse(s)
}

/// Static part length of a layer: the word unit times every fixed dimension at
/// or below it. Dynamic dimensions count as 1.
pub(crate) fn static_len(kind: AbiKind, dims: &[Dim]) -> usize {
    dims.iter().fold(kind.word_size(), |acc, dim| match dim {
        Dim::Dynamic => acc,
        Dim::Fixed(n) => acc * n,
    })
}

/// Distance between consecutive children of a layer.
pub(crate) fn child_stride(kind: AbiKind, inner: &[Dim]) -> usize {
    num::round_up(static_len(kind, inner), kind.word_size())
}

/// True if a node at this layer is reached through a pointer.
pub(crate) fn is_indirect(kind: AbiKind, dims: &[Dim]) -> bool {
    match dims.first() {
        Some(Dim::Dynamic) => true,
        Some(Dim::Fixed(_)) => false,
        None => kind.is_dynamic(),
    }
}

fn render(kind: AbiKind, dims: &[Dim]) -> String {
    AbiType { kind, dims: dims.to_vec() }.to_string()
}
