//! # ABI Values
//!
//! An `AbiValue` is a type plus a payload tree whose nesting matches the type's
//! dimensions exactly. Construction validates; encoding trusts the invariant.

use crate::error::Error;
use crate::error::Result;
use crate::kind::AbiKind;
use crate::layer;
use crate::token::Token;
use crate::types::AbiType;
use crate::types::ArgClass;
use crate::types::Dim;

/// Raw nested payload: one leaf per scalar, one list level per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Vec<u8>),
    List(Vec<Node>),
}

impl Node {
    /// Number of leaves under this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::List(children) => children.iter().map(Node::leaf_count).sum(),
        }
    }
}

/// A typed value ready to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiValue {
    ty: AbiType,
    payload: Node,
}

impl AbiValue {
    /// Builds a value of type `ty` from a token tree.
    ///
    /// Fixed dimensions may be under-supplied; the missing slots encode as zeros.
    ///
    /// # Errors
    /// - `Error::ShapeMismatch` if nesting depth disagrees with the type.
    /// - `Error::MixedArray` if one array level mixes variants.
    /// - `Error::TooManyElements` if a fixed dimension is over-supplied.
    /// - Any scalar conversion error from [`AbiKind::leaf_from_token`].
    pub fn copy_from(ty: AbiType, token: &Token) -> Result<Self> {
        let payload = build_node(ty.kind(), ty.dims(), token)?;
        Ok(Self { ty, payload })
    }

    /// Parses `type_str` and builds a value from `token`.
    pub fn from_type_str(type_str: &str, token: &Token) -> Result<Self> {
        Self::copy_from(AbiType::parse(type_str)?, token)
    }

    pub fn abi_type(&self) -> &AbiType {
        &self.ty
    }

    pub fn kind(&self) -> AbiKind {
        self.ty.kind()
    }

    pub fn payload(&self) -> &Node {
        &self.payload
    }

    pub fn arg_class(&self) -> ArgClass {
        self.ty.arg_class()
    }

    /// Bytes this value occupies in the head of an argument list.
    pub fn static_part_length(&self) -> usize {
        self.ty.static_part_length()
    }

    /// Where the dynamic tail begins when this value is encoded on its own,
    /// or `None` if the encoding has no tail.
    pub fn dynamic_offset(&self) -> Option<usize> {
        self.ty.has_tail().then(|| self.static_part_length())
    }

    /// Bytes this value appends to the dynamic tail.
    pub fn dynamic_part_length(&self) -> usize {
        self.encode().len() - self.static_part_length()
    }

    /// Writes the static part at `at` and appends the tail to `out`.
    pub(crate) fn encode_into(&self, at: usize, out: &mut Vec<u8>) {
        layer::encode_static(self.ty.kind(), self.ty.dims(), &self.payload, at, out);
    }

    /// Encodes this value as a sole argument: static part, then tail.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.static_part_length()];
        self.encode_into(0, &mut out);
        out
    }

    /// Hex form of [`AbiValue::encode`].
    pub fn input_format(&self) -> String {
        hex::encode(self.encode())
    }

    /// Decodes a value of type `ty` whose head starts at `offset`.
    pub fn decode(ty: &AbiType, data: &[u8], offset: usize) -> Result<Self> {
        let token = ty.decode(data, offset)?;
        Self::copy_from(ty.clone(), &token)
    }

    /// Converts the payload back into a token tree.
    pub fn to_token(&self) -> Result<Token> {
        to_token(self.ty.kind(), &self.payload)
    }
}

fn build_node(kind: AbiKind, dims: &[Dim], token: &Token) -> Result<Node> {
    let Some((dim, inner)) = dims.split_first() else {
        if let Token::Array(_) = token {
            return Err(Error::ShapeMismatch(format!("expected {} scalar, found array", kind)));
        }
        return Ok(Node::Leaf(kind.leaf_from_token(token)?));
    };

    let Token::Array(items) = token else {
        return Err(Error::ShapeMismatch(format!(
            "expected array of depth {}, found {}",
            dims.len(),
            token.variant_name()
        )));
    };

    if let Some(first) = items.first() {
        let tag = std::mem::discriminant(first);
        if let Some(odd) = items.iter().find(|item| std::mem::discriminant(*item) != tag) {
            return Err(Error::MixedArray(format!(
                "{} alongside {}",
                first.variant_name(),
                odd.variant_name()
            )));
        }
    }

    if let Dim::Fixed(n) = dim {
        if items.len() > *n {
            return Err(Error::TooManyElements { expected: *n, found: items.len() });
        }
    }

    let children = items
        .iter()
        .map(|item| build_node(kind, inner, item))
        .collect::<Result<Vec<_>>>()?;
    Ok(Node::List(children))
}

fn to_token(kind: AbiKind, node: &Node) -> Result<Token> {
    match node {
        Node::Leaf(leaf) => kind.token_from_leaf(leaf),
        Node::List(children) => Ok(Token::Array(
            children.iter().map(|c| to_token(kind, c)).collect::<Result<Vec<_>>>()?,
        )),
    }
}
