//! Encode/decode round trips across every kind and the representative shapes.

use abipack::AbiType;
use abipack::AbiValue;
use abipack::Token;
use abipack::call::decode_args;
use abipack::call::encode_args;
use abipack::call::values_from_tokens;
use anyhow::Result;

fn roundtrip(type_str: &str, token: Token) -> Result<()> {
    let value = AbiValue::from_type_str(type_str, &token)?;
    let encoded = value.encode();
    let decoded = value.abi_type().decode(&encoded, 0)?;
    assert_eq!(decoded, token, "round trip of {} through {}", type_str, hex::encode(&encoded));

    let rebuilt = AbiValue::decode(value.abi_type(), &encoded, 0)?;
    assert_eq!(rebuilt, value);
    Ok(())
}

fn scalars() -> Vec<(&'static str, Token, Token)> {
    vec![
        ("address", Token::Address([0x42; 20]), Token::Address([0x07; 20])),
        ("bool", Token::Bool(true), Token::Bool(false)),
        ("bytes1", Token::FixedBytes(vec![0xff]), Token::FixedBytes(vec![0x00])),
        ("bytes16", Token::FixedBytes(vec![0x10; 16]), Token::FixedBytes(vec![0x01; 16])),
        ("bytes32", Token::FixedBytes(vec![0xee; 32]), Token::FixedBytes((0..32).collect())),
        ("bytes", Token::Bytes(vec![1, 2, 3]), Token::Bytes((0..40).collect())),
        ("int8", Token::Int(-128), Token::Int(127)),
        ("int64", Token::Int(i64::MIN as i128), Token::Int(-2)),
        ("int128", Token::Int(i128::MIN), Token::Int(i128::MAX)),
        ("uint8", Token::Uint(255), Token::Uint(0)),
        ("uint128", Token::Uint(u128::MAX), Token::Uint(5)),
        ("real", Token::Real(-2.25), Token::Real(1024.125)),
        ("ureal", Token::Real(0.5), Token::Real(3.0)),
        ("string", Token::from("hello, node"), Token::from("a string long enough to span words")),
    ]
}

#[test]
fn scalars_roundtrip() -> Result<()> {
    for (ty, a, b) in scalars() {
        roundtrip(ty, a)?;
        roundtrip(ty, b)?;
    }
    Ok(())
}

#[test]
fn fixed_arrays_roundtrip() -> Result<()> {
    for (ty, a, b) in scalars() {
        roundtrip(&format!("{}[2]", ty), Token::Array(vec![a, b]))?;
    }
    Ok(())
}

#[test]
fn dynamic_arrays_roundtrip() -> Result<()> {
    for (ty, a, b) in scalars() {
        let array_ty = format!("{}[]", ty);
        roundtrip(&array_ty, Token::Array(vec![a.clone(), b, a]))?;
        roundtrip(&array_ty, Token::Array(Vec::new()))?;
    }
    Ok(())
}

#[test]
fn fixed_in_dynamic_roundtrip() -> Result<()> {
    for (ty, a, b) in scalars() {
        let groups = Token::Array(vec![
            Token::Array(vec![a.clone(), b.clone(), a.clone()]),
            Token::Array(vec![b.clone(), a.clone(), b]),
        ]);
        roundtrip(&format!("{}[3][]", ty), groups)?;
    }
    Ok(())
}

#[test]
fn dynamic_in_fixed_roundtrip() -> Result<()> {
    for (ty, a, b) in scalars() {
        let pair = Token::Array(vec![Token::Array(vec![a.clone()]), Token::Array(vec![b, a])]);
        roundtrip(&format!("{}[][2]", ty), pair)?;
    }
    Ok(())
}

#[test]
fn deep_nesting_roundtrip() -> Result<()> {
    let leaf = |s: &str| Token::from(s);
    let token = Token::Array(vec![
        Token::Array(vec![
            Token::Array(vec![leaf("a"), leaf("b")]),
            Token::Array(vec![leaf("c"), leaf("")]),
        ]),
        Token::Array(vec![
            Token::Array(vec![leaf("dd"), leaf("eee")]),
            Token::Array(vec![leaf("f"), leaf("g")]),
        ]),
    ]);
    roundtrip("string[2][][2]", token)
}

#[test]
fn argument_lists_roundtrip() -> Result<()> {
    let types: Vec<AbiType> = ["address", "uint128[]", "string", "bytes32", "int8[2][]"]
        .iter()
        .map(|t| AbiType::parse(t))
        .collect::<abipack::Result<_>>()?;

    let tokens = vec![
        Token::Address([0x99; 20]),
        Token::from(vec![1u128, 2, 3]),
        Token::from("tail"),
        Token::FixedBytes(vec![0x5a; 32]),
        Token::Array(vec![Token::from(vec![-1i128, 1]), Token::from(vec![0i128, -128])]),
    ];

    let values = values_from_tokens(&types, &tokens)?;
    let encoded = encode_args(&values);
    assert_eq!(decode_args(&types, &encoded)?, tokens);
    Ok(())
}

#[test]
fn decode_at_offset() -> Result<()> {
    let value = AbiValue::from_type_str("uint64[2]", &Token::from(vec![10u128, 20]))?;
    let mut framed = vec![0xcc; 3];
    framed.extend(value.encode());
    assert_eq!(value.abi_type().decode(&framed, 3)?, Token::from(vec![10u128, 20]));
    Ok(())
}
