//! A client talking to a small in-memory token node over the full stack:
//! ABI encoding, request framing, correlation and decoding.

use std::collections::HashMap;
use std::sync::Arc;

use abipack::AbiType;
use abipack::AbiValue;
use abipack::Signature;
use abipack::Token;
use abipack::call::decode_args;
use abipack::call::encode_args;
use anyhow::Result;
use noderpc::Client;
use noderpc::ClientConfig;
use noderpc::RandomHashSource;
use noderpc::Transport;
use noderpc::mock_transport::DuplexChannelTransport;
use wireframe::TxStatus;
use wireframe::build_response;
use wireframe::parse_request_header;

const TOKEN_SERVICE: u8 = 7;
const CALL: u8 = 1;
const STATUS: u8 = 2;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ty(s: &str) -> AbiType {
    AbiType::parse(s).expect("valid type")
}

/// Serves `balanceOf(address)`, `transfer(address,uint128)` and `names(uint128[])`.
struct TokenNode {
    balances: HashMap<[u8; 20], u128>,
    balance_of: [u8; 4],
    transfer: [u8; 4],
    names: [u8; 4],
}

impl TokenNode {
    fn new() -> Self {
        let mut balances = HashMap::new();
        balances.insert([1; 20], 500);
        Self {
            balances,
            balance_of: Signature::parse("balanceOf(address)").expect("valid").selector(),
            transfer: Signature::parse("transfer(address,uint128)").expect("valid").selector(),
            names: Signature::parse("names(uint128[])").expect("valid").selector(),
        }
    }

    fn handle(&mut self, function_id: u8, body: &[u8]) -> Vec<u8> {
        if function_id == STATUS {
            return (TxStatus::Included.code() as u128).to_be_bytes().to_vec();
        }

        let (selector, args) = body.split_at(4);
        let out = if selector == &self.balance_of[..] {
            let args = decode_args(&[ty("address")], args).expect("balanceOf args");
            let Token::Address(owner) = &args[0] else { unreachable!() };
            let balance = self.balances.get(owner).copied().unwrap_or(0);
            vec![AbiValue::from_type_str("uint128", &Token::Uint(balance)).expect("uint")]
        } else if selector == &self.transfer[..] {
            let args = decode_args(&[ty("address"), ty("uint128")], args).expect("transfer args");
            let (Token::Address(to), Token::Uint(amount)) = (&args[0], &args[1]) else { unreachable!() };
            let from = self.balances.entry([1; 20]).or_default();
            let ok = *from >= *amount;
            if ok {
                *from -= amount;
                *self.balances.entry(*to).or_default() += amount;
            }
            vec![AbiValue::from_type_str("bool", &Token::Bool(ok)).expect("bool")]
        } else if selector == &self.names[..] {
            let args = decode_args(&[ty("uint128[]")], args).expect("names args");
            let ids = args[0].as_array().expect("array");
            let names: Vec<Token> = ids
                .iter()
                .map(|id| Token::String(format!("holder-{}", id.as_uint().unwrap_or(0))))
                .collect();
            vec![AbiValue::from_type_str("string[]", &Token::Array(names)).expect("strings")]
        } else {
            Vec::new()
        };
        encode_args(&out)
    }
}

fn spawn_node(transport: DuplexChannelTransport) {
    tokio::spawn(async move {
        let mut node = TokenNode::new();
        while let Ok(Some(raw)) = transport.recv().await {
            let Ok((header, body)) = parse_request_header(&raw) else {
                continue;
            };
            let out = node.handle(header.function_id, body);
            let frame = build_response(header.protocol_version, header.service_id, header.hash, &out);
            if transport.send(&frame).await.is_err() {
                break;
            }
        }
    });
}

fn connect() -> Result<Client> {
    let (client_end, node_end) = DuplexChannelTransport::pair();
    spawn_node(node_end);
    Ok(Client::with_hash_source(
        Box::new(client_end),
        ClientConfig::default(),
        Arc::new(RandomHashSource::seeded(42)),
    )?)
}

#[tokio::test]
async fn balance_and_transfer() -> Result<()> {
    init_tracing();
    let client = connect()?;

    let balance_of = Signature::parse("balanceOf(address)")?;
    let transfer = Signature::parse("transfer(address, uint)")?;
    let returns_uint = [ty("uint128")];
    let returns_bool = [ty("bool")];

    let before = client
        .call_abi(TOKEN_SERVICE, CALL, &balance_of, &[Token::Address([1; 20])], &returns_uint)
        .await?;
    assert_eq!(before, vec![Token::Uint(500)]);

    let sent = client
        .call_abi(TOKEN_SERVICE, CALL, &transfer, &[Token::Address([2; 20]), Token::Uint(120)], &returns_bool)
        .await?;
    assert_eq!(sent, vec![Token::Bool(true)]);

    let too_much = client
        .call_abi(TOKEN_SERVICE, CALL, &transfer, &[Token::Address([2; 20]), Token::from("1000")], &returns_bool)
        .await?;
    assert_eq!(too_much, vec![Token::Bool(false)]);

    let after = client
        .call_abi(TOKEN_SERVICE, CALL, &balance_of, &[Token::Address([2; 20])], &returns_uint)
        .await?;
    assert_eq!(after, vec![Token::Uint(120)]);

    let status = client.poll_status(TOKEN_SERVICE, STATUS, b"", 3).await?;
    assert_eq!(status, TxStatus::Included);
    Ok(())
}

#[tokio::test]
async fn dynamic_results() -> Result<()> {
    init_tracing();
    let client = connect()?;

    let names = Signature::parse("names(uint128[])")?;
    let result = client
        .call_abi(TOKEN_SERVICE, CALL, &names, &[Token::from(vec![3u128, 14])], &[ty("string[]")])
        .await?;
    assert_eq!(result, vec![Token::from(vec!["holder-3", "holder-14"])]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sessions() -> Result<()> {
    init_tracing();
    let client = Arc::new(connect()?);
    let balance_of = Signature::parse("balanceOf(address)")?;

    let mut handles = Vec::new();
    for _ in 0..32 {
        let client = client.clone();
        let balance_of = balance_of.clone();
        handles.push(tokio::spawn(async move {
            client
                .call_abi(TOKEN_SERVICE, CALL, &balance_of, &[Token::Address([1; 20])], &[ty("uint128")])
                .await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await??, vec![Token::Uint(500)]);
    }
    assert_eq!(client.pending_count(), 0);
    Ok(())
}
