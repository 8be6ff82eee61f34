//! # Correlating Client with Async Pump
//!
//! The client sends framed requests over a [`Transport`] and matches replies to
//! callers by correlation hash. A background pump task owns the receive side.
//!
//! Two tables track a request:
//!
//! - `pending`: hash to the oneshot sender the caller awaits.
//! - `in_flight`: hash to request metadata in a [`TtlCache`]. Entries expire
//!   after the cache TTL or fall out under capacity pressure.
//!
//! A reply whose hash is still pending but no longer in flight is answered with
//! [`Error::Expired`]. A reply whose hash is not pending at all is dropped.

use std::sync::Arc;

use abipack::AbiType;
use abipack::Signature;
use abipack::Token;
use abipack::call::decode_args;
use abipack::kind::AbiKind;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio::time::Instant;
use ttlcache::TtlCache;
use wireframe::HASH_LEN;
use wireframe::RequestHeader;
use wireframe::TxStatus;
use wireframe::build_request;
use wireframe::parse_response;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::error::Result;
use crate::hash_source::HashSource;
use crate::hash_source::RandomHashSource;
use crate::transport;
use crate::transport::Transport;

/// Attempts at drawing a hash that is not already in flight.
pub const MAX_HASH_ATTEMPTS: usize = 16;

type Hash = [u8; HASH_LEN];
type Waiter = oneshot::Sender<Result<Reply>>;

/// A reply matched to its request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub protocol_version: u8,
    pub service_id: u8,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
struct RequestMeta {
    service_id: u8,
    function_id: u8,
    sent_at: Instant,
}

/// Request/response client for one node connection.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct Client {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    pending: Arc<DashMap<Hash, Waiter>>,
    in_flight: Arc<TtlCache<Hash, RequestMeta>>,
    hashes: Arc<dyn HashSource>,
    shutdown: watch::Sender<bool>,
}

impl Client {
    /// Creates a client with an OS-seeded hash source and spawns the pump.
    ///
    /// # Errors
    /// Returns `Error::Cache` if the in-flight table cannot be built, including
    /// when no tokio runtime is running.
    pub fn new(transport: Box<dyn Transport>, config: ClientConfig) -> Result<Self> {
        Self::with_hash_source(transport, config, Arc::new(RandomHashSource::from_entropy()))
    }

    /// Creates a client that draws correlation hashes from `hashes`.
    pub fn with_hash_source(
        transport: Box<dyn Transport>,
        config: ClientConfig,
        hashes: Arc<dyn HashSource>,
    ) -> Result<Self> {
        let in_flight = Arc::new(TtlCache::new(config.cache.clone())?);
        let transport: Arc<dyn Transport> = Arc::from(transport);
        let pending = Arc::new(DashMap::new());
        let (shutdown, shutdown_rx) = watch::channel(false);

        spawn_pump(
            transport.clone(),
            pending.clone(),
            in_flight.clone(),
            config.protocol_version,
            shutdown_rx,
        );

        Ok(Self {
            config,
            transport,
            pending,
            in_flight,
            hashes,
            shutdown,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Number of callers still waiting for a reply.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Sends `payload` to `service_id`/`function_id` and awaits the reply.
    ///
    /// # Errors
    /// - `Error::Timeout` if no reply arrives within the request timeout.
    /// - `Error::Expired` if the reply arrives after the in-flight entry expired.
    /// - `Error::Transport` if sending fails or the connection drops.
    /// - `Error::Closed` after [`Client::close`].
    pub async fn call(&self, service_id: u8, function_id: u8, payload: &[u8]) -> Result<Reply> {
        let (hash, rx) = self.prepare_call(service_id, function_id)?;
        let registration = Registration { client: self, hash, armed: true };

        let header = RequestHeader::new(self.config.protocol_version, service_id, function_id).with_hash(hash);
        let frame = build_request(&header, payload);
        tracing::debug!(
            hash = %hex::encode(hash),
            service_id,
            function_id,
            len = frame.len(),
            "sending request"
        );

        self.send_and_await(registration, frame, rx).await
    }

    /// Calls a contract function: selector plus ABI arguments in, decoded values out.
    ///
    /// # Errors
    /// Returns `Error::Abi` if the arguments do not fit the signature, plus every
    /// error of [`Client::call`].
    pub async fn call_abi(
        &self,
        service_id: u8,
        function_id: u8,
        signature: &Signature,
        args: &[Token],
        returns: &[AbiType],
    ) -> Result<Vec<Token>> {
        let payload = signature.encode_call(args)?;
        let reply = self.call(service_id, function_id, &payload).await?;
        Ok(decode_args(returns, &reply.body)?)
    }

    /// Sends a request without a correlation hash. No reply is expected.
    pub async fn notify(&self, service_id: u8, function_id: u8, payload: &[u8]) -> Result<()> {
        let header = RequestHeader::new(self.config.protocol_version, service_id, function_id);
        self.transport.send(&build_request(&header, payload)).await?;
        Ok(())
    }

    /// Repeats a status query until the node reports a terminal status.
    ///
    /// The reply body's first word is the status code. Unknown codes count as
    /// still pending.
    ///
    /// # Errors
    /// Returns `Error::Timeout` if `max_polls` replies all report a non-terminal
    /// status, plus every error of [`Client::call`].
    pub async fn poll_status(
        &self,
        service_id: u8,
        function_id: u8,
        payload: &[u8],
        max_polls: usize,
    ) -> Result<TxStatus> {
        for attempt in 0..max_polls {
            let reply = self.call(service_id, function_id, payload).await?;
            let code = status_code(&reply.body);
            if let Some(status) = TxStatus::from_code(code).filter(|s| s.is_terminal()) {
                return Ok(status);
            }

            tracing::debug!(code, attempt, "status not terminal yet");
            tokio::time::sleep(self.config.poll_interval).await;
        }
        Err(Error::Timeout)
    }

    /// Stops the pump, fails every waiting caller with `Error::Closed` and
    /// rejects later calls.
    pub fn close(&self) {
        self.in_flight.clear();
        let _ = self.shutdown.send(true);
    }

    /// Draws a free hash and registers the caller under it.
    fn prepare_call(&self, service_id: u8, function_id: u8) -> Result<(Hash, oneshot::Receiver<Result<Reply>>)> {
        if self.in_flight.is_closed() {
            return Err(Error::Closed);
        }

        for _ in 0..MAX_HASH_ATTEMPTS {
            let hash = self.hashes.next_hash();
            let Entry::Vacant(slot) = self.pending.entry(hash) else {
                continue;
            };

            let (tx, rx) = oneshot::channel();
            slot.insert(tx);

            let meta = RequestMeta {
                service_id,
                function_id,
                sent_at: Instant::now(),
            };
            if let Err(e) = self.in_flight.put(hash, meta) {
                self.pending.remove(&hash);
                return Err(e.into());
            }
            return Ok((hash, rx));
        }
        Err(Error::HashExhausted)
    }

    /// Every exit except a delivered reply, dropping the future included,
    /// unregisters the call through `registration`.
    async fn send_and_await(
        &self,
        registration: Registration<'_>,
        frame: Vec<u8>,
        rx: oneshot::Receiver<Result<Reply>>,
    ) -> Result<Reply> {
        self.transport.send(&frame).await?;

        match tokio::time::timeout(self.config.request_timeout, rx).await {
            Ok(Ok(result)) => {
                registration.complete();
                result
            }
            Ok(Err(_)) => Err(Error::ChannelClosed),
            Err(_) => {
                tracing::debug!(hash = %hex::encode(registration.hash), "request timed out");
                Err(Error::Timeout)
            }
        }
    }

    fn forget(&self, hash: &Hash) {
        self.pending.remove(hash);
        self.in_flight.remove(hash);
    }
}

/// A call registered in both tables. Unless completed, dropping it removes the
/// entries.
struct Registration<'a> {
    client: &'a Client,
    hash: Hash,
    armed: bool,
}

impl Registration<'_> {
    /// The pump already removed both entries; the hash may be reused.
    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.client.forget(&self.hash);
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn spawn_pump(
    transport: Arc<dyn Transport>,
    pending: Arc<DashMap<Hash, Waiter>>,
    in_flight: Arc<TtlCache<Hash, RequestMeta>>,
    protocol_version: u8,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let error = loop {
            tokio::select! {
                received = transport.recv() => match received {
                    Ok(Some(msg)) => handle_message(&msg, &pending, &in_flight, protocol_version),
                    Ok(None) => {
                        break Error::Transport(transport::Error::ConnectionLost("Stream closed".into()));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "transport error in pump");
                        break Error::Transport(e);
                    }
                },
                _ = shutdown.changed() => break Error::Closed,
            }
        };

        tracing::debug!(reason = %error, "pump stopped");
        notify_all_pending(&pending, error);
    });
}

/// Routes one inbound frame to its waiter.
fn handle_message(
    msg: &[u8],
    pending: &DashMap<Hash, Waiter>,
    in_flight: &TtlCache<Hash, RequestMeta>,
    protocol_version: u8,
) {
    let frame = parse_response(msg);
    let Some(hash) = frame.hash else {
        tracing::warn!(len = msg.len(), "dropping response without correlation hash");
        return;
    };

    let meta = in_flight.remove(&hash);
    let Some((_, waiter)) = pending.remove(&hash) else {
        tracing::warn!(hash = %hex::encode(hash), "dropping response with unknown hash");
        return;
    };

    let result = match meta {
        None => Err(Error::Expired),
        Some(meta) if meta.service_id != frame.service_id => Err(Error::ServiceMismatch {
            expected: meta.service_id,
            received: frame.service_id,
        }),
        Some(_) if frame.protocol_version != protocol_version => Err(Error::VersionMismatch {
            expected: protocol_version,
            received: frame.protocol_version,
        }),
        Some(meta) => {
            tracing::debug!(
                hash = %hex::encode(hash),
                service_id = meta.service_id,
                function_id = meta.function_id,
                elapsed_ms = elapsed_ms(meta.sent_at),
                "reply received"
            );
            Ok(Reply {
                protocol_version: frame.protocol_version,
                service_id: frame.service_id,
                body: frame.body.to_vec(),
            })
        }
    };

    // The caller may have given up already.
    let _ = waiter.send(result);
}

fn notify_all_pending(pending: &DashMap<Hash, Waiter>, error: Error) {
    let keys: Vec<Hash> = pending.iter().map(|e| *e.key()).collect();
    for key in keys {
        if let Some((_, waiter)) = pending.remove(&key) {
            let _ = waiter.send(Err(error.clone()));
        }
    }
}

/// First word of a status reply. Truncated bodies read as `Pending`.
fn status_code(body: &[u8]) -> u16 {
    match AbiKind::Uint(16).decode(body, 0) {
        Ok(Token::Uint(code)) => u16::try_from(code).unwrap_or(u16::MAX),
        _ => 0,
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
