//! # Correlation Hash Sources
//!
//! Every request carries an 8-byte hash that the node echoes back. The source of
//! those hashes is injected so tests can make them deterministic.
//!
//! The default source draws 32 random bytes, appends a per-source counter and
//! (optionally) the wall clock, and keeps the first 8 bytes of the Keccak-256
//! digest. The counter keeps hashes distinct even if the generator repeats.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sponge::Keccak;
use wireframe::HASH_LEN;

/// Produces correlation hashes.
pub trait HashSource: Send + Sync + 'static {
    fn next_hash(&self) -> [u8; HASH_LEN];
}

/// Keccak-mixed random correlation hashes.
pub struct RandomHashSource<R> {
    rng: Mutex<R>,
    counter: AtomicU64,
    mix_clock: bool,
}

impl<R: RngCore + Send + 'static> RandomHashSource<R> {
    /// Wraps a generator. The wall clock is mixed in.
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
            counter: AtomicU64::new(0),
            mix_clock: true,
        }
    }
}

impl RandomHashSource<StdRng> {
    /// OS-seeded source for production use.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic source: the same seed yields the same hash sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            mix_clock: false,
            ..Self::new(StdRng::seed_from_u64(seed))
        }
    }
}

impl<R: RngCore + Send + 'static> HashSource for RandomHashSource<R> {
    fn next_hash(&self) -> [u8; HASH_LEN] {
        let mut entropy = [0u8; 32];
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fill_bytes(&mut entropy);
        let count = self.counter.fetch_add(1, Ordering::Relaxed);

        let mut keccak = Keccak::v256();
        keccak.update(&entropy);
        keccak.update(&count.to_be_bytes());
        if self.mix_clock {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0);
            keccak.update(&nanos.to_be_bytes());
        }

        let digest = keccak.finalize();
        let mut hash = [0u8; HASH_LEN];
        hash.copy_from_slice(&digest[..HASH_LEN]);
        hash
    }
}
