//! # Keccak-f[1600] and the sponge around it
//!
//! The state is 25 lanes of 64 bits, indexed `x + 5 * y`. Bytes enter and leave
//! lanes in little-endian order.

use crate::Error;
use crate::KECCAK256_RATE_BITS;
use crate::Result;
use crate::STATE_BYTES;

const ROUNDS: usize = 24;

const ROUND_CONSTANTS: [u64; ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808A,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808B,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008A,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000A,
    0x0000_0000_8000_808B,
    0x8000_0000_0000_008B,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800A,
    0x8000_0000_8000_000A,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

/// Rho rotation offsets, indexed `x + 5 * y`.
const RHO: [u32; 25] = [
     0,  1, 62, 28, 27,
    36, 44,  6, 55, 20,
     3, 10, 43, 25, 39,
    41, 45, 15, 21,  8,
    18,  2, 61, 56, 14,
];

/// Applies the 24-round Keccak-f[1600] permutation in place.
pub fn keccak_f(a: &mut [u64; 25]) {
    for rc in ROUND_CONSTANTS {
        // theta
        let mut c = [0u64; 5];
        for x in 0..5 {
            c[x] = a[x] ^ a[x + 5] ^ a[x + 10] ^ a[x + 15] ^ a[x + 20];
        }
        for x in 0..5 {
            let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                a[x + 5 * y] ^= d;
            }
        }

        // rho and pi: B[y, 2x + 3y] = rot(A[x, y], r[x, y])
        let mut b = [0u64; 25];
        for x in 0..5 {
            for y in 0..5 {
                let lane = x + 5 * y;
                let target = y + 5 * ((2 * x + 3 * y) % 5);
                b[target] = a[lane].rotate_left(RHO[lane]);
            }
        }

        // chi
        for y in 0..5 {
            for x in 0..5 {
                a[x + 5 * y] = b[x + 5 * y] ^ (!b[(x + 1) % 5 + 5 * y] & b[(x + 2) % 5 + 5 * y]);
            }
        }

        // iota
        a[0] ^= rc;
    }
}

/// Incremental Keccak sponge with original `10*1` padding.
///
/// The rate is fixed at construction; the output length is chosen at finalization.
#[derive(Clone)]
pub struct Keccak {
    state: [u64; 25],
    /// Rate in bytes.
    rate: usize,
    /// Bytes absorbed into the current block.
    pos: usize,
}

impl Keccak {
    /// A Keccak-256 hasher (1088-bit rate).
    pub fn v256() -> Self {
        Self {
            state: [0; 25],
            rate: KECCAK256_RATE_BITS / 8,
            pos: 0,
        }
    }

    /// A hasher with an arbitrary rate.
    ///
    /// # Errors
    /// Returns `Error::InvalidRate` unless `rate_bits` is a non-zero multiple of 8
    /// below 1600.
    pub fn with_rate(rate_bits: usize) -> Result<Self> {
        if rate_bits == 0 || rate_bits % 8 != 0 || rate_bits >= STATE_BYTES * 8 {
            return Err(Error::InvalidRate(rate_bits));
        }
        Ok(Self {
            state: [0; 25],
            rate: rate_bits / 8,
            pos: 0,
        })
    }

    /// Rate in bytes.
    pub fn rate(&self) -> usize {
        self.rate
    }

    fn xor_byte(&mut self, index: usize, byte: u8) {
        self.state[index / 8] ^= (byte as u64) << (8 * (index % 8));
    }

    fn read_byte(&self, index: usize) -> u8 {
        (self.state[index / 8] >> (8 * (index % 8))) as u8
    }

    /// Absorbs more input.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.xor_byte(self.pos, byte);
            self.pos += 1;
            if self.pos == self.rate {
                keccak_f(&mut self.state);
                self.pos = 0;
            }
        }
    }

    /// Pads, then squeezes `out.len()` bytes into `out`.
    pub fn finalize_into(mut self, out: &mut [u8]) {
        // 10*1: both bits land in the same byte when only one byte is free.
        self.xor_byte(self.pos, 0x01);
        self.xor_byte(self.rate - 1, 0x80);
        keccak_f(&mut self.state);

        let mut offset = 0;
        for (i, slot) in out.iter_mut().enumerate() {
            if i > 0 && i % self.rate == 0 {
                keccak_f(&mut self.state);
                offset = i;
            }
            *slot = self.read_byte(i - offset);
        }
    }

    /// Pads and squeezes a 32-byte digest.
    pub fn finalize(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.finalize_into(&mut out);
        out
    }
}

impl Default for Keccak {
    fn default() -> Self {
        Self::v256()
    }
}
