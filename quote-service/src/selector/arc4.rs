//! ARC4 keystream generator compatible with the `seedrandom` JavaScript
//! library's default PRNG.
//!
//! Daily selections made by earlier deployments were produced with that
//! library, so the key mixing, the 256-byte drop and the float construction
//! below reproduce it exactly. For the same seed string this generator yields
//! the same sequence of doubles on every platform.

use rand::RngCore;

const WIDTH: usize = 256;
const MASK: usize = WIDTH - 1;

/// Bytes taken for the initial numerator of a double.
const CHUNKS: usize = 6;
/// 2^48, the denominator matching `CHUNKS` bytes.
const START_DENOM: f64 = 281_474_976_710_656.0;
const SIGNIFICANCE: u64 = 1 << 52;
const OVERFLOW: u64 = 1 << 53;

/// RC4-drop[256] generator keyed from a seed string.
#[derive(Clone)]
pub struct Arc4Rng {
    i: u8,
    j: u8,
    s: [u8; WIDTH],
}

impl Arc4Rng {
    /// Seed from a string the way `seedrandom(seed)` does.
    pub fn from_seed_str(seed: &str) -> Self {
        let mut rng = Self::schedule(&mix_key(seed));
        rng.discard(WIDTH);
        rng
    }

    /// Plain RC4 key schedule, without the initial drop.
    fn schedule(key: &[u8]) -> Self {
        let key: &[u8] = if key.is_empty() { &[0] } else { key };

        let mut s = [0u8; WIDTH];
        for (i, slot) in s.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut j: u8 = 0;
        for i in 0..WIDTH {
            let t = s[i];
            j = j.wrapping_add(key[i % key.len()]).wrapping_add(t);
            s[i] = s[j as usize];
            s[j as usize] = t;
        }

        Self { i: 0, j: 0, s }
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        let t = self.s[self.i as usize];
        self.j = self.j.wrapping_add(t);
        self.s[self.i as usize] = self.s[self.j as usize];
        self.s[self.j as usize] = t;
        self.s[self.s[self.i as usize].wrapping_add(t) as usize]
    }

    fn discard(&mut self, count: usize) {
        for _ in 0..count {
            self.next_byte();
        }
    }

    /// Big-endian integer from the next `count` bytes; `count` is at most 8.
    fn take(&mut self, count: usize) -> u64 {
        debug_assert!(count <= 8);
        (0..count).fold(0u64, |acc, _| (acc << 8) | u64::from(self.next_byte()))
    }

    /// Next double in [0, 1) with 52 bits of randomness.
    pub fn next_f64(&mut self) -> f64 {
        let mut n = self.take(CHUNKS);
        let mut d = START_DENOM;
        let mut x = 0u64;

        while n < SIGNIFICANCE {
            n = (n + x) * WIDTH as u64;
            d *= WIDTH as f64;
            x = u64::from(self.next_byte());
        }

        // n is a multiple of 256 here, so halving stays exact.
        while n >= OVERFLOW {
            n /= 2;
            d /= 2.0;
            x >>= 1;
        }

        (n + x) as f64 / d
    }
}

impl std::fmt::Debug for Arc4Rng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arc4Rng").finish_non_exhaustive()
    }
}

impl RngCore for Arc4Rng {
    fn next_u32(&mut self) -> u32 {
        self.take(4) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.take(8)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Folds the UTF-16 code units of `seed` into a key of at most 256 bytes.
fn mix_key(seed: &str) -> Vec<u8> {
    let mut key: Vec<u8> = Vec::with_capacity(seed.len().min(WIDTH));
    let mut smear: u32 = 0;

    for (j, unit) in seed.encode_utf16().enumerate() {
        let slot = j & MASK;
        smear ^= u32::from(key.get(slot).copied().unwrap_or(0)) * 19;
        let value = (smear.wrapping_add(u32::from(unit)) & MASK as u32) as u8;
        if slot < key.len() {
            key[slot] = value;
        } else {
            key.push(value);
        }
    }

    key
}
