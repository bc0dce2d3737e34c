//! Deterministic xorshift generator.
//!
//! Every random decision made during conversion flows through this module.
//! The generator is a four-register xorshift with fixed initial registers,
//! and its output conventions (31-bit integers, doubles in `[0, 1)`,
//! truncating range draws) must stay bit-exact: converted charts are only
//! reproducible if every draw matches the established sequence.

use rand::{RngCore, SeedableRng};

const Y_INITIAL: u32 = 842_502_087;
const Z_INITIAL: u32 = 3_579_807_591;
const W_INITIAL: u32 = 273_326_509;

/// Mask clearing the sign bit of a raw draw.
const INT_MASK: u32 = 0x7FFF_FFFF;

/// Scale mapping a 31-bit draw onto `[0, 1)`.
const INT_TO_REAL: f64 = 1.0 / (i32::MAX as f64 + 1.0);

/// Seeded xorshift generator with a fixed output convention.
///
/// Not thread-safe by design of its use: one instance belongs to exactly
/// one conversion run and is never reseeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShiftRng {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl XorShiftRng {
    /// Creates a generator from a signed seed; the seed's bit pattern
    /// becomes the `x` register.
    pub fn new(seed: i32) -> Self {
        Self {
            x: seed as u32,
            y: Y_INITIAL,
            z: Z_INITIAL,
            w: W_INITIAL,
        }
    }

    /// Advances the registers and returns the new `w`.
    pub fn next_raw(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = self.w ^ (self.w >> 19) ^ t ^ (t >> 8);
        self.w
    }

    /// Returns a draw in `[0, 2^31)`.
    pub fn next_non_negative(&mut self) -> i32 {
        (self.next_raw() & INT_MASK) as i32
    }

    /// Returns a draw in `[0, 1)`.
    pub fn next_double(&mut self) -> f64 {
        INT_TO_REAL * self.next_non_negative() as f64
    }

    /// Returns a draw in `[0, upper)`.
    pub fn next_below(&mut self, upper: i32) -> i32 {
        (self.next_double() * upper as f64) as i32
    }

    /// Returns a draw in `[lower, upper)`.
    pub fn next_range(&mut self, lower: i32, upper: i32) -> i32 {
        lower + (self.next_double() * (upper - lower) as f64) as i32
    }
}

impl RngCore for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_raw() as u64;
        let hi = self.next_raw() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShiftRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i32::from_le_bytes(seed))
    }
}

/// Creates the generator for a conversion run.
pub fn create_rng(seed: i32) -> XorShiftRng {
    XorShiftRng::new(seed)
}
