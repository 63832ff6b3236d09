//! GF(2^8) arithmetic over the AES field.
//!
//! Elements are reduced modulo x^8 + x^4 + x^3 + x + 1 (0x11B), the polynomial
//! FIPS-197 uses for SubBytes. Multiplication and inversion are bit-serial with
//! mask-based conditionals, so no lookup table indexed by secret bytes is ever
//! consulted.

#![forbid(unsafe_code)]

use core::ops::{Mul, MulAssign};

/// Low byte of the reduction polynomial (full poly: 0x11B).
const POLY: u8 = 0x1B;

/// A field element. Addition is XOR on the inner byte.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct GF256(pub u8);

impl Mul for GF256 {
    type Output = Self;

    /// Shift-and-add multiplication, fixed 8 rounds.
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        let mut result: u8 = 0;
        let mut a: u8 = self.0;
        let mut b: u8 = rhs.0;

        for _ in 0..8 {
            let add_mask = (b & 1).wrapping_mul(0xFF);
            result ^= a & add_mask;

            let carry_mask = (a >> 7).wrapping_mul(0xFF);
            a = (a << 1) ^ (POLY & carry_mask);

            b >>= 1;
        }

        GF256(result)
    }
}

impl MulAssign for GF256 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl GF256 {
    /// Multiplicative inverse via a^254. Maps 0 to 0, which is the convention
    /// SubBytes relies on.
    #[inline(always)]
    pub fn inv(self) -> Self {
        let mut result = GF256(1);
        let mut base = self;
        let mut exp: u8 = 0xFE;

        for _ in 0..8 {
            let mask = (exp & 1).wrapping_mul(0xFF);
            let factor = GF256((base.0 & mask) | (1 & !mask));
            result *= factor;
            base = base * base;
            exp >>= 1;
        }

        result
    }

    /// Multiplication by x (the `xtime` of FIPS-197).
    #[inline(always)]
    pub fn xtime(self) -> Self {
        self * GF256(0x02)
    }
}
