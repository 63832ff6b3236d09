//! AES-128 key expansion (FIPS-197 section 5.2).
//!
//! The compute parties evaluate AES inside MPC on shares of the *expanded*
//! key, so the client expands the device key itself and shares all eleven
//! round keys. Words are emitted in FIPS-197 byte order, i.e. each 32-bit word
//! big-endian, `w[0] || w[1] || ... || w[43]`.
//!
//! SubBytes is computed arithmetically (inversion in GF(2^8) followed by the
//! affine map) rather than through a lookup table indexed by key bytes.

#![forbid(unsafe_code)]

use zeroize::{Zeroize, Zeroizing};
use super::gf256::GF256;

/// Length of an AES-128 key in bytes.
pub const AES128_KEY_LEN: usize = 16;

/// Number of 32-bit words in the AES-128 schedule (Nb * (Nr + 1)).
const SCHEDULE_WORDS: usize = 44;

/// Length of the expanded AES-128 schedule in bytes (11 round keys).
pub const AES128_SCHEDULE_LEN: usize = SCHEDULE_WORDS * 4;

/// The AES S-box applied to a single byte.
#[inline(always)]
pub fn sub_byte(b: u8) -> u8 {
    let s = GF256(b).inv().0;
    s ^ s.rotate_left(1) ^ s.rotate_left(2) ^ s.rotate_left(3) ^ s.rotate_left(4) ^ 0x63
}

#[inline(always)]
fn sub_word(w: [u8; 4]) -> [u8; 4] {
    [sub_byte(w[0]), sub_byte(w[1]), sub_byte(w[2]), sub_byte(w[3])]
}

#[inline(always)]
fn rot_word(w: [u8; 4]) -> [u8; 4] {
    [w[1], w[2], w[3], w[0]]
}

/// Expands a 128-bit key into the 176-byte round-key schedule.
pub fn expand_aes128(key: &[u8; AES128_KEY_LEN]) -> Zeroizing<[u8; AES128_SCHEDULE_LEN]> {
    let mut schedule = Zeroizing::new([0u8; AES128_SCHEDULE_LEN]);
    schedule[..AES128_KEY_LEN].copy_from_slice(key);

    let mut rcon = GF256(0x01);
    for i in 4..SCHEDULE_WORDS {
        let mut temp = [0u8; 4];
        temp.copy_from_slice(&schedule[(i - 1) * 4..i * 4]);

        if i % 4 == 0 {
            temp = sub_word(rot_word(temp));
            temp[0] ^= rcon.0;
            rcon = rcon.xtime();
        }

        for j in 0..4 {
            schedule[i * 4 + j] = schedule[(i - 4) * 4 + j] ^ temp[j];
        }
        temp.zeroize();
    }

    schedule
}
