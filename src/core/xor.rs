#![forbid(unsafe_code)]
// Constant-time XOR accumulation.
// - Processes 8-byte words followed by a byte tail.
// - No secret-dependent branching; length agreement is enforced at callers.
// - Used by the share splitter and share combiner.

/// XORs `src` into `acc` in place.
/// Requires: `acc.len() == src.len()`.
#[inline(always)]
pub fn xor_into(acc: &mut [u8], src: &[u8]) {
    debug_assert_eq!(acc.len(), src.len());
    let len = acc.len().min(src.len());
    let mut i = 0;

    while i + 8 <= len {
        let mut a = [0u8; 8];
        let mut b = [0u8; 8];
        a.copy_from_slice(&acc[i..i + 8]);
        b.copy_from_slice(&src[i..i + 8]);
        let x = u64::from_ne_bytes(a) ^ u64::from_ne_bytes(b);
        acc[i..i + 8].copy_from_slice(&x.to_ne_bytes());
        i += 8;
    }

    while i < len {
        acc[i] ^= src[i];
        i += 1;
    }
}
