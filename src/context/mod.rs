//! Computation context construction.
//!
//! A context is the byte string every ciphertext of one operation is bound to:
//! it becomes part of the OAEP label of each key share and, on the response
//! path, both the AES-GCM associated data and the preimage of the nonce.
//!
//! # Layout
//! `[tag] || user_id || pk_1 || pk_2 || pk_3 || [u64_le ...] || [operation_id] || analysis_type || [algorithm]`
//!
//! Fields are concatenated without delimiters or length prefixes; the
//! counterpart that recomputes a context must agree on field counts and widths
//! out of band. [`ContextBuilder`] always emits fields in the order above,
//! whatever order the setters were called in.
//!
//! # Caller contract
//! A context must never be reused for two semantically different operations.
//! The response path derives its AES-GCM nonce from the context, so two
//! results encrypted under one key and one context would share a nonce. Fold a
//! fresh analysis id (or window bounds plus separation tag) into every context.

use core::fmt;

/// Domain-separation byte emitted first in request contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SeparationTag {
    /// Single-batch analysis request over explicit data indices.
    Batch = 0x1,
    /// Streaming-window request over a begin/end pair.
    Streaming = 0x2,
}

impl SeparationTag {
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// An opaque, order-sensitive context byte string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Context(Vec<u8>);

impl Context {
    /// Wraps raw bytes as a context, e.g. one received from a counterpart.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Context {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("length", &self.0.len())
            .field("bytes", &hex::encode(&self.0))
            .finish()
    }
}

/// Collects context fields and emits them in canonical order.
///
/// Building is total: every combination of fields yields a context.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder<'a> {
    separation: Option<SeparationTag>,
    user_id: &'a str,
    party_keys: Vec<&'a [u8]>,
    numeric_fields: Vec<u64>,
    operation_id: Option<&'a str>,
    analysis_type: &'a str,
    algorithm: Option<&'a str>,
}

impl<'a> ContextBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separation(mut self, tag: SeparationTag) -> Self {
        self.separation = Some(tag);
        self
    }

    pub fn user_id(mut self, user_id: &'a str) -> Self {
        self.user_id = user_id;
        self
    }

    /// Appends one party's exported (SPKI) public key. Keys are emitted in the
    /// order they are added; that order is party 1, 2, 3.
    pub fn party_key(mut self, exported_key: &'a [u8]) -> Self {
        self.party_keys.push(exported_key);
        self
    }

    pub fn party_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        self.party_keys.extend(keys);
        self
    }

    /// Appends 64-bit fields (data indices, or stream begin/end), each
    /// encoded as 8 little-endian bytes in input order.
    pub fn numeric_fields(mut self, fields: &[u64]) -> Self {
        self.numeric_fields.extend_from_slice(fields);
        self
    }

    /// Sets the analysis/computation id folded into result contexts.
    pub fn operation_id(mut self, operation_id: &'a str) -> Self {
        self.operation_id = Some(operation_id);
        self
    }

    pub fn analysis_type(mut self, analysis_type: &'a str) -> Self {
        self.analysis_type = analysis_type;
        self
    }

    pub fn algorithm(mut self, algorithm: &'a str) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Emits the context bytes.
    pub fn build(&self) -> Context {
        let capacity = self.separation.map_or(0, |_| 1)
            + self.user_id.len()
            + self.party_keys.iter().map(|k| k.len()).sum::<usize>()
            + self.numeric_fields.len() * 8
            + self.operation_id.map_or(0, str::len)
            + self.analysis_type.len()
            + self.algorithm.map_or(0, str::len);

        let mut buf = Vec::with_capacity(capacity);
        if let Some(tag) = self.separation {
            buf.push(tag.as_byte());
        }
        buf.extend_from_slice(self.user_id.as_bytes());
        for key in &self.party_keys {
            buf.extend_from_slice(key);
        }
        for field in &self.numeric_fields {
            buf.extend_from_slice(&field.to_le_bytes());
        }
        if let Some(id) = self.operation_id {
            buf.extend_from_slice(id.as_bytes());
        }
        buf.extend_from_slice(self.analysis_type.as_bytes());
        if let Some(algorithm) = self.algorithm {
            buf.extend_from_slice(algorithm.as_bytes());
        }

        debug_assert_eq!(buf.len(), capacity);
        Context(buf)
    }
}

/// Context of an analysis request: `tag || user || keys || indices || type || algorithm`.
/// Pass `None` as the tag for the earlier raw-key protocol, which carried none.
pub fn request_context(
    separation: Option<SeparationTag>,
    user_id: &str,
    party_keys: [&[u8]; 3],
    numeric_fields: &[u64],
    analysis_type: &str,
    algorithm: &str,
) -> Context {
    let mut builder = ContextBuilder::new()
        .user_id(user_id)
        .party_keys(party_keys)
        .numeric_fields(numeric_fields)
        .analysis_type(analysis_type)
        .algorithm(algorithm);
    if let Some(tag) = separation {
        builder = builder.separation(tag);
    }
    builder.build()
}

/// Context of a result reconstruction: `user || keys || analysis_id || type`.
pub fn result_context(
    user_id: &str,
    party_keys: [&[u8]; 3],
    analysis_id: &str,
    analysis_type: &str,
) -> Context {
    ContextBuilder::new()
        .user_id(user_id)
        .party_keys(party_keys)
        .operation_id(analysis_id)
        .analysis_type(analysis_type)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const PK1: &[u8] = &[0xA1; 4];
    const PK2: &[u8] = &[0xB2; 4];
    const PK3: &[u8] = &[0xC3; 4];

    #[test]
    fn test_exact_layout() {
        let ctx = request_context(
            Some(SeparationTag::Batch),
            "u1",
            [PK1, PK2, PK3],
            &[1000, 2000],
            "hb",
            "AES-GCM-128",
        );

        let mut expected = vec![0x01];
        expected.extend_from_slice(b"u1");
        expected.extend_from_slice(PK1);
        expected.extend_from_slice(PK2);
        expected.extend_from_slice(PK3);
        expected.extend_from_slice(&1000u64.to_le_bytes());
        expected.extend_from_slice(&2000u64.to_le_bytes());
        expected.extend_from_slice(b"hb");
        expected.extend_from_slice(b"AES-GCM-128");
        assert_eq!(ctx.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_little_endian_fields() {
        let ctx = ContextBuilder::new().numeric_fields(&[0x0102030405060708]).build();
        assert_eq!(ctx.as_bytes(), &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_setter_order_is_irrelevant() {
        let a = ContextBuilder::new()
            .separation(SeparationTag::Streaming)
            .user_id("user")
            .party_key(PK1)
            .numeric_fields(&[7])
            .analysis_type("ecg")
            .build();
        let b = ContextBuilder::new()
            .analysis_type("ecg")
            .numeric_fields(&[7])
            .party_key(PK1)
            .user_id("user")
            .separation(SeparationTag::Streaming)
            .build();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes()[0], 0x02);
    }

    #[test]
    fn test_build_is_pure() {
        let builder = ContextBuilder::new().user_id("u").party_keys([PK1, PK2, PK3]).analysis_type("t");
        assert_eq!(builder.build(), builder.build());
    }

    #[test]
    fn test_result_context_layout() {
        let ctx = result_context("u", [PK1, PK2, PK3], "A1", "type");
        let mut expected = b"u".to_vec();
        expected.extend_from_slice(PK1);
        expected.extend_from_slice(PK2);
        expected.extend_from_slice(PK3);
        expected.extend_from_slice(b"A1type");
        assert_eq!(ctx.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_party_order_matters() {
        let a = request_context(None, "u", [PK1, PK2, PK3], &[], "t", "AES-GCM-128");
        let b = request_context(None, "u", [PK2, PK1, PK3], &[], "t", "AES-GCM-128");
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_field_changes_produce_distinct_contexts() {
        let base = |tag, user, k1: &'static [u8], idx: u64, ty| {
            request_context(tag, user, [k1, PK2, PK3], &[idx, 2000], ty, "AES-GCM-128")
        };
        let variants = [
            base(Some(SeparationTag::Batch), "alice", PK1, 1000, "hb"),
            base(Some(SeparationTag::Streaming), "alice", PK1, 1000, "hb"),
            base(None, "alice", PK1, 1000, "hb"),
            base(Some(SeparationTag::Batch), "alicf", PK1, 1000, "hb"),
            base(Some(SeparationTag::Batch), "alice", &[0xA1, 0xA1, 0xA1, 0xA0], 1000, "hb"),
            base(Some(SeparationTag::Batch), "alice", PK1, 1001, "hb"),
            base(Some(SeparationTag::Batch), "alice", PK1, 1000, "hc"),
        ];
        let distinct: HashSet<_> = variants.iter().collect();
        assert_eq!(distinct.len(), variants.len());
    }

    #[test]
    fn test_randomized_index_changes_never_collide() {
        // xorshift: deterministic, no RNG dependency needed for this check
        let mut state = 0x9E3779B97F4A7C15u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        for _ in 0..256 {
            let a = [next(), next()];
            let mut b = a;
            let pos = (next() % 2) as usize;
            b[pos] ^= 1u64 << (next() % 64);

            let ca = request_context(Some(SeparationTag::Batch), "u", [PK1, PK2, PK3], &a, "t", "alg");
            let cb = request_context(Some(SeparationTag::Batch), "u", [PK1, PK2, PK3], &b, "t", "alg");
            assert_ne!(ca, cb);
            assert_eq!(ca.len(), cb.len());
        }
    }

    #[test]
    fn test_randomized_field_changes_never_collide() {
        let mut state = 0xD1B54A32D192ED03u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        // Rotates a lowercase letter by 1..=25 places, so it always changes.
        let bump = |c: u8, r: u64| (c - b'a' + 1 + (r % 25) as u8) % 26 + b'a';

        for _ in 0..512 {
            let user: Vec<u8> = (0..8).map(|_| b'a' + (next() % 26) as u8).collect();
            let mut keys = [[0u8; 16]; 3];
            for key in keys.iter_mut() {
                for b in key.iter_mut() {
                    *b = next() as u8;
                }
            }
            let fields = [next(), next()];
            let analysis: Vec<u8> = (0..6).map(|_| b'a' + (next() % 26) as u8).collect();

            let (mut user2, mut keys2, mut fields2, mut analysis2) =
                (user.clone(), keys, fields, analysis.clone());
            match next() % 4 {
                0 => {
                    let pos = (next() % 8) as usize;
                    user2[pos] = bump(user2[pos], next());
                }
                1 => {
                    let which = (next() % 3) as usize;
                    let pos = (next() % 16) as usize;
                    keys2[which][pos] ^= 1 + (next() % 255) as u8;
                }
                2 => {
                    let pos = (next() % 2) as usize;
                    fields2[pos] ^= 1u64 << (next() % 64);
                }
                _ => {
                    let pos = (next() % 6) as usize;
                    analysis2[pos] = bump(analysis2[pos], next());
                }
            }

            let build = |user: &[u8], keys: &[[u8; 16]; 3], fields: &[u64], analysis: &[u8]| {
                request_context(
                    Some(SeparationTag::Streaming),
                    std::str::from_utf8(user).unwrap(),
                    [&keys[0][..], &keys[1][..], &keys[2][..]],
                    fields,
                    std::str::from_utf8(analysis).unwrap(),
                    "AES-GCM-128",
                )
            };
            let ca = build(&user, &keys, &fields, &analysis);
            let cb = build(&user2, &keys2, &fields2, &analysis2);
            assert_ne!(ca, cb);
            assert_eq!(ca.len(), cb.len());
        }
    }

    #[test]
    fn test_swapped_fields_do_not_collide() {
        // Swapping the two window bounds must change the context.
        let a = request_context(Some(SeparationTag::Streaming), "u", [PK1, PK2, PK3], &[1, 2], "t", "alg");
        let b = request_context(Some(SeparationTag::Streaming), "u", [PK1, PK2, PK3], &[2, 1], "t", "alg");
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_shows_hex() {
        let ctx = Context::from_bytes(vec![0xDE, 0xAD]);
        let s = format!("{:?}", ctx);
        assert!(s.contains("length: 2"));
        assert!(s.contains("dead"));
    }
}
