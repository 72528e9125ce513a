// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for read-write sets,
//! envelopes and policy definitions.
//!
//! All peers must agree byte-for-byte on what a transaction wrote and which
//! policy guards a key, so every consensus-visible structure goes through these
//! two wrappers around `parity-scale-codec` (SCALE).

use parity_scale_codec::{DecodeAll, Encode};

/// Encodes a value into its canonical SCALE byte representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Vec<u8> {
    v.encode()
}

/// Decodes a value from its canonical SCALE byte representation.
///
/// Trailing bytes are rejected: an input is only accepted if it is exactly the
/// encoding of one value.
pub fn from_bytes_canonical<T: DecodeAll>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}
