//! Lossless conversion between arbitrary-precision integers and the
//! fixed-width big-endian field-element representation the engines consume.
//!
//! Always copies digits; never reinterprets memory. Buffers travel in
//! [`Zeroizing`] wrappers because the same paths carry private scalars.

use crate::EngineError;
use num_bigint::BigUint;
use zeroize::Zeroizing;

/// Encode `v` as exactly `width` big-endian bytes, left-padded with zeros.
///
/// Fails if `v` does not fit, which for in-range scalars and coordinates
/// indicates a caller bug rather than bad external input.
pub fn to_fixed_bytes(v: &BigUint, width: usize) -> Result<Zeroizing<Vec<u8>>, EngineError> {
    let raw = Zeroizing::new(v.to_bytes_be());
    if raw.len() > width {
        return Err(EngineError::InvalidScalar(format!(
            "integer occupies {} bytes but the field width is {}",
            raw.len(),
            width
        )));
    }
    let mut out = Zeroizing::new(vec![0u8; width]);
    out[width - raw.len()..].copy_from_slice(&raw);
    Ok(out)
}

/// Decode a big-endian byte string. Total: every byte string maps to an
/// integer, leading zeros included.
pub fn from_fixed_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}
