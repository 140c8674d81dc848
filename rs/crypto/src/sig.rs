//! Canonical ECDSA signature encoding
//!
//! Signatures travel only as DER `SEQUENCE { r INTEGER, s INTEGER }`, and
//! only in low-s form: a signature whose `s` exceeds the curve's half-order
//! is rejected by verifiers, never silently normalized. Both `(r, s)` and
//! `(r, n - s)` satisfy the raw ECDSA equation, so admitting either would
//! give every message two valid encodings.

use crate::error::CryptoError;
use bcy_crypto_internal_curves::CurveParams;
use num_bigint::BigUint;
use simple_asn1::{from_der, to_der, ASN1Block, BigInt};

/// DER-encode an `(r, s)` pair.
///
/// Callers are expected to canonicalize `s` first; this function encodes
/// what it is given.
pub fn encode(r: &BigUint, s: &BigUint) -> Result<Vec<u8>, CryptoError> {
    let seq = ASN1Block::Sequence(
        0,
        vec![
            ASN1Block::Integer(0, BigInt::from(r.clone())),
            ASN1Block::Integer(0, BigInt::from(s.clone())),
        ],
    );
    to_der(&seq).map_err(|e| CryptoError::Encoding(format!("signature encoding: {}", e)))
}

/// Decode DER signature bytes into the `(r, s)` pair.
///
/// Rejects anything that is not exactly one two-integer sequence, including
/// empty input and negative integers.
pub fn decode(bytes: &[u8]) -> Result<(BigUint, BigUint), CryptoError> {
    if bytes.is_empty() {
        return Err(CryptoError::MalformedSignature(
            "empty signature".to_string(),
        ));
    }
    let blocks = from_der(bytes)
        .map_err(|e| CryptoError::MalformedSignature(format!("DER parsing failed: {}", e)))?;
    let elements = match blocks.as_slice() {
        [ASN1Block::Sequence(_, elements)] => elements,
        _ => {
            return Err(CryptoError::MalformedSignature(
                "expected a single ASN.1 sequence".to_string(),
            ))
        }
    };
    match elements.as_slice() {
        [ASN1Block::Integer(_, r), ASN1Block::Integer(_, s)] => {
            let r = r.to_biguint().ok_or_else(|| {
                CryptoError::MalformedSignature("r is negative".to_string())
            })?;
            let s = s.to_biguint().ok_or_else(|| {
                CryptoError::MalformedSignature("s is negative".to_string())
            })?;
            Ok((r, s))
        }
        _ => Err(CryptoError::MalformedSignature(
            "expected a sequence of exactly two integers".to_string(),
        )),
    }
}

/// Whether `s` is in the canonical half of the scalar range.
pub fn is_low_s(s: &BigUint, curve: &CurveParams) -> bool {
    s <= curve.half_order()
}

/// Map `s` into the canonical half of the scalar range, replacing it with
/// `n - s` when it is above the half-order.
pub fn to_low_s(s: BigUint, curve: &CurveParams) -> BigUint {
    if is_low_s(&s, curve) {
        s
    } else {
        &curve.n - s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use bcy_crypto_internal_curves::{lookup, CurveId};

    #[test]
    fn should_round_trip_an_rs_pair() {
        let r = BigUint::from(0x1234_5678u32);
        let s = BigUint::from(0x0fed_cba9u32);
        let der = encode(&r, &s).unwrap();
        assert_eq!(decode(&der).unwrap(), (r, s));
    }

    #[test]
    fn should_reject_empty_input() {
        assert_matches!(decode(&[]), Err(CryptoError::MalformedSignature(_)));
    }

    #[test]
    fn should_reject_non_sequence_input() {
        // a bare INTEGER 1
        assert_matches!(
            decode(&[0x02, 0x01, 0x01]),
            Err(CryptoError::MalformedSignature(_))
        );
    }

    #[test]
    fn should_reject_a_sequence_with_the_wrong_arity() {
        let one = ASN1Block::Integer(0, BigInt::from(1));
        let der = to_der(&ASN1Block::Sequence(0, vec![one])).unwrap();
        assert_matches!(decode(&der), Err(CryptoError::MalformedSignature(_)));
    }

    #[test]
    fn should_reject_negative_components() {
        let der = to_der(&ASN1Block::Sequence(
            0,
            vec![
                ASN1Block::Integer(0, BigInt::from(-5)),
                ASN1Block::Integer(0, BigInt::from(7)),
            ],
        ))
        .unwrap();
        assert_matches!(decode(&der), Err(CryptoError::MalformedSignature(_)));
    }

    #[test]
    fn should_canonicalize_a_high_s() {
        let curve = lookup(CurveId::P256);
        let high = curve.half_order() + 2u32;
        assert!(!is_low_s(&high, curve));
        let low = to_low_s(high.clone(), curve);
        assert!(is_low_s(&low, curve));
        assert_eq!(low, &curve.n - &high);
    }

    #[test]
    fn should_leave_a_low_s_unchanged() {
        let curve = lookup(CurveId::P256);
        let s = curve.half_order().clone();
        assert_eq!(to_low_s(s.clone(), curve), s);
    }
}
