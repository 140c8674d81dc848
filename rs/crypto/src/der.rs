//! PKIX and PKCS#1 public key marshaling
//!
//! EC public keys are encoded as X.509 SubjectPublicKeyInfo: an
//! AlgorithmIdentifier of id-ecPublicKey with the named-curve OID as its
//! parameter, followed by a BIT STRING holding the uncompressed point
//! `0x04 || x || y` at the curve's fixed field width. RSA public keys are
//! encoded as the PKCS#1 `SEQUENCE { n, e }`.

use crate::ecdsa_key::EcdsaPublicKey;
use crate::error::CryptoError;
use bcy_crypto_internal_curves::{lookup, CurveId, CurveParams};
use num_bigint::BigUint;
use simple_asn1::{from_der, oid, to_der, ASN1Block, BigInt, OID};

fn ec_public_key_oid() -> OID {
    oid!(1, 2, 840, 10045, 2, 1)
}

fn named_curve_oid(curve: &CurveParams) -> OID {
    OID::new(curve.oid.iter().map(|&arc| BigUint::from(arc)).collect())
}

fn curve_for_oid(candidate: &OID) -> Option<CurveId> {
    CurveId::all()
        .into_iter()
        .find(|&id| &named_curve_oid(lookup(id)) == candidate)
}

/// Encode `v` as exactly `width` big-endian bytes.
fn fixed_width_be(v: &BigUint, width: usize) -> Result<Vec<u8>, CryptoError> {
    let raw = v.to_bytes_be();
    if raw.len() > width {
        return Err(CryptoError::InvalidPoint);
    }
    let mut out = vec![0u8; width];
    out[width - raw.len()..].copy_from_slice(&raw);
    Ok(out)
}

/// The uncompressed point encoding `0x04 || x || y` at the curve's field
/// width. This is also the canonical input of the EC key identifier hash.
pub(crate) fn uncompressed_point(
    curve: &CurveParams,
    x: &BigUint,
    y: &BigUint,
) -> Result<Vec<u8>, CryptoError> {
    let width = curve.field_bytes();
    let mut out = Vec::with_capacity(1 + 2 * width);
    out.push(0x04);
    out.extend_from_slice(&fixed_width_be(x, width)?);
    out.extend_from_slice(&fixed_width_be(y, width)?);
    Ok(out)
}

/// SubjectPublicKeyInfo encoding of an EC public point.
///
/// The caller validates curve membership first; this function only encodes.
pub(crate) fn marshal_ec_public_key(
    curve: &CurveParams,
    x: &BigUint,
    y: &BigUint,
) -> Result<Vec<u8>, CryptoError> {
    let point = uncompressed_point(curve, x, y)?;
    let algorithm = ASN1Block::Sequence(
        0,
        vec![
            ASN1Block::ObjectIdentifier(0, ec_public_key_oid()),
            ASN1Block::ObjectIdentifier(0, named_curve_oid(curve)),
        ],
    );
    let spki = ASN1Block::Sequence(
        0,
        vec![
            algorithm,
            ASN1Block::BitString(0, point.len() * 8, point),
        ],
    );
    to_der(&spki).map_err(|e| CryptoError::Encoding(format!("SubjectPublicKeyInfo: {}", e)))
}

/// Decode a SubjectPublicKeyInfo into a validated EC public key.
///
/// A curve OID outside the registry fails with
/// [`CryptoError::UnsupportedCurve`]; an off-curve point fails with
/// [`CryptoError::InvalidPoint`].
pub fn unmarshal_ec_public_key(der: &[u8]) -> Result<EcdsaPublicKey, CryptoError> {
    let malformed = |what: &str| CryptoError::Encoding(format!("SubjectPublicKeyInfo: {}", what));

    let blocks = from_der(der)
        .map_err(|e| CryptoError::Encoding(format!("SubjectPublicKeyInfo: {}", e)))?;
    let elements = match blocks.as_slice() {
        [ASN1Block::Sequence(_, elements)] => elements,
        _ => return Err(malformed("expected a single sequence")),
    };
    let (algorithm, point_bits) = match elements.as_slice() {
        [ASN1Block::Sequence(_, algorithm), ASN1Block::BitString(_, _, bytes)] => {
            (algorithm, bytes)
        }
        _ => return Err(malformed("expected an algorithm identifier and a bit string")),
    };
    let curve_oid = match algorithm.as_slice() {
        [ASN1Block::ObjectIdentifier(_, alg), ASN1Block::ObjectIdentifier(_, curve)] => {
            if alg != &ec_public_key_oid() {
                return Err(malformed("algorithm is not id-ecPublicKey"));
            }
            curve
        }
        _ => return Err(malformed("malformed algorithm identifier")),
    };
    let curve_id = curve_for_oid(curve_oid).ok_or(CryptoError::UnsupportedCurve)?;

    let width = curve_id.field_bytes();
    if point_bits.len() != 1 + 2 * width || point_bits[0] != 0x04 {
        return Err(malformed("public point is not in uncompressed form"));
    }
    let x = BigUint::from_bytes_be(&point_bits[1..1 + width]);
    let y = BigUint::from_bytes_be(&point_bits[1 + width..]);
    EcdsaPublicKey::new(curve_id, x, y)
}

/// PKCS#1 `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`.
pub(crate) fn marshal_rsa_pkcs1(n: &BigUint, e: &BigUint) -> Result<Vec<u8>, CryptoError> {
    let seq = ASN1Block::Sequence(
        0,
        vec![
            ASN1Block::Integer(0, BigInt::from(n.clone())),
            ASN1Block::Integer(0, BigInt::from(e.clone())),
        ],
    );
    to_der(&seq).map_err(|e| CryptoError::Encoding(format!("RSAPublicKey: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn should_resolve_every_registered_curve_oid() {
        for id in CurveId::all() {
            let oid = named_curve_oid(lookup(id));
            assert_eq!(curve_for_oid(&oid), Some(id));
        }
    }

    #[test]
    fn should_not_resolve_a_foreign_curve_oid() {
        // secp256k1
        let foreign = oid!(1, 3, 132, 0, 10);
        assert_eq!(curve_for_oid(&foreign), None);
    }

    #[test]
    fn should_prefix_uncompressed_points_with_0x04() {
        let curve = lookup(CurveId::P256);
        let bytes = uncompressed_point(curve, &curve.gx, &curve.gy).unwrap();
        assert_eq!(bytes[0], 0x04);
        assert_eq!(bytes.len(), 65);
    }

    #[test]
    fn should_pad_small_coordinates_to_the_field_width() {
        let curve = lookup(CurveId::P384);
        let bytes =
            uncompressed_point(curve, &BigUint::from(1u8), &BigUint::from(2u8)).unwrap();
        assert_eq!(bytes.len(), 97);
        assert!(bytes[1..48].iter().all(|&b| b == 0));
        assert_eq!(bytes[48], 1);
        assert_eq!(bytes[96], 2);
    }

    #[test]
    fn should_reject_unmarshaling_garbage() {
        assert_matches!(
            unmarshal_ec_public_key(b"not a key"),
            Err(CryptoError::Encoding(_))
        );
    }
}
