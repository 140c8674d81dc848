//! The pure-software engine
//!
//! Textbook ECDSA over the big-integer curve arithmetic, with nonces and
//! private scalars drawn from the operating system RNG. This is the default
//! engine and the reference the accelerated engine is held against.

use crate::{hmac_sum, CryptoEngine, EcKeyComponents, EngineError, HmacHash};
use bcy_crypto_internal_curves::{CurveParams, EcPoint};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256, Sha384};

pub struct SoftwareEngine;

impl CryptoEngine for SoftwareEngine {
    fn name(&self) -> &'static str {
        "software"
    }

    fn generate_ecdsa_key(
        &self,
        curve: &'static CurveParams,
    ) -> Result<EcKeyComponents, EngineError> {
        generate_with_rng(curve, &mut OsRng)
    }

    fn ecdsa_sign_raw(
        &self,
        curve: &'static CurveParams,
        d: &BigUint,
        digest: &[u8],
    ) -> Result<(BigUint, BigUint), EngineError> {
        sign_raw_with_rng(curve, d, digest, &mut OsRng)
    }

    fn ecdsa_verify_raw(
        &self,
        curve: &'static CurveParams,
        x: &BigUint,
        y: &BigUint,
        digest: &[u8],
        r: &BigUint,
        s: &BigUint,
    ) -> bool {
        verify_raw(curve, x, y, digest, r, s)
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    fn sha384(&self, data: &[u8]) -> [u8; 48] {
        Sha384::digest(data).into()
    }

    fn hmac_sum(&self, hash: HmacHash, key: &[u8], data: &[u8]) -> Vec<u8> {
        hmac_sum(hash, key, data)
    }
}

/// Convert a digest to a scalar by taking its leftmost `n.bits()` bits,
/// the standard ECDSA truncation. No reduction mod `n` is performed.
pub(crate) fn digest_to_scalar(digest: &[u8], n: &BigUint) -> BigUint {
    let order_bits = n.bits() as usize;
    let order_bytes = (order_bits + 7) / 8;
    let d = if digest.len() > order_bytes {
        &digest[..order_bytes]
    } else {
        digest
    };
    let mut z = BigUint::from_bytes_be(d);
    let excess_bits = d.len() * 8 - order_bits.min(d.len() * 8);
    if excess_bits > 0 {
        z >>= excess_bits;
    }
    z
}

/// Uniform scalar in `[1, n-1]` by rejection sampling.
fn random_scalar<R: RngCore>(n: &BigUint, rng: &mut R) -> BigUint {
    let bits = n.bits() as usize;
    let byte_len = (bits + 7) / 8;
    let excess_bits = byte_len * 8 - bits;
    loop {
        let mut buf = vec![0u8; byte_len];
        rng.fill_bytes(&mut buf);
        buf[0] &= 0xffu8 >> excess_bits;
        let candidate = BigUint::from_bytes_be(&buf);
        if !candidate.is_zero() && &candidate < n {
            return candidate;
        }
    }
}

pub(crate) fn generate_with_rng<R: RngCore>(
    curve: &'static CurveParams,
    rng: &mut R,
) -> Result<EcKeyComponents, EngineError> {
    let d = random_scalar(&curve.n, rng);
    match curve.scalar_base_mul(&d).coordinates() {
        Some((x, y)) => Ok(EcKeyComponents {
            x: x.clone(),
            y: y.clone(),
            d,
        }),
        // 0 < d < n, so d*G cannot be the identity
        None => Err(EngineError::KeyGeneration(
            "scalar multiple of the generator was the identity".to_string(),
        )),
    }
}

pub(crate) fn sign_raw_with_rng<R: RngCore>(
    curve: &'static CurveParams,
    d: &BigUint,
    digest: &[u8],
    rng: &mut R,
) -> Result<(BigUint, BigUint), EngineError> {
    if d.is_zero() || d >= &curve.n {
        return Err(EngineError::InvalidScalar(
            "private scalar is zero or exceeds the group order".to_string(),
        ));
    }

    let z = digest_to_scalar(digest, &curve.n);
    loop {
        let k = random_scalar(&curve.n, rng);
        let kg = curve.scalar_base_mul(&k);
        let rx = match kg.coordinates() {
            Some((x, _)) => x.clone(),
            None => continue,
        };
        let r = rx % &curve.n;
        if r.is_zero() {
            continue;
        }
        let k_inv = match k.modinv(&curve.n) {
            Some(inv) => inv,
            None => continue,
        };
        let s = (k_inv * (&z + &r * d)) % &curve.n;
        if s.is_zero() {
            continue;
        }
        return Ok((r, s));
    }
}

pub(crate) fn verify_raw(
    curve: &'static CurveParams,
    x: &BigUint,
    y: &BigUint,
    digest: &[u8],
    r: &BigUint,
    s: &BigUint,
) -> bool {
    if r.is_zero() || s.is_zero() || r >= &curve.n || s >= &curve.n {
        return false;
    }
    if !curve.is_on_curve(x, y) {
        return false;
    }

    let z = digest_to_scalar(digest, &curve.n);
    let w = match s.modinv(&curve.n) {
        Some(inv) => inv,
        None => return false,
    };
    let u1 = (&z * &w) % &curve.n;
    let u2 = (r * &w) % &curve.n;

    let q = EcPoint::affine(x.clone(), y.clone());
    let sum = curve.add_points(
        &curve.scalar_base_mul(&u1),
        &curve.scalar_mul(&q, &u2),
    );
    match sum.coordinates() {
        None => false,
        Some((px, _)) => &(px % &curve.n) == r,
    }
}

/// Deterministic key generation from the curve's registered seed.
///
/// This drives a seeded (non-cryptographic) random stream and exists for
/// reproducible fixture keys on the custom curve only; it must never be
/// used for production key material. Fails for curves without a seed.
pub fn generate_key_from_curve_seed(
    curve: &'static CurveParams,
) -> Result<EcKeyComponents, EngineError> {
    let seed = curve.seed.as_ref().ok_or_else(|| {
        EngineError::KeyGeneration(format!(
            "curve [{}] has no registered seed",
            curve.id
        ))
    })?;

    let seed_bytes = seed.to_bytes_be();
    let mut chacha_seed = [0u8; 32];
    let take = seed_bytes.len().min(32);
    chacha_seed[32 - take..].copy_from_slice(&seed_bytes[seed_bytes.len() - take..]);

    let mut rng = ChaCha20Rng::from_seed(chacha_seed);
    generate_with_rng(curve, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcy_crypto_internal_curves::{lookup, CurveId};

    #[test]
    fn should_truncate_digests_wider_than_the_order() {
        let curve = lookup(CurveId::P224);
        let digest = [0xffu8; 32]; // 256-bit digest against a 224-bit order
        let z = digest_to_scalar(&digest, &curve.n);
        assert_eq!(z.bits(), 224);
    }

    #[test]
    fn should_use_short_digests_unshifted() {
        let curve = lookup(CurveId::P256);
        let digest = [0x01u8; 20];
        let z = digest_to_scalar(&digest, &curve.n);
        assert_eq!(z, BigUint::from_bytes_be(&digest));
    }

    #[test]
    fn should_generate_deterministic_fixture_keys_for_the_seeded_curve() {
        let curve = lookup(CurveId::Bcy256);
        let k1 = generate_key_from_curve_seed(curve).unwrap();
        let k2 = generate_key_from_curve_seed(curve).unwrap();
        assert_eq!(k1.d, k2.d);
        assert_eq!(k1.x, k2.x);
        assert!(curve.is_on_curve(&k1.x, &k1.y));
    }

    #[test]
    fn should_refuse_fixture_keys_for_unseeded_curves() {
        assert!(generate_key_from_curve_seed(lookup(CurveId::P256)).is_err());
    }

    #[test]
    fn should_reject_out_of_range_private_scalars_when_signing() {
        let curve = lookup(CurveId::P256);
        let digest = [7u8; 32];
        assert!(matches!(
            sign_raw_with_rng(curve, &BigUint::zero(), &digest, &mut OsRng),
            Err(EngineError::InvalidScalar(_))
        ));
        assert!(matches!(
            sign_raw_with_rng(curve, &curve.n, &digest, &mut OsRng),
            Err(EngineError::InvalidScalar(_))
        ));
    }
}
