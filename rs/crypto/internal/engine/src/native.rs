//! The accelerated engine
//!
//! Delegates P-256 and P-384 to the optimized formally-derived field
//! arithmetic of the `p256`/`p384` crates. Curves the accelerated stack
//! does not cover (P-224, P-521, and the custom curve) fall through to the
//! shared software arithmetic, so the engine's observable behavior is the
//! same for every registered curve.
//!
//! The accelerated sign path is deterministic (RFC 6979); the software path
//! is randomized. Both are valid ECDSA and both feed the same
//! canonicalization layer, so consumers cannot tell the engines apart by
//! anything but timing.

use crate::{bridge, hmac_sum, software, CryptoEngine, EcKeyComponents, EngineError, HmacHash};
use bcy_crypto_internal_curves::{CurveId, CurveParams};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256, Sha384};

pub struct NativeEngine {
    _priv: (),
}

// Stamps the per-curve delegation functions for one accelerated curve.
// The two RustCrypto curve crates expose identical APIs under different
// types, which keeps this a pure type substitution.
macro_rules! accelerated_curve_ops {
    ($mod_name:ident, $crate_name:ident, $field_width:expr) => {
        mod $mod_name {
            use super::*;
            use $crate_name::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
            use $crate_name::ecdsa::{Signature, SigningKey, VerifyingKey};

            pub fn generate() -> Result<EcKeyComponents, EngineError> {
                let sk = SigningKey::random(&mut OsRng);
                let d_bytes = sk.to_bytes();
                let point = sk.verifying_key().to_encoded_point(false);
                let (x, y) = match (point.x(), point.y()) {
                    (Some(x), Some(y)) => (x, y),
                    _ => {
                        return Err(EngineError::KeyGeneration(
                            "generated public point has no affine encoding".to_string(),
                        ))
                    }
                };
                Ok(EcKeyComponents {
                    x: bridge::from_fixed_bytes(x),
                    y: bridge::from_fixed_bytes(y),
                    d: bridge::from_fixed_bytes(&d_bytes),
                })
            }

            pub fn sign(
                d: &BigUint,
                digest: &[u8],
            ) -> Result<(BigUint, BigUint), EngineError> {
                let d_bytes = bridge::to_fixed_bytes(d, $field_width)?;
                let sk = SigningKey::from_slice(&d_bytes).map_err(|_| {
                    // no detail: the message would describe the secret
                    EngineError::InvalidScalar(
                        "private scalar rejected by the accelerated engine".to_string(),
                    )
                })?;
                let sig: Signature = sk.sign_prehash(digest).map_err(|e| {
                    EngineError::Signing(format!("accelerated signing failed: {}", e))
                })?;
                let sig_bytes = sig.to_bytes();
                let (r_bytes, s_bytes) = sig_bytes.split_at($field_width);
                Ok((
                    bridge::from_fixed_bytes(r_bytes),
                    bridge::from_fixed_bytes(s_bytes),
                ))
            }

            pub fn verify(
                x: &BigUint,
                y: &BigUint,
                digest: &[u8],
                r: &BigUint,
                s: &BigUint,
            ) -> bool {
                let (x_bytes, y_bytes, r_bytes, s_bytes) = match (
                    bridge::to_fixed_bytes(x, $field_width),
                    bridge::to_fixed_bytes(y, $field_width),
                    bridge::to_fixed_bytes(r, $field_width),
                    bridge::to_fixed_bytes(s, $field_width),
                ) {
                    (Ok(a), Ok(b), Ok(c), Ok(d)) => (a, b, c, d),
                    _ => return false,
                };
                let mut sec1 = Vec::with_capacity(1 + 2 * $field_width);
                sec1.push(0x04);
                sec1.extend_from_slice(&x_bytes);
                sec1.extend_from_slice(&y_bytes);
                let vk = match VerifyingKey::from_sec1_bytes(&sec1) {
                    Ok(vk) => vk,
                    Err(_) => return false,
                };
                let mut rs = Vec::with_capacity(2 * $field_width);
                rs.extend_from_slice(&r_bytes);
                rs.extend_from_slice(&s_bytes);
                let sig = match Signature::from_slice(&rs) {
                    Ok(sig) => sig,
                    Err(_) => return false,
                };
                vk.verify_prehash(digest, &sig).is_ok()
            }
        }
    };
}

accelerated_curve_ops!(ops_p256, p256, 32);
accelerated_curve_ops!(ops_p384, p384, 48);

impl NativeEngine {
    /// Bring up the accelerated engine.
    ///
    /// Runs a one-time sign/verify self-test on every accelerated curve and
    /// cross-checks the result against the software arithmetic. Failure is
    /// fatal by design: a process must not continue with partially
    /// initialized cryptography, so this panics instead of returning an
    /// error.
    pub fn new() -> Self {
        let engine = NativeEngine { _priv: () };
        engine.self_test();
        engine
    }

    fn self_test(&self) {
        let digest = Sha256::digest(b"native engine self test").to_vec();
        for id in [CurveId::P256, CurveId::P384] {
            let curve = bcy_crypto_internal_curves::lookup(id);
            let key = self
                .generate_ecdsa_key(curve)
                .unwrap_or_else(|e| panic!("engine self-test keygen failed on {}: {}", id, e));
            let (r, s) = self
                .ecdsa_sign_raw(curve, &key.d, &digest)
                .unwrap_or_else(|e| panic!("engine self-test signing failed on {}: {}", id, e));
            if !self.ecdsa_verify_raw(curve, &key.x, &key.y, &digest, &r, &s) {
                panic!("engine self-test verification failed on {}", id);
            }
            if !software::verify_raw(curve, &key.x, &key.y, &digest, &r, &s) {
                panic!(
                    "engine self-test cross-check against software arithmetic failed on {}",
                    id
                );
            }
        }
    }
}

impl Default for NativeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    fn generate_ecdsa_key(
        &self,
        curve: &'static CurveParams,
    ) -> Result<EcKeyComponents, EngineError> {
        match curve.id {
            CurveId::P256 => ops_p256::generate(),
            CurveId::P384 => ops_p384::generate(),
            _ => software::generate_with_rng(curve, &mut OsRng),
        }
    }

    fn ecdsa_sign_raw(
        &self,
        curve: &'static CurveParams,
        d: &BigUint,
        digest: &[u8],
    ) -> Result<(BigUint, BigUint), EngineError> {
        match curve.id {
            CurveId::P256 => ops_p256::sign(d, digest),
            CurveId::P384 => ops_p384::sign(d, digest),
            _ => software::sign_raw_with_rng(curve, d, digest, &mut OsRng),
        }
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
        match curve.id {
            CurveId::P256 => ops_p256::verify(x, y, digest, r, s),
            CurveId::P384 => ops_p384::verify(x, y, digest, r, s),
            _ => software::verify_raw(curve, x, y, digest, r, s),
        }
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
