//! Engine-agnostic ECDSA key objects
//!
//! Keys are immutable value objects bound to a registered curve. A public
//! key constructed with [`EcdsaPublicKey::new`] is validated against its
//! curve; a key wrapped from an external engine with
//! [`EcdsaPublicKey::wrap`] carries the coordinates it was given, since the
//! engine that produced them is the source of truth. Marshaling always
//! re-checks curve membership because wrapped keys may hold untrusted
//! coordinates.

use crate::der;
use crate::error::CryptoError;
use crate::sig;
use bcy_crypto_internal_curves::{lookup, CurveId, CurveParams};
use bcy_crypto_internal_engine::{active_engine, EngineError};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

#[derive(Clone, Debug)]
pub struct EcdsaPublicKey {
    curve: &'static CurveParams,
    x: BigUint,
    y: BigUint,
}

impl PartialEq for EcdsaPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.curve.id == other.curve.id && self.x == other.x && self.y == other.y
    }
}

impl Eq for EcdsaPublicKey {}

impl EcdsaPublicKey {
    /// Construct a public key from affine coordinates, validating that the
    /// point lies on the curve.
    pub fn new(curve_id: CurveId, x: BigUint, y: BigUint) -> Result<Self, CryptoError> {
        let curve = lookup(curve_id);
        if !curve.is_on_curve(&x, &y) {
            return Err(CryptoError::InvalidPoint);
        }
        Ok(Self { curve, x, y })
    }

    /// Wrap coordinates supplied by an external engine without validation.
    /// The engine is the source of truth for its own keys; the coordinates
    /// are not re-derived or checked here.
    pub fn wrap(curve_id: CurveId, x: BigUint, y: BigUint) -> Self {
        Self {
            curve: lookup(curve_id),
            x,
            y,
        }
    }

    pub fn curve_id(&self) -> CurveId {
        self.curve.id
    }

    pub(crate) fn curve(&self) -> &'static CurveParams {
        self.curve
    }

    pub fn coordinates(&self) -> (&BigUint, &BigUint) {
        (&self.x, &self.y)
    }

    /// Verify a DER-encoded signature over `digest`.
    ///
    /// `Ok(false)` means the signature is cryptographically invalid for this
    /// key and digest. An error means the signature could not be evaluated:
    /// [`CryptoError::MalformedSignature`] when the bytes do not decode and
    /// [`CryptoError::HighSSignature`] when the decoded `s` is above the
    /// curve's half-order.
    pub fn verify(&self, signature: &[u8], digest: &[u8]) -> Result<bool, CryptoError> {
        let (r, s) = sig::decode(signature)?;
        if !sig::is_low_s(&s, self.curve) {
            return Err(CryptoError::HighSSignature);
        }
        Ok(active_engine().ecdsa_verify_raw(self.curve, &self.x, &self.y, digest, &r, &s))
    }

    /// The key's 32-byte identifier: SHA-256 of the uncompressed point
    /// encoding. Always the same hash, independent of the active engine.
    ///
    /// `None` for a wrapped key whose coordinates were never set (both
    /// zero), the unidentifiable-key case.
    pub fn ski(&self) -> Option<[u8; 32]> {
        if self.x.is_zero() && self.y.is_zero() {
            return None;
        }
        let point = der::uncompressed_point(self.curve, &self.x, &self.y).ok()?;
        Some(Sha256::digest(&point).into())
    }

    /// SubjectPublicKeyInfo DER encoding.
    ///
    /// Re-validates curve membership on every call; wrapped keys can carry
    /// untrusted coordinates and must not be marshaled off-curve.
    pub fn marshal_pkix(&self) -> Result<Vec<u8>, CryptoError> {
        if !self.curve.is_on_curve(&self.x, &self.y) {
            return Err(CryptoError::InvalidPoint);
        }
        der::marshal_ec_public_key(self.curve, &self.x, &self.y)
    }
}

#[derive(Clone)]
pub struct EcdsaPrivateKey {
    public: EcdsaPublicKey,
    d: BigUint,
}

impl EcdsaPrivateKey {
    /// Generate a keypair on the given curve with the active engine.
    pub fn generate(curve_id: CurveId) -> Result<Self, CryptoError> {
        let curve = lookup(curve_id);
        let components = active_engine()
            .generate_ecdsa_key(curve)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        if components.d.is_zero() || components.d >= curve.n {
            return Err(CryptoError::BackendInvariantViolation(
                "generated private scalar is outside [1, n-1]".to_string(),
            ));
        }
        Ok(Self {
            public: EcdsaPublicKey::wrap(curve_id, components.x, components.y),
            d: components.d,
        })
    }

    /// Generate a keypair on the curve registered under `name`.
    pub fn generate_for_name(name: &str) -> Result<Self, CryptoError> {
        let curve_id = CurveId::from_name(name)
            .ok_or_else(|| CryptoError::UnrecognizedCurve(name.to_string()))?;
        Self::generate(curve_id)
    }

    /// Wrap an externally held keypair. The public coordinates are taken as
    /// supplied and not re-derived from the scalar.
    pub fn wrap(curve_id: CurveId, x: BigUint, y: BigUint, d: BigUint) -> Self {
        Self {
            public: EcdsaPublicKey::wrap(curve_id, x, y),
            d,
        }
    }

    pub(crate) fn from_parts(public: EcdsaPublicKey, d: BigUint) -> Self {
        Self { public, d }
    }

    pub fn public_key(&self) -> &EcdsaPublicKey {
        &self.public
    }

    pub fn curve_id(&self) -> CurveId {
        self.public.curve_id()
    }

    pub(crate) fn scalar(&self) -> &BigUint {
        &self.d
    }

    /// Raw ECDSA signature of `digest`, before canonicalization and
    /// encoding. The digest is signed as-is, not re-hashed.
    pub fn sign_raw(&self, digest: &[u8]) -> Result<(BigUint, BigUint), CryptoError> {
        active_engine()
            .ecdsa_sign_raw(self.public.curve, &self.d, digest)
            .map_err(|e| match e {
                EngineError::InvalidScalar(m) => CryptoError::Signing(m),
                other => CryptoError::Signing(other.to_string()),
            })
    }

    /// Sign `digest`, producing the canonical low-s DER encoding.
    pub fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (r, s) = self.sign_raw(digest)?;
        let s = sig::to_low_s(s, self.public.curve);
        sig::encode(&r, &s)
    }

    pub fn ski(&self) -> Option<[u8; 32]> {
        self.public.ski()
    }
}

impl Drop for EcdsaPrivateKey {
    // Overwrites the scalar's value on scope exit. Best-effort: the
    // big-integer type owns its allocation, so the old digits are freed
    // rather than scrubbed in place.
    fn drop(&mut self) {
        self.d.set_zero();
    }
}

impl std::fmt::Debug for EcdsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // never print the scalar
        write!(
            f,
            "EcdsaPrivateKey {{ curve: {}, ski: {:?} }}",
            self.public.curve.id,
            self.ski().map(hex_prefix)
        )
    }
}

fn hex_prefix(ski: [u8; 32]) -> String {
    ski[..4].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    mod construction {
        use super::*;

        #[test]
        fn should_accept_the_generator_point() {
            let curve = lookup(CurveId::P256);
            let key =
                EcdsaPublicKey::new(CurveId::P256, curve.gx.clone(), curve.gy.clone());
            assert!(key.is_ok());
        }

        #[test]
        fn should_reject_an_off_curve_point() {
            let curve = lookup(CurveId::P256);
            let result = EcdsaPublicKey::new(
                CurveId::P256,
                curve.gx.clone(),
                &curve.gy + 1u32,
            );
            assert_matches!(result, Err(CryptoError::InvalidPoint));
        }

        #[test]
        fn should_wrap_an_off_curve_point_without_checking() {
            let key = EcdsaPublicKey::wrap(
                CurveId::P256,
                BigUint::from(1u8),
                BigUint::from(2u8),
            );
            assert_eq!(key.coordinates().0, &BigUint::from(1u8));
        }

        #[test]
        fn should_fail_generation_for_an_unknown_curve_name() {
            assert_matches!(
                EcdsaPrivateKey::generate_for_name("secp256k1"),
                Err(CryptoError::UnrecognizedCurve(name)) if name == "secp256k1"
            );
        }
    }

    mod ski {
        use super::*;

        #[test]
        fn should_be_absent_for_unset_coordinates() {
            let key =
                EcdsaPublicKey::wrap(CurveId::P256, BigUint::zero(), BigUint::zero());
            assert_eq!(key.ski(), None);
        }

        #[test]
        fn should_hash_the_uncompressed_point() {
            let curve = lookup(CurveId::P256);
            let key =
                EcdsaPublicKey::new(CurveId::P256, curve.gx.clone(), curve.gy.clone())
                    .unwrap();
            let point = der::uncompressed_point(curve, &curve.gx, &curve.gy).unwrap();
            let expected: [u8; 32] = Sha256::digest(&point).into();
            assert_eq!(key.ski(), Some(expected));
        }
    }

    mod marshal {
        use super::*;

        #[test]
        fn should_reject_marshaling_a_wrapped_off_curve_key() {
            let key = EcdsaPublicKey::wrap(
                CurveId::P256,
                BigUint::from(1u8),
                BigUint::from(2u8),
            );
            assert_matches!(key.marshal_pkix(), Err(CryptoError::InvalidPoint));
        }
    }

    mod debug_output {
        use super::*;

        #[test]
        fn should_render_public_keys_with_debug() {
            let curve = lookup(CurveId::P256);
            let key =
                EcdsaPublicKey::new(CurveId::P256, curve.gx.clone(), curve.gy.clone())
                    .unwrap();
            let rendered = format!("{:?}", key);
            assert!(rendered.contains("EcdsaPublicKey"));
        }

        #[test]
        fn should_not_leak_the_private_scalar() {
            let key = EcdsaPrivateKey::generate(CurveId::P256).unwrap();
            let rendered = format!("{:?}", key);
            let d_hex = format!("{:x}", key.scalar());
            assert!(!rendered.contains(&d_hex));
        }
    }
}
