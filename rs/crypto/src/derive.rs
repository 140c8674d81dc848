//! Key derivation
//!
//! Two families of derivation exist, selected by the options variant:
//!
//! * **Re-randomization** of EC keys: a caller-supplied expansion value is
//!   mapped to a scalar `k'` in `[1, n-1]`, the public point is shifted by
//!   `k'·G`, and for private keys the scalar is shifted by `k'` mod `n`.
//!   The derived key is unlinkable to the base key for anyone who does not
//!   hold the expansion value, which is how a long-term identity key issues
//!   per-transaction keys.
//! * **HMAC expansion** of symmetric keys: `HMAC(key, arg)` either
//!   truncated to a 32-byte non-exportable key or kept at the full output
//!   width as an exportable key.

use crate::ecdsa_key::{EcdsaPrivateKey, EcdsaPublicKey};
use crate::error::CryptoError;
use crate::key::{Key, SymmetricKey};
use bcy_crypto_internal_curves::{CurveParams, EcPoint};
use bcy_crypto_internal_engine::{active_engine, HmacHash};
use num_bigint::BigUint;
use num_traits::Zero;

/// Length of a truncated derived symmetric key (an AES-256 key).
const TRUNCATED_KEY_LEN: usize = 32;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DerivationOpts {
    /// Re-randomize an EC key with the given expansion value.
    Rerandomize { expansion: Vec<u8> },
    /// HMAC a symmetric key down to a 32-byte non-exportable key.
    HmacTruncated256 { arg: Vec<u8> },
    /// HMAC a symmetric key to a full-width exportable key.
    Hmac { arg: Vec<u8> },
}

/// Which hash the HMAC derivations run over, named by the block and output
/// sizes of the hash the deployment is configured with. The recognized
/// geometries are fixed; anything else fails derivation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HmacDerivationConfig {
    pub hash_block_size: usize,
    pub hash_output_size: usize,
}

impl Default for HmacDerivationConfig {
    /// SHA-256 geometry.
    fn default() -> Self {
        Self {
            hash_block_size: 64,
            hash_output_size: 32,
        }
    }
}

impl HmacDerivationConfig {
    fn resolve(&self) -> Result<HmacHash, CryptoError> {
        HmacHash::from_sizes(self.hash_block_size, self.hash_output_size).ok_or_else(|| {
            CryptoError::InvalidDerivationOptions(format!(
                "no hash with block size {} and output size {}",
                self.hash_block_size, self.hash_output_size
            ))
        })
    }
}

/// Map an expansion value to the scalar `k' = (k mod (n-1)) + 1`, which is
/// always in `[1, n-1]` and in particular never zero.
fn expansion_scalar(
    curve: &CurveParams,
    expansion: &[u8],
) -> Result<BigUint, CryptoError> {
    if expansion.is_empty() {
        return Err(CryptoError::InvalidDerivationOptions(
            "empty expansion value".to_string(),
        ));
    }
    let k = BigUint::from_bytes_be(expansion);
    let n_minus_one = &curve.n - 1u32;
    Ok((k % n_minus_one) + 1u32)
}

/// Shift the base point by `k'·G` and check the result is a usable affine
/// point on the curve. The on-curve check of the result cannot fail for
/// correct curve arithmetic but is performed on every derivation.
///
/// The base point is validated first: wrapped keys can carry untrusted
/// coordinates, and the affine arithmetic requires field elements below the
/// modulus.
fn shifted_point(
    curve: &'static CurveParams,
    x: &BigUint,
    y: &BigUint,
    k_prime: &BigUint,
) -> Result<(BigUint, BigUint), CryptoError> {
    if !curve.is_on_curve(x, y) {
        return Err(CryptoError::InvalidPoint);
    }
    let temporary = curve.scalar_base_mul(k_prime);
    let base = EcPoint::affine(x.clone(), y.clone());
    let derived = curve.add_points(&base, &temporary);
    let (dx, dy) = match derived.coordinates() {
        Some((dx, dy)) => (dx.clone(), dy.clone()),
        None => {
            return Err(CryptoError::DerivationFailed(
                "derived public key is the point at infinity".to_string(),
            ))
        }
    };
    if !curve.is_on_curve(&dx, &dy) {
        return Err(CryptoError::DerivationFailed(
            "derived public key failed the on-curve check".to_string(),
        ));
    }
    Ok((dx, dy))
}

impl EcdsaPublicKey {
    /// Derive a re-randomized public key from this key and an expansion
    /// value.
    pub fn derive_rerandomized(&self, expansion: &[u8]) -> Result<Self, CryptoError> {
        let curve = self.curve();
        let k_prime = expansion_scalar(curve, expansion)?;
        let (x, y) = shifted_point(curve, self.coordinates().0, self.coordinates().1, &k_prime)?;
        // the constructor re-validates curve membership
        EcdsaPublicKey::new(curve.id, x, y)
    }
}

impl EcdsaPrivateKey {
    /// Derive a re-randomized keypair from this key and an expansion value.
    ///
    /// The derived scalar is `(d + k') mod n` and the derived public point
    /// equals it times the generator by construction, since adding `k'·G`
    /// in point space mirrors the scalar addition.
    pub fn derive_rerandomized(&self, expansion: &[u8]) -> Result<Self, CryptoError> {
        let public = self.public_key();
        let curve = public.curve();
        let k_prime = expansion_scalar(curve, expansion)?;
        let (x, y) =
            shifted_point(curve, public.coordinates().0, public.coordinates().1, &k_prime)?;
        let d = (self.scalar() + &k_prime) % &curve.n;
        if d.is_zero() {
            return Err(CryptoError::DerivationFailed(
                "derived private scalar is zero".to_string(),
            ));
        }
        let public = EcdsaPublicKey::new(curve.id, x, y)?;
        Ok(EcdsaPrivateKey::from_parts(public, d))
    }
}

fn derive_symmetric(
    base: &SymmetricKey,
    arg: &[u8],
    config: &HmacDerivationConfig,
    truncate: bool,
) -> Result<SymmetricKey, CryptoError> {
    let hash = config.resolve()?;
    let mut mac = active_engine().hmac_sum(hash, base.raw(), arg);
    if truncate {
        mac.truncate(TRUNCATED_KEY_LEN);
        Ok(SymmetricKey::new(mac, false))
    } else {
        Ok(SymmetricKey::new(mac, true))
    }
}

/// Derive a new key from `base` according to `opts`, with the default
/// (SHA-256) HMAC configuration.
pub fn derive_key(base: &Key, opts: &DerivationOpts) -> Result<Key, CryptoError> {
    derive_key_with_config(base, opts, &HmacDerivationConfig::default())
}

/// Derive a new key from `base` according to `opts`.
///
/// Option variants apply to specific key kinds: re-randomization to EC
/// keys, the HMAC variants to symmetric keys. Any other combination fails
/// with [`CryptoError::InvalidDerivationOptions`].
pub fn derive_key_with_config(
    base: &Key,
    opts: &DerivationOpts,
    config: &HmacDerivationConfig,
) -> Result<Key, CryptoError> {
    match (base, opts) {
        (Key::EcPublic(k), DerivationOpts::Rerandomize { expansion }) => {
            Ok(Key::EcPublic(k.derive_rerandomized(expansion)?))
        }
        (Key::EcPrivate(k), DerivationOpts::Rerandomize { expansion }) => {
            Ok(Key::EcPrivate(k.derive_rerandomized(expansion)?))
        }
        (Key::Symmetric(k), DerivationOpts::HmacTruncated256 { arg }) => {
            Ok(Key::Symmetric(derive_symmetric(k, arg, config, true)?))
        }
        (Key::Symmetric(k), DerivationOpts::Hmac { arg }) => {
            Ok(Key::Symmetric(derive_symmetric(k, arg, config, false)?))
        }
        _ => Err(CryptoError::InvalidDerivationOptions(
            "options do not apply to this key kind".to_string(),
        )),
    }
}
