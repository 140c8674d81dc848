//! RSA public keys as certificate-chain interoperability views
//!
//! There is deliberately no RSA private key type and no signing or
//! verification: the ledger parses RSA keys out of certificate chains and
//! needs only their canonical bytes and identifier.

use crate::der;
use crate::error::CryptoError;
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaPublicKeyView {
    n: BigUint,
    e: BigUint,
}

impl RsaPublicKeyView {
    pub fn new(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    pub fn public_exponent(&self) -> &BigUint {
        &self.e
    }

    /// PKCS#1 `SEQUENCE { n, e }` DER encoding.
    pub fn marshal_pkcs1(&self) -> Result<Vec<u8>, CryptoError> {
        der::marshal_rsa_pkcs1(&self.n, &self.e)
    }

    /// SHA-256 of the PKCS#1 encoding. `None` for an unset (zero-modulus)
    /// key.
    pub fn ski(&self) -> Option<[u8; 32]> {
        if self.n.is_zero() {
            return None;
        }
        let encoded = self.marshal_pkcs1().ok()?;
        Some(Sha256::digest(&encoded).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> RsaPublicKeyView {
        // 2048-bit keys are the norm; small values keep the test readable
        // and the encodings are structurally identical.
        RsaPublicKeyView::new(BigUint::from(3233u32), BigUint::from(17u32))
    }

    #[test]
    fn should_marshal_as_a_two_integer_sequence() {
        let der = sample_key().marshal_pkcs1().unwrap();
        // SEQUENCE { INTEGER 3233 (0x0ca1), INTEGER 17 }
        assert_eq!(der, vec![0x30, 0x07, 0x02, 0x02, 0x0c, 0xa1, 0x02, 0x01, 0x11]);
    }

    #[test]
    fn should_have_a_stable_ski() {
        let key = sample_key();
        assert_eq!(key.ski(), key.ski());
        assert!(key.ski().is_some());
    }

    #[test]
    fn should_have_no_ski_for_a_zero_modulus() {
        let key = RsaPublicKeyView::new(BigUint::zero(), BigUint::from(17u32));
        assert_eq!(key.ski(), None);
    }

    #[test]
    fn should_distinguish_keys_by_ski() {
        let other = RsaPublicKeyView::new(BigUint::from(3233u32), BigUint::from(65537u32));
        assert_ne!(sample_key().ski(), other.ski());
    }
}
