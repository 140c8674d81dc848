//! The closed set of key kinds the layer operates on
//!
//! Consumers that accept "some key" take a [`Key`] and match exhaustively,
//! so an unsupported key kind in a new call site is a compile error rather
//! than a runtime downcast failure.

use crate::ecdsa_key::{EcdsaPrivateKey, EcdsaPublicKey};
use crate::error::CryptoError;
use crate::rsa_key::RsaPublicKeyView;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// A raw symmetric key.
///
/// Non-exportable keys refuse to hand out their material through
/// [`Key::bytes`]; the derivation layer still reaches it internally.
#[derive(Clone)]
pub struct SymmetricKey {
    bytes: Zeroizing<Vec<u8>>,
    exportable: bool,
}

impl SymmetricKey {
    pub fn new(bytes: Vec<u8>, exportable: bool) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
            exportable,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_exportable(&self) -> bool {
        self.exportable
    }

    pub fn bytes(&self) -> Result<&[u8], CryptoError> {
        if self.exportable {
            Ok(&self.bytes)
        } else {
            Err(CryptoError::NotExportable)
        }
    }

    pub(crate) fn raw(&self) -> &[u8] {
        &self.bytes
    }

    pub fn ski(&self) -> Option<[u8; 32]> {
        if self.bytes.is_empty() {
            return None;
        }
        Some(Sha256::digest(self.bytes.as_slice()).into())
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "SymmetricKey {{ len: {}, exportable: {} }}",
            self.bytes.len(),
            self.exportable
        )
    }
}

#[derive(Clone, Debug)]
pub enum Key {
    EcPublic(EcdsaPublicKey),
    EcPrivate(EcdsaPrivateKey),
    RsaPublic(RsaPublicKeyView),
    Symmetric(SymmetricKey),
}

impl Key {
    pub fn is_private(&self) -> bool {
        matches!(self, Key::EcPrivate(_) | Key::Symmetric(_))
    }

    pub fn is_symmetric(&self) -> bool {
        matches!(self, Key::Symmetric(_))
    }

    /// The corresponding public key: the key itself for public keys, the
    /// embedded public view for an EC private key, `None` for symmetric
    /// keys.
    pub fn public_key(&self) -> Option<Key> {
        match self {
            Key::EcPublic(k) => Some(Key::EcPublic(k.clone())),
            Key::EcPrivate(k) => Some(Key::EcPublic(k.public_key().clone())),
            Key::RsaPublic(k) => Some(Key::RsaPublic(k.clone())),
            Key::Symmetric(_) => None,
        }
    }

    /// The key's canonical byte encoding: PKIX for EC public keys, PKCS#1
    /// for RSA, the raw material for exportable symmetric keys. EC private
    /// keys and non-exportable symmetric keys refuse.
    pub fn bytes(&self) -> Result<Vec<u8>, CryptoError> {
        match self {
            Key::EcPublic(k) => k.marshal_pkix(),
            Key::EcPrivate(_) => Err(CryptoError::NotExportable),
            Key::RsaPublic(k) => k.marshal_pkcs1(),
            Key::Symmetric(k) => k.bytes().map(|b| b.to_vec()),
        }
    }

    pub fn ski(&self) -> Option<[u8; 32]> {
        match self {
            Key::EcPublic(k) => k.ski(),
            Key::EcPrivate(k) => k.ski(),
            Key::RsaPublic(k) => k.ski(),
            Key::Symmetric(k) => k.ski(),
        }
    }
}
