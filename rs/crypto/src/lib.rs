//! The key abstraction layer of the ledger's identity and signing subsystem
//!
//! Provides ECDSA key generation, signing and verification over the
//! registered curves, deterministic key identifiers, PKIX/PKCS#1 public key
//! marshaling, and key derivation, all independent of which cryptographic
//! engine is installed for the process.
//!
//! Signatures produced here are canonical: DER `SEQUENCE { r, s }` with `s`
//! at or below the curve's half-order, and verification rejects anything
//! else. Two correctly configured nodes therefore agree byte-for-byte on
//! every signature and key identifier regardless of their engine selection.
//!
//! Engine selection happens once at startup through [`install_engine`];
//! resolving the flag from the environment or configuration files is the
//! caller's job.

mod der;
mod derive;
mod ecdsa_key;
mod error;
mod key;
mod rsa_key;
pub mod sig;

pub use der::unmarshal_ec_public_key;
pub use derive::{derive_key, derive_key_with_config, DerivationOpts, HmacDerivationConfig};
pub use ecdsa_key::{EcdsaPrivateKey, EcdsaPublicKey};
pub use error::CryptoError;
pub use key::{Key, SymmetricKey};
pub use rsa_key::RsaPublicKeyView;

pub use bcy_crypto_internal_curves::CurveId;
pub use bcy_crypto_internal_engine::{active_engine, install_engine, EngineConfig};
