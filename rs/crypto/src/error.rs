//! The error taxonomy of the key abstraction layer
//!
//! Every fallible operation returns one of these variants. The one failure
//! that is not represented here is a failed engine bring-up, which halts the
//! process during startup instead of surfacing as a value (see the engine
//! crate's installation functions).
//!
//! Verification has two distinct unhappy paths which tests rely on being
//! distinguishable: `Ok(false)` means the signature is cryptographically
//! invalid, while an `Err` means the signature could not even be evaluated
//! (malformed encoding, non-canonical form).

use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CryptoError {
    #[error("unrecognized curve [{0}]")]
    UnrecognizedCurve(String),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("signing failed: {0}")]
    Signing(String),

    /// The signature bytes do not decode as a DER `SEQUENCE { r, s }`.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// The signature decoded but its `s` exceeds the curve's half-order.
    /// A policy rejection, deliberately distinct from [`Self::MalformedSignature`].
    #[error("signature s component is above the half-order of the curve")]
    HighSSignature,

    #[error("invalid elliptic curve public key")]
    InvalidPoint,

    #[error("unsupported elliptic curve")]
    UnsupportedCurve,

    #[error("invalid key derivation options: {0}")]
    InvalidDerivationOptions(String),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    /// The key does not expose its raw material.
    #[error("key material is not exportable")]
    NotExportable,

    /// The active engine broke a contract it is required to uphold.
    /// Unreachable with a correct engine; checked anyway.
    #[error("engine invariant violation: {0}")]
    BackendInvariantViolation(String),

    #[error("ASN.1 error: {0}")]
    Encoding(String),
}
