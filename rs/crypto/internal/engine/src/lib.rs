//! Interchangeable cryptographic engines
//!
//! Raw ECDSA key generation, signing, and verification live behind the
//! [`CryptoEngine`] trait. Two implementations exist:
//!
//! * [`SoftwareEngine`] — pure big-integer arithmetic over the curves crate,
//!   with no dependency beyond the software stack.
//! * [`NativeEngine`] — delegates the curves it accelerates (P-256, P-384)
//!   to the optimized field implementations of the `p256`/`p384` crates and
//!   falls through to the shared software arithmetic for the rest.
//!
//! Exactly one engine is installed per process, selected once at startup by
//! [`install_engine`]. The two engines must stay observably identical: for
//! the same logical key they produce interoperable raw `(r, s)` pairs and
//! identical hash and HMAC outputs, so everything layered above them (DER
//! encoding, key identifiers) is byte-for-byte engine independent.

use bcy_crypto_internal_curves::CurveParams;
use num_bigint::BigUint;
use std::fmt;
use std::sync::OnceLock;

pub mod bridge;
mod hmac;
mod native;
mod software;

pub use hmac::{hmac_sum, HmacHash};
pub use native::NativeEngine;
pub use software::{generate_key_from_curve_seed, SoftwareEngine};

/// The affine public coordinates and private scalar of a freshly generated
/// ECDSA keypair, in the engine-independent big-integer representation.
pub struct EcKeyComponents {
    pub x: BigUint,
    pub y: BigUint,
    pub d: BigUint,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    KeyGeneration(String),
    InvalidScalar(String),
    Signing(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::KeyGeneration(e) => write!(f, "key generation failed: {}", e),
            EngineError::InvalidScalar(e) => write!(f, "invalid scalar: {}", e),
            EngineError::Signing(e) => write!(f, "signing failed: {}", e),
        }
    }
}

impl std::error::Error for EngineError {}

/// The raw cryptographic operations an engine must provide.
///
/// Digests are signed as-is; no engine re-hashes its input. Verification
/// returns the engine's boolean result: `false` means the signature is
/// cryptographically invalid for the given digest and public point, it is
/// never an encoding-level failure (those are handled before the engine is
/// consulted).
pub trait CryptoEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Generate a keypair on `curve`. The returned scalar `d` satisfies
    /// `0 < d < n` and `(x, y) = d * G`.
    fn generate_ecdsa_key(
        &self,
        curve: &'static CurveParams,
    ) -> Result<EcKeyComponents, EngineError>;

    /// Raw ECDSA signature of `digest` under the private scalar `d`.
    fn ecdsa_sign_raw(
        &self,
        curve: &'static CurveParams,
        d: &BigUint,
        digest: &[u8],
    ) -> Result<(BigUint, BigUint), EngineError>;

    /// Raw ECDSA verification of `(r, s)` against `digest` and the public
    /// point `(x, y)`.
    fn ecdsa_verify_raw(
        &self,
        curve: &'static CurveParams,
        x: &BigUint,
        y: &BigUint,
        digest: &[u8],
        r: &BigUint,
        s: &BigUint,
    ) -> bool;

    /// SHA-256, the fixed identifier hash. Identical across engines.
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    /// SHA-384.
    fn sha384(&self, data: &[u8]) -> [u8; 48];

    /// Keyed HMAC over the engine's hash implementations.
    fn hmac_sum(&self, hash: HmacHash, key: &[u8], data: &[u8]) -> Vec<u8>;
}

/// Process-wide engine selection, resolved once at startup.
///
/// The default is the software engine; callers wanting the accelerated
/// engine opt in explicitly. (The replaced implementation was inconsistent
/// about this default; software is the pinned choice here.)
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EngineConfig {
    pub use_native: bool,
}

struct Installed {
    use_native: bool,
    engine: Box<dyn CryptoEngine>,
}

static INSTALLED: OnceLock<Installed> = OnceLock::new();

fn make_engine(config: &EngineConfig) -> Installed {
    let engine: Box<dyn CryptoEngine> = if config.use_native {
        // NativeEngine::new runs the one-time self-test and panics if the
        // accelerated engine cannot be brought up: the process must not
        // continue with partially initialized cryptography.
        Box::new(NativeEngine::new())
    } else {
        Box::new(SoftwareEngine)
    };
    Installed {
        use_native: config.use_native,
        engine,
    }
}

/// Install the process-wide engine.
///
/// Must run during startup, before any key operation. Installing the same
/// selection twice is a no-op; installing a conflicting selection panics,
/// since a process that disagrees with itself about its cryptography cannot
/// proceed. A failed native-engine bring-up also panics (see
/// [`NativeEngine::new`]).
pub fn install_engine(config: &EngineConfig) -> &'static dyn CryptoEngine {
    let installed = INSTALLED.get_or_init(|| make_engine(config));
    if installed.use_native != config.use_native {
        panic!(
            "crypto engine already installed as [{}], refusing to switch",
            installed.engine.name()
        );
    }
    installed.engine.as_ref()
}

/// The active engine, installing the default (software) on first use if
/// [`install_engine`] was never called.
pub fn active_engine() -> &'static dyn CryptoEngine {
    INSTALLED
        .get_or_init(|| make_engine(&EngineConfig::default()))
        .engine
        .as_ref()
}
