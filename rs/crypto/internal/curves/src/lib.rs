//! Named elliptic curve domain parameters and software curve arithmetic
//!
//! This crate holds the process-wide curve registry used by the key
//! abstraction layer: the NIST prime curves (P-224, P-256, P-384, P-521)
//! plus the custom 256-bit curve `bcy256`, each with its group order,
//! precomputed half-order, and PKIX object identifier.
//!
//! It also provides the pure big-integer short-Weierstrass arithmetic
//! (point addition, doubling, scalar multiplication, on-curve checks)
//! that the software engine and the key derivation protocol are built on.

use std::fmt;

mod params;
mod point;

pub use params::{lookup, lookup_by_name, CurveParams};
pub use point::EcPoint;

/// Identifies a curve registered with this library.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CurveId {
    P224,
    P256,
    P384,
    P521,
    Bcy256,
}

impl CurveId {
    /// The registry name of the curve, as it appears in PKIX tooling.
    pub fn name(&self) -> &'static str {
        match self {
            CurveId::P224 => "P-224",
            CurveId::P256 => "P-256",
            CurveId::P384 => "P-384",
            CurveId::P521 => "P-521",
            CurveId::Bcy256 => "bcy256",
        }
    }

    /// Resolve a registry name to a curve identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-224" => Some(CurveId::P224),
            "P-256" => Some(CurveId::P256),
            "P-384" => Some(CurveId::P384),
            "P-521" => Some(CurveId::P521),
            "bcy256" => Some(CurveId::Bcy256),
            _ => None,
        }
    }

    /// Size of the curve in bits.
    pub fn bit_size(&self) -> usize {
        match self {
            CurveId::P224 => 224,
            CurveId::P256 => 256,
            CurveId::P384 => 384,
            CurveId::P521 => 521,
            CurveId::Bcy256 => 256,
        }
    }

    /// Size of one field element when encoded, in bytes.
    pub fn field_bytes(&self) -> usize {
        (self.bit_size() + 7) / 8
    }

    /// All registered curves, mostly useful for tests.
    pub fn all() -> Vec<CurveId> {
        vec![
            CurveId::P224,
            CurveId::P256,
            CurveId::P384,
            CurveId::P521,
            CurveId::Bcy256,
        ]
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
