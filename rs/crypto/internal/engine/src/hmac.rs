//! HMAC keyed message authentication
//!
//! The derivation layer selects the underlying hash by the
//! `(block size, output size)` pair of whatever hash the caller configured;
//! the fixed table below is the complete set of recognized pairs. The
//! SHA-3 geometries are aliases the replaced engine mapped onto its own
//! SHA-2 implementations, preserved here for interoperability.

use sha2::{Digest, Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// A hash function usable with HMAC.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HmacHash {
    Sha256,
    Sha384,
    Sha512,
}

impl HmacHash {
    /// Resolve a hash by its block and output sizes in bytes.
    ///
    /// Unrecognized pairs are a hard failure for callers; there is no
    /// fallback hash.
    pub fn from_sizes(block_size: usize, output_size: usize) -> Option<Self> {
        match (block_size, output_size) {
            (64, 32) => Some(HmacHash::Sha256),
            (128, 48) => Some(HmacHash::Sha384),
            (128, 64) => Some(HmacHash::Sha512),
            // SHA3-256 / SHA3-384 geometries, served by SHA-2
            (136, 32) => Some(HmacHash::Sha256),
            (104, 48) => Some(HmacHash::Sha384),
            _ => None,
        }
    }

    pub fn block_size(&self) -> usize {
        match self {
            HmacHash::Sha256 => 64,
            HmacHash::Sha384 | HmacHash::Sha512 => 128,
        }
    }

    pub fn output_length(&self) -> usize {
        match self {
            HmacHash::Sha256 => 32,
            HmacHash::Sha384 => 48,
            HmacHash::Sha512 => 64,
        }
    }
}

/// `HMAC(hash, key, data)` per RFC 2104.
pub fn hmac_sum(hash: HmacHash, key: &[u8], data: &[u8]) -> Vec<u8> {
    match hash {
        HmacHash::Sha256 => hmac_with::<Sha256>(hash.block_size(), key, data),
        HmacHash::Sha384 => hmac_with::<Sha384>(hash.block_size(), key, data),
        HmacHash::Sha512 => hmac_with::<Sha512>(hash.block_size(), key, data),
    }
}

fn hmac_with<D: Digest>(block_size: usize, key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut key_block = Zeroizing::new(vec![0u8; block_size]);
    if key.len() > block_size {
        let digest = D::digest(key);
        key_block[..digest.len()].copy_from_slice(&digest);
    } else {
        key_block[..key.len()].copy_from_slice(key);
    }

    let mut inner = D::new();
    let ipad: Zeroizing<Vec<u8>> =
        Zeroizing::new(key_block.iter().map(|&b| b ^ IPAD).collect());
    inner.update(&ipad);
    inner.update(data);
    let inner_hash = inner.finalize();

    let mut outer = D::new();
    let opad: Zeroizing<Vec<u8>> =
        Zeroizing::new(key_block.iter().map(|&b| b ^ OPAD).collect());
    outer.update(&opad);
    outer.update(&inner_hash);
    outer.finalize().to_vec()
}
