//! Curve domain parameter sets and the process-wide registry

use crate::CurveId;
use lazy_static::lazy_static;
use num_bigint::BigUint;
use std::collections::BTreeMap;

/// Domain parameters of a short-Weierstrass prime curve
/// `y^2 = x^3 + a*x + b (mod p)`.
///
/// Instances live in the process-wide registry, are constructed exactly once
/// on first access, and are never mutated afterwards. The half-order
/// `floor(n / 2)` is precomputed at registration time.
#[derive(Debug)]
pub struct CurveParams {
    pub id: CurveId,
    /// Prime modulus of the underlying field.
    pub p: BigUint,
    /// Order of the base point group.
    pub n: BigUint,
    /// First Weierstrass coefficient, already reduced mod `p`.
    pub a: BigUint,
    /// Second Weierstrass coefficient.
    pub b: BigUint,
    /// Affine coordinates of the generator.
    pub gx: BigUint,
    pub gy: BigUint,
    /// Size of the curve in bits.
    pub bit_size: usize,
    /// PKIX named-curve object identifier arcs.
    pub oid: &'static [u64],
    /// Fixed seed for the deterministic fixture-key generation path.
    /// Only the custom curve carries one; it is not used for production keys.
    pub seed: Option<BigUint>,
    half_order: BigUint,
}

impl CurveParams {
    fn new(
        id: CurveId,
        p: BigUint,
        n: BigUint,
        a: BigUint,
        b: BigUint,
        gx: BigUint,
        gy: BigUint,
        oid: &'static [u64],
        seed: Option<BigUint>,
    ) -> Self {
        let half_order = &n >> 1;
        Self {
            id,
            p,
            n,
            a,
            b,
            gx,
            gy,
            bit_size: id.bit_size(),
            oid,
            seed,
            half_order,
        }
    }

    /// `floor(n / 2)`, cached at registration.
    ///
    /// Signatures with `s` above this bound are non-canonical and rejected
    /// by the verification path.
    pub fn half_order(&self) -> &BigUint {
        &self.half_order
    }

    /// Size of one encoded field element in bytes.
    pub fn field_bytes(&self) -> usize {
        (self.bit_size + 7) / 8
    }
}

fn bu(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("invalid curve constant")
}

const OID_P224: &[u64] = &[1, 3, 132, 0, 33];
const OID_P256: &[u64] = &[1, 2, 840, 10045, 3, 1, 7];
const OID_P384: &[u64] = &[1, 3, 132, 0, 34];
const OID_P521: &[u64] = &[1, 3, 132, 0, 35];
// The custom curve is encoded under the prime-curve family arc itself.
const OID_BCY256: &[u64] = &[1, 2, 840, 10045, 3, 1];

fn p224() -> CurveParams {
    let p = bu("ffffffffffffffffffffffffffffffff000000000000000000000001");
    let a = &p - 3u32;
    CurveParams::new(
        CurveId::P224,
        p,
        bu("ffffffffffffffffffffffffffff16a2e0b8f03e13dd29455c5c2a3d"),
        a,
        bu("b4050a850c04b3abf54132565044b0b7d7bfd8ba270b39432355ffb4"),
        bu("b70e0cbd6bb4bf7f321390b94a03c1d356c21122343280d6115c1d21"),
        bu("bd376388b5f723fb4c22dfe6cd4375a05a07476444d5819985007e34"),
        OID_P224,
        None,
    )
}

fn p256() -> CurveParams {
    let p = bu("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
    let a = &p - 3u32;
    CurveParams::new(
        CurveId::P256,
        p,
        bu("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
        a,
        bu("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
        bu("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
        bu("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
        OID_P256,
        None,
    )
}

fn p384() -> CurveParams {
    let p = bu(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe\
         ffffffff0000000000000000ffffffff",
    );
    let a = &p - 3u32;
    CurveParams::new(
        CurveId::P384,
        p,
        bu(
            "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf\
             581a0db248b0a77aecec196accc52973",
        ),
        a,
        bu(
            "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875a\
             c656398d8a2ed19d2a85c8edd3ec2aef",
        ),
        bu(
            "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a38\
             5502f25dbf55296c3a545e3872760ab7",
        ),
        bu(
            "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c0\
             0a60b1ce1d7e819d7a431d7c90ea0e5f",
        ),
        OID_P384,
        None,
    )
}

fn p521() -> CurveParams {
    let p = bu(
        "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
         ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
         ffff",
    );
    let a = &p - 3u32;
    CurveParams::new(
        CurveId::P521,
        p,
        bu(
            "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
             fffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e9138\
             6409",
        ),
        a,
        bu(
            "0051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef1\
             09e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b50\
             3f00",
        ),
        bu(
            "00c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d\
             3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5\
             bd66",
        ),
        bu(
            "011839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e\
             662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd1\
             6650",
        ),
        OID_P521,
        None,
    )
}

fn bcy256() -> CurveParams {
    CurveParams::new(
        CurveId::Bcy256,
        bu("f21d860022f6fcd43e1f53a2a2cfeff7823bd5430e0000bfd7b22dffe71b2f49"),
        bu("306c4e0006fe3290d939772086f6633187ff35e883e434618bdd7bf21a9f91b9"),
        bu("a8b8a1e70a28b7770d396a55163701c389cbdc72d616295689664ae93e58f4ce"),
        bu("8445d72302def7c8827aec9808111498ac6bbb9cad948a68a5ff116a2c0285d1"),
        bu("ec45179388f6e8e92e688a368f5d09e26d3129dedcac5c88eb6531b8b3272be5"),
        bu("2d611de19e2cbcd3c5c27046056b9aeebe2baf5bd95e4871fcf1235bb3f0677e"),
        OID_BCY256,
        Some(bu(
            "eaf74ea5b6824eb94b2da177e566dfe350c135c9c7a7980a8301bd6f0cc833ac",
        )),
    )
}

lazy_static! {
    static ref REGISTRY: BTreeMap<CurveId, CurveParams> = {
        let mut m = BTreeMap::new();
        m.insert(CurveId::P224, p224());
        m.insert(CurveId::P256, p256());
        m.insert(CurveId::P384, p384());
        m.insert(CurveId::P521, p521());
        m.insert(CurveId::Bcy256, bcy256());
        m
    };
}

/// Look up the domain parameters of a registered curve.
///
/// The registry is populated exactly once, on first access, and is read-only
/// afterwards; repeated initialization is impossible by construction.
pub fn lookup(id: CurveId) -> &'static CurveParams {
    REGISTRY
        .get(&id)
        .expect("curve registry is populated for every CurveId")
}

/// Look up a curve by its registry name, e.g. `"P-256"`.
pub fn lookup_by_name(name: &str) -> Option<&'static CurveParams> {
    CurveId::from_name(name).map(lookup)
}
