//! Affine short-Weierstrass point arithmetic
//!
//! Plain big-integer affine arithmetic. This is the reference arithmetic
//! both engines agree on; it favors being auditable over being fast and is
//! not constant-time (same as the arithmetic it replaces upstream).

use crate::CurveParams;
use num_bigint::BigUint;
use num_traits::Zero;

/// A point on a curve, either the identity or an affine coordinate pair
/// with `x, y < p`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EcPoint {
    Infinity,
    Affine { x: BigUint, y: BigUint },
}

impl EcPoint {
    pub fn affine(x: BigUint, y: BigUint) -> Self {
        EcPoint::Affine { x, y }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, EcPoint::Infinity)
    }

    /// Affine coordinates, or `None` for the identity.
    pub fn coordinates(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            EcPoint::Infinity => None,
            EcPoint::Affine { x, y } => Some((x, y)),
        }
    }
}

// `a - b mod p` for operands already reduced mod p.
fn mod_sub(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    if a >= b {
        a - b
    } else {
        p - (b - a)
    }
}

fn mod_inv(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    a.modinv(p)
}

impl CurveParams {
    /// Whether `(x, y)` is an affine point on the curve.
    ///
    /// Coordinates at or above the field modulus are off-curve by
    /// definition; the identity is never "on curve" here.
    pub fn is_on_curve(&self, x: &BigUint, y: &BigUint) -> bool {
        if x >= &self.p || y >= &self.p {
            return false;
        }
        let lhs = (y * y) % &self.p;
        let rhs = ((x * x * x) + &self.a * x + &self.b) % &self.p;
        lhs == rhs
    }

    /// The generator as a point value.
    pub fn generator(&self) -> EcPoint {
        EcPoint::affine(self.gx.clone(), self.gy.clone())
    }

    /// Point addition, handling identity and inverse cases.
    pub fn add_points(&self, lhs: &EcPoint, rhs: &EcPoint) -> EcPoint {
        let (x1, y1) = match lhs.coordinates() {
            None => return rhs.clone(),
            Some(c) => c,
        };
        let (x2, y2) = match rhs.coordinates() {
            None => return lhs.clone(),
            Some(c) => c,
        };

        if x1 == x2 {
            if y1 == y2 {
                return self.double_point(lhs);
            }
            // x1 == x2, y1 == -y2: the points are inverses
            return EcPoint::Infinity;
        }

        let num = mod_sub(y2, y1, &self.p);
        let den = mod_sub(x2, x1, &self.p);
        let lambda = match mod_inv(&den, &self.p) {
            Some(inv) => (num * inv) % &self.p,
            None => return EcPoint::Infinity,
        };

        let x3 = mod_sub(
            &((&lambda * &lambda) % &self.p),
            &((x1 + x2) % &self.p),
            &self.p,
        );
        let y3 = mod_sub(
            &((&lambda * mod_sub(x1, &x3, &self.p)) % &self.p),
            y1,
            &self.p,
        );
        EcPoint::affine(x3, y3)
    }

    /// Point doubling.
    pub fn double_point(&self, pt: &EcPoint) -> EcPoint {
        let (x, y) = match pt.coordinates() {
            None => return EcPoint::Infinity,
            Some(c) => c,
        };
        if y.is_zero() {
            return EcPoint::Infinity;
        }

        let three = BigUint::from(3u32);
        let num = ((x * x) * three + &self.a) % &self.p;
        let den = (y << 1) % &self.p;
        let lambda = match mod_inv(&den, &self.p) {
            Some(inv) => (num * inv) % &self.p,
            None => return EcPoint::Infinity,
        };

        let x3 = mod_sub(
            &((&lambda * &lambda) % &self.p),
            &((x << 1) % &self.p),
            &self.p,
        );
        let y3 = mod_sub(
            &((&lambda * mod_sub(x, &x3, &self.p)) % &self.p),
            y,
            &self.p,
        );
        EcPoint::affine(x3, y3)
    }

    /// Scalar multiplication `k * pt` by double-and-add.
    pub fn scalar_mul(&self, pt: &EcPoint, k: &BigUint) -> EcPoint {
        if k.is_zero() || pt.is_infinity() {
            return EcPoint::Infinity;
        }
        let mut acc = EcPoint::Infinity;
        let bits = k.bits();
        for i in (0..bits).rev() {
            acc = self.double_point(&acc);
            if k.bit(i) {
                acc = self.add_points(&acc, pt);
            }
        }
        acc
    }

    /// Scalar multiplication of the generator, `k * G`.
    pub fn scalar_base_mul(&self, k: &BigUint) -> EcPoint {
        self.scalar_mul(&self.generator(), k)
    }
}
