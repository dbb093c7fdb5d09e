//! Multiplication.
//!
//! Magnitudes are read in signed-epoch form `stride^E * L[k]`, where inverted
//! floats have a negative `E`. A product then adds the epochs and looks the
//! nodes up in the `mul` table, so every pair of finite floats is covered.

use log::{debug, trace};

use crate::bound::PBound;
use crate::env::Env;
use crate::error::ArithmeticError;
use crate::lattice::Scaled;
use crate::pfloat::PFloat;

impl Env {
    /// Product of two bounds.
    pub fn mul(&self, lhs: &PBound, rhs: &PBound) -> Result<PBound, ArithmeticError> {
        trace!("mul(lhs = {}, rhs = {})", lhs, rhs);

        if lhs.is_empty() || rhs.is_empty() {
            return Ok(PBound::Empty);
        }
        if lhs.is_all_reals() || rhs.is_all_reals() {
            return Ok(PBound::AllReals);
        }
        if let (PBound::Singleton(l), PBound::Singleton(r)) = (lhs, rhs) {
            return Ok(self.pf_mul(*l, *r));
        }

        let (lhs_zero, lhs_inf) = (lhs.contains(PFloat::ZERO), lhs.contains(PFloat::INF));
        let (rhs_zero, rhs_inf) = (rhs.contains(PFloat::ZERO), rhs.contains(PFloat::INF));
        if (lhs_zero || rhs_zero) && (lhs_inf || rhs_inf) {
            debug!("mul: 0 * inf is possible => all reals");
            return Ok(PBound::AllReals);
        }

        if lhs_inf || rhs_inf {
            // Neither side contains zero, so the reciprocals are finite.
            let product = self.mul_finite(&lhs.multiplicative_inverse(), &rhs.multiplicative_inverse());
            Ok(product.multiplicative_inverse())
        } else {
            Ok(self.mul_finite(lhs, rhs))
        }
    }

    /// Product of two bounds that do not contain infinity.
    fn mul_finite(&self, lhs: &PBound, rhs: &PBound) -> PBound {
        let (Some((a, b)), Some((c, d))) = (lhs.endpoints(), rhs.endpoints()) else {
            return PBound::AllReals;
        };

        let Some(corners) = [(a, c), (a, d), (b, c), (b, d)]
            .into_iter()
            .map(|(x, y)| self.pf_mul(x, y).endpoints())
            .collect::<Option<Vec<_>>>()
        else {
            return PBound::AllReals;
        };

        let lower = corners.iter().map(|&(l, _)| l).min();
        let upper = corners.iter().map(|&(_, u)| u).max();
        match (lower, upper) {
            (Some(l), Some(u)) => self.interval(l, u),
            _ => PBound::AllReals,
        }
    }

    /// Product of two floats.
    pub fn pf_mul(&self, lhs: PFloat, rhs: PFloat) -> PBound {
        trace!("pf_mul(lhs = {}, rhs = {})", lhs, rhs);

        if (lhs.is_zero() && rhs.is_inf()) || (lhs.is_inf() && rhs.is_zero()) {
            debug!("pf_mul: 0 * inf => all reals");
            return PBound::AllReals;
        }
        if lhs.is_zero() || rhs.is_zero() {
            return PBound::zero();
        }
        if lhs.is_inf() || rhs.is_inf() {
            return PBound::inf();
        }

        let negative = lhs.is_negative() ^ rhs.is_negative();
        let (l, r) = (lhs.magnitude(), rhs.magnitude());
        if self.is_exact(l) && self.is_exact(r) {
            PBound::single(self.exact_mul(negative, l, r))
        } else {
            let low = self.magnitude_product(self.glb(l), self.glb(r));
            let high = self.magnitude_product(self.lub(l), self.lub(r));
            self.outward(low, high, negative)
        }
    }

    /// Product of two exact, finite, non-zero magnitudes.
    fn exact_mul(&self, negative: bool, lhs: PFloat, rhs: PFloat) -> PFloat {
        let l = self.signed_form(lhs);
        let r = self.signed_form(rhs);
        let lattice = self.tables().mul.get(l.lattice, r.lattice);
        let carry = i64::from(lattice < l.lattice);
        self.from_signed(negative, Scaled::new(l.shift + r.shift + carry, lattice))
    }

    /// Product of two exact magnitudes that may be zero or infinite (never both).
    fn magnitude_product(&self, lhs: PFloat, rhs: PFloat) -> PFloat {
        if lhs.is_zero() || rhs.is_zero() {
            PFloat::ZERO
        } else if lhs.is_inf() || rhs.is_inf() {
            PFloat::INF
        } else {
            self.exact_mul(false, lhs, rhs)
        }
    }

    /// Enclose a magnitude lying strictly between the exact results `low` and
    /// `high`, then apply the sign.
    pub(crate) fn outward(&self, low: PFloat, high: PFloat, negative: bool) -> PBound {
        let magnitude = self.interval(self.upper_ulp(low), self.lower_ulp(high));
        if negative {
            magnitude.additive_inverse()
        } else {
            magnitude
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn float(env: &Env, x: f64) -> PFloat {
        env.from_f64(x).unwrap()
    }

    fn single(env: &Env, x: f64) -> PBound {
        PBound::single(float(env, x))
    }

    fn interval(env: &Env, l: f64, u: f64) -> PBound {
        PBound::Interval(float(env, l), float(env, u))
    }

    #[test]
    fn test_special_values() {
        let env = Env::default();
        let two = float(&env, 2.0);
        assert_eq!(env.pf_mul(PFloat::ZERO, PFloat::INF), PBound::AllReals);
        assert_eq!(env.pf_mul(PFloat::INF, PFloat::ZERO), PBound::AllReals);
        assert_eq!(env.pf_mul(PFloat::ZERO, two), PBound::zero());
        assert_eq!(env.pf_mul(-two, PFloat::INF), PBound::inf());
    }

    #[test]
    fn test_exact_products() {
        let env = Env::default();
        assert_eq!(env.pf_mul(float(&env, 2.0), float(&env, 3.0)), single(&env, 6.0));
        assert_eq!(env.pf_mul(float(&env, -4.0), float(&env, 8.0)), single(&env, -32.0));
        assert_eq!(env.pf_mul(float(&env, -0.5), float(&env, -6.0)), single(&env, 3.0));
        assert_eq!(env.pf_mul(float(&env, 0.25), float(&env, 0.5)), single(&env, 0.125));
        assert_eq!(env.pf_mul(float(&env, 16.0), float(&env, 1.0 / 16.0)), PBound::one());
        // 8/3 * 8/3 = 64/9 lands between 6 and 8.
        assert_eq!(
            env.pf_mul(float(&env, 8.0 / 3.0), float(&env, 8.0 / 3.0)),
            single(&env, 64.0 / 9.0)
        );
    }

    #[test]
    fn test_saturation() {
        let env = Env::default();
        let big = float(&env, 4096.0);
        assert_eq!(env.pf_mul(big, big), PBound::single(env.prev(PFloat::INF)));
        let tiny = float(&env, 1.0 / 4096.0);
        assert_eq!(env.pf_mul(-tiny, tiny), PBound::single(-env.next(PFloat::ZERO)));
    }

    #[test]
    fn test_inexact_product() {
        let env = Env::default();
        // (1, 2) * 3 = (3, 6)
        let ulp = env.next(PFloat::ONE);
        let product = env.pf_mul(ulp, float(&env, 3.0));
        assert_eq!(
            product,
            PBound::Interval(env.next(float(&env, 3.0)), env.prev(float(&env, 6.0)))
        );
        // The sign flips the orientation.
        let product = env.pf_mul(ulp, float(&env, -3.0));
        assert_eq!(
            product,
            PBound::Interval(env.next(float(&env, -6.0)), env.prev(float(&env, -3.0)))
        );
    }

    #[test]
    fn test_bound_products() {
        let env = Env::default();
        assert_eq!(env.mul(&interval(&env, 1.0, 2.0), &interval(&env, 3.0, 4.0)), Ok(interval(&env, 3.0, 8.0)));
        assert_eq!(
            env.mul(&interval(&env, -2.0, 1.0), &interval(&env, 3.0, 4.0)),
            Ok(interval(&env, -8.0, 4.0))
        );
        assert_eq!(env.mul(&interval(&env, -2.0, -1.0), &single(&env, -2.0)), Ok(interval(&env, 2.0, 4.0)));
    }

    #[test]
    fn test_bound_products_through_infinity() {
        let env = Env::default();
        // [2, -2] holds everything outside (-2, 2); times 2 that is outside (-4, 4).
        let wrap = interval(&env, 2.0, -2.0);
        assert_eq!(env.mul(&wrap, &single(&env, 2.0)), Ok(interval(&env, 4.0, -4.0)));
    }

    #[test]
    fn test_zero_times_infinity_widens() {
        let env = Env::default();
        let wrap = interval(&env, 2.0, -2.0);
        let around_zero = interval(&env, -1.0, 1.0);
        assert_eq!(env.mul(&wrap, &around_zero), Ok(PBound::AllReals));
        assert_eq!(env.mul(&PBound::zero(), &wrap), Ok(PBound::AllReals));
        assert_eq!(env.mul(&PBound::Empty, &wrap), Ok(PBound::Empty));
    }
}
