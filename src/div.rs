//! Division.

use log::{debug, trace};

use crate::bound::PBound;
use crate::env::Env;
use crate::error::ArithmeticError;
use crate::lattice::Scaled;
use crate::pfloat::PFloat;

impl Env {
    /// Quotient of two bounds.
    ///
    /// Reciprocals are exact, so anything beyond a pair of singletons is a
    /// product with the reciprocal of `rhs`.
    pub fn div(&self, lhs: &PBound, rhs: &PBound) -> Result<PBound, ArithmeticError> {
        trace!("div(lhs = {}, rhs = {})", lhs, rhs);

        if lhs.is_empty() || rhs.is_empty() {
            return Ok(PBound::Empty);
        }
        if lhs.is_all_reals() || rhs.is_all_reals() {
            return Ok(PBound::AllReals);
        }
        if let (PBound::Singleton(l), PBound::Singleton(r)) = (lhs, rhs) {
            return Ok(self.pf_div(*l, *r));
        }

        self.mul(lhs, &rhs.multiplicative_inverse())
    }

    /// Quotient of two floats.
    pub fn pf_div(&self, lhs: PFloat, rhs: PFloat) -> PBound {
        trace!("pf_div(lhs = {}, rhs = {})", lhs, rhs);

        if (lhs.is_zero() && rhs.is_zero()) || (lhs.is_inf() && rhs.is_inf()) {
            debug!("pf_div: indeterminate quotient => all reals");
            return PBound::AllReals;
        }
        if rhs.is_zero() || lhs.is_inf() {
            return PBound::inf();
        }
        if lhs.is_zero() || rhs.is_inf() {
            return PBound::zero();
        }

        let negative = lhs.is_negative() ^ rhs.is_negative();
        let (l, r) = (lhs.magnitude(), rhs.magnitude());
        if self.is_exact(l) && self.is_exact(r) {
            PBound::single(self.exact_div(negative, l, r))
        } else {
            let low = self.magnitude_quotient(self.glb(l), self.lub(r));
            let high = self.magnitude_quotient(self.lub(l), self.glb(r));
            self.outward(low, high, negative)
        }
    }

    /// Quotient of two exact, finite, non-zero magnitudes.
    fn exact_div(&self, negative: bool, lhs: PFloat, rhs: PFloat) -> PFloat {
        let l = self.signed_form(lhs);
        let r = self.signed_form(rhs);
        let lattice = self.tables().div.get(l.lattice, r.lattice);
        let borrow = i64::from(lattice > l.lattice);
        self.from_signed(negative, Scaled::new(l.shift - r.shift - borrow, lattice))
    }

    /// Quotient of two exact magnitudes that may be zero or infinite, except
    /// for the indeterminate pairs.
    fn magnitude_quotient(&self, lhs: PFloat, rhs: PFloat) -> PFloat {
        if lhs.is_zero() || rhs.is_inf() {
            PFloat::ZERO
        } else if lhs.is_inf() || rhs.is_zero() {
            PFloat::INF
        } else {
            self.exact_div(false, lhs, rhs)
        }
    }
}
