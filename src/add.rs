//! Addition.
//!
//! Exact operands are added by table lookup on their matrix points. The tables
//! assume the first operand dominates, so operands are first ordered by
//! magnitude into an *outer* and an *inner* float, then split into three cases
//! by their inversion flags:
//!
//! - *uninverted*: both magnitudes at least one, same epoch;
//! - *inverted*: both magnitudes below one, same epoch;
//! - *crossed*: one of each, both in epoch 0.
//!
//! Other epoch combinations are not tabulated and fail with an
//! [`ArithmeticError`]. Inexact operands are bracketed by their exact
//! neighbours and the two exact sums are rounded outward.

use log::{debug, trace};

use crate::bound::PBound;
use crate::env::Env;
use crate::error::ArithmeticError;
use crate::lattice::Scaled;
use crate::pfloat::{PFloat, Parts};
use crate::table::Operator;

/// Order two floats of the same sign by magnitude, larger first.
///
/// Also returns whether the operands had to be swapped.
pub(crate) fn by_magnitude(lhs: PFloat, rhs: PFloat) -> (PFloat, PFloat, bool) {
    // The bit order runs opposite to the magnitude order for negatives.
    let swap = lhs.is_negative() ^ (lhs < rhs);
    if swap {
        (rhs, lhs, true)
    } else {
        (lhs, rhs, false)
    }
}

/// Results that need no lookup: infinity absorbs, zero is the identity.
fn shortcut(lhs: PFloat, rhs: PFloat) -> Option<PBound> {
    if lhs.is_inf() || rhs.is_inf() {
        Some(PBound::inf())
    } else if lhs.is_zero() {
        Some(PBound::single(rhs))
    } else if rhs.is_zero() {
        Some(PBound::single(lhs))
    } else {
        None
    }
}

impl Env {
    /// Sum of two bounds.
    pub fn add(&self, lhs: &PBound, rhs: &PBound) -> Result<PBound, ArithmeticError> {
        trace!("add(lhs = {}, rhs = {})", lhs, rhs);

        let ((lhs_lower, lhs_upper), (rhs_lower, rhs_upper)) = match (lhs.endpoints(), rhs.endpoints()) {
            (Some(l), Some(r)) => (l, r),
            _ if lhs.is_empty() || rhs.is_empty() => return Ok(PBound::Empty),
            _ => return Ok(PBound::AllReals),
        };

        if let (PBound::Singleton(l), PBound::Singleton(r)) = (lhs, rhs) {
            return self.pf_add(*l, *r);
        }

        // Both arcs reach arbitrarily far in both directions.
        if lhs.is_interval() && rhs.is_interval() && lhs.contains(PFloat::INF) && rhs.contains(PFloat::INF) {
            debug!("add: both operands pass through infinity => all reals");
            return Ok(PBound::AllReals);
        }

        let lower = self.pf_add(lhs_lower, rhs_lower)?.lower();
        let upper = self.pf_add(lhs_upper, rhs_upper)?.upper();
        let (Some(lower), Some(upper)) = (lower, upper) else {
            return Ok(PBound::AllReals);
        };

        Ok(self.renormalize(lower, upper, lhs.rounds_inf() || rhs.rounds_inf()))
    }

    /// Rebuild a sum from its endpoints.
    ///
    /// Translation preserves wrapping through infinity: a sum of a wrapping
    /// operand that no longer wraps has swept the whole circle.
    fn renormalize(&self, lower: PFloat, upper: PFloat, wrapped: bool) -> PBound {
        if wrapped && lower <= upper {
            debug!("renormalize: [{}, {}] lost its wrap through infinity => all reals", lower, upper);
            return PBound::AllReals;
        }
        self.interval(lower, upper)
    }

    /// Sum of two floats.
    pub fn pf_add(&self, lhs: PFloat, rhs: PFloat) -> Result<PBound, ArithmeticError> {
        trace!("pf_add(lhs = {}, rhs = {})", lhs, rhs);

        if let Some(result) = shortcut(lhs, rhs) {
            return Ok(result);
        }

        if self.is_exact(lhs) && self.is_exact(rhs) {
            self.pf_exact_add(lhs, rhs)
        } else {
            self.pf_inexact_add(lhs, rhs)
        }
    }

    fn pf_exact_add(&self, lhs: PFloat, rhs: PFloat) -> Result<PBound, ArithmeticError> {
        trace!("pf_exact_add(lhs = {}, rhs = {})", lhs, rhs);

        // Repeated here for the bracketing floats of an inexact sum.
        if let Some(result) = shortcut(lhs, rhs) {
            return Ok(result);
        }

        if lhs.is_negative() != rhs.is_negative() {
            self.exact_sub(lhs, -rhs)
        } else {
            self.exact_addition(lhs, rhs)
        }
    }

    fn pf_inexact_add(&self, lhs: PFloat, rhs: PFloat) -> Result<PBound, ArithmeticError> {
        trace!("pf_inexact_add(lhs = {}, rhs = {})", lhs, rhs);

        let low = self.pf_exact_add(self.glb(lhs), self.glb(rhs))?;
        let high = self.pf_exact_add(self.lub(lhs), self.lub(rhs))?;
        match (low.lower(), high.upper()) {
            (Some(l), Some(u)) => Ok(self.interval(self.upper_ulp(l), self.lower_ulp(u))),
            _ => Ok(PBound::AllReals),
        }
    }

    fn exact_addition(&self, lhs: PFloat, rhs: PFloat) -> Result<PBound, ArithmeticError> {
        let (outer, inner, _) = by_magnitude(lhs, rhs);
        let (Some(outer), Some(inner)) = (self.decode(outer), self.decode(inner)) else {
            unreachable!("zero and infinity are absorbed before any lookup");
        };

        if outer.inverted != inner.inverted {
            self.addition_crossed(outer, inner)
        } else if outer.inverted {
            self.addition_inverted(outer, inner)
        } else {
            self.addition_uninverted(outer, inner)
        }
    }

    fn addition_crossed(&self, outer: Parts, inner: Parts) -> Result<PBound, ArithmeticError> {
        trace!("addition_crossed(outer = {:?}, inner = {:?})", outer, inner);
        debug_assert!(!outer.inverted);

        if outer.epoch != 0 || inner.epoch != 0 {
            return Err(ArithmeticError::CrossedOutsideEpochZero {
                op: Operator::AddCrossed,
                lhs_epoch: outer.epoch,
                rhs_epoch: inner.epoch,
            }
            .logged());
        }

        let lattice = self.tables().add_crossed.get(outer.lattice, inner.lattice);
        let epoch = i64::from(lattice < outer.lattice);
        Ok(PBound::single(self.from_signed(outer.negative, Scaled::new(epoch, lattice))))
    }

    fn addition_inverted(&self, outer: Parts, inner: Parts) -> Result<PBound, ArithmeticError> {
        trace!("addition_inverted(outer = {:?}, inner = {:?})", outer, inner);

        if outer.epoch != inner.epoch {
            return Err(ArithmeticError::EpochMismatch {
                op: Operator::AddInverted,
                lhs_epoch: outer.epoch,
                rhs_epoch: inner.epoch,
            }
            .logged());
        }

        // Lattice and epoch of the reciprocal of the sum.
        let lattice = self.tables().add_inverted.get(outer.lattice, inner.lattice);
        let epoch = outer.epoch as i64 - i64::from(lattice > outer.lattice);

        if epoch < 0 && lattice & 1 == 1 {
            // Crossed above one and landed between two nodes.
            let below = self.from_signed(false, Scaled::new(0, self.invert(lattice + 1)));
            let above = self.from_signed(false, Scaled::new(0, self.invert(lattice - 1)));
            let magnitude = self.interval(self.upper_ulp(below), self.lower_ulp(above));
            return Ok(if outer.negative {
                magnitude.additive_inverse()
            } else {
                magnitude
            });
        }

        let scaled = Scaled::new(-epoch - 1, self.invert(lattice));
        Ok(PBound::single(self.from_signed(outer.negative, scaled)))
    }

    fn addition_uninverted(&self, outer: Parts, inner: Parts) -> Result<PBound, ArithmeticError> {
        trace!("addition_uninverted(outer = {:?}, inner = {:?})", outer, inner);

        if outer.epoch != inner.epoch {
            return Err(ArithmeticError::EpochMismatch {
                op: Operator::Add,
                lhs_epoch: outer.epoch,
                rhs_epoch: inner.epoch,
            }
            .logged());
        }

        let lattice = self.tables().add.get(outer.lattice, inner.lattice);
        let epoch = outer.epoch as i64 + i64::from(lattice < outer.lattice);
        Ok(PBound::single(self.from_signed(outer.negative, Scaled::new(epoch, lattice))))
    }
}
