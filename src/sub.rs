//! Subtraction.
//!
//! Mixed-sign addition lands here too. Cancellation can borrow any number of
//! epochs, so the subtraction tables store an explicit shift next to each
//! lattice index instead of relying on a carry comparison.

use log::trace;

use crate::add::by_magnitude;
use crate::bound::PBound;
use crate::env::Env;
use crate::error::ArithmeticError;
use crate::lattice::Scaled;
use crate::pfloat::PFloat;
use crate::table::Operator;

impl Env {
    /// Difference of two bounds: `[a, b] - [c, d] = [a - d, b - c]`.
    pub fn sub(&self, lhs: &PBound, rhs: &PBound) -> Result<PBound, ArithmeticError> {
        trace!("sub(lhs = {}, rhs = {})", lhs, rhs);
        self.add(lhs, &rhs.additive_inverse())
    }

    /// Difference of two floats.
    pub fn pf_sub(&self, lhs: PFloat, rhs: PFloat) -> Result<PBound, ArithmeticError> {
        trace!("pf_sub(lhs = {}, rhs = {})", lhs, rhs);
        self.pf_add(lhs, -rhs)
    }

    /// `lhs - rhs` for exact, finite, non-zero floats of the same sign.
    pub(crate) fn exact_sub(&self, lhs: PFloat, rhs: PFloat) -> Result<PBound, ArithmeticError> {
        trace!("exact_sub(lhs = {}, rhs = {})", lhs, rhs);

        if lhs == rhs {
            return Ok(PBound::zero());
        }

        let (outer, inner, swapped) = by_magnitude(lhs, rhs);
        // Subtracting the larger magnitude flips the sign.
        let negative = lhs.is_negative() ^ swapped;
        let (Some(outer), Some(inner)) = (self.decode(outer), self.decode(inner)) else {
            unreachable!("zero and infinity are absorbed before any lookup");
        };

        let tables = self.tables();
        let scaled = if outer.inverted != inner.inverted {
            if outer.epoch != 0 || inner.epoch != 0 {
                return Err(ArithmeticError::CrossedOutsideEpochZero {
                    op: Operator::SubCrossed,
                    lhs_epoch: outer.epoch,
                    rhs_epoch: inner.epoch,
                }
                .logged());
            }
            tables.sub_crossed.get(outer.lattice, inner.lattice)
        } else if outer.epoch != inner.epoch {
            let op = if outer.inverted { Operator::SubInverted } else { Operator::Sub };
            return Err(ArithmeticError::EpochMismatch {
                op,
                lhs_epoch: outer.epoch,
                rhs_epoch: inner.epoch,
            }
            .logged());
        } else if outer.inverted {
            let entry = tables.sub_inverted.get(outer.lattice, inner.lattice);
            Scaled::new(entry.shift - outer.epoch as i64, entry.lattice)
        } else {
            let entry = tables.sub.get(outer.lattice, inner.lattice);
            Scaled::new(entry.shift + outer.epoch as i64, entry.lattice)
        };

        Ok(PBound::single(self.from_signed(negative, scaled)))
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

    #[test]
    fn test_uninverted_differences() {
        let env = Env::default();
        assert_eq!(env.pf_sub(float(&env, 3.0), float(&env, 1.0)), Ok(single(&env, 2.0)));
        assert_eq!(env.pf_sub(float(&env, 1.0), float(&env, 3.0)), Ok(single(&env, -2.0)));
        assert_eq!(env.pf_sub(float(&env, -6.0), float(&env, -2.0)), Ok(single(&env, -4.0)));
        // 3 - 8/3 = 1/3 borrows an epoch.
        assert_eq!(
            env.pf_sub(float(&env, 3.0), float(&env, 8.0 / 3.0)),
            Ok(single(&env, 1.0 / 3.0))
        );
        // Same epoch above one.
        assert_eq!(env.pf_sub(float(&env, 96.0), float(&env, 64.0)), Ok(single(&env, 32.0)));
    }

    #[test]
    fn test_inverted_differences() {
        let env = Env::default();
        assert_eq!(env.pf_sub(float(&env, 0.5), float(&env, 0.25)), Ok(single(&env, 0.25)));
        assert_eq!(env.pf_sub(float(&env, 0.25), float(&env, 0.5)), Ok(single(&env, -0.25)));
    }

    #[test]
    fn test_crossed_differences() {
        let env = Env::default();
        assert_eq!(env.pf_sub(float(&env, 1.0), float(&env, 0.5)), Ok(single(&env, 0.5)));
        assert_eq!(env.pf_sub(float(&env, 0.5), float(&env, 2.0)), Ok(single(&env, -1.5)));
    }

    #[test]
    fn test_equal_operands() {
        let env = Env::default();
        let x = float(&env, 6.0);
        assert_eq!(env.pf_sub(x, x), Ok(PBound::zero()));
        assert_eq!(env.pf_sub(-x, -x), Ok(PBound::zero()));
    }

    #[test]
    fn test_unsupported_regions() {
        let env = Env::default();
        assert_eq!(
            env.pf_sub(float(&env, 16.0), float(&env, 1.0)),
            Err(ArithmeticError::EpochMismatch {
                op: Operator::Sub,
                lhs_epoch: 1,
                rhs_epoch: 0
            })
        );
        assert_eq!(
            env.pf_sub(float(&env, 16.0), float(&env, 0.5)),
            Err(ArithmeticError::CrossedOutsideEpochZero {
                op: Operator::SubCrossed,
                lhs_epoch: 1,
                rhs_epoch: 0
            })
        );
    }

    #[test]
    fn test_bound_difference() {
        let env = Env::default();
        let lhs = PBound::Interval(float(&env, 4.0), float(&env, 6.0));
        let rhs = PBound::Interval(float(&env, 1.0), float(&env, 2.0));
        // [4, 6] - [1, 2] = [2, 5]
        assert_eq!(
            env.sub(&lhs, &rhs),
            Ok(PBound::Interval(float(&env, 2.0), float(&env, 5.0)))
        );
        assert_eq!(env.sub(&PBound::Empty, &rhs), Ok(PBound::Empty));
        assert_eq!(env.sub(&lhs, &PBound::AllReals), Ok(PBound::AllReals));
    }

    #[test]
    fn test_difference_through_infinity() {
        let env = Env::default();
        let wrap = PBound::Interval(float(&env, 4.0), float(&env, -4.0));
        // 32 - 32 = 0, and -32 - 32 = -64: every difference is reachable.
        let difference = env.sub(&wrap, &wrap).unwrap();
        assert_eq!(difference, PBound::AllReals);
        assert!(difference.contains(PFloat::ZERO));

        // [4, -4] - [1, 2] = [2, -5] through infinity
        let rhs = PBound::Interval(float(&env, 1.0), float(&env, 2.0));
        let difference = env.sub(&wrap, &rhs).unwrap();
        assert_eq!(difference, PBound::Interval(float(&env, 2.0), float(&env, -5.0)));
        assert!(difference.rounds_inf());
    }
}
