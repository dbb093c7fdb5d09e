//! Projective bounds: subsets of the projective circle.
//!
//! A [`PBound`] is empty, a single float, a closed arc `[lower, upper]` walked
//! upward around the circle, or the whole circle. An arc whose lower endpoint
//! exceeds its upper one in the linear order passes through infinity; that is
//! an ordinary arc, not an error.

use std::fmt::{Display, Formatter};
use std::ops::Neg;

use crate::pfloat::PFloat;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PBound {
    Empty,
    Singleton(PFloat),
    Interval(PFloat, PFloat),
    AllReals,
}

// Constructors
impl PBound {
    pub const fn empty() -> Self {
        PBound::Empty
    }

    pub const fn single(x: PFloat) -> Self {
        PBound::Singleton(x)
    }

    /// The arc from `lower` up to `upper`, collapsed when the endpoints agree.
    ///
    /// Adjacent endpoints are only normalized by
    /// [`Env::interval`][crate::env::Env::interval], which knows the float width.
    pub fn interval(lower: PFloat, upper: PFloat) -> Self {
        let mut bound = PBound::Interval(lower, upper);
        bound.collapse_if_single();
        bound
    }

    pub const fn all_reals() -> Self {
        PBound::AllReals
    }

    pub const fn zero() -> Self {
        PBound::Singleton(PFloat::ZERO)
    }

    pub const fn one() -> Self {
        PBound::Singleton(PFloat::ONE)
    }

    pub const fn neg_one() -> Self {
        PBound::Singleton(PFloat::NEG_ONE)
    }

    pub const fn inf() -> Self {
        PBound::Singleton(PFloat::INF)
    }
}

// Getters
impl PBound {
    /// Lower endpoint; a singleton's value serves as both endpoints.
    pub const fn lower(&self) -> Option<PFloat> {
        match *self {
            PBound::Singleton(x) | PBound::Interval(x, _) => Some(x),
            PBound::Empty | PBound::AllReals => None,
        }
    }

    /// Upper endpoint; a singleton's value serves as both endpoints.
    pub const fn upper(&self) -> Option<PFloat> {
        match *self {
            PBound::Singleton(x) | PBound::Interval(_, x) => Some(x),
            PBound::Empty | PBound::AllReals => None,
        }
    }

    pub const fn endpoints(&self) -> Option<(PFloat, PFloat)> {
        match *self {
            PBound::Singleton(x) => Some((x, x)),
            PBound::Interval(l, u) => Some((l, u)),
            PBound::Empty | PBound::AllReals => None,
        }
    }
}

// Checks
impl PBound {
    pub const fn is_empty(&self) -> bool {
        matches!(self, PBound::Empty)
    }

    pub const fn is_single(&self) -> bool {
        matches!(self, PBound::Singleton(_))
    }

    pub const fn is_interval(&self) -> bool {
        matches!(self, PBound::Interval(..))
    }

    pub const fn is_all_reals(&self) -> bool {
        matches!(self, PBound::AllReals)
    }

    /// The arc passes through infinity.
    pub fn rounds_inf(&self) -> bool {
        match *self {
            PBound::Interval(l, u) => l > u,
            _ => false,
        }
    }

    /// The arc passes through zero.
    pub fn rounds_zero(&self) -> bool {
        match *self {
            PBound::Interval(l, u) => l.to_bits() > u.to_bits(),
            _ => false,
        }
    }

    /// Every element is strictly negative.
    pub fn is_negative(&self) -> bool {
        match *self {
            PBound::Singleton(x) => x.is_negative(),
            PBound::Interval(l, u) => l <= u && l.is_negative() && u.is_negative(),
            _ => false,
        }
    }

    /// Every element is strictly positive.
    pub fn is_positive(&self) -> bool {
        match *self {
            PBound::Singleton(x) => x.is_positive(),
            PBound::Interval(l, u) => l <= u && l.is_positive() && u.is_positive(),
            _ => false,
        }
    }

    pub fn contains(&self, x: PFloat) -> bool {
        match *self {
            PBound::Empty => false,
            PBound::Singleton(v) => v == x,
            PBound::Interval(l, u) => offset(l, x) <= offset(l, u),
            PBound::AllReals => true,
        }
    }
}

/// Distance walked upward from `from` to reach `to`.
fn offset(from: PFloat, to: PFloat) -> u64 {
    to.to_bits().wrapping_sub(from.to_bits())
}

impl PBound {
    /// Turn an interval with equal endpoints into a singleton.
    pub fn collapse_if_single(&mut self) {
        if let PBound::Interval(l, u) = *self {
            if l == u {
                *self = PBound::Singleton(l);
            }
        }
    }
}

// Inversions
impl PBound {
    pub fn additive_inverse(&self) -> Self {
        match *self {
            PBound::Singleton(x) => PBound::Singleton(-x),
            PBound::Interval(l, u) => PBound::Interval(-u, -l),
            other => other,
        }
    }

    pub fn multiplicative_inverse(&self) -> Self {
        match *self {
            PBound::Singleton(x) => PBound::Singleton(x.multiplicative_inverse()),
            PBound::Interval(l, u) => PBound::Interval(u.multiplicative_inverse(), l.multiplicative_inverse()),
            other => other,
        }
    }
}

impl Neg for PBound {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.additive_inverse()
    }
}

// Comparisons
impl PBound {
    /// Every element is strictly below every element of `other`.
    ///
    /// False whenever either side is empty, all-reals or contains infinity,
    /// where the linear order says nothing useful.
    pub fn lt(&self, other: &PBound) -> bool {
        if self.contains(PFloat::INF) || other.contains(PFloat::INF) {
            return false;
        }
        match (self.upper(), other.lower()) {
            (Some(u), Some(l)) => u < l,
            _ => false,
        }
    }

    /// Every element is strictly above every element of `other`.
    pub fn gt(&self, other: &PBound) -> bool {
        other.lt(self)
    }

    /// Every element of `self` belongs to `other`.
    pub fn within(&self, other: &PBound) -> bool {
        match (*self, *other) {
            (PBound::Empty, _) | (_, PBound::AllReals) => true,
            (_, PBound::Empty) | (PBound::AllReals, _) => false,
            (_, PBound::Singleton(v)) => *self == PBound::Singleton(v),
            (_, PBound::Interval(l, u)) => {
                let Some((a, b)) = self.endpoints() else {
                    return false;
                };
                let span = offset(l, u);
                offset(l, a) <= span && offset(l, b) <= span && offset(l, a) <= offset(l, b)
            }
        }
    }

    /// The two bounds share at least one element.
    pub fn overlaps(&self, other: &PBound) -> bool {
        if self.is_all_reals() || other.is_all_reals() {
            return !self.is_empty() && !other.is_empty();
        }
        match (self.lower(), other.lower()) {
            (Some(a), Some(b)) => self.contains(b) || other.contains(a),
            _ => false,
        }
    }
}

impl Display for PBound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PBound::Empty => write!(f, "∅"),
            PBound::Singleton(x) => write!(f, "{{{}}}", x),
            PBound::Interval(l, u) => write!(f, "[{}, {}]", l, u),
            PBound::AllReals => write!(f, "ℝ ∪ {{∞}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::env::Env;

    fn float(env: &Env, x: f64) -> PFloat {
        env.from_f64(x).unwrap()
    }

    #[test]
    fn test_constructors() {
        assert!(PBound::empty().is_empty());
        assert!(PBound::all_reals().is_all_reals());
        assert!(PBound::one().is_single());
        assert_eq!(PBound::inf(), PBound::Singleton(PFloat::INF));
        assert_eq!(PBound::interval(PFloat::ONE, PFloat::ONE), PBound::one());
        assert!(PBound::interval(PFloat::ZERO, PFloat::ONE).is_interval());
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let mut b = PBound::Interval(PFloat::ONE, PFloat::ONE);
        b.collapse_if_single();
        assert_eq!(b, PBound::one());
        b.collapse_if_single();
        assert_eq!(b, PBound::one());

        let mut c = PBound::Interval(PFloat::ZERO, PFloat::ONE);
        c.collapse_if_single();
        assert_eq!(c, PBound::Interval(PFloat::ZERO, PFloat::ONE));
    }

    #[test]
    fn test_rounds() {
        let env = Env::default();
        let through_inf = PBound::Interval(float(&env, 4.0), float(&env, -4.0));
        assert!(through_inf.rounds_inf());
        assert!(!through_inf.rounds_zero());

        let through_zero = PBound::Interval(float(&env, -4.0), float(&env, 4.0));
        assert!(!through_zero.rounds_inf());
        assert!(through_zero.rounds_zero());

        assert!(!PBound::one().rounds_inf());
        assert!(!PBound::AllReals.rounds_zero());
    }

    #[test]
    fn test_sign() {
        let env = Env::default();
        assert!(PBound::Interval(float(&env, -4.0), float(&env, -1.0)).is_negative());
        assert!(PBound::Interval(float(&env, 1.0), float(&env, 4.0)).is_positive());
        assert!(!PBound::Interval(float(&env, -1.0), float(&env, 4.0)).is_positive());
        assert!(!PBound::Interval(float(&env, 4.0), float(&env, 1.0)).is_positive());
        assert!(!PBound::zero().is_positive());
        assert!(!PBound::inf().is_negative());
    }

    #[test]
    fn test_contains() {
        let env = Env::default();
        let wrap = PBound::Interval(float(&env, 4.0), float(&env, -4.0));
        assert!(wrap.contains(PFloat::INF));
        assert!(wrap.contains(float(&env, 8.0)));
        assert!(!wrap.contains(PFloat::ZERO));

        let plain = PBound::Interval(float(&env, -1.0), float(&env, 2.0));
        assert!(plain.contains(PFloat::ZERO));
        assert!(plain.contains(float(&env, 2.0)));
        assert!(!plain.contains(float(&env, 3.0)));
    }

    #[test]
    fn test_inversions_are_involutions() {
        let env = Env::default();
        let b = PBound::Interval(float(&env, -3.0), float(&env, 6.0));
        assert_eq!(b.additive_inverse(), PBound::Interval(float(&env, -6.0), float(&env, 3.0)));
        assert_eq!(b.additive_inverse().additive_inverse(), b);
        assert_eq!(b.multiplicative_inverse().multiplicative_inverse(), b);
        assert_eq!(-PBound::one(), PBound::neg_one());
        assert_eq!(PBound::zero().multiplicative_inverse(), PBound::inf());
    }

    #[test]
    fn test_multiplicative_inverse_wraps() {
        let env = Env::default();
        // 1 / [-2, 4] is everything outside (-1/2, 1/4).
        let b = PBound::Interval(float(&env, -2.0), float(&env, 4.0));
        let inv = b.multiplicative_inverse();
        assert_eq!(inv, PBound::Interval(float(&env, 0.25), float(&env, -0.5)));
        assert!(inv.rounds_inf());
        assert!(inv.contains(PFloat::INF));
    }

    #[test]
    fn test_ordering() {
        let env = Env::default();
        let small = PBound::Interval(float(&env, 1.0), float(&env, 2.0));
        let large = PBound::Interval(float(&env, 3.0), float(&env, 4.0));
        assert!(small.lt(&large));
        assert!(large.gt(&small));
        assert!(!large.lt(&small));
        assert!(!small.lt(&PBound::AllReals));
        assert!(!small.lt(&PBound::Empty));
        assert!(!PBound::Interval(PFloat::INF, float(&env, 1.0)).lt(&large));
    }

    #[test]
    fn test_within() {
        let env = Env::default();
        let outer = PBound::Interval(float(&env, 1.0), float(&env, 6.0));
        let inner = PBound::Interval(float(&env, 2.0), float(&env, 4.0));
        assert!(inner.within(&outer));
        assert!(!outer.within(&inner));
        assert!(PBound::single(float(&env, 3.0)).within(&outer));
        assert!(PBound::Empty.within(&inner));
        assert!(outer.within(&PBound::AllReals));
        assert!(!PBound::AllReals.within(&outer));

        // Same endpoints but walking the other way round the circle.
        let reversed = PBound::Interval(float(&env, 6.0), float(&env, 1.0));
        assert!(!reversed.within(&outer));
    }

    #[test]
    fn test_overlaps() {
        let env = Env::default();
        let a = PBound::Interval(float(&env, 1.0), float(&env, 4.0));
        let b = PBound::Interval(float(&env, 3.0), float(&env, 6.0));
        let c = PBound::Interval(float(&env, 6.0), float(&env, 8.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(b.overlaps(&c));
        assert!(!a.overlaps(&PBound::Empty));
        assert!(a.overlaps(&PBound::AllReals));
    }

    #[test]
    fn test_display() {
        assert_eq!(PBound::Empty.to_string(), "∅");
        assert_eq!(PBound::AllReals.to_string(), "ℝ ∪ {∞}");
        assert_eq!(PBound::one().to_string(), "{0x4000000000000000}");
        assert_eq!(
            PBound::Interval(PFloat::ZERO, PFloat::ONE).to_string(),
            "[0x0000000000000000, 0x4000000000000000]"
        );
    }
}
