//! Projective floats.
//!
//! A [`PFloat`] is one point of the projective real circle, stored left-aligned
//! in a `u64`. Walking the bit patterns upward walks the circle in increasing
//! numeric order: `0 -> positives -> 1 -> inf -> negatives -> -1 -> 0`.
//!
//! Bits, from the top: sign, then a flag that is set for magnitudes of at
//! least one, then the epoch, then the lattice index whose last bit marks a
//! ulp. Magnitudes below one are stored as `inf - bits(1 / x)`, so the
//! multiplicative inverse of any float is `inf - x` and the additive inverse
//! is `-x`, both exact.
//!
//! The constants and sign predicates do not depend on the float width.
//! Everything that does (epoch and lattice fields, ulp stepping) is a method
//! on [`Env`].

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Neg;

use log::debug;

use crate::env::Env;
use crate::error::EncodeError;
use crate::lattice::Scaled;

const ONE_BITS: u64 = 1 << 62;
const INF_BITS: u64 = 1 << 63;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct PFloat(u64);

// Constructors
impl PFloat {
    pub const ZERO: PFloat = PFloat(0);
    pub const ONE: PFloat = PFloat(ONE_BITS);
    pub const INF: PFloat = PFloat(INF_BITS);
    pub const NEG_ONE: PFloat = PFloat(ONE_BITS | INF_BITS);

    /// Wrap a raw bit pattern. Bits below the float width of the environment
    /// it is used with must be zero.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

// Getters
impl PFloat {
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Position in the linear order, where infinity is the minimum.
    const fn signed(self) -> i64 {
        self.0 as i64
    }
}

// Checks
impl PFloat {
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_inf(self) -> bool {
        self.0 == INF_BITS
    }

    /// Strictly negative (false for zero and infinity).
    pub const fn is_negative(self) -> bool {
        self.signed() < 0 && !self.is_inf()
    }

    /// Strictly positive (false for zero and infinity).
    pub const fn is_positive(self) -> bool {
        self.signed() > 0
    }

    /// Magnitude below one, stored as its reciprocal.
    pub const fn is_inverted(self) -> bool {
        let m = self.magnitude().0;
        m != 0 && m < ONE_BITS
    }
}

// Inversions
impl PFloat {
    /// Absolute value; zero and infinity map to themselves.
    pub const fn magnitude(self) -> Self {
        if self.signed() < 0 {
            self.additive_inverse()
        } else {
            self
        }
    }

    pub const fn additive_inverse(self) -> Self {
        Self(self.0.wrapping_neg())
    }

    pub const fn multiplicative_inverse(self) -> Self {
        Self(INF_BITS.wrapping_sub(self.0))
    }
}

impl Neg for PFloat {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.additive_inverse()
    }
}

/// The linear total order on bit patterns read as signed integers.
///
/// Infinity is the least element; every other pair compares numerically.
impl Ord for PFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.signed().cmp(&other.signed())
    }
}

impl PartialOrd for PFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for PFloat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl Debug for PFloat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PFloat({})", self)
    }
}

/// Decoded fields of a finite, non-zero projective float.
///
/// For a negative float the fields describe its magnitude; for an inverted
/// float they describe its reciprocal.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Parts {
    pub negative: bool,
    pub inverted: bool,
    pub epoch: u64,
    pub lattice: u64,
}

impl Parts {
    pub const fn is_ulp(&self) -> bool {
        self.lattice & 1 == 1
    }
}

// Width-dependent float operations.
impl Env {
    /// Distance between adjacent floats in the `u64` encoding.
    pub fn unit(&self) -> u64 {
        1 << self.tail()
    }

    pub fn is_exact(&self, x: PFloat) -> bool {
        x.0 & self.unit() == 0
    }

    /// Successor on the circle.
    pub fn next(&self, x: PFloat) -> PFloat {
        PFloat(x.0.wrapping_add(self.unit()))
    }

    /// Predecessor on the circle.
    pub fn prev(&self, x: PFloat) -> PFloat {
        PFloat(x.0.wrapping_sub(self.unit()))
    }

    /// Greatest exact float not above `x`.
    pub fn glb(&self, x: PFloat) -> PFloat {
        if self.is_exact(x) {
            x
        } else {
            self.prev(x)
        }
    }

    /// Least exact float not below `x`.
    pub fn lub(&self, x: PFloat) -> PFloat {
        if self.is_exact(x) {
            x
        } else {
            self.next(x)
        }
    }

    /// The ulp just above an exact float; a ulp is returned unchanged.
    pub fn upper_ulp(&self, x: PFloat) -> PFloat {
        if self.is_exact(x) {
            self.next(x)
        } else {
            x
        }
    }

    /// The ulp just below an exact float; a ulp is returned unchanged.
    pub fn lower_ulp(&self, x: PFloat) -> PFloat {
        if self.is_exact(x) {
            self.prev(x)
        } else {
            x
        }
    }

    /// Split a float into its fields. `None` for zero and infinity.
    pub fn decode(&self, x: PFloat) -> Option<Parts> {
        if x.is_zero() || x.is_inf() {
            return None;
        }

        let negative = x.is_negative();
        let mut bits = x.magnitude().0;
        let inverted = bits < ONE_BITS;
        if inverted {
            bits = INF_BITS - bits;
        }
        let body = (bits - ONE_BITS) >> self.tail();

        Some(Parts {
            negative,
            inverted,
            epoch: body >> self.lattice_bits(),
            lattice: body & (self.lattice().span() - 1),
        })
    }

    /// Epoch field; zero for zero and infinity.
    pub fn epoch(&self, x: PFloat) -> u64 {
        self.decode(x).map_or(0, |parts| parts.epoch)
    }

    /// Lattice field; zero for zero and infinity.
    pub fn lattice_index(&self, x: PFloat) -> u64 {
        self.decode(x).map_or(0, |parts| parts.lattice)
    }

    /// Assemble a float from its fields.
    pub fn synth(&self, parts: Parts) -> Result<PFloat, EncodeError> {
        if parts.epoch > self.max_epoch() {
            return Err(EncodeError::EpochOutOfRange {
                epoch: parts.epoch,
                max: self.max_epoch(),
            });
        }
        if parts.lattice >= self.lattice().span() {
            return Err(EncodeError::LatticeOutOfRange {
                lattice: parts.lattice,
                max: self.lattice().span() - 1,
            });
        }
        if parts.inverted && parts.epoch == 0 && parts.lattice == 0 {
            return Err(EncodeError::InvertedOne);
        }
        Ok(self.encode(parts))
    }

    pub(crate) fn encode(&self, parts: Parts) -> PFloat {
        debug_assert!(parts.epoch <= self.max_epoch());
        debug_assert!(parts.lattice < self.lattice().span());

        let body = (parts.epoch << self.lattice_bits()) | parts.lattice;
        let mut bits = ONE_BITS + (body << self.tail());
        if parts.inverted {
            bits = INF_BITS - bits;
        }
        if parts.negative {
            bits = bits.wrapping_neg();
        }
        PFloat(bits)
    }

    /// Lattice index of the reciprocal of a node within one epoch.
    pub fn invert(&self, lattice: u64) -> u64 {
        self.lattice().invert(lattice)
    }

    /// The magnitude of a finite, non-zero float as `stride^shift * L[k]`.
    ///
    /// Inverted floats get a negative shift, so products and quotients reduce
    /// to adding and subtracting shifts.
    pub(crate) fn signed_form(&self, x: PFloat) -> Scaled {
        let Some(parts) = self.decode(x) else {
            debug_assert!(false, "signed_form of {}", x);
            return Scaled::default();
        };

        let epoch = parts.epoch as i64;
        if !parts.inverted {
            Scaled::new(epoch, parts.lattice)
        } else if parts.lattice == 0 {
            Scaled::new(-epoch, 0)
        } else {
            Scaled::new(-epoch - 1, self.invert(parts.lattice))
        }
    }

    /// Encode `±stride^shift * L[k]`, saturating to the ulp next to infinity
    /// or zero when the shift leaves the representable range.
    ///
    /// `lattice` may equal the span, which is node 0 of the next epoch.
    pub(crate) fn from_signed(&self, negative: bool, scaled: Scaled) -> PFloat {
        let span = self.lattice().span();
        let max = self.max_epoch() as i64;
        let Scaled { mut shift, mut lattice } = scaled;
        if lattice == span {
            shift += 1;
            lattice = 0;
        }

        let parts = if shift >= 0 {
            if shift > max {
                return self.overflow(negative);
            }
            Parts {
                negative,
                inverted: false,
                epoch: shift as u64,
                lattice,
            }
        } else {
            let mut epoch = -shift - 1;
            let mut lattice = self.invert(lattice);
            if lattice == span {
                epoch += 1;
                lattice = 0;
            }
            if epoch > max {
                return self.underflow(negative);
            }
            Parts {
                negative,
                inverted: true,
                epoch: epoch as u64,
                lattice,
            }
        };
        self.encode(parts)
    }

    /// The ulp between the largest finite magnitude and infinity.
    pub fn overflow(&self, negative: bool) -> PFloat {
        debug!("saturating above the largest finite magnitude");
        let top = self.prev(PFloat::INF);
        if negative {
            -top
        } else {
            top
        }
    }

    /// The ulp between zero and the smallest non-zero magnitude.
    pub fn underflow(&self, negative: bool) -> PFloat {
        debug!("saturating below the smallest non-zero magnitude");
        let bottom = self.next(PFloat::ZERO);
        if negative {
            -bottom
        } else {
            bottom
        }
    }
}
