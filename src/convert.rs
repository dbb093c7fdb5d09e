//! Conversions between machine numbers and projective values.

use crate::bound::PBound;
use crate::env::Env;
use crate::pfloat::PFloat;

impl Env {
    /// The float holding `x`: its node when `x` is (within tolerance) a lattice
    /// value, otherwise the ulp around it. Magnitudes beyond the representable
    /// range saturate to the ulps next to infinity and zero; both infinities
    /// map to the single point at infinity. NaN has no float.
    pub fn from_f64(&self, x: f64) -> Option<PFloat> {
        if x.is_nan() {
            None
        } else if x == 0.0 {
            Some(PFloat::ZERO)
        } else if x.is_infinite() {
            Some(PFloat::INF)
        } else {
            let scaled = self.lattice().quantize(x.abs());
            Some(self.from_signed(x < 0.0, scaled))
        }
    }

    pub fn from_f32(&self, x: f32) -> Option<PFloat> {
        self.from_f64(f64::from(x))
    }

    pub fn from_i64(&self, x: i64) -> PFloat {
        // Every i64 is a finite non-NaN float.
        self.from_f64(x as f64).unwrap_or(PFloat::INF)
    }

    /// Value of an exact float; `None` for a ulp.
    pub fn to_f64(&self, x: PFloat) -> Option<f64> {
        if x.is_zero() {
            return Some(0.0);
        }
        if x.is_inf() {
            return Some(f64::INFINITY);
        }
        if !self.is_exact(x) {
            return None;
        }
        let value = self.lattice().value(self.signed_form(x))?;
        Some(if x.is_negative() { -value } else { value })
    }

    /// Singleton holding `x`, or the empty bound for NaN.
    pub fn bound_from_f64(&self, x: f64) -> PBound {
        self.from_f64(x).map_or(PBound::Empty, PBound::Singleton)
    }

    pub fn bound_from_f32(&self, x: f32) -> PBound {
        self.bound_from_f64(f64::from(x))
    }

    pub fn bound_from_i64(&self, x: i64) -> PBound {
        PBound::Singleton(self.from_i64(x))
    }
}
