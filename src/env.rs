//! The arithmetic environment.
//!
//! An [`Env`] bundles everything the engine reads but never writes: the
//! lattice, the bit widths of a projective float and the operator tables.
//! It is built once from an [`EnvConfig`] and then shared by reference; every
//! operation in this crate is a method on it.

use std::fmt::Debug;

use log::debug;

use crate::bound::PBound;
use crate::error::EnvError;
use crate::lattice::Lattice;
use crate::pfloat::PFloat;
use crate::table::Tables;

/// Largest supported lattice width (a table then has `2^22` entries).
pub const MAX_LATTICE_BITS: u32 = 12;
/// Largest supported epoch width.
pub const MAX_EPOCH_BITS: u32 = 16;

/// Description of a lattice and float layout.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvConfig {
    /// Growth factor between successive epochs.
    pub stride: f64,
    /// Ascending nodes of one epoch, starting at 1.
    pub lattice: Vec<f64>,
    pub epoch_bits: u32,
}

impl EnvConfig {
    pub fn new(stride: f64, lattice: Vec<f64>, epoch_bits: u32) -> Self {
        Self {
            stride,
            lattice,
            epoch_bits,
        }
    }

    /// Stride 10 with nodes `{1, 2, sqrt(10), 5}` and 3 epoch bits (8-bit floats).
    pub fn decimal() -> Self {
        Self::new(10.0, vec![1.0, 2.0, 10f64.sqrt(), 5.0], 3)
    }

    /// Stride 4 with nodes `{1, 2}` and 2 epoch bits (6-bit floats).
    pub fn binary() -> Self {
        Self::new(4.0, vec![1.0, 2.0], 2)
    }
}

impl Default for EnvConfig {
    /// Stride 16 with nodes `{1, 2, 8/3, 3, 4, 16/3, 6, 8}` and 2 epoch bits
    /// (8-bit floats). Small integers up to 8 are exact.
    fn default() -> Self {
        Self::new(
            16.0,
            vec![1.0, 2.0, 8.0 / 3.0, 3.0, 4.0, 16.0 / 3.0, 6.0, 8.0],
            2,
        )
    }
}

pub struct Env {
    lattice: Lattice,
    epoch_bits: u32,
    /// Unused low bits of the left-aligned `u64` encoding.
    tail: u32,
    tables: Tables,
}

impl Env {
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        let lattice = Lattice::new(config.stride, config.lattice)?;
        if lattice.bits() > MAX_LATTICE_BITS || config.epoch_bits > MAX_EPOCH_BITS {
            return Err(EnvError::InvalidWidth {
                lattice_bits: lattice.bits(),
                epoch_bits: config.epoch_bits,
            });
        }

        let tables = Tables::build(&lattice)?;
        let width = 2 + config.epoch_bits + lattice.bits();
        debug!(
            "Env::new(stride = {}, lattice_bits = {}, epoch_bits = {}) -> {}-bit floats",
            lattice.stride(),
            lattice.bits(),
            config.epoch_bits,
            width
        );

        Ok(Self {
            lattice,
            epoch_bits: config.epoch_bits,
            tail: 64 - width,
            tables,
        })
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new(EnvConfig::default()).expect("default lattice is valid")
    }
}

impl Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("stride", &self.lattice.stride())
            .field("lattice_bits", &self.lattice.bits())
            .field("epoch_bits", &self.epoch_bits)
            .field("width", &self.width())
            .finish()
    }
}

impl Env {
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn stride(&self) -> f64 {
        self.lattice.stride()
    }

    pub fn lattice_bits(&self) -> u32 {
        self.lattice.bits()
    }

    pub fn epoch_bits(&self) -> u32 {
        self.epoch_bits
    }

    pub fn max_epoch(&self) -> u64 {
        (1 << self.epoch_bits) - 1
    }

    /// Total width of a projective float in bits.
    pub fn width(&self) -> u32 {
        64 - self.tail
    }

    pub(crate) fn tail(&self) -> u32 {
        self.tail
    }

    /// Number of distinct projective floats.
    pub fn count(&self) -> u64 {
        1 << self.width()
    }

    /// Iterate over every projective float, starting at zero and walking the
    /// circle upward.
    pub fn floats(&self) -> impl Iterator<Item = PFloat> + '_ {
        (0..self.count()).map(move |i| PFloat::from_bits(i << self.tail))
    }

    /// Build a standard bound, enforcing the bound invariants: equal endpoints
    /// collapse to a singleton and adjacent endpoints cover the whole circle.
    pub fn interval(&self, lower: PFloat, upper: PFloat) -> PBound {
        if lower == upper {
            PBound::Singleton(lower)
        } else if self.next(upper) == lower {
            PBound::AllReals
        } else {
            PBound::Interval(lower, upper)
        }
    }
}
