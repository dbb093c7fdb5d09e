//! Error types for environment construction, float synthesis and arithmetic.

use std::fmt;

use log::debug;

use crate::table::Operator;

/// Error raised while validating an [`EnvConfig`][crate::env::EnvConfig].
#[derive(Debug, Clone, PartialEq)]
pub enum EnvError {
    /// Lattice or epoch width outside the supported range.
    InvalidWidth { lattice_bits: u32, epoch_bits: u32 },
    /// The number of lattice nodes is not a power of two.
    LatticeSize(usize),
    /// The first lattice node must be exactly one.
    FirstNode(f64),
    /// Lattice nodes must be strictly ascending.
    NotAscending { index: usize },
    /// Every lattice node must be strictly below the stride.
    NodeBeyondStride { index: usize, value: f64 },
    /// The stride must exceed two for carries to be detectable.
    StrideTooSmall(f64),
    /// `L[k] * L[M - k]` must equal the stride.
    NotSymmetric { index: usize },
    /// A generated table entry breaks the carry rule of its operator.
    TableInvariant {
        table: Operator,
        outer: usize,
        inner: usize,
    },
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::InvalidWidth {
                lattice_bits,
                epoch_bits,
            } => write!(
                f,
                "unsupported widths: lattice_bits = {}, epoch_bits = {}",
                lattice_bits, epoch_bits
            ),
            EnvError::LatticeSize(n) => {
                write!(f, "lattice has {} nodes, expected a power of two", n)
            }
            EnvError::FirstNode(v) => write!(f, "first lattice node is {}, expected 1", v),
            EnvError::NotAscending { index } => {
                write!(f, "lattice node {} is not above its predecessor", index)
            }
            EnvError::NodeBeyondStride { index, value } => {
                write!(f, "lattice node {} = {} is not below the stride", index, value)
            }
            EnvError::StrideTooSmall(s) => write!(f, "stride {} must be greater than 2", s),
            EnvError::NotSymmetric { index } => {
                write!(f, "lattice node {} has no reciprocal partner", index)
            }
            EnvError::TableInvariant { table, outer, inner } => write!(
                f,
                "{} table entry ({}, {}) violates its carry rule",
                table, outer, inner
            ),
        }
    }
}

impl std::error::Error for EnvError {}

/// Error raised by [`Env::synth`][crate::env::Env::synth] for out-of-range fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    EpochOutOfRange { epoch: u64, max: u64 },
    LatticeOutOfRange { lattice: u64, max: u64 },
    /// The inverted form of epoch 0, lattice 0 would be one itself.
    InvertedOne,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::EpochOutOfRange { epoch, max } => {
                write!(f, "epoch {} is outside 0..={}", epoch, max)
            }
            EncodeError::LatticeOutOfRange { lattice, max } => {
                write!(f, "lattice {} is outside 0..={}", lattice, max)
            }
            EncodeError::InvertedOne => write!(f, "inverted encoding of one"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Error raised by an arithmetic operation.
///
/// The table regions below are not covered by lookup; the operation reports
/// them instead of producing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    /// Operands of an inverted or uninverted sum sit in different epochs.
    EpochMismatch {
        op: Operator,
        lhs_epoch: u64,
        rhs_epoch: u64,
    },
    /// Crossed operands (one inverted, one not) outside epoch 0.
    CrossedOutsideEpochZero {
        op: Operator,
        lhs_epoch: u64,
        rhs_epoch: u64,
    },
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticError::EpochMismatch {
                op,
                lhs_epoch,
                rhs_epoch,
            } => write!(
                f,
                "{}: operands in epochs {} and {} are not covered by the tables",
                op, lhs_epoch, rhs_epoch
            ),
            ArithmeticError::CrossedOutsideEpochZero {
                op,
                lhs_epoch,
                rhs_epoch,
            } => write!(
                f,
                "{}: crossed operands in epochs {} and {} (only epoch 0 is tabulated)",
                op, lhs_epoch, rhs_epoch
            ),
        }
    }
}

impl std::error::Error for ArithmeticError {}

impl ArithmeticError {
    pub(crate) fn logged(self) -> Self {
        debug!("unsupported region: {}", self);
        self
    }
}
