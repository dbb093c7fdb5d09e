//! The lattice: representable magnitudes within a single epoch.
//!
//! A lattice is a list of `M = 2^(lattice_bits - 1)` ascending nodes
//! `L[0] = 1 < L[1] < ... < L[M-1] < stride`. A lattice index is twice a node
//! position (an exact node) or twice plus one (the open ulp between a node and
//! the next, with `L[M] = stride`). Nodes must pair up under `x -> stride / x`,
//! which is what makes reciprocals exact.

use crate::error::EnvError;

/// Relative tolerance used when matching a computed magnitude to a node.
const TOLERANCE: f64 = 1e-9;

pub(crate) fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs())
}

/// A magnitude `stride^shift * L[lattice / 2]`, or the ulp above that node
/// when `lattice` is odd.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Scaled {
    pub shift: i64,
    pub lattice: u64,
}

impl Scaled {
    pub const fn new(shift: i64, lattice: u64) -> Self {
        Self { shift, lattice }
    }

    pub const fn is_ulp(&self) -> bool {
        self.lattice & 1 == 1
    }
}

#[derive(Debug, Clone)]
pub struct Lattice {
    stride: f64,
    nodes: Vec<f64>,
    bits: u32,
}

impl Lattice {
    /// Validate a lattice description.
    pub fn new(stride: f64, nodes: Vec<f64>) -> Result<Self, EnvError> {
        let count = nodes.len();
        if count == 0 || !count.is_power_of_two() {
            return Err(EnvError::LatticeSize(count));
        }
        if !(stride > 2.0) || !stride.is_finite() {
            return Err(EnvError::StrideTooSmall(stride));
        }
        if nodes[0] != 1.0 {
            return Err(EnvError::FirstNode(nodes[0]));
        }
        for index in 1..count {
            if !(nodes[index] > nodes[index - 1]) {
                return Err(EnvError::NotAscending { index });
            }
        }
        for (index, &value) in nodes.iter().enumerate() {
            if !(value < stride) {
                return Err(EnvError::NodeBeyondStride { index, value });
            }
        }
        for index in 1..count {
            if !close(nodes[index] * nodes[count - index], stride) {
                return Err(EnvError::NotSymmetric { index });
            }
        }

        Ok(Self {
            stride,
            nodes,
            bits: count.trailing_zeros() + 1,
        })
    }

    pub fn stride(&self) -> f64 {
        self.stride
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Number of bits in a lattice index, ulp bit included.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of nodes (matrix points).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of lattice indices, `2 * len()`.
    pub fn span(&self) -> u64 {
        1 << self.bits
    }

    pub fn node(&self, index: usize) -> f64 {
        self.nodes[index]
    }

    /// Lattice index of `stride / x` for `x` at index `lattice`.
    ///
    /// Index 0 maps to `span()`, which is node 0 of the next epoch.
    pub fn invert(&self, lattice: u64) -> u64 {
        debug_assert!(lattice <= self.span());
        self.span() - lattice
    }

    /// Locate a positive finite magnitude on the lattice.
    ///
    /// Values within the matching tolerance of a node snap to it; anything else
    /// lands on the ulp between its neighbouring nodes.
    pub fn quantize(&self, value: f64) -> Scaled {
        debug_assert!(value > 0.0 && value.is_finite());

        let stride = self.stride;
        let mut shift = (value.ln() / stride.ln()).floor() as i64;
        // Scale in two halves so extreme exponents do not overflow `powi`.
        let half = shift / 2;
        let mut mantissa = value / stride.powi(half as i32) / stride.powi((shift - half) as i32);
        if mantissa < 1.0 && !close(mantissa, 1.0) {
            mantissa *= stride;
            shift -= 1;
        } else if mantissa >= stride || close(mantissa, stride) {
            mantissa /= stride;
            shift += 1;
        }

        let lattice = match self.nodes.iter().position(|&node| close(mantissa, node)) {
            Some(k) => 2 * k as u64,
            None => {
                let above = self.nodes.partition_point(|&node| node < mantissa);
                2 * above as u64 - 1
            }
        };
        Scaled { shift, lattice }
    }

    /// The real value of an exact scaled magnitude, `None` for a ulp.
    pub fn value(&self, scaled: Scaled) -> Option<f64> {
        if scaled.is_ulp() {
            return None;
        }
        let node = self.nodes[(scaled.lattice >> 1) as usize];
        Some(node * self.stride.powi(scaled.shift as i32))
    }
}
