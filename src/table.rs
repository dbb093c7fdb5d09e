use std::fmt::{Display, Formatter};

use crate::error::EnvError;
use crate::lattice::{Lattice, Scaled};

/// Identifies an arithmetic lookup table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    Add,
    AddInverted,
    AddCrossed,
    Sub,
    SubInverted,
    SubCrossed,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Add,
        Operator::AddInverted,
        Operator::AddCrossed,
        Operator::Sub,
        Operator::SubInverted,
        Operator::SubCrossed,
        Operator::Mul,
        Operator::Div,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::AddInverted => "add-inverted",
            Operator::AddCrossed => "add-crossed",
            Operator::Sub => "sub",
            Operator::SubInverted => "sub-inverted",
            Operator::SubCrossed => "sub-crossed",
            Operator::Mul => "mul",
            Operator::Div => "div",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Combined table index of two lattice indices.
///
/// Matrix points are the lattice indices with the ulp bit shifted away; the
/// outer point selects the row.
pub fn addsub_index(lattice_bits: u32, lhs_lattice: u64, rhs_lattice: u64) -> usize {
    let lpoint1 = (lhs_lattice >> 1) as usize;
    let lpoint2 = (rhs_lattice >> 1) as usize;
    (lpoint1 << (lattice_bits - 1)) + lpoint2
}

/// Square table over pairs of matrix points.
#[derive(Debug, Clone)]
pub struct Table<T> {
    data: Vec<T>,
    lattice_bits: u32,
}

impl<T: Copy> Table<T> {
    fn new(lattice_bits: u32, data: Vec<T>) -> Self {
        let dimension = 1usize << (lattice_bits - 1);
        assert_eq!(data.len(), dimension * dimension);
        Self { data, lattice_bits }
    }

    /// Number of matrix points along each side.
    pub fn dimension(&self) -> usize {
        1 << (self.lattice_bits - 1)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Look up the entry for two lattice indices (ulp bits are ignored).
    pub fn get(&self, outer_lattice: u64, inner_lattice: u64) -> T {
        self.data[addsub_index(self.lattice_bits, outer_lattice, inner_lattice)]
    }

    /// Look up the entry for two matrix points.
    pub fn at(&self, outer: usize, inner: usize) -> T {
        self.data[(outer << (self.lattice_bits - 1)) + inner]
    }

    /// Iterate over the rows of the table.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.dimension())
    }
}

/// How an operator signals an epoch change through its table entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Carry {
    /// A result below the outer operand means the epoch went up by one.
    Up,
    /// A result above the outer operand means the epoch went down by one.
    Down,
}

impl Carry {
    fn holds(self, outer: u64, scaled: Scaled) -> bool {
        match (self, scaled.shift) {
            (Carry::Up, 0) => scaled.lattice >= outer,
            (Carry::Up, 1) => scaled.lattice < outer,
            (Carry::Down, 0) => scaled.lattice <= outer,
            (Carry::Down, -1) => scaled.lattice > outer,
            _ => false,
        }
    }
}

/// Lookup tables for every operator, built from a validated lattice.
#[derive(Debug, Clone)]
pub struct Tables {
    pub add: Table<u64>,
    pub add_inverted: Table<u64>,
    pub add_crossed: Table<u64>,
    pub sub: Table<Scaled>,
    pub sub_inverted: Table<Scaled>,
    pub sub_crossed: Table<Scaled>,
    pub mul: Table<u64>,
    pub div: Table<u64>,
}

impl Tables {
    pub fn build(lattice: &Lattice) -> Result<Self, EnvError> {
        let node = |k: usize| lattice.node(k);

        Ok(Self {
            add: carrying(lattice, Operator::Add, Carry::Up, |p, q| {
                Some((node(p) + node(q), p >= q))
            })?,
            add_inverted: carrying(lattice, Operator::AddInverted, Carry::Down, |p, q| {
                Some((1.0 / (1.0 / node(p) + 1.0 / node(q)), p <= q))
            })?,
            add_crossed: carrying(lattice, Operator::AddCrossed, Carry::Up, |p, q| {
                (q > 0).then(|| (node(p) + 1.0 / node(q), true))
            })?,
            sub: scaled(lattice, |p, q| (p > q).then(|| node(p) - node(q))),
            sub_inverted: scaled(lattice, |p, q| (p < q).then(|| 1.0 / node(p) - 1.0 / node(q))),
            sub_crossed: scaled(lattice, |p, q| (q > 0).then(|| node(p) - 1.0 / node(q))),
            mul: carrying(lattice, Operator::Mul, Carry::Up, |p, q| Some((node(p) * node(q), true)))?,
            div: carrying(lattice, Operator::Div, Carry::Down, |p, q| Some((node(p) / node(q), true)))?,
        })
    }
}

/// Build a table whose epoch change is implied by comparing the entry with
/// the outer operand. `value` yields the exact result and whether the pair is
/// one the arithmetic core actually looks up (only those are checked).
fn carrying(
    lattice: &Lattice,
    table: Operator,
    carry: Carry,
    value: impl Fn(usize, usize) -> Option<(f64, bool)>,
) -> Result<Table<u64>, EnvError> {
    let dimension = lattice.len();
    let mut data = Vec::with_capacity(dimension * dimension);

    for outer in 0..dimension {
        for inner in 0..dimension {
            let Some((exact, checked)) = value(outer, inner) else {
                data.push(0);
                continue;
            };
            let scaled = lattice.quantize(exact);
            if checked && !carry.holds(2 * outer as u64, scaled) {
                return Err(EnvError::TableInvariant { table, outer, inner });
            }
            data.push(scaled.lattice);
        }
    }

    Ok(Table::new(lattice.bits(), data))
}

/// Build a table that stores the epoch shift next to the lattice index.
fn scaled(lattice: &Lattice, value: impl Fn(usize, usize) -> Option<f64>) -> Table<Scaled> {
    let dimension = lattice.len();
    let mut data = Vec::with_capacity(dimension * dimension);

    for outer in 0..dimension {
        for inner in 0..dimension {
            let entry = value(outer, inner).map_or(Scaled::default(), |exact| lattice.quantize(exact));
            data.push(entry);
        }
    }

    Table::new(lattice.bits(), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sixteen() -> Lattice {
        Lattice::new(16.0, vec![1.0, 2.0, 8.0 / 3.0, 3.0, 4.0, 16.0 / 3.0, 6.0, 8.0]).unwrap()
    }

    #[test]
    fn test_addsub_index() {
        // 4 lattice bits: 8 matrix points per row.
        assert_eq!(addsub_index(4, 0, 0), 0);
        assert_eq!(addsub_index(4, 2, 0), 8);
        assert_eq!(addsub_index(4, 2, 6), 11);
        // The ulp bit is dropped.
        assert_eq!(addsub_index(4, 3, 7), 11);
        assert_eq!(addsub_index(4, 14, 14), 63);
    }

    #[test]
    fn test_add_table() {
        let tables = Tables::build(&sixteen()).unwrap();
        // 1 + 2 = 3
        assert_eq!(tables.add.at(1, 0), 6);
        // 3 + 3 = 6
        assert_eq!(tables.add.at(3, 3), 12);
        // 8 + 8 = 16, which wraps to node 0 of the next epoch
        assert_eq!(tables.add.at(7, 7), 0);
        // 4 + 1 = 5 lands between 4 and 16/3
        assert_eq!(tables.add.at(4, 0), 9);
    }

    #[test]
    fn test_add_inverted_table() {
        let tables = Tables::build(&sixteen()).unwrap();
        // 1/(1/8 + 1/8) = 4
        assert_eq!(tables.add_inverted.at(7, 7), 8);
        // 1/(1/1 + 1/1) = 1/2, scaled up by the stride to 8
        assert_eq!(tables.add_inverted.at(0, 0), 14);
    }

    #[test]
    fn test_sub_tables() {
        let tables = Tables::build(&sixteen()).unwrap();
        // 3 - 1 = 2
        assert_eq!(tables.sub.at(3, 0), Scaled::new(0, 2));
        // 3 - 8/3 = 1/3 = 16/3 / 16
        assert_eq!(tables.sub.at(3, 2), Scaled::new(-1, 10));
        // 1/2 - 1/4 = 1/4 = 4 / 16
        assert_eq!(tables.sub_inverted.at(1, 4), Scaled::new(-1, 8));
        // 1 - 1/2 = 1/2 = 8 / 16
        assert_eq!(tables.sub_crossed.at(0, 1), Scaled::new(-1, 14));
    }

    #[test]
    fn test_mul_div_tables() {
        let tables = Tables::build(&sixteen()).unwrap();
        // 2 * 3 = 6
        assert_eq!(tables.mul.at(1, 3), 12);
        // 4 * 8 = 32 = 2 * 16
        assert_eq!(tables.mul.at(4, 7), 2);
        // 6 / 3 = 2
        assert_eq!(tables.div.at(6, 3), 2);
        // 2 / 8 = 1/4 = 4 / 16
        assert_eq!(tables.div.at(1, 7), 8);
    }

    #[test]
    fn test_rows() {
        let tables = Tables::build(&sixteen()).unwrap();
        assert_eq!(tables.mul.len(), 64);
        assert_eq!(tables.mul.rows().count(), 8);
        assert!(tables.mul.rows().all(|row| row.len() == 8));
    }
}
