//! Debug utilities for inspecting floats, bounds and tables.
//!
//! The output format of this module is not stable and may change at any time.
//! It is meant for tests, logs and interactive exploration.

use std::fmt::Write;

use crate::bound::PBound;
use crate::env::Env;
use crate::pfloat::{PFloat, Parts};
use crate::table::{Operator, Table};

/// Real value a float stands for.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FloatValue {
    Exact(f64),
    /// Open interval between the neighbouring exact values of a ulp.
    Between(f64, f64),
}

/// Detailed information about a single float.
#[derive(Debug, Clone)]
pub struct FloatInfo {
    pub float: PFloat,
    /// Decoded fields (None for zero and infinity)
    pub parts: Option<Parts>,
    pub value: FloatValue,
}

fn fmt_value(f: &mut std::fmt::Formatter<'_>, x: f64) -> std::fmt::Result {
    if x.is_infinite() {
        write!(f, "∞")
    } else {
        write!(f, "{}", x)
    }
}

impl std::fmt::Display for FloatInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            FloatValue::Exact(x) => fmt_value(f, x),
            FloatValue::Between(lo, hi) => {
                write!(f, "(")?;
                fmt_value(f, lo)?;
                write!(f, ", ")?;
                fmt_value(f, hi)?;
                write!(f, ")")
            }
        }
    }
}

impl Env {
    /// Get detailed information about a single float.
    pub fn float_info(&self, x: PFloat) -> FloatInfo {
        let value = match self.to_f64(x) {
            Some(v) => FloatValue::Exact(v),
            None => {
                // Neighbours of a ulp are always exact.
                let lo = self.to_f64(self.prev(x)).unwrap_or(f64::NAN);
                let hi = self.to_f64(self.next(x)).unwrap_or(f64::NAN);
                FloatValue::Between(lo, hi)
            }
        };

        FloatInfo {
            float: x,
            parts: self.decode(x),
            value,
        }
    }

    /// Human-readable value of a float, e.g. `3` or `(4, 5.333333333333333)`.
    pub fn describe_float(&self, x: PFloat) -> String {
        self.float_info(x).to_string()
    }

    /// Human-readable contents of a bound.
    pub fn describe(&self, bound: &PBound) -> String {
        match *bound {
            PBound::Empty => "∅".to_string(),
            PBound::Singleton(x) => format!("{{{}}}", self.describe_float(x)),
            PBound::Interval(l, u) => {
                let mut result = format!("[{}, {}]", self.describe_float(l), self.describe_float(u));
                if bound.rounds_inf() {
                    result.push_str(" through ∞");
                }
                result
            }
            PBound::AllReals => "ℝ ∪ {∞}".to_string(),
        }
    }

    /// Dump every operator table, one row per outer matrix point.
    pub fn dump_tables(&self) -> String {
        let mut result = String::new();
        let tables = self.tables();

        writeln!(&mut result, "=== Tables ({:?}) ===", self).unwrap();
        for op in Operator::ALL {
            match op {
                Operator::Add => dump_table(&mut result, op, &tables.add, |x| x.to_string()),
                Operator::AddInverted => dump_table(&mut result, op, &tables.add_inverted, |x| x.to_string()),
                Operator::AddCrossed => dump_table(&mut result, op, &tables.add_crossed, |x| x.to_string()),
                Operator::Sub => dump_table(&mut result, op, &tables.sub, |x| format!("{}:{}", x.shift, x.lattice)),
                Operator::SubInverted => {
                    dump_table(&mut result, op, &tables.sub_inverted, |x| format!("{}:{}", x.shift, x.lattice))
                }
                Operator::SubCrossed => {
                    dump_table(&mut result, op, &tables.sub_crossed, |x| format!("{}:{}", x.shift, x.lattice))
                }
                Operator::Mul => dump_table(&mut result, op, &tables.mul, |x| x.to_string()),
                Operator::Div => dump_table(&mut result, op, &tables.div, |x| x.to_string()),
            }
        }
        result
    }
}

fn dump_table<T: Copy>(result: &mut String, op: Operator, table: &Table<T>, cell: impl Fn(&T) -> String) {
    writeln!(result, "{}:", op).unwrap();
    for (outer, row) in table.rows().enumerate() {
        let cells: Vec<String> = row.iter().map(&cell).collect();
        writeln!(result, "  {:>3}: {}", outer, cells.join(" ")).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_info() {
        let env = Env::default();
        let three = env.from_f64(3.0).unwrap();
        let info = env.float_info(three);
        assert_eq!(info.value, FloatValue::Exact(3.0));
        assert_eq!(info.parts.map(|p| p.lattice), Some(6));

        let info = env.float_info(env.next(PFloat::ONE));
        assert_eq!(info.value, FloatValue::Between(1.0, 2.0));
        assert_eq!(info.to_string(), "(1, 2)");

        let info = env.float_info(PFloat::INF);
        assert!(info.parts.is_none());
        assert_eq!(info.to_string(), "∞");
    }

    #[test]
    fn test_describe() {
        let env = Env::default();
        let bound = PBound::Interval(env.from_f64(4.0).unwrap(), env.from_f64(-4.0).unwrap());
        assert_eq!(env.describe(&bound), "[4, -4] through ∞");
        assert_eq!(env.describe(&PBound::one()), "{1}");
        assert_eq!(env.describe(&PBound::Empty), "∅");
        assert_eq!(env.describe(&PBound::single(env.prev(PFloat::INF))), "{(32768, ∞)}");
    }

    #[test]
    fn test_dump_tables() {
        let env = Env::new(crate::env::EnvConfig::binary()).unwrap();
        let dump = env.dump_tables();
        for op in Operator::ALL {
            assert!(dump.contains(&format!("{}:", op)), "Expected {} in: {}", op, dump);
        }
        // Two matrix points: two rows per table.
        assert_eq!(dump.lines().filter(|l| l.starts_with("    0:")).count(), 8);
    }
}
