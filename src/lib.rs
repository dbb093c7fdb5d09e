//! # pbound: projective float and bound arithmetic
//!
//! **`pbound`** implements arithmetic over the *projective* real line: the reals plus a single point at infinity,
//! which closes the line into a circle. Numbers are fixed-width **projective floats** ([`PFloat`][crate::pfloat::PFloat])
//! and sets of numbers are **bounds** ([`PBound`][crate::bound::PBound]), arcs of the circle.
//!
//! ## Representation
//!
//! A projective float is a sign, an inversion flag, an *epoch* (a scale bracket, multiplying the magnitude by a fixed
//! *stride*) and a *lattice* index into a short list of representable magnitudes within one epoch.
//! The last bit of the lattice index marks a *ulp*: the open interval between two neighbouring nodes.
//! Magnitudes below one are stored through their reciprocal, so both `-x` and `1/x` are exact bit operations.
//!
//! ## Key Features
//!
//! - **Environment-Centric Architecture**: All width-dependent operations go through an immutable [`Env`][crate::env::Env],
//!   built once from an [`EnvConfig`][crate::env::EnvConfig] and shared by reference.
//! - **Exact where possible**: Sums, differences, products and quotients of exact floats are table lookups.
//! - **Sound otherwise**: Inexact operands are bracketed by their exact neighbours and the result is rounded outward.
//! - **Wrap-aware bounds**: Arcs passing through infinity are ordinary bounds, and results that sweep the whole circle
//!   widen to [`PBound::AllReals`][crate::bound::PBound::AllReals].
//!
//! ## Basic Usage
//!
//! ```rust
//! use pbound::bound::PBound;
//! use pbound::env::Env;
//!
//! // 1. Build the environment (8-bit floats over the stride-16 lattice)
//! let env = Env::default();
//!
//! // 2. Create bounds
//! let a = env.interval(env.from_i64(1), env.from_i64(2));
//! let b = env.interval(env.from_i64(3), env.from_i64(4));
//!
//! // 3. Add them: [1, 2] + [3, 4] = [4, 6]
//! let sum = env.add(&a, &b)?;
//! assert_eq!(sum, env.interval(env.from_i64(4), env.from_i64(6)));
//!
//! // 4. Infinity absorbs, and dividing by a bound around zero wraps through it
//! assert_eq!(env.add(&PBound::inf(), &a)?, PBound::inf());
//! let around_zero = env.interval(env.from_i64(-1), env.from_i64(1));
//! assert!(env.div(&a, &around_zero)?.rounds_inf());
//! # Ok::<(), pbound::error::ArithmeticError>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`env`]**: The [`Env`][crate::env::Env] and its configuration.
//! - **[`pfloat`]**: Projective floats and their encoding.
//! - **[`bound`]**: The four-state bound type.
//! - **[`add`]**, **[`sub`]**, **[`mul`]**, **[`div`]**: The arithmetic operators.
//! - **[`debug`]**: Unstable human-readable dumps.

pub mod add;
pub mod bound;
pub mod convert;
pub mod debug;
pub mod div;
pub mod env;
pub mod error;
pub mod lattice;
pub mod mul;
pub mod pfloat;
pub mod sub;
pub mod table;
