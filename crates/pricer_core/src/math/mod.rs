//! Numerical building blocks.
//!
//! - [`solvers`]: bracketing root finders
//! - [`interpolators`]: interpolation on sorted grids

pub mod interpolators;
pub mod solvers;
