//! Core error types shared by every layer.
//!
//! This module provides:
//! - `error`: Structured error types for pricing, interpolation, and solver operations
//!
//! # Re-exports
//!
//! [`PricingError`], [`InterpolationError`], [`SolverError`] from `error`

pub mod error;

pub use error::{InterpolationError, PricingError, SolverError};
