//! Interpolation on sorted grids.
//!
//! ## Available Interpolators
//!
//! - [`interpolate_clamped`]: Piecewise linear interpolation over borrowed
//!   slices that clamps to the end values outside the grid
//!
//! Functions are generic over `T: num_traits::Float`.
//!
//! ## Example
//!
//! ```
//! use pricer_core::math::interpolators::interpolate_clamped;
//!
//! let xs = [0.0_f64, 1.0, 2.0, 3.0];
//! let ys = [0.0, 1.0, 4.0, 9.0];
//!
//! let y = interpolate_clamped(&xs, &ys, 1.5).unwrap();
//! assert!((y - 2.5).abs() < 1e-10);
//!
//! // Outside the grid the end values are returned unchanged
//! assert_eq!(interpolate_clamped(&xs, &ys, -4.0).unwrap(), 0.0);
//! assert_eq!(interpolate_clamped(&xs, &ys, 7.0).unwrap(), 9.0);
//! ```

mod linear;

pub use linear::interpolate_clamped;
