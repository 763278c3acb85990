//! # grade-lut
//!
//! 3D Look-Up Table construction and sampling for color pipelines.
//!
//! A 3D LUT approximates an arbitrary color transform by sampling it on a
//! uniform RGB cube once, then evaluating the cube with trilinear
//! interpolation per pixel. This turns any transform, however expensive,
//! into a near-constant-cost per-pixel operation.
//!
//! # Usage
//!
//! ```rust
//! use grade_lut::Lut3D;
//!
//! // Bake an inversion transform into a 17^3 cube
//! let lut = Lut3D::from_fn(17, |r, g, b| [1.0 - r, 1.0 - g, 1.0 - b]).unwrap();
//!
//! // Single normalized color
//! let out = lut.apply([0.25, 0.5, 0.75]);
//! assert!((out[0] - 0.75).abs() < 1e-5);
//!
//! // Whole 8-bit RGBA buffer, in place; alpha passes through
//! let mut buffer = vec![255.0, 0.0, 0.0, 128.0];
//! lut.apply_slice(&mut buffer, 4, 255.0);
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - Error handling
//!
//! # Used By
//!
//! - `grade-ops` - The lookup-table filter stage

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod lut3d;

pub use error::{LutError, LutResult};
pub use lut3d::{AxisParam, Lut3D};
