//! # grade-ops
//!
//! Image processing stages for the grade-rs color pipeline.
//!
//! Every stage here follows the same contract: it consumes an
//! [`ImageBuf`](grade_core::ImageBuf) by mutable reference, rewrites the
//! sample buffer in place, and reports failures only for configuration
//! mistakes, never from the per-pixel path.
//!
//! # Modules
//!
//! - [`lookup`] - Arbitrary color transforms via a cached 3D LUT
//!
//! # Example
//!
//! ```rust
//! use grade_core::ImageBuf;
//! use grade_ops::LookupFilter;
//!
//! let mut filter = LookupFilter::new(17)
//!     .unwrap()
//!     .with_transform(|r, g, b| [1.0 - r, 1.0 - g, 1.0 - b]);
//!
//! let mut image = ImageBuf::filled(2, 2, 3, 255.0, &[255.0, 255.0, 255.0]).unwrap();
//! filter.process(&mut image).unwrap();
//! assert_eq!(image.pixel(0, 0), &[0.0, 0.0, 0.0]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod lookup;

pub use error::{OpsError, OpsResult};
pub use lookup::{LookupFilter, TransformFn};
