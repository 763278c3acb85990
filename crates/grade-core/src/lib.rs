//! # grade-core
//!
//! Core types for the grade-rs color pipeline.
//!
//! This crate provides the foundational types the pipeline stages operate on:
//!
//! - [`ImageBuf`] - Flat sample buffer with per-channel numeric range
//! - [`Error`], [`Result`] - Shared error handling
//!
//! ## Design
//!
//! Pipeline stages consume images through a deliberately small contract: a
//! mutable flat buffer of `f32` samples, a components-per-pixel count, and
//! the maximum representable component value (255.0 for 8-bit sources,
//! 65535.0 for 16-bit, and so on). Everything a stage needs, nothing it
//! doesn't.
//!
//! ```text
//! grade-core (this crate)
//!    ^
//!    |
//!    +-- grade-lut (3D LUT construction and sampling)
//!    +-- grade-ops (pipeline filter stages)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::ImageBuf;
