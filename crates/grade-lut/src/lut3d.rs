//! 3-dimensional lookup table.
//!
//! A 3D LUT maps RGB input to RGB output through a cube of color values.
//! Common uses include:
//! - Color grading / Look development
//! - Display calibration
//! - Baking expensive color transforms into a fixed-cost lookup

use crate::{LutError, LutResult};

/// A 3-dimensional lookup table with trilinear sampling.
///
/// Stores a cube of RGB values indexed by input RGB. Common sizes are
/// 17x17x17, 33x33x33, or 65x65x65.
///
/// # Structure
///
/// - `size^3` grid nodes, three values each, as one flat `f32` buffer
/// - R-major order: R varies fastest, then G, then B; the node at
///   `(r, g, b)` starts at flat offset `(r + g*size + b*size^2) * 3`
/// - Every stored value is clamped into [0, 1] at construction
///
/// # Example
///
/// ```rust
/// use grade_lut::Lut3D;
///
/// // Bake a gamma transform into a cube
/// let lut = Lut3D::from_fn(33, |r, g, b| [r.powf(2.2), g.powf(2.2), b.powf(2.2)]).unwrap();
///
/// let out = lut.apply([0.5, 0.5, 0.5]);
/// assert!((out[0] - 0.5f32.powf(2.2)).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct Lut3D {
    /// Flat node data, `size^3 * 3` values, R-major
    data: Vec<f32>,
    /// Cube side length
    size: usize,
}

impl Lut3D {
    /// Builds a LUT by sampling a color transform on a uniform grid.
    ///
    /// The transform is called `size^3` times with normalized coordinates
    /// `i / (size - 1)` per axis, spanning [0, 1] inclusive at both ends.
    /// Returned channels are clamped into [0, 1] before storage, so the
    /// transform may produce out-of-range values freely.
    ///
    /// Building is the expensive step; sampling a built LUT costs the same
    /// regardless of what the transform does.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidSize`] if `size < 2`. A single sample per
    /// axis cannot support interpolation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grade_lut::Lut3D;
    ///
    /// let invert = Lut3D::from_fn(17, |r, g, b| [1.0 - r, 1.0 - g, 1.0 - b]).unwrap();
    /// let out = invert.apply([1.0, 1.0, 1.0]);
    /// assert_eq!(out, [0.0, 0.0, 0.0]);
    /// ```
    pub fn from_fn<F>(size: usize, mut transform: F) -> LutResult<Self>
    where
        F: FnMut(f32, f32, f32) -> [f32; 3],
    {
        if size < 2 {
            return Err(LutError::InvalidSize(format!(
                "size must be >= 2, got {size}"
            )));
        }

        let scale = 1.0 / (size - 1) as f32;
        let mut data = Vec::with_capacity(size * size * size * 3);

        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    let out = transform(r as f32 * scale, g as f32 * scale, b as f32 * scale);
                    data.push(out[0].clamp(0.0, 1.0));
                    data.push(out[1].clamp(0.0, 1.0));
                    data.push(out[2].clamp(0.0, 1.0));
                }
            }
        }

        Ok(Self { data, size })
    }

    /// Creates an identity (pass-through) LUT.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grade_lut::Lut3D;
    ///
    /// let lut = Lut3D::identity(17).unwrap();
    /// let out = lut.apply([0.5, 0.3, 0.8]);
    /// assert!((out[0] - 0.5).abs() < 1e-5);
    /// ```
    pub fn identity(size: usize) -> LutResult<Self> {
        Self::from_fn(size, |r, g, b| [r, g, b])
    }

    /// Creates a LUT from precomputed node data.
    ///
    /// `data` must hold exactly `size^3 * 3` values in R-major order.
    /// Values are clamped into [0, 1] like built ones, keeping the cube
    /// well-formed regardless of the source.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::InvalidSize`] if `size < 2` or the data length
    /// doesn't match.
    pub fn from_data(data: Vec<f32>, size: usize) -> LutResult<Self> {
        if size < 2 {
            return Err(LutError::InvalidSize(format!(
                "size must be >= 2, got {size}"
            )));
        }
        let expected = size * size * size * 3;
        if data.len() != expected {
            return Err(LutError::InvalidSize(format!(
                "expected {} values for size {}, got {}",
                expected,
                size,
                data.len()
            )));
        }
        let mut data = data;
        for v in &mut data {
            *v = v.clamp(0.0, 1.0);
        }
        Ok(Self { data, size })
    }

    /// Returns the cube side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the total number of grid nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.size * self.size * self.size
    }

    /// Returns the flat node data, `size^3 * 3` values in R-major order.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the flat offset of the node at grid position (r, g, b).
    #[inline]
    fn index(&self, r: usize, g: usize, b: usize) -> usize {
        (r + g * self.size + b * self.size * self.size) * 3
    }

    /// Samples the LUT at a normalized RGB value.
    ///
    /// Input channels are expected in [0, 1]; out-of-range values clamp to
    /// the cube faces. Output channels are always in [0, 1].
    ///
    /// # Example
    ///
    /// ```rust
    /// use grade_lut::Lut3D;
    ///
    /// let lut = Lut3D::identity(33).unwrap();
    /// let out = lut.apply([0.5, 0.3, 0.2]);
    /// assert!((out[1] - 0.3).abs() < 1e-5);
    /// ```
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let max_index = self.size - 1;
        let n = max_index as f32;
        self.sample(
            AxisParam::new(rgb[0] * n, max_index),
            AxisParam::new(rgb[1] * n, max_index),
            AxisParam::new(rgb[2] * n, max_index),
        )
    }

    /// Applies the LUT to a flat sample buffer in place.
    ///
    /// `buffer` holds pixels of `channels` samples each in the range
    /// `[0, max_value]`. The first three samples of every pixel are
    /// transformed; any further samples (alpha, ...) pass through untouched,
    /// as does a trailing partial pixel.
    ///
    /// This is the per-pixel hot loop. It cannot fail: out-of-range samples
    /// clamp to the cube faces, and the caller validates `channels >= 3`
    /// and `max_value > 0` before the pass.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grade_lut::Lut3D;
    ///
    /// let invert = Lut3D::from_fn(2, |r, g, b| [1.0 - r, 1.0 - g, 1.0 - b]).unwrap();
    /// let mut buffer = vec![255.0, 0.0, 0.0, 128.0];
    /// invert.apply_slice(&mut buffer, 4, 255.0);
    /// assert_eq!(buffer, vec![0.0, 255.0, 255.0, 128.0]);
    /// ```
    pub fn apply_slice(&self, buffer: &mut [f32], channels: usize, max_value: f32) {
        debug_assert!(channels >= 3, "apply_slice needs at least RGB");
        debug_assert!(max_value > 0.0, "max_value must be positive");

        let max_index = self.size - 1;
        let scale = (1.0 / max_value) * max_index as f32;

        for pixel in buffer.chunks_exact_mut(channels) {
            let pr = AxisParam::new(pixel[0] * scale, max_index);
            let pg = AxisParam::new(pixel[1] * scale, max_index);
            let pb = AxisParam::new(pixel[2] * scale, max_index);

            let out = self.sample(pr, pg, pb);

            pixel[0] = out[0] * max_value;
            pixel[1] = out[1] * max_value;
            pixel[2] = out[2] * max_value;
        }
    }

    /// Blends the 8 nodes of the cell selected by the per-axis parameters.
    ///
    /// Corner weights are the products of the per-axis weight pairs, so they
    /// are non-negative and sum to 1; with every node in [0, 1] the blend
    /// stays in [0, 1].
    fn sample(&self, pr: AxisParam, pg: AxisParam, pb: AxisParam) -> [f32; 3] {
        let o000 = self.index(pr.lo, pg.lo, pb.lo);
        let o100 = self.index(pr.hi, pg.lo, pb.lo);
        let o010 = self.index(pr.lo, pg.hi, pb.lo);
        let o110 = self.index(pr.hi, pg.hi, pb.lo);
        let o001 = self.index(pr.lo, pg.lo, pb.hi);
        let o101 = self.index(pr.hi, pg.lo, pb.hi);
        let o011 = self.index(pr.lo, pg.hi, pb.hi);
        let o111 = self.index(pr.hi, pg.hi, pb.hi);

        let w000 = pr.w_lo * pg.w_lo * pb.w_lo;
        let w100 = pr.w_hi * pg.w_lo * pb.w_lo;
        let w010 = pr.w_lo * pg.w_hi * pb.w_lo;
        let w110 = pr.w_hi * pg.w_hi * pb.w_lo;
        let w001 = pr.w_lo * pg.w_lo * pb.w_hi;
        let w101 = pr.w_hi * pg.w_lo * pb.w_hi;
        let w011 = pr.w_lo * pg.w_hi * pb.w_hi;
        let w111 = pr.w_hi * pg.w_hi * pb.w_hi;

        let d = &self.data;
        let mut out = [0.0f32; 3];
        for (c, v) in out.iter_mut().enumerate() {
            *v = d[o000 + c] * w000
                + d[o100 + c] * w100
                + d[o010 + c] * w010
                + d[o110 + c] * w110
                + d[o001 + c] * w001
                + d[o101 + c] * w101
                + d[o011 + c] * w011
                + d[o111 + c] * w111;
        }
        out
    }
}

/// Per-axis interpolation parameter.
///
/// For a coordinate scaled into grid-index space, holds the two enclosing
/// node indices and the linear weight pair: `w_lo = hi - scaled`,
/// `w_hi = 1 - w_lo`. Both weights lie in [0, 1] and sum to 1. A coordinate
/// landing exactly on a node gives `lo == hi`, collapsing the blend to that
/// single node with full weight.
#[derive(Debug, Clone, Copy)]
pub struct AxisParam {
    /// Lower enclosing node index
    pub lo: usize,
    /// Upper enclosing node index
    pub hi: usize,
    /// Weight of the lower node
    pub w_lo: f32,
    /// Weight of the upper node
    pub w_hi: f32,
}

impl AxisParam {
    /// Computes the parameter for a scaled coordinate.
    ///
    /// `scaled` is clamped into `[0, max_index]` first, so samples outside
    /// the nominal range land on the cube faces instead of indexing out of
    /// bounds.
    #[inline]
    pub fn new(scaled: f32, max_index: usize) -> Self {
        let s = scaled.clamp(0.0, max_index as f32);
        let hi = s.ceil();
        let w_lo = hi - s;
        Self {
            lo: s.floor() as usize,
            hi: hi as usize,
            w_lo,
            w_hi: 1.0 - w_lo,
        }
    }
}
