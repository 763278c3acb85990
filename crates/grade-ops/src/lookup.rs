//! Color lookup-table filter stage.
//!
//! Applies an arbitrary color transform to an image by baking the transform
//! into a 3D LUT once, then sampling the LUT per pixel with trilinear
//! interpolation. The bake costs O(resolution^3) transform calls; the
//! per-pixel cost is constant no matter how expensive the transform is,
//! which is what makes this the standard vehicle for color grading.
//!
//! The baked grid is cached across [`LookupFilter::process`] calls and only
//! rebuilt after the resolution or the transform changes.

use grade_core::ImageBuf;
use grade_lut::Lut3D;
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Color transform baked into the LUT.
///
/// Maps three normalized channel values in [0, 1] to an output color.
/// Output channels may lie outside [0, 1]; they are clamped at bake time.
pub type TransformFn = Box<dyn Fn(f32, f32, f32) -> [f32; 3] + Send + Sync>;

/// Pipeline stage applying a color transform through a cached 3D LUT.
///
/// # Lifecycle
///
/// The filter tracks a staleness flag. Construction and every configuration
/// change mark the grid stale; the next [`process`](Self::process) call
/// rebuilds it before the pixel pass, and subsequent calls reuse it. With no
/// transform configured the filter passes images through unchanged, unless a
/// grid from an earlier configuration is still cached.
///
/// # Concurrency
///
/// `process` takes `&mut self`, so a rebuild can never race an in-flight
/// pixel pass on the same filter.
///
/// # Example
///
/// ```rust
/// use grade_core::ImageBuf;
/// use grade_ops::LookupFilter;
///
/// // Expensive-per-call transform, paid once per grid node
/// let mut filter = LookupFilter::new(33)
///     .unwrap()
///     .with_transform(|r, g, b| [r.powf(1.0 / 2.2), g.powf(1.0 / 2.2), b.powf(1.0 / 2.2)]);
///
/// let mut image = ImageBuf::filled(4, 4, 3, 255.0, &[51.0, 51.0, 51.0]).unwrap();
/// filter.process(&mut image).unwrap();
/// assert!(image.pixel(0, 0)[0] > 51.0);
/// ```
pub struct LookupFilter {
    /// Grid side length, >= 2
    resolution: usize,
    /// Transform to bake; `None` leaves the filter a pass-through
    transform: Option<TransformFn>,
    /// Cached grid from the last bake
    lut: Option<Lut3D>,
    /// Grid no longer reflects the configuration
    stale: bool,
}

impl LookupFilter {
    /// Creates a filter with the given grid resolution and no transform.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] if `resolution < 2`.
    pub fn new(resolution: usize) -> OpsResult<Self> {
        validate_resolution(resolution)?;
        Ok(Self {
            resolution,
            transform: None,
            lut: None,
            stale: true,
        })
    }

    /// Sets the transform, builder style.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(f32, f32, f32) -> [f32; 3] + Send + Sync + 'static,
    {
        self.set_transform(transform);
        self
    }

    /// Sets the transform and marks the grid stale.
    pub fn set_transform<F>(&mut self, transform: F)
    where
        F: Fn(f32, f32, f32) -> [f32; 3] + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self.stale = true;
    }

    /// Removes the transform.
    ///
    /// A grid baked from the previous transform stays cached and keeps being
    /// applied; call [`take_lut`](Self::take_lut) as well to turn the filter
    /// into a pass-through.
    pub fn clear_transform(&mut self) {
        self.transform = None;
        self.stale = true;
    }

    /// Changes the grid resolution and marks the grid stale.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] if `resolution < 2`; the
    /// previous resolution is kept.
    pub fn set_resolution(&mut self, resolution: usize) -> OpsResult<()> {
        validate_resolution(resolution)?;
        if resolution != self.resolution {
            self.resolution = resolution;
            self.stale = true;
        }
        Ok(())
    }

    /// Returns the configured grid resolution.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Returns `true` if the next [`process`](Self::process) call will
    /// rebuild the grid (given a transform is configured).
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns the cached grid, if one has been built.
    #[inline]
    pub fn lut(&self) -> Option<&Lut3D> {
        self.lut.as_ref()
    }

    /// Removes and returns the cached grid, marking the filter stale.
    pub fn take_lut(&mut self) -> Option<Lut3D> {
        self.stale = true;
        self.lut.take()
    }

    /// Processes an image in place.
    ///
    /// Rebuilds the grid first if the configuration changed since the last
    /// build and a transform is present. Applies the grid (fresh or cached)
    /// to every pixel; with no grid at all the image passes through
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::ChannelMismatch`] if the grid would be applied to
    /// an image with fewer than 3 components per pixel. The check runs
    /// before the O(resolution^3) bake; the pixel pass itself cannot fail.
    pub fn process(&mut self, image: &mut ImageBuf) -> OpsResult<()> {
        let will_apply = self.lut.is_some() || self.transform.is_some();
        if !will_apply {
            return Ok(());
        }
        if image.channels() < 3 {
            return Err(OpsError::ChannelMismatch {
                expected: 3,
                got: image.channels(),
            });
        }

        if self.stale {
            if let Some(transform) = &self.transform {
                debug!(resolution = self.resolution, "building lookup table");
                self.lut = Some(Lut3D::from_fn(self.resolution, |r, g, b| transform(r, g, b))?);
                self.stale = false;
            }
        }

        if let Some(lut) = &self.lut {
            trace!(
                pixels = image.pixel_count(),
                channels = image.channels(),
                size = lut.size(),
                "lookup pass"
            );
            let channels = image.channels();
            let max_value = image.max_value();
            lut.apply_slice(image.data_mut(), channels, max_value);
        }

        Ok(())
    }
}

impl std::fmt::Debug for LookupFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupFilter")
            .field("resolution", &self.resolution)
            .field("has_transform", &self.transform.is_some())
            .field("has_lut", &self.lut.is_some())
            .field("stale", &self.stale)
            .finish()
    }
}

fn validate_resolution(resolution: usize) -> OpsResult<()> {
    if resolution < 2 {
        return Err(OpsError::InvalidParameter(format!(
            "LUT resolution must be >= 2, got {resolution}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn invert(r: f32, g: f32, b: f32) -> [f32; 3] {
        [1.0 - r, 1.0 - g, 1.0 - b]
    }

    #[test]
    fn rejects_degenerate_resolution() {
        assert!(LookupFilter::new(0).is_err());
        assert!(LookupFilter::new(1).is_err());
        assert!(LookupFilter::new(2).is_ok());
    }

    #[test]
    fn set_resolution_keeps_old_value_on_error() {
        let mut filter = LookupFilter::new(17).unwrap();
        assert!(filter.set_resolution(1).is_err());
        assert_eq!(filter.resolution(), 17);
    }

    #[test]
    fn unconfigured_filter_is_pass_through() {
        let mut filter = LookupFilter::new(17).unwrap();
        let mut image = ImageBuf::filled(3, 2, 4, 255.0, &[12.0, 34.0, 56.0, 78.0]).unwrap();
        let before = image.data().to_vec();
        filter.process(&mut image).unwrap();
        assert_eq!(image.data(), &before[..]);
        assert!(filter.lut().is_none());
    }

    #[test]
    fn inversion_end_to_end() {
        let mut filter = LookupFilter::new(2).unwrap().with_transform(invert);
        let mut image = ImageBuf::new(1, 1, 3, 255.0).unwrap();
        filter.process(&mut image).unwrap();
        assert_eq!(image.pixel(0, 0), &[255.0, 255.0, 255.0]);
    }

    #[test]
    fn alpha_passes_through() {
        let mut filter = LookupFilter::new(2).unwrap().with_transform(invert);
        let mut image = ImageBuf::filled(2, 2, 4, 255.0, &[255.0, 0.0, 255.0, 200.0]).unwrap();
        filter.process(&mut image).unwrap();
        assert_eq!(image.pixel(1, 1), &[0.0, 255.0, 0.0, 200.0]);
    }

    #[test]
    fn rejects_too_few_channels() {
        let mut filter = LookupFilter::new(2).unwrap().with_transform(invert);
        let mut image = ImageBuf::new(4, 4, 2, 255.0).unwrap();
        let err = filter.process(&mut image).unwrap_err();
        assert!(matches!(err, OpsError::ChannelMismatch { expected: 3, got: 2 }));
        // The bake must not have run either.
        assert!(filter.lut().is_none());
    }

    #[test]
    fn grid_is_cached_across_process_calls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut filter = LookupFilter::new(4).unwrap().with_transform(move |r, g, b| {
            counter.fetch_add(1, Ordering::Relaxed);
            [r, g, b]
        });

        let mut image = ImageBuf::new(8, 8, 3, 255.0).unwrap();
        filter.process(&mut image).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 64);
        assert!(!filter.is_stale());

        filter.process(&mut image).unwrap();
        filter.process(&mut image).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 64);
    }

    #[test]
    fn configuration_change_triggers_rebuild() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut filter = LookupFilter::new(2).unwrap().with_transform(move |r, g, b| {
            counter.fetch_add(1, Ordering::Relaxed);
            [r, g, b]
        });

        let mut image = ImageBuf::new(1, 1, 3, 255.0).unwrap();
        filter.process(&mut image).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 8);

        filter.set_resolution(3).unwrap();
        assert!(filter.is_stale());
        filter.process(&mut image).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 8 + 27);

        // Same resolution again: no rebuild.
        filter.set_resolution(3).unwrap();
        filter.process(&mut image).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 8 + 27);
    }

    #[test]
    fn cached_grid_survives_clearing_the_transform() {
        let mut filter = LookupFilter::new(2).unwrap().with_transform(invert);
        let mut image = ImageBuf::new(1, 1, 3, 255.0).unwrap();
        filter.process(&mut image).unwrap();
        assert_eq!(image.pixel(0, 0), &[255.0, 255.0, 255.0]);

        filter.clear_transform();
        filter.process(&mut image).unwrap();
        // Applied the cached inversion grid again.
        assert_eq!(image.pixel(0, 0), &[0.0, 0.0, 0.0]);

        filter.take_lut();
        let before = image.data().to_vec();
        filter.process(&mut image).unwrap();
        assert_eq!(image.data(), &before[..]);
    }

    #[test]
    fn identity_transform_approximates_identity() {
        let mut filter = LookupFilter::new(33)
            .unwrap()
            .with_transform(|r, g, b| [r, g, b]);
        let mut image = ImageBuf::from_data(
            2,
            2,
            3,
            255.0,
            vec![
                0.0, 255.0, 17.0, //
                101.0, 202.0, 33.0, //
                64.0, 128.0, 192.0, //
                5.0, 250.0, 127.0,
            ],
        )
        .unwrap();
        let before = image.data().to_vec();
        filter.process(&mut image).unwrap();
        for (out, src) in image.data().iter().zip(&before) {
            assert!((out - src).abs() < 0.01, "{out} vs {src}");
        }
    }
}
