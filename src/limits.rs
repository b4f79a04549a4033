use crate::error::PlaneError;
use crate::pixel::PixelLayout;
use crate::spec::CanvasSize;

/// Caps on the canvas a reader may allocate.
///
/// Checked once per read, after the sub-image table is validated and before
/// any plane is acquired. All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Widest canvas accepted.
    pub max_width: Option<u64>,
    /// Tallest canvas accepted.
    pub max_height: Option<u64>,
    /// Maximum canvas area (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size of the output buffer in the requested pixel layout.
    pub max_memory_bytes: Option<u64>,
}

fn exceeded(what: &str, value: u64, max: u64) -> PlaneError {
    PlaneError::LimitExceeded(alloc::format!("canvas {what} {value} exceeds limit {max}"))
}

impl Limits {
    /// Check a canvas of `size` stored as `layout` pixels.
    ///
    /// Returns the pixel count to allocate. Sizes that overflow `usize` are
    /// [`PlaneError::DimensionsTooLarge`] regardless of the limits.
    pub(crate) fn check_canvas(
        &self,
        size: CanvasSize,
        layout: PixelLayout,
    ) -> Result<usize, PlaneError> {
        let CanvasSize { width, height } = size;
        let area = u64::from(width) * u64::from(height);
        for (what, value, max) in [
            ("width", u64::from(width), self.max_width),
            ("height", u64::from(height), self.max_height),
            ("area", area, self.max_pixels),
        ] {
            if let Some(max) = max.filter(|&max| value > max) {
                return Err(exceeded(what, value, max));
            }
        }

        let too_large = || PlaneError::DimensionsTooLarge { width, height };
        let count = usize::try_from(area).map_err(|_| too_large())?;
        let bytes = count
            .checked_mul(layout.bytes_per_pixel())
            .ok_or_else(too_large)?;
        if let Some(max) = self.max_memory_bytes.filter(|&max| bytes as u64 > max) {
            return Err(exceeded("buffer bytes", bytes as u64, max));
        }
        Ok(count)
    }
}
