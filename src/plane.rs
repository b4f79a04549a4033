//! Borrowed, bounds-checked views of one component's samples.
//!
//! A plane is addressed by stride arithmetic from its lower-left sample:
//! sample `(x, y)` starts at `origin + x * pixel_stride + y * row_stride`
//! bytes into the borrowed buffer, with `y` counting rows upward. Strides may
//! be negative, so top-down and mirrored buffers need no copy.

use crate::error::{PlaneError, SpecField};

/// Byte order of multi-byte samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Byte order of the target platform.
    pub const NATIVE: Endian = if cfg!(target_endian = "big") {
        Endian::Big
    } else {
        Endian::Little
    };
}

/// Memory layout of one plane, independent of the buffer it describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Byte offset of the lower-left sample.
    pub origin: usize,
    /// Bytes per sample (1 to 4).
    pub pixel_size: usize,
    /// Byte step from one sample to the next within a row.
    pub pixel_stride: isize,
    /// Byte step from one row to the row above it.
    pub row_stride: isize,
    pub endian: Endian,
}

impl PlaneLayout {
    /// A tightly packed bottom-up plane of `width` samples per row.
    pub fn packed(pixel_size: usize, width: u32) -> Self {
        let pixel_stride = pixel_size as isize;
        Self {
            origin: 0,
            pixel_size,
            pixel_stride,
            row_stride: pixel_stride.saturating_mul(width as isize),
            endian: Endian::NATIVE,
        }
    }

    pub fn with_origin(mut self, origin: usize) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_strides(mut self, pixel_stride: isize, row_stride: isize) -> Self {
        self.pixel_stride = pixel_stride;
        self.row_stride = row_stride;
        self
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Reinterpret a layout whose first row is the top row of a `height`-row
    /// image, so that row 0 becomes the bottom row.
    pub fn flipped(mut self, height: u32) -> Self {
        if height > 0 {
            let shift = self.row_stride.saturating_mul(height as isize - 1);
            // A negative result wraps to an offset that `check` rejects.
            self.origin = (self.origin as isize).saturating_add(shift) as usize;
            self.row_stride = -self.row_stride;
        }
        self
    }
}

/// A decoder-owned plane lent to the conversion engine between
/// `acquire_planes` and `release_planes`.
#[derive(Clone, Copy, Debug)]
pub struct PlaneDescriptor<'a> {
    data: &'a [u8],
    layout: PlaneLayout,
}

impl<'a> PlaneDescriptor<'a> {
    pub fn new(data: &'a [u8], layout: PlaneLayout) -> Self {
        Self { data, layout }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn layout(&self) -> &PlaneLayout {
        &self.layout
    }

    /// Check that a `width x height` rectangle of `bits`-bit samples can be
    /// read from this plane without leaving the buffer.
    pub(crate) fn check(
        &self,
        index: usize,
        width: u32,
        height: u32,
        bits: u32,
    ) -> Result<(), PlaneError> {
        let l = &self.layout;
        if !(1..=4).contains(&l.pixel_size) {
            return Err(PlaneError::format(
                index,
                SpecField::PixelSize,
                alloc::format!("{} byte samples are not supported", l.pixel_size),
            ));
        }
        if bits as usize > l.pixel_size * 8 {
            return Err(PlaneError::format(
                index,
                SpecField::BitsPerComponent,
                alloc::format!("{bits} bits do not fit in {} byte samples", l.pixel_size),
            ));
        }
        if width == 0 || height == 0 {
            return Ok(());
        }

        // Addressing is affine, so the extremes are at the corners.
        let last_x = i128::from(width - 1) * l.pixel_stride as i128;
        let last_y = i128::from(height - 1) * l.row_stride as i128;
        let origin = l.origin as i128;
        let corners = [origin, origin + last_x, origin + last_y, origin + last_x + last_y];
        let lowest = corners.iter().copied().min().unwrap_or(origin);
        let highest = corners.iter().copied().max().unwrap_or(origin);
        if lowest < 0 || highest + l.pixel_size as i128 > self.data.len() as i128 {
            return Err(PlaneError::format(
                index,
                SpecField::Planes,
                alloc::format!(
                    "{width}x{height} samples span bytes {lowest}..{} of a {} byte plane",
                    highest + l.pixel_size as i128,
                    self.data.len()
                ),
            ));
        }
        Ok(())
    }

    /// Byte offset of the first sample of row `y`.
    #[inline]
    pub(crate) fn row_offset(&self, y: usize) -> isize {
        self.layout.origin as isize + y as isize * self.layout.row_stride
    }

    #[inline]
    pub(crate) fn pixel_stride(&self) -> isize {
        self.layout.pixel_stride
    }

    #[inline]
    pub(crate) fn container_bits(&self) -> u32 {
        self.layout.pixel_size as u32 * 8
    }

    /// Raw sample bits at a byte offset that `check` has proven in bounds.
    #[inline]
    pub(crate) fn read_raw(&self, offset: isize) -> u32 {
        let start = offset as usize;
        let bytes = &self.data[start..start + self.layout.pixel_size];
        match self.layout.endian {
            Endian::Little => bytes
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
            Endian::Big => bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_reads_little_and_big_endian() {
        let data = [0x34, 0x12, 0xcd, 0xab];
        let le = PlaneDescriptor::new(&data, PlaneLayout::packed(2, 2).with_endian(Endian::Little));
        assert_eq!(le.read_raw(0), 0x1234);
        assert_eq!(le.read_raw(2), 0xabcd);
        let be = PlaneDescriptor::new(&data, PlaneLayout::packed(2, 2).with_endian(Endian::Big));
        assert_eq!(be.read_raw(0), 0x3412);
    }

    #[test]
    fn three_byte_samples() {
        let data = [0x01, 0x02, 0x03];
        let le = PlaneDescriptor::new(&data, PlaneLayout::packed(3, 1).with_endian(Endian::Little));
        assert_eq!(le.read_raw(0), 0x030201);
    }

    #[test]
    fn check_accepts_exact_fit() {
        let data = [0u8; 12];
        let plane = PlaneDescriptor::new(&data, PlaneLayout::packed(2, 3));
        assert!(plane.check(0, 3, 2, 16).is_ok());
        assert!(plane.check(0, 3, 3, 16).is_err());
    }

    #[test]
    fn flipped_rows_stay_in_bounds() {
        let data = [10u8, 11, 20, 21, 30, 31];
        let plane = PlaneDescriptor::new(&data, PlaneLayout::packed(1, 2).flipped(3));
        assert!(plane.check(0, 2, 3, 8).is_ok());
        // Row 0 is the last row of the buffer.
        assert_eq!(plane.read_raw(plane.row_offset(0)), 30);
        assert_eq!(plane.read_raw(plane.row_offset(2) + plane.pixel_stride()), 11);
    }

    #[test]
    fn negative_origin_rejected() {
        let data = [0u8; 4];
        let layout = PlaneLayout::packed(1, 2).with_strides(-1, 2);
        let plane = PlaneDescriptor::new(&data, layout);
        match plane.check(3, 2, 2, 8) {
            Err(PlaneError::Format { index: 3, field: SpecField::Planes, .. }) => {}
            other => panic!("expected Planes error, got {other:?}"),
        }
    }

    #[test]
    fn bits_wider_than_sample_rejected() {
        let data = [0u8; 4];
        let plane = PlaneDescriptor::new(&data, PlaneLayout::packed(1, 4));
        match plane.check(0, 4, 1, 9) {
            Err(PlaneError::Format { field: SpecField::BitsPerComponent, .. }) => {}
            other => panic!("expected BitsPerComponent error, got {other:?}"),
        }
    }

    #[test]
    fn oversized_pixel_rejected() {
        let data = [0u8; 16];
        let plane = PlaneDescriptor::new(&data, PlaneLayout::packed(8, 2));
        match plane.check(0, 2, 1, 8) {
            Err(PlaneError::Format { field: SpecField::PixelSize, .. }) => {}
            other => panic!("expected PixelSize error, got {other:?}"),
        }
    }

    #[test]
    fn empty_rectangle_needs_no_data() {
        let plane = PlaneDescriptor::new(&[], PlaneLayout::packed(2, 0));
        assert!(plane.check(0, 0, 5, 16).is_ok());
    }
}
