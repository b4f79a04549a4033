//! Sample conversion: bit-depth rescaling, signed remapping, color-space
//! reconciliation and alpha handling.
//!
//! Integer rescaling is `dst = (src * dst_max + src_max / 2) / src_max`,
//! rounding half up, so widening by an integer ratio (8 → 16 is × 257) and
//! narrowing back are exact inverses. RGB → gray uses the BT.601 weights
//! [`LUMA_R`], [`LUMA_G`], [`LUMA_B`] (per mille) on samples already rescaled
//! to the destination depth.

use enough::Stop;

use crate::error::{PlaneError, SpecField};
use crate::pixel::CanvasPixel;
use crate::plane::PlaneDescriptor;
use crate::spec::{ColorSpace, SubImageSpec};

/// Red weight of the luma sum, per mille.
pub const LUMA_R: u64 = 299;
/// Green weight of the luma sum, per mille.
pub const LUMA_G: u64 = 587;
/// Blue weight of the luma sum, per mille.
pub const LUMA_B: u64 = 114;

#[inline]
fn max_value(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

/// Linearly rescale an unsigned `src_bits` sample to `dst_bits`.
///
/// # Panics
///
/// Both depths must be in `1..=32`. `src_bits == 0` divides by zero and
/// depths of 64 or more overflow the shift.
#[inline]
pub fn rescale(value: u32, src_bits: u32, dst_bits: u32) -> u32 {
    if src_bits == dst_bits {
        return value;
    }
    let src_max = max_value(src_bits);
    let dst_max = max_value(dst_bits);
    ((u64::from(value) * dst_max + src_max / 2) / src_max) as u32
}

/// Normalize an unsigned `bits` sample to `[0, 1]`.
///
/// # Panics
///
/// `bits` must be in `1..=32`; 64 or more overflows the shift.
#[inline]
pub fn rescale_to_unit(value: u32, bits: u32) -> f32 {
    (f64::from(value) / max_value(bits) as f64) as f32
}

/// Weighted luma of three samples of equal depth.
#[inline]
pub fn luma(r: u32, g: u32, b: u32) -> u32 {
    ((u64::from(r) * LUMA_R + u64::from(g) * LUMA_G + u64::from(b) * LUMA_B + 500) / 1000) as u32
}

/// Map a raw sample to an unsigned value in `0..=2^bits - 1`.
///
/// Signed samples are sign-extended from the container width and offset by
/// half the range. Out-of-range values clamp.
#[inline]
fn normalize(raw: u32, container_bits: u32, bits: u32, signed: bool) -> u32 {
    let max = max_value(bits);
    if signed {
        let shift = 32 - container_bits;
        let value = i64::from(((raw << shift) as i32) >> shift);
        let shifted = value + (1i64 << (bits - 1));
        shifted.clamp(0, max as i64) as u32
    } else {
        u64::from(raw).min(max) as u32
    }
}

/// The normalized components of one source pixel.
///
/// Alpha, when present, is the last component.
#[derive(Clone, Copy, Debug)]
pub struct Samples {
    values: [u32; 4],
    bits: u32,
    color_space: ColorSpace,
    has_alpha: bool,
}

impl Samples {
    /// Wrap normalized `bits`-deep components in plane order.
    pub fn new(values: [u32; 4], bits: u32, color_space: ColorSpace, has_alpha: bool) -> Self {
        Self {
            values,
            bits,
            color_space,
            has_alpha,
        }
    }

    /// Gray value at `bits` depth; RGB sources go through [`luma`].
    #[inline]
    pub fn gray(&self, bits: u32) -> u32 {
        match self.color_space {
            ColorSpace::Grayscale => rescale(self.values[0], self.bits, bits),
            ColorSpace::Rgb => {
                let [r, g, b] = self.rgb(bits);
                luma(r, g, b)
            }
        }
    }

    /// Gray value in `[0, 1]`.
    #[inline]
    pub fn gray_unit(&self) -> f32 {
        match self.color_space {
            ColorSpace::Grayscale => rescale_to_unit(self.values[0], self.bits),
            ColorSpace::Rgb => {
                let max = max_value(self.bits) as f64;
                let [r, g, b] = [0usize, 1, 2].map(|c| f64::from(self.values[c]) / max);
                ((r * LUMA_R as f64 + g * LUMA_G as f64 + b * LUMA_B as f64) / 1000.0) as f32
            }
        }
    }

    /// Red, green and blue at `bits` depth; gray is replicated.
    #[inline]
    pub fn rgb(&self, bits: u32) -> [u32; 3] {
        match self.color_space {
            ColorSpace::Grayscale => {
                let v = rescale(self.values[0], self.bits, bits);
                [v, v, v]
            }
            ColorSpace::Rgb => [0usize, 1, 2].map(|c| rescale(self.values[c], self.bits, bits)),
        }
    }

    /// Alpha at `bits` depth, fully opaque when the source has none.
    #[inline]
    pub fn alpha(&self, bits: u32) -> u32 {
        if self.has_alpha {
            let last = self.color_space.color_components() as usize;
            rescale(self.values[last], self.bits, bits)
        } else {
            max_value(bits) as u32
        }
    }
}

/// Convert one sub-image's planes into its rectangle of `canvas`.
///
/// `canvas` is row-major, `canvas_width` pixels per row, row 0 at the bottom.
/// `spec` must already be validated against the canvas.
pub(crate) fn convert_into<P: CanvasPixel>(
    canvas: &mut [P],
    canvas_width: usize,
    index: usize,
    spec: &SubImageSpec,
    planes: &[PlaneDescriptor<'_>],
    stop: &dyn Stop,
) -> Result<(), PlaneError> {
    if planes.len() != spec.num_components as usize {
        return Err(PlaneError::format(
            index,
            SpecField::Planes,
            alloc::format!(
                "decoder supplied {} planes for {} components",
                planes.len(),
                spec.num_components
            ),
        ));
    }
    let bits = spec.bits_per_component;
    for plane in planes {
        plane.check(index, spec.width(), spec.height(), bits)?;
    }
    if spec.is_empty() {
        return Ok(());
    }

    let w = spec.width() as usize;
    let h = spec.height() as usize;
    let [ox, oy] = spec.offset.map(|v| v as usize);
    let mut cursors = [0isize; 4];

    for y in 0..h {
        if y % 16 == 0 {
            stop.check()?;
        }
        for (cursor, plane) in cursors.iter_mut().zip(planes) {
            *cursor = plane.row_offset(y);
        }
        let row_start = (oy + y) * canvas_width + ox;
        for out in &mut canvas[row_start..row_start + w] {
            let mut values = [0u32; 4];
            for ((value, cursor), plane) in values.iter_mut().zip(cursors.iter_mut()).zip(planes) {
                let raw = plane.read_raw(*cursor);
                *value = normalize(raw, plane.container_bits(), bits, spec.signed);
                // Past the last sample the cursor is never read, so it may wrap.
                *cursor = cursor.wrapping_add(plane.pixel_stride());
            }
            *out = P::from_samples(&Samples::new(values, bits, spec.color_space, spec.has_alpha));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_by_integer_ratio_is_exact() {
        assert_eq!(rescale(0, 8, 16), 0);
        assert_eq!(rescale(1, 8, 16), 257);
        assert_eq!(rescale(255, 8, 16), 65535);
        for v in 0..=255u32 {
            assert_eq!(rescale(rescale(v, 8, 16), 16, 8), v);
        }
    }

    #[test]
    fn rescale_covers_whole_depth_range() {
        assert_eq!(rescale(1, 1, 32), u32::MAX);
        assert_eq!(rescale(u32::MAX, 32, 1), 1);
        assert_eq!(rescale(u32::MAX, 32, 8), 255);
        assert_eq!(rescale(u32::MAX / 2, 32, 1), 0);
        assert_eq!(rescale_to_unit(u32::MAX, 32), 1.0);
        assert_eq!(rescale_to_unit(0, 1), 0.0);
    }

    #[test]
    fn narrowing_rounds_half_up() {
        // 16384 * 255 / 65535 = 63.75
        assert_eq!(rescale(16384, 16, 8), 64);
        // 10-bit 512 * 255 / 1023 = 127.62
        assert_eq!(rescale(512, 10, 8), 128);
        assert_eq!(rescale(1023, 10, 8), 255);
        assert_eq!(rescale(1, 1, 8), 255);
    }

    #[test]
    fn full_width_samples_do_not_overflow() {
        assert_eq!(rescale(u32::MAX, 32, 8), 255);
        assert_eq!(rescale(u32::MAX, 32, 16), 65535);
        assert_eq!(rescale(255, 8, 32), u32::MAX);
        assert_eq!(rescale_to_unit(u32::MAX, 32), 1.0);
    }

    #[test]
    fn signed_remap_adds_half_range() {
        let raw = (-16384i16) as u16 as u32;
        assert_eq!(normalize(raw, 16, 16, true), 16384);
        assert_eq!(normalize((i16::MIN) as u16 as u32, 16, 16, true), 0);
        assert_eq!(normalize(i16::MAX as u32, 16, 16, true), 65535);
        assert_eq!(normalize((-1i8) as u8 as u32, 8, 8, true), 127);
        assert_eq!(normalize(i32::MIN as u32, 32, 32, true), 0);
    }

    #[test]
    fn signed_narrow_depth_in_wide_container() {
        // 12-bit signed stored sign-extended in 16 bits.
        assert_eq!(normalize((-2048i16) as u16 as u32, 16, 12, true), 0);
        assert_eq!(normalize(2047, 16, 12, true), 4095);
        // Out-of-range values clamp.
        assert_eq!(normalize(5000, 16, 12, true), 4095);
    }

    #[test]
    fn unsigned_above_depth_clamps() {
        assert_eq!(normalize(0x3ff, 16, 10, false), 0x3ff);
        assert_eq!(normalize(0xffff, 16, 10, false), 0x3ff);
    }

    #[test]
    fn luma_of_primaries() {
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(65535, 65535, 65535), 65535);
    }

    #[test]
    fn samples_gray_to_rgb_replicates() {
        let s = Samples::new([100, 0, 0, 0], 8, ColorSpace::Grayscale, false);
        assert_eq!(s.rgb(8), [100, 100, 100]);
        assert_eq!(s.alpha(8), 255);
        assert_eq!(s.alpha(16), 65535);
    }

    #[test]
    fn samples_alpha_is_last_component() {
        let gray_alpha = Samples::new([10, 20, 0, 0], 8, ColorSpace::Grayscale, true);
        assert_eq!(gray_alpha.alpha(8), 20);
        let rgba = Samples::new([1, 2, 3, 4], 8, ColorSpace::Rgb, true);
        assert_eq!(rgba.alpha(8), 4);
        assert_eq!(rgba.rgb(8), [1, 2, 3]);
    }

    #[test]
    fn gray_unit_matches_luma_weights() {
        let red = Samples::new([255, 0, 0, 0], 8, ColorSpace::Rgb, false);
        assert!((red.gray_unit() - 0.299).abs() < 1e-6);
        let white = Samples::new([1023, 1023, 1023, 0], 10, ColorSpace::Rgb, false);
        assert!((white.gray_unit() - 1.0).abs() < 1e-6);
    }
}
