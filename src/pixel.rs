use rgb::{RGB8, RGBA8};

use crate::convert::Samples;

/// Canvas pixel memory layout.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// Single channel, 8-bit grayscale.
    Gray8,
    /// Single channel, 16-bit grayscale.
    Gray16,
    /// Single channel, 32-bit float grayscale in `[0, 1]`.
    GrayF32,
    /// 3 channels, 8-bit RGB.
    Rgb8,
    /// 4 channels, 8-bit RGBA (straight alpha).
    Rgba8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Gray16 => 2,
            Self::GrayF32 => 4,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray8 | Self::Gray16 | Self::GrayF32 => 1,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba8)
    }
}

/// A pixel type a canvas can be built from.
///
/// `Default` is the background: black, and transparent for alpha layouts.
pub trait CanvasPixel: Copy + Default {
    const LAYOUT: PixelLayout;

    /// Build one pixel from the samples read at a source position.
    fn from_samples(samples: &Samples) -> Self;
}

impl CanvasPixel for u8 {
    const LAYOUT: PixelLayout = PixelLayout::Gray8;

    #[inline]
    fn from_samples(samples: &Samples) -> Self {
        samples.gray(8) as u8
    }
}

impl CanvasPixel for u16 {
    const LAYOUT: PixelLayout = PixelLayout::Gray16;

    #[inline]
    fn from_samples(samples: &Samples) -> Self {
        samples.gray(16) as u16
    }
}

impl CanvasPixel for f32 {
    const LAYOUT: PixelLayout = PixelLayout::GrayF32;

    #[inline]
    fn from_samples(samples: &Samples) -> Self {
        samples.gray_unit()
    }
}

impl CanvasPixel for RGB8 {
    const LAYOUT: PixelLayout = PixelLayout::Rgb8;

    #[inline]
    fn from_samples(samples: &Samples) -> Self {
        let [r, g, b] = samples.rgb(8);
        RGB8::new(r as u8, g as u8, b as u8)
    }
}

impl CanvasPixel for RGBA8 {
    const LAYOUT: PixelLayout = PixelLayout::Rgba8;

    #[inline]
    fn from_samples(samples: &Samples) -> Self {
        let [r, g, b] = samples.rgb(8);
        RGBA8::new(r as u8, g as u8, b as u8, samples.alpha(8) as u8)
    }
}
