//! Sub-image descriptions and the canvas they are placed on.

use alloc::vec::Vec;

use crate::error::{PlaneError, SpecField};

/// Widest component the conversion engine reads.
pub(crate) const MAX_BITS_PER_COMPONENT: u32 = 32;

/// Color space of a sub-image's color components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Grayscale,
    Rgb,
}

impl ColorSpace {
    /// Number of color components, not counting alpha.
    pub fn color_components(self) -> u32 {
        match self {
            Self::Grayscale => 1,
            Self::Rgb => 3,
        }
    }
}

/// Size of the canvas: the bounding box of every sub-image in a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Placement and sample format of one sub-image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubImageSpec {
    /// Position of the sub-image's lower-left corner on the canvas.
    pub offset: [u32; 2],
    /// Width and height in pixels.
    pub size: [u32; 2],
    pub color_space: ColorSpace,
    pub has_alpha: bool,
    /// 1 (gray), 2 (gray + alpha), 3 (RGB), or 4 (RGB + alpha).
    pub num_components: u32,
    /// Significant bits per component; may be less than the sample width.
    pub bits_per_component: u32,
    /// Components are two's complement integers.
    pub signed: bool,
}

impl SubImageSpec {
    /// An unsigned sub-image at the canvas origin with a component count
    /// matching `color_space` and `has_alpha`.
    pub fn new(
        width: u32,
        height: u32,
        color_space: ColorSpace,
        has_alpha: bool,
        bits_per_component: u32,
    ) -> Self {
        Self {
            offset: [0, 0],
            size: [width, height],
            color_space,
            has_alpha,
            num_components: color_space.color_components() + u32::from(has_alpha),
            bits_per_component,
            signed: false,
        }
    }

    pub fn with_offset(mut self, x: u32, y: u32) -> Self {
        self.offset = [x, y];
        self
    }

    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    pub fn width(&self) -> u32 {
        self.size[0]
    }

    pub fn height(&self) -> u32 {
        self.size[1]
    }

    pub fn is_empty(&self) -> bool {
        self.size[0] == 0 || self.size[1] == 0
    }

    /// Check structural validity against the canvas. `index` is the
    /// sub-image's position in file order and is carried into the error.
    pub fn validate(&self, index: usize, canvas: CanvasSize) -> Result<(), PlaneError> {
        let expected = self.color_space.color_components() + u32::from(self.has_alpha);
        if self.num_components != expected {
            return Err(PlaneError::format(
                index,
                SpecField::NumComponents,
                alloc::format!(
                    "{:?}{} needs {expected} components, got {}",
                    self.color_space,
                    if self.has_alpha { " with alpha" } else { "" },
                    self.num_components
                ),
            ));
        }
        if self.bits_per_component == 0 || self.bits_per_component > MAX_BITS_PER_COMPONENT {
            return Err(PlaneError::format(
                index,
                SpecField::BitsPerComponent,
                alloc::format!(
                    "{} bits is outside 1..={MAX_BITS_PER_COMPONENT}",
                    self.bits_per_component
                ),
            ));
        }

        let bounds = [canvas.width, canvas.height];
        for axis in 0..2 {
            let end = self.offset[axis].checked_add(self.size[axis]);
            match end {
                Some(end) if end <= bounds[axis] => {}
                _ => {
                    // Blame the offset only when it alone is already past the edge.
                    let field = if self.offset[axis] > bounds[axis] {
                        SpecField::Offset
                    } else {
                        SpecField::Size
                    };
                    return Err(PlaneError::format(
                        index,
                        field,
                        alloc::format!(
                            "{} + {} exceeds canvas {} of {}",
                            self.offset[axis],
                            self.size[axis],
                            if axis == 0 { "width" } else { "height" },
                            bounds[axis]
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Everything a decoder's enumerate step reports: the canvas and the
/// sub-images in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageTable {
    pub canvas: CanvasSize,
    pub images: Vec<SubImageSpec>,
}

impl ImageTable {
    pub fn new(canvas: CanvasSize, images: Vec<SubImageSpec>) -> Self {
        Self { canvas, images }
    }

    /// Validate every sub-image, reporting the first failure in file order.
    pub fn validate(&self) -> Result<(), PlaneError> {
        self.images
            .iter()
            .enumerate()
            .try_for_each(|(index, spec)| spec.validate(index, self.canvas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_field(result: Result<(), PlaneError>, index: usize, field: SpecField) {
        match result {
            Err(PlaneError::Format {
                index: i, field: f, ..
            }) => {
                assert_eq!(i, index);
                assert_eq!(f, field);
            }
            other => panic!("expected Format({field:?}), got {other:?}"),
        }
    }

    #[test]
    fn component_count_follows_color_space() {
        assert_eq!(SubImageSpec::new(1, 1, ColorSpace::Grayscale, false, 8).num_components, 1);
        assert_eq!(SubImageSpec::new(1, 1, ColorSpace::Grayscale, true, 8).num_components, 2);
        assert_eq!(SubImageSpec::new(1, 1, ColorSpace::Rgb, false, 8).num_components, 3);
        assert_eq!(SubImageSpec::new(1, 1, ColorSpace::Rgb, true, 8).num_components, 4);
    }

    #[test]
    fn fits_exactly() {
        let canvas = CanvasSize::new(10, 8);
        let spec = SubImageSpec::new(4, 3, ColorSpace::Rgb, false, 8).with_offset(6, 5);
        assert!(spec.validate(0, canvas).is_ok());
    }

    #[test]
    fn overflowing_size_rejected() {
        let canvas = CanvasSize::new(10, 8);
        let spec = SubImageSpec::new(5, 3, ColorSpace::Rgb, false, 8).with_offset(6, 0);
        expect_field(spec.validate(2, canvas), 2, SpecField::Size);
    }

    #[test]
    fn offset_past_edge_rejected() {
        let canvas = CanvasSize::new(10, 8);
        let spec = SubImageSpec::new(0, 0, ColorSpace::Grayscale, false, 8).with_offset(0, 9);
        expect_field(spec.validate(0, canvas), 0, SpecField::Offset);
    }

    #[test]
    fn offset_overflow_does_not_wrap() {
        let canvas = CanvasSize::new(u32::MAX, 1);
        let spec = SubImageSpec::new(2, 1, ColorSpace::Grayscale, false, 8).with_offset(u32::MAX, 0);
        expect_field(spec.validate(0, canvas), 0, SpecField::Size);
    }

    #[test]
    fn component_mismatch_rejected() {
        let canvas = CanvasSize::new(4, 4);
        let mut spec = SubImageSpec::new(4, 4, ColorSpace::Rgb, false, 8);
        spec.num_components = 2;
        expect_field(spec.validate(1, canvas), 1, SpecField::NumComponents);
    }

    #[test]
    fn bit_depth_bounds() {
        let canvas = CanvasSize::new(4, 4);
        let zero = SubImageSpec::new(4, 4, ColorSpace::Grayscale, false, 0);
        expect_field(zero.validate(0, canvas), 0, SpecField::BitsPerComponent);
        let wide = SubImageSpec::new(4, 4, ColorSpace::Grayscale, false, 33);
        expect_field(wide.validate(0, canvas), 0, SpecField::BitsPerComponent);
        let max = SubImageSpec::new(4, 4, ColorSpace::Grayscale, false, 32);
        assert!(max.validate(0, canvas).is_ok());
    }

    #[test]
    fn table_reports_first_bad_image() {
        let canvas = CanvasSize::new(4, 4);
        let table = ImageTable::new(
            canvas,
            alloc::vec![
                SubImageSpec::new(4, 4, ColorSpace::Grayscale, false, 8),
                SubImageSpec::new(5, 4, ColorSpace::Grayscale, false, 8),
                SubImageSpec::new(9, 9, ColorSpace::Grayscale, false, 8),
            ],
        );
        expect_field(table.validate(), 1, SpecField::Size);
    }
}
