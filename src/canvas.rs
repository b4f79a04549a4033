use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;
use imgref::ImgVec;

use crate::convert;
use crate::error::PlaneError;
use crate::limits::Limits;
use crate::pixel::CanvasPixel;
use crate::plane::PlaneDescriptor;
use crate::spec::{CanvasSize, SubImageSpec};

/// The output image under construction.
///
/// Pixels are row-major with row 0 at the bottom of the canvas, matching
/// the plane addressing convention.
#[derive(Clone, Debug)]
pub struct Canvas<P> {
    size: CanvasSize,
    pixels: Vec<P>,
}

impl<P: CanvasPixel> Canvas<P> {
    /// Allocate a canvas filled with the background (`P::default()`).
    pub fn new(size: CanvasSize, limits: &Limits) -> Result<Self, PlaneError> {
        let count = limits.check_canvas(size, P::LAYOUT)?;
        Ok(Self {
            size,
            pixels: vec![P::default(); count],
        })
    }

    /// Canvas dimensions in pixels.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Pixels committed so far, bottom row first.
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    /// Convert sub-image `index` from `planes` into its rectangle.
    ///
    /// Later commits overwrite earlier ones where rectangles overlap.
    pub fn commit(
        &mut self,
        index: usize,
        spec: &SubImageSpec,
        planes: &[PlaneDescriptor<'_>],
        stop: &dyn Stop,
    ) -> Result<(), PlaneError> {
        spec.validate(index, self.size)?;
        log::debug!(
            "commit sub-image {index}: {}x{} at ({}, {}), {:?} {} bit{}{} -> {:?}",
            spec.width(),
            spec.height(),
            spec.offset[0],
            spec.offset[1],
            spec.color_space,
            spec.bits_per_component,
            if spec.signed { " signed" } else { "" },
            if spec.has_alpha { " + alpha" } else { "" },
            P::LAYOUT
        );
        for (component, plane) in planes.iter().enumerate() {
            log::trace!("sub-image {index} plane {component}: {:?}", plane.layout());
        }
        convert::convert_into(
            &mut self.pixels,
            self.size.width as usize,
            index,
            spec,
            planes,
            stop,
        )
    }

    /// Hand the finished pixels to the caller.
    ///
    /// A zero-width canvas keeps its height; its rows are empty.
    pub fn finish(self) -> ImgVec<P> {
        let width = self.size.width as usize;
        // imgref rejects a zero stride even when there are no pixels.
        ImgVec::new_stride(self.pixels, width, self.size.height as usize, width.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::PlaneLayout;
    use crate::spec::ColorSpace;
    use enough::Unstoppable;
    use rgb::RGBA8;

    #[test]
    fn background_is_transparent_black() {
        let canvas = Canvas::<RGBA8>::new(CanvasSize::new(2, 2), &Limits::default()).unwrap();
        assert!(canvas.pixels().iter().all(|p| *p == RGBA8::new(0, 0, 0, 0)));
    }

    #[test]
    fn memory_limit_applies_to_pixel_size() {
        let limits = Limits {
            max_memory_bytes: Some(15),
            ..Default::default()
        };
        assert!(Canvas::<u8>::new(CanvasSize::new(4, 4), &limits).is_err());
        let limits = Limits {
            max_memory_bytes: Some(16),
            ..Default::default()
        };
        assert!(Canvas::<u8>::new(CanvasSize::new(4, 4), &limits).is_ok());
        assert!(Canvas::<u16>::new(CanvasSize::new(4, 4), &limits).is_err());
    }

    #[test]
    fn commit_places_at_offset_from_bottom() {
        let mut canvas = Canvas::<u8>::new(CanvasSize::new(3, 3), &Limits::default()).unwrap();
        let data = [7u8, 8];
        let spec = SubImageSpec::new(2, 1, ColorSpace::Grayscale, false, 8).with_offset(1, 2);
        let planes = [PlaneDescriptor::new(&data, PlaneLayout::packed(1, 2))];
        canvas.commit(0, &spec, &planes, &Unstoppable).unwrap();
        assert_eq!(canvas.pixels(), &[0, 0, 0, 0, 0, 0, 0, 7, 8]);
    }

    #[test]
    fn empty_canvases_finish() {
        for (w, h) in [(0, 0), (0, 3), (3, 0)] {
            let canvas = Canvas::<u16>::new(CanvasSize::new(w, h), &Limits::default()).unwrap();
            assert!(canvas.pixels().is_empty());
            let img = canvas.finish();
            assert_eq!((img.width(), img.height()), (w as usize, h as usize));
            assert!(img.as_ref().rows().all(|row| row.is_empty()));
        }
    }

    #[test]
    fn commit_rejects_wrong_plane_count() {
        let mut canvas = Canvas::<u8>::new(CanvasSize::new(1, 1), &Limits::default()).unwrap();
        let data = [1u8];
        let spec = SubImageSpec::new(1, 1, ColorSpace::Rgb, false, 8);
        let planes = [PlaneDescriptor::new(&data, PlaneLayout::packed(1, 1))];
        assert!(matches!(
            canvas.commit(4, &spec, &planes, &Unstoppable),
            Err(PlaneError::Format { index: 4, .. })
        ));
        assert_eq!(canvas.pixels(), &[0]);
    }
}
