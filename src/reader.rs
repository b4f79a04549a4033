use enough::{Stop, Unstoppable};
use imgref::ImgVec;
use rgb::{RGB8, RGBA8};

use crate::canvas::Canvas;
use crate::decoder::PlaneDecoder;
use crate::error::PlaneError;
use crate::limits::Limits;
use crate::pixel::CanvasPixel;
use crate::spec::{CanvasSize, ImageTable, SubImageSpec};

/// Reads every sub-image of a decoder onto one typed canvas.
///
/// Each read walks the whole sub-image sequence. Reading again requires a
/// decoder that implements [`PlaneDecoder::rewind`]; others fail with
/// [`PlaneError::Decode`].
pub struct ImageReader<D> {
    decoder: D,
    table: ImageTable,
    limits: Limits,
    consumed: bool,
}

impl<D: PlaneDecoder> ImageReader<D> {
    /// Enumerate the decoder's sub-images.
    pub fn new(mut decoder: D) -> Result<Self, PlaneError> {
        let table = decoder
            .enumerate()
            .map_err(|e| PlaneError::decode(None, e))?;
        log::debug!(
            "enumerated {} sub-images on a {}x{} canvas",
            table.images.len(),
            table.canvas.width,
            table.canvas.height
        );
        Ok(Self {
            decoder,
            table,
            limits: Limits::default(),
            consumed: false,
        })
    }

    /// Limit the size of canvases this reader allocates.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Canvas dimensions reported by the decoder.
    pub fn canvas_size(&self) -> CanvasSize {
        self.table.canvas
    }

    /// Number of sub-images in file order.
    pub fn num_images(&self) -> usize {
        self.table.images.len()
    }

    /// Spec of sub-image `index`, if it exists.
    pub fn image_spec(&self, index: usize) -> Option<&SubImageSpec> {
        self.table.images.get(index)
    }

    /// Every sub-image spec, in file order.
    pub fn images(&self) -> &[SubImageSpec] {
        &self.table.images
    }

    /// The wrapped decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Give the decoder back.
    pub fn into_inner(self) -> D {
        self.decoder
    }

    /// Read as 8-bit grayscale.
    pub fn read_gray8(&mut self) -> Result<ImgVec<u8>, PlaneError> {
        self.read(&Unstoppable)
    }

    /// Read as 16-bit grayscale.
    pub fn read_gray16(&mut self) -> Result<ImgVec<u16>, PlaneError> {
        self.read(&Unstoppable)
    }

    /// Read as 32-bit float grayscale in `[0, 1]`.
    pub fn read_gray32(&mut self) -> Result<ImgVec<f32>, PlaneError> {
        self.read(&Unstoppable)
    }

    /// Read as 8-bit RGB.
    pub fn read_rgb8(&mut self) -> Result<ImgVec<RGB8>, PlaneError> {
        self.read(&Unstoppable)
    }

    /// Read as 8-bit RGB with straight alpha.
    pub fn read_rgba8(&mut self) -> Result<ImgVec<RGBA8>, PlaneError> {
        self.read(&Unstoppable)
    }

    /// Read every sub-image into a canvas of `P`.
    ///
    /// All sub-image specs are validated before any planes are acquired. On
    /// error the partial canvas is dropped; nothing is returned.
    pub fn read<P: CanvasPixel>(&mut self, stop: &dyn Stop) -> Result<ImgVec<P>, PlaneError> {
        self.table.validate()?;
        let mut canvas = Canvas::<P>::new(self.table.canvas, &self.limits)?;
        stop.check()?;

        if self.consumed {
            self.decoder
                .rewind()
                .map_err(|e| PlaneError::decode(None, e))?;
        }
        self.consumed = true;
        log::debug!(
            "reading {} sub-images as {:?}",
            self.table.images.len(),
            P::LAYOUT
        );

        for (index, spec) in self.table.images.iter().enumerate() {
            stop.check()?;
            let converted = {
                let planes = self
                    .decoder
                    .acquire_planes()
                    .map_err(|e| PlaneError::decode(Some(index), e))?;
                canvas.commit(index, spec, &planes, stop)
            };
            // Release even when conversion failed; its error takes precedence.
            let released = self
                .decoder
                .release_planes()
                .map_err(|e| PlaneError::decode(Some(index), e));
            converted?;
            released?;
        }
        Ok(canvas.finish())
    }
}
