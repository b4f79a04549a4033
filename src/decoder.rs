use alloc::vec::Vec;

use crate::error::DecodeError;
use crate::plane::PlaneDescriptor;
use crate::spec::ImageTable;

/// What a concrete format decoder provides to [`ImageReader`](crate::ImageReader).
///
/// Sub-images are delivered in file order, one at a time. Each successful
/// [`acquire_planes`](Self::acquire_planes) is followed by exactly one
/// [`release_planes`](Self::release_planes) before the next acquire. The
/// returned descriptors borrow the decoder, so they are provably dropped by
/// the time `release_planes` can be called.
pub trait PlaneDecoder {
    /// Report the canvas size and every sub-image. Called once, before any
    /// planes are acquired.
    fn enumerate(&mut self) -> Result<ImageTable, DecodeError>;

    /// Decode the next sub-image and lend one plane per component.
    ///
    /// Must fail rather than return fewer planes, or planes that disagree
    /// with the sub-image's [`SubImageSpec`](crate::SubImageSpec).
    fn acquire_planes(&mut self) -> Result<Vec<PlaneDescriptor<'_>>, DecodeError>;

    /// Invalidate the planes from the last acquire.
    fn release_planes(&mut self) -> Result<(), DecodeError>;

    /// Restart delivery at the first sub-image.
    ///
    /// Only decoders that can re-read their input implement this; the reader
    /// calls it when an image is read a second time.
    fn rewind(&mut self) -> Result<(), DecodeError> {
        Err(DecodeError::new("decoder cannot re-read its sub-images"))
    }
}

impl<D: PlaneDecoder + ?Sized> PlaneDecoder for &mut D {
    fn enumerate(&mut self) -> Result<ImageTable, DecodeError> {
        (**self).enumerate()
    }

    fn acquire_planes(&mut self) -> Result<Vec<PlaneDescriptor<'_>>, DecodeError> {
        (**self).acquire_planes()
    }

    fn release_planes(&mut self) -> Result<(), DecodeError> {
        (**self).release_planes()
    }

    fn rewind(&mut self) -> Result<(), DecodeError> {
        (**self).rewind()
    }
}
