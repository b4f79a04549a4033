//! # zenplanes
//!
//! Format-agnostic sub-image ingestion: turns strided component planes lent
//! by a format decoder into one typed canvas.
//!
//! A decoder implements [`PlaneDecoder`]: it reports the canvas size and a
//! [`SubImageSpec`] per sub-image, then lends one [`PlaneDescriptor`] per
//! component for each sub-image in turn. [`ImageReader`] converts every
//! sub-image and composites it at its offset.
//!
//! ## Output formats
//!
//! | method         | pixel           |
//! |----------------|-----------------|
//! | `read_gray8`   | `u8`            |
//! | `read_gray16`  | `u16`           |
//! | `read_gray32`  | `f32` in `[0, 1]` |
//! | `read_rgb8`    | [`rgb::RGB8`]   |
//! | `read_rgba8`   | [`rgb::RGBA8`]  |
//!
//! ## Conversion rules
//!
//! - Samples are rescaled linearly between bit depths, rounding half up.
//! - Signed samples are offset by half their range before rescaling.
//! - RGB → gray uses BT.601 luma (`0.299 R + 0.587 G + 0.114 B`).
//! - Gray → RGB replicates; missing alpha is opaque; unwanted alpha is dropped.
//! - Later sub-images overwrite earlier ones where they overlap.
//!
//! ## Axis convention
//!
//! Plane addressing and the returned images share one convention: row 0 is
//! the **bottom** row. Sub-image offsets count from the lower-left corner of
//! the canvas.
//!
//! ## Non-Goals
//!
//! - Parsing any container or compression format
//! - Color management and gamma
//! - Premultiplied alpha
//!
//! ## Usage
//!
//! ```
//! use zenplanes::{ColorSpace, ImageReader, MemoryDecoder, MemoryFrame, RowOrder, SubImageSpec};
//!
//! // 2x1 RGB, top-down bytes
//! let spec = SubImageSpec::new(2, 1, ColorSpace::Rgb, false, 8);
//! let frame = MemoryFrame::interleaved(spec, vec![255, 0, 0, 0, 255, 0], RowOrder::TopDown);
//! let mut reader = ImageReader::new(MemoryDecoder::single(frame))?;
//!
//! let gray = reader.read_gray8()?;
//! assert_eq!(gray.buf().as_slice(), &[76, 150]);
//! # Ok::<(), zenplanes::PlaneError>(())
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod canvas;
mod convert;
mod decoder;
mod error;
mod limits;
mod memory;
mod pixel;
mod plane;
mod reader;
mod spec;

// Re-exports
pub use canvas::Canvas;
pub use convert::{LUMA_B, LUMA_G, LUMA_R, Samples, luma, rescale, rescale_to_unit};
pub use decoder::PlaneDecoder;
pub use enough::{Stop, Unstoppable};
pub use error::{DecodeError, PlaneError, SpecField};
pub use limits::Limits;
pub use memory::{MemoryDecoder, MemoryFrame, RowOrder};
pub use pixel::{CanvasPixel, PixelLayout};
pub use plane::{Endian, PlaneDescriptor, PlaneLayout};
pub use reader::ImageReader;
pub use spec::{CanvasSize, ColorSpace, ImageTable, SubImageSpec};
