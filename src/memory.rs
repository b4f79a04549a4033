//! A [`PlaneDecoder`] over sub-images that are already in memory.
//!
//! Useful for hosts whose pixels come from elsewhere (a GPU readback, a
//! foreign decoder) and as the reference implementation of the decoder
//! contract: it refuses out-of-order acquire/release calls.

use alloc::format;
use alloc::vec::Vec;

use crate::decoder::PlaneDecoder;
use crate::error::DecodeError;
use crate::plane::{Endian, PlaneDescriptor, PlaneLayout};
use crate::spec::{CanvasSize, ImageTable, SubImageSpec};

/// Row order of a buffer handed to [`MemoryFrame::interleaved`] or
/// [`MemoryFrame::planar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// First row in memory is the bottom row.
    #[default]
    BottomUp,
    /// First row in memory is the top row.
    TopDown,
}

/// Bytes needed to store one `bits`-bit sample.
fn sample_bytes(bits: u32) -> usize {
    (bits as usize).div_ceil(8).max(1)
}

/// One sub-image: its spec, the owned bytes, and a layout per component.
#[derive(Clone, Debug)]
pub struct MemoryFrame {
    spec: SubImageSpec,
    data: Vec<u8>,
    planes: Vec<PlaneLayout>,
}

impl MemoryFrame {
    /// A frame with explicit plane layouts into `data`, one per component.
    pub fn new(spec: SubImageSpec, data: Vec<u8>, planes: Vec<PlaneLayout>) -> Self {
        Self { spec, data, planes }
    }

    /// Components packed per pixel (`RGBARGBA...`), each sample the smallest
    /// whole number of bytes holding `bits_per_component`, native endian.
    pub fn interleaved(spec: SubImageSpec, data: Vec<u8>, order: RowOrder) -> Self {
        let sample = sample_bytes(spec.bits_per_component);
        let components = spec.num_components as usize;
        let pixel_stride = sample * components;
        let row_stride = pixel_stride.saturating_mul(spec.width() as usize);
        let planes = (0..components)
            .map(|c| {
                let layout = PlaneLayout::packed(sample, spec.width())
                    .with_origin(c * sample)
                    .with_strides(pixel_stride as isize, row_stride as isize);
                match order {
                    RowOrder::BottomUp => layout,
                    RowOrder::TopDown => layout.flipped(spec.height()),
                }
            })
            .collect();
        Self::new(spec, data, planes)
    }

    /// One complete plane per component, back to back.
    pub fn planar(spec: SubImageSpec, data: Vec<u8>, order: RowOrder) -> Self {
        let sample = sample_bytes(spec.bits_per_component);
        let plane_bytes = (spec.width() as usize)
            .saturating_mul(spec.height() as usize)
            .saturating_mul(sample);
        let planes = (0..spec.num_components as usize)
            .map(|c| {
                let layout = PlaneLayout::packed(sample, spec.width())
                    .with_origin(c.saturating_mul(plane_bytes));
                match order {
                    RowOrder::BottomUp => layout,
                    RowOrder::TopDown => layout.flipped(spec.height()),
                }
            })
            .collect();
        Self::new(spec, data, planes)
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        for plane in &mut self.planes {
            plane.endian = endian;
        }
        self
    }

    pub fn spec(&self) -> &SubImageSpec {
        &self.spec
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn planes(&self) -> &[PlaneLayout] {
        &self.planes
    }
}

/// Serves [`MemoryFrame`]s in order. Supports [`rewind`](PlaneDecoder::rewind).
#[derive(Clone, Debug)]
pub struct MemoryDecoder {
    canvas: CanvasSize,
    frames: Vec<MemoryFrame>,
    next: usize,
    outstanding: bool,
}

impl MemoryDecoder {
    /// Serve `frames` in order on a canvas of `canvas`.
    pub fn new(canvas: CanvasSize, frames: Vec<MemoryFrame>) -> Self {
        Self {
            canvas,
            frames,
            next: 0,
            outstanding: false,
        }
    }

    /// A decoder whose canvas is exactly one frame.
    pub fn single(frame: MemoryFrame) -> Self {
        let spec = frame.spec;
        let canvas = CanvasSize::new(
            spec.offset[0].saturating_add(spec.width()),
            spec.offset[1].saturating_add(spec.height()),
        );
        Self::new(canvas, alloc::vec![frame])
    }

    /// Number of sub-images acquired since creation or the last rewind.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Whether planes are currently lent out.
    pub fn has_outstanding_planes(&self) -> bool {
        self.outstanding
    }

    /// The frames this decoder serves.
    pub fn frames(&self) -> &[MemoryFrame] {
        &self.frames
    }
}

impl PlaneDecoder for MemoryDecoder {
    fn enumerate(&mut self) -> Result<ImageTable, DecodeError> {
        Ok(ImageTable::new(
            self.canvas,
            self.frames.iter().map(|f| f.spec).collect(),
        ))
    }

    fn acquire_planes(&mut self) -> Result<Vec<PlaneDescriptor<'_>>, DecodeError> {
        if self.outstanding {
            return Err(DecodeError::new(format!(
                "planes of sub-image {} were not released",
                self.next - 1
            )));
        }
        let index = self.next;
        let frame = self.frames.get(index).ok_or_else(|| {
            DecodeError::new(format!("no sub-image {index}; file has {}", self.frames.len()))
        })?;
        self.next += 1;
        self.outstanding = true;
        Ok(frame
            .planes
            .iter()
            .map(|layout| PlaneDescriptor::new(&frame.data, *layout))
            .collect())
    }

    fn release_planes(&mut self) -> Result<(), DecodeError> {
        if !self.outstanding {
            return Err(DecodeError::new("no planes are outstanding"));
        }
        self.outstanding = false;
        Ok(())
    }

    fn rewind(&mut self) -> Result<(), DecodeError> {
        if self.outstanding {
            return Err(DecodeError::new("cannot rewind while planes are outstanding"));
        }
        self.next = 0;
        Ok(())
    }
}
