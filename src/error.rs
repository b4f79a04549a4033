use alloc::string::String;
use core::fmt;
use enough::StopReason;

/// Which part of a sub-image description failed validation.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecField {
    /// Placement on the canvas.
    Offset,
    /// Width and height.
    Size,
    /// Component count vs. color space and alpha flag.
    NumComponents,
    /// Bits per component.
    BitsPerComponent,
    /// Byte size of one sample in a plane.
    PixelSize,
    /// Plane count or plane bounds.
    Planes,
}

impl fmt::Display for SpecField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Offset => "offset",
            Self::Size => "size",
            Self::NumComponents => "component count",
            Self::BitsPerComponent => "bits per component",
            Self::PixelSize => "pixel size",
            Self::Planes => "planes",
        })
    }
}

/// Failure reported by a [`PlaneDecoder`](crate::PlaneDecoder).
///
/// The reader wraps it in [`PlaneError::Decode`] without altering it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// A failure described by `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The decoder's description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors from reading sub-images onto a canvas.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PlaneError {
    #[error("sub-image {index}: invalid {field}: {reason}")]
    Format {
        index: usize,
        field: SpecField,
        reason: String,
    },

    #[error("decoder failed: {source}")]
    Decode {
        index: Option<usize>,
        #[source]
        source: DecodeError,
    },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl PlaneError {
    pub(crate) fn format(index: usize, field: SpecField, reason: impl Into<String>) -> Self {
        PlaneError::Format {
            index,
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(index: Option<usize>, source: DecodeError) -> Self {
        PlaneError::Decode { index, source }
    }
}

impl From<StopReason> for PlaneError {
    fn from(r: StopReason) -> Self {
        PlaneError::Cancelled(r)
    }
}
