use thiserror::Error;

/// Errors surfaced by the codec and its transports.
#[derive(Debug, Error)]
pub enum Error {
    /// The run totals disagree with the target shape. Decoding anyway
    /// would silently under- or over-fill the pixel buffer.
    #[error("RLE runs sum to {total} but a {h}x{w} mask holds {expected} pixels")]
    LengthMismatch {
        h: u32,
        w: u32,
        total: u64,
        expected: u64,
    },

    /// A dimension does not fit the 4-digit decimal shape descriptor.
    #[error("mask dimension {0} exceeds the 4-digit shape descriptor limit (9999)")]
    ShapeTooLarge(u32),

    /// The transport payload ends before the shape descriptor.
    #[error("transport payload holds {0} bytes, shorter than the 8-byte shape descriptor")]
    TruncatedPayload(usize),

    /// The trailing shape descriptor is not 8 ASCII digits.
    #[error("shape descriptor {0:?} is not 8 ASCII digits")]
    BadShapeDescriptor(String),

    /// The counts blob is not a whole number of 32-bit values.
    #[error("counts blob of {0} bytes is not a whole number of 32-bit values")]
    RaggedPayload(usize),

    /// An all-background mask has no bounding box to crop to.
    #[error("mask has no foreground pixels")]
    EmptyMask,

    /// A patch placement falls outside the target canvas.
    #[error("patch {width}x{height} at ({left}, {top}) does not fit a {img_h}x{img_w} canvas")]
    PatchOutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        img_h: u32,
        img_w: u32,
    },

    /// A CVAT `rle` attribute token failed to parse as an integer.
    #[error("bad run length {0:?} in rle attribute")]
    BadRleAttribute(String),

    #[error("invalid base64 transport string")]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
