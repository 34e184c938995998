//! Column-major run-length codec for binary segmentation masks, with a
//! Base64 text transport, a JSON file container, and CVAT annotation
//! interchange.
//!
//! Masks are flattened column by column (Fortran order) before run
//! lengths are taken. Row-major is the more common convention, but the
//! column-major order is what existing encoded data uses, so it is part
//! of the format rather than a choice this crate is free to revisit.

pub mod cvat;
pub mod error;
pub mod file;
pub mod rle;
pub mod transport;
pub mod types;

pub use cvat::MaskPatch;
pub use error::Error;
pub use rle::{area, decode, encode, to_bbox};
pub use transport::{from_base64, to_base64};
pub use types::{BBox, Mask, Rle};
