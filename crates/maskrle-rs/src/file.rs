//! On-disk container for encoded masks.
//!
//! A container is a JSON object with exactly two fields, `size`
//! (`[h, w]`) and `counts`. No compression, no version field.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::Error;
use crate::rle::{decode, encode};
use crate::types::{Mask, Rle};

/// Write an RLE container to `path`.
pub fn save_rle(path: &Path, rle: &Rle) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, rle)?;
    writer.flush()?;
    debug!(
        "wrote {}x{} container ({} runs) to {}",
        rle.h,
        rle.w,
        rle.counts.len(),
        path.display()
    );
    Ok(())
}

/// Read an RLE container from `path`.
pub fn load_rle(path: &Path) -> Result<Rle, Error> {
    let file = File::open(path)?;
    let rle: Rle = serde_json::from_reader(BufReader::new(file))?;
    debug!(
        "read {}x{} container ({} runs) from {}",
        rle.h,
        rle.w,
        rle.counts.len(),
        path.display()
    );
    Ok(rle)
}

/// RLE-encode `mask` and write the container to `path`.
pub fn save(path: &Path, mask: &Mask) -> Result<(), Error> {
    save_rle(path, &encode(mask))
}

/// Read a container from `path` and decode it with its own shape.
pub fn load(path: &Path) -> Result<Mask, Error> {
    decode(&load_rle(path)?)
}
