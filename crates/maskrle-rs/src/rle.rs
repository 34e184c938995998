//! Run-length codec for column-major binary masks.
//!
//! A mask is flattened column by column and stored as alternating run
//! lengths, background first. The flattening order must match the data
//! already encoded in this format, so it is fixed even though row-major
//! is the more common convention.

use rayon::prelude::*;

use crate::error::Error;
use crate::types::{BBox, Mask, Rle};

/// Encode a mask into alternating run lengths.
///
/// The counts start with a background run; when the first pixel is
/// foreground that run has length 0. The counts always sum to `h * w`.
pub fn encode(mask: &Mask) -> Rle {
    let mut counts = Vec::new();
    let mut prev = false;
    let mut run: u32 = 0;

    for &v in mask.as_slice() {
        if v != prev {
            counts.push(run);
            run = 0;
            prev = v;
        }
        run += 1;
    }
    counts.push(run);

    Rle {
        h: mask.h(),
        w: mask.w(),
        counts,
    }
}

/// Decode run lengths back into a mask.
///
/// Fails with [`Error::LengthMismatch`] when the runs do not cover the
/// target shape exactly, which happens when counts and shape come from
/// mismatched sources.
pub fn decode(rle: &Rle) -> Result<Mask, Error> {
    let expected = rle.h as u64 * rle.w as u64;
    let total: u64 = rle.counts.iter().map(|&c| c as u64).sum();
    if total != expected {
        return Err(Error::LengthMismatch {
            h: rle.h,
            w: rle.w,
            total,
            expected,
        });
    }

    let mut data = vec![false; expected as usize];
    let mut idx = 0usize;
    let mut v = false;
    for &c in &rle.counts {
        let end = idx + c as usize;
        if v {
            data[idx..end].fill(true);
        }
        idx = end;
        v = !v;
    }
    Ok(Mask::from_column_major(data, rle.h, rle.w))
}

/// Foreground pixel count: the sum of the odd-indexed runs.
pub fn area(rle: &Rle) -> u64 {
    rle.counts
        .iter()
        .skip(1)
        .step_by(2)
        .map(|&c| c as u64)
        .sum()
}

/// Tight half-open bounds of the foreground region, or `None` when the
/// mask holds no foreground at all.
pub fn to_bbox(mask: &Mask) -> Option<BBox> {
    let mut bbox: Option<BBox> = None;
    for x in 0..mask.w() {
        for y in 0..mask.h() {
            if !mask.get(y, x) {
                continue;
            }
            let b = bbox.get_or_insert(BBox {
                x0: x,
                y0: y,
                x1: x + 1,
                y1: y + 1,
            });
            b.x0 = b.x0.min(x);
            b.x1 = b.x1.max(x + 1);
            b.y0 = b.y0.min(y);
            b.y1 = b.y1.max(y + 1);
        }
    }
    bbox
}

/// Encode a batch of masks in parallel.
pub fn encode_all(masks: &[Mask]) -> Vec<Rle> {
    masks.par_iter().map(encode).collect()
}

/// Decode a batch of RLEs in parallel, failing on the first bad entry.
pub fn decode_all(rles: &[Rle]) -> Result<Vec<Mask>, Error> {
    rles.par_iter().map(decode).collect()
}
