use serde::{Deserialize, Serialize};

/// Binary segmentation mask stored in column-major order.
///
/// The grid is flattened column by column (Fortran order): pixel
/// (row `y`, column `x`) is at index `y + h * x`. The layout is part of
/// the encoded format, not an implementation detail: run lengths are
/// taken over exactly this flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    h: u32,
    w: u32,
    data: Vec<bool>,
}

impl Mask {
    /// All-background mask of the given shape.
    pub fn new(h: u32, w: u32) -> Self {
        Mask {
            h,
            w,
            data: vec![false; h as usize * w as usize],
        }
    }

    /// Wrap an existing column-major buffer. Length must be `h * w`.
    pub fn from_column_major(data: Vec<bool>, h: u32, w: u32) -> Self {
        assert_eq!(
            data.len(),
            h as usize * w as usize,
            "mask length must equal h*w"
        );
        Mask { h, w, data }
    }

    /// Build from row-major rows, the shape masks usually take in text
    /// or annotation form. All rows must have the same width.
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let h = rows.len() as u32;
        let w = rows.first().map_or(0, |r| r.len() as u32);
        let mut mask = Mask::new(h, w);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len() as u32, w, "mask rows must have equal widths");
            for (x, &v) in row.iter().enumerate() {
                mask.set(y as u32, x as u32, v);
            }
        }
        mask
    }

    /// Build by evaluating `f(y, x)` over the grid.
    pub fn from_fn(h: u32, w: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Mask::new(h, w);
        for x in 0..w {
            for y in 0..h {
                mask.set(y, x, f(y, x));
            }
        }
        mask
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn w(&self) -> u32 {
        self.w
    }

    /// Total cell count (`h * w`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn index(&self, y: u32, x: u32) -> usize {
        debug_assert!(y < self.h && x < self.w, "pixel out of bounds");
        y as usize + self.h as usize * x as usize
    }

    #[inline]
    pub fn get(&self, y: u32, x: u32) -> bool {
        self.data[self.index(y, x)]
    }

    #[inline]
    pub fn set(&mut self, y: u32, x: u32, v: bool) {
        let i = self.index(y, x);
        self.data[i] = v;
    }

    /// Column-major pixel data.
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// True if any pixel is foreground.
    pub fn any(&self) -> bool {
        self.data.iter().any(|&v| v)
    }

    /// W×H mask with rows and columns swapped.
    pub fn transposed(&self) -> Mask {
        let mut out = Mask::new(self.w, self.h);
        for x in 0..self.w {
            for y in 0..self.h {
                out.set(x, y, self.get(y, x));
            }
        }
        out
    }

    /// Copy of the window covered by `bbox`.
    pub fn crop(&self, bbox: &BBox) -> Mask {
        let mut out = Mask::new(bbox.height(), bbox.width());
        for x in bbox.x0..bbox.x1 {
            for y in bbox.y0..bbox.y1 {
                out.set(y - bbox.y0, x - bbox.x0, self.get(y, x));
            }
        }
        out
    }

    /// Overwrite the window starting at (`top`, `left`) with `patch`.
    ///
    /// Panics if the patch does not fit; callers validate placement.
    pub fn paste(&mut self, patch: &Mask, top: u32, left: u32) {
        assert!(
            top as u64 + patch.h as u64 <= self.h as u64
                && left as u64 + patch.w as u64 <= self.w as u64,
            "patch must fit the canvas"
        );
        for x in 0..patch.w {
            for y in 0..patch.h {
                self.set(top + y, left + x, patch.get(y, x));
            }
        }
    }
}

/// Run-length encoding of a mask.
///
/// Counts alternate between background and foreground runs over the
/// column-major flattening, always starting with background: when the
/// first pixel is foreground the leading background run has length 0.
/// Counts from the encoder sum to `h * w` exactly.
///
/// Serialises as the two-field container form used on disk:
/// `{ "size": [h, w], "counts": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RleRepr", into = "RleRepr")]
pub struct Rle {
    pub h: u32,
    pub w: u32,
    /// Alternating run lengths, background first.
    pub counts: Vec<u32>,
}

impl Rle {
    /// Wrap an externally-produced count sequence for the given shape.
    ///
    /// The counts are not validated here; [`crate::rle::decode`] checks
    /// that they cover the shape exactly.
    pub fn from_counts(counts: Vec<u32>, h: u32, w: u32) -> Self {
        Rle { h, w, counts }
    }
}

#[derive(Serialize, Deserialize)]
struct RleRepr {
    size: [u32; 2],
    counts: Vec<u32>,
}

impl From<Rle> for RleRepr {
    fn from(rle: Rle) -> Self {
        RleRepr {
            size: [rle.h, rle.w],
            counts: rle.counts,
        }
    }
}

impl From<RleRepr> for Rle {
    fn from(repr: RleRepr) -> Self {
        Rle {
            h: repr.size[0],
            w: repr.size[1],
            counts: repr.counts,
        }
    }
}

/// Half-open foreground bounds: columns `[x0, x1)`, rows `[y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl BBox {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}
