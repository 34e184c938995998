//! CVAT `<mask>` annotation interchange.
//!
//! CVAT stores an object mask as a patch cropped to its bounding box:
//! the `rle` attribute holds comma-separated run lengths taken in
//! row-major order over the patch, and `left`/`top`/`width`/`height`
//! give its placement inside the image. Row-major runs over the patch
//! equal column-major runs over the transposed patch, so both
//! directions reuse the core codec with one transpose.
//!
//! XML tree handling stays with the caller; this module owns the
//! attribute values, which is where the format lives.

use crate::error::Error;
use crate::rle::{decode, encode, to_bbox};
use crate::types::{Mask, Rle};

/// A mask cropped to its bounding box, as carried by a CVAT `<mask>`
/// annotation item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPatch {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    /// Row-major run lengths over the patch, background first.
    pub counts: Vec<u32>,
}

impl MaskPatch {
    /// Crop `mask` to its foreground bounds and encode the patch.
    ///
    /// Fails with [`Error::EmptyMask`] when there is nothing to crop to.
    pub fn from_mask(mask: &Mask) -> Result<MaskPatch, Error> {
        let bbox = to_bbox(mask).ok_or(Error::EmptyMask)?;
        let patch = mask.crop(&bbox).transposed();
        let rle = encode(&patch);
        Ok(MaskPatch {
            left: bbox.x0,
            top: bbox.y0,
            width: bbox.width(),
            height: bbox.height(),
            counts: rle.counts,
        })
    }

    /// Decode the patch and paste it into an all-background H×W canvas.
    pub fn to_mask(&self, img_h: u32, img_w: u32) -> Result<Mask, Error> {
        if self.top as u64 + self.height as u64 > img_h as u64
            || self.left as u64 + self.width as u64 > img_w as u64
        {
            return Err(Error::PatchOutOfBounds {
                left: self.left,
                top: self.top,
                width: self.width,
                height: self.height,
                img_h,
                img_w,
            });
        }

        // The stored runs are row-major over the patch, i.e. column-major
        // over its transpose (width rows by height columns).
        let rle = Rle::from_counts(self.counts.clone(), self.width, self.height);
        let patch = decode(&rle)?.transposed();

        let mut canvas = Mask::new(img_h, img_w);
        canvas.paste(&patch, self.top, self.left);
        Ok(canvas)
    }

    /// The `rle` attribute value: counts joined by `", "`.
    pub fn counts_string(&self) -> String {
        self.counts
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse an `rle` attribute value back into counts.
    pub fn parse_counts(attr: &str) -> Result<Vec<u32>, Error> {
        attr.split(',')
            .map(str::trim)
            .map(|tok| {
                tok.parse::<u32>()
                    .map_err(|_| Error::BadRleAttribute(tok.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mask() -> Mask {
        Mask::from_rows(&[
            vec![false, true, false, false],
            vec![false, true, true, false],
            vec![false, false, true, false],
        ])
    }

    #[test]
    fn test_from_mask_placement() {
        let patch = MaskPatch::from_mask(&sample_mask()).unwrap();
        assert_eq!(patch.left, 1);
        assert_eq!(patch.top, 0);
        assert_eq!(patch.width, 2);
        assert_eq!(patch.height, 3);
    }

    #[test]
    fn test_from_mask_counts_are_row_major() {
        // Patch rows: [1,0], [1,1], [0,1] -> row-major 1,0,1,1,0,1
        let patch = MaskPatch::from_mask(&sample_mask()).unwrap();
        assert_eq!(patch.counts, vec![0, 1, 1, 2, 1, 1]);
    }

    #[test]
    fn test_patch_roundtrip() {
        let mask = sample_mask();
        let patch = MaskPatch::from_mask(&mask).unwrap();
        assert_eq!(patch.to_mask(3, 4).unwrap(), mask);
    }

    #[test]
    fn test_patch_roundtrip_full_canvas() {
        let mask = Mask::from_fn(4, 4, |_, _| true);
        let patch = MaskPatch::from_mask(&mask).unwrap();
        assert_eq!(patch.to_mask(4, 4).unwrap(), mask);
    }

    #[test]
    fn test_patch_roundtrip_into_larger_canvas() {
        let mask = sample_mask();
        let patch = MaskPatch::from_mask(&mask).unwrap();
        let canvas = patch.to_mask(10, 10).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(canvas.get(y, x), mask.get(y, x));
            }
        }
        assert_eq!(
            crate::rle::area(&encode(&canvas)),
            crate::rle::area(&encode(&mask))
        );
    }

    #[test]
    fn test_empty_mask_rejected() {
        assert!(matches!(
            MaskPatch::from_mask(&Mask::new(3, 3)),
            Err(Error::EmptyMask)
        ));
    }

    #[test]
    fn test_out_of_bounds_placement() {
        let patch = MaskPatch::from_mask(&sample_mask()).unwrap();
        assert!(matches!(
            patch.to_mask(2, 2),
            Err(Error::PatchOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_counts_attribute_roundtrip() {
        let patch = MaskPatch::from_mask(&sample_mask()).unwrap();
        let attr = patch.counts_string();
        assert_eq!(attr, "0, 1, 1, 2, 1, 1");
        assert_eq!(MaskPatch::parse_counts(&attr).unwrap(), patch.counts);
    }

    #[test]
    fn test_parse_counts_without_spaces() {
        assert_eq!(MaskPatch::parse_counts("3,1,2").unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn test_parse_counts_rejects_garbage() {
        match MaskPatch::parse_counts("3, x, 2") {
            Err(Error::BadRleAttribute(tok)) => assert_eq!(tok, "x"),
            other => panic!("expected BadRleAttribute, got {other:?}"),
        }
    }
}
