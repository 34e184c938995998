//! Base64 text transport for masks.
//!
//! The wire form is the RLE counts serialised as little-endian `u32`s,
//! followed by an 8-character ASCII decimal shape descriptor (four
//! digits of height, then four of width), Base64-encoded as a single
//! buffer. The fixed-width descriptor caps either dimension at 9999;
//! the cap is kept for compatibility with existing strings but enforced
//! here instead of silently emitting a corrupt descriptor.

use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine;
use log::debug;

use crate::error::Error;
use crate::rle::{decode, encode};
use crate::types::{Mask, Rle};

/// Largest dimension the 4-digit shape descriptor can carry.
pub const MAX_DIM: u32 = 9999;

const SHAPE_DESCRIPTOR_LEN: usize = 8;

/// Encode a mask into its Base64 transport string.
///
/// Identical masks always produce byte-identical strings.
pub fn to_base64(mask: &Mask) -> Result<String, Error> {
    if mask.h() > MAX_DIM {
        return Err(Error::ShapeTooLarge(mask.h()));
    }
    if mask.w() > MAX_DIM {
        return Err(Error::ShapeTooLarge(mask.w()));
    }

    let rle = encode(mask);
    let mut buf = Vec::with_capacity(rle.counts.len() * 4 + SHAPE_DESCRIPTOR_LEN);
    for &c in &rle.counts {
        buf.extend_from_slice(&c.to_le_bytes());
    }
    buf.extend_from_slice(format!("{:04}{:04}", mask.h(), mask.w()).as_bytes());

    debug!(
        "packed {}x{} mask into {} transport bytes",
        mask.h(),
        mask.w(),
        buf.len()
    );
    Ok(BASE64_ENGINE.encode(buf))
}

/// Decode a Base64 transport string back into a mask.
pub fn from_base64(s: &str) -> Result<Mask, Error> {
    let bytes = BASE64_ENGINE.decode(s)?;
    if bytes.len() < SHAPE_DESCRIPTOR_LEN {
        return Err(Error::TruncatedPayload(bytes.len()));
    }

    let (counts_bytes, shape_bytes) = bytes.split_at(bytes.len() - SHAPE_DESCRIPTOR_LEN);
    if !shape_bytes.iter().all(u8::is_ascii_digit) {
        return Err(Error::BadShapeDescriptor(
            String::from_utf8_lossy(shape_bytes).into_owned(),
        ));
    }
    let h = parse_dim(&shape_bytes[..4]);
    let w = parse_dim(&shape_bytes[4..]);

    if counts_bytes.len() % 4 != 0 {
        return Err(Error::RaggedPayload(counts_bytes.len()));
    }
    let counts: Vec<u32> = counts_bytes
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    decode(&Rle::from_counts(counts, h, w))
}

fn parse_dim(digits: &[u8]) -> u32 {
    // Caller has verified the bytes are ASCII digits; 4 digits fit u32.
    digits.iter().fold(0, |acc, &b| acc * 10 + (b - b'0') as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mask() -> Mask {
        Mask::from_rows(&[
            vec![false, true, false, true],
            vec![false, true, false, false],
            vec![false, true, true, false],
        ])
    }

    #[test]
    fn test_base64_roundtrip() {
        let mask = sample_mask();
        let s = to_base64(&mask).unwrap();
        assert_eq!(from_base64(&s).unwrap(), mask);
    }

    #[test]
    fn test_roundtrip_degenerate_masks() {
        for mask in [
            Mask::new(3, 4),
            Mask::from_fn(3, 4, |_, _| true),
            Mask::from_fn(1, 1, |_, _| true),
            Mask::from_fn(2, 2, |y, x| (y + x) % 2 == 1),
        ] {
            let s = to_base64(&mask).unwrap();
            assert_eq!(from_base64(&s).unwrap(), mask);
        }
    }

    #[test]
    fn test_deterministic() {
        let mask = sample_mask();
        assert_eq!(to_base64(&mask).unwrap(), to_base64(&mask).unwrap());
    }

    #[test]
    fn test_wire_layout() {
        // All-background 2x3: counts [6], then "00020003"
        let s = to_base64(&Mask::new(2, 3)).unwrap();
        let bytes = BASE64_ENGINE.decode(s).unwrap();
        assert_eq!(&bytes[..4], &6u32.to_le_bytes());
        assert_eq!(&bytes[4..], b"00020003");
    }

    #[test]
    fn test_shape_too_large() {
        let tall = Mask::new(10_000, 1);
        assert!(matches!(
            to_base64(&tall),
            Err(Error::ShapeTooLarge(10_000))
        ));
        let wide = Mask::new(1, 10_000);
        assert!(matches!(
            to_base64(&wide),
            Err(Error::ShapeTooLarge(10_000))
        ));
    }

    #[test]
    fn test_max_dim_accepted() {
        let mask = Mask::new(MAX_DIM, 1);
        let s = to_base64(&mask).unwrap();
        let back = from_base64(&s).unwrap();
        assert_eq!(back.h(), MAX_DIM);
        assert_eq!(back.w(), 1);
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(from_base64("not base64!!"), Err(Error::Base64(_))));
    }

    #[test]
    fn test_truncated_payload() {
        let s = BASE64_ENGINE.encode(b"abc");
        assert!(matches!(
            from_base64(&s),
            Err(Error::TruncatedPayload(3))
        ));
    }

    #[test]
    fn test_bad_shape_descriptor() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&4u32.to_le_bytes());
        buf.extend_from_slice(b"0002000x");
        let s = BASE64_ENGINE.encode(buf);
        assert!(matches!(
            from_base64(&s),
            Err(Error::BadShapeDescriptor(_))
        ));
    }

    #[test]
    fn test_ragged_payload() {
        let mut buf = vec![0u8; 3];
        buf.extend_from_slice(b"00010003");
        let s = BASE64_ENGINE.encode(buf);
        assert!(matches!(from_base64(&s), Err(Error::RaggedPayload(3))));
    }

    #[test]
    fn test_length_mismatch_surfaces() {
        // counts [5] against a 2x2 shape
        let mut buf = Vec::new();
        buf.extend_from_slice(&5u32.to_le_bytes());
        buf.extend_from_slice(b"00020002");
        let s = BASE64_ENGINE.encode(buf);
        assert!(matches!(
            from_base64(&s),
            Err(Error::LengthMismatch { .. })
        ));
    }
}
