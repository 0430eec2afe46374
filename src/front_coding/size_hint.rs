//! 12-bit packed size hints and the optional header carrying one.
//!
//! A packed hint has a 7-bit mantissa with an implicit top bit and a 5-bit
//! exponent, covering `[0, 255 << 30]`. Values up to 256 are "denormal" and
//! stand for themselves. Packing rounds up, so an unpacked hint is always an
//! upper bound of the original value, on average less than 0.3% above it.
//! Packing is monotone.

use crate::{FrencError, FrencResult, Malformed};

/// Largest valid packed hint.
pub const PACKED_MAX: u16 = 4095;
/// Largest value that can be packed (`unpack(PACKED_MAX)`).
pub const UNPACKED_MAX: u64 = 255 << 30;
/// Largest packed hint whose unpacked value fits 32 bits.
pub const PACKED_MAX32: u16 = 3327;
/// Size of the optional header preceding a framed blob.
pub const HEADER_LEN: usize = 3;

const DENORMAL_MAX: u64 = 256;
const MANTISSA_MASK: u64 = 0x7F;

/// Packs `n` into 12 bits, rounding up.
pub fn pack(n: u64) -> FrencResult<u16> {
    if n <= DENORMAL_MAX {
        return Ok(n as u16);
    }
    if n > UNPACKED_MAX {
        return Err(FrencError::HintOutOfRange(n));
    }
    // e = 1 is taken by the denormals
    let mut n = n;
    let mut exponent = 1;
    while n >= 256 {
        n = n / 2 + n % 2;
        exponent += 1;
    }
    Ok((exponent << 7 | n & MANTISSA_MASK) as u16)
}

/// Expands a packed hint into the smallest value it stands for.
///
/// Codes above [`PACKED_MAX`] only use their low 12 bits.
pub fn unpack(code: u16) -> u64 {
    let code = u64::from(code & PACKED_MAX);
    if code <= DENORMAL_MAX {
        return code;
    }
    let mantissa = (code & MANTISSA_MASK) + 128;
    let exponent = (code >> 7) - 1;
    mantissa << exponent
}

/// How an encoded blob is framed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Framing {
    /// The blob starts directly with the first string.
    #[default]
    Bare,
    /// A three-byte header with a packed size hint precedes the first string.
    SizeHinted,
}

impl Framing {
    /// Number of bytes preceding the first string.
    pub fn header_len(self) -> usize {
        match self {
            Framing::Bare => 0,
            Framing::SizeHinted => HEADER_LEN,
        }
    }
}

/// Builds a header for a framed blob of `total` bytes; `None` writes the
/// all-zero "no hint" header.
pub fn header(total: Option<u64>) -> FrencResult<[u8; HEADER_LEN]> {
    let code = match total {
        Some(total) => u32::from(pack(total)?),
        None => 0,
    };
    let word = code.to_le_bytes();
    Ok([word[0], word[1], word[2]])
}

/// Reads the size hint from the header of a [`Framing::SizeHinted`] blob.
///
/// Returns `None` for an all-zero header.
pub fn read_size_hint(blob: &[u8]) -> FrencResult<Option<u64>> {
    let Some(head) = blob.get(..HEADER_LEN) else {
        return Err(FrencError::malformed(blob.len(), Malformed::TruncatedHeader));
    };
    let word = u32::from_le_bytes([head[0], head[1], head[2], 0]);
    if word == 0 {
        return Ok(None);
    }
    Ok(Some(unpack(word as u16)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denormals_stand_for_themselves() {
        for n in 0..=256 {
            assert_eq!(pack(n).unwrap(), n as u16);
            assert_eq!(unpack(n as u16), n);
        }
    }

    #[test]
    fn first_normal_values() {
        assert_eq!(pack(257).unwrap(), 257);
        assert_eq!(unpack(257), 258);
        assert_eq!(pack(258).unwrap(), 257);
        assert_eq!(unpack(pack(511).unwrap()), 512);
    }

    #[test]
    fn extremes() {
        assert_eq!(pack(UNPACKED_MAX).unwrap(), PACKED_MAX);
        assert_eq!(unpack(PACKED_MAX), UNPACKED_MAX);
        assert!(matches!(
            pack(UNPACKED_MAX + 1),
            Err(FrencError::HintOutOfRange(_))
        ));
        assert!(unpack(PACKED_MAX32) <= u64::from(u32::MAX));
        assert!(unpack(PACKED_MAX32 + 1) > u64::from(u32::MAX));
    }

    #[test]
    fn rounds_up_and_is_monotone() {
        let mut previous = 0;
        let mut n = 0u64;
        while n <= UNPACKED_MAX {
            let code = pack(n).unwrap();
            let back = unpack(code);
            assert!(back >= n, "unpack(pack({n})) = {back}");
            assert!(code >= previous, "pack is not monotone at {n}");
            // the 7-bit mantissa keeps the error below 1/127
            assert!((back - n) * 127 <= n, "too coarse at {n}");
            previous = code;
            n = n * 9 / 8 + 1;
        }
    }

    #[test]
    fn every_code_is_a_fixed_point() {
        for code in 0..=PACKED_MAX {
            assert_eq!(pack(unpack(code)).unwrap(), code);
        }
    }

    #[test]
    fn header_round_trip() {
        let head = header(Some(1_000_000)).unwrap();
        assert_eq!(head[2] & 0xF0, 0);
        let hint = read_size_hint(&head).unwrap().unwrap();
        assert!(hint >= 1_000_000);
        assert_eq!(read_size_hint(&header(None).unwrap()).unwrap(), None);
        assert!(read_size_hint(&[1, 0]).is_err());
    }
}
