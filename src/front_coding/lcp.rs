//! Longest common prefix of two byte strings.
//!
//! [`lcp`] is the hottest operation of the encoder, called once per adjacent
//! pair. It compares 16-byte chunks at a time and finishes the sub-chunk tail
//! byte by byte. On x86 targets with SSE2 the chunks are compared with
//! `pcmpeqb`/`pmovmskb`; elsewhere two `u128` words are XORed and the first
//! differing byte is found from the trailing zero count.

/// Number of bytes compared per chunk by the vectorized paths.
pub const CHUNK: usize = 16;

/// Returns the length of the longest common prefix of `a` and `b`.
///
/// The result never exceeds `min(a.len(), b.len())`.
#[inline]
pub fn lcp(a: &[u8], b: &[u8]) -> usize {
    #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
    {
        lcp_sse2(a, b)
    }
    #[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2")))]
    {
        lcp_wide(a, b)
    }
}

/// Byte-at-a-time reference implementation.
#[inline]
pub fn lcp_scalar(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Portable chunked implementation working on `u128` words.
pub fn lcp_wide(a: &[u8], b: &[u8]) -> usize {
    let min_len = a.len().min(b.len());
    let (a, b) = (&a[..min_len], &b[..min_len]);

    let mut done = 0;
    while let (Some(ca), Some(cb)) = (
        a[done..].first_chunk::<CHUNK>(),
        b[done..].first_chunk::<CHUNK>(),
    ) {
        let diff = u128::from_le_bytes(*ca) ^ u128::from_le_bytes(*cb);
        if diff != 0 {
            // little endian: the lowest set bit belongs to the first differing byte
            return done + (diff.trailing_zeros() / 8) as usize;
        }
        done += CHUNK;
    }
    done + lcp_scalar(&a[done..], &b[done..])
}

/// SSE2 implementation.
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
pub fn lcp_sse2(a: &[u8], b: &[u8]) -> usize {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::{__m128i, _mm_cmpeq_epi8, _mm_loadu_si128, _mm_movemask_epi8};
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::{__m128i, _mm_cmpeq_epi8, _mm_loadu_si128, _mm_movemask_epi8};

    let min_len = a.len().min(b.len());
    let chunks = min_len / CHUNK;

    let mut done = 0;
    for _ in 0..chunks {
        // SAFETY: `done + CHUNK <= min_len`, so both 16-byte unaligned loads
        // stay inside their slices; SSE2 is enabled for this target.
        let mask = unsafe {
            let xa = _mm_loadu_si128(a.as_ptr().add(done).cast::<__m128i>());
            let xb = _mm_loadu_si128(b.as_ptr().add(done).cast::<__m128i>());
            _mm_movemask_epi8(_mm_cmpeq_epi8(xa, xb)) as u32
        };
        if mask != 0xFFFF {
            return done + (!mask).trailing_zeros() as usize;
        }
        done += CHUNK;
    }
    done + lcp_scalar(&a[done..min_len], &b[done..min_len])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_paths(a: &[u8], b: &[u8]) -> usize {
        let expected = lcp_scalar(a, b);
        assert_eq!(lcp_wide(a, b), expected, "wide path on {a:?} / {b:?}");
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
        assert_eq!(lcp_sse2(a, b), expected, "sse2 path on {a:?} / {b:?}");
        assert_eq!(lcp(a, b), expected);
        expected
    }

    #[test]
    fn basic_prefixes() {
        assert_eq!(all_paths(b"app", b"apple"), 3);
        assert_eq!(all_paths(b"apple", b"application"), 4);
        assert_eq!(all_paths(b"application", b"banana"), 0);
        assert_eq!(all_paths(b"hello", b"hello"), 5);
    }

    #[test]
    fn empty_strings() {
        assert_eq!(all_paths(b"", b""), 0);
        assert_eq!(all_paths(b"", b"abc"), 0);
        assert_eq!(all_paths(b"abc", b""), 0);
    }

    #[test]
    fn identical_strings_of_every_length() {
        let base: Vec<u8> = (1..=40).collect();
        for len in 0..=base.len() {
            assert_eq!(all_paths(&base[..len], &base[..len]), len);
        }
    }

    #[test]
    fn mismatch_at_every_position() {
        let base: Vec<u8> = (0..40u8).map(|i| b'a' + i % 26).collect();
        for len in 1..=base.len() {
            for pos in 0..len {
                let mut other = base[..len].to_vec();
                other[pos] ^= 0x20;
                assert_eq!(all_paths(&base[..len], &other), pos, "len {len}, pos {pos}");
            }
        }
    }

    #[test]
    fn different_lengths_cross_chunk_boundaries() {
        let base: Vec<u8> = (0..40u8).map(|i| b'A' + i % 26).collect();
        for la in 0..=base.len() {
            for lb in 0..=base.len() {
                assert_eq!(all_paths(&base[..la], &base[..lb]), la.min(lb));
            }
        }
    }

    #[test]
    fn differs_only_in_last_byte() {
        for len in 1..=40 {
            let a = vec![b'x'; len];
            let mut b = a.clone();
            b[len - 1] = b'y';
            assert_eq!(all_paths(&a, &b), len - 1);
        }
    }

    #[test]
    fn wide_path_sees_a_mismatch_in_every_chunk() {
        let a: Vec<u8> = (0..=255u8).cycle().take(5 * CHUNK + 3).collect();
        for chunk in 0..5 {
            for lane in [0, CHUNK / 2, CHUNK - 1] {
                let pos = chunk * CHUNK + lane;
                let mut b = a.clone();
                b[pos] = b[pos].wrapping_add(1);
                assert_eq!(lcp_wide(&a, &b), pos, "chunk {chunk}, lane {lane}");
                assert_eq!(lcp_wide(&b, &a), pos, "chunk {chunk}, lane {lane}");
            }
        }
    }

    #[test]
    fn high_bytes_are_compared_exactly() {
        let a = [0xFFu8; 33];
        let mut b = a;
        b[17] = 0x7F;
        assert_eq!(all_paths(&a, &b), 17);
    }
}
