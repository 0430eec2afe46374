use std::io::Cursor;

use bytes::{Buf as _, BufMut};

use crate::cursor::TerminatedCursor as _;
use crate::{FrencError, FrencResult, Malformed};

/// Largest delta stored in a single byte.
pub const SHORT_MAX: i32 = 126;
/// Smallest delta stored in a single byte.
pub const SHORT_MIN: i32 = -126;
/// Largest delta stored as marker plus one byte.
pub const MEDIUM_MAX: i32 = 382;
/// Smallest delta stored as marker plus one byte.
pub const MEDIUM_MIN: i32 = -382;
/// Largest delta the escape can carry; bigger deltas are clamped.
pub const LONG_MAX: i32 = i16::MAX as i32 + MEDIUM_MAX + 1;
/// Smallest delta the escape can carry; smaller deltas reset the prefix.
pub const LONG_MIN: i32 = -(i16::MAX as i32) - LONG_OFFSET;
/// Magnitude subtracted from a long delta before it is stored.
const LONG_OFFSET: i32 = MEDIUM_MAX + 1;
/// The one delta inside the long range without an encoding: its payload
/// would be `0`, which already stands for `+383`.
pub const LONG_GAP: i32 = -LONG_OFFSET;

/// Marker of a positive two-byte delta.
pub const MEDIUM_POSITIVE: i8 = 127;
/// Marker of a negative two-byte delta.
pub const MEDIUM_NEGATIVE: i8 = -127;
/// Marker of the three-byte escape.
pub const LONG_ESCAPE: i8 = i8::MIN;
/// Escape payload meaning "prefix length starts over from zero".
pub const RESET: i16 = i16::MIN;

/// Longest string the prefix arithmetic accepts.
pub const MAX_STRING_LEN: usize = i32::MAX as usize;

/// One encoded prefix-length delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaCode {
    /// `[-126, 126]`, one byte
    Short(i8),
    /// `[-382, -127]` or `[127, 382]`, marker plus one byte
    Medium(i16),
    /// `[-33150, -384]` or `[383, 33150]`, escape plus `i16`
    Long(i32),
    /// Escape plus [`RESET`]: the prefix length drops to zero
    Reset,
}

/// The code chosen for one entry and the prefix length it leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub code: DeltaCode,
    /// Number of bytes taken from the previous string.
    pub prefix_len: usize,
}

impl DeltaCode {
    /// Classifies `delta` into the narrowest code able to carry it.
    ///
    /// Returns `None` when `delta` is outside `[LONG_MIN, LONG_MAX]` or is
    /// [`LONG_GAP`].
    pub fn from_delta(delta: i32) -> Option<DeltaCode> {
        match delta {
            SHORT_MIN..=SHORT_MAX => Some(DeltaCode::Short(delta as i8)),
            MEDIUM_MIN..=MEDIUM_MAX => Some(DeltaCode::Medium(delta as i16)),
            LONG_GAP => None,
            LONG_MIN..=LONG_MAX => Some(DeltaCode::Long(delta)),
            _ => None,
        }
    }

    /// Encoded size in bytes.
    pub fn width(self) -> usize {
        match self {
            DeltaCode::Short(_) => 1,
            DeltaCode::Medium(_) => 2,
            DeltaCode::Long(_) | DeltaCode::Reset => 3,
        }
    }

    /// Writes the code.
    pub fn put<B: BufMut>(self, buf: &mut B) {
        match self {
            DeltaCode::Short(delta) => buf.put_i8(delta),
            DeltaCode::Medium(delta) if delta > 0 => {
                buf.put_i8(MEDIUM_POSITIVE);
                buf.put_u8((delta - 127) as u8);
            }
            DeltaCode::Medium(delta) => {
                buf.put_i8(MEDIUM_NEGATIVE);
                buf.put_u8((-delta - 127) as u8);
            }
            DeltaCode::Long(delta) => {
                let value = if delta > 0 {
                    delta - LONG_OFFSET
                } else {
                    delta + LONG_OFFSET
                };
                debug_assert!(value > i32::from(RESET) && value <= i32::from(i16::MAX));
                debug_assert!(value != 0 || delta > 0, "{LONG_GAP} has no long code");
                buf.put_i8(LONG_ESCAPE);
                buf.put_i16_le(value as i16);
            }
            DeltaCode::Reset => {
                buf.put_i8(LONG_ESCAPE);
                buf.put_i16_le(RESET);
            }
        }
    }

    /// Number of bytes following `marker` within the same code.
    pub fn payload_len(marker: i8) -> usize {
        match marker {
            MEDIUM_POSITIVE | MEDIUM_NEGATIVE => 1,
            LONG_ESCAPE => 2,
            _ => 0,
        }
    }

    /// Reads one code from `cursor`.
    ///
    /// The caller must have checked that at least one byte is left.
    pub fn read(cursor: &mut Cursor<&[u8]>) -> FrencResult<DeltaCode> {
        let start = cursor.offset();
        let marker = cursor.get_i8();
        let needed = DeltaCode::payload_len(marker);
        if needed == 0 {
            return Ok(DeltaCode::Short(marker));
        }
        if cursor.left() < needed {
            return Err(FrencError::malformed(start, Malformed::TruncatedDelta));
        }
        Ok(match marker {
            MEDIUM_POSITIVE => DeltaCode::Medium(127 + i16::from(cursor.get_u8())),
            MEDIUM_NEGATIVE => DeltaCode::Medium(-127 - i16::from(cursor.get_u8())),
            _ => match cursor.get_i16_le() {
                RESET => DeltaCode::Reset,
                value if value >= 0 => DeltaCode::Long(i32::from(value) + LONG_OFFSET),
                value => DeltaCode::Long(i32::from(value) - LONG_OFFSET),
            },
        })
    }

    /// The signed delta carried by the code; `None` for [`DeltaCode::Reset`].
    pub fn delta(self) -> Option<i32> {
        match self {
            DeltaCode::Short(delta) => Some(i32::from(delta)),
            DeltaCode::Medium(delta) => Some(i32::from(delta)),
            DeltaCode::Long(delta) => Some(delta),
            DeltaCode::Reset => None,
        }
    }

    /// Applies the code to the running prefix length.
    ///
    /// Fails with [`Malformed::PrefixUnderflow`] if the prefix would shrink
    /// below zero and [`Malformed::PrefixOverflow`] if it would exceed
    /// [`MAX_STRING_LEN`].
    pub fn apply(self, previous: usize) -> Result<usize, Malformed> {
        let Some(delta) = self.delta() else {
            return Ok(0);
        };
        let magnitude = delta.unsigned_abs() as usize;
        if delta < 0 {
            previous
                .checked_sub(magnitude)
                .ok_or(Malformed::PrefixUnderflow)
        } else {
            match previous.checked_add(magnitude) {
                Some(len) if len <= MAX_STRING_LEN => Ok(len),
                _ => Err(Malformed::PrefixOverflow),
            }
        }
    }
}

/// Chooses the code taking the running prefix length from `previous` to `lcp`.
///
/// Deltas above [`LONG_MAX`] are clamped, claiming a shorter prefix than is
/// actually shared. Deltas below [`LONG_MIN`] and [`LONG_GAP`] become
/// [`DeltaCode::Reset`] and the whole string is stored as suffix.
pub fn plan_step(previous: usize, lcp: usize) -> Step {
    debug_assert!(previous <= MAX_STRING_LEN && lcp <= MAX_STRING_LEN);
    let delta = lcp as i64 - previous as i64;
    if delta > i64::from(LONG_MAX) {
        log::trace!("clamping prefix delta {delta} to {LONG_MAX}");
        return Step {
            code: DeltaCode::Long(LONG_MAX),
            prefix_len: previous + LONG_MAX as usize,
        };
    }
    if delta < i64::from(LONG_MIN) {
        log::trace!("prefix delta {delta} is out of range, resetting prefix");
        return Step {
            code: DeltaCode::Reset,
            prefix_len: 0,
        };
    }
    match DeltaCode::from_delta(delta as i32) {
        Some(code) => Step {
            code,
            prefix_len: lcp,
        },
        None => {
            log::trace!("prefix delta {delta} has no long code, resetting prefix");
            Step {
                code: DeltaCode::Reset,
                prefix_len: 0,
            }
        }
    }
}
