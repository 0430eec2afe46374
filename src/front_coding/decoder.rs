use std::io::Cursor;

use bytes::Bytes;

use crate::cursor::TerminatedCursor as _;
use crate::front_coding::delta::DeltaCode;
use crate::front_coding::size_hint::Framing;
use crate::{FrencError, FrencResult, FrontCoder, Malformed, StringList};

/// One entry after the first: the prefix kept from the previous string and
/// the new suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry<'a> {
    prefix_len: usize,
    suffix: &'a [u8],
}

/// Validating walk over the entries of a blob.
///
/// Both decoding passes use the same walk, so a blob accepted by the sizing
/// pass cannot fail during emission.
struct Walker<'a> {
    cursor: Cursor<&'a [u8]>,
    /// Running prefix length
    prefix_len: usize,
    /// Length of the most recently decoded string
    previous_len: usize,
}

impl<'a> Walker<'a> {
    /// Checks the blob envelope and reads the first string, which starts at `start`.
    fn new(blob: &'a [u8], start: usize) -> FrencResult<(Walker<'a>, &'a [u8])> {
        match blob.last() {
            _ if blob.len() <= start => {
                return Err(FrencError::malformed(blob.len(), Malformed::Empty));
            }
            Some(0) => {}
            _ => {
                return Err(FrencError::malformed(
                    blob.len() - 1,
                    Malformed::MissingTerminator,
                ));
            }
        }

        let mut cursor = Cursor::new(blob);
        cursor.set_position(start as u64);
        let first = cursor
            .read_terminated()
            .ok_or_else(|| FrencError::malformed(start, Malformed::TruncatedSuffix))?;

        let walker = Walker {
            cursor,
            prefix_len: 0,
            previous_len: first.len(),
        };
        Ok((walker, first))
    }

    fn next_entry(&mut self) -> FrencResult<Option<Entry<'a>>> {
        if self.cursor.left() == 0 {
            return Ok(None);
        }
        let start = self.cursor.offset();
        let code = DeltaCode::read(&mut self.cursor)?;
        // every code is followed by at least a terminator
        if self.cursor.left() == 0 {
            return Err(FrencError::malformed(start, Malformed::TrailingMarker));
        }

        let prefix_len = code
            .apply(self.prefix_len)
            .map_err(|reason| FrencError::malformed(start, reason))?;
        if prefix_len > self.previous_len {
            return Err(FrencError::malformed(
                start,
                Malformed::PrefixExceedsPrevious,
            ));
        }

        let suffix_start = self.cursor.offset();
        let suffix = self
            .cursor
            .read_terminated()
            .ok_or_else(|| FrencError::malformed(suffix_start, Malformed::TruncatedSuffix))?;

        self.prefix_len = prefix_len;
        self.previous_len = prefix_len + suffix.len();
        Ok(Some(Entry { prefix_len, suffix }))
    }
}

impl FrontCoder {
    /// Decodes a blob produced by [`FrontCoder::encode`] with the same framing.
    ///
    /// The blob is validated completely before any output is allocated; a
    /// malformed blob yields [`FrencError::MalformedData`] and nothing else.
    pub fn decode(&self, blob: &[u8]) -> FrencResult<StringList> {
        let start = self.framing().header_len();
        if blob.len() < start {
            return Err(FrencError::malformed(blob.len(), Malformed::TruncatedHeader));
        }

        // first pass: validate, count strings and bytes
        let (mut walker, first) = Walker::new(blob, start)?;
        let mut count = 1usize;
        let mut total = first.len();
        while let Some(entry) = walker.next_entry()? {
            count += 1;
            total = total
                .checked_add(entry.prefix_len + entry.suffix.len())
                .ok_or_else(|| {
                    FrencError::malformed(walker.cursor.offset(), Malformed::PrefixOverflow)
                })?;
        }

        // second pass: one buffer for all strings, one for the offsets
        let mut data = Vec::new();
        data.try_reserve_exact(total)?;
        let mut ends = Vec::new();
        ends.try_reserve_exact(count)?;

        let (mut walker, first) = Walker::new(blob, start)?;
        data.extend_from_slice(first);
        ends.push(data.len());
        let mut previous_start = 0;
        while let Some(entry) = walker.next_entry()? {
            let current_start = data.len();
            data.extend_from_within(previous_start..previous_start + entry.prefix_len);
            data.extend_from_slice(entry.suffix);
            ends.push(data.len());
            previous_start = current_start;
        }
        debug_assert_eq!(data.len(), total, "sizing and emission passes disagree");
        debug_assert_eq!(ends.len(), count);

        log::debug!(
            "decoded {count} strings ({total} bytes) from {} bytes",
            blob.len()
        );
        Ok(StringList::from_parts(Bytes::from(data), ends))
    }
}

/// Decodes a bare blob. See [`FrontCoder::decode`].
pub fn decode(blob: &[u8]) -> FrencResult<StringList> {
    FrontCoder::new().decode(blob)
}

/// Decodes a blob carrying a size hint header. See [`Framing::SizeHinted`].
pub fn decode_framed(blob: &[u8]) -> FrencResult<StringList> {
    FrontCoder::with_framing(Framing::SizeHinted).decode(blob)
}

/// Counts the strings in a bare blob without decoding them.
pub fn count(blob: &[u8]) -> FrencResult<usize> {
    let (mut walker, _) = Walker::new(blob, 0)?;
    let mut count = 1;
    while walker.next_entry()?.is_some() {
        count += 1;
    }
    Ok(count)
}
