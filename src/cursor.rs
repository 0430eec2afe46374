use std::io::Cursor;

/// Extension trait for `Cursor<&[u8]>` reading NUL-terminated runs.
pub trait TerminatedCursor<'a> {
    /// Returns the bytes up to the next `0` and moves past the terminator.
    ///
    /// Returns `None` and leaves the position alone if no terminator remains.
    fn read_terminated(&mut self) -> Option<&'a [u8]>;
    /// Current position as a slice index.
    fn offset(&self) -> usize;
    /// Number of bytes left after the current position.
    fn left(&self) -> usize;
}

impl<'a> TerminatedCursor<'a> for Cursor<&'a [u8]> {
    fn read_terminated(&mut self) -> Option<&'a [u8]> {
        let data: &'a [u8] = *self.get_ref();
        let start = self.offset();
        let rest = data.get(start..)?;
        let len = rest.iter().position(|&b| b == 0)?;
        self.set_position((start + len + 1) as u64); // skip the terminator
        Some(&rest[..len])
    }

    fn offset(&self) -> usize {
        self.position() as usize
    }

    fn left(&self) -> usize {
        self.get_ref().len().saturating_sub(self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_consecutive_runs() {
        let data: &[u8] = b"abc\0\0x\0";
        let mut cursor = Cursor::new(data);
        assert_eq!(cursor.read_terminated(), Some(&b"abc"[..]));
        assert_eq!(cursor.read_terminated(), Some(&b""[..]));
        assert_eq!(cursor.left(), 2);
        assert_eq!(cursor.read_terminated(), Some(&b"x"[..]));
        assert_eq!(cursor.left(), 0);
        assert_eq!(cursor.read_terminated(), None);
    }

    #[test]
    fn unterminated_run_keeps_position() {
        let data: &[u8] = b"ab\0cd";
        let mut cursor = Cursor::new(data);
        cursor.read_terminated();
        assert_eq!(cursor.read_terminated(), None);
        assert_eq!(cursor.offset(), 3);
    }
}
