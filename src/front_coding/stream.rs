//! Line-oriented streaming front end.
//!
//! Entries only depend on the string before them, so a blob can be written one
//! string at a time and read back the same way. [`StreamEncoder`] produces
//! exactly the bytes of [`FrontCoder::encode`](crate::FrontCoder::encode) for
//! the same input.

use std::io::{self, BufRead, Cursor, Seek, SeekFrom, Write};

use bytes::BufMut as _;

use crate::front_coding::delta::{plan_step, DeltaCode};
use crate::front_coding::check_record;
use crate::front_coding::lcp::lcp;
use crate::front_coding::size_hint::{self, Framing, HEADER_LEN};
use crate::{FrencError, FrencResult, Malformed};

/// Separator between lines of plain text input and output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// `\n`, like ordinary text files
    #[default]
    Newline,
    /// `\0`, like the output of `find -print0` or `sort -z`
    Nul,
}

impl Delimiter {
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Newline => b'\n',
            Delimiter::Nul => 0,
        }
    }
}

/// Incremental encoder writing each entry as soon as it is pushed.
#[derive(Debug)]
pub struct StreamEncoder<W: Write> {
    writer: W,
    framing: Framing,
    previous: Vec<u8>,
    prefix_len: usize,
    count: usize,
    written: u64,
    scratch: Vec<u8>,
}

impl<W: Write> StreamEncoder<W> {
    /// Creates an encoder producing a bare blob.
    pub fn new(writer: W) -> StreamEncoder<W> {
        StreamEncoder::with_framing(writer, Framing::Bare)
    }

    /// Creates an encoder with the given framing.
    ///
    /// A size-hinted stream starts with an all-zero header, which
    /// [`StreamEncoder::finish_with_hint`] can patch afterwards.
    pub fn with_framing(writer: W, framing: Framing) -> StreamEncoder<W> {
        StreamEncoder {
            writer,
            framing,
            previous: Vec::new(),
            prefix_len: 0,
            count: 0,
            written: 0,
            scratch: Vec::new(),
        }
    }

    /// Appends one string.
    pub fn push(&mut self, string: &[u8]) -> FrencResult<()> {
        check_record(self.count, string)?;

        self.scratch.clear();
        let mut prefix_len = 0;
        if self.count == 0 {
            if self.framing == Framing::SizeHinted {
                self.scratch.put_slice(&size_hint::header(None)?);
            }
            self.scratch.put_slice(string);
        } else {
            let step = plan_step(self.prefix_len, lcp(&self.previous, string));
            step.code.put(&mut self.scratch);
            self.scratch.put_slice(&string[step.prefix_len..]);
            prefix_len = step.prefix_len;
        }
        self.scratch.put_u8(0);
        // a failed write leaves the encoder as it was before this string
        self.writer.write_all(&self.scratch)?;

        self.prefix_len = prefix_len;
        self.written += self.scratch.len() as u64;
        self.previous.clear();
        self.previous.extend_from_slice(string);
        self.count += 1;
        Ok(())
    }

    /// Number of strings pushed so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of bytes written so far, header included.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flushes the writer and hands it back.
    pub fn finish(mut self) -> FrencResult<W> {
        self.writer.flush()?;
        log::debug!(
            "stream encoded {} strings into {} bytes",
            self.count,
            self.written
        );
        Ok(self.writer)
    }
}

impl<W: Write + Seek> StreamEncoder<W> {
    /// Like [`StreamEncoder::finish`], but first fills in the size hint of a
    /// size-hinted stream now that the total size is known.
    pub fn finish_with_hint(mut self) -> FrencResult<W> {
        if self.framing == Framing::SizeHinted && self.count > 0 {
            let end = self.writer.stream_position()?;
            let origin = end - self.written;
            self.writer.seek(SeekFrom::Start(origin))?;
            self.writer
                .write_all(&size_hint::header(Some(self.written))?)?;
            self.writer.seek(SeekFrom::Start(end))?;
        }
        self.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Entries,
    Done,
}

/// Incremental decoder yielding one string at a time.
///
/// An empty input yields nothing. Decoding stops after the first error.
#[derive(Debug)]
pub struct StreamDecoder<R: BufRead> {
    reader: R,
    framing: Framing,
    previous: Vec<u8>,
    prefix_len: usize,
    offset: usize,
    state: State,
}

impl<R: BufRead> StreamDecoder<R> {
    /// Creates a decoder for a bare blob.
    pub fn new(reader: R) -> StreamDecoder<R> {
        StreamDecoder::with_framing(reader, Framing::Bare)
    }

    /// Creates a decoder for a blob with the given framing.
    pub fn with_framing(reader: R, framing: Framing) -> StreamDecoder<R> {
        StreamDecoder {
            reader,
            framing,
            previous: Vec::new(),
            prefix_len: 0,
            offset: 0,
            state: State::Start,
        }
    }

    /// Reads up to and including the next `0`, returning the bytes before it.
    ///
    /// `None` means the input ended right away.
    fn read_terminated(&mut self, start: usize) -> FrencResult<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let n = self.reader.read_until(0, &mut buf)?;
        self.offset += n;
        if n == 0 {
            return Ok(None);
        }
        if buf.pop() != Some(0) {
            return Err(FrencError::malformed(start, Malformed::TruncatedSuffix));
        }
        Ok(Some(buf))
    }

    fn at_eof(&mut self) -> io::Result<bool> {
        Ok(self.reader.fill_buf()?.is_empty())
    }

    fn read_header(&mut self) -> FrencResult<bool> {
        if self.framing == Framing::Bare || self.at_eof()? {
            return Ok(true);
        }
        let mut header = [0; HEADER_LEN];
        self.reader.read_exact(&mut header).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => {
                FrencError::malformed(self.offset, Malformed::TruncatedHeader)
            }
            _ => FrencError::Io(err),
        })?;
        self.offset += HEADER_LEN;
        Ok(false)
    }

    fn read_first(&mut self) -> FrencResult<Option<Vec<u8>>> {
        let empty_allowed = self.read_header()?;
        let start = self.offset;
        match self.read_terminated(start)? {
            Some(first) => Ok(Some(first)),
            None if empty_allowed => Ok(None),
            None => Err(FrencError::malformed(start, Malformed::Empty)),
        }
    }

    fn read_entry(&mut self) -> FrencResult<Option<Vec<u8>>> {
        if self.at_eof()? {
            return Ok(None);
        }
        let start = self.offset;

        let mut raw = [0u8; 3];
        self.reader.read_exact(&mut raw[..1])?;
        let needed = DeltaCode::payload_len(raw[0] as i8);
        self.reader
            .read_exact(&mut raw[1..=needed])
            .map_err(|err| match err.kind() {
                io::ErrorKind::UnexpectedEof => {
                    FrencError::malformed(start, Malformed::TruncatedDelta)
                }
                _ => FrencError::Io(err),
            })?;
        self.offset += 1 + needed;
        let code = DeltaCode::read(&mut Cursor::new(&raw[..=needed]))?;

        let prefix_len = code
            .apply(self.prefix_len)
            .map_err(|reason| FrencError::malformed(start, reason))?;
        if prefix_len > self.previous.len() {
            return Err(FrencError::malformed(
                start,
                Malformed::PrefixExceedsPrevious,
            ));
        }

        let suffix_start = self.offset;
        let Some(suffix) = self.read_terminated(suffix_start)? else {
            return Err(FrencError::malformed(start, Malformed::TrailingMarker));
        };

        let mut string = Vec::with_capacity(prefix_len + suffix.len());
        string.extend_from_slice(&self.previous[..prefix_len]);
        string.extend_from_slice(&suffix);
        self.prefix_len = prefix_len;
        Ok(Some(string))
    }
}

impl<R: BufRead> Iterator for StreamDecoder<R> {
    type Item = FrencResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.state {
            State::Start => self.read_first(),
            State::Entries => self.read_entry(),
            State::Done => return None,
        };
        match result {
            Ok(Some(string)) => {
                self.state = State::Entries;
                self.previous.clone_from(&string);
                Some(Ok(string))
            }
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(err) => {
                self.state = State::Done;
                Some(Err(err))
            }
        }
    }
}

/// Pushes every line of `reader` into `encoder`, returning the number of lines.
///
/// A final line without a delimiter still counts. With
/// [`Delimiter::Newline`], a line containing a `0` byte is rejected with
/// [`FrencError::EmbeddedTerminator`].
pub fn push_lines<R: BufRead, W: Write>(
    mut reader: R,
    encoder: &mut StreamEncoder<W>,
    delimiter: Delimiter,
) -> FrencResult<usize> {
    let delimiter = delimiter.byte();
    let mut line = Vec::new();
    let mut lines = 0;
    loop {
        line.clear();
        if reader.read_until(delimiter, &mut line)? == 0 {
            break;
        }
        if line.last() == Some(&delimiter) {
            line.pop();
        }
        encoder.push(&line)?;
        lines += 1;
    }
    Ok(lines)
}

/// Encodes the lines of `reader` into `writer`.
///
/// Returns the number of lines; an empty input returns 0 and writes nothing.
pub fn encode_lines<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    delimiter: Delimiter,
    framing: Framing,
) -> FrencResult<usize> {
    let mut encoder = StreamEncoder::with_framing(writer, framing);
    let lines = push_lines(reader, &mut encoder, delimiter)?;
    encoder.finish()?;
    Ok(lines)
}

/// Decodes a blob from `reader`, writing each string followed by `delimiter`.
///
/// Returns the number of lines; an empty input returns 0 and writes nothing.
pub fn decode_lines<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    delimiter: Delimiter,
    framing: Framing,
) -> FrencResult<usize> {
    let delimiter = delimiter.byte();
    let mut lines = 0;
    for string in StreamDecoder::with_framing(reader, framing) {
        writer.write_all(&string?)?;
        writer.write_all(&[delimiter])?;
        lines += 1;
    }
    writer.flush()?;
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, FrontCoder};

    fn stream_encode(strings: &[&[u8]], framing: Framing) -> Vec<u8> {
        let mut encoder = StreamEncoder::with_framing(Vec::new(), framing);
        for string in strings {
            encoder.push(string).unwrap();
        }
        encoder.finish().unwrap()
    }

    fn stream_decode(blob: &[u8]) -> FrencResult<Vec<Vec<u8>>> {
        StreamDecoder::new(blob).collect()
    }

    #[test]
    fn matches_batch_encoding() {
        let strings: [&[u8]; 5] = [b"/bin", b"/bin/sh", b"/boot", b"/etc/passwd", b"/etc"];
        assert_eq!(stream_encode(&strings, Framing::Bare), encode(&strings).unwrap());
    }

    #[test]
    fn decodes_what_it_encodes() {
        let strings: [&[u8]; 4] = [b"app", b"apple", b"application", b"banana"];
        let blob = stream_encode(&strings, Framing::Bare);
        assert_eq!(stream_decode(&blob).unwrap(), strings);
    }

    #[test]
    fn empty_stream() {
        assert!(stream_encode(&[], Framing::SizeHinted).is_empty());
        assert!(stream_decode(b"").unwrap().is_empty());
        let decoded: Vec<_> = StreamDecoder::with_framing(&b""[..], Framing::SizeHinted).collect();
        assert!(decoded.is_empty());
    }

    #[test]
    fn malformed_streams_stop_with_data_errors() {
        for blob in [
            &b"abc"[..],
            b"abc\0\x80\0",
            b"abc\0\x7F",
            b"abc\0\x01",
            b"abc\0\x04d\0",
            b"abc\0\xFFd\0",
        ] {
            let results: Vec<_> = StreamDecoder::new(blob).collect();
            let err = results
                .last()
                .unwrap()
                .as_ref()
                .expect_err("stream should fail");
            assert!(err.malformed_reason().is_some(), "{blob:?} gave {err}");
        }
    }

    #[test]
    fn unhinted_header_is_patched() {
        let strings: [&[u8]; 3] = [b"usr", b"usr/bin", b"usr/lib"];
        let hinted = stream_encode(&strings, Framing::SizeHinted);
        assert_eq!(hinted[..HEADER_LEN], [0, 0, 0]);

        let mut encoder = StreamEncoder::with_framing(Cursor::new(Vec::new()), Framing::SizeHinted);
        for string in strings {
            encoder.push(string).unwrap();
        }
        let patched = encoder.finish_with_hint().unwrap().into_inner();
        let expected = FrontCoder::with_framing(Framing::SizeHinted)
            .encode(&strings)
            .unwrap();
        assert_eq!(patched, expected);
        assert_eq!(
            size_hint::read_size_hint(&patched).unwrap(),
            Some(patched.len() as u64)
        );
    }

    /// Fails the `fail_on`-th write call, passes every other one through.
    struct FailingWriter {
        inner: Vec<u8>,
        calls: usize,
        fail_on: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls == self.fail_on {
                return Err(io::Error::other("disk full"));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_push_leaves_state_untouched() {
        let writer = FailingWriter {
            inner: Vec::new(),
            calls: 0,
            fail_on: 2,
        };
        let mut encoder = StreamEncoder::new(writer);
        encoder.push(b"abcdef").unwrap();
        let err = encoder.push(b"abcdefgh").unwrap_err();
        assert!(matches!(err, FrencError::Io(_)));
        assert_eq!(encoder.count(), 1);
        encoder.push(b"abx").unwrap();

        let blob = encoder.finish().unwrap().inner;
        assert_eq!(blob, encode(&["abcdef", "abx"]).unwrap());
        assert_eq!(stream_decode(&blob).unwrap(), [&b"abcdef"[..], b"abx"]);
    }

    #[test]
    fn lines_round_trip() {
        let text = b"/usr\n/usr/bin\n/usr/bin/env\n/usr/lib\n";
        let mut blob = Vec::new();
        let lines = encode_lines(&text[..], &mut blob, Delimiter::Newline, Framing::Bare).unwrap();
        assert_eq!(lines, 4);

        let mut out = Vec::new();
        let lines = decode_lines(&blob[..], &mut out, Delimiter::Newline, Framing::Bare).unwrap();
        assert_eq!(lines, 4);
        assert_eq!(out, text);
    }

    #[test]
    fn last_line_without_delimiter() {
        let mut blob = Vec::new();
        let lines = encode_lines(&b"a\0ab"[..], &mut blob, Delimiter::Nul, Framing::Bare).unwrap();
        assert_eq!(lines, 2);
        assert_eq!(blob, b"a\0\x01b\0");
    }

    #[test]
    fn nul_in_text_line_is_rejected() {
        let err = encode_lines(&b"ok\nb\0d\n"[..], io::sink(), Delimiter::Newline, Framing::Bare)
            .unwrap_err();
        assert!(matches!(err, FrencError::EmbeddedTerminator { index: 1 }));
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut blob = Vec::new();
        let lines = encode_lines(&b""[..], &mut blob, Delimiter::Newline, Framing::SizeHinted).unwrap();
        assert_eq!(lines, 0);
        assert!(blob.is_empty());
    }
}
