use bytes::BufMut;

use crate::front_coding::delta::{plan_step, MAX_STRING_LEN};
use crate::front_coding::lcp::lcp;
use crate::front_coding::size_hint::{self, Framing};
use crate::{FrencError, FrencResult};

/// Front coding codec for lists of byte strings.
///
/// Every entry after the first is stored as the change of the shared-prefix
/// length against the previous entry, followed by the new suffix and a `0`
/// terminator. The input order is kept as is; sorted input compresses best.
///
/// ```
/// use frenc::FrontCoder;
///
/// let coder = FrontCoder::new();
/// let blob = coder.encode(&["app", "apple", "application"]).unwrap();
/// assert_eq!(blob, b"app\0\x03le\0\x01ication\0");
///
/// let strings = coder.decode(&blob).unwrap();
/// assert_eq!(strings, ["app", "apple", "application"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontCoder {
    framing: Framing,
}

/// Result of the sizing pass.
struct Plan {
    /// Encoded size without any header.
    total: usize,
    /// Effective prefix length of every entry, replayed by the emission pass.
    prefixes: Vec<u32>,
}

impl FrontCoder {
    /// Creates a codec producing bare blobs.
    pub fn new() -> FrontCoder {
        FrontCoder::default()
    }

    /// Creates a codec using the given framing.
    pub fn with_framing(framing: Framing) -> FrontCoder {
        FrontCoder { framing }
    }

    /// The framing written by [`FrontCoder::encode`] and expected by
    /// [`FrontCoder::decode`].
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Computes the exact encoded size of `strings` without encoding them.
    pub fn encoded_len<S: AsRef<[u8]>>(&self, strings: &[S]) -> FrencResult<usize> {
        Ok(size_pass(strings)?.total + self.framing.header_len())
    }

    /// Encodes `strings` into a freshly allocated blob of exactly the encoded size.
    pub fn encode<S: AsRef<[u8]>>(&self, strings: &[S]) -> FrencResult<Vec<u8>> {
        let plan = size_pass(strings)?;
        let total = plan.total + self.framing.header_len();

        let mut out = Vec::new();
        out.try_reserve_exact(total)?;
        self.put_header(&mut out, total)?;
        emit_pass(strings, &plan.prefixes, &mut out);
        debug_assert_eq!(out.len(), total, "sizing and emission passes disagree");

        log::debug!("encoded {} strings into {total} bytes", strings.len());
        Ok(out)
    }

    /// Encodes `strings` into a caller-provided buffer, returning the part written.
    pub fn encode_to_slice<'out, S: AsRef<[u8]>>(
        &self,
        strings: &[S],
        output: &'out mut [u8],
    ) -> FrencResult<&'out [u8]> {
        let plan = size_pass(strings)?;
        let total = plan.total + self.framing.header_len();
        if output.len() < total {
            return Err(FrencError::OutputBufferTooSmall {
                needed: total,
                available: output.len(),
            });
        }

        let mut window = &mut output[..total];
        self.put_header(&mut window, total)?;
        emit_pass(strings, &plan.prefixes, &mut window);
        debug_assert!(window.is_empty(), "sizing and emission passes disagree");

        Ok(&output[..total])
    }

    fn put_header<B: BufMut>(&self, buf: &mut B, total: usize) -> FrencResult<()> {
        if self.framing == Framing::SizeHinted {
            buf.put_slice(&size_hint::header(Some(total as u64))?);
        }
        Ok(())
    }
}

/// Encodes `strings` as a bare blob. See [`FrontCoder::encode`].
pub fn encode<S: AsRef<[u8]>>(strings: &[S]) -> FrencResult<Vec<u8>> {
    FrontCoder::new().encode(strings)
}

/// Exact size of the bare blob [`encode`] would produce.
pub fn encoded_len<S: AsRef<[u8]>>(strings: &[S]) -> FrencResult<usize> {
    FrontCoder::new().encoded_len(strings)
}

/// Rejects strings the format cannot carry.
pub(crate) fn check_record(index: usize, string: &[u8]) -> FrencResult<()> {
    if string.len() > MAX_STRING_LEN {
        return Err(FrencError::StringTooLong {
            index,
            len: string.len(),
        });
    }
    if string.contains(&0) {
        return Err(FrencError::EmbeddedTerminator { index });
    }
    Ok(())
}

/// First pass: validates the input, computes every prefix length once and
/// sums up the encoded size.
fn size_pass<S: AsRef<[u8]>>(strings: &[S]) -> FrencResult<Plan> {
    let first = strings.first().ok_or(FrencError::EmptyInput)?.as_ref();
    check_record(0, first)?;

    let mut prefixes = Vec::new();
    prefixes.try_reserve_exact(strings.len())?;
    prefixes.push(0);

    let mut total = first.len() + 1;
    let mut previous = 0;
    for (index, pair) in strings.windows(2).enumerate() {
        let (before, current) = (pair[0].as_ref(), pair[1].as_ref());
        check_record(index + 1, current)?;

        let step = plan_step(previous, lcp(before, current));
        total += step.code.width() + (current.len() - step.prefix_len) + 1;
        prefixes.push(step.prefix_len as u32);
        previous = step.prefix_len;
    }
    Ok(Plan { total, prefixes })
}

/// Second pass: writes the blob, replaying the prefix lengths of the first.
fn emit_pass<S: AsRef<[u8]>, B: BufMut>(strings: &[S], prefixes: &[u32], buf: &mut B) {
    buf.put_slice(strings[0].as_ref());
    buf.put_u8(0);

    let mut previous = 0;
    for (string, &prefix) in strings.iter().zip(prefixes).skip(1) {
        let step = plan_step(previous, prefix as usize);
        step.code.put(buf);
        buf.put_slice(&string.as_ref()[step.prefix_len..]);
        buf.put_u8(0);
        previous = step.prefix_len;
    }
}
