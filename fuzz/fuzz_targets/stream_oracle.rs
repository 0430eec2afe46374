#![no_main]

use std::io::Cursor;

use frenc::{FrontCoder, StreamDecoder, StreamEncoder};
use libfuzzer_sys::fuzz_target;

mod common;
use common::FuzzInput;

// The streaming encoder must produce exactly the batch output.
fuzz_target!(|input: FuzzInput| {
    let strings = input.encodable();
    if strings.is_empty() {
        return;
    }
    let framing = input.framing.into();

    let mut encoder = StreamEncoder::with_framing(Cursor::new(Vec::new()), framing);
    for string in &strings {
        encoder.push(string).unwrap();
    }
    let streamed = encoder.finish_with_hint().unwrap().into_inner();
    let batch = FrontCoder::with_framing(framing).encode(&strings).unwrap();
    assert_eq!(streamed, batch, "stream and batch differ for {input:?}");

    let decoded: Vec<Vec<u8>> = StreamDecoder::with_framing(streamed.as_slice(), framing)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(decoded, strings);
});
