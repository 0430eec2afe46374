#![no_main]

use frenc::FrontCoder;
use libfuzzer_sys::fuzz_target;

mod common;
use common::FuzzInput;

fuzz_target!(|input: FuzzInput| {
    let strings = input.encodable();
    let coder = FrontCoder::with_framing(input.framing.into());

    let blob = match coder.encode(&strings) {
        Ok(blob) => blob,
        Err(_) => {
            assert!(strings.is_empty(), "only empty input may fail: {input:?}");
            return;
        }
    };
    assert_eq!(blob.len(), coder.encoded_len(&strings).unwrap());

    let decoded = coder.decode(&blob).expect("encoded blob must decode");
    assert_eq!(decoded, strings, "round trip mismatch for {input:?}");
});
