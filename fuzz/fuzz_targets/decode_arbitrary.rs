#![no_main]

use frenc::{decode, encode, ErrorKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|blob: &[u8]| {
    match decode(blob) {
        // anything accepted re-encodes to something decoding the same
        Ok(list) => {
            let strings = list.to_vec();
            let again = encode(&strings).expect("decoded strings must be encodable");
            assert_eq!(decode(&again).unwrap(), strings);
        }
        Err(err) => assert_eq!(err.kind(), ErrorKind::Data, "{err}"),
    }
});
