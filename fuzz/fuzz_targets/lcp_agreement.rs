#![no_main]

use frenc::front_coding::lcp::{lcp, lcp_scalar, lcp_wide};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|(a, b): (Vec<u8>, Vec<u8>)| {
    let expected = lcp_scalar(&a, &b);
    assert_eq!(lcp_wide(&a, &b), expected);
    assert_eq!(lcp(&a, &b), expected);
    assert_eq!(lcp(&b, &a), expected);
});
