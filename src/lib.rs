#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod cursor;
mod error;
pub mod front_coding;

pub use error::{ErrorKind, FrencError, FrencResult, Malformed};
pub use front_coding::lcp::lcp;
pub use front_coding::size_hint::{read_size_hint, Framing};
pub use front_coding::stream::{
    decode_lines, encode_lines, Delimiter, StreamDecoder, StreamEncoder,
};
pub use front_coding::{
    count, decode, decode_framed, encode, encoded_len, FrontCoder, StringList,
};
