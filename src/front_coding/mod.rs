//! Front coding of ordered string lists.
//!
//! The first string is stored verbatim. Every later string is stored as the
//! change of its shared-prefix length against the previous entry (a one to
//! three byte [`delta::DeltaCode`]), the bytes after the shared prefix, and a
//! `0` terminator.

pub mod delta;
mod decoder;
mod encoder;
pub mod lcp;
pub mod size_hint;
pub mod stream;
mod string_list;

pub use decoder::{count, decode, decode_framed};
pub use encoder::{encode, encoded_len, FrontCoder};
pub(crate) use encoder::check_record;
pub use size_hint::Framing;
pub use string_list::{Iter, StringList};
