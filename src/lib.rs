//! Decodes bencoded documents into owned value trees.
//!
//! The decoder reads its input one token at a time from any [`Source`], so a document can be
//! decoded straight from a byte slice or from an [`std::io::Read`] implementation without first
//! buffering the whole thing. It refuses anything that does not match the bencode grammar and
//! stops at the first fault; there is no partial result.
//!
//! ```
//! use bdecode::Value;
//!
//! let dict = bdecode::decode(b"d3:foo3:bar4:testli4ei3eee")?;
//!
//! assert_eq!(dict.get(&b"foo"[..]).and_then(Value::as_str), Some("bar"));
//! assert_eq!(
//!     dict.get(&b"test"[..]),
//!     Some(&Value::List(vec![Value::from(4i64), Value::from(3i64)]))
//! );
//! # Ok::<(), bdecode::Error>(())
//! ```
//!
//! [`Source`]: decoding::Source
#![no_std]
#![cfg_attr(not(test), warn(missing_docs))]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod decoding;
pub mod value;

#[cfg(feature = "std")]
pub use crate::decoding::decode_reader;
pub use crate::{
    decoding::{Decoder, Error, ErrorKind, decode, decode_value},
    value::{Dict, Integer, Value},
};
