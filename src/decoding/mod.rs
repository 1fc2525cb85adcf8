//! Decodes a bencoded document
//!
//! # Basic decoding
//! Most callers only need one of the free functions. [`decode`] enforces that the document is a
//! dictionary at its outermost level, which is what torrent metainfo and most protocol messages
//! are:
//!
//! ```
//! # use bdecode::decoding::decode;
//! #
//! let dict = decode(b"d3:fooi1ee")?;
//! assert_eq!(dict[&b"foo"[..]].as_i64(), Some(1));
//! # Ok::<(), bdecode::Error>(())
//! ```
//!
//! [`decode_value`] accepts a value of any type at the top level.
//!
//! # Configuring a decoder
//!
//! Decoders have a depth limit to prevent stack exhaustion from hostile inputs. The default,
//! [`DEFAULT_MAX_DEPTH`] (512), is high enough for anything you'd see in the wild and fits a
//! 2 MiB thread stack even in debug builds. Raising it makes the decoder use more stack, so only
//! do so on threads with room to spare, and set the bounds tightly when you know the shape of
//! your input:
//!
//! ```
//! # use bdecode::decoding::Decoder;
//! #
//! # let buf: &[u8] = b"d3:fooi1ee";
//! let _dict = Decoder::new(buf).with_max_depth(3).decode()?;
//! # Ok::<(), bdecode::Error>(())
//! ```
//!
//! Atoms (integers and strings) have depth zero, and lists and dicts have a depth equal to the
//! depth of their deepest member plus one. As a special case, an empty list or dict has depth 1.
//!
//! The length of a single byte string can be capped the same way with
//! [`Decoder::with_max_string_length`].
//!
//! # Streaming input
//!
//! With the `std` feature enabled, any [`std::io::Read`] can be decoded directly. The reader is
//! consumed one token at a time; short reads are retried until a length-prefixed string is
//! complete.
//!
//! ```
//! # #[cfg(feature = "std")]
//! # {
//! let input = std::io::Cursor::new(b"d4:spaml1:a1:bee".to_vec());
//! let dict = bdecode::decode_reader(input)?;
//! assert_eq!(dict[&b"spam"[..]].as_list().map(Vec::len), Some(2));
//! # }
//! # Ok::<(), bdecode::Error>(())
//! ```
//!
//! # Error handling
//!
//! Once an error is encountered, the decoder won't try to muddle through it; instead, every future
//! call to the same decoder will return the same error.
//!
//! ```
//! # use bdecode::decoding::Decoder;
//! #
//! let mut decoder = Decoder::new(b"d3:foo");
//! let first = decoder.decode().unwrap_err();
//! let second = decoder.decode().unwrap_err();
//! assert_eq!(first.to_string(), second.to_string());
//! ```

mod cursor;
mod decoder;
mod error;
mod source;

#[cfg(feature = "std")]
pub use self::{decoder::decode_reader, source::IoSource};
pub use self::{
    decoder::{DEFAULT_MAX_DEPTH, Decoder, decode, decode_value},
    error::{Error, ErrorKind, Structure},
    source::{SliceSource, Source},
};
