use alloc::string::String;
#[cfg(feature = "std")]
use alloc::sync::Arc;
use core::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Broad classification of a decoding [`Error`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ErrorKind {
    /// The byte source failed, or ran out before a required quantity of bytes was available.
    Io,
    /// Bytes were available but did not match the bencode grammar.
    Format,
}

/// The compound structure an [`Error::Unterminated`] was raised in.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Structure {
    /// A list (`l ... e`)
    List,
    /// A dictionary (`d ... e`)
    Dict,
}

impl Display for Structure {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Structure::List => f.write_str("list"),
            Structure::Dict => f.write_str("dictionary"),
        }
    }
}

/// An enumeration of potential errors that appear during bencode decoding.
///
/// Offsets count the bytes consumed from the start of the decoder's input.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
    /// The underlying byte source failed.
    #[cfg(feature = "std")]
    #[error("failed to read bencode input: {source}")]
    Io {
        /// The error reported by the reader
        source: Arc<std::io::Error>,
    },

    /// Reached the end of the input in the middle of a token.
    #[error("reached EOF in the middle of a value at offset {offset}")]
    UnexpectedEof {
        /// Byte offset where the input ended
        offset: usize,
    },

    /// An integer literal was empty, non-canonical, or out of 64-bit range.
    #[error("malformed integer {literal:?} at offset {offset}")]
    MalformedInteger {
        /// The offending literal, lossily converted to text
        literal: String,
        /// Byte offset where the fault was detected
        offset: usize,
    },

    /// A byte string length prefix was not a canonical non-negative number.
    #[error("malformed string length {literal:?} at offset {offset}")]
    MalformedLength {
        /// The offending length prefix, lossily converted to text
        literal: String,
        /// Byte offset where the fault was detected
        offset: usize,
    },

    /// Input ended where another element or the closing `e` was expected.
    #[error("unterminated {structure}: reached EOF at offset {offset}")]
    Unterminated {
        /// The structure left open
        structure: Structure,
        /// Byte offset where the input ended
        offset: usize,
    },

    /// A dictionary key started with an integer, list or dictionary tag.
    #[error("dictionary keys must be strings, got {found:?} at offset {offset}")]
    NonStringKey {
        /// The type tag found where a key should start
        found: char,
        /// Byte offset where the fault was detected
        offset: usize,
    },

    /// The document does not start with a dictionary.
    #[error("top-level value must be a dictionary, got {found:?} at offset {offset}")]
    NotADictionary {
        /// The first byte of the document
        found: char,
        /// Byte offset where the fault was detected
        offset: usize,
    },

    /// Exceeded the configured nesting depth.
    #[error("maximum nesting depth of {max_depth} exceeded at offset {offset}")]
    NestingTooDeep {
        /// The configured limit
        max_depth: usize,
        /// Byte offset of the tag that opened one level too many
        offset: usize,
    },

    /// A byte string declared a length above the configured limit.
    #[error("string of {length} bytes exceeds the limit of {limit} at offset {offset}")]
    StringTooLong {
        /// The declared length
        length: usize,
        /// The configured limit
        limit: usize,
        /// Byte offset of the length prefix
        offset: usize,
    },

    /// The cursor was asked to push back a byte without having just read one.
    #[error("no byte available to unread")]
    NothingToUnread,
}

impl Error {
    /// Classify this error as an I/O or a format fault.
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "std")]
            Error::Io { .. } => ErrorKind::Io,
            Error::UnexpectedEof { .. } => ErrorKind::Io,
            _ => ErrorKind::Format,
        }
    }

    /// The input offset the error was detected at, if it is tied to one.
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Error::UnexpectedEof { offset }
            | Error::MalformedInteger { offset, .. }
            | Error::MalformedLength { offset, .. }
            | Error::Unterminated { offset, .. }
            | Error::NonStringKey { offset, .. }
            | Error::NotADictionary { offset, .. }
            | Error::NestingTooDeep { offset, .. }
            | Error::StringTooLong { offset, .. } => Some(offset),
            _ => None,
        }
    }

    pub(crate) fn malformed_integer(literal: &[u8], offset: usize) -> Self {
        Error::MalformedInteger {
            literal: String::from_utf8_lossy(literal).into_owned(),
            offset,
        }
    }

    pub(crate) fn malformed_length(literal: &[u8], offset: usize) -> Self {
        Error::MalformedLength {
            literal: String::from_utf8_lossy(literal).into_owned(),
            offset,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io {
            source: Arc::new(error),
        }
    }
}
