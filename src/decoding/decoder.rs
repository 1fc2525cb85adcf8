use alloc::vec::Vec;
use core::str;
#[cfg(feature = "std")]
use std::io::Read;

use log::{debug, trace};

#[cfg(feature = "std")]
use crate::decoding::IoSource;
use crate::{
    decoding::{
        Error, SliceSource, Source, Structure,
        cursor::{ByteCursor, Delimited},
    },
    value::{Dict, Integer, Value},
};

/// Nesting depth a decoder accepts unless configured otherwise.
///
/// Each level costs one `read_value` and one `read_list`/`read_dict` frame, so this has to stay
/// well inside a 2 MiB thread stack in unoptimised builds.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Longest integer or length literal that can still fit in 64 bits (`-9223372036854775808`,
/// `18446744073709551615`).
const MAX_LITERAL_LEN: usize = 20;

/// A bencode decoder
///
/// Reads one document at a time (using [`Decoder::decode()`]) or one value of any type (using
/// [`Decoder::decode_value()`]) from its [`Source`]. Bytes after the decoded value are left
/// unread.
#[derive(Debug)]
pub struct Decoder<S> {
    cursor: ByteCursor<S>,
    depth: usize,
    max_depth: usize,
    max_string_length: usize,
    failure: Option<Error>,
}

impl<'ser> Decoder<SliceSource<'ser>> {
    /// Create a new decoder from the given byte array
    pub fn new(buffer: &'ser [u8]) -> Self {
        Decoder::with_source(SliceSource::new(buffer))
    }
}

#[cfg(feature = "std")]
impl<R: Read> Decoder<IoSource<R>> {
    /// Create a new decoder reading from `reader` through an internal buffer
    pub fn from_reader(reader: R) -> Self {
        Decoder::with_source(IoSource::new(reader))
    }
}

impl<S: Source> Decoder<S> {
    /// Create a new decoder over an arbitrary byte source
    pub fn with_source(source: S) -> Self {
        Decoder {
            cursor: ByteCursor::new(source),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_string_length: usize::MAX,
            failure: None,
        }
    }

    /// Set the maximum nesting depth of the decoder. An unlimited-depth decoder may be
    /// created using `with_max_depth(usize::MAX)`, but be warned that this will likely
    /// overflow the stack if the input is nested deeply enough.
    pub fn with_max_depth(mut self, new_max_depth: usize) -> Self {
        self.max_depth = new_max_depth;
        self
    }

    /// Reject byte strings longer than `limit` bytes before reading their contents.
    pub fn with_max_string_length(mut self, limit: usize) -> Self {
        self.max_string_length = limit;
        self
    }

    /// Number of input bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Read a complete document, which must be a dictionary at its outermost level.
    pub fn decode(&mut self) -> Result<Dict, Error> {
        debug!("Decoding bencode document at offset {}", self.offset());
        let result = self.latched(Self::read_document);
        match &result {
            Ok(dict) => debug!(
                "Decoded dictionary with {} keys, {} bytes consumed",
                dict.len(),
                self.offset()
            ),
            Err(err) => debug!("Failed to decode bencode document: {}", err),
        }
        result
    }

    /// Read a single value of any type.
    pub fn decode_value(&mut self) -> Result<Value, Error> {
        self.latched(Self::read_value)
    }

    /// Run `read`, or replay the error that stopped an earlier call.
    fn latched<T>(&mut self, read: fn(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        self.depth = 0;
        let result = read(self);
        if let Err(err) = &result {
            self.failure = Some(err.clone());
        }
        result
    }

    fn read_document(&mut self) -> Result<Dict, Error> {
        let offset = self.offset();
        match self.cursor.next_byte()? {
            None => Err(Error::UnexpectedEof { offset }),
            Some(b'd') => self.read_dict(),
            Some(tag) => Err(Error::NotADictionary {
                found: char::from(tag),
                offset,
            }),
        }
    }

    fn read_value(&mut self) -> Result<Value, Error> {
        let offset = self.offset();
        let tag = self
            .cursor
            .next_byte()?
            .ok_or(Error::UnexpectedEof { offset })?;
        trace!("Reading {:?} value at offset {}", char::from(tag), offset);

        match tag {
            b'i' => self.read_int().map(Value::Integer),
            b'l' => self.read_list().map(Value::List),
            b'd' => self.read_dict().map(Value::Dict),
            _ => {
                // Not a tag, but the first digit of a string length
                self.cursor.unread_byte()?;
                self.read_bytes().map(Value::Bytes)
            },
        }
    }

    fn read_int(&mut self) -> Result<Integer, Error> {
        self.read_int_until(b'e')
    }

    /// Read an integer literal up to (and consuming) `terminator`.
    fn read_int_until(&mut self, terminator: u8) -> Result<Integer, Error> {
        let offset = self.offset();
        let literal = match self.cursor.read_until(terminator, MAX_LITERAL_LEN)? {
            Delimited::Found(literal) => literal,
            Delimited::Overlong(literal) => return Err(Error::malformed_integer(&literal, offset)),
        };

        parse_integer(&literal).ok_or_else(|| Error::malformed_integer(&literal, offset))
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let offset = self.offset();
        match self.cursor.peek_byte()? {
            Some(digit) if digit.is_ascii_digit() => {},
            Some(other) => return Err(Error::malformed_length(&[other], offset)),
            None => return Err(Error::UnexpectedEof { offset }),
        }

        let literal = match self.cursor.read_until(b':', MAX_LITERAL_LEN)? {
            Delimited::Found(literal) => literal,
            Delimited::Overlong(literal) => return Err(Error::malformed_length(&literal, offset)),
        };
        let length =
            parse_length(&literal).ok_or_else(|| Error::malformed_length(&literal, offset))?;

        if length > self.max_string_length {
            return Err(Error::StringTooLong {
                length,
                limit: self.max_string_length,
                offset,
            });
        }

        self.cursor.read_exact(length)
    }

    /// Consume the closing `e` of a list or dictionary if it is next.
    fn at_end(&mut self, structure: Structure) -> Result<bool, Error> {
        let offset = self.offset();
        match self.cursor.next_byte()? {
            None => Err(Error::Unterminated { structure, offset }),
            Some(b'e') => Ok(true),
            Some(_) => {
                self.cursor.unread_byte()?;
                Ok(false)
            },
        }
    }

    fn read_list(&mut self) -> Result<Vec<Value>, Error> {
        self.enter()?;

        let mut list = Vec::new();
        while !self.at_end(Structure::List)? {
            list.push(self.read_value()?);
        }

        self.depth -= 1;
        trace!("Read list of {} items", list.len());
        Ok(list)
    }

    fn read_dict(&mut self) -> Result<Dict, Error> {
        self.enter()?;

        let mut dict = Dict::new();
        while !self.at_end(Structure::Dict)? {
            let key = self.read_key()?;
            let value = self.read_value()?;
            // Duplicate keys are tolerated; the last one wins
            dict.insert(key, value);
        }

        self.depth -= 1;
        trace!("Read dictionary of {} keys", dict.len());
        Ok(dict)
    }

    fn read_key(&mut self) -> Result<Vec<u8>, Error> {
        let offset = self.offset();
        match self.cursor.peek_byte()? {
            Some(tag @ (b'i' | b'l' | b'd')) => Err(Error::NonStringKey {
                found: char::from(tag),
                offset,
            }),
            _ => self.read_bytes(),
        }
    }

    /// Called right after a list or dict tag has been consumed.
    fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= self.max_depth {
            return Err(Error::NestingTooDeep {
                max_depth: self.max_depth,
                offset: self.offset().saturating_sub(1),
            });
        }
        self.depth += 1;
        Ok(())
    }
}

/// Parse a canonical decimal literal as `i64`, falling back to `u64` above `i64::MAX`.
fn parse_integer(literal: &[u8]) -> Option<Integer> {
    if !is_canonical(literal) {
        return None;
    }

    let text = str::from_utf8(literal).ok()?;
    text.parse::<i64>()
        .map(Integer::Signed)
        .or_else(|_| text.parse::<u64>().map(Integer::Unsigned))
        .ok()
}

fn parse_length(literal: &[u8]) -> Option<usize> {
    if !is_canonical(literal) || literal.starts_with(b"-") {
        return None;
    }
    str::from_utf8(literal).ok()?.parse().ok()
}

/// Matches `-?(0|[1-9][0-9]*)`, except `-0`.
fn is_canonical(literal: &[u8]) -> bool {
    let digits = literal.strip_prefix(b"-").unwrap_or(literal);
    match digits {
        [b'0'] => digits.len() == literal.len(),
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

/// Decode a complete document from `bytes`. The outermost value must be a dictionary.
pub fn decode(bytes: &[u8]) -> Result<Dict, Error> {
    Decoder::new(bytes).decode()
}

/// Decode a single value of any type from `bytes`.
pub fn decode_value(bytes: &[u8]) -> Result<Value, Error> {
    Decoder::new(bytes).decode_value()
}

/// Decode a complete document from `reader`. The outermost value must be a dictionary.
#[cfg(feature = "std")]
pub fn decode_reader(reader: impl Read) -> Result<Dict, Error> {
    Decoder::from_reader(reader).decode()
}
