#[cfg(feature = "std")]
use std::io::{self, BufRead, BufReader, Read};

use crate::decoding::Error;

/// A sequential supplier of raw bencode bytes.
///
/// Implementations only need to hand out bytes in order; lookahead and offset tracking are
/// handled by the decoder on top of this.
pub trait Source {
    /// Read a single byte, returning `Ok(None)` at the end of the input.
    fn read_byte(&mut self) -> Result<Option<u8>, Error>;

    /// Read up to `buf.len()` bytes into `buf` and return how many were written.
    ///
    /// Short reads are allowed. Returning `Ok(0)` for a non-empty `buf` signals the end of the
    /// input.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, Error>;
}

impl<S: Source + ?Sized> Source for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        (**self).read_byte()
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).read_chunk(buf)
    }
}

/// A [`Source`] over an in-memory buffer.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    remaining: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Create a source yielding the bytes of `buffer` from the start.
    pub fn new(buffer: &'a [u8]) -> Self {
        SliceSource { remaining: buffer }
    }

    /// The bytes that have not been handed out yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.remaining
    }
}

impl Source for SliceSource<'_> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        match self.remaining.split_first() {
            Some((&byte, rest)) => {
                self.remaining = rest;
                Ok(Some(byte))
            },
            None => Ok(None),
        }
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let count = buf.len().min(self.remaining.len());
        let (head, rest) = self.remaining.split_at(count);
        buf[..count].copy_from_slice(head);
        self.remaining = rest;
        Ok(count)
    }
}

/// A [`Source`] over any [`std::io::Read`], buffered internally.
///
/// Reads interrupted by a signal are retried; any other I/O failure is reported as
/// [`Error::Io`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
    reader: BufReader<R>,
}

#[cfg(feature = "std")]
impl<R: Read> IoSource<R> {
    /// Wrap `reader` in a buffered source.
    pub fn new(reader: R) -> Self {
        IoSource {
            reader: BufReader::new(reader),
        }
    }

    /// Unwrap the buffered reader. Bytes buffered but not yet decoded stay in the `BufReader`.
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

#[cfg(feature = "std")]
impl<R: Read> Source for IoSource<R> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        loop {
            let byte = match self.reader.fill_buf() {
                Ok(buffered) => buffered.first().copied(),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::from(err)),
            };

            if byte.is_some() {
                self.reader.consume(1);
            }
            return Ok(byte);
        }
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        loop {
            match self.reader.read(buf) {
                Ok(count) => return Ok(count),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::from(err)),
            }
        }
    }
}
