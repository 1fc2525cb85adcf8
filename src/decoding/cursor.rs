use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::decoding::{Error, Source};

/// Upper bound on how much a single `read_exact` call allocates ahead of the bytes arriving.
const CHUNK_SIZE: usize = 16 * 1024;

/// A short run of bytes read up to a delimiter. Integer and length literals never need more
/// than 20 bytes.
pub(crate) type Literal = SmallVec<[u8; 24]>;

/// Outcome of [`ByteCursor::read_until`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Delimited {
    /// The delimiter was found and consumed; holds the bytes before it.
    Found(Literal),
    /// More than the allowed number of bytes passed without the delimiter.
    Overlong(Literal),
}

/// Read position over a [`Source`] with a one-byte pushback slot.
#[derive(Debug)]
pub(crate) struct ByteCursor<S> {
    source: S,
    pending: Option<u8>,
    last: Option<u8>,
    offset: usize,
}

impl<S: Source> ByteCursor<S> {
    pub fn new(source: S) -> Self {
        ByteCursor {
            source,
            pending: None,
            last: None,
            offset: 0,
        }
    }

    /// Number of bytes consumed so far. A pushed back byte doesn't count as consumed.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        let byte = match self.pending.take() {
            Some(byte) => Some(byte),
            None => self.source.read_byte()?,
        };

        if byte.is_some() {
            self.offset += 1;
        }
        self.last = byte;
        Ok(byte)
    }

    /// Push back the byte returned by the immediately preceding `next_byte`.
    pub fn unread_byte(&mut self) -> Result<(), Error> {
        let byte = self.last.take().ok_or(Error::NothingToUnread)?;
        self.pending = Some(byte);
        self.offset -= 1;
        Ok(())
    }

    pub fn peek_byte(&mut self) -> Result<Option<u8>, Error> {
        let byte = self.next_byte()?;
        if byte.is_some() {
            self.unread_byte()?;
        }
        Ok(byte)
    }

    /// Consume bytes up to and including `delimiter`, returning the ones before it.
    ///
    /// Gives up with [`Delimited::Overlong`] once more than `limit` bytes have been read without
    /// seeing the delimiter.
    pub fn read_until(&mut self, delimiter: u8, limit: usize) -> Result<Delimited, Error> {
        let mut literal = Literal::new();
        let result = loop {
            let offset = self.offset;
            match self.next_byte()? {
                None => return Err(Error::UnexpectedEof { offset }),
                Some(byte) if byte == delimiter => break Delimited::Found(literal),
                Some(byte) => {
                    literal.push(byte);
                    if literal.len() > limit {
                        break Delimited::Overlong(literal);
                    }
                },
            }
        };

        self.last = None;
        Ok(result)
    }

    /// Consume exactly `count` bytes, retrying short reads from the source.
    pub fn read_exact(&mut self, count: usize) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::with_capacity(count.min(CHUNK_SIZE));
        if count > 0 {
            if let Some(byte) = self.pending.take() {
                bytes.push(byte);
                self.offset += 1;
            }
        }

        while bytes.len() < count {
            let filled = bytes.len();
            let wanted = (count - filled).min(CHUNK_SIZE);
            bytes.resize(filled + wanted, 0);

            let read = self.source.read_chunk(&mut bytes[filled..])?;
            bytes.truncate(filled + read);
            if read == 0 {
                return Err(Error::UnexpectedEof {
                    offset: self.offset,
                });
            }
            self.offset += read;
        }

        self.last = None;
        Ok(bytes)
    }
}
