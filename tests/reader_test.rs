//! Decoding from `std::io::Read` sources that misbehave in the usual ways.

use std::{
    io::{self, Cursor, Read},
    thread,
};

use bdecode::{
    Error, ErrorKind, Value,
    decoding::{DEFAULT_MAX_DEPTH, Decoder, IoSource, SliceSource, Source},
};

/// Yields at most `step` bytes per `read` call.
struct ShortReads<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for ShortReads<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = buf.len().min(self.step).min(self.data.len());
        buf[..count].copy_from_slice(&self.data[..count]);
        self.data = &self.data[count..];
        Ok(count)
    }
}

/// Hands out `data` and then fails instead of reporting EOF.
struct Failing<'a> {
    data: &'a [u8],
}

impl Read for Failing<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"));
        }
        self.data.read(buf)
    }
}

/// Counts how many bytes were asked of it.
struct Counting<S> {
    inner: S,
    requested: usize,
}

impl<S: Source> Source for Counting<S> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        self.requested += 1;
        self.inner.read_byte()
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.requested += buf.len();
        self.inner.read_chunk(buf)
    }
}

const DOCUMENT: &[u8] =
    b"d4:infod6:lengthi1024e4:name8:file.iso12:piece lengthi16384ee5:nodesl11:example.orgee";

#[test]
fn reader_and_slice_agree() -> Result<(), Error> {
    let from_slice = bdecode::decode(DOCUMENT)?;
    let from_reader = bdecode::decode_reader(Cursor::new(DOCUMENT))?;
    assert_eq!(from_slice, from_reader);
    Ok(())
}

#[test]
fn one_byte_reads_are_retried() -> Result<(), Error> {
    let reader = ShortReads {
        data: DOCUMENT,
        step: 1,
    };
    let dict = bdecode::decode_reader(reader)?;
    assert_eq!(
        dict[&b"info"[..]].get("name").and_then(Value::as_str),
        Some("file.iso")
    );
    Ok(())
}

#[test]
fn long_strings_survive_short_reads() -> Result<(), Error> {
    let payload = vec![b'z'; 100_000];
    let mut encoded = format!("d4:blob{}:", payload.len()).into_bytes();
    encoded.extend_from_slice(&payload);
    encoded.push(b'e');

    let reader = ShortReads {
        data: &encoded,
        step: 7,
    };
    let dict = bdecode::decode_reader(reader)?;
    assert_eq!(dict[&b"blob"[..]].as_bytes(), Some(&payload[..]));
    Ok(())
}

#[test]
fn truncated_stream_is_an_eof() {
    let truncated = &DOCUMENT[..30];
    let err = bdecode::decode_reader(Cursor::new(truncated)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn io_failures_surface_as_io_errors() {
    let err = bdecode::decode_reader(Failing { data: b"d3:foo" }).unwrap_err();
    match &err {
        Error::Io { source } => assert_eq!(source.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("Unexpected error: {}", other),
    }
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("peer went away"));
}

#[test]
fn huge_declared_lengths_fail_without_reading_forever() {
    let err = bdecode::decode_reader(Cursor::new(b"d1:a18446744073709551615:xe")).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof { .. }), "{}", err);
}

#[test]
fn decoding_stops_after_the_document() -> Result<(), Error> {
    let mut input = DOCUMENT.to_vec();
    input.extend_from_slice(b"i42e");

    let mut source = Counting {
        inner: SliceSource::new(&input),
        requested: 0,
    };
    let mut decoder = Decoder::with_source(&mut source);
    decoder.decode()?;
    assert_eq!(decoder.offset(), DOCUMENT.len());
    assert_eq!(decoder.decode_value()?, Value::from(42i64));
    drop(decoder);

    assert!(source.requested <= input.len() + 1);
    Ok(())
}

#[test]
fn io_source_can_be_driven_directly() -> Result<(), Error> {
    let mut decoder = Decoder::with_source(IoSource::new(Cursor::new(b"li1ei2ee".to_vec())));
    assert_eq!(
        decoder.decode_value()?,
        Value::List(vec![Value::from(1i64), Value::from(2i64)])
    );
    Ok(())
}

/// A document whose root dictionary holds `lists` nested lists.
fn nested(lists: usize) -> Vec<u8> {
    let mut encoded = b"d1:a".to_vec();
    encoded.extend(std::iter::repeat_n(b'l', lists));
    encoded.extend(std::iter::repeat_n(b'e', lists + 1));
    encoded
}

#[test]
fn default_depth_fits_a_standard_thread_stack() {
    let worker = thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(|| {
            let deepest = nested(DEFAULT_MAX_DEPTH - 1);
            assert!(bdecode::decode(&deepest).is_ok());
            assert!(bdecode::decode_reader(Cursor::new(&deepest)).is_ok());

            let too_deep = nested(DEFAULT_MAX_DEPTH);
            for result in [
                bdecode::decode(&too_deep),
                bdecode::decode_reader(Cursor::new(&too_deep)),
            ] {
                match result {
                    Err(Error::NestingTooDeep { max_depth, .. }) => {
                        assert_eq!(max_depth, DEFAULT_MAX_DEPTH)
                    },
                    other => panic!("Unexpected result: {:?}", other.map(|dict| dict.len())),
                }
            }
        })
        .expect("spawning a decoder thread");

    worker.join().expect("decoding stays within the thread's stack");
}
