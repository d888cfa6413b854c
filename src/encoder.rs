use std::io::{Result as IoResult, Write};

#[cfg(feature = "flate2")]
use flate2::{write::GzEncoder, Compression as GzCompression};

use crate::{frame::Frame, Error};

/// Abstraction for Plain or Compressed [W]
enum Writer<W: Write> {
    Plain(W),
    #[cfg(feature = "flate2")]
    Compressed(GzEncoder<W>),
}

impl<W: Write> From<W> for Writer<W> {
    fn from(w: W) -> Writer<W> {
        Self::Plain(w)
    }
}

#[cfg(feature = "flate2")]
impl<W: Write> From<GzEncoder<W>> for Writer<W> {
    fn from(w: GzEncoder<W>) -> Writer<W> {
        Self::Compressed(w)
    }
}

impl<W: Write> Write for Writer<W> {
    fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            #[cfg(feature = "flate2")]
            Self::Compressed(w) => w.write(buf),
        }
    }
    fn flush(&mut self) -> IoResult<()> {
        match self {
            Self::Plain(w) => w.flush(),
            #[cfg(feature = "flate2")]
            Self::Compressed(w) => w.flush(),
        }
    }
}

/// Stream [Encoder]. Serializes [Frame]s down a writable interface,
/// checksum generated along the way.
pub struct Encoder<W: Write> {
    /// [W]
    writer: Writer<W>,
    /// Encoding scratch
    buf: Vec<u8>,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: writer.into(),
            buf: Vec::with_capacity(Frame::MAX_ENCODING_SIZE),
        }
    }

    #[cfg(feature = "flate2")]
    pub fn new_gzip(writer: W, compression_level: u32) -> Self {
        Self {
            writer: GzEncoder::new(writer, GzCompression::new(compression_level)).into(),
            buf: Vec::with_capacity(Frame::MAX_ENCODING_SIZE),
        }
    }

    /// Encodes one [Frame] down the stream, delivered right away.
    pub fn put(&mut self, frame: &Frame) -> Result<(), Error> {
        let size = frame.encoding_size();
        self.buf.resize(size, 0);
        frame.encode(&mut self.buf)?;
        self.writer.write_all(&self.buf)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::FrameId;

    #[test]
    fn put_write_read_mirror() {
        let frames = [
            Frame::new(FrameId::CfgPort, vec![0x01, 0x00, 0x01, 0x01]),
            Frame::new(FrameId::Ack, vec![0x06, 0x00]),
            Frame::from_class_id(0x0B, 0x31, vec![0x42; 91]),
        ];

        let mut sink = Vec::<u8>::new();
        let mut encoder = Encoder::new(&mut sink);
        for frame in &frames {
            encoder.put(frame).unwrap();
        }
        drop(encoder);

        // whatever was written reads back as the same frames
        let mut decoder = crate::decoder::Decoder::new(&sink[..]);
        for frame in &frames {
            let decoded = decoder.next().unwrap().unwrap();
            assert_eq!(&decoded, frame);
        }
        assert!(decoder.next().is_none());
    }
}
