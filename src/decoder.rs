use log::{error, warn};
use std::io::{Error as IoError, ErrorKind, Read};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

use crate::{constants::Constants, frame::Frame, Error};

enum Reader<R: Read> {
    Plain(R),
    #[cfg(feature = "flate2")]
    Compressed(GzDecoder<R>),
}

impl<R: Read> From<R> for Reader<R> {
    fn from(r: R) -> Reader<R> {
        Self::Plain(r)
    }
}

#[cfg(feature = "flate2")]
impl<R: Read> From<GzDecoder<R>> for Reader<R> {
    fn from(r: GzDecoder<R>) -> Reader<R> {
        Self::Compressed(r)
    }
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        match self {
            Self::Plain(r) => r.read(buf),
            #[cfg(feature = "flate2")]
            Self::Compressed(r) => r.read(buf),
        }
    }
}

/// [Scanner] buffers stream bytes and maintains frame synchronization.
/// Checksum failures are absorbed here: the stream is realigned on the
/// next sync pattern and only valid [Frame]s come out.
pub(crate) struct Scanner {
    /// Internal buffer
    buffer: Vec<u8>,
    /// Bytes dropped since the last checksum failure.
    /// Stays None while the stream is healthy.
    desync: Option<usize>,
    /// Set once [Self::MAX_DESYNC_BYTES] is exceeded: the stream does
    /// not speak this protocol anymore.
    dead: bool,
}

impl Scanner {
    /// Corrupted streams are given one maximal frame worth of bytes
    /// to realign on a valid frame.
    pub const MAX_DESYNC_BYTES: usize = Frame::MAX_ENCODING_SIZE;

    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(Frame::MAX_ENCODING_SIZE),
            desync: None,
            dead: false,
        }
    }

    /// Appends freshly read stream content.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// True once realignment has been abandoned: no valid frame was
    /// found within [Self::MAX_DESYNC_BYTES] of a checksum failure.
    pub fn is_desynchronized(&self) -> bool {
        self.dead
    }

    /// Next valid [Frame] out of buffered content.
    /// None means gather more bytes (or give up, when
    /// [Self::is_desynchronized] raised).
    pub fn scan(&mut self) -> Option<Frame> {
        loop {
            if self.dead {
                return None;
            }
            let sync = self.buffer.iter().position(|b| *b == Constants::SYNC1);
            let offset = match sync {
                Some(offset) => offset,
                None => {
                    let dropped = self.buffer.len();
                    self.buffer.clear();
                    self.account(dropped);
                    return None;
                },
            };
            if offset > 0 {
                self.buffer.drain(..offset);
                self.account(offset);
                continue;
            }
            match Frame::decode(&self.buffer) {
                Ok(frame) => {
                    self.buffer.drain(..frame.encoding_size());
                    self.desync = None;
                    return Some(frame);
                },
                Err(Error::IncompleteFrame(_)) => {
                    // valid so far: complete it on next feed
                    return None;
                },
                Err(Error::BadChecksum) => {
                    warn!("frame checksum failure: resynchronizing");
                    self.desync.get_or_insert(0);
                    self.buffer.drain(..1);
                    self.account(1);
                },
                Err(_) => {
                    // lone sync byte or implausible length
                    self.buffer.drain(..1);
                    self.account(1);
                },
            }
        }
    }

    fn account(&mut self, dropped: usize) {
        if let Some(total) = &mut self.desync {
            *total += dropped;
            if *total > Self::MAX_DESYNC_BYTES {
                error!("no frame within {} bytes: stream lost", Self::MAX_DESYNC_BYTES);
                self.dead = true;
            }
        }
    }
}

/// Pulls the next valid [Frame] through `scanner`, reading `reader`
/// whenever buffered content runs out. None marks the end of stream,
/// either clean closure or abandoned realignment.
pub(crate) fn pump<R: Read>(
    reader: &mut R,
    scanner: &mut Scanner,
    chunk: &mut [u8],
) -> Option<Result<Frame, Error>> {
    loop {
        if let Some(frame) = scanner.scan() {
            return Some(Ok(frame));
        }
        if scanner.is_desynchronized() {
            return None;
        }
        match reader.read(chunk) {
            Ok(0) => {
                // EOS
                return None;
            },
            Ok(size) => {
                scanner.feed(&chunk[..size]);
            },
            Err(e) => {
                if e.kind() == ErrorKind::Interrupted {
                    continue;
                }
                return Some(Err(Error::IoError(e)));
            },
        }
    }
}

/// Stream [Decoder]. Use this structure to consume all [Frame]s
/// streamed on a readable interface. Transmission corruption is
/// recovered internally: the iterator realigns on the following valid
/// frame and only ever yields I/O faults.
/// ```
/// use lnav::prelude::{Decoder, FrameId};
///
/// let stream: &[u8] = &[
///     0xB5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x00, 0x0E, 0x37,
/// ];
///
/// let mut decoder = Decoder::new(stream);
/// let frame = decoder.next()
///     .unwrap()
///     .unwrap();
/// assert_eq!(frame.frame_id(), FrameId::Ack);
/// assert!(decoder.next().is_none());
/// ```
pub struct Decoder<R: Read> {
    /// [R]
    reader: Reader<R>,
    /// Frame synchronization
    scanner: Scanner,
    /// Read chunk
    chunk: [u8; 1024],
}

impl<R: Read> Decoder<R> {
    /// Creates a new [Decoder] from [R] readable interface,
    /// ready to consume incoming bytes.
    pub fn new(reader: R) -> Self {
        Self {
            reader: reader.into(),
            scanner: Scanner::new(),
            chunk: [0; 1024],
        }
    }

    #[cfg(feature = "flate2")]
    /// Creates a new [Decoder] from [R] readable interface,
    /// that must stream Gzip encoded bytes.
    pub fn new_gzip(reader: R) -> Self {
        Self {
            reader: GzDecoder::new(reader).into(),
            scanner: Scanner::new(),
            chunk: [0; 1024],
        }
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<Frame, Error>;

    /// Next valid [Frame] found in stream
    fn next(&mut self) -> Option<Self::Item> {
        pump(&mut self.reader, &mut self.scanner, &mut self.chunk)
    }
}
