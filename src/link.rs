use log::{debug, error};
use std::io::{Read, Write};

use crate::{
    decoder::{pump, Scanner},
    frame::{Frame, FrameId},
    Error,
};

/// [Link] drives a bidirectional session with a receiver: the opening
/// handshake first, then [Frame] exchange both ways. Anything
/// [Read] + [Write] fits: serial adapter, TCP stream, pipes.
/// ```no_run
/// use std::net::TcpStream;
/// use lnav::prelude::{FrameId, Link};
///
/// let transport = TcpStream::connect("192.168.1.57:3000")
///     .unwrap();
///
/// // claims the binary protocol, awaits the receiver acknowledgment
/// let mut link = Link::open(transport)
///     .unwrap();
///
/// while let Some(frame) = link.get() {
///     match frame {
///         Ok(frame) => {
///             if frame.frame_id() == FrameId::Ephemeris {
///                 // broadcast ephemeris received
///             }
///         },
///         Err(_) => {
///             // i/o fault: react accordingly
///         },
///     }
/// }
/// ```
pub struct Link<T: Read + Write> {
    /// [T] transport
    transport: T,
    /// Frame synchronization
    scanner: Scanner,
    /// Read chunk
    chunk: [u8; 1024],
    /// Encoding scratch
    buf: Vec<u8>,
}

impl<T: Read + Write> Link<T> {
    /// Frames scanned for the configuration acknowledgment before
    /// giving up on the peer.
    const HANDSHAKE_FRAMES: usize = 32;

    /// Receiver port claimed for the binary protocol
    const PORT_ID: u8 = 1;

    /// Opens the link: claims the binary protocol on the receiver port,
    /// both directions, then waits for the acknowledgment.
    /// [Error::HandshakeFailed] is fatal and never retried from within:
    /// the peer either refused or never answered.
    pub fn open(transport: T) -> Result<Self, Error> {
        let mut link = Self {
            transport,
            scanner: Scanner::new(),
            chunk: [0; 1024],
            buf: Vec::with_capacity(Frame::MAX_ENCODING_SIZE),
        };
        link.handshake()?;
        Ok(link)
    }

    /// Next valid [Frame] out of the receiver. Transmission corruption
    /// is recovered internally, identical to the stream decoder.
    /// None marks the end of session: transport closed, or realignment
    /// abandoned.
    pub fn get(&mut self) -> Option<Result<Frame, Error>> {
        pump(&mut self.transport, &mut self.scanner, &mut self.chunk)
    }

    /// Sends one [Frame] to the receiver, delivered right away.
    pub fn put(&mut self, frame: &Frame) -> Result<(), Error> {
        let size = frame.encoding_size();
        self.buf.resize(size, 0);
        frame.encode(&mut self.buf)?;
        self.transport.write_all(&self.buf)?;
        self.transport.flush()?;
        Ok(())
    }

    fn handshake(&mut self) -> Result<(), Error> {
        let (cfg_class, cfg_id) = FrameId::CfgPort.into();
        // port identity, reserved, protocol in, protocol out
        let request = Frame::new(FrameId::CfgPort, vec![Self::PORT_ID, 0x00, 0x01, 0x01]);
        self.put(&request)?;
        debug!("port configuration sent, awaiting acknowledgment");

        for _ in 0..Self::HANDSHAKE_FRAMES {
            match pump(&mut self.transport, &mut self.scanner, &mut self.chunk) {
                Some(Ok(frame)) => match frame.frame_id() {
                    FrameId::Ack if frame.payload == [cfg_class, cfg_id] => {
                        debug!("link opened");
                        return Ok(());
                    },
                    FrameId::Nak if frame.payload == [cfg_class, cfg_id] => {
                        error!("port configuration refused");
                        return Err(Error::HandshakeFailed);
                    },
                    _ => {
                        // unrelated traffic: keep scanning
                    },
                },
                Some(Err(e)) => {
                    return Err(e);
                },
                None => {
                    break;
                },
            }
        }
        error!("port configuration never acknowledged");
        Err(Error::HandshakeFailed)
    }
}
