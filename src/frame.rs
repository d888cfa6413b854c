//! Transport frame: synchronization, identity, payload and checksum
use std::num::Wrapping;

use crate::{constants::Constants, Error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// FrameId describes the frames this library interprets,
/// out of the (class, id) pair attached to every [Frame].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameId {
    /// Broadcast ephemeris data set, one satellite per frame
    Ephemeris,
    /// Positive acknowledgment of a configuration frame
    Ack,
    /// Negative acknowledgment of a configuration frame
    Nak,
    /// Port protocol configuration
    CfgPort,
    /// Unknown / unsupported frame
    #[default]
    Unknown,
}

impl From<(u8, u8)> for FrameId {
    fn from(class_id: (u8, u8)) -> Self {
        match class_id {
            (0x0B, 0x31) => Self::Ephemeris,
            (0x05, 0x01) => Self::Ack,
            (0x05, 0x00) => Self::Nak,
            (0x06, 0x00) => Self::CfgPort,
            _ => Self::Unknown,
        }
    }
}

impl From<FrameId> for (u8, u8) {
    fn from(val: FrameId) -> (u8, u8) {
        match val {
            FrameId::Ephemeris => (0x0B, 0x31),
            FrameId::Ack => (0x05, 0x01),
            FrameId::Nak => (0x05, 0x00),
            FrameId::CfgPort => (0x06, 0x00),
            FrameId::Unknown => (0xFF, 0xFF),
        }
    }
}

/// [Frame] is one validated transport frame, as exchanged with the
/// receiver. On the wire it reads
/// `SYNC1, SYNC2, class, id, length (LE), payload, ck_a, ck_b`,
/// where both checksum bytes run over class..payload.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Class byte
    pub class: u8,
    /// Identity byte within `class`
    pub id: u8,
    /// Payload bytes, without framing nor checksum
    pub payload: Vec<u8>,
}

impl Frame {
    /// Longest payload this library considers plausible.
    /// Candidate frames advertising more than this are treated as noise.
    pub const MAX_PAYLOAD_LEN: usize = 1024;

    /// Framing overhead: 2 sync bytes, class, id, 2 length bytes,
    /// 2 checksum bytes.
    pub(crate) const OVERHEAD: usize = 8;

    /// Largest possible [Self::encoding_size].
    pub const MAX_ENCODING_SIZE: usize = Self::OVERHEAD + Self::MAX_PAYLOAD_LEN;

    /// Creates a new [Frame] from a known [FrameId], ready to be encoded.
    pub fn new(id: FrameId, payload: Vec<u8>) -> Self {
        let (class, id) = id.into();
        Self { class, id, payload }
    }

    /// Creates a new [Frame] from a raw (class, id) pair.
    pub fn from_class_id(class: u8, id: u8, payload: Vec<u8>) -> Self {
        Self { class, id, payload }
    }

    /// Returns the [FrameId] this frame transports.
    pub fn frame_id(&self) -> FrameId {
        FrameId::from((self.class, self.id))
    }

    /// Returns total size required to encode this [Frame].
    /// Use this to fulfill [Self::encode] requirements.
    pub fn encoding_size(&self) -> usize {
        Self::OVERHEAD + self.payload.len()
    }

    /// Two accumulator checksum over class, id, length and payload bytes.
    /// The generation and verification paths share this single routine.
    pub fn checksum(class: u8, id: u8, payload: &[u8]) -> (u8, u8) {
        let mut ck_a = Wrapping(0_u8);
        let mut ck_b = Wrapping(0_u8);
        let mlen = (payload.len() as u16).to_le_bytes();
        for byte in [class, id, mlen[0], mlen[1]].iter().chain(payload.iter()) {
            ck_a += *byte;
            ck_b += ck_a;
        }
        (ck_a.0, ck_b.0)
    }

    /// [Frame] decoding attempt from buffered content.
    /// The frame must start right at `buf[0]`:
    /// - [Error::NoSyncByte]: `buf` does not start with the sync pattern
    /// - [Error::IncompleteFrame]: missing bytes to complete this frame,
    ///   gather more and retry
    /// - [Error::InvalidLength]: advertised length is not plausible
    /// - [Error::BadChecksum]: transmission corrupted this frame
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let buf_len = buf.len();
        if buf_len < 2 {
            return Err(Error::IncompleteFrame(2 - buf_len));
        }
        if buf[0] != Constants::SYNC1 || buf[1] != Constants::SYNC2 {
            return Err(Error::NoSyncByte);
        }
        if buf_len < Self::OVERHEAD - 2 {
            return Err(Error::IncompleteFrame(Self::OVERHEAD - 2 - buf_len));
        }

        let class = buf[2];
        let id = buf[3];
        let mlen = u16::from_le_bytes([buf[4], buf[5]]) as usize;
        if mlen > Self::MAX_PAYLOAD_LEN {
            return Err(Error::InvalidLength);
        }

        let total = Self::OVERHEAD + mlen;
        if buf_len < total {
            return Err(Error::IncompleteFrame(total - buf_len));
        }

        let payload = &buf[6..6 + mlen];
        let (ck_a, ck_b) = Self::checksum(class, id, payload);
        if ck_a != buf[6 + mlen] || ck_b != buf[7 + mlen] {
            return Err(Error::BadChecksum);
        }

        Ok(Self {
            class,
            id,
            payload: payload.to_vec(),
        })
    }

    /// Tries to encode [Frame] into provided buffer.
    /// Returns total encoded size: [Self::encoding_size] must fit in.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.payload.len() > Self::MAX_PAYLOAD_LEN {
            return Err(Error::InvalidLength);
        }
        let size = self.encoding_size();
        if buf.len() < size {
            return Err(Error::NotEnoughBytes);
        }

        buf[0] = Constants::SYNC1;
        buf[1] = Constants::SYNC2;
        buf[2] = self.class;
        buf[3] = self.id;

        let mlen = (self.payload.len() as u16).to_le_bytes();
        buf[4] = mlen[0];
        buf[5] = mlen[1];
        buf[6..6 + self.payload.len()].copy_from_slice(&self.payload);

        let (ck_a, ck_b) = Self::checksum(self.class, self.id, &self.payload);
        buf[size - 2] = ck_a;
        buf[size - 1] = ck_b;

        Ok(size)
    }

    /// [Self::encode] into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0; self.encoding_size()];
        self.encode(&mut buf)?;
        Ok(buf)
    }
}
