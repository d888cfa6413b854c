//! LNAV: GPS navigation message framing, decoding and broadcast orbits
use thiserror::Error;

mod decoder;
mod encoder;
mod frame;
mod link;

pub mod ephemeris;

pub(crate) mod constants;
pub(crate) mod time;
pub(crate) mod utils;

pub mod prelude {
    pub use crate::decoder::Decoder;
    pub use crate::encoder::Encoder;
    pub use crate::ephemeris::{
        gps::{GpsEphemeris, GpsEphemerisRaw},
        Ephemeris, SatelliteState,
    };
    pub use crate::frame::{Frame, FrameId};
    pub use crate::link::Link;
    pub use crate::Error;
    // re-export
    pub use gnss_rs::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("not enough bytes available")]
    NotEnoughBytes,
    #[error("i/o error")]
    IoError(#[from] std::io::Error),
    #[error("no SYNC byte found")]
    NoSyncByte,
    #[error("incomplete frame: missing {0} bytes")]
    IncompleteFrame(usize),
    #[error("invalid frame length")]
    InvalidLength,
    #[error("frame checksum mismatch")]
    BadChecksum,
    #[error("link handshake failed")]
    HandshakeFailed,
    #[error("invalid subframe content")]
    InvalidSubframe,
    #[error("kepler solver did not converge")]
    KeplerNonConvergence,
    #[error("ephemeris is not interpretable")]
    InvalidEphemeris,
}
