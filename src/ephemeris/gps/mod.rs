//! GPS LNAV broadcast data sets
mod eph;
mod kepler;
mod raw;

pub use eph::GpsEphemeris;
pub use raw::GpsEphemerisRaw;
