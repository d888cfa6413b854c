//! Broadcast ephemerides and satellite state computation
use std::fmt::{Display, Formatter};

use hifitime::prelude::Epoch;

use crate::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod gps;
pub mod ura;

use gnss_rs::prelude::SV;
use gps::GpsEphemeris;

/// [SatelliteState] is the outcome of propagating one broadcast
/// [Ephemeris] to an instant.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteState {
    /// Antenna phase center position, WGS-84 Earth centered
    /// Earth fixed frame [m]
    pub position_ecef_m: (f64, f64, f64),
    /// Satellite clock correction to constellation system time,
    /// relativistic effects and group delay included [s]
    pub clock_correction_s: f64,
}

/// [Ephemeris] is one broadcast data set in engineering units,
/// one variant per supported broadcast format. Computation call sites
/// are format agnostic: new formats only grow this enum.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Ephemeris {
    /// GPS LNAV data set (subframes 1 through 3)
    Gps(GpsEphemeris),
}

impl Ephemeris {
    /// Satellite this data set describes
    pub fn sv(&self) -> SV {
        match self {
            Self::Gps(eph) => eph.sv,
        }
    }

    /// Satellite position and clock correction at instant `t`,
    /// from this data set alone.
    pub fn sat_pos(&self, t: Epoch) -> Result<SatelliteState, Error> {
        match self {
            Self::Gps(eph) => eph.sat_pos(t),
        }
    }

    /// True if this data set should be trusted at instant `t`:
    /// satellite healthy, `t` inside the curve fit window.
    pub fn is_valid(&self, t: Epoch) -> bool {
        match self {
            Self::Gps(eph) => eph.is_valid(t),
        }
    }

    /// Conservative user range accuracy at instant `t` [m].
    /// Grows with data set age, never improves.
    pub fn accuracy(&self, t: Epoch) -> f64 {
        match self {
            Self::Gps(eph) => eph.accuracy(t),
        }
    }
}

impl Display for Ephemeris {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Gps(eph) => eph.fmt(f),
        }
    }
}
