//! const values of the transport protocol and Gnss system

use gnss_rs::prelude::{Constellation, SV};

pub struct Constants {}

impl Constants {
    /// First synchronization byte of every frame
    pub const SYNC1: u8 = 0xB5;

    /// Second synchronization byte of every frame
    pub const SYNC2: u8 = 0x62;

    /// LNAV subframe preamble, first 8 bits of every telemetry word
    pub const PREAMBLE: u8 = 0x8B;
}

pub(crate) struct GM;

impl GM {
    pub const GPS: f64 = 3.9860050E14;
}

pub(crate) struct Omega;

impl Omega {
    pub const GPS: f64 = 7.2921151467E-5;
}

/// - 2 * sqrt(gm) / c / c
pub(crate) struct DtrF;

impl DtrF {
    pub const GPS: f64 = -0.000000000444280763339306;
}

pub(crate) struct MaxIterNumber;

impl MaxIterNumber {
    /// Maximum number of iterations to calculate the eccentric anomaly.
    /// Sized for the worst eccentricity the 32 bit field can encode.
    pub const KEPLER: u16 = 300;
}

pub(crate) struct Week;

impl Week {
    /// Seconds in one GPS week
    pub const SECONDS: f64 = 604_800.0;

    /// Half a GPS week, in seconds
    pub const HALF_SECONDS: f64 = 302_400.0;

    /// Broadcast week counter rollover period
    pub const ROLLOVER: u32 = 1024;
}

impl Constants {
    // earth
    pub(crate) const fn gm(sv: SV) -> f64 {
        match sv.constellation {
            Constellation::GPS => GM::GPS,
            _ => GM::GPS,
        }
    }
    /// Earth rotation rate
    pub(crate) const fn omega(sv: SV) -> f64 {
        match sv.constellation {
            Constellation::GPS => Omega::GPS,
            _ => Omega::GPS,
        }
    }
    /// Auxiliary quantity for calculating relativistic effects in clock correction
    pub(crate) const fn dtr_f(sv: SV) -> f64 {
        match sv.constellation {
            Constellation::GPS => DtrF::GPS,
            _ => DtrF::GPS,
        }
    }
}
