//! As-broadcast GPS LNAV ephemeris record
use crate::{constants::Constants, utils::Utils, Error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [GpsEphemerisRaw] is one complete broadcast data set, subframes 1
/// through 3 of the LNAV message, every field at its native width and
/// scale. No physical units at this level: interpretation happens in
/// [super::GpsEphemeris].
///
/// Transport payload layout: PRN byte, then the three subframes, 30
/// bytes each. One subframe is its 10 words with parity already
/// stripped: 24 data bits per word, MSB first. Word 1 carries the
/// telemetry preamble, word 2 the handover (time of week, subframe
/// identity).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsEphemerisRaw {
    /// Transmitting satellite PRN
    pub prn: u8,
    /// Time of week count, subframe 1 handover word
    pub tow: u32,
    /// Broadcast week counter (10 bit, modulo 1024)
    pub week: u16,
    /// Codes on L2 channel (2 bit)
    pub code_on_l2: u8,
    /// User range accuracy index (4 bit)
    pub ura: u8,
    /// SV health summary (6 bit), 0 is healthy
    pub health: u8,
    /// Issue of data, clock (10 bit)
    pub iodc: u16,
    /// L2 P code data flag
    pub l2p_data: u8,
    /// Group delay differential (8 bit signed, 2⁻³¹ s)
    pub tgd: i8,
    /// Clock reference time (16 bit, 2⁴ s)
    pub toc: u16,
    /// Clock drift rate (8 bit signed, 2⁻⁵⁵ s/s²)
    pub af2: i8,
    /// Clock drift (16 bit signed, 2⁻⁴³ s/s)
    pub af1: i16,
    /// Clock bias (22 bit signed, 2⁻³¹ s)
    pub af0: i32,
    /// Issue of data, ephemeris (8 bit, subframes 2 and 3 agree)
    pub iode: u8,
    /// Orbit radius sine correction (16 bit signed, 2⁻⁵ m)
    pub crs: i16,
    /// Mean motion difference (16 bit signed, 2⁻⁴³ semicircle/s)
    pub delta_n: i16,
    /// Mean anomaly at reference time (32 bit signed, 2⁻³¹ semicircle)
    pub m0: i32,
    /// Latitude argument cosine correction (16 bit signed, 2⁻²⁹ rad)
    pub cuc: i16,
    /// Eccentricity (32 bit, 2⁻³³)
    pub e: u32,
    /// Latitude argument sine correction (16 bit signed, 2⁻²⁹ rad)
    pub cus: i16,
    /// Square root of semi major axis (32 bit, 2⁻¹⁹ √m)
    pub sqrt_a: u32,
    /// Ephemeris reference time (16 bit, 2⁴ s)
    pub toe: u16,
    /// Curve fit interval flag, raised for fits beyond 4 hours
    pub fit_interval: u8,
    /// Age of data offset (5 bit, 900 s)
    pub aodo: u8,
    /// Inclination cosine correction (16 bit signed, 2⁻²⁹ rad)
    pub cic: i16,
    /// Ascending node longitude at weekly epoch
    /// (32 bit signed, 2⁻³¹ semicircle)
    pub omega0: i32,
    /// Inclination sine correction (16 bit signed, 2⁻²⁹ rad)
    pub cis: i16,
    /// Inclination at reference time (32 bit signed, 2⁻³¹ semicircle)
    pub i0: i32,
    /// Orbit radius cosine correction (16 bit signed, 2⁻⁵ m)
    pub crc: i16,
    /// Argument of perigee (32 bit signed, 2⁻³¹ semicircle)
    pub omega: i32,
    /// Rate of right ascension (24 bit signed, 2⁻⁴³ semicircle/s)
    pub omegadot: i32,
    /// Rate of inclination (14 bit signed, 2⁻⁴³ semicircle/s)
    pub idot: i16,
}

/// Subframe length: 10 words of 24 data bits
const SUBFRAME_LEN: usize = 30;

/// Handover time of week count, 6 second units
const TOW_ROLLOVER: u32 = 100_800;

impl GpsEphemerisRaw {
    /// Payload size of a complete data set:
    /// PRN byte and three packed subframes.
    pub const fn encoding_size() -> usize {
        1 + 3 * SUBFRAME_LEN
    }

    /// [GpsEphemerisRaw] interpretation attempt of an ephemeris frame
    /// payload. Structure markers are verified: telemetry preamble and
    /// handover identity of every subframe, issue of data agreement
    /// between subframes 2 and 3 (a torn data set mixes two issues and
    /// is discarded whole). [Error::InvalidSubframe] on any violation.
    pub fn unpack(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < Self::encoding_size() {
            return Err(Error::NotEnoughBytes);
        }

        let prn = buf[0];
        let sf1 = &buf[1..1 + SUBFRAME_LEN];
        let sf2 = &buf[1 + SUBFRAME_LEN..1 + 2 * SUBFRAME_LEN];
        let sf3 = &buf[1 + 2 * SUBFRAME_LEN..1 + 3 * SUBFRAME_LEN];

        for (nth, sf) in [sf1, sf2, sf3].into_iter().enumerate() {
            if Utils::get_ubits(sf, 0, 8)? != Constants::PREAMBLE as u32 {
                return Err(Error::InvalidSubframe);
            }
            if Utils::get_ubits(sf, 43, 3)? != nth as u32 + 1 {
                return Err(Error::InvalidSubframe);
            }
        }

        // subframe 1: clock model, week, quality indicators
        let tow = Utils::get_ubits(sf1, 24, 17)?;
        let week = Utils::get_ubits(sf1, 48, 10)? as u16;
        let code_on_l2 = Utils::get_ubits(sf1, 58, 2)? as u8;
        let ura = Utils::get_ubits(sf1, 60, 4)? as u8;
        let health = Utils::get_ubits(sf1, 64, 6)? as u8;
        let iodc_msb = Utils::get_ubits(sf1, 70, 2)? as u16;
        let l2p_data = Utils::get_ubits(sf1, 72, 1)? as u8;
        let tgd = Utils::get_sbits(sf1, 160, 8)? as i8;
        let iodc_lsb = Utils::get_ubits(sf1, 168, 8)? as u16;
        let toc = Utils::get_ubits(sf1, 176, 16)? as u16;
        let af2 = Utils::get_sbits(sf1, 192, 8)? as i8;
        let af1 = Utils::get_sbits(sf1, 200, 16)? as i16;
        let af0 = Utils::get_sbits(sf1, 216, 22)?;

        // subframe 2: first half of the orbital elements
        let iode = Utils::get_ubits(sf2, 48, 8)? as u8;
        let crs = Utils::get_sbits(sf2, 56, 16)? as i16;
        let delta_n = Utils::get_sbits(sf2, 72, 16)? as i16;
        let m0 = Utils::get_sbits(sf2, 88, 32)?;
        let cuc = Utils::get_sbits(sf2, 120, 16)? as i16;
        let e = Utils::get_ubits(sf2, 136, 32)?;
        let cus = Utils::get_sbits(sf2, 168, 16)? as i16;
        let sqrt_a = Utils::get_ubits(sf2, 184, 32)?;
        let toe = Utils::get_ubits(sf2, 216, 16)? as u16;
        let fit_interval = Utils::get_ubits(sf2, 232, 1)? as u8;
        let aodo = Utils::get_ubits(sf2, 233, 5)? as u8;

        // subframe 3: second half of the orbital elements
        let cic = Utils::get_sbits(sf3, 48, 16)? as i16;
        let omega0 = Utils::get_sbits(sf3, 64, 32)?;
        let cis = Utils::get_sbits(sf3, 96, 16)? as i16;
        let i0 = Utils::get_sbits(sf3, 112, 32)?;
        let crc = Utils::get_sbits(sf3, 144, 16)? as i16;
        let omega = Utils::get_sbits(sf3, 160, 32)?;
        let omegadot = Utils::get_sbits(sf3, 192, 24)?;
        let iode_sf3 = Utils::get_ubits(sf3, 216, 8)? as u8;
        let idot = Utils::get_sbits(sf3, 224, 14)? as i16;

        if iode != iode_sf3 {
            // data set cutover happened mid collection
            return Err(Error::InvalidSubframe);
        }

        Ok(Self {
            prn,
            tow,
            week,
            code_on_l2,
            ura,
            health,
            iodc: (iodc_msb << 8) | iodc_lsb,
            l2p_data,
            tgd,
            toc,
            af2,
            af1,
            af0,
            iode,
            crs,
            delta_n,
            m0,
            cuc,
            e,
            cus,
            sqrt_a,
            toe,
            fit_interval,
            aodo,
            cic,
            omega0,
            cis,
            i0,
            crc,
            omega,
            omegadot,
            idot,
        })
    }

    /// Exact [Self::unpack] mirror operation. Emits the complete
    /// payload, telemetry and handover words included, so that
    /// `unpack(pack(r)) == r`.
    pub fn pack(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let size = Self::encoding_size();
        if buf.len() < size {
            return Err(Error::NotEnoughBytes);
        }

        buf[..size].fill(0);
        buf[0] = self.prn;

        for nth in 0..3_u32 {
            let sf = &mut buf[1 + nth as usize * SUBFRAME_LEN..1 + (nth as usize + 1) * SUBFRAME_LEN];
            Utils::set_ubits(sf, 0, 8, Constants::PREAMBLE as u32)?;
            // subframes run 6 seconds apart
            Utils::set_ubits(sf, 24, 17, (self.tow + nth) % TOW_ROLLOVER)?;
            Utils::set_ubits(sf, 43, 3, nth + 1)?;
        }

        let sf1 = &mut buf[1..1 + SUBFRAME_LEN];
        Utils::set_ubits(sf1, 48, 10, self.week as u32)?;
        Utils::set_ubits(sf1, 58, 2, self.code_on_l2 as u32)?;
        Utils::set_ubits(sf1, 60, 4, self.ura as u32)?;
        Utils::set_ubits(sf1, 64, 6, self.health as u32)?;
        Utils::set_ubits(sf1, 70, 2, (self.iodc >> 8) as u32)?;
        Utils::set_ubits(sf1, 72, 1, self.l2p_data as u32)?;
        Utils::set_sbits(sf1, 160, 8, self.tgd as i32)?;
        Utils::set_ubits(sf1, 168, 8, (self.iodc & 0xFF) as u32)?;
        Utils::set_ubits(sf1, 176, 16, self.toc as u32)?;
        Utils::set_sbits(sf1, 192, 8, self.af2 as i32)?;
        Utils::set_sbits(sf1, 200, 16, self.af1 as i32)?;
        Utils::set_sbits(sf1, 216, 22, self.af0)?;

        let sf2 = &mut buf[1 + SUBFRAME_LEN..1 + 2 * SUBFRAME_LEN];
        Utils::set_ubits(sf2, 48, 8, self.iode as u32)?;
        Utils::set_sbits(sf2, 56, 16, self.crs as i32)?;
        Utils::set_sbits(sf2, 72, 16, self.delta_n as i32)?;
        Utils::set_sbits(sf2, 88, 32, self.m0)?;
        Utils::set_sbits(sf2, 120, 16, self.cuc as i32)?;
        Utils::set_ubits(sf2, 136, 32, self.e)?;
        Utils::set_sbits(sf2, 168, 16, self.cus as i32)?;
        Utils::set_ubits(sf2, 184, 32, self.sqrt_a)?;
        Utils::set_ubits(sf2, 216, 16, self.toe as u32)?;
        Utils::set_ubits(sf2, 232, 1, self.fit_interval as u32)?;
        Utils::set_ubits(sf2, 233, 5, self.aodo as u32)?;

        let sf3 = &mut buf[1 + 2 * SUBFRAME_LEN..1 + 3 * SUBFRAME_LEN];
        Utils::set_sbits(sf3, 48, 16, self.cic as i32)?;
        Utils::set_sbits(sf3, 64, 32, self.omega0)?;
        Utils::set_sbits(sf3, 96, 16, self.cis as i32)?;
        Utils::set_sbits(sf3, 112, 32, self.i0)?;
        Utils::set_sbits(sf3, 144, 16, self.crc as i32)?;
        Utils::set_sbits(sf3, 160, 32, self.omega)?;
        Utils::set_sbits(sf3, 192, 24, self.omegadot)?;
        Utils::set_ubits(sf3, 216, 8, self.iode as u32)?;
        Utils::set_sbits(sf3, 224, 14, self.idot as i32)?;

        Ok(size)
    }
}
