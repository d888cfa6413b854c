//! GPS ephemeris in engineering units
use super::GpsEphemerisRaw;
use crate::{constants::Week, ephemeris::ura, time, Error};

use core::f64::consts::PI;
use std::fmt;

use gnss_rs::prelude::{Constellation, SV};
use hifitime::{Duration, Epoch};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const P2_5: f64 = 0.03125;
const P2_19: f64 = 1.9073486328125E-6;
const P2_29: f64 = 1.862645149230957E-9;
const P2_31: f64 = 4.656612873077393E-10;
const P2_33: f64 = 1.1641532182693481E-10;
const P2_43: f64 = 1.1368683772161603E-13;
const P2_55: f64 = 2.7755575615628914E-17;

/// [GpsEphemeris] is a complete broadcast data set interpreted in
/// engineering units: SI seconds and meters, semicircles expanded to
/// radians, reference times resolved to absolute [Epoch]s.
/// Obtained from [GpsEphemerisRaw] with [Self::from_raw].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsEphemeris {
    /// Transmitting satellite
    pub sv: SV,
    /// Era resolved GPS week counter
    pub week: u32,
    /// Time of week count at collection (6 s units)
    pub tow: u32,
    /// Ephemeris reference time
    pub toe: Epoch,
    /// Clock reference time
    pub toc: Epoch,
    /// Issue of data, ephemeris
    pub iode: u8,
    /// Issue of data, clock
    pub iodc: u16,
    /// Clock bias [s]
    pub clock_offset: f64,
    /// Clock drift [s/s]
    pub clock_drift: f64,
    /// Clock drift rate [s/s²]
    pub clock_drift_rate: f64,
    /// Group delay differential [s]
    pub tgd: f64,
    /// Mean anomaly at reference time [rad]
    pub m0_rad: f64,
    /// Mean motion difference [rad/s]
    pub delta_n_rad_s: f64,
    /// Eccentricity
    pub e: f64,
    /// Square root of semi major axis [√m]
    pub sqrt_a: f64,
    /// Ascending node longitude at weekly epoch [rad]
    pub omega_0_rad: f64,
    /// Inclination at reference time [rad]
    pub i0_rad: f64,
    /// Argument of perigee [rad]
    pub omega_rad: f64,
    /// Rate of right ascension [rad/s]
    pub omega_dot_rad_s: f64,
    /// Rate of inclination [rad/s]
    pub i_dot_rad_s: f64,
    /// Latitude argument cosine correction [rad]
    pub cuc: f64,
    /// Latitude argument sine correction [rad]
    pub cus: f64,
    /// Orbit radius cosine correction [m]
    pub crc: f64,
    /// Orbit radius sine correction [m]
    pub crs: f64,
    /// Inclination cosine correction [rad]
    pub cic: f64,
    /// Inclination sine correction [rad]
    pub cis: f64,
    /// User range accuracy [m]
    pub ura_m: f64,
    /// SV health summary, 0 is healthy
    pub sv_health: u8,
    /// Curve fit runs beyond the nominal 4 hours
    pub fit_extended: bool,
    /// Codes on L2 channel
    pub code_on_l2: u8,
    /// L2 P code data flag
    pub l2p_data: bool,
    /// Age of data offset [s]
    pub aodo_s: u32,
}

impl GpsEphemeris {
    /// [GpsEphemeris] interpretation of one as-broadcast data set.
    /// `reference_week` is any full week counter near the collection
    /// date (the receiver clock suffices) and anchors the broadcast
    /// 10 bit week in its 1024 week era. Data sets with a null
    /// semi major axis never describe an orbit and are rejected as
    /// [Error::InvalidEphemeris].
    pub fn from_raw(raw: &GpsEphemerisRaw, reference_week: u32) -> Result<Self, Error> {
        if raw.sqrt_a == 0 {
            return Err(Error::InvalidEphemeris);
        }

        let week = Self::resolve_week(raw.week, reference_week);
        let toe = time::from_week_tow(week, raw.toe as f64 * 16.0);
        let toc = time::from_week_tow(week, raw.toc as f64 * 16.0);

        Ok(Self {
            sv: SV::new(Constellation::GPS, raw.prn),
            week,
            tow: raw.tow,
            toe,
            toc,
            iode: raw.iode,
            iodc: raw.iodc,
            clock_offset: raw.af0 as f64 * P2_31,
            clock_drift: raw.af1 as f64 * P2_43,
            clock_drift_rate: raw.af2 as f64 * P2_55,
            tgd: raw.tgd as f64 * P2_31,
            m0_rad: raw.m0 as f64 * P2_31 * PI,
            delta_n_rad_s: raw.delta_n as f64 * P2_43 * PI,
            e: raw.e as f64 * P2_33,
            sqrt_a: raw.sqrt_a as f64 * P2_19,
            omega_0_rad: raw.omega0 as f64 * P2_31 * PI,
            i0_rad: raw.i0 as f64 * P2_31 * PI,
            omega_rad: raw.omega as f64 * P2_31 * PI,
            omega_dot_rad_s: raw.omegadot as f64 * P2_43 * PI,
            i_dot_rad_s: raw.idot as f64 * P2_43 * PI,
            cuc: raw.cuc as f64 * P2_29,
            cus: raw.cus as f64 * P2_29,
            crc: raw.crc as f64 * P2_5,
            crs: raw.crs as f64 * P2_5,
            cic: raw.cic as f64 * P2_29,
            cis: raw.cis as f64 * P2_29,
            ura_m: ura::svacc_to_acc(raw.ura),
            sv_health: raw.health,
            fit_extended: raw.fit_interval != 0,
            code_on_l2: raw.code_on_l2,
            l2p_data: raw.l2p_data != 0,
            aodo_s: raw.aodo as u32 * 900,
        })
    }

    /// Exact [Self::from_raw] mirror operation: native scale factors
    /// reapplied, week counter truncated back to its broadcast
    /// 10 bits.
    pub fn to_raw(&self) -> GpsEphemerisRaw {
        let (week, toe_sow) = time::to_week_tow(&self.toe);
        let (_, toc_sow) = time::to_week_tow(&self.toc);

        GpsEphemerisRaw {
            prn: self.sv.prn,
            tow: self.tow,
            week: (week % Week::ROLLOVER) as u16,
            code_on_l2: self.code_on_l2,
            ura: ura::acc_to_svacc(self.ura_m),
            health: self.sv_health,
            iodc: self.iodc,
            l2p_data: self.l2p_data as u8,
            tgd: (self.tgd / P2_31).round() as i8,
            toc: (toc_sow / 16.0).round() as u16,
            af2: (self.clock_drift_rate / P2_55).round() as i8,
            af1: (self.clock_drift / P2_43).round() as i16,
            af0: (self.clock_offset / P2_31).round() as i32,
            iode: self.iode,
            crs: (self.crs / P2_5).round() as i16,
            delta_n: (self.delta_n_rad_s / P2_43 / PI).round() as i16,
            m0: (self.m0_rad / P2_31 / PI).round() as i32,
            cuc: (self.cuc / P2_29).round() as i16,
            e: (self.e / P2_33).round() as u32,
            cus: (self.cus / P2_29).round() as i16,
            sqrt_a: (self.sqrt_a / P2_19).round() as u32,
            toe: (toe_sow / 16.0).round() as u16,
            fit_interval: self.fit_extended as u8,
            aodo: (self.aodo_s / 900) as u8,
            cic: (self.cic / P2_29).round() as i16,
            omega0: (self.omega_0_rad / P2_31 / PI).round() as i32,
            cis: (self.cis / P2_29).round() as i16,
            i0: (self.i0_rad / P2_31 / PI).round() as i32,
            crc: (self.crc / P2_5).round() as i16,
            omega: (self.omega_rad / P2_31 / PI).round() as i32,
            omegadot: (self.omega_dot_rad_s / P2_43 / PI).round() as i32,
            idot: (self.i_dot_rad_s / P2_43 / PI).round() as i16,
        }
    }

    /// Broadcast weeks count modulo 1024: place one in the era the
    /// reference counter designates, then shift one era when that
    /// lands more than half an era away.
    fn resolve_week(broadcast: u16, reference: u32) -> u32 {
        let mut week = (reference / Week::ROLLOVER) * Week::ROLLOVER + broadcast as u32;
        if week + Week::ROLLOVER / 2 < reference {
            week += Week::ROLLOVER;
        } else if week >= reference + Week::ROLLOVER / 2 {
            week = week.saturating_sub(Week::ROLLOVER);
        }
        week
    }

    /// Validity window half width, per the broadcast curve fit
    /// interval.
    pub fn validity_duration(&self) -> Duration {
        if self.fit_extended {
            Duration::from_seconds(10_800.0)
        } else {
            Duration::from_seconds(7_200.0)
        }
    }

    /// Usability statement at instant `t`: transmitter healthy, `t`
    /// within the curve fit window around both reference times.
    pub fn is_valid(&self, t: Epoch) -> bool {
        self.is_valid_within(t, self.validity_duration())
    }

    /// [Self::is_valid] against a caller supplied half window, for
    /// applications enforcing stricter staleness bounds than the
    /// broadcast fit interval.
    pub fn is_valid_within(&self, t: Epoch, half_window: Duration) -> bool {
        if self.sv_health != 0 {
            return false;
        }
        (t - self.toe).abs() <= half_window && (t - self.toc).abs() <= half_window
    }

    /// Conservative accuracy statement at instant `t` [m]: the
    /// broadcast user range accuracy, degraded one index step per
    /// validity window fully elapsed since the reference time.
    /// Unbounded staleness saturates to the open ended top of the
    /// accuracy scale.
    pub fn accuracy(&self, t: Epoch) -> f64 {
        let age = (t - self.toe).abs().to_seconds();
        let steps = (age / self.validity_duration().to_seconds()).floor() as u8;
        let index = ura::acc_to_svacc(self.ura_m).saturating_add(steps).min(15);
        ura::svacc_to_acc(index)
    }

    /// True when clock and ephemeris terms stem from the same data
    /// set: the 8 LSBs of the clock issue match the ephemeris issue.
    pub fn is_consistent(&self) -> bool {
        (self.iodc & 0xFF) as u8 == self.iode
    }
}

impl fmt::Display for GpsEphemeris {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ephemeris (IODE {}, IODC {})",
            self.sv, self.iode, self.iodc
        )?;
        writeln!(f, "  toe: {:?} (week {})", self.toe, self.week)?;
        writeln!(f, "  toc: {:?}", self.toc)?;
        writeln!(
            f,
            "  health: {}, accuracy: {:.2} m",
            self.sv_health, self.ura_m
        )?;
        writeln!(
            f,
            "  sqrt(a): {:.6} sqrt(m), e: {:.10}",
            self.sqrt_a, self.e
        )?;
        writeln!(
            f,
            "  m0: {:.9} rad, omega: {:.9} rad, omega0: {:.9} rad",
            self.m0_rad, self.omega_rad, self.omega_0_rad
        )?;
        writeln!(
            f,
            "  i0: {:.9} rad, idot: {:.3e} rad/s, omegadot: {:.3e} rad/s",
            self.i0_rad, self.i_dot_rad_s, self.omega_dot_rad_s
        )?;
        write!(
            f,
            "  clock: {:.3e} s, {:.3e} s/s, {:.3e} s/s2, tgd: {:.3e} s",
            self.clock_offset, self.clock_drift, self.clock_drift_rate, self.tgd
        )
    }
}
