//! Broadcast orbit propagation
use super::GpsEphemeris;
use crate::{
    constants::{Constants, MaxIterNumber},
    ephemeris::SatelliteState,
    time, Error,
};

use hifitime::Epoch;
use log::error;

/// Fixed point iteration tolerance on the eccentric anomaly [rad]
const KEPLER_TOLERANCE: f64 = 1E-12;

impl GpsEphemeris {
    /// Resolves [SatelliteState] at instant `t` (GPST) by Keplerian
    /// propagation of this data set: antenna phase center position in
    /// the ECEF rotating frame [m], and total transmitter clock
    /// correction [s] (polynomial, relativistic term, group delay).
    ///
    /// Propagation does not check the fit interval: couple with
    /// [Self::is_valid] before navigating on the result.
    pub fn sat_pos(&self, t: Epoch) -> Result<SatelliteState, Error> {
        if self.sqrt_a <= 0.0 {
            return Err(Error::InvalidEphemeris);
        }

        let gm_m3_s2 = Constants::gm(self.sv);
        let omega_e = Constants::omega(self.sv);

        let a = self.sqrt_a * self.sqrt_a;
        let (_, toe_sow) = time::to_week_tow(&self.toe);

        // time from ephemeris reference, folded into ±half week
        let t_k = time::normalize_week((t - self.toe).to_seconds());

        let n0 = (gm_m3_s2 / a.powi(3)).sqrt();
        let n = n0 + self.delta_n_rad_s;
        let m_k = self.m0_rad + n * t_k;

        let (e_k, _) = solve_kepler(m_k, self.e)?;
        let (sin_e_k, cos_e_k) = e_k.sin_cos();

        let v_k = ((1.0 - self.e.powi(2)).sqrt() * sin_e_k).atan2(cos_e_k - self.e);
        let phi_k = v_k + self.omega_rad;
        let (x2_sin_phi_k, x2_cos_phi_k) = (2.0 * phi_k).sin_cos();

        // second harmonic perturbations
        let du_k = self.cus * x2_sin_phi_k + self.cuc * x2_cos_phi_k;
        let dr_k = self.crs * x2_sin_phi_k + self.crc * x2_cos_phi_k;
        let di_k = self.cis * x2_sin_phi_k + self.cic * x2_cos_phi_k;

        let u_k = phi_k + du_k;
        let r_k = a * (1.0 - self.e * cos_e_k) + dr_k;
        let i_k = self.i0_rad + self.i_dot_rad_s * t_k + di_k;

        // ascending node longitude, corrected for earth rotation
        // since the start of week
        let omega_k =
            self.omega_0_rad + (self.omega_dot_rad_s - omega_e) * t_k - omega_e * toe_sow;

        let (sin_u_k, cos_u_k) = u_k.sin_cos();
        let (sin_i_k, cos_i_k) = i_k.sin_cos();
        let (sin_omega_k, cos_omega_k) = omega_k.sin_cos();

        // orbital plane position
        let x = r_k * cos_u_k;
        let y = r_k * sin_u_k;

        let position_ecef_m = (
            x * cos_omega_k - y * cos_i_k * sin_omega_k,
            x * sin_omega_k + y * cos_i_k * cos_omega_k,
            y * sin_i_k,
        );

        // clock polynomial around toc, relativistic correction,
        // L1/L2 group delay
        let dt = time::normalize_week((t - self.toc).to_seconds());
        let dtr = Constants::dtr_f(self.sv) * self.e * self.sqrt_a * sin_e_k;
        let clock_correction_s = self.clock_offset
            + self.clock_drift * dt
            + self.clock_drift_rate * dt.powi(2)
            + dtr
            - self.tgd;

        Ok(SatelliteState {
            position_ecef_m,
            clock_correction_s,
        })
    }
}

/// Eccentric anomaly from mean anomaly [rad], fixed point iteration.
/// Returns the anomaly and the number of rounds it took.
/// [Error::KeplerNonConvergence] when the tolerance is not met within
/// [MaxIterNumber::KEPLER] rounds.
fn solve_kepler(m_k: f64, e: f64) -> Result<(f64, u16), Error> {
    let mut e_k = m_k;
    let mut e_k_lst = 0.0_f64;
    let mut n_iter = 0_u16;

    while (e_k - e_k_lst).abs() > KEPLER_TOLERANCE && n_iter < MaxIterNumber::KEPLER {
        e_k_lst = e_k;
        e_k = m_k + e * e_k_lst.sin();
        n_iter += 1;
    }

    if (e_k - e_k_lst).abs() > KEPLER_TOLERANCE {
        error!(
            "kepler solver diverged (m_k={}, e={}) after {} iterations",
            m_k, e, n_iter
        );
        return Err(Error::KeplerNonConvergence);
    }

    Ok((e_k, n_iter))
}
