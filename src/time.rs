//! GPS week and time of week helpers
use hifitime::{
    prelude::{Duration, Epoch, TimeScale},
    GPST_REF_EPOCH,
};

use crate::constants::Week;

/// Builds a GPST [Epoch] from a full (rollover resolved) GPS week
/// counter and elapsed seconds within that week.
pub(crate) fn from_week_tow(week: u32, sow: f64) -> Epoch {
    Epoch::from_duration(
        Duration::from_seconds((week as f64) * Week::SECONDS + sow),
        TimeScale::GPST,
    )
}

/// [from_week_tow] mirror operation: full GPS week counter and
/// elapsed seconds within that week.
pub(crate) fn to_week_tow(t: &Epoch) -> (u32, f64) {
    let dt = (*t - GPST_REF_EPOCH).to_seconds();
    let week = (dt / Week::SECONDS).floor();
    (week as u32, dt - week * Week::SECONDS)
}

/// Folds an elapsed seconds quantity into the current week, so that
/// propagation across a week rollover remains continuous.
/// An exact half week tie stays in place, on either sign.
pub(crate) fn normalize_week(dt_s: f64) -> f64 {
    if dt_s > Week::HALF_SECONDS {
        dt_s - Week::SECONDS
    } else if dt_s < -Week::HALF_SECONDS {
        dt_s + Week::SECONDS
    } else {
        dt_s
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn week_tow_mirror() {
        for (week, sow) in [(0, 0.0), (1024, 302_400.0), (2240, 345_614.0)] {
            let t = from_week_tow(week, sow);
            let (w, s) = to_week_tow(&t);
            assert_eq!(w, week);
            assert!((s - sow).abs() < 1E-6, "sow mismatch: {} vs {}", s, sow);
        }
    }

    #[test]
    fn epoch_reference() {
        // week 0, second 0 is the GPST reference epoch
        let t = from_week_tow(0, 0.0);
        assert_eq!((t - GPST_REF_EPOCH).to_seconds(), 0.0);
        let t = from_week_tow(1, 0.0);
        assert_eq!((t - GPST_REF_EPOCH).to_seconds(), 604_800.0);
    }

    #[test]
    fn week_normalization() {
        assert_eq!(normalize_week(10.0), 10.0);
        assert_eq!(normalize_week(-10.0), -10.0);
        // half week ties are not folded
        assert_eq!(normalize_week(302_400.0), 302_400.0);
        assert_eq!(normalize_week(-302_400.0), -302_400.0);
        assert_eq!(normalize_week(302_400.5), -302_399.5);
        assert_eq!(normalize_week(-302_400.5), 302_399.5);
        // crossing rollover boundaries
        assert_eq!(normalize_week(604_700.0), -100.0);
        assert_eq!(normalize_week(-604_700.0), 100.0);
    }
}
