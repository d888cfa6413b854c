//! User range accuracy conversions

/// Accuracy commitment for each broadcast URA index [m].
/// The terminal entry stands for "no accuracy guaranteed".
pub const URA_TABLE: [f64; 16] = [
    2.4,
    3.4,
    4.85,
    6.85,
    9.65,
    13.65,
    24.0,
    48.0,
    96.0,
    192.0,
    384.0,
    768.0,
    1536.0,
    3072.0,
    6144.0,
    f64::INFINITY,
];

/// Accuracy in meters a broadcast URA index commits to.
/// Indices beyond the table saturate to the unbounded terminal entry.
pub fn svacc_to_acc(index: u8) -> f64 {
    let index = (index as usize).min(URA_TABLE.len() - 1);
    URA_TABLE[index]
}

/// [svacc_to_acc] mirror operation: smallest broadcast index whose
/// commitment covers `accuracy_m`. Values no finite bound covers map
/// to the unbounded terminal index.
pub fn acc_to_svacc(accuracy_m: f64) -> u8 {
    for (index, bound) in URA_TABLE.iter().enumerate() {
        if accuracy_m <= *bound {
            return index as u8;
        }
    }
    (URA_TABLE.len() - 1) as u8
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn index_round_trip() {
        for index in 0..16 {
            assert_eq!(acc_to_svacc(svacc_to_acc(index)), index);
        }
    }

    #[test]
    fn ceiling_selection() {
        // exact bounds map to their own index
        assert_eq!(acc_to_svacc(2.4), 0);
        assert_eq!(acc_to_svacc(6144.0), 14);
        // anything in between climbs to the next commitment
        assert_eq!(acc_to_svacc(2.5), 1);
        assert_eq!(acc_to_svacc(100.0), 9);
        assert_eq!(acc_to_svacc(0.0), 0);
        // beyond every finite commitment
        assert_eq!(acc_to_svacc(10_000.0), 15);
        assert_eq!(acc_to_svacc(f64::INFINITY), 15);
    }

    #[test]
    fn saturating_lookup() {
        assert_eq!(svacc_to_acc(0), 2.4);
        assert_eq!(svacc_to_acc(6), 24.0);
        assert!(svacc_to_acc(15).is_infinite());
        assert!(svacc_to_acc(200).is_infinite());
    }
}
