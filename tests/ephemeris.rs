use lnav::prelude::{
    Constellation, Duration, Ephemeris, Epoch, Frame, FrameId, GpsEphemeris, GpsEphemerisRaw, SV,
};

/// One realistic broadcast data set (PRN 13), all fields at their
/// native width and scale.
fn data_set() -> GpsEphemerisRaw {
    GpsEphemerisRaw {
        prn: 13,
        tow: 47_994,
        week: 294,
        code_on_l2: 1,
        ura: 1,
        health: 0,
        iodc: 217,
        l2p_data: 0,
        tgd: -12,
        toc: 17_550,
        af2: 0,
        af1: -17,
        af0: -123_456,
        iode: 217,
        crs: -45,
        delta_n: 12_345,
        m0: 716_000_000,
        cuc: -321,
        e: 85_899_346,
        cus: 654,
        sqrt_a: 2_701_978_828,
        toe: 17_550,
        fit_interval: 0,
        aodo: 27,
        cic: 99,
        omega0: -1_073_741_824,
        cis: -88,
        i0: 644_245_094,
        crc: 221,
        omega: 429_496_730,
        omegadot: -26_000,
        idot: -789,
    }
}

#[test]
fn wire_to_engineering() {
    let raw = data_set();

    // down to the wire and back
    let mut payload = vec![0; GpsEphemerisRaw::encoding_size()];
    raw.pack(&mut payload).unwrap();
    let wire = Frame::new(FrameId::Ephemeris, payload)
        .to_bytes()
        .unwrap();

    let frame = Frame::decode(&wire).unwrap();
    assert_eq!(frame.frame_id(), FrameId::Ephemeris);
    let unpacked = GpsEphemerisRaw::unpack(&frame.payload).unwrap();
    assert_eq!(unpacked, raw);

    // interpretation
    let eph = GpsEphemeris::from_raw(&unpacked, 2342).unwrap();
    assert_eq!(eph.sv, SV::new(Constellation::GPS, 13));
    assert_eq!(eph.week, 2342);

    let expected_toe = Epoch::from_gpst_seconds(2342.0 * 604_800.0 + 17_550.0 * 16.0);
    assert_eq!((eph.toe - expected_toe).to_seconds(), 0.0);
    assert_eq!((eph.toc - expected_toe).to_seconds(), 0.0);

    assert!((eph.e - 0.01).abs() < 1E-9);
    assert!((eph.sqrt_a - 5153.615_623).abs() < 1E-6);
    assert_eq!(eph.ura_m, 3.4);

    // and back to the exact same broadcast integers
    assert_eq!(eph.to_raw(), raw);
}

#[test]
fn reference_orbit() {
    let eph = GpsEphemeris::from_raw(&data_set(), 2342).unwrap();

    // at reference time
    let state = eph.sat_pos(eph.toe).unwrap();
    let (x, y, z) = state.position_ecef_m;
    assert!((x - 2_360_326.451_109).abs() < 1E-3);
    assert!((y - -15_574_583.759_363).abs() < 1E-3);
    assert!((z - 21_221_545.553_640).abs() < 1E-3);
    assert!((state.clock_correction_s - -5.750_302_266_032_219E-5).abs() < 1E-15);

    // one hour into the fit interval
    let t = eph.toe + Duration::from_seconds(3_600.0);
    let state = eph.sat_pos(t).unwrap();
    let (x, y, z) = state.position_ecef_m;
    assert!((x - 11_377_289.653_580).abs() < 1E-3);
    assert!((y - -16_837_602.880_994).abs() < 1E-3);
    assert!((z - 17_106_689.868_201).abs() < 1E-3);
    assert!((state.clock_correction_s - -5.751_294_452_445_293E-5).abs() < 1E-15);

    // geometry stays at GPS altitude
    let radius = (x * x + y * y + z * z).sqrt();
    assert!(radius > 2.65E7 && radius < 2.66E7, "radius {}", radius);
}

#[test]
fn format_agnostic_interface() {
    let gps = GpsEphemeris::from_raw(&data_set(), 2342).unwrap();
    let t = gps.toe + Duration::from_seconds(1_800.0);
    let state = gps.sat_pos(t).unwrap();

    let eph = Ephemeris::Gps(gps.clone());
    assert_eq!(eph.sv(), SV::new(Constellation::GPS, 13));
    assert_eq!(eph.sat_pos(t).unwrap(), state);
    assert!(eph.is_valid(t));
    assert!(!eph.is_valid(t + Duration::from_seconds(86_400.0)));
    assert_eq!(eph.accuracy(gps.toe), 3.4);
}

#[test]
fn week_era_anchoring() {
    let raw = data_set();

    // same broadcast counter, one rollover era apart
    let recent = GpsEphemeris::from_raw(&raw, 2342).unwrap();
    let past = GpsEphemeris::from_raw(&raw, 2342 - 1024).unwrap();

    assert_eq!(recent.week, past.week + 1024);
    assert_eq!(
        (recent.toe - past.toe).to_seconds(),
        1024.0 * 604_800.0
    );

    // both truncate back to the same broadcast counter
    assert_eq!(recent.to_raw().week, 294);
    assert_eq!(past.to_raw().week, 294);
}

#[test]
fn staleness_degrades_accuracy() {
    let eph = GpsEphemeris::from_raw(&data_set(), 2342).unwrap();

    let mut last = 0.0_f64;
    for hours in [0.0, 1.0, 2.5, 4.5, 9.0, 40.0] {
        let t = eph.toe + Duration::from_seconds(hours * 3_600.0);
        let accuracy = eph.accuracy(t);
        assert!(accuracy >= last, "accuracy improved with staleness");
        last = accuracy;
    }
    assert!(last.is_infinite());
}
