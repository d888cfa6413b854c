use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lnav::prelude::{Decoder, Duration, Frame, FrameId, GpsEphemeris, GpsEphemerisRaw};

#[allow(unused_must_use)]
pub fn criterion_benchmark(c: &mut Criterion) {
    let raw = GpsEphemerisRaw {
        prn: 13,
        tow: 47_994,
        week: 294,
        ura: 1,
        iodc: 217,
        iode: 217,
        toc: 17_550,
        toe: 17_550,
        af0: -123_456,
        m0: 716_000_000,
        e: 85_899_346,
        sqrt_a: 2_701_978_828,
        omega0: -1_073_741_824,
        i0: 644_245_094,
        omega: 429_496_730,
        delta_n: 12_345,
        omegadot: -26_000,
        idot: -789,
        ..Default::default()
    };

    let mut payload = vec![0; GpsEphemerisRaw::encoding_size()];
    raw.pack(&mut payload).unwrap();

    let frame = Frame::new(FrameId::Ephemeris, payload);
    let wire = frame.to_bytes().unwrap();

    c.bench_function("frame-decoding", |b| {
        b.iter(|| {
            black_box(Frame::decode(&wire).unwrap());
        })
    });

    let mut stream = Vec::with_capacity(100 * wire.len());
    for _ in 0..100 {
        stream.extend_from_slice(&wire);
    }

    c.bench_function("stream-decoding", |b| {
        b.iter(|| {
            black_box(Decoder::new(&stream[..]).count());
        })
    });

    c.bench_function("subframes-unpacking", |b| {
        b.iter(|| {
            black_box(GpsEphemerisRaw::unpack(&frame.payload).unwrap());
        })
    });

    c.bench_function("interpretation", |b| {
        b.iter(|| {
            black_box(GpsEphemeris::from_raw(&raw, 2342).unwrap());
        })
    });

    let eph = GpsEphemeris::from_raw(&raw, 2342).unwrap();
    let t = eph.toe + Duration::from_seconds(3_600.0);

    c.bench_function("orbit-propagation", |b| {
        b.iter(|| {
            black_box(eph.sat_pos(t).unwrap());
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
