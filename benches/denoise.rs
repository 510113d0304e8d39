//! Criterion benchmarks for the denoiser.
//!
//! Run with: cargo bench
//! Run specific: cargo bench -- denoise_plane

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hqdn3d::{
    denoise_plane, CoefficientSet, CoefficientTable, Denoiser, FrameSource, PixelFormat,
    PlaneClass, PlaneGeometry, SampleDepth, StreamLayout, Strengths,
};
use hqdn3d::video::SyntheticSource;

fn bench_table_build(c: &mut Criterion) {
    c.bench_function("table_build", |b| {
        b.iter(|| CoefficientTable::build(black_box(4.0)))
    });
}

fn bench_denoise_plane(c: &mut Criterion) {
    let mut group = c.benchmark_group("denoise_plane");
    let tables = CoefficientSet::build(&Strengths::default());
    let spatial_off = CoefficientSet::build(&"0:0:6:6".parse().unwrap());
    let (width, height) = (640usize, 360usize);

    for depth in [SampleDepth::Eight, SampleDepth::Ten] {
        let bps = depth.bytes_per_sample();
        let geometry = PlaneGeometry::packed(width, height, bps);
        let src: Vec<u8> = (0..width * height * bps).map(|i| (i * 31 % 251) as u8).collect();
        let src: Vec<u8> = if bps == 2 {
            // keep 10-bit words in range
            src.chunks(2).flat_map(|w| [w[0], w[1] & 0x03]).collect()
        } else {
            src
        };
        let mut dst = vec![0u8; src.len()];
        let mut line = vec![0u16; width];

        group.throughput(Throughput::Elements((width * height) as u64));

        for (name, set) in [("spatial_temporal", &tables), ("temporal_only", &spatial_off)] {
            let pair = set.pair(PlaneClass::Luma);
            let mut state = None;
            group.bench_with_input(BenchmarkId::new(name, depth), &depth, |b, &depth| {
                b.iter(|| {
                    denoise_plane(
                        black_box(&src),
                        &mut dst,
                        &mut line,
                        &mut state,
                        geometry,
                        pair,
                        depth,
                    )
                })
            });
        }
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    group.sample_size(20);

    for format in [PixelFormat::Yuv420p, PixelFormat::Yuv420p10] {
        let layout = StreamLayout::new(1280, 720, format);
        let frame = SyntheticSource::new(layout, 1, 7)
            .next_frame()
            .unwrap()
            .unwrap();
        let mut denoiser = Denoiser::new(&Strengths::default()).unwrap();
        denoiser.configure(layout).unwrap();

        group.throughput(Throughput::Elements(u64::from(layout.width * layout.height)));
        group.bench_with_input(BenchmarkId::new("process", format), &frame, |b, frame| {
            b.iter(|| denoiser.process(black_box(frame)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_table_build, bench_denoise_plane, bench_frame);
criterion_main!(benches);
