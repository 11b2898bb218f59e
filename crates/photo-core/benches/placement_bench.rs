//! Placement resolution benchmarks
//!
//! The resolvers are called once per insertion, so these numbers mostly guard
//! against accidental allocation or branching regressions in the hot path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use photo_core::{
    compute_placement, resolve_size, Anchor, Dimensions, FitMode, PageFrame, PositionDirective,
    Rotation, SizeDirective,
};

fn bench_resolve_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_size");
    let original = Dimensions::new(4000.0, 6000.0).unwrap();
    let directive = SizeDirective::Explicit {
        width: 180.0,
        height: 60.0,
    };

    for mode in [FitMode::Fit, FitMode::Fill, FitMode::Stretch] {
        group.bench_with_input(BenchmarkId::from_parameter(mode), &mode, |b, &mode| {
            b.iter(|| resolve_size(black_box(original), black_box(directive), mode).unwrap());
        });
    }

    group.finish();
}

fn bench_compute_placement(c: &mut Criterion) {
    let original = Dimensions::new(4000.0, 6000.0).unwrap();

    c.bench_function("compute_placement_all_anchors", |b| {
        b.iter(|| {
            for anchor in Anchor::ALL {
                let placement = compute_placement(
                    black_box(PageFrame::A4),
                    black_box(original),
                    SizeDirective::Default,
                    FitMode::Fit,
                    PositionDirective::Named {
                        anchor,
                        margin: 20.0,
                    },
                )
                .unwrap();
                black_box(placement.transform(Rotation::R90, FitMode::Fit));
            }
        });
    });
}

criterion_group!(benches, bench_resolve_size, bench_compute_placement);
criterion_main!(benches);
