use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scen_core::{MarketImpactInput, TargetMarket};

fn bench_projection(c: &mut Criterion) {
    let input = MarketImpactInput {
        additional_volume_tonnes_per_week: 600.0,
        target_market: TargetMarket::Germany,
    };
    c.bench_function("market impact 12 weeks", |b| {
        b.iter(|| {
            let _ = black_box(scen_market::compute_market_impact(black_box(&input)));
        })
    });
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
