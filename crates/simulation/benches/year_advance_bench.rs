//! Criterion benchmark: advancing the housing market one year.
//!
//! `engine/*` measures `HousingMarket::advance_year` directly on markets of
//! increasing age (the stock grows with construction). `ecs/next_year` measures
//! the full `FixedUpdate` path: command queue, runner, engine, stats and hash.
//!
//! Run with: cargo bench -p simulation --bench year_advance_bench --features bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use simulation::config::CANONICAL_SEED;
use simulation::engine::HousingMarket;
use simulation::market_config::{MarketConfig, PolicyConfig};
use simulation::policies::{CorporatePolicy, StrPolicy, VacancyModel};
use simulation::test_harness::TestMarket;

/// Market advanced `years` times under the default policy.
fn aged_market(years: u32) -> HousingMarket {
    let mut market = HousingMarket::initialize(CANONICAL_SEED);
    let policy = PolicyConfig {
        new_homes_per_year: 5,
        ..Default::default()
    };
    for _ in 0..years {
        if market.advance_year(&policy).is_err() {
            break;
        }
    }
    market
}

fn bench_engine_year(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.measurement_time(Duration::from_secs(10));

    let policies = [
        (
            "free",
            CorporatePolicy::Free,
            StrPolicy::Free,
            VacancyModel::AllLongTermRentals,
        ),
        (
            "restrict_sampled",
            CorporatePolicy::Restrict,
            StrPolicy::Restrict,
            VacancyModel::SampledVacancies,
        ),
        (
            "divest_ban",
            CorporatePolicy::Divest,
            StrPolicy::Ban,
            VacancyModel::AllLongTermRentals,
        ),
    ];

    for age in [0u32, 50, 200] {
        let base = aged_market(age);
        for (name, corporate_policy, str_policy, vacancy_model) in policies {
            let policy = PolicyConfig {
                corporate_policy,
                str_policy,
                vacancy_model,
                ..Default::default()
            };
            group.bench_with_input(BenchmarkId::new(name, age), &base, |b, base| {
                b.iter_batched(
                    || base.clone(),
                    |mut market| black_box(market.advance_year(&policy)),
                    criterion::BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_ecs_year(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecs");
    group.sample_size(20);

    group.bench_function("next_year", |b| {
        b.iter_batched(
            || TestMarket::new().with_config(MarketConfig::default()),
            |mut market| {
                market.next_year();
                black_box(market.year())
            },
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_engine_year, bench_ecs_year);
criterion_main!(benches);
