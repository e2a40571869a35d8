use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use taskloom::{ManualScheduler, SchedulerConfig};
use taskloom_clock::ClockConfig;

fn bench_manual_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("manual_scheduler_tick");
    for &n in &[10usize, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let scheduler = ManualScheduler::new(
                SchedulerConfig { tick_blocks_until_available: false },
                ClockConfig { auto_start: false, ..Default::default() },
            );
            b.iter(|| {
                for _ in 0..n {
                    scheduler.execute(|| {}).unwrap();
                }
                scheduler.tick().unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_manual_tick);
criterion_main!(benches);
