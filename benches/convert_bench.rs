use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nongli::chinese::Annus;
use nongli::time_scales::Tdb;
use nongli::{Date, astronomy, to_lunisolar};

fn convert_bench(c: &mut Criterion) {
    let date = Date::from_gregorian(2024, 2, 10).expect("valid date");
    // 曆表首次使用時推算，先行預熱
    to_lunisolar(date).expect("date in range");

    let mut group = c.benchmark_group("convert");
    group.bench_function("to_lunisolar", |b| {
        b.iter(|| to_lunisolar(black_box(date)).expect("date in range"))
    });
    group.bench_function("annus_new", |b| {
        b.iter(|| Annus::new(black_box(2024)).expect("annus in range"))
    });
    group.finish();
}

fn astronomy_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("astronomy");
    group.bench_function("solar_longitude_crossing", |b| {
        b.iter(|| astronomy::solar_longitude_crossing(black_box(0.0), black_box(Tdb(2460390.0))))
    });
    group.bench_function("new_moon", |b| b.iter(|| astronomy::new_moon(black_box(298))));
    group.finish();
}

criterion_group!(benches, convert_bench, astronomy_bench);
criterion_main!(benches);
