//! Benchmarks for row decoding and population loading.

use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use nsga_population::{population::Population, schema::Solution};

const OBJECTIVES: [&str; 3] = [
    "Delivered mass to final target",
    "Flight time (days)",
    "Total delta-v (km/s)",
];

fn headers(genes: usize, inner: usize) -> Vec<String> {
    let mut headers = vec![
        "Generation found".to_string(),
        "timestamp".to_string(),
        "Description".to_string(),
    ];
    headers.extend(OBJECTIVES.iter().map(|s| s.to_string()));
    headers.extend((0..genes).map(|i| format!("Journey 0 Gene {}", i)));
    headers.extend((0..inner).map(|i| format!("x{}", i)));
    headers
}

fn row(index: usize, genes: usize, inner: usize) -> String {
    let mut cells = vec![
        (index % 50).to_string(),
        (index * 3).to_string(),
        format!("Case{}_10kW_2nTh_NEXTHIspv10_AV551_(EVEEJ)", index),
        format!("{}", 1500.0 + index as f64),
        format!("{}", 900.0 - index as f64 * 0.1),
        "6.25".to_string(),
    ];
    cells.extend((0..genes).map(|g| ((g + index) % 7).to_string()));
    cells.extend((0..inner).map(|i| format!("{:.6}", (i as f64 * 0.37).sin())));
    cells.join(",")
}

fn bench_decode_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_row");

    for inner in [10, 100, 1000] {
        let headers = headers(8, inner);
        let line = row(1, 8, inner);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_inner", inner)),
            &inner,
            |b, _| {
                b.iter(|| Solution::decode(black_box(&line), &headers).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_load_population(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_population");

    for rows in [100, 1000, 5000] {
        let mut text = String::from("meta\nmeta\nmeta\n");
        text.push_str(&headers(8, 50).join(","));
        text.push('\n');
        text.push_str(&(0..8).map(|i| format!("Journey 0 Gene {}", i)).collect::<Vec<_>>().join(","));
        text.push('\n');
        for i in 0..rows {
            text.push_str(&row(i, 8, 50));
            text.push('\n');
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_rows", rows)),
            &rows,
            |b, _| {
                b.iter(|| Population::from_reader(Cursor::new(black_box(text.as_bytes()))).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_decode_row, bench_load_population);
criterion_main!(benches);
