use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use term_basket::mining::{
    compute_rules, count_frequencies, filter_rules, RuleThresholds, Transaction, PAIR_SIZE,
};

/// Builds `n` four-column transactions with a bounded vocabulary per column.
fn synthetic_transactions(n: usize) -> Vec<Transaction> {
    (0..n)
        .map(|i| {
            Transaction::from_items([
                format!("producto_{}", i % 97),
                format!("negocio_{}", i % 13),
                format!("mes_{}", i % 12),
                format!("linea_{}", i % 7),
            ])
        })
        .collect()
}

fn benchmark_count_frequencies(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_frequencies");

    for n in [1_000, 10_000, 100_000].iter() {
        let transactions = synthetic_transactions(*n);
        group.throughput(Throughput::Elements(*n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &transactions, |b, txs| {
            b.iter(|| count_frequencies(std::hint::black_box(txs), PAIR_SIZE).unwrap());
        });
    }

    group.finish();
}

fn benchmark_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_and_filter_rules");

    for n in [1_000, 100_000].iter() {
        let counts = count_frequencies(&synthetic_transactions(*n), PAIR_SIZE).unwrap();
        let thresholds = RuleThresholds::default();
        group.bench_with_input(BenchmarkId::from_parameter(n), &counts, |b, counts| {
            b.iter(|| {
                let rules = compute_rules(std::hint::black_box(counts)).unwrap();
                filter_rules(&rules, &thresholds)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_count_frequencies, benchmark_rules);
criterion_main!(benches);
