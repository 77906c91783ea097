//! # Engine Benchmarks
//!
//! Performance benchmarks for thinggraph-core conversion, inference,
//! templates and interning.
//!
//! Run with: `cargo bench -p thinggraph-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use thinggraph_core::primitives::{RDF_PROPERTY, RDFS_DOMAIN, XSD_STRING};
use thinggraph_core::{
    BlankId, ConcurrentSymbolTable, Exporter, Ingestor, KindTable, Literal, MemoryRepository,
    Object, RdfsPropertyTrigger, Statement, Subject, Thing, ThingRepository, ThingStore, Value,
};

/// N things with two scalar fields and one embedded struct each.
fn create_statements(size: usize) -> Vec<Statement> {
    let mut statements = Vec::with_capacity(size * 4);
    for i in 0..size {
        let subject = format!("https://example.org/thing/{}", i);
        let label = BlankId::new(format!("n{}", i));
        statements.push(Statement::iri(
            subject.clone(),
            "https://schema.org/name",
            Object::Literal(Literal::typed(format!("thing {}", i), XSD_STRING)),
        ));
        statements.push(Statement::iri(
            subject.clone(),
            "https://schema.org/sameAs",
            Object::Iri(format!("https://example.org/thing/{}", (i + 1) % size)),
        ));
        statements.push(Statement::iri(
            subject,
            "https://enola.dev/nested",
            Object::Blank(label.clone()),
        ));
        statements.push(Statement::new(
            Subject::Blank(label),
            "https://schema.org/position",
            Object::Literal(Literal::typed(
                i.to_string(),
                "http://www.w3.org/2001/XMLSchema#integer",
            )),
        ));
    }
    statements
}

/// N properties spread over ten domain classes.
fn create_properties(size: usize) -> Vec<Thing> {
    let kinds = KindTable::default();
    (0..size)
        .map(|i| {
            kinds
                .builder(format!("https://example.org/prop/{}", i), RDF_PROPERTY)
                .with(
                    RDFS_DOMAIN,
                    Value::link(format!("https://example.org/Class{}", i % 10)),
                )
                .build()
                .expect("build")
        })
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for size in [100, 1000, 10000].iter() {
        let statements = create_statements(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let things = Ingestor::default()
                    .ingest(statements.iter().cloned())
                    .expect("ingest");
                black_box(things.len())
            });
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for size in [100, 1000, 10000].iter() {
        let mut repo = MemoryRepository::new();
        Ingestor::default()
            .load_into(create_statements(*size), &mut repo)
            .expect("load");

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut sink: Vec<Statement> = Vec::new();
                Exporter::default()
                    .export_repository(&repo, &mut sink)
                    .expect("export");
                black_box(sink)
            });
        });
    }

    group.finish();
}

fn bench_store_with_trigger(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_with_trigger");

    for size in [100, 1000].iter() {
        let properties = create_properties(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut repo = MemoryRepository::new().with_trigger(RdfsPropertyTrigger::new());
                for property in &properties {
                    repo.store(property.clone()).expect("store");
                }
                black_box(repo.len())
            });
        });
    }

    group.finish();
}

fn bench_symbol_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("symbol_put");

    for size in [1000, 10000].iter() {
        let symbols: Vec<String> = (0..*size)
            .map(|i| format!("https://example.org/thing/{}", i % (size / 2)))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let table = ConcurrentSymbolTable::new();
                for symbol in &symbols {
                    let _ = table.put(symbol);
                }
                black_box(table)
            });
        });
    }

    group.finish();
}

fn bench_repository_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("repository_lookup");

    for size in [100, 1000, 10000].iter() {
        let mut repo = MemoryRepository::new();
        Ingestor::default()
            .load_into(create_statements(*size), &mut repo)
            .expect("load");
        let iri = format!("https://example.org/thing/{}", size / 2);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(repo.get(&iri)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ingest,
    bench_export,
    bench_store_with_trigger,
    bench_symbol_put,
    bench_repository_lookup,
);
criterion_main!(benches);
