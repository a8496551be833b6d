//! Performance benchmarks for the derived-property generator.
//!
//! - Parsing: the fixtures in `test_sources/`
//! - Compilation: registration and completion over a synthetic workload
//! - Generation: a full pass over that workload

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use derived_props::{CancellationToken, Compilation, DerivedPropertyGenerator, SourceId, parse_lenient};
use std::hint::black_box;

const COLLECTIONS: &str = include_str!("../test_sources/Collections.cs");
const DEFINITIONS: &str = include_str!("../test_sources/Definitions.cs");

/// `count` marked classes spread over ten namespaces.
fn marked_classes(count: usize) -> String {
    let mut source = String::from("using Definitions;\n");
    for i in 0..count {
        source.push_str(&format!(
            "namespace Bench.N{ns}\n{{\n\t[HasDerivedProperty(nameof(DerivedProperties.FullName))]\n\
             \t[HasDerivedProperty(\"Age\")]\n\
             \tpublic partial class Person{i}\n\t{{\n\t\tpublic string FirstName;\n\t\tpublic string LastName;\n\t}}\n}}\n",
            ns = i % 10
        ));
    }
    source
}

fn compile(workload: &str) -> Compilation {
    let mut builder = Compilation::builder();
    builder.add_metadata_reference("Collections.cs", COLLECTIONS);
    builder.add_source("Definitions.cs", DEFINITIONS);
    builder.add_source("Workload.cs", workload);
    match builder.build() {
        Ok(compilation) => compilation,
        Err(error) => panic!("workload failed to compile: {error}"),
    }
}

fn parsing_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/fixtures");

    let fixtures = [
        ("collections", COLLECTIONS),
        ("definitions", DEFINITIONS),
        ("people", include_str!("../test_sources/People.cs")),
        ("showcase", include_str!("../test_sources/Showcase.cs")),
    ];
    for (name, source) in fixtures {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let (file, _) = parse_lenient(black_box(source), SourceId::new(0));
                black_box(file.declaration_count())
            });
        });
    }

    group.finish();
}

fn compilation_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("compilation/classes");

    for count in [10, 100, 1000] {
        let workload = marked_classes(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &workload, |b, workload| {
            b.iter(|| black_box(compile(black_box(workload))));
        });
    }

    group.finish();
}

fn generation_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator/classes");
    let generator = DerivedPropertyGenerator::default();
    let cancel = CancellationToken::new();

    for count in [10, 100, 1000] {
        let compilation = compile(&marked_classes(count));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &compilation, |b, compilation| {
            b.iter(|| {
                let output = generator.execute(black_box(compilation), &cancel);
                black_box(output.map(|o| o.artifacts.len()))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    parsing_benchmarks,
    compilation_benchmarks,
    generation_benchmarks
);
criterion_main!(benches);
