use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use proctor_core::parser::{parse_test_definition_str, validate_test_definition};

fn make_toml(mcqs: usize, coding: usize) -> String {
    let mut toml = String::from(
        "[test]\nid = \"bench\"\nname = \"Bench\"\ndescription = \"Generated\"\n",
    );
    for i in 0..mcqs {
        toml.push_str(&format!(
            "\n[[mcq]]\nid = \"q{i}\"\nprompt = \"Question {i}\"\noptions = [\"a\", \"b\", \"c\", \"d\"]\ncorrect = {}\n",
            i % 4
        ));
    }
    for i in 0..coding {
        toml.push_str(&format!(
            "\n[[coding]]\nid = \"c{i}\"\nprompt = \"Task {i}\"\nlanguage = \"python\"\n"
        ));
    }
    toml
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_test_definition");
    let path = Path::new("bench.toml");

    for size in [5usize, 50, 500] {
        let toml = make_toml(size, size / 5);
        group.bench_function(format!("mcqs={size}"), |b| {
            b.iter(|| parse_test_definition_str(black_box(&toml), path))
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_test_definition");
    let test = parse_test_definition_str(&make_toml(200, 20), Path::new("bench.toml"))
        .expect("generated TOML parses");

    group.bench_function("mcqs=200", |b| {
        b.iter(|| validate_test_definition(black_box(&test)))
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_validate);
criterion_main!(benches);
