use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use graphql_dsl::{DslSchema, Operation, Value};
use graphql_dsl_test_utils::{fixtures, STARWARS_SCHEMA};
use serde_json::json;
use std::hint::black_box;

fn luke_query(dsl: &DslSchema) -> Operation {
    let human = dsl.ty("Human").expect("Human type");
    let character = dsl.ty("Character").expect("Character type");
    let luke = dsl
        .field("Query", "human")
        .and_then(|f| {
            f.args([("id", Value::from("1000"))]).select([
                human.field("id")?,
                human.field("name")?,
                human.field("home_planet")?,
                human.field("appears_in")?,
                human
                    .field("friends")?
                    .select([character.field("name")?, character.field("appears_in")?])?,
            ])
        })
        .expect("selection");
    dsl.query().expect("query root").select([luke]).named("Luke")
}

/// Namespace construction for a type seen for the first time
fn bench_namespace_cold(c: &mut Criterion) {
    c.bench_function("namespace_cold", |b| {
        b.iter_batched(
            || DslSchema::parse(STARWARS_SCHEMA).expect("schema"),
            |dsl| black_box(dsl.ty("Human").map(|ns| ns.len())),
            BatchSize::SmallInput,
        );
    });
}

/// Lookup once the namespace is cached
fn bench_namespace_warm(c: &mut Criterion) {
    c.bench_function("namespace_warm", |b| {
        let dsl = DslSchema::parse(STARWARS_SCHEMA).expect("schema");
        let _ = dsl.ty("Human");

        b.iter(|| black_box(dsl.field("Human", "home_planet").is_ok()));
    });
}

fn bench_render(c: &mut Criterion) {
    let dsl = DslSchema::parse(STARWARS_SCHEMA).expect("schema");
    let query = luke_query(&dsl);

    c.bench_function("render_document", |b| {
        b.iter(|| black_box(query.render()));
    });
}

fn bench_inflate(c: &mut Criterion) {
    let dsl = DslSchema::parse(STARWARS_SCHEMA).expect("schema");
    let query = luke_query(&dsl);
    let data = json!({"human": fixtures::luke()});

    c.bench_function("inflate_result", |b| {
        b.iter(|| black_box(query.inflate(&data)));
    });
}

criterion_group!(
    benches,
    bench_namespace_cold,
    bench_namespace_warm,
    bench_render,
    bench_inflate
);
criterion_main!(benches);
