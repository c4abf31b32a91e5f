use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use streamjson::{JsonReader, OrderedMap, StrSource};

fn flat_array(c: &mut Criterion) {
    let doc = format!("[{}]", (0..10_000).map(|i| i.to_string()).collect::<Vec<_>>().join(","));

    c.bench_with_input(BenchmarkId::new("flat_array", "10k ints"), &doc, |b, s| {
        b.iter(|| {
            let mut r = JsonReader::new(StrSource::new(s));
            r.begin_array().unwrap();
            let mut sum: i64 = 0;
            while r.has_next().unwrap() {
                sum += i64::from(r.next_i32().unwrap());
            }
            r.end_array().unwrap();
            sum
        });
    });
}

fn nested_objects(c: &mut Criterion) {
    let mut doc = String::new();
    for _ in 0..2_000 {
        doc.push_str(r#"{"a":1,"b":"two","c":[1,2,3],"d":null},"#);
    }
    let doc = format!("[{}]", doc.trim_end_matches(','));

    c.bench_with_input(BenchmarkId::new("nested_objects", "2k records"), &doc, |b, s| {
        b.iter(|| {
            let mut r = JsonReader::new(StrSource::new(s));
            r.skip_value().unwrap();
        });
    });
}

fn ordered_map_insert_and_lookup(c: &mut Criterion) {
    c.bench_function("ordered_map_insert_and_lookup", |b| {
        b.iter(|| {
            let mut map = OrderedMap::new();
            for i in 0..5_000 {
                map.insert(i, i * 2);
            }
            for i in 0..5_000 {
                assert_eq!(map.get(&i), Some(&(i * 2)));
            }
        });
    });
}

criterion_group!(benches, flat_array, nested_objects, ordered_map_insert_and_lookup);
criterion_main!(benches);
