use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lixeira_api::{ListResponse, TrashItem};

fn listing_json(n: usize) -> String {
    let mut entries = Vec::with_capacity(n);
    for i in 0..n {
        entries.push(format!(
            r#"{{"path":"/.trash/item{i}","name":"item{i}","isDirectory":false,"size":{i},"modificationTime":1700000000000,"expireAt":{}}}"#,
            1_700_000_000_000_i64 + i as i64
        ));
    }
    format!(r#"{{"success":true,"items":[{}]}}"#, entries.join(","))
}

fn bench_parse_listing(c: &mut Criterion) {
    let body = listing_json(10_000);

    c.bench_function("parse_listing_10k", |b| {
        b.iter(|| {
            let resp: ListResponse = serde_json::from_str(black_box(&body)).unwrap();
            let items: Vec<TrashItem> = resp.items.into_iter().map(TrashItem::from).collect();
            black_box(items.len())
        })
    });
}

fn bench_parse_mixed_entries(c: &mut Criterion) {
    // metade strings cruas, metade objetos com nomes de campo variados
    let mut entries = Vec::with_capacity(2_000);
    for i in 0..1_000 {
        entries.push(format!(r#""/docs/file{i}""#));
        entries.push(format!(
            r#"{{"fullPath":"/.trash/file{i}","mtime":{i},"length":{i},"expireAt":"17000000{i}"}}"#
        ));
    }
    let body = format!(r#"{{"success":true,"results":[{}]}}"#, entries.join(","));

    c.bench_function("parse_mixed_entries_2k", |b| {
        b.iter(|| {
            let resp: ListResponse = serde_json::from_str(black_box(&body)).unwrap();
            let items: Vec<TrashItem> = resp.items.into_iter().map(TrashItem::from).collect();
            black_box(items.len())
        })
    });
}

criterion_group!(benches, bench_parse_listing, bench_parse_mixed_entries);
criterion_main!(benches);
