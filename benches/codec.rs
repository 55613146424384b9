use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hashids_rs::{Codec, Config};

fn bench_codec(c: &mut Criterion) {
    let codec = Codec::new(&Config::new("bench salt"));
    let padded = Codec::new(&Config::new("bench salt").min_length(32));
    let values: [u64; 4] = [683, 94108, 123, 5];
    let encoded = codec.encode(&values);
    let encoded_padded = padded.encode(&values);

    c.bench_function("new", |b| b.iter(|| Codec::new(black_box(&Config::new("bench salt")))));
    c.bench_function("encode", |b| b.iter(|| codec.encode(black_box(&values[..]))));
    c.bench_function("encode padded", |b| b.iter(|| padded.encode(black_box(&values[..]))));
    c.bench_function("decode", |b| b.iter(|| codec.decode(black_box(&encoded))));
    c.bench_function("decode padded", |b| {
        b.iter(|| padded.decode(black_box(&encoded_padded)))
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
