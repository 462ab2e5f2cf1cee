// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

use std::hint::black_box;

use criterion::measurement::Measurement;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion};
use jfif_core::jpeg::transform::{DctKernel, DctKind, Sample};
use jfif_core::{CodecOptions, JpegCodec, Precision};

fn test_block<T: Sample>() -> [T; 64] {
    std::array::from_fn(|i| T::cast(((i * 37) % 255) as f64 - 128.0))
}

fn bench_kernel<T: Sample>(c: &mut BenchmarkGroup<'_, impl Measurement>, precision: &str) {
    for kind in [DctKind::Reference, DctKind::Separable] {
        let kernel = DctKernel::<T>::new(kind);
        let block = test_block::<T>();
        let coeffs = kernel.forward(&block);

        let id = BenchmarkId::new(format!("forward/{kind:?}"), precision);
        c.bench_function(id, |b| b.iter(|| kernel.forward(black_box(&block))));

        let id = BenchmarkId::new(format!("inverse/{kind:?}"), precision);
        c.bench_function(id, |b| b.iter(|| kernel.inverse(black_box(&coeffs))));
    }
}

fn dct_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("dct8x8");
    bench_kernel::<f32>(&mut group, "f32");
    bench_kernel::<f64>(&mut group, "f64");
    group.finish();
}

fn image_benches(c: &mut Criterion) {
    let (width, height) = (256, 256);
    let pixels: Vec<u8> = (0..width * height * 3)
        .map(|i| ((i * 7) ^ (i / 768)) as u8)
        .collect();

    let mut group = c.benchmark_group("encode256");
    for (name, options) in [
        ("sequential", CodecOptions::sequential()),
        ("default", CodecOptions::default()),
        (
            "single",
            CodecOptions::builder().precision(Precision::Single).build(),
        ),
    ] {
        let codec = JpegCodec::new(options);
        group.bench_function(name, |b| {
            b.iter(|| codec.encode(black_box(&pixels), width, height, 0))
        });
    }
    group.finish();
}

criterion_group!(benches, dct_benches, image_benches);
criterion_main!(benches);
