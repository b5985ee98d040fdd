use criterion::{criterion_group, criterion_main, Criterion};
use featsweep::describe::build_extractor;
use featsweep::detect::build_detector;
use featsweep::matching::match_descriptors;
use featsweep::{DescriptorKind, DetectorKind, ImageView, MatcherKind, SelectorKind};
use std::hint::black_box;

fn make_image(width: usize, height: usize, shift: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = (((x + shift) * 13) ^ (y * 7) ^ ((x + shift) * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn bench_pipeline(c: &mut Criterion) {
    let width = 512;
    let height = 512;
    let image = make_image(width, height, 0);
    let view = ImageView::from_slice(&image, width, height).unwrap();

    for kind in [
        DetectorKind::ShiTomasi,
        DetectorKind::Harris,
        DetectorKind::Fast,
        DetectorKind::Orb,
    ] {
        let detector = build_detector(kind).unwrap();
        c.bench_function(&format!("detect_{}", kind.name().to_lowercase()), |b| {
            b.iter(|| black_box(detector.detect(view).unwrap()));
        });
    }

    let orb = build_detector(DetectorKind::Orb).unwrap();
    let keypoints = orb.detect(view).unwrap();

    for kind in [
        DescriptorKind::Brisk,
        DescriptorKind::Brief,
        DescriptorKind::Orb,
        DescriptorKind::Sift,
    ] {
        let extractor = build_extractor(kind).unwrap();
        c.bench_function(&format!("describe_{}", kind.name().to_lowercase()), |b| {
            b.iter(|| black_box(extractor.describe(view, &keypoints).unwrap()));
        });
    }

    let shifted = make_image(width, height, 1);
    let shifted_view = ImageView::from_slice(&shifted, width, height).unwrap();
    let extractor = build_extractor(DescriptorKind::Brief).unwrap();
    let source = extractor.describe(shifted_view, &keypoints).unwrap();
    let reference = extractor.describe(view, &keypoints).unwrap();

    c.bench_function("match_brute_force_knn", |b| {
        b.iter(|| {
            black_box(
                match_descriptors(
                    &source,
                    &reference,
                    MatcherKind::BruteForce,
                    SelectorKind::KnnRatio,
                )
                .unwrap(),
            )
        });
    });

    c.bench_function("match_indexed_knn", |b| {
        b.iter(|| {
            black_box(
                match_descriptors(
                    &source,
                    &reference,
                    MatcherKind::Indexed,
                    SelectorKind::KnnRatio,
                )
                .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
