use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use detection_map::config::EvaluationConfig;
use detection_map::evaluator::evaluate;
use detection_map::metrics::{calculate_ap, calculate_iou};
use detection_map::types::{BoundingBox, Detection, GroundTruth};

fn bench_iou_calculation(c: &mut Criterion) {
    let bbox1 = BoundingBox::new(10.0, 10.0, 60.0, 60.0);
    let bbox2 = BoundingBox::new(30.0, 30.0, 80.0, 80.0);

    c.bench_function("iou_single", |b| {
        b.iter(|| calculate_iou(black_box(&bbox1), black_box(&bbox2)));
    });
}

fn bench_iou_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("iou_matrix");

    for size in [10, 50, 100, 500].iter() {
        let boxes: Vec<BoundingBox> = (0..*size)
            .map(|i| {
                let offset = (i as f64) * 2.0;
                BoundingBox::new(offset, offset, offset + 50.0, offset + 50.0)
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for i in 0..boxes.len() {
                    for j in 0..boxes.len() {
                        black_box(calculate_iou(&boxes[i], &boxes[j]));
                    }
                }
            });
        });
    }
    group.finish();
}

fn bench_ap_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ap_calculation");

    for num_detections in [10, 50, 100, 500].iter() {
        let precision: Vec<f64> = (0..*num_detections)
            .map(|i| 1.0 - (i as f64) / (*num_detections as f64))
            .collect();
        let recall: Vec<f64> = (0..*num_detections)
            .map(|i| (i as f64) / (*num_detections as f64))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(num_detections), num_detections, |b, _| {
            b.iter(|| calculate_ap(black_box(&precision), black_box(&recall)));
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for num_images in [10, 100, 500].iter() {
        let mut ground_truths = Vec::new();
        let mut predictions = Vec::new();
        for image_id in 0..*num_images as u64 {
            for k in 0..10 {
                let offset = k as f64 * 20.0;
                let class_id = 1 + (k % 3) as u32;
                let bbox = BoundingBox::new(offset, offset, offset + 15.0, offset + 15.0);
                ground_truths.push(GroundTruth::new(image_id, class_id, bbox));

                let jittered = BoundingBox::new(offset + 2.0, offset, offset + 17.0, offset + 15.0);
                let score = 0.3 + ((image_id as usize * 10 + k) % 70) as f64 / 100.0;
                predictions.push(Detection::new(image_id, class_id, score, jittered));
            }
        }
        let config = EvaluationConfig::new(4);

        group.bench_with_input(BenchmarkId::from_parameter(num_images), num_images, |b, _| {
            b.iter(|| evaluate(black_box(&predictions), black_box(&ground_truths), &config));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_iou_calculation,
    bench_iou_matrix,
    bench_ap_calculation,
    bench_evaluate,
);
criterion_main!(benches);
