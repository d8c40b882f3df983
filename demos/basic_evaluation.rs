//! Basic evaluation example demonstrating core functionality.
//!
//! Run with `RUST_LOG=debug cargo run --example basic_evaluation` to see the
//! evaluator's log output.

use detection_map::{
    evaluate, load_detections_from_str, load_ground_truths_from_str, map_at_iou_thresholds,
    metrics::iou::calculate_iou, BoundingBox, ClassAveraging, EvaluationConfig,
    generate_threshold_range,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Detection mAP Example ===\n");

    // Example 1: IoU Calculation
    println!("1. IoU Calculation");
    let bbox1 = BoundingBox::new(10.0, 10.0, 60.0, 60.0);
    let bbox2 = BoundingBox::new(30.0, 30.0, 80.0, 80.0);
    println!("   IoU between overlapping boxes: {:.4}", calculate_iou(&bbox1, &bbox2));
    println!();

    // Example 2: Load records. Classes: 0 background, 1 without_mask, 2 with_mask
    println!("2. Loading Records");
    let ground_truth_json = r#"[
        [0, 2, 1, 100, 100, 200, 220],
        [0, 1, 1, 300, 120, 380, 210],
        [1, 2, 1, 40, 60, 120, 160]
    ]"#;
    let predictions_json = r#"[
        [0, 2, 0.97, 102, 98, 198, 225],
        [0, 1, 0.64, 290, 130, 370, 215],
        [0, 2, 0.41, 300, 120, 380, 210],
        [1, 2, 0.88, 45, 58, 118, 170],
        [1, 2, 0.52, 44, 60, 122, 158]
    ]"#;

    let config = EvaluationConfig::new(3);
    let ground_truths = load_ground_truths_from_str(ground_truth_json, config.box_format)?;
    let predictions = load_detections_from_str(predictions_json, config.box_format)?;
    println!("   Loaded {} ground truths", ground_truths.len());
    println!("   Loaded {} predictions", predictions.len());
    println!();

    // Example 3: Evaluate
    println!("3. Evaluation at IoU 0.5");
    let result = evaluate(&predictions, &ground_truths, &config)?;
    for (class_id, metrics) in &result.per_class {
        println!(
            "   class {class_id}: AP {:.4} ({} TP, {} FP, {} GT)",
            metrics.average_precision,
            metrics.true_positives,
            metrics.false_positives,
            metrics.num_ground_truths
        );
        for (recall, precision) in metrics.recalls.iter().zip(&metrics.precisions) {
            println!("      recall {recall:.3}  precision {precision:.3}");
        }
    }
    println!("   mAP: {:.4}", result.map);
    println!();

    // Example 4: Averaging only over classes with ground truth
    let present = config.clone().with_class_averaging(ClassAveraging::PresentClasses);
    let result = evaluate(&predictions, &ground_truths, &present)?;
    println!("4. mAP over present classes: {:.4}", result.map);
    println!();

    // Example 5: IoU sweep
    println!("5. mAP at IoU 0.50:0.05:0.95");
    let thresholds = generate_threshold_range(0.5, 0.95, 10)?;
    for (iou, map) in map_at_iou_thresholds(&predictions, &ground_truths, &config, &thresholds)? {
        println!("   IoU {iou:.2}: mAP {map:.4}");
    }

    Ok(())
}
