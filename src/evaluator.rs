//! Main evaluation orchestrator for mean Average Precision.

use crate::config::{ClassAveraging, EvaluationConfig};
use crate::error::{EvalError, Result};
use crate::matching::match_detections;
use crate::metrics::ap::{calculate_ap, calculate_map};
use crate::metrics::precision_recall::calculate_precision_recall_curve;
use crate::types::{ClassMetrics, Detection, EvaluationResult, GroundTruth};
use log::{debug, trace};
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluate object detection predictions against ground truth.
///
/// Every class in `1..config.num_classes` is evaluated independently: its
/// predictions are ranked by score, greedily matched to the ground truths of
/// the same image, folded into a precision/recall curve and integrated into
/// an average precision. Class 0 is background and is never scored, and
/// records of classes outside the range are ignored.
///
/// A class without ground truth has AP 0. Whether such classes take part in
/// the mean is decided by [`ClassAveraging`].
///
/// # Errors
///
/// Returns [`EvalError::InvalidArgument`] for an IoU threshold outside
/// `(0, 1]`, a class count below 1, a box with non-finite or unordered
/// coordinates, or a score outside `[0, 1]`. Nothing is computed in that
/// case.
///
/// # Example
///
/// ```
/// use detection_map::config::EvaluationConfig;
/// use detection_map::evaluator::evaluate;
/// use detection_map::types::{BoundingBox, Detection, GroundTruth};
///
/// let gts = vec![GroundTruth::new(0, 1, BoundingBox::new(0.0, 0.0, 10.0, 10.0))];
/// let preds = vec![Detection::new(0, 1, 0.9, BoundingBox::new(0.0, 0.0, 10.0, 10.0))];
///
/// let result = evaluate(&preds, &gts, &EvaluationConfig::new(2)).unwrap();
/// assert_eq!(result.map, 1.0);
/// ```
pub fn evaluate(
    predictions: &[Detection],
    ground_truths: &[GroundTruth],
    config: &EvaluationConfig,
) -> Result<EvaluationResult> {
    config.validate()?;
    validate_inputs(predictions, ground_truths)?;

    let num_classes = config.num_classes as usize;
    let mut pred_buckets: Vec<Vec<&Detection>> = vec![Vec::new(); num_classes];
    let mut gt_buckets: Vec<Vec<&GroundTruth>> = vec![Vec::new(); num_classes];
    let mut ignored = 0usize;

    for pred in predictions {
        match pred_buckets.get_mut(pred.class_id as usize) {
            Some(bucket) if pred.class_id != 0 => bucket.push(pred),
            _ => ignored += 1,
        }
    }
    for gt in ground_truths {
        match gt_buckets.get_mut(gt.class_id as usize) {
            Some(bucket) if gt.class_id != 0 => bucket.push(gt),
            _ => ignored += 1,
        }
    }

    debug!(
        "evaluating {} predictions against {} ground truths over {} classes (iou >= {})",
        predictions.len(),
        ground_truths.len(),
        config.scored_classes().len(),
        config.iou_threshold
    );
    if ignored > 0 {
        debug!("ignored {ignored} records with background or out-of-range class ids");
    }

    let jobs: Vec<(u32, Vec<&Detection>, Vec<&GroundTruth>)> = config
        .scored_classes()
        .map(|class_id| {
            let idx = class_id as usize;
            (
                class_id,
                std::mem::take(&mut pred_buckets[idx]),
                std::mem::take(&mut gt_buckets[idx]),
            )
        })
        .collect();

    #[cfg(feature = "parallel")]
    let per_class: Vec<ClassMetrics> = jobs
        .into_par_iter()
        .map(|(class_id, preds, gts)| evaluate_class(class_id, &preds, &gts, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let per_class: Vec<ClassMetrics> = jobs
        .into_iter()
        .map(|(class_id, preds, gts)| evaluate_class(class_id, &preds, &gts, config))
        .collect();

    let averaged: Vec<f64> = per_class
        .iter()
        .filter(|m| match config.class_averaging {
            ClassAveraging::AllClasses => true,
            ClassAveraging::PresentClasses => m.num_ground_truths > 0,
        })
        .map(|m| m.average_precision)
        .collect();
    let map = calculate_map(&averaged);

    debug!("mAP {map:.4} over {} classes", averaged.len());

    Ok(EvaluationResult {
        per_class: per_class.into_iter().map(|m| (m.class_id, m)).collect::<BTreeMap<_, _>>(),
        map,
    })
}

/// Evaluate with default policies at the given IoU threshold and class count.
pub fn evaluate_with(
    predictions: &[Detection],
    ground_truths: &[GroundTruth],
    iou_threshold: f64,
    num_classes: u32,
) -> Result<EvaluationResult> {
    let config = EvaluationConfig::new(num_classes).with_iou_threshold(iou_threshold);
    evaluate(predictions, ground_truths, &config)
}

/// Evaluate a single class whose records were already filtered.
fn evaluate_class(
    class_id: u32,
    predictions: &[&Detection],
    ground_truths: &[&GroundTruth],
    config: &EvaluationConfig,
) -> ClassMetrics {
    if ground_truths.is_empty() {
        trace!("class {class_id}: no ground truth, AP 0");
        return ClassMetrics {
            num_detections: predictions.len(),
            false_positives: predictions.len(),
            ..ClassMetrics::empty(class_id, 0)
        };
    }

    let matches = match_detections(
        predictions,
        ground_truths,
        config.iou_threshold,
        config.match_policy,
    );
    let is_tp: Vec<bool> = matches.iter().map(|m| m.is_true_positive).collect();
    let curve = calculate_precision_recall_curve(&is_tp, ground_truths.len());
    let average_precision = calculate_ap(&curve.precisions, &curve.recalls);

    trace!(
        "class {class_id}: {} gt, {} tp, {} fp, AP {average_precision:.4}",
        ground_truths.len(),
        curve.true_positives,
        curve.false_positives
    );

    ClassMetrics {
        class_id,
        average_precision,
        num_ground_truths: ground_truths.len(),
        num_detections: predictions.len(),
        true_positives: curve.true_positives,
        false_positives: curve.false_positives,
        precisions: curve.precisions,
        recalls: curve.recalls,
    }
}

/// Reject scores and boxes the engine cannot rank or measure.
fn validate_inputs(predictions: &[Detection], ground_truths: &[GroundTruth]) -> Result<()> {
    for (idx, pred) in predictions.iter().enumerate() {
        if !(0.0..=1.0).contains(&pred.score) {
            return Err(EvalError::invalid(format!(
                "prediction {idx}: score must be in [0, 1], got {}",
                pred.score
            )));
        }
        pred.bbox
            .validate()
            .map_err(|e| EvalError::invalid(format!("prediction {idx}: {e}")))?;
    }
    for (idx, gt) in ground_truths.iter().enumerate() {
        gt.bbox
            .validate()
            .map_err(|e| EvalError::invalid(format!("ground truth {idx}: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn square(x: f64, y: f64, size: f64) -> BoundingBox {
        BoundingBox::new(x, y, x + size, y + size)
    }

    #[test]
    fn test_evaluate_basic() {
        let gts = vec![GroundTruth::new(1, 1, square(10.0, 10.0, 50.0))];
        let preds = vec![Detection::new(1, 1, 0.9, square(10.0, 10.0, 50.0))];
        let result = evaluate(&preds, &gts, &EvaluationConfig::new(2)).unwrap();
        assert_eq!(result.per_class.len(), 1);
        assert!((result.map - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_background_and_out_of_range_ignored() {
        let gts = vec![
            GroundTruth::new(1, 1, square(0.0, 0.0, 10.0)),
            GroundTruth::new(1, 0, square(0.0, 0.0, 10.0)),
            GroundTruth::new(1, 7, square(0.0, 0.0, 10.0)),
        ];
        let preds = vec![
            Detection::new(1, 1, 0.9, square(0.0, 0.0, 10.0)),
            Detection::new(1, 0, 0.9, square(50.0, 50.0, 10.0)),
            Detection::new(1, 7, 0.9, square(50.0, 50.0, 10.0)),
        ];
        let result = evaluate(&preds, &gts, &EvaluationConfig::new(2)).unwrap();
        assert_eq!(result.per_class.keys().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(result.per_class[&1].num_detections, 1);
        assert!((result.map - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_class_without_ground_truth_counts_false_positives() {
        let preds = vec![Detection::new(1, 2, 0.4, square(0.0, 0.0, 10.0))];
        let result = evaluate(&preds, &[], &EvaluationConfig::new(3)).unwrap();
        let metrics = &result.per_class[&2];
        assert_eq!(metrics.average_precision, 0.0);
        assert_eq!(metrics.false_positives, 1);
        assert!(metrics.precisions.is_empty());
    }

    #[test]
    fn test_invalid_score() {
        let preds = vec![Detection::new(1, 1, 1.5, square(0.0, 0.0, 10.0))];
        let result = evaluate(&preds, &[], &EvaluationConfig::new(2));
        assert!(matches!(result, Err(EvalError::InvalidArgument(_))));

        let preds = vec![Detection::new(1, 1, f64::NAN, square(0.0, 0.0, 10.0))];
        assert!(evaluate(&preds, &[], &EvaluationConfig::new(2)).is_err());
    }

    #[test]
    fn test_evaluate_with() {
        let gts = vec![GroundTruth::new(1, 1, square(0.0, 0.0, 10.0))];
        let preds = vec![Detection::new(1, 1, 0.9, square(2.0, 0.0, 10.0))];
        // IoU = 80 / 120
        assert!((evaluate_with(&preds, &gts, 0.6, 2).unwrap().map - 1.0).abs() < 1e-12);
        assert_eq!(evaluate_with(&preds, &gts, 0.7, 2).unwrap().map, 0.0);
    }
}
