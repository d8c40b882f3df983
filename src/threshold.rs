//! Confidence filtering and threshold sweeps.

use crate::config::EvaluationConfig;
use crate::error::{EvalError, Result};
use crate::evaluator::evaluate;
use crate::types::{Detection, GroundTruth};

/// Keep the detections whose score is at least `threshold`.
///
/// # Errors
///
/// Returns an error if the threshold is not in `[0.0, 1.0]`.
///
/// # Example
///
/// ```
/// use detection_map::threshold::filter_by_confidence;
/// use detection_map::types::{BoundingBox, Detection};
///
/// let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
/// let detections = vec![Detection::new(0, 1, 0.9, bbox), Detection::new(0, 1, 0.3, bbox)];
///
/// let filtered = filter_by_confidence(&detections, 0.5).unwrap();
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn filter_by_confidence(detections: &[Detection], threshold: f64) -> Result<Vec<Detection>> {
    validate_threshold(threshold)?;

    Ok(detections
        .iter()
        .filter(|det| det.score >= threshold)
        .cloned()
        .collect())
}

/// Generate `steps` evenly spaced values from `start` to `end` inclusive.
///
/// ```
/// use detection_map::threshold::generate_threshold_range;
///
/// let thresholds = generate_threshold_range(0.5, 0.95, 10).unwrap();
/// assert_eq!(thresholds.len(), 10);
/// assert!((thresholds[5] - 0.75).abs() < 1e-12);
/// ```
pub fn generate_threshold_range(start: f64, end: f64, steps: usize) -> Result<Vec<f64>> {
    if steps == 0 {
        return Err(EvalError::invalid("number of steps must be greater than 0"));
    }

    validate_threshold(start)?;
    validate_threshold(end)?;

    if start > end {
        return Err(EvalError::invalid(format!(
            "start threshold ({start}) must be <= end threshold ({end})"
        )));
    }

    if steps == 1 {
        return Ok(vec![start]);
    }

    let step_size = (end - start) / (steps - 1) as f64;
    Ok((0..steps).map(|i| start + step_size * i as f64).collect())
}

/// mAP of the same inputs at several IoU thresholds, in the given order.
///
/// All other settings come from `config`.
pub fn map_at_iou_thresholds(
    predictions: &[Detection],
    ground_truths: &[GroundTruth],
    config: &EvaluationConfig,
    iou_thresholds: &[f64],
) -> Result<Vec<(f64, f64)>> {
    iou_thresholds
        .iter()
        .map(|&iou_threshold| {
            let config = config.clone().with_iou_threshold(iou_threshold);
            let result = evaluate(predictions, ground_truths, &config)?;
            Ok((iou_threshold, result.map))
        })
        .collect()
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(EvalError::invalid(format!(
            "threshold must be between 0.0 and 1.0, got {threshold}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    #[test]
    fn test_invalid_threshold() {
        assert!(filter_by_confidence(&[], 1.5).is_err());
        assert!(filter_by_confidence(&[], -0.1).is_err());
    }

    #[test]
    fn test_generate_threshold_range() {
        let thresholds = generate_threshold_range(0.0, 1.0, 11).unwrap();
        assert_eq!(thresholds.len(), 11);
        assert!((thresholds[0] - 0.0).abs() < 1e-10);
        assert!((thresholds[10] - 1.0).abs() < 1e-10);
        assert!(generate_threshold_range(0.0, 1.0, 0).is_err());
        assert!(generate_threshold_range(0.8, 0.2, 3).is_err());
    }

    #[test]
    fn test_map_at_iou_thresholds() {
        let gts = vec![GroundTruth::new(0, 1, BoundingBox::new(0.0, 0.0, 10.0, 10.0))];
        // IoU = 80 / 120
        let preds = vec![Detection::new(0, 1, 0.9, BoundingBox::new(2.0, 0.0, 12.0, 10.0))];

        let sweep =
            map_at_iou_thresholds(&preds, &gts, &EvaluationConfig::new(2), &[0.5, 0.75]).unwrap();
        assert_eq!(sweep, vec![(0.5, 1.0), (0.75, 0.0)]);
    }

    #[test]
    fn test_map_at_iou_thresholds_rejects_zero() {
        let result = map_at_iou_thresholds(&[], &[], &EvaluationConfig::new(2), &[0.5, 0.0]);
        assert!(matches!(result, Err(EvalError::InvalidArgument(_))));
    }
}
