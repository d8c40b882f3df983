//! Precision and recall accumulation over ranked detections.

use serde::{Deserialize, Serialize};

/// Cumulative precision/recall points for a ranked list of detections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecallCurve {
    pub precisions: Vec<f64>,
    pub recalls: Vec<f64>,
    pub true_positives: usize,
    pub false_positives: usize,
}

impl PrecisionRecallCurve {
    pub fn len(&self) -> usize {
        self.precisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.precisions.is_empty()
    }
}

/// Calculate the precision-recall curve from detections sorted by confidence.
///
/// After the `k`-th detection, precision is `TP_k / (TP_k + FP_k)` and recall
/// is `TP_k / num_ground_truth`. Recall is 0 when there is no ground truth.
///
/// # Example
///
/// ```
/// use detection_map::metrics::precision_recall::calculate_precision_recall_curve;
///
/// let curve = calculate_precision_recall_curve(&[true, false, true], 2);
/// assert_eq!(curve.recalls, vec![0.5, 0.5, 1.0]);
/// assert_eq!(curve.precisions[1], 0.5);
/// ```
pub fn calculate_precision_recall_curve(
    is_true_positive: &[bool],
    num_ground_truth: usize,
) -> PrecisionRecallCurve {
    let init = PrecisionRecallCurve {
        precisions: Vec::with_capacity(is_true_positive.len()),
        recalls: Vec::with_capacity(is_true_positive.len()),
        true_positives: 0,
        false_positives: 0,
    };

    is_true_positive.iter().fold(init, |mut curve, &is_tp| {
        if is_tp {
            curve.true_positives += 1;
        } else {
            curve.false_positives += 1;
        }

        let tp = curve.true_positives as f64;
        let detected = (curve.true_positives + curve.false_positives) as f64;
        curve.precisions.push(tp / detected);
        curve.recalls.push(if num_ground_truth > 0 {
            tp / num_ground_truth as f64
        } else {
            0.0
        });
        curve
    })
}
