//! Greedy matching of ranked predictions against ground truth.

use crate::config::MatchPolicy;
use crate::metrics::iou::calculate_iou;
use crate::types::{Detection, GroundTruth};
use std::collections::HashMap;

/// Outcome of matching one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Index of the prediction in the slice passed to [`match_detections`]
    pub prediction_index: usize,
    /// Index of the claimed ground truth, for true positives
    pub ground_truth_index: Option<usize>,
    /// IoU with the best candidate ground truth, 0 if there was none
    pub iou: f64,
    pub is_true_positive: bool,
    pub score: f64,
}

/// Group ground-truth indices by image, keeping input order within an image.
pub fn group_by_image(ground_truths: &[&GroundTruth]) -> HashMap<u64, Vec<usize>> {
    let mut groups: HashMap<u64, Vec<usize>> = HashMap::new();
    for (idx, gt) in ground_truths.iter().enumerate() {
        groups.entry(gt.image_id).or_default().push(idx);
    }
    groups
}

/// Prediction indices sorted by descending score. Equal scores keep their
/// input order.
pub fn rank_by_score(predictions: &[&Detection]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..predictions.len()).collect();
    order.sort_by(|&a, &b| predictions[b].score.total_cmp(&predictions[a].score));
    order
}

/// Match the predictions of one class to the ground truths of that class.
///
/// Predictions are visited from highest to lowest score. Each one takes the
/// candidate ground truth of the same image with the largest IoU (the first
/// one wins ties) and becomes a true positive when that IoU reaches
/// `iou_threshold` and the box is still unclaimed. Everything else is a
/// false positive, so only the highest-scoring match of a box counts.
///
/// Claimed flags live in a local arena indexed like `ground_truths`; the
/// inputs are never modified.
///
/// # Returns
///
/// One [`Match`] per prediction, in descending score order.
pub fn match_detections(
    predictions: &[&Detection],
    ground_truths: &[&GroundTruth],
    iou_threshold: f64,
    policy: MatchPolicy,
) -> Vec<Match> {
    let by_image = group_by_image(ground_truths);
    let claimed = vec![false; ground_truths.len()];

    let (matches, _) = rank_by_score(predictions).into_iter().fold(
        (Vec::with_capacity(predictions.len()), claimed),
        |(mut matches, mut claimed), pred_idx| {
            let pred = predictions[pred_idx];
            let candidates = by_image.get(&pred.image_id).map_or(&[][..], Vec::as_slice);

            let mut best: Option<(usize, f64)> = None;
            for &gt_idx in candidates {
                if policy == MatchPolicy::BestUnmatched && claimed[gt_idx] {
                    continue;
                }
                let iou = calculate_iou(&pred.bbox, &ground_truths[gt_idx].bbox);
                if best.map_or(true, |(_, best_iou)| iou > best_iou) {
                    best = Some((gt_idx, iou));
                }
            }

            let claim = best.filter(|&(gt_idx, iou)| iou >= iou_threshold && !claimed[gt_idx]);
            if let Some((gt_idx, _)) = claim {
                claimed[gt_idx] = true;
            }

            matches.push(Match {
                prediction_index: pred_idx,
                ground_truth_index: claim.map(|(gt_idx, _)| gt_idx),
                iou: best.map_or(0.0, |(_, iou)| iou),
                is_true_positive: claim.is_some(),
                score: pred.score,
            });
            (matches, claimed)
        },
    );

    matches
}
