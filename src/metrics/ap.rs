//! Average Precision (AP) and mean Average Precision (mAP) calculation.

/// Replace every precision by the maximum precision at the same or any
/// higher recall.
///
/// `precisions` must be ordered by non-decreasing recall, which is what a
/// cumulative curve over ranked detections produces. The result is
/// non-increasing.
///
/// # Example
///
/// ```
/// use detection_map::metrics::ap::precision_envelope;
///
/// let envelope = precision_envelope(&[1.0, 0.5, 0.667, 0.5]);
/// assert_eq!(envelope, vec![1.0, 0.667, 0.667, 0.5]);
/// ```
pub fn precision_envelope(precisions: &[f64]) -> Vec<f64> {
    let mut envelope = precisions.to_vec();
    for i in (0..envelope.len().saturating_sub(1)).rev() {
        envelope[i] = envelope[i].max(envelope[i + 1]);
    }
    envelope
}

/// Calculate Average Precision (AP) from a precision-recall curve.
///
/// The curve is closed with `(recall 0, precision 1)` in front and
/// `(last recall, precision 0)` at the end, precisions are replaced by their
/// monotonic envelope, and the area under the resulting step function is
/// summed over every point where recall changes:
/// `sum((r_i - r_{i-1}) * envelope_i)`.
///
/// An empty curve has AP 0.
///
/// # Example
///
/// ```
/// use detection_map::metrics::ap::calculate_ap;
///
/// // TP, FP, TP against two ground truths
/// let precisions = vec![1.0, 0.5, 2.0 / 3.0];
/// let recalls = vec![0.5, 0.5, 1.0];
/// let ap = calculate_ap(&precisions, &recalls);
/// assert!((ap - (0.5 + 0.5 * 2.0 / 3.0)).abs() < 1e-12);
/// ```
pub fn calculate_ap(precisions: &[f64], recalls: &[f64]) -> f64 {
    let n = precisions.len().min(recalls.len());
    if n == 0 {
        return 0.0;
    }

    let mut mrec = Vec::with_capacity(n + 2);
    mrec.push(0.0);
    mrec.extend_from_slice(&recalls[..n]);
    mrec.push(recalls[n - 1]);

    let mut mpre = Vec::with_capacity(n + 2);
    mpre.push(1.0);
    mpre.extend_from_slice(&precisions[..n]);
    mpre.push(0.0);

    let envelope = precision_envelope(&mpre);

    (1..mrec.len())
        .filter(|&i| mrec[i] != mrec[i - 1])
        .map(|i| (mrec[i] - mrec[i - 1]) * envelope[i])
        .sum()
}

/// Calculate mean Average Precision (mAP) across classes.
///
/// Plain arithmetic mean, not weighted by instance count. No classes
/// gives 0.
///
/// # Example
///
/// ```
/// use detection_map::metrics::ap::calculate_map;
///
/// let class_aps = vec![0.8, 0.9, 0.75, 0.85];
/// let map = calculate_map(&class_aps);
/// assert!((map - 0.825).abs() < 1e-10);
/// ```
pub fn calculate_map(class_aps: &[f64]) -> f64 {
    if class_aps.is_empty() {
        return 0.0;
    }

    class_aps.iter().sum::<f64>() / class_aps.len() as f64
}
