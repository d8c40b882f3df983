//! Core data types for detections, ground truths and evaluation results.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coordinate layout of the four numbers describing a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxFormat {
    /// `(x_min, y_min, x_max, y_max)`
    #[default]
    Corners,
    /// `(cx, cy, width, height)`
    Center,
}

/// An axis-aligned bounding box, always stored in corner form.
///
/// The constructors do not reject malformed boxes (`x_min > x_max`,
/// non-finite coordinates); [`BoundingBox::validate`] reports them and the
/// evaluator calls it on every input box before doing any work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Create a bounding box from corner coordinates.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Create a bounding box from its center, width and height.
    ///
    /// # Example
    ///
    /// ```
    /// use detection_map::types::BoundingBox;
    ///
    /// let bbox = BoundingBox::from_center(5.0, 5.0, 10.0, 4.0);
    /// assert_eq!(bbox, BoundingBox::new(0.0, 3.0, 10.0, 7.0));
    /// ```
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    /// Create a bounding box from four coordinates laid out as `format`.
    pub fn from_format(coords: [f64; 4], format: BoxFormat) -> Self {
        let [a, b, c, d] = coords;
        match format {
            BoxFormat::Corners => Self::new(a, b, c, d),
            BoxFormat::Center => Self::from_center(a, b, c, d),
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Get the area of the bounding box. Zero for degenerate boxes.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check that all coordinates are finite and the corners are ordered.
    ///
    /// Zero-area boxes are valid.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Like [`BoundingBox::is_valid`], with a descriptive error.
    pub fn validate(&self) -> Result<()> {
        let coords = [self.x_min, self.y_min, self.x_max, self.y_max];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(EvalError::invalid(format!(
                "bounding box has non-finite coordinates: {coords:?}"
            )));
        }
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(EvalError::invalid(format!(
                "bounding box corners are out of order: {coords:?}"
            )));
        }
        Ok(())
    }
}

/// A single predicted box produced by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub image_id: u64,
    pub class_id: u32,
    /// Confidence score in `[0, 1]`
    pub score: f64,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(image_id: u64, class_id: u32, score: f64, bbox: BoundingBox) -> Self {
        Self {
            image_id,
            class_id,
            score,
            bbox,
        }
    }
}

/// A single annotated box from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub image_id: u64,
    pub class_id: u32,
    pub bbox: BoundingBox,
}

impl GroundTruth {
    pub fn new(image_id: u64, class_id: u32, bbox: BoundingBox) -> Self {
        Self {
            image_id,
            class_id,
            bbox,
        }
    }
}

/// Precision-recall curve and average precision for one class.
///
/// `precisions[k]` and `recalls[k]` describe the curve after the `k`-th
/// prediction of the class, in descending confidence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class_id: u32,
    pub precisions: Vec<f64>,
    pub recalls: Vec<f64>,
    pub average_precision: f64,
    pub num_ground_truths: usize,
    pub num_detections: usize,
    pub true_positives: usize,
    pub false_positives: usize,
}

impl ClassMetrics {
    /// Metrics of a class that was evaluated without any prediction to score.
    pub fn empty(class_id: u32, num_ground_truths: usize) -> Self {
        Self {
            class_id,
            num_ground_truths,
            ..Self::default()
        }
    }
}

/// Output of one evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Metrics keyed by class id, in ascending class order
    pub per_class: BTreeMap<u32, ClassMetrics>,
    /// Mean Average Precision over the averaged classes
    pub map: f64,
}

impl EvaluationResult {
    /// Average precision of `class_id`, if that class was evaluated.
    pub fn class_ap(&self, class_id: u32) -> Option<f64> {
        self.per_class.get(&class_id).map(|m| m.average_precision)
    }

    /// `(class_id, AP)` pairs in ascending class order.
    pub fn ap_per_class(&self) -> Vec<(u32, f64)> {
        self.per_class
            .iter()
            .map(|(&id, m)| (id, m.average_precision))
            .collect()
    }

    /// Serialize the result as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
