//! Evaluation settings.

use crate::error::{EvalError, Result};
use crate::types::BoxFormat;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Which classes contribute to the mean in mAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassAveraging {
    /// Every class in `1..num_classes`; a class without ground truth adds 0.
    #[default]
    AllClasses,
    /// Only classes with at least one ground-truth box.
    PresentClasses,
}

/// Which ground truths a prediction competes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Best IoU over all ground truths of the image. If that box is already
    /// claimed the prediction is a false positive (PASCAL VOC).
    #[default]
    BestOverall,
    /// Best IoU over the ground truths of the image that are still unclaimed
    /// (COCO-style greedy matching).
    BestUnmatched,
}

/// Parameters of one evaluation run.
///
/// # Example
///
/// ```
/// use detection_map::config::{ClassAveraging, EvaluationConfig};
///
/// let config = EvaluationConfig::new(3)
///     .with_iou_threshold(0.75)
///     .with_class_averaging(ClassAveraging::PresentClasses);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Minimum IoU for a match, in `(0, 1]`
    pub iou_threshold: f64,
    /// Layout of raw coordinates handed to the loader
    pub box_format: BoxFormat,
    /// Number of classes including background class 0
    pub num_classes: u32,
    pub class_averaging: ClassAveraging,
    pub match_policy: MatchPolicy,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.5,
            box_format: BoxFormat::Corners,
            num_classes: 2,
            class_averaging: ClassAveraging::AllClasses,
            match_policy: MatchPolicy::BestOverall,
        }
    }
}

impl EvaluationConfig {
    /// Default settings for `num_classes` classes (background included).
    pub fn new(num_classes: u32) -> Self {
        Self {
            num_classes,
            ..Self::default()
        }
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f64) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn with_box_format(mut self, box_format: BoxFormat) -> Self {
        self.box_format = box_format;
        self
    }

    pub fn with_class_averaging(mut self, class_averaging: ClassAveraging) -> Self {
        self.class_averaging = class_averaging;
        self
    }

    pub fn with_match_policy(mut self, match_policy: MatchPolicy) -> Self {
        self.match_policy = match_policy;
        self
    }

    /// Classes that are scored: `1..num_classes`.
    pub fn scored_classes(&self) -> std::ops::Range<u32> {
        1..self.num_classes
    }

    /// Check the IoU threshold and class count.
    pub fn validate(&self) -> Result<()> {
        if !(self.iou_threshold > 0.0 && self.iou_threshold <= 1.0) {
            return Err(EvalError::invalid(format!(
                "IoU threshold must be in (0, 1], got {}",
                self.iou_threshold
            )));
        }
        if self.num_classes < 1 {
            return Err(EvalError::invalid("num_classes must be at least 1"));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON. Missing fields take
    /// their default values.
    ///
    /// ```
    /// use detection_map::config::{EvaluationConfig, MatchPolicy};
    ///
    /// let config = EvaluationConfig::from_json_str(
    ///     r#"{"num_classes": 3, "match_policy": "best_unmatched"}"#,
    /// ).unwrap();
    /// assert_eq!(config.num_classes, 3);
    /// assert_eq!(config.iou_threshold, 0.5);
    /// assert_eq!(config.match_policy, MatchPolicy::BestUnmatched);
    /// ```
    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
