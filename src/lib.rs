//! # detection-map
//!
//! Mean Average Precision (mAP) evaluation for object detection.
//!
//! Given predicted boxes (image, class, score, coordinates) and ground-truth
//! boxes (image, class, coordinates), the library computes per-class
//! precision/recall curves, per-class Average Precision and their mean:
//!
//! - **IoU** between corner-form boxes (center-form input is converted)
//! - **Greedy matching**: highest score claims a ground-truth box first
//! - **Precision/recall** accumulated over the ranked predictions
//! - **AP** as the area under the monotonic precision envelope
//! - **mAP** as the plain mean over classes `1..num_classes`
//!
//! Class 0 is background and is never scored. The engine is pure: inputs are
//! borrowed, nothing is cached between calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use detection_map::{evaluate, BoundingBox, Detection, EvaluationConfig, GroundTruth};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ground_truths = vec![GroundTruth::new(0, 1, BoundingBox::new(0.0, 0.0, 10.0, 10.0))];
//! let predictions = vec![
//!     Detection::new(0, 1, 0.9, BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
//!     Detection::new(0, 1, 0.3, BoundingBox::new(40.0, 40.0, 50.0, 50.0)),
//! ];
//!
//! let result = evaluate(&predictions, &ground_truths, &EvaluationConfig::new(2))?;
//! println!("mAP: {:.4}", result.map);
//! assert_eq!(result.per_class[&1].recalls, vec![1.0, 1.0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `parallel`: evaluate classes on the rayon thread pool. Results are
//!   identical to the sequential path.

pub mod error;
pub mod types;
pub mod config;
pub mod loader;
pub mod threshold;
pub mod metrics;
pub mod matching;
pub mod evaluator;

// Re-export commonly used types and functions
pub use config::{ClassAveraging, EvaluationConfig, MatchPolicy};
pub use error::{EvalError, Result};
pub use evaluator::{evaluate, evaluate_with};
pub use loader::{
    load_detections_from_file, load_detections_from_str, load_ground_truths_from_file,
    load_ground_truths_from_str,
};
pub use threshold::{filter_by_confidence, generate_threshold_range, map_at_iou_thresholds};
pub use types::{
    BoundingBox, BoxFormat, ClassMetrics, Detection, EvaluationResult, GroundTruth,
};
