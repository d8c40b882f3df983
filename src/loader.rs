//! JSON loading of detections and ground truths.
//!
//! Two record layouts are accepted, and may be mixed within one array:
//!
//! - rows: `[image_id, class_id, score, a, b, c, d]` for predictions and
//!   `[image_id, class_id, a, b, c, d]` (or the 7-wide row, score ignored)
//!   for ground truths;
//! - objects: `{"image_id": 0, "class_id": 1, "score": 0.9, "bbox": [a, b, c, d]}`.
//!
//! The four box numbers are read in the caller's [`BoxFormat`].

use crate::error::{EvalError, Result};
use crate::types::{BoundingBox, BoxFormat, Detection, GroundTruth};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Row(Vec<f64>),
    Object {
        image_id: u64,
        class_id: u32,
        #[serde(default)]
        score: Option<f64>,
        bbox: [f64; 4],
    },
}

/// Load predictions from a JSON string.
///
/// # Example
///
/// ```
/// use detection_map::loader::load_detections_from_str;
/// use detection_map::types::BoxFormat;
///
/// let json = r#"[[0, 1, 0.9, 10, 10, 50, 50],
///                {"image_id": 1, "class_id": 2, "score": 0.4, "bbox": [0, 0, 5, 5]}]"#;
/// let detections = load_detections_from_str(json, BoxFormat::Corners).unwrap();
/// assert_eq!(detections.len(), 2);
/// assert_eq!(detections[1].class_id, 2);
/// ```
pub fn load_detections_from_str(json_str: &str, format: BoxFormat) -> Result<Vec<Detection>> {
    let records: Vec<RawRecord> = serde_json::from_str(json_str)?;
    to_detections(records, format)
}

/// Load predictions from a JSON file.
pub fn load_detections_from_file<P: AsRef<Path>>(path: P, format: BoxFormat) -> Result<Vec<Detection>> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<RawRecord> = serde_json::from_reader(reader)?;
    to_detections(records, format)
}

/// Load ground truths from a JSON string.
pub fn load_ground_truths_from_str(json_str: &str, format: BoxFormat) -> Result<Vec<GroundTruth>> {
    let records: Vec<RawRecord> = serde_json::from_str(json_str)?;
    to_ground_truths(records, format)
}

/// Load ground truths from a JSON file.
pub fn load_ground_truths_from_file<P: AsRef<Path>>(
    path: P,
    format: BoxFormat,
) -> Result<Vec<GroundTruth>> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<RawRecord> = serde_json::from_reader(reader)?;
    to_ground_truths(records, format)
}

fn to_detections(records: Vec<RawRecord>, format: BoxFormat) -> Result<Vec<Detection>> {
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| match record {
            RawRecord::Row(row) => {
                if row.len() != 7 {
                    return Err(EvalError::invalid(format!(
                        "prediction {idx}: expected 7 values, got {}",
                        row.len()
                    )));
                }
                Ok(Detection::new(
                    parse_id(row[0], "image_id", idx)?,
                    parse_class(row[1], idx)?,
                    row[2],
                    BoundingBox::from_format([row[3], row[4], row[5], row[6]], format),
                ))
            }
            RawRecord::Object {
                image_id,
                class_id,
                score,
                bbox,
            } => {
                let score = score.ok_or_else(|| {
                    EvalError::invalid(format!("prediction {idx}: missing score"))
                })?;
                Ok(Detection::new(
                    image_id,
                    class_id,
                    score,
                    BoundingBox::from_format(bbox, format),
                ))
            }
        })
        .collect()
}

fn to_ground_truths(records: Vec<RawRecord>, format: BoxFormat) -> Result<Vec<GroundTruth>> {
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| match record {
            RawRecord::Row(row) => {
                let coords = match row.len() {
                    6 => [row[2], row[3], row[4], row[5]],
                    7 => [row[3], row[4], row[5], row[6]],
                    n => {
                        return Err(EvalError::invalid(format!(
                            "ground truth {idx}: expected 6 or 7 values, got {n}"
                        )))
                    }
                };
                Ok(GroundTruth::new(
                    parse_id(row[0], "image_id", idx)?,
                    parse_class(row[1], idx)?,
                    BoundingBox::from_format(coords, format),
                ))
            }
            RawRecord::Object {
                image_id,
                class_id,
                bbox,
                ..
            } => Ok(GroundTruth::new(
                image_id,
                class_id,
                BoundingBox::from_format(bbox, format),
            )),
        })
        .collect()
}

fn parse_id(value: f64, field: &str, idx: usize) -> Result<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(EvalError::invalid(format!(
            "record {idx}: {field} must be a non-negative integer, got {value}"
        )))
    }
}

fn parse_class(value: f64, idx: usize) -> Result<u32> {
    let id = parse_id(value, "class_id", idx)?;
    u32::try_from(id)
        .map_err(|_| EvalError::invalid(format!("record {idx}: class_id {id} out of range")))
}
