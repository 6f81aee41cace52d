//! Landmark windows as sent by the pose-tracking client.
//!
//! A window covers [`SEQUENCE_LENGTH`] consecutive video frames. Each frame
//! holds [`POSE_LANDMARKS`] points of `x, y, z, visibility`, flattened into
//! [`FEATURES_PER_STEP`] values.

use crate::error::RelayError;
use ndarray::Array3;
use serde::Deserialize;

pub const SEQUENCE_LENGTH: usize = 30;
pub const POSE_LANDMARKS: usize = 33;
pub const VALUES_PER_LANDMARK: usize = 4;
pub const FEATURES_PER_STEP: usize = POSE_LANDMARKS * VALUES_PER_LANDMARK;
pub const FRAME_LEN: usize = SEQUENCE_LENGTH * FEATURES_PER_STEP;

/// Wire form of the `landmarks` field: either already flat or one row per step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Landmarks {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

/// A validated window of exactly [`FRAME_LEN`] values.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    values: Vec<f32>,
}

impl LandmarkFrame {
    pub fn new(values: Vec<f32>) -> Result<Self, RelayError> {
        if values.len() != FRAME_LEN {
            return Err(RelayError::ShapeMismatch {
                expected: FRAME_LEN,
                actual: values.len(),
            });
        }
        Ok(Self { values })
    }

    pub fn zeros() -> Self {
        Self {
            values: vec![0.0; FRAME_LEN],
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Reshape into the `[1, SEQUENCE_LENGTH, FEATURES_PER_STEP]` model input.
    pub fn into_tensor(self) -> Result<Array3<f32>, RelayError> {
        let actual = self.values.len();
        Array3::from_shape_vec((1, SEQUENCE_LENGTH, FEATURES_PER_STEP), self.values).map_err(
            |_| RelayError::ShapeMismatch {
                expected: FRAME_LEN,
                actual,
            },
        )
    }
}

impl TryFrom<Landmarks> for LandmarkFrame {
    type Error = RelayError;

    fn try_from(landmarks: Landmarks) -> Result<Self, Self::Error> {
        match landmarks {
            Landmarks::Flat(values) => Self::new(values),
            Landmarks::Nested(rows) => {
                let width = rows.first().map(Vec::len).unwrap_or(0);
                if let Some((step, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
                    return Err(RelayError::InvalidPayload(format!(
                        "ragged landmark rows: row {} has {} values, expected {}",
                        step,
                        row.len(),
                        width
                    )));
                }
                Self::new(rows.into_iter().flatten().collect())
            }
        }
    }
}
