use crate::{error::RelayError, gesture::GestureLabel};
use ndarray::Array2;

/// Class scores for one landmark window, one per [`GestureLabel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    scores: [f32; GestureLabel::COUNT],
}

impl PredictionResult {
    pub fn from_scores(scores: [f32; GestureLabel::COUNT]) -> Self {
        Self { scores }
    }

    /// Accepts the raw `[1, COUNT]` model output.
    pub fn from_output(output: &Array2<f32>) -> Result<Self, RelayError> {
        if output.shape() != [1, GestureLabel::COUNT] {
            return Err(RelayError::ModelFailure(format!(
                "unexpected output shape {:?}, expected [1, {}]",
                output.shape(),
                GestureLabel::COUNT
            )));
        }

        let mut scores = [0.0f32; GestureLabel::COUNT];
        for (slot, &score) in scores.iter_mut().zip(output.row(0).iter()) {
            *slot = score;
        }
        Ok(Self { scores })
    }

    pub fn scores(&self) -> &[f32; GestureLabel::COUNT] {
        &self.scores
    }

    /// Index of the highest score. Ties go to the lowest index and NaN never wins.
    pub fn argmax(&self) -> usize {
        let mut max_score = f32::NEG_INFINITY;
        let mut max_idx = 0usize;
        for (i, &score) in self.scores.iter().enumerate() {
            if score > max_score {
                max_score = score;
                max_idx = i;
            }
        }
        max_idx
    }

    pub fn label(&self) -> Result<GestureLabel, RelayError> {
        let idx = self.argmax();
        GestureLabel::from_index(idx)
            .ok_or_else(|| RelayError::ModelFailure(format!("class index {} out of range", idx)))
    }

    pub fn confidence(&self) -> f32 {
        self.scores[self.argmax()]
    }

    /// Scores in the batch layout clients expect: `[[s0, s1, s2, s3]]`.
    pub fn as_batch(&self) -> Vec<Vec<f32>> {
        vec![self.scores.to_vec()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_picks_highest_score() {
        let prediction = PredictionResult::from_scores([0.1, 0.2, 0.6, 0.1]);

        assert_eq!(prediction.argmax(), 2);
        assert_eq!(prediction.label().unwrap(), GestureLabel::Hello);
        assert_eq!(prediction.confidence(), 0.6);
    }

    #[test]
    fn test_ties_go_to_first_occurrence() {
        let prediction = PredictionResult::from_scores([0.25, 0.25, 0.25, 0.25]);
        assert_eq!(prediction.argmax(), 0, "Uniform scores should resolve to index 0");

        let prediction = PredictionResult::from_scores([0.1, 0.4, 0.1, 0.4]);
        assert_eq!(prediction.label().unwrap(), GestureLabel::IMe);
    }

    #[test]
    fn test_nan_never_wins() {
        let prediction = PredictionResult::from_scores([f32::NAN, 0.1, f32::NAN, 0.05]);
        assert_eq!(prediction.argmax(), 1);

        let all_nan = PredictionResult::from_scores([f32::NAN; 4]);
        assert_eq!(all_nan.argmax(), 0);
        assert_eq!(all_nan.label().unwrap(), GestureLabel::Name);
    }

    #[test]
    fn test_negative_scores() {
        let prediction = PredictionResult::from_scores([-3.0, -1.0, -2.0, -5.0]);
        assert_eq!(prediction.label().unwrap(), GestureLabel::IMe);
        assert_eq!(prediction.confidence(), -1.0);
    }

    #[test]
    fn test_confidence_matches_batch_entry() {
        let prediction = PredictionResult::from_scores([0.05, 0.15, 0.3, 0.5]);
        let batch = prediction.as_batch();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].len(), GestureLabel::COUNT);
        assert_eq!(prediction.confidence(), batch[0][prediction.argmax()]);
    }

    #[test]
    fn test_from_output_checks_shape() {
        let output = Array2::from_shape_vec((1, 4), vec![0.1, 0.7, 0.1, 0.1]).unwrap();
        let prediction = PredictionResult::from_output(&output).unwrap();
        assert_eq!(prediction.scores(), &[0.1, 0.7, 0.1, 0.1]);

        let too_wide = Array2::<f32>::zeros((1, 5));
        let err = PredictionResult::from_output(&too_wide).unwrap_err();
        assert_eq!(err.kind(), "model_failure");

        let batched = Array2::<f32>::zeros((2, 4));
        assert!(PredictionResult::from_output(&batched).is_err());
    }
}
