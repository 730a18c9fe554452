use crate::domain::errors::ModelError;

/// Arg-max label of a classifier output with its confidence as a percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: String,
    /// Percentage in `[0, 100]`.
    pub confidence: f64,
}

impl ClassificationResult {
    /// Picks the most probable class.
    ///
    /// Scores that are not already a probability distribution (raw logits) are
    /// passed through a softmax first, so confidence always lands in `[0, 100]`.
    pub fn from_scores(scores: &[f32], labels: &[String]) -> Result<Self, ModelError> {
        if scores.is_empty() {
            return Err(ModelError::Inference {
                reason: "Model returned an empty output".to_string(),
            });
        }
        if scores.len() != labels.len() {
            return Err(ModelError::Inference {
                reason: format!(
                    "Model produced {} scores for {} labels",
                    scores.len(),
                    labels.len()
                ),
            });
        }
        if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
            return Err(ModelError::Inference {
                reason: format!("Model produced a non-finite score ({bad})"),
            });
        }

        let probabilities = to_distribution(scores);
        let (index, probability) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| ModelError::Inference {
                reason: "No prediction returned".to_string(),
            })?;
        if !probability.is_finite() {
            return Err(ModelError::Inference {
                reason: "Model output did not normalize to a probability".to_string(),
            });
        }

        Ok(Self {
            label: labels[index].clone(),
            confidence: f64::from(probability) * 100.0,
        })
    }

    /// Confidence as a probability in `[0, 1]`.
    pub fn probability(&self) -> f64 {
        self.confidence / 100.0
    }
}

fn to_distribution(scores: &[f32]) -> Vec<f32> {
    let is_distribution = scores.iter().all(|s| (0.0..=1.0).contains(s))
        && (scores.iter().sum::<f32>() - 1.0).abs() < 1e-3;
    if is_distribution {
        return scores.to_vec();
    }
    softmax(scores)
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
