//! Majority-vote blur classification
//!
//! Each metric casts one "poor quality" vote when its score falls below its
//! threshold. A frame is flagged as extremely blurry when at least two of the
//! three metrics agree, so one fooled detector cannot decide the verdict alone.

use serde::{Deserialize, Serialize};

use crate::config::BlurThresholds;

/// Raw scores from the three metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    pub edge: f64,
    pub wavelet: f64,
    pub laplacian: f64,
}

/// Verdict plus the scores that produced it.
///
/// Serializes with the field names downstream consumers already parse:
/// `isPoor`, `cpbd_score`, `wavelet_score`, `laplacian_score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlurAssessment {
    #[serde(rename = "isPoor")]
    pub is_poor: bool,
    #[serde(rename = "cpbd_score")]
    pub edge_score: f64,
    pub wavelet_score: f64,
    pub laplacian_score: f64,
}

impl BlurAssessment {
    /// Result for a frame that could not be assessed: not flagged, all scores 0
    pub fn unassessed() -> Self {
        Self {
            is_poor: false,
            edge_score: 0.0,
            wavelet_score: 0.0,
            laplacian_score: 0.0,
        }
    }

    pub fn scores(&self) -> MetricScores {
        MetricScores {
            edge: self.edge_score,
            wavelet: self.wavelet_score,
            laplacian: self.laplacian_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurClassifier {
    thresholds: BlurThresholds,
}

impl BlurClassifier {
    pub fn new(thresholds: BlurThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &BlurThresholds {
        &self.thresholds
    }

    /// Per-metric "poor quality" votes in (edge, wavelet, laplacian) order
    pub fn votes(&self, scores: &MetricScores) -> [bool; 3] {
        [
            scores.edge < self.thresholds.edge_score_threshold,
            scores.wavelet < self.thresholds.wavelet_score_threshold,
            scores.laplacian < self.thresholds.variance_threshold,
        ]
    }

    pub fn classify(&self, scores: MetricScores) -> BlurAssessment {
        let poor_votes = self.votes(&scores).iter().filter(|&&vote| vote).count();
        BlurAssessment {
            is_poor: poor_votes >= 2,
            edge_score: scores.edge,
            wavelet_score: scores.wavelet,
            laplacian_score: scores.laplacian,
        }
    }
}

impl Default for BlurClassifier {
    fn default() -> Self {
        Self::new(BlurThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(edge: f64, wavelet: f64, laplacian: f64) -> MetricScores {
        MetricScores { edge, wavelet, laplacian }
    }

    #[test]
    fn test_two_votes_flag_poor() {
        let result = BlurClassifier::default().classify(scores(19.999, 5.0, 50.0));
        assert!(result.is_poor);
        assert_eq!(result.edge_score, 19.999);
        assert_eq!(result.wavelet_score, 5.0);
        assert_eq!(result.laplacian_score, 50.0);
    }

    #[test]
    fn test_single_vote_not_poor() {
        let result = BlurClassifier::default().classify(scores(25.0, 5.0, 50.0));
        assert!(!result.is_poor);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Scores exactly at the thresholds do not vote
        let classifier = BlurClassifier::default();
        assert_eq!(classifier.votes(&scores(20.0, 4.5, 100.0)), [false, false, false]);
        assert!(!classifier.classify(scores(20.0, 4.5, 100.0)).is_poor);
    }

    #[test]
    fn test_vote_combinations() {
        let classifier = BlurClassifier::default();
        assert!(classifier.classify(scores(0.0, 0.0, 0.0)).is_poor);
        assert!(classifier.classify(scores(10.0, 1.0, 500.0)).is_poor);
        assert!(classifier.classify(scores(50.0, 1.0, 5.0)).is_poor);
        assert!(!classifier.classify(scores(50.0, 1.0, 500.0)).is_poor);
        assert!(!classifier.classify(scores(50.0, 10.0, 500.0)).is_poor);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = BlurThresholds {
            variance_threshold: 40.0,
            ..BlurThresholds::default()
        };
        let result = BlurClassifier::new(thresholds).classify(scores(19.0, 5.0, 50.0));
        assert!(!result.is_poor);
    }

    #[test]
    fn test_serialized_field_names() {
        let result = BlurClassifier::default().classify(scores(12.5, 3.0, 80.0));
        let json = serde_json::to_value(result).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert_eq!(object["isPoor"], true);
        assert_eq!(object["cpbd_score"], 12.5);
        assert_eq!(object["wavelet_score"], 3.0);
        assert_eq!(object["laplacian_score"], 80.0);
    }

    #[test]
    fn test_unassessed() {
        let result = BlurAssessment::unassessed();
        assert!(!result.is_poor);
        assert_eq!(result.scores(), MetricScores::default());
    }
}
