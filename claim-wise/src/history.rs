use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::claim::ClaimInput;
use crate::prediction::{FraudProbability, PredictionResult, RiskLevel};

/// Maximum number of entries kept in a history.
pub const HISTORY_CAPACITY: usize = 10;

/// A prediction together with the claim that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionHistoryEntry {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub input: ClaimInput,
}

/// Most-recent-first list of predictions, oldest dropped past capacity.
#[derive(Debug, Clone)]
pub struct PredictionHistory {
    entries: VecDeque<PredictionHistoryEntry>,
    capacity: usize,
}

impl PredictionHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, result: PredictionResult, input: ClaimInput) {
        self.entries
            .push_front(PredictionHistoryEntry { result, input });
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&PredictionHistoryEntry> {
        self.entries.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &PredictionHistoryEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> Vec<PredictionHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary::from_probabilities(self.iter().map(|e| e.result.fraud_probability))
    }
}

impl Default for PredictionHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Stat cards shown above the history table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_claims: usize,
    pub average_fraud_probability: FraudProbability,
    pub high_risk_claims: usize,
    pub safe_claims: usize,
}

impl HistorySummary {
    pub fn from_probabilities(probabilities: impl IntoIterator<Item = FraudProbability>) -> Self {
        let mut total_claims = 0usize;
        let mut sum_hundredths = 0u64;
        let mut high_risk_claims = 0usize;
        let mut safe_claims = 0usize;

        for probability in probabilities {
            total_claims += 1;
            sum_hundredths += u64::from(probability.hundredths());
            match probability.risk_level() {
                RiskLevel::High => high_risk_claims += 1,
                RiskLevel::Low => safe_claims += 1,
                RiskLevel::Medium => {}
            }
        }

        let average_fraud_probability = if total_claims == 0 {
            FraudProbability::from_hundredths(0)
        } else {
            FraudProbability::from_percent(sum_hundredths as f64 / total_claims as f64 / 100.0)
        };

        Self {
            total_claims,
            average_fraud_probability,
            high_risk_claims,
            safe_claims,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::MockPredictionService;

    fn result_with(service: &MockPredictionService, claim_id: &str) -> PredictionResult {
        let mut result = service.generate(&ClaimInput::default());
        result.claim_id = claim_id.to_string();
        result
    }

    #[test]
    fn keeps_ten_most_recent_newest_first() {
        let service = MockPredictionService::seeded(9);
        let mut history = PredictionHistory::new();

        for i in 0..11 {
            let input = ClaimInput {
                age: f64::from(i),
                ..ClaimInput::default()
            };
            history.record(result_with(&service, &format!("CLAIM-{i}")), input);
            assert!(history.len() <= HISTORY_CAPACITY);
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        let ids: Vec<&str> = history.iter().map(|e| e.result.claim_id.as_str()).collect();
        let expected: Vec<String> = (1..11).rev().map(|i| format!("CLAIM-{i}")).collect();
        assert_eq!(ids, expected);
        assert!(!ids.contains(&"CLAIM-0"));
        assert_eq!(history.latest().unwrap().input.age, 10.0);
    }

    #[test]
    fn entry_keeps_its_own_input_snapshot() {
        let service = MockPredictionService::seeded(2);
        let mut history = PredictionHistory::new();
        let mut input = ClaimInput::default();

        history.record(service.generate(&input), input);
        input.witnesses = 0.0;
        history.record(service.generate(&input), input);

        let witnesses: Vec<f64> = history.iter().map(|e| e.input.witnesses).collect();
        assert_eq!(witnesses, vec![0.0, 2.0]);
    }

    #[test]
    fn summary_counts_risk_bands() {
        let summary = HistorySummary::from_probabilities(
            [80.0, 70.0, 50.0, 29.99, 10.0].map(FraudProbability::from_percent),
        );

        assert_eq!(summary.total_claims, 5);
        assert_eq!(summary.high_risk_claims, 2);
        assert_eq!(summary.safe_claims, 2);
        assert_eq!(summary.average_fraud_probability.to_string(), "48.00");
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = PredictionHistory::new().summary();
        assert_eq!(summary.total_claims, 0);
        assert_eq!(summary.average_fraud_probability.to_string(), "0.00");
    }
}
