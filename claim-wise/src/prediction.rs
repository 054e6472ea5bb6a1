use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::claim::{ClaimField, ClaimInput};
use crate::error::Result;

/// Number of ranked features kept in a prediction.
pub const TOP_FEATURES: usize = 5;

/// Probability above which the "high claim amount" flag is raised, in hundredths.
const HIGH_CLAIM_THRESHOLD: u32 = 30_00;

/// One of the four fixed customer segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cluster(u8);

impl Cluster {
    pub const ALL: [Cluster; 4] = [Cluster(0), Cluster(1), Cluster(2), Cluster(3)];

    pub fn id(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A percentage in `[0, 100]` held in hundredths, so it always has exactly two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "f64", from = "f64")]
pub struct FraudProbability(u32);

impl FraudProbability {
    pub const MAX_HUNDREDTHS: u32 = 100_00;

    pub fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths.min(Self::MAX_HUNDREDTHS))
    }

    /// Round a percentage to two decimals, clamping into `[0, 100]`.
    pub fn from_percent(percent: f64) -> Self {
        let hundredths = (percent * 100.0).round().clamp(0.0, Self::MAX_HUNDREDTHS as f64);
        Self(hundredths as u32)
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }

    pub fn percent(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_probability(*self)
    }
}

impl From<f64> for FraudProbability {
    fn from(percent: f64) -> Self {
        Self::from_percent(percent)
    }
}

impl From<FraudProbability> for f64 {
    fn from(probability: FraudProbability) -> Self {
        probability.percent()
    }
}

impl fmt::Display for FraudProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_probability(probability: FraudProbability) -> Self {
        match probability.hundredths() {
            p if p >= 70_00 => RiskLevel::High,
            p if p >= 30_00 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

/// Heuristic flags raised against a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "high claim amount")]
    HighClaimAmount,
    #[serde(rename = "night-hours incident")]
    NightHoursIncident,
    #[serde(rename = "multiple vehicles")]
    MultipleVehicles,
    #[serde(rename = "no witnesses")]
    NoWitnesses,
}

impl RiskFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::HighClaimAmount => "high claim amount",
            RiskFactor::NightHoursIncident => "night-hours incident",
            RiskFactor::MultipleVehicles => "multiple vehicles",
            RiskFactor::NoWitnesses => "no witnesses",
        }
    }

    /// Longer wording used on the result card.
    pub fn description(&self) -> &'static str {
        match self {
            RiskFactor::HighClaimAmount => "High claim amount",
            RiskFactor::NightHoursIncident => "Incident occurred during night hours",
            RiskFactor::MultipleVehicles => "Multiple vehicles involved",
            RiskFactor::NoWitnesses => "No witnesses present",
        }
    }

    /// Apply the fixed threshold rules. Only the first rule depends on the drawn probability.
    pub fn evaluate(input: &ClaimInput, probability: FraudProbability) -> Vec<RiskFactor> {
        let mut factors = Vec::new();
        if probability.hundredths() > HIGH_CLAIM_THRESHOLD {
            factors.push(RiskFactor::HighClaimAmount);
        }
        let hour = input.incident_hour_of_the_day;
        if hour >= 22.0 || hour <= 5.0 {
            factors.push(RiskFactor::NightHoursIncident);
        }
        if input.number_of_vehicles_involved > 2.0 {
            factors.push(RiskFactor::MultipleVehicles);
        }
        if input.witnesses < 1.0 {
            factors.push(RiskFactor::NoWitnesses);
        }
        factors
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: ClaimField,
    /// In `[0, 1)`, four decimals.
    pub importance: f64,
}

/// Output of a prediction run. Generated, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub claim_id: String,
    pub cluster: Cluster,
    /// Percentage with one decimal in `[85, 95)`.
    pub cluster_confidence: f64,
    pub fraud_probability: FraudProbability,
    pub risk_level: RiskLevel,
    pub feature_importance: Vec<FeatureImportance>,
    pub risk_factors: Vec<RiskFactor>,
    pub predicted_at: DateTime<Utc>,
}

/// Capability that turns a claim into a prediction.
///
/// Views only talk to this trait, so a real model can replace the mock.
#[async_trait]
pub trait PredictionService: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn predict(&self, input: &ClaimInput) -> Result<PredictionResult>;
}

/// Fabricates predictions from random draws and a few threshold rules.
pub struct MockPredictionService {
    rng: Mutex<StdRng>,
}

impl MockPredictionService {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible draws for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn generate(&self, input: &ClaimInput) -> PredictionResult {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        generate_prediction(input, &mut *rng, Utc::now())
    }
}

impl Default for MockPredictionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionService for MockPredictionService {
    async fn predict(&self, input: &ClaimInput) -> Result<PredictionResult> {
        Ok(self.generate(input))
    }
}

/// Draw a fabricated prediction for `input` from `rng`.
pub fn generate_prediction<R: Rng + ?Sized>(
    input: &ClaimInput,
    rng: &mut R,
    predicted_at: DateTime<Utc>,
) -> PredictionResult {
    let cluster = Cluster::ALL[rng.random_range(0..Cluster::ALL.len())];
    let fraud_probability =
        FraudProbability::from_hundredths(rng.random_range(0..=FraudProbability::MAX_HUNDREDTHS));

    let mut feature_importance: Vec<FeatureImportance> = input
        .fields()
        .map(|(feature, _)| FeatureImportance {
            feature,
            importance: round_to(rng.random::<f64>(), 4),
        })
        .collect();
    feature_importance.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    feature_importance.truncate(TOP_FEATURES);

    let risk_factors = RiskFactor::evaluate(input, fraud_probability);
    let cluster_confidence = round_to(85.0 + rng.random::<f64>() * 10.0, 1).min(94.9);
    let claim_id = format!("CLAIM-{}", rng.random_range(0..1_000_000u32));

    PredictionResult {
        claim_id,
        cluster,
        cluster_confidence,
        fraud_probability,
        risk_level: fraud_probability.risk_level(),
        feature_importance,
        risk_factors,
        predicted_at,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim_with(hour: f64, witnesses: f64, vehicles: f64) -> ClaimInput {
        ClaimInput {
            incident_hour_of_the_day: hour,
            witnesses,
            number_of_vehicles_involved: vehicles,
            ..ClaimInput::default()
        }
    }

    #[test]
    fn probability_has_two_decimals_and_stays_in_range() {
        let service = MockPredictionService::seeded(7);
        for _ in 0..500 {
            let result = service.generate(&ClaimInput::default());
            let percent = result.fraud_probability.percent();
            assert!((0.0..=100.0).contains(&percent));

            let rendered = result.fraud_probability.to_string();
            let decimals = rendered.split('.').nth(1).unwrap();
            assert_eq!(decimals.len(), 2, "{rendered}");
            assert_eq!(result.risk_level, result.fraud_probability.risk_level());
        }
    }

    #[test]
    fn feature_importance_is_top_five_descending() {
        let service = MockPredictionService::seeded(11);
        for _ in 0..200 {
            let result = service.generate(&ClaimInput::default());
            assert!(result.feature_importance.len() <= TOP_FEATURES);
            assert!(
                result
                    .feature_importance
                    .windows(2)
                    .all(|pair| pair[0].importance >= pair[1].importance)
            );
            assert!(
                result
                    .feature_importance
                    .iter()
                    .all(|f| (0.0..=1.0).contains(&f.importance))
            );
        }
    }

    #[test]
    fn night_hours_flag_depends_only_on_hour() {
        let service = MockPredictionService::seeded(3);
        for hour in 0..24 {
            let input = claim_with(f64::from(hour), 2.0, 2.0);
            let expected = matches!(hour, 0..=5 | 22 | 23);
            for _ in 0..20 {
                let result = service.generate(&input);
                assert_eq!(
                    result.risk_factors.contains(&RiskFactor::NightHoursIncident),
                    expected,
                    "hour {hour}"
                );
            }
        }
    }

    #[test]
    fn daytime_claim_with_witnesses_only_varies_on_probability() {
        let service = MockPredictionService::seeded(42);
        let input = claim_with(14.0, 2.0, 2.0);
        for _ in 0..100 {
            let result = service.generate(&input);
            assert!(!result.risk_factors.contains(&RiskFactor::NoWitnesses));
            assert!(!result.risk_factors.contains(&RiskFactor::MultipleVehicles));
            assert!(!result.risk_factors.contains(&RiskFactor::NightHoursIncident));

            let high_claim = result.fraud_probability.hundredths() > 30_00;
            let expected: Vec<RiskFactor> = if high_claim {
                vec![RiskFactor::HighClaimAmount]
            } else {
                Vec::new()
            };
            assert_eq!(result.risk_factors, expected);
        }
    }

    #[test]
    fn threshold_rules_fire_on_raw_input() {
        let input = claim_with(23.0, 0.0, 3.0);
        let factors = RiskFactor::evaluate(&input, FraudProbability::from_percent(30.0));
        assert_eq!(
            factors,
            vec![
                RiskFactor::NightHoursIncident,
                RiskFactor::MultipleVehicles,
                RiskFactor::NoWitnesses,
            ]
        );

        let factors = RiskFactor::evaluate(&input, FraudProbability::from_percent(30.01));
        assert_eq!(factors[0], RiskFactor::HighClaimAmount);
    }

    #[test]
    fn seeded_services_are_reproducible() {
        let now = Utc::now();
        let first = generate_prediction(&ClaimInput::default(), &mut StdRng::seed_from_u64(5), now);
        let second =
            generate_prediction(&ClaimInput::default(), &mut StdRng::seed_from_u64(5), now);
        assert_eq!(first, second);
        assert!(first.claim_id.starts_with("CLAIM-"));
        assert!(Cluster::ALL.contains(&first.cluster));
        assert!((85.0..95.0).contains(&first.cluster_confidence));
    }

    #[test]
    fn risk_levels_follow_probability_bands() {
        assert_eq!(FraudProbability::from_percent(70.0).risk_level(), RiskLevel::High);
        assert_eq!(FraudProbability::from_percent(69.99).risk_level(), RiskLevel::Medium);
        assert_eq!(FraudProbability::from_percent(30.0).risk_level(), RiskLevel::Medium);
        assert_eq!(FraudProbability::from_percent(29.99).risk_level(), RiskLevel::Low);
        assert_eq!(FraudProbability::from_percent(150.0).percent(), 100.0);
        assert_eq!(FraudProbability::from_percent(5.5).to_string(), "5.50");
    }

    #[tokio::test]
    async fn mock_service_never_fails() {
        let service = MockPredictionService::seeded(1);
        let input = ClaimInput {
            age: f64::MAX,
            witnesses: f64::MIN,
            ..ClaimInput::default()
        };
        let result = service.predict(&input).await.unwrap();
        assert!(result.risk_factors.contains(&RiskFactor::NoWitnesses));
    }
}
