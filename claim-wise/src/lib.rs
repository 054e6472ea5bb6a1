pub mod claim;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod history;
pub mod prediction;
pub mod session;
pub mod storage;
pub mod submission;

// Re-export commonly used types
pub use claim::{ClaimField, ClaimInput, FieldBounds};
pub use dashboard::{DEFAULT_REPORT_URL, DashboardSummary};
pub use dataset::{ClaimsTable, PREVIEW_ROWS};
pub use error::{ClaimWiseError, INVALID_CREDENTIALS_MESSAGE, Result};
pub use history::{HISTORY_CAPACITY, HistorySummary, PredictionHistory, PredictionHistoryEntry};
pub use prediction::{
    Cluster, FeatureImportance, FraudProbability, MockPredictionService, PredictionResult,
    PredictionService, RiskFactor, RiskLevel,
};
pub use session::{Credentials, SESSION_FLAG_KEY, SessionGate, View};
pub use storage::{FileFlagStorage, FlagStorage, InMemoryFlagStorage};
pub use submission::{ClaimAnalyzer, DEFAULT_PREDICTION_DELAY, SubmissionState};
