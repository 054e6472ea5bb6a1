use serde::{Deserialize, Serialize};

/// Published report rendered next to the dashboard figures.
pub const DEFAULT_REPORT_URL: &str = "https://app.powerbi.com/reportEmbed?reportId=ec748ac8-7e2d-4909-85d3-22f5a64d36bf&autoAuth=true&ctid=23035d1f-133c-44b5-b2ad-b3aef17baaa1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyIndicator {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub detail: String,
}

/// Fixed figures from the historical claims analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_claims: u32,
    pub fraud_rate_percent: f64,
    pub key_indicators: Vec<KeyIndicator>,
    pub insights: Vec<Insight>,
    pub report_url: String,
}

impl DashboardSummary {
    pub fn new(report_url: impl Into<String>) -> Self {
        Self {
            total_claims: 1000,
            fraud_rate_percent: 24.7,
            key_indicators: vec![
                indicator("Average Fraudulent Claim", "$60.3K"),
                indicator("Average Non-Fraudulent Claim", "$50.3K"),
                indicator("Total Claim Value", "$52.8M"),
                indicator("High School Education Claims", "$8.4M"),
            ],
            insights: vec![
                insight(
                    "Claim Distribution",
                    "Vehicle claims account for the highest share ($37.9M), while injury and property claims are lower ($7.4M each).",
                ),
                insight(
                    "Demographic Insights",
                    "Highest fraud rates among the 35-44 age group; fraud is more prevalent among men (537 cases) than women (463 cases).",
                ),
                insight(
                    "Geographic Patterns",
                    "Illinois, Indiana and Ohio have the highest claim amounts ($16M-$18M each), with Ohio having the most claims (352).",
                ),
                insight(
                    "Fraud by Claim Type",
                    "Most frauds occur in multi-vehicle collisions and single vehicle crashes; parked vehicle and theft cases show lower fraud rates.",
                ),
                insight(
                    "Temporal Patterns",
                    "Incidents peak in the early morning (1 AM) and evening (8 PM), with days 1 and 20 of the month showing the highest accident rates.",
                ),
            ],
            report_url: report_url.into(),
        }
    }
}

impl Default for DashboardSummary {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_URL)
    }
}

fn indicator(title: &str, value: &str) -> KeyIndicator {
    KeyIndicator {
        title: title.to_string(),
        value: value.to_string(),
    }
}

fn insight(title: &str, detail: &str) -> Insight {
    Insight {
        title: title.to_string(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headline_figures_are_fixed() {
        let summary = DashboardSummary::default();
        assert_eq!(summary.total_claims, 1000);
        assert_eq!(summary.fraud_rate_percent, 24.7);

        let indicators: Vec<(&str, &str)> = summary
            .key_indicators
            .iter()
            .map(|i| (i.title.as_str(), i.value.as_str()))
            .collect();
        assert_eq!(
            indicators,
            [
                ("Average Fraudulent Claim", "$60.3K"),
                ("Average Non-Fraudulent Claim", "$50.3K"),
                ("Total Claim Value", "$52.8M"),
                ("High School Education Claims", "$8.4M"),
            ]
        );

        let insights: Vec<&str> = summary.insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            insights,
            [
                "Claim Distribution",
                "Demographic Insights",
                "Geographic Patterns",
                "Fraud by Claim Type",
                "Temporal Patterns",
            ]
        );
    }

    #[test]
    fn report_url_can_be_overridden() {
        assert_eq!(DashboardSummary::default().report_url, DEFAULT_REPORT_URL);

        let custom = DashboardSummary::new("https://example.test/report");
        assert_eq!(custom.report_url, "https://example.test/report");
        assert_eq!(custom.key_indicators, DashboardSummary::default().key_indicators);
    }

    #[test]
    fn serializes_fraud_rate_as_number() {
        let value = serde_json::to_value(DashboardSummary::default()).unwrap();
        assert_eq!(value["fraud_rate_percent"], 24.7);
        assert_eq!(value["key_indicators"][2]["value"], "$52.8M");
    }
}
