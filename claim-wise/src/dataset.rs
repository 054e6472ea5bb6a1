use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{error, info};

use crate::error::{ClaimWiseError, Result};

/// Data rows shown in the claims explorer preview.
pub const PREVIEW_ROWS: usize = 19;

/// Read-only preview of the claims dataset, rows keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimsTable {
    pub headers: Vec<String>,
    pub rows: Vec<BTreeMap<String, String>>,
}

impl ClaimsTable {
    /// Parse comma separated text. Quoting is not supported.
    pub fn parse(text: &str, max_rows: usize) -> Result<Self> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header_line = lines
            .next()
            .ok_or_else(|| ClaimWiseError::DatasetError("missing header row".to_string()))?;
        let headers: Vec<String> = header_line
            .split(',')
            .map(|h| h.trim().to_string())
            .collect();

        let rows = lines
            .take(max_rows)
            .map(|line| {
                let mut values = line.split(',').map(str::trim);
                headers
                    .iter()
                    .map(|header| {
                        let value = values.next().unwrap_or_default();
                        (header.clone(), value.to_string())
                    })
                    .collect()
            })
            .collect();

        Ok(Self { headers, rows })
    }

    pub async fn load(path: impl AsRef<Path>, max_rows: usize) -> Result<Self> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::parse(&text, max_rows)
    }

    /// Like [`ClaimsTable::load`], but a failure is logged and yields the empty table.
    pub async fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path, PREVIEW_ROWS).await {
            Ok(table) => {
                info!(path = %path.display(), rows = table.rows.len(), "claims dataset loaded");
                table
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load claims dataset");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_keyed_by_trimmed_headers() {
        let table = ClaimsTable::parse(" age , witnesses,fraud_reported\n45, 2 ,Y\n30,0\n", 19).unwrap();

        assert_eq!(table.headers, vec!["age", "witnesses", "fraud_reported"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["witnesses"], "2");
        assert_eq!(table.rows[0]["fraud_reported"], "Y");
        assert_eq!(table.rows[1]["fraud_reported"], "");
    }

    #[test]
    fn preview_is_truncated() {
        let mut text = String::from("id,amount\n");
        for i in 0..40 {
            text.push_str(&format!("{i},{}\n", i * 100));
        }

        let table = ClaimsTable::parse(&text, PREVIEW_ROWS).unwrap();
        assert_eq!(table.rows.len(), PREVIEW_ROWS);
        assert_eq!(table.rows[0]["id"], "0");
        assert_eq!(table.rows[18]["id"], "18");
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(
            ClaimsTable::parse("\n\n", PREVIEW_ROWS),
            Err(ClaimWiseError::DatasetError(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_gives_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let table = ClaimsTable::load_or_empty(dir.path().join("absent.csv")).await;
        assert!(table.is_empty());
        assert!(table.headers.is_empty());
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insurance.csv");
        std::fs::write(&path, "policy_number,total_claim_amount\n521585,71610\n").unwrap();

        let table = ClaimsTable::load_or_empty(&path).await;
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0]["total_claim_amount"], "71610");
    }
}
