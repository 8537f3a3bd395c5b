//! Month-keyed usage meter
//!
//! Tracks how many discussions have run in the current calendar month and
//! evaluates the count against the tier quota. The counter is one small
//! JSON file; a record from an earlier month reads as zero, so the meter
//! rolls over without a scheduled reset.

use chrono::{DateTime, Utc};
use roundtable_application::StoreError;
use roundtable_domain::{SubscriptionTier, UsageCheck};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
struct UsageRecord {
    /// Calendar month the count belongs to, e.g. "2026-08"
    month: String,
    count: u32,
}

/// File-backed monthly discussion counter
pub struct FileUsageMeter {
    path: PathBuf,
}

impl FileUsageMeter {
    /// Meter stored as `usage.json` under `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join("usage.json"),
        }
    }

    fn month_key(now: DateTime<Utc>) -> String {
        now.format("%Y-%m").to_string()
    }

    async fn read_count(&self, month: &str) -> Result<u32, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "could not read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        // A stale or unreadable record counts as a fresh month.
        Ok(serde_json::from_str::<UsageRecord>(&content)
            .ok()
            .filter(|record| record.month == month)
            .map(|record| record.count)
            .unwrap_or(0))
    }

    async fn write_count(&self, month: &str, count: u32) -> Result<(), StoreError> {
        let record = UsageRecord {
            month: month.to_string(),
            count,
        };
        let content = serde_json::to_string(&record)
            .map_err(|e| StoreError::Io(format!("could not serialize usage record: {e}")))?;
        tokio::fs::write(&self.path, content).await.map_err(|e| {
            StoreError::Io(format!("could not write {}: {}", self.path.display(), e))
        })
    }

    /// Evaluate this month's count against the tier quota.
    pub async fn check(&self, tier: SubscriptionTier) -> Result<UsageCheck, StoreError> {
        let month = Self::month_key(Utc::now());
        let count = self.read_count(&month).await?;
        Ok(UsageCheck::evaluate(tier, count))
    }

    /// Record one completed discussion against the current month.
    pub async fn record_discussion(&self) -> Result<(), StoreError> {
        let month = Self::month_key(Utc::now());
        let count = self.read_count(&month).await?;
        self.write_count(&month, count + 1).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_meter_allows_and_counts_from_zero() {
        let dir = tempfile::tempdir().unwrap();
        let meter = FileUsageMeter::new(dir.path());

        let check = meter.check(SubscriptionTier::Free).await.unwrap();
        assert!(check.allowed);
        assert_eq!(check.current_usage, 0);
        assert_eq!(check.remaining(), Some(10));
    }

    #[tokio::test]
    async fn test_recorded_discussions_accumulate_toward_the_quota() {
        let dir = tempfile::tempdir().unwrap();
        let meter = FileUsageMeter::new(dir.path());

        for _ in 0..10 {
            meter.record_discussion().await.unwrap();
        }

        let check = meter.check(SubscriptionTier::Free).await.unwrap();
        assert!(!check.allowed);
        assert_eq!(check.current_usage, 10);

        // A roomier tier reads the same count but stays allowed.
        let check = meter.check(SubscriptionTier::Starter).await.unwrap();
        assert!(check.allowed);
        assert_eq!(check.remaining(), Some(90));
    }

    #[tokio::test]
    async fn test_count_from_an_earlier_month_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let meter = FileUsageMeter::new(dir.path());

        let stale = serde_json::json!({ "month": "2020-01", "count": 9 });
        std::fs::write(dir.path().join("usage.json"), stale.to_string()).unwrap();

        let check = meter.check(SubscriptionTier::Free).await.unwrap();
        assert_eq!(check.current_usage, 0);

        // The first recording of the new month replaces the stale record.
        meter.record_discussion().await.unwrap();
        let check = meter.check(SubscriptionTier::Free).await.unwrap();
        assert_eq!(check.current_usage, 1);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_treated_as_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let meter = FileUsageMeter::new(dir.path());

        std::fs::write(dir.path().join("usage.json"), "not json").unwrap();

        let check = meter.check(SubscriptionTier::Pro).await.unwrap();
        assert!(check.allowed);
        assert_eq!(check.current_usage, 0);
    }
}
