//! Home page listing: one card per stored resume record.

use tracing::warn;

use crate::feedback::{self, presentation::score_tier, presentation::ScoreTier};
use crate::models::resume::{ResumeRecord, RESUME_KEY_PREFIX};
use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeSummary {
    pub id: String,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub overall_score: u8,
    pub tier: ScoreTier,
}

/// Reads every stored resume record. Undecodable records are skipped.
pub async fn list_resumes(kv: &dyn KeyValueStore) -> Result<Vec<ResumeSummary>, StorageError> {
    let entries = kv.list(RESUME_KEY_PREFIX).await?;
    let summaries = entries
        .into_iter()
        .filter_map(|(key, raw)| {
            let record: ResumeRecord = match serde_json::from_str(&raw) {
                Ok(r) => r,
                Err(e) => {
                    warn!("Skipping unreadable record {key}: {e}");
                    return None;
                }
            };
            let id = key
                .strip_prefix(RESUME_KEY_PREFIX)
                .unwrap_or(&key)
                .to_string();
            let overall_score = feedback::normalize(&record.feedback).overall_score;
            Some(ResumeSummary {
                id,
                company_name: record.company_name,
                job_title: record.job_title,
                overall_score,
                tier: score_tier(i64::from(overall_score)),
            })
        })
        .collect();
    Ok(summaries)
}
