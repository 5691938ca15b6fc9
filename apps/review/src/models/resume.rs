#![allow(dead_code)]

use serde::Deserialize;
use serde_json::Value;

/// Stored under `resume:<id>` in the key-value store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub resume_path: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    /// Loosely-typed analysis output; normalized at load time.
    #[serde(default)]
    pub feedback: Value,
}

pub const RESUME_KEY_PREFIX: &str = "resume:";

pub fn resume_key(resume_id: &str) -> String {
    format!("{RESUME_KEY_PREFIX}{resume_id}")
}
