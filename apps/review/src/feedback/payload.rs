//! Shape detection for the loosely-typed feedback payload stored alongside
//! each resume. The backend has written three different layouts over time;
//! classification is purely structural and never fails.

use serde_json::{Map, Value};

/// Fields that only appear in the upstream analysis schema.
const ANALYSIS_FIELDS: &[&str] = &[
    "ats_compatibility",
    "section_ratings",
    "strengths",
    "weaknesses",
    "keyword_analysis",
    "ats_optimization_tips",
    "improvement_suggestions",
    "overall_rating",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedbackPayload<'a> {
    /// Already in display layout (`overallScore` + `ATS`).
    Canonical(&'a Map<String, Value>),
    /// Per-category `{score, tips}` objects under older field names.
    Legacy(&'a Map<String, Value>),
    /// Raw analysis output (`ats_compatibility`, `section_ratings`, ...).
    Analysis(&'a Map<String, Value>),
    /// Missing, null or not an object.
    Unknown,
}

impl<'a> FeedbackPayload<'a> {
    pub fn classify(raw: &'a Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return FeedbackPayload::Unknown;
        };
        if obj.contains_key("overallScore") && obj.contains_key("ATS") {
            return FeedbackPayload::Canonical(obj);
        }
        if ANALYSIS_FIELDS.iter().any(|f| obj.contains_key(*f)) {
            return FeedbackPayload::Analysis(obj);
        }
        FeedbackPayload::Legacy(obj)
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            FeedbackPayload::Canonical(_) => "canonical",
            FeedbackPayload::Legacy(_) => "legacy",
            FeedbackPayload::Analysis(_) => "analysis",
            FeedbackPayload::Unknown => "unknown",
        }
    }
}

/// Reads a JSON number as a 0–100 score. Fractions round to nearest.
pub(crate) fn score_of(value: Option<&Value>) -> Option<u8> {
    let n = value?.as_f64()?;
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, 100.0) as u8)
}

/// First present field among several accepted spellings.
pub(crate) fn field<'v>(obj: &'v Map<String, Value>, names: &[&str]) -> Option<&'v Value> {
    names.iter().find_map(|n| obj.get(*n))
}

/// String entries of an array; non-strings are skipped. `None` when the
/// value is absent or not an array.
pub(crate) fn strings_of(value: Option<&Value>) -> Option<Vec<&str>> {
    let items = value?.as_array()?;
    Some(items.iter().filter_map(Value::as_str).collect())
}
