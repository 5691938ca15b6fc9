//! Display normalizer for canonical and legacy payloads.
//!
//! Missing scores fall back to per-category defaults and missing tip lists
//! fall back to fixed placeholder tips. The analysis schema has its own,
//! independent default policy (see `analysis`).

use serde_json::{Map, Value};
use tracing::debug;

use crate::feedback::analysis::from_analysis;
use crate::feedback::model::{Category, CategoryFeedback, DisplayFeedback, Tip, TipKind};
use crate::feedback::payload::{field, score_of, FeedbackPayload};

pub const DEFAULT_OVERALL_SCORE: u8 = 75;
/// ATS score when the payload has no ATS object at all.
pub const DEFAULT_ATS_SCORE: u8 = 70;
/// ATS score when an ATS object exists but carries no usable score.
pub const DEFAULT_ATS_SCORE_PARTIAL: u8 = 75;

struct CategoryDefaults {
    names: &'static [&'static str],
    score: u8,
    placeholder: fn() -> Vec<Tip>,
}

fn defaults_for(category: Category) -> CategoryDefaults {
    match category {
        Category::Ats => CategoryDefaults {
            names: &["ATS", "ats"],
            score: DEFAULT_ATS_SCORE,
            placeholder: || {
                vec![
                    Tip::improve(
                        "Add more keywords from the job description",
                        "Applicant tracking systems rank resumes by keyword overlap with the posting.",
                    ),
                    Tip::good(
                        "Standard section headings are used",
                        "Common headings help ATS parsers find your information.",
                    ),
                ]
            },
        },
        Category::ToneAndStyle => CategoryDefaults {
            names: &["toneAndStyle", "tone_and_style"],
            score: 80,
            placeholder: || {
                vec![Tip::good(
                    "Professional tone throughout",
                    "Your writing keeps a consistent, professional voice.",
                )]
            },
        },
        Category::Content => CategoryDefaults {
            names: &["content"],
            score: 75,
            placeholder: || {
                vec![Tip::improve(
                    "Quantify your achievements",
                    "Numbers and metrics make your impact concrete.",
                )]
            },
        },
        Category::Structure => CategoryDefaults {
            names: &["structure"],
            score: 85,
            placeholder: || {
                vec![Tip::good(
                    "Clear section organization",
                    "Sections are easy to scan.",
                )]
            },
        },
        Category::Skills => CategoryDefaults {
            names: &["skills"],
            score: 70,
            placeholder: || {
                vec![
                    Tip::improve(
                        "Highlight skills that match the role",
                        "Lead with the skills the posting asks for.",
                    ),
                    Tip::good(
                        "Relevant technical skills listed",
                        "Your skills section covers the core tools for the role.",
                    ),
                ]
            },
        },
    }
}

/// Placeholder tips shown for a category when the payload has none.
pub fn placeholder_tips(category: Category) -> Vec<Tip> {
    (defaults_for(category).placeholder)()
}

/// Full default feedback, used for absent or unrecognized payloads.
pub fn default_feedback() -> DisplayFeedback {
    normalize_display(None)
}

/// Normalizes any stored payload, picking the transformation that matches
/// its shape. Total: malformed input degrades to defaults.
pub fn normalize(raw: &Value) -> DisplayFeedback {
    let payload = FeedbackPayload::classify(raw);
    debug!("Normalizing {} feedback payload", payload.shape_name());
    match payload {
        FeedbackPayload::Canonical(obj) | FeedbackPayload::Legacy(obj) => {
            normalize_display(Some(obj))
        }
        FeedbackPayload::Analysis(obj) => from_analysis(obj),
        FeedbackPayload::Unknown => default_feedback(),
    }
}

fn normalize_display(obj: Option<&Map<String, Value>>) -> DisplayFeedback {
    let overall_score = obj
        .and_then(|o| score_of(field(o, &["overallScore", "overall_score"])))
        .unwrap_or(DEFAULT_OVERALL_SCORE);

    DisplayFeedback {
        overall_score,
        ats: category_from(obj, Category::Ats),
        tone_and_style: category_from(obj, Category::ToneAndStyle),
        content: category_from(obj, Category::Content),
        structure: category_from(obj, Category::Structure),
        skills: category_from(obj, Category::Skills),
    }
}

fn category_from(obj: Option<&Map<String, Value>>, category: Category) -> CategoryFeedback {
    let defaults = defaults_for(category);
    let section = obj
        .and_then(|o| field(o, defaults.names))
        .and_then(Value::as_object);

    let Some(section) = section else {
        return CategoryFeedback::new(defaults.score, (defaults.placeholder)());
    };

    let fallback_score = match category {
        Category::Ats => DEFAULT_ATS_SCORE_PARTIAL,
        _ => defaults.score,
    };
    let score = score_of(section.get("score")).unwrap_or(fallback_score);
    let tips = section
        .get("tips")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(tip_from).collect())
        .unwrap_or_else(defaults.placeholder);

    CategoryFeedback::new(score, tips)
}

fn tip_from(raw: &Value) -> Option<Tip> {
    let obj = raw.as_object()?;
    let kind = field(obj, &["type", "kind"])
        .and_then(Value::as_str)
        .and_then(TipKind::parse)?;
    let text = field(obj, &["tip", "text"]).and_then(Value::as_str)?;
    let explanation = obj
        .get("explanation")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(Tip {
        kind,
        text: text.to_string(),
        explanation,
    })
}
