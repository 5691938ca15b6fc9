//! Transformation from the upstream resume-analysis schema into display
//! feedback. Any missing nested field yields score 0 and no tips for that
//! category; this path does not use the placeholder defaults.

use serde_json::{Map, Value};

use crate::feedback::model::{CategoryFeedback, DisplayFeedback, Tip};
use crate::feedback::payload::{score_of, strings_of};

const TONE_WEAKNESS_LIMIT: usize = 2;
const PRESENT_KEYWORD_LIMIT: usize = 3;
const MISSING_KEYWORD_LIMIT: usize = 5;

/// Lowercase markers that make a weakness count as a structure issue.
const STRUCTURE_MARKERS: &[&str] = &["section", "format", "organization"];

pub fn from_analysis(obj: &Map<String, Value>) -> DisplayFeedback {
    let ratings = obj.get("section_ratings").and_then(Value::as_object);
    let rating = |name: &str| ratings.and_then(|r| score_of(r.get(name))).unwrap_or(0);
    let list = |name: &str| strings_of(obj.get(name)).unwrap_or_default();

    let weaknesses = list("weaknesses");
    let keywords = obj.get("keyword_analysis").and_then(Value::as_object);
    let keyword_list =
        |name: &str| keywords.and_then(|k| strings_of(k.get(name))).unwrap_or_default();

    let ats_tips = list("ats_optimization_tips")
        .into_iter()
        .map(Tip::bare_improve)
        .collect();

    let tone_tips = list("strengths")
        .into_iter()
        .map(|s| Tip::good(s, "This is a strength identified in your resume"))
        .chain(weaknesses.iter().take(TONE_WEAKNESS_LIMIT).map(|w| {
            Tip::improve(*w, "Consider improving this aspect for better tone and style")
        }))
        .collect();

    let content_tips = list("improvement_suggestions")
        .into_iter()
        .map(|s| Tip::improve(s, "This improvement will enhance your resume content"))
        .collect();

    let structure_tips = std::iter::once(Tip::good(
        "Clean, professional layout with good organization",
        "Your resume has a well-structured format",
    ))
    .chain(
        weaknesses
            .iter()
            .filter(|w| is_structure_issue(w))
            .map(|w| Tip::improve(*w, "Improving this will enhance your resume structure")),
    )
    .collect();

    let skills_tips = keyword_list("present_keywords")
        .into_iter()
        .take(PRESENT_KEYWORD_LIMIT)
        .map(|k| {
            Tip::good(
                format!("\"{k}\" keyword is present"),
                "This relevant keyword strengthens your resume",
            )
        })
        .chain(
            keyword_list("missing_keywords")
                .into_iter()
                .take(MISSING_KEYWORD_LIMIT)
                .map(|k| {
                    Tip::improve(
                        format!("Consider adding \"{k}\" keyword"),
                        "This keyword is commonly sought by employers in your field",
                    )
                }),
        )
        .collect();

    DisplayFeedback {
        overall_score: score_of(obj.get("overall_rating")).unwrap_or(0),
        ats: CategoryFeedback::new(
            score_of(obj.get("ats_compatibility")).unwrap_or(0),
            ats_tips,
        ),
        tone_and_style: CategoryFeedback::new(rating("summary"), tone_tips),
        content: CategoryFeedback::new(rating("experience"), content_tips),
        structure: CategoryFeedback::new(rating("format_and_design"), structure_tips),
        skills: CategoryFeedback::new(rating("skills"), skills_tips),
    }
}

fn is_structure_issue(weakness: &str) -> bool {
    let lower = weakness.to_lowercase();
    STRUCTURE_MARKERS.iter().any(|m| lower.contains(m))
}
