use serde::Serialize;

use crate::feedback::model::{Category, CategoryFeedback, DisplayFeedback, Tip, TipKind};

pub const NO_FEEDBACK_PLACEHOLDER: &str = "No specific feedback available for this category.";

/// Categories shown as collapsible panels, in display order. ATS has its
/// own section above the accordion.
pub const DETAIL_CATEGORIES: [Category; 4] = [
    Category::ToneAndStyle,
    Category::Content,
    Category::Structure,
    Category::Skills,
];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Strong,
    GoodStart,
    NeedsWork,
}

impl ScoreTier {
    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Strong => "Strong",
            ScoreTier::GoodStart => "Good Start",
            ScoreTier::NeedsWork => "Needs Work",
        }
    }

    pub fn tone(self) -> &'static str {
        match self {
            ScoreTier::Strong => "green",
            ScoreTier::GoodStart => "yellow",
            ScoreTier::NeedsWork => "red",
        }
    }
}

/// Qualitative badge for a score. Total over all integers.
pub fn score_tier(score: i64) -> ScoreTier {
    if score > 69 {
        ScoreTier::Strong
    } else if score > 49 {
        ScoreTier::GoodStart
    } else {
        ScoreTier::NeedsWork
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TipView {
    pub kind: TipKind,
    pub icon: &'static str,
    pub text: String,
    pub explanation: Option<String>,
}

impl From<&Tip> for TipView {
    fn from(tip: &Tip) -> Self {
        let icon = match tip.kind {
            TipKind::Good => "/icons/check.svg",
            TipKind::Improve => "/icons/warning.svg",
        };
        Self {
            kind: tip.kind,
            icon,
            text: tip.text.clone(),
            explanation: tip.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum TipsView {
    Tips(Vec<TipView>),
    Placeholder(&'static str),
}

impl TipsView {
    pub fn from_tips(tips: &[Tip]) -> Self {
        if tips.is_empty() {
            TipsView::Placeholder(NO_FEEDBACK_PLACEHOLDER)
        } else {
            TipsView::Tips(tips.iter().map(TipView::from).collect())
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryView {
    pub item_id: &'static str,
    pub title: &'static str,
    pub score: u8,
    pub tier: ScoreTier,
    pub badge: &'static str,
    pub tips: TipsView,
}

impl CategoryView {
    pub fn new(category: Category, feedback: &CategoryFeedback) -> Self {
        let tier = score_tier(i64::from(feedback.score));
        Self {
            item_id: category.item_id(),
            title: category.title(),
            score: feedback.score,
            tier,
            badge: tier.label(),
            tips: TipsView::from_tips(&feedback.tips),
        }
    }
}

/// Everything the review page shows for one feedback instance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedbackView {
    pub overall_score: u8,
    pub overall_tier: ScoreTier,
    pub ats: CategoryView,
    pub details: Vec<CategoryView>,
}

impl FeedbackView {
    pub fn new(feedback: &DisplayFeedback) -> Self {
        Self {
            overall_score: feedback.overall_score,
            overall_tier: score_tier(i64::from(feedback.overall_score)),
            ats: CategoryView::new(Category::Ats, &feedback.ats),
            details: DETAIL_CATEGORIES
                .iter()
                .map(|c| CategoryView::new(*c, feedback.category(*c)))
                .collect(),
        }
    }
}
