use serde::{Deserialize, Serialize};

/// Whether a tip praises something or asks for a change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TipKind {
    Good,
    Improve,
}

impl TipKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "good" => Some(TipKind::Good),
            "improve" => Some(TipKind::Improve),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TipKind::Good => "good",
            TipKind::Improve => "improve",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tip {
    #[serde(rename = "type")]
    pub kind: TipKind,
    #[serde(rename = "tip")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Tip {
    pub fn good(text: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            kind: TipKind::Good,
            text: text.into(),
            explanation: Some(explanation.into()),
        }
    }

    pub fn improve(text: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            kind: TipKind::Improve,
            text: text.into(),
            explanation: Some(explanation.into()),
        }
    }

    /// An improve tip with no explanation line.
    pub fn bare_improve(text: impl Into<String>) -> Self {
        Self {
            kind: TipKind::Improve,
            text: text.into(),
            explanation: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryFeedback {
    pub score: u8, // 0 – 100
    pub tips: Vec<Tip>,
}

impl CategoryFeedback {
    pub fn new(score: u8, tips: Vec<Tip>) -> Self {
        Self {
            score: score.min(100),
            tips,
        }
    }

    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }
}

/// Canonical feedback rendered by the review page. Built once per load and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFeedback {
    pub overall_score: u8,
    #[serde(rename = "ATS")]
    pub ats: CategoryFeedback,
    pub tone_and_style: CategoryFeedback,
    pub content: CategoryFeedback,
    pub structure: CategoryFeedback,
    pub skills: CategoryFeedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Ats,
    ToneAndStyle,
    Content,
    Structure,
    Skills,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Ats,
        Category::ToneAndStyle,
        Category::Content,
        Category::Structure,
        Category::Skills,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Category::Ats => "ATS",
            Category::ToneAndStyle => "Tone & Style",
            Category::Content => "Content",
            Category::Structure => "Structure",
            Category::Skills => "Skills",
        }
    }

    /// Disclosure item id used by the details accordion.
    pub fn item_id(self) -> &'static str {
        match self {
            Category::Ats => "ats",
            Category::ToneAndStyle => "tone-style",
            Category::Content => "content",
            Category::Structure => "structure",
            Category::Skills => "skills",
        }
    }
}

impl DisplayFeedback {
    pub fn category(&self, category: Category) -> &CategoryFeedback {
        match category {
            Category::Ats => &self.ats,
            Category::ToneAndStyle => &self.tone_and_style,
            Category::Content => &self.content,
            Category::Structure => &self.structure,
            Category::Skills => &self.skills,
        }
    }

    /// Substituted when loading fails outright. Deliberately sparser than
    /// the placeholder set used for legacy payloads.
    pub fn minimal_default() -> Self {
        Self {
            overall_score: 0,
            ats: CategoryFeedback::new(
                0,
                vec![Tip::improve(
                    "Feedback could not be loaded",
                    "Try analyzing this resume again.",
                )],
            ),
            tone_and_style: CategoryFeedback::empty(),
            content: CategoryFeedback::empty(),
            structure: CategoryFeedback::empty(),
            skills: CategoryFeedback::empty(),
        }
    }
}
