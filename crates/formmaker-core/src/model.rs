//! Core data model types for formmaker.
//!
//! These are the fundamental types the entire system uses to represent
//! form documents and their question variants. Field names serialize in
//! camelCase to match the stored JSON documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A persisted form document: an ordered sequence of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Unique identifier. Nil until the store assigns one on insert.
    #[serde(default)]
    pub id: Uuid,
    /// Form title shown to respondents.
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Optional header image URL.
    #[serde(default)]
    pub header_image: Option<String>,
    /// Questions in presentation order. Order is significant: submitted
    /// answers are keyed by position in this sequence.
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Maximum achievable score across all questions.
    pub fn max_score(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

/// A single question: common fields plus a type-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Points this question is worth.
    #[serde(default = "default_points")]
    pub points: u32,
    /// Optional author-supplied feedback text.
    #[serde(default)]
    pub feedback: Option<String>,
    /// Optional illustration image URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

fn default_points() -> u32 {
    1
}

/// The type-specific payload of a question, tagged on `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    /// Respondents sort items into named categories.
    #[serde(rename_all = "camelCase")]
    Categorize {
        #[serde(default)]
        categories: Vec<String>,
        #[serde(default)]
        items: Vec<CategorizeItem>,
    },
    /// Fill-in-the-blank sentence. `blanks` holds the correct fill
    /// values, order-significant.
    #[serde(rename_all = "camelCase")]
    Cloze {
        #[serde(default)]
        sentence: String,
        #[serde(default)]
        blanks: Vec<String>,
        #[serde(default)]
        options: Vec<ClozeOption>,
    },
    /// A reading passage with nested sub-questions.
    #[serde(rename_all = "camelCase")]
    Comprehension {
        #[serde(default)]
        instructions: Option<String>,
        #[serde(default)]
        passage: Option<String>,
        #[serde(default)]
        media: Option<String>,
        /// Time limit in seconds, 0 meaning none.
        #[serde(default)]
        timer: u32,
        #[serde(default)]
        sub_questions: Vec<SubQuestion>,
    },
}

impl QuestionKind {
    /// The discriminant for this payload.
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::Categorize { .. } => QuestionType::Categorize,
            QuestionKind::Cloze { .. } => QuestionType::Cloze,
            QuestionKind::Comprehension { .. } => QuestionType::Comprehension,
        }
    }
}

/// An item to be sorted into a category.
///
/// `category` names the category this item truly belongs to. It should
/// reference a value in the question's `categories`; this is not
/// enforced, only assumed at grading time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeItem {
    pub text: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub order: u32,
}

/// A draggable word option for a cloze question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClozeOption {
    pub text: String,
    #[serde(default)]
    pub order: u32,
}

/// One graded item nested inside a comprehension question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubQuestion {
    #[serde(default)]
    pub question_type: SubQuestionType,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default = "default_points")]
    pub points: u32,
}

/// The three question variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Categorize,
    Cloze,
    Comprehension,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Categorize => write!(f, "categorize"),
            QuestionType::Cloze => write!(f, "cloze"),
            QuestionType::Comprehension => write!(f, "comprehension"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "categorize" => Ok(QuestionType::Categorize),
            "cloze" => Ok(QuestionType::Cloze),
            "comprehension" => Ok(QuestionType::Comprehension),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Kinds of comprehension sub-questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubQuestionType {
    /// Multiple choice, single selection.
    #[default]
    Mcq,
    /// Multiple choice, multiple answers. The stored correct answer is
    /// still a single string and compared as such.
    Mca,
    /// Free-text short answer, graded on presence only.
    Short,
}

impl fmt::Display for SubQuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubQuestionType::Mcq => write!(f, "mcq"),
            SubQuestionType::Mca => write!(f, "mca"),
            SubQuestionType::Short => write!(f, "short"),
        }
    }
}

impl FromStr for SubQuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mcq" => Ok(SubQuestionType::Mcq),
            "mca" => Ok(SubQuestionType::Mca),
            "short" => Ok(SubQuestionType::Short),
            other => Err(format!("unknown sub-question type: {other}")),
        }
    }
}
