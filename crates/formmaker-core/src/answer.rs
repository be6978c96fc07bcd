//! Submitted answer payloads.
//!
//! Answers arrive as a JSON object keyed by the stringified question
//! index. The per-question payload shape depends on the question type;
//! grading reads the field matching the question's variant and treats a
//! missing or mismatched payload as "no answer provided". Non-string
//! entries inside answer arrays decode to empty strings so a sloppy
//! client produces a non-match instead of a rejected submission.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One respondent's answers for a whole form, keyed by question index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(HashMap<String, Answer>);

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The answer submitted for the question at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Answer> {
        self.0.get(&index.to_string())
    }

    pub fn insert(&mut self, index: usize, answer: Answer) {
        self.0.insert(index.to_string(), answer);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single submitted answer.
///
/// All payload fields are optional; exactly one is expected to be set,
/// matching the question type it answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Answer {
    /// Categorize: every item with the category the respondent chose
    /// and the item's original category echoed back by the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<AnsweredItem>>,
    /// Cloze: fill values aligned positionally to the question's blanks.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_strings"
    )]
    pub blanks: Option<Vec<String>>,
    /// Comprehension: responses aligned positionally to the
    /// sub-questions.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_strings"
    )]
    pub sub_answers: Option<Vec<String>>,
}

impl Answer {
    pub fn categorize(items: Vec<AnsweredItem>) -> Self {
        Answer {
            items: Some(items),
            ..Answer::default()
        }
    }

    pub fn cloze<S: Into<String>>(blanks: Vec<S>) -> Self {
        Answer {
            blanks: Some(blanks.into_iter().map(Into::into).collect()),
            ..Answer::default()
        }
    }

    pub fn comprehension<S: Into<String>>(sub_answers: Vec<S>) -> Self {
        Answer {
            sub_answers: Some(sub_answers.into_iter().map(Into::into).collect()),
            ..Answer::default()
        }
    }
}

/// A categorize item as submitted: the respondent's chosen category plus
/// the item's true category echoed from the question data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnsweredItem {
    #[serde(deserialize_with = "lenient_string")]
    pub text: String,
    /// Category the respondent placed this item into.
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    /// The item's true category, carried from the question data by the
    /// client before submission.
    #[serde(deserialize_with = "lenient_string")]
    pub original_category: String,
}

impl AnsweredItem {
    pub fn new<S: Into<String>>(text: S, category: S, original_category: S) -> Self {
        AnsweredItem {
            text: text.into(),
            category: category.into(),
            original_category: original_category.into(),
        }
    }
}

/// Accept any JSON value where a string is expected; non-strings decode
/// to the empty string and count as non-matches at grading time.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values.map(|values| {
        values
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                _ => String::new(),
            })
            .collect()
    }))
}
