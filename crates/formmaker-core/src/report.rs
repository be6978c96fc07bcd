//! Grade report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Form, QuestionType};

/// Outcome of grading one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    /// Position of the question in the form, 0-based.
    pub question_index: usize,
    pub question_type: QuestionType,
    pub is_correct: bool,
    /// Points earned, always within `0..=max_score`.
    pub score: u32,
    pub max_score: u32,
    pub feedback: String,
    /// The correct fill values, echoed for cloze questions so a client
    /// can display them after grading. Null for other types.
    pub correct_answer: Option<Vec<String>>,
}

/// The complete result of grading one submission against one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub results: Vec<QuestionResult>,
    pub total_score: u32,
    pub max_score: u32,
    /// Percentage of `max_score` earned, rounded to the nearest integer.
    /// 0 when the form has no gradable points.
    pub percentage: u32,
    pub passed: bool,
}

impl GradeReport {
    /// Count of questions answered fully correctly.
    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_correct).count()
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {}/{} ({}%) — {}\n\n",
            self.total_score,
            self.max_score,
            self.percentage,
            if self.passed { "passed" } else { "failed" }
        ));

        if !self.results.is_empty() {
            md.push_str("| # | Type | Score | Correct | Feedback |\n");
            md.push_str("|---|------|-------|---------|----------|\n");
            for r in &self.results {
                md.push_str(&format!(
                    "| {} | {} | {}/{} | {} | {} |\n",
                    r.question_index + 1,
                    r.question_type,
                    r.score,
                    r.max_score,
                    if r.is_correct { "yes" } else { "no" },
                    r.feedback
                ));
            }
        }

        md
    }
}

/// A graded submission persisted as an artifact, with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedSubmission {
    /// Unique submission identifier.
    pub id: Uuid,
    /// When the submission was graded.
    pub created_at: DateTime<Utc>,
    /// The form this submission was graded against.
    pub form: FormSummary,
    #[serde(flatten)]
    pub report: GradeReport,
}

/// Summary of a form (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: Uuid,
    pub title: String,
    pub question_count: usize,
}

impl FormSummary {
    pub fn of(form: &Form) -> Self {
        FormSummary {
            id: form.id,
            title: form.title.clone(),
            question_count: form.questions.len(),
        }
    }
}

impl GradedSubmission {
    pub fn new(form: &Form, report: GradeReport) -> Self {
        GradedSubmission {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            form: FormSummary::of(form),
            report,
        }
    }

    /// Save the submission as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize submission")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write submission to {}", path.display()))?;
        Ok(())
    }

    /// Load a submission from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission from {}", path.display()))?;
        let submission: GradedSubmission =
            serde_json::from_str(&content).context("failed to parse submission JSON")?;
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> GradeReport {
        GradeReport {
            results: vec![
                QuestionResult {
                    question_index: 0,
                    question_type: QuestionType::Cloze,
                    is_correct: true,
                    score: 2,
                    max_score: 2,
                    feedback: "Perfect! All blanks filled correctly.".into(),
                    correct_answer: Some(vec!["cat".into(), "mat".into()]),
                },
                QuestionResult {
                    question_index: 1,
                    question_type: QuestionType::Categorize,
                    is_correct: false,
                    score: 3,
                    max_score: 4,
                    feedback: "3/4 items correct.".into(),
                    correct_answer: None,
                },
            ],
            total_score: 5,
            max_score: 6,
            percentage: 83,
            passed: true,
        }
    }

    fn sample_form() -> Form {
        serde_json::from_str(r#"{"title": "Quiz", "questions": []}"#).unwrap()
    }

    #[test]
    fn report_wire_format_is_camel_case() {
        let value = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(value["totalScore"], 5);
        assert_eq!(value["maxScore"], 6);
        assert_eq!(value["results"][0]["questionIndex"], 0);
        assert_eq!(value["results"][0]["questionType"], "cloze");
        assert_eq!(value["results"][0]["isCorrect"], true);
        // correctAnswer must serialize as null, not be omitted
        assert!(value["results"][1]
            .as_object()
            .unwrap()
            .contains_key("correctAnswer"));
        assert!(value["results"][1]["correctAnswer"].is_null());
    }

    #[test]
    fn json_roundtrip() {
        let submission = GradedSubmission::new(&sample_form(), sample_report());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submission.json");

        submission.save_json(&path).unwrap();
        let loaded = GradedSubmission::load_json(&path).unwrap();

        assert_eq!(loaded.id, submission.id);
        assert_eq!(loaded.report, submission.report);
        assert_eq!(loaded.form.title, "Quiz");
    }

    #[test]
    fn submission_flattens_report() {
        let submission = GradedSubmission::new(&sample_form(), sample_report());
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["totalScore"], 5);
        assert_eq!(value["passed"], true);
        assert!(value.get("report").is_none());
    }

    #[test]
    fn markdown_output() {
        let md = sample_report().to_markdown();
        assert!(md.contains("5/6"));
        assert!(md.contains("passed"));
        assert!(md.contains("3/4 items correct."));
    }

    #[test]
    fn correct_count() {
        assert_eq!(sample_report().correct_count(), 1);
    }
}
