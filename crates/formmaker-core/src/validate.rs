//! Form validation.
//!
//! Two layers: `validate_form` enforces the hard rules a create/update
//! is rejected on, and `lint_form` reports advisory issues in forms that
//! persist fine but will grade strangely.

use crate::error::{FieldError, FormError};
use crate::model::{Form, QuestionKind, SubQuestionType};

/// An advisory issue found in a form.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question index (if applicable), 0-based.
    pub question_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Hard validation: the per-field errors a create or update must reject
/// on. Passing this does not mean the form grades sensibly; see
/// `lint_form`.
pub fn validate_form(form: &Form) -> Result<(), FormError> {
    let mut errors = Vec::new();

    if form.title.trim().is_empty() {
        errors.push(FieldError::new("title", "title is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FormError::Validation(errors))
    }
}

/// Check a form for common authoring issues.
pub fn lint_form(form: &Form) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (index, question) in form.questions.iter().enumerate() {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_index: Some(index),
                message,
            });
        };

        match &question.kind {
            QuestionKind::Categorize { categories, items } => {
                if items.is_empty() {
                    warn("has no items and will always grade to zero".into());
                }
                let mut seen = std::collections::HashSet::new();
                for category in categories {
                    if !seen.insert(category) {
                        warn(format!("duplicate category: {category}"));
                    }
                }
                for item in items {
                    if !categories.contains(&item.category) {
                        warn(format!(
                            "item '{}' references unknown category '{}'",
                            item.text, item.category
                        ));
                    }
                }
            }
            QuestionKind::Cloze {
                blanks, options, ..
            } => {
                if blanks.is_empty() {
                    warn("has no blanks and will always grade to zero".into());
                }
                for blank in blanks {
                    if !options.iter().any(|o| o.text == *blank) {
                        warn(format!("blank '{blank}' has no matching drag option"));
                    }
                }
            }
            QuestionKind::Comprehension { sub_questions, .. } => {
                if sub_questions.is_empty() {
                    warn("has no sub-questions and will always grade to zero".into());
                }
                for (sub_index, sub) in sub_questions.iter().enumerate() {
                    let choice_based = matches!(
                        sub.question_type,
                        SubQuestionType::Mcq | SubQuestionType::Mca
                    );
                    if choice_based && !sub.options.contains(&sub.correct_answer) {
                        warn(format!(
                            "sub-question {} correct answer '{}' is not among its options",
                            sub_index + 1,
                            sub.correct_answer
                        ));
                    }
                }
            }
        }
    }

    warnings
}
