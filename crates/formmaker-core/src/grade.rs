//! The grading engine.
//!
//! `grade` is pure and synchronous: it performs no I/O, shares no
//! mutable state, and may be called concurrently across requests without
//! coordination. Incomplete or malformed submissions are gradable data,
//! not errors: every question yields a result, degrading to a zero score
//! with descriptive feedback when no usable answer was submitted.

use crate::answer::{Answer, AnswerSheet};
use crate::error::FormError;
use crate::model::{Form, Question, QuestionKind, SubQuestion, SubQuestionType};
use crate::report::{GradeReport, QuestionResult};
use crate::store::FormStore;
use uuid::Uuid;

const NO_ANSWER_FEEDBACK: &str = "No answers provided.";

/// Tunables for grading.
#[derive(Debug, Clone)]
pub struct GradeConfig {
    /// Fraction of `max_score` required to pass.
    pub pass_threshold: f64,
}

impl Default for GradeConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 0.6,
        }
    }
}

/// Grade a submission against a form with the default configuration.
pub fn grade(form: &Form, answers: &AnswerSheet) -> GradeReport {
    grade_with(form, answers, &GradeConfig::default())
}

/// Grade a submission against a form.
pub fn grade_with(form: &Form, answers: &AnswerSheet, config: &GradeConfig) -> GradeReport {
    let mut results = Vec::with_capacity(form.questions.len());
    let mut total_score = 0u32;
    let mut max_score = 0u32;

    for (index, question) in form.questions.iter().enumerate() {
        let outcome = grade_question(question, answers.get(index));

        max_score += question.points;
        total_score += outcome.score;
        results.push(QuestionResult {
            question_index: index,
            question_type: question.kind.question_type(),
            is_correct: outcome.is_correct,
            score: outcome.score,
            max_score: question.points,
            feedback: outcome.feedback,
            correct_answer: outcome.correct_answer,
        });
    }

    // An empty form has nothing to divide by: report zero and fail.
    let (percentage, passed) = if max_score == 0 {
        (0, false)
    } else {
        let ratio = f64::from(total_score) / f64::from(max_score);
        (
            (ratio * 100.0).round() as u32,
            ratio >= config.pass_threshold,
        )
    };

    GradeReport {
        results,
        total_score,
        max_score,
        percentage,
        passed,
    }
}

/// Load a form from the store and grade a submission against it.
///
/// An unknown form id is the entire failure surface: grading itself
/// always succeeds.
pub fn check_answers(
    store: &dyn FormStore,
    id: Uuid,
    answers: &AnswerSheet,
) -> Result<GradeReport, FormError> {
    let form = store.get(id)?;
    let report = grade(&form, answers);
    tracing::debug!(
        form = %id,
        total = report.total_score,
        max = report.max_score,
        "graded submission"
    );
    Ok(report)
}

struct Outcome {
    is_correct: bool,
    score: u32,
    feedback: String,
    correct_answer: Option<Vec<String>>,
}

impl Outcome {
    fn unanswered(correct_answer: Option<Vec<String>>) -> Self {
        Outcome {
            is_correct: false,
            score: 0,
            feedback: NO_ANSWER_FEEDBACK.to_string(),
            correct_answer,
        }
    }
}

fn grade_question(question: &Question, answer: Option<&Answer>) -> Outcome {
    match &question.kind {
        QuestionKind::Cloze { blanks, .. } => grade_cloze(blanks, question.points, answer),
        QuestionKind::Categorize { items, .. } => {
            grade_categorize(items.len(), question.points, answer)
        }
        QuestionKind::Comprehension { sub_questions, .. } => {
            grade_comprehension(sub_questions, question.points, answer)
        }
    }
}

fn grade_cloze(correct: &[String], points: u32, answer: Option<&Answer>) -> Outcome {
    // The correct fill values are always echoed, answered or not.
    let correct_answer = Some(correct.to_vec());

    let Some(user) = answer.and_then(|a| a.blanks.as_ref()) else {
        return Outcome::unanswered(correct_answer);
    };

    let matched = correct
        .iter()
        .enumerate()
        .filter(|(i, expected)| {
            user.get(*i).is_some_and(|got| {
                !got.is_empty() && got.trim().to_lowercase() == expected.trim().to_lowercase()
            })
        })
        .count();

    let is_correct = !correct.is_empty()
        && matched == correct.len()
        && user.iter().all(|b| !b.trim().is_empty());

    Outcome {
        is_correct,
        score: score_for(is_correct, matched, correct.len(), points),
        feedback: if is_correct {
            "Perfect! All blanks filled correctly.".to_string()
        } else {
            format!("{matched}/{} blanks correct.", correct.len())
        },
        correct_answer,
    }
}

fn grade_categorize(item_count: usize, points: u32, answer: Option<&Answer>) -> Outcome {
    let Some(items) = answer.and_then(|a| a.items.as_ref()) else {
        return Outcome::unanswered(None);
    };

    // TODO: derive the true category from the stored question items
    // instead of trusting the client-echoed original_category.
    let matched = items
        .iter()
        .filter(|item| item.category == item.original_category)
        .count();

    let is_correct = item_count > 0 && matched == item_count;

    Outcome {
        is_correct,
        score: score_for(is_correct, matched, item_count, points),
        feedback: if is_correct {
            "Perfect! All items categorized correctly.".to_string()
        } else {
            format!("{matched}/{item_count} items correct.")
        },
        correct_answer: None,
    }
}

fn grade_comprehension(
    sub_questions: &[SubQuestion],
    points: u32,
    answer: Option<&Answer>,
) -> Outcome {
    let Some(responses) = answer.and_then(|a| a.sub_answers.as_ref()) else {
        return Outcome::unanswered(None);
    };

    let matched = sub_questions
        .iter()
        .enumerate()
        .filter(|(i, sub)| {
            let response = responses.get(*i).map(String::as_str);
            match sub.question_type {
                // mca stores a single correct string; compared as such.
                SubQuestionType::Mcq | SubQuestionType::Mca => {
                    response == Some(sub.correct_answer.as_str())
                }
                SubQuestionType::Short => response.is_some_and(|r| !r.trim().is_empty()),
            }
        })
        .count();

    let is_correct = !sub_questions.is_empty() && matched == sub_questions.len();

    Outcome {
        is_correct,
        score: score_for(is_correct, matched, sub_questions.len(), points),
        feedback: if is_correct {
            "Perfect! All sub-questions answered correctly.".to_string()
        } else {
            format!("{matched}/{} sub-questions correct.", sub_questions.len())
        },
        correct_answer: None,
    }
}

/// Full points when correct, else proportional integer credit:
/// `floor(matched / total * points)`, clamped to the question's points
/// and zero when there is nothing to grade against.
fn score_for(is_correct: bool, matched: usize, total: usize, points: u32) -> u32 {
    if is_correct {
        return points;
    }
    if total == 0 {
        return 0;
    }
    let partial = (matched as u64 * u64::from(points)) / total as u64;
    (partial as u32).min(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnsweredItem;
    use crate::store::{FormStore, MemoryStore};

    fn form_with(questions: &str) -> Form {
        serde_json::from_str(&format!(r#"{{"title": "Quiz", "questions": {questions}}}"#)).unwrap()
    }

    fn cloze_form(blanks: &[&str], points: u32) -> Form {
        let blanks = serde_json::to_string(blanks).unwrap();
        form_with(&format!(
            r#"[{{"type": "cloze", "points": {points}, "blanks": {blanks}}}]"#
        ))
    }

    fn comprehension_form() -> Form {
        form_with(
            r#"[{
                "type": "comprehension",
                "points": 2,
                "subQuestions": [
                    {"questionType": "mcq", "question": "Pick", "options": ["a", "b"], "correctAnswer": "a"},
                    {"questionType": "short", "question": "Explain"}
                ]
            }]"#,
        )
    }

    fn sheet(index: usize, answer: Answer) -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        sheet.insert(index, answer);
        sheet
    }

    #[test]
    fn cloze_case_insensitive_and_trimmed() {
        let form = cloze_form(&["cat", "mat"], 2);
        let report = grade(&form, &sheet(0, Answer::cloze(vec!["Cat", " mat "])));

        assert!(report.results[0].is_correct);
        assert_eq!(report.results[0].score, 2);
        assert_eq!(
            report.results[0].feedback,
            "Perfect! All blanks filled correctly."
        );
        assert_eq!(
            report.results[0].correct_answer,
            Some(vec!["cat".to_string(), "mat".to_string()])
        );
    }

    #[test]
    fn cloze_partial_credit_floors() {
        let form = cloze_form(&["cat", "mat"], 2);
        let report = grade(&form, &sheet(0, Answer::cloze(vec!["dog", "mat"])));

        assert!(!report.results[0].is_correct);
        assert_eq!(report.results[0].score, 1);
        assert_eq!(report.results[0].feedback, "1/2 blanks correct.");
    }

    #[test]
    fn cloze_three_blanks_one_point_floors_to_zero() {
        let form = cloze_form(&["a", "b", "c"], 1);
        let report = grade(&form, &sheet(0, Answer::cloze(vec!["a", "b", "x"])));
        // floor(2/3 * 1) = 0
        assert_eq!(report.results[0].score, 0);
        assert_eq!(report.results[0].feedback, "2/3 blanks correct.");
    }

    #[test]
    fn cloze_all_matched_but_blank_left_empty_is_incorrect() {
        // Matching entries but an empty extra blank: no full credit.
        let form = cloze_form(&["cat", "mat"], 2);
        let report = grade(&form, &sheet(0, Answer::cloze(vec!["cat", "mat", " "])));
        assert!(!report.results[0].is_correct);
        assert_eq!(report.results[0].score, 2);
    }

    #[test]
    fn cloze_missing_answer_scores_zero() {
        let form = cloze_form(&["cat"], 3);
        let report = grade(&form, &AnswerSheet::new());

        assert!(!report.results[0].is_correct);
        assert_eq!(report.results[0].score, 0);
        assert_eq!(report.results[0].feedback, "No answers provided.");
        // Correct answers are echoed even for unanswered cloze questions.
        assert_eq!(
            report.results[0].correct_answer,
            Some(vec!["cat".to_string()])
        );
    }

    #[test]
    fn cloze_wrong_shaped_answer_counts_as_unanswered() {
        let form = cloze_form(&["cat"], 1);
        let report = grade(
            &form,
            &sheet(0, Answer::categorize(vec![AnsweredItem::new("x", "y", "y")])),
        );
        assert_eq!(report.results[0].feedback, "No answers provided.");
        assert_eq!(report.results[0].score, 0);
    }

    #[test]
    fn cloze_with_no_blanks_grades_to_zero() {
        let form = cloze_form(&[], 2);
        let report = grade(&form, &sheet(0, Answer::cloze(vec!["anything"])));
        assert!(!report.results[0].is_correct);
        assert_eq!(report.results[0].score, 0);
        assert_eq!(report.results[0].feedback, "0/0 blanks correct.");
    }

    #[test]
    fn categorize_partial_credit() {
        let form = form_with(
            r#"[{
                "type": "categorize",
                "points": 4,
                "categories": ["Mammal", "Bird"],
                "items": [
                    {"text": "Dog", "category": "Mammal"},
                    {"text": "Cat", "category": "Mammal"},
                    {"text": "Eagle", "category": "Bird"},
                    {"text": "Sparrow", "category": "Bird"}
                ]
            }]"#,
        );
        let answer = Answer::categorize(vec![
            AnsweredItem::new("Dog", "Mammal", "Mammal"),
            AnsweredItem::new("Cat", "Mammal", "Mammal"),
            AnsweredItem::new("Eagle", "Bird", "Bird"),
            AnsweredItem::new("Sparrow", "Mammal", "Bird"),
        ]);
        let report = grade(&form, &sheet(0, answer));

        assert!(!report.results[0].is_correct);
        assert_eq!(report.results[0].score, 3);
        assert_eq!(report.results[0].feedback, "3/4 items correct.");
        assert_eq!(report.results[0].correct_answer, None);
    }

    #[test]
    fn categorize_all_correct() {
        let form = form_with(
            r#"[{
                "type": "categorize",
                "points": 2,
                "categories": ["A", "B"],
                "items": [
                    {"text": "x", "category": "A"},
                    {"text": "y", "category": "B"}
                ]
            }]"#,
        );
        let answer = Answer::categorize(vec![
            AnsweredItem::new("x", "A", "A"),
            AnsweredItem::new("y", "B", "B"),
        ]);
        let report = grade(&form, &sheet(0, answer));
        assert!(report.results[0].is_correct);
        assert_eq!(report.results[0].score, 2);
        assert_eq!(
            report.results[0].feedback,
            "Perfect! All items categorized correctly."
        );
    }

    #[test]
    fn categorize_over_submission_stays_within_points() {
        // More matching submitted items than the question owns must not
        // exceed the question's points.
        let form = form_with(
            r#"[{
                "type": "categorize",
                "points": 4,
                "items": [{"text": "x", "category": "A"}, {"text": "y", "category": "A"}]
            }]"#,
        );
        let answer = Answer::categorize(vec![
            AnsweredItem::new("x", "A", "A"),
            AnsweredItem::new("y", "A", "A"),
            AnsweredItem::new("z", "A", "A"),
        ]);
        let report = grade(&form, &sheet(0, answer));
        assert!(report.results[0].score <= 4);
    }

    #[test]
    fn comprehension_mcq_and_short() {
        let form = comprehension_form();
        let report = grade(&form, &sheet(0, Answer::comprehension(vec!["a", ""])));

        // mcq matched, short empty: 1/2, floor(1/2 * 2) = 1
        assert!(!report.results[0].is_correct);
        assert_eq!(report.results[0].score, 1);
        assert_eq!(report.results[0].feedback, "1/2 sub-questions correct.");
    }

    #[test]
    fn comprehension_short_counts_on_presence() {
        let form = comprehension_form();
        let report = grade(
            &form,
            &sheet(0, Answer::comprehension(vec!["a", "because it is"])),
        );
        assert!(report.results[0].is_correct);
        assert_eq!(report.results[0].score, 2);
        assert_eq!(
            report.results[0].feedback,
            "Perfect! All sub-questions answered correctly."
        );
    }

    #[test]
    fn comprehension_mcq_is_exact_match() {
        let form = comprehension_form();
        // Case differs: mcq comparison is exact, unlike cloze.
        let report = grade(&form, &sheet(0, Answer::comprehension(vec!["A", "yes"])));
        assert_eq!(report.results[0].score, 1);
    }

    #[test]
    fn comprehension_missing_trailing_answers() {
        let form = comprehension_form();
        let report = grade(&form, &sheet(0, Answer::comprehension(vec!["a"])));
        // short at index 1 unanswered
        assert_eq!(report.results[0].score, 1);
        assert!(!report.results[0].is_correct);
    }

    #[test]
    fn aggregates_sum_and_round() {
        let form = form_with(
            r#"[
                {"type": "cloze", "points": 2, "blanks": ["cat", "mat"]},
                {"type": "cloze", "points": 1, "blanks": ["dog"]}
            ]"#,
        );
        let mut answers = AnswerSheet::new();
        answers.insert(0, Answer::cloze(vec!["cat", "mat"]));
        answers.insert(1, Answer::cloze(vec!["cow"]));

        let report = grade(&form, &answers);
        assert_eq!(report.total_score, 2);
        assert_eq!(report.max_score, 3);
        assert_eq!(
            report.total_score,
            report.results.iter().map(|r| r.score).sum::<u32>()
        );
        assert_eq!(
            report.max_score,
            report.results.iter().map(|r| r.max_score).sum::<u32>()
        );
        // 2/3 = 66.67 rounds to 67, above the 0.6 threshold
        assert_eq!(report.percentage, 67);
        assert!(report.passed);
    }

    #[test]
    fn pass_threshold_boundary() {
        let form = form_with(
            r#"[
                {"type": "cloze", "points": 3, "blanks": ["a", "b", "c"]},
                {"type": "cloze", "points": 2, "blanks": ["d", "e"]}
            ]"#,
        );
        let mut answers = AnswerSheet::new();
        answers.insert(0, Answer::cloze(vec!["a", "b", "c"]));
        let report = grade(&form, &answers);
        // 3/5 = 0.6 exactly: >= threshold passes
        assert_eq!(report.percentage, 60);
        assert!(report.passed);

        let strict = grade_with(
            &form,
            &answers,
            &GradeConfig {
                pass_threshold: 0.7,
            },
        );
        assert!(!strict.passed);
    }

    #[test]
    fn empty_form_convention() {
        let form = form_with("[]");
        let report = grade(&form, &AnswerSheet::new());
        assert_eq!(report.max_score, 0);
        assert_eq!(report.percentage, 0);
        assert!(!report.passed);
        assert!(report.results.is_empty());
    }

    #[test]
    fn grading_is_idempotent() {
        let form = comprehension_form();
        let answers = sheet(0, Answer::comprehension(vec!["a", "text"]));
        assert_eq!(grade(&form, &answers), grade(&form, &answers));
    }

    #[test]
    fn scores_stay_within_bounds() {
        let form = form_with(
            r#"[
                {"type": "cloze", "points": 5, "blanks": ["a", "b"]},
                {"type": "categorize", "points": 3, "items": [{"text": "x", "category": "A"}]},
                {"type": "comprehension", "points": 4, "subQuestions": [{"question": "q", "correctAnswer": "z"}]}
            ]"#,
        );
        let mut answers = AnswerSheet::new();
        answers.insert(0, Answer::cloze(vec!["a", "wrong"]));
        answers.insert(1, Answer::categorize(vec![AnsweredItem::new("x", "B", "A")]));
        answers.insert(2, Answer::comprehension(vec!["z"]));

        let report = grade(&form, &answers);
        for result in &report.results {
            assert!(result.score <= result.max_score);
        }
        assert_eq!(report.results[2].score, 4);
    }

    #[test]
    fn check_answers_surfaces_not_found_only() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();
        let err = check_answers(&store, missing, &AnswerSheet::new()).unwrap_err();
        assert!(err.is_not_found());

        let saved = store.insert(cloze_form(&["cat"], 1)).unwrap();
        let report =
            check_answers(&store, saved.id, &sheet(0, Answer::cloze(vec!["CAT"]))).unwrap();
        assert_eq!(report.total_score, 1);
        assert!(report.passed);
    }
}
