//! The `formmaker grade` command.

use std::path::PathBuf;

use anyhow::Result;

use formmaker_core::grade::{grade_with, GradeConfig};
use formmaker_core::parser::{parse_answers, parse_form};
use formmaker_core::report::{GradeReport, GradedSubmission};

use crate::config::load_config_from;

pub fn execute(
    form_path: PathBuf,
    answers_path: PathBuf,
    format: String,
    output: Option<PathBuf>,
    pass_threshold: Option<f64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let threshold = pass_threshold.unwrap_or(config.pass_threshold);
    anyhow::ensure!(
        (0.0..=1.0).contains(&threshold),
        "pass threshold must be between 0.0 and 1.0"
    );

    let form = parse_form(&form_path)?;
    let answers = parse_answers(&answers_path)?;
    tracing::debug!(
        "grading '{}': {} questions, {} answers",
        form.title,
        form.questions.len(),
        answers.len()
    );

    let report = grade_with(
        &form,
        &answers,
        &GradeConfig {
            pass_threshold: threshold,
        },
    );

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        _ => {
            print_table(&report);
        }
    }

    if let Some(output) = output {
        let submission = GradedSubmission::new(&form, report);
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let path = output.join(format!("grade-{timestamp}.json"));
        submission.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_table(report: &GradeReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Type", "Score", "Correct", "Feedback"]);

    for r in &report.results {
        table.add_row(vec![
            Cell::new(r.question_index + 1),
            Cell::new(r.question_type),
            Cell::new(format!("{}/{}", r.score, r.max_score)),
            Cell::new(if r.is_correct { "yes" } else { "no" }),
            Cell::new(&r.feedback),
        ]);
    }

    println!("{table}");
    println!(
        "\nScore: {}/{} ({}%) — {}",
        report.total_score,
        report.max_score,
        report.percentage,
        if report.passed { "PASSED" } else { "FAILED" }
    );
}
