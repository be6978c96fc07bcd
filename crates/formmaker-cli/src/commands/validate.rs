//! The `formmaker validate` command.

use std::path::PathBuf;

use anyhow::Result;

use formmaker_core::parser;
use formmaker_core::validate::{lint_form, validate_form};

pub fn execute(form_path: PathBuf) -> Result<()> {
    let forms = if form_path.is_dir() {
        parser::load_form_directory(&form_path)?
    } else {
        vec![parser::parse_form(&form_path)?]
    };

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for form in &forms {
        println!("Form: {} ({} questions)", form.title, form.questions.len());

        if let Err(e) = validate_form(form) {
            println!("  ERROR: {e}");
            total_errors += 1;
        }

        let warnings = lint_form(form);
        for w in &warnings {
            let prefix = w
                .question_index
                .map(|i| format!("  [q{}]", i + 1))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_errors == 0 && total_warnings == 0 {
        println!("All forms valid.");
    } else {
        println!("\n{total_errors} error(s), {total_warnings} warning(s) found.");
    }

    anyhow::ensure!(total_errors == 0, "validation failed");

    Ok(())
}
