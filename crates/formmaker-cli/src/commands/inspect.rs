//! The `formmaker inspect` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use formmaker_core::model::QuestionKind;
use formmaker_core::parser::parse_form;

pub fn execute(form_path: PathBuf) -> Result<()> {
    let form = parse_form(&form_path)?;

    println!("Form: {}", form.title);
    if let Some(description) = &form.description {
        println!("{description}");
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Type", "Title", "Points", "Parts"]);

    for (index, question) in form.questions.iter().enumerate() {
        let parts = match &question.kind {
            QuestionKind::Categorize { categories, items } => {
                format!("{} items / {} categories", items.len(), categories.len())
            }
            QuestionKind::Cloze { blanks, options, .. } => {
                format!("{} blanks / {} options", blanks.len(), options.len())
            }
            QuestionKind::Comprehension { sub_questions, .. } => {
                format!("{} sub-questions", sub_questions.len())
            }
        };

        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(question.kind.question_type()),
            Cell::new(question.title.as_deref().unwrap_or("(untitled)")),
            Cell::new(question.points),
            Cell::new(parts),
        ]);
    }

    println!("{table}");
    println!("\nMax score: {}", form.max_score());

    Ok(())
}
