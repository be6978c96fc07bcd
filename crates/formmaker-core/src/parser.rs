//! JSON form and answer loading.
//!
//! Forms are stored and exchanged as JSON documents. This module loads
//! them from files and directories, and classifies decode failures for
//! the store boundary.

use std::path::Path;

use anyhow::{Context, Result};

use crate::answer::AnswerSheet;
use crate::error::FormError;
use crate::model::Form;

/// Parse a single JSON file into a `Form`.
pub fn parse_form(path: &Path) -> Result<Form> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form file: {}", path.display()))?;
    parse_form_str(&content, path)
}

/// Parse a JSON string into a `Form` (useful for testing).
pub fn parse_form_str(content: &str, source_path: &Path) -> Result<Form> {
    serde_json::from_str(content)
        .with_context(|| format!("failed to parse form: {}", source_path.display()))
}

/// Parse a JSON file into an `AnswerSheet`.
pub fn parse_answers(path: &Path) -> Result<AnswerSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers: {}", path.display()))
}

/// Decode a form from a JSON payload, classifying the failure for the
/// boundary: wrong-typed fields report as a type mismatch, anything that
/// is not JSON at all as malformed.
pub fn form_from_json(payload: &str) -> Result<Form, FormError> {
    serde_json::from_str(payload).map_err(|e| match e.classify() {
        serde_json::error::Category::Data => FormError::TypeMismatch(e.to_string()),
        _ => FormError::Malformed(e.to_string()),
    })
}

/// Recursively load all `.json` form files from a directory.
///
/// Files that fail to parse are skipped with a warning rather than
/// aborting the whole load.
pub fn load_form_directory(dir: &Path) -> Result<Vec<Form>> {
    let mut forms = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            forms.extend(load_form_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match parse_form(&path) {
                Ok(form) => forms.push(form),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(forms)
}
