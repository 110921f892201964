//! The `formsmith check` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Map;

use formsmith_core::parser;
use formsmith_core::progress::{progress, unanswered};
use formsmith_core::review::question_label;
use formsmith_core::normalize_answers;

use super::read_answers;

pub fn execute(form_path: PathBuf, answers_arg: String) -> Result<()> {
    let form = parser::parse_form(&form_path)?;
    let raw = read_answers(&answers_arg)?;

    let empty = Map::new();
    let submitted = raw.as_object().unwrap_or(&empty);
    if !raw.is_object() {
        eprintln!("Warning: answers are not a JSON object; treating as empty.");
    }

    let p = progress(&form.questions, submitted);
    println!(
        "Progress: {}/{} answered ({:.0}%)",
        p.answered,
        p.total,
        p.ratio() * 100.0
    );
    for question in unanswered(&form.questions, submitted) {
        println!(
            "  unanswered: {} ({})",
            question_label(Some(question), &question.id),
            question.id
        );
    }

    let normalized = normalize_answers(&form.questions, &raw);
    let json =
        serde_json::to_string_pretty(&normalized).context("failed to serialize answers")?;
    println!("Normalized answers:\n{json}");

    Ok(())
}
