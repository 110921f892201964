//! The `formsmith validate` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use formsmith_core::model::FormDraft;
use formsmith_core::parser;

pub fn execute(form_path: PathBuf) -> Result<()> {
    let forms = if form_path.is_dir() {
        let forms = parser::load_form_directory(&form_path)?;
        anyhow::ensure!(
            !forms.is_empty(),
            "no readable form files in {}",
            form_path.display()
        );
        forms
    } else {
        vec![parser::parse_form(&form_path)?]
    };

    let mut total_warnings = 0;

    for form in &forms {
        println!(
            "Form: {} ({} questions, {})",
            form.title,
            form.questions.len(),
            if form.is_published { "published" } else { "draft" }
        );
        if !form.questions.is_empty() {
            println!("  {}", type_breakdown(form));
        }

        for w in parser::validate_form(form) {
            println!("  WARNING: {w}");
            total_warnings += 1;
        }
    }

    if total_warnings == 0 {
        println!("All forms valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

/// e.g. `cloze: 2, multiple-choice: 1`
fn type_breakdown(form: &FormDraft) -> String {
    let mut counts = BTreeMap::new();
    for question in &form.questions {
        *counts.entry(question.question_type()).or_insert(0usize) += 1;
    }
    counts
        .iter()
        .map(|(question_type, n)| format!("{question_type}: {n}"))
        .collect::<Vec<_>>()
        .join(", ")
}
