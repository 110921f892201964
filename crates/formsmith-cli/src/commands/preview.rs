//! The `formsmith preview` command.

use std::path::PathBuf;

use anyhow::Result;

use formsmith_core::cloze::{self, Segment};
use formsmith_core::model::{Content, Question};
use formsmith_core::parser;
use formsmith_core::review::question_label;
use formsmith_core::word_bank::WordBank;

pub fn execute(form_path: PathBuf) -> Result<()> {
    let form = parser::parse_form(&form_path)?;

    println!("{}", form.title);
    if let Some(description) = &form.description {
        println!("{description}");
    }
    if let Some(image) = &form.header_image {
        println!("Header image: {image}");
    }

    for (n, question) in form.questions.iter().enumerate() {
        println!();
        println!(
            "{}. [{}] {}",
            n + 1,
            question.question_type(),
            question_label(Some(question), &question.id)
        );
        for line in render_question(question) {
            println!("   {line}");
        }
    }

    Ok(())
}

fn render_question(question: &Question) -> Vec<String> {
    match question.content() {
        Content::Categorize(c) => vec![
            format!("Items: {}", c.items.join(", ")),
            format!("Categories: {}", c.categories.join(", ")),
        ],
        Content::Cloze(c) => {
            let mut lines = vec![render_cloze(&c.text)];
            let answers = cloze::extract_answers(&c.text);
            if answers.is_empty() {
                lines.push("(no blanks)".to_string());
            } else {
                let key: Vec<String> = answers
                    .iter()
                    .enumerate()
                    .map(|(i, a)| format!("{}) {a}", i + 1))
                    .collect();
                lines.push(format!("Answer key: {}", key.join("  ")));

                let bank = WordBank::new(answers);
                let mut words = bank.available();
                words.sort_unstable();
                lines.push(format!("Word bank: {}", words.join(", ")));
            }
            lines
        }
        Content::Comprehension(c) => {
            let mut lines = vec![c.passage.clone()];
            for (i, item) in c.questions.iter().enumerate() {
                lines.push(format!("Q{}: {}", i + 1, item.question));
                lines.extend(render_options(&item.options, item.correct));
            }
            lines
        }
        Content::MultipleChoice(c) => {
            let mut lines = vec![c.question.clone()];
            lines.extend(render_options(&c.options, c.correct));
            lines
        }
    }
}

/// Blanks become `[1]`, `[2]`, ... in reading order.
fn render_cloze(text: &str) -> String {
    cloze::parse(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Literal(t) => t,
            Segment::Blank { index, .. } => format!("[{}]", index + 1),
        })
        .collect()
}

fn render_options(options: &[String], correct: usize) -> Vec<String> {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let marker = if i == correct { '*' } else { ' ' };
            format!("  {marker} {}) {option}", (b'a' + (i % 26) as u8) as char)
        })
        .collect()
}
