//! TOML form definition parser.
//!
//! Loads form drafts from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cloze;
use crate::content::default_content;
use crate::model::{default_title, Content, FormDraft, Question, QuestionType};

/// Intermediate TOML structure for parsing form files.
#[derive(Debug, Deserialize)]
struct TomlFormFile {
    form: TomlFormHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlFormHeader {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    header_image: Option<String>,
    #[serde(default)]
    published: bool,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    question_type: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<toml::Value>,
}

impl TomlQuestion {
    fn into_question(self) -> Result<Question> {
        let question_type: QuestionType = self
            .question_type
            .parse()
            .map_err(|e: String| anyhow::anyhow!("question '{}': {}", self.id, e))?;

        let content = match self.content {
            Some(value) => content_from_toml(question_type, value)
                .with_context(|| format!("question '{}': invalid content", self.id))?,
            None => default_content(question_type),
        };

        let title = self.title.unwrap_or_else(|| default_title(question_type));
        Ok(Question::with_content(self.id, title, content))
    }
}

fn content_from_toml(question_type: QuestionType, value: toml::Value) -> Result<Content> {
    Ok(match question_type {
        QuestionType::Categorize => Content::Categorize(value.try_into()?),
        QuestionType::Cloze => Content::Cloze(value.try_into()?),
        QuestionType::Comprehension => Content::Comprehension(value.try_into()?),
        QuestionType::MultipleChoice => Content::MultipleChoice(value.try_into()?),
    })
}

/// Parse a single TOML file into a `FormDraft`.
pub fn parse_form(path: &Path) -> Result<FormDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form file: {}", path.display()))?;

    parse_form_str(&content, path)
}

/// Parse a TOML string into a `FormDraft` (useful for testing).
pub fn parse_form_str(content: &str, source_path: &Path) -> Result<FormDraft> {
    let parsed: TomlFormFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(TomlQuestion::into_question)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("in {}", source_path.display()))?;

    Ok(FormDraft {
        title: parsed.form.title,
        description: parsed.form.description,
        header_image: parsed.form.header_image,
        questions,
        is_published: parsed.form.published,
    })
}

/// Recursively load all `.toml` form files from a directory.
pub fn load_form_directory(dir: &Path) -> Result<Vec<FormDraft>> {
    let mut forms = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            forms.extend(load_form_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_form(&path) {
                Ok(form) => forms.push(form),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(forms)
}

/// A warning from form validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn form(message: impl Into<String>) -> Self {
        Self {
            question_id: None,
            message: message.into(),
        }
    }

    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.question_id {
            Some(id) => write!(f, "[{id}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Validate a form draft for common authoring mistakes.
///
/// None of these block publishing; respondents can still submit against
/// such a form.
pub fn validate_form(form: &FormDraft) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if form.title.trim().is_empty() {
        warnings.push(ValidationWarning::form("form title is empty"));
    }

    let mut seen_ids = HashSet::new();
    for question in &form.questions {
        if question.id.trim().is_empty() {
            warnings.push(ValidationWarning::question(&question.id, "question id is empty"));
        } else if !seen_ids.insert(question.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &question.id,
                format!("duplicate question ID: {}", question.id),
            ));
        }
    }

    for question in &form.questions {
        warnings.extend(
            content_warnings(question.content())
                .into_iter()
                .map(|message| ValidationWarning::question(&question.id, message)),
        );
    }

    warnings
}

fn content_warnings(content: &Content) -> Vec<String> {
    let mut messages = Vec::new();
    match content {
        Content::Categorize(c) => {
            if c.items.is_empty() {
                messages.push("categorize question has no items".to_string());
            }
            if c.categories.is_empty() {
                messages.push("categorize question has no categories".to_string());
            }
        }
        Content::Cloze(c) => {
            if cloze::blank_count(&c.text) == 0 {
                messages.push("cloze text has no blanks".to_string());
            }
            let stray = cloze::stray_markers(&c.text);
            if stray > 0 {
                messages.push(format!("cloze text has {stray} unmatched <u>/</u> marker(s)"));
            }
        }
        Content::Comprehension(c) => {
            if c.questions.is_empty() {
                messages.push("comprehension passage has no questions".to_string());
            }
            for (n, item) in c.questions.iter().enumerate() {
                if let Some(problem) = option_problem(&item.options, item.correct) {
                    messages.push(format!("item {}: {problem}", n + 1));
                }
            }
        }
        Content::MultipleChoice(c) => {
            if let Some(problem) = option_problem(&c.options, c.correct) {
                messages.push(problem);
            }
        }
    }
    messages
}

fn option_problem(options: &[String], correct: usize) -> Option<String> {
    if options.is_empty() {
        Some("options list is empty".to_string())
    } else if correct >= options.len() {
        Some(format!(
            "correct index {correct} is out of range ({} options)",
            options.len()
        ))
    } else {
        None
    }
}
