//! Core data model types for formsmith.
//!
//! A [`Form`] owns an ordered list of [`Question`]s. Each question carries
//! exactly one [`Content`] variant, and the variant is the question's type:
//! there is no separate type field that could drift from the payload.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce::Answer;
use crate::content::{check_content, default_content, update_content, ContentPatch};
use crate::error::{ContentError, FormError};

/// The closed set of question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Categorize,
    Cloze,
    Comprehension,
    MultipleChoice,
}

impl QuestionType {
    /// Every question type, in palette order.
    pub const ALL: [QuestionType; 4] = [
        QuestionType::Categorize,
        QuestionType::Cloze,
        QuestionType::Comprehension,
        QuestionType::MultipleChoice,
    ];

    /// The wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Categorize => "categorize",
            QuestionType::Cloze => "cloze",
            QuestionType::Comprehension => "comprehension",
            QuestionType::MultipleChoice => "multiple-choice",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "categorize" | "categorise" => Ok(QuestionType::Categorize),
            "cloze" => Ok(QuestionType::Cloze),
            "comprehension" => Ok(QuestionType::Comprehension),
            "multiple-choice" | "multiple_choice" | "multiplechoice" | "mcq" => {
                Ok(QuestionType::MultipleChoice)
            }
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Items to be sorted into categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizeContent {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A passage whose `<u>…</u>` spans become blanks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClozeContent {
    #[serde(default)]
    pub text: String,
}

/// One multiple-choice item under a comprehension passage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprehensionItem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Index into `options`.
    #[serde(default)]
    pub correct: usize,
}

/// A reading passage followed by multiple-choice items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprehensionContent {
    #[serde(default)]
    pub passage: String,
    #[serde(default)]
    pub questions: Vec<ComprehensionItem>,
}

/// A single question with one correct option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceContent {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Index into `options`.
    #[serde(default)]
    pub correct: usize,
}

/// Variant-specific question payload.
///
/// Serialized adjacently tagged, so a question reads
/// `{"type": "cloze", "content": {"text": "..."}}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum Content {
    Categorize(CategorizeContent),
    Cloze(ClozeContent),
    Comprehension(ComprehensionContent),
    MultipleChoice(MultipleChoiceContent),
}

impl Content {
    /// The question type this payload belongs to.
    pub fn question_type(&self) -> QuestionType {
        match self {
            Content::Categorize(_) => QuestionType::Categorize,
            Content::Cloze(_) => QuestionType::Cloze,
            Content::Comprehension(_) => QuestionType::Comprehension,
            Content::MultipleChoice(_) => QuestionType::MultipleChoice,
        }
    }
}

/// One typed unit of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Author-assigned identifier, unique within its form.
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    content: Content,
}

impl Question {
    /// A fresh question of the given type with starter content.
    pub fn new(id: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            id: id.into(),
            title: default_title(question_type),
            content: default_content(question_type),
        }
    }

    /// A question with explicit title and content.
    pub fn with_content(id: impl Into<String>, title: impl Into<String>, content: Content) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.content.question_type()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Merge an editor patch into this question's content.
    ///
    /// The question type never changes; a patch for another type is rejected
    /// and the content is left as it was.
    pub fn apply_patch(&mut self, patch: ContentPatch) -> Result<(), ContentError> {
        self.content = update_content(&self.content, patch)?;
        Ok(())
    }
}

/// Title given to a question freshly added from the palette.
pub fn default_title(question_type: QuestionType) -> String {
    format!("New {question_type} question")
}

/// A stored form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Owner reference.
    pub created_by: String,
    #[serde(default)]
    pub is_published: bool,
    /// Opaque token, assigned once when the form is first stored.
    pub shareable_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Look up a question by id. The first match wins if ids repeat.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// What an author submits when creating or updating a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub header_image: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub is_published: bool,
}

impl FormDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Trim text fields and reject a blank title.
    ///
    /// Optional fields that are blank after trimming become `None`. Question
    /// ids must be non-empty and unique, and every question's content must
    /// pass [`check_content`].
    pub fn normalized(self) -> Result<Self, FormError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(FormError::InvalidForm("title is required".into()));
        }

        let mut seen = HashSet::new();
        for question in &self.questions {
            if question.id.trim().is_empty() {
                return Err(FormError::InvalidForm("question id is required".into()));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(FormError::InvalidForm(format!(
                    "duplicate question id: {}",
                    question.id
                )));
            }
            check_content(question.content())?;
        }
        Ok(Self {
            title,
            description: trimmed(self.description),
            header_image: trimmed(self.header_image),
            questions: self.questions,
            is_published: self.is_published,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request metadata recorded alongside a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMeta {
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// One respondent's submission against a form. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: String,
    pub form_id: String,
    /// Normalized answers keyed by question id; unanswered questions are absent.
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// A dashboard row for one of the owner's forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_published: bool,
    pub shareable_link: String,
    pub created_at: DateTime<Utc>,
    /// Number of responses collected so far.
    pub responses: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::MultipleChoice.to_string(), "multiple-choice");
        assert_eq!(QuestionType::Cloze.to_string(), "cloze");
        assert_eq!(
            "multiple-choice".parse::<QuestionType>().unwrap(),
            QuestionType::MultipleChoice
        );
        assert_eq!(
            "Multiple_Choice".parse::<QuestionType>().unwrap(),
            QuestionType::MultipleChoice
        );
        assert_eq!(
            "categorise".parse::<QuestionType>().unwrap(),
            QuestionType::Categorize
        );
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn question_wire_shape() {
        let question = Question::with_content(
            "q1",
            "Blanks",
            Content::Cloze(ClozeContent {
                text: "A <u>b</u>".into(),
            }),
        );
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "q1",
                "title": "Blanks",
                "type": "cloze",
                "content": { "text": "A <u>b</u>" }
            })
        );

        let back: Question = serde_json::from_value(value).unwrap();
        assert_eq!(back.question_type(), QuestionType::Cloze);
        assert_eq!(back, question);
    }

    #[test]
    fn question_rejects_unknown_type() {
        let value = json!({ "id": "q1", "type": "essay", "content": {} });
        assert!(serde_json::from_value::<Question>(value).is_err());
    }

    #[test]
    fn new_question_uses_starter_content() {
        let question = Question::new("q7", QuestionType::MultipleChoice);
        assert_eq!(question.title, "New multiple-choice question");
        match question.content() {
            Content::MultipleChoice(mc) => assert_eq!(mc.options.len(), 4),
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn draft_normalization_trims_and_requires_title() {
        let draft = FormDraft {
            title: "  Survey  ".into(),
            description: Some("   ".into()),
            header_image: Some(" https://example.com/a.png ".into()),
            ..Default::default()
        };
        let draft = draft.normalized().unwrap();
        assert_eq!(draft.title, "Survey");
        assert_eq!(draft.description, None);
        assert_eq!(
            draft.header_image.as_deref(),
            Some("https://example.com/a.png")
        );

        let blank = FormDraft::new("   ");
        assert!(matches!(
            blank.normalized(),
            Err(FormError::InvalidForm(_))
        ));
    }

    #[test]
    fn draft_normalization_rejects_bad_question_ids() {
        let mut draft = FormDraft::new("Quiz");
        draft.questions = vec![
            Question::new("q1", QuestionType::Cloze),
            Question::new("q1", QuestionType::MultipleChoice),
        ];
        let err = draft.normalized().unwrap_err();
        assert_eq!(err.to_string(), "invalid form: duplicate question id: q1");

        let mut draft = FormDraft::new("Quiz");
        draft.questions = vec![Question::new("  ", QuestionType::Cloze)];
        assert!(matches!(
            draft.normalized(),
            Err(FormError::InvalidForm(_))
        ));
    }

    #[test]
    fn draft_normalization_checks_content() {
        let mut draft = FormDraft::new("Quiz");
        draft.questions = vec![Question::with_content(
            "capital",
            "Geography",
            Content::MultipleChoice(MultipleChoiceContent {
                question: "Capital of France?".into(),
                options: vec!["Berlin".into(), "Paris".into()],
                correct: 5,
            }),
        )];
        assert!(matches!(
            draft.normalized(),
            Err(FormError::Content(ContentError::CorrectOutOfRange {
                correct: 5,
                options: 2
            }))
        ));
    }

    #[test]
    fn form_uses_camel_case_fields() {
        let now = Utc::now();
        let form = Form {
            id: "f1".into(),
            title: "T".into(),
            description: None,
            header_image: Some("https://example.com/h.png".into()),
            questions: vec![],
            created_by: "alice".into(),
            is_published: true,
            shareable_link: "abc123".into(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["headerImage"], "https://example.com/h.png");
        assert_eq!(value["isPublished"], true);
        assert_eq!(value["shareableLink"], "abc123");
        assert_eq!(value["createdBy"], "alice");
        assert!(value.get("description").is_none());
    }
}
