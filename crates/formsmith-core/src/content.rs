//! Starter content and shallow-merge editing for question payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ContentError;
use crate::model::{
    CategorizeContent, ClozeContent, ComprehensionContent, ComprehensionItem, Content,
    MultipleChoiceContent, QuestionType,
};

/// Passage given to a freshly added cloze question.
pub const SAMPLE_CLOZE_TEXT: &str =
    "The quick brown fox jumps over the <u>lazy</u> dog and runs through the <u>forest</u>.";

/// Starter payload for a question just added to a form.
pub fn default_content(question_type: QuestionType) -> Content {
    match question_type {
        QuestionType::Categorize => Content::Categorize(CategorizeContent {
            items: strings(&["Item 1", "Item 2"]),
            categories: strings(&["Category A", "Category B"]),
        }),
        QuestionType::Cloze => Content::Cloze(ClozeContent {
            text: SAMPLE_CLOZE_TEXT.to_string(),
        }),
        QuestionType::Comprehension => Content::Comprehension(ComprehensionContent {
            passage: "Enter your passage here...".to_string(),
            questions: vec![ComprehensionItem {
                question: "Sample question?".to_string(),
                options: strings(&["A", "B", "C", "D"]),
                correct: 0,
            }],
        }),
        QuestionType::MultipleChoice => Content::MultipleChoice(MultipleChoiceContent {
            question: "Your question here?".to_string(),
            options: strings(&["Option A", "Option B", "Option C", "Option D"]),
            correct: 0,
        }),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizePatch {
    #[serde(default)]
    pub items: Option<Vec<String>>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClozePatch {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprehensionPatch {
    #[serde(default)]
    pub passage: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<ComprehensionItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoicePatch {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct: Option<usize>,
}

/// A partial content update. Fields left as `None` keep their current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPatch {
    Categorize(CategorizePatch),
    Cloze(ClozePatch),
    Comprehension(ComprehensionPatch),
    MultipleChoice(MultipleChoicePatch),
}

impl ContentPatch {
    pub fn question_type(&self) -> QuestionType {
        match self {
            ContentPatch::Categorize(_) => QuestionType::Categorize,
            ContentPatch::Cloze(_) => QuestionType::Cloze,
            ContentPatch::Comprehension(_) => QuestionType::Comprehension,
            ContentPatch::MultipleChoice(_) => QuestionType::MultipleChoice,
        }
    }

    /// Read an untyped editor payload as a patch for `question_type`.
    ///
    /// Keys that do not belong to that type are ignored; a known key holding
    /// the wrong shape is an error.
    pub fn from_json(question_type: QuestionType, value: Value) -> Result<Self, ContentError> {
        let malformed = |e: serde_json::Error| ContentError::Malformed {
            question_type,
            message: e.to_string(),
        };
        Ok(match question_type {
            QuestionType::Categorize => {
                ContentPatch::Categorize(serde_json::from_value(value).map_err(malformed)?)
            }
            QuestionType::Cloze => {
                ContentPatch::Cloze(serde_json::from_value(value).map_err(malformed)?)
            }
            QuestionType::Comprehension => {
                ContentPatch::Comprehension(serde_json::from_value(value).map_err(malformed)?)
            }
            QuestionType::MultipleChoice => {
                ContentPatch::MultipleChoice(serde_json::from_value(value).map_err(malformed)?)
            }
        })
    }
}

/// Check that every `correct` index points into its option list.
pub fn check_content(content: &Content) -> Result<(), ContentError> {
    match content {
        Content::MultipleChoice(c) if c.correct >= c.options.len() => {
            Err(ContentError::CorrectOutOfRange {
                correct: c.correct,
                options: c.options.len(),
            })
        }
        Content::Comprehension(c) => {
            match c
                .questions
                .iter()
                .position(|item| item.correct >= item.options.len())
            {
                Some(item) => Err(ContentError::ItemCorrectOutOfRange {
                    item,
                    correct: c.questions[item].correct,
                    options: c.questions[item].options.len(),
                }),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

/// Shallow-merge `patch` into `existing`, keeping the content type.
///
/// The merged content must pass [`check_content`]; shrinking `options`
/// below the current `correct` is rejected like an out-of-range `correct`.
pub fn update_content(existing: &Content, patch: ContentPatch) -> Result<Content, ContentError> {
    let merged = merge_patch(existing, patch)?;
    check_content(&merged)?;
    Ok(merged)
}

fn merge_patch(existing: &Content, patch: ContentPatch) -> Result<Content, ContentError> {
    match (existing, patch) {
        (Content::Categorize(current), ContentPatch::Categorize(p)) => {
            Ok(Content::Categorize(CategorizeContent {
                items: p.items.unwrap_or_else(|| current.items.clone()),
                categories: p.categories.unwrap_or_else(|| current.categories.clone()),
            }))
        }
        (Content::Cloze(current), ContentPatch::Cloze(p)) => Ok(Content::Cloze(ClozeContent {
            text: p.text.unwrap_or_else(|| current.text.clone()),
        })),
        (Content::Comprehension(current), ContentPatch::Comprehension(p)) => {
            Ok(Content::Comprehension(ComprehensionContent {
                passage: p.passage.unwrap_or_else(|| current.passage.clone()),
                questions: p.questions.unwrap_or_else(|| current.questions.clone()),
            }))
        }
        (Content::MultipleChoice(current), ContentPatch::MultipleChoice(p)) => {
            Ok(Content::MultipleChoice(MultipleChoiceContent {
                question: p.question.unwrap_or_else(|| current.question.clone()),
                options: p.options.unwrap_or_else(|| current.options.clone()),
                correct: p.correct.unwrap_or(current.correct),
            }))
        }
        (existing, patch) => Err(ContentError::TypeMismatch {
            expected: existing.question_type(),
            found: patch.question_type(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloze;
    use crate::model::Question;
    use serde_json::json;

    #[test]
    fn defaults_match_their_type() {
        for question_type in QuestionType::ALL {
            assert_eq!(default_content(question_type).question_type(), question_type);
        }
    }

    #[test]
    fn default_cloze_has_blanks() {
        let Content::Cloze(cloze_content) = default_content(QuestionType::Cloze) else {
            panic!("expected cloze content");
        };
        assert_eq!(
            cloze::extract_answers(&cloze_content.text),
            vec!["lazy", "forest"]
        );
    }

    #[test]
    fn default_categorize_and_comprehension_are_non_empty() {
        let Content::Categorize(c) = default_content(QuestionType::Categorize) else {
            panic!("expected categorize content");
        };
        assert!(!c.items.is_empty() && !c.categories.is_empty());

        let Content::Comprehension(c) = default_content(QuestionType::Comprehension) else {
            panic!("expected comprehension content");
        };
        assert_eq!(c.questions.len(), 1);
        assert_eq!(c.questions[0].options.len(), 4);
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let existing = default_content(QuestionType::MultipleChoice);
        let updated = update_content(
            &existing,
            ContentPatch::MultipleChoice(MultipleChoicePatch {
                correct: Some(2),
                ..Default::default()
            }),
        )
        .unwrap();

        let (Content::MultipleChoice(before), Content::MultipleChoice(after)) =
            (&existing, &updated)
        else {
            panic!("type changed");
        };
        assert_eq!(after.correct, 2);
        assert_eq!(after.question, before.question);
        assert_eq!(after.options, before.options);
    }

    #[test]
    fn correct_must_stay_within_options() {
        let existing = default_content(QuestionType::MultipleChoice);
        let err = update_content(
            &existing,
            ContentPatch::MultipleChoice(MultipleChoicePatch {
                correct: Some(99),
                ..Default::default()
            }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContentError::CorrectOutOfRange {
                correct: 99,
                options: 4
            }
        );

        // shrinking the options under the current answer
        let picked_last = update_content(
            &existing,
            ContentPatch::MultipleChoice(MultipleChoicePatch {
                correct: Some(3),
                ..Default::default()
            }),
        )
        .unwrap();
        let err = update_content(
            &picked_last,
            ContentPatch::MultipleChoice(MultipleChoicePatch {
                options: Some(vec!["Yes".into(), "No".into()]),
                ..Default::default()
            }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContentError::CorrectOutOfRange {
                correct: 3,
                options: 2
            }
        );

        // shrinking together with a new answer is fine
        let ok = update_content(
            &picked_last,
            ContentPatch::MultipleChoice(MultipleChoicePatch {
                options: Some(vec!["Yes".into(), "No".into()]),
                correct: Some(1),
                ..Default::default()
            }),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn comprehension_items_are_checked() {
        let existing = default_content(QuestionType::Comprehension);
        let patch = ContentPatch::from_json(
            QuestionType::Comprehension,
            json!({ "questions": [
                { "question": "Fine?", "options": ["a", "b"], "correct": 1 },
                { "question": "Broken?", "options": ["a"], "correct": 2 }
            ] }),
        )
        .unwrap();
        let err = update_content(&existing, patch).unwrap_err();
        assert_eq!(
            err,
            ContentError::ItemCorrectOutOfRange {
                item: 1,
                correct: 2,
                options: 1
            }
        );
        assert_eq!(
            err.to_string(),
            "item 2: correct index 2 is out of range (1 options)"
        );
    }

    #[test]
    fn defaults_pass_the_content_check() {
        for question_type in QuestionType::ALL {
            assert!(check_content(&default_content(question_type)).is_ok());
        }
    }

    #[test]
    fn patch_of_other_type_is_rejected() {
        let existing = default_content(QuestionType::Cloze);
        let err = update_content(
            &existing,
            ContentPatch::Categorize(CategorizePatch::default()),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContentError::TypeMismatch {
                expected: QuestionType::Cloze,
                found: QuestionType::Categorize,
            }
        );
    }

    #[test]
    fn question_apply_patch_keeps_type() {
        let mut question = Question::new("q1", QuestionType::Categorize);
        let patch =
            ContentPatch::from_json(QuestionType::Categorize, json!({ "items": ["Cat", "Dog"] }))
                .unwrap();
        question.apply_patch(patch).unwrap();
        let Content::Categorize(c) = question.content() else {
            panic!("type changed");
        };
        assert_eq!(c.items, vec!["Cat", "Dog"]);
        assert_eq!(c.categories, vec!["Category A", "Category B"]);

        let wrong = ContentPatch::Cloze(ClozePatch {
            text: Some("x".into()),
        });
        assert!(question.apply_patch(wrong).is_err());
        assert_eq!(question.question_type(), QuestionType::Categorize);
    }

    #[test]
    fn from_json_ignores_foreign_keys_and_rejects_bad_shapes() {
        let patch = ContentPatch::from_json(
            QuestionType::Cloze,
            json!({ "text": "a <u>b</u>", "items": [1, 2] }),
        )
        .unwrap();
        assert_eq!(
            patch,
            ContentPatch::Cloze(ClozePatch {
                text: Some("a <u>b</u>".into())
            })
        );

        let err = ContentPatch::from_json(QuestionType::MultipleChoice, json!({ "correct": "x" }))
            .unwrap_err();
        assert!(matches!(
            err,
            ContentError::Malformed {
                question_type: QuestionType::MultipleChoice,
                ..
            }
        ));
    }
}
