//! Response review.
//!
//! Joins a stored response with the form's current questions. Answers whose
//! question has since been removed are kept and flagged as orphans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce::Answer;
use crate::model::{Form, Question, QuestionType, Response};

/// One answer as shown to the form owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedAnswer {
    pub question_id: String,
    pub label: String,
    /// `None` for orphans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    pub answer: Answer,
    #[serde(default)]
    pub orphaned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedResponse {
    pub response_id: String,
    pub submitted_at: DateTime<Utc>,
    pub answers: Vec<ReviewedAnswer>,
}

/// Display label for a question id: the question's title, or
/// `"Question {id}"` when the question is gone or untitled.
pub fn question_label(question: Option<&Question>, id: &str) -> String {
    question
        .map(|q| q.title.trim())
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Question {id}"))
}

/// Answers in form order, then orphaned keys in key order.
pub fn review_response(form: &Form, response: &Response) -> ReviewedResponse {
    let mut answers: Vec<ReviewedAnswer> = form
        .questions
        .iter()
        .filter_map(|question| {
            let answer = response.answers.get(&question.id)?;
            Some(ReviewedAnswer {
                question_id: question.id.clone(),
                label: question_label(Some(question), &question.id),
                question_type: Some(question.question_type()),
                answer: answer.clone(),
                orphaned: false,
            })
        })
        .collect();

    answers.extend(
        response
            .answers
            .iter()
            .filter(|(id, _)| form.question(id).is_none())
            .map(|(id, answer)| ReviewedAnswer {
                question_id: id.clone(),
                label: question_label(None, id),
                question_type: None,
                answer: answer.clone(),
                orphaned: true,
            }),
    );

    ReviewedResponse {
        response_id: response.id.clone(),
        submitted_at: response.submitted_at,
        answers,
    }
}

pub fn review_responses(form: &Form, responses: &[Response]) -> Vec<ReviewedResponse> {
    responses
        .iter()
        .map(|response| review_response(form, response))
        .collect()
}
