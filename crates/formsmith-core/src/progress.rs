//! Completion and progress evaluation.
//!
//! Decides whether a question counts as answered, for the progress bar and
//! for the "some questions are not answered" confirmation before submit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::Answer;
use crate::model::{Question, QuestionType};

/// Whether `answer` counts as an answer to a question of `question_type`.
///
/// - categorize, comprehension: an object with at least one key
/// - cloze: an array with at least one entry that is neither `""` nor `null`
/// - multiple-choice: any present, non-null value (`0` is the first option)
///
/// A value of the wrong shape is unanswered.
pub fn is_answered(question_type: QuestionType, answer: Option<&Value>) -> bool {
    let Some(answer) = answer else {
        return false;
    };
    match question_type {
        QuestionType::Categorize | QuestionType::Comprehension => {
            answer.as_object().is_some_and(|map| !map.is_empty())
        }
        QuestionType::Cloze => answer
            .as_array()
            .is_some_and(|blanks| blanks.iter().any(is_filled_blank)),
        QuestionType::MultipleChoice => !answer.is_null(),
    }
}

fn is_filled_blank(blank: &Value) -> bool {
    match blank {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl Answer {
    /// Apply [`is_answered`] to a stored answer.
    pub fn is_answered(&self, question_type: QuestionType) -> bool {
        match (question_type, self) {
            (_, Answer::Raw(value)) => is_answered(question_type, Some(value)),
            (QuestionType::MultipleChoice, _) => true,
            (QuestionType::Categorize | QuestionType::Comprehension, Answer::Mapping(map)) => {
                !map.is_empty()
            }
            (QuestionType::Cloze, Answer::Sequence(blanks)) => blanks.iter().any(is_filled_blank),
            _ => false,
        }
    }
}

/// Aggregate progress over a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction answered in `0.0..=1.0`. A form with no questions is complete.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.answered as f64 / self.total as f64
        }
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }

    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }
}

/// Count answered questions given the respondent's current answers.
pub fn progress(questions: &[Question], answers: &Map<String, Value>) -> Progress {
    let answered = questions
        .iter()
        .filter(|q| is_answered(q.question_type(), answers.get(&q.id)))
        .count();
    Progress {
        answered,
        total: questions.len(),
    }
}

/// Questions that would trigger the submit confirmation.
pub fn unanswered<'a>(questions: &'a [Question], answers: &Map<String, Value>) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| !is_answered(q.question_type(), answers.get(&q.id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn multiple_choice_zero_is_answered() {
        assert!(is_answered(QuestionType::MultipleChoice, Some(&json!(0))));
        assert!(is_answered(QuestionType::MultipleChoice, Some(&json!(-1))));
        assert!(!is_answered(QuestionType::MultipleChoice, Some(&Value::Null)));
        assert!(!is_answered(QuestionType::MultipleChoice, None));
    }

    #[test]
    fn cloze_needs_one_filled_blank() {
        assert!(!is_answered(QuestionType::Cloze, Some(&json!(["", ""]))));
        assert!(is_answered(QuestionType::Cloze, Some(&json!(["", "fox"]))));
        assert!(!is_answered(QuestionType::Cloze, Some(&json!([]))));
        assert!(!is_answered(QuestionType::Cloze, Some(&json!([null, ""]))));
        assert!(!is_answered(QuestionType::Cloze, Some(&json!("fox"))));
    }

    #[test]
    fn mappings_need_a_key() {
        for question_type in [QuestionType::Categorize, QuestionType::Comprehension] {
            assert!(!is_answered(question_type, Some(&json!({}))));
            assert!(is_answered(question_type, Some(&json!({ "0": 1 }))));
            assert!(!is_answered(question_type, Some(&json!(["x"]))));
        }
    }

    #[test]
    fn stored_answers_use_the_same_rule() {
        assert!(Answer::Choice(0).is_answered(QuestionType::MultipleChoice));
        assert!(!Answer::Sequence(vec![json!("")]).is_answered(QuestionType::Cloze));
        assert!(!Answer::Mapping(Map::new()).is_answered(QuestionType::Categorize));

        let stored = [
            Answer::Choice(0),
            Answer::Sequence(vec![json!(null), json!("fox")]),
            Answer::Sequence(vec![json!(null)]),
            Answer::Mapping(Map::new()),
            Answer::Mapping(json!({ "0": 1 }).as_object().unwrap().clone()),
            Answer::Raw(json!(null)),
            Answer::Raw(json!("text")),
        ];
        for answer in &stored {
            for question_type in QuestionType::ALL {
                assert_eq!(
                    answer.is_answered(question_type),
                    is_answered(question_type, Some(&answer.to_value())),
                    "{answer:?} as {question_type}"
                );
            }
        }
    }

    #[test]
    fn progress_over_a_form() {
        let questions = vec![
            Question::new("a", QuestionType::Cloze),
            Question::new("b", QuestionType::MultipleChoice),
            Question::new("c", QuestionType::Categorize),
        ];
        let answers = json!({ "a": ["", "forest"], "b": 0, "c": {} });
        let answers = answers.as_object().unwrap();

        let p = progress(&questions, answers);
        assert_eq!(p, Progress { answered: 2, total: 3 });
        assert_eq!(p.remaining(), 1);
        assert!(!p.is_complete());
        assert!((p.ratio() - 2.0 / 3.0).abs() < 1e-9);

        let missing: Vec<&str> = unanswered(&questions, answers)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(missing, vec!["c"]);
    }

    #[test]
    fn empty_form_is_complete() {
        let p = progress(&[], &Map::new());
        assert!(p.is_complete());
        assert_eq!(p.ratio(), 1.0);
    }
}
