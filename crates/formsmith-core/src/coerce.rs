//! Answer coercion engine.
//!
//! Respondent payloads are untrusted JSON. Every submitted answer passes
//! through [`coerce`] before it is stored, which maps it onto the shape its
//! question type expects or onto that shape's empty value. Coercion never
//! fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{Question, QuestionType};

/// A stored answer.
///
/// Serialized untagged, so the stored JSON is exactly the normalized value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Categorize (category → items) and comprehension (item index → option index).
    Mapping(Map<String, Value>),
    /// Cloze: one entry per blank.
    Sequence(Vec<Value>),
    /// Multiple-choice: the chosen option index.
    Choice(i64),
    /// Anything stored without a known question type.
    Raw(Value),
}

impl Answer {
    /// The answer as plain JSON.
    pub fn to_value(&self) -> Value {
        match self {
            Answer::Mapping(map) => Value::Object(map.clone()),
            Answer::Sequence(items) => Value::Array(items.clone()),
            Answer::Choice(index) => Value::from(*index),
            Answer::Raw(value) => value.clone(),
        }
    }
}

impl From<Answer> for Value {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Mapping(map) => Value::Object(map),
            Answer::Sequence(items) => Value::Array(items),
            Answer::Choice(index) => Value::from(index),
            Answer::Raw(value) => value,
        }
    }
}

/// Normalize one raw answer for a question of the given type.
///
/// `None` stands for a type this build does not know; the value is kept
/// unchanged. An absent answer is represented as `Value::Null`.
pub fn coerce(question_type: Option<QuestionType>, raw: Value) -> Answer {
    match question_type {
        Some(QuestionType::Categorize | QuestionType::Comprehension) => match raw {
            Value::Object(map) => Answer::Mapping(map),
            _ => Answer::Mapping(Map::new()),
        },
        Some(QuestionType::Cloze) => match raw {
            Value::Array(items) => Answer::Sequence(items),
            _ => Answer::Sequence(Vec::new()),
        },
        Some(QuestionType::MultipleChoice) => Answer::Choice(choice_index(&raw)),
        None => Answer::Raw(raw),
    }
}

/// Integer view of a multiple-choice answer; `0` when there is none.
fn choice_index(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => leading_integer(s).unwrap_or(0),
        _ => 0,
    }
}

/// Parse the decimal integer at the start of `s`, ignoring whatever follows.
///
/// Leading whitespace and one sign are allowed. Returns `None` when no digit
/// follows or the digits overflow `i64`.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = unsigned[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Normalize a submitted answers object against a form's questions.
///
/// Each question with a present, non-null raw answer gets one entry. Questions
/// without an answer get none, and keys naming no question are dropped. A
/// payload that is not an object yields no answers at all.
pub fn normalize_answers(questions: &[Question], raw: &Value) -> BTreeMap<String, Answer> {
    let Some(submitted) = raw.as_object() else {
        tracing::debug!("answers payload is not an object, storing none");
        return BTreeMap::new();
    };

    questions
        .iter()
        .filter_map(|question| {
            let value = submitted.get(&question.id).filter(|v| !v.is_null())?;
            Some((
                question.id.clone(),
                coerce(Some(question.question_type()), value.clone()),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mc(raw: Value) -> Answer {
        coerce(Some(QuestionType::MultipleChoice), raw)
    }

    #[test]
    fn multiple_choice_from_strings() {
        assert_eq!(mc(json!("2")), Answer::Choice(2));
        assert_eq!(mc(json!("abc")), Answer::Choice(0));
        assert_eq!(mc(json!("  3 apples")), Answer::Choice(3));
        assert_eq!(mc(json!("-1")), Answer::Choice(-1));
        assert_eq!(mc(json!("")), Answer::Choice(0));
        assert_eq!(mc(json!("99999999999999999999")), Answer::Choice(0));
    }

    #[test]
    fn multiple_choice_from_numbers_and_others() {
        assert_eq!(mc(json!(1)), Answer::Choice(1));
        assert_eq!(mc(json!(2.9)), Answer::Choice(2));
        assert_eq!(mc(json!(-2.9)), Answer::Choice(-2));
        assert_eq!(mc(json!(u64::MAX)), Answer::Choice(i64::MAX));
        assert_eq!(mc(json!(true)), Answer::Choice(0));
        assert_eq!(mc(json!({ "a": 1 })), Answer::Choice(0));
        assert_eq!(mc(Value::Null), Answer::Choice(0));
    }

    #[test]
    fn cloze_keeps_sequences_only() {
        assert_eq!(
            coerce(Some(QuestionType::Cloze), Value::Null),
            Answer::Sequence(vec![])
        );
        assert_eq!(
            coerce(Some(QuestionType::Cloze), json!("fox")),
            Answer::Sequence(vec![])
        );
        assert_eq!(
            coerce(Some(QuestionType::Cloze), json!(["", "fox"])),
            Answer::Sequence(vec![json!(""), json!("fox")])
        );
    }

    #[test]
    fn mappings_for_categorize_and_comprehension() {
        assert_eq!(
            coerce(Some(QuestionType::Categorize), Value::Null),
            Answer::Mapping(Map::new())
        );
        assert_eq!(
            coerce(Some(QuestionType::Comprehension), json!([0, 1])),
            Answer::Mapping(Map::new())
        );
        let answer = coerce(Some(QuestionType::Comprehension), json!({ "0": 2 }));
        assert_eq!(answer.to_value(), json!({ "0": 2 }));
    }

    #[test]
    fn unknown_type_passes_through() {
        let raw = json!({ "anything": [1, "two"] });
        assert_eq!(coerce(None, raw.clone()), Answer::Raw(raw));
    }

    #[test]
    fn answers_serialize_as_plain_values() {
        let mut answers = BTreeMap::new();
        answers.insert("a".to_string(), Answer::Choice(3));
        answers.insert("b".to_string(), Answer::Sequence(vec![json!("x")]));
        assert_eq!(
            serde_json::to_value(&answers).unwrap(),
            json!({ "a": 3, "b": ["x"] })
        );

        let back: BTreeMap<String, Answer> =
            serde_json::from_value(json!({ "a": 3, "b": ["x"], "c": {}, "d": "s" })).unwrap();
        assert_eq!(back["a"], Answer::Choice(3));
        assert_eq!(back["c"], Answer::Mapping(Map::new()));
        assert_eq!(back["d"], Answer::Raw(json!("s")));
    }

    #[test]
    fn normalization_is_sparse_and_typed() {
        let questions = vec![
            Question::new("cat", QuestionType::Categorize),
            Question::new("cloze", QuestionType::Cloze),
            Question::new("mc", QuestionType::MultipleChoice),
            Question::new("skipped", QuestionType::Comprehension),
        ];
        let raw = json!({
            "cat": "not a map",
            "cloze": ["lazy", ""],
            "mc": "1",
            "skipped": null,
            "ghost": 5
        });
        let answers = normalize_answers(&questions, &raw);
        assert_eq!(answers.len(), 3);
        assert_eq!(answers["cat"], Answer::Mapping(Map::new()));
        assert_eq!(
            answers["cloze"],
            Answer::Sequence(vec![json!("lazy"), json!("")])
        );
        assert_eq!(answers["mc"], Answer::Choice(1));
        assert!(!answers.contains_key("skipped"));
        assert!(!answers.contains_key("ghost"));
    }

    #[test]
    fn non_object_payload_yields_nothing() {
        let questions = vec![Question::new("mc", QuestionType::MultipleChoice)];
        assert!(normalize_answers(&questions, &json!([1, 2])).is_empty());
        assert!(normalize_answers(&questions, &Value::Null).is_empty());
    }
}
