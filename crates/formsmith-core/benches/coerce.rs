use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use formsmith_core::coerce::{coerce, normalize_answers};
use formsmith_core::model::{Question, QuestionType};

fn bench_coerce(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce");

    group.bench_function("mc_numeric_string", |b| {
        b.iter(|| coerce(Some(QuestionType::MultipleChoice), black_box(json!("  42 apples"))))
    });

    group.bench_function("mc_garbage", |b| {
        b.iter(|| coerce(Some(QuestionType::MultipleChoice), black_box(json!({ "x": [1] }))))
    });

    group.bench_function("cloze_array", |b| {
        b.iter(|| coerce(Some(QuestionType::Cloze), black_box(json!(["lazy", "", "forest"]))))
    });

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_answers");

    let (small_questions, small_answers) = generate_form(4);
    let (large_questions, large_answers) = generate_form(200);

    group.bench_function("4_questions", |b| {
        b.iter(|| normalize_answers(black_box(&small_questions), black_box(&small_answers)))
    });

    group.bench_function("200_questions", |b| {
        b.iter(|| normalize_answers(black_box(&large_questions), black_box(&large_answers)))
    });

    group.finish();
}

fn generate_form(n: usize) -> (Vec<Question>, Value) {
    let mut questions = Vec::with_capacity(n);
    let mut answers = serde_json::Map::new();
    for i in 0..n {
        let question_type = QuestionType::ALL[i % QuestionType::ALL.len()];
        let id = format!("q{i}");
        let raw = match question_type {
            QuestionType::Categorize => json!({ "Category A": ["Item 1"] }),
            QuestionType::Cloze => json!(["lazy", "forest"]),
            QuestionType::Comprehension => json!({ "0": 1 }),
            QuestionType::MultipleChoice => json!(i.to_string()),
        };
        answers.insert(id.clone(), raw);
        questions.push(Question::new(id, question_type));
    }
    answers.insert("stale".to_string(), json!(7));
    (questions, Value::Object(answers))
}

criterion_group!(benches, bench_coerce, bench_normalize);
criterion_main!(benches);
