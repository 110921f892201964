//! formsmith-core: question content model, cloze parser, and answer pipeline.
//!
//! This crate defines the form data model, the per-kind rules for what a
//! question's content and answers look like, and the service that drives
//! them through the storage and link-generation traits.

pub mod category_board;
pub mod cloze;
pub mod coerce;
pub mod content;
pub mod error;
pub mod model;
pub mod parser;
pub mod progress;
pub mod review;
pub mod service;
pub mod traits;
pub mod word_bank;

pub use coerce::{coerce, normalize_answers, Answer};
pub use error::{ContentError, FormError, PlacementError, StoreError};
pub use model::{Content, Form, FormDraft, Question, QuestionType, Response};
pub use service::FormService;
