pub mod catalog;
pub mod question;
pub mod quiz;
pub mod session;

pub use question::{
    Question, QuestionFilters, QuestionMetadata, QuestionOption, StoredQuestion,
};
pub use quiz::{QuestionSource, QuizEnvelope, QuizParams};
