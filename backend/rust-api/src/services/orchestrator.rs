use std::sync::Arc;
use std::time::Instant;

use crate::{
    data::fallback_questions::fallback_slice,
    metrics,
    models::{
        question::{Question, QuestionFilters, QuestionMetadata},
        quiz::{QuestionSource, QuizEnvelope, QuizParams},
    },
    services::{
        extraction::parse_generated_questions,
        generator::{quiz_prompt, GenerationError, QuestionGenerator},
        question_bank::QuestionBank,
    },
};

pub const STORED_WARNING: &str = "Using saved questions from the question bank";
pub const FALLBACK_WARNING: &str = "Using hardcoded fallback questions";

/// Sources quiz questions: generation, then the stored bank, then the
/// hardcoded set. Each source is tried at most once per call and a failure
/// only ever falls through to the next one, so `generate_quiz` cannot fail.
pub struct QuizOrchestrator {
    bank: Arc<dyn QuestionBank>,
    generator: Arc<dyn QuestionGenerator>,
}

impl QuizOrchestrator {
    pub fn new(bank: Arc<dyn QuestionBank>, generator: Arc<dyn QuestionGenerator>) -> Self {
        Self { bank, generator }
    }

    pub async fn generate_quiz(&self, params: &QuizParams) -> QuizEnvelope {
        let count = params.count as usize;

        tracing::info!(
            "Attempting to generate {} questions via {}",
            count,
            self.generator.model_name()
        );
        let generation_error = match self.try_generation(params).await {
            Ok(mut questions) => {
                questions.truncate(count);
                self.persist_in_background(&questions, params);
                return finish(QuizEnvelope {
                    quiz: questions,
                    source: QuestionSource::Generated,
                    warning: None,
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!("Question generation failed: {}", e);
                metrics::record_generation_failure(e.reason());
                e.to_string()
            }
        };

        tracing::info!("Trying the stored question bank");
        let filters = QuestionFilters::language(params.language.clone());
        match self.bank.fetch_questions(count, &filters).await {
            Ok(records) if !records.is_empty() => {
                let quiz: Vec<Question> = records
                    .iter()
                    .enumerate()
                    .map(|(index, record)| record.to_question(index))
                    .filter(Question::is_valid)
                    .collect();
                if !quiz.is_empty() {
                    return finish(QuizEnvelope {
                        quiz,
                        source: QuestionSource::Stored,
                        warning: Some(STORED_WARNING.to_string()),
                        error: Some(generation_error),
                    });
                }
                tracing::warn!("Stored questions failed read-time validation");
            }
            Ok(_) => tracing::warn!("Question bank returned no questions"),
            Err(e) => tracing::error!("Question bank lookup failed: {:#}", e),
        }

        tracing::info!("Using hardcoded fallback questions");
        finish(QuizEnvelope {
            quiz: fallback_slice(count),
            source: QuestionSource::Fallback,
            warning: Some(FALLBACK_WARNING.to_string()),
            error: Some(generation_error),
        })
    }

    async fn try_generation(&self, params: &QuizParams) -> Result<Vec<Question>, GenerationError> {
        let start = Instant::now();
        let result = async {
            self.generator.health_check().await?;
            let text = self.generator.complete(&quiz_prompt(params)).await?;
            parse_generated_questions(&text)
        }
        .await;
        metrics::GENERATION_DURATION_SECONDS.observe(start.elapsed().as_secs_f64());

        if let Ok(questions) = &result {
            tracing::info!("Generated {} valid questions", questions.len());
        }
        result
    }

    /// Fire-and-forget write of a generated batch. The response never waits
    /// on it and a failure is only logged.
    fn persist_in_background(&self, questions: &[Question], params: &QuizParams) {
        let bank = Arc::clone(&self.bank);
        let questions = questions.to_vec();
        let metadata = QuestionMetadata {
            source: Some(QuestionSource::Generated.as_str().to_string()),
            language: Some(params.language.clone()),
            topics: params.topics.clone(),
            difficulty: params.difficulty.clone(),
            ..Default::default()
        };

        tokio::spawn(async move {
            if let Err(e) = bank.save_questions(&questions, metadata).await {
                tracing::warn!("Failed to save generated questions: {:#}", e);
            }
        });
    }
}

fn finish(envelope: QuizEnvelope) -> QuizEnvelope {
    metrics::record_quiz_source(envelope.source.as_str());
    tracing::info!(
        "Serving {} questions from source={}",
        envelope.quiz.len(),
        envelope.source.as_str()
    );
    envelope
}
