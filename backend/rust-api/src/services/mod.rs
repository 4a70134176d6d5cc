use std::sync::Arc;

use anyhow::Context;
use mongodb::Client as MongoClient;

use crate::config::{Config, StoreBackend};
use generator::{OllamaGenerator, QuestionGenerator};
use orchestrator::QuizOrchestrator;
use question_bank::{InMemoryQuestionBank, MongoQuestionBank, QuestionBank};

pub struct AppState {
    pub config: Config,
    pub bank: Arc<dyn QuestionBank>,
    pub generator: Arc<dyn QuestionGenerator>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let bank = connect_question_bank(&config).await?;
        let generator: Arc<dyn QuestionGenerator> =
            Arc::new(OllamaGenerator::new(config.generation.clone()));

        tracing::info!(
            "Generation service configured at {} (model {})",
            config.generation.base_url,
            config.generation.model
        );

        Ok(Self::from_parts(config, bank, generator))
    }

    pub fn from_parts(
        config: Config,
        bank: Arc<dyn QuestionBank>,
        generator: Arc<dyn QuestionGenerator>,
    ) -> Self {
        Self {
            config,
            bank,
            generator,
        }
    }

    pub fn orchestrator(&self) -> QuizOrchestrator {
        QuizOrchestrator::new(Arc::clone(&self.bank), Arc::clone(&self.generator))
    }
}

/// Builds the configured question bank backend.
///
/// The Mongo driver connects lazily, so an unreachable server only surfaces on
/// the first operation and the bank degrades instead of blocking startup.
pub async fn connect_question_bank(config: &Config) -> anyhow::Result<Arc<dyn QuestionBank>> {
    match config.store_backend {
        StoreBackend::Mongo => {
            let client = MongoClient::with_uri_str(&config.mongo_uri)
                .await
                .context("Invalid MongoDB connection string")?;
            let bank = MongoQuestionBank::new(client.database(&config.mongo_database));

            if let Err(e) = bank.ping().await {
                tracing::warn!("MongoDB not reachable at startup: {:#}", e);
            } else {
                tracing::info!("MongoDB connected");
            }

            Ok(Arc::new(bank))
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory question bank");
            Ok(Arc::new(InMemoryQuestionBank::new()))
        }
    }
}

pub mod extraction;
pub mod generator;
pub mod orchestrator;
pub mod question_bank;
