use anyhow::Context;
use tracing_subscriber::fmt::init;

use dbquiz_api::{
    config::{Config, StoreBackend},
    services::{
        connect_question_bank,
        question_bank::{seed_curated_questions, QuestionBank},
    },
};

/// Loads the curated question set into the configured question bank once.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::load().context("Failed to load configuration")?;
    if config.store_backend == StoreBackend::Memory {
        tracing::warn!("Seeding the in-memory question bank has no lasting effect");
    }

    let bank = connect_question_bank(&config).await?;
    bank.ping()
        .await
        .context("Question bank is not reachable")?;

    let saved = seed_curated_questions(bank.as_ref()).await?;
    tracing::info!(
        "Seeded {} curated questions into {}",
        saved,
        bank.backend_name()
    );

    Ok(())
}
