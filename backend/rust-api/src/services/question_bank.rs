use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    Collection, Database,
};
use rand::{seq::SliceRandom, Rng};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    data::fallback_questions::fallback_questions,
    metrics::track_bank_operation,
    models::question::{
        Question, QuestionBankStats, QuestionFilters, QuestionMetadata, StoredQuestion,
    },
    utils::time::chrono_to_bson,
};

pub const COLLECTION_NAME: &str = "quiz_questions";
pub const CURATED_SOURCE: &str = "curated";

/// Persistent collection of previously generated or curated questions.
///
/// Backends implement the storage primitives; filtering, sampling and usage
/// bookkeeping are shared.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Inserts already-validated records. Returns the number written.
    async fn insert(&self, records: Vec<StoredQuestion>) -> Result<usize>;

    /// Bulk read of every record. Filtering happens in memory afterwards.
    async fn load_all(&self) -> Result<Vec<StoredQuestion>>;

    /// Increments `usageCount` and stamps `lastUsed` for the given record ids.
    async fn record_usage(&self, record_ids: &[String]) -> Result<u64>;

    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;

    /// Validates and stamps `questions`, then persists the valid subset.
    async fn save_questions(
        &self,
        questions: &[Question],
        metadata: QuestionMetadata,
    ) -> Result<usize> {
        let records = prepare_records(questions, metadata);
        if records.is_empty() {
            tracing::warn!("No valid questions to save to the question bank");
            return Ok(0);
        }

        let dropped = questions.len() - records.len();
        let batch_id = records[0].metadata.batch_id.clone().unwrap_or_default();
        let saved = track_bank_operation("insert", self.insert(records)).await?;

        tracing::info!(
            "Saved {} questions to the question bank (batch={})",
            saved,
            batch_id
        );
        if dropped > 0 {
            tracing::warn!("Filtered out {} invalid questions before saving", dropped);
        }
        Ok(saved)
    }

    /// Random sample of up to `count` records matching `filters`.
    ///
    /// Usage counters of returned records are bumped on a best-effort basis.
    async fn fetch_questions(
        &self,
        count: usize,
        filters: &QuestionFilters,
    ) -> Result<Vec<StoredQuestion>> {
        let records = track_bank_operation("load_all", self.load_all()).await?;
        let available = records.len();
        let matching: Vec<StoredQuestion> = records
            .into_iter()
            .filter(|record| filters.matches(record))
            .collect();

        if matching.is_empty() {
            tracing::warn!(
                "No questions in the bank match filters {:?} ({} total)",
                filters,
                available
            );
            return Ok(Vec::new());
        }

        let selected = sample(matching, count, &mut rand::rng());
        tracing::info!(
            "Retrieved {} random questions from the bank ({} total available)",
            selected.len(),
            available
        );

        let ids: Vec<String> = selected
            .iter()
            .filter_map(StoredQuestion::record_id_hex)
            .collect();
        if !ids.is_empty() {
            if let Err(e) = track_bank_operation("record_usage", self.record_usage(&ids)).await {
                tracing::warn!("Could not update usage statistics: {:#}", e);
            }
        }

        Ok(selected)
    }

    async fn statistics(&self) -> Result<QuestionBankStats> {
        let records = track_bank_operation("load_all", self.load_all()).await?;
        Ok(QuestionBankStats::from_records(&records))
    }
}

/// Fisher-Yates shuffle followed by taking the first `count` items.
pub fn sample<T, R: Rng + ?Sized>(mut items: Vec<T>, count: usize, rng: &mut R) -> Vec<T> {
    items.shuffle(rng);
    items.truncate(count);
    items
}

/// Drops invalid questions and stamps batch provenance on the rest.
pub fn prepare_records(questions: &[Question], metadata: QuestionMetadata) -> Vec<StoredQuestion> {
    let batch_id = format!("batch_{}_{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple());
    let created_at = chrono_to_bson(Utc::now());

    questions
        .iter()
        .filter(|question| question.is_valid())
        .map(|question| {
            let mut metadata = metadata.clone();
            metadata.batch_id = Some(batch_id.clone());
            metadata.created_at = Some(created_at);
            StoredQuestion::new(question.clone(), metadata)
        })
        .collect()
}

/// Stores the hardcoded list as curated English records. Does nothing when
/// curated records are already present, so repeated runs do not duplicate
/// them. Returns the number of records written.
pub async fn seed_curated_questions(bank: &dyn QuestionBank) -> Result<usize> {
    let existing = bank
        .load_all()
        .await?
        .iter()
        .filter(|record| record.metadata.source.as_deref() == Some(CURATED_SOURCE))
        .count();
    if existing > 0 {
        tracing::info!(
            "Question bank already holds {} curated questions, skipping seed",
            existing
        );
        return Ok(0);
    }

    bank.save_questions(
        &fallback_questions(),
        QuestionMetadata {
            source: Some(CURATED_SOURCE.to_string()),
            language: Some("english".to_string()),
            ..Default::default()
        },
    )
    .await
}

/// Decodes raw bank documents one by one. A document that does not fit the
/// record shape is logged and skipped so the rest of the bank stays readable.
pub fn decode_records(documents: Vec<Document>) -> Vec<StoredQuestion> {
    documents
        .into_iter()
        .filter_map(|document| {
            let record_id = document.get_object_id("_id").ok();
            match bson::from_document::<StoredQuestion>(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed question document {:?}: {}", record_id, e);
                    None
                }
            }
        })
        .collect()
}

pub struct MongoQuestionBank {
    mongo: Database,
    collection: Collection<StoredQuestion>,
}

impl MongoQuestionBank {
    pub fn new(mongo: Database) -> Self {
        let collection = mongo.collection(COLLECTION_NAME);
        Self { mongo, collection }
    }
}

#[async_trait]
impl QuestionBank for MongoQuestionBank {
    async fn insert(&self, records: Vec<StoredQuestion>) -> Result<usize> {
        let result = self
            .collection
            .insert_many(records)
            .await
            .context("Failed to insert questions")?;
        Ok(result.inserted_ids.len())
    }

    async fn load_all(&self) -> Result<Vec<StoredQuestion>> {
        let cursor = self
            .collection
            .clone_with_type::<Document>()
            .find(doc! {})
            .await
            .context("Failed to query question bank")?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .context("Failed to collect question documents")?;
        Ok(decode_records(documents))
    }

    async fn record_usage(&self, record_ids: &[String]) -> Result<u64> {
        let ids: Vec<ObjectId> = record_ids
            .iter()
            .filter_map(|id| ObjectId::parse_str(id).ok())
            .collect();
        if ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .update_many(
                doc! { "_id": { "$in": ids } },
                doc! {
                    "$inc": { "usageCount": 1 },
                    "$set": { "lastUsed": chrono_to_bson(Utc::now()) },
                },
            )
            .await
            .context("Failed to update question usage")?;
        Ok(result.modified_count)
    }

    async fn ping(&self) -> Result<()> {
        self.mongo
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

/// Process-local bank for running without a database.
#[derive(Default)]
pub struct InMemoryQuestionBank {
    records: RwLock<Vec<StoredQuestion>>,
}

impl InMemoryQuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl QuestionBank for InMemoryQuestionBank {
    async fn insert(&self, records: Vec<StoredQuestion>) -> Result<usize> {
        let mut guard = self.records.write().await;
        let count = records.len();
        guard.extend(records.into_iter().map(|mut record| {
            record.record_id.get_or_insert_with(ObjectId::new);
            record
        }));
        Ok(count)
    }

    async fn load_all(&self) -> Result<Vec<StoredQuestion>> {
        Ok(self.records.read().await.clone())
    }

    async fn record_usage(&self, record_ids: &[String]) -> Result<u64> {
        let now = chrono_to_bson(Utc::now());
        let mut guard = self.records.write().await;
        let mut updated = 0;
        for record in guard.iter_mut() {
            if let Some(hex) = record.record_id_hex() {
                if record_ids.contains(&hex) {
                    record.usage_count += 1;
                    record.last_used = Some(now);
                    updated += 1;
                }
            }
        }
        Ok(updated)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
