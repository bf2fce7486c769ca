//! PostgreSQL implementation of TranscriptRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use echolink::{DomainError, Speaker, TranscriptEntry, TranscriptRepository};

/// PostgreSQL implementation of TranscriptRepository
pub struct PgTranscriptRepository {
    pool: PgPool,
}

impl PgTranscriptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct TranscriptRow {
    speaker: String,
    text: String,
    time: String,
}

impl TryFrom<TranscriptRow> for TranscriptEntry {
    type Error = DomainError;

    fn try_from(row: TranscriptRow) -> Result<Self, Self::Error> {
        let speaker: Speaker = row.speaker.parse().map_err(DomainError::Repository)?;
        Ok(TranscriptEntry::new(speaker, row.text, row.time))
    }
}

#[async_trait]
impl TranscriptRepository for PgTranscriptRepository {
    async fn save(&self, call_sid: &str, entries: &[TranscriptEntry]) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        // Continue after anything already stored for this call
        let start = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM call_transcripts WHERE call_sid = $1",
        )
        .bind(call_sid)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        for (offset, entry) in entries.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO call_transcripts (id, call_sid, position, speaker, text, time)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(call_sid)
            .bind(start + offset as i32)
            .bind(entry.speaker.to_string())
            .bind(&entry.text)
            .bind(&entry.time)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(entries.len())
    }

    async fn find_by_call(&self, call_sid: &str) -> Result<Vec<TranscriptEntry>, DomainError> {
        let rows = sqlx::query_as::<_, TranscriptRow>(
            "SELECT speaker, text, time FROM call_transcripts WHERE call_sid = $1 ORDER BY position",
        )
        .bind(call_sid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
