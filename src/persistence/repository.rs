//! Database Repository
//!
//! SQLite-backed sessions for prediction records.

use super::models::*;
use super::{DatabaseError, DbPool};
use crate::domain::repositories::prediction_repository::{PredictionRepository, SessionProvider};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::pool::PoolConnection;
use sqlx::{Connection, Sqlite};
use tracing::{debug, error};

/// Pool-backed session provider
#[derive(Clone)]
pub struct PredictionStore {
    pool: DbPool,
}

impl PredictionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Acquire a session holding its own pooled connection
    pub async fn open(&self) -> Result<PredictionSession, DatabaseError> {
        let conn = self.pool.acquire().await.map_err(|e| {
            error!("Failed to acquire database session: {}", e);
            DatabaseError::ConnectionError(e)
        })?;

        Ok(PredictionSession { conn })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl SessionProvider for PredictionStore {
    async fn session(&self) -> Result<Box<dyn PredictionRepository>, DatabaseError> {
        Ok(Box::new(self.open().await?))
    }
}

/// A single request's connection. Returned to the pool on drop.
pub struct PredictionSession {
    conn: PoolConnection<Sqlite>,
}

impl PredictionSession {
    /// Get prediction by ID
    pub async fn get(&mut self, id: i64) -> Result<Option<PredictionRecord>, DatabaseError> {
        let record = sqlx::query_as::<_, PredictionRecord>(
            "SELECT id, days_ahead, predicted_price, created_at FROM predictions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| {
            error!("Failed to get prediction {}: {}", id, e);
            DatabaseError::QueryError(format!("Failed to get prediction: {}", e))
        })?;

        Ok(record)
    }

    /// Total number of stored predictions
    pub async fn count(&mut self) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM predictions")
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| {
                error!("Failed to count predictions: {}", e);
                DatabaseError::QueryError(format!("Failed to count predictions: {}", e))
            })?;

        Ok(count)
    }
}

#[async_trait]
impl PredictionRepository for PredictionSession {
    async fn save(&mut self, input: CreatePrediction) -> Result<PredictionRecord, DatabaseError> {
        let now = Utc::now();

        let mut tx = self.conn.begin().await.map_err(|e| {
            error!("Failed to begin transaction: {}", e);
            DatabaseError::QueryError(format!("Failed to begin transaction: {}", e))
        })?;

        let id = sqlx::query(
            r#"
            INSERT INTO predictions (days_ahead, predicted_price, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(input.days_ahead)
        .bind(input.predicted_price)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to insert prediction: {}", e);
            DatabaseError::QueryError(format!("Failed to insert prediction: {}", e))
        })?
        .last_insert_rowid();

        tx.commit().await.map_err(|e| {
            error!("Failed to commit prediction: {}", e);
            DatabaseError::QueryError(format!("Failed to commit prediction: {}", e))
        })?;

        let record = self.get(id).await?.ok_or_else(|| {
            DatabaseError::QueryError(format!("Prediction {} missing after commit", id))
        })?;

        debug!(
            "Created prediction: {} ({} days ahead -> {})",
            record.id, record.days_ahead, record.predicted_price
        );
        Ok(record)
    }

    async fn history(&mut self) -> Result<Vec<PredictionRecord>, DatabaseError> {
        let records = sqlx::query_as::<_, PredictionRecord>(
            r#"
            SELECT id, days_ahead, predicted_price, created_at
            FROM predictions
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| {
            error!("Failed to get prediction history: {}", e);
            DatabaseError::QueryError(format!("Failed to get prediction history: {}", e))
        })?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{init_database, DatabaseConfig};

    async fn store() -> PredictionStore {
        let pool = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        PredictionStore::new(pool)
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_timestamp() {
        let store = store().await;
        let mut session = store.open().await.unwrap();

        let before = Utc::now();
        let record = session
            .save(CreatePrediction {
                days_ahead: 30,
                predicted_price: 101.23456,
            })
            .await
            .unwrap();

        assert!(record.id > 0);
        assert_eq!(record.days_ahead, 30);
        assert_eq!(record.predicted_price, 101.23456);
        assert!(record.created_at >= before);
    }

    #[tokio::test]
    async fn test_history_is_most_recent_first() {
        let store = store().await;
        let mut session = store.open().await.unwrap();

        for days in [1, 2, 3] {
            session
                .save(CreatePrediction {
                    days_ahead: days,
                    predicted_price: days as f64 * 10.0,
                })
                .await
                .unwrap();
        }

        let history = session.history().await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].days_ahead, 3);
        assert_eq!(history[2].days_ahead, 1);
        for pair in history.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_history_empty() {
        let store = store().await;
        let mut session = store.open().await.unwrap();
        assert!(session.history().await.unwrap().is_empty());
        assert_eq!(session.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_session_released_on_drop() {
        // Single-connection pool: a leaked session would block the second open
        let store = store().await;
        {
            let mut session = store.open().await.unwrap();
            session
                .save(CreatePrediction {
                    days_ahead: 5,
                    predicted_price: 1.0,
                })
                .await
                .unwrap();
        }

        let mut session = store.session().await.unwrap();
        assert_eq!(session.history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_open_fails_on_closed_pool() {
        let store = store().await;
        store.pool().close().await;
        assert!(store.open().await.is_err());
    }
}
