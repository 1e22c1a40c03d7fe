use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use tracing::info;

use crate::{
    config::DatabaseSettings,
    models::{Badge, PersonaError, Result, TimelineEvent, WalletAddress},
    storage::{AnalysisStore, StoredAnalysis},
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS wallet_analyses (
    wallet_address    TEXT PRIMARY KEY,
    persona           TEXT NOT NULL,
    risk_score        INTEGER NOT NULL,
    bio               TEXT NOT NULL,
    total_value       TEXT NOT NULL,
    transaction_count INTEGER NOT NULL,
    protocol_count    INTEGER NOT NULL,
    updated_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS timeline_events (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    wallet_address TEXT NOT NULL REFERENCES wallet_analyses(wallet_address) ON DELETE CASCADE,
    event          TEXT NOT NULL,
    event_date     TEXT NOT NULL,
    value          TEXT
);

CREATE TABLE IF NOT EXISTS wallet_badges (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    wallet_address TEXT NOT NULL REFERENCES wallet_analyses(wallet_address) ON DELETE CASCADE,
    label          TEXT NOT NULL,
    description    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS api_usage (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    wallet_address TEXT NOT NULL,
    endpoint       TEXT NOT NULL,
    created_at     TEXT NOT NULL
);
"#;

/// sqlx-backed store. Schema is created on connect so a fresh database file
/// is immediately usable.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)
            .map_err(|e| PersonaError::ConfigError(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        info!("Database ready at {}", settings.url);

        Ok(Self { pool })
    }

    #[cfg(test)]
    pub async fn connect_in_memory() -> Result<Self> {
        Self::connect(&DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
    }
}

#[async_trait]
impl AnalysisStore for SqliteStore {
    async fn get_analysis(&self, address: &WalletAddress) -> Result<Option<StoredAnalysis>> {
        let row = sqlx::query(
            "SELECT wallet_address, persona, risk_score, bio, total_value, \
             transaction_count, protocol_count, updated_at \
             FROM wallet_analyses WHERE wallet_address = ?",
        )
        .bind(address.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let updated_at: String = row.try_get("updated_at")?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| DateTime::<Utc>::MIN_UTC);

        Ok(Some(StoredAnalysis {
            wallet_address: row.try_get("wallet_address")?,
            persona: row.try_get("persona")?,
            risk_score: row.try_get("risk_score")?,
            bio: row.try_get("bio")?,
            total_value: row.try_get("total_value")?,
            transaction_count: row.try_get("transaction_count")?,
            protocol_count: row.try_get("protocol_count")?,
            updated_at,
        }))
    }

    async fn upsert_analysis(&self, record: &StoredAnalysis) -> Result<()> {
        sqlx::query(
            "INSERT INTO wallet_analyses \
             (wallet_address, persona, risk_score, bio, total_value, \
              transaction_count, protocol_count, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(wallet_address) DO UPDATE SET \
               persona = excluded.persona, \
               risk_score = excluded.risk_score, \
               bio = excluded.bio, \
               total_value = excluded.total_value, \
               transaction_count = excluded.transaction_count, \
               protocol_count = excluded.protocol_count, \
               updated_at = excluded.updated_at",
        )
        .bind(&record.wallet_address)
        .bind(&record.persona)
        .bind(record.risk_score)
        .bind(&record.bio)
        .bind(&record.total_value)
        .bind(record.transaction_count)
        .bind(record.protocol_count)
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace_timeline(
        &self,
        address: &WalletAddress,
        events: &[TimelineEvent],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM timeline_events WHERE wallet_address = ?")
            .bind(address.as_str())
            .execute(&mut *tx)
            .await?;

        for event in events {
            sqlx::query(
                "INSERT INTO timeline_events (wallet_address, event, event_date, value) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(address.as_str())
            .bind(&event.event)
            .bind(&event.date)
            .bind(&event.value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn replace_badges(&self, address: &WalletAddress, badges: &[Badge]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM wallet_badges WHERE wallet_address = ?")
            .bind(address.as_str())
            .execute(&mut *tx)
            .await?;

        for badge in badges {
            sqlx::query(
                "INSERT INTO wallet_badges (wallet_address, label, description) VALUES (?, ?, ?)",
            )
            .bind(address.as_str())
            .bind(&badge.label)
            .bind(&badge.description)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn load_timeline(&self, address: &WalletAddress) -> Result<Vec<TimelineEvent>> {
        let rows = sqlx::query(
            "SELECT event, event_date, value FROM timeline_events \
             WHERE wallet_address = ? ORDER BY event_date ASC, id ASC",
        )
        .bind(address.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(TimelineEvent {
                    event: row.try_get("event")?,
                    date: row.try_get("event_date")?,
                    value: row.try_get("value")?,
                })
            })
            .collect()
    }

    async fn load_badges(&self, address: &WalletAddress) -> Result<Vec<Badge>> {
        let rows = sqlx::query(
            "SELECT label, description FROM wallet_badges WHERE wallet_address = ? ORDER BY id ASC",
        )
        .bind(address.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Badge {
                    label: row.try_get("label")?,
                    description: row.try_get("description")?,
                })
            })
            .collect()
    }

    async fn log_usage(&self, address: &WalletAddress, endpoint: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO api_usage (wallet_address, endpoint, created_at) VALUES (?, ?, ?)",
        )
        .bind(address.as_str())
        .bind(endpoint)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
