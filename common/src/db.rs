use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio_stream::{Stream, StreamExt};

use crate::error::StoreError;
use crate::schema::{NewTransaction, Transaction};

pub struct TransactionStore {
    pool: SqlitePool,
}

impl TransactionStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Failed to create SQLite connect options")?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to open database `{}`", database_url))?;
        Self::from_pool(pool).await
    }

    /// A private database that lives as long as the store. Every pooled
    /// connection to `:memory:` would get its own database, so the pool is
    /// held at a single connection that is never recycled.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Failed to create SQLite connect options")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::migrate!()
            .run(&pool)
            .await
            .context("Database migration error")?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn create(&self, transaction: &NewTransaction) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                phone, package, amount, code, username, password, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.phone)
        .bind(&transaction.package)
        .bind(transaction.amount)
        .bind(&transaction.code)
        .bind(&transaction.username)
        .bind(&transaction.password)
        .bind(transaction.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict
            }
            other => StoreError::Storage(other),
        })?;

        let id = result.last_insert_rowid();
        log::debug!("Saved transaction {} with code {}", id, transaction.code);
        Ok(id)
    }

    pub async fn find_pending_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions WHERE code = ? AND status = 'pending'
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(transaction)
    }

    /// Flips a pending transaction to paid. Rows that are already paid are
    /// left alone and reported as `NotFound`.
    pub async fn mark_paid(&self, code: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = 'paid'
            WHERE code = ? AND status = 'pending'
            "#,
        )
        .bind(code)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        log::debug!("Marked transaction with code {} as paid", code);
        Ok(())
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Transaction>, StoreError> {
        let transactions: Vec<Transaction> = self
            .stream_recent(limit)
            .collect::<Result<_, _>>()
            .await?;
        log::debug!("Retrieved {} recent transactions", transactions.len());
        Ok(transactions)
    }

    /// Newest first. The stream is consumed once and ends after `limit` rows.
    pub fn stream_recent(
        &self,
        limit: i64,
    ) -> impl Stream<Item = Result<Transaction, StoreError>> + '_ {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit.max(0))
        .fetch(&self.pool)
        .map(|row| row.map_err(StoreError::from))
    }

    /// Writes the most recent transactions to a CSV file, returning the number
    /// of rows written.
    pub async fn export_csv(&self, path: &str, limit: i64) -> anyhow::Result<usize> {
        let file = tokio::fs::File::create(path)
            .await
            .with_context(|| format!("Failed to create `{}`", path))?;
        let mut wtr = csv_async::AsyncSerializer::from_writer(file);

        let mut rows = self.stream_recent(limit);
        let mut written = 0;
        while let Some(transaction) = rows.next().await {
            let transaction = transaction.context("Failed to read transaction")?;
            wtr.serialize(&transaction)
                .await
                .context("Failed to write CSV row")?;
            written += 1;
        }
        wtr.flush().await.context("Failed to flush CSV file")?;
        log::info!("Exported {} transactions to {}", written, path);
        Ok(written)
    }
}
