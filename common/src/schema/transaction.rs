use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Paid,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => f.pad("pending"),
            TransactionStatus::Paid => f.pad("paid"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub phone: String,
    pub package: String,
    pub amount: i64,
    pub code: String,
    pub username: String,
    pub password: String,
    pub status: TransactionStatus,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

/// A transaction that has not been stored yet. `id`, `status` and
/// `created_at` are filled in by the database.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub phone: String,
    pub package: String,
    pub amount: i64,
    pub code: String,
    pub username: String,
    pub password: String,
    pub expires_at: NaiveDateTime,
}
