use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("transaction code already exists")]
    Conflict,
    #[error("no pending transaction with this code")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notifier unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read package file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse package file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid package `{id}`: {reason}")]
    Invalid { id: String, reason: String },
    #[error("package list is empty")]
    Empty,
}

/// Errors surfaced by the request/confirm workflow. The display text is what
/// the HTTP client sees in the `error` field.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Invalid code or already used")]
    InvalidOrUsedCode,
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl BillingError {
    pub fn storage(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| BillingError::Storage { context, source }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseError for BillingError {
    fn status_code(&self) -> StatusCode {
        match self {
            BillingError::InvalidRequest | BillingError::InvalidOrUsedCode => {
                StatusCode::BAD_REQUEST
            }
            BillingError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let BillingError::Storage { context, source } = self {
            log::error!("{}: {:#}", context, source);
        }
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody { error: &message })
    }
}
