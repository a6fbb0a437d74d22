use std::sync::Arc;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::db::TransactionStore;
use crate::error::{BillingError, StoreError};
use crate::generator::{generate_code, generate_credentials};
use crate::notifier::{MessageSettings, Notifier};
use crate::schema::{NewTransaction, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRequested {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessGranted {
    pub username: String,
    pub password: String,
}

/// Turns access requests into pending transactions and pending transactions
/// into issued credentials.
pub struct BillingService {
    store: TransactionStore,
    catalog: Catalog,
    notifier: Arc<dyn Notifier>,
    messages: MessageSettings,
}

impl BillingService {
    pub fn new(
        store: TransactionStore,
        catalog: Catalog,
        notifier: Arc<dyn Notifier>,
        messages: MessageSettings,
    ) -> Self {
        BillingService {
            store,
            catalog,
            notifier,
            messages,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub async fn request_access(
        &self,
        phone: Option<&str>,
        package_id: Option<&str>,
    ) -> Result<AccessRequested, BillingError> {
        let phone = phone
            .filter(|p| !p.trim().is_empty())
            .ok_or(BillingError::InvalidRequest)?;
        let package = package_id
            .and_then(|id| self.catalog.lookup(id))
            .ok_or(BillingError::InvalidRequest)?;

        let code = generate_code();
        let credentials = generate_credentials();
        let expires_at = package
            .validity
            .expires_at(chrono::Utc::now().naive_utc());

        let transaction = NewTransaction {
            phone: phone.to_string(),
            package: package.id.clone(),
            amount: package.price,
            code: code.clone(),
            username: credentials.username,
            password: credentials.password,
            expires_at,
        };
        let id = self
            .store
            .create(&transaction)
            .await
            .map_err(BillingError::storage("Database error"))?;
        log::info!(
            "Transaction {} created: package {} for {} (code {})",
            id,
            package.id,
            phone,
            code
        );

        let message = self.messages.payment_instructions(package, &code);
        self.notify(phone, &message).await;

        Ok(AccessRequested { code })
    }

    /// `payment_ref` is recorded in the log only; confirmation is not checked
    /// against any payment provider.
    pub async fn confirm_payment(
        &self,
        code: Option<&str>,
        payment_ref: Option<&str>,
    ) -> Result<AccessGranted, BillingError> {
        let code = code.ok_or(BillingError::InvalidOrUsedCode)?;
        let transaction = self
            .store
            .find_pending_by_code(code)
            .await
            .map_err(BillingError::storage("Update failed"))?
            .ok_or(BillingError::InvalidOrUsedCode)?;

        match self.store.mark_paid(code).await {
            Ok(()) => {}
            // another request confirmed it between the read and the update
            Err(StoreError::NotFound) => return Err(BillingError::InvalidOrUsedCode),
            Err(e) => return Err(BillingError::storage("Update failed")(e)),
        }
        log::info!(
            "Transaction {} paid (code {}, payment ref {})",
            transaction.id,
            code,
            payment_ref.unwrap_or("-")
        );

        let Transaction {
            phone,
            username,
            password,
            expires_at,
            ..
        } = transaction;
        let message = self
            .messages
            .login_details(&username, &password, expires_at);
        self.notify(&phone, &message).await;

        Ok(AccessGranted { username, password })
    }

    pub async fn recent_transactions(
        &self,
        limit: i64,
    ) -> Result<Vec<Transaction>, BillingError> {
        self.store
            .list_recent(limit)
            .await
            .map_err(BillingError::storage("Database error"))
    }

    async fn notify(&self, destination: &str, message: &str) {
        if let Err(e) = self.notifier.send(destination, message).await {
            log::warn!("Failed to notify {}: {}", destination, e);
        }
    }
}
