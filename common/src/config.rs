use std::sync::Arc;

use anyhow::Context;

use crate::catalog::Catalog;
use crate::db::TransactionStore;
use crate::notifier::{ConsoleNotifier, MessageSettings};
use crate::workflow::BillingService;

/// Settings shared by the server and the operator CLI.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub database_url: String,
    pub packages_yaml: Option<String>,
    pub messages: MessageSettings,
}

impl BillingConfig {
    pub fn from_env() -> Self {
        let defaults = MessageSettings::default();
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://billing.db".to_string());
        let packages_yaml = std::env::var("PACKAGES_YAML").ok();
        let payment_number = std::env::var("PAYMENT_NUMBER").unwrap_or(defaults.payment_number);
        let wifi_network = std::env::var("WIFI_NETWORK").unwrap_or(defaults.wifi_network);

        Self {
            database_url,
            packages_yaml,
            messages: MessageSettings {
                currency: defaults.currency,
                payment_number,
                wifi_network,
            },
        }
    }

    pub async fn load_catalog(&self) -> anyhow::Result<Catalog> {
        match &self.packages_yaml {
            Some(path) => Catalog::from_yaml_file(path)
                .await
                .with_context(|| format!("Failed to load packages from `{}`", path)),
            None => Ok(Catalog::default()),
        }
    }

    /// Opens the database and wires the workflow with the console notifier.
    pub async fn create_billing_service(&self) -> anyhow::Result<BillingService> {
        let catalog = self.load_catalog().await?;
        let store = TransactionStore::connect(&self.database_url).await?;
        log::info!("Database {} initialized successfully!", self.database_url);
        Ok(BillingService::new(
            store,
            catalog,
            Arc::new(ConsoleNotifier),
            self.messages.clone(),
        ))
    }
}
