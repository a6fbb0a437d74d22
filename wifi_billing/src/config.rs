use anyhow::Context;
use common::BillingConfig;

use crate::state::AppState;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub billing: BillingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got `{}`", port))?,
            Err(_) => 3000,
        };

        Ok(Self {
            host,
            port,
            billing: BillingConfig::from_env(),
        })
    }

    pub async fn create_app_state(&self) -> anyhow::Result<AppState> {
        AppState::new(&self.billing)
            .await
            .context("Failed to initialize AppState")
    }
}
