use anyhow::Result;
use common::{BillingConfig, BillingService};

pub struct AppState {
    pub billing: BillingService,
}

impl AppState {
    pub async fn new(config: &BillingConfig) -> Result<Self> {
        let billing = config.create_billing_service().await?;
        log::info!(
            "Serving {} packages",
            billing.catalog().packages().len()
        );
        Ok(Self::from_billing(billing))
    }

    pub fn from_billing(billing: BillingService) -> Self {
        AppState { billing }
    }
}
