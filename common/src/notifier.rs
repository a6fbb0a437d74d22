use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::catalog::Package;
use crate::error::NotifyError;

/// Delivers a text message to a phone number.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotifyError>;
}

/// Stand-in for an SMS gateway: writes the message to the log and reports it
/// as delivered.
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotifyError> {
        log::info!("SMS to {}: {}", destination, message);
        Ok(())
    }
}

/// Operator-specific text that goes into the SMS messages.
#[derive(Debug, Clone)]
pub struct MessageSettings {
    pub currency: String,
    pub payment_number: String,
    pub wifi_network: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        MessageSettings {
            currency: "KSh".to_string(),
            payment_number: "0700000000".to_string(),
            wifi_network: "FreeWiFi-Packages".to_string(),
        }
    }
}

impl MessageSettings {
    // The validity line is fixed text and does not follow the package.
    pub fn payment_instructions(&self, package: &Package, code: &str) -> String {
        format!(
            "WiFi Access Request\n\
             Package: {name} - {cur} {price}\n\
             Code: {code}\n\
             \n\
             To pay:\n\
             1. Send {cur} {price} to {number} (M-Pesa)\n\
             2. Use code: {code} to confirm payment\n\
             3. You'll receive login details\n\
             \n\
             Valid for 30 minutes.",
            name = package.name,
            cur = self.currency,
            price = package.price,
            code = code,
            number = self.payment_number,
        )
    }

    pub fn login_details(
        &self,
        username: &str,
        password: &str,
        expires_at: NaiveDateTime,
    ) -> String {
        format!(
            "Payment confirmed!\n\
             WiFi Login:\n\
             Username: {username}\n\
             Password: {password}\n\
             Valid until: {expiry} UTC\n\
             \n\
             Connect to \"{network}\" and use these details.",
            expiry = expires_at.format("%d/%m/%Y, %H:%M:%S"),
            network = self.wifi_network,
        )
    }
}
