use actix_web::{HttpResponse, post, web};
use common::BillingError;
use serde::Deserialize;
use serde_json::json;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AccessRequest {
    pub phone: Option<String>,
    pub package: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentConfirmation {
    pub code: Option<String>,
    pub mpesa_ref: Option<String>,
}

#[post("/api/request-access")]
pub async fn request_access(
    body: web::Json<AccessRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, BillingError> {
    let requested = app_state
        .billing
        .request_access(body.phone.as_deref(), body.package.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "code": requested.code,
        "message": "Payment instructions sent! Check console for SMS.",
    })))
}

/// A body that cannot be read carries no usable code.
pub fn confirm_payment_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected payment confirmation body: {}", err);
        BillingError::InvalidOrUsedCode.into()
    })
}

pub async fn confirm_payment(
    body: web::Json<PaymentConfirmation>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, BillingError> {
    let granted = app_state
        .billing
        .confirm_payment(body.code.as_deref(), body.mpesa_ref.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "username": granted.username,
        "password": granted.password,
        "message": "Check console for login details!",
    })))
}
