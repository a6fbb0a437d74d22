use actix_web::{HttpResponse, get, web};
use common::BillingError;

use crate::state::AppState;

const RECENT_TRANSACTIONS_LIMIT: i64 = 100;

#[get("/api/transactions")]
pub async fn get_transactions(
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, BillingError> {
    let transactions = app_state
        .billing
        .recent_transactions(RECENT_TRANSACTIONS_LIMIT)
        .await?;

    Ok(HttpResponse::Ok().json(transactions))
}
