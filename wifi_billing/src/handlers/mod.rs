mod access;
mod transactions;

use actix_web::{HttpResponse, Responder, get, web};
use common::BillingError;

pub use access::*;
pub use transactions::*;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Welcome to WiFi Billing Service!")
}

/// Registers every route. Malformed JSON bodies are answered like any other
/// invalid request, or as an unusable code on payment confirmation.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected request body: {}", err);
        BillingError::InvalidRequest.into()
    }))
    .service(index)
    .service(request_access)
    .service(
        web::resource("/api/confirm-payment")
            .app_data(confirm_payment_json_config())
            .route(web::post().to(confirm_payment)),
    )
    .service(get_transactions);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use common::{BillingService, Catalog, ConsoleNotifier, MessageSettings, TransactionStore};
    use serde_json::{Value, json};

    use crate::state::AppState;

    async fn test_state() -> web::Data<AppState> {
        let store = TransactionStore::in_memory().await.unwrap();
        let billing = BillingService::new(
            store,
            Catalog::default(),
            Arc::new(ConsoleNotifier),
            MessageSettings::default(),
        );
        web::Data::new(AppState::from_billing(billing))
    }

    macro_rules! app {
        ($data:expr) => {
            test::init_service(
                App::new()
                    .app_data($data.clone())
                    .configure(super::configure),
            )
            .await
        };
    }

    fn is_upper_hex(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    }

    #[actix_web::test]
    async fn request_then_confirm_scenario() {
        let data = test_state().await;
        let app = app!(data);

        let req = test::TestRequest::post()
            .uri("/api/request-access")
            .set_json(json!({"phone": "0711111111", "package": "1h"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        let code = body["code"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 8);
        assert!(is_upper_hex(&code));

        let stored = data
            .billing
            .store()
            .find_pending_by_code(&code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.amount, 10);
        assert_eq!(stored.status.to_string(), "pending");

        let req = test::TestRequest::post()
            .uri("/api/confirm-payment")
            .set_json(json!({"code": code, "mpesa_ref": "QK71ABC123"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert!(body["username"].as_str().unwrap().starts_with("user"));
        let password = body["password"].as_str().unwrap();
        assert_eq!(password.len(), 6);
        assert!(password.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(body["username"], json!(stored.username));

        let req = test::TestRequest::post()
            .uri("/api/confirm-payment")
            .set_json(json!({"code": code, "mpesa_ref": "QK71ABC123"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid code or already used"}));
    }

    #[actix_web::test]
    async fn unknown_package_is_rejected_without_a_row() {
        let data = test_state().await;
        let app = app!(data);

        let req = test::TestRequest::post()
            .uri("/api/request-access")
            .set_json(json!({"phone": "0711111111", "package": "unknown"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid request"}));

        let req = test::TestRequest::get().uri("/api/transactions").to_request();
        let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(rows.is_empty());
    }

    #[actix_web::test]
    async fn missing_phone_and_malformed_body_are_invalid_requests() {
        let data = test_state().await;
        let app = app!(data);

        let req = test::TestRequest::post()
            .uri("/api/request-access")
            .set_json(json!({"package": "1h"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/request-access")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid request"}));
    }

    #[actix_web::test]
    async fn unreadable_confirmation_body_is_an_unusable_code() {
        let data = test_state().await;
        let app = app!(data);

        let req = test::TestRequest::post()
            .uri("/api/confirm-payment")
            .insert_header(("content-type", "application/json"))
            .set_payload("code=DEADBEEF")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid code or already used"}));
    }

    #[actix_web::test]
    async fn confirming_unknown_code_matches_used_code_error() {
        let data = test_state().await;
        let app = app!(data);

        let req = test::TestRequest::post()
            .uri("/api/confirm-payment")
            .set_json(json!({"code": "DEADBEEF", "mpesa_ref": "X"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Invalid code or already used"}));
    }

    #[actix_web::test]
    async fn transactions_are_listed_newest_first() {
        let data = test_state().await;
        let app = app!(data);

        let mut codes = Vec::new();
        for package in ["1h", "6h", "12h", "1d"] {
            let req = test::TestRequest::post()
                .uri("/api/request-access")
                .set_json(json!({"phone": "0733333333", "package": package}))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            codes.push(body["code"].as_str().unwrap().to_string());
        }

        let req = test::TestRequest::get().uri("/api/transactions").to_request();
        let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        let listed: Vec<&str> = rows.iter().map(|r| r["code"].as_str().unwrap()).collect();
        codes.reverse();
        assert_eq!(listed, codes);
        assert_eq!(rows[0]["package"], json!("1d"));
        assert_eq!(rows[0]["amount"], json!(50));
        assert_eq!(rows[0]["status"], json!("pending"));
    }

    #[actix_web::test]
    async fn storage_failure_is_internal_error() {
        let data = test_state().await;
        let app = app!(data);
        data.billing.store().close().await;

        let req = test::TestRequest::get().uri("/api/transactions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Database error"}));

        let req = test::TestRequest::post()
            .uri("/api/confirm-payment")
            .set_json(json!({"code": "DEADBEEF"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn index_answers() {
        let data = test_state().await;
        let app = app!(data);
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
