use actix_web::{http::StatusCode, test::TestRequest};
use chrono::{Duration, Utc};
use delivery_engine::{db_types::User, StoreError};
use serde_json::json;

use super::helpers::{alice, bearer, send, token_issuer, TestStores};

fn with_otp(user: User, otp: &str, valid_for: Duration) -> User {
    User { otp: Some(otp.to_string()), otp_expires_at: Some(Utc::now() + valid_for), ..user }
}

#[actix_web::test]
async fn register_new_user() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.auth.expect_fetch_user_by_phone().returning(|_| Ok(None));
    stores
        .auth
        .expect_insert_user()
        .withf(|user| user.phone == "+1" && user.otp.as_deref() == Some("123456") && user.otp_expires_at.is_some())
        .times(1)
        .returning(|_| Ok(()));
    let req = TestRequest::post().uri("/users/register").set_json(json!({"name": "A", "phone": "+1"}));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "A");
    assert_eq!(body["phone"], "+1");
    assert!(body["id"].is_string());
    assert!(body.get("otp").is_none(), "OTP leaked: {body}");
    assert!(body.get("otpExpiresAt").is_none(), "OTP expiry leaked: {body}");
}

#[actix_web::test]
async fn register_with_taken_phone() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.auth.expect_fetch_user_by_phone().returning(|_| Ok(Some(alice())));
    let req = TestRequest::post().uri("/users/register").set_json(json!({"name": "A", "phone": "+15550001"}));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict. Phone number is already registered");
}

#[actix_web::test]
async fn register_race_is_caught_by_the_store() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    // The lookup sees nothing, but a concurrent registration wins the conditional write
    stores.auth.expect_fetch_user_by_phone().returning(|_| Ok(None));
    stores
        .auth
        .expect_insert_user()
        .returning(|_| Err(StoreError::ConditionFailed("UNIQUE constraint failed: users.phone".into())));
    let req = TestRequest::post().uri("/users/register").set_json(json!({"name": "A", "phone": "+1"}));
    let (status, _) = send(stores, req).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn register_with_bad_input() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/users/register").set_payload("not json");
    let (status, body) = send(TestStores::default(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Could not read request body."));

    let req = TestRequest::post().uri("/users/register").set_json(json!({"name": " ", "phone": "+1"}));
    let (status, body) = send(TestStores::default(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and phone are required");
}

#[actix_web::test]
async fn send_otp_resets_the_code() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.auth.expect_fetch_user_by_phone().returning(|_| Ok(Some(alice())));
    stores
        .auth
        .expect_update_otp()
        .withf(|id, otp, expiry| {
            id.as_str() == "u-alice" && otp.as_deref() == Some("123456") && expiry.is_some_and(|t| t > Utc::now())
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let req = TestRequest::post().uri("/users/send-otp").set_json(json!({"phone": "+15550001"}));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn send_otp_to_unknown_phone() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.auth.expect_fetch_user_by_phone().returning(|_| Ok(None));
    let req = TestRequest::post().uri("/users/send-otp").set_json(json!({"phone": "+19999"}));
    let (status, _) = send(stores, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn verify_otp_issues_a_token() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.auth.expect_fetch_user_by_phone().returning(|_| Ok(Some(with_otp(alice(), "123456", Duration::minutes(2)))));
    stores
        .auth
        .expect_consume_otp()
        .withf(|id, otp| id.as_str() == "u-alice" && otp == "123456")
        .times(1)
        .returning(|_, _| Ok(true));
    let req = TestRequest::post().uri("/users/verify-otp").set_json(json!({"phone": "+15550001", "otp": "123456"}));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"], json!({"id": "u-alice", "name": "Alice", "phone": "+15550001"}));
    let claims = token_issuer().validate(body["token"].as_str().unwrap()).expect("Token is not valid");
    assert_eq!(claims.user_id, "u-alice");
    assert_eq!(claims.sub, "u-alice");
    assert_eq!(claims.name, "Alice");
    assert_eq!(claims.phone, "+15550001");
    assert_eq!(claims.iss, "delivery-app");
}

#[actix_web::test]
async fn verify_with_an_already_consumed_code() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.auth.expect_fetch_user_by_phone().returning(|_| Ok(Some(with_otp(alice(), "123456", Duration::minutes(2)))));
    // Another verification cleared the code between the read and the write
    stores.auth.expect_consume_otp().times(1).returning(|_, _| Ok(false));
    let req = TestRequest::post().uri("/users/verify-otp").set_json(json!({"phone": "+15550001", "otp": "123456"}));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("token").is_none());
}

#[actix_web::test]
async fn verify_with_wrong_or_stale_codes() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.auth.expect_fetch_user_by_phone().returning(|_| Ok(Some(with_otp(alice(), "123456", Duration::minutes(2)))));
    let req = TestRequest::post().uri("/users/verify-otp").set_json(json!({"phone": "+15550001", "otp": "654321"}));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication error. Invalid one-time password.");

    let mut stores = TestStores::default();
    let stale = with_otp(alice(), "123456", Duration::minutes(-1));
    stores.auth.expect_fetch_user_by_phone().returning(move |_| Ok(Some(stale.clone())));
    let req = TestRequest::post().uri("/users/verify-otp").set_json(json!({"phone": "+15550001", "otp": "123456"}));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication error. The one-time password has expired.");
}

#[actix_web::test]
async fn protected_routes_need_a_valid_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send(TestStores::default(), TestRequest::get().uri("/orders")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication error. No bearer token was provided.");

    let req = TestRequest::get().uri("/orders").insert_header(("Authorization", "Bearer made.up.nonsense"));
    let (status, _) = send(TestStores::default(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut token = bearer(&alice());
    token.1.replace_range(token.1.len() - 10..token.1.len() - 5, "00000");
    let (status, body) = send(TestStores::default(), TestRequest::get().uri("/orders").insert_header(token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().starts_with("Authentication error. Access token is invalid."), "{body}");
}

#[actix_web::test]
async fn health_and_unknown_routes() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send(TestStores::default(), TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "👍️");

    let (status, body) = send(TestStores::default(), TestRequest::get().uri("/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No route for GET /nowhere");

    // Known path, unknown method
    let (status, _) = send(TestStores::default(), TestRequest::delete().uri("/orders")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
