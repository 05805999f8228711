use actix_web::{
    http::StatusCode,
    test::{self, TestRequest},
    web,
    App,
};
use delivery_engine::{
    db_types::{Ad, Category, Product},
    OtpGenerator,
    SqliteDatabase,
    TableNames,
};
use log::debug;
use serde_json::{json, Value};

use super::helpers::token_issuer;
use crate::{
    routes::{build_router, DeliveryApis},
    server::{configure_dispatch, not_found},
};

/// Sends a request to an initialised service and returns the status and JSON body.
macro_rules! call {
    ($service:expr, $req:expr) => {{
        let res = test::call_service(&$service, $req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        debug!("🚀️ Response: {status} {}", String::from_utf8_lossy(&body));
        let json = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).expect("Not JSON") };
        (status, json)
    }};
}

async fn seeded_db() -> SqliteDatabase {
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1, TableNames::default())
        .await
        .expect("Error creating in-memory database");
    db.create_schema().await.expect("Error creating schema");
    let category = Category { id: "cat-fruit".into(), name: "Fruit".into(), image_url: "fruit.png".into() };
    db.insert_category(&category).await.expect("Error inserting category");
    let product = Product {
        id: "p-mango".into(),
        name: "Mango".into(),
        description: "Ripe".into(),
        price: 5.0,
        image_url: "mango.png".into(),
        category_id: category.id.clone(),
    };
    db.insert_product(&product).await.expect("Error inserting product");
    let ad = Ad {
        id: "ad-1".into(),
        image_url: "sale.png".into(),
        action: category.id.clone(),
        action_type: "category".into(),
    };
    db.insert_ad(&ad).await.expect("Error inserting ad");
    db
}

#[actix_web::test]
async fn order_lifecycle_over_http() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let router = build_router(DeliveryApis::new(db.clone(), OtpGenerator::default(), None), token_issuer());
    let app = App::new().configure(configure_dispatch(router)).default_service(web::to(not_found));
    let service = test::init_service(app).await;

    let req = TestRequest::post().uri("/users/register").set_json(json!({"name": "A", "phone": "+1"}));
    let (status, _) = call!(service, req);
    assert_eq!(status, StatusCode::CREATED);

    let req = TestRequest::post().uri("/users/send-otp").set_json(json!({"phone": "+1"}));
    let (status, _) = call!(service, req);
    assert_eq!(status, StatusCode::OK);

    let req = TestRequest::post().uri("/users/verify-otp").set_json(json!({"phone": "+1", "otp": "123456"}));
    let (status, body) = call!(service, req);
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("No token in response").to_string();
    let auth = ("Authorization", format!("Bearer {token}"));

    // The same code cannot be used again
    let req = TestRequest::post().uri("/users/verify-otp").set_json(json!({"phone": "+1", "otp": "123456"}));
    let (status, _) = call!(service, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = TestRequest::get().uri("/ads").insert_header(auth.clone());
    let (status, body) = call!(service, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "ad-1", "imageUrl": "sale.png", "action": "cat-fruit", "actionType": "category"}]));

    let body = json!({"name": "Home", "addressLine": "1 Main St"});
    let req = TestRequest::post().uri("/delivery-addresses").insert_header(auth.clone()).set_json(body);
    let (status, body) = call!(service, req);
    assert_eq!(status, StatusCode::CREATED);
    let address_id = body["id"].as_str().expect("No address id").to_string();

    let body = json!({"deliveryAddressId": address_id, "items": [{"productId": "p-mango", "quantity": 2}]});
    let req = TestRequest::post().uri("/orders").insert_header(auth.clone()).set_json(body);
    let (status, body) = call!(service, req);
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["total"], 10.0);
    assert_eq!(body["order"]["status"], "pending");
    let order_id = body["order"]["id"].as_str().expect("No order id").to_string();

    let cancel = format!("/orders/{order_id}/cancel");
    let (status, body) = call!(service, TestRequest::post().uri(&cancel).insert_header(auth.clone()));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "canceled");

    let (status, body) = call!(service, TestRequest::post().uri(&cancel).insert_header(auth.clone()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid status transition."), "{body}");

    let (status, body) = call!(service, TestRequest::get().uri(&format!("/orders/{order_id}")).insert_header(auth));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "canceled");
    assert_eq!(body["items"][0]["quantity"], 2);
    db.close().await;
}
