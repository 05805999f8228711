use actix_web::{http::StatusCode, test::TestRequest};
use delivery_engine::db_types::{Ad, Category, DeliveryAddress, Product};
use serde_json::json;

use super::helpers::{alice, bearer, send, TestStores};

#[actix_web::test]
async fn categories_and_ads() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.catalog.expect_fetch_categories().returning(|| {
        Ok(vec![Category { id: "c1".into(), name: "Fruit".into(), image_url: "https://img/fruit.png".into() }])
    });
    let req = TestRequest::get().uri("/categories").insert_header(bearer(&alice()));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "c1", "name": "Fruit", "imageUrl": "https://img/fruit.png"}]));

    let mut stores = TestStores::default();
    stores.catalog.expect_fetch_ads().returning(|| {
        Ok(vec![Ad {
            id: "ad1".into(),
            image_url: "https://img/sale.png".into(),
            action: "c1".into(),
            action_type: "category".into(),
        }])
    });
    let req = TestRequest::get().uri("/ads").insert_header(bearer(&alice()));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["actionType"], "category");
}

#[actix_web::test]
async fn catalog_needs_a_token() {
    let _ = env_logger::try_init().ok();
    let (status, _) = send(TestStores::default(), TestRequest::get().uri("/categories")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn products_in_category() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.catalog.expect_fetch_products_in_category().withf(|id| id == "c1").times(1).returning(|id| {
        Ok(vec![Product {
            id: "p1".into(),
            name: "Apple".into(),
            description: "Crunchy".into(),
            price: 1.25,
            image_url: String::default(),
            category_id: id.into(),
        }])
    });
    let req = TestRequest::get().uri("/products/c1").insert_header(bearer(&alice()));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["price"], 1.25);
    assert_eq!(body[0]["categoryId"], "c1");

    let mut stores = TestStores::default();
    stores.catalog.expect_fetch_products_in_category().returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/products/empty").insert_header(bearer(&alice()));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn create_address() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores
        .addresses
        .expect_insert_address()
        .withf(|a| a.user_id.as_str() == "u-alice" && a.name == "Home" && a.latitude == Some(-33.9))
        .times(1)
        .returning(|_| Ok(()));
    let body = json!({"name": " Home ", "addressLine": "1 Main St", "latitude": -33.9, "longitude": 18.4});
    let req = TestRequest::post().uri("/delivery-addresses").insert_header(bearer(&alice())).set_json(body);
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], "u-alice");
    assert_eq!(body["name"], "Home");
    assert_eq!(body["longitude"], 18.4);
    assert!(body["id"].is_string());
}

#[actix_web::test]
async fn invalid_addresses() {
    let _ = env_logger::try_init().ok();
    let body = json!({"name": " ", "addressLine": "1 Main St"});
    let req = TestRequest::post().uri("/delivery-addresses").insert_header(bearer(&alice())).set_json(body);
    let (status, body) = send(TestStores::default(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and address line are required");

    let body = json!({"name": "Work", "addressLine": "2 Side St", "latitude": 1.0});
    let req = TestRequest::post().uri("/delivery-addresses").insert_header(bearer(&alice())).set_json(body);
    let (status, body) = send(TestStores::default(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Latitude and longitude must be given together");
}

#[actix_web::test]
async fn my_addresses() {
    let _ = env_logger::try_init().ok();
    let mut stores = TestStores::default();
    stores.addresses.expect_fetch_addresses_for_user().withf(|id| id.as_str() == "u-alice").returning(|id| {
        Ok(vec![DeliveryAddress {
            id: "addr-1".into(),
            user_id: id.clone(),
            name: "Home".into(),
            address_line: "1 Main St".into(),
            latitude: None,
            longitude: None,
        }])
    });
    let req = TestRequest::get().uri("/delivery-addresses").insert_header(bearer(&alice()));
    let (status, body) = send(stores, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": "addr-1", "userId": "u-alice", "name": "Home", "addressLine": "1 Main St"}]));
}
