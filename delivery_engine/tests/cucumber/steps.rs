use cucumber::{given, then, when};
use delivery_engine::{
    db_types::{NewDeliveryAddress, NewUser, OrderStatusType},
    order_objects::NewOrderRequest,
    AddressApi,
};

use crate::cucumber::DeliveryWorld;

#[when(expr = "customer '{word}' registers with phone '{word}'")]
async fn register(world: &mut DeliveryWorld, name: String, phone: String) {
    let result = world.system().auth.register(NewUser::new(name.clone(), phone)).await;
    if let Some(user) = world.record(result) {
        world.customers.insert(name, user);
    }
}

#[when(expr = "customer '{word}' requests a one-time password")]
async fn request_otp(world: &mut DeliveryWorld, name: String) {
    let phone = world.customer(&name).phone.clone();
    let result = world.system().auth.send_otp(&phone).await;
    world.record(result);
}

#[when(expr = "customer '{word}' verifies with code '{word}'")]
async fn verify_otp(world: &mut DeliveryWorld, name: String, code: String) {
    let phone = world.customer(&name).phone.clone();
    let result = world.system().auth.verify_otp(&phone, &code).await;
    world.record(result);
}

#[given(expr = "customer '{word}' has a delivery address called '{word}'")]
async fn add_address(world: &mut DeliveryWorld, name: String, label: String) {
    let user_id = world.customer(&name).id.clone();
    let api = AddressApi::new(world.system().db.clone());
    let address = api
        .create_address(&user_id, NewDeliveryAddress::new(label.clone(), "12 Harbour Street"))
        .await
        .expect("Error creating address");
    world.addresses.insert((name, label), address.id);
}

#[when(expr = "customer '{word}' orders {int} of '{word}' to '{word}'")]
async fn place_order(world: &mut DeliveryWorld, name: String, quantity: i64, product: String, label: String) {
    let owner = name.clone();
    order_to(world, name, owner, quantity, product, label).await;
}

#[when(expr = "customer '{word}' orders {int} of '{word}' to the '{word}' address of '{word}'")]
async fn place_order_to_someone_else(
    world: &mut DeliveryWorld,
    name: String,
    quantity: i64,
    product: String,
    label: String,
    owner: String,
) {
    order_to(world, name, owner, quantity, product, label).await;
}

async fn order_to(
    world: &mut DeliveryWorld,
    name: String,
    owner: String,
    quantity: i64,
    product: String,
    label: String,
) {
    let user_id = world.customer(&name).id.clone();
    let address_id = world.addresses.get(&(owner, label)).cloned().expect("Unknown delivery address");
    let request = NewOrderRequest::new(address_id).with_item(product, quantity);
    let result = world.system().orders.create_order(&user_id, request).await;
    if let Some(created) = world.record(result) {
        world.last_order = Some(created.order);
    }
}

#[when(expr = "customer '{word}' cancels the order")]
async fn cancel_order(world: &mut DeliveryWorld, name: String) {
    let user_id = world.customer(&name).id.clone();
    let order_id = world.last_order().id.clone();
    let result = world.system().orders.cancel_order(&user_id, &order_id).await;
    if let Some(order) = world.record(result) {
        world.last_order = Some(order);
    }
}

#[then("the last step succeeded")]
async fn last_step_succeeded(world: &mut DeliveryWorld) {
    assert!(world.last_error.is_none(), "Unexpected error: {:?}", world.last_error);
}

#[then(regex = r#"^the last step failed with "(.+)"$"#)]
async fn last_step_failed(world: &mut DeliveryWorld, message: String) {
    let err = world.last_error.as_deref().expect("The last step did not fail");
    assert!(err.contains(&message), "Expected an error containing '{message}', got '{err}'");
}

#[then(expr = "the order total is {float}")]
async fn order_total(world: &mut DeliveryWorld, total: f64) {
    assert!((world.last_order().total - total).abs() < 1e-9, "Order total was {}", world.last_order().total);
}

#[then(expr = "the order status is {word}")]
async fn order_status(world: &mut DeliveryWorld, status: String) {
    let expected = status.parse::<OrderStatusType>().expect("Not a valid order status");
    assert_eq!(world.last_order().status, expected);
}
