//! End-to-end HTTP tests against the in-memory store.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use homebite::{configure, AppState};

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory()))
                .configure(configure),
        )
        .await
    };
}

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn cook_body(email: &str, lat: f64, lon: f64) -> Value {
    json!({
        "name": "Sunita",
        "email": email,
        "password": "tiffin-secret",
        "phone": "9820000000",
        "bio": "Maharashtrian home food",
        "cuisine_types": ["Maharashtrian"],
        "availability": { "morning": true, "evening": true, "time_slots": "8-11, 18-21" },
        "pincode": "400001",
        "neighborhood": "Fort",
        "latitude": lat,
        "longitude": lon,
        "kitchen_image_urls": ["k1.jpg", "k2.jpg", "k3.jpg"],
        "upi_id": "sunita@upi"
    })
}

fn meal_body(cook_id: &str, price: &str) -> Value {
    json!({
        "cook_id": cook_id,
        "name": "Misal Pav",
        "image_url": "https://img.example/misal.jpg",
        "price": price,
        "calories": 450,
        "quantity_available": 10,
        "category": "Breakfast"
    })
}

fn customer_body(email: &str) -> Value {
    json!({
        "name": "Arjun",
        "email": email,
        "password": "hunter22",
        "phone": "9811111111"
    })
}

fn id_of(v: &Value) -> String {
    v["id"].as_str().unwrap_or_default().to_string()
}

#[actix_web::test]
async fn checkout_then_rate_flow() {
    let app = app!();

    let (status, cook) = send!(
        app,
        test::TestRequest::post()
            .uri("/cooks/register")
            .set_json(cook_body("sunita@example.in", 18.9220, 72.8311))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cook["user"]["role"], "cook");
    let cook_id = id_of(&cook["cook"]);

    let (status, meal) = send!(
        app,
        test::TestRequest::post()
            .uri("/meals")
            .set_json(meal_body(&cook_id, "50.00"))
    );
    assert_eq!(status, StatusCode::CREATED);
    let meal_id = id_of(&meal);

    let (status, customer) = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(customer_body("arjun@example.in"))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert!(customer.get("password_hash").is_none());
    let customer_id = id_of(&customer);

    let items = json!([{
        "meal_id": meal_id,
        "meal_name": "Misal Pav",
        "unit_price": "50.00",
        "quantity": 2,
        "vendor_id": cook_id,
        "vendor_name": "Sunita"
    }]);

    let (status, preview) = send!(
        app,
        test::TestRequest::post()
            .uri("/checkout/preview")
            .set_json(json!({ "items": items }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["vendors"][0]["payment"]["upi_id"], "sunita@upi");
    assert_eq!(preview["vendors"][0]["total_amount"], "100.00");

    let (status, receipt) = send!(
        app,
        test::TestRequest::post()
            .uri("/checkout")
            .set_json(json!({ "customer_id": customer_id, "items": items }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["clear_cart"], true);
    assert_eq!(receipt["orders"].as_array().map(Vec::len), Some(1));
    assert_eq!(receipt["orders"][0]["quantity"], 2);
    assert_eq!(receipt["orders"][0]["status"], "Placed");
    assert_eq!(receipt["orders"][0]["total_price"], "100.00");
    let order_id = id_of(&receipt["orders"][0]);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/orders/{order_id}/status"))
            .set_json(json!({ "status": "Shipped" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, done) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/orders/{order_id}/status"))
            .set_json(json!({ "status": "Completed" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "Completed");

    let (status, rated) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/orders/{order_id}/rate"))
            .set_json(json!({ "rating": 5, "review_text": "Spicy and fresh" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rated["order"]["rating"], 5);
    assert_eq!(rated["cook_rating_count"], 1);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/orders/{order_id}/rate"))
            .set_json(json!({ "rating": 1 }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, profile) = send!(
        app,
        test::TestRequest::get().uri(&format!("/cooks/{cook_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["rating_count"], 1);
    assert_eq!(profile["average_rating"], 5.0);

    let (status, stats) = send!(
        app,
        test::TestRequest::get().uri(&format!("/cooks/{cook_id}/analytics?period=month"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["completed_orders"], 1);
    assert_eq!(stats["total_revenue"], "100.00");
    assert_eq!(stats["meals"][0]["meal_name"], "Misal Pav");

    let (status, history) = send!(
        app,
        test::TestRequest::get().uri(&format!("/orders/user/{customer_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn accounts_reject_duplicates_and_bad_passwords() {
    let app = app!();

    let register = || {
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(customer_body("dup@example.in"))
    };
    let (status, _) = send!(app, register());
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send!(app, register());
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "dup@example.in", "password": "wrong" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, user) = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "DUP@example.in", "password": "hunter22" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "dup@example.in");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "name": "No Email" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn nearby_search_reports_distance() {
    let app = app!();

    // About 1 km north of the search point.
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/cooks/register")
            .set_json(cook_body("near@example.in", 18.9310, 72.8311))
    );
    assert_eq!(status, StatusCode::CREATED);
    let mut far = cook_body("far@example.in", 0.0, 0.0);
    far["latitude"] = json!(28.6139);
    far["longitude"] = json!(77.2090);
    let (status, _) = send!(
        app,
        test::TestRequest::post().uri("/cooks/register").set_json(far)
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, found) = send!(
        app,
        test::TestRequest::get().uri("/cooks/nearby?lat=18.9220&lng=72.8311&max_distance=5")
    );
    assert_eq!(status, StatusCode::OK);
    let found = found.as_array().cloned().unwrap_or_default();
    assert_eq!(found.len(), 1);
    let distance = found[0]["distance"].as_f64().unwrap_or(f64::NAN);
    assert!((distance - 1.0008).abs() < 0.01, "distance was {distance}");

    let (status, by_pin) = send!(app, test::TestRequest::get().uri("/cooks/pincode/400001"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_pin.as_array().map(Vec::len), Some(2));

    let (status, _) = send!(app, test::TestRequest::get().uri("/cooks/nearby?lat=abc&lng=1"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cook_registration_validation() {
    let app = app!();

    let mut body = cook_body("few@example.in", 18.92, 72.83);
    body["kitchen_image_urls"] = json!(["only-one.jpg"]);
    let (status, _) = send!(
        app,
        test::TestRequest::post().uri("/cooks/register").set_json(body)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = cook_body("nowhere@example.in", 0.0, 0.0);
    body["pincode"] = json!("999999");
    if let Some(fields) = body.as_object_mut() {
        fields.remove("latitude");
        fields.remove("longitude");
    }
    let (status, _) = send!(
        app,
        test::TestRequest::post().uri("/cooks/register").set_json(body)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_and_unknown_ids() {
    let app = app!();

    let (status, body) = send!(app, test::TestRequest::get().uri("/orders/not-a-uuid"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("path"));

    let (status, _) = send!(
        app,
        test::TestRequest::get().uri(&format!("/orders/{}", uuid::Uuid::new_v4()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        app,
        test::TestRequest::get().uri(&format!("/meals/{}", uuid::Uuid::new_v4()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn batch_with_a_missing_meal_is_partial() {
    let app = app!();

    let (_, cook) = send!(
        app,
        test::TestRequest::post()
            .uri("/cooks/register")
            .set_json(cook_body("batch@example.in", 18.92, 72.83))
    );
    let cook_id = id_of(&cook["cook"]);
    let (_, meal) = send!(
        app,
        test::TestRequest::post()
            .uri("/meals")
            .set_json(meal_body(&cook_id, "35.50"))
    );
    let (_, customer) = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(customer_body("batcher@example.in"))
    );

    let line = |meal_id: String| {
        json!({
            "customer_id": id_of(&customer),
            "cook_id": cook_id,
            "meal_id": meal_id,
            "quantity": 1
        })
    };
    let (status, outcome) = send!(
        app,
        test::TestRequest::post().uri("/orders/batch").set_json(json!({
            "orders": [line(id_of(&meal)), line(uuid::Uuid::new_v4().to_string())]
        }))
    );
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(outcome["message"], "1 of 2 orders placed, please retry the rest");
    assert_eq!(outcome["failed"][0]["index"], 1);

    let (status, _) = send!(
        app,
        test::TestRequest::post().uri("/orders/batch").set_json(json!({
            "orders": [{
                "customer_id": id_of(&customer),
                "cook_id": cook_id,
                "meal_id": id_of(&meal),
                "quantity": 0
            }]
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, orders) = send!(
        app,
        test::TestRequest::get().uri(&format!("/orders/cook/{cook_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn checkout_reports_failures_by_request_position() {
    let app = app!();

    let mut cook_ids = Vec::new();
    let mut meal_ids = Vec::new();
    for (email, lat) in [("asha@example.in", 18.92), ("rekha@example.in", 18.93)] {
        let (_, cook) = send!(
            app,
            test::TestRequest::post()
                .uri("/cooks/register")
                .set_json(cook_body(email, lat, 72.83))
        );
        let cook_id = id_of(&cook["cook"]);
        let (_, meal) = send!(
            app,
            test::TestRequest::post()
                .uri("/meals")
                .set_json(meal_body(&cook_id, "40.00"))
        );
        meal_ids.push(id_of(&meal));
        cook_ids.push(cook_id);
    }
    let (_, customer) = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(customer_body("kiran@example.in"))
    );

    let item = |meal_id: &str, vendor: usize| {
        json!({
            "meal_id": meal_id,
            "unit_price": "40.00",
            "quantity": 1,
            "vendor_id": cook_ids[vendor],
            "vendor_name": "Cook"
        })
    };
    let gone_second = uuid::Uuid::new_v4().to_string();
    let gone_first = uuid::Uuid::new_v4().to_string();
    let items = json!([
        item(&meal_ids[0], 0),
        item(&meal_ids[0], 0),
        item(&gone_second, 1),
        item(&gone_first, 0)
    ]);

    let (status, receipt) = send!(
        app,
        test::TestRequest::post()
            .uri("/checkout")
            .set_json(json!({ "customer_id": id_of(&customer), "items": items }))
    );
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(receipt["clear_cart"], false);
    assert_eq!(receipt["orders"][0]["quantity"], 2);

    let failed = receipt["failed"].as_array().cloned().unwrap_or_default();
    let mut reported: Vec<(u64, String)> = failed
        .iter()
        .map(|f| {
            (
                f["index"].as_u64().unwrap_or(u64::MAX),
                f["meal_id"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    reported.sort();
    assert_eq!(reported, vec![(2, gone_second), (3, gone_first)]);
}

#[actix_web::test]
async fn merged_cart_quantity_overflow_is_rejected() {
    let app = app!();
    let meal_id = uuid::Uuid::new_v4();
    let line = json!({
        "meal_id": meal_id,
        "unit_price": "10.00",
        "quantity": i32::MAX,
        "vendor_id": uuid::Uuid::new_v4(),
        "vendor_name": "Cook"
    });

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/checkout/preview")
            .set_json(json!({ "items": [line.clone(), line] }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("too large"));
}
