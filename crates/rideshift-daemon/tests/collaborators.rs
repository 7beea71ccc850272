mod common;

use axum::http::{Method, StatusCode};
use common::{app, get, post, put, seeded_app, send};
use serde_json::json;

#[tokio::test]
async fn payment_transfer_and_status() {
    let app = app();
    let (status, receipt) = post(
        &app,
        "/api/payments",
        json!({
            "rideId": "ride_001",
            "amount": 14.09,
            "fromAddress": "0xrider",
            "toAddress": "0xdriver"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["status"], "completed");
    assert_eq!(receipt["gasUsed"], "21000");
    let hash = receipt["transactionHash"].as_str().unwrap();
    assert!(hash.starts_with("0x"));
    assert_eq!(hash.len(), 66);

    let (status, tx) = get(&app, &format!("/api/payments?transactionHash={hash}")).await;
    assert_eq!(status, StatusCode::OK);
    let confirmations = tx["confirmations"].as_u64().unwrap();
    assert!((1..=12).contains(&confirmations));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let app = app();
    for amount in [0.0, -3.5] {
        let (status, err) = post(
            &app,
            "/api/payments",
            json!({
                "rideId": "ride_001",
                "amount": amount,
                "fromAddress": "0xrider",
                "toAddress": "0xdriver"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "Amount must be greater than 0");
    }

    let (status, err) = put(&app, "/api/payments", json!({ "toAddress": "0xdriver" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "amount is required");
}

#[tokio::test]
async fn gas_estimate_uses_fixed_price() {
    let app = app();
    let (status, estimate) = put(
        &app,
        "/api/payments",
        json!({ "amount": 10.0, "toAddress": "0xdriver" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(estimate["gasLimit"], "21000");
    assert_eq!(estimate["gasPrice"], "20000000000");
    assert!(estimate["estimatedCostUSD"].is_string());
}

#[tokio::test]
async fn nft_mint_then_transfer() {
    let app = app();
    let (status, minted) = post(
        &app,
        "/api/nft",
        json!({
            "userId": "driver-1",
            "driverProfile": {
                "vehicleDetails": "2021 Honda Civic, Grey",
                "licenseNumber": "DL555"
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(minted["status"], "minted");
    assert_eq!(minted["metadata"]["name"], "RideShift Driver - driver-1");

    let (status, transfer) = put(
        &app,
        "/api/nft",
        json!({
            "tokenId": minted["tokenId"],
            "fromAddress": "0xold",
            "toAddress": "0xnew"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transfer["toAddress"], "0xnew");

    let (status, err) = post(&app, "/api/nft", json!({ "userId": "driver-1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "driverProfile is required");
}

#[tokio::test]
async fn nft_metadata_lookup() {
    let app = app();
    let (status, token) = get(&app, "/api/nft?tokenId=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(token["name"], "RideShift Driver #7");
    assert!(token["attributes"].is_array());

    let (status, _) = get(&app, "/api/nft").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn maps_route_between_landmarks() {
    let app = app();
    let (status, body) = get(
        &app,
        "/api/maps?action=route&pickup=Times%20Square%2C%20New%20York&destination=Central%20Park%2C%20New%20York",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let distance = body["route"]["distance"].as_f64().unwrap();
    assert!((distance - 3.25).abs() < 0.05);
    assert_eq!(body["route"]["waypoints"].as_array().unwrap().len(), 2);
    assert_eq!(body["pickup"]["coordinates"]["lat"], 40.758);
}

#[tokio::test]
async fn maps_nearby_and_batch_geocode() {
    let app = app();
    let (status, err) = get(&app, "/api/maps?action=nearby&lat=40.7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "lat and lng parameters are required");

    let (status, nearby) = get(&app, "/api/maps?action=nearby&lat=40.75&lng=-73.98").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(nearby["radius"], 5.0);
    assert!(!nearby["drivers"].as_array().unwrap().is_empty());

    let (status, batch) = post(
        &app,
        "/api/maps",
        json!({
            "action": "batch-geocode",
            "addresses": ["Wall Street, New York", "Somewhere else"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = batch["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1]["address"], "Somewhere else");

    let (status, _) = get(&app, "/api/maps?action=teleport").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn realtime_messages() {
    let app = app();

    let (status, pong) = post(&app, "/api/ws", json!({ "action": "ping", "userId": "u1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pong["type"], "pong");
    assert!(pong.get("channels").is_none());

    let (_, subscribed) = post(&app, "/api/ws", json!({ "action": "subscribe", "userId": "u1" })).await;
    assert_eq!(subscribed["type"], "subscription_confirmed");
    assert_eq!(subscribed["channels"], json!(["rides", "drivers", "governance"]));

    let (_, chosen) = post(
        &app,
        "/api/ws",
        json!({ "action": "subscribe", "userId": "u1", "data": { "channels": ["rides"] } }),
    )
    .await;
    assert_eq!(chosen["channels"], json!(["rides"]));

    let (status, _) = post(&app, "/api/ws", json!({ "action": "shout", "userId": "u1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn realtime_polls_read_live_registries() {
    let app = seeded_app();

    let (status, governance) = get(&app, "/api/ws?action=governance-updates&userId=demo-user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(governance["type"], "governance_update");
    assert_eq!(governance["proposals"].as_array().unwrap().len(), 2);

    let (_, rides) = get(&app, "/api/ws?action=ride-updates&userId=demo-user").await;
    assert_eq!(rides["type"], "ride_update");
    assert_eq!(rides["rides"], json!([]));

    let (_, drivers) = get(&app, "/api/ws?action=driver-location&userId=demo-user").await;
    assert_eq!(drivers["type"], "driver_location");
    assert!(drivers["drivers"][0]["eta"].is_u64());

    let (status, _) = get(&app, "/api/ws?action=ride-updates").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_status_and_fallback() {
    let app = seeded_app();

    let (status, health) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");

    let (_, daemon) = get(&app, "/api/status").await;
    assert_eq!(daemon["stats"]["totalRides"], 1);
    assert_eq!(daemon["stats"]["openRides"], 0);
    assert_eq!(daemon["stats"]["activeDrivers"], 1);
    assert_eq!(daemon["stats"]["pendingProposals"], 2);
    assert_eq!(daemon["stats"]["totalUsers"], 1);

    let (status, missing) = get(&app, "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unsupported_method_uses_error_body() {
    let app = app();

    let (status, body) = send(&app, Method::DELETE, "/api/rides", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(body["error"], "DELETE is not supported on /api/rides");

    let (status, body) = send(&app, Method::PATCH, "/api/users", Some(json!({}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
}
