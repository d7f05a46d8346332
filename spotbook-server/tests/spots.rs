mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn lists_with_filters_and_pages() {
    let app = TestApp::new();
    let (_, host) = app.signup("host").await;
    for (name, price) in [("Cheap", 50.0), ("Middle", 150.0), ("Pricey", 500.0)] {
        app.create_spot(&host, name, price).await;
    }

    let (status, body) = app.get("/api/spots", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Spots"].as_array().unwrap().len(), 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["size"], 20);
    assert_eq!(body["Spots"][0]["avgRating"], json!(null));
    assert_eq!(body["Spots"][0]["previewImage"], json!(null));

    let (_, body) = app.get("/api/spots?minPrice=100&maxPrice=200", None).await;
    let names = body["Spots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|spot| spot["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Middle"]);

    let (_, body) = app.get("/api/spots?page=2&size=2", None).await;
    assert_eq!(body["Spots"].as_array().unwrap().len(), 1);
    assert_eq!(body["Spots"][0]["name"], "Pricey");
    assert_eq!(body["page"], 2);
    assert_eq!(body["size"], 2);

    let (status, body) = app.get("/api/spots?page=nope&minLat=-500", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Spots"].as_array().unwrap().len(), 3);
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn detail_includes_owner_images_and_rating() {
    let app = TestApp::new();
    let (host_id, host) = app.signup("host").await;
    let (_, guest) = app.signup("guest").await;
    let spot_id = app.create_spot(&host, "Beach House", 120.0).await;

    let (status, image) = app
        .post(
            &format!("/api/spots/{spot_id}/images"),
            Some(&host),
            json!({ "url": "https://example.com/a.jpg", "preview": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(image["preview"], true);
    assert!(image.get("spotId").is_none());

    app.post(
        &format!("/api/spots/{spot_id}/reviews"),
        Some(&guest),
        json!({ "review": "Lovely", "stars": 4 }),
    )
    .await;

    let (status, body) = app.get(&format!("/api/spots/{spot_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Owner"]["id"], host_id);
    assert_eq!(body["SpotImages"].as_array().unwrap().len(), 1);
    assert_eq!(body["numReviews"], 1);
    assert_eq!(body["avgStarRating"], 4.0);

    let (_, body) = app.get("/api/spots", None).await;
    assert_eq!(body["Spots"][0]["previewImage"], "https://example.com/a.jpg");
    assert_eq!(body["Spots"][0]["avgRating"], 4.0);

    let (status, body) = app.get("/api/spots/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Spot couldn't be found");
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let app = TestApp::new();
    let (_, host) = app.signup("host").await;

    let (status, body) = app
        .post("/api/spots", Some(&host), json!({ "lat": 91, "name": "Shack" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");
    assert_eq!(body["errors"]["address"], "Street address is required");
    assert_eq!(body["errors"]["lat"], "Latitude must be within -90 and 90");
    assert_eq!(body["errors"]["lng"], "Longitude is required");
    assert!(body["errors"].get("name").is_none());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new();
    let (_, host) = app.signup("host").await;

    let (status, body) = app
        .raw(
            axum::http::Method::POST,
            "/api/spots",
            Some(&host),
            Some(json!("not an object")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn only_the_owner_may_change_a_spot() {
    let app = TestApp::new();
    let (_, host) = app.signup("host").await;
    let (_, guest) = app.signup("guest").await;
    let spot_id = app.create_spot(&host, "Beach House", 120.0).await;
    let uri = format!("/api/spots/{spot_id}");

    let update = json!({
        "address": "1 Ocean Ave",
        "city": "Malibu",
        "state": "CA",
        "country": "USA",
        "lat": 34.03,
        "lng": -118.78,
        "name": "Beach House",
        "description": "Right on the sand.",
        "price": 400,
    });

    let (status, _) = app.put(&uri, Some(&guest), update.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&uri, Some(&host), update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Malibu");
    assert_eq!(body["price"], 400.0);

    let (status, _) = app.delete(&uri, Some(&guest)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.get("/api/spots/current", Some(&host)).await;
    assert_eq!(body["Spots"].as_array().unwrap().len(), 1);
    let (_, body) = app.get("/api/spots/current", Some(&guest)).await;
    assert_eq!(body["Spots"], json!([]));
}

#[tokio::test]
async fn deleting_a_spot_removes_its_bookings_and_reviews() {
    let app = TestApp::new();
    let (_, host) = app.signup("host").await;
    let (_, guest) = app.signup("guest").await;
    let spot_id = app.create_spot(&host, "Beach House", 120.0).await;

    app.book(&guest, spot_id, "2030-02-01", "2030-02-04").await;
    app.post(
        &format!("/api/spots/{spot_id}/reviews"),
        Some(&guest),
        json!({ "review": "Lovely", "stars": 5 }),
    )
    .await;

    let (status, body) = app.delete(&format!("/api/spots/{spot_id}"), Some(&host)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully deleted");

    let (_, body) = app.get("/api/bookings/current", Some(&guest)).await;
    assert_eq!(body["Bookings"], json!([]));
    let (_, body) = app.get("/api/reviews/current", Some(&guest)).await;
    assert_eq!(body["Reviews"], json!([]));

    let (status, _) = app.get(&format!("/api/spots/{spot_id}/reviews"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn one_review_per_user_and_spot() {
    let app = TestApp::new();
    let (_, host) = app.signup("host").await;
    let (_, guest) = app.signup("guest").await;
    let spot_id = app.create_spot(&host, "Beach House", 120.0).await;
    let uri = format!("/api/spots/{spot_id}/reviews");

    let (status, review) = app
        .post(&uri, Some(&guest), json!({ "review": "Lovely", "stars": 5 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["stars"], 5);

    let (status, body) = app
        .post(&uri, Some(&guest), json!({ "review": "Again", "stars": 3 }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "User already has a review for this spot");

    let (status, body) = app
        .post(&uri, Some(&host), json!({ "review": "Mine", "stars": 6 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["stars"], "Stars must be an integer from 1 to 5");

    let (_, body) = app.get(&uri, None).await;
    let reviews = body["Reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["User"]["lastName"], "guest");
    assert!(reviews[0].get("Spot").is_none());

    let (_, body) = app.get("/api/reviews/current", Some(&guest)).await;
    assert_eq!(body["Reviews"][0]["Spot"]["name"], "Beach House");
}

#[tokio::test]
async fn review_edits_belong_to_the_author() {
    let app = TestApp::new();
    let (_, host) = app.signup("host").await;
    let (_, guest) = app.signup("guest").await;
    let spot_id = app.create_spot(&host, "Beach House", 120.0).await;

    let (_, review) = app
        .post(
            &format!("/api/spots/{spot_id}/reviews"),
            Some(&guest),
            json!({ "review": "Lovely", "stars": 5 }),
        )
        .await;
    let uri = format!("/api/reviews/{}", review["id"]);

    let (status, _) = app
        .put(&uri, Some(&host), json!({ "review": "Hacked", "stars": 1 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(&uri, Some(&guest), json!({ "review": "Still lovely", "stars": 4 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["review"], "Still lovely");

    let (status, _) = app.delete(&uri, Some(&guest)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.delete(&uri, Some(&guest)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Review couldn't be found");
}

#[tokio::test]
async fn review_images_are_capped() {
    let app = TestApp::new();
    let (_, host) = app.signup("host").await;
    let (_, guest) = app.signup("guest").await;
    let spot_id = app.create_spot(&host, "Beach House", 120.0).await;

    let (_, review) = app
        .post(
            &format!("/api/spots/{spot_id}/reviews"),
            Some(&guest),
            json!({ "review": "Lovely", "stars": 5 }),
        )
        .await;
    let uri = format!("/api/reviews/{}/images", review["id"]);

    let mut last = None;
    for n in 0..10 {
        let (status, image) = app
            .post(
                &uri,
                Some(&guest),
                json!({ "url": format!("https://example.com/{n}.jpg") }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        last = image["id"].as_u64();
    }

    let (status, body) = app
        .post(&uri, Some(&guest), json!({ "url": "https://example.com/11.jpg" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Maximum number of images for this resource was reached"
    );

    let image_uri = format!("/api/review-images/{}", last.unwrap());
    let (status, _) = app.delete(&image_uri, Some(&host)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&image_uri, Some(&guest)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(&uri, Some(&guest), json!({ "url": "https://example.com/11.jpg" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn spot_images_can_be_removed_by_the_owner() {
    let app = TestApp::new();
    let (_, host) = app.signup("host").await;
    let (_, guest) = app.signup("guest").await;
    let spot_id = app.create_spot(&host, "Beach House", 120.0).await;

    let (_, image) = app
        .post(
            &format!("/api/spots/{spot_id}/images"),
            Some(&host),
            json!({ "url": "https://example.com/a.jpg" }),
        )
        .await;
    let uri = format!("/api/spot-images/{}", image["id"]);

    let (status, _) = app.delete(&uri, Some(&guest)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&uri, Some(&host)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.delete(&uri, Some(&host)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Spot Image couldn't be found");
}

#[tokio::test]
async fn non_numeric_ids_are_json_bad_requests() {
    let app = TestApp::new();
    let (_, guest) = app.signup("guest").await;

    let (status, body) = app.get("/api/spots/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid path"));

    let (status, body) = app
        .put(
            "/api/bookings/next",
            Some(&guest),
            json!({ "startDate": "2030-02-01", "endDate": "2030-02-05" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "The requested resource couldn't be found");
}
