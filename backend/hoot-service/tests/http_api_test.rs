/// End-to-end HTTP tests: routes, bearer authentication, and status
/// mapping, exercised against the in-memory store.
mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::{profile, MemoryHootStore};
use hoot_service::handlers;
use hoot_service::models::UserProfile;
use hoot_service::services::HootService;

fn init_auth() {
    // The signing secret is process-global; first caller wins.
    let _ = auth_token::initialize_secret("http-test-secret");
}

fn bearer(user: &UserProfile) -> (&'static str, String) {
    let token = auth_token::generate_token(user.id, &user.username).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(HootService::new(Arc::new(
                    MemoryHootStore::default(),
                ))))
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn rejects_bad_credentials_uniformly() {
    init_auth();
    let app = test_app!();
    let user = profile("u1");

    let expired = auth_token::generate_token_with_expiry(
        user.id,
        &user.username,
        chrono::Duration::minutes(-5),
    )
    .unwrap();

    let requests = vec![
        test::TestRequest::get().uri("/api/v1/hoots").to_request(),
        test::TestRequest::get()
            .uri("/api/v1/hoots")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request(),
        test::TestRequest::get()
            .uri("/api/v1/hoots")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request(),
        test::TestRequest::get()
            .uri("/api/v1/hoots")
            .insert_header(("Authorization", format!("Bearer {expired}")))
            .to_request(),
    ];

    let mut bodies = Vec::new();
    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        bodies.push(test::read_body(resp).await);
    }

    // No failure mode is distinguishable from another.
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[actix_web::test]
async fn hoot_crud_over_http() {
    init_auth();
    let app = test_app!();
    let u1 = profile("u1");
    let u2 = profile("u2");

    // Create
    let req = test::TestRequest::post()
        .uri("/api/v1/hoots")
        .insert_header(bearer(&u1))
        .set_json(serde_json::json!({
            "title": "Hi",
            "text": "world",
            "category": "News"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["title"], "Hi");
    assert_eq!(created["category"], "News");
    assert_eq!(created["author"]["username"], "u1");
    let hoot_id = created["id"].as_str().unwrap().to_string();

    // List
    let req = test::TestRequest::get()
        .uri("/api/v1/hoots")
        .insert_header(bearer(&u2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Update by a non-author
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/hoots/{hoot_id}"))
        .insert_header(bearer(&u2))
        .set_json(serde_json::json!({"title": "Hijacked"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Update by the author
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/hoots/{hoot_id}"))
        .insert_header(bearer(&u1))
        .set_json(serde_json::json!({"title": "Hello"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "Hello");
    assert_eq!(updated["text"], "world");

    // Delete responds with the removed document
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/hoots/{hoot_id}"))
        .insert_header(bearer(&u1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(deleted["id"].as_str().unwrap(), hoot_id);

    // Gone now
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/hoots/{hoot_id}"))
        .insert_header(bearer(&u1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn comment_flow_over_http() {
    init_auth();
    let app = test_app!();
    let u1 = profile("u1");
    let u2 = profile("u2");

    let req = test::TestRequest::post()
        .uri("/api/v1/hoots")
        .insert_header(bearer(&u1))
        .set_json(serde_json::json!({
            "title": "Hi",
            "text": "world",
            "category": "News"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    let hoot_id = created["id"].as_str().unwrap().to_string();

    // U2 comments on U1's hoot
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/hoots/{hoot_id}/comments"))
        .insert_header(bearer(&u2))
        .set_json(serde_json::json!({"text": "nice"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(comment["text"], "nice");
    assert_eq!(comment["author"]["username"], "u2");
    let comment_id = comment["id"].as_str().unwrap().to_string();

    // The hoot's author may not edit U2's comment
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/hoots/{hoot_id}/comments/{comment_id}"))
        .insert_header(bearer(&u1))
        .set_json(serde_json::json!({"text": "mine now"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The comment's author may
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/hoots/{hoot_id}/comments/{comment_id}"))
        .insert_header(bearer(&u2))
        .set_json(serde_json::json!({"text": "nicer"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/hoots/{hoot_id}"))
        .insert_header(bearer(&u1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let fetched: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(fetched["comments"][0]["text"], "nicer");

    // Delete the comment
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/hoots/{hoot_id}/comments/{comment_id}"))
        .insert_header(bearer(&u2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/hoots/{hoot_id}"))
        .insert_header(bearer(&u1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let fetched: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(fetched["comments"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn unknown_category_is_bad_request() {
    init_auth();
    let app = test_app!();
    let u1 = profile("u1");

    let req = test::TestRequest::post()
        .uri("/api/v1/hoots")
        .insert_header(bearer(&u1))
        .set_json(serde_json::json!({
            "title": "Hi",
            "text": "world",
            "category": "Weather"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/hoots")
        .insert_header(bearer(&u1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let listed: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn comment_on_missing_hoot_is_not_found() {
    init_auth();
    let app = test_app!();
    let u1 = profile("u1");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/hoots/{}/comments", uuid::Uuid::new_v4()))
        .insert_header(bearer(&u1))
        .set_json(serde_json::json!({"text": "nice"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
