#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{auth_token, login_user, register_user, PASSWORD};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tasklist::auth::{generate_token, AuthSettings};

#[actix_rt::test]
async fn test_register_returns_user_and_token() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": " new@example.com ", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let token = auth_token(&resp);
    assert!(!token.is_empty());

    let body: Value = test::read_body_json(resp).await;
    let fields = body.as_object().unwrap();
    assert_eq!(fields.len(), 2, "only id and email are exposed: {}", body);
    assert_eq!(body["email"], "new@example.com");
    assert!(body["id"].is_string());
}

#[actix_rt::test]
async fn test_duplicate_email_is_rejected() {
    let app = test_app!();
    register_user(&app, "twice@example.com").await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "twice@example.com", "password": "another-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let app = test_app!();

    let test_cases = vec![
        (json!({ "password": PASSWORD }), "missing email"),
        (json!({ "email": "test@example.com" }), "missing password"),
        (
            json!({ "email": "invalid-email", "password": PASSWORD }),
            "invalid email format",
        ),
        (
            json!({ "email": "test@example.com", "password": "123" }),
            "password too short",
        ),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::BAD_REQUEST,
            "Test case failed: {}",
            description
        );
    }
}

#[actix_rt::test]
async fn test_login_issues_additional_token() {
    let app = test_app!();
    let user = register_user(&app, "login@example.com").await;

    let login_token = login_user(&app, "login@example.com").await;
    assert_ne!(login_token, user.token);

    for token in [&user.token, &login_token] {
        let req = test::TestRequest::get()
            .uri("/users/me")
            .insert_header(("x-auth", token.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], user.id.as_str());
        assert_eq!(body["email"], user.email.as_str());
    }
}

#[actix_rt::test]
async fn test_login_with_bad_credentials() {
    let app = test_app!();
    register_user(&app, "creds@example.com").await;

    let test_cases = vec![
        (
            json!({ "email": "creds@example.com", "password": "WrongPassword123!" }),
            "incorrect password",
        ),
        (
            json!({ "email": "nonexistent@example.com", "password": PASSWORD }),
            "non-existent user",
        ),
        (json!({ "email": "creds@example.com" }), "missing password"),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/users/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::BAD_REQUEST,
            "Test case failed: {}",
            description
        );
        assert!(resp.headers().get("x-auth").is_none());
    }
}

#[actix_rt::test]
async fn test_me_requires_valid_token() {
    let app = test_app!();
    let user = register_user(&app, "me@example.com").await;

    let req = test::TestRequest::get().uri("/users/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(("x-auth", "garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = test::read_body(resp).await;
    assert!(body.is_empty());

    // Correct user id but signed with another secret.
    let other = AuthSettings::new("some-other-secret", chrono::Duration::hours(1), 4);
    let forged = generate_token(user.id.parse().unwrap(), &other).unwrap();
    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(("x-auth", forged))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_signed_but_unrecorded_token_is_rejected() {
    let app = test_app!();
    let user = register_user(&app, "unrecorded@example.com").await;

    let never_stored = generate_token(user.id.parse().unwrap(), &common::settings()).unwrap();
    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(("x-auth", never_stored))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_logout_revokes_only_presented_token() {
    let app = test_app!();
    let user = register_user(&app, "logout@example.com").await;
    let second = login_user(&app, "logout@example.com").await;

    let req = test::TestRequest::delete()
        .uri("/users/me/token")
        .insert_header(("x-auth", user.token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(body.is_empty());

    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(("x-auth", user.token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header(("x-auth", second.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The revoked token cannot log out again either.
    let req = test::TestRequest::delete()
        .uri("/users/me/token")
        .insert_header(("x-auth", user.token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
