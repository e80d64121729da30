#![allow(dead_code)]

use actix_web::{body::MessageBody, dev::ServiceResponse, test};
use chrono::Duration;
use serde_json::{json, Value};
use tasklist::auth::{AuthSettings, AUTH_HEADER};

pub const PASSWORD: &str = "Password123!";
pub const SECRET: &str = "integration-test-secret";

/// Builds the full application over a fresh in-memory store.
macro_rules! test_app {
    () => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(tasklist::db::shared(tasklist::db::MemoryStore::new()))
                .app_data(actix_web::web::Data::new($crate::common::settings()))
                .configure(tasklist::routes::config),
        )
        .await
    };
}

pub fn settings() -> AuthSettings {
    // Lowest bcrypt cost keeps the suite fast.
    AuthSettings::new(SECRET, Duration::hours(1), 4)
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub fn auth_token<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(AUTH_HEADER)
        .expect("response carries x-auth")
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn register_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
) -> TestUser {
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK, "register {}", email);

    let token = auth_token(&resp);
    let body: Value = test::read_body_json(resp).await;

    TestUser {
        id: body["id"].as_str().unwrap().to_string(),
        email: email.to_string(),
        token,
    }
}

pub async fn login_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/users/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK, "login {}", email);
    auth_token(&resp)
}
