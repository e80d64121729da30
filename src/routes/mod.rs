pub mod health;
pub mod tasks;
pub mod users;

use actix_cors::Cors;
use actix_web::web;

use crate::auth::{AuthMiddleware, AUTH_HEADER};
use crate::error::AppError;

/// Registers every route. Expects `web::Data<dyn Store>` and
/// `web::Data<AuthSettings>` to be present in app data.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(health::health)
    .service(
        web::scope("/users")
            .service(users::register)
            .service(users::login)
            .service(users::me)
            .service(users::logout),
    )
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

/// Permissive CORS that still lets browser clients read the token header.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .expose_headers([AUTH_HEADER])
        .max_age(3600)
}
