use crate::{
    auth::{
        find_by_credentials, generate_token, hash_password, issue_token, AuthMiddleware,
        AuthSettings, AuthenticatedUser, AUTH_HEADER,
    },
    db::Store,
    error::AppError,
    models::{AuthToken, Credentials, User},
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates the account with its first session token and returns the user,
/// with the token in the `x-auth` response header.
///
/// ## Responses:
/// - `200 OK`: `{ "id", "email" }`.
/// - `400 Bad Request`: Invalid email, password shorter than 6 characters, or email already registered.
#[post("")]
pub async fn register(
    store: web::Data<dyn Store>,
    settings: web::Data<AuthSettings>,
    body: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    let credentials = body.into_inner().normalized();
    credentials.validate()?;

    let password_hash = hash_password(&credentials.password, settings.bcrypt_cost())?;
    let mut user = User::new(credentials.email, password_hash);
    let token = generate_token(user.id, &settings)?;
    user.tokens.push(AuthToken::auth(&token));

    store.insert_user(&user).await?;
    log::debug!("registered user {}", user.id);

    Ok(HttpResponse::Ok()
        .insert_header((AUTH_HEADER, token))
        .json(user))
}

/// Login user
///
/// Verifies the credentials and issues an additional session token. Tokens
/// from earlier logins stay valid.
///
/// ## Responses:
/// - `200 OK`: `{ "id", "email" }` with the new token in `x-auth`.
/// - `400 Bad Request`: Unknown email or wrong password.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    settings: web::Data<AuthSettings>,
    body: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    let credentials = body.into_inner().normalized();

    let user = find_by_credentials(store.get_ref(), &credentials.email, &credentials.password).await?;
    let token = issue_token(store.get_ref(), &user, &settings).await?;

    Ok(HttpResponse::Ok()
        .insert_header((AUTH_HEADER, token))
        .json(user))
}

/// Returns the authenticated caller.
#[get("/me", wrap = "AuthMiddleware")]
pub async fn me(auth: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(auth.user)
}

/// Logout
///
/// Revokes only the token presented with this request.
#[delete("/me/token", wrap = "AuthMiddleware")]
pub async fn logout(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    store.pull_token(auth.user.id, &auth.token).await?;
    Ok(HttpResponse::Ok().finish())
}
