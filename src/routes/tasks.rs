use crate::{
    auth::AuthenticatedUser,
    db::Store,
    error::AppError,
    models::{Task, TaskInput, TaskPatch},
};
use actix_web::{
    delete, get, patch, post, web, HttpMessage, HttpRequest, HttpResponse, Responder,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Task ids that do not parse are reported exactly like tasks that do not exist.
fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// An absent body, or one not sent as `application/json`, is an empty patch.
fn parse_patch(req: &HttpRequest, body: &[u8]) -> Result<TaskPatch, AppError> {
    if body.is_empty() || req.content_type() != "application/json" {
        return Ok(TaskPatch::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `text`: What needs doing (required, non-blank). Other fields are ignored.
///
/// ## Responses:
/// - `200 OK`: The created task.
/// - `400 Bad Request`: Missing or blank `text`.
/// - `401 Unauthorized`: Missing or revoked token.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), auth.user.id);
    store.insert_task(&task).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Lists the caller's tasks as `{ "tasks": [...] }`.
#[get("")]
pub async fn get_tasks(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = store.find_tasks(auth.user.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Retrieves one task as `{ "task": ... }`.
///
/// ## Responses:
/// - `200 OK`: The task, if it exists and is owned by the caller.
/// - `404 Not Found`: Malformed id, no such task, or owned by someone else.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&task_id)?;

    let task = store
        .find_task(id, auth.user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Deletes a task and returns it as `{ "task": ... }`.
///
/// ## Responses:
/// - `200 OK`: The removed task.
/// - `404 Not Found`: Malformed id, no such task, or owned by someone else.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&task_id)?;

    let task = store
        .remove_task(id, auth.user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Partially updates a task.
///
/// Only `text` and `completed` are read from the body. `completed: true`
/// stamps `completed_at` with the current time; anything else marks the task
/// open again and clears the timestamp.
///
/// The id is checked before the body is read, so a malformed id is a 404
/// whatever the body holds.
///
/// ## Responses:
/// - `200 OK`: `{ "task": ... }` after the update.
/// - `400 Bad Request`: Unparsable JSON, or `text` present but blank.
/// - `404 Not Found`: Malformed id, no such task, or owned by someone else.
#[patch("/{id}")]
pub async fn update_task(
    req: HttpRequest,
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    task_id: web::Path<String>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&task_id)?;
    let patch = parse_patch(&req, &body)?;
    patch.validate()?;

    let changes = patch.into_changes(Utc::now());
    let task = store
        .update_task(id, auth.user.id, &changes)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}
