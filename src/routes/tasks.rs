use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{Task, TaskInput},
    tasks::TaskService,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Response wrapper for a task listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

/// Response body for a successful deletion.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    pub result: String,
}

/// Retrieves the tasks owned by the authenticated user, newest first.
///
/// ## Responses:
/// - `200 OK`: a JSON object with a `tasks` array.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: the user has no tasks.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list_tasks(&user.0.username).await?;
    Ok(HttpResponse::Ok().json(TaskListResponse { tasks }))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the created `Task`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `409 Conflict`: a task with the same title already exists.
/// - `422 Unprocessable Entity`: title outside the 4..=150 length bounds.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<TaskInput>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .create_task(&user.0.username, task_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a single task by title. Only the owner can see it.
#[get("/{title}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    title: web::Path<String>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_task(&user.0.username, &title).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Marks a task as complete.
///
/// ## Responses:
/// - `200 OK`: the updated `Task` with `completed_on` set.
/// - `404 Not Found`: no such task for this user.
/// - `422 Unprocessable Entity`: the task is already completed.
#[patch("/{title}")]
pub async fn complete_task(
    tasks: web::Data<TaskService>,
    title: web::Path<String>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task = tasks.complete_task(&user.0.username, &title).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by title. Only the owner can delete it.
#[delete("/{title}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    title: web::Path<String>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    tasks.delete_task(&user.0.username, &title).await?;
    Ok(HttpResponse::Ok().json(DeleteTaskResponse {
        result: "Task was successfully deleted.".to_string(),
    }))
}
