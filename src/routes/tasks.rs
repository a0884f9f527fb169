use crate::{
    auth::AuthenticatedUser,
    db,
    error::AppError,
    models::{KanbanBoard, TaskInput, TaskQuery, TaskUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use validator::Validate;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

async fn ensure_project_owned(
    conn: &mut PgConnection,
    project_id: i32,
    user_id: i32,
) -> Result<(), AppError> {
    if db::projects::is_owned(conn, project_id, user_id).await? {
        Ok(())
    } else {
        Err(project_not_found())
    }
}

async fn ensure_assignee_exists(conn: &mut PgConnection, assignee_id: i32) -> Result<(), AppError> {
    if db::users::exists(conn, assignee_id).await? {
        Ok(())
    } else {
        Err(AppError::BadRequest("Assignee not found".into()))
    }
}

/// Retrieves the tasks of every project owned by the authenticated user.
///
/// ## Query Parameters:
/// - `project_id` (optional): Only list tasks of this project.
/// - `skip` (optional, default 0), `limit` (optional, default 100): Pagination.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects ordered by id.
/// - `401 Unauthorized`: Missing or invalid token.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    query_params.validate()?;

    let tasks = db::tasks::list_owned(
        pool.get_ref(),
        user.id(),
        query_params.project_id,
        query_params.pagination(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task in one of the authenticated user's projects.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`: `title` and `project_id` are required;
/// `status` defaults to `todo`, `priority` to `medium`.
///
/// ## Responses:
/// - `201 Created`: The new `Task`.
/// - `400 Bad Request`: Malformed body or unknown assignee.
/// - `404 Not Found`: `project_id` does not name a project owned by the caller.
/// - `422 Unprocessable Entity`: Field validation failed.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let mut tx = pool.begin().await?;

    ensure_project_owned(&mut tx, task_data.project_id, user.id()).await?;
    if let Some(assignee_id) = task_data.assignee_id {
        ensure_assignee_exists(&mut tx, assignee_id).await?;
    }
    let task = db::tasks::insert(&mut *tx, &task_data).await?;

    tx.commit().await?;
    log::info!(
        "User {} created task {} in project {}",
        user.id(),
        task.id,
        task.project_id
    );

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: The `Task`.
/// - `404 Not Found`: The task does not exist or its project belongs to someone else.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = db::tasks::find_owned(pool.get_ref(), task_id.into_inner(), user.id())
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Applies a partial update to a task.
///
/// Writing `status` also sets `is_completed` (true exactly for `done`). Moving the
/// task with `project_id` requires the target project to be owned by the caller.
///
/// ## Responses:
/// - `200 OK`: The updated `Task`.
/// - `400 Bad Request`: Unknown assignee.
/// - `404 Not Found`: The task, or the target project, is not the caller's.
/// - `422 Unprocessable Entity`: Field validation failed.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let update = task_data.into_inner();
    let mut tx = pool.begin().await?;

    let mut task = db::tasks::find_owned(&mut *tx, task_id.into_inner(), user.id())
        .await?
        .ok_or_else(task_not_found)?;

    if let Some(project_id) = update.project_id.filter(|id| *id != task.project_id) {
        ensure_project_owned(&mut tx, project_id, user.id()).await?;
    }
    if let Some(Some(assignee_id)) = update.assignee_id {
        ensure_assignee_exists(&mut tx, assignee_id).await?;
    }

    update.apply_to(&mut task);
    let task = db::tasks::update(&mut *tx, &task).await?;

    tx.commit().await?;
    log::info!("User {} updated task {}", user.id(), task.id);

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task. Its project is not affected.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `404 Not Found`: The task does not exist or its project belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    if !db::tasks::delete_owned(pool.get_ref(), task_id, user.id()).await? {
        return Err(task_not_found());
    }
    log::info!("User {} deleted task {}", user.id(), task_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

/// Kanban board of a project: its tasks grouped into the `todo`, `in_progress`,
/// `in_review` and `done` columns.
///
/// ## Responses:
/// - `200 OK`: The `KanbanBoard`; every column is present.
/// - `404 Not Found`: The project does not exist or belongs to someone else.
#[get("/kanban/{project_id}")]
pub async fn get_kanban_board(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let project_id = project_id.into_inner();
    let mut conn = pool.acquire().await?;

    ensure_project_owned(&mut conn, project_id, user.id()).await?;
    let board: KanbanBoard = db::tasks::kanban_rows(&mut *conn, project_id)
        .await?
        .into_iter()
        .collect();

    Ok(HttpResponse::Ok().json(board))
}

#[cfg(test)]
mod tests {
    use crate::models::{Priority, TaskInput, TaskStatus};
    use validator::Validate;

    #[test]
    fn test_task_input_validation() {
        let input = |title: String, description: Option<String>| TaskInput {
            title,
            description,
            status: TaskStatus::Todo,
            priority: Priority::High,
            due_date: None,
            project_id: 1,
            assignee_id: None,
        };

        assert!(
            input(String::new(), Some("Test Description".into()))
                .validate()
                .is_err(),
            "Validation should fail for empty title."
        );
        assert!(
            input("a".repeat(201), None).validate().is_err(),
            "Validation should fail for overly long title."
        );
        assert!(
            input("Valid Title".into(), Some("b".repeat(5000)))
                .validate()
                .is_ok(),
            "Descriptions are free text."
        );
    }
}
