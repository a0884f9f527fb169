use crate::{
    auth::AuthenticatedUser,
    db,
    error::AppError,
    models::{Pagination, ProjectInput, ProjectStats, ProjectUpdate, ProjectWithTasks},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

/// Lists the authenticated user's projects.
///
/// ## Query Parameters:
/// - `skip` (optional, default 0): Number of projects to skip.
/// - `limit` (optional, default 100): Maximum number of projects returned.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Project` objects ordered by id.
/// - `401 Unauthorized`: Missing or invalid token.
#[get("")]
pub async fn get_projects(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    page.validate()?;

    let projects = db::projects::list_owned(pool.get_ref(), user.id(), page.into_inner()).await?;

    Ok(HttpResponse::Ok().json(projects))
}

/// Creates a project owned by the authenticated user.
///
/// `status` defaults to `pending` and `priority` to `medium`.
///
/// ## Responses:
/// - `201 Created`: The new `Project`.
/// - `400 Bad Request`: Malformed body or unknown enum value.
/// - `422 Unprocessable Entity`: `name` empty or longer than 200 characters.
#[post("")]
pub async fn create_project(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;

    let project = db::projects::insert(pool.get_ref(), &project_data, user.id()).await?;
    log::info!("User {} created project {}", user.id(), project.id);

    Ok(HttpResponse::Created().json(project))
}

/// Retrieves one project together with its tasks.
///
/// ## Responses:
/// - `200 OK`: The project with a `tasks` array.
/// - `404 Not Found`: The project does not exist or belongs to someone else.
#[get("/{id}")]
pub async fn get_project(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;

    let project = db::projects::find_owned(&mut *conn, project_id.into_inner(), user.id())
        .await?
        .ok_or_else(project_not_found)?;
    let tasks = db::tasks::list_for_project(&mut *conn, project.id).await?;

    Ok(HttpResponse::Ok().json(ProjectWithTasks { project, tasks }))
}

/// Applies a partial update to a project.
///
/// Only the keys present in the body are changed.
///
/// ## Responses:
/// - `200 OK`: The updated `Project`.
/// - `404 Not Found`: The project does not exist or belongs to someone else.
/// - `422 Unprocessable Entity`: Field validation failed.
#[put("/{id}")]
pub async fn update_project(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_id: web::Path<i32>,
    project_data: web::Json<ProjectUpdate>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;
    let mut tx = pool.begin().await?;

    let mut project = db::projects::find_owned(&mut *tx, project_id.into_inner(), user.id())
        .await?
        .ok_or_else(project_not_found)?;
    project_data.into_inner().apply_to(&mut project);
    let project = db::projects::update(&mut *tx, &project).await?;

    tx.commit().await?;
    log::info!("User {} updated project {}", user.id(), project.id);

    Ok(HttpResponse::Ok().json(project))
}

/// Deletes a project and all of its tasks.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Project deleted successfully"}`.
/// - `404 Not Found`: The project does not exist or belongs to someone else.
#[delete("/{id}")]
pub async fn delete_project(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let project_id = project_id.into_inner();

    if !db::projects::delete_owned(pool.get_ref(), project_id, user.id()).await? {
        return Err(project_not_found());
    }
    log::info!("User {} deleted project {}", user.id(), project_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Project deleted successfully" })))
}

/// Completion statistics of a project.
///
/// ## Responses:
/// - `200 OK`: `{"total_tasks", "completed_tasks", "progress", "team_members"}`.
/// - `404 Not Found`: The project does not exist or belongs to someone else.
#[get("/{id}/stats")]
pub async fn get_project_stats(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let project_id = project_id.into_inner();
    let mut conn = pool.acquire().await?;

    if !db::projects::is_owned(&mut *conn, project_id, user.id()).await? {
        return Err(project_not_found());
    }
    let (total, completed) = db::projects::task_counts(&mut *conn, project_id).await?;

    Ok(HttpResponse::Ok().json(ProjectStats::new(total, completed)))
}
