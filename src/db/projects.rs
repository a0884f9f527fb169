use sqlx::PgExecutor;

use crate::models::{Pagination, Project, ProjectInput};

const PROJECT_COLUMNS: &str =
    "id, name, description, status, priority, due_date, owner_id, created_at, updated_at";

pub async fn list_owned<'e, E>(
    executor: E,
    owner_id: i32,
    page: Pagination,
) -> Result<Vec<Project>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Project>(&format!(
        "SELECT {} FROM projects WHERE owner_id = $1 ORDER BY id OFFSET $2 LIMIT $3",
        PROJECT_COLUMNS
    ))
    .bind(owner_id)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(executor)
    .await
}

pub async fn find_owned<'e, E>(
    executor: E,
    project_id: i32,
    owner_id: i32,
) -> Result<Option<Project>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Project>(&format!(
        "SELECT {} FROM projects WHERE id = $1 AND owner_id = $2",
        PROJECT_COLUMNS
    ))
    .bind(project_id)
    .bind(owner_id)
    .fetch_optional(executor)
    .await
}

pub async fn is_owned<'e, E>(executor: E, project_id: i32, owner_id: i32) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1 AND owner_id = $2)",
    )
    .bind(project_id)
    .bind(owner_id)
    .fetch_one(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, input: &ProjectInput, owner_id: i32) -> Result<Project, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Project>(&format!(
        "INSERT INTO projects (name, description, status, priority, due_date, owner_id) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.status)
    .bind(input.priority)
    .bind(input.due_date)
    .bind(owner_id)
    .fetch_one(executor)
    .await
}

/// Writes every mutable column of `project` back. `updated_at` is set by the server.
pub async fn update<'e, E>(executor: E, project: &Project) -> Result<Project, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Project>(&format!(
        "UPDATE projects \
         SET name = $1, description = $2, status = $3, priority = $4, due_date = $5, \
             updated_at = NOW() \
         WHERE id = $6 AND owner_id = $7 \
         RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(&project.name)
    .bind(&project.description)
    .bind(project.status)
    .bind(project.priority)
    .bind(project.due_date)
    .bind(project.id)
    .bind(project.owner_id)
    .fetch_one(executor)
    .await
}

/// Deletes the project and, through the foreign key cascade, its tasks.
/// Returns whether a row owned by `owner_id` was removed.
pub async fn delete_owned<'e, E>(executor: E, project_id: i32, owner_id: i32) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
        .bind(project_id)
        .bind(owner_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// `(total, completed)` task counts of a project.
pub async fn task_counts<'e, E>(executor: E, project_id: i32) -> Result<(i64, i64), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_completed) FROM tasks WHERE project_id = $1",
    )
    .bind(project_id)
    .fetch_one(executor)
    .await
}
