use sqlx::PgExecutor;

use crate::models::{KanbanRow, Pagination, Task, TaskInput};

// Qualified with the `t` alias used by every query that joins through `projects`.
const TASK_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.priority, t.is_completed, \
                            t.due_date, t.project_id, t.assignee_id, t.created_at, t.updated_at";

/// Tasks in projects owned by `owner_id`, optionally limited to one project.
pub async fn list_owned<'e, E>(
    executor: E,
    owner_id: i32,
    project_id: Option<i32>,
    page: Pagination,
) -> Result<Vec<Task>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks t \
         JOIN projects p ON p.id = t.project_id \
         WHERE p.owner_id = $1 AND ($2::INTEGER IS NULL OR t.project_id = $2) \
         ORDER BY t.id OFFSET $3 LIMIT $4",
        TASK_COLUMNS
    ))
    .bind(owner_id)
    .bind(project_id)
    .bind(page.skip)
    .bind(page.limit)
    .fetch_all(executor)
    .await
}

/// All tasks of one project. The caller must have checked project ownership.
pub async fn list_for_project<'e, E>(executor: E, project_id: i32) -> Result<Vec<Task>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks t WHERE t.project_id = $1 ORDER BY t.id",
        TASK_COLUMNS
    ))
    .bind(project_id)
    .fetch_all(executor)
    .await
}

pub async fn find_owned<'e, E>(
    executor: E,
    task_id: i32,
    owner_id: i32,
) -> Result<Option<Task>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks t \
         JOIN projects p ON p.id = t.project_id \
         WHERE t.id = $1 AND p.owner_id = $2",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, input: &TaskInput) -> Result<Task, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks AS t \
             (title, description, status, priority, is_completed, due_date, project_id, assignee_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.status)
    .bind(input.priority)
    .bind(input.is_completed())
    .bind(input.due_date)
    .bind(input.project_id)
    .bind(input.assignee_id)
    .fetch_one(executor)
    .await
}

/// Writes every mutable column of `task` back. `updated_at` is set by the server.
pub async fn update<'e, E>(executor: E, task: &Task) -> Result<Task, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks AS t \
         SET title = $1, description = $2, status = $3, priority = $4, is_completed = $5, \
             due_date = $6, project_id = $7, assignee_id = $8, updated_at = NOW() \
         WHERE t.id = $9 \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.is_completed)
    .bind(task.due_date)
    .bind(task.project_id)
    .bind(task.assignee_id)
    .bind(task.id)
    .fetch_one(executor)
    .await
}

/// Deletes a task whose project is owned by `owner_id`. The project is left alone.
pub async fn delete_owned<'e, E>(executor: E, task_id: i32, owner_id: i32) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        "DELETE FROM tasks t USING projects p \
         WHERE t.id = $1 AND p.id = t.project_id AND p.owner_id = $2",
    )
    .bind(task_id)
    .bind(owner_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Board rows of a project, joined with the assignee's full name.
pub async fn kanban_rows<'e, E>(executor: E, project_id: i32) -> Result<Vec<KanbanRow>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, KanbanRow>(
        "SELECT t.id, t.title, t.description, t.status, t.priority, u.full_name AS assignee_name \
         FROM tasks t \
         LEFT JOIN users u ON u.id = t.assignee_id \
         WHERE t.project_id = $1 \
         ORDER BY t.id",
    )
    .bind(project_id)
    .fetch_all(executor)
    .await
}
