pub mod kanban;
pub mod priority;
pub mod project;
pub mod stats;
pub mod task;
pub mod user;

use serde::{Deserialize, Deserializer};
use validator::Validate;

pub use kanban::{KanbanBoard, KanbanCard, KanbanRow, UNASSIGNED_LABEL};
pub use priority::Priority;
pub use project::{Project, ProjectInput, ProjectStatus, ProjectUpdate, ProjectWithTasks};
pub use stats::ProjectStats;
pub use task::{Task, TaskInput, TaskQuery, TaskStatus, TaskUpdate};
pub use user::{User, UserInput};

/// Deserializes a present field (even an explicit `null`) as `Some(..)`.
///
/// Combined with `#[serde(default)]` this separates "key absent" (`None`)
/// from "key set to null" (`Some(None)`) on nullable update fields.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `skip` / `limit` query parameters shared by the list endpoints.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct Pagination {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}
