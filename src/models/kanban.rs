//! Kanban board view of a project's tasks.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Priority, TaskStatus};

/// Shown instead of a name for tasks nobody is assigned to.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// A task joined with its assignee's full name, as loaded for the board.
#[derive(Debug, Clone, FromRow)]
pub struct KanbanRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub assignee_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanbanCard {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub assignee: String,
    /// Tags are not implemented; always empty.
    pub tags: Vec<String>,
}

/// Four fixed columns keyed by status value. All columns are serialized even when
/// empty.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KanbanBoard {
    pub todo: Vec<KanbanCard>,
    pub in_progress: Vec<KanbanCard>,
    pub in_review: Vec<KanbanCard>,
    pub done: Vec<KanbanCard>,
}

impl KanbanBoard {
    pub fn column(&self, status: TaskStatus) -> &[KanbanCard] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::InReview => &self.in_review,
            TaskStatus::Done => &self.done,
        }
    }

    fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<KanbanCard> {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::InReview => &mut self.in_review,
            TaskStatus::Done => &mut self.done,
        }
    }

    pub fn len(&self) -> usize {
        TaskStatus::ALL.iter().map(|s| self.column(*s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<KanbanRow> for KanbanBoard {
    fn from_iter<I: IntoIterator<Item = KanbanRow>>(rows: I) -> Self {
        let mut board = KanbanBoard::default();
        for row in rows {
            board.column_mut(row.status).push(KanbanCard {
                id: row.id,
                title: row.title,
                description: row.description,
                priority: row.priority,
                assignee: row
                    .assignee_name
                    .unwrap_or_else(|| UNASSIGNED_LABEL.to_string()),
                tags: Vec::new(),
            });
        }
        board
    }
}
