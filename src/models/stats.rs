use serde::{Deserialize, Serialize};

/// Team size is not tracked yet; every project counts only its owner.
pub const TEAM_MEMBERS: i64 = 1;

/// Completion statistics for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    /// Percentage of completed tasks, rounded to two decimals. Zero for an empty project.
    pub progress: f64,
    pub team_members: i64,
}

impl ProjectStats {
    pub fn new(total_tasks: i64, completed_tasks: i64) -> Self {
        let progress = if total_tasks > 0 {
            let ratio = completed_tasks as f64 / total_tasks as f64 * 100.0;
            (ratio * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total_tasks,
            completed_tasks,
            progress,
            team_members: TEAM_MEMBERS,
        }
    }
}
