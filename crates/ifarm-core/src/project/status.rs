//! Project status state machine.
//!
//! Statuses travel on the wire as numeric codes (1-7). Transitions are
//! restricted to the workflow below; `Completed` and `Cancelled` are
//! terminal.
//!
//! ```text
//! Draft -> Published -> Adopting -> Planting -> Harvesting -> Completed
//!   \          \            \           \            \
//!    +----------+------------+-----------+------------+--> Cancelled
//! ```

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Lifecycle status of an adoption project.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum ProjectStatus {
    Draft = 1,
    Published = 2,
    Adopting = 3,
    Planting = 4,
    Harvesting = 5,
    Completed = 6,
    Cancelled = 7,
}

impl From<ProjectStatus> for u8 {
    fn from(status: ProjectStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for ProjectStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ProjectStatus::Draft),
            2 => Ok(ProjectStatus::Published),
            3 => Ok(ProjectStatus::Adopting),
            4 => Ok(ProjectStatus::Planting),
            5 => Ok(ProjectStatus::Harvesting),
            6 => Ok(ProjectStatus::Completed),
            7 => Ok(ProjectStatus::Cancelled),
            other => Err(format!("unknown project status code: {other}")),
        }
    }
}

impl ProjectStatus {
    /// Display name shown in the UI.
    pub fn name(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "草稿",
            ProjectStatus::Published => "已发布",
            ProjectStatus::Adopting => "认养中",
            ProjectStatus::Planting => "种植中",
            ProjectStatus::Harvesting => "收获中",
            ProjectStatus::Completed => "已完成",
            ProjectStatus::Cancelled => "已取消",
        }
    }

    /// Tag color class used for status badges.
    pub fn tag_type(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "info",
            ProjectStatus::Published => "primary",
            ProjectStatus::Adopting => "warning",
            ProjectStatus::Planting => "success",
            ProjectStatus::Harvesting => "warning",
            ProjectStatus::Completed => "success",
            ProjectStatus::Cancelled => "danger",
        }
    }

    /// The statuses this one may advance to.
    pub fn allowed_transitions(&self) -> &'static [ProjectStatus] {
        match self {
            ProjectStatus::Draft => &[ProjectStatus::Published, ProjectStatus::Cancelled],
            ProjectStatus::Published => &[ProjectStatus::Adopting, ProjectStatus::Cancelled],
            ProjectStatus::Adopting => &[ProjectStatus::Planting, ProjectStatus::Cancelled],
            ProjectStatus::Planting => &[ProjectStatus::Harvesting, ProjectStatus::Cancelled],
            ProjectStatus::Harvesting => &[ProjectStatus::Completed, ProjectStatus::Cancelled],
            ProjectStatus::Completed | ProjectStatus::Cancelled => &[],
        }
    }

    /// Whether this status may move to `next`.
    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Whether the project is in an in-flight phase (adopting through harvesting).
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Adopting | ProjectStatus::Planting | ProjectStatus::Harvesting
        )
    }
}
