use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::store::Resource;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::default::Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Pending
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Pending => write!(f, "pending"),
            ProjectStatus::Approved => write!(f, "approved"),
            ProjectStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl ProjectStatus {
    pub fn may_become(self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;

        matches!((self, next), (Pending, Approved | Rejected))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Project {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub team_members: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub feedback: Option<String>,
    pub submitted_by: Uuid,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl Resource for Project {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProjectData {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub team_members: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

impl ProjectData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.title.trim().is_empty() {
            return Err(problems::validation("Project title must not be empty."));
        }
        if self.description.trim().is_empty() {
            return Err(problems::validation("Project description must not be empty."));
        }

        Ok(())
    }

    pub fn into_project(self, submitted_by: Uuid) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            team_members: self.team_members,
            technologies: self.technologies,
            status: ProjectStatus::Pending,
            feedback: None,
            submitted_by,
            created: now,
            updated: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProjectStatusUpdate {
    pub status: ProjectStatus,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProjectStatus::*;

    #[test]
    fn pending_resolves_directly() {
        assert!(Pending.may_become(Approved));
        assert!(Pending.may_become(Rejected));
        assert!(!Pending.may_become(Pending));
    }

    #[test]
    fn decisions_are_final() {
        for terminal in [Approved, Rejected] {
            for next in [Pending, Approved, Rejected] {
                assert!(!terminal.may_become(next));
            }
        }
    }

    #[test]
    fn submission_starts_pending() {
        let project = ProjectData {
            title: "Smart Attendance".to_string(),
            description: "QR-based attendance".to_string(),
            team_members: vec!["Ada".to_string()],
            technologies: vec!["Rust".to_string()],
        }
        .into_project(Uuid::new_v4());

        assert_eq!(project.status, Pending);
        assert!(project.feedback.is_none());
    }
}
