use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::store::Resource;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AppealStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl std::default::Default for AppealStatus {
    fn default() -> Self {
        AppealStatus::Pending
    }
}

impl std::fmt::Display for AppealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppealStatus::Pending => write!(f, "pending"),
            AppealStatus::UnderReview => write!(f, "under_review"),
            AppealStatus::Approved => write!(f, "approved"),
            AppealStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl AppealStatus {
    /// `approved` and `rejected` are terminal; review is an optional
    /// intermediate stop.
    pub fn may_become(self, next: AppealStatus) -> bool {
        use AppealStatus::*;

        match (self, next) {
            (Pending, UnderReview | Approved | Rejected) => true,
            (UnderReview, Approved | Rejected) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GradeAppeal {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub course_name: String,
    pub current_grade: String,
    pub expected_grade: String,
    pub reason: String,
    #[serde(default)]
    pub status: AppealStatus,
    #[serde(default)]
    pub admin_response: Option<String>,
    pub submitted_by: Uuid,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl Resource for GradeAppeal {
    const COLLECTION: &'static str = "appeals";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GradeAppealData {
    pub course_name: String,
    pub current_grade: String,
    pub expected_grade: String,
    pub reason: String,
}

impl GradeAppealData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.course_name.trim().is_empty() {
            return Err(problems::validation("Course name must not be empty."));
        }
        if self.current_grade.trim().is_empty() || self.expected_grade.trim().is_empty() {
            return Err(problems::validation("Both grades must be provided."));
        }
        if self.reason.trim().is_empty() {
            return Err(problems::validation("A reason is required."));
        }

        Ok(())
    }

    pub fn into_appeal(self, submitted_by: Uuid) -> GradeAppeal {
        let now = Utc::now();
        GradeAppeal {
            id: Uuid::new_v4(),
            course_name: self.course_name,
            current_grade: self.current_grade,
            expected_grade: self.expected_grade,
            reason: self.reason,
            status: AppealStatus::Pending,
            admin_response: None,
            submitted_by,
            created: now,
            updated: now,
        }
    }
}

/// Admin decision on an appeal; response text is attached verbatim.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AppealStatusUpdate {
    pub status: AppealStatus,
    #[serde(default)]
    pub admin_response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppealStatus::*;

    #[test]
    fn pending_can_move_anywhere_forward() {
        assert!(Pending.may_become(UnderReview));
        assert!(Pending.may_become(Approved));
        assert!(Pending.may_become(Rejected));
    }

    #[test]
    fn review_resolves_only() {
        assert!(UnderReview.may_become(Approved));
        assert!(UnderReview.may_become(Rejected));
        assert!(!UnderReview.may_become(Pending));
        assert!(!UnderReview.may_become(UnderReview));
    }

    #[test]
    fn terminal_states_are_frozen() {
        for terminal in [Approved, Rejected] {
            for next in [Pending, UnderReview, Approved, Rejected] {
                assert!(!terminal.may_become(next));
            }
        }
    }

    #[test]
    fn status_wire_format_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&UnderReview).unwrap(),
            "\"under_review\""
        );
    }
}
