use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::store::Resource;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Course {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub department: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl Resource for Course {
    const COLLECTION: &'static str = "courses";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CourseData {
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub department: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
}

impl CourseData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.code.trim().is_empty() {
            return Err(problems::validation("Course code must not be empty."));
        }
        if self.name.trim().is_empty() {
            return Err(problems::validation("Course name must not be empty."));
        }
        if self.department.trim().is_empty() {
            return Err(problems::validation("Department must not be empty."));
        }
        if self.credits < 1 {
            return Err(problems::validation("Credits must be a positive integer."));
        }

        Ok(())
    }

    pub fn into_course(self) -> Course {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4(),
            code: self.code.trim().to_string(),
            name: self.name,
            credits: self.credits,
            department: self.department,
            description: self.description,
            instructor: self.instructor,
            created: now,
            updated: now,
        }
    }

    /// New course state for a full update, keeping the identity and creation
    /// stamp of the stored document.
    pub fn apply_to(self, existing: &Course) -> Course {
        Course {
            id: existing.id,
            code: self.code.trim().to_string(),
            name: self.name,
            credits: self.credits,
            department: self.department,
            description: self.description,
            instructor: self.instructor,
            created: existing.created,
            updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> CourseData {
        CourseData {
            code: "CS101".to_string(),
            name: "Intro to Computer Science".to_string(),
            credits: 4,
            department: "CS".to_string(),
            description: None,
            instructor: Some("Prof. Byrd".to_string()),
        }
    }

    #[test]
    fn valid_course_passes() {
        assert!(data().validate().is_ok());
    }

    #[test]
    fn zero_credits_rejected() {
        let mut d = data();
        d.credits = 0;
        assert!(d.validate().is_err());
    }

    #[test]
    fn blank_code_rejected() {
        let mut d = data();
        d.code = "  ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn update_preserves_identity() {
        let original = data().into_course();
        let updated = CourseData {
            name: "Intro to CS".to_string(),
            ..data()
        }
        .apply_to(&original);

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created, original.created);
        assert_eq!(updated.name, "Intro to CS");
    }
}
