use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::store::Resource;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub faculty_name: String,
    pub subject: String,
    pub rating: u8,
    #[serde(default)]
    pub comments: String,
    pub submitted_by: Uuid,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl Resource for Feedback {
    const COLLECTION: &'static str = "feedback";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackData {
    pub faculty_name: String,
    pub subject: String,
    pub rating: u8,
    #[serde(default)]
    pub comments: String,
}

impl FeedbackData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.faculty_name.trim().is_empty() {
            return Err(problems::validation("Faculty name must not be empty."));
        }
        if self.subject.trim().is_empty() {
            return Err(problems::validation("Subject must not be empty."));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(problems::validation("Rating must be between 1 and 5."));
        }

        Ok(())
    }

    pub fn into_feedback(self, submitted_by: Uuid) -> Feedback {
        let now = Utc::now();
        Feedback {
            id: Uuid::new_v4(),
            faculty_name: self.faculty_name,
            subject: self.subject,
            rating: self.rating,
            comments: self.comments,
            submitted_by,
            created: now,
            updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(rating: u8) -> FeedbackData {
        FeedbackData {
            faculty_name: "Prof. Byrd".to_string(),
            subject: "Compilers".to_string(),
            rating,
            comments: String::new(),
        }
    }

    #[test]
    fn rating_bounds() {
        assert!(data(0).validate().is_err());
        assert!(data(1).validate().is_ok());
        assert!(data(5).validate().is_ok());
        assert!(data(6).validate().is_err());
    }

    #[test]
    fn submitter_is_recorded() {
        let submitter = Uuid::new_v4();
        let feedback = data(4).into_feedback(submitter);
        assert_eq!(feedback.submitted_by, submitter);
    }
}
