use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::store::Resource;

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Quiz {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_by: Uuid,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl Resource for Quiz {
    const COLLECTION: &'static str = "quizzes";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Answers keyed by question index. Map keys are strings because that's all
/// a JSON object (and a BSON document) can carry.
pub type AnswerMap = BTreeMap<String, u32>;

impl Quiz {
    /// Counts exact matches of chosen option against the correct index.
    /// Missing and out-of-range answers score zero for that question.
    pub fn score(&self, answers: &AnswerMap) -> (u32, u32) {
        let mut score = 0;
        for (index, question) in self.questions.iter().enumerate() {
            if answers.get(&index.to_string()) == Some(&question.correct) {
                score += 1;
            }
        }

        (score, self.questions.len() as u32)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizResult {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub quiz: Uuid,
    pub user: Uuid,
    #[serde(default)]
    pub answers: AnswerMap,
    pub score: u32,
    pub total: u32,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(quiz: &Quiz, user: Uuid, answers: AnswerMap) -> QuizResult {
        let (score, total) = quiz.score(&answers);

        let now = Utc::now();
        QuizResult {
            id: Uuid::new_v4(),
            quiz: quiz.id,
            user,
            answers,
            score,
            total,
            created: now,
            updated: now,
        }
    }
}

impl Resource for QuizResult {
    const COLLECTION: &'static str = "quiz.results";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuizData {
    pub name: String,
    pub questions: Vec<Question>,
}

impl QuizData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.name.trim().is_empty() {
            return Err(problems::validation("Quiz name must not be empty."));
        }
        if self.questions.is_empty() {
            return Err(problems::validation("A quiz needs at least one question."));
        }

        for (index, question) in self.questions.iter().enumerate() {
            if question.text.trim().is_empty() {
                return Err(problems::validation(format!(
                    "Question {} has no text.",
                    index + 1
                )));
            }
            if question.options.len() != OPTIONS_PER_QUESTION {
                return Err(problems::validation(format!(
                    "Question {} must have exactly {} options.",
                    index + 1,
                    OPTIONS_PER_QUESTION
                )));
            }
            if question.correct as usize >= question.options.len() {
                return Err(problems::validation(format!(
                    "Question {} marks a correct option that doesn't exist.",
                    index + 1
                )));
            }
        }

        Ok(())
    }

    pub fn into_quiz(self, created_by: Uuid) -> Quiz {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4(),
            name: self.name,
            questions: self.questions,
            created_by,
            created: now,
            updated: now,
        }
    }

    pub fn apply_to(self, existing: &Quiz) -> Quiz {
        Quiz {
            id: existing.id,
            name: self.name,
            questions: self.questions,
            created_by: existing.created_by,
            created: existing.created,
            updated: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuizSubmission {
    #[serde(default)]
    pub answers: AnswerMap,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub score: u32,
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: u32) -> Question {
        Question {
            text: "Pick one".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
        }
    }

    fn quiz(correct: &[u32]) -> Quiz {
        QuizData {
            name: "Sample".to_string(),
            questions: correct.iter().copied().map(question).collect(),
        }
        .into_quiz(Uuid::new_v4())
    }

    fn answers(choices: &[(usize, u32)]) -> AnswerMap {
        choices
            .iter()
            .map(|(i, c)| (i.to_string(), *c))
            .collect()
    }

    #[test]
    fn all_correct_scores_full() {
        let quiz = quiz(&[0, 1, 2]);
        let (score, total) = quiz.score(&answers(&[(0, 0), (1, 1), (2, 2)]));
        assert_eq!((score, total), (3, 3));
    }

    #[test]
    fn partial_answers_score_partially() {
        let quiz = quiz(&[0, 1, 2, 3]);
        let (score, total) = quiz.score(&answers(&[(0, 0), (1, 3), (3, 3)]));
        assert_eq!((score, total), (2, 4));
    }

    #[test]
    fn unanswered_and_out_of_range_score_zero() {
        let quiz = quiz(&[1, 1]);
        let (score, total) = quiz.score(&answers(&[(5, 1)]));
        assert_eq!((score, total), (0, 2));
    }

    #[test]
    fn question_with_wrong_option_count_rejected() {
        let mut data = QuizData {
            name: "Bad".to_string(),
            questions: vec![question(0)],
        };
        data.questions[0].options.pop();
        assert!(data.validate().is_err());
    }

    #[test]
    fn correct_index_must_be_in_range() {
        let data = QuizData {
            name: "Bad".to_string(),
            questions: vec![question(4)],
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn result_records_score() {
        let quiz = quiz(&[2]);
        let result = QuizResult::new(&quiz, Uuid::new_v4(), answers(&[(0, 2)]));
        assert_eq!(result.score, 1);
        assert_eq!(result.total, 1);
        assert_eq!(result.quiz, quiz.id);
    }
}
