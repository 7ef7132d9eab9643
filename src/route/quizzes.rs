use bson::doc;
use mongodb::Database;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

use crate::data::quiz::{Quiz, QuizData, QuizResult, QuizSubmission, SubmitResponse};
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::{problems, Problem};
use crate::store::Store;

/// List all quizzes
#[utoipa::path(
    responses(
        (status = 200, description = "All quizzes", body = Vec<Quiz>),
    ),
    security(("jwt" = []))
)]
#[get("/quizzes")]
#[tracing::instrument(skip(db))]
pub async fn quiz_list(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<Quiz>>, Problem> {
    let quizzes = Store::<Quiz>::open(db).list(None).await?;

    Ok(Json(quizzes))
}

/// Get a single quiz
#[utoipa::path(
    params(("id", description = "quiz ID")),
    responses(
        (status = 200, description = "The quiz", body = Quiz),
        (status = 404, description = "No such quiz", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/quizzes/<id>")]
#[tracing::instrument(skip(db))]
pub async fn quiz_get(
    id: Uuid,
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Quiz>, Problem> {
    let quiz = Store::<Quiz>::open(db)
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Quiz", id))?;

    Ok(Json(quiz))
}

/// Create a quiz
#[utoipa::path(
    request_body = QuizData,
    responses(
        (status = 200, description = "Created quiz", body = Quiz),
        (status = 400, description = "Validation failure", body = Problem),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/quizzes", format = "application/json", data = "<quiz>")]
#[tracing::instrument(skip(db))]
pub async fn quiz_create(
    quiz: Json<QuizData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Quiz>, Problem> {
    auth.require_admin()?;
    quiz.validate()?;

    let quiz = quiz.into_inner().into_quiz(auth.user);
    Store::<Quiz>::open(db).create(&quiz).await?;

    Ok(Json(quiz))
}

/// Update a quiz
#[utoipa::path(
    request_body = QuizData,
    responses(
        (status = 200, description = "Updated quiz", body = Quiz),
        (status = 404, description = "No such quiz", body = Problem),
    ),
    security(("jwt" = []))
)]
#[put("/quizzes/<id>", format = "application/json", data = "<quiz>")]
#[tracing::instrument(skip(db))]
pub async fn quiz_update(
    id: Uuid,
    quiz: Json<QuizData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Quiz>, Problem> {
    auth.require_admin()?;
    quiz.validate()?;

    let store = Store::<Quiz>::open(db);
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Quiz", id))?;

    let updated = quiz.into_inner().apply_to(&existing);
    store
        .replace(id, &updated)
        .await?
        .ok_or_else(|| problems::not_found("Quiz", id))?;

    Ok(Json(updated))
}

/// Delete a quiz
#[utoipa::path(
    responses(
        (status = 200, description = "Id of the removed quiz", body = String),
        (status = 404, description = "No such quiz", body = Problem),
    ),
    security(("jwt" = []))
)]
#[delete("/quizzes/<id>")]
#[tracing::instrument(skip(db))]
pub async fn quiz_delete(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<String>, Problem> {
    auth.require_admin()?;

    Store::<Quiz>::open(db)
        .delete(id)
        .await?
        .ok_or_else(|| problems::not_found("Quiz", id))?;

    Ok(Json(id.to_string()))
}

/// Submit quiz answers
///
/// One attempt per user and quiz; a second submission is rejected.
#[utoipa::path(
    request_body = QuizSubmission,
    responses(
        (status = 200, description = "Score over total", body = SubmitResponse),
        (status = 400, description = "Already submitted", body = Problem),
        (status = 404, description = "No such quiz", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/quizzes/<id>/submit", format = "application/json", data = "<submission>")]
#[tracing::instrument(skip(db))]
pub async fn quiz_submit(
    id: Uuid,
    submission: Json<QuizSubmission>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<SubmitResponse>, Problem> {
    let quiz = Store::<Quiz>::open(db)
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Quiz", id))?;

    let results = Store::<QuizResult>::open(db);
    let attempt_filter = doc! { "quiz": id.to_string(), "user": auth.user.to_string() };

    if results.find_one(attempt_filter).await?.is_some() {
        return Err(problems::validation("Quiz already submitted."));
    }

    let result = QuizResult::new(&quiz, auth.user, submission.into_inner().answers);

    // The unique (quiz, user) index turns a concurrent double-submit into a
    // duplicate-key error here.
    results.create(&result).await?;

    Ok(Json(SubmitResponse {
        score: result.score,
        total: result.total,
    }))
}

/// The caller's results for one quiz
#[utoipa::path(
    responses(
        (status = 200, description = "Results for the authenticated user", body = Vec<QuizResult>),
    ),
    security(("jwt" = []))
)]
#[get("/quizzes/<id>/results")]
#[tracing::instrument(skip(db))]
pub async fn quiz_results(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<QuizResult>>, Problem> {
    let results = Store::<QuizResult>::open(db)
        .list(doc! { "quiz": id.to_string(), "user": auth.user.to_string() })
        .await?;

    Ok(Json(results))
}

/// All quiz results
#[utoipa::path(
    responses(
        (status = 200, description = "Every stored result", body = Vec<QuizResult>),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/quizzes/results/all")]
#[tracing::instrument(skip(db))]
pub async fn quiz_results_all(
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<QuizResult>>, Problem> {
    auth.require_admin()?;

    let results = Store::<QuizResult>::open(db).list(None).await?;

    Ok(Json(results))
}
