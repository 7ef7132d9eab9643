use bson::doc;
use mongodb::Database;
use rocket::serde::json::Json;
use rocket::State;

use crate::data::feedback::{Feedback, FeedbackData};
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::Problem;
use crate::store::Store;

/// All faculty feedback, newest first
#[utoipa::path(
    responses(
        (status = 200, description = "Every feedback entry", body = Vec<Feedback>),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/feedback")]
#[tracing::instrument(skip(db))]
pub async fn feedback_list(
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<Feedback>>, Problem> {
    auth.require_admin()?;

    let feedback = Store::<Feedback>::open(db)
        .list_sorted(None, doc! { "created": -1 })
        .await?;

    Ok(Json(feedback))
}

/// Submit feedback
#[utoipa::path(
    request_body = FeedbackData,
    responses(
        (status = 200, description = "Created entry", body = Feedback),
        (status = 400, description = "Validation failure", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/feedback", format = "application/json", data = "<feedback>")]
#[tracing::instrument(skip(db))]
pub async fn feedback_create(
    feedback: Json<FeedbackData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Feedback>, Problem> {
    feedback.validate()?;

    let feedback = feedback.into_inner().into_feedback(auth.user);
    Store::<Feedback>::open(db).create(&feedback).await?;

    Ok(Json(feedback))
}
