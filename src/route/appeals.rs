use bson::doc;
use mongodb::Database;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

use crate::data::appeal::{AppealStatusUpdate, GradeAppeal, GradeAppealData};
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::{problems, Problem};
use crate::store::Store;

/// List appeals; non-admin callers only see their own
#[utoipa::path(
    responses(
        (status = 200, description = "Appeals, newest first", body = Vec<GradeAppeal>),
    ),
    security(("jwt" = []))
)]
#[get("/grade-appeals")]
#[tracing::instrument(skip(db))]
pub async fn appeal_list(
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<GradeAppeal>>, Problem> {
    let filter = if auth.is_admin() {
        None
    } else {
        Some(doc! { "submitted_by": auth.user.to_string() })
    };

    let appeals = Store::<GradeAppeal>::open(db)
        .list_sorted(filter, doc! { "created": -1 })
        .await?;

    Ok(Json(appeals))
}

/// Get a single appeal
#[utoipa::path(
    responses(
        (status = 200, description = "The appeal", body = GradeAppeal),
        (status = 403, description = "Caller is neither the submitter nor an admin", body = Problem),
        (status = 404, description = "No such appeal", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/grade-appeals/<id>")]
#[tracing::instrument(skip(db))]
pub async fn appeal_get(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<GradeAppeal>, Problem> {
    let appeal = Store::<GradeAppeal>::open(db)
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Appeal", id))?;

    auth.require_owner_or_admin(appeal.submitted_by)?;

    Ok(Json(appeal))
}

/// Submit an appeal
#[utoipa::path(
    request_body = GradeAppealData,
    responses(
        (status = 200, description = "Created appeal", body = GradeAppeal),
        (status = 400, description = "Validation failure", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/grade-appeals", format = "application/json", data = "<appeal>")]
#[tracing::instrument(skip(db))]
pub async fn appeal_create(
    appeal: Json<GradeAppealData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<GradeAppeal>, Problem> {
    appeal.validate()?;

    let appeal = appeal.into_inner().into_appeal(auth.user);
    Store::<GradeAppeal>::open(db).create(&appeal).await?;

    Ok(Json(appeal))
}

/// Decide on an appeal
#[utoipa::path(
    request_body = AppealStatusUpdate,
    responses(
        (status = 200, description = "Updated appeal", body = GradeAppeal),
        (status = 400, description = "Transition not allowed", body = Problem),
        (status = 403, description = "Caller is not an admin", body = Problem),
        (status = 404, description = "No such appeal", body = Problem),
    ),
    security(("jwt" = []))
)]
#[put("/grade-appeals/<id>/status", format = "application/json", data = "<update>")]
#[tracing::instrument(skip(db))]
pub async fn appeal_set_status(
    id: Uuid,
    update: Json<AppealStatusUpdate>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<GradeAppeal>, Problem> {
    auth.require_admin()?;

    let store = Store::<GradeAppeal>::open(db);
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Appeal", id))?;

    let update = update.into_inner();
    if !existing.status.may_become(update.status) {
        return Err(problems::validation(format!(
            "An appeal can't go from '{}' to '{}'.",
            existing.status, update.status
        )));
    }

    let mut set = doc! { "status": update.status.to_string() };
    if let Some(response) = update.admin_response {
        set.insert("admin_response", response);
    }

    let updated = store
        .update(id, set)
        .await?
        .ok_or_else(|| problems::not_found("Appeal", id))?;

    Ok(Json(updated))
}
