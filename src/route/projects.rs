use bson::doc;
use mongodb::Database;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

use crate::data::project::{Project, ProjectData, ProjectStatusUpdate};
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::{problems, Problem};
use crate::store::Store;

/// List projects; non-admin callers only see their own
#[utoipa::path(
    responses(
        (status = 200, description = "Projects, newest first", body = Vec<Project>),
    ),
    security(("jwt" = []))
)]
#[get("/projects")]
#[tracing::instrument(skip(db))]
pub async fn project_list(
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<Project>>, Problem> {
    let filter = if auth.is_admin() {
        None
    } else {
        Some(doc! { "submitted_by": auth.user.to_string() })
    };

    let projects = Store::<Project>::open(db)
        .list_sorted(filter, doc! { "created": -1 })
        .await?;

    Ok(Json(projects))
}

/// Get a single project
#[utoipa::path(
    responses(
        (status = 200, description = "The project", body = Project),
        (status = 403, description = "Caller is neither the submitter nor an admin", body = Problem),
        (status = 404, description = "No such project", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/projects/<id>")]
#[tracing::instrument(skip(db))]
pub async fn project_get(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Project>, Problem> {
    let project = Store::<Project>::open(db)
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Project", id))?;

    auth.require_owner_or_admin(project.submitted_by)?;

    Ok(Json(project))
}

/// Submit a project idea
#[utoipa::path(
    request_body = ProjectData,
    responses(
        (status = 200, description = "Created project", body = Project),
        (status = 400, description = "Validation failure", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/projects", format = "application/json", data = "<project>")]
#[tracing::instrument(skip(db))]
pub async fn project_create(
    project: Json<ProjectData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Project>, Problem> {
    project.validate()?;

    let project = project.into_inner().into_project(auth.user);
    Store::<Project>::open(db).create(&project).await?;

    Ok(Json(project))
}

/// Decide on a project
#[utoipa::path(
    request_body = ProjectStatusUpdate,
    responses(
        (status = 200, description = "Updated project", body = Project),
        (status = 400, description = "Transition not allowed", body = Problem),
        (status = 403, description = "Caller is not an admin", body = Problem),
        (status = 404, description = "No such project", body = Problem),
    ),
    security(("jwt" = []))
)]
#[put("/projects/<id>/status", format = "application/json", data = "<update>")]
#[tracing::instrument(skip(db))]
pub async fn project_set_status(
    id: Uuid,
    update: Json<ProjectStatusUpdate>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Project>, Problem> {
    auth.require_admin()?;

    let store = Store::<Project>::open(db);
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Project", id))?;

    let update = update.into_inner();
    if !existing.status.may_become(update.status) {
        return Err(problems::validation(format!(
            "A project can't go from '{}' to '{}'.",
            existing.status, update.status
        )));
    }

    let mut set = doc! { "status": update.status.to_string() };
    if let Some(feedback) = update.feedback {
        set.insert("feedback", feedback);
    }

    let updated = store
        .update(id, set)
        .await?
        .ok_or_else(|| problems::not_found("Project", id))?;

    Ok(Json(updated))
}
