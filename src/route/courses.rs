use mongodb::Database;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

use crate::data::course::{Course, CourseData};
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::{problems, Problem};
use crate::store::Store;

/// List all courses
#[utoipa::path(
    responses(
        (status = 200, description = "All courses", body = Vec<Course>),
    ),
    security(("jwt" = []))
)]
#[get("/courses")]
#[tracing::instrument(skip(db))]
pub async fn course_list(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<Course>>, Problem> {
    let courses = Store::<Course>::open(db).list(None).await?;

    Ok(Json(courses))
}

/// Get a single course
#[utoipa::path(
    params(("id", description = "course ID")),
    responses(
        (status = 200, description = "The course", body = Course),
        (status = 404, description = "No such course", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/courses/<id>")]
#[tracing::instrument(skip(db))]
pub async fn course_get(
    id: Uuid,
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Course>, Problem> {
    let course = Store::<Course>::open(db)
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Course", id))?;

    Ok(Json(course))
}

/// Create a course
#[utoipa::path(
    request_body = CourseData,
    responses(
        (status = 200, description = "Created course", body = Course),
        (status = 400, description = "Validation failure or duplicate code", body = Problem),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/courses", format = "application/json", data = "<course>")]
#[tracing::instrument(skip(db))]
pub async fn course_create(
    course: Json<CourseData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Course>, Problem> {
    auth.require_admin()?;
    course.validate()?;

    let course = course.into_inner().into_course();
    Store::<Course>::open(db).create(&course).await?;

    Ok(Json(course))
}

/// Update a course
#[utoipa::path(
    request_body = CourseData,
    responses(
        (status = 200, description = "Updated course", body = Course),
        (status = 400, description = "Validation failure", body = Problem),
        (status = 404, description = "No such course", body = Problem),
    ),
    security(("jwt" = []))
)]
#[put("/courses/<id>", format = "application/json", data = "<course>")]
#[tracing::instrument(skip(db))]
pub async fn course_update(
    id: Uuid,
    course: Json<CourseData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Course>, Problem> {
    auth.require_admin()?;
    course.validate()?;

    let store = Store::<Course>::open(db);
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Course", id))?;

    let updated = course.into_inner().apply_to(&existing);
    store
        .replace(id, &updated)
        .await?
        .ok_or_else(|| problems::not_found("Course", id))?;

    Ok(Json(updated))
}

/// Delete a course
#[utoipa::path(
    responses(
        (status = 200, description = "Id of the removed course", body = String),
        (status = 404, description = "No such course", body = Problem),
    ),
    security(("jwt" = []))
)]
#[delete("/courses/<id>")]
#[tracing::instrument(skip(db))]
pub async fn course_delete(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<String>, Problem> {
    auth.require_admin()?;

    Store::<Course>::open(db)
        .delete(id)
        .await?
        .ok_or_else(|| problems::not_found("Course", id))?;

    Ok(Json(id.to_string()))
}
