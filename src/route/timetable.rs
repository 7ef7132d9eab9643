use mongodb::Database;
use rocket::serde::json::Json;
use rocket::State;

use crate::data::timetable::{Timetable, TimetableData, TIMETABLE_SLOT_ID};
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::Problem;
use crate::store::Store;

/// Current timetable
///
/// Returns an empty default grid when nothing has been saved yet.
#[utoipa::path(
    responses(
        (status = 200, description = "The weekly grid", body = Timetable),
    ),
    security(("jwt" = []))
)]
#[get("/timetable")]
#[tracing::instrument(skip(db))]
pub async fn timetable_get(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Timetable>, Problem> {
    let stored = Store::<Timetable>::open(db).get(TIMETABLE_SLOT_ID).await?;

    Ok(Json(stored.unwrap_or_else(Timetable::default_grid)))
}

/// Save the timetable
///
/// The timetable is a singleton; saving replaces the previous grid in place.
#[utoipa::path(
    request_body = TimetableData,
    responses(
        (status = 200, description = "Stored grid", body = Timetable),
        (status = 400, description = "Validation failure", body = Problem),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/timetable", format = "application/json", data = "<timetable>")]
#[tracing::instrument(skip(db))]
pub async fn timetable_save(
    timetable: Json<TimetableData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Timetable>, Problem> {
    auth.require_admin()?;
    timetable.validate()?;

    let timetable = timetable.into_inner().into_timetable(auth.user);
    Store::<Timetable>::open(db)
        .upsert(TIMETABLE_SLOT_ID, &timetable)
        .await?;

    Ok(Json(timetable))
}

/// Clear the timetable
#[utoipa::path(
    responses(
        (status = 200, description = "Slot cleared"),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[delete("/timetable")]
#[tracing::instrument(skip(db))]
pub async fn timetable_delete(
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<String>, Problem> {
    auth.require_admin()?;

    Store::<Timetable>::open(db).delete(TIMETABLE_SLOT_ID).await?;

    Ok(Json("Timetable deleted".to_string()))
}
