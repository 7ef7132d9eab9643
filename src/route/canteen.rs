use bson::doc;
use mongodb::Database;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

use crate::data::canteen::{CanteenBooking, CanteenBookingData, MenuItem, MenuItemData};
use crate::report::{self, GroupTotal};
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::{problems, Problem};
use crate::store::Store;

/// Menu, sorted by category then item name
#[utoipa::path(
    responses(
        (status = 200, description = "All menu items", body = Vec<MenuItem>),
    ),
    security(("jwt" = []))
)]
#[get("/canteen/menu")]
#[tracing::instrument(skip(db))]
pub async fn menu_list(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<MenuItem>>, Problem> {
    let menu = Store::<MenuItem>::open(db)
        .list_sorted(None, doc! { "category": 1, "item_name": 1 })
        .await?;

    Ok(Json(menu))
}

/// Add a menu item
#[utoipa::path(
    request_body = MenuItemData,
    responses(
        (status = 200, description = "Created item", body = MenuItem),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/canteen/menu", format = "application/json", data = "<item>")]
#[tracing::instrument(skip(db))]
pub async fn menu_create(
    item: Json<MenuItemData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<MenuItem>, Problem> {
    auth.require_admin()?;
    item.validate()?;

    let item = item.into_inner().into_item();
    Store::<MenuItem>::open(db).create(&item).await?;

    Ok(Json(item))
}

/// Update a menu item
#[utoipa::path(
    request_body = MenuItemData,
    responses(
        (status = 200, description = "Updated item", body = MenuItem),
        (status = 404, description = "No such item", body = Problem),
    ),
    security(("jwt" = []))
)]
#[put("/canteen/menu/<id>", format = "application/json", data = "<item>")]
#[tracing::instrument(skip(db))]
pub async fn menu_update(
    id: Uuid,
    item: Json<MenuItemData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<MenuItem>, Problem> {
    auth.require_admin()?;
    item.validate()?;

    let store = Store::<MenuItem>::open(db);
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Menu item", id))?;

    let updated = item.into_inner().apply_to(&existing);
    store
        .replace(id, &updated)
        .await?
        .ok_or_else(|| problems::not_found("Menu item", id))?;

    Ok(Json(updated))
}

/// Remove a menu item
#[utoipa::path(
    responses(
        (status = 200, description = "Id of the removed item", body = String),
        (status = 404, description = "No such item", body = Problem),
    ),
    security(("jwt" = []))
)]
#[delete("/canteen/menu/<id>")]
#[tracing::instrument(skip(db))]
pub async fn menu_delete(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<String>, Problem> {
    auth.require_admin()?;

    Store::<MenuItem>::open(db)
        .delete(id)
        .await?
        .ok_or_else(|| problems::not_found("Menu item", id))?;

    Ok(Json(id.to_string()))
}

/// Bookings; non-admin callers only see their own
#[utoipa::path(
    responses(
        (status = 200, description = "Bookings, newest date first", body = Vec<CanteenBooking>),
    ),
    security(("jwt" = []))
)]
#[get("/canteen/bookings")]
#[tracing::instrument(skip(db))]
pub async fn booking_list(
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<CanteenBooking>>, Problem> {
    let filter = if auth.is_admin() {
        None
    } else {
        Some(doc! { "user": auth.user.to_string() })
    };

    let bookings = Store::<CanteenBooking>::open(db)
        .list_sorted(filter, doc! { "date": -1 })
        .await?;

    Ok(Json(bookings))
}

/// Place a booking
#[utoipa::path(
    request_body = CanteenBookingData,
    responses(
        (status = 200, description = "Created booking", body = CanteenBooking),
        (status = 400, description = "Validation failure", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/canteen/bookings", format = "application/json", data = "<booking>")]
#[tracing::instrument(skip(db))]
pub async fn booking_create(
    booking: Json<CanteenBookingData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<CanteenBooking>, Problem> {
    booking.validate()?;

    let booking = booking.into_inner().into_booking(auth.user);
    Store::<CanteenBooking>::open(db).create(&booking).await?;

    Ok(Json(booking))
}

/// Update a booking
#[utoipa::path(
    request_body = CanteenBookingData,
    responses(
        (status = 200, description = "Updated booking", body = CanteenBooking),
        (status = 403, description = "Caller is neither the owner nor an admin", body = Problem),
        (status = 404, description = "No such booking", body = Problem),
    ),
    security(("jwt" = []))
)]
#[put("/canteen/bookings/<id>", format = "application/json", data = "<booking>")]
#[tracing::instrument(skip(db))]
pub async fn booking_update(
    id: Uuid,
    booking: Json<CanteenBookingData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<CanteenBooking>, Problem> {
    booking.validate()?;

    let store = Store::<CanteenBooking>::open(db);
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Booking", id))?;

    auth.require_owner_or_admin(existing.user)?;

    let updated = booking.into_inner().apply_to(&existing);
    store
        .replace(id, &updated)
        .await?
        .ok_or_else(|| problems::not_found("Booking", id))?;

    Ok(Json(updated))
}

/// Cancel a booking
#[utoipa::path(
    responses(
        (status = 200, description = "Id of the removed booking", body = String),
        (status = 403, description = "Caller is neither the owner nor an admin", body = Problem),
        (status = 404, description = "No such booking", body = Problem),
    ),
    security(("jwt" = []))
)]
#[delete("/canteen/bookings/<id>")]
#[tracing::instrument(skip(db))]
pub async fn booking_delete(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<String>, Problem> {
    let store = Store::<CanteenBooking>::open(db);
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Booking", id))?;

    auth.require_owner_or_admin(existing.user)?;

    store.delete(id).await?;

    Ok(Json(id.to_string()))
}

/// Top 5 food items by quantity ordered
#[utoipa::path(
    responses(
        (status = 200, description = "Largest totals first", body = Vec<GroupTotal>),
    ),
    security(("jwt" = []))
)]
#[get("/canteen/dashboard/top-items")]
#[tracing::instrument(skip(db))]
pub async fn dashboard_top_items(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<GroupTotal>>, Problem> {
    let bookings = Store::<CanteenBooking>::open(db).list(None).await?;

    let totals = report::group_sum(
        &bookings,
        |b| b.food_item.clone(),
        |b| i64::from(b.quantity),
    );

    Ok(Json(report::top_n(totals, 5)))
}

/// Orders per calendar day
#[utoipa::path(
    responses(
        (status = 200, description = "Counts keyed by day, oldest first", body = Vec<GroupTotal>),
    ),
    security(("jwt" = []))
)]
#[get("/canteen/dashboard/orders-per-day")]
#[tracing::instrument(skip(db))]
pub async fn dashboard_orders_per_day(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<GroupTotal>>, Problem> {
    let bookings = Store::<CanteenBooking>::open(db).list(None).await?;

    Ok(Json(report::per_day(&bookings, |b| b.date)))
}
