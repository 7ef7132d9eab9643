use bson::doc;
use mongodb::Database;
use rocket::http::ContentType;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

use crate::data::bus::{BookingStatus, BusBooking, BusBookingData, BusRoute, BusRouteData};
use crate::report::{self, GroupTotal};
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::{problems, Problem};
use crate::store::{id_filter, Store};

/// List bus routes
#[utoipa::path(
    responses(
        (status = 200, description = "All routes", body = Vec<BusRoute>),
    ),
    security(("jwt" = []))
)]
#[get("/bus/routes")]
#[tracing::instrument(skip(db))]
pub async fn route_list(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<BusRoute>>, Problem> {
    let routes = Store::<BusRoute>::open(db).list(None).await?;

    Ok(Json(routes))
}

/// Add a route
#[utoipa::path(
    request_body = BusRouteData,
    responses(
        (status = 200, description = "Created route", body = BusRoute),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/bus/routes", format = "application/json", data = "<route>")]
#[tracing::instrument(skip(db))]
pub async fn route_create(
    route: Json<BusRouteData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<BusRoute>, Problem> {
    auth.require_admin()?;
    route.validate()?;

    let route = route.into_inner().into_route();
    Store::<BusRoute>::open(db).create(&route).await?;

    Ok(Json(route))
}

/// Bookings; non-admin callers only see their own
#[utoipa::path(
    responses(
        (status = 200, description = "Bookings, newest first", body = Vec<BusBooking>),
    ),
    security(("jwt" = []))
)]
#[get("/bus/bookings")]
#[tracing::instrument(skip(db))]
pub async fn booking_list(
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<BusBooking>>, Problem> {
    let filter = if auth.is_admin() {
        None
    } else {
        Some(doc! { "user": auth.user.to_string() })
    };

    let bookings = Store::<BusBooking>::open(db)
        .list_sorted(filter, doc! { "created": -1 })
        .await?;

    Ok(Json(bookings))
}

/// Book seats on a route
///
/// Seats are taken with a conditional decrement, so two concurrent bookings
/// can't oversell a route.
#[utoipa::path(
    request_body = BusBookingData,
    responses(
        (status = 200, description = "Created booking", body = BusBooking),
        (status = 400, description = "Not enough seats available", body = Problem),
        (status = 404, description = "No such route", body = Problem),
    ),
    security(("jwt" = []))
)]
#[post("/bus/bookings", format = "application/json", data = "<booking>")]
#[tracing::instrument(skip(db))]
pub async fn booking_create(
    booking: Json<BusBookingData>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<BusBooking>, Problem> {
    booking.validate()?;

    let data = booking.into_inner();
    let seats = i64::from(data.seats_booked);

    let routes = Store::<BusRoute>::open(db);

    let mut seat_filter = id_filter(data.route);
    seat_filter.insert("available_seats", doc! { "$gte": seats });

    let reserved = routes
        .update_where(seat_filter, doc! { "$inc": { "available_seats": -seats } })
        .await?;

    if reserved == 0 {
        return match routes.get(data.route).await? {
            None => Err(problems::not_found("Route", data.route)),
            Some(_) => Err(problems::validation("Not enough seats available.")),
        };
    }

    let booking = data.into_booking(auth.user);
    let bookings = Store::<BusBooking>::open(db);

    if let Err(problem) = bookings.create(&booking).await {
        // Hand the seats back; the reservation was never recorded.
        routes
            .update_where(
                id_filter(booking.route),
                doc! { "$inc": { "available_seats": seats } },
            )
            .await?;
        return Err(problem);
    }

    Ok(Json(booking))
}

/// Cancel a booking and release its seats
#[utoipa::path(
    responses(
        (status = 200, description = "Cancellation confirmation", body = String),
        (status = 400, description = "Booking already cancelled", body = Problem),
        (status = 403, description = "Caller is neither the owner nor an admin", body = Problem),
        (status = 404, description = "No such booking", body = Problem),
    ),
    security(("jwt" = []))
)]
#[delete("/bus/bookings/<id>")]
#[tracing::instrument(skip(db))]
pub async fn booking_cancel(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<String>, Problem> {
    let bookings = Store::<BusBooking>::open(db);
    let booking = bookings
        .get(id)
        .await?
        .ok_or_else(|| problems::not_found("Booking", id))?;

    auth.require_owner_or_admin(booking.user)?;

    // Flip confirmed -> cancelled in one step; a concurrent second cancel
    // matches nothing and can't release the seats twice.
    let mut cancel_filter = id_filter(id);
    cancel_filter.insert("status", BookingStatus::Confirmed.to_string());

    let cancelled = bookings
        .update_where(
            cancel_filter,
            doc! { "$set": {
                "status": BookingStatus::Cancelled.to_string(),
                "updated": chrono::Utc::now().to_rfc3339(),
            } },
        )
        .await?;

    if cancelled == 0 {
        return Err(problems::validation("Booking already cancelled."));
    }

    Store::<BusRoute>::open(db)
        .update_where(
            id_filter(booking.route),
            doc! { "$inc": { "available_seats": i64::from(booking.seats_booked) } },
        )
        .await?;

    Ok(Json("Booking cancelled successfully".to_string()))
}

/// Top 5 routes by booking count
#[utoipa::path(
    responses(
        (status = 200, description = "Most booked routes first", body = Vec<GroupTotal>),
    ),
    security(("jwt" = []))
)]
#[get("/bus/dashboard/popular-routes")]
#[tracing::instrument(skip(db))]
pub async fn dashboard_popular_routes(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<GroupTotal>>, Problem> {
    let bookings = Store::<BusBooking>::open(db).list(None).await?;
    let routes = Store::<BusRoute>::open(db).list(None).await?;

    let totals = report::group_count(&bookings, |b| {
        routes
            .iter()
            .find(|r| r.id == b.route)
            .map(|r| r.route_name.clone())
            .unwrap_or_else(|| b.route.to_string())
    });

    Ok(Json(report::top_n(totals, 5)))
}

/// Reservations per calendar day
#[utoipa::path(
    responses(
        (status = 200, description = "Counts keyed by day, oldest first", body = Vec<GroupTotal>),
    ),
    security(("jwt" = []))
)]
#[get("/bus/dashboard/reservations-per-day")]
#[tracing::instrument(skip(db))]
pub async fn dashboard_reservations_per_day(
    _auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<GroupTotal>>, Problem> {
    let bookings = Store::<BusBooking>::open(db).list(None).await?;

    Ok(Json(report::per_day(&bookings, |b| b.date)))
}

pub fn booking_csv_line(booking: &BusBooking) -> String {
    format!(
        "{},{},{},{},{},{}",
        booking.id,
        booking.route,
        booking.date.format("%Y-%m-%d"),
        booking.seats_booked,
        booking.status,
        booking.created.to_rfc3339(),
    )
}

/// Export all bookings as CSV
#[utoipa::path(
    responses(
        (status = 200, description = "reservations.csv"),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/bus/bookings/export")]
#[tracing::instrument(skip(db))]
pub async fn booking_export(
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<(ContentType, String), Problem> {
    auth.require_admin()?;

    let bookings = Store::<BusBooking>::open(db)
        .list_sorted(None, doc! { "created": 1 })
        .await?;

    let mut csv = String::from("booking_id,route_id,date,seats,status,created\n");
    for booking in &bookings {
        csv.push_str(&booking_csv_line(booking));
        csv.push('\n');
    }

    Ok((ContentType::CSV, csv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn csv_line_has_fixed_column_order() {
        let date = chrono::Utc.with_ymd_and_hms(2024, 5, 2, 8, 15, 0).unwrap();
        let booking = BusBookingData {
            route: Uuid::nil(),
            date,
            seats_booked: 2,
        }
        .into_booking(Uuid::nil());

        let line = booking_csv_line(&booking);
        let columns: Vec<&str> = line.split(',').collect();

        assert_eq!(columns.len(), 6);
        assert_eq!(columns[1], Uuid::nil().to_string());
        assert_eq!(columns[2], "2024-05-02");
        assert_eq!(columns[3], "2");
        assert_eq!(columns[4], "confirmed");
    }
}
