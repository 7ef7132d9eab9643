use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::store::Resource;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BusRoute {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub route_name: String,
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    pub departure_time: String,
    pub available_seats: i64,
    pub fare: f64,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl Resource for BusRoute {
    const COLLECTION: &'static str = "bus.routes";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BusRouteData {
    pub route_name: String,
    #[serde(rename = "from")]
    pub origin: String,
    #[serde(rename = "to")]
    pub destination: String,
    pub departure_time: String,
    pub available_seats: i64,
    pub fare: f64,
}

impl BusRouteData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.route_name.trim().is_empty() {
            return Err(problems::validation("Route name must not be empty."));
        }
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(problems::validation("Route endpoints must not be empty."));
        }
        if self.available_seats < 0 {
            return Err(problems::validation("Seat count can't be negative."));
        }
        if self.fare < 0.0 {
            return Err(problems::validation("Fare can't be negative."));
        }

        Ok(())
    }

    pub fn into_route(self) -> BusRoute {
        let now = Utc::now();
        BusRoute {
            id: Uuid::new_v4(),
            route_name: self.route_name,
            origin: self.origin,
            destination: self.destination,
            departure_time: self.departure_time,
            available_seats: self.available_seats,
            fare: self.fare,
            created: now,
            updated: now,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BusBooking {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub route: Uuid,
    pub user: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default = "default_seats")]
    pub seats_booked: u32,
    #[serde(default = "default_status")]
    pub status: BookingStatus,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

fn default_seats() -> u32 {
    1
}

fn default_status() -> BookingStatus {
    BookingStatus::Confirmed
}

impl Resource for BusBooking {
    const COLLECTION: &'static str = "bus.bookings";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BusBookingData {
    pub route: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default = "default_seats")]
    pub seats_booked: u32,
}

impl BusBookingData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.seats_booked < 1 {
            return Err(problems::validation("At least one seat must be booked."));
        }

        Ok(())
    }

    pub fn into_booking(self, user: Uuid) -> BusBooking {
        let now = Utc::now();
        BusBooking {
            id: Uuid::new_v4(),
            route: self.route,
            user,
            date: self.date,
            seats_booked: self.seats_booked,
            status: BookingStatus::Confirmed,
            created: now,
            updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_field_names_match_wire_format() {
        let route = BusRouteData {
            route_name: "Campus Express".to_string(),
            origin: "Hostel".to_string(),
            destination: "Main Gate".to_string(),
            departure_time: "08:15".to_string(),
            available_seats: 40,
            fare: 12.5,
        }
        .into_route();

        let value = serde_json::to_value(&route).unwrap();
        assert_eq!(value["from"], "Hostel");
        assert_eq!(value["to"], "Main Gate");
        assert_eq!(value["available_seats"], 40);
    }

    #[test]
    fn zero_seat_booking_rejected() {
        let data = BusBookingData {
            route: Uuid::new_v4(),
            date: Utc::now(),
            seats_booked: 0,
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn new_booking_starts_confirmed() {
        let data = BusBookingData {
            route: Uuid::new_v4(),
            date: Utc::now(),
            seats_booked: 3,
        };
        let booking = data.into_booking(Uuid::new_v4());
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.seats_booked, 3);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
