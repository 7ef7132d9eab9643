use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::store::Resource;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub item_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_availability")]
    pub availability: bool,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

fn default_availability() -> bool {
    true
}

impl Resource for MenuItem {
    const COLLECTION: &'static str = "canteen.menu";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MenuItemData {
    pub item_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_availability")]
    pub availability: bool,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub image_url: String,
}

impl MenuItemData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.item_name.trim().is_empty() {
            return Err(problems::validation("Item name must not be empty."));
        }
        if self.price < 0.0 {
            return Err(problems::validation("Price can't be negative."));
        }

        Ok(())
    }

    pub fn into_item(self) -> MenuItem {
        let now = Utc::now();
        MenuItem {
            id: Uuid::new_v4(),
            item_name: self.item_name,
            category: self.category,
            price: self.price,
            availability: self.availability,
            prep_time: self.prep_time,
            image_url: self.image_url,
            created: now,
            updated: now,
        }
    }

    pub fn apply_to(self, existing: &MenuItem) -> MenuItem {
        MenuItem {
            id: existing.id,
            item_name: self.item_name,
            category: self.category,
            price: self.price,
            availability: self.availability,
            prep_time: self.prep_time,
            image_url: self.image_url,
            created: existing.created,
            updated: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CanteenBooking {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user: Uuid,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub time_slot: String,
    pub food_item: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_payment_mode")]
    pub payment_mode: String,
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

fn default_quantity() -> u32 {
    1
}

fn default_payment_mode() -> String {
    "Cash".to_string()
}

impl Resource for CanteenBooking {
    const COLLECTION: &'static str = "canteen.bookings";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CanteenBookingData {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_slot: String,
    pub food_item: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_payment_mode")]
    pub payment_mode: String,
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub confirmed: bool,
}

impl CanteenBookingData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.food_item.trim().is_empty() {
            return Err(problems::validation("Food item must not be empty."));
        }
        if self.quantity < 1 {
            return Err(problems::validation("Quantity must be at least 1."));
        }

        Ok(())
    }

    pub fn into_booking(self, user: Uuid) -> CanteenBooking {
        let now = Utc::now();
        CanteenBooking {
            id: Uuid::new_v4(),
            user,
            student_id: self.student_id,
            name: self.name,
            date: self.date.unwrap_or(now),
            time_slot: self.time_slot,
            food_item: self.food_item,
            quantity: self.quantity,
            payment_mode: self.payment_mode,
            special_instructions: self.special_instructions,
            confirmed: self.confirmed,
            created: now,
            updated: now,
        }
    }

    /// Keeps identity, owner and creation stamp of the stored booking.
    pub fn apply_to(self, existing: &CanteenBooking) -> CanteenBooking {
        CanteenBooking {
            id: existing.id,
            user: existing.user,
            student_id: self.student_id,
            name: self.name,
            date: self.date.unwrap_or(existing.date),
            time_slot: self.time_slot,
            food_item: self.food_item,
            quantity: self.quantity,
            payment_mode: self.payment_mode,
            special_instructions: self.special_instructions,
            confirmed: self.confirmed,
            created: existing.created,
            updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_data() -> CanteenBookingData {
        CanteenBookingData {
            student_id: "S-42".to_string(),
            name: "Ada".to_string(),
            date: None,
            time_slot: "12:30".to_string(),
            food_item: "Veg Thali".to_string(),
            quantity: 2,
            payment_mode: default_payment_mode(),
            special_instructions: String::new(),
            confirmed: false,
        }
    }

    #[test]
    fn booking_requires_food_item() {
        let mut data = booking_data();
        data.food_item = String::new();
        assert!(data.validate().is_err());
    }

    #[test]
    fn booking_requires_positive_quantity() {
        let mut data = booking_data();
        data.quantity = 0;
        assert!(data.validate().is_err());
    }

    #[test]
    fn owner_is_injected_on_create() {
        let owner = Uuid::new_v4();
        let booking = booking_data().into_booking(owner);
        assert_eq!(booking.user, owner);
        assert_eq!(booking.payment_mode, "Cash");
    }

    #[test]
    fn update_cant_reassign_owner() {
        let owner = Uuid::new_v4();
        let stored = booking_data().into_booking(owner);
        let updated = booking_data().apply_to(&stored);
        assert_eq!(updated.user, owner);
        assert_eq!(updated.id, stored.id);
    }

    #[test]
    fn negative_price_rejected() {
        let data = MenuItemData {
            item_name: "Tea".to_string(),
            category: "Drinks".to_string(),
            price: -1.0,
            availability: true,
            prep_time: String::new(),
            image_url: String::new(),
        };
        assert!(data.validate().is_err());
    }
}
