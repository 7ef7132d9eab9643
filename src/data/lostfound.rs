use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::store::Resource;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lost,
    Found,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Open,
    Claimed,
    Resolved,
}

impl std::default::Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Open
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LostFoundItem {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub item_name: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub contact_info: String,
    #[serde(default)]
    pub status: ItemStatus,
    pub posted_by: Uuid,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl Resource for LostFoundItem {
    const COLLECTION: &'static str = "lostfound";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LostFoundItemData {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub item_name: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub contact_info: String,
    #[serde(default)]
    pub status: ItemStatus,
}

impl LostFoundItemData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.item_name.trim().is_empty() {
            return Err(problems::validation("Item name must not be empty."));
        }
        if self.description.trim().is_empty() {
            return Err(problems::validation("Description must not be empty."));
        }
        if self.location.trim().is_empty() {
            return Err(problems::validation("Location must not be empty."));
        }
        if self.contact_info.trim().is_empty() {
            return Err(problems::validation("Contact info must not be empty."));
        }

        Ok(())
    }

    pub fn into_item(self, posted_by: Uuid) -> LostFoundItem {
        let now = Utc::now();
        LostFoundItem {
            id: Uuid::new_v4(),
            kind: self.kind,
            item_name: self.item_name,
            description: self.description,
            location: self.location,
            date: self.date,
            contact_info: self.contact_info,
            status: self.status,
            posted_by,
            created: now,
            updated: now,
        }
    }

    pub fn apply_to(self, existing: &LostFoundItem) -> LostFoundItem {
        LostFoundItem {
            id: existing.id,
            kind: self.kind,
            item_name: self.item_name,
            description: self.description,
            location: self.location,
            date: self.date,
            contact_info: self.contact_info,
            status: self.status,
            posted_by: existing.posted_by,
            created: existing.created,
            updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> LostFoundItemData {
        LostFoundItemData {
            kind: ItemKind::Lost,
            item_name: "Black umbrella".to_string(),
            description: "Left in lecture hall 3".to_string(),
            location: "LH-3".to_string(),
            date: Utc::now(),
            contact_info: "ada@example.com".to_string(),
            status: ItemStatus::default(),
        }
    }

    #[test]
    fn kind_uses_the_wire_name_type() {
        let item = data().into_item(Uuid::new_v4());
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "lost");
        assert_eq!(value["status"], "open");
    }

    #[test]
    fn new_items_default_open() {
        let item = data().into_item(Uuid::new_v4());
        assert_eq!(item.status, ItemStatus::Open);
    }

    #[test]
    fn blank_contact_rejected() {
        let mut d = data();
        d.contact_info = " ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn update_keeps_poster() {
        let poster = Uuid::new_v4();
        let stored = data().into_item(poster);

        let mut changed = data();
        changed.status = ItemStatus::Claimed;
        let updated = changed.apply_to(&stored);

        assert_eq!(updated.posted_by, poster);
        assert_eq!(updated.status, ItemStatus::Claimed);
    }
}
