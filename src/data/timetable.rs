use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::store::Resource;

/// The timetable is a single mutable slot: one document under a fixed id,
/// replaced in place on every save.
pub const TIMETABLE_SLOT_ID: Uuid = Uuid::nil();

pub static DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

pub static DEFAULT_TIME_SLOTS: [&str; 7] = [
    "9:00-10:00",
    "10:00-11:00",
    "11:00-12:00",
    "12:00-1:00",
    "1:00-2:00",
    "2:00-3:00",
    "3:00-4:00",
];

pub static LUNCH_SLOT: &str = "12:00-1:00";

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TimetableCell {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub is_break: bool,
}

pub type Schedule = BTreeMap<String, BTreeMap<String, TimetableCell>>;

fn default_time_slots() -> Vec<String> {
    DEFAULT_TIME_SLOTS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Timetable {
    #[serde(rename = "_id", default = "slot_id")]
    pub id: Uuid,
    pub schedule: Schedule,
    /// Period labels, in display order.
    #[serde(default = "default_time_slots")]
    pub time_slots: Vec<String>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

fn slot_id() -> Uuid {
    TIMETABLE_SLOT_ID
}

impl Resource for Timetable {
    const COLLECTION: &'static str = "timetable";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Timetable {
    /// Empty weekly grid with the lunch period marked as a break, returned
    /// when nothing has been saved yet.
    pub fn default_grid() -> Timetable {
        let mut schedule = Schedule::new();

        for day in DAYS {
            let mut slots = BTreeMap::new();
            for slot in DEFAULT_TIME_SLOTS {
                let cell = TimetableCell {
                    subject: if slot == LUNCH_SLOT {
                        "LUNCH BREAK".to_string()
                    } else {
                        String::new()
                    },
                    is_break: slot == LUNCH_SLOT,
                    ..Default::default()
                };
                slots.insert(slot.to_string(), cell);
            }
            schedule.insert(day.to_string(), slots);
        }

        let now = Utc::now();
        Timetable {
            id: TIMETABLE_SLOT_ID,
            schedule,
            time_slots: default_time_slots(),
            created_by: None,
            created: now,
            updated: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TimetableData {
    pub schedule: Schedule,
    #[serde(default)]
    pub time_slots: Option<Vec<String>>,
}

impl TimetableData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.schedule.is_empty() {
            return Err(problems::validation("Schedule must not be empty."));
        }

        for day in self.schedule.keys() {
            if !DAYS.contains(&day.as_str()) {
                return Err(problems::validation(format!(
                    "'{}' is not a weekday the timetable covers.",
                    day
                )));
            }
        }

        if let Some(slots) = &self.time_slots {
            if slots.is_empty() {
                return Err(problems::validation("Custom time slot list is empty."));
            }
        }

        Ok(())
    }

    pub fn into_timetable(self, created_by: Uuid) -> Timetable {
        let now = Utc::now();
        Timetable {
            id: TIMETABLE_SLOT_ID,
            schedule: self.schedule,
            time_slots: self.time_slots.unwrap_or_else(default_time_slots),
            created_by: Some(created_by),
            created: now,
            updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_covers_the_week() {
        let grid = Timetable::default_grid();
        assert_eq!(grid.schedule.len(), 5);
        assert_eq!(grid.time_slots.len(), 7);

        for day in DAYS {
            let slots = &grid.schedule[day];
            assert_eq!(slots.len(), 7);
            assert!(slots[LUNCH_SLOT].is_break);
            assert_eq!(slots[LUNCH_SLOT].subject, "LUNCH BREAK");
            assert!(!slots["9:00-10:00"].is_break);
        }
    }

    #[test]
    fn unknown_day_rejected() {
        let mut schedule = Schedule::new();
        schedule.insert("Caturday".to_string(), BTreeMap::new());

        let data = TimetableData {
            schedule,
            time_slots: None,
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn saved_timetable_lands_in_the_fixed_slot() {
        let mut schedule = Schedule::new();
        schedule.insert("Monday".to_string(), BTreeMap::new());

        let timetable = TimetableData {
            schedule,
            time_slots: Some(vec!["8:00-9:00".to_string()]),
        }
        .into_timetable(Uuid::new_v4());

        assert_eq!(timetable.id, TIMETABLE_SLOT_ID);
        assert_eq!(timetable.time_slots, vec!["8:00-9:00".to_string()]);
    }
}
