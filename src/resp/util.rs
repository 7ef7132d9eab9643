/// Serde helper storing a [`chrono::DateTime`] as unix seconds, the claim
/// format `jsonwebtoken` validates `exp`/`iat` against.
pub mod date_time_as_unix_seconds {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(date.timestamp())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let seconds = i64::deserialize(d)?;
        Utc.timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| de::Error::custom("timestamp out of range"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, SubsecRound, Utc};

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Stamp {
        #[serde(with = "super::date_time_as_unix_seconds")]
        at: DateTime<Utc>,
    }

    #[test]
    fn round_trips_at_second_precision() {
        let at = Utc::now().round_subsecs(0);
        let json = serde_json::to_string(&Stamp { at }).unwrap();
        assert_eq!(json, format!("{{\"at\":{}}}", at.timestamp()));

        let back: Stamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back.at, at);
    }
}
