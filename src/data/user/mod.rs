use chrono::{DateTime, Utc};
use crypto::bcrypt::bcrypt;
use serde::{de, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

pub mod db;

use crate::role::{AccountStatus, Role};
use crate::security::Salt;
use crate::store::Resource;

/// bcrypt over a SHA-256 prehash of the password, with a deployment-wide
/// salt. The prehash keeps arbitrarily long passwords under bcrypt's 72-byte
/// input limit.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct PasswordHash([u8; 24]);

impl PasswordHash {
    pub fn new(password: impl AsRef<str>, salt: &Salt) -> PasswordHash {
        let mut pw_hash: [u8; 24] = [0; 24];

        let mut sha = Sha256::new();
        Digest::update(&mut sha, password.as_ref().as_bytes());

        bcrypt(10, salt, sha.finalize().as_slice(), &mut pw_hash);

        PasswordHash(pw_hash)
    }

    pub fn matches(&self, password: impl AsRef<str>, salt: &Salt) -> bool {
        *self == PasswordHash::new(password, salt)
    }
}

// Stored and transported as a hex string.
impl serde::Serialize for PasswordHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut hex = String::with_capacity(48);
        for byte in self.0 {
            hex.push_str(&format!("{:02x}", byte));
        }
        serializer.serialize_str(&hex)
    }
}

impl<'de> serde::Deserialize<'de> for PasswordHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        if hex.len() != 48 {
            return Err(de::Error::custom("password hash must be 24 bytes"));
        }

        let mut bytes = [0u8; 24];
        for (i, chunk) in bytes.iter_mut().enumerate() {
            *chunk = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| de::Error::custom("password hash isn't valid hex"))?;
        }

        Ok(PasswordHash(bytes))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub pw_hash: PasswordHash,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl ToString,
        email: impl ToString,
        pw_hash: PasswordHash,
        role: Role,
        status: AccountStatus,
    ) -> User {
        let id = Uuid::new_v4();
        tracing::info!("Creating a new user with UUID: {}", id);

        let now = Utc::now();
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            pw_hash,
            role,
            status,
            created: now,
            updated: now,
        }
    }
}

impl Resource for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// User document without the password hash, the only shape routed back to
/// clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SALT: Salt = [7u8; 16];

    #[test]
    fn same_password_same_hash() {
        let a = PasswordHash::new("correct horse battery", &SALT);
        let b = PasswordHash::new("correct horse battery", &SALT);
        assert_eq!(a, b);
        assert!(a.matches("correct horse battery", &SALT));
    }

    #[test]
    fn different_password_different_hash() {
        let a = PasswordHash::new("correct horse battery", &SALT);
        assert!(!a.matches("incorrect horse battery", &SALT));
    }

    #[test]
    fn hash_serde_round_trip() {
        let hash = PasswordHash::new("s3cr3t-enough", &SALT);
        let json = serde_json::to_string(&hash).unwrap();
        let back: PasswordHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, back);
    }

    #[test]
    fn response_omits_password_hash() {
        let user = User::new(
            "Ada",
            "ada@example.com",
            PasswordHash::new("pw-pw-pw-pw", &SALT),
            Role::Student,
            AccountStatus::Pending,
        );

        let value = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert!(value.get("pw_hash").is_none());
        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["status"], "pending");
    }
}
