use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
    Canteen,
    Bus,
    Admin,
}

impl Role {
    /// Indicates whether user with role may manage other accounts and
    /// perform administrative writes.
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl std::default::Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Professor => write!(f, "professor"),
            Role::Canteen => write!(f, "canteen"),
            Role::Bus => write!(f, "bus"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
}

impl AccountStatus {
    /// Admin decisions on access requests are restricted to these values.
    pub fn is_decision(self) -> bool {
        matches!(self, AccountStatus::Approved | AccountStatus::Rejected)
    }
}

impl std::default::Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Pending
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AccountStatus::Pending),
            "approved" => Ok(AccountStatus::Approved),
            "rejected" => Ok(AccountStatus::Rejected),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Pending => write!(f, "pending"),
            AccountStatus::Approved => write!(f, "approved"),
            AccountStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");

        let parsed: Role = serde_json::from_str("\"professor\"").unwrap();
        assert_eq!(parsed, Role::Professor);
    }

    #[test]
    fn only_admin_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Student.is_admin());
        assert!(!Role::Canteen.is_admin());
        assert!(!Role::Bus.is_admin());
        assert!(!Role::Professor.is_admin());
    }

    #[test]
    fn pending_is_not_a_decision() {
        assert!(!AccountStatus::Pending.is_decision());
        assert!(AccountStatus::Approved.is_decision());
        assert!(AccountStatus::Rejected.is_decision());
    }
}
