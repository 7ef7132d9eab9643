use bson::doc;
use mongodb::Database;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::resp::problem::{problems, Problem};
use crate::role::{AccountStatus, Role};
use crate::store::Store;
use crate::SECURITY;

use super::{PasswordHash, User};

pub mod problem {
    use crate::resp::problem::Problem;
    use rocket::http::Status;

    #[inline]
    pub fn bad_email(email: impl ToString, detail: impl ToString) -> Problem {
        Problem::new_untyped(Status::BadRequest, "Bad email.")
            .insert_str("email", email)
            .detail(detail)
            .to_owned()
    }

    #[inline]
    pub fn bad_password(detail: impl ToString) -> Problem {
        Problem::new_untyped(Status::BadRequest, "Bad password.")
            .detail(detail)
            .to_owned()
    }

    #[inline]
    pub fn account_not_approved(status: impl ToString) -> Problem {
        Problem::new_untyped(Status::Forbidden, "Account is not approved.")
            .insert_str("status", status)
            .to_owned()
    }
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct UserSignupData {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl std::fmt::Debug for UserSignupData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserSignupData:{}", self.email)
    }
}

impl UserSignupData {
    pub fn validate(&self) -> Result<(), Problem> {
        if !self.email.contains('@') {
            return Err(problem::bad_email(
                self.email.to_string(),
                "Not a valid e-mail address.",
            ));
        }

        if self.name.trim().is_empty() {
            return Err(problems::validation("Name must not be empty."));
        }

        if self.password.len() < 8 {
            return Err(problem::bad_password(
                "Password must be at least 8 characters (bytes) long.",
            ));
        }

        if self.password.len() > 1024 {
            return Err(problem::bad_password(
                "Passwords longer than 1024 characters aren't supported.",
            ));
        }

        Ok(())
    }
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct UserLoginData {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for UserLoginData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserLoginData:{}", self.email)
    }
}

impl UserLoginData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.email.is_empty() || self.password.is_empty() || self.password.len() > 1024 {
            return Err(problems::bad_login());
        }

        Ok(())
    }
}

pub trait UserDbExt {
    async fn create_user(
        &self,
        signup: UserSignupData,
        admin_emails: impl AsRef<[String]> + Send,
    ) -> Result<User, Problem>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, Problem>;

    async fn find_user_by_email(&self, email: impl AsRef<str> + Send)
        -> Result<Option<User>, Problem>;

    async fn list_users(&self, status: Option<AccountStatus>) -> Result<Vec<User>, Problem>;

    async fn set_user_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<Option<User>, Problem>;

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, Problem>;
}

impl UserDbExt for Database {
    async fn create_user(
        &self,
        signup: UserSignupData,
        admin_emails: impl AsRef<[String]> + Send,
    ) -> Result<User, Problem> {
        let email = signup.email.trim().to_lowercase();

        if self.find_user_by_email(&email).await?.is_some() {
            return Err(problem::bad_email(email, "Email already registered."));
        }

        let mut role = signup.role.unwrap_or_default();
        if admin_emails.as_ref().contains(&email) {
            role = Role::Admin;
        }

        // Admins are usable immediately; everyone else waits for approval.
        let status = if role.is_admin() {
            AccountStatus::Approved
        } else {
            AccountStatus::Pending
        };

        let pw_hash = PasswordHash::new(&signup.password, &SECURITY.salt);
        let user = User::new(signup.name.trim(), email, pw_hash, role, status);

        Store::<User>::open(self).create(&user).await?;

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, Problem> {
        Store::<User>::open(self).get(id).await
    }

    async fn find_user_by_email(
        &self,
        email: impl AsRef<str> + Send,
    ) -> Result<Option<User>, Problem> {
        Store::<User>::open(self)
            .find_one(doc! { "email": email.as_ref() })
            .await
    }

    async fn list_users(&self, status: Option<AccountStatus>) -> Result<Vec<User>, Problem> {
        let filter = status.map(|s| doc! { "status": s.to_string() });
        Store::<User>::open(self)
            .list_sorted(filter, doc! { "created": -1 })
            .await
    }

    async fn set_user_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<Option<User>, Problem> {
        Store::<User>::open(self)
            .update(id, doc! { "status": status.to_string() })
            .await
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, Problem> {
        Store::<User>::open(self).delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str) -> UserSignupData {
        UserSignupData {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }

    #[test]
    fn signup_requires_plausible_email() {
        assert!(signup("not-an-email", "long enough pw").validate().is_err());
        assert!(signup("ok@example.com", "long enough pw").validate().is_ok());
    }

    #[test]
    fn signup_enforces_password_bounds() {
        assert!(signup("ok@example.com", "short").validate().is_err());
        assert!(signup("ok@example.com", &"x".repeat(1025)).validate().is_err());
    }

    #[test]
    fn debug_doesnt_leak_password() {
        let data = signup("ok@example.com", "super secret password");
        let debug = format!("{:?}", data);
        assert!(!debug.contains("super secret password"));
    }
}
