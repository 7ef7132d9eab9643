use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{self, FromRequest, Request};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::util::date_time_as_unix_seconds;
use crate::data::user::User;
use crate::resp::problem::{problems, Problem};
use crate::role::Role;
use crate::SECURITY;
use rocket::outcome::Outcome::{Error, Success};

/// Claims carried by every issued credential: the authenticated user and
/// their role, valid for 24 hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoleToken {
    #[serde(with = "date_time_as_unix_seconds")]
    iat: DateTime<Utc>,
    #[serde(with = "date_time_as_unix_seconds")]
    exp: DateTime<Utc>,
    pub user: Uuid,
    pub role: Role,
}

impl UserRoleToken {
    pub fn new(user: &User) -> UserRoleToken {
        Self::with_role(user.id, user.role)
    }

    pub fn with_role(user: Uuid, role: Role) -> UserRoleToken {
        let now = Utc::now();
        UserRoleToken {
            iat: now,
            exp: now + Duration::hours(24),
            user,
            role,
        }
    }

    pub fn encode_jwt(
        &self,
        secret: impl AsRef<[u8]>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(secret.as_ref());

        encode(&header, &self, &key)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Role gate; `Forbidden` when the resolved role doesn't match.
    pub fn require_admin(&self) -> Result<(), Problem> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(problems::forbidden("Admin only."))
        }
    }

    /// Ownership gate; admins pass unconditionally.
    pub fn require_owner_or_admin(&self, owner: Uuid) -> Result<(), Problem> {
        if self.is_admin() || self.user == owner {
            Ok(())
        } else {
            Err(problems::forbidden("Not the owner of this resource."))
        }
    }
}

pub fn auth_problem(detail: impl ToString) -> Problem {
    problems::unauthorized(detail)
}

pub fn extract_claims(
    auth_header: Option<&str>,
    secret: impl AsRef<[u8]>,
) -> Result<UserRoleToken, Problem> {
    let header = auth_header.ok_or_else(|| auth_problem("No Authorization header."))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| auth_problem("Authorization header is not a bearer token."))?;

    let claims = decode::<UserRoleToken>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(Problem::from)?;

    tracing::debug!("decoded user role token for user: {}", claims.user);

    Ok(claims)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for UserRoleToken {
    type Error = Problem;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        tracing::trace!("extracting user role token from request headers");

        let header = req.headers().get_one("Authorization");
        match extract_claims(header, &SECURITY.jwt_secret) {
            Ok(claims) => Success(claims),
            Err(e) => {
                tracing::debug!("unable to extract claims from Authorization header");
                Error((Status::Unauthorized, e))
            }
        }
    }
}

pub mod doc {
    use utoipa::openapi::security::*;

    #[derive(Clone, Copy)]
    pub struct JWTAuth;

    impl From<JWTAuth> for SecurityScheme {
        fn from(_: JWTAuth) -> SecurityScheme {
            let mut http = Http::new(HttpAuthScheme::Bearer);
            http.bearer_format = Some("JWT".to_string());
            SecurityScheme::Http(http)
        }
    }

    impl utoipa::Modify for JWTAuth {
        fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
            let c = openapi.components.as_mut().unwrap();
            c.add_security_scheme("jwt", *self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_SECRET: &[u8] = b"unit-test-signing-secret";

    #[test]
    fn jwt_round_trip_preserves_claims() {
        let user = Uuid::new_v4();
        let urt = UserRoleToken::with_role(user, Role::Professor);

        let token = urt
            .encode_jwt(TEST_SECRET)
            .expect("encoding should work for a valid secret");

        let decoded = extract_claims(Some(&format!("Bearer {}", token)), TEST_SECRET)
            .expect("decoding a fresh token should work");

        assert_eq!(decoded.user, user);
        assert_eq!(decoded.role, Role::Professor);
        assert_eq!(decoded.iat.timestamp(), urt.iat.timestamp());
        assert_eq!(decoded.exp - decoded.iat, Duration::hours(24));
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let problem = extract_claims(None, TEST_SECRET).unwrap_err();
        assert_eq!(problem.status, Status::Unauthorized);
    }

    #[test]
    fn non_bearer_header_is_unauthorized() {
        let problem = extract_claims(Some("Basic dXNlcg=="), TEST_SECRET).unwrap_err();
        assert_eq!(problem.status, Status::Unauthorized);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let urt = UserRoleToken::with_role(Uuid::new_v4(), Role::Student);
        let token = urt.encode_jwt(TEST_SECRET).unwrap();

        let problem =
            extract_claims(Some(&format!("Bearer {}", token)), b"other-secret").unwrap_err();
        assert_eq!(problem.status, Status::Unauthorized);
    }

    #[test]
    fn role_gates() {
        let admin = UserRoleToken::with_role(Uuid::new_v4(), Role::Admin);
        let student = UserRoleToken::with_role(Uuid::new_v4(), Role::Student);

        assert!(admin.require_admin().is_ok());
        let problem = student.require_admin().unwrap_err();
        assert_eq!(problem.status, Status::Forbidden);

        let owned = student.user;
        assert!(student.require_owner_or_admin(owned).is_ok());
        assert!(admin.require_owner_or_admin(Uuid::new_v4()).is_ok());
        assert!(student.require_owner_or_admin(Uuid::new_v4()).is_err());
    }
}
