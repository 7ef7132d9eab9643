use mongodb::Database;
use rocket::serde::json::Json;
use rocket::State;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::data::user::db::{problem as user_problem, UserDbExt, UserLoginData, UserSignupData};
use crate::data::user::UserResponse;
use crate::resp::jwt::UserRoleToken;
use crate::resp::problem::{problems, Problem};
use crate::role::AccountStatus;
use crate::SECURITY;

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub msg: String,
    pub status: AccountStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Register an account
#[utoipa::path(
    request_body = UserSignupData,
    responses(
        (status = 200, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid signup data or email already registered", body = Problem),
    )
)]
#[post("/auth/signup", format = "application/json", data = "<signup>")]
#[tracing::instrument(skip(db))]
pub async fn signup(
    signup: Json<UserSignupData>,
    db: &State<Database>,
    c: &State<Config>,
) -> Result<Json<SignupResponse>, Problem> {
    signup.validate()?;

    let user = db.create_user(signup.into_inner(), &c.admin_emails).await?;

    let msg = match user.status {
        AccountStatus::Approved => "Account registered successfully. You can now login.",
        _ => "Access request submitted successfully. Please wait for admin approval to login.",
    };

    Ok(Json(SignupResponse {
        msg: msg.to_string(),
        status: user.status,
    }))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    request_body = UserLoginData,
    responses(
        (status = 200, description = "Token and user info", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = Problem),
        (status = 403, description = "Account pending or rejected", body = Problem),
    )
)]
#[post("/auth/login", format = "application/json", data = "<login>")]
#[tracing::instrument(skip(db))]
pub async fn login(
    login: Json<UserLoginData>,
    db: &State<Database>,
) -> Result<Json<LoginResponse>, Problem> {
    login.validate()?;

    let email = login.email.trim().to_lowercase();
    let user = db
        .find_user_by_email(&email)
        .await?
        .ok_or_else(problems::bad_login)?;

    // Approval is checked before the password so a pending account always
    // sees the same response, right or wrong password.
    match user.status {
        AccountStatus::Approved => {}
        other => return Err(user_problem::account_not_approved(other)),
    }

    if !user.pw_hash.matches(&login.password, &SECURITY.salt) {
        return Err(problems::bad_login());
    }

    let token = UserRoleToken::new(&user).encode_jwt(&SECURITY.jwt_secret)?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// Current user info
#[utoipa::path(
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/auth/me")]
#[tracing::instrument(skip(db))]
pub async fn me(auth: UserRoleToken, db: &State<Database>) -> Result<Json<UserResponse>, Problem> {
    let user = db
        .get_user(auth.user)
        .await?
        .ok_or_else(|| problems::not_found("User", auth.user))?;

    Ok(Json(UserResponse::from(&user)))
}

/// List access requests, optionally narrowed by status
#[utoipa::path(
    responses(
        (status = 200, description = "Users, newest first", body = Vec<UserResponse>),
        (status = 403, description = "Caller is not an admin", body = Problem),
    ),
    security(("jwt" = []))
)]
#[get("/auth/access-requests?<status>")]
#[tracing::instrument(skip(db))]
pub async fn access_requests(
    status: Option<&str>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<Vec<UserResponse>>, Problem> {
    auth.require_admin()?;

    let status = match status {
        None => None,
        Some(s) => Some(
            s.parse::<AccountStatus>()
                .map_err(|_| problems::validation("Unknown account status."))?,
        ),
    };

    let users = db.list_users(status).await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AccessDecision {
    pub status: AccountStatus,
}

/// Approve or reject an access request
#[utoipa::path(
    request_body = AccessDecision,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Status is not a decision, or target is an admin", body = Problem),
        (status = 404, description = "No such user", body = Problem),
    ),
    security(("jwt" = []))
)]
#[put(
    "/auth/access-requests/<id>",
    format = "application/json",
    data = "<decision>"
)]
#[tracing::instrument(skip(db))]
pub async fn decide_access_request(
    id: Uuid,
    decision: Json<AccessDecision>,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<UserResponse>, Problem> {
    auth.require_admin()?;

    if !decision.status.is_decision() {
        return Err(problems::validation(
            "Status must be \"approved\" or \"rejected\".",
        ));
    }

    let user = db
        .get_user(id)
        .await?
        .ok_or_else(|| problems::not_found("User", id))?;

    if user.role.is_admin() {
        return Err(problems::validation("Cannot modify admin user status."));
    }

    let updated = db
        .set_user_status(id, decision.status)
        .await?
        .ok_or_else(|| problems::not_found("User", id))?;

    Ok(Json(UserResponse::from(&updated)))
}

/// Delete an account
#[utoipa::path(
    responses(
        (status = 200, description = "Id of the removed user", body = String),
        (status = 403, description = "Caller is neither the user nor an admin", body = Problem),
        (status = 404, description = "No such user", body = Problem),
    ),
    security(("jwt" = []))
)]
#[delete("/auth/users/<id>")]
#[tracing::instrument(skip(db))]
pub async fn delete_user(
    id: Uuid,
    auth: UserRoleToken,
    db: &State<Database>,
) -> Result<Json<String>, Problem> {
    auth.require_owner_or_admin(id)?;

    let removed = UserDbExt::delete_user(db.inner(), id)
        .await?
        .ok_or_else(|| problems::not_found("User", id))?;

    Ok(Json(removed.id.to_string()))
}
