use std::io::Cursor;

use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::{response, Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use utoipa::ToSchema;

/// Implements [RFC7807](https://tools.ietf.org/html/rfc7807).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    #[serde(skip, default = "default_status")]
    pub status: Status,
    pub type_uri: String,
    pub title: String,

    pub detail: Option<String>,

    #[schema(value_type = Object)]
    pub body: Map<String, Value>,
}

fn default_status() -> Status {
    Status::InternalServerError
}

impl Default for Problem {
    fn default() -> Self {
        Problem {
            status: Status::InternalServerError,
            type_uri: "about:blank".to_string(),
            title: "Problem".to_string(),
            detail: None,
            body: Map::new(),
        }
    }
}

impl Problem {
    pub fn new_untyped(status: Status, title: impl ToString) -> Problem {
        Problem {
            status,
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn detail(&mut self, value: impl ToString) -> &mut Problem {
        self.detail = Some(value.to_string());
        self
    }

    pub fn insert<V: Serialize>(&mut self, key: impl ToString, value: V) -> &mut Problem {
        self.body.insert(
            key.to_string(),
            serde_json::to_value(value).expect("data must be JSON serializable"),
        );
        self
    }

    pub fn insert_str(&mut self, key: impl ToString, value: impl ToString) -> &mut Problem {
        self.body
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.title)
    }
}

impl std::error::Error for Problem {}

impl<'r> Responder<'r, 'static> for Problem {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let mut body = self.body.clone();

        // Following are required by rfc7807
        body.insert(String::from("type"), serde_json::Value::from(self.type_uri));
        body.insert(String::from("title"), serde_json::Value::from(self.title));

        // Optional parameters as specified by rfc7807
        if let Some(detail) = self.detail {
            body.insert(String::from("detail"), serde_json::Value::from(detail));
        }
        body.insert(
            String::from("status"),
            serde_json::Value::from(self.status.code),
        );

        let body_string = serde_json::to_string(&body)
            .expect("JSON map keys and values must be JSON serializable");

        Response::build()
            .status(self.status)
            .header(ContentType::new("application", "problem+json"))
            .raw_header("Content-Language", "en")
            .sized_body(body_string.len(), Cursor::new(body_string))
            .ok()
    }
}

/// Constructors for the error taxonomy every router maps into: validation
/// failures are 400, missing documents 404, missing/invalid credentials 401,
/// role or ownership mismatches 403.
pub mod problems {
    use crate::resp::problem::Problem;
    use rocket::http::Status;
    use uuid::Uuid;

    #[inline]
    pub fn validation(detail: impl ToString) -> Problem {
        Problem::new_untyped(Status::BadRequest, "Request validation failed.")
            .detail(detail)
            .to_owned()
    }

    #[inline]
    pub fn duplicate(detail: impl ToString) -> Problem {
        Problem::new_untyped(Status::BadRequest, "Duplicate value.")
            .detail(detail)
            .to_owned()
    }

    #[inline]
    pub fn not_found(what: impl ToString, id: Uuid) -> Problem {
        Problem::new_untyped(Status::NotFound, format!("{} doesn't exist.", what.to_string()))
            .insert_str("id", id)
            .to_owned()
    }

    #[inline]
    pub fn unauthorized(detail: impl ToString) -> Problem {
        Problem::new_untyped(Status::Unauthorized, "Unable to authorize user.")
            .detail(detail)
            .to_owned()
    }

    #[inline]
    pub fn forbidden(detail: impl ToString) -> Problem {
        Problem::new_untyped(Status::Forbidden, "Access denied.")
            .detail(detail)
            .to_owned()
    }

    #[inline]
    pub fn bad_login() -> Problem {
        Problem::new_untyped(Status::BadRequest, "Invalid credentials.")
    }
}

fn duplicate_key_code(e: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        _ => false,
    }
}

impl From<mongodb::error::Error> for Problem {
    fn from(e: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        if duplicate_key_code(&e) {
            return problems::duplicate("A document with the same unique value already exists.");
        }

        fn mongodb_problem() -> Problem {
            Problem::new_untyped(
                Status::InternalServerError,
                "MongoDB failed while processing request.",
            )
        }

        fn access_problem() -> Problem {
            Problem::new_untyped(
                Status::InternalServerError,
                "Server was unable to access MongoDB.",
            )
        }

        match e.kind.as_ref() {
            ErrorKind::Authentication { .. } => access_problem(),
            ErrorKind::DnsResolve { .. } => access_problem(),
            ErrorKind::ServerSelection { .. } => access_problem(),
            ErrorKind::Io(_) => mongodb_problem()
                .detail("An IO error occurred. Submitted data might not be properly stored.")
                .clone(),
            ErrorKind::Write(_) => mongodb_problem()
                .detail("A write error occurred. Submitted data might not be properly stored.")
                .clone(),
            _ => mongodb_problem(),
        }
    }
}

impl From<bson::de::Error> for Problem {
    fn from(_: bson::de::Error) -> Self {
        Problem::new_untyped(
            Status::InternalServerError,
            "An error occurred while processing BSON data.",
        )
    }
}

impl From<serde_json::Error> for Problem {
    fn from(_: serde_json::Error) -> Self {
        Problem::new_untyped(
            Status::InternalServerError,
            "An error occurred while processing JSON data.",
        )
    }
}

impl From<jsonwebtoken::errors::Error> for Problem {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.into_kind() {
            ErrorKind::ExpiredSignature => {
                Problem::new_untyped(Status::Unauthorized, "Expired JWT signature.")
            }
            _ => Problem::new_untyped(Status::Unauthorized, "Error while handling JWT."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_statuses() {
        assert_eq!(problems::validation("x").status, Status::BadRequest);
        assert_eq!(problems::duplicate("x").status, Status::BadRequest);
        assert_eq!(
            problems::not_found("Course", uuid::Uuid::new_v4()).status,
            Status::NotFound
        );
        assert_eq!(problems::unauthorized("x").status, Status::Unauthorized);
        assert_eq!(problems::forbidden("x").status, Status::Forbidden);
        assert_eq!(problems::bad_login().status, Status::BadRequest);
    }

    #[test]
    fn expired_jwt_maps_to_unauthorized() {
        let err = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        let problem = Problem::from(err);
        assert_eq!(problem.status, Status::Unauthorized);
    }
}
