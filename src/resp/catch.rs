use rocket::http::Status;
use rocket::Request;

use crate::resp::problem::{problems, Problem};

// Body parse failures surface from the Json data guard as 422; the API
// contract treats any malformed request shape as a 400 validation error.
#[catch(422)]
pub fn unprocessable(_req: &Request) -> Problem {
    problems::validation("Request body doesn't match the expected shape.")
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> Problem {
    problems::validation("Malformed request.")
}

#[catch(401)]
pub fn unauthorized(_req: &Request) -> Problem {
    problems::unauthorized("Missing or invalid credentials.")
}

#[catch(404)]
pub fn not_found(req: &Request) -> Problem {
    Problem::new_untyped(Status::NotFound, "Resource doesn't exist.")
        .insert_str("path", req.uri())
        .to_owned()
}

#[catch(500)]
pub fn internal(_req: &Request) -> Problem {
    Problem::new_untyped(Status::InternalServerError, "Something went wrong.")
}
