use rocket::{Request, catch, serde::json::Json};
use shared::error::{Error, ErrorCode};

#[catch(403)]
pub fn forbidden(_req: &Request) -> Json<Error> {
    Json(Error::new(ErrorCode::Unauthorized, "Access forbidden."))
}

#[catch(401)]
pub fn unauthorized(_req: &Request) -> Json<Error> {
    Json(Error::new(ErrorCode::Unauthorized, "Login could not be verified."))
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<Error> {
    Json(Error::new(ErrorCode::InvalidInput, "Invalid request parameters."))
}

#[catch(422)]
pub fn unprocessable(_req: &Request) -> Json<Error> {
    Json(Error::new(ErrorCode::InvalidInput, "Malformed request body."))
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<Error> {
    Json(Error::new(ErrorCode::SystemError, "An internal server error occurred."))
}

#[catch(503)]
pub fn service_unavailable(_req: &Request) -> Json<Error> {
    Json(Error::new(ErrorCode::StorageUnavailable, "Storage is temporarily unavailable. Please try again."))
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<Error> {
    Json(Error::new(ErrorCode::NotFound, "The requested resource was not found."))
}
