use crate::models::envelope::ApiResponse;
use rocket::serde::json::Json;
use rocket::{Request, catch};

#[catch(400)]
pub fn bad_request(_: &Request) -> Json<ApiResponse<()>> {
    Json(ApiResponse::failure("Bad request"))
}

#[catch(401)]
pub fn unauthorized(_: &Request) -> Json<ApiResponse<()>> {
    Json(ApiResponse::failure("Not authenticated"))
}

#[catch(403)]
pub fn forbidden(_: &Request) -> Json<ApiResponse<()>> {
    Json(ApiResponse::failure("User does not exist or is not verified"))
}

#[catch(404)]
pub fn not_found(_: &Request) -> Json<ApiResponse<()>> {
    Json(ApiResponse::failure("Not found"))
}

#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> Json<ApiResponse<()>> {
    Json(ApiResponse::failure("Malformed request body"))
}

#[catch(500)]
pub fn internal_error(_: &Request) -> Json<ApiResponse<()>> {
    Json(ApiResponse::failure("Internal server error"))
}
