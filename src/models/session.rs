use rocket::serde::Serialize;
use uuid::Uuid;

/// The user resolved from an active session row. Sessions and users are
/// provisioned by the external identity service; this crate only reads
/// them to authenticate requests.
#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub is_verified: bool,
}
