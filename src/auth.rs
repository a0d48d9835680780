use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// The authenticated, verified user behind the current request.
///
/// Sessions are provisioned by the external identity service; this guard
/// only resolves the private `user` cookie (`session_id:user_id`) against
/// the session table and rejects requests from unknown, expired, or
/// unverified users.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

pub(crate) fn parse_session_cookie_value(value: &str) -> Option<(Uuid, Uuid)> {
    let (session_id_str, user_id_str) = value.split_once(':')?;
    let session_id = Uuid::parse_str(session_id_str).ok()?;
    let user_id = Uuid::parse_str(user_id_str).ok()?;
    Some((session_id, user_id))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let cookies = req.cookies();
        if let Some(cookie) = cookies.get_private("user")
            && let Some((session_id, user_id)) = parse_session_cookie_value(cookie.value())
        {
            let pool = match req.rocket().state::<PgPool>() {
                Some(pool) => pool,
                None => return Outcome::Error((Status::InternalServerError, AppError::Unauthorized)),
            };

            let repo = PostgresRepository { pool: pool.clone() };

            match repo.get_active_session_user(&session_id, &user_id).await {
                Ok(Some(user)) if user.is_verified => {
                    let current_user = CurrentUser {
                        id: user.id,
                        email: user.email,
                    };
                    req.local_cache(|| Some(current_user.clone()));
                    return Outcome::Success(current_user);
                }
                Ok(Some(_)) => return Outcome::Error((Status::Forbidden, AppError::UnverifiedUser)),
                Ok(None) => {
                    let _ = repo.delete_session_if_expired(&session_id).await;
                    return Outcome::Error((Status::Unauthorized, AppError::Unauthorized));
                }
                Err(err) => return Outcome::Error((Status::InternalServerError, err)),
            }
        }

        Outcome::Error((Status::Unauthorized, AppError::Unauthorized))
    }
}
