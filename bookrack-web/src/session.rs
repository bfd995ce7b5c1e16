/// Session gate and current-user context
///
/// Sessions are server-side, keyed by an opaque cookie identifier and
/// persisted by the tower-sessions store; the only datum stored is the
/// authenticated user's id under [`SESSION_USER_KEY`]. The session is an
/// injected capability (an extractor), not process-wide state.
///
/// [`require_login`] is the sole authorization gate: every protected route
/// is nested under it. Anonymous requests short-circuit to a redirect to
/// `/login`; authenticated requests get a [`CurrentUser`] inserted into
/// request extensions. The gate re-loads the user row per request, so a
/// session can never resolve to a nonexistent user — a dangling session is
/// cleared on sight.

use crate::{app::AppState, error::AppError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use bookrack_shared::models::user::User;
use tower_sessions::Session;
use uuid::Uuid;

/// Session key under which the authenticated user's id is stored
pub const SESSION_USER_KEY: &str = "user_id";

/// The authenticated identity for the current request
///
/// Inserted into request extensions by [`require_login`]; handlers extract
/// it with `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// Associates the session with a user id, discarding any prior association
///
/// The session id is cycled on sign-in so a pre-authentication cookie can
/// never be promoted to an authenticated one (session fixation).
///
/// # Errors
///
/// Returns an error if the session store fails
pub async fn sign_in(session: &Session, user_id: Uuid) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user_id).await?;
    Ok(())
}

/// Clears the session's identity association
///
/// # Errors
///
/// Returns an error if the session store fails
pub async fn sign_out(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}

/// Reads the user id associated with the session, if any
///
/// # Errors
///
/// Returns an error if the session store fails
pub async fn current_user_id(session: &Session) -> Result<Option<Uuid>, AppError> {
    Ok(session.get::<Uuid>(SESSION_USER_KEY).await?)
}

/// Authorization middleware for protected routes
///
/// - No session identity: redirect to `/login`
/// - Identity referencing a missing user: clear the session, redirect
/// - Otherwise: inject [`CurrentUser`] and run the handler
pub async fn require_login(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Response {
    let user_id = match current_user_id(&session).await {
        Ok(Some(id)) => id,
        Ok(None) => return Redirect::to("/login").into_response(),
        Err(e) => return e.into_response(),
    };

    match User::find_by_id(&state.db, user_id).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(CurrentUser {
                id: user.id,
                username: user.username,
            });
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!(%user_id, "Session referenced a nonexistent user; clearing");
            if let Err(e) = sign_out(&session).await {
                return e.into_response();
            }
            Redirect::to("/login").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}
