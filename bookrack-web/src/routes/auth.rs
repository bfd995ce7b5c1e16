/// Authentication routes
///
/// - `GET /register`, `POST /register` - create an account
/// - `GET /login`, `POST /login` - start a session
/// - `GET /logout` - end the session
///
/// Registration hashes the password with Argon2id and inserts a single user
/// row; the case-insensitive unique index on usernames is the authoritative
/// duplicate guard, with a pre-check only to produce a friendlier message.
/// Login distinguishes an unknown username (404) from a wrong password
/// (401). A successful registration signs the user in immediately, as the
/// original application did.

use crate::{
    app::AppState,
    error::{AppError, AppResult},
    routes::first_validation_message,
    session,
    views,
};
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use bookrack_shared::{
    auth::password,
    models::user::{CreateUser, User},
};
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

/// Registration form payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "must provide username"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "must provide password"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "must confirm password"))]
    pub confirmation: String,
}

/// Login form payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "must provide username"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "must provide password"))]
    pub password: String,
}

/// Renders the registration form
pub async fn register_page() -> Html<String> {
    views::register_page()
}

/// Registers a new user
///
/// # Errors
///
/// - `Validation`: a field is empty or the passwords do not match
/// - `Conflict`: the username is already taken (case-insensitive)
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> AppResult<Redirect> {
    form.validate()
        .map_err(|e| AppError::Validation(first_validation_message(&e)))?;

    if form.password != form.confirmation {
        return Err(AppError::Validation("passwords do not match".to_string()));
    }

    // Fast path for a friendly message; the unique index is the real guard
    if User::find_by_username(&state.db, &form.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("username already exists".to_string()));
    }

    let password_hash = password::hash_password(&form.password)?;

    // A losing race against a concurrent registration surfaces here as a
    // constraint violation and maps to Conflict
    let user = User::create(
        &state.db,
        CreateUser {
            username: form.username,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "Registered new user");

    session::sign_in(&session, user.id).await?;

    Ok(Redirect::to("/"))
}

/// Renders the login form, forgetting any current identity first
pub async fn login_page(session: Session) -> AppResult<Html<String>> {
    session::sign_out(&session).await?;
    Ok(views::login_page())
}

/// Logs a user in
///
/// # Errors
///
/// - `Validation`: a field is empty
/// - `NotFound`: the username does not exist
/// - `Auth`: the password is wrong
///
/// Unknown-username and wrong-password are distinct outcomes by design.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Redirect> {
    // Forget any prior identity before attempting a new one
    session::sign_out(&session).await?;

    form.validate()
        .map_err(|e| AppError::Validation(first_validation_message(&e)))?;

    let user = User::find_by_username(&state.db, &form.username)
        .await?
        .ok_or_else(|| AppError::NotFound("username does not exist".to_string()))?;

    let valid = password::verify_password(&form.password, &user.password_hash)?;
    if !valid {
        return Err(AppError::Auth("invalid password".to_string()));
    }

    session::sign_in(&session, user.id).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Redirect::to("/"))
}

/// Logs the user out and returns to the login screen
pub async fn logout(session: Session) -> AppResult<Redirect> {
    session::sign_out(&session).await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form_rejects_empty_fields() {
        let form = RegisterForm {
            username: String::new(),
            password: "pw".to_string(),
            confirmation: "pw".to_string(),
        };
        assert!(form.validate().is_err());

        let form = RegisterForm {
            username: "alice".to_string(),
            password: String::new(),
            confirmation: String::new(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_register_form_accepts_complete_input() {
        let form = RegisterForm {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            confirmation: "pw1".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_login_form_rejects_empty_password() {
        let form = LoginForm {
            username: "alice".to_string(),
            password: String::new(),
        };
        assert!(form.validate().is_err());
    }
}
