//! Authentication route handlers: register, login, logout.
//!
//! Expected failures (taken username, bad role, wrong password) are reported
//! to the browser as flash messages followed by a redirect. Only storage and
//! hashing failures surface as error pages.

use axum::extract::{Extension, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use gv_core::Role;
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::flash;
use crate::middleware::auth::{
    resolve_session, session_cookie, session_expiry, session_token, CurrentUser, SESSION_COOKIE,
};
use crate::templates::Blank;

pub const USERNAME_TAKEN: &str = "Username already exists";
pub const INVALID_ROLE: &str = "Invalid role";
pub const REGISTERED: &str = "Registration successful. Please login.";
pub const LOGGED_IN: &str = "Logged in successfully.";
pub const BAD_CREDENTIALS: &str = "Invalid username or password";
pub const LOGGED_OUT: &str = "You have been logged out.";

/// Registration form fields.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn flash_redirect(jar: CookieJar, message: &str, to: &str) -> Response {
    (flash::push(jar, message), Redirect::to(to)).into_response()
}

/// GET /register
pub async fn register_form(
    State(ctx): State<AppContext>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let user = resolve_session(&ctx, &jar)?;
    super::render(&ctx, jar, user.as_ref(), "register", "Register", &Blank {})
}

/// POST /register
pub async fn register(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let username = form.username.as_str();
    let conn = gv_db::pool::get_conn(&ctx.db)?;

    if gv_db::queries::users::username_exists(&conn, username)? {
        tracing::debug!(username, "Registration rejected: username taken");
        return Ok(flash_redirect(jar, USERNAME_TAKEN, "/register"));
    }

    let role: Role = match form.role.parse() {
        Ok(role) => role,
        Err(_) => {
            tracing::debug!(role = %form.role, "Registration rejected: invalid role");
            return Ok(flash_redirect(jar, INVALID_ROLE, "/register"));
        }
    };

    let hash = bcrypt::hash(&form.password, ctx.config.auth.bcrypt_cost)
        .map_err(|e| gv_core::Error::Internal(format!("bcrypt error: {e}")))?;

    match gv_db::queries::users::create_user(&conn, username, &hash, role) {
        Ok(user) => {
            tracing::info!(username = %user.username, role = %user.role, "User registered");
            Ok(flash_redirect(jar, REGISTERED, "/login"))
        }
        // Lost a race with a concurrent registration of the same name.
        Err(gv_core::Error::Conflict(_)) => Ok(flash_redirect(jar, USERNAME_TAKEN, "/register")),
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_form(
    State(ctx): State<AppContext>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let user = resolve_session(&ctx, &jar)?;
    super::render(&ctx, jar, user.as_ref(), "login", "Login", &Blank {})
}

/// POST /login
pub async fn login(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let conn = gv_db::pool::get_conn(&ctx.db)?;

    let user = gv_db::queries::users::get_user_by_username(&conn, &form.username)?;
    let Some(user) = user.filter(|u| bcrypt::verify(&form.password, &u.password_hash).unwrap_or(false))
    else {
        tracing::info!(username = %form.username, "Failed login attempt");
        return Ok(flash_redirect(jar, BAD_CREDENTIALS, "/login"));
    };

    let token = uuid::Uuid::new_v4().to_string();
    let expires_at = session_expiry(&ctx.config.auth);
    gv_db::queries::sessions::create_session(&conn, user.id, &token, &expires_at)?;

    tracing::info!(username = %user.username, role = %user.role, "User logged in");

    let jar = jar.add(session_cookie(&ctx.config.auth, token));
    Ok(flash_redirect(jar, LOGGED_IN, user.role.dashboard_path()))
}

/// GET /logout
///
/// Runs behind the session middleware, so a user is always present.
pub async fn logout(
    State(ctx): State<AppContext>,
    Extension(user): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(&jar) {
        let conn = gv_db::pool::get_conn(&ctx.db)?;
        gv_db::queries::sessions::delete_session(&conn, &token)?;
    }
    tracing::info!(username = %user.username, "User logged out");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok(flash_redirect(jar, LOGGED_OUT, "/"))
}
