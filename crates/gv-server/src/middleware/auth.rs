//! Session middleware.
//!
//! Resolves the `gradeview_session` cookie to a [`CurrentUser`] and injects
//! it into request extensions for downstream guards and handlers. Requests
//! without a live session are sent to the login page with a flash message.

use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, SecondsFormat, Utc};
use gv_core::config::AuthConfig;
use gv_core::{Role, UserId};
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::flash;
use crate::middleware::request_id::RequestId;

/// Cookie name for browser sessions.
pub const SESSION_COOKIE: &str = "gradeview_session";

/// Upper bound on session lifetime (ten years).
const MAX_SESSION_HOURS: u64 = 24 * 365 * 10;

/// The logged-in user behind a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

/// Current time in the format used by `sessions.expires_at`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn session_hours(auth: &AuthConfig) -> i64 {
    auth.session_timeout_hours.min(MAX_SESSION_HOURS) as i64
}

/// Expiry timestamp for a session created now.
pub fn session_expiry(auth: &AuthConfig) -> String {
    (Utc::now() + Duration::hours(session_hours(auth))).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build the session cookie carrying `token`.
pub fn session_cookie(auth: &AuthConfig, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(auth.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(session_hours(auth)))
        .build()
}

/// Session token presented by the browser, if any.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Look up the user behind the session cookie in `jar`.
///
/// Returns `Ok(None)` for a missing, unknown, or expired session, and also
/// when the session's user no longer exists.
pub fn resolve_session(ctx: &AppContext, jar: &CookieJar) -> gv_core::Result<Option<CurrentUser>> {
    let Some(token) = session_token(jar) else {
        return Ok(None);
    };

    let conn = gv_db::pool::get_conn(&ctx.db)?;
    let Some(session) = gv_db::queries::sessions::get_session(&conn, &token, &now_timestamp())?
    else {
        return Ok(None);
    };

    let user = gv_db::queries::users::get_user_by_id(&conn, session.user_id)?;
    Ok(user.map(|u| CurrentUser {
        id: u.id,
        username: u.username,
        role: u.role,
    }))
}

/// Session middleware. Applied to every login-protected route.
///
/// On success, inserts the resolved [`CurrentUser`] into request extensions.
pub async fn session_middleware(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match resolve_session(&ctx, &jar) {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => {
            tracing::debug!(path = %request.uri().path(), "No live session; redirecting to login");
            let jar = if session_token(&jar).is_some() {
                jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
            } else {
                jar
            };
            (flash::push(jar, flash::LOGIN_REQUIRED), Redirect::to("/login")).into_response()
        }
        Err(e) => {
            let mut err = AppError::from(e);
            if let Some(id) = request.extensions().get::<RequestId>() {
                err = err.with_request_id(id.0.clone());
            }
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gv_core::config::Config;

    fn ctx() -> AppContext {
        let db = gv_db::pool::init_memory_pool().unwrap();
        AppContext::new(Config::default(), db).unwrap()
    }

    #[test]
    fn no_cookie_resolves_to_none() {
        let ctx = ctx();
        assert!(resolve_session(&ctx, &CookieJar::new()).unwrap().is_none());
    }

    #[test]
    fn live_session_resolves_user() {
        let ctx = ctx();
        let conn = gv_db::pool::get_conn(&ctx.db).unwrap();
        let user =
            gv_db::queries::users::create_user(&conn, "ada", "h", Role::Professor).unwrap();
        gv_db::queries::sessions::create_session(&conn, user.id, "tok", "2099-01-01T00:00:00Z")
            .unwrap();

        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "tok"));
        let current = resolve_session(&ctx, &jar).unwrap().unwrap();
        assert_eq!(current.username, "ada");
        assert_eq!(current.role, Role::Professor);
    }

    #[test]
    fn expired_session_resolves_to_none() {
        let ctx = ctx();
        let conn = gv_db::pool::get_conn(&ctx.db).unwrap();
        let user = gv_db::queries::users::create_user(&conn, "old", "h", Role::Student).unwrap();
        gv_db::queries::sessions::create_session(&conn, user.id, "stale", "2001-01-01T00:00:00Z")
            .unwrap();

        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "stale"));
        assert!(resolve_session(&ctx, &jar).unwrap().is_none());
    }

    #[test]
    fn cookie_attributes() {
        let auth = AuthConfig {
            secure_cookies: true,
            ..AuthConfig::default()
        };
        let c = session_cookie(&auth, "abc".into());
        assert_eq!(c.value(), "abc");
        assert_eq!(c.http_only(), Some(true));
        assert_eq!(c.secure(), Some(true));
        assert_eq!(c.same_site(), Some(SameSite::Lax));
        assert_eq!(c.max_age(), Some(time::Duration::hours(24)));
    }

    #[test]
    fn expiry_is_in_the_future() {
        let expiry = session_expiry(&AuthConfig::default());
        assert!(expiry > now_timestamp());
        assert!(expiry.ends_with('Z'));
    }
}
