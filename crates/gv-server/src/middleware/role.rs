//! Role guard.
//!
//! Each role-restricted route group is wrapped in [`require_role`] with the
//! role it admits as middleware state. The decision itself is the plain
//! predicate [`authorize`]; a denied request gets an `Access denied.` flash
//! and a redirect home, and the protected handler never runs.

use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use gv_core::{Error, Result, Role};

use crate::flash;
use crate::middleware::auth::CurrentUser;

/// Whether `user` may access a page reserved for `required`.
pub fn authorize(user: &CurrentUser, required: Role) -> Result<()> {
    if user.role == required {
        Ok(())
    } else {
        Err(Error::Forbidden(format!(
            "{} '{}' cannot access {} pages",
            user.role, user.username, required
        )))
    }
}

/// Middleware admitting only users holding the role given as state.
///
/// Must run inside [`session_middleware`](crate::middleware::auth::session_middleware).
pub async fn require_role(
    State(required): State<Role>,
    jar: CookieJar,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<CurrentUser>() else {
        return (flash::push(jar, flash::LOGIN_REQUIRED), Redirect::to("/login")).into_response();
    };

    match authorize(user, required) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::info!(path = %request.uri().path(), "{e}");
            (flash::push(jar, flash::ACCESS_DENIED), Redirect::to("/")).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gv_core::UserId;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(),
            username: "u".into(),
            role,
        }
    }

    #[test]
    fn matching_role_is_allowed() {
        assert!(authorize(&user(Role::Student), Role::Student).is_ok());
        assert!(authorize(&user(Role::Professor), Role::Professor).is_ok());
    }

    #[test]
    fn other_role_is_forbidden() {
        let err = authorize(&user(Role::Student), Role::Professor).unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        assert!(authorize(&user(Role::Professor), Role::Student).is_err());
    }
}
