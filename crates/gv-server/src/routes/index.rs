//! Landing page.

use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::auth::resolve_session;
use crate::templates::Blank;

/// GET /
///
/// Public. Shows the logged-in user in the navigation when there is one.
pub async fn index(
    State(ctx): State<AppContext>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let user = resolve_session(&ctx, &jar)?;
    super::render(&ctx, jar, user.as_ref(), "index", "Home", &Blank {})
}
