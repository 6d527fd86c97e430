//! Route handlers, one module per page group.

pub mod auth;
pub mod dashboards;
pub mod health;
pub mod index;

use axum::http::Uri;
use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::AppError;
use crate::flash;
use crate::middleware::auth::CurrentUser;

/// Render a full page, consuming any pending flash messages from `jar`.
///
/// The returned jar clears the flash cookie and must be part of the response.
pub(crate) fn render<T: Serialize>(
    ctx: &AppContext,
    jar: CookieJar,
    user: Option<&CurrentUser>,
    template: &str,
    title: &str,
    body: &T,
) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, flashes) = flash::take(jar);
    let html = ctx
        .templates
        .render_page(template, title, user, &flashes, body)?;
    Ok((jar, html))
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    gv_core::Error::not_found("page", uri.path()).into()
}
