//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`gv_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and bubble failures with `?`. The body
//! is a minimal standalone HTML page built without the template registry,
//! so template failures can be reported too.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use handlebars::html_escape;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: gv_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: gv_core::Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.inner.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<gv_core::Error> for AppError {
    fn from(e: gv_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log.
        let detail = if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                request_id = self.request_id.as_deref().unwrap_or("-"),
                "Server error in page handler"
            );
            "Something went wrong on our end.".to_string()
        } else {
            self.inner.to_string()
        };

        let reason = status.canonical_reason().unwrap_or("Error");
        let body = format!(
            "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>gradeview | {reason}</title></head>\n\
             <body>\n<h1>{reason}</h1>\n<p>(Error {code})</p>\n<p>{detail}</p>\n<p><a href=\"/\">Home</a></p>\n</body>\n</html>",
            code = status.as_u16(),
            detail = html_escape(&detail),
        );

        (status, Html(body)).into_response()
    }
}
