//! HTTP middleware: request ID, session resolution, and role guards.

pub mod auth;
pub mod request_id;
pub mod role;
