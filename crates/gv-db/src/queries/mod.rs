//! Database query modules.

pub mod attendance;
pub mod marks;
pub mod sessions;
pub mod users;
