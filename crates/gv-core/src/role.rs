//! The closed set of user roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Role tag stored on every user. Gates which dashboard a user may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
}

impl Role {
    /// The value stored in the `users.role` column and posted by forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Professor => "professor",
        }
    }

    /// Path of the dashboard a user with this role lands on after login.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Student => "/dashboard_student",
            Role::Professor => "/dashboard_professor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "professor" => Ok(Role::Professor),
            other => Err(Error::Validation(format!("unknown role '{other}'"))),
        }
    }
}
