use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::AuthError;

/// Administrative roles that can appear in a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    MvaaAdmin,
    LasdriAdmin,
    DvisAdmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::MvaaAdmin, Role::LasdriAdmin, Role::DvisAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::MvaaAdmin => "mvaa_admin",
            Role::LasdriAdmin => "lasdri_admin",
            Role::DvisAdmin => "dvis_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    /// Case-insensitive: `MVAA_ADMIN` and `mvaa_admin` are the same role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AuthError::UnknownRole(s.to_string()))
    }
}

/// The authenticated caller, as handed to delegates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}
