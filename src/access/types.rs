use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::access::errors::AccessError;

/// Stable role identifier. Roles are always compared through this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(pub i32);

impl FromStr for RoleId {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(RoleId)
            .map_err(|_| AccessError::MalformedRoleIdentifier(s.to_string()))
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    /// Display only
    pub title: String,
    pub superuser: bool,
    pub anonymous: bool,
}

impl Role {
    pub fn new(id: i32, title: &str) -> Self {
        Self {
            id: RoleId(id),
            title: title.to_string(),
            superuser: false,
            anonymous: false,
        }
    }

    pub fn superuser(mut self) -> Self {
        self.superuser = true;
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// "Can `role` read this page", as stored on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEntry {
    pub role: Role,
    pub can_read: bool,
}

impl AccessEntry {
    pub fn new(role: Role, can_read: bool) -> Self {
        Self { role, can_read }
    }

    pub fn role_id(&self) -> RoleId {
        self.role.id
    }
}

/// An authenticated actor and the roles it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub roles: Vec<Role>,
}

impl User {
    pub fn new(id: i32, username: &str, roles: Vec<Role>) -> Self {
        Self {
            id,
            username: username.to_string(),
            roles,
        }
    }
}

/// Actions a caller may ask about. Only reading is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
}

impl FromStr for Action {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Action::Read),
            other => Err(AccessError::UnsupportedAction(other.to_string())),
        }
    }
}
