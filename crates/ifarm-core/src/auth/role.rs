//! User types and role mapping.
//!
//! The server identifies accounts by a numeric user-type code; routes and
//! the admin surface are gated by the derived [`Role`].

use serde::{Deserialize, Serialize};
use strum::Display;

/// Numeric user-type code: ordinary platform user.
pub const USER_TYPE_USER: i32 = 1;
/// Numeric user-type code: farm owner.
pub const USER_TYPE_FARMER: i32 = 2;
/// Numeric user-type code: platform administrator.
pub const USER_TYPE_ADMIN: i32 = 3;

/// Role derived from the account's user-type code, used for route permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Farmer,
    Admin,
}

impl Role {
    /// Maps a user-type code to a role. Unknown codes default to `User`.
    pub fn from_user_type(user_type: i32) -> Self {
        match user_type {
            USER_TYPE_FARMER => Role::Farmer,
            USER_TYPE_ADMIN => Role::Admin,
            _ => Role::User,
        }
    }

    /// Human-readable description of the underlying user type.
    pub fn description(&self) -> &'static str {
        match self {
            Role::User => "普通用户",
            Role::Farmer => "农场主",
            Role::Admin => "管理员",
        }
    }

    /// The landing page a freshly authenticated account of this role is sent to.
    pub fn default_redirect_path(&self) -> &'static str {
        match self {
            Role::Admin | Role::Farmer => "/dashboard",
            Role::User => "/403",
        }
    }
}

/// Whether an account of this user type may use the admin surface at all.
///
/// Only farm owners and administrators qualify; everything else (including
/// unknown codes) is refused.
pub fn can_access_admin(user_type: i32) -> bool {
    user_type == USER_TYPE_FARMER || user_type == USER_TYPE_ADMIN
}

/// Whether the user type maps to the administrator role.
pub fn is_admin(user_type: i32) -> bool {
    user_type == USER_TYPE_ADMIN
}

/// Whether the user type maps to the farm-owner role.
pub fn is_farmer(user_type: i32) -> bool {
    user_type == USER_TYPE_FARMER
}

/// Checks a role against an allowed-role list. An empty list denies.
pub fn has_role(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}
