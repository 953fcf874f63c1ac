//! Authentication domain module.
//!
//! - `role`: user-type codes, role mapping, admin-surface gating
//! - `token`: structural/expiry validity checks for access tokens
//! - `user`: the user profile model and partial-update patch

mod role;
mod token;
mod user;

pub use role::{
    Role, USER_TYPE_ADMIN, USER_TYPE_FARMER, USER_TYPE_USER, can_access_admin, has_role, is_admin,
    is_farmer,
};
pub use token::{
    EXPIRY_LOOKAHEAD_SECS, is_expiring_soon, is_expiring_soon_at, is_token_valid,
    is_token_valid_at, token_expiry,
};
pub use user::{UserInfo, UserInfoPatch};
