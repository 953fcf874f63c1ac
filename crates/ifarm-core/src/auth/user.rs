//! User profile model.

use serde::{Deserialize, Serialize};

use super::role::{Role, can_access_admin};

/// Profile of the authenticated account, as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub user_type: i32,
}

impl UserInfo {
    /// The role derived from this profile's user-type code.
    pub fn role(&self) -> Role {
        Role::from_user_type(self.user_type)
    }

    /// Whether this account may use the admin surface.
    pub fn can_access_admin(&self) -> bool {
        can_access_admin(self.user_type)
    }

    /// Display name: nickname, falling back to username, then a placeholder.
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ if !self.username.is_empty() => &self.username,
            _ => "未知用户",
        }
    }

    /// Avatar URL, empty string when unset.
    pub fn avatar_url(&self) -> &str {
        self.avatar.as_deref().unwrap_or("")
    }

    /// Shallow-merges a partial profile update into this one.
    ///
    /// Only fields present in `patch` overwrite; `None` fields are kept.
    pub fn merge(&mut self, patch: UserInfoPatch) {
        if let Some(nickname) = patch.nickname {
            self.nickname = Some(nickname);
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
    }
}

/// Partial profile update accepted by `PUT /auth/profile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
