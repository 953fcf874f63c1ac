//! Durable credential storage interface.
//!
//! The session hydrates from this store at startup and writes back on every
//! change. All operations are synchronous and best-effort: an implementation
//! must never panic or propagate a storage failure, it logs and degrades to
//! a no-op (writes) or the default (reads).

use crate::auth::UserInfo;

/// Storage key for the access token.
pub const KEY_ACCESS_TOKEN: &str = "ifarm_access_token";
/// Storage key for the refresh token.
pub const KEY_REFRESH_TOKEN: &str = "ifarm_refresh_token";
/// Storage key for the serialized user profile.
pub const KEY_USER_INFO: &str = "ifarm_user_info";
/// Storage key for the remember-login flag.
pub const KEY_REMEMBER_LOGIN: &str = "ifarm_remember_login";

/// An abstract store for the four persisted credential entries.
pub trait CredentialStore: Send + Sync {
    fn set_access_token(&self, token: &str);
    fn access_token(&self) -> Option<String>;
    fn remove_access_token(&self);

    fn set_refresh_token(&self, token: &str);
    fn refresh_token(&self) -> Option<String>;
    fn remove_refresh_token(&self);

    fn set_user_info(&self, user: &UserInfo);
    fn user_info(&self) -> Option<UserInfo>;
    fn remove_user_info(&self);

    fn set_remember_login(&self, remember: bool);
    /// The remember-login flag, `false` when unset or unreadable.
    fn remember_login(&self) -> bool;

    /// Removes all four entries.
    fn clear_all(&self) {
        self.remove_access_token();
        self.remove_refresh_token();
        self.remove_user_info();
        self.set_remember_login(false);
    }
}
