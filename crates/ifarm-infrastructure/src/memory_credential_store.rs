//! In-memory credential store.
//!
//! Used in tests and by embedders that do not want credentials on disk.

use std::sync::Mutex;

use ifarm_core::auth::UserInfo;
use ifarm_core::credential::CredentialStore;

#[derive(Default)]
struct Entries {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user_info: Option<UserInfo>,
    remember_login: bool,
}

/// Credential store that keeps everything in process memory.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<Entries>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<R>(&self, f: impl FnOnce(&mut Entries) -> R) -> R {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut entries)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set_access_token(&self, token: &str) {
        self.with_entries(|e| e.access_token = Some(token.to_string()));
    }

    fn access_token(&self) -> Option<String> {
        self.with_entries(|e| e.access_token.clone())
    }

    fn remove_access_token(&self) {
        self.with_entries(|e| e.access_token = None);
    }

    fn set_refresh_token(&self, token: &str) {
        self.with_entries(|e| e.refresh_token = Some(token.to_string()));
    }

    fn refresh_token(&self) -> Option<String> {
        self.with_entries(|e| e.refresh_token.clone())
    }

    fn remove_refresh_token(&self) {
        self.with_entries(|e| e.refresh_token = None);
    }

    fn set_user_info(&self, user: &UserInfo) {
        self.with_entries(|e| e.user_info = Some(user.clone()));
    }

    fn user_info(&self) -> Option<UserInfo> {
        self.with_entries(|e| e.user_info.clone())
    }

    fn remove_user_info(&self) {
        self.with_entries(|e| e.user_info = None);
    }

    fn set_remember_login(&self, remember: bool) {
        self.with_entries(|e| e.remember_login = remember);
    }

    fn remember_login(&self) -> bool {
        self.with_entries(|e| e.remember_login)
    }
}
