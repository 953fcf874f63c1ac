//! Session controller.
//!
//! Owns the in-memory session record (token pair plus user profile),
//! mirrors every change into the credential store, and exposes the
//! login/refresh/logout/profile operations. The HTTP core reads the access
//! token from here and invokes [`Session::refresh`] on 401.
//!
//! Callers must tolerate the session becoming anonymous at any await
//! point: a failed refresh triggered by an unrelated call clears it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use ifarm_core::auth::{
    Role, UserInfo, UserInfoPatch, can_access_admin, is_expiring_soon, is_token_valid,
};
use ifarm_core::credential::CredentialStore;
use ifarm_core::{IfarmError, Result};

use crate::api::auth::{self, AuthPayload, LoginRequest, RefreshRequest};
use crate::envelope::Envelope;
use crate::notify::Notifier;
use crate::request::RequestDescriptor;
use crate::transport::Transport;

#[derive(Default)]
struct SessionData {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user_info: Option<UserInfo>,
}

/// The authenticated identity for the current client.
///
/// Created empty and hydrated from the credential store; populated by
/// login or refresh; cleared by logout or a failed refresh.
pub struct Session {
    data: RwLock<SessionData>,
    loading: AtomicBool,
    store: Arc<dyn CredentialStore>,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
}

impl Session {
    /// Creates a session hydrated from the credential store.
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let data = SessionData {
            access_token: store.access_token(),
            refresh_token: store.refresh_token(),
            user_info: store.user_info(),
        };
        Self {
            data: RwLock::new(data),
            loading: AtomicBool::new(false),
            store,
            transport,
            notifier,
        }
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    /// The held access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.data.read().await.access_token.clone()
    }

    /// A copy of the held user profile, if any.
    pub async fn user_info(&self) -> Option<UserInfo> {
        self.data.read().await.user_info.clone()
    }

    /// True iff a token and profile are held and the token is within expiry.
    pub async fn is_logged_in(&self) -> bool {
        let data = self.data.read().await;
        match (&data.access_token, &data.user_info) {
            (Some(token), Some(_)) => is_token_valid(token),
            _ => false,
        }
    }

    /// Role derived from the held profile.
    pub async fn role(&self) -> Option<Role> {
        self.data.read().await.user_info.as_ref().map(UserInfo::role)
    }

    /// Whether the held profile may use the admin surface.
    pub async fn can_access(&self) -> bool {
        self.data
            .read()
            .await
            .user_info
            .as_ref()
            .is_some_and(UserInfo::can_access_admin)
    }

    /// Display name of the held profile, placeholder when anonymous.
    pub async fn user_name(&self) -> String {
        self.data
            .read()
            .await
            .user_info
            .as_ref()
            .map_or_else(|| "未知用户".to_string(), |u| u.display_name().to_string())
    }

    /// Avatar URL of the held profile, empty when unset.
    pub async fn user_avatar(&self) -> String {
        self.data
            .read()
            .await
            .user_info
            .as_ref()
            .map_or_else(String::new, |u| u.avatar_url().to_string())
    }

    /// Whether a login or profile update is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// The persisted remember-login flag.
    pub fn remember_login(&self) -> bool {
        self.store.remember_login()
    }

    pub fn set_remember_login(&self, remember: bool) {
        self.store.set_remember_login(remember);
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Logs in. Returns `true` on success.
    ///
    /// Accounts without admin-surface access are rejected locally and
    /// nothing is persisted. Failures surface a notice and resolve `false`
    /// rather than propagating.
    pub async fn login(&self, request: LoginRequest) -> bool {
        self.loading.store(true, Ordering::SeqCst);
        let outcome = self.call::<AuthPayload>(auth::login(&request)).await;
        let result = match outcome {
            Ok(payload) => {
                if !can_access_admin(payload.user_info.user_type) {
                    self.notifier.error("您没有权限访问后台管理系统");
                    false
                } else {
                    self.set_auth_data(payload).await;
                    self.notifier.success("登录成功");
                    true
                }
            }
            Err(err) => {
                warn!(%err, "login failed");
                self.notifier
                    .error(&format!("登录失败：{}", err.user_message()));
                false
            }
        };
        self.loading.store(false, Ordering::SeqCst);
        result
    }

    /// Exchanges the refresh token for a new session triple.
    ///
    /// Fails fast without a refresh token. Any failure clears the session
    /// (memory and store) before propagating: callers must treat an error
    /// as "session is gone".
    pub async fn refresh(&self) -> Result<()> {
        let refresh_token = self.data.read().await.refresh_token.clone();
        let Some(refresh_token) = refresh_token else {
            self.clear_auth_data().await;
            return Err(IfarmError::permission("没有刷新Token"));
        };

        match self
            .call::<AuthPayload>(auth::refresh(&RefreshRequest { refresh_token }))
            .await
        {
            Ok(payload) => {
                self.set_auth_data(payload).await;
                Ok(())
            }
            Err(err) => {
                warn!(%err, "token refresh failed");
                self.clear_auth_data().await;
                Err(err)
            }
        }
    }

    /// Logs out: best-effort server call, then unconditionally clears.
    pub async fn logout(&self) {
        if self.access_token().await.is_some() {
            if let Err(err) = self.call::<Value>(auth::logout()).await {
                warn!(%err, "logout endpoint failed, clearing session anyway");
            }
        }
        self.clear_auth_data().await;
        self.notifier.success("已退出登录");
    }

    /// Re-fetches the profile into memory and store. Returns `true` on success.
    pub async fn fetch_profile(&self) -> bool {
        match self.call::<UserInfo>(auth::profile()).await {
            Ok(user) => {
                self.replace_user_info(user).await;
                true
            }
            Err(err) => {
                warn!(%err, "failed to fetch user profile");
                false
            }
        }
    }

    /// Applies a partial profile update. Returns `true` on success.
    pub async fn update_profile(&self, patch: UserInfoPatch) -> bool {
        self.loading.store(true, Ordering::SeqCst);
        let result = match self.call::<UserInfo>(auth::update_profile(&patch)).await {
            Ok(updated) => {
                self.replace_user_info(updated).await;
                self.notifier.success("用户信息更新成功");
                true
            }
            Err(err) => {
                warn!(%err, "failed to update user profile");
                self.notifier
                    .error(&format!("更新用户信息失败：{}", err.user_message()));
                false
            }
        };
        self.loading.store(false, Ordering::SeqCst);
        result
    }

    /// Proactive counterpart of the 401-triggered refresh: refreshes when
    /// the held token expires within the five-minute lookahead window.
    pub async fn check_expiry(&self) -> Result<()> {
        let token = self.access_token().await;
        match token {
            Some(token) if is_expiring_soon(&token) => {
                debug!("access token expiring soon, refreshing proactively");
                self.refresh().await
            }
            _ => Ok(()),
        }
    }

    /// Replaces the session triple in memory and store.
    pub async fn set_auth_data(&self, payload: AuthPayload) {
        {
            let mut data = self.data.write().await;
            data.access_token = Some(payload.access_token.clone());
            data.refresh_token = Some(payload.refresh_token.clone());
            data.user_info = Some(payload.user_info.clone());
        }
        self.store.set_access_token(&payload.access_token);
        self.store.set_refresh_token(&payload.refresh_token);
        self.store.set_user_info(&payload.user_info);
    }

    /// Clears the session triple from memory and store.
    pub async fn clear_auth_data(&self) {
        {
            let mut data = self.data.write().await;
            *data = SessionData::default();
        }
        self.store.clear_all();
    }

    async fn replace_user_info(&self, user: UserInfo) {
        self.data.write().await.user_info = Some(user.clone());
        self.store.set_user_info(&user);
    }

    /// Issues an auth-surface call through the bare transport.
    ///
    /// Replay-on-401 lives in the HTTP core only; routing auth calls below
    /// it keeps the refresh path free of recursion.
    async fn call<T: DeserializeOwned>(&self, mut descriptor: RequestDescriptor) -> Result<T> {
        descriptor.bearer = self.access_token().await;
        let raw = self.transport.send(&descriptor).await.map_err(IfarmError::from)?;

        let Some(envelope) = raw.body.as_ref().and_then(Envelope::parse) else {
            return Err(IfarmError::internal(format!(
                "auth endpoint returned a non-envelope body (HTTP {})",
                raw.status
            )));
        };

        if raw.is_success() && envelope.is_success() {
            envelope.take_data()
        } else if raw.status == 401 || raw.status == 403 || envelope.code == 401 {
            Err(IfarmError::permission(
                envelope.message_or("登录已过期，请重新登录").to_string(),
            ))
        } else {
            Err(IfarmError::business(
                envelope.code,
                envelope.message_or("请求失败").to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use ifarm_infrastructure::MemoryCredentialStore;

    use crate::testing::{MockTransport, RecordingNotifier, envelope, make_token, ok_envelope};

    fn user_json(user_type: i32) -> Value {
        json!({"id": 1, "username": "farmer1", "nickname": "老王", "avatar": null, "userType": user_type})
    }

    fn auth_payload_json(user_type: i32, access: &str) -> Value {
        json!({
            "accessToken": access,
            "refreshToken": make_token(9000),
            "userInfo": user_json(user_type),
        })
    }

    struct Fixture {
        transport: Arc<MockTransport>,
        store: Arc<MemoryCredentialStore>,
        notifier: Arc<RecordingNotifier>,
        session: Session,
    }

    fn fixture(store: Arc<MemoryCredentialStore>) -> Fixture {
        let transport = Arc::new(MockTransport::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let session = Session::new(transport.clone(), store.clone(), notifier.clone());
        Fixture {
            transport,
            store,
            notifier,
            session,
        }
    }

    fn seeded_store(access: &str, user_type: i32) -> Arc<MemoryCredentialStore> {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set_access_token(access);
        store.set_refresh_token(&make_token(3600));
        let user: UserInfo = serde_json::from_value(user_json(user_type)).unwrap();
        store.set_user_info(&user);
        store
    }

    fn login_request() -> LoginRequest {
        LoginRequest {
            username: "farmer1".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_persists_and_notifies() {
        let fx = fixture(Arc::new(MemoryCredentialStore::new()));
        let access = make_token(3600);
        fx.transport
            .push_response(ok_envelope(auth_payload_json(2, &access)));

        assert!(fx.session.login(login_request()).await);
        assert!(fx.session.is_logged_in().await);
        assert_eq!(fx.session.role().await, Some(Role::Farmer));
        assert_eq!(fx.store.access_token().as_deref(), Some(access.as_str()));
        assert_eq!(fx.notifier.successes(), vec!["登录成功"]);
        assert!(!fx.session.is_loading());
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let fx = fixture(Arc::new(MemoryCredentialStore::new()));
        fx.transport
            .push_response(envelope(200, 500, "用户名或密码错误"));

        assert!(!fx.session.login(login_request()).await);
        assert_eq!(fx.notifier.errors(), vec!["登录失败：用户名或密码错误"]);
        assert!(fx.store.access_token().is_none());
    }

    #[tokio::test]
    async fn test_login_rejection_notice_carries_bare_server_message() {
        let fx = fixture(Arc::new(MemoryCredentialStore::new()));
        fx.transport
            .push_response(envelope(401, 401, "用户名或密码错误"));

        assert!(!fx.session.login(login_request()).await);
        // No Display prefix leaks into the user-facing notice.
        assert_eq!(fx.notifier.errors(), vec!["登录失败：用户名或密码错误"]);
    }

    #[tokio::test]
    async fn test_login_rejects_account_without_admin_access() {
        let fx = fixture(Arc::new(MemoryCredentialStore::new()));
        fx.transport
            .push_response(ok_envelope(auth_payload_json(1, &make_token(3600))));

        assert!(!fx.session.login(login_request()).await);
        assert_eq!(fx.notifier.errors(), vec!["您没有权限访问后台管理系统"]);
        // Nothing persisted, in memory or on disk.
        assert!(!fx.session.is_logged_in().await);
        assert!(fx.store.access_token().is_none());
        assert!(fx.store.user_info().is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_token_pair() {
        let fx = fixture(seeded_store(&make_token(60), 3));
        let new_access = make_token(7200);
        fx.transport
            .push_response(ok_envelope(auth_payload_json(3, &new_access)));

        fx.session.refresh().await.unwrap();
        assert_eq!(
            fx.session.access_token().await.as_deref(),
            Some(new_access.as_str())
        );
        assert_eq!(fx.store.access_token().as_deref(), Some(new_access.as_str()));
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_clears_session() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set_access_token(&make_token(60));
        let fx = fixture(store);

        let err = fx.session.refresh().await.unwrap_err();
        assert!(err.is_permission());
        assert!(fx.session.access_token().await.is_none());
        assert!(fx.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_session() {
        let fx = fixture(seeded_store(&make_token(60), 3));
        fx.transport
            .push_response(envelope(401, 401, "refresh token expired"));

        assert!(fx.session.refresh().await.is_err());
        assert!(fx.session.access_token().await.is_none());
        assert!(fx.store.access_token().is_none());
        assert!(fx.store.user_info().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_call_fails() {
        let fx = fixture(seeded_store(&make_token(3600), 3));
        fx.transport.push_error(
            crate::transport::TransportError::Connect("connection refused".to_string()),
        );

        fx.session.logout().await;
        assert!(!fx.session.is_logged_in().await);
        assert!(fx.store.access_token().is_none());
        assert_eq!(fx.notifier.successes(), vec!["已退出登录"]);
    }

    #[tokio::test]
    async fn test_check_expiry_skips_fresh_token() {
        let fx = fixture(seeded_store(&make_token(3600), 3));

        fx.session.check_expiry().await.unwrap();
        assert!(fx.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_check_expiry_refreshes_expiring_token() {
        let fx = fixture(seeded_store(&make_token(60), 3));
        let new_access = make_token(7200);
        fx.transport
            .push_response(ok_envelope(auth_payload_json(3, &new_access)));

        fx.session.check_expiry().await.unwrap();
        assert_eq!(fx.transport.request_paths(), vec!["/auth/refresh"]);
        assert_eq!(
            fx.session.access_token().await.as_deref(),
            Some(new_access.as_str())
        );
    }

    #[tokio::test]
    async fn test_expired_token_is_not_logged_in() {
        let fx = fixture(seeded_store(&make_token(-60), 3));
        assert!(!fx.session.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_update_profile_merges_and_notifies() {
        let fx = fixture(seeded_store(&make_token(3600), 3));
        fx.transport.push_response(ok_envelope(
            json!({"id": 1, "username": "farmer1", "nickname": "新昵称", "avatar": null, "userType": 3}),
        ));

        let patch = UserInfoPatch {
            nickname: Some("新昵称".to_string()),
            avatar: None,
        };
        assert!(fx.session.update_profile(patch).await);
        assert_eq!(fx.session.user_name().await, "新昵称");
        assert_eq!(
            fx.store.user_info().unwrap().nickname.as_deref(),
            Some("新昵称")
        );
        assert_eq!(fx.notifier.successes(), vec!["用户信息更新成功"]);
    }
}
