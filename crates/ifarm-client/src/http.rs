//! HTTP client core.
//!
//! Single choke point for every domain call: attaches the bearer token,
//! unwraps the response envelope, classifies failures, surfaces a notice
//! for every branch, and performs the single-shot refresh-and-replay on
//! 401. Callers always receive an explicit `Err` after the notice; nothing
//! is swallowed here.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use ifarm_core::{IfarmError, Result};

use crate::envelope::Envelope;
use crate::notify::{Navigator, Notifier, Redirect};
use crate::request::RequestDescriptor;
use crate::session::Session;
use crate::transport::{RawResponse, Transport};

/// The configured request pipeline shared by every domain state container.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            session,
            notifier,
            navigator,
        }
    }

    /// The session this client reads its bearer token from.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The notifier used for every surfaced failure.
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Issues a call and deserializes the envelope's data slot.
    ///
    /// On HTTP 401 with an expired-credential envelope, refreshes the
    /// session and re-issues the captured descriptor exactly once; the
    /// caller observes the replay's outcome as if no failure occurred.
    pub async fn request<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let mut descriptor = descriptor;
        let mut replayed = false;

        loop {
            descriptor.bearer = self.session.access_token().await;

            let raw = match self.transport.send(&descriptor).await {
                Ok(raw) => raw,
                Err(transport_err) => {
                    self.notifier.error(transport_err.user_message());
                    return Err(transport_err.into());
                }
            };

            debug!(
                method = descriptor.method.as_str(),
                path = %descriptor.path,
                status = raw.status,
                elapsed_ms = descriptor.elapsed_ms() as u64,
                replayed,
                "api response"
            );

            if raw.is_success() {
                return self.unwrap_success(&descriptor, raw);
            }

            if raw.status == 401 && !replayed && envelope_code(&raw) == Some(401) {
                match self.session.refresh().await {
                    Ok(()) => {
                        debug!(path = %descriptor.path, "token refreshed, replaying request");
                        replayed = true;
                        continue;
                    }
                    Err(refresh_err) => {
                        // refresh() has already cleared the session.
                        warn!(%refresh_err, "token refresh failed, session cleared");
                        self.navigator.redirect(Redirect::Login { redirect: None });
                        self.notifier.error("登录已过期，请重新登录");
                        return Err(IfarmError::permission("登录已过期，请重新登录"));
                    }
                }
            }

            return self.classify_failure(raw);
        }
    }

    fn unwrap_success<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        raw: RawResponse,
    ) -> Result<T> {
        let Some(envelope) = raw.body.as_ref().and_then(Envelope::parse) else {
            self.notifier.error("请求失败");
            return Err(IfarmError::internal(format!(
                "{} returned a non-envelope body",
                descriptor.path
            )));
        };

        if envelope.is_success() {
            return envelope.take_data();
        }

        // Transport succeeded but the envelope signals a business failure.
        let message = envelope.message_or("请求失败").to_string();
        warn!(code = envelope.code, %message, path = %descriptor.path, "business error");
        self.notifier.error(&message);
        Err(IfarmError::business(envelope.code, message))
    }

    fn classify_failure<T>(&self, raw: RawResponse) -> Result<T> {
        let envelope = raw.body.as_ref().and_then(Envelope::parse);
        let envelope_message = |fallback: &str| -> String {
            envelope
                .as_ref()
                .map_or(fallback, |e| e.message_or(fallback))
                .to_string()
        };

        match raw.status {
            401 => {
                // Either the envelope does not signal an expired credential
                // or the single replay attempt already happened.
                self.notifier.error("登录已过期，请重新登录");
                Err(IfarmError::permission("登录已过期，请重新登录"))
            }
            403 => {
                self.notifier.error("权限不足");
                self.navigator.redirect(Redirect::Forbidden);
                Err(IfarmError::permission("权限不足"))
            }
            400 => {
                let message = envelope_message("请求参数错误");
                self.notifier.error(&message);
                Err(IfarmError::validation(message))
            }
            500 => {
                let message = envelope_message("服务器内部错误");
                self.notifier.error(&message);
                Err(IfarmError::server(message))
            }
            other => {
                let message = envelope_message("网络错误");
                self.notifier.error(&message);
                Err(IfarmError::internal(format!("HTTP {other}: {message}")))
            }
        }
    }
}

fn envelope_code(raw: &RawResponse) -> Option<i64> {
    raw.body
        .as_ref()
        .and_then(Envelope::parse)
        .map(|envelope| envelope.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    use ifarm_core::auth::UserInfo;
    use ifarm_core::credential::CredentialStore;
    use ifarm_infrastructure::MemoryCredentialStore;

    use crate::testing::{
        MockTransport, RecordingNavigator, RecordingNotifier, envelope, make_token, ok_envelope,
    };
    use crate::transport::TransportError;

    fn admin_user() -> UserInfo {
        UserInfo {
            id: 1,
            username: "admin".to_string(),
            nickname: Some("管理员".to_string()),
            avatar: None,
            user_type: 3,
        }
    }

    fn auth_payload_json(access: &str, refresh: &str) -> Value {
        json!({
            "accessToken": access,
            "refreshToken": refresh,
            "userInfo": {"id": 1, "username": "admin", "nickname": "管理员", "avatar": null, "userType": 3},
        })
    }

    fn seeded_store(access: &str) -> Arc<MemoryCredentialStore> {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set_access_token(access);
        store.set_refresh_token(&make_token(3600));
        store.set_user_info(&admin_user());
        store
    }

    struct Fixture {
        transport: Arc<MockTransport>,
        client: ApiClient,
        notifier: Arc<RecordingNotifier>,
        navigator: Arc<RecordingNavigator>,
    }

    fn fixture(store: Arc<MemoryCredentialStore>) -> Fixture {
        let transport = Arc::new(MockTransport::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Arc::new(Session::new(
            transport.clone(),
            store,
            notifier.clone(),
        ));
        let client = ApiClient::new(
            transport.clone(),
            session,
            notifier.clone(),
            navigator.clone(),
        );
        Fixture {
            transport,
            client,
            notifier,
            navigator,
        }
    }

    #[tokio::test]
    async fn test_success_unwraps_envelope_and_attaches_bearer() {
        let token = make_token(3600);
        let fx = fixture(seeded_store(&token));
        fx.transport.push_response(ok_envelope(json!({"id": 7})));

        let value: Value = fx
            .client
            .request(RequestDescriptor::get("/admin/farms"))
            .await
            .unwrap();
        assert_eq!(value["id"], json!(7));

        let sent = fx.transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bearer.as_deref(), Some(token.as_str()));
        assert!(fx.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_expired_credential_refreshes_and_replays_once() {
        let fx = fixture(seeded_store(&make_token(3600)));
        let new_access = make_token(7200);
        fx.transport.push_response(envelope(401, 401, "token expired"));
        fx.transport
            .push_response(ok_envelope(auth_payload_json(&new_access, &make_token(9000))));
        fx.transport.push_response(ok_envelope(json!({"id": 9})));

        let value: Value = fx
            .client
            .request(RequestDescriptor::get("/admin/farms/9"))
            .await
            .unwrap();
        assert_eq!(value["id"], json!(9));

        let paths = fx.transport.request_paths();
        assert_eq!(paths, vec!["/admin/farms/9", "/auth/refresh", "/admin/farms/9"]);
        // The replay carries the refreshed token.
        let sent = fx.transport.requests();
        assert_eq!(sent[2].bearer.as_deref(), Some(new_access.as_str()));
        assert!(fx.notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_session_and_redirects_to_login() {
        let fx = fixture(seeded_store(&make_token(3600)));
        fx.transport.push_response(envelope(401, 401, "token expired"));
        fx.transport
            .push_response(envelope(401, 401, "refresh token expired"));

        let err = fx
            .client
            .request::<Value>(RequestDescriptor::get("/admin/farms"))
            .await
            .unwrap_err();
        assert!(err.is_permission());
        assert_eq!(
            fx.navigator.redirects(),
            vec![Redirect::Login { redirect: None }]
        );
        assert_eq!(fx.notifier.errors(), vec!["登录已过期，请重新登录"]);
        assert!(fx.client.session().access_token().await.is_none());
    }

    #[tokio::test]
    async fn test_replay_happens_at_most_once() {
        let fx = fixture(seeded_store(&make_token(3600)));
        fx.transport.push_response(envelope(401, 401, "token expired"));
        fx.transport
            .push_response(ok_envelope(auth_payload_json(&make_token(7200), &make_token(9000))));
        // The replay also fails: no second refresh is attempted.
        fx.transport.push_response(envelope(401, 401, "still expired"));

        let err = fx
            .client
            .request::<Value>(RequestDescriptor::get("/admin/farms"))
            .await
            .unwrap_err();
        assert!(err.is_permission());
        assert_eq!(fx.transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_business_failure_surfaces_server_message() {
        let fx = fixture(seeded_store(&make_token(3600)));
        fx.transport.push_response(envelope(200, 500, "库存不足"));

        let err = fx
            .client
            .request::<Value>(RequestDescriptor::post("/api/adoption-projects"))
            .await
            .unwrap_err();
        assert!(err.is_business());
        assert_eq!(fx.notifier.errors(), vec!["库存不足"]);
    }

    #[tokio::test]
    async fn test_non_envelope_success_body_is_rejected() {
        let fx = fixture(seeded_store(&make_token(3600)));
        fx.transport.push_response(RawResponse {
            status: 200,
            body: Some(json!({"status": "ok"})),
        });

        let err = fx
            .client
            .request::<Value>(RequestDescriptor::get("/admin/farms"))
            .await
            .unwrap_err();
        assert!(!err.is_business());
        assert_eq!(fx.notifier.errors(), vec!["请求失败"]);
    }

    #[tokio::test]
    async fn test_timeout_notifies_and_propagates() {
        let fx = fixture(seeded_store(&make_token(3600)));
        fx.transport
            .push_error(TransportError::Timeout("deadline elapsed".to_string()));

        let err = fx
            .client
            .request::<Value>(RequestDescriptor::get("/admin/farms"))
            .await
            .unwrap_err();
        assert!(err.is_local());
        assert_eq!(fx.notifier.errors(), vec!["请求超时，请稍后重试"]);
    }

    #[tokio::test]
    async fn test_forbidden_redirects() {
        let fx = fixture(seeded_store(&make_token(3600)));
        fx.transport.push_response(envelope(403, 403, "forbidden"));

        let err = fx
            .client
            .request::<Value>(RequestDescriptor::get("/admin/farms"))
            .await
            .unwrap_err();
        assert!(err.is_permission());
        assert_eq!(fx.navigator.redirects(), vec![Redirect::Forbidden]);
        assert_eq!(fx.notifier.errors(), vec!["权限不足"]);
    }

    #[tokio::test]
    async fn test_bad_request_surfaces_validation_message() {
        let fx = fixture(seeded_store(&make_token(3600)));
        fx.transport
            .push_response(envelope(400, 400, "项目名称不能为空"));

        let err = fx
            .client
            .request::<Value>(RequestDescriptor::post("/api/adoption-projects"))
            .await
            .unwrap_err();
        assert!(matches!(err, IfarmError::Validation { .. }));
        assert_eq!(fx.notifier.errors(), vec!["项目名称不能为空"]);
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_generic_message() {
        let fx = fixture(seeded_store(&make_token(3600)));
        fx.transport.push_response(RawResponse {
            status: 500,
            body: None,
        });

        let err = fx
            .client
            .request::<Value>(RequestDescriptor::get("/admin/farms"))
            .await
            .unwrap_err();
        assert!(matches!(err, IfarmError::Server { .. }));
        assert_eq!(fx.notifier.errors(), vec!["服务器内部错误"]);
    }
}
