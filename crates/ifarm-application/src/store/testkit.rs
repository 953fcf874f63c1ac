//! Shared fixtures for the store tests.

use std::sync::Arc;

use serde_json::{Value, json};

use ifarm_core::auth::UserInfo;
use ifarm_core::credential::CredentialStore;
use ifarm_infrastructure::MemoryCredentialStore;

use ifarm_client::testing::{MockTransport, RecordingNavigator, RecordingNotifier, make_token};
use ifarm_client::{ApiClient, Session};

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: Arc<ApiClient>,
}

/// An API client over a scripted transport with a valid admin session.
pub fn harness() -> Harness {
    let store = Arc::new(MemoryCredentialStore::new());
    store.set_access_token(&make_token(3600));
    store.set_refresh_token(&make_token(7200));
    store.set_user_info(&UserInfo {
        id: 1,
        username: "admin".to_string(),
        nickname: None,
        avatar: None,
        user_type: 3,
    });

    let transport = Arc::new(MockTransport::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let session = Arc::new(Session::new(transport.clone(), store, notifier.clone()));
    let client = Arc::new(ApiClient::new(
        transport.clone(),
        session,
        notifier.clone(),
        navigator.clone(),
    ));
    Harness {
        transport,
        notifier,
        navigator,
        client,
    }
}

/// A one-page list body in the server's shape.
pub fn page_of(records: Vec<Value>) -> Value {
    let total = records.len();
    json!({"records": records, "current": 1, "size": 10, "total": total})
}
