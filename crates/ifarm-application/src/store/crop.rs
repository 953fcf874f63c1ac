//! Crop store.

use std::sync::Arc;

use ifarm_core::crop::{Crop, CropQuery};

use ifarm_client::ApiClient;
use ifarm_client::api::crop;

use super::resource::{Entity, ResourceStore, Toggleable};

impl Entity for Crop {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Toggleable for Crop {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Paginated store over `/admin/crops`.
pub type CropStore = ResourceStore<Crop, CropQuery>;

impl CropStore {
    pub fn crops(client: Arc<ApiClient>) -> Self {
        Self::new(client, crop::ENDPOINTS)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ifarm_client::testing::ok_envelope;

    use crate::store::testkit::{harness, page_of};

    use super::*;

    #[tokio::test]
    async fn test_list_and_toggle_go_through_crop_endpoints() {
        let h = harness();
        let store = CropStore::crops(h.client.clone());
        h.transport.push_response(ok_envelope(page_of(vec![
            json!({"id": 2, "cropName": "有机番茄", "categoryId": 1}),
        ])));
        store.fetch_list().await.unwrap();
        assert_eq!(h.transport.requests()[0].path, "/admin/crops");

        h.transport.push_response(ok_envelope(serde_json::Value::Null));
        store.set_enabled(2, false).await.unwrap();
        assert_eq!(h.transport.requests()[1].path, "/admin/crops/2/status");
        assert!(!store.records().await[0].enabled);
    }
}
