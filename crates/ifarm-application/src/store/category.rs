//! Crop category store.

use std::sync::Arc;

use ifarm_core::Result;
use ifarm_core::category::{Category, CategoryQuery};

use ifarm_client::ApiClient;
use ifarm_client::api::category;

use super::resource::{Entity, ResourceStore, Toggleable};

impl Entity for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Toggleable for Category {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Paginated store over `/api/categories`.
pub type CategoryStore = ResourceStore<Category, CategoryQuery>;

impl CategoryStore {
    pub fn categories(client: Arc<ApiClient>) -> Self {
        Self::new(client, category::ENDPOINTS)
    }

    /// The full category tree, uncached (selectors re-fetch as needed).
    pub async fn fetch_tree(&self) -> Result<Vec<Category>> {
        self.client().request(category::tree()).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ifarm_client::testing::ok_envelope;

    use crate::store::testkit::harness;

    use super::*;

    #[tokio::test]
    async fn test_fetch_tree_uses_tree_endpoint() {
        let h = harness();
        let store = CategoryStore::categories(h.client.clone());
        h.transport.push_response(ok_envelope(json!([
            {"id": 1, "categoryName": "蔬菜", "code": "VEG"},
            {"id": 2, "categoryName": "水果", "code": "FRUIT"},
        ])));

        let tree = store.fetch_tree().await.unwrap();
        assert_eq!(tree.len(), 2);
        assert!(tree[0].is_root());
        assert_eq!(h.transport.requests()[0].path, "/api/categories/tree");
    }
}
