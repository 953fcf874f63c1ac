//! Farm store.

use std::sync::Arc;

use ifarm_core::farm::{Farm, FarmQuery};

use ifarm_client::ApiClient;
use ifarm_client::api::farm;

use super::resource::{Entity, ResourceStore, Toggleable};

impl Entity for Farm {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Toggleable for Farm {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Paginated store over `/admin/farms`.
pub type FarmStore = ResourceStore<Farm, FarmQuery>;

impl FarmStore {
    pub fn farms(client: Arc<ApiClient>) -> Self {
        Self::new(client, farm::ENDPOINTS)
    }
}
