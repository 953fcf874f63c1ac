//! Plot store.

use std::sync::Arc;

use ifarm_core::plot::{Plot, PlotQuery};

use ifarm_client::ApiClient;
use ifarm_client::api::plot;

use super::resource::{Entity, ResourceStore, Toggleable};

impl Entity for Plot {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Toggleable for Plot {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Paginated store over `/admin/plots`.
pub type PlotStore = ResourceStore<Plot, PlotQuery>;

impl PlotStore {
    pub fn plots(client: Arc<ApiClient>) -> Self {
        Self::new(client, plot::ENDPOINTS)
    }
}
