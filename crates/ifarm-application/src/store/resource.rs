//! Generic paginated resource store.
//!
//! One instance owns the cached list page, the currently inspected record,
//! and the active filter for a single REST resource. Mutations go through
//! the shared [`ApiClient`] and, on success, patch the cache in place;
//! `total` is only adjusted, never re-derived, the next fetch is the
//! source of truth. On any failure the cache is left untouched.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use ifarm_core::Result;
use ifarm_core::page::{Page, Pagination};

use ifarm_client::ApiClient;
use ifarm_client::api::ResourceEndpoints;

/// A record the generic store can cache.
pub trait Entity: Clone + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> i64;
}

/// Records carrying the enabled/disabled flag; unlocks the status toggle.
pub trait Toggleable: Entity {
    fn set_enabled(&mut self, enabled: bool);
}

#[derive(Serialize)]
struct PageParams {
    current: u64,
    size: u64,
}

struct CacheState<T, Q> {
    records: Vec<T>,
    current: Option<T>,
    pagination: Pagination,
    query: Q,
    loading: bool,
}

/// List/detail cache for one resource, parameterized by the record type and
/// its list filter.
pub struct ResourceStore<T: Entity, Q> {
    client: Arc<ApiClient>,
    endpoints: ResourceEndpoints,
    state: RwLock<CacheState<T, Q>>,
}

impl<T, Q> ResourceStore<T, Q>
where
    T: Entity,
    Q: Clone + Default + Serialize + Send + Sync + 'static,
{
    pub fn new(client: Arc<ApiClient>, endpoints: ResourceEndpoints) -> Self {
        Self {
            client,
            endpoints,
            state: RwLock::new(CacheState {
                records: Vec::new(),
                current: None,
                pagination: Pagination::default(),
                query: Q::default(),
                loading: false,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Cache accessors
    // ------------------------------------------------------------------

    pub async fn records(&self) -> Vec<T> {
        self.state.read().await.records.clone()
    }

    pub async fn current(&self) -> Option<T> {
        self.state.read().await.current.clone()
    }

    pub async fn pagination(&self) -> Pagination {
        self.state.read().await.pagination
    }

    pub async fn query(&self) -> Q {
        self.state.read().await.query.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Replaces the list filter. Takes effect on the next fetch.
    pub async fn set_query(&self, query: Q) {
        self.state.write().await.query = query;
    }

    /// Resets the filter to its defaults and rewinds to the first page.
    pub async fn reset_query(&self) {
        let mut state = self.state.write().await;
        state.query = Q::default();
        state.pagination.current = 1;
    }

    /// Moves the cached pagination window. Takes effect on the next fetch.
    pub async fn set_page(&self, current: u64, size: u64) {
        let mut state = self.state.write().await;
        state.pagination.current = current;
        state.pagination.size = size;
    }

    pub async fn clear_current(&self) {
        self.state.write().await.current = None;
    }

    // ------------------------------------------------------------------
    // Server operations
    // ------------------------------------------------------------------

    /// Fetches the page described by the cached pagination and filter.
    pub async fn fetch_list(&self) -> Result<Vec<T>> {
        let (pagination, query) = {
            let state = self.state.read().await;
            (state.pagination, state.query.clone())
        };
        self.state.write().await.loading = true;

        let descriptor = self
            .endpoints
            .list()
            .with_params(&PageParams {
                current: pagination.current,
                size: pagination.size,
            })
            .with_params(&query);
        let result = self.client.request::<Page<T>>(descriptor).await;

        let mut state = self.state.write().await;
        state.loading = false;
        let page = result?;
        debug!(
            path = self.endpoints.list_path,
            total = page.total,
            fetched = page.records.len(),
            "list fetched"
        );
        state.pagination = page.pagination();
        state.records = page.records.clone();
        Ok(page.records)
    }

    /// Fetches one record and caches it as the current one.
    pub async fn fetch_detail(&self, id: i64) -> Result<T> {
        let record = self.client.request::<T>(self.endpoints.detail(id)).await?;
        self.state.write().await.current = Some(record.clone());
        Ok(record)
    }

    /// Creates a record; the server's copy is appended to the cached page.
    pub async fn create<B: Serialize>(&self, body: &B) -> Result<T> {
        let created = self.client.request::<T>(self.endpoints.create(body)).await?;
        let mut state = self.state.write().await;
        state.records.push(created.clone());
        state.pagination.total += 1;
        Ok(created)
    }

    /// Updates a record; the server's copy replaces the cached one.
    pub async fn update<B: Serialize>(&self, id: i64, body: &B) -> Result<T> {
        let updated = self
            .client
            .request::<T>(self.endpoints.update(id, body))
            .await?;
        let mut state = self.state.write().await;
        if let Some(slot) = state.records.iter_mut().find(|r| r.id() == id) {
            *slot = updated.clone();
        }
        if state.current.as_ref().is_some_and(|c| c.id() == id) {
            state.current = Some(updated.clone());
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .request::<Value>(self.endpoints.delete(id))
            .await?;
        let mut state = self.state.write().await;
        state.records.retain(|r| r.id() != id);
        state.pagination.total = state.pagination.total.saturating_sub(1);
        if state.current.as_ref().is_some_and(|c| c.id() == id) {
            state.current = None;
        }
        Ok(())
    }

    pub async fn batch_delete(&self, ids: &[i64]) -> Result<()> {
        self.client
            .request::<Value>(self.endpoints.batch_delete(ids))
            .await?;
        let mut state = self.state.write().await;
        let before = state.records.len();
        state.records.retain(|r| !ids.contains(&r.id()));
        let removed = (before - state.records.len()) as u64;
        state.pagination.total = state.pagination.total.saturating_sub(removed);
        if state
            .current
            .as_ref()
            .is_some_and(|c| ids.contains(&c.id()))
        {
            state.current = None;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Crate-internal cache plumbing
    // ------------------------------------------------------------------

    pub(crate) fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// The cached copy of `id`, from the list page or the current slot.
    pub(crate) async fn cached(&self, id: i64) -> Option<T> {
        let state = self.state.read().await;
        state
            .records
            .iter()
            .find(|r| r.id() == id)
            .or(state.current.as_ref().filter(|c| c.id() == id))
            .cloned()
    }

    /// Applies `patch` to every cached copy of `id`.
    pub(crate) async fn patch_record(&self, id: i64, patch: impl Fn(&mut T)) {
        let mut state = self.state.write().await;
        if let Some(record) = state.records.iter_mut().find(|r| r.id() == id) {
            patch(record);
        }
        if let Some(current) = state.current.as_mut().filter(|c| c.id() == id) {
            patch(current);
        }
    }
}

impl<T, Q> ResourceStore<T, Q>
where
    T: Toggleable,
    Q: Clone + Default + Serialize + Send + Sync + 'static,
{
    /// Toggles the record on the server, then mirrors the flag locally.
    pub async fn set_enabled(&self, id: i64, enabled: bool) -> Result<()> {
        self.client
            .request::<Value>(self.endpoints.set_status(id, enabled))
            .await?;
        self.patch_record(id, |record| record.set_enabled(enabled))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ifarm_core::farm::{Farm, FarmQuery};

    use ifarm_client::testing::{envelope, ok_envelope};

    use crate::store::FarmStore;
    use crate::store::testkit::{Harness, harness, page_of};

    fn farm_json(id: i64, name: &str) -> Value {
        json!({"id": id, "farmName": name, "ownerId": 9})
    }

    fn farm_store(h: &Harness) -> FarmStore {
        FarmStore::farms(h.client.clone())
    }

    async fn seeded_store(h: &Harness) -> FarmStore {
        let store = farm_store(h);
        h.transport.push_response(ok_envelope(page_of(vec![
            farm_json(1, "青山农场"),
            farm_json(2, "绿水农场"),
            farm_json(3, "日出农场"),
        ])));
        store.fetch_list().await.unwrap();
        store
    }

    use super::*;

    #[tokio::test]
    async fn test_fetch_list_caches_page_and_pagination() {
        let h = harness();
        let store = seeded_store(&h).await;

        assert_eq!(store.records().await.len(), 3);
        let pagination = store.pagination().await;
        assert_eq!(pagination.total, 3);
        assert_eq!(pagination.current, 1);
        assert!(!store.is_loading().await);

        let sent = h.transport.requests();
        assert_eq!(sent[0].path, "/admin/farms");
        assert!(sent[0].query.contains(&("current".to_string(), "1".to_string())));
        assert!(sent[0].query.contains(&("size".to_string(), "10".to_string())));
    }

    #[tokio::test]
    async fn test_filter_and_page_reach_the_wire() {
        let h = harness();
        let store = farm_store(&h);
        store
            .set_query(FarmQuery {
                farm_name: Some("青山".to_string()),
                ..Default::default()
            })
            .await;
        store.set_page(2, 20).await;
        h.transport.push_response(ok_envelope(page_of(vec![])));

        store.fetch_list().await.unwrap();
        let query = &h.transport.requests()[0].query;
        assert!(query.contains(&("current".to_string(), "2".to_string())));
        assert!(query.contains(&("size".to_string(), "20".to_string())));
        assert!(query.contains(&("farmName".to_string(), "青山".to_string())));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_untouched() {
        let h = harness();
        let store = seeded_store(&h).await;
        h.transport.push_response(envelope(500, 500, "数据库连接失败"));

        assert!(store.fetch_list().await.is_err());
        assert_eq!(store.records().await.len(), 3);
        assert_eq!(store.pagination().await.total, 3);
        assert!(!store.is_loading().await);
    }

    #[tokio::test]
    async fn test_create_appends_and_counts() {
        let h = harness();
        let store = seeded_store(&h).await;
        h.transport
            .push_response(ok_envelope(farm_json(4, "新农场")));

        let created: Farm = store
            .create(&json!({"farmName": "新农场", "ownerId": 9}))
            .await
            .unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(store.records().await.len(), 4);
        assert_eq!(store.pagination().await.total, 4);
    }

    #[tokio::test]
    async fn test_update_replaces_cached_copies() {
        let h = harness();
        let store = seeded_store(&h).await;
        h.transport.push_response(ok_envelope(farm_json(2, "绿水")));
        store.fetch_detail(2).await.unwrap();

        h.transport
            .push_response(ok_envelope(farm_json(2, "绿水生态农场")));
        store
            .update(2, &json!({"farmName": "绿水生态农场"}))
            .await
            .unwrap();

        let records = store.records().await;
        let updated = records.iter().find(|f| f.id == 2).unwrap();
        assert_eq!(updated.farm_name, "绿水生态农场");
        assert_eq!(store.current().await.unwrap().farm_name, "绿水生态农场");
    }

    #[tokio::test]
    async fn test_delete_prunes_and_decrements() {
        let h = harness();
        let store = seeded_store(&h).await;
        h.transport.push_response(ok_envelope(farm_json(2, "绿水农场")));
        store.fetch_detail(2).await.unwrap();

        h.transport.push_response(ok_envelope(Value::Null));
        store.delete(2).await.unwrap();

        assert_eq!(store.records().await.len(), 2);
        assert_eq!(store.pagination().await.total, 2);
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn test_batch_delete_prunes_only_listed_ids() {
        let h = harness();
        let store = seeded_store(&h).await;
        h.transport.push_response(ok_envelope(Value::Null));

        store.batch_delete(&[1, 3, 99]).await.unwrap();
        let records = store.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 2);
        assert_eq!(store.pagination().await.total, 1);
    }

    #[tokio::test]
    async fn test_set_enabled_mirrors_flag_locally() {
        let h = harness();
        let store = seeded_store(&h).await;
        h.transport.push_response(ok_envelope(Value::Null));

        store.set_enabled(1, false).await.unwrap();
        let records = store.records().await;
        assert!(!records.iter().find(|f| f.id == 1).unwrap().enabled);
        assert_eq!(h.transport.requests()[1].path, "/admin/farms/1/status");
    }

    #[tokio::test]
    async fn test_reset_query_rewinds_to_first_page() {
        let h = harness();
        let store = farm_store(&h);
        store.set_page(5, 10).await;
        store
            .set_query(FarmQuery {
                city: Some("杭州".to_string()),
                ..Default::default()
            })
            .await;

        store.reset_query().await;
        assert_eq!(store.pagination().await.current, 1);
        assert!(store.query().await.city.is_none());
    }
}
