//! Adoption project store.
//!
//! Wraps the generic resource store with the status workflow. Every
//! mutating operation first runs the matching precondition guard against
//! the cached record: a rejection surfaces the reason, returns
//! `Err(Precondition)`, and never reaches the network. Successful workflow
//! calls patch `project_status` optimistically; the page is not re-sorted
//! or re-fetched.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use ifarm_core::Result;
use ifarm_core::page::{Page, Pagination};
use ifarm_core::project::guard::{
    check_can_cancel, check_can_delete, check_can_publish, check_can_update,
    check_status_can_update,
};
use ifarm_core::project::{Project, ProjectDraft, ProjectPatch, ProjectQuery, ProjectStatus};

use ifarm_client::ApiClient;
use ifarm_client::api::project::{
    self, CancelInfo, CompletionInfo, HarvestInfo, PlantingInfo,
};

use super::resource::{Entity, ResourceStore, Toggleable};

impl Entity for Project {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Toggleable for Project {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Adoption/revenue aggregates for one project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStats {
    pub total_units: u32,
    pub adopted_units: u32,
    pub available_units: u32,
    pub adoption_rate: f64,
    pub total_revenue: f64,
    pub order_count: u32,
}

/// One order row as listed under a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOrderSummary {
    pub id: i64,
    #[serde(default)]
    pub order_no: String,
    #[serde(default)]
    pub user_name: String,
    pub unit_count: u32,
    pub total_amount: f64,
    pub order_status: i32,
}

/// Paginated project store plus the status workflow.
pub struct ProjectStore {
    inner: ResourceStore<Project, ProjectQuery>,
}

impl ProjectStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            inner: ResourceStore::new(client, project::ENDPOINTS),
        }
    }

    // ------------------------------------------------------------------
    // Cache and plain CRUD, delegated to the generic store
    // ------------------------------------------------------------------

    pub async fn records(&self) -> Vec<Project> {
        self.inner.records().await
    }

    pub async fn current(&self) -> Option<Project> {
        self.inner.current().await
    }

    pub async fn pagination(&self) -> Pagination {
        self.inner.pagination().await
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.is_loading().await
    }

    pub async fn set_query(&self, query: ProjectQuery) {
        self.inner.set_query(query).await;
    }

    pub async fn reset_query(&self) {
        self.inner.reset_query().await;
    }

    pub async fn set_page(&self, current: u64, size: u64) {
        self.inner.set_page(current, size).await;
    }

    pub async fn clear_current(&self) {
        self.inner.clear_current().await;
    }

    pub async fn fetch_list(&self) -> Result<Vec<Project>> {
        self.inner.fetch_list().await
    }

    pub async fn fetch_detail(&self, id: i64) -> Result<Project> {
        self.inner.fetch_detail(id).await
    }

    /// Projects owned by the calling farmer, bypassing the admin cache.
    pub async fn fetch_my_list(&self) -> Result<Page<Project>> {
        self.inner.client().request(project::my_list()).await
    }

    /// New projects start in `Draft`; no guard applies.
    pub async fn create(&self, draft: &ProjectDraft) -> Result<Project> {
        self.inner.create(draft).await
    }

    /// Guarded update: restricted fields are frozen once published.
    pub async fn update(&self, id: i64, patch: &ProjectPatch) -> Result<Project> {
        let cached = self.inner.cached(id).await;
        self.guard(check_can_update(cached.as_ref(), patch))?;
        self.inner.update(id, patch).await
    }

    /// Guarded delete: projects with orders or in flight must be cancelled first.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let cached = self.inner.cached(id).await;
        self.guard(check_can_delete(cached.as_ref()))?;
        self.inner.delete(id).await
    }

    /// Batch delete, with the delete guard applied to every cached record.
    pub async fn batch_delete(&self, ids: &[i64]) -> Result<()> {
        for id in ids {
            let cached = self.inner.cached(*id).await;
            self.guard(check_can_delete(cached.as_ref()))?;
        }
        self.inner.batch_delete(ids).await
    }

    pub async fn set_enabled(&self, id: i64, enabled: bool) -> Result<()> {
        self.inner.set_enabled(id, enabled).await
    }

    // ------------------------------------------------------------------
    // Status workflow
    // ------------------------------------------------------------------

    /// Moves the project to `status` through the generic status endpoint.
    pub async fn update_status(&self, id: i64, status: ProjectStatus) -> Result<()> {
        let cached = self.inner.cached(id).await;
        self.guard(check_status_can_update(cached.as_ref(), status))?;
        self.inner
            .client()
            .request::<Value>(project::update_status(id, status))
            .await?;
        self.apply_status(id, status).await;
        Ok(())
    }

    /// Moves several projects at once; every cached record must allow the
    /// transition or the whole batch is rejected locally.
    pub async fn batch_update_status(&self, ids: &[i64], status: ProjectStatus) -> Result<()> {
        for id in ids {
            let cached = self.inner.cached(*id).await;
            self.guard(check_status_can_update(cached.as_ref(), status))?;
        }
        self.inner
            .client()
            .request::<Value>(project::batch_update_status(ids, status))
            .await?;
        for id in ids {
            self.apply_status(*id, status).await;
        }
        Ok(())
    }

    /// Draft -> Published, after the completeness checks.
    pub async fn publish(&self, id: i64) -> Result<()> {
        let cached = self.inner.cached(id).await;
        self.guard(check_can_publish(cached.as_ref()))?;
        self.guard(check_status_can_update(
            cached.as_ref(),
            ProjectStatus::Published,
        ))?;
        self.inner
            .client()
            .request::<Value>(project::publish(id))
            .await?;
        self.apply_status(id, ProjectStatus::Published).await;
        Ok(())
    }

    /// Adopting -> Planting.
    pub async fn start_planting(&self, id: i64, info: &PlantingInfo) -> Result<()> {
        self.workflow_call(
            id,
            ProjectStatus::Planting,
            project::start_planting(id, info),
        )
        .await
    }

    /// Planting -> Harvesting.
    pub async fn start_harvesting(&self, id: i64, info: &HarvestInfo) -> Result<()> {
        self.workflow_call(
            id,
            ProjectStatus::Harvesting,
            project::start_harvesting(id, info),
        )
        .await
    }

    /// Harvesting -> Completed.
    pub async fn complete(&self, id: i64, info: &CompletionInfo) -> Result<()> {
        self.workflow_call(id, ProjectStatus::Completed, project::complete(id, info))
            .await
    }

    /// Any non-terminal status -> Cancelled.
    pub async fn cancel(&self, id: i64, info: &CancelInfo) -> Result<()> {
        let cached = self.inner.cached(id).await;
        self.guard(check_can_cancel(cached.as_ref()))?;
        self.inner
            .client()
            .request::<Value>(project::cancel(id, info))
            .await?;
        self.apply_status(id, ProjectStatus::Cancelled).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Passthroughs
    // ------------------------------------------------------------------

    pub async fn fetch_stats(&self, id: i64) -> Result<ProjectStats> {
        self.inner.client().request(project::stats(id)).await
    }

    pub async fn fetch_orders(&self, id: i64) -> Result<Page<ProjectOrderSummary>> {
        self.inner.client().request(project::orders(id)).await
    }

    // ------------------------------------------------------------------

    async fn workflow_call(
        &self,
        id: i64,
        target: ProjectStatus,
        descriptor: ifarm_client::RequestDescriptor,
    ) -> Result<()> {
        let cached = self.inner.cached(id).await;
        self.guard(check_status_can_update(cached.as_ref(), target))?;
        self.inner.client().request::<Value>(descriptor).await?;
        self.apply_status(id, target).await;
        Ok(())
    }

    async fn apply_status(&self, id: i64, status: ProjectStatus) {
        self.inner
            .patch_record(id, |p| p.project_status = status)
            .await;
    }

    /// Surfaces a guard rejection before propagating it.
    fn guard(&self, check: Result<()>) -> Result<()> {
        if let Err(err) = &check {
            warn!(%err, "project precondition rejected");
            self.inner.client().notifier().error(&err.user_message());
        }
        check
    }
}
