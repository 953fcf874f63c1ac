//! Adoption order store.
//!
//! Orders are created by adopters on the consumer side; this client only
//! lists them and drives the payment lifecycle. Lifecycle calls patch
//! `order_status` on the cached copy after the server accepts, the same
//! optimistic scheme the project workflow uses.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use ifarm_core::Result;
use ifarm_core::order::{Order, OrderQuery, OrderStatus};
use ifarm_core::page::{Page, Pagination};

use ifarm_client::ApiClient;
use ifarm_client::api::order::{
    self, CancelOrderInfo, PaymentConfirmation, RefundConfirmation, RefundRequest,
};

use super::resource::{Entity, ResourceStore};

impl Entity for Order {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Platform-wide order aggregates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderStats {
    pub total_orders: u32,
    pub pending_orders: u32,
    pub paid_orders: u32,
    pub cancelled_orders: u32,
    pub refunded_orders: u32,
    pub total_amount: f64,
}

/// Paginated order store plus the payment lifecycle.
pub struct OrderStore {
    inner: ResourceStore<Order, OrderQuery>,
}

impl OrderStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            inner: ResourceStore::new(client, order::ENDPOINTS),
        }
    }

    // ------------------------------------------------------------------
    // Cache and listing, delegated to the generic store
    // ------------------------------------------------------------------

    pub async fn records(&self) -> Vec<Order> {
        self.inner.records().await
    }

    pub async fn current(&self) -> Option<Order> {
        self.inner.current().await
    }

    pub async fn pagination(&self) -> Pagination {
        self.inner.pagination().await
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.is_loading().await
    }

    pub async fn set_query(&self, query: OrderQuery) {
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

    pub async fn fetch_list(&self) -> Result<Vec<Order>> {
        self.inner.fetch_list().await
    }

    pub async fn fetch_detail(&self, id: i64) -> Result<Order> {
        self.inner.fetch_detail(id).await
    }

    /// Orders placed by the calling user, bypassing the admin cache.
    pub async fn fetch_my_list(&self) -> Result<Page<Order>> {
        self.inner.client().request(order::my_list()).await
    }

    /// Orders against one farm's projects, bypassing the admin cache.
    pub async fn fetch_farm_list(&self, farm_id: i64) -> Result<Page<Order>> {
        self.inner.client().request(order::farm_list(farm_id)).await
    }

    pub async fn fetch_stats(&self) -> Result<OrderStats> {
        self.inner.client().request(order::stats()).await
    }

    /// Remark is the only field the back office edits directly.
    pub async fn update_remark(&self, id: i64, remark: &str) -> Result<Order> {
        self.inner
            .update(id, &serde_json::json!({ "remark": remark }))
            .await
    }

    // ------------------------------------------------------------------
    // Payment lifecycle
    // ------------------------------------------------------------------

    pub async fn cancel(&self, id: i64, info: &CancelOrderInfo) -> Result<()> {
        self.inner
            .client()
            .request::<Value>(order::cancel(id, info))
            .await?;
        self.apply_status(id, OrderStatus::Cancelled).await;
        Ok(())
    }

    pub async fn batch_cancel(&self, ids: &[i64], reason: &str) -> Result<()> {
        self.inner
            .client()
            .request::<Value>(order::batch_cancel(ids, reason))
            .await?;
        for id in ids {
            self.apply_status(*id, OrderStatus::Cancelled).await;
        }
        Ok(())
    }

    pub async fn confirm_payment(&self, id: i64, info: &PaymentConfirmation) -> Result<()> {
        self.inner
            .client()
            .request::<Value>(order::confirm_payment(id, info))
            .await?;
        self.inner
            .patch_record(id, |order| {
                order.order_status = OrderStatus::Paid;
                order.payment_time = Some(info.payment_time.clone());
            })
            .await;
        Ok(())
    }

    pub async fn refund(&self, id: i64, info: &RefundRequest) -> Result<()> {
        self.inner
            .client()
            .request::<Value>(order::refund(id, info))
            .await?;
        self.apply_status(id, OrderStatus::Refunded).await;
        Ok(())
    }

    pub async fn confirm_refund(&self, id: i64, info: &RefundConfirmation) -> Result<()> {
        self.inner
            .client()
            .request::<Value>(order::confirm_refund(id, info))
            .await?;
        self.apply_status(id, OrderStatus::Refunded).await;
        Ok(())
    }

    async fn apply_status(&self, id: i64, status: OrderStatus) {
        self.inner
            .patch_record(id, |order| order.order_status = status)
            .await;
    }
}
