//! Adoption order endpoints, including the payment lifecycle calls.

use serde::Serialize;

use crate::request::RequestDescriptor;

use super::ResourceEndpoints;

const BASE: &str = "/api/adoption-orders";

/// Endpoint table consumed by the generic store. Listing goes through the
/// admin view; orders are never created or deleted from this client.
pub const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
    base: BASE,
    list_path: "/api/adoption-orders/admin",
};

/// Cancellation details for `PUT .../cancel`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderInfo {
    pub reason: String,
}

/// Manual payment confirmation for `PUT .../confirm-payment`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub payment_no: String,
    pub payment_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Refund application for `PUT .../refund`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub refund_amount: f64,
    pub reason: String,
}

/// Refund confirmation for `PUT .../confirm-refund`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundConfirmation {
    pub refund_no: String,
    pub refund_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Serialize)]
struct BatchCancelBody<'a> {
    ids: &'a [i64],
    reason: &'a str,
}

/// Lists orders against projects owned by the calling farmer.
pub fn my_list() -> RequestDescriptor {
    RequestDescriptor::get(format!("{BASE}/my"))
}

/// Lists orders scoped to one farm.
pub fn farm_list(farm_id: i64) -> RequestDescriptor {
    RequestDescriptor::get(format!("{BASE}/farm/{farm_id}"))
}

pub fn cancel(id: i64, info: &CancelOrderInfo) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/cancel")).with_body(info)
}

pub fn batch_cancel(ids: &[i64], reason: &str) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/batch/cancel"))
        .with_body(&BatchCancelBody { ids, reason })
}

pub fn confirm_payment(id: i64, info: &PaymentConfirmation) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/confirm-payment")).with_body(info)
}

pub fn refund(id: i64, info: &RefundRequest) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/refund")).with_body(info)
}

pub fn confirm_refund(id: i64, info: &RefundConfirmation) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/confirm-refund")).with_body(info)
}

/// Aggregate order statistics, optionally scoped by date range and farm.
pub fn stats() -> RequestDescriptor {
    RequestDescriptor::get(format!("{BASE}/stats"))
}
