//! Adoption order domain model.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Payment lifecycle status of an order (numeric on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(into = "u8", try_from = "u8")]
pub enum OrderStatus {
    Pending = 1,
    Paid = 2,
    Cancelled = 3,
    Refunded = 4,
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OrderStatus::Pending),
            2 => Ok(OrderStatus::Paid),
            3 => Ok(OrderStatus::Cancelled),
            4 => Ok(OrderStatus::Refunded),
            other => Err(format!("unknown order status code: {other}")),
        }
    }
}

impl OrderStatus {
    /// Display name shown in the UI.
    pub fn name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "待支付",
            OrderStatus::Paid => "已支付",
            OrderStatus::Cancelled => "已取消",
            OrderStatus::Refunded => "已退款",
        }
    }

    /// Tag color class used for status badges.
    pub fn tag_type(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "warning",
            OrderStatus::Paid => "success",
            OrderStatus::Cancelled => "info",
            OrderStatus::Refunded => "danger",
        }
    }
}

/// An adoption order placed against a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub order_no: String,
    pub user_id: i64,
    pub project_id: i64,
    #[serde(default)]
    pub farm_id: Option<i64>,
    pub unit_count: u32,
    pub unit_price: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub actual_amount: Option<f64>,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_time: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Order {
    pub fn status_name(&self) -> &'static str {
        self.order_status.name()
    }

    pub fn status_tag_type(&self) -> &'static str {
        self.order_status.tag_type()
    }
}

/// List filter parameters for the order list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
}
