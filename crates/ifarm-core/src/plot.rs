//! Plot domain model.

use serde::{Deserialize, Serialize};

/// A plot of land inside a farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub id: i64,
    pub plot_name: String,
    pub farm_id: i64,
    /// Area in square meters.
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub soil_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// List filter parameters for `GET /admin/plots`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}
