//! Crop domain model.

use serde::{Deserialize, Serialize};

/// A crop available for adoption projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: i64,
    pub crop_name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    pub category_id: i64,
    #[serde(default)]
    pub description: Option<String>,
    /// Growth cycle in days.
    #[serde(default)]
    pub growth_cycle: Option<u32>,
    #[serde(default)]
    pub planting_season: Option<String>,
    #[serde(default)]
    pub harvest_season: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// List filter parameters for `GET /admin/crops`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}
