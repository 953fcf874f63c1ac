//! Adoption project domain model.

use serde::{Deserialize, Serialize};

use super::status::ProjectStatus;

/// An adoption project: a plot of a farm planted with a crop, divided into
/// adoptable units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub farm_id: i64,
    pub plot_id: i64,
    pub crop_id: i64,
    /// Total number of adoptable units.
    pub unit_count: u32,
    /// Price per unit.
    pub unit_price: f64,
    /// Area per unit in square meters.
    #[serde(default)]
    pub unit_area: Option<f64>,
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Number of orders placed against this project.
    #[serde(default)]
    pub order_count: u32,
    pub project_status: ProjectStatus,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Project {
    /// Display name of the current status.
    pub fn status_name(&self) -> &'static str {
        self.project_status.name()
    }

    /// Tag color class of the current status.
    pub fn status_tag_type(&self) -> &'static str {
        self.project_status.tag_type()
    }
}

/// Fields accepted when creating a project. New projects start in `Draft`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub plot_id: i64,
    pub crop_id: i64,
    pub unit_count: u32,
    pub unit_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_harvest_date: Option<String>,
}

/// Partial update for an existing project. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

/// List filter parameters for the project list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}
