//! Adoption project endpoints, including the status workflow calls.

use serde::Serialize;

use ifarm_core::project::ProjectStatus;

use crate::request::RequestDescriptor;

use super::ResourceEndpoints;

const BASE: &str = "/api/adoption-projects";

/// Endpoint table consumed by the generic store. Listing goes through the
/// admin view of the resource.
pub const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
    base: BASE,
    list_path: "/api/adoption-projects/admin",
};

/// Planting details for `PUT .../start-planting`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantingInfo {
    pub actual_planting_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Harvest details for `PUT .../start-harvesting`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestInfo {
    pub actual_harvest_date: String,
    pub actual_yield: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Completion details for `PUT .../complete`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionInfo {
    pub completion_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Cancellation details for `PUT .../cancel`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelInfo {
    pub reason: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    project_status: ProjectStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchStatusBody<'a> {
    ids: &'a [i64],
    project_status: ProjectStatus,
}

/// Lists projects owned by the calling farmer.
pub fn my_list() -> RequestDescriptor {
    RequestDescriptor::get(format!("{BASE}/my"))
}

pub fn update_status(id: i64, status: ProjectStatus) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/status")).with_body(&StatusBody {
        project_status: status,
    })
}

pub fn batch_update_status(ids: &[i64], status: ProjectStatus) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/batch/status")).with_body(&BatchStatusBody {
        ids,
        project_status: status,
    })
}

pub fn publish(id: i64) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/publish"))
}

pub fn start_planting(id: i64, info: &PlantingInfo) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/start-planting")).with_body(info)
}

pub fn start_harvesting(id: i64, info: &HarvestInfo) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/start-harvesting")).with_body(info)
}

pub fn complete(id: i64, info: &CompletionInfo) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/complete")).with_body(info)
}

pub fn cancel(id: i64, info: &CancelInfo) -> RequestDescriptor {
    RequestDescriptor::put(format!("{BASE}/{id}/cancel")).with_body(info)
}

pub fn stats(id: i64) -> RequestDescriptor {
    RequestDescriptor::get(format!("{BASE}/{id}/stats"))
}

pub fn orders(id: i64) -> RequestDescriptor {
    RequestDescriptor::get(format!("{BASE}/{id}/orders"))
}
