//! Crop category endpoints.

use crate::request::RequestDescriptor;

use super::ResourceEndpoints;

/// Endpoint table consumed by the generic store.
pub const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
    base: "/api/categories",
    list_path: "/api/categories",
};

/// The full category tree, for selectors and breadcrumbs.
pub fn tree() -> RequestDescriptor {
    RequestDescriptor::get("/api/categories/tree")
}
