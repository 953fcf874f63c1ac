//! Plot management endpoints.

use super::ResourceEndpoints;

/// Endpoint table consumed by the generic store.
pub const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
    base: "/admin/plots",
    list_path: "/admin/plots",
};
