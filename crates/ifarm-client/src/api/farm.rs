//! Farm management endpoints.

use super::ResourceEndpoints;

/// Endpoint table consumed by the generic store.
pub const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
    base: "/admin/farms",
    list_path: "/admin/farms",
};
