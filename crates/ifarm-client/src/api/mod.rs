//! Declarative endpoint builders, one module per API surface.
//!
//! Each function returns a [`RequestDescriptor`](crate::request::RequestDescriptor)
//! ready to be issued through the client; no module here performs I/O.

pub mod auth;
pub mod category;
pub mod crop;
pub mod farm;
pub mod order;
pub mod plot;
pub mod project;

use serde::Serialize;

use crate::request::RequestDescriptor;

/// Endpoint table for one REST resource, consumed by the generic
/// paginated store.
///
/// `list_path` is separate from `base` because some resources list under a
/// dedicated sub-path (projects list under `/admin`).
#[derive(Debug, Clone, Copy)]
pub struct ResourceEndpoints {
    pub base: &'static str,
    pub list_path: &'static str,
}

#[derive(Serialize)]
struct IdList<'a> {
    ids: &'a [i64],
}

#[derive(Serialize)]
struct EnabledBody {
    enabled: bool,
}

impl ResourceEndpoints {
    pub fn list(&self) -> RequestDescriptor {
        RequestDescriptor::get(self.list_path)
    }

    pub fn detail(&self, id: i64) -> RequestDescriptor {
        RequestDescriptor::get(format!("{}/{id}", self.base))
    }

    pub fn create<T: Serialize>(&self, body: &T) -> RequestDescriptor {
        RequestDescriptor::post(self.base).with_body(body)
    }

    pub fn update<T: Serialize>(&self, id: i64, body: &T) -> RequestDescriptor {
        RequestDescriptor::put(format!("{}/{id}", self.base)).with_body(body)
    }

    pub fn delete(&self, id: i64) -> RequestDescriptor {
        RequestDescriptor::delete(format!("{}/{id}", self.base))
    }

    pub fn batch_delete(&self, ids: &[i64]) -> RequestDescriptor {
        RequestDescriptor::delete(format!("{}/batch", self.base)).with_body(&IdList { ids })
    }

    pub fn set_status(&self, id: i64, enabled: bool) -> RequestDescriptor {
        RequestDescriptor::put(format!("{}/{id}/status", self.base))
            .with_body(&EnabledBody { enabled })
    }
}
