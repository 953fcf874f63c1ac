//! Cached, paginated domain state over the iFarm HTTP client.
//!
//! Each store owns the list/detail cache for one resource and keeps it
//! consistent with the mutations it issues. [`ProjectStore`] adds the
//! status workflow with its local precondition guards.

pub mod store;

pub use store::{
    CategoryStore, CropStore, Entity, FarmStore, OrderStore, PlotStore, ProjectStore,
    ResourceStore, Toggleable,
};
