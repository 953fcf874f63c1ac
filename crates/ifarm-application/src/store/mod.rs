//! Domain state containers.

mod category;
mod crop;
mod farm;
mod order;
mod plot;
mod project;
mod resource;

#[cfg(test)]
pub(crate) mod testkit;

pub use category::CategoryStore;
pub use crop::CropStore;
pub use farm::FarmStore;
pub use order::{OrderStats, OrderStore};
pub use plot::PlotStore;
pub use project::{ProjectOrderSummary, ProjectStats, ProjectStore};
pub use resource::{Entity, ResourceStore, Toggleable};
