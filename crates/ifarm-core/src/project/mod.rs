//! Adoption project domain module.
//!
//! - `model`: the `Project` entity, its create/update payloads, list filters
//! - `status`: the status state machine and transition table
//! - `guard`: advisory precondition checks run before mutating calls

pub mod guard;
mod model;
mod status;

pub use model::{Project, ProjectDraft, ProjectPatch, ProjectQuery};
pub use status::ProjectStatus;
