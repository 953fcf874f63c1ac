//! Domain layer for the iFarm admin client.
//!
//! Contains the shared error type, authentication primitives (roles, token
//! validity, user profile), pagination models, the domain entities (project,
//! farm, plot, crop, category, order) with the project status state machine
//! and its advisory guards, and the credential-store interface the session
//! persists through.

pub mod auth;
pub mod category;
pub mod credential;
pub mod crop;
pub mod error;
pub mod farm;
pub mod order;
pub mod page;
pub mod plot;
pub mod project;

// Re-export common error type
pub use error::{IfarmError, Result};
