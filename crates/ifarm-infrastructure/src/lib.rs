//! Infrastructure layer for the iFarm admin client.
//!
//! Provides the concrete credential stores behind
//! [`ifarm_core::credential::CredentialStore`]: a JSON-file store under the
//! platform config directory and an in-memory store for tests/embedding.

mod json_credential_store;
mod memory_credential_store;
pub mod paths;

pub use json_credential_store::JsonFileCredentialStore;
pub use memory_credential_store::MemoryCredentialStore;
