//! The uniform response envelope.
//!
//! Every endpoint wraps its payload as `{code, message, data}`. Code 200 is
//! the success sentinel; any other code is a business failure regardless of
//! the transport status.

use serde::Deserialize;
use serde_json::Value;
use serde::de::DeserializeOwned;

use ifarm_core::{IfarmError, Result};

/// Envelope code signalling success.
pub const SUCCESS_CODE: i64 = 200;

/// The `{code, message, data}` wrapper carried by every response body.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Parses an envelope out of a raw JSON body, `None` when the body does
    /// not carry the expected shape.
    pub fn parse(body: &Value) -> Option<Self> {
        serde_json::from_value(body.clone()).ok()
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// The envelope message, or `fallback` when the server sent none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.message.is_empty() {
            fallback
        } else {
            &self.message
        }
    }

    /// Deserializes the envelope's data slot. A `null`/absent slot
    /// deserializes into optional or unit targets.
    pub fn take_data<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.data).map_err(IfarmError::from)
    }
}
