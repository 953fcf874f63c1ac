//! Outbound request descriptor.
//!
//! A descriptor captures everything needed to (re-)issue one call: method,
//! path, query, body, and the bearer slot filled in by the client right
//! before sending. Holding the descriptor as a value is what makes the
//! single-shot 401 replay possible.

use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

/// HTTP method of an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One outbound call, created per request and discarded after handling.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the transport's base URL, e.g. `/auth/login`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer credential, attached by the client when the session holds one.
    pub bearer: Option<String>,
    /// Start marker for latency accounting.
    pub started_at: Instant,
}

impl RequestDescriptor {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
            started_at: Instant::now(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends a single query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Merges every non-null top-level field of `params` into the query.
    ///
    /// Values serialize the way they appear on the wire: strings bare,
    /// numbers and booleans via their display form. Nested structures are
    /// not supported by the API and are skipped.
    pub fn with_params<T: Serialize>(mut self, params: &T) -> Self {
        if let Ok(Value::Object(map)) = serde_json::to_value(params) {
            for (key, value) in map {
                let rendered = match value {
                    Value::Null | Value::Array(_) | Value::Object(_) => continue,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                self.query.push((key, rendered));
            }
        }
        self
    }

    /// Sets the JSON body.
    pub fn with_body<T: Serialize>(mut self, body: &T) -> Self {
        self.body = serde_json::to_value(body).ok();
        self
    }

    /// Milliseconds elapsed since the descriptor was created.
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Params {
        current: u64,
        farm_name: Option<String>,
        enabled: Option<bool>,
    }

    #[test]
    fn test_with_params_skips_nulls() {
        let descriptor = RequestDescriptor::get("/admin/farms").with_params(&Params {
            current: 2,
            farm_name: Some("青山".to_string()),
            enabled: None,
        });
        assert_eq!(
            descriptor.query,
            vec![
                ("current".to_string(), "2".to_string()),
                ("farmName".to_string(), "青山".to_string()),
            ]
        );
    }

    #[test]
    fn test_builder_shape() {
        let descriptor = RequestDescriptor::put("/api/adoption-projects/5/status")
            .with_body(&serde_json::json!({"projectStatus": 2}));
        assert_eq!(descriptor.method, Method::Put);
        assert!(descriptor.bearer.is_none());
        assert_eq!(
            descriptor.body.unwrap()["projectStatus"],
            serde_json::json!(2)
        );
    }
}
