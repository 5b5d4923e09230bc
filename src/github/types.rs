use serde::Deserialize;
use serde_json::Value;

/// A GitHub webhook delivery. Any JSON document is accepted; fields are read
/// on demand and a missing or oddly typed field reads as absent, so unrelated
/// event kinds never fail to parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct WebhookPayload(Value);

impl WebhookPayload {
    fn text(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }

    pub fn action(&self) -> Option<&str> {
        self.text("/action")
    }

    pub fn git_ref(&self) -> Option<&str> {
        self.text("/ref")
    }

    pub fn after(&self) -> Option<&str> {
        self.text("/after")
    }

    pub fn author(&self) -> Option<String> {
        self.text("/sender/login").map(str::to_string)
    }

    /// Numeric on github.com, but accepted as a string too.
    pub fn pull_request_id(&self) -> Option<String> {
        match self.0.pointer("/pull_request/id")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn is_merged(&self) -> bool {
        self.0
            .pointer("/pull_request/merged")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn head_ref(&self) -> Option<&str> {
        self.text("/pull_request/head/ref")
    }

    pub fn base_ref(&self) -> Option<&str> {
        self.text("/pull_request/base/ref")
    }
}
