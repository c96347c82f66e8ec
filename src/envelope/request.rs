//! Inbound proxy event.

use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::multimap::{merge, Multimap};

/// One API-gateway proxy event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default = "default_method")]
    pub http_method: String,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default, skip_serializing_if = "Multimap::is_empty")]
    pub headers: Multimap,

    #[serde(default, skip_serializing_if = "Multimap::is_empty")]
    pub multi_value_headers: Multimap,

    #[serde(default, skip_serializing_if = "Multimap::is_empty")]
    pub query_string_parameters: Multimap,

    #[serde(default, skip_serializing_if = "Multimap::is_empty")]
    pub multi_value_query_string_parameters: Multimap,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,

    #[serde(default)]
    pub request_context: RequestContext,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

impl Default for ProxyRequest {
    fn default() -> Self {
        Self {
            http_method: default_method(),
            path: default_path(),
            headers: Multimap::default(),
            multi_value_headers: Multimap::default(),
            query_string_parameters: Multimap::default(),
            multi_value_query_string_parameters: Multimap::default(),
            body: None,
            is_base64_encoded: false,
            request_context: RequestContext::default(),
        }
    }
}

impl ProxyRequest {
    pub fn builder() -> ProxyRequestBuilder {
        ProxyRequestBuilder::default()
    }

    /// All header pairs; multi-value entries replace single ones of the same name.
    pub fn header_pairs(&self) -> Vec<(&str, &str)> {
        merge(&self.headers, &self.multi_value_headers, true)
    }

    /// All query pairs; multi-value entries replace single ones of the same key.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        merge(
            &self.query_string_parameters,
            &self.multi_value_query_string_parameters,
            false,
        )
    }
}

/// Execution metadata attached by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    pub stage: Option<String>,
    pub request_id: Option<String>,
    pub path: Option<String>,
    pub identity: Identity,
    /// Everything else the gateway sent, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Builder for proxy events, mostly for tests and local replay.
#[derive(Debug, Default)]
pub struct ProxyRequestBuilder {
    request: ProxyRequest,
}

impl ProxyRequestBuilder {
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.request.http_method = method.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.request.path = path.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.multi_value_headers.append(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.multi_value_query_string_parameters.append(key, value);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.request.body = Some(body.into());
        self.request.is_base64_encoded = false;
        self
    }

    /// Attach a binary body, base64 encoded as the gateway would.
    pub fn binary_body(mut self, body: impl AsRef<[u8]>) -> Self {
        self.request.body = Some(general_purpose::STANDARD.encode(body));
        self.request.is_base64_encoded = true;
        self
    }

    pub fn stage(mut self, stage: impl Into<String>) -> Self {
        self.request.request_context.stage = Some(stage.into());
        self
    }

    pub fn source_ip(mut self, ip: impl Into<String>) -> Self {
        self.request.request_context.identity.source_ip = Some(ip.into());
        self
    }

    pub fn build(self) -> ProxyRequest {
        self.request
    }
}
