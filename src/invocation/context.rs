//! Execution context handed to handlers.

use std::convert::Infallible;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_FUNCTION_NAME: &str = "local";
const DEFAULT_FUNCTION_VERSION: &str = "$LATEST";
const DEFAULT_MEMORY_LIMIT_MB: u32 = 128;

/// Caller-supplied metadata for one invocation. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextMetadata {
    pub request_id: Option<String>,
    /// Deadline as milliseconds since the Unix epoch.
    pub deadline_ms: Option<u64>,
    pub function_name: Option<String>,
    pub function_version: Option<String>,
    pub memory_limit_mb: Option<u32>,
    pub invoked_function_arn: Option<String>,
}

/// Read-only view of the invocation, available to handlers as an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    request_id: String,
    deadline: Option<SystemTime>,
    function_name: String,
    function_version: String,
    memory_limit_mb: u32,
    invoked_function_arn: Option<String>,
}

impl InvocationContext {
    /// Fill missing metadata with defaults. Never fails.
    pub fn from_metadata(metadata: ContextMetadata) -> Self {
        Self {
            request_id: metadata
                .request_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            deadline: metadata
                .deadline_ms
                .map(|ms| UNIX_EPOCH + Duration::from_millis(ms)),
            function_name: metadata
                .function_name
                .unwrap_or_else(|| DEFAULT_FUNCTION_NAME.to_string()),
            function_version: metadata
                .function_version
                .unwrap_or_else(|| DEFAULT_FUNCTION_VERSION.to_string()),
            memory_limit_mb: metadata.memory_limit_mb.unwrap_or(DEFAULT_MEMORY_LIMIT_MB),
            invoked_function_arn: metadata.invoked_function_arn,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<SystemTime> {
        self.deadline
    }

    /// Time left before the deadline; zero once it has passed.
    pub fn remaining_time(&self) -> Option<Duration> {
        self.deadline.map(|deadline| {
            deadline
                .duration_since(SystemTime::now())
                .unwrap_or(Duration::ZERO)
        })
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn function_version(&self) -> &str {
        &self.function_version
    }

    pub fn memory_limit_mb(&self) -> u32 {
        self.memory_limit_mb
    }

    pub fn invoked_function_arn(&self) -> Option<&str> {
        self.invoked_function_arn.as_deref()
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::from_metadata(ContextMetadata::default())
    }
}

impl<S> FromRequestParts<S> for InvocationContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<InvocationContext>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn defaults_fill_missing_fields() {
        let ctx = InvocationContext::default();
        assert!(Uuid::parse_str(ctx.request_id()).is_ok());
        assert_eq!(ctx.function_name(), "local");
        assert_eq!(ctx.function_version(), "$LATEST");
        assert_eq!(ctx.memory_limit_mb(), 128);
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining_time().is_none());
        assert!(ctx.invoked_function_arn().is_none());
    }

    #[test]
    fn empty_request_id_is_replaced() {
        let ctx = InvocationContext::from_metadata(ContextMetadata {
            request_id: Some(String::new()),
            ..Default::default()
        });
        assert!(!ctx.request_id().is_empty());
    }

    #[test]
    fn remaining_time_saturates_at_zero() {
        let past = InvocationContext::from_metadata(ContextMetadata {
            deadline_ms: Some(1_000),
            ..Default::default()
        });
        assert_eq!(past.remaining_time(), Some(Duration::ZERO));

        let future_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
            + 60_000;
        let future = InvocationContext::from_metadata(ContextMetadata {
            deadline_ms: Some(future_ms),
            ..Default::default()
        });
        assert!(future.remaining_time().unwrap() > Duration::from_secs(50));
    }

    #[tokio::test]
    async fn extractor_reads_extension() {
        let ctx = InvocationContext::from_metadata(ContextMetadata {
            request_id: Some("req-1".into()),
            ..Default::default()
        });
        let mut request = Request::new(());
        request.extensions_mut().insert(ctx.clone());
        let (mut parts, _) = request.into_parts();

        let extracted = InvocationContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(extracted, ctx);
    }
}
