use crate::dataplane::payload::{InferenceRequest, InferenceResponse};
use crate::error::MinervaResult;
use crate::middleware::chain::{RequestMiddleware, ResponseMiddleware};
use crate::registry::settings::ModelSettings;
use async_trait::async_trait;

/// Included by construction in every `InferenceMiddlewareChain` (§4.4): on
/// the request side, adopts an inbound `ce-id` header as the request id
/// when the caller didn't set one explicitly; on the response side,
/// annotates the outgoing headers with the standard CloudEvents attribute
/// set so a CloudEvents-aware transport can forward them verbatim.
pub struct CloudEventsMiddleware {
    source: String,
}

impl CloudEventsMiddleware {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

#[async_trait]
impl RequestMiddleware for CloudEventsMiddleware {
    async fn handle_request(
        &self,
        request: &mut InferenceRequest,
        _settings: &ModelSettings,
    ) -> MinervaResult<()> {
        if request.id.is_none() {
            if let Some(ce_id) = request.headers.get("ce-id") {
                request.id = Some(ce_id.clone());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ResponseMiddleware for CloudEventsMiddleware {
    async fn handle_response(
        &self,
        response: &mut InferenceResponse,
        settings: &ModelSettings,
    ) -> MinervaResult<()> {
        response
            .headers
            .insert("ce-specversion".to_string(), "1.0".to_string());
        response
            .headers
            .insert("ce-id".to_string(), response.id.clone());
        response
            .headers
            .insert("ce-source".to_string(), self.source.clone());
        response.headers.insert(
            "ce-type".to_string(),
            format!("io.modelplane.inference.{}", settings.name()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::test_support::mock_settings;

    #[tokio::test]
    async fn request_id_adopted_from_ce_id_header_when_unset() {
        let middleware = CloudEventsMiddleware::new("modelplane");
        let settings = mock_settings("m", None);
        let mut request = InferenceRequest {
            headers: std::collections::HashMap::from([("ce-id".to_string(), "abc-123".to_string())]),
            ..Default::default()
        };

        middleware.handle_request(&mut request, &settings).await.unwrap();
        assert_eq!(request.id.as_deref(), Some("abc-123"));
    }

    #[tokio::test]
    async fn explicit_request_id_is_not_overridden() {
        let middleware = CloudEventsMiddleware::new("modelplane");
        let settings = mock_settings("m", None);
        let mut request = InferenceRequest {
            id: Some("explicit".to_string()),
            headers: std::collections::HashMap::from([("ce-id".to_string(), "abc-123".to_string())]),
            ..Default::default()
        };

        middleware.handle_request(&mut request, &settings).await.unwrap();
        assert_eq!(request.id.as_deref(), Some("explicit"));
    }

    #[tokio::test]
    async fn response_is_annotated_with_cloudevents_headers() {
        let middleware = CloudEventsMiddleware::new("modelplane");
        let settings = mock_settings("iris", Some("1"));
        let mut response = InferenceResponse {
            id: "req-1".to_string(),
            ..Default::default()
        };

        middleware.handle_response(&mut response, &settings).await.unwrap();
        assert_eq!(response.headers.get("ce-id"), Some(&"req-1".to_string()));
        assert_eq!(response.headers.get("ce-specversion"), Some(&"1.0".to_string()));
        assert_eq!(
            response.headers.get("ce-type"),
            Some(&"io.modelplane.inference.iris".to_string())
        );
    }
}
