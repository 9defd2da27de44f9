use async_trait::async_trait;
use parking_lot::Mutex;

use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};

/// Mock transport for testing.
///
/// Records every request and replays the same canned outcome, allowing
/// adapter and service tests to run without network access.
#[derive(Debug)]
pub struct MockTransport {
    outcome: Result<TransportResponse, String>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    /// Replies to every request with `status` and `body`.
    #[must_use]
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Ok(TransportResponse::new(status, body)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request as if the connection could not be made.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().push(request);
        self.outcome.clone().map_err(TransportError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_records_requests() {
        let transport = MockTransport::responding(200, "{}");
        let response = transport
            .post(TransportRequest::new("http://a", json!({"x": 1})))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.requests()[0].url, "http://a");
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let transport = MockTransport::failing("connection refused");
        let err = transport
            .post(TransportRequest::new("http://a", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }
}
