//! Curl service abstraction layer.
//!
//! The HTTP routes talk to a [`CurlService`] rather than to the executor
//! directly, so tests can swap in a canned implementation.

use super::client::{send_curl_request, ExecuteOptions};
use super::envelope::ResponseEnvelope;
use crate::curl::{parse_curl, RequestDescriptor};
use crate::error::ParseError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub trait CurlService: Send + Sync {
    fn parse(&self, command: &str) -> Result<RequestDescriptor, ParseError> {
        parse_curl(command)
    }

    /// Parses and executes `command`. A `proxy` of `Some` overrides the
    /// service default; `Some("")` disables proxying for this call.
    fn execute(
        &self,
        command: String,
        proxy: Option<String>,
    ) -> Pin<Box<dyn Future<Output = ResponseEnvelope> + Send + '_>>;
}

/// Service backed by the real executor.
#[derive(Debug, Default, Clone)]
pub struct HttpCurlService {
    options: ExecuteOptions,
}

impl HttpCurlService {
    pub fn new(options: ExecuteOptions) -> Self {
        Self { options }
    }

    pub fn arc(options: ExecuteOptions) -> Arc<Self> {
        Arc::new(Self::new(options))
    }

    pub fn options(&self) -> &ExecuteOptions {
        &self.options
    }
}

impl CurlService for HttpCurlService {
    fn execute(
        &self,
        command: String,
        proxy: Option<String>,
    ) -> Pin<Box<dyn Future<Output = ResponseEnvelope> + Send + '_>> {
        let mut options = self.options.clone();
        if proxy.is_some() {
            options.proxy = proxy;
        }
        Box::pin(async move { send_curl_request(&command, &options).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedService {
        response: ResponseEnvelope,
    }

    impl CurlService for CannedService {
        fn execute(
            &self,
            _command: String,
            _proxy: Option<String>,
        ) -> Pin<Box<dyn Future<Output = ResponseEnvelope> + Send + '_>> {
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn test_canned_service() {
        let service = CannedService {
            response: ResponseEnvelope::failure("Test error"),
        };
        let response = service.execute("curl https://a.b".to_string(), None).await;
        assert!(!response.success);
        assert_eq!(response.error, "Test error");
    }

    #[test]
    fn test_default_parse_uses_parser() {
        let service = HttpCurlService::default();
        let request = service.parse("curl https://a.b").unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(service.options().timeout, crate::executor::DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_http_service_reports_parse_errors() {
        let service = HttpCurlService::default();
        let response = service.execute("curl".to_string(), None).await;
        assert!(!response.success);
        assert_eq!(response.error, "no URL provided");
    }
}
