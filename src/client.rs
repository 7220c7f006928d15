//! HTTP client for OpenAI-compatible chat completion endpoints.

use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::observability;
use crate::sse::process_sse;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, StreamEvent};

/// Timeout applied to every request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sampling temperature sent with every request.
const TEMPERATURE: f64 = 0.7;

/// Token ceiling sent with every request.
const MAX_TOKENS: u32 = 1000;

/// Client for an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: Config,
    client: ReqwestClient,
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a new client from resolved configuration.
    pub fn new(config: Config) -> Result<Self> {
        let timeout = DEFAULT_TIMEOUT;
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            config,
            client,
            timeout,
        })
    }

    /// The chat completions endpoint derived from the configured base URL.
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let bearer = format!("Bearer {}", self.config.api_key);
        let value = HeaderValue::from_str(&bearer).map_err(|_| {
            Error::validation(
                "API key contains characters not permitted in a header",
                Some("api_key".to_string()),
            )
        })?;
        headers.insert(header::AUTHORIZATION, value);
        Ok(headers)
    }

    /// Assemble the request envelope for the given messages.
    fn request(&self, messages: Vec<ChatMessage>, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_TOKENS),
            stream: stream.then_some(true),
        }
    }

    /// Map a reqwest transport failure onto our error type.
    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {e}"),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {e}"), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {e}"), Some(Box::new(e)))
        }
    }

    /// Convert a non-success response into an error carrying the status
    /// code and raw body.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {e}"),
                    Some(Box::new(e)),
                );
            }
        };
        if status_code == 401 {
            Error::authentication(body)
        } else {
            Error::api(status_code, body)
        }
    }

    /// Send messages and get a buffered response.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse> {
        observability::CLIENT_REQUESTS.click();
        let response = self
            .client
            .post(self.endpoint())
            .headers(self.default_headers()?)
            .json(&self.request(messages, false))
            .send()
            .await
            .map_err(|e| {
                observability::CLIENT_REQUEST_ERRORS.click();
                self.transport_error(e)
            })?;

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            Error::serialization(format!("Failed to parse response: {e}"), Some(Box::new(e)))
        })
    }

    /// Send messages and get a streaming response.
    ///
    /// Returns a stream of StreamEvent objects that can be processed
    /// incrementally; the stream ends at the `[DONE]` sentinel.
    pub async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>> {
        observability::CLIENT_REQUESTS.click();
        let mut headers = self.default_headers()?;
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/event-stream"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let response = self
            .client
            .post(self.endpoint())
            .headers(headers)
            .json(&self.request(messages, true))
            .send()
            .await
            .map_err(|e| {
                observability::CLIENT_REQUEST_ERRORS.click();
                self.transport_error(e)
            })?;

        if !response.status().is_success() {
            observability::CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        Ok(Box::pin(process_sse(response.bytes_stream())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> OpenAiClient {
        let mut config = Config::default();
        config.api_url = "https://example.com/v1".to_string();
        config.api_key = "sk-test".to_string();
        OpenAiClient::new(config).unwrap()
    }

    #[test]
    fn endpoint_appends_path() {
        let client = test_client();
        assert_eq!(client.endpoint(), "https://example.com/v1/chat/completions");
    }

    #[test]
    fn request_carries_fixed_sampling_params() {
        let client = test_client();
        let request = client.request(vec![ChatMessage::user("用户名称")], false);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(1000));
        assert_eq!(request.stream, None);

        let request = client.request(vec![ChatMessage::user("用户名称")], true);
        assert_eq!(request.stream, Some(true));
    }

    #[test]
    fn default_headers_include_bearer_auth() {
        let client = test_client();
        let headers = client.default_headers().unwrap();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer sk-test"
        );
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn non_header_safe_key_is_rejected() {
        let mut config = Config::default();
        config.api_key = "sk-\ninvalid".to_string();
        let client = OpenAiClient::new(config).unwrap();
        assert!(client.default_headers().is_err());
    }
}
