use reqwest::{
    Client as HttpClient,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;

use crate::{
    api_v1::{ChatCompletionRequest, ChatCompletionResponse},
    error::OpenAiError,
};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimal HTTP client for an OpenAI-compatible *chat/completions* endpoint.
///
/// * Non-streaming only (one request ▶ one response).
/// * Shares a single `reqwest::Client`, so cloning `OpenAiClient` is cheap.
/// * Timeouts are enforced by the `reqwest` client and surface as
///   [`OpenAiError::Http`].
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: HttpClient,
    base: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Build a client with its own `reqwest` client using `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, OpenAiError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self::with_http(api_key, http, base_url))
    }

    /// Build with a custom `reqwest::Client` in case the caller needs proxy
    /// settings, custom TLS, etc.
    pub fn with_http(
        api_key: impl Into<String>,
        http: HttpClient,
        base_url: Option<String>,
    ) -> Self {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self {
            api_key: api_key.into(),
            http,
            base: base.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Perform a **non-streaming** chat completion.
    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );

        let url = format!("{}/chat/completions", self.base);

        #[cfg(feature = "tracing")]
        tracing::debug!(%url, model = %request.model, "sending chat completion request");

        let resp = self
            .http
            .post(url)
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();

            #[cfg(feature = "tracing")]
            tracing::warn!(%status, "chat completion returned non-success status");

            return Err(OpenAiError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    use super::*;
    use crate::api_v1::{ChatCompletionMessage, Content, MessageRole};

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest::new(
            "llama-3.1-8b-instant".into(),
            vec![ChatCompletionMessage {
                role: MessageRole::User,
                content: Some(Content::Text("rice".into())),
                name: None,
            }],
        )
        .temperature(0.7)
    }

    fn client(server: &MockServer, timeout: Duration) -> OpenAiClient {
        OpenAiClient::new("test-key", Some(format!("{}/v1/", server.uri())), timeout).unwrap()
    }

    #[tokio::test]
    async fn posts_with_bearer_auth() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({"model": "llama-3.1-8b-instant"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "{}"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server, DEFAULT_TIMEOUT)
            .chat_completion(request())
            .await
            .unwrap();

        assert_eq!(response.choices.map(|c| c.len()), Some(1));
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = client(&server, DEFAULT_TIMEOUT)
            .chat_completion(request())
            .await
            .unwrap_err();

        match err {
            OpenAiError::Api { status, body } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_millis(50))
            .chat_completion(request())
            .await
            .unwrap_err();

        assert!(err.is_timeout(), "{err:?}");
    }

    #[tokio::test]
    async fn non_json_body_is_serde_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server, DEFAULT_TIMEOUT)
            .chat_completion(request())
            .await
            .unwrap_err();

        assert!(matches!(err, OpenAiError::Serde(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = OpenAiClient::with_http(
            "k",
            HttpClient::new(),
            Some("http://localhost:1/v1/".into()),
        );
        assert_eq!(client.base_url(), "http://localhost:1/v1");

        let default = OpenAiClient::with_http("k", HttpClient::new(), None);
        assert_eq!(default.base_url(), DEFAULT_BASE_URL);
    }
}
