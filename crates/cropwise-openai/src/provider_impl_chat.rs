use std::{future::Future, pin::Pin, sync::Arc};

use cropwise_core::{
    error::Result,
    generic::{GenericChatCompletionResponse, GenericMessage},
    provider::{ChatCompleteParameters, ChatCompletionProvider},
};

use crate::{
    OpenAiAdapter,
    api_v1::{ChatCompletionMessage, ChatCompletionRequest},
};

impl ChatCompletionProvider for OpenAiAdapter {
    type Message = ChatCompletionMessage;

    fn chat_complete<'p, M>(
        &self,
        params: ChatCompleteParameters<M>,
    ) -> Pin<
        Box<dyn Future<Output = Result<GenericChatCompletionResponse<GenericMessage>>> + Send + 'p>,
    >
    where
        M: Into<Self::Message> + Clone + Send + Sync + 'p,
    {
        let client = Arc::clone(&self.client);

        Box::pin(async move {
            let request = ChatCompletionRequest::try_from(params)?;
            let response = client.chat_completion(request).await?;
            Ok(response.into_generic())
        })
    }
}

#[cfg(test)]
mod tests {
    use cropwise_core::{
        error::CropwiseError,
        generic::{GenericRole, ResponseContent},
        model::{GroqModel, Model},
    };
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    use super::*;
    use crate::OpenAiAdapterBuilder;

    fn params() -> ChatCompleteParameters<GenericMessage> {
        ChatCompleteParameters::new(
            vec![GenericMessage::new("Potato".into(), GenericRole::User)],
            Model::Groq(GroqModel::Llama3_1_8bInstant),
        )
        .with_temperature(0.7)
        .with_max_tokens(1500)
    }

    async fn adapter_for(server: &MockServer) -> OpenAiAdapter {
        OpenAiAdapterBuilder::new()
            .with_api_key("test-key")
            .with_base_url(server.uri())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "llama-3.1-8b-instant",
                "max_tokens": 1500,
                "messages": [{"role": "user", "content": "Potato"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "{\"TYPE\": \"Tuber\"}"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7}
            })))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let response = adapter.chat_complete(params()).await.unwrap();

        let ResponseContent::Finished(message) = response.content else {
            panic!("expected finished content");
        };
        assert_eq!(message.text(), Some("{\"TYPE\": \"Tuber\"}"));
        assert_eq!(response.usage.unwrap().completion_tokens, 4);
    }

    #[tokio::test]
    async fn server_error_maps_to_backend_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let adapter = adapter_for(&server).await;
        let err = adapter.chat_complete(params()).await.unwrap_err();
        assert!(matches!(err, CropwiseError::Backend(_)));
    }

    #[tokio::test]
    async fn unreachable_server_maps_to_backend_error() {
        let adapter = OpenAiAdapterBuilder::new()
            .with_api_key("test-key")
            .with_base_url("http://127.0.0.1:9")
            .build()
            .unwrap();

        let err = adapter.chat_complete(params()).await.unwrap_err();
        assert!(matches!(err, CropwiseError::Backend(_)));
    }
}
