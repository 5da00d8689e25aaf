use std::{future::Future, pin::Pin};

use serde_json::Value;

use crate::{
    error::Result,
    generic::{GenericChatCompletionResponse, GenericMessage},
    model::Model,
    template::{IntoPrompt, PromptTemplate},
};

/// A **backend** turns a chat prompt into a network call to a concrete provider
/// (Groq, OpenAI, a local server, …) and hands back the assistant's reply.
///
/// The trait is intentionally minimal:
///
/// * **One associated type** – the in-memory `Message` representation this
///   provider accepts.
/// * **One async-ish method** – `chat_complete`, which performs a *single*
///   non-streaming round-trip.  Timeouts and cancellation belong to the
///   implementation and surface as an `Err`.
///
/// The method returns a [`Pin<Box<dyn Future>>`] so no `async_trait` is
/// needed.
pub trait ChatCompletionProvider: Send + Sync {
    /// Chat message type consumed by this backend.
    type Message: Send + Sync + 'static;

    /// Execute the chat prompt and return the assistant message verbatim.
    fn chat_complete<'p, M>(
        &self,
        params: ChatCompleteParameters<M>,
    ) -> Pin<
        Box<dyn Future<Output = Result<GenericChatCompletionResponse<GenericMessage>>> + Send + 'p>,
    >
    where
        M: Into<Self::Message> + Clone + Send + Sync + 'p;
}

/// Everything a provider needs for one request.
#[derive(Debug, Clone)]
pub struct ChatCompleteParameters<M: Clone> {
    pub messages: Vec<M>,
    pub model: Model,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub response_format: Option<Value>,
}

impl<M: Clone> ChatCompleteParameters<M> {
    pub fn new(messages: Vec<M>, model: Model) -> Self {
        Self {
            messages,
            model,
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    /// Build parameters from a prompt template, carrying over its default
    /// model, temperature and token budget.
    pub fn from_template<P>(prompt: P) -> Self
    where
        P: PromptTemplate + IntoPrompt<Message = M>,
    {
        Self::new(prompt.into_prompt(), P::MODEL)
            .with_temperature(P::TEMPERATURE)
            .with_max_tokens(P::MAX_TOKENS)
    }

    pub fn messages(&self) -> &Vec<M> {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<M> {
        self.messages
    }

    pub fn model(&self) -> Model {
        self.model.clone()
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }
}

#[cfg(test)]
mod tests {
    use schemars::JsonSchema;

    use super::*;
    use crate::{
        generic::GenericRole,
        model::{GroqModel, OpenAiModel},
    };

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Reply {
        text: String,
    }

    struct Ask(&'static str);

    impl IntoPrompt for Ask {
        type Message = GenericMessage;

        fn into_prompt(self) -> Vec<Self::Message> {
            vec![GenericMessage::new(self.0.into(), GenericRole::User)]
        }
    }

    impl PromptTemplate for Ask {
        type Output = Reply;
        const MODEL: Model = Model::Groq(GroqModel::Llama3_1_8bInstant);
        const MAX_TOKENS: u32 = 2000;
    }

    #[test]
    fn template_defaults_are_carried_over() {
        let params = ChatCompleteParameters::from_template(Ask("hi"));
        assert_eq!(params.messages().len(), 1);
        assert_eq!(params.model(), Model::Groq(GroqModel::Llama3_1_8bInstant));
        assert_eq!(params.temperature, Some(0.7));
        assert_eq!(params.max_tokens, Some(2000));
        assert!(params.response_format.is_none());
    }

    #[test]
    fn builder_overrides() {
        let params = ChatCompleteParameters::from_template(Ask("hi"))
            .with_model(OpenAiModel::Gpt4oMini.into())
            .with_temperature(0.2)
            .with_response_format(serde_json::json!({"type": "json_object"}));

        assert_eq!(params.model(), Model::OpenAi(OpenAiModel::Gpt4oMini));
        assert_eq!(params.temperature, Some(0.2));
        assert_eq!(params.response_format.unwrap()["type"], "json_object");
    }
}
