//! The advisory pipeline: prompt, provider call, parse, validate, and the
//! fallback path when any of those fail.
//!
//! [`CropAdvisor`] is generic over the provider, so the same pipeline runs
//! against the HTTP adapter in production and a scripted provider in tests.
use std::sync::Arc;

use cropwise_core::{
    generic::GenericMessage,
    provider::{ChatCompleteParameters, ChatCompletionProvider},
    schema_util::{json_object_format, json_schema_format},
    template::{IntoPrompt, PromptTemplate},
};
use cropwise_types::{
    AdvisoryRecord, AdvisoryResult, PartialRecord, Provenance, fill_guide_defaults, validate,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{AdvisoryKind, GenerationConfig, ResponseMode},
    error::PipelineError,
    knowledge::KnowledgeBase,
    parser::parse_response,
    prompt::{CropGuidePrompt, FarmingGuidePrompt},
};

/// Schema name sent with `response_mode = "json_schema"`.
pub const RESPONSE_SCHEMA_NAME: &str = "crop_advisory";

/// Schema name of a farming guide in `json_schema` mode.
pub const GUIDE_SCHEMA_NAME: &str = "farming_guide";

/// One crop to advise on. The name is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdvisoryRequest {
    crop_name: String,
}

impl AdvisoryRequest {
    pub fn new(crop_name: impl Into<String>) -> Result<Self, PipelineError> {
        let crop_name = crop_name.into();
        let trimmed = crop_name.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::EmptySubject);
        }
        Ok(Self {
            crop_name: trimmed.to_owned(),
        })
    }

    pub fn crop_name(&self) -> &str {
        &self.crop_name
    }
}

/// Produces an [`AdvisoryResult`] for every request, live or not.
///
/// Cloning is cheap: clones share the backend.
#[derive(Debug)]
pub struct CropAdvisor<B> {
    backend: Arc<B>,
    config: GenerationConfig,
}

impl<B> Clone for CropAdvisor<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
        }
    }
}

impl<B> CropAdvisor<B>
where
    B: ChatCompletionProvider,
    GenericMessage: Into<B::Message>,
{
    /// Advisor with the default generation settings.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, GenerationConfig::default())
    }

    pub fn with_config(backend: B, config: GenerationConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Advise on `request`. Never fails: when the live path errors the
    /// answer comes from the curated table or from defaults, with
    /// `success = false`.
    #[instrument(skip_all, fields(crop = %request.crop_name(), kind = ?self.config.kind))]
    pub async fn advise(&self, request: &AdvisoryRequest) -> AdvisoryResult {
        info!("requesting crop advisory");

        match self.request_record(request).await {
            Ok(record) => {
                info!("advisory served from generative API");
                AdvisoryResult::new(record, Provenance::GenerativeApi)
            }
            Err(error) => {
                warn!(%error, "live advisory failed, falling back");
                fallback(request.crop_name(), self.config.kind)
            }
        }
    }

    /// The live path alone: one provider call, parsed and validated.
    pub async fn request_record(
        &self,
        request: &AdvisoryRequest,
    ) -> Result<AdvisoryRecord, PipelineError> {
        let params = self.parameters(request)?;
        let response = self.backend.chat_complete(params).await?;

        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "token usage"
            );
        }
        if response.content.is_truncated() {
            warn!("reply hit the token limit, parsing what arrived");
        }

        let content = response.content.message().and_then(GenericMessage::text);
        debug!(content = content.unwrap_or_default(), "raw model reply");

        let partial = parse_response(content, request.crop_name())?;
        if !partial.has_required_content() {
            return Err(PipelineError::malformed(content.unwrap_or_default()));
        }

        Ok(validate(partial))
    }

    fn parameters(
        &self,
        request: &AdvisoryRequest,
    ) -> Result<ChatCompleteParameters<GenericMessage>, PipelineError> {
        match self.config.kind {
            AdvisoryKind::CropProfile => self.parameters_for(
                CropGuidePrompt::new(request.crop_name()),
                RESPONSE_SCHEMA_NAME,
            ),
            AdvisoryKind::FarmingGuide => self.parameters_for(
                FarmingGuidePrompt::new(request.crop_name()),
                GUIDE_SCHEMA_NAME,
            ),
        }
    }

    /// Template defaults first, then the configured overrides.
    fn parameters_for<P>(
        &self,
        prompt: P,
        schema_name: &str,
    ) -> Result<ChatCompleteParameters<GenericMessage>, PipelineError>
    where
        P: PromptTemplate + IntoPrompt<Message = GenericMessage>,
    {
        let response_format = match self.config.response_mode {
            ResponseMode::JsonObject => json_object_format(),
            ResponseMode::JsonSchema => json_schema_format::<P::Output>(schema_name)?,
        };

        let params = ChatCompleteParameters::from_template(prompt)
            .with_model(self.config.model())
            .with_temperature(self.config.temperature)
            .with_response_format(response_format);

        Ok(match self.config.max_tokens {
            Some(max_tokens) => params.with_max_tokens(max_tokens),
            None => params,
        })
    }
}

/// Offline answer for `crop_name`: the curated entry if one matches,
/// otherwise a record built from defaults.
///
/// A farming guide also gets the generic fertilizer schedule, tips,
/// irrigation and contact advice wherever the curated entry has none.
pub fn fallback(crop_name: &str, kind: AdvisoryKind) -> AdvisoryResult {
    let (partial, source) = match KnowledgeBase::global().entry_for(crop_name) {
        Some(partial) => {
            debug!(crop = crop_name, "matched curated entry");
            (partial, Provenance::CuratedDatabase)
        }
        None => (PartialRecord::new(crop_name), Provenance::GenericDefault),
    };

    let partial = match kind {
        AdvisoryKind::CropProfile => partial,
        AdvisoryKind::FarmingGuide => fill_guide_defaults(partial),
    };
    AdvisoryResult::new(validate(partial), source)
}

#[cfg(test)]
mod tests {
    use std::{future::Future, pin::Pin, sync::Mutex};

    use cropwise_core::{
        error::{CropwiseError, Result},
        generic::{GenericChatCompletionResponse, GenericRole, ResponseContent},
        model::Model,
    };
    use cropwise_types::{Field, FieldValue};

    use super::*;

    /// Answers with a fixed reply and remembers the last request.
    #[derive(Default)]
    struct Canned {
        reply: Option<&'static str>,
        seen: Mutex<Option<ChatCompleteParameters<GenericMessage>>>,
    }

    impl ChatCompletionProvider for Canned {
        type Message = GenericMessage;

        fn chat_complete<'p, M>(
            &self,
            params: ChatCompleteParameters<M>,
        ) -> Pin<
            Box<
                dyn Future<Output = Result<GenericChatCompletionResponse<GenericMessage>>>
                    + Send
                    + 'p,
            >,
        >
        where
            M: Into<Self::Message> + Clone + Send + Sync + 'p,
        {
            let generic = ChatCompleteParameters {
                messages: params.messages.into_iter().map(Into::into).collect(),
                model: params.model,
                temperature: params.temperature,
                max_tokens: params.max_tokens,
                response_format: params.response_format,
            };
            *self.seen.lock().unwrap() = Some(generic);

            let reply = self.reply;
            Box::pin(async move {
                match reply {
                    Some(text) => Ok(GenericChatCompletionResponse::new(ResponseContent::Finished(
                        GenericMessage::new(text.into(), GenericRole::Assistant),
                    ))),
                    None => Err(CropwiseError::Invalid("offline".into())),
                }
            })
        }
    }

    #[test]
    fn blank_crop_name_is_rejected() {
        assert!(matches!(AdvisoryRequest::new("   "), Err(PipelineError::EmptySubject)));
        assert_eq!(AdvisoryRequest::new("  Rice ").unwrap().crop_name(), "Rice");
    }

    #[tokio::test]
    async fn request_carries_generation_settings() {
        let advisor = CropAdvisor::new(Canned {
            reply: Some(r#"{"TYPE": "Pulse"}"#),
            ..Default::default()
        });

        let request = AdvisoryRequest::new("Chickpea").unwrap();
        advisor.request_record(&request).await.unwrap();

        let seen = advisor.backend().seen.lock().unwrap().take().unwrap();
        assert_eq!(seen.model, Model::from("llama-3.1-8b-instant"));
        assert_eq!(seen.temperature, Some(0.7));
        assert_eq!(seen.max_tokens, Some(1500));
        assert_eq!(seen.response_format, Some(json_object_format()));
        assert_eq!(seen.messages.len(), 1);
        assert!(seen.messages[0].text().unwrap().contains("\"Chickpea\""));
    }

    #[tokio::test]
    async fn schema_mode_sends_record_schema() {
        let config = GenerationConfig {
            response_mode: ResponseMode::JsonSchema,
            ..GenerationConfig::default()
        };
        let advisor = CropAdvisor::with_config(
            Canned {
                reply: Some(r#"{"TYPE": "Pulse"}"#),
                ..Default::default()
            },
            config,
        );

        advisor
            .request_record(&AdvisoryRequest::new("Lentil").unwrap())
            .await
            .unwrap();

        let seen = advisor.backend().seen.lock().unwrap().take().unwrap();
        let format = seen.response_format.unwrap();
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], RESPONSE_SCHEMA_NAME);
        assert_eq!(format["json_schema"]["strict"], true);
        assert!(format["json_schema"]["schema"]["properties"]["SOIL_PH"].is_object());
    }

    #[tokio::test]
    async fn reply_without_required_fields_is_malformed() {
        let advisor = CropAdvisor::new(Canned {
            reply: Some(r#"{"GREETING": "hello"}"#),
            ..Default::default()
        });

        let err = advisor
            .request_record(&AdvisoryRequest::new("Jute").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn transport_error_falls_back_to_curated_entry() {
        let advisor = CropAdvisor::new(Canned::default());

        let result = advisor.advise(&AdvisoryRequest::new("Wheat").unwrap()).await;
        assert!(!result.success());
        assert_eq!(result.source(), Provenance::CuratedDatabase);
        assert_eq!(result.record().get(Field::ScientificName), "Triticum aestivum");
    }

    #[test]
    fn fallback_without_match_is_generic() {
        let result = fallback("Saffron", AdvisoryKind::CropProfile);
        assert!(!result.success());
        assert_eq!(result.source(), Provenance::GenericDefault);
        assert_eq!(result.crop_name(), "Saffron");
        assert!(result.record().supplementary().is_empty());
    }

    #[tokio::test]
    async fn farming_guide_uses_guide_prompt_and_budget() {
        let config = GenerationConfig {
            kind: AdvisoryKind::FarmingGuide,
            response_mode: ResponseMode::JsonSchema,
            ..GenerationConfig::default()
        };
        let advisor = CropAdvisor::with_config(
            Canned {
                reply: Some(
                    r#"{"TYPE": "Cereal", "SEED_RATE": "100-125 kg/acre", "DISEASE_MANAGEMENT": {"treatment": "Propiconazole"}}"#,
                ),
                ..Default::default()
            },
            config,
        );

        let record = advisor
            .request_record(&AdvisoryRequest::new("Wheat").unwrap())
            .await
            .unwrap();
        assert_eq!(
            record.supplementary().get("SEED_RATE"),
            Some(&FieldValue::from("100-125 kg/acre"))
        );
        assert!(matches!(
            record.supplementary().get("DISEASE_MANAGEMENT"),
            Some(FieldValue::Nested(group)) if group.len() == 1
        ));

        let seen = advisor.backend().seen.lock().unwrap().take().unwrap();
        assert_eq!(seen.max_tokens, Some(2000));
        assert!(seen.messages[0].text().unwrap().contains("\"DISEASE_MANAGEMENT\": {"));
        let format = seen.response_format.unwrap();
        assert_eq!(format["json_schema"]["name"], GUIDE_SCHEMA_NAME);
        assert!(format["json_schema"]["schema"]["properties"]["PEST_MANAGEMENT"].is_object());
    }

    #[tokio::test]
    async fn configured_token_budget_overrides_the_prompt() {
        let config = GenerationConfig {
            max_tokens: Some(800),
            ..GenerationConfig::default()
        };
        let advisor = CropAdvisor::with_config(
            Canned {
                reply: Some(r#"{"TYPE": "Pulse"}"#),
                ..Default::default()
            },
            config,
        );

        advisor
            .request_record(&AdvisoryRequest::new("Moong").unwrap())
            .await
            .unwrap();
        let seen = advisor.backend().seen.lock().unwrap().take().unwrap();
        assert_eq!(seen.max_tokens, Some(800));
    }

    #[test]
    fn farming_guide_fallback_fills_generic_practice() {
        let generic = fallback("Saffron", AdvisoryKind::FarmingGuide);
        assert_eq!(generic.source(), Provenance::GenericDefault);
        let extras = generic.record().supplementary();
        let Some(FieldValue::Nested(schedule)) = extras.get("FERTILIZER_SCHEDULE") else {
            panic!("expected generic fertilizer schedule");
        };
        assert_eq!(
            schedule.get("basal").map(String::as_str),
            Some("10-15 tons FYM/acre + balanced NPK based on soil test")
        );
        assert!(matches!(extras.get("EXPERT_TIPS"), Some(FieldValue::List(tips)) if tips.len() == 4));
        assert_eq!(
            extras.get("CONTACT_HELP"),
            Some(&FieldValue::from(
                "Contact nearest Krishi Vigyan Kendra for crop-specific guidance"
            ))
        );

        let curated = fallback("Wheat", AdvisoryKind::FarmingGuide);
        assert_eq!(curated.source(), Provenance::CuratedDatabase);
        assert_eq!(
            curated.record().supplementary().get("CONTACT_HELP"),
            Some(&FieldValue::from("Wheat Research Stations, Agriculture Universities, KVKs"))
        );

        let potato = fallback("Potato", AdvisoryKind::FarmingGuide);
        assert_eq!(
            potato.record().supplementary().get("IRRIGATION_METHOD"),
            Some(&FieldValue::from("Drip irrigation recommended for water efficiency"))
        );
    }
}
