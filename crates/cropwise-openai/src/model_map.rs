use std::borrow::Cow;

use cropwise_core::model::{GroqModel, Model, OpenAiModel};

pub const LLAMA3_1_8B_INSTANT: &str = "llama-3.1-8b-instant";
pub const LLAMA3_3_70B_VERSATILE: &str = "llama-3.3-70b-versatile";
pub const GPT4_O_MINI: &str = "gpt-4o-mini";
pub const GPT4_O: &str = "gpt-4o";

/// Wire name of `model`. Blank custom names are rejected.
pub(crate) fn map_model(model: &Model) -> Option<Cow<'static, str>> {
    match model {
        Model::Custom(custom) if custom.trim().is_empty() => None,
        Model::Custom(custom) => Some(custom.clone()),
        Model::Groq(GroqModel::Llama3_1_8bInstant) => Some(LLAMA3_1_8B_INSTANT.into()),
        Model::Groq(GroqModel::Llama3_3_70bVersatile) => Some(LLAMA3_3_70B_VERSATILE.into()),
        Model::OpenAi(OpenAiModel::Gpt4o) => Some(GPT4_O.into()),
        Model::OpenAi(OpenAiModel::Gpt4oMini) => Some(GPT4_O_MINI.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_and_custom_models() {
        assert_eq!(
            map_model(&GroqModel::Llama3_1_8bInstant.into()).as_deref(),
            Some("llama-3.1-8b-instant")
        );
        assert_eq!(
            map_model(&OpenAiModel::Gpt4oMini.into()).as_deref(),
            Some("gpt-4o-mini")
        );
        assert_eq!(
            map_model(&Model::from("mixtral-8x7b")).as_deref(),
            Some("mixtral-8x7b")
        );
        assert_eq!(map_model(&Model::from("  ")), None);
    }
}
