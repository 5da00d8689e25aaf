use cropwise_core::{
    generic::{GenericMessage, GenericRole},
    model::{GroqModel, Model},
    template::{IntoPrompt, PromptTemplate},
};
use cropwise_prompt::PromptBuilder;
use cropwise_types::{
    AdvisoryRecord, CROP_NAME_KEY, EXPERT_TIPS_KEY, FarmingGuide, Field, GUIDE_DETAILS,
    GuideSection,
};

const RULES: [&str; 5] = [
    "Return ONLY valid JSON, no explanations or markdown.",
    "If information is not available, use \"Information not available\" instead of omitting the field.",
    "For non-food crops, fill the nutrition and calorie fields with growing requirements or \"Not applicable\".",
    "Keep every answer practical for Indian farmers.",
    "Use metric units and Indian currency (₹).",
];

/// Asks the model for a complete advisory on one crop as a flat JSON
/// object with every required field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropGuidePrompt {
    crop_name: String,
}

impl CropGuidePrompt {
    pub fn new(crop_name: impl Into<String>) -> Self {
        Self {
            crop_name: crop_name.into(),
        }
    }

    pub fn crop_name(&self) -> &str {
        &self.crop_name
    }

    /// Render the prompt text. Same crop name, same text.
    pub fn render(&self) -> String {
        PromptBuilder::new()
            .add_line(format_args!(
                "You are an agricultural expert. Provide complete information about \"{}\" in this exact JSON format:",
                self.crop_name
            ))
            .add_blank_line()
            .add_text_json(self.json_template())
            .add_blank_line()
            .add_section_h2("Rules")
            .add_numbered_list(RULES)
            .finalize()
    }

    fn json_template(&self) -> String {
        json_template(&self.crop_name, std::iter::empty())
    }
}

impl IntoPrompt for CropGuidePrompt {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        vec![GenericMessage::new(self.render(), GenericRole::User)]
    }
}

impl PromptTemplate for CropGuidePrompt {
    type Output = AdvisoryRecord;
    const MODEL: Model = Model::Groq(GroqModel::Llama3_1_8bInstant);
}

const GUIDE_INSTRUCTIONS: [&str; 9] = [
    "Provide practical, actionable advice for Indian farmers.",
    "Include current market prices.",
    "Recommend specific pesticide and insecticide brand names.",
    "Include cost and profit calculations.",
    "Use metric units (acres, kg, liters).",
    "Mention organic alternatives.",
    "Include government support schemes.",
    "Be specific with quantities and timings.",
    "Make information region-specific for India.",
];

/// Asks for a full farming guide: every required field plus irrigation,
/// fertilizer, pest and disease practice, economics and expert tips.
///
/// The larger reply gets a larger token budget than [`CropGuidePrompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmingGuidePrompt {
    crop_name: String,
}

impl FarmingGuidePrompt {
    pub fn new(crop_name: impl Into<String>) -> Self {
        Self {
            crop_name: crop_name.into(),
        }
    }

    pub fn crop_name(&self) -> &str {
        &self.crop_name
    }

    pub fn render(&self) -> String {
        PromptBuilder::new()
            .add_line(format_args!(
                "You are an expert farming advisor for Indian farmers. Provide comprehensive farming information for \"{}\" in this exact JSON format:",
                self.crop_name
            ))
            .add_blank_line()
            .add_text_json(self.json_template())
            .add_blank_line()
            .add_section_h2("Instructions")
            .add_numbered_list(RULES.into_iter().take(2).chain(GUIDE_INSTRUCTIONS))
            .finalize()
    }

    fn json_template(&self) -> String {
        let details = GUIDE_DETAILS
            .iter()
            .map(|(key, hint)| text_line(key, hint));

        let sections = GuideSection::ALL.iter().map(|section| {
            let members = section
                .parts()
                .iter()
                .map(|(sub, hint)| format!("  {}", text_line(sub, hint)))
                .collect::<Vec<_>>()
                .join(",\n");
            format!("  \"{}\": {{\n{members}\n  }}", section.key())
        });

        let tips = format!("  \"{EXPERT_TIPS_KEY}\": [\"Tip 1\", \"Tip 2\", \"Tip 3\"]");

        json_template(
            &self.crop_name,
            details.chain(sections).chain(std::iter::once(tips)),
        )
    }
}

impl IntoPrompt for FarmingGuidePrompt {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        vec![GenericMessage::new(self.render(), GenericRole::User)]
    }
}

impl PromptTemplate for FarmingGuidePrompt {
    type Output = FarmingGuide;
    const MODEL: Model = Model::Groq(GroqModel::Llama3_1_8bInstant);
    const MAX_TOKENS: u32 = 2000;
}

/// The identity line, every required field, then `extra` lines.
fn json_template(crop_name: &str, extra: impl IntoIterator<Item = String>) -> String {
    let mut lines = vec![format!("  \"{CROP_NAME_KEY}\": \"{crop_name}\"")];
    lines.extend(
        Field::ALL
            .iter()
            .map(|field| text_line(field.key(), field.hint())),
    );
    lines.extend(extra);
    format!("{{\n{}\n}}", lines.join(",\n"))
}

fn text_line(key: &str, hint: &str) -> String {
    format!("  \"{key}\": \"[{hint}]\"")
}
