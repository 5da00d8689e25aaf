//! The farming-guide extension of an advisory.
//!
//! A farming guide asks for everything an [`AdvisoryRecord`] holds plus
//! cultivation practice: flat detail entries, three nested sections and a
//! list of expert tips. None of it is required, so all of it travels in the
//! record's supplementary entries under the keys defined here.
use std::collections::BTreeMap;

use schemars::{
    JsonSchema,
    r#gen::SchemaGenerator,
    schema::{InstanceType, ObjectValidation, Schema, SchemaObject},
};

use crate::record::{AdvisoryRecord, FieldValue, PartialRecord};

/// Key of the expert tip list.
pub const EXPERT_TIPS_KEY: &str = "EXPERT_TIPS";

/// Flat practice entries as `(key, hint)`, in prompt order.
pub const GUIDE_DETAILS: [(&str, &str); 14] = [
    ("IRRIGATION_METHOD", "Best irrigation method with reasons"),
    ("IRRIGATION_SCHEDULE", "How often to irrigate"),
    ("GROWING_TECHNIQUES", "Best cultivation practices"),
    ("SPACING", "Plant spacing in cm"),
    ("SEED_RATE", "Seeds required per acre"),
    ("COST_OF_CULTIVATION", "Total cost per acre in ₹"),
    ("EXPECTED_PROFIT", "Expected profit per acre in ₹"),
    ("INTERCROPPING_OPTIONS", "Good companion crops"),
    ("PRUNING_TRAINING", "Pruning and training requirements"),
    ("HARVESTING_TECHNIQUE", "How to harvest properly"),
    ("POST_HARVEST", "Post-harvest handling"),
    ("GOVERNMENT_SCHEMES", "Relevant government schemes"),
    ("RISKS_CHALLENGES", "Major risks and challenges"),
    ("CONTACT_HELP", "Where to get help - specific offices"),
];

/// A nested group of a farming guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideSection {
    FertilizerSchedule,
    PestManagement,
    DiseaseManagement,
}

impl GuideSection {
    pub const ALL: [GuideSection; 3] = [
        GuideSection::FertilizerSchedule,
        GuideSection::PestManagement,
        GuideSection::DiseaseManagement,
    ];

    pub fn key(self) -> &'static str {
        match self {
            GuideSection::FertilizerSchedule => "FERTILIZER_SCHEDULE",
            GuideSection::PestManagement => "PEST_MANAGEMENT",
            GuideSection::DiseaseManagement => "DISEASE_MANAGEMENT",
        }
    }

    /// Sub-keys as `(key, hint)`. Sub-keys stay lower-case on the wire.
    pub fn parts(self) -> &'static [(&'static str, &'static str)] {
        match self {
            GuideSection::FertilizerSchedule => &[
                ("basal", "Fertilizer at planting time"),
                ("top_dressing", "Fertilizer during growth stages"),
                ("npk_ratio", "Recommended NPK ratio"),
                ("organic_options", "Organic fertilizer alternatives"),
            ],
            GuideSection::PestManagement => &[
                ("common_pests", "List common pests"),
                ("pesticides", "Specific pesticide names"),
                ("insecticides", "Specific insecticide names"),
                ("organic_control", "Organic pest control methods"),
            ],
            GuideSection::DiseaseManagement => &[
                ("common_diseases", "List common diseases"),
                ("prevention", "Disease prevention methods"),
                ("treatment", "Treatment options"),
            ],
        }
    }
}

/// `true` for the top-level keys a farming guide adds: details, sections
/// and the tip list.
pub fn is_guide_key(key: &str) -> bool {
    key == EXPERT_TIPS_KEY
        || GUIDE_DETAILS.iter().any(|(detail, _)| *detail == key)
        || GuideSection::ALL.iter().any(|section| section.key() == key)
}

/// Fill the guide entries a record lacks with generic advice: a soil-test
/// driven fertilizer schedule, the standard tips, drip irrigation and the
/// local KVK as contact. Entries already present are kept.
pub fn fill_guide_defaults(mut partial: PartialRecord) -> PartialRecord {
    let defaults: [(&str, FieldValue); 4] = [
        (
            GuideSection::FertilizerSchedule.key(),
            FieldValue::Nested(BTreeMap::from(
                [
                    ("basal", "10-15 tons FYM/acre + balanced NPK based on soil test"),
                    ("top_dressing", "Apply based on crop growth stage"),
                    ("npk_ratio", "Get soil test done for specific recommendations"),
                    ("organic_options", "Compost, vermicompost, green manure"),
                ]
                .map(|(key, value)| (key.to_owned(), value.to_owned())),
            )),
        ),
        (
            EXPERT_TIPS_KEY,
            FieldValue::List(
                [
                    "Get soil testing done before planting",
                    "Use certified quality seeds",
                    "Follow integrated pest management",
                    "Maintain proper records of inputs and outputs",
                ]
                .map(str::to_owned)
                .to_vec(),
            ),
        ),
        (
            "IRRIGATION_METHOD",
            FieldValue::from("Drip irrigation recommended for water efficiency"),
        ),
        (
            "CONTACT_HELP",
            FieldValue::from("Contact nearest Krishi Vigyan Kendra for crop-specific guidance"),
        ),
    ];

    for (key, value) in defaults {
        if partial.get(key).is_none() {
            partial.insert(key, value);
        }
    }
    partial
}

/// Reply shape of a farming guide: the advisory record's schema widened with
/// every detail, section and the tip list. Used only as a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarmingGuide;

impl JsonSchema for FarmingGuide {
    fn schema_name() -> String {
        "FarmingGuide".to_owned()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let mut schema = AdvisoryRecord::json_schema(generator).into_object();

        let mut additions: Vec<(String, Schema)> = GUIDE_DETAILS
            .iter()
            .map(|(key, hint)| ((*key).to_owned(), described(generator, hint)))
            .collect();

        for section in GuideSection::ALL {
            let mut members = ObjectValidation::default();
            for (sub, hint) in section.parts() {
                members
                    .properties
                    .insert((*sub).to_owned(), described(generator, hint));
                members.required.insert((*sub).to_owned());
            }
            members.additional_properties = Some(Box::new(Schema::Bool(false)));

            let group = SchemaObject {
                instance_type: Some(InstanceType::Object.into()),
                object: Some(Box::new(members)),
                ..Default::default()
            };
            additions.push((section.key().to_owned(), group.into()));
        }

        additions.push((
            EXPERT_TIPS_KEY.to_owned(),
            generator.subschema_for::<Vec<String>>(),
        ));

        let object = schema.object();
        for (key, property) in additions {
            object.required.insert(key.clone());
            object.properties.insert(key, property);
        }
        schema.into()
    }
}

fn described(generator: &mut SchemaGenerator, hint: &str) -> Schema {
    let mut property = generator.subschema_for::<String>().into_object();
    property.metadata().description = Some(hint.to_owned());
    property.into()
}
