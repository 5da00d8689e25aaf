//! Partial and complete advisory records.
//!
//! Two types, one direction:
//!
//! ```text
//! ┌───────────────┐   validate()   ┌────────────────┐
//! │ PartialRecord │ ─────────────► │ AdvisoryRecord │
//! └───────────────┘                └────────────────┘
//!   any key may be                   every Field holds
//!   missing or blank                 non-empty text
//! ```
//!
//! [`PartialRecord`] is what a parser or the curated table hands over.
//! [`AdvisoryRecord`] can only be produced by [`crate::validate::validate`],
//! so holding one is proof that the completeness invariant holds.
use std::collections::BTreeMap;

use schemars::{
    JsonSchema,
    r#gen::SchemaGenerator,
    schema::{InstanceType, ObjectValidation, Schema, SchemaObject},
};
use serde::{Serialize, Serializer, ser::SerializeMap};

/// Key of the identity field. Always holds the caller's crop name.
pub const CROP_NAME_KEY: &str = "CROP_NAME";

/// Number of required fields.
pub const FIELD_COUNT: usize = Field::ALL.len();

/// The fixed set of required top-level fields, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Type,
    ScientificName,
    Family,
    Calories,
    Nutrition,
    Season,
    PlantingTime,
    HarvestTime,
    CropDuration,
    SoilPh,
    SoilType,
    WaterRequirement,
    Temperature,
    Rainfall,
    Sunlight,
    CommonVarieties,
    MarketPrice,
    Storage,
    ShelfLife,
    Yield,
    CommonDiseases,
    PestProblems,
    HealthBenefits,
    Uses,
    FunFact,
}

impl Field {
    pub const ALL: [Field; 25] = [
        Field::Type,
        Field::ScientificName,
        Field::Family,
        Field::Calories,
        Field::Nutrition,
        Field::Season,
        Field::PlantingTime,
        Field::HarvestTime,
        Field::CropDuration,
        Field::SoilPh,
        Field::SoilType,
        Field::WaterRequirement,
        Field::Temperature,
        Field::Rainfall,
        Field::Sunlight,
        Field::CommonVarieties,
        Field::MarketPrice,
        Field::Storage,
        Field::ShelfLife,
        Field::Yield,
        Field::CommonDiseases,
        Field::PestProblems,
        Field::HealthBenefits,
        Field::Uses,
        Field::FunFact,
    ];

    /// Canonical wire key.
    pub fn key(self) -> &'static str {
        match self {
            Field::Type => "TYPE",
            Field::ScientificName => "SCIENTIFIC_NAME",
            Field::Family => "FAMILY",
            Field::Calories => "CALORIES",
            Field::Nutrition => "NUTRITION",
            Field::Season => "SEASON",
            Field::PlantingTime => "PLANTING_TIME",
            Field::HarvestTime => "HARVEST_TIME",
            Field::CropDuration => "CROP_DURATION",
            Field::SoilPh => "SOIL_PH",
            Field::SoilType => "SOIL_TYPE",
            Field::WaterRequirement => "WATER_REQUIREMENT",
            Field::Temperature => "TEMPERATURE",
            Field::Rainfall => "RAINFALL",
            Field::Sunlight => "SUNLIGHT",
            Field::CommonVarieties => "COMMON_VARIETIES",
            Field::MarketPrice => "MARKET_PRICE",
            Field::Storage => "STORAGE",
            Field::ShelfLife => "SHELF_LIFE",
            Field::Yield => "YIELD",
            Field::CommonDiseases => "COMMON_DISEASES",
            Field::PestProblems => "PEST_PROBLEMS",
            Field::HealthBenefits => "HEALTH_BENEFITS",
            Field::Uses => "USES",
            Field::FunFact => "FUN_FACT",
        }
    }

    /// Placeholder text shown to the model in the reply template.
    pub fn hint(self) -> &'static str {
        match self {
            Field::Type => "e.g., Fruit/Vegetable/Grain/Legume/Nut/Herb/Spice/Commercial Crop",
            Field::ScientificName => "Scientific name",
            Field::Family => "Plant family",
            Field::Calories => "Calories per 100g or 'Not applicable' for non-food crops",
            Field::Nutrition => "Key nutrients if edible, otherwise growing requirements",
            Field::Season => "Growing season in India",
            Field::PlantingTime => "Best planting time",
            Field::HarvestTime => "Harvest time",
            Field::CropDuration => "Growth duration in days/months",
            Field::SoilPh => "Ideal soil pH range",
            Field::SoilType => "Preferred soil type",
            Field::WaterRequirement => "Water needs - low/medium/high or mm/acre",
            Field::Temperature => "Optimal temperature range",
            Field::Rainfall => "Rainfall requirement",
            Field::Sunlight => "Sunlight needs - full sun/partial shade",
            Field::CommonVarieties => "Common varieties in India",
            Field::MarketPrice => "Current market price range in ₹",
            Field::Storage => "Storage conditions",
            Field::ShelfLife => "Shelf life",
            Field::Yield => "Average yield per acre/hectare",
            Field::CommonDiseases => "Common diseases",
            Field::PestProblems => "Common pests",
            Field::HealthBenefits => "Health benefits if edible",
            Field::Uses => "Primary uses - food/industry/medicinal/etc.",
            Field::FunFact => "One interesting fact",
        }
    }

    /// Look up a field by its canonical key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Normalise a raw key: trim, upper-case, and turn spaces and hyphens into
/// underscores (`"soil ph"` → `"SOIL_PH"`).
pub fn canonical_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// A single value as it came out of the model or the curated table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Nested(BTreeMap<String, String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Blank text, an empty list or an empty group.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Nested(members) => members.is_empty(),
        }
    }

    /// Text that is not blank; the only shape accepted for a required field.
    pub fn usable_text(&self) -> Option<&str> {
        self.as_text().filter(|text| !text.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Record with every entry optional. Keys are canonical.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialRecord {
    crop_name: String,
    entries: BTreeMap<String, FieldValue>,
}

impl PartialRecord {
    pub fn new(crop_name: impl Into<String>) -> Self {
        Self {
            crop_name: crop_name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn crop_name(&self) -> &str {
        &self.crop_name
    }

    /// Replace the identity; whatever the source claimed is discarded.
    pub fn set_crop_name(&mut self, crop_name: impl Into<String>) {
        self.crop_name = crop_name.into();
    }

    /// Insert or replace an entry. The key is canonicalised; the identity
    /// key is ignored since the crop name is carried separately.
    pub fn insert(&mut self, key: &str, value: impl Into<FieldValue>) {
        let key = canonical_key(key);
        if key.is_empty() || key == CROP_NAME_KEY {
            return;
        }
        self.entries.insert(key, value.into());
    }

    /// Insert `value` under `group.sub`. Returns `false` when `group`
    /// already holds a non-nested value, which is left untouched.
    pub fn insert_nested(&mut self, group: &str, sub: &str, value: impl Into<String>) -> bool {
        let group = canonical_key(group);
        if group.is_empty() || group == CROP_NAME_KEY {
            return false;
        }

        let slot = self
            .entries
            .entry(group)
            .or_insert_with(|| FieldValue::Nested(BTreeMap::new()));

        match slot {
            FieldValue::Nested(map) => {
                map.insert(canonical_key(sub), value.into());
                true
            }
            _ => false,
        }
    }

    /// Builder-style [`Self::insert`] for a required field.
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.insert(field.key(), value);
        self
    }

    /// Builder-style [`Self::insert`] for any key.
    pub fn with_entry(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.get(key)
    }

    pub fn get_field(&self, field: Field) -> Option<&FieldValue> {
        self.get(field.key())
    }

    /// Non-blank text for `field`, if supplied.
    pub fn usable(&self, field: Field) -> Option<&str> {
        self.get_field(field).and_then(FieldValue::usable_text)
    }

    /// `true` when at least one required field carries usable text.
    pub fn has_required_content(&self) -> bool {
        Field::ALL.into_iter().any(|field| self.usable(field).is_some())
    }

    pub fn entries(&self) -> &BTreeMap<String, FieldValue> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, BTreeMap<String, FieldValue>) {
        (self.crop_name, self.entries)
    }
}

/// A complete advisory: every [`Field`] holds non-empty text.
///
/// Serialises to one flat JSON object: `CROP_NAME`, the required keys in
/// [`Field::ALL`] order, then any supplementary entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryRecord {
    crop_name: String,
    values: [String; FIELD_COUNT],
    supplementary: BTreeMap<String, FieldValue>,
}

impl AdvisoryRecord {
    pub(crate) fn from_parts(
        crop_name: String,
        values: [String; FIELD_COUNT],
        supplementary: BTreeMap<String, FieldValue>,
    ) -> Self {
        Self {
            crop_name,
            values,
            supplementary,
        }
    }

    pub fn crop_name(&self) -> &str {
        &self.crop_name
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// All required fields with their values, in [`Field::ALL`] order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }

    /// Entries beyond the required set (nested schedules, tip lists, …).
    pub fn supplementary(&self) -> &BTreeMap<String, FieldValue> {
        &self.supplementary
    }
}

impl Serialize for AdvisoryRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1 + FIELD_COUNT + self.supplementary.len()))?;
        map.serialize_entry(CROP_NAME_KEY, &self.crop_name)?;
        for (field, value) in self.fields() {
            map.serialize_entry(field.key(), value)?;
        }
        for (key, value) in &self.supplementary {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Schema of the reply the model is asked for: the identity plus every
/// required field as a described string.
impl JsonSchema for AdvisoryRecord {
    fn schema_name() -> String {
        "AdvisoryRecord".to_owned()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        let mut object = ObjectValidation::default();

        let described = std::iter::once((CROP_NAME_KEY, "Name of the crop"))
            .chain(Field::ALL.into_iter().map(|field| (field.key(), field.hint())));

        for (key, hint) in described {
            let mut property = generator.subschema_for::<String>().into_object();
            property.metadata().description = Some(hint.to_owned());
            object.properties.insert(key.to_owned(), property.into());
            object.required.insert(key.to_owned());
        }
        object.additional_properties = Some(Box::new(Schema::Bool(false)));

        SchemaObject {
            instance_type: Some(InstanceType::Object.into()),
            object: Some(Box::new(object)),
            ..Default::default()
        }
        .into()
    }
}
