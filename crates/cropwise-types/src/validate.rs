//! Completion of partial records.
//!
//! [`validate`] is the only way to obtain an [`AdvisoryRecord`]. It keeps
//! every required field the source supplied as non-blank text and fills the
//! rest from [`default_value`]. It cannot fail: every field has a static
//! fallback.
use tracing::debug;

use crate::{
    classify::CropClass,
    record::{AdvisoryRecord, Field, PartialRecord},
};

/// Default for `field` that ignores the crop entirely.
pub fn generic_default(field: Field) -> &'static str {
    match field {
        Field::Type => "Agricultural Crop",
        Field::ScientificName => "Information not available",
        Field::Family => "Various",
        Field::Calories => "Varies by variety",
        Field::Nutrition => "Rich in essential nutrients",
        Field::Season => "Depends on region and climate",
        Field::PlantingTime => "Season dependent",
        Field::HarvestTime => "Season dependent",
        Field::CropDuration => "90-180 days",
        Field::SoilPh => "6.0-7.0 (optimal)",
        Field::SoilType => "Well-drained fertile soil",
        Field::WaterRequirement => "Regular irrigation needed",
        Field::Temperature => "Warm climate preferred",
        Field::Rainfall => "Adequate rainfall required",
        Field::Sunlight => "Full sun preferred",
        Field::CommonVarieties => "Various local and hybrid varieties",
        Field::MarketPrice => "Varies by market and quality",
        Field::Storage => "Cool, dry, well-ventilated area",
        Field::ShelfLife => "Depends on storage conditions",
        Field::Yield => "Varies by cultivation practices",
        Field::CommonDiseases => "Regular monitoring recommended",
        Field::PestProblems => "Use integrated pest management",
        Field::HealthBenefits => "Promotes overall health",
        Field::Uses => "Food, commercial, or industrial uses",
        Field::FunFact => "Important agricultural commodity worldwide",
    }
}

/// Default for `field` given the crop's name: the first matching class
/// with an opinion on the field wins, otherwise the generic default.
pub fn default_value(field: Field, crop_name: &str) -> &'static str {
    default_for_classes(field, &CropClass::classify(crop_name))
}

fn default_for_classes(field: Field, classes: &[CropClass]) -> &'static str {
    classes
        .iter()
        .find_map(|class| class.default_for(field))
        .unwrap_or_else(|| generic_default(field))
}

/// Turn a partial record into a complete one.
///
/// Required fields holding non-blank text are kept verbatim; anything else
/// (missing, blank, a list, a nested map) is replaced by its default.
/// Entries outside the required set are carried over as supplementary data.
pub fn validate(partial: PartialRecord) -> AdvisoryRecord {
    let (crop_name, mut entries) = partial.into_parts();
    let classes = CropClass::classify(&crop_name);

    let mut defaulted = Vec::new();
    let values = Field::ALL.map(|field| {
        let supplied = entries
            .remove(field.key())
            .and_then(|value| value.usable_text().map(str::to_owned));

        supplied.unwrap_or_else(|| {
            defaulted.push(field.key());
            default_for_classes(field, &classes).to_owned()
        })
    });

    if !defaulted.is_empty() {
        debug!(crop = %crop_name, fields = ?defaulted, "filled missing fields with defaults");
    }

    AdvisoryRecord::from_parts(crop_name, values, entries)
}
