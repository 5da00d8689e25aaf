//! Data model of the Cropwise pipeline: the required-field table, partial
//! and complete advisory records, crop classification, the validator that
//! turns one into the other, the provenance-tagged result, and the
//! farming-guide sections carried alongside the required fields.
pub mod classify;
pub mod guide;
pub mod record;
pub mod result;
pub mod validate;

pub use classify::CropClass;
pub use guide::{
    EXPERT_TIPS_KEY, FarmingGuide, GUIDE_DETAILS, GuideSection, fill_guide_defaults, is_guide_key,
};
pub use record::{
    AdvisoryRecord, CROP_NAME_KEY, FIELD_COUNT, Field, FieldValue, PartialRecord, canonical_key,
};
pub use result::{AdvisoryResult, Provenance};
pub use validate::{default_value, generic_default, validate};
