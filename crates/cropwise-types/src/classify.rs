//! Coarse crop classification used to sharpen a handful of defaults.
//!
//! Matching is a case-insensitive substring test against a short keyword
//! list per class, so `"Basmati Rice"` is a grain and `"Alphonso mango"` a
//! fruit. A name may fall into several classes; callers walk them in
//! [`CropClass::ALL`] order.
use crate::record::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropClass {
    Grain,
    Vegetable,
    Fruit,
}

impl CropClass {
    /// Precedence order.
    pub const ALL: [CropClass; 3] = [CropClass::Grain, CropClass::Vegetable, CropClass::Fruit];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            CropClass::Grain => &["wheat", "rice", "corn", "barley"],
            CropClass::Vegetable => &["tomato", "potato", "onion", "carrot"],
            CropClass::Fruit => &["apple", "banana", "mango", "orange"],
        }
    }

    /// Value used for [`Field::Type`] when the class applies.
    pub fn label(self) -> &'static str {
        match self {
            CropClass::Grain => "cereal grain",
            CropClass::Vegetable => "vegetable",
            CropClass::Fruit => "fruit",
        }
    }

    pub fn matches(self, crop_name: &str) -> bool {
        let lowered = crop_name.to_lowercase();
        self.keywords()
            .iter()
            .any(|keyword| lowered.contains(keyword))
    }

    /// Every class whose keywords occur in `crop_name`, in precedence order.
    pub fn classify(crop_name: &str) -> Vec<CropClass> {
        CropClass::ALL
            .into_iter()
            .filter(|class| class.matches(crop_name))
            .collect()
    }

    /// The class-specific default for `field`, if this class has one.
    pub fn default_for(self, field: Field) -> Option<&'static str> {
        match (self, field) {
            (class, Field::Type) => Some(class.label()),
            (CropClass::Grain, Field::WaterRequirement) => Some("Medium to high water needs"),
            (CropClass::Vegetable, Field::ShelfLife) => Some("1-4 weeks fresh"),
            (CropClass::Fruit, Field::HealthBenefits) => Some("Rich in vitamins and antioxidants"),
            _ => None,
        }
    }
}
