//! Curated offline advisories used when the live path fails.
//!
//! The table is built once on first use and never changes afterwards, so it
//! can be shared by any number of concurrent requests.
use std::{collections::BTreeMap, sync::LazyLock};

use cropwise_types::{
    AdvisoryRecord, EXPERT_TIPS_KEY, FIELD_COUNT, Field, FieldValue, GuideSection, PartialRecord,
    validate,
};

#[derive(Debug)]
struct CuratedEntry {
    key: &'static str,
    record: PartialRecord,
}

/// Read-only table of curated crops, matched by substring in table order.
#[derive(Debug)]
pub struct KnowledgeBase {
    entries: Vec<CuratedEntry>,
}

static GLOBAL: LazyLock<KnowledgeBase> = LazyLock::new(KnowledgeBase::curated);

impl KnowledgeBase {
    /// The process-wide table.
    pub fn global() -> &'static KnowledgeBase {
        &GLOBAL
    }

    /// Curated record for the first table key contained in the lower-cased
    /// `crop_name`, renamed to `crop_name` and validated.
    ///
    /// Matching is first-wins in [`Self::keys`] order, so "sweet potato"
    /// resolves to the potato entry.
    pub fn lookup(&self, crop_name: &str) -> Option<AdvisoryRecord> {
        self.entry_for(crop_name).map(validate)
    }

    /// The matching curated entry before validation, renamed to
    /// `crop_name`. Same matching rules as [`Self::lookup`].
    pub fn entry_for(&self, crop_name: &str) -> Option<PartialRecord> {
        let lowered = crop_name.to_lowercase();

        self.entries
            .iter()
            .find(|entry| lowered.contains(entry.key))
            .map(|entry| {
                let mut record = entry.record.clone();
                record.set_crop_name(crop_name);
                record
            })
    }

    /// A record synthesised from defaults alone.
    pub fn generic(crop_name: &str) -> AdvisoryRecord {
        validate(PartialRecord::new(crop_name))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    fn curated() -> Self {
        Self {
            entries: vec![rice(), wheat(), tomato(), potato()],
        }
    }
}

fn entry(key: &'static str, display_name: &str, values: [&str; FIELD_COUNT]) -> CuratedEntry {
    let record = Field::ALL
        .into_iter()
        .zip(values)
        .fold(PartialRecord::new(display_name), |record, (field, value)| {
            record.with(field, value)
        });

    CuratedEntry { key, record }
}

fn nested(pairs: &[(&str, &str)]) -> FieldValue {
    FieldValue::Nested(
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn list(items: &[&str]) -> FieldValue {
    FieldValue::List(items.iter().map(|item| (*item).to_owned()).collect())
}

/// Cultivation practice of a curated crop, stored as farming-guide entries.
struct Practice {
    fertilizer: &'static [(&'static str, &'static str)],
    pests: &'static [(&'static str, &'static str)],
    diseases: &'static [(&'static str, &'static str)],
    details: &'static [(&'static str, &'static str)],
    tips: &'static [&'static str],
}

fn with_practice(mut entry: CuratedEntry, practice: Practice) -> CuratedEntry {
    let sections = [
        (GuideSection::FertilizerSchedule, practice.fertilizer),
        (GuideSection::PestManagement, practice.pests),
        (GuideSection::DiseaseManagement, practice.diseases),
    ];

    let record = sections
        .into_iter()
        .fold(entry.record, |record, (section, pairs)| {
            record.with_entry(section.key(), nested(pairs))
        });

    entry.record = practice
        .details
        .iter()
        .fold(record, |record, (key, value)| record.with_entry(key, *value))
        .with_entry(EXPERT_TIPS_KEY, list(practice.tips));
    entry
}

fn rice() -> CuratedEntry {
    let base = entry(
        "rice",
        "Rice",
        [
            "Cereal Grain",
            "Oryza sativa",
            "Poaceae",
            "130 kcal per 100g",
            "Rich in carbohydrates, thiamine, niacin, iron",
            "Kharif (June-November)",
            "June-July",
            "September-November",
            "90-150 days",
            "5.5-6.5",
            "Clayey loam",
            "High (1000-2000mm)",
            "20-35°C",
            "1500-2000mm",
            "Full sun",
            "Basmati, IR-64, Swarna",
            "₹25-60/kg",
            "Airtight containers, 12-15% moisture",
            "6 months to 2 years",
            "3-6 tons/hectare",
            "Blast, Bacterial blight, Sheath blight",
            "Stem borer, Brown plant hopper",
            "Energy source, gluten-free",
            "Staple food, rice flour, beer",
            "Rice feeds more than half of the world's population",
        ],
    );

    with_practice(
        base,
        Practice {
            fertilizer: &[
                ("basal", "10-12 tons FYM/acre + 60kg N, 40kg P2O5, 40kg K2O"),
                ("top_dressing", "30kg N at tillering, 30kg N at panicle initiation"),
                ("npk_ratio", "120:60:40 kg/ha"),
                ("organic_options", "Green manure, compost, vermicompost"),
            ],
            pests: &[
                ("common_pests", "Stem borer, Brown plant hopper, Rice bug"),
                ("pesticides", "Carbendazim for blast, Validamycin for sheath blight"),
                (
                    "insecticides",
                    "Imidacloprid 17.8% SL for BPH, Chlorpyriphos 20% EC for stem borer",
                ),
                (
                    "organic_control",
                    "Neem oil spray, release Trichogramma wasps, use light traps",
                ),
            ],
            diseases: &[
                ("common_diseases", "Blast, Bacterial blight, Sheath blight, Tungro"),
                (
                    "prevention",
                    "Use resistant varieties, balanced fertilization, proper spacing",
                ),
                ("treatment", "Apply appropriate fungicides at first symptom appearance"),
            ],
            details: &[
                (
                    "IRRIGATION_METHOD",
                    "Flood irrigation or Alternate Wetting and Drying (AWD)",
                ),
                ("IRRIGATION_SCHEDULE", "Maintain 2-5cm standing water"),
                (
                    "GROWING_TECHNIQUES",
                    "System of Rice Intensification (SRI), transplant 12-15 day old seedlings",
                ),
                ("SPACING", "20cm x 20cm for SRI, 15cm x 10cm conventional"),
                (
                    "SEED_RATE",
                    "20-25 kg/acre for transplanting, 80-100 kg/acre for direct seeding",
                ),
                ("COST_OF_CULTIVATION", "₹25,000 - ₹35,000 per acre"),
                ("EXPECTED_PROFIT", "₹40,000 - ₹60,000 per acre"),
                ("INTERCROPPING_OPTIONS", "Rice + fish, Rice + azolla, Rice + duck"),
                ("PRUNING_TRAINING", "Not applicable for rice"),
                (
                    "HARVESTING_TECHNIQUE",
                    "Harvest when 80% grains turn yellow, moisture content 20-25%",
                ),
                ("POST_HARVEST", "Thresh immediately, dry to 12-14% moisture, clean and grade"),
                (
                    "GOVERNMENT_SCHEMES",
                    "PM-KISAN, Soil Health Card, MSP for paddy, Pradhan Mantri Krishi Sinchayee Yojana",
                ),
                (
                    "RISKS_CHALLENGES",
                    "Drought, floods, pest outbreaks, price volatility, climate change",
                ),
                (
                    "CONTACT_HELP",
                    "Nearest Krishi Vigyan Kendra, State Agriculture Department, Rice Research Stations",
                ),
            ],
            tips: &[
                "Use certified seeds of high-yielding varieties",
                "Maintain proper water management",
                "Practice integrated pest management",
                "Get soil testing done before planting",
            ],
        },
    )
}

fn wheat() -> CuratedEntry {
    let base = entry(
        "wheat",
        "Wheat",
        [
            "Cereal Grain",
            "Triticum aestivum",
            "Poaceae",
            "340 kcal per 100g",
            "Rich in carbohydrates, protein, dietary fiber, B vitamins",
            "Rabi (October-March)",
            "November-December",
            "March-April",
            "110-140 days",
            "6.0-7.0",
            "Well-drained loamy soil",
            "Medium (400-500mm)",
            "15-25°C during growth",
            "500-750mm",
            "Full sun, 6-8 hours daily",
            "HD-2967, PBW-343, Lok-1",
            "₹22-28/kg",
            "Clean, dry bins at 12-15°C, moisture below 12%",
            "6-12 months",
            "5-6 tons/hectare",
            "Rust, Karnal bunt, Loose smut, Powdery mildew",
            "Aphids, Armyworms, Termites, Pink stem borer",
            "Energy source, dietary fiber, supports digestion",
            "Flour, chapati, bread, semolina, animal feed",
            "Wheat is grown on more land area than any other food crop",
        ],
    );

    with_practice(
        base,
        Practice {
            fertilizer: &[
                ("basal", "10 tons FYM + 60kg N, 60kg P2O5, 40kg K2O per acre"),
                ("top_dressing", "40kg N at crown root, 40kg N at flowering"),
                ("npk_ratio", "120:60:40 kg/ha"),
                ("organic_options", "Farmyard manure, vermicompost, green manure"),
            ],
            pests: &[
                ("common_pests", "Aphids, Armyworms, Termites, Pink stem borer"),
                (
                    "pesticides",
                    "Propiconazole 25% EC for rust, Carbendazim 50% WP for loose smut",
                ),
                (
                    "insecticides",
                    "Imidacloprid 17.8% SL for aphids, Chlorpyriphos 20% EC for termites",
                ),
                (
                    "organic_control",
                    "Neem cake application, yellow sticky traps, biocontrol agents",
                ),
            ],
            diseases: &[
                ("common_diseases", "Rust, Karnal bunt, Loose smut, Powdery mildew"),
                (
                    "prevention",
                    "Use disease-free seeds, crop rotation, resistant varieties",
                ),
                ("treatment", "Apply recommended fungicides at disease appearance"),
            ],
            details: &[
                ("IRRIGATION_METHOD", "Border strip method or sprinkler irrigation"),
                (
                    "IRRIGATION_SCHEDULE",
                    "1st: Crown root (21 DAS), 2nd: Tillering (45 DAS), 3rd: Flowering (65 DAS), 4th: Grain filling (85 DAS)",
                ),
                (
                    "GROWING_TECHNIQUES",
                    "Zero tillage, raised bed planting, precision farming",
                ),
                ("SPACING", "22.5cm row to row"),
                ("SEED_RATE", "100-125 kg/acre"),
                ("COST_OF_CULTIVATION", "₹20,000 - ₹30,000 per acre"),
                ("EXPECTED_PROFIT", "₹30,000 - ₹40,000 per acre"),
                (
                    "INTERCROPPING_OPTIONS",
                    "Wheat + mustard, Wheat + chickpea, Wheat + barley",
                ),
                ("PRUNING_TRAINING", "Not required for wheat"),
                ("HARVESTING_TECHNIQUE", "Harvest when grains hard and moisture 15-20%"),
                ("POST_HARVEST", "Thresh, clean, dry to 12% moisture"),
                (
                    "GOVERNMENT_SCHEMES",
                    "MSP for wheat, PM-KISAN, Soil Health Card, National Food Security Mission",
                ),
                (
                    "RISKS_CHALLENGES",
                    "Terminal heat stress, frost, rust diseases, market price fluctuations",
                ),
                (
                    "CONTACT_HELP",
                    "Wheat Research Stations, Agriculture Universities, KVKs",
                ),
            ],
            tips: &[
                "Timely sowing before November 25",
                "Use seed treatment with fungicides",
                "Proper weed management",
                "Moisture conservation practices",
            ],
        },
    )
}

fn tomato() -> CuratedEntry {
    entry(
        "tomato",
        "Tomato",
        [
            "Fruit Vegetable",
            "Solanum lycopersicum",
            "Solanaceae",
            "18 kcal per 100g",
            "Vitamin C, Vitamin K, potassium, lycopene",
            "Winter-Summer",
            "February-March",
            "May-July",
            "70-90 days",
            "6.0-6.8",
            "Well-drained loam",
            "1-1.5 inches weekly",
            "21-24°C",
            "600-900mm",
            "Full sun (6-8 hours)",
            "Hybrid 626, Roma, Cherry",
            "₹20-40/kg",
            "Room temp until ripe, then refrigerate",
            "1-2 weeks fresh",
            "25-40 tons/hectare",
            "Blight, Blossom end rot, Fusarium wilt",
            "Whitefly, Aphids, Tomato hornworm",
            "Antioxidants, heart health, cancer prevention",
            "Fresh, sauces, ketchup, salads",
            "Tomatoes were once believed to be poisonous in Europe",
        ],
    )
}

fn potato() -> CuratedEntry {
    entry(
        "potato",
        "Potato",
        [
            "Tuber Vegetable",
            "Solanum tuberosum",
            "Solanaceae",
            "77 kcal per 100g",
            "Vitamin C, potassium, Vitamin B6, fiber",
            "Rabi (Winter)",
            "October-November",
            "January-February",
            "90-120 days",
            "5.0-6.5",
            "Sandy loam",
            "500-700mm",
            "15-20°C",
            "300-500mm",
            "Full sun",
            "Kufri Jyoti, Kufri Bahar",
            "₹15-25/kg",
            "4-7°C, dark, ventilated",
            "4-6 months cold storage",
            "20-35 tons/hectare",
            "Late blight, Early blight, Black scurf",
            "Colorado potato beetle, Aphids",
            "Antioxidants, digestive health",
            "Chips, fries, mashed, boiled",
            "Potatoes were the first vegetable grown in space",
        ],
    )
}
