use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::record::AdvisoryRecord;

/// Where an advisory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Parsed from a live generative API reply.
    GenerativeApi,
    /// Taken from the curated offline table.
    CuratedDatabase,
    /// Synthesised entirely from defaults.
    GenericDefault,
}

impl Provenance {
    /// Short status line shown next to the advisory.
    pub fn message(self) -> &'static str {
        match self {
            Provenance::GenerativeApi => "Live advisory from generative API",
            Provenance::CuratedDatabase => "Using curated agricultural database",
            Provenance::GenericDefault => "Using generic agricultural defaults",
        }
    }

    /// Only live replies count as a successful request.
    pub fn is_success(self) -> bool {
        matches!(self, Provenance::GenerativeApi)
    }
}

/// The pipeline's output for one request.
///
/// Built once and never mutated; `success` and `message` are derived from
/// the provenance so they cannot disagree with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryResult {
    crop_name: String,
    success: bool,
    message: &'static str,
    data: AdvisoryRecord,
    #[serde(serialize_with = "serialize_iso8601")]
    timestamp: DateTime<Utc>,
    source: Provenance,
}

impl AdvisoryResult {
    /// Wrap `record`, stamping it with the current time.
    pub fn new(record: AdvisoryRecord, source: Provenance) -> Self {
        Self::at(record, source, Utc::now())
    }

    pub fn at(record: AdvisoryRecord, source: Provenance, timestamp: DateTime<Utc>) -> Self {
        Self {
            crop_name: record.crop_name().to_owned(),
            success: source.is_success(),
            message: source.message(),
            data: record,
            timestamp,
            source,
        }
    }

    pub fn crop_name(&self) -> &str {
        &self.crop_name
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        self.message
    }

    pub fn record(&self) -> &AdvisoryRecord {
        &self.data
    }

    pub fn into_record(self) -> AdvisoryRecord {
        self.data
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// ISO-8601 rendering with millisecond precision, e.g.
    /// `2024-06-01T08:30:00.000Z`.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn source(&self) -> Provenance {
        self.source
    }

    /// Equality that ignores when the result was produced.
    pub fn same_advice(&self, other: &AdvisoryResult) -> bool {
        self.crop_name == other.crop_name
            && self.success == other.success
            && self.source == other.source
            && self.data == other.data
    }
}

fn serialize_iso8601<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
