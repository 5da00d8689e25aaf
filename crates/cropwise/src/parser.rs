//! Extraction of a [`PartialRecord`] from raw model output.
//!
//! Replies are cleaned of markdown fences and a leading `JSON:` label, then
//! handed to each strategy in [`STRATEGIES`] until one accepts the text.
//! The last strategy accepts anything, so once a reply has content parsing
//! never fails; whether the result is useful is decided by the caller.
use std::{collections::BTreeMap, sync::LazyLock};

use cropwise_types::{
    CROP_NAME_KEY, Field, FieldValue, PartialRecord, canonical_key, is_guide_key,
};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::PipelineError;

/// A named extraction strategy. `None` means "not my format".
pub type Strategy = fn(&str) -> Option<PartialRecord>;

/// Strategies in the order they are tried.
pub const STRATEGIES: &[(&str, Strategy)] = &[("strict", parse_strict), ("lines", parse_lines)];

/// Parse the assistant's reply for `crop_name`.
///
/// Returns [`PipelineError::NoContent`] when `content` is missing or blank.
/// The crop name in the returned record is always `crop_name`, whatever the
/// model wrote.
pub fn parse_response(
    content: Option<&str>,
    crop_name: &str,
) -> Result<PartialRecord, PipelineError> {
    let raw = content
        .filter(|text| !text.trim().is_empty())
        .ok_or(PipelineError::NoContent)?;

    let cleaned = clean_content(raw);

    let (strategy, mut record) = STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(&cleaned).map(|record| (*name, record)))
        .ok_or_else(|| PipelineError::malformed(&cleaned))?;

    debug!(strategy, entries = record.len(), "extracted fields from reply");

    record.set_crop_name(crop_name);
    Ok(record)
}

/// Remove code fences and a leading `JSON:` label, then trim.
pub fn clean_content(raw: &str) -> String {
    static FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("valid regex"));
    static LABEL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^\s*json\s*:\s*").expect("valid regex"));

    let without_fences = FENCE_RE.replace_all(raw, "");
    let without_label = LABEL_RE.replace(&without_fences, "");
    without_label.trim().to_owned()
}

/// The whole text is one JSON object.
pub fn parse_strict(text: &str) -> Option<PartialRecord> {
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(text) else {
        return None;
    };

    let mut record = PartialRecord::default();
    for (key, value) in object {
        if let Some(value) = field_value(value) {
            record.insert(&key, value);
        }
    }

    Some(record)
}

/// Line-oriented `KEY: value` scraping. Always succeeds.
///
/// A `KEY: {` or `KEY: [` line opens a group; the lines that follow are its
/// members until the matching close, or the end of a truncated reply.
/// Structural tokens never become values.
pub fn parse_lines(text: &str) -> Option<PartialRecord> {
    let mut record = PartialRecord::default();
    let mut open: Option<OpenGroup> = None;

    for line in text.lines() {
        if let Some(group) = open.as_mut() {
            if group.feed(line) {
                if let Some(group) = open.take() {
                    group.close(&mut record);
                }
            }
            continue;
        }

        let Some(caps) = LINE_RE.captures(line) else {
            continue;
        };

        let key = canonical_key(&caps[1]);
        if key == CROP_NAME_KEY {
            continue;
        }

        let raw = trim_value(&caps[2]);
        if raw.starts_with(['{', '[']) {
            match raw {
                "{" => open = Some(OpenGroup::new(key, Members::Nested(BTreeMap::new()))),
                "[" => open = Some(OpenGroup::new(key, Members::List(Vec::new()))),
                _ => match serde_json::from_str::<Value>(raw).ok().and_then(field_value) {
                    Some(value) if !value.is_empty() => record.insert(&key, value),
                    _ => debug!(%key, "unparseable inline group, skipped"),
                },
            }
            continue;
        }

        let Some(value) = clean_value(raw) else {
            continue;
        };

        if Field::from_key(&key).is_some() || is_guide_key(&key) {
            record.insert(&key, value);
            continue;
        }

        match key.split_once('_') {
            Some((group, sub)) if !group.is_empty() && !sub.is_empty() && !sub.contains('_') => {
                if !record.insert_nested(group, sub, value.as_str()) {
                    debug!(%key, "nested entry collides with existing text, skipped");
                }
            }
            _ => record.insert(&key, value),
        }
    }

    if let Some(group) = open {
        debug!(key = %group.key, "reply ended inside a group");
        group.close(&mut record);
    }

    Some(record)
}

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*"?([A-Za-z_]+(?: +[A-Za-z_]+)*)"?\s*:\s*(.*)$"#).expect("valid regex")
});

/// A group opened by a `KEY: {` or `KEY: [` line.
#[derive(Debug)]
struct OpenGroup {
    key: String,
    members: Members,
    /// Inner groups entered and not yet left; their lines are skipped.
    depth: usize,
}

#[derive(Debug)]
enum Members {
    Nested(BTreeMap<String, String>),
    List(Vec<String>),
}

impl OpenGroup {
    fn new(key: String, members: Members) -> Self {
        Self {
            key,
            members,
            depth: 0,
        }
    }

    /// Take one line. Returns `true` once the group is closed.
    fn feed(&mut self, line: &str) -> bool {
        let body = trim_value(line);

        if body.starts_with(['}', ']']) {
            if self.depth == 0 {
                return true;
            }
            self.depth -= 1;
            return false;
        }
        if body.ends_with(['{', '[']) {
            self.depth += 1;
            return false;
        }
        if self.depth > 0 {
            return false;
        }

        // `"last item"]` closes the group on the member's own line.
        let (body, closes) = match body.strip_suffix(['}', ']']) {
            Some(rest) => (rest.trim_end(), true),
            None => (body, false),
        };

        match &mut self.members {
            Members::Nested(members) => {
                if let Some(caps) = LINE_RE.captures(body) {
                    if let Some(value) = clean_value(&caps[2]) {
                        members.insert(caps[1].trim().to_owned(), value);
                    }
                }
            }
            Members::List(items) => items.extend(clean_value(body)),
        }
        closes
    }

    /// Commit whatever was collected. Empty groups leave no entry.
    fn close(self, record: &mut PartialRecord) {
        match self.members {
            Members::Nested(members) if !members.is_empty() => {
                record.insert(&self.key, FieldValue::Nested(members))
            }
            Members::List(items) if !items.is_empty() => {
                record.insert(&self.key, FieldValue::List(items))
            }
            _ => {}
        }
    }
}

/// Trim and drop one trailing comma.
fn trim_value(raw: &str) -> &str {
    let value = raw.trim();
    value.strip_suffix(',').unwrap_or(value).trim_end()
}

/// Drop a trailing comma and surrounding quotes. Empty values, values
/// mentioning `undefined` and bare structural tokens are rejected.
fn clean_value(raw: &str) -> Option<String> {
    let value = trim_value(raw);
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value).trim();

    if value.is_empty()
        || value.chars().all(|c| matches!(c, '{' | '}' | '[' | ']' | ',') || c.is_whitespace())
        || value.to_lowercase().contains("undefined")
    {
        return None;
    }
    Some(value.to_owned())
}

/// JSON value as a record entry. `null` carries nothing.
fn field_value(value: Value) -> Option<FieldValue> {
    let value = match value {
        Value::Null => return None,
        Value::String(text) => FieldValue::Text(text),
        Value::Bool(_) | Value::Number(_) => FieldValue::Text(value.to_string()),
        Value::Array(items) => FieldValue::List(items.iter().filter_map(scalar_text).collect()),
        Value::Object(members) => FieldValue::Nested(
            members
                .iter()
                .filter_map(|(sub, value)| scalar_text(value).map(|text| (sub.clone(), text)))
                .collect::<BTreeMap<_, _>>(),
        ),
    };
    Some(value)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        _ => None,
    }
}
