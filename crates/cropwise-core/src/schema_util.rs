//! Helpers for turning Rust type information into JSON Schema that can be
//! shipped alongside a prompt. The JSON is produced with [`schemars`] and
//! forwarded to providers that support structured responses
//! (`response_format = json_schema`).

use schemars::{JsonSchema, r#gen::SchemaSettings};
use serde_json::{Value, json};

use crate::error::Result;

/// Generate a JSON Schema for the given `T` **inline**, i.e. without
/// `$ref` pointers to external definitions.
///
/// Most providers expect the entire schema object inside a single request.
///
/// # Example
///
/// ```
/// use cropwise_core::schema_util::derive_response_schema;
/// use schemars::JsonSchema;
///
/// #[derive(JsonSchema)]
/// struct Foo { bar: String }
///
/// let schema = derive_response_schema::<Foo>().unwrap();
/// assert_eq!(schema["type"], "object");
/// ```
pub fn derive_response_schema<T>() -> Result<Value>
where
    T: JsonSchema,
{
    let mut settings = SchemaSettings::draft07();
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let root = generator.into_root_schema_for::<T>();

    Ok(serde_json::to_value(root)?)
}

/// `response_format` asking for any syntactically valid JSON object.
pub fn json_object_format() -> Value {
    json!({ "type": "json_object" })
}

/// `response_format` pinning the reply to the schema of `T`.
pub fn json_schema_format<T>(name: &str) -> Result<Value>
where
    T: JsonSchema,
{
    let schema = derive_response_schema::<T>()?;
    Ok(json!({
        "type": "json_schema",
        "json_schema": {
            "name": name,
            "strict": true,
            "schema": schema,
        }
    }))
}
