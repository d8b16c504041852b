//! Declarative response shapes for structured generation output.
//!
//! Serializes to the generative-language schema dialect (uppercase type
//! tags) and is attached to a request as `generationConfig.responseSchema`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A response shape the service is asked to honor.
///
/// Built with [`ResponseSchema::string`], [`ResponseSchema::array`], and
/// [`ResponseSchema::object`]; serializes to e.g.
/// `{"type": "OBJECT", "properties": {...}, "required": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<ResponseSchema>>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "ordered_properties"
    )]
    properties: Vec<(String, ResponseSchema)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    required: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum SchemaType {
    String,
    Array,
    Object,
}

impl ResponseSchema {
    /// A plain string field.
    #[must_use]
    pub fn string() -> Self {
        Self {
            kind: SchemaType::String,
            items: None,
            properties: Vec::new(),
            required: Vec::new(),
        }
    }

    /// An array whose elements all follow `items`.
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self {
            kind: SchemaType::Array,
            items: Some(Box::new(items)),
            properties: Vec::new(),
            required: Vec::new(),
        }
    }

    /// An object with named properties, of which `required` must be present.
    ///
    /// Properties serialize in the order given.
    #[must_use]
    pub fn object(properties: Vec<(&str, Self)>, required: &[&str]) -> Self {
        Self {
            kind: SchemaType::Object,
            items: None,
            properties: properties
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
            required: required.iter().map(ToString::to_string).collect(),
        }
    }
}

fn ordered_properties<S>(
    properties: &[(String, ResponseSchema)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(properties.len()))?;
    for (name, schema) in properties {
        map.serialize_entry(name, schema)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ResponseSchema;

    #[test]
    fn string_schema_serializes_bare() {
        let value = serde_json::to_value(ResponseSchema::string()).unwrap();
        assert_eq!(value, json!({"type": "STRING"}));
    }

    #[test]
    fn object_schema_carries_properties_and_required() {
        let schema = ResponseSchema::object(
            vec![
                ("topic_name", ResponseSchema::string()),
                ("summary_paragraph", ResponseSchema::string()),
            ],
            &["topic_name", "summary_paragraph"],
        );
        let value = serde_json::to_value(schema).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "OBJECT",
                "properties": {
                    "topic_name": {"type": "STRING"},
                    "summary_paragraph": {"type": "STRING"}
                },
                "required": ["topic_name", "summary_paragraph"]
            })
        );
    }

    #[test]
    fn array_of_strings_nests_items() {
        let schema = ResponseSchema::object(
            vec![(
                "personality_keywords",
                ResponseSchema::array(ResponseSchema::string()),
            )],
            &["personality_keywords"],
        );
        let value = serde_json::to_value(schema).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "OBJECT",
                "properties": {
                    "personality_keywords": {
                        "type": "ARRAY",
                        "items": {"type": "STRING"}
                    }
                },
                "required": ["personality_keywords"]
            })
        );
    }

    #[test]
    fn properties_keep_declaration_order() {
        let schema = ResponseSchema::object(
            vec![
                ("zebra", ResponseSchema::string()),
                ("apple", ResponseSchema::string()),
            ],
            &[],
        );
        let rendered = serde_json::to_string(&schema).unwrap();
        let zebra = rendered.find("zebra").unwrap();
        let apple = rendered.find("apple").unwrap();
        assert!(zebra < apple, "properties reordered: {rendered}");
    }
}
