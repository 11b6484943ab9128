//! The `serialization` block shared by inputs and outputs.

use super::sdk::{AvroProperties, CsvProperties, JsonProperties, Serialization};
use crate::error::{Error, Result};
use crate::schema::{Attribute, Schema, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const SERIALIZATION_TYPES: &[&str] = &["Avro", "Csv", "Json"];
pub const FIELD_DELIMITERS: &[&str] = &[" ", ",", "\t", "|", ";"];
pub const ENCODINGS: &[&str] = &["UTF8"];
pub const JSON_FORMATS: &[&str] = &["Array", "LineSeparated"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializationModel {
    #[serde(rename = "type")]
    pub serialization_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Exactly one block. Outputs additionally accept `format` for Json.
pub fn serialization_schema(with_format: bool) -> Attribute {
    let mut schema = Schema::new()
        .attr(
            "type",
            Attribute::string()
                .required()
                .validate_with(Validation::StringInSlice(SERIALIZATION_TYPES)),
        )
        .attr(
            "field_delimiter",
            Attribute::string()
                .optional()
                .validate_with(Validation::StringInSlice(FIELD_DELIMITERS)),
        )
        .attr(
            "encoding",
            Attribute::string()
                .optional()
                .validate_with(Validation::StringInSlice(ENCODINGS)),
        );
    if with_format {
        schema = schema.attr(
            "format",
            Attribute::string()
                .optional()
                .validate_with(Validation::StringInSlice(JSON_FORMATS)),
        );
    }
    Attribute::block(schema).required().min_items(1).max_items(1)
}

/// Build the API serialization, enforcing which settings each type takes.
pub fn expand_serialization(target: &str, input: &[SerializationModel]) -> Result<Serialization> {
    let Some(block) = input.first() else {
        return Err(Error::validation(target, "serialization: a serialization block is required"));
    };

    let mut messages = Vec::new();
    let mut require = |field: &str, value: &Option<String>| {
        if value.as_deref().map_or(true, str::is_empty) {
            messages.push(format!(
                "serialization.0.{}: required when type is {:?}",
                field, block.serialization_type
            ));
        }
    };
    let serialization = match block.serialization_type.as_str() {
        "Avro" => Serialization::Avro {
            properties: Some(AvroProperties::default()),
        },
        "Csv" => {
            require("field_delimiter", &block.field_delimiter);
            require("encoding", &block.encoding);
            Serialization::Csv {
                properties: Some(CsvProperties {
                    field_delimiter: block.field_delimiter.clone(),
                    encoding: block.encoding.clone(),
                }),
            }
        },
        "Json" => {
            require("encoding", &block.encoding);
            Serialization::Json {
                properties: Some(JsonProperties {
                    encoding: block.encoding.clone(),
                    format: block.format.clone(),
                }),
            }
        },
        other => {
            return Err(Error::validation(
                target,
                format!("serialization.0.type: unsupported serialization type {:?}", other),
            ))
        },
    };

    let forbid = |field: &str, value: &Option<String>, messages: &mut Vec<String>| {
        if value.is_some() {
            messages.push(format!(
                "serialization.0.{}: cannot be set when type is {:?}",
                field, block.serialization_type
            ));
        }
    };
    match block.serialization_type.as_str() {
        "Avro" => {
            forbid("field_delimiter", &block.field_delimiter, &mut messages);
            forbid("encoding", &block.encoding, &mut messages);
            forbid("format", &block.format, &mut messages);
        },
        "Csv" => forbid("format", &block.format, &mut messages),
        _ => forbid("field_delimiter", &block.field_delimiter, &mut messages),
    }

    if messages.is_empty() {
        Ok(serialization)
    } else {
        Err(Error::Validation {
            target: target.to_string(),
            messages,
        })
    }
}

/// An absent block flattens to nothing; a type this crate cannot represent is an error.
pub fn flatten_serialization(
    id: &impl Display,
    input: Option<&Serialization>,
) -> Result<Vec<SerializationModel>> {
    let model = match input {
        Some(Serialization::Avro { .. }) => SerializationModel {
            serialization_type: "Avro".to_string(),
            ..SerializationModel::default()
        },
        Some(Serialization::Csv { properties }) => {
            let props = properties.clone().unwrap_or_default();
            SerializationModel {
                serialization_type: "Csv".to_string(),
                field_delimiter: props.field_delimiter,
                encoding: props.encoding,
                format: None,
            }
        },
        Some(Serialization::Json { properties }) => {
            let props = properties.clone().unwrap_or_default();
            SerializationModel {
                serialization_type: "Json".to_string(),
                field_delimiter: None,
                encoding: props.encoding,
                format: props.format,
            }
        },
        Some(Serialization::Unsupported) => {
            return Err(Error::Deserialization {
                message: format!("{} uses an unsupported serialization type", id),
                body: String::new(),
            })
        },
        None => return Ok(Vec::new()),
    };
    Ok(vec![model])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(kind: &str, delimiter: Option<&str>, encoding: Option<&str>) -> SerializationModel {
        SerializationModel {
            serialization_type: kind.to_string(),
            field_delimiter: delimiter.map(str::to_string),
            encoding: encoding.map(str::to_string),
            format: None,
        }
    }

    #[test]
    fn test_csv_requires_delimiter_and_encoding() {
        let err = expand_serialization("t", &[block("Csv", None, None)]).unwrap_err();
        match err {
            Error::Validation { messages, .. } => {
                assert_eq!(messages.len(), 2);
                assert!(messages[0].contains("field_delimiter"));
            },
            other => panic!("unexpected error {:?}", other),
        }

        let ok = expand_serialization("t", &[block("Csv", Some(","), Some("UTF8"))]).unwrap();
        assert_eq!(
            serde_json::to_value(ok).unwrap(),
            json!({"type": "Csv", "properties": {"fieldDelimiter": ",", "encoding": "UTF8"}})
        );
    }

    #[test]
    fn test_json_requires_encoding_only() {
        assert!(expand_serialization("t", &[block("Json", None, None)]).is_err());
        assert!(expand_serialization("t", &[block("Json", Some(","), Some("UTF8"))]).is_err());
        assert!(expand_serialization("t", &[block("Json", None, Some("UTF8"))]).is_ok());
    }

    #[test]
    fn test_avro_takes_no_settings() {
        assert!(expand_serialization("t", &[block("Avro", None, None)]).is_ok());
        let err = expand_serialization("t", &[block("Avro", None, Some("UTF8"))]).unwrap_err();
        assert!(err.to_string().contains("cannot be set when type is \"Avro\""));
    }

    #[test]
    fn test_missing_block_is_an_error() {
        assert!(expand_serialization("t", &[]).is_err());
    }

    #[test]
    fn test_flatten_serialization() {
        assert!(flatten_serialization(&"in1", None).unwrap().is_empty());

        let json = Serialization::Json {
            properties: Some(JsonProperties {
                encoding: Some("UTF8".to_string()),
                format: Some("LineSeparated".to_string()),
            }),
        };
        let flattened = flatten_serialization(&"in1", Some(&json)).unwrap();
        assert_eq!(flattened[0].serialization_type, "Json");
        assert_eq!(flattened[0].format.as_deref(), Some("LineSeparated"));

        let csv = Serialization::Csv { properties: None };
        assert_eq!(flatten_serialization(&"in1", Some(&csv)).unwrap()[0].encoding, None);
    }

    #[test]
    fn test_flatten_unknown_serialization_type_is_an_error() {
        let parsed: Serialization = serde_json::from_value(json!({"type": "Parquet"})).unwrap();
        assert_eq!(parsed, Serialization::Unsupported);

        let err = flatten_serialization(&"in1", Some(&parsed)).unwrap_err();
        match err {
            Error::Deserialization { message, .. } => {
                assert_eq!(message, "in1 uses an unsupported serialization type");
            },
            other => panic!("unexpected error {:?}", other),
        }
    }
}
