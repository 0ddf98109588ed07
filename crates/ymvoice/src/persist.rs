//! Tagged JSON persistence for voice records.
//!
//! Records are stored as plain JSON objects with an extra `"__type"` key naming
//! the record kind. Loading accepts a missing key but rejects a foreign one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::VoiceError;

/// Discriminant key written next to the record fields.
pub const TYPE_KEY: &str = "__type";

/// Serializes `record` to a JSON object carrying `type_name` under [`TYPE_KEY`].
pub fn to_tagged_json<T: Serialize>(record: &T, type_name: &str) -> Result<String, VoiceError> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(ref mut map) = value {
        map.insert(TYPE_KEY.to_string(), Value::String(type_name.to_string()));
    }
    Ok(serde_json::to_string(&value)?)
}

/// Parses a tagged JSON object, failing when the discriminant is not `type_name`.
pub fn from_tagged_json<T: DeserializeOwned>(
    json: &str,
    type_name: &'static str,
) -> Result<T, VoiceError> {
    let mut value: Value = serde_json::from_str(json)?;
    if let Value::Object(ref mut map) = value {
        match map.remove(TYPE_KEY) {
            None | Some(Value::Null) => {}
            Some(Value::String(found)) if found == type_name => {}
            Some(other) => {
                let found = match other {
                    Value::String(s) => s,
                    v => v.to_string(),
                };
                return Err(VoiceError::TypeMismatch {
                    expected: type_name,
                    found,
                });
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize, Default)]
    #[serde(default)]
    struct Sample {
        fb: u8,
        con: u8,
    }

    #[test]
    fn writes_discriminant() {
        let json = to_tagged_json(&Sample { fb: 3, con: 1 }, "SampleVoice").unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[TYPE_KEY], "SampleVoice");
        assert_eq!(value["fb"], 3);
    }

    #[test]
    fn accepts_missing_discriminant() {
        let sample: Sample = from_tagged_json(r#"{"fb": 2}"#, "SampleVoice").unwrap();
        assert_eq!(sample, Sample { fb: 2, con: 0 });
    }

    #[test]
    fn rejects_foreign_discriminant() {
        let err = from_tagged_json::<Sample>(r#"{"__type": "OtherVoice"}"#, "SampleVoice")
            .unwrap_err();
        match err {
            VoiceError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "SampleVoice");
                assert_eq!(found, "OtherVoice");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = from_tagged_json::<Sample>("{fb:", "SampleVoice").unwrap_err();
        assert!(matches!(err, VoiceError::Json(_)));
    }
}
