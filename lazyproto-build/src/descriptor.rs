//! The shape of a schema descriptor as handed to this generator.
//!
//! The schema IDL parser itself is out of scope for this core; callers are
//! expected to hand in a descriptor tree already resolved to names, tags,
//! wire types and cardinality. This module defines that tree as a `serde`
//! `Deserialize`-able shape so a descriptor can be read straight off disk as
//! JSON, the same role `FileDescriptorProto` plays upstream of `protoc`
//! plugins.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawField {
    pub name: String,
    pub tag: i64,
    /// Not a closed enum: an unsupported spelling (`"sint32"`, `"map"`, …)
    /// must reach the descriptor adapter so it can be rejected there as a
    /// [`crate::error::Rejection::UnsupportedWireType`], rather than failing
    /// JSON deserialization before the adapter ever sees the field.
    pub wire_type: String,
    /// Not a closed enum, for the same reason as `wire_type`; unsupported
    /// values (`"map"`, `"oneof"`, `"group"`, `"packed"`) are rejected by
    /// the adapter as [`crate::error::Rejection::UnsupportedCardinality`].
    pub cardinality: String,
    /// Present only when `wire_type` is `message`: the name of the
    /// referenced message, resolved within the same file.
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    pub name: String,
    pub fields: Vec<RawField>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFile {
    /// Opaque package symbol, used only for diagnostics; this core performs
    /// no cross-file or cross-package resolution.
    #[serde(default)]
    pub package: String,
    pub messages: Vec<RawMessage>,
}

impl RawFile {
    /// Parses a descriptor from its JSON text.
    pub fn from_json(text: &str) -> Result<RawFile, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_descriptor() {
        let json = r#"{
            "package": "example",
            "messages": [
                {
                    "name": "KeyValue",
                    "fields": [
                        {"name": "key", "tag": 1, "wire_type": "string", "cardinality": "singular"},
                        {"name": "value", "tag": 2, "wire_type": "string", "cardinality": "singular"}
                    ]
                }
            ]
        }"#;
        let file = RawFile::from_json(json).unwrap();
        assert_eq!(file.messages.len(), 1);
        assert_eq!(file.messages[0].fields.len(), 2);
        assert_eq!(file.messages[0].fields[0].tag, 1);
    }
}
