//! Component A — the Descriptor Adapter.
//!
//! Normalizes the external parser's descriptor tree (§ [`crate::descriptor`])
//! into the internal `{File, Message, Field}` model (§ [`crate::model`]),
//! enforcing the invariants of spec §3: unique positive tags, in-file
//! message references, well-formed field names, and a MESSAGE-field count
//! that fits the 63-bit flag word.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::descriptor::{RawField, RawFile, RawMessage};
use crate::error::Rejection;
use crate::ident::to_upper_camel;
use crate::model::{Cardinality, Field, File, Message, WireType};

/// Maximum number of MESSAGE-typed fields a single message may declare:
/// one flags bit per field, with bit 0 reserved for "modified".
pub const MAX_MESSAGE_FIELDS: usize = 63;

pub fn adapt_file(raw: RawFile) -> Result<File, Rejection> {
    let message_names: HashSet<&str> = raw.messages.iter().map(|m| m.name.as_str()).collect();
    let declaration_order: Vec<String> = raw.messages.iter().map(|m| m.name.clone()).collect();

    // Two passes: first build every Message with empty Rc placeholders are
    // not an option since Field needs a resolved Rc<Message> at construction
    // time, so we instead resolve message-typed fields by name against a
    // map populated as each message is built. Self- and forward-references
    // within the same file are both legal (§3 invariant 2), so messages are
    // built in two stages: bare field metadata first, then Rc linkage.
    let mut built: HashMap<String, Rc<Message>> = HashMap::with_capacity(raw.messages.len());

    // First pass only validates, so a rejection anywhere in the file is
    // reported before any message is actually built.
    for raw_message in &raw.messages {
        validate_message(raw_message, &message_names)?;
    }

    for raw_message in raw.messages {
        let message = adapt_message(raw_message, &built)?;
        built.insert(message.name.clone(), Rc::new(message));
    }

    let messages = declaration_order
        .into_iter()
        .map(|name| built.remove(&name).expect("every declared message was built"))
        .collect();

    Ok(File {
        package: raw.package,
        messages,
    })
}

/// Narrows a descriptor's free-form `wire_type` string to the four this core
/// supports, per §4.A. Anything else - `sint32`, `bytes`, a typo - is
/// rejected here with the offending spelling quoted back to the caller,
/// rather than failing earlier as an opaque JSON deserialization error.
fn parse_wire_type(message: &str, field: &str, raw: &str) -> Result<WireType, Rejection> {
    match raw {
        "uint32" => Ok(WireType::Uint32),
        "fixed64" => Ok(WireType::Fixed64),
        "string" => Ok(WireType::String),
        "message" => Ok(WireType::Message),
        other => Err(Rejection::UnsupportedWireType {
            message: message.to_string(),
            field: field.to_string(),
            wire_type: other.to_string(),
        }),
    }
}

/// Narrows a descriptor's free-form `cardinality` string to `singular` or
/// `repeated`; `map`, `oneof`, `group` and `packed` are all rejected here,
/// per §4.A's explicit exclusion list.
fn parse_cardinality(message: &str, field: &str, raw: &str) -> Result<Cardinality, Rejection> {
    match raw {
        "singular" => Ok(Cardinality::Singular),
        "repeated" => Ok(Cardinality::Repeated),
        other => Err(Rejection::UnsupportedCardinality {
            message: message.to_string(),
            field: field.to_string(),
            cardinality: other.to_string(),
        }),
    }
}

fn validate_message(raw: &RawMessage, message_names: &HashSet<&str>) -> Result<(), Rejection> {
    let mut seen_tags = HashSet::new();
    let mut message_field_count = 0usize;

    for field in &raw.fields {
        if field.name.is_empty() || !field.name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(Rejection::InvalidFieldName {
                message: raw.name.clone(),
                field: field.name.clone(),
            });
        }

        if field.tag <= 0 || field.tag > i64::from(u32::MAX) {
            return Err(Rejection::InvalidTag {
                message: raw.name.clone(),
                field: field.name.clone(),
                tag: field.tag,
            });
        }
        let tag = field.tag as u32;
        if !seen_tags.insert(tag) {
            return Err(Rejection::DuplicateTag {
                message: raw.name.clone(),
                field: field.name.clone(),
                tag,
            });
        }

        let wire_type = parse_wire_type(&raw.name, &field.name, &field.wire_type)?;
        parse_cardinality(&raw.name, &field.name, &field.cardinality)?;

        if wire_type == WireType::Message {
            message_field_count += 1;
            let referent = field.message_type.as_deref().unwrap_or("");
            if !message_names.contains(referent) {
                return Err(Rejection::UnresolvedMessageReference {
                    message: raw.name.clone(),
                    field: field.name.clone(),
                    referent: referent.to_string(),
                });
            }
        }
    }

    if message_field_count > MAX_MESSAGE_FIELDS {
        return Err(Rejection::TooManyMessageFields {
            message: raw.name.clone(),
            count: message_field_count,
        });
    }

    Ok(())
}

fn adapt_message(
    raw: RawMessage,
    resolved: &HashMap<String, Rc<Message>>,
) -> Result<Message, Rejection> {
    let fields = raw
        .fields
        .into_iter()
        .map(|f| adapt_field(&raw.name, f, resolved))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Message {
        name: raw.name,
        fields,
        comment: raw.comment,
    })
}

fn adapt_field(
    message_name: &str,
    raw: RawField,
    resolved: &HashMap<String, Rc<Message>>,
) -> Result<Field, Rejection> {
    // Already validated by `validate_message` in the first adaptation pass;
    // re-parsed here too since `adapt_field` has no other way to recover the
    // narrowed `WireType`/`Cardinality` from the raw strings it owns.
    let wire_type = parse_wire_type(message_name, &raw.name, &raw.wire_type)?;
    let cardinality = parse_cardinality(message_name, &raw.name, &raw.cardinality)?;

    // Self- and forward-references are both legal (§3 invariant 2): a
    // referent declared later in the file, or this message itself, won't
    // be in `resolved` yet. The Rc link is only needed for bookkeeping on
    // already-built messages; `message_type_name` carries the referent's
    // name unconditionally, since codegen needs it to name the referenced
    // struct type regardless of build order.
    let message_type_name = if wire_type == WireType::Message {
        Some(raw.message_type.clone().unwrap_or_default())
    } else {
        None
    };
    let message_type = message_type_name
        .as_deref()
        .and_then(|referent| resolved.get(referent).cloned());

    Ok(Field {
        capitalized_name: to_upper_camel(&raw.name),
        name: raw.name,
        tag: raw.tag as u32,
        wire_type,
        cardinality,
        message_type,
        message_type_name,
        comment: raw.comment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::RawFile;

    #[test]
    fn rejects_duplicate_tags() {
        let json = r#"{
            "package": "",
            "messages": [{
                "name": "M",
                "fields": [
                    {"name": "a", "tag": 1, "wire_type": "uint32", "cardinality": "singular"},
                    {"name": "b", "tag": 1, "wire_type": "uint32", "cardinality": "singular"}
                ]
            }]
        }"#;
        let raw = RawFile::from_json(json).unwrap();
        let err = adapt_file(raw).unwrap_err();
        assert!(matches!(err, Rejection::DuplicateTag { .. }));
    }

    #[test]
    fn rejects_unresolved_message_reference() {
        let json = r#"{
            "package": "",
            "messages": [{
                "name": "Outer",
                "fields": [
                    {"name": "x", "tag": 1, "wire_type": "message", "cardinality": "singular", "message_type": "Missing"}
                ]
            }]
        }"#;
        let raw = RawFile::from_json(json).unwrap();
        let err = adapt_file(raw).unwrap_err();
        assert!(matches!(err, Rejection::UnresolvedMessageReference { .. }));
    }

    #[test]
    fn accepts_self_reference_and_forward_reference() {
        let json = r#"{
            "package": "",
            "messages": [
                {
                    "name": "Outer",
                    "fields": [
                        {"name": "x", "tag": 1, "wire_type": "message", "cardinality": "singular", "message_type": "Inner"}
                    ]
                },
                {
                    "name": "Inner",
                    "fields": [
                        {"name": "n", "tag": 1, "wire_type": "uint32", "cardinality": "singular"}
                    ]
                }
            ]
        }"#;
        let raw = RawFile::from_json(json).unwrap();
        let file = adapt_file(raw).unwrap();
        assert_eq!(file.messages.len(), 2);
    }

    #[test]
    fn rejects_unsupported_wire_type() {
        let json = r#"{
            "package": "",
            "messages": [{
                "name": "M",
                "fields": [
                    {"name": "a", "tag": 1, "wire_type": "sint32", "cardinality": "singular"}
                ]
            }]
        }"#;
        let raw = RawFile::from_json(json).unwrap();
        let err = adapt_file(raw).unwrap_err();
        assert!(matches!(
            err,
            Rejection::UnsupportedWireType { ref wire_type, .. } if wire_type == "sint32"
        ));
    }

    #[test]
    fn rejects_unsupported_cardinality() {
        let json = r#"{
            "package": "",
            "messages": [{
                "name": "M",
                "fields": [
                    {"name": "a", "tag": 1, "wire_type": "uint32", "cardinality": "map"}
                ]
            }]
        }"#;
        let raw = RawFile::from_json(json).unwrap();
        let err = adapt_file(raw).unwrap_err();
        assert!(matches!(
            err,
            Rejection::UnsupportedCardinality { ref cardinality, .. } if cardinality == "map"
        ));
    }
}
