//! Component D — the Emission Planner.
//!
//! For each [`crate::model::Message`] this computes the six-part plan of
//! §4.D: struct layout, flag allocation, decode plan, accessor plan, marshal
//! plan, and pool plan. The plan is plain data; [`crate::codegen`] is the
//! only place that turns it into Rust source.

use proc_macro2::TokenStream;

use crate::model::{Cardinality, Message, WireType};
use crate::naming::{field_names, message_names, FieldNames, MessageNames};
use crate::types::{map, wire_type_variant};

/// Bit 0 of the runtime flags word is the "modified" flag; MESSAGE field
/// bits are allocated starting here, per §3 invariant 4.
pub const FIRST_MESSAGE_FLAG_BIT: u32 = 1;

#[derive(Clone)]
pub struct FieldPlan {
    pub schema_name: String,
    pub tag: u32,
    pub wire_type: WireType,
    pub wire_type_tokens: TokenStream,
    pub cardinality: Cardinality,
    pub names: FieldNames,
    pub singular_rust_type: TokenStream,
    /// `Some` only for MESSAGE fields: the flag bit gating lazy decode.
    pub decoded_flag_bit: Option<u32>,
    /// `Some` only for MESSAGE fields: the name of the referenced message.
    pub message_type_name: Option<String>,
    pub comment: Option<String>,
}

impl FieldPlan {
    pub fn is_message(&self) -> bool {
        matches!(self.wire_type, WireType::Message)
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self.cardinality, Cardinality::Repeated)
    }
}

pub struct MessagePlan {
    pub schema_name: String,
    pub names: MessageNames,
    pub fields: Vec<FieldPlan>,
    pub comment: Option<String>,
}

impl MessagePlan {
    pub fn message_fields(&self) -> impl Iterator<Item = &FieldPlan> {
        self.fields.iter().filter(|f| f.is_message())
    }

    pub fn needs_prepass(&self) -> bool {
        self.fields.iter().any(FieldPlan::is_repeated)
    }
}

/// Builds the emission plan for one message. Flag bits are assigned here,
/// in declaration order, per §4.D(2): this is the single place that
/// decision is made, so every later stage (decode, accessors, marshal) sees
/// the same bit for the same field.
pub fn plan_message(message: &Message) -> MessagePlan {
    let mut next_flag_bit = FIRST_MESSAGE_FLAG_BIT;
    let fields = message
        .fields
        .iter()
        .map(|field| {
            let mapping = map(field.wire_type);
            let decoded_flag_bit = if field.is_message() {
                let bit = next_flag_bit;
                next_flag_bit += 1;
                Some(bit)
            } else {
                None
            };

            let singular_rust_type = if field.is_message() {
                // The pooled child type is named after the referenced
                // message; codegen substitutes `Box<Referent>` itself since
                // that requires the referent's own derived struct ident.
                TokenStream::new()
            } else {
                mapping.singular_rust_type
            };

            FieldPlan {
                schema_name: field.name.clone(),
                tag: field.tag,
                wire_type: field.wire_type,
                wire_type_tokens: wire_type_variant(field.wire_type),
                cardinality: field.cardinality,
                names: field_names(&message.name, &field.name),
                singular_rust_type,
                decoded_flag_bit,
                message_type_name: field.message_type_name.clone(),
                comment: field.comment.clone(),
            }
        })
        .collect();

    MessagePlan {
        schema_name: message.name.clone(),
        names: message_names(&message.name),
        fields,
        comment: message.comment.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cardinality, Field, Message, WireType};

    fn uint32_field(name: &str, tag: u32) -> Field {
        Field {
            capitalized_name: name.to_string(),
            name: name.to_string(),
            tag,
            wire_type: WireType::Uint32,
            cardinality: Cardinality::Singular,
            message_type: None,
            message_type_name: None,
            comment: None,
        }
    }

    #[test]
    fn flag_bits_start_at_one_and_increment_by_field() {
        let mut message = Message {
            name: "M".to_string(),
            fields: vec![uint32_field("a", 1)],
            comment: None,
        };
        message.fields.push(Field {
            wire_type: WireType::Message,
            ..uint32_field("b", 2)
        });
        message.fields.push(Field {
            wire_type: WireType::Message,
            ..uint32_field("c", 3)
        });

        let plan = plan_message(&message);
        assert_eq!(plan.fields[0].decoded_flag_bit, None);
        assert_eq!(plan.fields[1].decoded_flag_bit, Some(1));
        assert_eq!(plan.fields[2].decoded_flag_bit, Some(2));
    }

    #[test]
    fn needs_prepass_reflects_repeated_fields() {
        let message = Message {
            name: "M".to_string(),
            fields: vec![uint32_field("a", 1)],
            comment: None,
        };
        assert!(!plan_message(&message).needs_prepass());

        let message = Message {
            name: "M".to_string(),
            fields: vec![Field {
                cardinality: Cardinality::Repeated,
                ..uint32_field("a", 1)
            }],
            comment: None,
        };
        assert!(plan_message(&message).needs_prepass());
    }
}
