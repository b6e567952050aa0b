//! The internal `{File, Message, Field}` model the planner consumes.
//!
//! This is the normalized shape the descriptor adapter (§4.A) produces from
//! whatever the external schema parser handed in, and the only shape every
//! later stage (naming, type mapping, planning, rendering) depends on.

use std::rc::Rc;

/// A schema wire type this core understands. `UINT32`, `FIXED64`, `STRING`
/// and `MESSAGE` are the only four; everything else is rejected by the
/// descriptor adapter before a `WireType` value ever exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Uint32,
    Fixed64,
    String,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Singular,
    Repeated,
}

/// A single field of a [`Message`], in declaration order.
#[derive(Debug, Clone)]
pub struct Field {
    /// lowerCamel schema name, as declared.
    pub name: String,
    /// PascalCase of `name`, used to build exported symbol names.
    pub capitalized_name: String,
    pub tag: u32,
    pub wire_type: WireType,
    pub cardinality: Cardinality,
    /// Set only when `wire_type` is `Message`: the referenced message, once
    /// it has been built. `None` for a forward reference (the referent is
    /// declared later in the file) even though the reference is valid;
    /// [`Field::message_type_name`] always names the referent regardless.
    pub message_type: Option<Rc<Message>>,
    /// Set only when `wire_type` is `Message`: the referenced message's
    /// schema name, independent of whether `message_type` has resolved yet.
    pub message_type_name: Option<String>,
    pub comment: Option<String>,
}

impl Field {
    pub fn is_message(&self) -> bool {
        self.wire_type == WireType::Message
    }

    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }
}

/// A message declared in a [`File`].
#[derive(Debug)]
pub struct Message {
    pub name: String,
    pub fields: Vec<Field>,
    pub comment: Option<String>,
}

impl Message {
    /// MESSAGE-typed fields, in declaration order - the ones that receive a
    /// lazy-decode flag bit and a pool.
    pub fn message_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_message())
    }

    pub fn repeated_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_repeated())
    }

    pub fn has_repeated_fields(&self) -> bool {
        self.repeated_fields().next().is_some()
    }
}

/// One input schema file: an opaque package symbol plus its messages in
/// declaration order. No state here survives past the emission of this
/// file, per §3's lifecycle note.
#[derive(Debug)]
pub struct File {
    pub package: String,
    pub messages: Vec<Rc<Message>>,
}
