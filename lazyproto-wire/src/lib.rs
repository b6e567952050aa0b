//! Low-level tag-length-value wire codec for `lazyproto`-generated modules.
//!
//! This crate is the small, generic runtime that generated `decode`/`Marshal`
//! methods call into. It knows nothing about any particular schema: it reads
//! and writes tags, varints, fixed64s and length-delimited blobs, and leaves
//! every higher-level decision (which field a tag belongs to, whether a
//! message field is lazily decoded, pooling) to the generated code.
//!
//! Byte payloads are handed out as [`bytes::Bytes`], so slicing a message out
//! of its parent never copies: every view is a cheap, refcounted pointer into
//! the same backing allocation as the root buffer.

mod error;
mod reader;
mod tag;
mod value;
mod varint;
mod wire_type;
mod writer;

pub use error::DecodeError;
pub use reader::{FieldIter, TagIter};
pub use tag::{decode_tag, MAX_FIELD_NUMBER};
pub use value::Value;
pub use varint::{decode_varint, encode_varint, encoded_len_varint};
pub use wire_type::WireType;
pub use writer::{PreparedTag, Writer};
