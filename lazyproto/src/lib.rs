#![doc(html_root_url = "https://docs.rs/lazyproto/0.1.0")]

//! Runtime support shared by every module emitted by `lazyproto-build`.
//!
//! Generated code embeds a [`Header`] in each message struct for lazy
//! decoding and modification tracking, and draws struct instances from a
//! per-type [`Pool`] to avoid an allocation on every decode.

// Re-export bytes for use within generated code.
pub use bytes;

mod header;
mod pool;

pub use header::Header;
pub use pool::{Pool, Poolable};

// Re-export the wire codec primitives generated code calls directly, so
// generated modules need only depend on this crate.
pub use lazyproto_wire::{
    decode_varint, encode_varint, encoded_len_varint, DecodeError, FieldIter, PreparedTag,
    TagIter, Value, WireType, Writer,
};
