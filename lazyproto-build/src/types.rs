//! Component C — the Type Mapper.
//!
//! Maps a schema wire type to the Rust types and codec accessor/writer
//! names the planner and source writer need; table-driven per §4.C.

use proc_macro2::TokenStream;
use quote::quote;

use crate::model::WireType;

/// Everything the planner needs to know about a schema type's Rust-side
/// representation, independent of the field's cardinality.
pub struct TypeMapping {
    /// The field's element type when stored singularly (not in a `Vec`).
    pub singular_rust_type: TokenStream,
    /// `lazyproto_wire::Value` accessor used to read one value off the wire.
    pub read_accessor: ReadAccessor,
    /// Which `Writer` method writes one prepared-tagged value of this type.
    pub write_method: WriteMethod,
}

pub enum ReadAccessor {
    Uint32,
    Fixed64,
    /// Zero-copy: returns `Bytes`, to be interpreted as UTF-8 without
    /// validation by the accessor that wraps it.
    StringUnsafe,
    /// Zero-copy: returns `Bytes` holding a nested message's original bytes.
    BytesUnsafe,
}

pub enum WriteMethod {
    Uint32Prepared,
    Fixed64Prepared,
    StringPrepared,
    /// MESSAGE fields use `begin_embedded`/`end_embedded_prepared` instead
    /// of a single write call; the planner special-cases this elsewhere,
    /// but it's listed here for completeness of the mapping table.
    Embedded,
}

pub fn map(wire_type: WireType) -> TypeMapping {
    match wire_type {
        WireType::Uint32 => TypeMapping {
            singular_rust_type: quote!(u32),
            read_accessor: ReadAccessor::Uint32,
            write_method: WriteMethod::Uint32Prepared,
        },
        WireType::Fixed64 => TypeMapping {
            singular_rust_type: quote!(u64),
            read_accessor: ReadAccessor::Fixed64,
            write_method: WriteMethod::Fixed64Prepared,
        },
        WireType::String => TypeMapping {
            singular_rust_type: quote!(::lazyproto::bytes::Bytes),
            read_accessor: ReadAccessor::StringUnsafe,
            write_method: WriteMethod::StringPrepared,
        },
        WireType::Message => TypeMapping {
            singular_rust_type: quote!(()), // caller substitutes the pooled `Box<T>` type
            read_accessor: ReadAccessor::BytesUnsafe,
            write_method: WriteMethod::Embedded,
        },
    }
}

/// `lazyproto_wire::WireType` variant the codec expects on the wire for
/// this schema type; used to build `PreparedTag` constants.
pub fn wire_type_variant(wire_type: WireType) -> TokenStream {
    match wire_type {
        WireType::Uint32 => quote!(::lazyproto::WireType::Varint),
        WireType::Fixed64 => quote!(::lazyproto::WireType::SixtyFourBit),
        WireType::String | WireType::Message => quote!(::lazyproto::WireType::LengthDelimited),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint32_maps_to_u32() {
        let mapping = map(WireType::Uint32);
        assert_eq!(mapping.singular_rust_type.to_string(), "u32");
    }

    #[test]
    fn string_maps_to_bytes() {
        let mapping = map(WireType::String);
        assert_eq!(
            mapping.singular_rust_type.to_string(),
            ":: lazyproto :: bytes :: Bytes"
        );
    }
}
