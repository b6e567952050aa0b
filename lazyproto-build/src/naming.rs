//! Component B — the Name & Symbol Deriver.
//!
//! Pure, deterministic derivations from a message name `M` and a field name
//! `f` (capitalized `F`), per §4.B. These names are part of the emitted
//! module's public surface and must stay stable across regenerations, so
//! every function here is a straightforward string transform with no
//! hidden state.

use proc_macro2::Ident;
use proc_macro2::Span;

use crate::ident::{to_snake, to_upper_camel};

fn syn_ident(s: &str) -> Ident {
    Ident::new(s, Span::call_site())
}

/// Names derived from a message name alone.
pub struct MessageNames {
    /// Emitted struct type: `M`.
    pub struct_ident: Ident,
    /// Pool `static` symbol: `lowerFirst(M) + "Pool"`.
    pub pool_ident: Ident,
    /// Constructor free function: `"New" + M`.
    pub constructor_ident: Ident,
}

pub fn message_names(message_name: &str) -> MessageNames {
    let m = to_upper_camel(message_name);
    MessageNames {
        struct_ident: syn_ident(&m),
        pool_ident: syn_ident(&format!("{}_POOL", to_snake(message_name).to_uppercase())),
        constructor_ident: syn_ident(&format!("new_{}", to_snake(message_name))),
    }
}

/// Names derived from a message name `M` and a field name `f`.
pub struct FieldNames {
    /// Rust struct field identifier, e.g. `key`.
    pub field_ident: Ident,
    /// Getter method: `"Get" + F` -> `get_f` in Rust naming.
    pub getter_ident: Ident,
    /// Setter method: `"Set" + F` -> `set_f` in Rust naming.
    pub setter_ident: Ident,
    /// Per-field decoded-flag constant: `"flag" + M + F + "Decoded"`.
    pub decoded_flag_ident: Ident,
    /// Per-field prepared-tag constant: `"prepared" + M + F`.
    pub prepared_tag_ident: Ident,
}

pub fn field_names(message_name: &str, field_name: &str) -> FieldNames {
    let f_snake = to_snake(field_name);
    let m_upper = to_upper_camel(message_name);
    let f_upper = to_upper_camel(field_name);
    FieldNames {
        field_ident: syn_ident(&f_snake),
        getter_ident: syn_ident(&format!("get_{f_snake}")),
        setter_ident: syn_ident(&format!("set_{f_snake}")),
        decoded_flag_ident: syn_ident(&format!(
            "FLAG_{}_{}_DECODED",
            m_upper.to_uppercase(),
            f_upper.to_uppercase()
        )),
        prepared_tag_ident: syn_ident(&format!(
            "PREPARED_{}_{}",
            m_upper.to_uppercase(),
            f_upper.to_uppercase()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_follow_the_convention() {
        let names = message_names("KeyValue");
        assert_eq!(names.struct_ident.to_string(), "KeyValue");
        assert_eq!(names.pool_ident.to_string(), "KEY_VALUE_POOL");
        assert_eq!(names.constructor_ident.to_string(), "new_key_value");
    }

    #[test]
    fn field_names_follow_the_convention() {
        let names = field_names("Outer", "x");
        assert_eq!(names.field_ident.to_string(), "x");
        assert_eq!(names.getter_ident.to_string(), "get_x");
        assert_eq!(names.setter_ident.to_string(), "set_x");
        assert_eq!(names.decoded_flag_ident.to_string(), "FLAG_OUTER_X_DECODED");
        assert_eq!(names.prepared_tag_ident.to_string(), "PREPARED_OUTER_X");
    }
}
