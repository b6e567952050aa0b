//! Component E — the Source Writer.
//!
//! Renders a file's [`MessagePlan`]s as Rust source. Unlike a
//! string-templating writer, this builds a `proc_macro2::TokenStream` with
//! `quote!` and formats the result with `prettyplease`, the same pipeline
//! `prost-build`'s code generator uses - no placeholder substitution, no
//! risk of a placeholder colliding with a legitimate identifier.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use crate::ident::to_upper_camel;
use crate::model::{File, WireType};
use crate::naming::message_names;
use crate::plan::{plan_message, FieldPlan, MessagePlan};

/// Renders every message of `file` into one Rust source file.
pub fn render_file(file: &File) -> String {
    let plans: Vec<MessagePlan> = file.messages.iter().map(|m| plan_message(m)).collect();
    let rendered: Vec<TokenStream> = plans.iter().map(render_message).collect();

    let tokens = quote! {
        #(#rendered)*
    };

    let syntax_tree =
        syn::parse2(tokens).expect("lazyproto-build produced a file that failed to parse");
    let body = format_syntax_tree(&syntax_tree);
    format!("// This file is @generated by lazyproto-build.\n{body}")
}

#[cfg(feature = "format")]
fn format_syntax_tree(syntax_tree: &syn::File) -> String {
    prettyplease::unparse(syntax_tree)
}

#[cfg(not(feature = "format"))]
fn format_syntax_tree(syntax_tree: &syn::File) -> String {
    quote::quote!(#syntax_tree).to_string()
}

fn type_ident(schema_name: &str) -> Ident {
    Ident::new(&to_upper_camel(schema_name), Span::call_site())
}

fn child_pool_ident(message_type_name: &str) -> Ident {
    message_names(message_type_name).pool_ident
}

fn child_struct_ident(field: &FieldPlan) -> Ident {
    type_ident(
        field
            .message_type_name
            .as_deref()
            .expect("message field always names its referent"),
    )
}

fn render_message(plan: &MessagePlan) -> TokenStream {
    let struct_ident = &plan.names.struct_ident;
    let pool_ident = &plan.names.pool_ident;
    let constructor_ident = &plan.names.constructor_ident;

    let doc = plan.comment.as_deref().map(|c| quote!(#[doc = #c]));

    let struct_fields: Vec<TokenStream> = plan.fields.iter().map(field_decl).collect();
    let flag_consts: Vec<TokenStream> = plan.message_fields().map(flag_const).collect();
    let tag_consts: Vec<TokenStream> = plan.fields.iter().map(tag_const).collect();
    let decode_arms: Vec<TokenStream> = plan.fields.iter().map(decode_arm).collect();
    let getters: Vec<TokenStream> = plan.fields.iter().map(getter).collect();
    let setters: Vec<TokenStream> = plan.fields.iter().map(setter).collect();
    let marshal_stmts: Vec<TokenStream> = plan.fields.iter().map(marshal_stmt).collect();
    let default_fields: Vec<TokenStream> = plan.fields.iter().map(default_field).collect();
    let reset_stmts: Vec<TokenStream> = plan.fields.iter().map(reset_stmt).collect();

    quote! {
        #doc
        #[derive(Debug)]
        pub struct #struct_ident {
            pub header: ::lazyproto::Header,
            #(#struct_fields,)*
        }

        #(#flag_consts)*
        #(#tag_consts)*

        static #pool_ident: ::lazyproto::Pool<#struct_ident> = ::lazyproto::Pool::new();

        impl ::core::default::Default for #struct_ident {
            fn default() -> Self {
                #struct_ident {
                    header: ::core::default::Default::default(),
                    #(#default_fields,)*
                }
            }
        }

        impl ::lazyproto::Poolable for #struct_ident {
            fn reset_for_pool(&mut self) {
                #(#reset_stmts)*
                self.header.reset();
            }
        }

        impl #struct_ident {
            /// Allocates from the pool, installs `bytes` as the original
            /// buffer, and runs the shallow decode of this message's own
            /// fields. MESSAGE-typed fields are linked to their children
            /// but not descended into; see `decode_body`.
            pub fn #constructor_ident(
                bytes: ::lazyproto::bytes::Bytes,
            ) -> ::core::result::Result<::std::boxed::Box<#struct_ident>, ::lazyproto::DecodeError> {
                let mut instance = #pool_ident.get();
                instance.header.set_bytes(bytes);
                instance.decode_body()?;
                ::core::result::Result::Ok(instance)
            }

            fn decode_body(&mut self) -> ::core::result::Result<(), ::lazyproto::DecodeError> {
                let bytes = self.header.bytes().clone();
                for item in ::lazyproto::FieldIter::new(bytes) {
                    let (tag, value) = item?;
                    match tag {
                        #(#decode_arms)*
                        _ => {}
                    }
                }
                ::core::result::Result::Ok(())
            }

            #(#getters)*
            #(#setters)*

            /// Writes this message to `writer`: the original bytes verbatim
            /// if untouched since decode, or a fresh field-by-field
            /// re-encode (in declaration order) once any setter has run.
            pub fn marshal(&self, writer: &mut ::lazyproto::Writer) {
                if !self.header.is_modified() {
                    writer.raw(&self.header.bytes()[..]);
                    return;
                }
                #(#marshal_stmts)*
            }

            /// Returns this instance, and its entire sub-tree, to their pools.
            pub fn free(self: ::std::boxed::Box<Self>) {
                #pool_ident.release(self);
            }
        }
    }
}

fn field_decl(field: &FieldPlan) -> TokenStream {
    let ident = &field.names.field_ident;
    if field.is_message() {
        let child = child_struct_ident(field);
        if field.is_repeated() {
            quote!(pub #ident: ::std::vec::Vec<::std::boxed::Box<#child>>)
        } else {
            quote!(pub #ident: ::core::option::Option<::std::boxed::Box<#child>>)
        }
    } else {
        let ty = &field.singular_rust_type;
        if field.is_repeated() {
            quote!(pub #ident: ::std::vec::Vec<#ty>)
        } else {
            quote!(pub #ident: #ty)
        }
    }
}

fn default_field(field: &FieldPlan) -> TokenStream {
    let ident = &field.names.field_ident;
    quote!(#ident: ::core::default::Default::default())
}

fn flag_const(field: &FieldPlan) -> TokenStream {
    let ident = &field.names.decoded_flag_ident;
    let bit = field.decoded_flag_bit.expect("message field has a flag bit");
    quote!(const #ident: u64 = 1u64 << #bit;)
}

fn tag_const(field: &FieldPlan) -> TokenStream {
    let ident = &field.names.prepared_tag_ident;
    let tag = field.tag;
    let wire_type = &field.wire_type_tokens;
    quote! {
        static #ident: ::once_cell::sync::Lazy<::lazyproto::PreparedTag> =
            ::once_cell::sync::Lazy::new(|| ::lazyproto::PreparedTag::new(#tag, #wire_type));
    }
}

fn decode_arm(field: &FieldPlan) -> TokenStream {
    let ident = &field.names.field_ident;
    let tag = field.tag;

    if field.is_message() {
        let pool = child_pool_ident(field.message_type_name.as_deref().unwrap());
        let link_child = quote! {
            let bytes = value.as_bytes_unsafe()?;
            let mut child = #pool.get();
            child.header.set_bytes(bytes);
            unsafe {
                child
                    .header
                    .set_parent(::core::ptr::NonNull::new(&mut self.header as *mut _));
            }
        };
        return if field.is_repeated() {
            quote! {
                #tag => {
                    #link_child
                    self.#ident.push(child);
                }
            }
        } else {
            quote! {
                #tag => {
                    #link_child
                    self.#ident = ::core::option::Option::Some(child);
                }
            }
        };
    }

    let read = match field.wire_type {
        WireType::Uint32 => quote!(value.as_uint32()?),
        WireType::Fixed64 => quote!(value.as_fixed64()?),
        WireType::String => quote!(value.as_string_unsafe()?),
        WireType::Message => unreachable!(),
    };

    if field.is_repeated() {
        quote! {
            #tag => {
                self.#ident.push(#read);
            }
        }
    } else {
        quote! {
            #tag => {
                self.#ident = #read;
            }
        }
    }
}

fn getter(field: &FieldPlan) -> TokenStream {
    let ident = &field.names.field_ident;
    let getter_ident = &field.names.getter_ident;

    if field.is_message() {
        let flag = &field.names.decoded_flag_ident;
        let child = child_struct_ident(field);
        return if field.is_repeated() {
            quote! {
                /// Lazily decodes every element of this repeated field on
                /// first access, then returns the stored elements.
                pub fn #getter_ident(
                    &mut self,
                ) -> ::core::result::Result<&mut ::std::vec::Vec<::std::boxed::Box<#child>>, ::lazyproto::DecodeError> {
                    if !self.header.is_field_decoded(#flag) {
                        for child in self.#ident.iter_mut() {
                            child.decode_body()?;
                        }
                        self.header.set_field_decoded(#flag);
                    }
                    ::core::result::Result::Ok(&mut self.#ident)
                }
            }
        } else {
            quote! {
                /// Lazily decodes this field's child on first access, then
                /// returns the stored reference.
                pub fn #getter_ident(
                    &mut self,
                ) -> ::core::result::Result<::core::option::Option<&mut #child>, ::lazyproto::DecodeError> {
                    if !self.header.is_field_decoded(#flag) {
                        if let ::core::option::Option::Some(child) = self.#ident.as_mut() {
                            child.decode_body()?;
                        }
                        self.header.set_field_decoded(#flag);
                    }
                    ::core::result::Result::Ok(self.#ident.as_deref_mut())
                }
            }
        };
    }

    if field.is_repeated() {
        let ty = &field.singular_rust_type;
        quote! {
            pub fn #getter_ident(&self) -> &[#ty] {
                &self.#ident
            }
        }
    } else if matches!(field.wire_type, WireType::String) {
        quote! {
            pub fn #getter_ident(&self) -> &str {
                // SAFETY: producers of this buffer are expected to write
                // valid UTF-8 into STRING fields; see
                // `lazyproto_wire::Value::as_string_unsafe`.
                unsafe { ::core::str::from_utf8_unchecked(&self.#ident) }
            }
        }
    } else {
        let ty = &field.singular_rust_type;
        quote! {
            pub fn #getter_ident(&self) -> #ty {
                self.#ident
            }
        }
    }
}

fn setter(field: &FieldPlan) -> TokenStream {
    let ident = &field.names.field_ident;
    let setter_ident = &field.names.setter_ident;

    if field.is_message() {
        let flag = &field.names.decoded_flag_ident;
        let child = child_struct_ident(field);
        return if field.is_repeated() {
            quote! {
                pub fn #setter_ident(&mut self, mut v: ::std::vec::Vec<::std::boxed::Box<#child>>) {
                    for child in v.iter_mut() {
                        unsafe {
                            child
                                .header
                                .set_parent(::core::ptr::NonNull::new(&mut self.header as *mut _));
                        }
                    }
                    self.#ident = v;
                    self.header.set_field_decoded(#flag);
                    self.header.mark_modified();
                }
            }
        } else {
            quote! {
                pub fn #setter_ident(&mut self, mut v: ::std::boxed::Box<#child>) {
                    unsafe {
                        v.header
                            .set_parent(::core::ptr::NonNull::new(&mut self.header as *mut _));
                    }
                    self.#ident = ::core::option::Option::Some(v);
                    self.header.set_field_decoded(#flag);
                    self.header.mark_modified();
                }
            }
        };
    }

    let ty = &field.singular_rust_type;
    if field.is_repeated() {
        quote! {
            pub fn #setter_ident(&mut self, v: ::std::vec::Vec<#ty>) {
                self.#ident = v;
                self.header.mark_modified();
            }
        }
    } else {
        quote! {
            pub fn #setter_ident(&mut self, v: #ty) {
                self.#ident = v;
                self.header.mark_modified();
            }
        }
    }
}

fn marshal_stmt(field: &FieldPlan) -> TokenStream {
    let ident = &field.names.field_ident;
    let tag_const = &field.names.prepared_tag_ident;

    if field.is_message() {
        return if field.is_repeated() {
            quote! {
                for child in self.#ident.iter() {
                    let token = writer.begin_embedded(&#tag_const);
                    child.marshal(writer);
                    writer.end_embedded_prepared(token, &#tag_const);
                }
            }
        } else {
            quote! {
                if let ::core::option::Option::Some(child) = self.#ident.as_deref() {
                    let token = writer.begin_embedded(&#tag_const);
                    child.marshal(writer);
                    writer.end_embedded_prepared(token, &#tag_const);
                }
            }
        };
    }

    let write_one = |value: TokenStream| -> TokenStream {
        match field.wire_type {
            WireType::Uint32 => quote!(writer.write_uint32_prepared(&#tag_const, #value);),
            WireType::Fixed64 => quote!(writer.write_fixed64_prepared(&#tag_const, #value);),
            WireType::String => quote! {
                writer.write_string_prepared(
                    &#tag_const,
                    unsafe { ::core::str::from_utf8_unchecked(#value) },
                );
            },
            WireType::Message => unreachable!(),
        }
    };

    if field.is_repeated() {
        let value_expr = match field.wire_type {
            WireType::String => quote!(value),
            _ => quote!(*value),
        };
        let write = write_one(value_expr);
        quote! {
            for value in self.#ident.iter() {
                #write
            }
        }
    } else {
        let value = match field.wire_type {
            WireType::String => quote!(&self.#ident),
            _ => quote!(self.#ident),
        };
        write_one(value)
    }
}

fn reset_stmt(field: &FieldPlan) -> TokenStream {
    let ident = &field.names.field_ident;

    if field.is_message() {
        let pool = child_pool_ident(field.message_type_name.as_deref().unwrap());
        return if field.is_repeated() {
            quote! {
                {
                    let children = ::core::mem::take(&mut self.#ident);
                    #pool.release_slice(children);
                }
            }
        } else {
            quote! {
                if let ::core::option::Option::Some(child) = self.#ident.take() {
                    #pool.release(child);
                }
            }
        };
    }

    quote! {
        self.#ident = ::core::default::Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::adapt_file;
    use crate::descriptor::RawFile;

    fn render(json: &str) -> String {
        let raw = RawFile::from_json(json).unwrap();
        let file = adapt_file(raw).unwrap();
        render_file(&file)
    }

    #[test]
    fn renders_a_flat_message() {
        let source = render(
            r#"{
                "package": "kv",
                "messages": [{
                    "name": "KeyValue",
                    "fields": [
                        {"name": "key", "tag": 1, "wire_type": "string", "cardinality": "singular"},
                        {"name": "value", "tag": 2, "wire_type": "string", "cardinality": "singular"}
                    ]
                }]
            }"#,
        );

        assert!(source.contains("pub struct KeyValue"));
        assert!(source.contains("pub fn new_key_value"));
        assert!(source.contains("pub fn get_key"));
        assert!(source.contains("pub fn set_key"));
        assert!(source.contains("KEY_VALUE_POOL"));
        assert!(source.contains("fn marshal"));
        assert!(source.contains("fn free"));
    }

    #[test]
    fn renders_a_nested_message_with_a_boxed_child_and_pool_release() {
        let source = render(
            r#"{
                "package": "oi",
                "messages": [
                    {
                        "name": "Outer",
                        "fields": [
                            {"name": "inner", "tag": 1, "wire_type": "message", "cardinality": "singular", "message_type": "Inner"},
                            {"name": "tags", "tag": 2, "wire_type": "uint32", "cardinality": "repeated"}
                        ]
                    },
                    {
                        "name": "Inner",
                        "fields": [
                            {"name": "n", "tag": 1, "wire_type": "uint32", "cardinality": "singular"}
                        ]
                    }
                ]
            }"#,
        );

        assert!(source.contains("Option < :: std :: boxed :: Box < Inner >") || source.contains("Option<::std::boxed::Box<Inner>>"));
        assert!(source.contains("INNER_POOL . release") || source.contains("INNER_POOL.release"));
        assert!(source.contains("Vec < u32 >") || source.contains("Vec<u32>"));
        assert!(source.contains("FLAG_OUTER_INNER_DECODED"));
    }
}
