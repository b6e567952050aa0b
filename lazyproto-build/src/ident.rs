//! Utility functions for deriving Rust identifiers from schema names.

use heck::{ToSnakeCase, ToUpperCamelCase};

/// Converts a `camelCase` or `SCREAMING_SNAKE_CASE` schema name to a
/// `lower_snake` case Rust field identifier, escaping it as a raw identifier
/// if it collides with a Rust keyword.
pub fn to_snake(s: &str) -> String {
    let ident = s.to_snake_case();
    escape_keyword(ident)
}

/// Converts a `snake_case` schema name to an `UpperCamel` case Rust type
/// identifier.
pub fn to_upper_camel(s: &str) -> String {
    let ident = s.to_upper_camel_case();
    escape_keyword(ident)
}

fn escape_keyword(ident: String) -> String {
    match ident.as_str() {
        "abstract" | "alignof" | "as" | "become" | "box" | "break" | "const" | "continue"
        | "crate" | "do" | "else" | "enum" | "extern" | "false" | "final" | "fn" | "for"
        | "if" | "impl" | "in" | "let" | "loop" | "macro" | "match" | "mod" | "move"
        | "offsetof" | "override" | "priv" | "proc" | "pub" | "pure" | "ref" | "return"
        | "self" | "Self" | "sizeof" | "static" | "struct" | "super" | "trait" | "true"
        | "type" | "typeof" | "unsafe" | "unsized" | "use" | "virtual" | "where" | "while"
        | "yield" => format!("r#{ident}"),
        _ => ident,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snakes_camel_case() {
        assert_eq!("foo_bar", to_snake("FooBar"));
        assert_eq!("foo_bar_baz", to_snake("FooBarBAZ"));
        assert_eq!("xml_http_request", to_snake("XMLHttpRequest"));
        assert_eq!("r#while", to_snake("While"));
    }

    #[test]
    fn upper_camels_snake_case() {
        assert_eq!("FooBar", to_upper_camel("foo_bar"));
        assert_eq!("FuzzBuster", to_upper_camel("fuzz_buster"));
        assert_eq!("r#Self", to_upper_camel("self"));
    }
}
