#![doc(html_root_url = "https://docs.rs/lazyproto-build/0.1.0")]

//! `lazyproto-build` turns a tag-length-value schema descriptor into a Rust
//! module implementing lazy decoding, partial re-encoding, and object
//! pooling for every message it declares.
//!
//! It is designed to run from a build script, the same way `prost-build`
//! does for `.proto` files:
//!
//! ```no_run
//! fn main() -> std::io::Result<()> {
//!     lazyproto_build::compile_file("schema/telemetry.json", std::env::var("OUT_DIR").unwrap())?;
//!     Ok(())
//! }
//! ```
//!
//! The generated module expects three runtime dependencies in the crate
//! that `include!`s it: [`lazyproto`](https://docs.rs/lazyproto) (the
//! `Header`/`Pool` runtime, which itself re-exports the wire codec),
//! `once_cell` (for the per-field prepared-tag statics), and nothing else.
//!
//! This crate performs no schema parsing of its own - [`RawFile`] is a
//! `serde`-deserializable shape a caller's own IDL parser is expected to
//! produce. [`adapt_file`] then validates that shape against the
//! invariants a generated module depends on (unique positive tags,
//! in-file message references, a MESSAGE-field count that fits the 63-bit
//! flag word) before any code is emitted.
//!
//! ## Pipeline
//!
//! 1. [`descriptor`] - the external shape, read as JSON.
//! 2. [`adapter`] - validates and normalizes it into [`model`].
//! 3. [`naming`] and [`types`] - pure derivations the rest of the pipeline
//!    shares: identifiers, and schema-type-to-Rust-type mappings.
//! 4. [`plan`] - assigns lazy-decode flag bits and produces one
//!    [`plan::MessagePlan`] per message.
//! 5. [`codegen`] - renders each plan as a Rust item with `quote!`, then
//!    formats the whole file with `prettyplease`.
//!
//! [`Config`] and [`compile_file`] wire the pipeline together for the
//! common case; [`error`] defines what can go wrong along the way.

pub mod adapter;
pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod error;
mod ident;
pub mod model;
pub mod naming;
pub mod plan;
pub mod types;

pub use adapter::adapt_file;
pub use config::{compile_file, Config};
pub use descriptor::RawFile;
pub use error::{Error, Rejection, Result};
