//! The generator's builder, mirroring `prost_build::Config`'s role: a
//! handful of knobs, defaulted sensibly, that [`Config::compile_file`] reads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::adapter::adapt_file;
use crate::codegen::render_file;
use crate::descriptor::RawFile;
use crate::error::{Error, Result};

/// Creates `dir` (and its parents) with `0700` permissions on Unix, per
/// §6's "created recursively, mode `0700`" output-directory requirement,
/// matching `os.MkdirAll(fdir, 0700)` in the original generator. There is
/// no portable equivalent of a Unix mode bit on other platforms, so
/// non-Unix targets fall back to the platform's default permissions.
#[cfg(unix)]
fn create_output_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_output_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Configures a single descriptor-to-source generation run.
///
/// The common case needs no configuration at all: [`compile_file`] builds
/// one with defaults. `Config` exists for the less common cases - a
/// caller embedding this in its own build script and wanting to point
/// `out_dir` somewhere other than `OUT_DIR`, for instance.
pub struct Config {
    out_dir: Option<PathBuf>,
    proto_path: Option<PathBuf>,
    with_presence: bool,
}

impl Config {
    pub fn new() -> Self {
        Config {
            out_dir: None,
            proto_path: None,
            with_presence: false,
        }
    }

    /// Directory generated `.rs` files are written to. Created (including
    /// parents) if it doesn't already exist.
    pub fn out_dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.out_dir = Some(path.into());
        self
    }

    /// Directory relative paths in the descriptor are resolved against.
    /// This core performs no cross-file resolution of its own, so the
    /// value is accepted and stored for callers that need it, but never
    /// read by [`Config::compile_file`] itself.
    pub fn proto_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.proto_path = Some(path.into());
        self
    }

    /// Reserved for explicit-presence tracking on scalar fields. Accepted
    /// for CLI/API compatibility; has no effect on the emitted module,
    /// since every field here already carries an explicit decoded/pending
    /// state via its lazy-decode flag bit.
    pub fn with_presence(&mut self, enabled: bool) -> &mut Self {
        self.with_presence = enabled;
        self
    }

    pub fn proto_path_value(&self) -> Option<&Path> {
        self.proto_path.as_deref()
    }

    pub fn with_presence_value(&self) -> bool {
        self.with_presence
    }

    /// Reads `descriptor_path` as a JSON schema descriptor, generates one
    /// Rust source file from it, and writes it under `out_dir` as
    /// `<package-or-stem>.rs`.
    pub fn compile_file(&self, descriptor_path: impl AsRef<Path>) -> Result<PathBuf> {
        let descriptor_path = descriptor_path.as_ref();
        let text = fs::read_to_string(descriptor_path)?;
        let raw = RawFile::from_json(&text).map_err(|e| Error::InvalidDescriptor(e.to_string()))?;

        let stem = if raw.package.is_empty() {
            descriptor_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("generated")
                .to_string()
        } else {
            raw.package.clone()
        };

        let file = adapt_file(raw)?;
        let source = render_file(&file);

        let out_dir = self.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        create_output_dir(&out_dir)?;
        let out_path = out_dir.join(format!("{stem}.rs"));
        fs::write(&out_path, source)?;
        Ok(out_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

/// Generates one Rust source file from `descriptor_path` using a default
/// [`Config`], writing it to `out_dir`.
pub fn compile_file(
    descriptor_path: impl AsRef<Path>,
    out_dir: impl Into<PathBuf>,
) -> Result<PathBuf> {
    Config::new().out_dir(out_dir).compile_file(descriptor_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_descriptor_to_a_named_file() {
        let dir = std::env::temp_dir().join(format!(
            "lazyproto-build-test-{}-{}",
            std::process::id(),
            line!()
        ));
        fs::create_dir_all(&dir).unwrap();
        let descriptor_path = dir.join("kv.json");
        fs::write(
            &descriptor_path,
            r#"{
                "package": "kv",
                "messages": [
                    {
                        "name": "KeyValue",
                        "fields": [
                            {"name": "key", "tag": 1, "wire_type": "string", "cardinality": "singular"},
                            {"name": "value", "tag": 2, "wire_type": "string", "cardinality": "singular"}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        let out_path = compile_file(&descriptor_path, dir.join("out")).unwrap();
        assert!(out_path.ends_with("kv.rs"));
        let contents = fs::read_to_string(&out_path).unwrap();
        assert!(contents.contains("struct KeyValue"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn out_dir_is_created_with_mode_0700() {
        use std::os::unix::fs::PermissionsExt;

        let dir = std::env::temp_dir().join(format!(
            "lazyproto-build-test-mode-{}-{}",
            std::process::id(),
            line!()
        ));
        let _ = fs::remove_dir_all(&dir);

        create_output_dir(&dir).unwrap();
        let mode = fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);

        let _ = fs::remove_dir_all(&dir);
    }
}
