//! CLI front end for `lazyproto-build`.
//!
//! One process invocation compiles every `--input` schema file into its own
//! Rust source module under `--out`. This binary owns only argument
//! parsing and exit-code mapping; all generation happens in
//! [`lazyproto_build`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use lazyproto_build::Config;

/// Generates lazily-decoding message modules from tag-length-value schema
/// descriptors.
#[derive(Parser)]
#[command(name = "lazyproto-gen", author, version, about)]
struct Args {
    /// Schema descriptor to compile. May be given more than once.
    #[arg(long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Directory relative schema includes are resolved against.
    #[arg(long = "proto_path")]
    proto_path: Option<PathBuf>,

    /// Output directory; created recursively if absent.
    #[arg(long = "out", default_value = ".")]
    out: PathBuf,

    /// Reserved: additionally emit `HasField` presence predicates.
    #[arg(long = "with_presence", default_value_t = false)]
    with_presence: bool,
}

const EXIT_NO_INPUTS: u8 = 255;
const EXIT_GENERATOR_ERROR: u8 = 254;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.inputs.is_empty() {
        eprintln!("lazyproto-gen: at least one --input is required");
        return ExitCode::from(EXIT_NO_INPUTS);
    }

    let mut config = Config::new();
    config.out_dir(args.out.clone());
    config.with_presence(args.with_presence);
    if let Some(proto_path) = &args.proto_path {
        config.proto_path(proto_path.clone());
    }

    for input in &args.inputs {
        if let Err(e) = config.compile_file(input) {
            eprintln!("lazyproto-gen: {}: {e}", input.display());
            return ExitCode::from(EXIT_GENERATOR_ERROR);
        }
        log::debug!("compiled {}", input.display());
    }

    ExitCode::SUCCESS
}
