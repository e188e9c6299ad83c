//! `embed-literal`: writes a Rust module embedding files (or stdin) as byte literals.
//!
//! Examples:
//!   embed-literal --package assets --var LOGO < logo.png > logo.rs
//!   embed-literal --package assets --var FILES --gzip a.txt b.bin > assets.rs
//!
//! With no FILES the module holds one buffer named after `--var`, read from
//! stdin. With FILES it holds `<var>_0`, `<var>_1`, ... and a table `<var>`.
//! The module is written to stdout.

use std::{
    io::{self, BufWriter},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use embed_literal::{Config, DEFAULT_RUNTIME_CRATE, Encoding, max_compression_level};
use log::debug;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EncodingChoice {
    /// One escaped byte-string literal per buffer.
    String,
    /// Array literals, 16 values per line.
    List,
}

impl From<EncodingChoice> for Encoding {
    fn from(choice: EncodingChoice) -> Self {
        match choice {
            EncodingChoice::String => Self::EscapedString,
            EncodingChoice::List => Self::ElementList,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "embed-literal",
    version,
    about = "Embed files in Rust source as byte literals"
)]
struct Cli {
    /// Name of the generated module
    #[arg(long)]
    package: String,

    /// Name (or name prefix) of the generated statics
    #[arg(long)]
    var: String,

    /// Compress the contents and decompress them on first access
    #[arg(short = 'z', long, default_value_t = false)]
    gzip: bool,

    /// zstd compression level used with --gzip [default: highest]
    #[arg(long, allow_negative_numbers = true)]
    level: Option<i32>,

    /// How byte sequences are written
    #[arg(long, value_enum, default_value_t = EncodingChoice::String)]
    encoding: EncodingChoice,

    /// Path of the crate providing `decompress_all` to generated code
    #[arg(long, default_value = DEFAULT_RUNTIME_CRATE)]
    runtime_crate: String,

    /// Files to embed. Reads stdin when none are given.
    files: Vec<PathBuf>,
}

fn main() {
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    if let Err(err) = real_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    let cli = Cli::parse();
    debug!("{cli:?}");

    let config = Config::new(&cli.package, &cli.var)
        .compress(cli.gzip)
        .level(cli.level.unwrap_or_else(max_compression_level))
        .encoding(cli.encoding.into())
        .runtime_crate(&cli.runtime_crate);

    let plan = if cli.files.is_empty() {
        config
            .plan_stream(io::stdin().lock())
            .context("reading stdin")?
    } else {
        config.plan_files(&cli.files).context("reading input files")?
    };

    let stdout = BufWriter::new(io::stdout().lock());
    plan.emit(stdout).context("writing module")?;
    Ok(())
}
