//! Embed files in a Rust program as generated byte literals, optionally compressed.
//!
//! This crate generates a Rust module that declares the contents of one or more
//! files as `&[u8]` statics. The module is produced ahead of compilation, by the
//! `embed-literal` command or from a build script, so the consuming crate never
//! reads the files at runtime.
//!
//! ## How It Works
//!
//! 1.  **Generation:** [`Config`] reads the inputs and writes a module. Every input
//!     becomes its own top-level static, so each buffer lands in the binary's
//!     read-only data. Several named inputs also get a table of contents mapping
//!     each name to its buffer.
//! 2.  **Literal encoding:** Bytes are spelled as a single byte-string token
//!     (`b"\x00\xff..."`) by default. `rustc` digests one large token far faster
//!     than an array literal with one expression per byte. The array form
//!     ([`Encoding::ElementList`]) is available for small, human-readable output.
//! 3.  **Compression (optional):** Payloads are compressed with `zstd` at the
//!     highest level. The generated module decompresses all of them together, once,
//!     on first access, through [`decompress_all`].
//!
//! ## Usage
//!
//! From the command line, with a single anonymous input on stdin:
//!
//! ```text
//! embed-literal --package assets --var LOGO < logo.png > src/logo.rs
//! ```
//!
//! Or with several files, compressed:
//!
//! ```text
//! embed-literal --package assets --var FILES --gzip a.txt b.bin > src/assets.rs
//! ```
//!
//! From a build script, add the crate with the `generate` feature:
//!
//! ```toml
//! [dependencies]
//! embed_literal = { version = "0.1", default-features = false }
//!
//! [build-dependencies]
//! embed_literal = { version = "0.1", default-features = false, features = ["generate"] }
//! ```
//!
//! ```no_run
//! // build.rs
//! embed_literal::Config::new("assets", "FILES")
//!     .compress(true)
//!     .build(["assets/my_file.txt"], "assets.rs")
//!     .expect("Failed to generate assets");
//! ```
//!
//! ```ignore
//! // src/main.rs
//! include!(concat!(env!("OUT_DIR"), "/assets.rs"));
//!
//! let data: &[u8] = *assets::FILES_0;
//! println!("Embedded data is {} bytes long.", data.len());
//! ```

#![doc(html_root_url = "https://docs.rs/embed_literal/0.1.0")]

//
// ===== RUNTIME CODE =====
//

use std::io;

/// Decompresses every buffer of a generated module, in order.
///
/// This function is called by generated code and is not intended to be called
/// directly. Its signature is not guaranteed to be stable.
///
/// # Errors
///
/// Stops at the first buffer that is not valid zstd data and returns its error.
/// Data written by the generator always decodes, so an error means the generated
/// module was edited by hand or built against a different payload.
#[doc(hidden)]
pub fn decompress_all(packed: &[&[u8]]) -> io::Result<Vec<Vec<u8>>> {
    packed.iter().map(|data| zstd::decode_all(*data)).collect()
}

//
// ===== GENERATION CODE =====
//

#[cfg(feature = "generate")]
mod emit;
#[cfg(feature = "generate")]
mod literal;

#[cfg(feature = "generate")]
pub use emit::{
    Config, DEFAULT_RUNTIME_CRATE, Error, InputUnit, Plan, Result, max_compression_level,
};
#[cfg(feature = "generate")]
pub use literal::{BYTES_PER_LINE, Encoding};
