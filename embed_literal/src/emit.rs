//! Generation of Rust modules that embed input bytes as literals.
use std::{
    borrow::Cow,
    collections::HashSet,
    env, fs,
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::literal::{Encoding, write_literal};

//
// ==================== PUBLIC BUILDER API ====================
//

/// Options for one generated module.
///
/// A `Config` is turned into a [`Plan`] by reading its inputs, either a list
/// of named files ([`plan_files`](Self::plan_files)) or a single anonymous
/// stream ([`plan_stream`](Self::plan_stream)). The plan then writes the
/// module with [`Plan::emit`].
///
/// # Example
/// ```no_run
/// // in build.rs
/// embed_literal::Config::new("assets", "ASSETS")
///     .compress(true)
///     .build(["assets/logo.png", "assets/font.ttf"], "assets.rs")
///     .expect("Failed to generate assets module");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    package: String,
    var: String,
    compress: bool,
    level: i32,
    encoding: Encoding,
    runtime_crate: String,
}

impl Config {
    /// Creates a configuration for a module named `package` whose
    /// declarations are named after `var`.
    ///
    /// Both names are written to the output verbatim and must be valid Rust
    /// identifiers.
    pub fn new(package: impl Into<String>, var: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            var: var.into(),
            compress: false,
            level: max_compression_level(),
            encoding: Encoding::default(),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_owned(),
        }
    }

    /// Compresses every payload with zstd and decompresses it in the
    /// generated module on first access.
    #[must_use]
    pub const fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Sets the zstd compression level. Defaults to the highest level zstd
    /// supports.
    #[must_use]
    pub const fn level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    /// Selects how byte sequences are spelled. See [`Encoding`].
    #[must_use]
    pub const fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Path under which generated code finds
    /// [`decompress_all`](crate::decompress_all). Only used with compression.
    #[must_use]
    pub fn runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// Reads every file in `paths` and plans a module with one named buffer
    /// per file plus a table of contents.
    ///
    /// Each file is named by its path as given. Paths must be valid UTF-8 so
    /// that distinct paths always give distinct table keys. All files are
    /// read before anything is generated.
    ///
    /// # Errors
    /// Returns [`Error::NonUtf8Path`] or [`Error::Read`] for the first file
    /// that cannot be named or read, and the errors of
    /// [`plan_units`](Self::plan_units).
    pub fn plan_files<I, P>(self, paths: I) -> Result<Plan>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let units = paths
            .into_iter()
            .map(|path| read_unit(path.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.plan_units(units)
    }

    /// Plans a module from already loaded named inputs.
    ///
    /// # Errors
    /// Returns [`Error::EmptyName`] or [`Error::DuplicateName`] if the names
    /// cannot serve as table keys.
    pub fn plan_units(self, units: impl IntoIterator<Item = InputUnit>) -> Result<Plan> {
        let units: Vec<InputUnit> = units.into_iter().collect();
        let mut seen = HashSet::with_capacity(units.len());
        for unit in &units {
            if unit.name.is_empty() {
                return Err(Error::EmptyName);
            }
            if !seen.insert(unit.name.as_str()) {
                return Err(Error::DuplicateName(unit.name.clone()));
            }
        }
        Ok(Plan {
            config: self,
            units: Units::Named(units),
        })
    }

    /// Reads `reader` to its end and plans a module with a single anonymous
    /// buffer named `var` and no table.
    ///
    /// # Errors
    /// Returns [`Error::Stream`] if reading fails.
    pub fn plan_stream<R: Read>(self, mut reader: R) -> Result<Plan> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(Error::Stream)?;
        debug!("read {} bytes from stream", bytes.len());
        Ok(Plan {
            config: self,
            units: Units::Anonymous(bytes),
        })
    }

    /// Generates the module for `files` into `OUT_DIR/<file_name>` from a
    /// build script.
    ///
    /// Relative paths are resolved against the crate root, which is where
    /// Cargo runs build scripts. The generated file is meant to be pulled in
    /// with `include!(concat!(env!("OUT_DIR"), "/<file_name>"))`.
    ///
    /// # Errors
    /// Returns [`Error::Var`] outside of a build script, and any error of
    /// [`plan_files`](Self::plan_files) or [`Plan::write_to`].
    pub fn build<I, P>(self, files: I, file_name: &str) -> Result<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let out_dir = env::var_os("OUT_DIR")
            .map(PathBuf::from)
            .ok_or(Error::Var("OUT_DIR"))?;

        let files: Vec<PathBuf> = files
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();
        for file in &files {
            println!("cargo:rerun-if-changed={}", file.display());
        }

        let path = out_dir.join(file_name);
        self.plan_files(&files)?.write_to(&path)?;
        info!(
            "generated module for {} file(s) at '{}'",
            files.len(),
            path.display()
        );
        Ok(path)
    }
}

/// Default value of [`Config::runtime_crate`].
pub const DEFAULT_RUNTIME_CRATE: &str = "::embed_literal";

/// The highest compression level supported by the linked zstd.
#[must_use]
pub fn max_compression_level() -> i32 {
    *zstd::compression_level_range().end()
}

/// A specialized `Result` type for module generation.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while generating a module.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Path '{}' is not valid UTF-8 and cannot name a table entry", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("Failed to read input stream")]
    Stream(#[source] io::Error),
    #[error("Compression failed")]
    Compress(#[source] io::Error),
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error("Input name must not be empty")]
    EmptyName,
    #[error("Input name '{0}' appears more than once")]
    DuplicateName(String),
    #[error("Environment variable '{0}' not set by Cargo")]
    Var(&'static str),
}

/// One named input, fully loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputUnit {
    name: String,
    bytes: Vec<u8>,
}

impl InputUnit {
    /// Creates an input from its table key and contents.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// The key of this input in the generated table of contents.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The uncompressed contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Loaded inputs together with the options to render them.
#[derive(Debug)]
pub struct Plan {
    config: Config,
    units: Units,
}

#[derive(Debug)]
enum Units {
    Anonymous(Vec<u8>),
    Named(Vec<InputUnit>),
}

impl Plan {
    /// Writes the generated module to `out` and flushes it.
    ///
    /// Compression, if enabled, happens before the first byte is written.
    ///
    /// # Errors
    /// Returns [`Error::Compress`] if zstd fails and [`Error::Io`] if
    /// writing fails.
    pub fn emit<W: Write>(&self, mut out: W) -> Result<()> {
        let payloads = self.payloads()?;
        self.write_module(&mut out, &payloads)?;
        out.flush()?;
        Ok(())
    }

    /// Writes the generated module to the file at `path`.
    ///
    /// # Errors
    /// See [`emit`](Self::emit).
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = fs::File::create(path)?;
        self.emit(BufWriter::new(file))
    }

    fn payloads(&self) -> Result<Vec<Payload<'_>>> {
        let var = &self.config.var;
        match &self.units {
            Units::Anonymous(bytes) => {
                let payload = self.payload(var.clone(), None, bytes)?;
                Ok(vec![payload])
            }
            Units::Named(units) => units
                .iter()
                .enumerate()
                .map(|(i, unit)| {
                    let ident = format!("{var}_{i}");
                    self.payload(ident, Some(unit.name()), unit.bytes())
                })
                .collect(),
        }
    }

    fn payload<'a>(
        &self,
        ident: String,
        name: Option<&'a str>,
        raw: &'a [u8],
    ) -> Result<Payload<'a>> {
        let data = if self.config.compress {
            // Bulk mode records the content size in the frame, which keeps the
            // decoder's window small even at the highest levels.
            let level = self.config.level;
            let packed = zstd::bulk::compress(raw, level).map_err(Error::Compress)?;
            debug!(
                "compressed '{ident}' from {} to {} bytes",
                raw.len(),
                packed.len()
            );
            Cow::Owned(packed)
        } else {
            Cow::Borrowed(raw)
        };
        Ok(Payload { ident, name, data })
    }

    fn write_module(&self, out: &mut dyn Write, payloads: &[Payload<'_>]) -> io::Result<()> {
        let package = &self.config.package;
        let compress = self.config.compress;

        writeln!(out, "// Code generated by embed-literal. DO NOT EDIT.")?;
        writeln!(out)?;
        writeln!(out, "pub mod {package} {{")?;
        writeln!(out, "    #![allow(non_upper_case_globals, dead_code)]")?;
        if compress {
            writeln!(out)?;
            writeln!(out, "    use std::sync::LazyLock;")?;
        }

        if matches!(self.units, Units::Named(_)) {
            self.write_table(out, payloads)?;
        }
        if compress {
            self.write_unpack_guard(out, payloads)?;
        }
        for (index, payload) in payloads.iter().enumerate() {
            self.write_payload(out, index, payload)?;
        }

        writeln!(out, "}}")
    }

    /// Table of contents mapping each input name to its buffer.
    fn write_table(&self, out: &mut dyn Write, payloads: &[Payload<'_>]) -> io::Result<()> {
        let var = &self.config.var;
        let len = payloads.len();
        let ty = format!("[(&str, &[u8]); {len}]");

        writeln!(out)?;
        writeln!(out, "    /// Table of contents, in input order.")?;
        if self.config.compress {
            let init = "LazyLock::new(|| {";
            writeln!(out, "    pub static {var}: LazyLock<{ty}> = {init}")?;
            writeln!(out, "        [")?;
            for Payload { ident, name, .. } in payloads {
                let name = name.unwrap_or_default();
                writeln!(out, "            ({name:?}, *{ident}),")?;
            }
            writeln!(out, "        ]")?;
            writeln!(out, "    }});")
        } else {
            writeln!(out, "    pub static {var}: {ty} = [")?;
            for Payload { ident, name, .. } in payloads {
                let name = name.unwrap_or_default();
                writeln!(out, "        ({name:?}, {ident}),")?;
            }
            writeln!(out, "    ];")
        }
    }

    /// The one-time decompression of every payload, shared by all buffers.
    fn write_unpack_guard(
        &self,
        out: &mut dyn Write,
        payloads: &[Payload<'_>],
    ) -> io::Result<()> {
        let unpacked = self.unpacked_ident();
        let runtime = &self.config.runtime_crate;
        let packed = payloads
            .iter()
            .map(|p| format!("{}_zstd", p.ident))
            .collect::<Vec<_>>()
            .join(", ");
        let message = "{}: failed to decompress embedded data: {err}";

        writeln!(out)?;
        writeln!(
            out,
            "    /// Decompressed on first access to any buffer in this module."
        )?;
        writeln!(
            out,
            "    static {unpacked}: LazyLock<Vec<Vec<u8>>> = LazyLock::new(|| {{"
        )?;
        writeln!(
            out,
            "        {runtime}::decompress_all(&[{packed}]).unwrap_or_else(|err| {{"
        )?;
        writeln!(out, "            panic!({message:?}, module_path!())")?;
        writeln!(out, "        }})")?;
        writeln!(out, "    }});")
    }

    fn write_payload(
        &self,
        out: &mut dyn Write,
        index: usize,
        payload: &Payload<'_>,
    ) -> io::Result<()> {
        let ident = &payload.ident;

        writeln!(out)?;
        if let Some(name) = payload.name {
            writeln!(out, "    /// Contents of {name:?}.")?;
        }
        if self.config.compress {
            let unpacked = self.unpacked_ident();
            let init = format!("LazyLock::new(|| {unpacked}[{index}].as_slice())");
            writeln!(out, "    pub static {ident}: LazyLock<&[u8]> = {init};")?;
            write!(out, "    static {ident}_zstd: &[u8] = ")?;
        } else {
            write!(out, "    pub static {ident}: &[u8] = ")?;
        }
        write_literal(out, &payload.data, self.config.encoding, "        ")?;
        writeln!(out, ";")
    }

    fn unpacked_ident(&self) -> String {
        format!("{}_unpacked", self.config.var)
    }
}

/// The bytes destined for one literal, raw or compressed.
struct Payload<'a> {
    ident: String,
    name: Option<&'a str>,
    data: Cow<'a, [u8]>,
}

fn read_unit(path: &Path) -> Result<InputUnit> {
    let name = path
        .to_str()
        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from '{name}'", bytes.len());
    Ok(InputUnit::new(name, bytes))
}
