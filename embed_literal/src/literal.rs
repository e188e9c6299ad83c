//! Rendering of a byte sequence as a Rust literal expression of type `&[u8]`.
use std::io::{self, Write};

/// Number of values per line in the [`Encoding::ElementList`] form.
pub const BYTES_PER_LINE: usize = 16;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// How a byte sequence is spelled in the generated source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// A single byte-string token, `b"\x00\xff..."`.
    ///
    /// `rustc` handles one large string token far better than an array
    /// literal with one expression per byte, so this is the form to use for
    /// anything bigger than a few kilobytes.
    #[default]
    EscapedString,
    /// An array literal, `&[0x00, 0xff, ...]`, with [`BYTES_PER_LINE`]
    /// values per line. Readable and diff-friendly, but slow to compile
    /// for large inputs.
    ElementList,
}

/// Writes `bytes` as a literal in the given encoding.
///
/// `indent` prefixes every data line of the element-list form; the closing
/// bracket is indented one level (four spaces) less.
pub(crate) fn write_literal<W: Write + ?Sized>(
    out: &mut W,
    bytes: &[u8],
    encoding: Encoding,
    indent: &str,
) -> io::Result<()> {
    let buf = match encoding {
        Encoding::EscapedString => escaped_string(bytes),
        Encoding::ElementList => element_list(bytes, indent),
    };
    out.write_all(&buf)
}

fn escaped_string(bytes: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(bytes.len() * 4 + 3);
    buf.extend_from_slice(b"b\"");
    for &b in bytes {
        buf.extend_from_slice(b"\\x");
        buf.extend_from_slice(&hex_digits(b));
    }
    buf.push(b'"');
    buf
}

fn element_list(bytes: &[u8], indent: &str) -> Vec<u8> {
    if bytes.is_empty() {
        return b"&[]".to_vec();
    }

    let lines = bytes.len().div_ceil(BYTES_PER_LINE);
    let mut buf = Vec::with_capacity(bytes.len() * 6 + lines * (indent.len() + 1) + 8);
    buf.extend_from_slice(b"&[\n");
    for chunk in bytes.chunks(BYTES_PER_LINE) {
        buf.extend_from_slice(indent.as_bytes());
        for (i, &b) in chunk.iter().enumerate() {
            if i > 0 {
                buf.extend_from_slice(b", ");
            }
            buf.extend_from_slice(b"0x");
            buf.extend_from_slice(&hex_digits(b));
        }
        buf.extend_from_slice(b",\n");
    }
    buf.extend_from_slice(indent.strip_suffix("    ").unwrap_or("").as_bytes());
    buf.push(b']');
    buf
}

fn hex_digits(b: u8) -> [u8; 2] {
    [HEX[usize::from(b >> 4)], HEX[usize::from(b & 0xf)]]
}

/// Test-only reader for literals produced by [`write_literal`].
///
/// Returns the decoded bytes and the remainder of `src` after the literal.
#[cfg(test)]
pub(crate) fn decode(src: &str) -> Option<(Vec<u8>, &str)> {
    fn hex_byte(digits: &str) -> Option<u8> {
        u8::from_str_radix(digits, 16).ok()
    }

    if let Some(body) = src.strip_prefix("b\"") {
        let end = body.find('"')?;
        let (escapes, rest) = (&body[..end], &body[end + 1..]);
        let mut bytes = Vec::with_capacity(escapes.len() / 4);
        let mut rem = escapes;
        while !rem.is_empty() {
            let digits = rem.strip_prefix("\\x")?.get(..2)?;
            bytes.push(hex_byte(digits)?);
            rem = &rem[4..];
        }
        Some((bytes, rest))
    } else if let Some(body) = src.strip_prefix("&[") {
        let end = body.find(']')?;
        let (values, rest) = (&body[..end], &body[end + 1..]);
        let bytes = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| hex_byte(v.strip_prefix("0x")?))
            .collect::<Option<Vec<u8>>>()?;
        Some((bytes, rest))
    } else {
        None
    }
}
