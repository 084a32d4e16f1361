//! Compression codecs and self-extracting stubs.
//!
//! A stub is a one-line program that decompresses and runs the payload:
//!
//! ```text
//! exec(__import__('zlib').decompress(b'x\x9c...'))
//! ```
//!
//! [`parse_stub`] is the inverse used by the restore path.

use std::fmt;
use std::io::{self, Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::{Compression, GzBuilder};
use serde::{Deserialize, Serialize};
use xz2::read::XzDecoder;
use xz2::stream::{LzmaOptions, Stream};
use xz2::write::XzEncoder;

use crate::codegen::literal::bytes_literal;
use crate::error::CodecError;

const LZMA_PRESET: u32 = 6;
const ZSTD_LEVEL: i32 = 19;

/// A stub codec. `LzmaAlone` is the legacy `.lzma` container; it shares the
/// `lzma` module, whose decompressor detects the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Codec {
    Lzma,
    Zlib,
    Gzip,
    Bz2,
    /// Needs Python 3.14 (`compression.zstd`).
    Zstd,
    LzmaAlone,
}

impl Codec {
    /// The codecs enabled when nothing is configured.
    pub const DEFAULT: [Codec; 4] = [Codec::Lzma, Codec::Zlib, Codec::Gzip, Codec::Bz2];

    /// Python module providing `decompress`.
    pub fn module(self) -> &'static str {
        match self {
            Codec::Lzma | Codec::LzmaAlone => "lzma",
            Codec::Zlib => "zlib",
            Codec::Gzip => "gzip",
            Codec::Bz2 => "bz2",
            Codec::Zstd => "compression.zstd",
        }
    }

    fn from_module(module: &str) -> Result<Codec, CodecError> {
        match module {
            "lzma" => Ok(Codec::Lzma),
            "zlib" => Ok(Codec::Zlib),
            "gzip" => Ok(Codec::Gzip),
            "bz2" => Ok(Codec::Bz2),
            "compression.zstd" => Ok(Codec::Zstd),
            other => Err(CodecError::UnknownModule {
                module: other.to_string(),
            }),
        }
    }

    pub fn compress(self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.compress_raw(data)
            .map_err(|source| CodecError::Compress {
                codec: self,
                source,
            })
    }

    fn compress_raw(self, data: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Codec::Lzma => {
                let mut encoder = XzEncoder::new(Vec::new(), LZMA_PRESET);
                encoder.write_all(data)?;
                encoder.finish()
            }
            Codec::LzmaAlone => {
                let options = LzmaOptions::new_preset(LZMA_PRESET).map_err(io::Error::other)?;
                let stream = Stream::new_lzma_encoder(&options).map_err(io::Error::other)?;
                let mut encoder = XzEncoder::new_stream(Vec::new(), stream);
                encoder.write_all(data)?;
                encoder.finish()
            }
            Codec::Zlib => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
            Codec::Gzip => {
                // A zero mtime keeps the output reproducible.
                let mut encoder = GzBuilder::new()
                    .mtime(0)
                    .write(Vec::new(), Compression::best());
                encoder.write_all(data)?;
                encoder.finish()
            }
            Codec::Bz2 => {
                let mut encoder =
                    bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::best());
                encoder.write_all(data)?;
                encoder.finish()
            }
            Codec::Zstd => zstd::encode_all(data, ZSTD_LEVEL),
        }
    }

    pub fn decompress(self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.decompress_raw(data)
            .map_err(|source| CodecError::Decompress {
                codec: self,
                source,
            })
    }

    fn decompress_raw(self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        match self {
            Codec::Lzma | Codec::LzmaAlone => {
                let stream = Stream::new_auto_decoder(u64::MAX, 0).map_err(io::Error::other)?;
                XzDecoder::new_stream(data, stream).read_to_end(&mut out)?;
            }
            Codec::Zlib => {
                ZlibDecoder::new(data).read_to_end(&mut out)?;
            }
            Codec::Gzip => {
                GzDecoder::new(data).read_to_end(&mut out)?;
            }
            Codec::Bz2 => {
                bzip2::read::BzDecoder::new(data).read_to_end(&mut out)?;
            }
            Codec::Zstd => out = zstd::decode_all(data)?,
        }
        Ok(out)
    }

    /// The program that decompresses `payload` and executes it.
    pub fn stub(self, payload: &[u8]) -> String {
        let loader = match self {
            Codec::Zstd => "__import__('compression.zstd').zstd".to_string(),
            _ => format!("__import__('{}')", self.module()),
        };
        format!("exec({}.decompress({}))", loader, bytes_literal(payload))
    }

    /// Compress `source` and wrap it in a stub.
    pub fn encode(self, source: &str) -> Result<String, CodecError> {
        Ok(self.stub(&self.compress(source.as_bytes())?))
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Codec::Lzma => "lzma",
            Codec::Zlib => "zlib",
            Codec::Gzip => "gzip",
            Codec::Bz2 => "bz2",
            Codec::Zstd => "zstd",
            Codec::LzmaAlone => "lzma-alone",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Stub recognition
// ============================================================================

fn not_a_stub(reason: impl Into<String>) -> CodecError {
    CodecError::NotAStub {
        reason: reason.into(),
    }
}

/// Recognize `exec(__import__(NAME)[.zstd].decompress(BYTES))` and return
/// the codec and the compressed payload.
pub fn parse_stub(text: &str) -> Result<(Codec, Vec<u8>), CodecError> {
    let rest = text
        .trim()
        .strip_prefix("exec(__import__(")
        .ok_or_else(|| not_a_stub("missing exec(__import__("))?;

    let quote = rest
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| not_a_stub("module name is not a string"))?;
    let rest = &rest[1..];
    let end = rest
        .find(quote)
        .ok_or_else(|| not_a_stub("unterminated module name"))?;
    let module = &rest[..end];
    let rest = rest[end + 1..]
        .strip_prefix(')')
        .ok_or_else(|| not_a_stub("missing ) after module name"))?;

    let codec = Codec::from_module(module)?;
    let rest = match codec {
        Codec::Zstd => rest
            .strip_prefix(".zstd")
            .ok_or_else(|| not_a_stub("missing .zstd attribute"))?,
        _ => rest,
    };
    let rest = rest
        .strip_prefix(".decompress(")
        .ok_or_else(|| not_a_stub("missing .decompress("))?;

    let (payload, rest) = parse_bytes_literal(rest)?;
    if rest != "))" {
        return Err(not_a_stub(format!("trailing text {:?}", rest)));
    }
    Ok((codec, payload))
}

/// Parse a leading `b'...'` literal; returns the bytes and the remaining
/// text.
pub fn parse_bytes_literal(text: &str) -> Result<(Vec<u8>, &str), CodecError> {
    let rest = text
        .strip_prefix(['b', 'B'])
        .ok_or_else(|| not_a_stub("payload is not a bytes literal"))?;
    let quote = match rest.as_bytes().first() {
        Some(q @ (b'\'' | b'"')) => *q,
        _ => return Err(not_a_stub("payload is not quoted")),
    };
    let bytes = rest.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 1;
    while i < bytes.len() {
        let b = bytes[i];
        if b == quote {
            return Ok((out, &rest[i + 1..]));
        }
        if !b.is_ascii() || b == b'\n' {
            return Err(not_a_stub("invalid character in bytes literal"));
        }
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let escape = *bytes
            .get(i + 1)
            .ok_or_else(|| not_a_stub("dangling backslash"))?;
        i += 2;
        match escape {
            b'\\' | b'\'' | b'"' => out.push(escape),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'\n' => {}
            b'x' => {
                let hex = rest
                    .get(i..i + 2)
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| not_a_stub("bad \\x escape"))?;
                out.push(hex);
                i += 2;
            }
            b'0'..=b'7' => {
                let mut value = u32::from(escape - b'0');
                let mut digits = 1;
                while digits < 3 {
                    match bytes.get(i) {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            i += 1;
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xff) as u8);
            }
            other => {
                out.push(b'\\');
                out.push(other);
            }
        }
    }
    Err(not_a_stub("unterminated bytes literal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "import os;print(os.getcwd());x=[i*i for i in range(100)]";

    #[test]
    fn every_codec_round_trips() {
        for codec in [
            Codec::Lzma,
            Codec::LzmaAlone,
            Codec::Zlib,
            Codec::Gzip,
            Codec::Bz2,
            Codec::Zstd,
        ] {
            let packed = codec.compress(SOURCE.as_bytes()).unwrap();
            let unpacked = codec.decompress(&packed).unwrap();
            assert_eq!(unpacked, SOURCE.as_bytes(), "{}", codec);
        }
    }

    #[test]
    fn lzma_module_reads_both_containers() {
        let packed = Codec::LzmaAlone.compress(SOURCE.as_bytes()).unwrap();
        assert_eq!(Codec::Lzma.decompress(&packed).unwrap(), SOURCE.as_bytes());
    }

    #[test]
    fn gzip_output_is_reproducible() {
        let a = Codec::Gzip.compress(SOURCE.as_bytes()).unwrap();
        let b = Codec::Gzip.compress(SOURCE.as_bytes()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn stubs_name_their_module() {
        let stub = Codec::Zlib.stub(b"\x00a'");
        assert_eq!(stub, "exec(__import__('zlib').decompress(b\"\\x00a'\"))");
        assert!(Codec::Zstd
            .stub(b"z")
            .starts_with("exec(__import__('compression.zstd').zstd.decompress("));
    }

    #[test]
    fn stubs_parse_back() {
        for codec in [Codec::Lzma, Codec::Zlib, Codec::Gzip, Codec::Bz2, Codec::Zstd] {
            let stub = codec.encode(SOURCE).unwrap();
            let (found, payload) = parse_stub(&stub).unwrap();
            assert_eq!(found, codec);
            assert_eq!(found.decompress(&payload).unwrap(), SOURCE.as_bytes());
        }
    }

    #[test]
    fn bytes_literal_escapes() {
        let (bytes, rest) = parse_bytes_literal("b'a\\n\\x41\\101\\0\\q\\''))").unwrap();
        assert_eq!(bytes, b"a\nAA\0\\q'");
        assert_eq!(rest, "))");
    }

    #[test]
    fn rejects_other_programs() {
        assert!(matches!(
            parse_stub("print(1)"),
            Err(CodecError::NotAStub { .. })
        ));
        assert!(matches!(
            parse_stub("exec(__import__('pickle').decompress(b''))"),
            Err(CodecError::UnknownModule { .. })
        ));
        assert!(parse_stub("exec(__import__('zlib').decompress(b'x'))+1").is_err());
    }

    #[test]
    fn codec_names_in_config() {
        let codecs: Vec<Codec> = serde_json::from_str(r#"["lzma","bz2","zstd"]"#).unwrap();
        assert_eq!(codecs, vec![Codec::Lzma, Codec::Bz2, Codec::Zstd]);
    }
}
