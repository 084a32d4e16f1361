//! The reverse path: turn a stub back into source text.
//!
//! Pretty printing is not done here; callers plug a [`SourceFormatter`].

use tracing::debug;

use crate::codec::{parse_stub, Codec};
use crate::error::CodecError;

/// Reformats plain source text for reading.
pub trait SourceFormatter {
    fn format(&self, source: &str) -> String;
}

/// Trims surrounding whitespace and ends the text with one newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl SourceFormatter for PlainFormatter {
    fn format(&self, source: &str) -> String {
        let mut text = source.trim().to_string();
        text.push('\n');
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restored {
    /// The input was a stub and decoded cleanly.
    Decoded { codec: Codec, text: String },
    /// The input is returned unchanged.
    Plain(String),
}

impl Restored {
    pub fn text(&self) -> &str {
        match self {
            Restored::Decoded { text, .. } | Restored::Plain(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Restored::Decoded { text, .. } | Restored::Plain(text) => text,
        }
    }
}

fn decode(text: &str) -> Result<(Codec, String), CodecError> {
    let (codec, payload) = parse_stub(text)?;
    let bytes = codec.decompress(&payload)?;
    let source = String::from_utf8(bytes).map_err(|err| CodecError::Decompress {
        codec,
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
    })?;
    Ok((codec, source))
}

/// Decode `text` if it is a stub; any failure yields the input as plain
/// text.
pub fn restore(text: &str) -> Restored {
    match decode(text) {
        Ok((codec, text)) => {
            debug!("decoded {} stub", codec);
            Restored::Decoded { codec, text }
        }
        Err(err) => {
            debug!("treating input as plain text: {}", err);
            Restored::Plain(text.to_string())
        }
    }
}

/// [`restore`], then hand the text to `formatter`.
pub fn restore_with(text: &str, formatter: &dyn SourceFormatter) -> String {
    formatter.format(restore(text).text())
}
