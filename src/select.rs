//! Output selection: keep the shortest of the plain and compressed forms.

use std::fmt;

use tracing::{debug, warn};

use crate::codec::Codec;

/// Where the chosen text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Raw,
    Minimized,
    Stub(Codec),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Raw => f.write_str("raw"),
            Origin::Minimized => f.write_str("minimized"),
            Origin::Stub(codec) => write!(f, "{} stub", codec),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub origin: Origin,
    pub text: String,
}

impl Candidate {
    fn new(origin: Origin, text: impl Into<String>) -> Self {
        Candidate {
            origin,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOptions {
    /// Try the codec stubs at all.
    pub compress: bool,
    /// Never return plain text while some stub can be built.
    pub force_compress: bool,
    pub codecs: Vec<Codec>,
}

impl Default for SelectOptions {
    fn default() -> Self {
        SelectOptions {
            compress: true,
            force_compress: false,
            codecs: Codec::DEFAULT.to_vec(),
        }
    }
}

/// Keep `best` unless `candidate` is strictly shorter.
fn consider(best: &mut Option<Candidate>, candidate: Candidate) {
    debug!(
        "candidate {}: {} bytes",
        candidate.origin,
        candidate.text.len()
    );
    match best {
        Some(current) if current.text.len() <= candidate.text.len() => {}
        _ => *best = Some(candidate),
    }
}

fn stub(codec: Codec, source: &str) -> Option<Candidate> {
    match codec.encode(source) {
        Ok(text) => Some(Candidate::new(Origin::Stub(codec), text)),
        Err(err) => {
            warn!("skipping codec: {}", err);
            None
        }
    }
}

/// Pick the shortest of `raw`, `minimized` and one stub per configured
/// codec (plus the legacy lzma container), in that order. Lengths are
/// UTF-8 bytes; ties keep the earlier candidate.
///
/// Forced mode implies compression whatever `compress` says: the lzma-alone
/// stub is the baseline and only other stubs compete with it. If every codec
/// fails the minimized text is returned.
pub fn select(raw: Option<&str>, minimized: &str, options: &SelectOptions) -> Candidate {
    let mut best = None;
    let force = options.force_compress;

    if force {
        if let Some(baseline) = stub(Codec::LzmaAlone, minimized) {
            consider(&mut best, baseline);
        }
    } else {
        if let Some(raw) = raw {
            consider(&mut best, Candidate::new(Origin::Raw, raw));
        }
        consider(&mut best, Candidate::new(Origin::Minimized, minimized));
    }

    if options.compress || force {
        for codec in &options.codecs {
            if *codec == Codec::LzmaAlone {
                continue;
            }
            if let Some(candidate) = stub(*codec, minimized) {
                consider(&mut best, candidate);
            }
        }
        if !force {
            if let Some(candidate) = stub(Codec::LzmaAlone, minimized) {
                consider(&mut best, candidate);
            }
        }
    }

    let chosen = best.unwrap_or_else(|| {
        warn!("no codec produced a stub, keeping the minimized text");
        Candidate::new(Origin::Minimized, minimized)
    });
    debug!("selected {} ({} bytes)", chosen.origin, chosen.text.len());
    chosen
}
