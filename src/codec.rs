/// Supported content encodings.
///
/// Identity is never selected proactively; "no compression" is represented
/// by `None` at the negotiation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Gzip compression (deflate payload with gzip header and trailer).
    Gzip,
    /// Raw deflate compression.
    Deflate,
}

/// A single `Accept-Encoding` entry with its quality weight.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptEntry {
    /// Lower-cased encoding token, e.g. `"gzip"`, `"deflate"` or `"*"`.
    pub token: String,
    /// Quality weight in `[0, 1]`; 1.0 when unspecified.
    pub quality: f32,
}

impl Encoding {
    /// Returns the Content-Encoding header value for this encoding.
    pub fn content_encoding(&self) -> &'static str {
        match self {
            Encoding::Gzip => "gzip",
            Encoding::Deflate => "deflate",
        }
    }

    /// Parses the Accept-Encoding header and returns the encoding to apply,
    /// or `None` when the response must pass through unmodified.
    ///
    /// An encoding is eligible if the client listed it with a non-zero
    /// quality, or listed a non-zero wildcard without mentioning it. An
    /// explicit zero quality excludes the encoding outright, wildcard or
    /// not. Among eligible encodings the highest quality wins; gzip wins
    /// ties with deflate.
    pub fn negotiate(accept_encoding: &str) -> Option<Encoding> {
        let entries = parse_accept_encoding(accept_encoding);
        // When a token appears more than once, the last occurrence wins.
        let resolved = |token: &str| {
            entries
                .iter()
                .rev()
                .find(|entry| entry.token == token)
                .map(|entry| entry.quality)
        };
        let wildcard = resolved("*").filter(|q| *q > 0.0);
        let eligible = |token: &str| match resolved(token) {
            Some(q) if q > 0.0 => Some(q),
            // An explicit q=0 is an absolute exclusion.
            Some(_) => None,
            None => wildcard,
        };

        match (eligible("gzip"), eligible("deflate")) {
            (Some(gzip), Some(deflate)) if deflate > gzip => Some(Encoding::Deflate),
            (Some(_), _) => Some(Encoding::Gzip),
            (None, Some(_)) => Some(Encoding::Deflate),
            (None, None) => None,
        }
    }
}

/// Parses an `Accept-Encoding` header into its entries, in header order.
///
/// Entries are comma-separated; each entry is an encoding token optionally
/// followed by `;`-separated parameters. A `q` parameter (any case, with
/// surrounding whitespace tolerated) carries the quality weight. A missing,
/// malformed or out-of-range weight resolves to 1.0. An empty header yields
/// no entries.
pub fn parse_accept_encoding(header: &str) -> Vec<AcceptEntry> {
    let mut entries = Vec::new();

    for segment in header.split(',') {
        let mut parts = segment.split(';');
        let token = parts.next().unwrap_or("").trim().to_ascii_lowercase();
        if token.is_empty() {
            continue;
        }

        let mut quality = 1.0f32;
        for param in parts {
            let mut pair = param.splitn(2, '=');
            let name = pair.next().unwrap_or("").trim();
            if !name.eq_ignore_ascii_case("q") {
                continue;
            }
            if let Ok(q) = pair.next().unwrap_or("").trim().parse::<f32>() {
                if (0.0..=1.0).contains(&q) {
                    quality = q;
                }
            }
        }

        entries.push(AcceptEntry { token, quality });
    }

    entries
}
