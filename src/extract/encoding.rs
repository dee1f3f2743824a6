//! Text encoding detection.
//!
//! Detection looks at the whole byte sequence, not a prefix: small files
//! rarely give a confident answer from a sample.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Best-guess encoding of `bytes`, or `None` when nothing can be told.
///
/// Empty and pure-ASCII input is ambiguous (every candidate decodes it the
/// same way) and yields `None`; callers fall back to UTF-8.
#[must_use]
pub fn detect(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.is_empty() {
        return None;
    }

    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }

    if bytes.is_ascii() {
        return None;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return Some(UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    Some(detector.guess(None, false))
}

/// WHATWG name of the detected encoding (e.g. `"UTF-8"`, `"windows-1252"`).
#[must_use]
pub fn encoding_name(bytes: &[u8]) -> Option<&'static str> {
    detect(bytes).map(Encoding::name)
}

/// Decoded text together with the encoding that produced it.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// Decode `bytes` with the sniffed encoding (UTF-8 when unsure).
///
/// A byte-order mark is stripped. Returns the name of the encoding as the
/// error when the input contains sequences malformed for it.
///
/// # Errors
///
/// Returns the encoding name if decoding hit malformed input.
pub fn decode(bytes: &[u8]) -> Result<Decoded, &'static str> {
    let encoding = detect(bytes).unwrap_or(UTF_8);
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(actual.name());
    }
    Ok(Decoded {
        text: text.into_owned(),
        encoding: actual,
    })
}
