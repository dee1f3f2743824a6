//! Corpus extraction from a checked-out working tree.
//!
//! - [`encoding`] - Charset sniffing and decoding
//! - [`filter`] - Path rules and noise-line detection
//! - [`corpus`] - Directory walk producing `FileLine`s
//! - [`readme`] - Primary document with inlined images
//!
//! Extraction never fails as a whole: a file that cannot be read or
//! decoded is logged and skipped, and the walk continues.

pub mod corpus;
pub mod encoding;
pub mod filter;
pub mod readme;

use std::path::PathBuf;

pub use corpus::{extract, Extraction, ExtractionReport};
pub use encoding::{decode, detect, encoding_name, Decoded};
pub use filter::{dotted_extension, is_line_significant, is_path_included};
pub use readme::{extract_primary_document, inline_images, PRIMARY_DOCUMENT_NAME};

/// Per-file extraction failures. Always recoverable.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {encoding} text in {}", path.display())]
    Malformed {
        path: PathBuf,
        encoding: &'static str,
    },
}
