//! Primary document extraction.
//!
//! The root `README.md` is stored whole, with local images embedded as
//! `data:` URIs so the stored text renders without the working tree.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

use super::encoding::decode;
use super::filter::dotted_extension;

/// File name of the primary document, looked up directly under the root.
pub const PRIMARY_DOCUMENT_NAME: &str = "README.md";

/// `![alt](path)` with an optional ` =WIDTHxHEIGHT` size suffix.
static IMAGE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)(?:\s*=\s*(\d+x?\d*))?\)")
        .expect("image reference pattern is a valid regex")
});

/// Read `README.md` under `root` and inline its local images.
///
/// Returns `None` if the file is absent, unreadable or not decodable.
#[must_use]
pub fn extract_primary_document(root: &Path) -> Option<String> {
    let path = root.join(PRIMARY_DOCUMENT_NAME);
    if !path.is_file() {
        return None;
    }

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read primary document");
            return None;
        }
    };

    match decode(&bytes) {
        Ok(decoded) => Some(inline_images(&decoded.text, root)),
        Err(encoding) => {
            warn!(path = %path.display(), encoding, "Primary document is not decodable");
            None
        }
    }
}

/// Replace image references that resolve to files under `base_dir` with
/// inline `<img>` tags.
///
/// Remote URLs, absolute paths, references to missing files and paths that
/// resolve outside `base_dir` are left exactly as written.
#[must_use]
pub fn inline_images(markdown: &str, base_dir: &Path) -> String {
    IMAGE_REF
        .replace_all(markdown, |caps: &Captures| {
            inline_one(caps, base_dir).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn inline_one(caps: &Captures, base_dir: &Path) -> Option<String> {
    let alt = &caps[1];
    let target = &caps[2];

    if target.contains("://") || target.starts_with("data:") || Path::new(target).is_absolute() {
        return None;
    }

    let image_path = base_dir.join(target);
    if !image_path.is_file() {
        return None;
    }

    // Resolves `..` and symlinks; the image must live inside the checkout
    let inside = match (fs::canonicalize(base_dir), fs::canonicalize(&image_path)) {
        (Ok(base), Ok(image)) => image.starts_with(base),
        _ => false,
    };
    if !inside {
        warn!(image = target, "Image outside the checkout, leaving reference");
        return None;
    }

    let bytes = match fs::read(&image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %image_path.display(), error = %e, "Cannot read image, leaving reference");
            return None;
        }
    };

    let mut tag = format!(
        "<img src=\"data:{};base64,{}\" alt=\"{}\"",
        image_mime(target),
        STANDARD.encode(&bytes),
        alt.replace('"', "&quot;")
    );

    if let Some(size) = caps.get(3) {
        let (width, height) = size.as_str().split_once('x').unwrap_or((size.as_str(), ""));
        if !width.is_empty() {
            tag.push_str(&format!(" width=\"{width}\""));
        }
        if !height.is_empty() {
            tag.push_str(&format!(" height=\"{height}\""));
        }
    }

    tag.push_str(" />");
    Some(tag)
}

/// `image/<subtype>` derived from the file extension.
fn image_mime(target: &str) -> String {
    let file_name = target.rsplit('/').next().unwrap_or(target);
    let ext = dotted_extension(file_name)
        .map(|e| e[1..].to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" => "image/jpeg".to_string(),
        "svg" => "image/svg+xml".to_string(),
        _ => format!("image/{ext}"),
    }
}
