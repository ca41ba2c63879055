//! URL building for feeds and media files

use crate::model::BookId;
use std::path::Path;

/// URL of a media file: `{base}/media/{author}/{title}/{file}`, every
/// segment percent-encoded
pub fn media_url(base_url: &str, author: &str, title: &str, filename: &str) -> String {
    format!(
        "{}/media/{}/{}/{}",
        base_url,
        urlencoding::encode(author),
        urlencoding::encode(title),
        urlencoding::encode(filename)
    )
}

/// URL of a book's feed: `{base}/feed/{id}.xml`
pub fn feed_url(base_url: &str, id: &BookId) -> String {
    format!("{}/feed/{}.xml", base_url, id)
}

/// Enclosure MIME type for an audio file
pub fn mime_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("m4a" | "m4b" | "mp4" | "aac") => "audio/mp4",
        Some("ogg" | "oga" | "opus") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "audio/mpeg",
    }
}
