use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Characters that are invalid in filenames on at least one supported OS.
const INVALID_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

const MAX_TITLE_LEN: usize = 100;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Normalize a media title into a safe filename base: strip invalid
/// characters, collapse each whitespace run to a single underscore, cap the
/// length. Total and idempotent.
pub fn sanitize_title(title: &str) -> String {
    let stripped: String = title.chars().filter(|c| !INVALID_CHARS.contains(c)).collect();
    let collapsed = whitespace_run().replace_all(&stripped, "_");

    if collapsed.chars().count() > MAX_TITLE_LEN {
        collapsed.chars().take(MAX_TITLE_LEN).collect()
    } else {
        collapsed.into_owned()
    }
}

/// Extension → content type for the formats this service produces.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("wav", "audio/wav"),
    ("flac", "audio/flac"),
];

/// Resolve the content type for a filename: fixed table for the formats we
/// produce, generic lookup for anything else, octet-stream as last resort.
pub fn content_type_for(filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());

    if let Some(ext) = &ext {
        if let Some((_, ct)) = CONTENT_TYPES.iter().find(|(e, _)| *e == ext.as_str()) {
            return ct.to_string();
        }
    }

    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}
