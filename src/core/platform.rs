use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered substring table; first match wins. `x.com` is deliberately last
/// among the named entries so it cannot shadow a longer host fragment.
const PLATFORM_TABLE: &[(&str, Platform)] = &[
    ("youtube.com", Platform::Youtube),
    ("youtu.be", Platform::Youtube),
    ("facebook.com", Platform::Facebook),
    ("fb.watch", Platform::Facebook),
    ("instagram.com", Platform::Instagram),
    ("tiktok.com", Platform::Tiktok),
    ("twitter.com", Platform::Twitter),
    ("x.com", Platform::Twitter),
    ("reddit.com", Platform::Reddit),
    ("vimeo.com", Platform::Vimeo),
    ("pinterest.com", Platform::Pinterest),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Facebook,
    Instagram,
    Tiktok,
    Twitter,
    Reddit,
    Vimeo,
    Pinterest,
    Generic,
}

impl Platform {
    /// Classify a URL by substring lookup. No URL parsing or validation:
    /// malformed input simply falls through to `Generic`.
    pub fn classify(url: &str) -> Platform {
        PLATFORM_TABLE
            .iter()
            .find(|(needle, _)| url.contains(needle))
            .map(|&(_, platform)| platform)
            .unwrap_or(Platform::Generic)
    }

    /// Whether the extraction engine should pull browser cookies for this
    /// platform. Facebook and Instagram reject anonymous access for most
    /// content.
    pub fn needs_browser_cookies(&self) -> bool {
        matches!(self, Platform::Facebook | Platform::Instagram)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::Reddit => "reddit",
            Platform::Vimeo => "vimeo",
            Platform::Pinterest => "pinterest",
            Platform::Generic => "generic",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
