use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Platform;

/// Requested output container/codec, audio and video families combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Mp4,
    Webm,
    Mkv,
    Avi,
    Mp3,
    M4a,
    Wav,
    Flac,
}

impl MediaFormat {
    pub fn is_audio(&self) -> bool {
        matches!(self, MediaFormat::Mp3 | MediaFormat::M4a | MediaFormat::Wav | MediaFormat::Flac)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Webm => "webm",
            MediaFormat::Mkv => "mkv",
            MediaFormat::Avi => "avi",
            MediaFormat::Mp3 => "mp3",
            MediaFormat::M4a => "m4a",
            MediaFormat::Wav => "wav",
            MediaFormat::Flac => "flac",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mp4" => Ok(MediaFormat::Mp4),
            "webm" => Ok(MediaFormat::Webm),
            "mkv" => Ok(MediaFormat::Mkv),
            "avi" => Ok(MediaFormat::Avi),
            "mp3" => Ok(MediaFormat::Mp3),
            "m4a" => Ok(MediaFormat::M4a),
            "wav" => Ok(MediaFormat::Wav),
            "flac" => Ok(MediaFormat::Flac),
            _ => Err(format!("unknown format '{s}'")),
        }
    }
}

/// Resolution tier. Tiers are half-open height buckets except the two
/// extremes; `Best` applies no filter at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "best")]
    Best,
    #[serde(rename = "2160")]
    P2160,
    #[serde(rename = "1440")]
    P1440,
    #[serde(rename = "1080")]
    P1080,
    #[serde(rename = "720")]
    P720,
    #[serde(rename = "480")]
    P480,
    #[serde(rename = "360")]
    P360,
    #[serde(rename = "240")]
    P240,
    #[serde(rename = "144")]
    P144,
}

impl Resolution {
    /// Selector filter for this tier: `[height>=N][height<M]` where M is the
    /// next tier up, unbounded at 2160.
    pub fn height_filter(&self) -> &'static str {
        match self {
            Resolution::Best => "",
            Resolution::P2160 => "[height>=2160]",
            Resolution::P1440 => "[height>=1440][height<2160]",
            Resolution::P1080 => "[height>=1080][height<1440]",
            Resolution::P720 => "[height>=720][height<1080]",
            Resolution::P480 => "[height>=480][height<720]",
            Resolution::P360 => "[height>=360][height<480]",
            Resolution::P240 => "[height>=240][height<360]",
            Resolution::P144 => "[height>=144][height<240]",
        }
    }
}

impl std::str::FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best" => Ok(Resolution::Best),
            "2160" => Ok(Resolution::P2160),
            "1440" => Ok(Resolution::P1440),
            "1080" => Ok(Resolution::P1080),
            "720" => Ok(Resolution::P720),
            "480" => Ok(Resolution::P480),
            "360" => Ok(Resolution::P360),
            "240" => Ok(Resolution::P240),
            "144" => Ok(Resolution::P144),
            _ => Err(format!("unknown resolution '{s}'")),
        }
    }
}

/// Post-download transformation, executed by the engine in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessingStep {
    /// Strip the audio stream and encode it as `codec` at `quality` kbps.
    ExtractAudio { codec: MediaFormat, quality: &'static str },
    /// Rewrap streams into `container` without re-encoding.
    RemuxVideo { container: &'static str },
    /// Re-encode into `container`.
    ConvertVideo { container: &'static str },
}

/// Everything the extraction engine needs to know for one request.
/// Computed fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPlan {
    /// Engine-native stream selector expression.
    pub format_selector: String,
    /// Container passed as the merge target, where the format needs one.
    pub merge_container: Option<&'static str>,
    /// Ordered post-processing chain.
    pub post_processing: Vec<PostProcessingStep>,
    /// Browser to lift cookies from, for platforms that require a session.
    pub cookies_from_browser: Option<&'static str>,
}

impl ExtractionPlan {
    /// Derive the engine parameters for a format/resolution/platform triple.
    /// Pure policy: no I/O, no engine knowledge beyond selector syntax.
    pub fn resolve(format: MediaFormat, resolution: Resolution, platform: Platform) -> Self {
        let mut plan = if format.is_audio() {
            Self::resolve_audio(format)
        } else {
            Self::resolve_video(format, resolution)
        };

        if platform.needs_browser_cookies() {
            plan.cookies_from_browser = Some("chrome");
        }

        plan
    }

    fn resolve_audio(format: MediaFormat) -> Self {
        // 192 kbps is plenty for lossy targets; push the encoder harder for
        // the lossless-ish containers.
        let quality = match format {
            MediaFormat::Wav | MediaFormat::Flac => "320",
            _ => "192",
        };

        ExtractionPlan {
            format_selector: "bestaudio/best".to_string(),
            merge_container: None,
            post_processing: vec![PostProcessingStep::ExtractAudio { codec: format, quality }],
            cookies_from_browser: None,
        }
    }

    fn resolve_video(format: MediaFormat, resolution: Resolution) -> Self {
        let filter = resolution.height_filter();

        let (format_selector, merge_container, post_processing) = match format {
            MediaFormat::Mp4 => (
                // Pin H.264 + AAC explicitly so the result plays in
                // QuickTime and other picky players, then degrade to any
                // mp4, then to whatever is best.
                format!("bestvideo[ext=mp4][vcodec^=avc]{filter}+bestaudio[ext=m4a]/best[ext=mp4]/best"),
                Some("mp4"),
                vec![
                    PostProcessingStep::ConvertVideo { container: "mp4" },
                    PostProcessingStep::RemuxVideo { container: "mp4" },
                ],
            ),
            MediaFormat::Webm => (
                format!("bestvideo[ext=webm]{filter}+bestaudio[ext=webm]/best[ext=webm]"),
                Some("webm"),
                vec![],
            ),
            MediaFormat::Mkv => (
                // mkv takes any codec, so no stream constraint.
                format!("bestvideo{filter}+bestaudio/best"),
                Some("mkv"),
                vec![],
            ),
            MediaFormat::Avi => {
                // avi with no explicit tier caps at 720p: the conversion to
                // such an old container at 4K is pointlessly expensive, so
                // "best" means "best up to 720" here. Intentional asymmetry.
                let selector = if resolution == Resolution::Best {
                    "bestvideo[height<=720]+bestaudio/best[height<=720]".to_string()
                } else {
                    format!("bestvideo{filter}+bestaudio/best")
                };
                (
                    selector,
                    Some("avi"),
                    vec![PostProcessingStep::ConvertVideo { container: "avi" }],
                )
            }
            _ => unreachable!("audio formats handled by resolve_audio"),
        };

        ExtractionPlan {
            format_selector,
            merge_container,
            post_processing,
            cookies_from_browser: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_quality_tiers() {
        let plan = ExtractionPlan::resolve(MediaFormat::Mp3, Resolution::Best, Platform::Generic);
        assert_eq!(plan.format_selector, "bestaudio/best");
        assert_eq!(
            plan.post_processing,
            vec![PostProcessingStep::ExtractAudio { codec: MediaFormat::Mp3, quality: "192" }]
        );

        let plan = ExtractionPlan::resolve(MediaFormat::Flac, Resolution::Best, Platform::Generic);
        assert_eq!(
            plan.post_processing,
            vec![PostProcessingStep::ExtractAudio { codec: MediaFormat::Flac, quality: "320" }]
        );
    }

    #[test]
    fn test_audio_ignores_resolution() {
        let best = ExtractionPlan::resolve(MediaFormat::M4a, Resolution::Best, Platform::Generic);
        let tier = ExtractionPlan::resolve(MediaFormat::M4a, Resolution::P1080, Platform::Generic);
        assert_eq!(best, tier);
    }

    #[test]
    fn test_mp4_1080_selector() {
        let plan = ExtractionPlan::resolve(MediaFormat::Mp4, Resolution::P1080, Platform::Generic);
        assert_eq!(
            plan.format_selector,
            "bestvideo[ext=mp4][vcodec^=avc][height>=1080][height<1440]+bestaudio[ext=m4a]/best[ext=mp4]/best"
        );
        assert!(plan
            .post_processing
            .contains(&PostProcessingStep::RemuxVideo { container: "mp4" }));
        assert_eq!(plan.merge_container, Some("mp4"));
    }

    #[test]
    fn test_best_has_no_filter_except_avi() {
        for format in [MediaFormat::Mp4, MediaFormat::Webm, MediaFormat::Mkv] {
            let plan = ExtractionPlan::resolve(format, Resolution::Best, Platform::Generic);
            assert!(
                !plan.format_selector.contains("height"),
                "{format}: {}",
                plan.format_selector
            );
        }

        let avi = ExtractionPlan::resolve(MediaFormat::Avi, Resolution::Best, Platform::Generic);
        assert_eq!(
            avi.format_selector,
            "bestvideo[height<=720]+bestaudio/best[height<=720]"
        );
    }

    #[test]
    fn test_avi_explicit_tier_uncapped() {
        let plan = ExtractionPlan::resolve(MediaFormat::Avi, Resolution::P2160, Platform::Generic);
        assert_eq!(plan.format_selector, "bestvideo[height>=2160]+bestaudio/best");
        assert_eq!(
            plan.post_processing,
            vec![PostProcessingStep::ConvertVideo { container: "avi" }]
        );
    }

    #[test]
    fn test_extreme_tiers() {
        assert_eq!(Resolution::P2160.height_filter(), "[height>=2160]");
        assert_eq!(Resolution::P144.height_filter(), "[height>=144][height<240]");
    }

    #[test]
    fn test_cookie_platforms() {
        let plan = ExtractionPlan::resolve(MediaFormat::Mp4, Resolution::Best, Platform::Instagram);
        assert_eq!(plan.cookies_from_browser, Some("chrome"));

        let plan = ExtractionPlan::resolve(MediaFormat::Mp3, Resolution::Best, Platform::Facebook);
        assert_eq!(plan.cookies_from_browser, Some("chrome"));

        let plan = ExtractionPlan::resolve(MediaFormat::Mp4, Resolution::Best, Platform::Youtube);
        assert_eq!(plan.cookies_from_browser, None);
    }
}
