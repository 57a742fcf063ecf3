/// Content detection heuristics for the page being saved
///
/// Detection order, first match wins:
/// 1. A video element with a source → video
/// 2. A text selection longer than 10 characters → text
/// 3. The largest fully loaded image above 200×200 that is not a data URI → image
/// 4. Anything else → article, with a snippet from the main content region
///
/// The page is reached through [`PageInspector`] so the heuristics can run
/// against a fake page in tests. Any inspector failure yields the article
/// default built from the document title.

use crate::error::Result;
use crate::item::{ItemType, truncate_chars};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const MIN_SELECTION_CHARS: usize = 10;
pub const MAX_SNIPPET_CHARS: usize = 500;
pub const MIN_IMAGE_SIDE: u32 = 200;

pub const THUMBNAIL_MAX_WIDTH: u32 = 240;
pub const THUMBNAIL_MAX_HEIGHT: u32 = 160;
pub const THUMBNAIL_QUALITY: f64 = 0.6;
pub const THUMBNAIL_TIMEOUT_MS: u32 = 3000;

pub const VIDEO_FRAME_WIDTH: u32 = 240;
pub const VIDEO_FRAME_HEIGHT: u32 = 135;
pub const VIDEO_FRAME_QUALITY: f64 = 0.5;
pub const VIDEO_FRAME_TIMEOUT_MS: u32 = 2000;

/// Candidate regions for an article snippet, in priority order
pub const MAIN_CONTENT_SELECTORS: [&str; 8] = [
    "article",
    "[role=\"main\"]",
    "main",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".content",
    "#content",
];

/// A region must have more text than this to be used as the snippet
pub const MIN_REGION_CHARS: usize = 50;
/// Paragraphs shorter than this are skipped in the fallback
pub const MIN_PARAGRAPH_CHARS: usize = 20;
pub const MAX_FALLBACK_PARAGRAPHS: usize = 3;

pub const ARTICLE_PLACEHOLDER: &str = "Article saved from this page";

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub src: String,
    pub poster: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub src: String,
    pub natural_width: u32,
    pub natural_height: u32,
    pub complete: bool,
    pub alt: String,
}

impl ImageInfo {
    fn qualifies(&self) -> bool {
        self.natural_width > MIN_IMAGE_SIDE
            && self.natural_height > MIN_IMAGE_SIDE
            && self.complete
            && !self.src.contains("data:image")
    }

    fn area(&self) -> u64 {
        u64::from(self.natural_width) * u64::from(self.natural_height)
    }
}

/// Read access to the page under inspection
pub trait PageInspector {
    fn first_video(&self) -> Result<Option<VideoInfo>>;
    fn selection_text(&self) -> Result<String>;
    fn images(&self) -> Result<Vec<ImageInfo>>;
    /// Text of the first element matching `selector`
    fn region_text(&self, selector: &str) -> Result<Option<String>>;
    fn paragraph_texts(&self) -> Result<Vec<String>>;
    fn title(&self) -> String;
}

/// Outcome of the heuristics, before any preview is captured
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Video { video: VideoInfo, title: String },
    Text { snippet: String },
    Image { image: ImageInfo, snippet: String },
    Article { snippet: String },
}

impl Detection {
    pub fn kind(&self) -> ItemType {
        match self {
            Detection::Video { .. } => ItemType::Video,
            Detection::Text { .. } => ItemType::Text,
            Detection::Image { .. } => ItemType::Image,
            Detection::Article { .. } => ItemType::Article,
        }
    }

    pub fn snippet(&self) -> &str {
        match self {
            Detection::Video { title, .. } => title,
            Detection::Text { snippet } | Detection::Image { snippet, .. } | Detection::Article { snippet } => snippet,
        }
    }
}

/// Wire shape of the `detectContent` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectedContent {
    #[serde(rename = "type")]
    pub kind: ItemType,
    /// Embedded thumbnail, or a bare image URL when the image could not be re-encoded
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub snippet: String,
}

impl DetectedContent {
    /// The answer used when detection fails or the content script is unreachable
    pub fn fallback(title: &str) -> Self {
        DetectedContent {
            kind: ItemType::Article,
            preview: None,
            snippet: title.to_string(),
        }
    }
}

fn whitespace() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Collapse runs of whitespace and trim
pub fn normalize_text(text: &str) -> String {
    whitespace().replace_all(text.trim(), " ").into_owned()
}

/// Run the heuristics against a page
pub fn classify(page: &impl PageInspector) -> Result<Detection> {
    if let Some(video) = page.first_video()? {
        if !video.src.is_empty() {
            return Ok(Detection::Video {
                video,
                title: page.title(),
            });
        }
    }

    let selection = page.selection_text()?;
    let selection = selection.trim();
    if selection.chars().count() > MIN_SELECTION_CHARS {
        return Ok(Detection::Text {
            snippet: truncate_chars(selection, MAX_SNIPPET_CHARS),
        });
    }

    let largest = page
        .images()?
        .into_iter()
        .filter(ImageInfo::qualifies)
        .fold(None::<ImageInfo>, |best, img| match best {
            Some(b) if b.area() >= img.area() => Some(b),
            _ => Some(img),
        });
    if let Some(image) = largest {
        let snippet = if image.alt.trim().is_empty() {
            page.title()
        } else {
            image.alt.trim().to_string()
        };
        return Ok(Detection::Image { image, snippet });
    }

    Ok(Detection::Article {
        snippet: article_snippet(page)?,
    })
}

/// Classify, falling back to the article default on any failure
pub fn classify_or_default(page: &impl PageInspector) -> Detection {
    classify(page).unwrap_or_else(|e| {
        log::warn!("Content detection error: {}", e);
        Detection::Article {
            snippet: page.title(),
        }
    })
}

fn article_snippet(page: &impl PageInspector) -> Result<String> {
    for selector in MAIN_CONTENT_SELECTORS {
        if let Some(text) = page.region_text(selector)? {
            let text = text.trim();
            if text.chars().count() > MIN_REGION_CHARS {
                return Ok(truncate_chars(text, MAX_SNIPPET_CHARS));
            }
        }
    }

    let paragraphs: Vec<String> = page
        .paragraph_texts()?
        .iter()
        .map(|p| p.trim())
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .take(MAX_FALLBACK_PARAGRAPHS)
        .map(str::to_string)
        .collect();
    let joined = truncate_chars(&paragraphs.join(" "), MAX_SNIPPET_CHARS);
    if !joined.is_empty() {
        return Ok(joined);
    }

    let title = page.title();
    if title.is_empty() {
        Ok(ARTICLE_PLACEHOLDER.to_string())
    } else {
        Ok(title)
    }
}

/// Thumbnail dimensions bounded to 240×160, aspect preserved.
///
/// Only the longer side is capped: landscape images are limited by width,
/// portrait and square ones by height.
pub fn thumbnail_size(width: u32, height: u32) -> (u32, u32) {
    let (w, h) = (f64::from(width), f64::from(height));
    let (max_w, max_h) = (f64::from(THUMBNAIL_MAX_WIDTH), f64::from(THUMBNAIL_MAX_HEIGHT));

    let (w, h) = if w > h {
        if w > max_w { (max_w, h * max_w / w) } else { (w, h) }
    } else if h > max_h {
        (w * max_h / h, max_h)
    } else {
        (w, h)
    };

    (w.round().max(1.0) as u32, h.round().max(1.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxyError;

    #[derive(Default)]
    struct FakePage {
        video: Option<VideoInfo>,
        selection: String,
        images: Vec<ImageInfo>,
        regions: Vec<(&'static str, String)>,
        paragraphs: Vec<String>,
        title: String,
        broken: bool,
    }

    impl PageInspector for FakePage {
        fn first_video(&self) -> Result<Option<VideoInfo>> {
            Ok(self.video.clone())
        }

        fn selection_text(&self) -> Result<String> {
            if self.broken {
                return Err(BoxyError::Platform("getSelection threw".to_string()));
            }
            Ok(self.selection.clone())
        }

        fn images(&self) -> Result<Vec<ImageInfo>> {
            Ok(self.images.clone())
        }

        fn region_text(&self, selector: &str) -> Result<Option<String>> {
            Ok(self
                .regions
                .iter()
                .find(|(s, _)| *s == selector)
                .map(|(_, t)| t.clone()))
        }

        fn paragraph_texts(&self) -> Result<Vec<String>> {
            Ok(self.paragraphs.clone())
        }

        fn title(&self) -> String {
            self.title.clone()
        }
    }

    fn image(src: &str, w: u32, h: u32) -> ImageInfo {
        ImageInfo {
            src: src.to_string(),
            natural_width: w,
            natural_height: h,
            complete: true,
            alt: String::new(),
        }
    }

    fn video() -> VideoInfo {
        VideoInfo {
            src: "https://cdn.example.com/clip.mp4".to_string(),
            poster: Some("https://cdn.example.com/poster.jpg".to_string()),
        }
    }

    #[test]
    fn test_video_beats_image() {
        let page = FakePage {
            video: Some(video()),
            images: vec![image("https://example.com/big.jpg", 800, 600)],
            title: "Clip".to_string(),
            ..Default::default()
        };

        let detection = classify(&page).unwrap();
        assert_eq!(detection.kind(), ItemType::Video);
        assert_eq!(detection.snippet(), "Clip");
    }

    #[test]
    fn test_video_without_source_is_ignored() {
        let page = FakePage {
            video: Some(VideoInfo { src: String::new(), poster: None }),
            ..Default::default()
        };
        assert_eq!(classify(&page).unwrap().kind(), ItemType::Article);
    }

    #[test]
    fn test_selection_beats_image() {
        let page = FakePage {
            selection: "  a sentence worth keeping  ".to_string(),
            images: vec![image("https://example.com/big.jpg", 800, 600)],
            ..Default::default()
        };

        let detection = classify(&page).unwrap();
        assert_eq!(
            detection,
            Detection::Text {
                snippet: "a sentence worth keeping".to_string()
            }
        );
    }

    #[test]
    fn test_short_selection_is_ignored() {
        let page = FakePage {
            selection: "ten chars!".to_string(),
            ..Default::default()
        };
        assert_eq!(classify(&page).unwrap().kind(), ItemType::Article);
    }

    #[test]
    fn test_selection_truncated() {
        let page = FakePage {
            selection: "x".repeat(800),
            ..Default::default()
        };
        assert_eq!(classify(&page).unwrap().snippet().chars().count(), MAX_SNIPPET_CHARS);
    }

    #[test]
    fn test_largest_qualifying_image_wins() {
        let mut pending = image("https://example.com/huge.jpg", 4000, 4000);
        pending.complete = false;
        let mut with_alt = image("https://example.com/large.jpg", 900, 600);
        with_alt.alt = "A large photo".to_string();

        let page = FakePage {
            images: vec![
                image("https://example.com/small.jpg", 150, 900),
                image("https://example.com/medium.jpg", 400, 300),
                with_alt,
                image("data:image/png;base64,AAAA", 2000, 2000),
                pending,
            ],
            title: "Gallery".to_string(),
            ..Default::default()
        };

        match classify(&page).unwrap() {
            Detection::Image { image, snippet } => {
                assert_eq!(image.src, "https://example.com/large.jpg");
                assert_eq!(snippet, "A large photo");
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_image_snippet_falls_back_to_title() {
        let page = FakePage {
            images: vec![image("https://example.com/a.jpg", 300, 300)],
            title: "Photos".to_string(),
            ..Default::default()
        };
        assert_eq!(classify(&page).unwrap().snippet(), "Photos");
    }

    #[test]
    fn test_article_uses_first_long_region() {
        let page = FakePage {
            regions: vec![
                ("article", "too short".to_string()),
                ("main", "m".repeat(60)),
                ("#content", "c".repeat(60)),
            ],
            ..Default::default()
        };
        assert_eq!(classify(&page).unwrap().snippet(), "m".repeat(60));
    }

    #[test]
    fn test_article_falls_back_to_paragraphs() {
        let page = FakePage {
            paragraphs: vec![
                "short".to_string(),
                "The first paragraph that is long enough.".to_string(),
                "The second paragraph that is long enough.".to_string(),
                "The third paragraph that is long enough.".to_string(),
                "The fourth paragraph that is long enough.".to_string(),
            ],
            ..Default::default()
        };

        let snippet = classify(&page).unwrap().snippet().to_string();
        assert!(snippet.starts_with("The first paragraph"));
        assert!(snippet.contains("third"));
        assert!(!snippet.contains("fourth"));
    }

    #[test]
    fn test_article_falls_back_to_title_then_placeholder() {
        let page = FakePage {
            title: "Home page".to_string(),
            ..Default::default()
        };
        assert_eq!(classify(&page).unwrap().snippet(), "Home page");
        assert_eq!(classify(&FakePage::default()).unwrap().snippet(), ARTICLE_PLACEHOLDER);
    }

    #[test]
    fn test_failure_yields_default() {
        let page = FakePage {
            broken: true,
            title: "Broken page".to_string(),
            images: vec![image("https://example.com/a.jpg", 300, 300)],
            ..Default::default()
        };

        assert!(classify(&page).is_err());
        assert_eq!(
            classify_or_default(&page),
            Detection::Article {
                snippet: "Broken page".to_string()
            }
        );
    }

    #[test]
    fn test_thumbnail_size() {
        assert_eq!(thumbnail_size(800, 400), (240, 120));
        assert_eq!(thumbnail_size(400, 800), (80, 160));
        assert_eq!(thumbnail_size(500, 500), (160, 160));
        assert_eq!(thumbnail_size(100, 50), (100, 50));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello\n\n  world\t! "), "Hello world !");
    }

    #[test]
    fn test_detected_content_wire_shape() {
        let json = serde_json::to_value(DetectedContent::fallback("Title")).unwrap();
        assert_eq!(json["type"], "article");
        assert!(json["preview"].is_null());
        assert_eq!(json["snippet"], "Title");
    }
}
