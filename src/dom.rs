/// Live-document page inspector for the content script

use crate::detect::{
    DetectedContent, Detection, ImageInfo, PageInspector, THUMBNAIL_QUALITY, THUMBNAIL_TIMEOUT_MS,
    VIDEO_FRAME_HEIGHT, VIDEO_FRAME_QUALITY, VIDEO_FRAME_TIMEOUT_MS, VIDEO_FRAME_WIDTH, VideoInfo,
    classify_or_default, normalize_text, thumbnail_size,
};
use crate::error::{BoxyError, Result};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlImageElement, HtmlVideoElement};

// Canvas work and load/timeout races stay on the JS side
#[wasm_bindgen(module = "/js/content.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn captureVideoFrame(
        video: &HtmlVideoElement,
        width: u32,
        height: u32,
        quality: f64,
        timeout_ms: u32,
    ) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createImageThumbnail(
        src: &str,
        width: u32,
        height: u32,
        quality: f64,
        timeout_ms: u32,
    ) -> std::result::Result<JsValue, JsValue>;
}

pub struct DomInspector {
    document: Document,
}

impl DomInspector {
    pub fn new(document: Document) -> Self {
        DomInspector { document }
    }

    pub fn from_window() -> Result<Self> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(DomInspector::new)
            .ok_or_else(|| BoxyError::Platform("no document".to_string()))
    }

    fn video_element(&self) -> Result<Option<HtmlVideoElement>> {
        Ok(self
            .document
            .query_selector("video")?
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok()))
    }
}

fn inner_text(el: web_sys::Element) -> Option<String> {
    el.dyn_into::<HtmlElement>().ok().map(|el| el.inner_text())
}

impl PageInspector for DomInspector {
    fn first_video(&self) -> Result<Option<VideoInfo>> {
        Ok(self.video_element()?.map(|video| {
            let poster = video.poster();
            VideoInfo {
                src: video.src(),
                poster: (!poster.is_empty()).then_some(poster),
            }
        }))
    }

    fn selection_text(&self) -> Result<String> {
        let window = web_sys::window().ok_or_else(|| BoxyError::Platform("no window".to_string()))?;
        Ok(window
            .get_selection()?
            .and_then(|sel| sel.to_string().as_string())
            .unwrap_or_default())
    }

    fn images(&self) -> Result<Vec<ImageInfo>> {
        let nodes = self.document.query_selector_all("img")?;
        let images = (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
            .map(|img| ImageInfo {
                src: img.src(),
                natural_width: img.natural_width(),
                natural_height: img.natural_height(),
                complete: img.complete(),
                alt: img.alt(),
            })
            .collect();
        Ok(images)
    }

    fn region_text(&self, selector: &str) -> Result<Option<String>> {
        Ok(self
            .document
            .query_selector(selector)?
            .and_then(inner_text)
            .map(|text| normalize_text(&text)))
    }

    fn paragraph_texts(&self) -> Result<Vec<String>> {
        let nodes = self.document.query_selector_all("p")?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .filter_map(inner_text)
            .map(|text| normalize_text(&text))
            .collect())
    }

    fn title(&self) -> String {
        self.document.title()
    }
}

/// Classify the live page and capture its preview
pub async fn detect_page() -> DetectedContent {
    let inspector = match DomInspector::from_window() {
        Ok(inspector) => inspector,
        Err(e) => {
            log::warn!("Content detection unavailable: {}", e);
            return DetectedContent::fallback("");
        }
    };

    let detection = classify_or_default(&inspector);
    let kind = detection.kind();
    let snippet = detection.snippet().to_string();

    let preview = match detection {
        Detection::Video { video, .. } => match video.poster {
            Some(poster) => Some(poster),
            None => video_frame(&inspector).await,
        },
        Detection::Image { image, .. } => Some(image_thumbnail(&image).await),
        Detection::Text { .. } | Detection::Article { .. } => None,
    };

    DetectedContent { kind, preview, snippet }
}

/// Grab one frame of the page's video, or nothing on timeout or failure
async fn video_frame(inspector: &DomInspector) -> Option<String> {
    let video = inspector.video_element().ok().flatten()?;
    match captureVideoFrame(
        &video,
        VIDEO_FRAME_WIDTH,
        VIDEO_FRAME_HEIGHT,
        VIDEO_FRAME_QUALITY,
        VIDEO_FRAME_TIMEOUT_MS,
    )
    .await
    {
        Ok(frame) => frame.as_string(),
        Err(e) => {
            log::debug!("Video frame capture failed: {:?}", e);
            None
        }
    }
}

/// Downscaled thumbnail of an image. Falls back to the image URL itself
/// when the image cannot be read back (cross-origin) or takes too long.
async fn image_thumbnail(image: &ImageInfo) -> String {
    let (width, height) = thumbnail_size(image.natural_width, image.natural_height);
    match createImageThumbnail(&image.src, width, height, THUMBNAIL_QUALITY, THUMBNAIL_TIMEOUT_MS).await {
        Ok(thumbnail) => thumbnail.as_string().unwrap_or_else(|| image.src.clone()),
        Err(e) => {
            log::debug!("Thumbnail failed for {}: {:?}", image.src, e);
            image.src.clone()
        }
    }
}
