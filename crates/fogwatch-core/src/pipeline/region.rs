use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Named screen regions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    IntoStaticStr,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RegionId {
    /// Bottom left: map name at match start, power prompts, settings back button.
    Map,
    MainMenu,
    MenuButton,
    Bloodpoints,
    /// Border strips sampled for the black loading screen frame.
    LoadingScreen,
    LoadingText,
    Settings,
}

/// Rectangle in screen fractions (`0.0..=1.0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Pixel rectangle `(x, y, w, h)` for a frame of the given size.
    pub fn to_pixels(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let px = |v: f32, total: u32| ((v * total as f32).round() as u32).min(total);
        let x = px(self.x, width);
        let y = px(self.y, height);
        let w = px(self.w, width).min(width - x);
        let h = px(self.h, height).min(height - y);
        (x, y, w, h)
    }
}

/// Tesseract-style page segmentation hint for the OCR collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageSegmentation {
    SparseText,
    SingleColumn,
    SingleLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcrRegion {
    pub id: RegionId,
    pub rect: Rect,
    pub segmentation: PageSegmentation,
    /// Binarization threshold applied before recognition.
    pub threshold: Option<u8>,
}

/// Distance in pixels between border samples.
pub const BORDER_SAMPLE_STRIDE: usize = 4;

/// Read access to the pixels of a captured frame.
pub trait PixelFrame {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Pixel at `(x, y)`, which is inside [`size`](Self::size).
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

/// Row-major RGB frame held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl RgbFrame {
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Paint `rect` (screen fractions) with `color`.
    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 3]) {
        let (x0, y0, w, h) = rect.to_pixels(self.width, self.height);
        for y in y0..y0 + h {
            let row = y as usize * self.width as usize;
            self.pixels[row + x0 as usize..row + (x0 + w) as usize].fill(color);
        }
    }
}

impl PixelFrame for RgbFrame {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Pixel test for near-black screen borders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PureBlackSpec {
    pub id: RegionId,
    pub rects: [Rect; 4],
    /// Highest channel value a pixel may have.
    pub black_max: u8,
    /// Highest spread between channels of a pixel.
    pub color_delta_max: u8,
    /// Fraction of sampled pixels that must pass.
    pub min_match_ratio: f32,
}

impl PureBlackSpec {
    pub fn pixel_passes(&self, [r, g, b]: [u8; 3]) -> bool {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        max <= self.black_max && max - min <= self.color_delta_max
    }

    /// Sample every [`BORDER_SAMPLE_STRIDE`]th pixel of the border strips of
    /// `frame` and classify them.
    pub fn sample<F: PixelFrame + ?Sized>(&self, frame: &F) -> PureBlackResult {
        let (width, height) = frame.size();
        let mut pixels = Vec::new();
        for rect in &self.rects {
            let (x0, y0, w, h) = rect.to_pixels(width, height);
            for y in (y0..y0 + h).step_by(BORDER_SAMPLE_STRIDE) {
                for x in (x0..x0 + w).step_by(BORDER_SAMPLE_STRIDE) {
                    pixels.push(frame.rgb(x, y));
                }
            }
        }
        self.assess(&pixels)
    }

    /// Classify sampled border pixels.
    pub fn assess(&self, pixels: &[[u8; 3]]) -> PureBlackResult {
        if pixels.is_empty() {
            return PureBlackResult {
                passed: false,
                ratio: 0.0,
            };
        }

        let matching = pixels.iter().filter(|&&p| self.pixel_passes(p)).count();
        let ratio = matching as f32 / pixels.len() as f32;
        PureBlackResult {
            passed: ratio >= self.min_match_ratio,
            ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScanArea {
    Ocr(OcrRegion),
    PureBlack(PureBlackSpec),
}

impl ScanArea {
    pub fn id(&self) -> RegionId {
        match self {
            Self::Ocr(region) => region.id,
            Self::PureBlack(spec) => spec.id,
        }
    }

    /// The scan area used for `id`.
    pub fn for_region(id: RegionId) -> Self {
        use PageSegmentation::*;

        let ocr = |rect, segmentation, threshold| {
            Self::Ocr(OcrRegion {
                id,
                rect,
                segmentation,
                threshold,
            })
        };

        match id {
            RegionId::Map => ocr(Rect::new(0.0, 0.7, 0.6, 0.3), SparseText, Some(240)),
            RegionId::MainMenu => ocr(Rect::new(0.0, 0.0, 0.5, 0.6), SingleColumn, Some(120)),
            RegionId::MenuButton => ocr(Rect::new(0.7, 0.7, 0.3, 0.3), SparseText, Some(120)),
            RegionId::Bloodpoints => ocr(Rect::new(0.65, 0.0, 0.35, 0.15), SingleLine, None),
            RegionId::LoadingText => ocr(Rect::new(0.3, 0.3, 0.4, 0.2), SparseText, None),
            RegionId::Settings => ocr(Rect::new(0.0, 0.0, 1.0, 0.3), SparseText, Some(120)),
            RegionId::LoadingScreen => Self::PureBlack(PureBlackSpec {
                id,
                rects: [
                    Rect::new(0.0, 0.0, 1.0, 0.02),
                    Rect::new(0.0, 0.98, 1.0, 0.02),
                    Rect::new(0.0, 0.02, 0.02, 0.96),
                    Rect::new(0.98, 0.02, 0.02, 0.96),
                ],
                black_max: 10,
                color_delta_max: 3,
                min_match_ratio: 0.9,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OcrResult {
    pub text: Vec<String>,
}

impl OcrResult {
    pub fn new<S: Into<String>>(text: impl IntoIterator<Item = S>) -> Self {
        Self {
            text: text.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PureBlackResult {
    pub passed: bool,
    #[serde(default)]
    pub ratio: f32,
}

impl PureBlackResult {
    pub fn passed() -> Self {
        Self {
            passed: true,
            ratio: 1.0,
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}

/// Raw result of scanning one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RegionResult {
    Ocr(OcrResult),
    PureBlack(PureBlackResult),
}

/// Results gathered so far for one captured frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSnapshot {
    results: BTreeMap<RegionId, RegionResult>,
}

impl RegionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ocr<S: Into<String>>(mut self, id: RegionId, text: impl IntoIterator<Item = S>) -> Self {
        self.insert(id, RegionResult::Ocr(OcrResult::new(text)));
        self
    }

    pub fn with_pure_black(mut self, id: RegionId, passed: bool) -> Self {
        let result = if passed {
            PureBlackResult::passed()
        } else {
            PureBlackResult::failed()
        };
        self.insert(id, RegionResult::PureBlack(result));
        self
    }

    pub fn insert(&mut self, id: RegionId, result: RegionResult) {
        self.results.insert(id, result);
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = (RegionId, RegionResult)>) {
        self.results.extend(results);
    }

    pub fn get(&self, id: RegionId) -> Option<&RegionResult> {
        self.results.get(&id)
    }

    pub fn ocr(&self, id: RegionId) -> Option<&OcrResult> {
        match self.results.get(&id)? {
            RegionResult::Ocr(result) => Some(result),
            RegionResult::PureBlack(_) => None,
        }
    }

    pub fn pure_black(&self, id: RegionId) -> Option<&PureBlackResult> {
        match self.results.get(&id)? {
            RegionResult::PureBlack(result) => Some(result),
            RegionResult::Ocr(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, &RegionResult)> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
