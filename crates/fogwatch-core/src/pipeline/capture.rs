//! Capture and OCR collaborator.
//!
//! This module provides the trait the host implements to capture frames and
//! run recognition over regions of them, plus the helper that scans several
//! regions of the same frame concurrently.

use std::thread;

use tracing::warn;

use crate::error::Result;
use crate::pipeline::{
    OcrRegion, OcrResult, PureBlackResult, PureBlackSpec, RegionId, RegionResult, ScanArea,
};

/// Trait for capturing frames and recognizing regions of them.
///
/// Regions of one frame are independent and read-only, so implementations
/// must tolerate concurrent `run_ocr`/`sample_pure_black` calls on the same
/// frame.
pub trait FrameSource: Sync {
    /// The type of a captured frame.
    type Frame: Sync;

    /// Capture the current screen.
    fn capture_frame(&self) -> Result<Self::Frame>;

    /// Recognize the text of one region.
    fn run_ocr(&self, frame: &Self::Frame, region: &OcrRegion) -> Result<OcrResult>;

    /// Sample the border pixels described by `spec`.
    fn sample_pure_black(&self, frame: &Self::Frame, spec: &PureBlackSpec)
    -> Result<PureBlackResult>;

    /// Scan one area of the frame.
    fn scan(&self, frame: &Self::Frame, area: &ScanArea) -> Result<RegionResult> {
        match area {
            ScanArea::Ocr(region) => self.run_ocr(frame, region).map(RegionResult::Ocr),
            ScanArea::PureBlack(spec) => self
                .sample_pure_black(frame, spec)
                .map(RegionResult::PureBlack),
        }
    }
}

/// Scan `regions` of one frame, concurrently when there is more than one.
///
/// Failed or panicked scans are logged and left out of the result, so the
/// region reads as "no signal" for this cycle.
pub fn scan_regions<S: FrameSource>(
    source: &S,
    frame: &S::Frame,
    regions: &[RegionId],
) -> Vec<(RegionId, RegionResult)> {
    let areas: Vec<ScanArea> = regions.iter().map(|&id| ScanArea::for_region(id)).collect();

    let outcomes: Vec<(RegionId, Result<RegionResult>)> = match areas.as_slice() {
        [] => Vec::new(),
        [area] => vec![(area.id(), source.scan(frame, area))],
        _ => thread::scope(|scope| {
            let handles: Vec<_> = areas
                .iter()
                .map(|area| (area.id(), scope.spawn(move || source.scan(frame, area))))
                .collect();

            handles
                .into_iter()
                .filter_map(|(id, handle)| match handle.join() {
                    Ok(result) => Some((id, result)),
                    Err(_) => {
                        warn!("Scan of region {} panicked", id);
                        None
                    }
                })
                .collect()
        }),
    };

    outcomes
        .into_iter()
        .filter_map(|(id, result)| match result {
            Ok(result) => Some((id, result)),
            Err(e) => {
                warn!("Failed to scan region {}: {}", id, e);
                None
            }
        })
        .collect()
}
