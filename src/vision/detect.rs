//! Slot-grid detection
//!
//! Thresholds the frame for the highlight color in HSV space, cleans
//! the mask with morphology, traces contours, scores them against an
//! idealized square, and derives the grid origin and spacing from the
//! surviving centroids. Falls back through broader color ranges and
//! lower confidence thresholds before giving up and returning the
//! default configuration.
//!
//! The numeric constants here (color ranges, thresholds, tolerances)
//! are empirically tuned; they live in [`DetectorParams`] so callers
//! can override them, and the test suite pins them through synthetic
//! golden images rather than asserting the values themselves.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::morphology::{close, dilate, open};
use imageproc::point::Point;

use crate::config::SlotGridConfig;

use super::{FallbackReason, Frame, GridDetection, SlotCandidate};

/// Below this aspect ratio the confidence is scaled down by
/// `2 * aspect`, disqualifying strongly elongated boxes that would
/// otherwise score well on corners and fill.
const ASPECT_PENALTY_KNEE: f32 = 0.5;

/// An inclusive HSV color range (OpenCV scale: H 0-179, S/V 0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub low: [u8; 3],
    pub high: [u8; 3],
}

impl HsvRange {
    pub const fn new(low: [u8; 3], high: [u8; 3]) -> Self {
        Self { low, high }
    }

    fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        h >= self.low[0]
            && h <= self.high[0]
            && s >= self.low[1]
            && s <= self.high[1]
            && v >= self.low[2]
            && v <= self.high[2]
    }
}

/// Tunable detection parameters
///
/// The defaults target the bright-yellow slot borders of the supported
/// client theme at 1920x1080.
#[derive(Debug, Clone)]
pub struct DetectorParams {
    /// Primary highlight color range
    pub primary_range: HsvRange,
    /// Broader ranges tried in order when the primary finds too little
    pub alt_ranges: Vec<HsvRange>,
    /// Squareness confidence cutoff for the first pass
    pub min_confidence: f32,
    /// Decreasing confidence cutoffs tried after the color ranges
    pub confidence_ladder: Vec<f32>,
    /// Accepted contour area in square pixels
    pub area_bounds: (f64, f64),
    /// Minimum surviving candidates for a usable grid
    pub min_slots: usize,
    /// Centroids within this many pixels of y belong to the same row
    pub row_tolerance: i32,
    /// Plausible slot spacing range in pixels
    pub spacing_bounds: (i32, i32),
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            // Bright yellow
            primary_range: HsvRange::new([20, 100, 150], [40, 255, 255]),
            alt_ranges: vec![
                // Broader yellow
                HsvRange::new([15, 70, 150], [45, 255, 255]),
                // Gold/orange-yellow
                HsvRange::new([10, 100, 150], [30, 255, 255]),
                // Very broad yellow-orange
                HsvRange::new([10, 50, 150], [50, 255, 255]),
            ],
            min_confidence: 0.7,
            confidence_ladder: vec![0.6, 0.5, 0.4],
            area_bounds: (100.0, 5000.0),
            min_slots: 8,
            row_tolerance: 25,
            spacing_bounds: (30, 100),
        }
    }
}

/// Detects the inventory slot grid in a captured frame
#[derive(Debug, Clone, Default)]
pub struct SlotDetector {
    params: DetectorParams,
}

impl SlotDetector {
    /// Create a detector with custom parameters
    pub fn new(params: DetectorParams) -> Self {
        Self { params }
    }

    /// The active parameters
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Detect the slot grid, falling back to defaults when unsure
    ///
    /// Never panics and always returns a usable configuration; a
    /// fallback carries the reason as a tagged value.
    pub fn detect(&self, frame: &Frame) -> GridDetection {
        let quadrant = frame.bottom_right_quadrant();
        let candidates = self.gather_candidates(&quadrant);

        if candidates.len() < self.params.min_slots {
            log::warn!(
                "unable to detect enough slot candidates ({} < {}), using defaults",
                candidates.len(),
                self.params.min_slots
            );
            return GridDetection::defaulted(
                FallbackReason::TooFewSlots {
                    found: candidates.len(),
                },
                candidates.len(),
            );
        }

        let (ox, oy) = frame.quadrant_origin();
        let centroids: Vec<(i32, i32)> = candidates
            .iter()
            .map(|c| (c.centroid.0 + ox as i32, c.centroid.1 + oy as i32))
            .collect();

        match self.grid_from_centroids(&centroids) {
            Ok(config) => {
                log::info!(
                    "slot grid detected from {} candidates: origin ({}, {}), spacing {}x{}",
                    candidates.len(),
                    config.base_x,
                    config.base_y,
                    config.x_spacing,
                    config.y_spacing
                );
                GridDetection::detected(config, candidates.len())
            }
            Err(reason) => {
                log::warn!("slot grid rejected ({reason}), using defaults");
                GridDetection::defaulted(reason, candidates.len())
            }
        }
    }

    /// Candidate slots in the cropped quadrant for the primary range
    ///
    /// Exposed for calibration debugging.
    pub fn candidates(&self, frame: &Frame) -> Vec<SlotCandidate> {
        self.candidates_in(
            &frame.bottom_right_quadrant(),
            &self.params.primary_range,
            self.params.min_confidence,
        )
    }

    /// Run the color-range and confidence ladders until enough
    /// candidates are found
    fn gather_candidates(&self, quadrant: &RgbImage) -> Vec<SlotCandidate> {
        let mut candidates =
            self.candidates_in(quadrant, &self.params.primary_range, self.params.min_confidence);

        if candidates.len() < self.params.min_slots {
            log::warn!(
                "found only {} slot candidates, expected at least {}; trying alternate color ranges",
                candidates.len(),
                self.params.min_slots
            );
            for range in &self.params.alt_ranges {
                let alt = self.candidates_in(quadrant, range, self.params.min_confidence);
                if alt.len() > candidates.len() {
                    candidates = alt;
                }
                if candidates.len() >= self.params.min_slots {
                    break;
                }
            }
        }

        if candidates.len() < self.params.min_slots {
            log::warn!("retrying with lower confidence thresholds");
            for &threshold in &self.params.confidence_ladder {
                candidates = self.candidates_in(quadrant, &self.params.primary_range, threshold);
                if candidates.len() >= self.params.min_slots {
                    break;
                }
            }
        }

        candidates
    }

    /// Mask, clean, trace and score one color range
    fn candidates_in(
        &self,
        quadrant: &RgbImage,
        range: &HsvRange,
        min_confidence: f32,
    ) -> Vec<SlotCandidate> {
        let mask = hsv_mask(quadrant, range);
        // Close small holes, remove speckle, then bridge near-adjacent
        // border fragments
        let mask = close(&mask, Norm::LInf, 1);
        let mask = open(&mask, Norm::LInf, 1);
        let mask = dilate(&mask, Norm::LInf, 1);

        let (min_area, max_area) = self.params.area_bounds;

        find_contours::<i32>(&mask)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer)
            .filter_map(|c| {
                let area = contour_area(&c.points);
                if area < min_area || area > max_area {
                    return None;
                }

                let confidence = squareness(&c.points);
                if confidence < min_confidence {
                    return None;
                }

                let (min_x, min_y, max_x, max_y) = bounding_box(&c.points)?;
                Some(SlotCandidate {
                    centroid: ((min_x + max_x) / 2, (min_y + max_y) / 2),
                    confidence,
                })
            })
            .collect()
    }

    /// Derive origin and spacing from full-frame centroids
    fn grid_from_centroids(&self, centroids: &[(i32, i32)]) -> Result<SlotGridConfig, FallbackReason> {
        let rows = cluster_rows(centroids.to_vec(), self.params.row_tolerance);
        let (x_samples, y_samples) = spacing_samples(&rows);

        let (Some(x_spacing), Some(y_spacing)) =
            (filtered_average(x_samples), filtered_average(y_samples))
        else {
            return Err(FallbackReason::NoSpacings);
        };

        let (lo, hi) = self.params.spacing_bounds;
        if !(lo..=hi).contains(&x_spacing) || !(lo..=hi).contains(&y_spacing) {
            return Err(FallbackReason::ImplausibleSpacing {
                x: x_spacing,
                y: y_spacing,
            });
        }

        // Origin is the leftmost centroid of the top row
        let (base_x, base_y) = rows[0][0];
        Ok(SlotGridConfig {
            base_x,
            base_y,
            x_spacing,
            y_spacing,
        })
    }
}

/// Binary mask of pixels inside the HSV range
fn hsv_mask(image: &RgbImage, range: &HsvRange) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let (h, s, v) = rgb_to_hsv(*image.get_pixel(x, y));
        if range.contains(h, s, v) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Convert an RGB pixel to OpenCV-scaled HSV (H 0-179, S/V 0-255)
fn rgb_to_hsv(pixel: Rgb<u8>) -> (u8, u8, u8) {
    let r = f32::from(pixel[0]) / 255.0;
    let g = f32::from(pixel[1]) / 255.0;
    let b = f32::from(pixel[2]) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = if delta <= f32::EPSILON {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        60.0 * (b - r) / delta + 120.0
    } else {
        60.0 * (r - g) / delta + 240.0
    };
    if h < 0.0 {
        h += 360.0;
    }

    let s = if max <= f32::EPSILON { 0.0 } else { delta / max };

    (
        (h / 2.0).min(179.0).round() as u8,
        (s * 255.0).round() as u8,
        (max * 255.0).round() as u8,
    )
}

/// How square-like a contour is, from 0.0 to 1.0
///
/// Combines the corner count of a Douglas-Peucker approximation, the
/// bounding-box aspect ratio and the fill ratio, then penalizes
/// strongly elongated shapes.
fn squareness(points: &[Point<i32>]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }

    let Some((min_x, min_y, max_x, max_y)) = bounding_box(points) else {
        return 0.0;
    };
    let w = (max_x - min_x) as f32;
    let h = (max_y - min_y) as f32;

    let rect_area = w * h;
    let area_ratio = if rect_area > 0.0 {
        (contour_area(points) as f32 / rect_area).min(1.0)
    } else {
        0.0
    };

    let aspect = if w.max(h) > 0.0 { w.min(h) / w.max(h) } else { 0.0 };

    let epsilon = 0.02 * arc_length(points, true);
    let approx = approximate_polygon_dp(points, epsilon, true);
    // A closed approximation may repeat its first point; count vertices
    let mut corners = approx.len();
    if corners > 1 && approx.first() == approx.last() {
        corners -= 1;
    }
    let corner_score = if corners == 4 {
        1.0
    } else {
        4.0 / ((corners as f32 - 4.0).abs() + 4.0)
    };

    let mut confidence = (0.4 * corner_score + 0.4 * aspect + 0.2 * area_ratio).min(1.0);
    if aspect < ASPECT_PENALTY_KNEE {
        confidence *= 2.0 * aspect;
    }
    confidence
}

/// Signed shoelace area of a closed contour, in square pixels
fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0i64;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        sum += i64::from(p.x) * i64::from(q.y) - i64::from(q.x) * i64::from(p.y);
    }
    sum.abs() as f64 / 2.0
}

/// Axis-aligned bounds of a point set: (min_x, min_y, max_x, max_y)
fn bounding_box(points: &[Point<i32>]) -> Option<(i32, i32, i32, i32)> {
    let first = points.first()?;
    let mut bounds = (first.x, first.y, first.x, first.y);
    for p in points {
        bounds.0 = bounds.0.min(p.x);
        bounds.1 = bounds.1.min(p.y);
        bounds.2 = bounds.2.max(p.x);
        bounds.3 = bounds.3.max(p.y);
    }
    Some(bounds)
}

/// Group centroids into rows by y-proximity
///
/// Rows are sorted top to bottom by mean y; points within a row are
/// sorted left to right.
pub(crate) fn cluster_rows(mut centroids: Vec<(i32, i32)>, tolerance: i32) -> Vec<Vec<(i32, i32)>> {
    let mut rows: Vec<Vec<(i32, i32)>> = Vec::new();

    while let Some(&reference) = centroids.first() {
        let (mut row, rest): (Vec<_>, Vec<_>) = centroids
            .into_iter()
            .partition(|p| (p.1 - reference.1).abs() < tolerance);
        row.sort_by_key(|p| p.0);
        rows.push(row);
        centroids = rest;
    }

    rows.sort_by_key(|row| row.iter().map(|p| p.1).sum::<i32>() / row.len() as i32);
    rows
}

/// Spacing samples: within-row x-deltas and between-row y-deltas
///
/// The vertical deltas are measured between the leftmost centroids of
/// consecutive rows.
pub(crate) fn spacing_samples(rows: &[Vec<(i32, i32)>]) -> (Vec<i32>, Vec<i32>) {
    let x_samples = rows
        .iter()
        .flat_map(|row| row.windows(2).map(|w| w[1].0 - w[0].0))
        .collect();

    let y_samples = rows
        .windows(2)
        .map(|pair| pair[1][0].1 - pair[0][0].1)
        .collect();

    (x_samples, y_samples)
}

/// Median-anchored outlier-filtered average
///
/// Samples outside 0.5x-2.0x the median are dropped before averaging;
/// if that removes everything, the unfiltered mean is used.
pub(crate) fn filtered_average(mut samples: Vec<i32>) -> Option<i32> {
    if samples.is_empty() {
        return None;
    }

    samples.sort_unstable();
    let median = samples[samples.len() / 2];

    let filtered: Vec<i32> = samples
        .iter()
        .copied()
        .filter(|&s| 2 * s >= median && s <= 2 * median)
        .collect();

    let pool = if filtered.is_empty() { &samples } else { &filtered };
    Some(pool.iter().sum::<i32>() / pool.len() as i32)
}
