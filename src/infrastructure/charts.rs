//! PNG line chart for forecast series.
//!
//! Draws a dotted red line with `x` markers over a light grid. The image carries
//! no text; the file name identifies the crop and the render time.

use image::{Rgb, RgbImage};
use std::path::Path;

use crate::domain::errors::ForecastError;

const CHART_WIDTH: u32 = 1000;
const CHART_HEIGHT: u32 = 500;
const MARGIN_TOP: i64 = 40;
const MARGIN_RIGHT: i64 = 40;
const MARGIN_BOTTOM: i64 = 70;
const MARGIN_LEFT: i64 = 80;
const GRID_LINES: i64 = 5;
const MARKER_RADIUS: i64 = 5;

const COLOR_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const COLOR_GRID: Rgb<u8> = Rgb([225, 228, 232]);
const COLOR_AXIS: Rgb<u8> = Rgb([44, 62, 80]);
const COLOR_SERIES: Rgb<u8> = Rgb([231, 76, 60]);

/// Renders `values` (one per forecast step) and writes the PNG to `output_path`.
pub fn render_line_chart(values: &[f64], output_path: &Path) -> Result<(), ForecastError> {
    let chart_error = |reason: String| ForecastError::Chart {
        path: output_path.to_path_buf(),
        reason,
    };

    if values.is_empty() {
        return Err(chart_error("no values to plot".to_string()));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(chart_error("series contains non-finite values".to_string()));
    }

    let mut img = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, COLOR_BACKGROUND);

    let left = MARGIN_LEFT;
    let right = CHART_WIDTH as i64 - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = CHART_HEIGHT as i64 - MARGIN_BOTTOM;

    // Horizontal grid
    for i in 0..=GRID_LINES {
        let y = top + (bottom - top) * i / GRID_LINES;
        draw_line(&mut img, (left, y), (right, y), COLOR_GRID, false);
    }

    let points = scale_points(values, left, right, top, bottom);

    // Vertical grid at every forecast step
    for &(x, _) in &points {
        draw_line(&mut img, (x, top), (x, bottom), COLOR_GRID, false);
    }

    draw_line(&mut img, (left, bottom), (right, bottom), COLOR_AXIS, false);
    draw_line(&mut img, (left, top), (left, bottom), COLOR_AXIS, false);

    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], COLOR_SERIES, true);
    }
    for &point in &points {
        draw_marker(&mut img, point, COLOR_SERIES);
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| chart_error(e.to_string()))?;
    }
    img.save(output_path).map_err(|e| chart_error(e.to_string()))
}

fn scale_points(values: &[f64], left: i64, right: i64, top: i64, bottom: i64) -> Vec<(i64, i64)> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Pad flat series so the line sits mid-plot
    let (lo, hi) = if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.1;
        (min - pad, max + pad)
    };

    let steps = values.len().saturating_sub(1).max(1) as f64;
    let inner_left = left + 20;
    let inner_right = right - 20;

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = if values.len() == 1 {
                (inner_left + inner_right) / 2
            } else {
                inner_left + ((inner_right - inner_left) as f64 * i as f64 / steps).round() as i64
            };
            let y = bottom - ((bottom - top) as f64 * (v - lo) / (hi - lo)).round() as i64;
            (x, y)
        })
        .collect()
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < img.width() as i64 && y < img.height() as i64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line; `dotted` skips alternating runs of four pixels.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>, dotted: bool) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut step = 0u32;

    loop {
        if !dotted || (step / 4) % 2 == 0 {
            put(img, x, y, color);
            if dotted {
                put(img, x, y + 1, color);
            }
        }
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        step += 1;
    }
}

fn draw_marker(img: &mut RgbImage, (cx, cy): (i64, i64), color: Rgb<u8>) {
    for offset in [0, 1] {
        draw_line(
            img,
            (cx - MARKER_RADIUS + offset, cy - MARKER_RADIUS),
            (cx + MARKER_RADIUS + offset, cy + MARKER_RADIUS),
            color,
            false,
        );
        draw_line(
            img,
            (cx - MARKER_RADIUS + offset, cy + MARKER_RADIUS),
            (cx + MARKER_RADIUS + offset, cy - MARKER_RADIUS),
            color,
            false,
        );
    }
}
