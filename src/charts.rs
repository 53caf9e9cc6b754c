//! Raster chart rendering for the dashboard pages.
//!
//! Charts are plain shapes drawn into an RGB buffer and encoded as PNG.
//! Titles, labels and values live in the HTML next to each image.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::aggregate::{Aggregate, QuarterlySales, SalesSummary};
use crate::error::{ReportError, Result};

pub const INDIGO: Rgb<u8> = Rgb([0x63, 0x66, 0xf1]);
pub const EMERALD: Rgb<u8> = Rgb([0x10, 0xb9, 0x81]);
pub const AMBER: Rgb<u8> = Rgb([0xf5, 0x9e, 0x0b]);
pub const RED: Rgb<u8> = Rgb([0xef, 0x44, 0x44]);

/// Region and quarter series colours, in series order.
pub const PALETTE: [Rgb<u8>; 4] = [INDIGO, EMERALD, AMBER, RED];
/// Segment slices use a different order.
pub const SEGMENT_PALETTE: [Rgb<u8>; 3] = [INDIGO, AMBER, EMERALD];

const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
const GREY: Rgb<u8> = Rgb([0xcb, 0xd5, 0xe1]);

const PAGE_WIDTH: u32 = 1440;
const PAGE_HEIGHT: u32 = 720;
const PANEL_MARGIN: u32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Rect {
    fn inset(self, margin: u32) -> Rect {
        let m = margin.min(self.w / 2).min(self.h / 2);
        Rect {
            x: self.x + m,
            y: self.y + m,
            w: self.w - 2 * m,
            h: self.h - 2 * m,
        }
    }

    fn halves(self) -> (Rect, Rect) {
        let left = Rect { w: self.w / 2, ..self };
        let right = Rect {
            x: self.x + left.w,
            w: self.w - left.w,
            ..self
        };
        (left, right)
    }

    fn bottom(self) -> u32 {
        self.y + self.h
    }
}

/// Drawing surface backed by an `RgbImage`.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    fn bounds(&self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            w: self.width(),
            h: self.height(),
        }
    }

    /// Fill a rectangle, clipped to the canvas.
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
        let x_end = x.saturating_add(w).min(self.width());
        let y_end = y.saturating_add(h).min(self.height());
        for py in y..y_end {
            for px in x..x_end {
                self.image.put_pixel(px, py, color);
            }
        }
    }

    /// Filled rectangle with a 2px black edge.
    fn framed_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
        if w == 0 || h == 0 {
            return;
        }
        self.fill_rect(x, y, w, h, BLACK);
        if w > 4 && h > 4 {
            self.fill_rect(x + 2, y + 2, w - 4, h - 4, color);
        }
    }

    /// Disc split into slices clockwise from twelve o'clock. Fractions are
    /// cumulative shares of the whole and must sum to one.
    fn fill_pie(&mut self, area: Rect, slices: &[(f64, Rgb<u8>)]) {
        let radius = (area.w.min(area.h) / 2) as f64;
        let cx = area.x as f64 + area.w as f64 / 2.0;
        let cy = area.y as f64 + area.h as f64 / 2.0;

        for py in area.y..area.bottom().min(self.height()) {
            for px in area.x..(area.x + area.w).min(self.width()) {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let angle = dx.atan2(-dy).rem_euclid(std::f64::consts::TAU) / std::f64::consts::TAU;
                let mut cumulative = 0.0;
                let mut color = slices.last().map(|s| s.1).unwrap_or(GREY);
                for (fraction, slice_color) in slices {
                    cumulative += fraction;
                    if angle < cumulative {
                        color = *slice_color;
                        break;
                    }
                }
                self.image.put_pixel(px, py, color);
            }
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ReportError::Chart(e.to_string()))?;
        Ok(bytes)
    }

    pub fn to_base64_png(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_png()?))
    }
}

fn positive_max(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| v.is_finite()).fold(0.0, f64::max)
}

/// Scale a value into `0..=extent` pixels; negatives draw as nothing.
fn scaled(value: f64, max: f64, extent: u32) -> u32 {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    ((value / max) * extent as f64).round().min(extent as f64) as u32
}

fn draw_baseline(canvas: &mut Canvas, area: Rect) {
    canvas.fill_rect(area.x, area.bottom().saturating_sub(2), area.w, 2, BLACK);
}

fn draw_vertical_bars(canvas: &mut Canvas, area: Rect, values: &[f64], colors: &[Rgb<u8>]) {
    if values.is_empty() {
        return;
    }
    let max = positive_max(values.iter().copied());
    let slot = area.w / values.len() as u32;
    let bar_w = slot * 3 / 5;
    for (i, value) in values.iter().enumerate() {
        let h = scaled(*value, max, area.h);
        let x = area.x + slot * i as u32 + (slot - bar_w) / 2;
        canvas.framed_rect(x, area.bottom() - h, bar_w, h, colors[i % colors.len()]);
    }
    draw_baseline(canvas, area);
}

fn draw_stacked_quarters(canvas: &mut Canvas, area: Rect, quarterly: &QuarterlySales) {
    if quarterly.years.is_empty() {
        return;
    }
    let max = positive_max(
        quarterly
            .years
            .iter()
            .map(|y| y.quarters.iter().map(|q| q.max(0.0)).sum::<f64>()),
    );
    let slot = area.w / quarterly.years.len() as u32;
    let bar_w = slot * 3 / 5;
    for (i, year) in quarterly.years.iter().enumerate() {
        let x = area.x + slot * i as u32 + (slot - bar_w) / 2;
        let mut top = area.bottom();
        for (q, value) in year.quarters.iter().enumerate() {
            let h = scaled(*value, max, area.h).min(top - area.y);
            top -= h;
            canvas.fill_rect(x, top, bar_w, h, PALETTE[q]);
        }
    }
    draw_baseline(canvas, area);
}

/// Horizontal bars, first entry at the top.
fn draw_horizontal_bars(canvas: &mut Canvas, area: Rect, aggregate: &Aggregate, color: Rgb<u8>) {
    if aggregate.is_empty() {
        return;
    }
    let max = positive_max(aggregate.entries().iter().map(|e| e.value));
    let slot = area.h / aggregate.len() as u32;
    let bar_h = slot * 7 / 10;
    for (i, entry) in aggregate.entries().iter().enumerate() {
        let w = scaled(entry.value, max, area.w);
        let y = area.y + slot * i as u32 + (slot - bar_h) / 2;
        canvas.framed_rect(area.x, y, w, bar_h, color);
    }
    canvas.fill_rect(area.x, area.y, 2, area.h, BLACK);
}

fn draw_pie(canvas: &mut Canvas, area: Rect, aggregate: &Aggregate, colors: &[Rgb<u8>]) {
    let total: f64 = aggregate.entries().iter().map(|e| e.value.max(0.0)).sum();
    let slices: Vec<(f64, Rgb<u8>)> = if total > 0.0 {
        aggregate
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| (e.value.max(0.0) / total, colors[i % colors.len()]))
            .collect()
    } else {
        vec![(1.0, GREY)]
    };
    canvas.fill_pie(area, &slices);
}

fn page_panels(canvas: &Canvas) -> (Rect, Rect) {
    let (left, right) = canvas.bounds().halves();
    (left.inset(PANEL_MARGIN), right.inset(PANEL_MARGIN))
}

/// Sales by region beside quarterly revenue stacked per year.
pub fn overview_chart(summary: &SalesSummary) -> Canvas {
    let mut canvas = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT);
    let (left, right) = page_panels(&canvas);
    let regions: Vec<f64> = summary
        .by_region
        .canonical
        .entries()
        .iter()
        .map(|e| e.value)
        .collect();
    draw_vertical_bars(&mut canvas, left, &regions, &PALETTE);
    draw_stacked_quarters(&mut canvas, right, &summary.by_quarter);
    canvas
}

/// Sales by category beside the top sub-categories.
pub fn categories_chart(summary: &SalesSummary) -> Canvas {
    let mut canvas = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT);
    let (left, right) = page_panels(&canvas);
    let categories: Vec<f64> = summary.by_category.entries().iter().map(|e| e.value).collect();
    draw_vertical_bars(&mut canvas, left, &categories, &PALETTE[..3]);
    draw_horizontal_bars(&mut canvas, right, &summary.top_sub_categories, INDIGO);
    canvas
}

/// Segment split beside the top customers.
pub fn customers_chart(summary: &SalesSummary) -> Canvas {
    let mut canvas = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT);
    let (left, right) = page_panels(&canvas);
    draw_pie(&mut canvas, left, &summary.by_segment, &SEGMENT_PALETTE);
    draw_horizontal_bars(&mut canvas, right, &summary.top_customers, INDIGO);
    canvas
}

/// Base64-encoded PNG for each dashboard page.
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub overview: String,
    pub categories: String,
    pub customers: String,
}

pub fn render_charts(summary: &SalesSummary) -> Result<ChartSet> {
    let charts = ChartSet {
        overview: overview_chart(summary).to_base64_png()?,
        categories: categories_chart(summary).to_base64_png()?,
        customers: customers_chart(summary).to_base64_png()?,
    };
    debug!(
        "Encoded charts: overview {} bytes, categories {} bytes, customers {} bytes",
        charts.overview.len(),
        charts.categories.len(),
        charts.customers.len()
    );
    Ok(charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::YearQuarters;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn aggregate(pairs: &[(&str, f64)]) -> Aggregate {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_png_signature() {
        let bytes = Canvas::new(8, 8).to_png().unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_base64_decodes_to_png() {
        let encoded = Canvas::new(4, 4).to_base64_png().unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(&decoded[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_scaled() {
        assert_eq!(scaled(50.0, 100.0, 200), 100);
        assert_eq!(scaled(100.0, 100.0, 200), 200);
        assert_eq!(scaled(-5.0, 100.0, 200), 0);
        assert_eq!(scaled(5.0, 0.0, 200), 0);
    }

    #[test]
    fn test_tallest_bar_reaches_top() {
        let mut canvas = Canvas::new(400, 200);
        let area = Rect { x: 0, y: 0, w: 400, h: 200 };
        draw_vertical_bars(&mut canvas, area, &[0.0, 100.0], &PALETTE);
        // Second slot is centred at x = 300.
        assert_eq!(canvas.pixel(300, 100), EMERALD);
        assert_eq!(canvas.pixel(100, 100), WHITE);
    }

    #[test]
    fn test_quarters_stack_from_q1_up() {
        let quarterly = QuarterlySales {
            years: vec![
                YearQuarters { year: 2015, quarters: [50.0, 0.0, 0.0, 50.0], total: 100.0 },
                YearQuarters { year: 2016, quarters: [25.0, 25.0, 0.0, 0.0], total: 50.0 },
            ],
        };
        let mut canvas = Canvas::new(200, 200);
        let area = Rect { x: 0, y: 0, w: 200, h: 200 };
        draw_stacked_quarters(&mut canvas, area, &quarterly);

        // 2015 fills the full height: Q1 in the lower half, Q4 on top.
        assert_eq!(canvas.pixel(50, 150), PALETTE[0]);
        assert_eq!(canvas.pixel(50, 99), PALETTE[3]);
        assert_eq!(canvas.pixel(50, 0), PALETTE[3]);
        // 2016 totals half as much, so its stack ends at mid-height.
        assert_eq!(canvas.pixel(150, 175), PALETTE[0]);
        assert_eq!(canvas.pixel(150, 125), PALETTE[1]);
        assert_eq!(canvas.pixel(150, 100), PALETTE[1]);
        assert_eq!(canvas.pixel(150, 99), WHITE);
        // Gap between bars stays empty.
        assert_eq!(canvas.pixel(10, 150), WHITE);
    }

    #[test]
    fn test_pie_slices_clockwise() {
        let mut canvas = Canvas::new(200, 200);
        let area = Rect { x: 0, y: 0, w: 200, h: 200 };
        draw_pie(&mut canvas, area, &aggregate(&[("a", 1.0), ("b", 1.0)]), &SEGMENT_PALETTE);
        // Right half belongs to the first slice, left half to the second.
        assert_eq!(canvas.pixel(150, 100), INDIGO);
        assert_eq!(canvas.pixel(50, 100), AMBER);
        assert_eq!(canvas.pixel(0, 0), WHITE);
    }

    #[test]
    fn test_empty_inputs_draw_nothing_but_baseline() {
        let mut canvas = Canvas::new(100, 100);
        let area = Rect { x: 0, y: 0, w: 100, h: 100 };
        draw_horizontal_bars(&mut canvas, area, &Aggregate::default(), INDIGO);
        draw_stacked_quarters(&mut canvas, area, &QuarterlySales::default());
        assert_eq!(canvas.pixel(50, 50), WHITE);
    }
}
