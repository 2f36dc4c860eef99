//! Waveform PNG rendering.
//!
//! Samples are decimated to one vertical min/max stroke per pixel column and
//! joined column to column. Columns touching a masked interval are drawn in
//! the mask colour so flattened regions stand out.

use crate::error::Result;
use crate::types::{MaskedInterval, Sample};
use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const SIGNAL: Rgb<u8> = Rgb([31, 119, 180]);
const MASKED: Rgb<u8> = Rgb([214, 39, 40]);

#[derive(Debug, Clone, Copy)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Default for PlotStyle {
    /// 12 x 4 inches at 150 dpi
    fn default() -> Self {
        Self {
            width: 1800,
            height: 600,
            margin: 40,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Column {
    min: u16,
    max: u16,
    first: u16,
    last: u16,
    masked: bool,
}

pub fn render_waveform(
    samples: &[Sample],
    intervals: &[MaskedInterval],
    style: &PlotStyle,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(style.width, style.height, BACKGROUND);

    let left = style.margin.min(style.width / 4);
    let top = style.margin.min(style.height / 4);
    let right = style.width.saturating_sub(left + 1);
    let bottom = style.height.saturating_sub(top + 1);

    draw_frame(&mut img, left, top, right, bottom);

    if samples.is_empty() || right <= left || bottom <= top {
        return img;
    }

    let plot_width = (right - left - 1) as usize;
    let columns = decimate(samples, intervals, plot_width.max(1));

    let (lo, hi) = columns
        .iter()
        .fold((u16::MAX, u16::MIN), |(lo, hi), c| (lo.min(c.min), hi.max(c.max)));
    let (lo, hi) = if lo == hi {
        (lo.saturating_sub(1) as f64, hi as f64 + 1.0)
    } else {
        (lo as f64, hi as f64)
    };

    let inner_top = (top + 1) as f64;
    let inner_bottom = (bottom - 1) as f64;
    let to_y = |amplitude: u16| -> u32 {
        let frac = (amplitude as f64 - lo) / (hi - lo);
        (inner_bottom - frac * (inner_bottom - inner_top)).round() as u32
    };

    let mut previous: Option<u32> = None;
    for (i, column) in columns.iter().enumerate() {
        let x = left + 1 + i as u32;
        let colour = if column.masked { MASKED } else { SIGNAL };

        draw_vertical(&mut img, x, to_y(column.min), to_y(column.max), colour);
        if let Some(prev_y) = previous {
            draw_vertical(&mut img, x, prev_y, to_y(column.first), colour);
        }
        previous = Some(to_y(column.last));
    }

    img
}

pub fn save_waveform_png(
    path: &Path,
    samples: &[Sample],
    intervals: &[MaskedInterval],
    style: &PlotStyle,
) -> Result<()> {
    let img = render_waveform(samples, intervals, style);
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn decimate(samples: &[Sample], intervals: &[MaskedInterval], width: usize) -> Vec<Column> {
    let n = samples.len();
    let count = width.min(n);
    let mut columns = Vec::with_capacity(count);
    let mut next_interval = 0usize;

    for c in 0..count {
        let start = c * n / count;
        let end = ((c + 1) * n / count).max(start + 1);
        let chunk = &samples[start..end];

        while next_interval < intervals.len() && intervals[next_interval].end_index <= start {
            next_interval += 1;
        }
        let masked = intervals
            .get(next_interval)
            .is_some_and(|iv| iv.start_index < end);

        let (min, max) = chunk.iter().fold((u16::MAX, u16::MIN), |(lo, hi), s| {
            (lo.min(s.amplitude()), hi.max(s.amplitude()))
        });

        columns.push(Column {
            min,
            max,
            first: chunk[0].amplitude(),
            last: chunk[chunk.len() - 1].amplitude(),
            masked,
        });
    }

    columns
}

fn draw_frame(img: &mut RgbImage, left: u32, top: u32, right: u32, bottom: u32) {
    for x in left..=right.min(img.width() - 1) {
        put(img, x, top, AXIS);
        put(img, x, bottom, AXIS);
    }
    for y in top..=bottom.min(img.height() - 1) {
        put(img, left, y, AXIS);
        put(img, right, y, AXIS);
    }
}

fn draw_vertical(img: &mut RgbImage, x: u32, y0: u32, y1: u32, colour: Rgb<u8>) {
    let (a, b) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    for y in a..=b {
        put(img, x, y, colour);
    }
}

fn put(img: &mut RgbImage, x: u32, y: u32, colour: Rgb<u8>) {
    if x < img.width() && y < img.height() {
        img.put_pixel(x, y, colour);
    }
}
