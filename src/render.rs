use image::{Rgb, RgbImage};

use crate::config::{BRAND_COLOR, LABEL, LABEL_COLOR, OUTLINE_COLOR, OUTLINE_MIN_SIZE};
use crate::font::{Coverage, LabelFont};

/// Ink box of rasterized text, `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl InkBounds {
    pub fn of(coverage: &[Coverage]) -> Option<Self> {
        coverage.iter().fold(None, |bounds, c| {
            let (right, bottom) = (c.x + c.width as i32, c.y + c.height as i32);
            Some(match bounds {
                None => InkBounds {
                    left: c.x,
                    top: c.y,
                    right,
                    bottom,
                },
                Some(b) => InkBounds {
                    left: b.left.min(c.x),
                    top: b.top.min(c.y),
                    right: b.right.max(right),
                    bottom: b.bottom.max(bottom),
                },
            })
        })
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

pub fn font_size_for(size: u32) -> f32 {
    (size / 3) as f32
}

/// Where the top-left of the ink box goes: centered horizontally, lifted by a
/// quarter of the text height.
pub fn label_origin(size: u32, text_width: i32, text_height: i32) -> (i32, i32) {
    let size = size as i32;
    let x = (size - text_width).div_euclid(2);
    let y = (size - text_height).div_euclid(2) - text_height / 4;
    (x, y)
}

/// Renders one icon, resolving the label font from the system candidates.
pub fn render(size: u32) -> RgbImage {
    let mut font = LabelFont::resolve(None);
    render_with(size, &mut font)
}

pub fn render_with(size: u32, font: &mut LabelFont) -> RgbImage {
    let mut img = RgbImage::from_pixel(size, size, BRAND_COLOR);

    let coverage = font.rasterize(LABEL, font_size_for(size));
    if let Some(bounds) = InkBounds::of(&coverage) {
        let (x, y) = label_origin(size, bounds.width(), bounds.height());
        draw_coverage(&mut img, &coverage, x - bounds.left, y - bounds.top, LABEL_COLOR);
    }

    if size >= OUTLINE_MIN_SIZE {
        let margin = size / 8;
        draw_ring(&mut img, margin, (size / 128).max(2), OUTLINE_COLOR);
    }

    img
}

fn draw_coverage(img: &mut RgbImage, coverage: &[Coverage], dx: i32, dy: i32, color: Rgb<u8>) {
    let (width, height) = (img.width() as i32, img.height() as i32);

    for c in coverage {
        for y in (c.y + dy)..(c.y + dy + c.height as i32) {
            for x in (c.x + dx)..(c.x + dx + c.width as i32) {
                if x < 0 || y < 0 || x >= width || y >= height {
                    continue;
                }
                let pixel = img.get_pixel_mut(x as u32, y as u32);
                *pixel = blend(*pixel, color, c.alpha);
            }
        }
    }
}

fn blend(bg: Rgb<u8>, fg: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = alpha as u32;
    let mix = |b: u8, f: u8| ((b as u32 * (255 - a) + f as u32 * a + 127) / 255) as u8;
    Rgb([mix(bg[0], fg[0]), mix(bg[1], fg[1]), mix(bg[2], fg[2])])
}

/// Circle outline inside the box `[margin, margin, size - margin, size - margin]`
/// (inclusive), stroke growing inward.
fn draw_ring(img: &mut RgbImage, margin: u32, stroke: u32, color: Rgb<u8>) {
    let size = img.width();
    let center = size as f32 / 2.0;
    let outer = (size - 2 * margin) as f32 / 2.0 + 0.5;
    let inner = outer - stroke as f32;

    for y in margin..=(size - margin).min(size - 1) {
        for x in margin..=(size - margin).min(size - 1) {
            let (dx, dy) = (x as f32 - center, y as f32 - center);
            let dist = (dx * dx + dy * dy).sqrt();
            if dist >= inner && dist < outer {
                img.put_pixel(x, y, color);
            }
        }
    }
}
