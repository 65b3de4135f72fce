//! Pixel-level drawing on an RGB raster.
//!
//! Filled shapes cover a pixel when the pixel centre lies inside them. An
//! optional clip shape restricts every write the same way.

use image::RgbImage;

use crate::palette::{Color, WHITE};

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Polygon(Vec<(f64, f64)>),
}

impl Shape {
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Shape::Rect { x, y, w, h }
    }

    /// Even-odd containment test.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match self {
            Shape::Rect { x, y, w, h } => px >= *x && px < x + w && py >= *y && py < y + h,
            Shape::Polygon(points) => {
                let mut inside = false;
                let n = points.len();
                for i in 0..n {
                    let (xi, yi) = points[i];
                    let (xj, yj) = points[(i + n - 1) % n];
                    if (yi > py) != (yj > py) {
                        let cross = xi + (py - yi) / (yj - yi) * (xj - xi);
                        if px < cross {
                            inside = !inside;
                        }
                    }
                }
                inside
            }
        }
    }

    /// `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        match self {
            Shape::Rect { x, y, w, h } => (*x, *y, x + w, y + h),
            Shape::Polygon(points) => points.iter().fold(
                (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
                |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            ),
        }
    }

    fn edges(&self) -> Vec<((f64, f64), (f64, f64))> {
        let points = match self {
            Shape::Rect { x, y, w, h } => vec![(*x, *y), (x + w, *y), (x + w, y + h), (*x, y + h)],
            Shape::Polygon(points) => points.clone(),
        };
        let n = points.len();
        (0..n).map(|i| (points[i], points[(i + 1) % n])).collect()
    }
}

fn distance_to_segment(px: f64, py: f64, (ax, ay): (f64, f64), (bx, by): (f64, f64)) -> f64 {
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

pub struct Canvas {
    image: RgbImage,
    clip: Option<Shape>,
}

impl Canvas {
    /// White canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, WHITE),
            clip: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        *self.image.get_pixel(x, y)
    }

    pub fn set_clip(&mut self, clip: Option<Shape>) {
        self.clip = clip;
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Write one pixel, honouring bounds and the clip.
    pub fn plot(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        if let Some(clip) = &self.clip {
            if !clip.contains(x as f64 + 0.5, y as f64 + 0.5) {
                return;
            }
        }
        self.image.put_pixel(x as u32, y as u32, color);
    }

    /// Pixel index range whose centres fall in `[from, to)`.
    fn span(from: f64, to: f64, limit: u32) -> std::ops::Range<i64> {
        let lo = (from - 0.5).ceil().max(0.0) as i64;
        let hi = (to - 0.5).ceil().min(limit as f64) as i64;
        lo..hi.max(lo)
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        for py in Self::span(y, y + h, self.height()) {
            for px in Self::span(x, x + w, self.width()) {
                self.plot(px, py, color);
            }
        }
    }

    /// One-pixel outline on the rectangle edges.
    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let (x0, y0) = (x.floor() as i64, y.floor() as i64);
        let (x1, y1) = ((x + w).floor() as i64, (y + h).floor() as i64);
        for px in x0..=x1 {
            self.plot(px, y0, color);
            self.plot(px, y1, color);
        }
        for py in y0..=y1 {
            self.plot(x0, py, color);
            self.plot(x1, py, color);
        }
    }

    /// One-pixel vertical line in the column containing `x`.
    pub fn vline(&mut self, x: f64, y0: f64, y1: f64, color: Color) {
        let px = x.floor() as i64;
        let (lo, hi) = (y0.min(y1).floor() as i64, y0.max(y1).floor() as i64);
        for py in lo..=hi {
            self.plot(px, py, color);
        }
    }

    fn pixels_in(&self, shape: &Shape, pad: f64) -> Vec<(i64, i64)> {
        let (x0, y0, x1, y1) = shape.bounds();
        let mut out = Vec::new();
        for py in Self::span(y0 - pad, y1 + pad, self.height()) {
            for px in Self::span(x0 - pad, x1 + pad, self.width()) {
                out.push((px, py));
            }
        }
        out
    }

    pub fn fill_shape(&mut self, shape: &Shape, color: Color) {
        self.fill_shape_with(shape, |_| color);
    }

    /// Fill `shape` with a colour chosen per pixel row.
    pub fn fill_shape_with<F>(&mut self, shape: &Shape, color_at: F)
    where
        F: Fn(f64) -> Color,
    {
        for (px, py) in self.pixels_in(shape, 0.0) {
            let (cx, cy) = (px as f64 + 0.5, py as f64 + 0.5);
            if shape.contains(cx, cy) {
                self.plot(px, py, color_at(cy));
            }
        }
    }

    /// Outline of `shape`, `width` pixels thick and centred on its edges.
    pub fn stroke_shape(&mut self, shape: &Shape, width: f64, color: Color) {
        let half = width / 2.0;
        let edges = shape.edges();
        for (px, py) in self.pixels_in(shape, half) {
            let (cx, cy) = (px as f64 + 0.5, py as f64 + 0.5);
            if edges.iter().any(|&(a, b)| distance_to_segment(cx, cy, a, b) <= half) {
                self.plot(px, py, color);
            }
        }
    }
}
