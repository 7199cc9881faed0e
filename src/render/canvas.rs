// src/render/canvas.rs
//! Owned software framebuffer with the 2D primitives the styles draw with.

use super::color::{Rgb, gradient_color};

/// Hard cap on either canvas dimension. Resize requests beyond this clamp.
const MAX_DIM: usize = 4096;

/// An owned RGB drawing surface with explicit pixel dimensions.
///
/// Every frame starts with a full `fill`; there are no partial redraws.
/// Glow is a drawing state: while set, stroke-like primitives stamp a soft
/// halo around what they draw. Callers must clear it after each frame.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    glow: f32,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.clamp(1, MAX_DIM);
        let height = height.clamp(1, MAX_DIM);
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
            glow: 0.0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resize to new pixel dimensions. Contents are cleared to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width.clamp(1, MAX_DIM);
        self.height = height.clamp(1, MAX_DIM);
        self.pixels = vec![Rgb::BLACK; self.width * self.height];
    }

    /// Raw pixel access, row-major. Used by the host view and by tests.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Enable glow with the given blur radius in pixels.
    pub fn set_glow(&mut self, radius: f32) {
        self.glow = radius.max(0.0);
    }

    /// Clear any glow state. Must be called at the end of a frame so glow
    /// never leaks into the next style's frame.
    pub fn clear_glow(&mut self) {
        self.glow = 0.0;
    }

    pub fn glow(&self) -> f32 {
        self.glow
    }

    /// Fill the whole surface with one color.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn set(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = self.pixels[idx].lerp(color, alpha);
    }

    /// Soft halo stamped around stroked geometry while glow is active.
    fn glow_halo(&mut self, cx: f32, cy: f32, color: Rgb) {
        let radius = self.glow;
        if radius <= 0.0 {
            return;
        }
        let r = radius.ceil() as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist <= radius {
                    let falloff = 1.0 - dist / radius;
                    self.blend(
                        cx as i64 + dx,
                        cy as i64 + dy,
                        color,
                        0.18 * falloff * falloff,
                    );
                }
            }
        }
    }

    /// Filled rectangle with a vertical gradient; `stops` run top to bottom.
    pub fn fill_rect_vgradient(&mut self, x: f32, y: f32, w: f32, h: f32, stops: &[(f32, Rgb)]) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = x.floor().max(0.0) as usize;
        let y0 = y.floor().max(0.0) as usize;
        let x1 = ((x + w).ceil() as usize).min(self.width);
        let y1 = ((y + h).ceil() as usize).min(self.height);
        for py in y0..y1 {
            let t = (py as f32 - y) / h;
            let color = gradient_color(stops, t);
            for px in x0..x1 {
                self.pixels[py * self.width + px] = color;
            }
        }
        if self.glow > 0.0 {
            let top = gradient_color(stops, 0.0);
            let mut gx = x;
            while gx < x + w {
                self.glow_halo(gx, y, top);
                gx += 2.0;
            }
        }
    }

    /// Straight line segment with a given stroke width.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb, width: f32) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let glow_stride = (self.glow.max(1.0) as usize).max(2);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let px = x0 + dx * t;
            let py = y0 + dy * t;
            if width <= 1.5 {
                self.set(px.round() as i64, py.round() as i64, color);
            } else {
                self.fill_disc(px, py, width / 2.0, color);
            }
            if self.glow > 0.0 && i % glow_stride == 0 {
                self.glow_halo(px, py, color);
            }
        }
    }

    /// Open polyline through `points`.
    pub fn polyline(&mut self, points: &[(f32, f32)], color: Rgb, width: f32) {
        for pair in points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            self.line(x0, y0, x1, y1, color, width);
        }
    }

    /// Solid filled disc.
    pub fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        let r = radius.ceil() as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist <= radius {
                    self.set(cx as i64 + dx, cy as i64 + dy, color);
                }
            }
        }
    }

    /// Disc fading radially to transparent, like a small radial gradient.
    pub fn fill_disc_soft(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        let r = radius.ceil() as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist <= radius {
                    let alpha = 1.0 - dist / radius.max(f32::EPSILON);
                    self.blend(cx as i64 + dx, cy as i64 + dy, color, alpha);
                }
            }
        }
        if self.glow > 0.0 {
            self.glow_halo(cx, cy, color);
        }
    }

    /// Fill a closed polygon with a radial gradient centered on (cx, cy).
    /// `radius_ref` is the distance at which the gradient reaches its end.
    pub fn fill_polygon_radial(
        &mut self,
        points: &[(f32, f32)],
        cx: f32,
        cy: f32,
        radius_ref: f32,
        stops: &[(f32, Rgb)],
    ) {
        if points.len() < 3 {
            return;
        }
        let min_x = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let max_x = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);

        let x0 = min_x.floor().max(0.0) as usize;
        let y0 = min_y.floor().max(0.0) as usize;
        let x1 = (max_x.ceil() as usize + 1).min(self.width);
        let y1 = (max_y.ceil() as usize + 1).min(self.height);
        let radius_ref = radius_ref.max(f32::EPSILON);

        for py in y0..y1 {
            for px in x0..x1 {
                let fx = px as f32 + 0.5;
                let fy = py as f32 + 0.5;
                if polygon_contains(points, fx, fy) {
                    let dist = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt();
                    let color = gradient_color(stops, dist / radius_ref);
                    self.pixels[py * self.width + px] = color;
                }
            }
        }
    }

    /// Stroke a closed polygon outline.
    pub fn stroke_polygon(&mut self, points: &[(f32, f32)], color: Rgb, width: f32) {
        if points.len() < 2 {
            return;
        }
        self.polyline(points, color, width);
        let first = points[0];
        let last = points[points.len() - 1];
        self.line(last.0, last.1, first.0, first.1, color, width);
    }
}

/// Even-odd point-in-polygon test.
fn polygon_contains(points: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) {
            let x_cross = xi + (y - yi) / (yj - yi) * (xj - xi);
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_covers_every_pixel() {
        let mut canvas = Canvas::new(8, 4);
        let red = Rgb::new(255, 0, 0);
        canvas.fill(red);
        assert!(canvas.pixels().iter().all(|&p| p == red));
    }

    #[test]
    fn rect_clips_to_bounds() {
        let mut canvas = Canvas::new(4, 4);
        let c = Rgb::new(0, 255, 0);
        let stops = [(0.0, c)];
        canvas.fill_rect_vgradient(-2.0, -2.0, 100.0, 100.0, &stops);
        assert!(canvas.pixels().iter().all(|&p| p == c));
        // Degenerate sizes are a no-op rather than a panic.
        canvas.fill_rect_vgradient(1.0, 1.0, 0.0, 5.0, &[(0.0, Rgb::BLACK)]);
        canvas.fill_rect_vgradient(1.0, 1.0, -3.0, 5.0, &[(0.0, Rgb::BLACK)]);
        assert!(canvas.pixels().iter().all(|&p| p == c));
    }

    #[test]
    fn resize_clears_contents() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill(Rgb::new(9, 9, 9));
        canvas.resize(6, 2);
        assert_eq!(canvas.width(), 6);
        assert_eq!(canvas.height(), 2);
        assert!(canvas.pixels().iter().all(|&p| p == Rgb::BLACK));
    }

    #[test]
    fn zero_dimension_requests_clamp_to_one() {
        let canvas = Canvas::new(0, 0);
        assert_eq!(canvas.width(), 1);
        assert_eq!(canvas.height(), 1);
    }

    #[test]
    fn glow_state_clears() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set_glow(10.0);
        assert!(canvas.glow() > 0.0);
        canvas.clear_glow();
        assert_eq!(canvas.glow(), 0.0);
    }

    #[test]
    fn vertical_gradient_runs_top_to_bottom() {
        let mut canvas = Canvas::new(1, 10);
        let top = Rgb::new(255, 255, 255);
        let stops = [(0.0, top), (1.0, Rgb::BLACK)];
        canvas.fill_rect_vgradient(0.0, 0.0, 1.0, 10.0, &stops);
        let first = canvas.pixel(0, 0).unwrap();
        let last = canvas.pixel(0, 9).unwrap();
        assert!(first.r > last.r);
    }

    #[test]
    fn polygon_contains_center() {
        let square = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        assert!(polygon_contains(&square, 2.0, 2.0));
        assert!(!polygon_contains(&square, 5.0, 2.0));
    }
}
