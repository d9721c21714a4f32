/// RGBA pixel buffer repainted in full every frame.
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width.saturating_mul(height).saturating_mul(4)],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0u8; width.saturating_mul(height).saturating_mul(4)];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    pub fn clear(&mut self, rgb: [u8; 3]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = rgb[0];
            px[1] = rgb[1];
            px[2] = rgb[2];
            px[3] = 255;
        }
    }

    /// Alpha-blend one pixel; out-of-bounds writes are dropped.
    pub fn blend(&mut self, x: isize, y: isize, rgb: [u8; 3], alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 4;
        for c in 0..3 {
            self.pixels[i + c] = lerp_u8(self.pixels[i + c], rgb[c], a);
        }
        self.pixels[i + 3] = 255;
    }

    /// Soft-edged disc; radii below one pixel still light the centre pixel.
    pub fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, rgb: [u8; 3], alpha: f32) {
        if !(cx.is_finite() && cy.is_finite()) {
            return;
        }
        let r = radius.max(0.5);
        let x0 = (cx - r).floor() as isize;
        let x1 = (cx + r).ceil() as isize;
        let y0 = (cy - r).floor() as isize;
        let y1 = (cy + r).ceil() as isize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let cover = (r + 0.5 - d).clamp(0.0, 1.0);
                if cover > 0.0 {
                    self.blend(x, y, rgb, alpha * cover);
                }
            }
        }
    }

    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, rgb: [u8; 3], alpha: f32) {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return;
        }
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let sx = dx / steps as f32;
        let sy = dy / steps as f32;
        for i in 0..=steps {
            let x = x0 + sx * i as f32;
            let y = y0 + sy * i as f32;
            self.blend(x.floor() as isize, y.floor() as isize, rgb, alpha);
        }
    }

    pub fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, rgb: [u8; 3], alpha: f32) {
        for yy in 0..h as isize {
            for xx in 0..w as isize {
                self.blend(x + xx, y + yy, rgb, alpha);
            }
        }
    }
}

pub fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (a as f32 * (1.0 - t) + b as f32 * t).round() as u8
}

pub fn mix_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    [lerp_u8(a[0], b[0], t), lerp_u8(a[1], b[1], t), lerp_u8(a[2], b[2], t)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_ignores_out_of_bounds() {
        let mut s = Surface::new(4, 4);
        s.blend(-1, 0, [255, 255, 255], 1.0);
        s.blend(4, 0, [255, 255, 255], 1.0);
        assert!(s.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn line_lights_both_endpoints() {
        let mut s = Surface::new(8, 8);
        s.clear([0, 0, 0]);
        s.draw_line(0.5, 0.5, 6.5, 3.5, [200, 100, 50], 1.0);
        assert_eq!(s.pixel(0, 0), Some([200, 100, 50]));
        assert_eq!(s.pixel(6, 3), Some([200, 100, 50]));
    }
}
