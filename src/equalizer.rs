use crate::surface::{Surface, mix_rgb};
use std::f32::consts::TAU;

pub const BAR_COUNT: usize = 12;

const BOX_W: usize = 24;
const BOX_H: usize = 16;
const MARGIN: usize = 2;

const FRAME_RGB: [u8; 3] = [2, 6, 23];
const EDGE_RGB: [u8; 3] = [94, 234, 212];
const CORE_RGB: [u8; 3] = [129, 140, 248];

/// Bar levels in [50, 255] for `elapsed` seconds since playback started.
/// Three summed sines per bar; there is no audio input behind it.
pub fn bar_levels(elapsed: f32) -> [f32; BAR_COUNT] {
    let mut out = [0.0f32; BAR_COUNT];
    for (i, level) in out.iter_mut().enumerate() {
        let base_freq = 1.5 + i as f32 * 0.4;
        let phase = i as f32 / BAR_COUNT as f32 * TAU;
        let w1 = (elapsed * base_freq + phase).sin() * 0.5;
        let w2 = (elapsed * base_freq * 0.7 + phase * 0.5).sin() * 0.3;
        let w3 = (elapsed * base_freq * 1.3 + phase * 1.5).sin() * 0.2;
        let combined = (w1 + w2 + w3 + 1.5) / 3.0;
        *level = (combined * 255.0).max(50.0);
    }
    out
}

/// Corner "sound" widget toggled like a mute switch.
#[derive(Debug, Clone, Default)]
pub struct Equalizer {
    started_at: Option<f32>,
}

impl Equalizer {
    pub fn new(enabled: bool, now: f32) -> Self {
        Self {
            started_at: enabled.then_some(now),
        }
    }

    pub fn enabled(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn toggle(&mut self, now: f32) -> bool {
        self.started_at = match self.started_at {
            Some(_) => None,
            None => Some(now),
        };
        self.enabled()
    }

    pub fn levels(&self, now: f32) -> Option<[f32; BAR_COUNT]> {
        self.started_at.map(|t0| bar_levels((now - t0).max(0.0)))
    }

    /// Draw into the bottom-right corner when enabled and the surface fits.
    pub fn draw(&self, surface: &mut Surface, now: f32) {
        let Some(levels) = self.levels(now) else {
            return;
        };
        let (w, h) = (surface.width(), surface.height());
        if w < BOX_W + MARGIN * 2 || h < BOX_H + MARGIN * 2 {
            return;
        }
        let x0 = (w - BOX_W - MARGIN) as isize;
        let y0 = (h - BOX_H - MARGIN) as isize;
        surface.fill_rect(x0, y0, BOX_W, BOX_H, FRAME_RGB, 1.0);

        let bar_w = BOX_W / BAR_COUNT;
        let centre = y0 + (BOX_H / 2) as isize;
        let max_half = (BOX_H / 2 - 1) as f32;
        for (i, &level) in levels.iter().enumerate() {
            let v = level / 255.0;
            let half = (v * max_half).max(1.0).round() as usize;
            let opacity = v.max(0.5);
            let x = x0 + (i * bar_w) as isize;
            for k in 0..half {
                // Brighter toward the centre line, teal at the tips.
                let rgb = mix_rgb(CORE_RGB, EDGE_RGB, k as f32 / half as f32);
                surface.fill_rect(x, centre - 1 - k as isize, bar_w.max(1), 1, rgb, opacity);
                surface.fill_rect(x, centre + k as isize, bar_w.max(1), 1, rgb, opacity);
            }
        }
    }
}
