use crate::field::Point;
use crate::surface::Surface;

const FOLLOW_LERP: f32 = 0.25;
const SPARKLE_CHANCE: f32 = 0.4;
const SPARKLE_LIFE: f32 = 0.6;
const MAX_SPARKLES: usize = 64;

const CURSOR_RGB: [u8; 3] = [94, 234, 212];
const SPARKLE_RGB: [u8; 3] = [165, 243, 252];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sparkle {
    pub at: Point,
    pub age: f32,
}

/// Dot that trails the pointer and sheds fading sparkles.
pub struct CursorFollower {
    target: Option<Point>,
    pos: Option<Point>,
    sparkles: Vec<Sparkle>,
    rng: fastrand::Rng,
}

impl CursorFollower {
    pub fn new(rng: fastrand::Rng) -> Self {
        Self {
            target: None,
            pos: None,
            sparkles: Vec::with_capacity(MAX_SPARKLES),
            rng,
        }
    }

    pub fn set_target(&mut self, target: Option<Point>) {
        self.target = target;
        if target.is_none() {
            self.pos = None;
        }
    }

    pub fn position(&self) -> Option<Point> {
        self.pos
    }

    pub fn sparkles(&self) -> &[Sparkle] {
        &self.sparkles
    }

    pub fn step(&mut self, dt: f32) {
        for s in &mut self.sparkles {
            s.age += dt.max(0.0);
        }
        self.sparkles.retain(|s| s.age < SPARKLE_LIFE);

        let Some(target) = self.target else {
            return;
        };
        let pos = match self.pos {
            Some(p) => Point::new(
                p.x + (target.x - p.x) * FOLLOW_LERP,
                p.y + (target.y - p.y) * FOLLOW_LERP,
            ),
            None => target,
        };
        self.pos = Some(pos);

        if self.rng.f32() < SPARKLE_CHANCE && self.sparkles.len() < MAX_SPARKLES {
            self.sparkles.push(Sparkle { at: pos, age: 0.0 });
        }
    }

    pub fn draw(&self, surface: &mut Surface) {
        for s in &self.sparkles {
            let fade = 1.0 - s.age / SPARKLE_LIFE;
            surface.fill_disc(s.at.x, s.at.y, 0.5, SPARKLE_RGB, 0.6 * fade);
        }
        if let Some(p) = self.pos {
            surface.fill_disc(p.x, p.y, 1.6, CURSOR_RGB, 0.9);
        }
    }
}
