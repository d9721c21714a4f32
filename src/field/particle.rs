use super::shapes::Point;
use std::f32::consts::TAU;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Effective target for the current frame.
    pub tx: f32,
    pub ty: f32,
    /// Target as assigned from the point cloud, before any wobble.
    pub base_tx: f32,
    pub base_ty: f32,
    pub radius: f32,
    pub phase: f32,
    pub twinkle_speed: f32,
    pub twinkle_depth: f32,
    /// Response scalar in [0, 1); lower values trail the formation.
    pub delay: f32,
}

impl Particle {
    pub fn spawn(rng: &mut fastrand::Rng, width: f32, height: f32) -> Self {
        let x = rng.f32() * width.max(0.0);
        let y = rng.f32() * height.max(0.0);
        let angle = rng.f32() * TAU;
        let speed = 0.1 + rng.f32() * 0.3;
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            tx: x,
            ty: y,
            base_tx: x,
            base_ty: y,
            radius: 0.45 + rng.f32() * 0.75,
            phase: rng.f32() * TAU,
            twinkle_speed: 0.8 + rng.f32() * 2.4,
            twinkle_depth: 0.2 + rng.f32() * 0.5,
            delay: 0.35 + rng.f32() * 0.6,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn target(&self) -> Point {
        Point::new(self.tx, self.ty)
    }

    pub fn base_target(&self) -> Point {
        Point::new(self.base_tx, self.base_ty)
    }

    /// Replace both the base and the effective target.
    pub fn retarget(&mut self, p: Point) {
        self.base_tx = p.x;
        self.base_ty = p.y;
        self.tx = p.x;
        self.ty = p.y;
    }

    /// Twinkle brightness in [0, 1].
    pub fn brightness(&self, t: f32) -> f32 {
        let wave = (t * self.twinkle_speed + self.phase).sin() * 0.5 + 0.5;
        (1.0 - self.twinkle_depth + self.twinkle_depth * wave).clamp(0.0, 1.0)
    }
}

pub fn spawn_pool(rng: &mut fastrand::Rng, count: usize, width: f32, height: f32) -> Vec<Particle> {
    (0..count).map(|_| Particle::spawn(rng, width, height)).collect()
}
