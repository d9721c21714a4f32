use super::particle::Particle;
use super::shapes::Point;
use crate::config::Integration;

const NOMINAL_HZ: f32 = 60.0;
const MAX_DT: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegratorParams {
    pub repel_radius: f32,
    /// Push applied at zero distance from the pointer.
    pub repel_strength: f32,
    pub form_in_rate: f32,
    pub form_out_rate: f32,
    /// Free-roam bounds extend this fraction of the viewport past each edge.
    pub overscan: f32,
    pub cruise_speed: f32,
    pub drag: f32,
    pub jitter: f32,
    pub wobble_amplitude: f32,
    pub wobble_speed: f32,
    /// Below this form progress particles bounce off the overscan bounds.
    pub roam_threshold: f32,
    pub integration: Integration,
}

impl Default for IntegratorParams {
    fn default() -> Self {
        Self {
            repel_radius: 14.0,
            repel_strength: 5.0,
            form_in_rate: 0.06,
            form_out_rate: 0.025,
            overscan: 0.12,
            cruise_speed: 0.45,
            drag: 0.96,
            jitter: 0.04,
            wobble_amplitude: 0.06,
            wobble_speed: 1.3,
            roam_threshold: 0.05,
            integration: Integration::PerFrame,
        }
    }
}

impl IntegratorParams {
    /// Number of nominal ticks this frame stands for.
    pub fn ticks(&self, dt: f32) -> f32 {
        match self.integration {
            Integration::PerFrame => 1.0,
            Integration::TimeScaled => dt.clamp(0.0, MAX_DT) * NOMINAL_HZ,
        }
    }

    /// A per-tick lerp rate applied over `ticks` ticks.
    pub fn rate(&self, per_tick: f32, ticks: f32) -> f32 {
        let r = per_tick.clamp(0.0, 1.0);
        match self.integration {
            Integration::PerFrame => r,
            Integration::TimeScaled => 1.0 - (1.0 - r).powf(ticks),
        }
    }
}

/// Rotation applied to base targets of breathing shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wobble {
    pub pivot: Point,
    pub angle: f32,
}

pub struct StepCtx {
    pub t: f32,
    pub dt: f32,
    pub width: f32,
    pub height: f32,
    pub pointer: Option<Point>,
    pub form_progress: f32,
    pub blend_rate: f32,
    pub wobble: Option<Wobble>,
}

/// Instantaneous displacement for a particle offset `(dx, dy)` from the
/// pointer. Zero outside `radius`, falling linearly to zero at the edge.
pub fn repulsion_offset(dx: f32, dy: f32, radius: f32, strength: f32) -> (f32, f32) {
    if !(radius > 0.0) {
        return (0.0, 0.0);
    }
    let dist = (dx * dx + dy * dy).sqrt();
    if dist >= radius {
        return (0.0, 0.0);
    }
    let push = (1.0 - dist / radius) * strength;
    if dist <= f32::EPSILON {
        return (push, 0.0);
    }
    (dx / dist * push, dy / dist * push)
}

/// Move form progress toward `target`. Forming uses the faster rate.
pub fn ramp_progress(progress: f32, target: f32, params: &IntegratorParams, dt: f32) -> f32 {
    let per_tick = if target > progress {
        params.form_in_rate
    } else {
        params.form_out_rate
    };
    let rate = params.rate(per_tick, params.ticks(dt));
    let next = progress + (target - progress) * rate;
    if (target - next).abs() < 1e-4 {
        return target;
    }
    next.clamp(0.0, 1.0)
}

pub fn step_particles(
    particles: &mut [Particle],
    ctx: &StepCtx,
    params: &IntegratorParams,
    rng: &mut fastrand::Rng,
) {
    let ticks = params.ticks(ctx.dt);
    let form = ctx.form_progress.clamp(0.0, 1.0);
    let roam = 1.0 - form;
    let blend = params.rate(ctx.blend_rate, ticks);
    let drag = params.drag.powf(ticks);
    let roaming = form < params.roam_threshold;

    let pad_x = ctx.width * params.overscan;
    let pad_y = ctx.height * params.overscan;
    let (min_x, max_x) = (-pad_x, ctx.width + pad_x);
    let (min_y, max_y) = (-pad_y, ctx.height + pad_y);

    for p in particles.iter_mut() {
        if let Some(ptr) = ctx.pointer {
            let (ox, oy) = repulsion_offset(
                p.x - ptr.x,
                p.y - ptr.y,
                params.repel_radius,
                params.repel_strength,
            );
            p.x += ox * ticks;
            p.y += oy * ticks;
        }

        let target = match ctx.wobble {
            Some(w) => p.base_target().rotated_about(w.pivot, w.angle),
            None => p.base_target(),
        };
        p.tx = target.x;
        p.ty = target.y;

        p.vx += (rng.f32() * 2.0 - 1.0) * params.jitter * ticks;
        p.vy += (rng.f32() * 2.0 - 1.0) * params.jitter * ticks;
        let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
        if speed > params.cruise_speed {
            p.vx *= drag;
            p.vy *= drag;
        }

        let pull = form * p.delay * blend;
        p.x += (p.tx - p.x) * pull + p.vx * roam * ticks;
        p.y += (p.ty - p.y) * pull + p.vy * roam * ticks;

        if roaming {
            if (p.x < min_x && p.vx < 0.0) || (p.x > max_x && p.vx > 0.0) {
                p.vx = -p.vx;
            }
            if (p.y < min_y && p.vy < 0.0) || (p.y > max_y && p.vy > 0.0) {
                p.vy = -p.vy;
            }
        }
    }
}
