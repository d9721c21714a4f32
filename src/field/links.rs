use super::particle::Particle;
use super::shapes::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkConfig {
    /// Hard per-frame budget; planning stops once it is reached.
    pub max_links: usize,
    pub distance: f32,
    pub stride: usize,
    /// How many following particles each scanned particle is tested against.
    pub window: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_links: 40,
            distance: 10.0,
            stride: 3,
            window: 12,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: Point,
    pub to: Point,
    pub alpha: f32,
}

/// Fill `out` with this frame's connection lines and return how many were
/// planned. Never more than `cfg.max_links`.
pub fn plan_links(particles: &[Particle], form_progress: f32, cfg: &LinkConfig, out: &mut Vec<Link>) -> usize {
    out.clear();
    if cfg.max_links == 0 || !(cfg.distance > 0.0) || particles.len() < 2 {
        return 0;
    }

    let boost = 0.25 + 0.55 * form_progress.clamp(0.0, 1.0);
    let n = particles.len();

    'scan: for i in (0..n).step_by(cfg.stride.max(1)) {
        let a = particles[i].position();
        let end = i.saturating_add(cfg.window).min(n - 1);
        for j in (i + 1)..=end {
            let b = particles[j].position();
            let d = a.distance(b);
            if d >= cfg.distance {
                continue;
            }
            out.push(Link {
                from: a,
                to: b,
                alpha: (1.0 - d / cfg.distance) * boost,
            });
            if out.len() >= cfg.max_links {
                break 'scan;
            }
        }
    }
    out.len()
}
