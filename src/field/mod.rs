mod integrator;
mod links;
mod particle;
mod shapes;

pub use integrator::{IntegratorParams, StepCtx, Wobble, ramp_progress, repulsion_offset, step_particles};
pub use links::{Link, LinkConfig, plan_links};
pub use particle::{Particle, spawn_pool};
pub use shapes::{CloudCache, Point, ShapeKind, ShapeTuning, ShapeTuningPatch, TuningKey};

use crate::surface::{Surface, mix_rgb};
use std::f32::consts::TAU;

pub const BACKGROUND: [u8; 3] = [2, 6, 23];
const STAR_WHITE: [u8; 3] = [226, 232, 240];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    About,
    Projects,
    Skills,
    Contact,
}

impl Section {
    pub const fn all() -> [Self; 4] {
        [Self::About, Self::Projects, Self::Skills, Self::Contact]
    }

    /// Case-insensitive; the "none" sentinel is not a section.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "about" => Some(Self::About),
            "projects" | "work" => Some(Self::Projects),
            "skills" => Some(Self::Skills),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }

    pub fn is_none_sentinel(name: &str) -> bool {
        matches!(name.trim().to_ascii_lowercase().as_str(), "" | "none" | "home")
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Projects => "Projects",
            Self::Skills => "Skills",
            Self::Contact => "Contact",
        }
    }

    pub fn shape(self) -> ShapeKind {
        match self {
            Self::About => ShapeKind::Letters,
            Self::Projects => ShapeKind::Card,
            Self::Skills => ShapeKind::Wave,
            Self::Contact => ShapeKind::Hand,
        }
    }

    pub fn blend_rate(self) -> f32 {
        match self {
            Self::About => 0.10,
            Self::Projects => 0.12,
            Self::Skills => 0.09,
            Self::Contact => 0.08,
        }
    }

    pub fn accent(self) -> [u8; 3] {
        match self {
            Self::About => [129, 140, 248],
            Self::Projects => [94, 234, 212],
            Self::Skills => [250, 204, 21],
            Self::Contact => [244, 114, 182],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerState {
    At(Point),
    Away,
}

/// Single-slot pointer mailbox written by input handlers and drained at the
/// start of each frame. Last write wins; intermediate positions are dropped.
#[derive(Debug, Default)]
pub struct PointerMailbox {
    slot: Option<PointerState>,
}

impl PointerMailbox {
    pub fn post(&mut self, state: PointerState) {
        self.slot = Some(state);
    }

    pub fn take(&mut self) -> Option<PointerState> {
        self.slot.take()
    }
}

#[derive(Clone, Debug)]
pub struct FieldSettings {
    pub particles: usize,
    pub grid_step: f32,
    pub tuning: ShapeTuning,
    pub links: LinkConfig,
    pub integrator: IntegratorParams,
    pub seed: Option<u64>,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            particles: 700,
            grid_step: 2.0,
            tuning: ShapeTuning::default(),
            links: LinkConfig::default(),
            integrator: IntegratorParams::default(),
            seed: None,
        }
    }
}

/// Scatter burst speed range, in pixels per tick.
const BURST_MIN: f32 = 0.6;
const BURST_MAX: f32 = 1.6;

pub struct ParticleField {
    width: f32,
    height: f32,
    particles: Vec<Particle>,
    clouds: CloudCache,
    section: Option<Section>,
    form_progress: f32,
    form_target: f32,
    blend_rate: f32,
    mailbox: PointerMailbox,
    pointer: Option<Point>,
    params: IntegratorParams,
    link_cfg: LinkConfig,
    links: Vec<Link>,
    rng: fastrand::Rng,
    t: f32,
}

impl ParticleField {
    pub fn new(settings: &FieldSettings, width: f32, height: f32) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let particles = spawn_pool(&mut rng, settings.particles, width, height);
        let clouds = CloudCache::new(width, height, settings.grid_step, settings.tuning);
        log::debug!(
            "particle field: {} particles at {}x{}",
            particles.len(),
            width,
            height
        );

        let mut field = Self {
            width,
            height,
            particles,
            clouds,
            section: None,
            form_progress: 0.0,
            form_target: 0.0,
            blend_rate: Section::Projects.blend_rate(),
            mailbox: PointerMailbox::default(),
            pointer: None,
            params: settings.integrator,
            link_cfg: settings.links,
            links: Vec::with_capacity(settings.links.max_links),
            rng,
            t: 0.0,
        };
        field.assign_roam_targets();
        field
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn section(&self) -> Option<Section> {
        self.section
    }

    pub fn form_progress(&self) -> f32 {
        self.form_progress
    }

    pub fn form_target(&self) -> f32 {
        self.form_target
    }

    pub fn blend_rate(&self) -> f32 {
        self.blend_rate
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link_config(&self) -> &LinkConfig {
        &self.link_cfg
    }

    pub fn params(&self) -> &IntegratorParams {
        &self.params
    }

    pub fn tuning(&self) -> &ShapeTuning {
        self.clouds.tuning()
    }

    pub fn cloud(&self, kind: ShapeKind) -> &[Point] {
        self.clouds.cloud(kind)
    }

    /// Regenerate every cloud for the new viewport and retarget the pool.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !self.clouds.resize(width, height) {
            return;
        }
        let sx = if self.width > 0.0 { width / self.width } else { 0.0 };
        let sy = if self.height > 0.0 { height / self.height } else { 0.0 };
        for p in &mut self.particles {
            if sx > 0.0 && sy > 0.0 {
                p.x *= sx;
                p.y *= sy;
            } else {
                p.x = self.rng.f32() * width.max(0.0);
                p.y = self.rng.f32() * height.max(0.0);
            }
        }
        self.width = width;
        self.height = height;
        log::debug!("particle field resized to {}x{}", width, height);

        match self.section {
            Some(section) => self.assign_cloud_targets(section.shape()),
            None => self.assign_roam_targets(),
        }
    }

    /// Switch the active section. `None` disperses the pool outward.
    /// Returns false when `section` is already active.
    pub fn set_section(&mut self, section: Option<Section>) -> bool {
        if section == self.section {
            return false;
        }
        self.section = section;
        match section {
            Some(s) => {
                self.assign_cloud_targets(s.shape());
                self.form_target = 1.0;
                self.blend_rate = s.blend_rate();
                log::info!(
                    "section -> {} ({} cloud points)",
                    s.label(),
                    self.clouds.cloud(s.shape()).len()
                );
            }
            None => {
                self.scatter();
                self.form_target = 0.0;
                log::info!("section -> none");
            }
        }
        true
    }

    /// Unknown names are ignored and leave the current state in place.
    pub fn set_section_by_name(&mut self, name: &str) -> bool {
        if Section::is_none_sentinel(name) {
            return self.set_section(None);
        }
        match Section::parse(name) {
            Some(s) => self.set_section(Some(s)),
            None => {
                log::debug!("ignoring unknown section {name:?}");
                false
            }
        }
    }

    /// Merge tuning overrides, rebuild affected clouds, and retarget the
    /// pool when the active silhouette changed. Form progress is kept.
    pub fn set_shape_tuning(&mut self, patch: &ShapeTuningPatch) -> Vec<ShapeKind> {
        let affected = self.clouds.apply_tuning(patch);
        if affected.is_empty() {
            return affected;
        }
        log::debug!(
            "tuning rebuilt {}",
            affected.iter().map(|k| k.label()).collect::<Vec<_>>().join(",")
        );
        if let Some(section) = self.section {
            if affected.contains(&section.shape()) {
                self.assign_cloud_targets(section.shape());
            }
        }
        affected
    }

    pub fn post_pointer(&mut self, state: PointerState) {
        self.mailbox.post(state);
    }

    /// Advance one animation tick. `t` is elapsed seconds, `dt` the time
    /// since the previous tick.
    pub fn step(&mut self, t: f32, dt: f32) {
        self.t = t;
        match self.mailbox.take() {
            Some(PointerState::At(p)) => self.pointer = Some(p),
            Some(PointerState::Away) => self.pointer = None,
            None => {}
        }

        self.form_progress = ramp_progress(self.form_progress, self.form_target, &self.params, dt);

        let wobble = self
            .section
            .map(Section::shape)
            .filter(|kind| kind.breathes())
            .map(|kind| Wobble {
                pivot: self.clouds.pivot(kind),
                angle: self.params.wobble_amplitude * (t * self.params.wobble_speed).sin(),
            });

        let ctx = StepCtx {
            t,
            dt,
            width: self.width,
            height: self.height,
            pointer: self.pointer,
            form_progress: self.form_progress,
            blend_rate: self.blend_rate,
            wobble,
        };
        step_particles(&mut self.particles, &ctx, &self.params, &mut self.rng);
        plan_links(&self.particles, self.form_progress, &self.link_cfg, &mut self.links);
    }

    /// Repaint the whole surface: background, link lines, then particles.
    pub fn draw(&self, surface: &mut Surface) {
        surface.clear(BACKGROUND);

        let accent = self.section.map(Section::accent).unwrap_or(STAR_WHITE);
        for link in &self.links {
            surface.draw_line(
                link.from.x,
                link.from.y,
                link.to.x,
                link.to.y,
                accent,
                link.alpha * 0.6,
            );
        }

        let tint = self.form_progress * 0.85;
        let color = mix_rgb(STAR_WHITE, accent, tint);
        for p in &self.particles {
            let b = p.brightness(self.t);
            surface.fill_disc(p.x, p.y, p.radius, color, 0.35 + 0.65 * b);
        }
    }

    fn assign_cloud_targets(&mut self, kind: ShapeKind) {
        let cloud = self.clouds.cloud(kind);
        if cloud.is_empty() {
            let centre = Point::new(self.width * 0.5, self.height * 0.5);
            for p in &mut self.particles {
                p.retarget(centre);
            }
            return;
        }
        for (i, p) in self.particles.iter_mut().enumerate() {
            p.retarget(cloud[i % cloud.len()]);
        }
    }

    fn roam_bounds(&self) -> (f32, f32, f32, f32) {
        let pad_x = self.width * self.params.overscan;
        let pad_y = self.height * self.params.overscan;
        (-pad_x, -pad_y, self.width + pad_x, self.height + pad_y)
    }

    fn assign_roam_targets(&mut self) {
        let (x0, y0, x1, y1) = self.roam_bounds();
        for p in &mut self.particles {
            let tx = x0 + self.rng.f32() * (x1 - x0);
            let ty = y0 + self.rng.f32() * (y1 - y0);
            p.retarget(Point::new(tx, ty));
        }
    }

    fn scatter(&mut self) {
        self.assign_roam_targets();
        let centre = Point::new(self.width * 0.5, self.height * 0.5);
        for p in &mut self.particles {
            let dx = p.x - centre.x;
            let dy = p.y - centre.y;
            let len = (dx * dx + dy * dy).sqrt();
            let (ux, uy) = if len > 1e-3 {
                (dx / len, dy / len)
            } else {
                let a = self.rng.f32() * TAU;
                (a.cos(), a.sin())
            };
            let burst = BURST_MIN + self.rng.f32() * (BURST_MAX - BURST_MIN);
            p.vx = ux * burst + (self.rng.f32() - 0.5) * 0.2;
            p.vy = uy * burst + (self.rng.f32() - 0.5) * 0.2;
        }
    }
}
