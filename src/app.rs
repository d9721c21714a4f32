use crate::config::{Config, RendererMode};
use crate::cursor::CursorFollower;
use crate::equalizer::Equalizer;
use crate::field::{
    BACKGROUND, FieldSettings, IntegratorParams, LinkConfig, ParticleField, Point, PointerState,
    Section, ShapeTuning, ShapeTuningPatch, TuningKey,
};
use crate::governor::{FrameDecision, FrameGovernor};
use crate::nav::{PAGE, PageBand, ScrollNavigator};
use crate::prefs::{AppPrefs, prefs_storage_path};
use crate::render::{BrailleRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::surface::Surface;
use crate::terminal::TerminalGuard;
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const HINT_DURATION: Duration = Duration::from_secs(8);
const SCROLL_ROWS_PER_NOTCH: f32 = 3.0;
const TUNING_STEP: f32 = 0.02;
// Bounds of the on-screen tuning controls; the field itself accepts any value.
const TUNING_MIN: f32 = 0.01;
const TUNING_MAX: f32 = 0.99;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAction {
    Continue,
    Quit,
}

/// Top-level controller. Owns every visual component and routes input to
/// them; nothing is reachable through globals.
pub struct Page {
    pub field: ParticleField,
    pub nav: ScrollNavigator,
    pub governor: FrameGovernor,
    pub cursor: CursorFollower,
    pub equalizer: Equalizer,
    pub prefs: AppPrefs,
    prefs_path: Option<PathBuf>,
    cell: (usize, usize),
    visual_rows: u16,
    show_help: bool,
    hint_until: Option<Instant>,
    started: Instant,
}

impl Page {
    pub fn new(
        settings: &FieldSettings,
        prefs: AppPrefs,
        prefs_path: Option<PathBuf>,
        cell: (usize, usize),
        term_cols: u16,
        visual_rows: u16,
        now: Instant,
    ) -> Self {
        let (w, h) = surface_size(term_cols, visual_rows, cell);
        let mut settings = settings.clone();
        settings.tuning = prefs.tuning;
        let cursor_rng = match settings.seed {
            Some(seed) => fastrand::Rng::with_seed(seed ^ 0x9E37_79B9),
            None => fastrand::Rng::new(),
        };

        Self {
            field: ParticleField::new(&settings, w as f32, h as f32),
            nav: ScrollNavigator::new(visual_rows as f32),
            governor: FrameGovernor::default(),
            cursor: CursorFollower::new(cursor_rng),
            equalizer: Equalizer::new(prefs.sound, 0.0),
            prefs,
            prefs_path,
            cell,
            visual_rows,
            show_help: false,
            hint_until: Some(now + HINT_DURATION),
            started: now,
        }
    }

    pub fn show_hud(&self) -> bool {
        self.prefs.show_hud
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn hint_visible(&self, now: Instant) -> bool {
        self.hint_until.is_some_and(|until| now < until)
    }

    /// Start on the band holding `name`; unknown names are logged and ignored.
    pub fn start_in_section(&mut self, name: &str) {
        let index = if Section::is_none_sentinel(name) {
            Some(0)
        } else {
            Section::parse(name).and_then(|s| PAGE.iter().position(|b| b.section == Some(s)))
        };
        match index {
            Some(i) => {
                if let Some(band) = self.nav.jump_to(i) {
                    self.enter_band(band);
                }
            }
            None => log::warn!("unknown start section {name:?}"),
        }
    }

    pub fn resize(&mut self, term_cols: u16, visual_rows: u16) {
        let (w, h) = surface_size(term_cols, visual_rows, self.cell);
        self.visual_rows = visual_rows;
        self.field.resize(w as f32, h as f32);
        if let Some(band) = self.nav.set_viewport(visual_rows as f32) {
            self.enter_band(band);
        }
    }

    pub fn handle_event(&mut self, ev: &Event, now: Instant) -> PageAction {
        match ev {
            Event::Key(k) if k.kind != KeyEventKind::Release => self.handle_key(k, now),
            Event::Mouse(m) => {
                match m.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        let state = self.pointer_for_cell(m.column, m.row);
                        self.field.post_pointer(state);
                        self.cursor.set_target(match state {
                            PointerState::At(p) => Some(p),
                            PointerState::Away => None,
                        });
                    }
                    MouseEventKind::ScrollDown => self.scroll(SCROLL_ROWS_PER_NOTCH, now),
                    MouseEventKind::ScrollUp => self.scroll(-SCROLL_ROWS_PER_NOTCH, now),
                    _ => {}
                }
                PageAction::Continue
            }
            Event::FocusLost => {
                self.governor.set_hidden(true);
                self.field.post_pointer(PointerState::Away);
                self.cursor.set_target(None);
                PageAction::Continue
            }
            Event::FocusGained => {
                self.governor.set_hidden(false);
                PageAction::Continue
            }
            _ => PageAction::Continue,
        }
    }

    /// One animation tick: update, then repaint the whole surface.
    pub fn tick(&mut self, t: f32, dt: f32, surface: &mut Surface) {
        self.field.step(t, dt);
        self.cursor.step(dt);
        self.field.draw(surface);
        self.cursor.draw(surface);
        self.equalizer.draw(surface, t);
    }

    fn handle_key(&mut self, k: &KeyEvent, now: Instant) -> PageAction {
        if k.modifiers.contains(KeyModifiers::CONTROL) && matches!(k.code, KeyCode::Char('c')) {
            return PageAction::Quit;
        }

        let page_rows = self.visual_rows.max(1) as f32;
        match k.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return PageAction::Quit,
            KeyCode::Down | KeyCode::Char('j') => self.scroll(SCROLL_ROWS_PER_NOTCH, now),
            KeyCode::Up | KeyCode::Char('k') => self.scroll(-SCROLL_ROWS_PER_NOTCH, now),
            KeyCode::PageDown => self.scroll(page_rows, now),
            KeyCode::PageUp => self.scroll(-page_rows, now),
            KeyCode::Home => self.jump(0),
            KeyCode::End => self.jump(PAGE.len() - 1),
            KeyCode::Char(c @ '0'..='9') => {
                if let Some(i) = c.to_digit(10) {
                    self.jump(i as usize);
                }
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.prefs.show_hud = !self.prefs.show_hud;
                self.save_prefs();
            }
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::F(1) => {
                self.show_help = !self.show_help;
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                let t = now.saturating_duration_since(self.started).as_secs_f32();
                self.prefs.sound = self.equalizer.toggle(t);
                self.save_prefs();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.apply_tuning(&ShapeTuningPatch::from_tuning(&ShapeTuning::default()));
            }
            KeyCode::Char(c) => {
                if let Some((key, delta)) = tuning_binding(c) {
                    self.nudge_tuning(key, delta);
                }
            }
            _ => {}
        }
        PageAction::Continue
    }

    fn pointer_for_cell(&self, column: u16, row: u16) -> PointerState {
        if row >= self.visual_rows {
            return PointerState::Away;
        }
        let (cw, ch) = self.cell;
        PointerState::At(Point::new(
            (column as f32 + 0.5) * cw as f32,
            (row as f32 + 0.5) * ch as f32,
        ))
    }

    fn scroll(&mut self, rows: f32, now: Instant) {
        self.governor.note_scroll(now);
        if let Some(band) = self.nav.scroll_by(rows) {
            self.hint_until = None;
            self.enter_band(band);
        }
    }

    fn jump(&mut self, index: usize) {
        if let Some(band) = self.nav.jump_to(index) {
            self.hint_until = None;
            self.enter_band(band);
        }
    }

    fn enter_band(&mut self, band: &PageBand) {
        self.field.set_section(band.section);
    }

    fn nudge_tuning(&mut self, key: TuningKey, delta: f32) {
        let current = self.field.tuning().get(key);
        let next = ((current + delta) * 100.0).round() / 100.0;
        let next = next.clamp(TUNING_MIN, TUNING_MAX);
        self.apply_tuning(&ShapeTuningPatch::single(key, next));
    }

    fn apply_tuning(&mut self, patch: &ShapeTuningPatch) {
        if self.field.set_shape_tuning(patch).is_empty() {
            return;
        }
        self.prefs.tuning = *self.field.tuning();
        self.save_prefs();
    }

    fn save_prefs(&self) {
        if let Err(err) = self.prefs.save(self.prefs_path.as_deref()) {
            log::warn!("could not save prefs: {err}");
        }
    }
}

/// Lowercase lowers a value, uppercase raises it.
fn tuning_binding(c: char) -> Option<(TuningKey, f32)> {
    let key = match c.to_ascii_lowercase() {
        's' => TuningKey::Stroke,
        'c' => TuningKey::CardCorner,
        'b' => TuningKey::CardBorder,
        'a' => TuningKey::WaveAmplitude,
        'w' => TuningKey::WaveThickness,
        'z' => TuningKey::HandScale,
        _ => return None,
    };
    let delta = if c.is_ascii_uppercase() {
        TUNING_STEP
    } else {
        -TUNING_STEP
    };
    Some((key, delta))
}

pub fn field_settings(cfg: &Config) -> FieldSettings {
    let integrator = IntegratorParams {
        repel_radius: cfg.repel_radius,
        integration: cfg.integration,
        ..IntegratorParams::default()
    };
    let links = LinkConfig {
        max_links: cfg.max_links,
        distance: cfg.link_distance,
        ..LinkConfig::default()
    };
    FieldSettings {
        particles: cfg.particles,
        grid_step: cfg.grid_step,
        tuning: ShapeTuning::default(),
        links,
        integrator,
        seed: cfg.seed,
    }
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let prefs_path = if cfg.no_prefs {
        None
    } else {
        cfg.prefs.clone().or_else(prefs_storage_path)
    };
    let prefs = match AppPrefs::load(prefs_path.as_deref()) {
        Ok(p) => p,
        Err(err) => {
            log::warn!("ignoring prefs at {:?}: {err}", prefs_path);
            AppPrefs::default()
        }
    };

    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Braille => Box::new(BrailleRenderer::new(BACKGROUND)),
    };
    let cell = renderer.cell_size();

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.1 < 2 || last_size.0 < 4 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }

    let start = Instant::now();
    let mut hud_rows = hud_rows_for_size(last_size, prefs.show_hud);
    let mut visual_rows = last_size.1.saturating_sub(hud_rows).max(1);
    let (w, h) = surface_size(last_size.0, visual_rows, cell);
    let mut surface = Surface::new(w, h);

    let settings = field_settings(&cfg);
    let mut page = Page::new(&settings, prefs, prefs_path, cell, last_size.0, visual_rows, start);
    if let Some(name) = cfg.section.as_deref() {
        page.start_in_section(name);
    }
    log::info!(
        "started: {} particles, renderer={}, integration={}",
        cfg.particles,
        renderer.name(),
        cfg.integration.label()
    );

    let mut fps = FpsCounter::new();
    let mut last_tick = start;
    let frame_budget = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);

    loop {
        let now = Instant::now();

        // Drain input events (non-blocking).
        while event::poll(Duration::from_millis(0))? {
            let ev = event::read()?;
            if let Event::Resize(c, r) = ev {
                last_size = (c, r);
                continue;
            }
            if page.handle_event(&ev, now) == PageAction::Quit {
                return Ok(());
            }
        }

        // Size check once per frame (resize events can be missed in some terminals).
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
        }
        let want_hud = hud_rows_for_size(last_size, page.show_hud());
        let want_visual = last_size.1.saturating_sub(want_hud).max(1);
        let (want_w, want_h) = surface_size(last_size.0, want_visual, cell);
        if want_hud != hud_rows || (want_w, want_h) != (surface.width(), surface.height()) {
            hud_rows = want_hud;
            visual_rows = want_visual;
            surface.resize(want_w, want_h);
            page.resize(last_size.0, visual_rows);
        }

        if page.governor.decide(now) == FrameDecision::Skip {
            pace(now, frame_budget);
            continue;
        }

        let t = now.duration_since(start).as_secs_f32();
        let dt = now.duration_since(last_tick).as_secs_f32();
        last_tick = now;
        page.tick(t, dt, &mut surface);

        let hud = if page.show_hud() {
            build_hud(last_size.0 as usize, &page, fps.fps(), renderer.name(), cfg.integration.label(), now)
        } else {
            String::new()
        };
        let overlay = page.show_help().then(help_popup_text);

        let frame = Frame {
            term_cols: last_size.0,
            term_rows: last_size.1,
            visual_rows,
            pixel_width: surface.width(),
            pixel_height: surface.height(),
            pixels_rgba: surface.pixels(),
            hud: &hud,
            hud_rows,
            overlay,
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;

        fps.tick();
        pace(now, frame_budget);
    }
}

fn pace(frame_start: Instant, budget: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < budget {
        std::thread::sleep(budget - elapsed);
    }
}

pub fn surface_size(term_cols: u16, visual_rows: u16, cell: (usize, usize)) -> (usize, usize) {
    (
        (term_cols as usize).saturating_mul(cell.0),
        (visual_rows as usize).saturating_mul(cell.1),
    )
}

fn hud_rows_for_size(size: (u16, u16), show_hud: bool) -> u16 {
    if !show_hud {
        return 0;
    }
    let rows = size.1;
    if rows <= 1 {
        return 0;
    }
    (rows - 1).min(3)
}

pub fn build_hud(
    cols: usize,
    page: &Page,
    fps: f32,
    renderer_name: &str,
    integration: &str,
    now: Instant,
) -> String {
    let field = &page.field;
    let t = field.tuning();
    let mut logical_lines = vec![
        format!(
            "Section: {} | Form: {:>4.2} | Scroll: {:>3.0}% | Particles: {} | Links: {}/{} | FPS: {:>4.1} | Rate: {}",
            page.nav.active_band().label,
            field.form_progress(),
            page.nav.progress() * 100.0,
            field.particles().len(),
            field.links().len(),
            field.link_config().max_links,
            fps,
            page.governor.label(now),
        ),
        format!(
            "Tuning: stroke {:.2} corner {:.2} border {:.2} amp {:.2} thick {:.2} hand {:.2} | Sound: {} | Integration: {} | Renderer: {}",
            t.stroke,
            t.card_corner,
            t.card_border,
            t.wave_amplitude,
            t.wave_thickness,
            t.hand_scale,
            if page.equalizer.enabled() { "on" } else { "off" },
            integration,
            renderer_name,
        ),
    ];
    if page.hint_visible(now) {
        logical_lines.push("Scroll or press 0-4 to move between sections | ? help | q quit".to_string());
    }

    wrap_hud_lines(cols, &logical_lines).join("\n")
}

fn wrap_hud_lines(cols: usize, lines: &[String]) -> Vec<String> {
    let width = cols.max(1);
    let mut out = Vec::new();
    for line in lines {
        out.extend(hard_wrap_line(line, width));
    }
    out
}

fn hard_wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

fn help_popup_text() -> &'static str {
    "Particle Field Hotkeys\n\
wheel / up/down / j/k  scroll the page\n\
pgup / pgdn  scroll one screen\n\
0-4  jump: home/about/projects/skills/contact\n\
home / end  top / bottom of the page\n\
s/S  letter stroke -/+\n\
c/C  card corner -/+\n\
b/B  card border -/+\n\
a/A  wave amplitude -/+\n\
w/W  wave thickness -/+\n\
z/Z  hand size -/+\n\
r  reset shape tuning\n\
m  sound visualizer on/off\n\
i  show/hide HUD\n\
? or h or F1  toggle this help\n\
q or esc  quit"
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = (self.frames as f32) / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuning_keys_follow_case() {
        assert_eq!(tuning_binding('a'), Some((TuningKey::WaveAmplitude, -TUNING_STEP)));
        assert_eq!(tuning_binding('Z'), Some((TuningKey::HandScale, TUNING_STEP)));
        assert_eq!(tuning_binding('x'), None);
    }

    #[test]
    fn hud_wraps_to_width() {
        let lines = hard_wrap_line("abcdefgh", 3);
        assert_eq!(lines, vec!["abc", "def", "gh"]);
    }
}
