use std::f32::consts::PI;

/// A point in surface pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotate around `pivot` by `angle` radians.
    pub fn rotated_about(self, pivot: Point, angle: f32) -> Point {
        let s = angle.sin();
        let c = angle.cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Point::new(pivot.x + c * dx - s * dy, pivot.y + s * dx + c * dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Card,
    Letters,
    Wave,
    Hand,
}

impl ShapeKind {
    pub const fn all() -> [Self; 4] {
        [Self::Card, Self::Letters, Self::Wave, Self::Hand]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::Letters => "Letters",
            Self::Wave => "Wave",
            Self::Hand => "Hand",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Card => 0,
            Self::Letters => 1,
            Self::Wave => 2,
            Self::Hand => 3,
        }
    }

    /// Shapes that oscillate around a pivot instead of holding still.
    pub fn breathes(self) -> bool {
        matches!(self, Self::Hand)
    }

    pub fn generate(self, width: f32, height: f32, tuning: &ShapeTuning, step: f32) -> Vec<Point> {
        match self {
            Self::Card => card_cloud(width, height, tuning, step),
            Self::Letters => letters_cloud(width, height, tuning, step),
            Self::Wave => wave_cloud(width, height, tuning, step),
            Self::Hand => hand_cloud(width, height, tuning, step),
        }
    }

    /// Rotation pivot for breathing shapes; the viewport centre otherwise.
    pub fn pivot(self, width: f32, height: f32, tuning: &ShapeTuning) -> Point {
        match self {
            Self::Hand => HandLayout::new(width, height, tuning.hand_scale).wrist,
            _ => Point::new(width * 0.5, height * 0.5),
        }
    }

    fn reads(self, key: TuningKey) -> bool {
        matches!(
            (self, key),
            (Self::Card, TuningKey::CardCorner)
                | (Self::Card, TuningKey::CardBorder)
                | (Self::Letters, TuningKey::Stroke)
                | (Self::Wave, TuningKey::WaveAmplitude)
                | (Self::Wave, TuningKey::WaveThickness)
                | (Self::Hand, TuningKey::HandScale)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TuningKey {
    Stroke,
    CardCorner,
    CardBorder,
    WaveAmplitude,
    WaveThickness,
    HandScale,
}

impl TuningKey {
    pub const fn all() -> [Self; 6] {
        [
            Self::Stroke,
            Self::CardCorner,
            Self::CardBorder,
            Self::WaveAmplitude,
            Self::WaveThickness,
            Self::HandScale,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stroke" => Some(Self::Stroke),
            "card_corner" => Some(Self::CardCorner),
            "card_border" => Some(Self::CardBorder),
            "wave_amplitude" => Some(Self::WaveAmplitude),
            "wave_thickness" => Some(Self::WaveThickness),
            "hand_scale" => Some(Self::HandScale),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stroke => "stroke",
            Self::CardCorner => "card_corner",
            Self::CardBorder => "card_border",
            Self::WaveAmplitude => "wave_amplitude",
            Self::WaveThickness => "wave_thickness",
            Self::HandScale => "hand_scale",
        }
    }
}

/// Live-adjustable geometry ratios. Values are taken as given; generators
/// stay bounded for any input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeTuning {
    pub stroke: f32,
    pub card_corner: f32,
    pub card_border: f32,
    pub wave_amplitude: f32,
    pub wave_thickness: f32,
    pub hand_scale: f32,
}

impl Default for ShapeTuning {
    fn default() -> Self {
        Self {
            stroke: 0.62,
            card_corner: 0.14,
            card_border: 0.08,
            wave_amplitude: 0.18,
            wave_thickness: 0.07,
            hand_scale: 0.72,
        }
    }
}

impl ShapeTuning {
    pub fn get(&self, key: TuningKey) -> f32 {
        match key {
            TuningKey::Stroke => self.stroke,
            TuningKey::CardCorner => self.card_corner,
            TuningKey::CardBorder => self.card_border,
            TuningKey::WaveAmplitude => self.wave_amplitude,
            TuningKey::WaveThickness => self.wave_thickness,
            TuningKey::HandScale => self.hand_scale,
        }
    }

    pub fn set(&mut self, key: TuningKey, value: f32) {
        match key {
            TuningKey::Stroke => self.stroke = value,
            TuningKey::CardCorner => self.card_corner = value,
            TuningKey::CardBorder => self.card_border = value,
            TuningKey::WaveAmplitude => self.wave_amplitude = value,
            TuningKey::WaveThickness => self.wave_thickness = value,
            TuningKey::HandScale => self.hand_scale = value,
        }
    }

    /// Apply the fields present in `patch` and return the shapes whose
    /// inputs actually changed.
    pub fn merge(&mut self, patch: &ShapeTuningPatch) -> Vec<ShapeKind> {
        let mut changed = Vec::new();
        for key in TuningKey::all() {
            let Some(value) = patch.get(key) else {
                continue;
            };
            if self.get(key).to_bits() == value.to_bits() {
                continue;
            }
            self.set(key, value);
            changed.push(key);
        }

        ShapeKind::all()
            .into_iter()
            .filter(|kind| changed.iter().any(|&key| kind.reads(key)))
            .collect()
    }
}

/// Partial tuning override; `None` fields keep their current value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShapeTuningPatch {
    pub stroke: Option<f32>,
    pub card_corner: Option<f32>,
    pub card_border: Option<f32>,
    pub wave_amplitude: Option<f32>,
    pub wave_thickness: Option<f32>,
    pub hand_scale: Option<f32>,
}

impl ShapeTuningPatch {
    pub fn single(key: TuningKey, value: f32) -> Self {
        let mut patch = Self::default();
        patch.set(key, value);
        patch
    }

    pub fn get(&self, key: TuningKey) -> Option<f32> {
        match key {
            TuningKey::Stroke => self.stroke,
            TuningKey::CardCorner => self.card_corner,
            TuningKey::CardBorder => self.card_border,
            TuningKey::WaveAmplitude => self.wave_amplitude,
            TuningKey::WaveThickness => self.wave_thickness,
            TuningKey::HandScale => self.hand_scale,
        }
    }

    pub fn set(&mut self, key: TuningKey, value: f32) {
        let slot = match key {
            TuningKey::Stroke => &mut self.stroke,
            TuningKey::CardCorner => &mut self.card_corner,
            TuningKey::CardBorder => &mut self.card_border,
            TuningKey::WaveAmplitude => &mut self.wave_amplitude,
            TuningKey::WaveThickness => &mut self.wave_thickness,
            TuningKey::HandScale => &mut self.hand_scale,
        };
        *slot = Some(value);
    }

    pub fn from_tuning(t: &ShapeTuning) -> Self {
        let mut patch = Self::default();
        for key in TuningKey::all() {
            patch.set(key, t.get(key));
        }
        patch
    }
}

/// Point clouds for every shape at the current viewport and tuning.
pub struct CloudCache {
    width: f32,
    height: f32,
    step: f32,
    tuning: ShapeTuning,
    clouds: [Vec<Point>; 4],
}

impl CloudCache {
    pub fn new(width: f32, height: f32, step: f32, tuning: ShapeTuning) -> Self {
        let mut cache = Self {
            width,
            height,
            step,
            tuning,
            clouds: Default::default(),
        };
        cache.regenerate_all();
        cache
    }

    /// Returns false when the size is unchanged and nothing was rebuilt.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.regenerate_all();
        true
    }

    pub fn apply_tuning(&mut self, patch: &ShapeTuningPatch) -> Vec<ShapeKind> {
        let affected = self.tuning.merge(patch);
        for &kind in &affected {
            self.regenerate(kind);
        }
        affected
    }

    pub fn cloud(&self, kind: ShapeKind) -> &[Point] {
        &self.clouds[kind.index()]
    }

    pub fn pivot(&self, kind: ShapeKind) -> Point {
        kind.pivot(self.width, self.height, &self.tuning)
    }

    pub fn tuning(&self) -> &ShapeTuning {
        &self.tuning
    }

    fn regenerate_all(&mut self) {
        for kind in ShapeKind::all() {
            self.regenerate(kind);
        }
    }

    fn regenerate(&mut self, kind: ShapeKind) {
        self.clouds[kind.index()] = kind.generate(self.width, self.height, &self.tuning, self.step);
    }
}

// Sampling is bounded by the viewport grid, so every generator terminates
// regardless of the tuning values it receives.
fn sample_grid(width: f32, height: f32, step: f32, mut keep: impl FnMut(f32, f32) -> bool) -> Vec<Point> {
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Vec::new();
    }
    let step = if step.is_finite() { step.max(0.5) } else { 2.0 };
    let cols = (width / step).floor() as usize;
    let rows = (height / step).floor() as usize;

    let mut out = Vec::new();
    for j in 0..rows {
        let y = (j as f32 + 0.5) * step;
        for i in 0..cols {
            let x = (i as f32 + 0.5) * step;
            if keep(x, y) {
                out.push(Point::new(x, y));
            }
        }
    }
    out
}

#[derive(Clone, Copy, Debug)]
struct RoundRect {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    radius: f32,
}

impl RoundRect {
    fn new(x0: f32, y0: f32, x1: f32, y1: f32, radius: f32) -> Self {
        Self { x0, y0, x1, y1, radius }
    }

    fn inset(&self, by: f32) -> Self {
        Self {
            x0: self.x0 + by,
            y0: self.y0 + by,
            x1: self.x1 - by,
            y1: self.y1 - by,
            radius: (self.radius - by).max(0.0),
        }
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        if !(x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1) {
            return false;
        }
        let half = 0.5 * (self.x1 - self.x0).min(self.y1 - self.y0);
        let r = if self.radius > 0.0 { self.radius.min(half) } else { 0.0 };
        if r <= 0.0 {
            return true;
        }
        // Corner-distance test against the nearest point of the inner rect.
        let cx = x.max(self.x0 + r).min(self.x1 - r);
        let cy = y.max(self.y0 + r).min(self.y1 - r);
        let dx = x - cx;
        let dy = y - cy;
        dx * dx + dy * dy <= r * r
    }
}

fn card_cloud(width: f32, height: f32, tuning: &ShapeTuning, step: f32) -> Vec<Point> {
    let cw = width * 0.56;
    let ch = height * 0.62;
    let x0 = (width - cw) * 0.5;
    let y0 = (height - ch) * 0.5;
    let short = cw.min(ch);
    let border = tuning.card_border * short;
    let outer = RoundRect::new(x0, y0, x0 + cw, y0 + ch, tuning.card_corner * short);
    let inner = outer.inset(border);

    let bar_half = (border * 0.6).max(step * 0.5);
    let bars = [(0.34f32, 0.80f32), (0.50, 0.70), (0.66, 0.52)];

    sample_grid(width, height, step, |x, y| {
        if !outer.contains(x, y) {
            return false;
        }
        if !inner.contains(x, y) {
            return true;
        }
        bars.iter().any(|&(rel_y, rel_end)| {
            let by = y0 + ch * rel_y;
            (y - by).abs() <= bar_half && x >= x0 + cw * 0.18 && x <= x0 + cw * rel_end
        })
    })
}

const WORD: &str = "HELLO";
const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;

fn glyph(ch: char) -> Option<[u8; GLYPH_H]> {
    match ch {
        'H' => Some([0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'E' => Some([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'L' => Some([0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'O' => Some([0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        _ => None,
    }
}

fn letters_cloud(width: f32, height: f32, tuning: &ShapeTuning, step: f32) -> Vec<Point> {
    let glyphs: Vec<[u8; GLYPH_H]> = WORD.chars().filter_map(glyph).collect();
    if glyphs.is_empty() {
        return Vec::new();
    }
    // One blank column between letters.
    let total_cols = glyphs.len() * (GLYPH_W + 1) - 1;
    let cell = (width * 0.82 / total_cols as f32).min(height * 0.5 / GLYPH_H as f32);
    if !(cell > 0.0) {
        return Vec::new();
    }
    let ox = (width - cell * total_cols as f32) * 0.5;
    let oy = (height - cell * GLYPH_H as f32) * 0.5;
    let half_stroke = tuning.stroke * 0.5;

    sample_grid(width, height, step, |x, y| {
        let gx = (x - ox) / cell;
        let gy = (y - oy) / cell;
        if !(gx >= 0.0 && gy >= 0.0) {
            return false;
        }
        let col = gx.floor() as usize;
        let row = gy.floor() as usize;
        if col >= total_cols || row >= GLYPH_H {
            return false;
        }
        let letter = col / (GLYPH_W + 1);
        let glyph_col = col % (GLYPH_W + 1);
        if glyph_col == GLYPH_W {
            return false;
        }
        let bits = glyphs[letter][row];
        if bits & (1 << (GLYPH_W - 1 - glyph_col)) == 0 {
            return false;
        }
        let fx = gx - col as f32 - 0.5;
        let fy = gy - row as f32 - 0.5;
        fx.abs() <= half_stroke && fy.abs() <= half_stroke
    })
}

const WAVE_CYCLES: f32 = 1.5;

fn wave_cloud(width: f32, height: f32, tuning: &ShapeTuning, step: f32) -> Vec<Point> {
    let x0 = width * 0.08;
    let x1 = width * 0.92;
    let span = x1 - x0;
    if !(span > 0.0) {
        return Vec::new();
    }
    let amp = tuning.wave_amplitude * height;
    let half = tuning.wave_thickness * height * 0.5;
    let k = 2.0 * PI * WAVE_CYCLES / span;
    let cy = height * 0.5;

    sample_grid(width, height, step, |x, y| {
        if x < x0 || x > x1 {
            return false;
        }
        let phase = k * (x - x0);
        let curve_y = cy + amp * phase.sin();
        let slope = amp * k * phase.cos();
        // Vertical gap projected onto the curve normal.
        let dist = (y - curve_y).abs() / (1.0 + slope * slope).sqrt();
        dist <= half
    })
}

struct HandLayout {
    wrist: Point,
    parts: [RoundRect; 6],
}

impl HandLayout {
    fn new(width: f32, height: f32, scale: f32) -> Self {
        let s = scale * height;
        let cx = width * 0.5;
        let wrist_y = height * 0.5 + s * 0.45;
        let palm_top = wrist_y - s * 0.45;
        let palm_l = cx - s * 0.25;
        let palm_r = cx + s * 0.25;

        let finger_w = s * 0.1;
        let gap = (palm_r - palm_l - finger_w * 4.0) / 3.0;
        let lengths = [0.38f32, 0.45, 0.42, 0.32];
        let finger = |i: usize| {
            let fx0 = palm_l + i as f32 * (finger_w + gap);
            RoundRect::new(
                fx0,
                palm_top - lengths[i] * s,
                fx0 + finger_w,
                palm_top + s * 0.05,
                finger_w * 0.5,
            )
        };

        Self {
            wrist: Point::new(cx, wrist_y),
            parts: [
                RoundRect::new(palm_l, palm_top, palm_r, wrist_y, s * 0.08),
                finger(0),
                finger(1),
                finger(2),
                finger(3),
                RoundRect::new(
                    palm_l - s * 0.22,
                    wrist_y - s * 0.30,
                    palm_l + s * 0.05,
                    wrist_y - s * 0.19,
                    s * 0.055,
                ),
            ],
        }
    }
}

fn hand_cloud(width: f32, height: f32, tuning: &ShapeTuning, step: f32) -> Vec<Point> {
    let layout = HandLayout::new(width, height, tuning.hand_scale);
    sample_grid(width, height, step, |x, y| layout.parts.iter().any(|p| p.contains(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_rect_cuts_corners() {
        let r = RoundRect::new(0.0, 0.0, 10.0, 10.0, 4.0);
        assert!(r.contains(5.0, 5.0));
        assert!(r.contains(0.0, 5.0));
        assert!(!r.contains(0.3, 0.3));
        assert!(!r.contains(11.0, 5.0));
    }

    #[test]
    fn round_rect_tolerates_degenerate_input() {
        let flipped = RoundRect::new(10.0, 10.0, 0.0, 0.0, 2.0);
        assert!(!flipped.contains(5.0, 5.0));
        let nan_radius = RoundRect::new(0.0, 0.0, 4.0, 4.0, f32::NAN);
        assert!(nan_radius.contains(0.1, 0.1));
    }

    #[test]
    fn glyphs_cover_the_word() {
        assert!(WORD.chars().all(|c| glyph(c).is_some()));
    }
}
