use particle_field::field::{BACKGROUND, FieldSettings, ParticleField, Section};
use particle_field::render::{BrailleRenderer, Frame, HalfBlockRenderer, Renderer};
use particle_field::surface::Surface;

/// Build a solid-color RGBA pixel buffer.
fn solid_pixels(w: usize, h: usize, rgb: [u8; 3]) -> Vec<u8> {
    let mut buf = vec![0u8; w * h * 4];
    for px in buf.chunks_exact_mut(4) {
        px[0] = rgb[0];
        px[1] = rgb[1];
        px[2] = rgb[2];
        px[3] = 255;
    }
    buf
}

fn make_frame<'a>(
    cols: u16,
    visual_rows: u16,
    pw: usize,
    ph: usize,
    pixels: &'a [u8],
    sync: bool,
) -> Frame<'a> {
    Frame {
        term_cols: cols,
        term_rows: visual_rows + 2,
        visual_rows,
        pixel_width: pw,
        pixel_height: ph,
        pixels_rgba: pixels,
        hud: "Section: About | Form: 0.42",
        hud_rows: 1,
        overlay: None,
        sync_updates: sync,
    }
}

fn render_to_string(r: &mut dyn Renderer, frame: &Frame<'_>) -> String {
    let mut out = Vec::new();
    r.render(frame, &mut out).expect("render");
    String::from_utf8(out).expect("utf8")
}

// ── Half-block renderer ─────────────────────────────────────────────────────

#[test]
fn halfblock_renders_solid_frame() {
    let mut r = HalfBlockRenderer::new();
    let (cols, rows) = (8u16, 4u16);
    let px = solid_pixels(8, 8, [200, 10, 30]);
    let s = render_to_string(&mut r, &make_frame(cols, rows, 8, 8, &px, false));
    assert_eq!(s.matches('\u{2580}').count(), 32);
    assert!(s.contains("\x1b[38;2;200;10;30m"));
    // Same colour everywhere: one fg and one bg escape.
    assert_eq!(s.matches("\x1b[38;2;200;10;30m").count(), 1);
    // HUD text is clipped to the terminal width.
    assert!(s.contains("Section:"));
    assert!(!s.contains("Section: About"));
}

#[test]
fn halfblock_wraps_sync_updates() {
    let mut r = HalfBlockRenderer::new();
    let px = solid_pixels(4, 4, BACKGROUND);
    let s = render_to_string(&mut r, &make_frame(4, 2, 4, 4, &px, true));
    assert!(s.starts_with("\x1b[?2026h"));
    assert!(s.contains("\x1b[?2026l"));
    assert!(s.contains("\x1b[?7h"));
}

#[test]
fn halfblock_skips_mismatched_buffers() {
    let mut r = HalfBlockRenderer::new();
    let px = solid_pixels(8, 8, [1, 2, 3]);
    // Claims 10 columns over an 8-pixel-wide buffer.
    let s = render_to_string(&mut r, &make_frame(10, 4, 8, 8, &px, false));
    assert!(s.is_empty());
    // Buffer shorter than advertised.
    let short = vec![0u8; 16];
    let s = render_to_string(&mut r, &make_frame(8, 4, 8, 8, &short, false));
    assert!(s.is_empty());
}

// ── Braille renderer ────────────────────────────────────────────────────────

#[test]
fn braille_background_is_blank() {
    let mut r = BrailleRenderer::new(BACKGROUND);
    let px = solid_pixels(8, 8, BACKGROUND);
    let s = render_to_string(&mut r, &make_frame(4, 2, 8, 8, &px, false));
    assert!(!s.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
}

#[test]
fn braille_lights_bright_dots() {
    let mut r = BrailleRenderer::new(BACKGROUND);
    let mut px = solid_pixels(2, 4, BACKGROUND);
    // Top-left dot only.
    px[0..3].copy_from_slice(&[240, 240, 240]);
    let s = render_to_string(&mut r, &make_frame(1, 1, 2, 4, &px, false));
    assert!(s.contains('\u{2801}'));
    assert!(s.contains("\x1b[38;2;240;240;240m"));
}

#[test]
fn braille_skips_mismatched_buffers() {
    let mut r = BrailleRenderer::new(BACKGROUND);
    let px = solid_pixels(8, 8, [9, 9, 9]);
    let s = render_to_string(&mut r, &make_frame(8, 4, 8, 8, &px, false));
    assert!(s.is_empty());
}

// ── Overlay and end-to-end ──────────────────────────────────────────────────

#[test]
fn overlay_box_is_drawn_over_the_frame() {
    let mut r = HalfBlockRenderer::new();
    let px = solid_pixels(20, 16, BACKGROUND);
    let mut frame = make_frame(20, 8, 20, 16, &px, false);
    frame.term_rows = 10;
    frame.overlay = Some("Help\nq quit");
    let s = render_to_string(&mut r, &frame);
    assert!(s.contains("q quit"));
    assert!(s.contains("+--"));
}

#[test]
fn formed_field_renders_through_both_renderers() {
    let mut renderers: Vec<Box<dyn Renderer>> = vec![
        Box::new(HalfBlockRenderer::new()),
        Box::new(BrailleRenderer::new(BACKGROUND)),
    ];
    for r in renderers.iter_mut() {
        let (cw, ch) = r.cell_size();
        let (cols, rows) = (60usize, 20usize);
        let (w, h) = (cols * cw, rows * ch);
        let settings = FieldSettings {
            particles: 400,
            seed: Some(42),
            ..FieldSettings::default()
        };
        let mut field = ParticleField::new(&settings, w as f32, h as f32);
        field.set_section(Some(Section::About));
        for f in 0..90 {
            field.step(f as f32 / 60.0, 1.0 / 60.0);
        }
        let mut surface = Surface::new(w, h);
        field.draw(&mut surface);

        let frame = Frame {
            term_cols: cols as u16,
            term_rows: rows as u16,
            visual_rows: rows as u16,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: surface.pixels(),
            hud: "",
            hud_rows: 0,
            overlay: None,
            sync_updates: false,
        };
        let s = render_to_string(r.as_mut(), &frame);
        assert!(!s.is_empty(), "{} wrote nothing", r.name());
        assert_eq!(s.matches("\r\n").count(), rows, "{}", r.name());
    }
}
