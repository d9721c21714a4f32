use clap::Parser;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind,
};
use particle_field::app::{Page, PageAction, build_hud, field_settings};
use particle_field::config::{Config, Integration, RendererMode};
use particle_field::cursor::CursorFollower;
use particle_field::equalizer::{BAR_COUNT, Equalizer, bar_levels};
use particle_field::field::{BACKGROUND, Point, Section, ShapeTuning};
use particle_field::prefs::{AppPrefs, PrefsError};
use particle_field::surface::Surface;
use std::time::Instant;

// ── Prefs ───────────────────────────────────────────────────────────────────

#[test]
fn prefs_parse_reads_known_keys() {
    let text = r#"
        # particle_field prefs v1
        stroke = 0.5
        wave_amplitude=0.3
        sound=on
        show_hud=false
        future_key=whatever
    "#;
    let prefs = AppPrefs::parse(text).expect("prefs parse should succeed");
    assert_eq!(prefs.tuning.stroke, 0.5);
    assert_eq!(prefs.tuning.wave_amplitude, 0.3);
    assert_eq!(prefs.tuning.hand_scale, ShapeTuning::default().hand_scale);
    assert!(prefs.sound);
    assert!(!prefs.show_hud);
}

#[test]
fn prefs_parse_reports_line_numbers() {
    let err = AppPrefs::parse("sound=true\nthis line has no equals\n").expect_err("should fail");
    assert!(matches!(err, PrefsError::Parse { line: 2, .. }));

    let err = AppPrefs::parse("\n\ncard_corner=round\n").expect_err("should fail");
    assert!(matches!(err, PrefsError::Parse { line: 3, .. }));
    assert!(err.to_string().contains("card_corner"));

    let err = AppPrefs::parse("show_hud=maybe").expect_err("should fail");
    assert!(matches!(err, PrefsError::Parse { line: 1, .. }));
}

#[test]
fn prefs_save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("prefs.txt");

    let mut prefs = AppPrefs::default();
    prefs.tuning.card_border = 0.12;
    prefs.sound = true;
    prefs.save(Some(&path)).expect("save");

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
    let loaded = AppPrefs::load(Some(&path)).expect("load");
    assert_eq!(loaded, prefs);
}

#[test]
fn prefs_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let loaded = AppPrefs::load(Some(&dir.path().join("absent.txt"))).expect("load");
    assert_eq!(loaded, AppPrefs::default());
    assert_eq!(AppPrefs::load(None).expect("load"), AppPrefs::default());
}

// ── CLI ─────────────────────────────────────────────────────────────────────

#[test]
fn cli_defaults_match_the_field_defaults() {
    let cfg = Config::try_parse_from(["particle-field"]).expect("parse");
    assert_eq!(cfg.particles, 700);
    assert_eq!(cfg.renderer, RendererMode::HalfBlock);
    assert_eq!(cfg.integration, Integration::PerFrame);
    assert!(cfg.sync_updates);

    let settings = field_settings(&cfg);
    assert_eq!(settings.links.max_links, 40);
    assert_eq!(settings.links.distance, 10.0);
    assert_eq!(settings.integrator.repel_radius, 14.0);
    assert_eq!(settings.grid_step, 2.0);
}

#[test]
fn cli_accepts_renderer_and_integration_names() {
    let cfg = Config::try_parse_from([
        "particle-field",
        "--renderer",
        "braille",
        "--integration",
        "time-scaled",
        "--section",
        "work",
        "--seed",
        "7",
        "--max-links",
        "12",
        "--sync-updates",
        "false",
    ])
    .expect("parse");
    assert_eq!(cfg.renderer, RendererMode::Braille);
    assert_eq!(cfg.integration, Integration::TimeScaled);
    assert_eq!(cfg.section.as_deref(), Some("work"));
    assert_eq!(cfg.seed, Some(7));
    assert!(!cfg.sync_updates);
    assert_eq!(field_settings(&cfg).links.max_links, 12);
}

#[test]
fn cli_rejects_unknown_renderer() {
    assert!(Config::try_parse_from(["particle-field", "--renderer", "kitty"]).is_err());
}

// ── Page controller ─────────────────────────────────────────────────────────

fn page(now: Instant) -> Page {
    let cfg = Config::try_parse_from(["particle-field", "--seed", "3", "--particles", "200"])
        .expect("parse");
    Page::new(
        &field_settings(&cfg),
        AppPrefs::default(),
        None,
        (1, 2),
        80,
        30,
        now,
    )
}

fn key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn number_keys_jump_between_sections() {
    let now = Instant::now();
    let mut p = page(now);
    assert!(p.hint_visible(now));

    assert_eq!(p.handle_event(&key('2'), now), PageAction::Continue);
    assert_eq!(p.nav.active_index(), 2);
    assert_eq!(p.field.section(), Some(Section::Projects));
    assert!(!p.hint_visible(now));

    p.handle_event(&key('0'), now);
    assert_eq!(p.field.section(), None);
    // Out-of-range digits do nothing.
    p.handle_event(&key('9'), now);
    assert_eq!(p.nav.active_index(), 0);
}

#[test]
fn wheel_scrolling_changes_section_and_throttles() {
    let now = Instant::now();
    let mut p = page(now);
    for _ in 0..5 {
        p.handle_event(&mouse(MouseEventKind::ScrollDown, 0, 0), now);
    }
    assert_eq!(p.field.section(), Some(Section::About));
    assert!(p.governor.is_scrolling(now));
}

#[test]
fn pointer_moves_map_cells_to_pixels() {
    let now = Instant::now();
    let mut p = page(now);
    p.handle_event(&mouse(MouseEventKind::Moved, 10, 5), now);
    p.field.step(0.0, 1.0 / 60.0);
    assert_eq!(p.field.pointer(), Some(Point::new(10.5, 11.0)));

    // Rows below the field belong to the HUD.
    p.handle_event(&mouse(MouseEventKind::Moved, 10, 31), now);
    p.field.step(0.016, 1.0 / 60.0);
    assert_eq!(p.field.pointer(), None);
}

#[test]
fn focus_loss_pauses_the_page() {
    let now = Instant::now();
    let mut p = page(now);
    p.handle_event(&Event::FocusLost, now);
    assert!(p.governor.is_hidden());
    p.handle_event(&Event::FocusGained, now);
    assert!(!p.governor.is_hidden());
}

#[test]
fn tuning_keys_nudge_and_clamp() {
    let now = Instant::now();
    let mut p = page(now);
    p.handle_event(&key('A'), now);
    assert!((p.field.tuning().wave_amplitude - 0.20).abs() < 1e-6);
    assert!((p.prefs.tuning.wave_amplitude - 0.20).abs() < 1e-6);

    for _ in 0..100 {
        p.handle_event(&key('b'), now);
    }
    assert!((p.field.tuning().card_border - 0.01).abs() < 1e-6);

    p.handle_event(&key('r'), now);
    assert_eq!(*p.field.tuning(), ShapeTuning::default());
}

#[test]
fn toggles_and_quit() {
    let now = Instant::now();
    let mut p = page(now);
    assert!(p.show_hud());
    p.handle_event(&key('i'), now);
    assert!(!p.show_hud());

    p.handle_event(&key('m'), now);
    assert!(p.equalizer.enabled());
    assert!(p.prefs.sound);

    p.handle_event(&key('?'), now);
    assert!(p.show_help());

    assert_eq!(p.handle_event(&key('q'), now), PageAction::Quit);
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(p.handle_event(&ctrl_c, now), PageAction::Quit);
}

#[test]
fn start_section_accepts_aliases_and_ignores_junk() {
    let now = Instant::now();
    let mut p = page(now);
    p.start_in_section("Contact");
    assert_eq!(p.nav.active_index(), 4);
    assert_eq!(p.field.section(), Some(Section::Contact));

    // A start-up section is not user navigation.
    assert!(p.hint_visible(now));

    p.start_in_section("bogus");
    assert_eq!(p.field.section(), Some(Section::Contact));

    p.start_in_section("none");
    assert_eq!(p.field.section(), None);
}

#[test]
fn hud_reports_the_frame_rate_state() {
    let now = Instant::now();
    let mut p = page(now);
    let hud = build_hud(400, &p, 59.9, "halfblock", "per-frame", now);
    assert!(hud.contains("Rate: full"));
    assert!(hud.contains("press 0-4"));

    p.handle_event(&Event::FocusLost, now);
    let hud = build_hud(400, &p, 0.0, "halfblock", "per-frame", now);
    assert!(hud.contains("Rate: paused"));
}

#[test]
fn hint_hides_after_a_delay_or_on_scroll() {
    let now = Instant::now();
    let p = page(now);
    assert!(!p.hint_visible(now + std::time::Duration::from_secs(9)));

    let mut p = page(now);
    for _ in 0..5 {
        p.handle_event(&mouse(MouseEventKind::ScrollDown, 0, 0), now);
    }
    assert!(!p.hint_visible(now));
}

#[test]
fn tick_paints_the_surface() {
    let now = Instant::now();
    let mut p = page(now);
    p.handle_event(&key('1'), now);
    let mut surface = Surface::new(80, 60);
    for f in 0..30 {
        p.tick(f as f32 / 60.0, 1.0 / 60.0, &mut surface);
    }
    let lit = surface
        .pixels()
        .chunks_exact(4)
        .filter(|px| px[0] != BACKGROUND[0] || px[1] != BACKGROUND[1] || px[2] != BACKGROUND[2])
        .count();
    assert!(lit > 0);
}

// ── Equalizer ───────────────────────────────────────────────────────────────

#[test]
fn equalizer_levels_stay_in_range() {
    for i in 0..400 {
        let levels = bar_levels(i as f32 * 0.037);
        assert_eq!(levels.len(), BAR_COUNT);
        for v in levels {
            assert!((50.0..=255.0).contains(&v), "level {v}");
        }
    }
}

#[test]
fn equalizer_toggles_and_draws_in_the_corner() {
    let mut eq = Equalizer::new(false, 0.0);
    assert!(eq.levels(1.0).is_none());

    let mut surface = Surface::new(64, 40);
    surface.clear(BACKGROUND);
    eq.draw(&mut surface, 1.0);
    assert!(surface.pixels().chunks_exact(4).all(|px| px[..3] == BACKGROUND));

    assert!(eq.toggle(1.0));
    eq.draw(&mut surface, 2.0);
    // Top-left stays untouched; the widget sits bottom-right.
    assert_eq!(surface.pixel(0, 0), Some(BACKGROUND));
    let corner_lit = (38..62)
        .flat_map(|x| (22..38).map(move |y| (x, y)))
        .any(|(x, y)| surface.pixel(x, y) != Some(BACKGROUND));
    assert!(corner_lit);

    assert!(!eq.toggle(3.0));
    assert!(!eq.enabled());
}

// ── Cursor follower ─────────────────────────────────────────────────────────

#[test]
fn cursor_snaps_then_eases_toward_the_pointer() {
    let mut cursor = CursorFollower::new(fastrand::Rng::with_seed(5));
    cursor.set_target(Some(Point::new(10.0, 10.0)));
    cursor.step(1.0 / 60.0);
    assert_eq!(cursor.position(), Some(Point::new(10.0, 10.0)));

    cursor.set_target(Some(Point::new(30.0, 10.0)));
    cursor.step(1.0 / 60.0);
    assert_eq!(cursor.position(), Some(Point::new(15.0, 10.0)));
}

#[test]
fn cursor_sparkles_fade_out() {
    let mut cursor = CursorFollower::new(fastrand::Rng::with_seed(6));
    cursor.set_target(Some(Point::new(5.0, 5.0)));
    for _ in 0..60 {
        cursor.step(1.0 / 60.0);
    }
    assert!(!cursor.sparkles().is_empty());

    cursor.set_target(None);
    assert_eq!(cursor.position(), None);
    for _ in 0..7 {
        cursor.step(0.1);
    }
    assert!(cursor.sparkles().is_empty());
}
