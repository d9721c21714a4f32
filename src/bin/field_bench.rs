use std::time::{Duration, Instant};

use anyhow::Result;
use particle_field::config::Integration;
use particle_field::field::{BACKGROUND, FieldSettings, ParticleField, Point, PointerState, Section};
use particle_field::render::{BrailleRenderer, Frame, HalfBlockRenderer, Renderer};
use particle_field::surface::Surface;

struct Args {
    frames: usize,
    w: usize,
    h: usize,
    particles: usize,
    integration: Integration,
    ci_smoke: bool,
    quick: bool,
    max_ms: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        frames: 240,
        w: 160,
        h: 88,
        particles: 700,
        integration: Integration::PerFrame,
        ci_smoke: false,
        quick: false,
        max_ms: 8.0,
    };

    let argv = std::env::args().skip(1).collect::<Vec<_>>();
    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--frames", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.frames = n.max(1);
                }
                i += 2;
            }
            ("--w", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.w = n.max(1);
                }
                i += 2;
            }
            ("--h", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.h = n.max(1);
                }
                i += 2;
            }
            ("--particles", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.particles = n;
                }
                i += 2;
            }
            ("--integration", Some("per-frame")) => {
                args.integration = Integration::PerFrame;
                i += 2;
            }
            ("--integration", Some("time-scaled")) => {
                args.integration = Integration::TimeScaled;
                i += 2;
            }
            ("--ci-smoke", Some(x)) if !x.starts_with("--") => {
                args.ci_smoke = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--ci-smoke", _) => {
                args.ci_smoke = true;
                i += 1;
            }
            ("--quick", Some(x)) if !x.starts_with("--") => {
                args.quick = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--quick", _) => {
                args.quick = true;
                i += 1;
            }
            ("--max-ms", Some(x)) => {
                if let Ok(v) = x.parse::<f64>() {
                    args.max_ms = v.max(0.1);
                }
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    if args.quick {
        args.frames = args.frames.min(60);
    }

    args
}

fn parse_bool(s: &str) -> Option<bool> {
    let v = s.trim().to_ascii_lowercase();
    match v.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Pointer sweeping a slow ellipse through the middle of the field.
fn orbit_pointer(f: usize, w: usize, h: usize) -> Point {
    let a = f as f32 * 0.05;
    Point::new(
        w as f32 * (0.5 + 0.3 * a.cos()),
        h as f32 * (0.5 + 0.3 * (a * 1.3).sin()),
    )
}

fn lit_pixels(surface: &Surface) -> bool {
    surface
        .pixels()
        .chunks_exact(4)
        .any(|p| p[0] != BACKGROUND[0] || p[1] != BACKGROUND[1] || p[2] != BACKGROUND[2])
}

fn bench_sections(args: &Args) -> Vec<(String, f64)> {
    let mut settings = FieldSettings {
        particles: args.particles,
        seed: Some(7),
        ..FieldSettings::default()
    };
    settings.integrator.integration = args.integration;

    let mut field = ParticleField::new(&settings, args.w as f32, args.h as f32);
    let mut surface = Surface::new(args.w, args.h);
    let mut slow = Vec::new();

    println!(
        "Field benchmark: particles={} frames/section={} size={}x{} integration={} quick={}",
        args.particles,
        args.frames,
        args.w,
        args.h,
        args.integration.label(),
        args.quick
    );

    let mut sections: Vec<Option<Section>> = Section::all().into_iter().map(Some).collect();
    sections.push(None);

    let mut total_time = Duration::ZERO;
    let mut total_frames = 0usize;
    for (idx, section) in sections.iter().copied().enumerate() {
        field.set_section(section);
        let label = section.map(Section::label).unwrap_or("Home");

        let start = Instant::now();
        let mut lit = 0usize;
        let mut peak_links = 0usize;
        for f in 0..args.frames {
            field.post_pointer(PointerState::At(orbit_pointer(f, args.w, args.h)));
            field.step(total_frames as f32 / 60.0 + f as f32 / 60.0, 1.0 / 60.0);
            field.draw(&mut surface);
            peak_links = peak_links.max(field.links().len());
            if lit_pixels(&surface) {
                lit += 1;
            }
        }

        let elapsed = start.elapsed();
        total_time += elapsed;
        total_frames += args.frames;
        let ms = elapsed.as_secs_f64() * 1000.0 / args.frames as f64;
        println!(
            "{:>2}. {:<10} {:>8.3} ms/frame  form={:.2}  links<={:>3}/{}  lit={:>3}/{}",
            idx,
            label,
            ms,
            field.form_progress(),
            peak_links,
            field.link_config().max_links,
            lit,
            args.frames
        );
        if args.ci_smoke && ms > args.max_ms {
            slow.push((label.to_string(), ms));
        }
    }

    let avg_ms = total_time.as_secs_f64() * 1000.0 / total_frames.max(1) as f64;
    let fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };
    println!("Field summary: {:>8.3} ms/frame avg  {:>7.2} FPS", avg_ms, fps);
    slow
}

fn bench_renderers(args: &Args) -> Result<()> {
    let mut renderers: Vec<Box<dyn Renderer>> = vec![
        Box::new(HalfBlockRenderer::new()),
        Box::new(BrailleRenderer::new(BACKGROUND)),
    ];
    let frames = args.frames.clamp(1, 120);

    for renderer in renderers.iter_mut() {
        let (cw, ch) = renderer.cell_size();
        let cols = (args.w / cw).max(1);
        let rows = (args.h / ch).max(1);
        let (w, h) = (cols * cw, rows * ch);

        let settings = FieldSettings {
            particles: args.particles,
            seed: Some(11),
            ..FieldSettings::default()
        };
        let mut field = ParticleField::new(&settings, w as f32, h as f32);
        field.set_section(Some(Section::Contact));
        let mut surface = Surface::new(w, h);
        let mut sink: Vec<u8> = Vec::with_capacity(w * h * 8);

        let start = Instant::now();
        let mut bytes = 0usize;
        for f in 0..frames {
            field.step(f as f32 / 60.0, 1.0 / 60.0);
            field.draw(&mut surface);
            sink.clear();
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
            renderer.render(&frame, &mut sink)?;
            bytes += sink.len();
        }

        let ms = start.elapsed().as_secs_f64() * 1000.0 / frames as f64;
        println!(
            "  {:<10} {:>8.3} ms/frame  {:>7} bytes/frame  grid={}x{}",
            renderer.name(),
            ms,
            bytes / frames,
            cols,
            rows
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args();

    let slow = bench_sections(&args);
    println!("Renderer benchmark: frames={}", args.frames.clamp(1, 120));
    bench_renderers(&args)?;

    if args.ci_smoke {
        if !slow.is_empty() {
            eprintln!("CI smoke: FAIL");
            for (name, ms) in slow {
                eprintln!("  slow section: {} ({:.3} ms/frame > {:.3})", name, ms, args.max_ms);
            }
            anyhow::bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }

    Ok(())
}
