use particle_field::field::{CloudCache, ShapeKind, ShapeTuning, ShapeTuningPatch, TuningKey};

fn inside(w: f32, h: f32, pts: &[particle_field::field::Point]) -> bool {
    pts.iter()
        .all(|p| p.x >= 0.0 && p.y >= 0.0 && p.x <= w && p.y <= h)
}

#[test]
fn every_shape_fills_a_normal_viewport() {
    let tuning = ShapeTuning::default();
    for kind in ShapeKind::all() {
        let pts = kind.generate(160.0, 88.0, &tuning, 2.0);
        assert!(!pts.is_empty(), "{} produced no points", kind.label());
        assert!(inside(160.0, 88.0, &pts), "{} left the viewport", kind.label());
    }
}

#[test]
fn zero_and_invalid_viewports_yield_empty_clouds() {
    let tuning = ShapeTuning::default();
    for kind in ShapeKind::all() {
        assert!(kind.generate(0.0, 0.0, &tuning, 2.0).is_empty());
        assert!(kind.generate(-10.0, 40.0, &tuning, 2.0).is_empty());
        assert!(kind.generate(f32::NAN, 40.0, &tuning, 2.0).is_empty());
        assert!(kind.generate(f32::INFINITY, 40.0, &tuning, 2.0).is_empty());
    }
}

#[test]
fn hostile_tuning_values_terminate() {
    let hostile = [f32::NAN, -1.0, 0.0, 1e9, f32::INFINITY, f32::NEG_INFINITY];
    for &v in &hostile {
        let tuning = ShapeTuning {
            stroke: v,
            card_corner: v,
            card_border: v,
            wave_amplitude: v,
            wave_thickness: v,
            hand_scale: v,
        };
        for kind in ShapeKind::all() {
            let pts = kind.generate(120.0, 60.0, &tuning, 2.0);
            // Bounded by the sampling grid.
            assert!(pts.len() <= 60 * 30, "{} with {v} gave {}", kind.label(), pts.len());
            assert!(pts.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }
}

#[test]
fn tiny_step_is_floored() {
    let tuning = ShapeTuning::default();
    let pts = ShapeKind::Card.generate(40.0, 20.0, &tuning, 0.0);
    assert!(pts.len() <= 80 * 40);
    let pts = ShapeKind::Card.generate(40.0, 20.0, &tuning, f32::NAN);
    assert!(!pts.is_empty());
}

#[test]
fn merge_reports_only_affected_shapes() {
    let mut tuning = ShapeTuning::default();
    let affected = tuning.merge(&ShapeTuningPatch::single(TuningKey::WaveAmplitude, 0.3));
    assert_eq!(affected, vec![ShapeKind::Wave]);
    assert_eq!(tuning.wave_amplitude, 0.3);

    // Same value again is not a change.
    let affected = tuning.merge(&ShapeTuningPatch::single(TuningKey::WaveAmplitude, 0.3));
    assert!(affected.is_empty());

    let mut patch = ShapeTuningPatch::default();
    patch.card_border = Some(0.1);
    patch.stroke = Some(0.5);
    let affected = tuning.merge(&patch);
    assert_eq!(affected, vec![ShapeKind::Card, ShapeKind::Letters]);
}

#[test]
fn cache_rebuilds_only_changed_clouds() {
    let mut cache = CloudCache::new(160.0, 88.0, 2.0, ShapeTuning::default());
    let card_before = cache.cloud(ShapeKind::Card).to_vec();
    let hand_before = cache.cloud(ShapeKind::Hand).len();

    let affected = cache.apply_tuning(&ShapeTuningPatch::single(TuningKey::HandScale, 0.4));
    assert_eq!(affected, vec![ShapeKind::Hand]);
    assert_eq!(cache.cloud(ShapeKind::Card), card_before.as_slice());
    assert!(cache.cloud(ShapeKind::Hand).len() < hand_before);
    assert_eq!(cache.tuning().hand_scale, 0.4);
}

#[test]
fn cache_resize_is_a_noop_for_same_size() {
    let mut cache = CloudCache::new(80.0, 40.0, 2.0, ShapeTuning::default());
    assert!(!cache.resize(80.0, 40.0));
    assert!(cache.resize(0.0, 0.0));
    for kind in ShapeKind::all() {
        assert!(cache.cloud(kind).is_empty());
    }
}

#[test]
fn hand_pivot_sits_below_centre() {
    let tuning = ShapeTuning::default();
    let wrist = ShapeKind::Hand.pivot(160.0, 88.0, &tuning);
    assert!(wrist.y > 44.0);
    let centre = ShapeKind::Card.pivot(160.0, 88.0, &tuning);
    assert_eq!((centre.x, centre.y), (80.0, 44.0));
    assert!(ShapeKind::Hand.breathes());
    assert!(!ShapeKind::Wave.breathes());
}

#[test]
fn tuning_keys_parse_their_own_names() {
    for key in TuningKey::all() {
        assert_eq!(TuningKey::parse(key.as_str()), Some(key));
    }
    assert_eq!(TuningKey::parse("nope"), None);
}
