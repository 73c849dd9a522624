use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ringkit::geom::{Point, compass_angle, normalize_degrees, polar, segment_path, segment_span};
use ringkit::passivegram::{Layer, Mode, PassiveGram};
use ringkit::puzzle::{CellKey, Dimensions, Puzzle, RingId, SHUFFLE_STEP};

const CENTER: Point = Point { x: 300.0, y: 300.0 };

/// Shortest distance between two angles on the circle.
fn circular_gap(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    d.min(360.0 - d)
}

fn band_midpoint(puzzle: &Puzzle, ring: RingId, compass: f64) -> Point {
    let (outer, inner) = puzzle.layout().bounds(ring);
    polar(puzzle.layout().center, (outer + inner) / 2.0, compass)
}

proptest! {
    #[test]
    fn normalized_angles_stay_in_range(angle in -1.0e7f64..1.0e7) {
        let n = normalize_degrees(angle);
        prop_assert!((0.0..360.0).contains(&n));
    }

    #[test]
    fn compass_angle_inverts_polar(compass in 0.0f64..360.0, radius in 1.0f64..400.0) {
        let p = polar(CENTER, radius, compass);
        prop_assert!(circular_gap(compass_angle(CENTER, p), compass) < 1e-6);
    }

    #[test]
    fn drag_follows_pointer_one_to_one(
        ring in 0usize..5,
        initial in 0.0f64..360.0,
        path in prop::collection::vec(0.0f64..360.0, 1..12),
    ) {
        let mut puzzle = Puzzle::default();
        let ring = RingId::Ring(ring);
        puzzle.set_angle(ring, initial);

        let start = 10.0;
        prop_assert_eq!(puzzle.begin_drag(band_midpoint(&puzzle, ring, start)), Some(ring));
        for compass in &path {
            let point = band_midpoint(&puzzle, ring, *compass);
            prop_assert!(puzzle.drag_to(point));
            let angle = puzzle.angle(ring);
            prop_assert!((0.0..360.0).contains(&angle));
            prop_assert!(circular_gap(angle, initial + compass - start) < 1e-6);
        }
        prop_assert_eq!(puzzle.end_drag(), Some(ring));
        prop_assert!(!puzzle.is_dragging());
    }

    #[test]
    fn hit_test_respects_rotation(
        rings in 2usize..=8,
        segments in 2usize..=12,
        ring_pick in 0usize..8,
        rotation in 0.0f64..360.0,
        segment_pick in 0usize..12,
        frac in 0.1f64..0.9,
    ) {
        let mut puzzle = Puzzle::new(Dimensions::new(rings, segments));
        let ring = RingId::Ring(ring_pick % rings);
        let segment = segment_pick % segments;
        puzzle.set_angle(ring, rotation);

        let span = segment_span(segments);
        let compass = rotation + (segment as f64 + frac) * span;
        let point = band_midpoint(&puzzle, ring, compass);
        prop_assert_eq!(puzzle.cell_at(point), Some(CellKey::new(ring, segment)));
    }

    #[test]
    fn reconfigure_resets_everything(
        rings in 2usize..=8,
        segments in 2usize..=12,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut puzzle = Puzzle::default();
        puzzle.shuffle(&mut rng);
        puzzle.select(Some(CellKey::new(RingId::Ring(0), 0)));

        let changed = puzzle.reconfigure(rings, segments);
        prop_assert_eq!(changed, (rings, segments) != (5, 3));
        if changed {
            let dims = puzzle.dimensions();
            prop_assert_eq!(puzzle.cells().len(), rings * segments + 2 * segments);
            prop_assert_eq!(dims.cell_count(), puzzle.cells().len());
            prop_assert!(puzzle.ring_angles().iter().all(|a| *a == 0.0));
            prop_assert_eq!(puzzle.angle(RingId::Center), 0.0);
            prop_assert_eq!(puzzle.selected, None);
        }
    }

    #[test]
    fn shuffle_lands_on_fifteen_degree_steps(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut puzzle = Puzzle::new(Dimensions::new(8, 12));
        puzzle.shuffle(&mut rng);
        let center = std::iter::once(puzzle.angle(RingId::Center));
        for angle in puzzle.ring_angles().iter().copied().chain(center) {
            prop_assert!((0.0..360.0).contains(&angle));
            prop_assert_eq!(angle % SHUFFLE_STEP, 0.0);
        }
    }

    #[test]
    fn every_draw_is_distinct_per_ring(seed in any::<u64>(), mode_pick in 0usize..3) {
        let mode = [Mode::Standard, Mode::Reporting, Mode::Causative][mode_pick];
        let mut rng = StdRng::seed_from_u64(seed);
        let mut wheel = PassiveGram::default();
        wheel.select_mode(mode, &mut rng).unwrap();
        prop_assert!(wheel.begin_draw());
        wheel.reveal_draw(&mut rng).unwrap();

        for layer in [Layer::Subject, Layer::Auxiliary, Layer::Participle, Layer::Agent] {
            let values = wheel.values(layer);
            prop_assert_eq!(values.len(), 8);
            let mut sorted: Vec<_> = values.iter().map(|p| p.as_str()).collect();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), 8);
        }
        let allowed = wheel.vocabulary().auxiliaries(mode);
        prop_assert!(wheel.values(Layer::Auxiliary).iter().all(|p| allowed.contains(p)));
    }
}

#[test]
fn segments_tile_the_full_turn() {
    for count in 2..=12 {
        let span = segment_span(count);
        assert_abs_diff_eq!(span * count as f64, 360.0, epsilon = 1e-9);

        let last = segment_path(CENTER, 200.0, 100.0, span * (count - 1) as f64, 360.0);
        let end = last.arcs().next().unwrap().end_point();
        let first_start = polar(CENTER, 200.0, 0.0);
        assert_abs_diff_eq!(end.x, first_start.x, epsilon = 1e-9);
        assert_abs_diff_eq!(end.y, first_start.y, epsilon = 1e-9);
    }
}

#[test]
fn layer_bands_are_contiguous() {
    let mut expected_inner = 0.0;
    for layer in [Layer::Subject, Layer::Auxiliary, Layer::Participle, Layer::Agent] {
        let (outer, inner) = layer.bounds();
        assert_abs_diff_eq!(inner, expected_inner);
        expected_inner = outer;
    }
    assert_abs_diff_eq!(expected_inner, Layer::outermost_radius());
}
