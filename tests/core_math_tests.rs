use approx::assert_relative_eq;
use neon_charts::core::path::coord;
use neon_charts::core::stats::{extent, mean, median, normalize, standard_deviation, sum, to_percentages};
use neon_charts::core::{
    Point, StepPosition, clamp, create_band_scale, create_inverted_scale, create_linear_scale,
    generate_ticks, lerp, linear_path, nice_extent, scale, simplify_path, smooth_path, step_path,
};

#[test]
fn lerp_and_scale_map_endpoints() {
    assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
    assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
    assert_relative_eq!(lerp(10.0, 20.0, 0.25), 12.5);
    assert_relative_eq!(scale(5.0, 0.0, 10.0, 100.0, 200.0), 150.0);
    assert_eq!(scale(3.0, 4.0, 4.0, 7.0, 9.0), 7.0);
}

#[test]
fn clamp_handles_reversed_bounds() {
    assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    assert_eq!(clamp(15.0, 10.0, 0.0), 10.0);
    assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
}

#[test]
fn nice_extent_rounds_to_readable_bounds() {
    assert_eq!(nice_extent(3.0, 97.0, 5), (0.0, 100.0));
    assert_eq!(nice_extent(0.0, 0.0, 5), (0.0, 1.0));
    assert_eq!(nice_extent(f64::NAN, 10.0, 5), (0.0, 1.0));

    let (lo, hi) = nice_extent(12.0, 12.0, 5);
    assert!(lo < 12.0 && hi > 12.0);

    let (lo, hi) = nice_extent(-7.3, 41.2, 5);
    assert!(lo <= -7.3);
    assert!(hi >= 41.2);
}

#[test]
fn generated_ticks_span_the_nice_extent() {
    let ticks = generate_ticks(0.0, 97.0, 5);
    assert_eq!(ticks.len(), 6);
    assert_eq!(ticks.first().copied(), Some(0.0));
    assert_eq!(ticks.last().copied(), Some(100.0));
}

#[test]
fn linear_and_inverted_scales_map_domain_to_range() {
    let x = create_linear_scale((0.0, 10.0), (50.0, 550.0));
    assert_relative_eq!(x.map(5.0), 300.0);
    assert_relative_eq!(x.invert(300.0), 5.0);

    let y = create_inverted_scale((0.0, 100.0), (20.0, 220.0));
    assert_relative_eq!(y.map(100.0), 20.0);
    assert_relative_eq!(y.map(0.0), 220.0);
}

#[test]
fn band_scale_places_categories_in_first_seen_order() {
    let band = create_band_scale(&["Jan", "Feb", "Mar"], 0.0, 300.0, 0.2);
    assert_eq!(band.len(), 3);
    assert_relative_eq!(band.step(), 100.0);
    assert_relative_eq!(band.bandwidth(), 80.0);
    assert_relative_eq!(band.position("Jan").expect("Jan placed"), 10.0);
    assert_relative_eq!(band.center_at(1), 150.0);
    assert_eq!(band.position("Apr"), None);

    let empty = create_band_scale::<&str>(&[], 40.0, 300.0, 0.2);
    assert!(empty.is_empty());
    assert_eq!(empty.bandwidth(), 0.0);
    assert_eq!(empty.position_at(3), 40.0);
}

#[test]
fn path_builders_emit_expected_commands() {
    let points = [Point::new(0.0, 10.0), Point::new(10.0, 20.0), Point::new(20.0, 5.0)];
    assert_eq!(linear_path(&points), "M0,10L10,20L20,5");
    assert!(linear_path(&[]).is_empty());

    let smooth = smooth_path(&points, 0.5);
    assert!(smooth.starts_with("M0,10"));
    assert_eq!(smooth.matches('C').count(), 2);

    let step = step_path(&points[..2], StepPosition::After);
    assert_eq!(step, "M0,10H10V20");
}

#[test]
fn coordinates_are_trimmed() {
    assert_eq!(coord(12.0), "12");
    assert_eq!(coord(12.5), "12.5");
    assert_eq!(coord(-0.0), "0");
}

#[test]
fn simplify_keeps_endpoints_and_drops_collinear_points() {
    let collinear: Vec<Point> = (0..50).map(|i| Point::new(f64::from(i), f64::from(i) * 2.0)).collect();
    let simplified = simplify_path(&collinear, 1.0);
    assert_eq!(simplified, vec![collinear[0], collinear[49]]);

    let spike = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(2.0, 10.0),
        Point::new(3.0, 0.0),
        Point::new(4.0, 0.0),
    ];
    let simplified = simplify_path(&spike, 1.0);
    assert!(simplified.contains(&Point::new(2.0, 10.0)));
    assert_eq!(simplified.first(), spike.first());
    assert_eq!(simplified.last(), spike.last());

    assert_eq!(simplify_path(&spike, 0.0), spike.to_vec());
}

#[test]
fn statistics_cover_empty_input() {
    let values = [4.0, 1.0, 3.0, 2.0];
    assert_eq!(sum(&values), 10.0);
    assert_relative_eq!(mean(&values), 2.5);
    assert_relative_eq!(median(&values), 2.5);
    assert_eq!(extent(&values), Some((1.0, 4.0)));
    assert_relative_eq!(standard_deviation(&values), 1.118_033_988_749_895, epsilon = 1e-12);
    assert_eq!(normalize(&[2.0, 4.0, 6.0]), vec![0.0, 0.5, 1.0]);
    assert_eq!(to_percentages(&[1.0, 3.0]), vec![25.0, 75.0]);

    assert_eq!(extent(&[]), None);
    assert_eq!(mean(&[]), 0.0);
    assert_eq!(to_percentages(&[0.0, 0.0]), vec![0.0, 0.0]);
}

#[test]
fn scale_ticks_stay_inside_a_raw_domain() {
    let ticks = create_linear_scale((3.0, 97.0), (0.0, 100.0)).ticks(5);
    assert_eq!(ticks.as_slice(), &[20.0, 40.0, 60.0, 80.0]);

    let inverted = create_inverted_scale((3.0, 97.0), (20.0, 260.0)).ticks(5);
    assert!(inverted.iter().all(|tick| (3.0..=97.0).contains(tick)));
}
