use std::cell::RefCell;
use std::rc::Rc;

use neon_charts::api::{Chart, ChartData, SparklineChart, SparklineOptions, SparklineStats, Trend};
use neon_charts::core::DataPoint;
use neon_charts::platform::{ContainerId, HeadlessHost};
use neon_charts::ChartError;

fn setup() -> (Rc<RefCell<HeadlessHost>>, ContainerId) {
    let host = Rc::new(RefCell::new(HeadlessHost::new()));
    let container = host.borrow_mut().add_container(Some("#spark"), 120.0, 30.0);
    (host, container)
}

fn sparkline(data: &[f64]) -> SparklineOptions {
    SparklineOptions {
        data: data.to_vec(),
        ..SparklineOptions::default()
    }
}

#[test]
fn stats_summarize_rising_series() {
    let (host, container) = setup();
    let chart = SparklineChart::new(host, container, sparkline(&[1.0, 4.0, 2.0, 6.0, 3.0, 8.0, 5.0]))
        .expect("sparkline");
    assert_eq!(
        chart.get_stats(),
        Some(SparklineStats {
            min: 1.0,
            max: 8.0,
            first: 1.0,
            last: 5.0,
            trend: Trend::Up,
        })
    );
}

#[test]
fn trend_follows_first_and_last_values() {
    let (host, container) = setup();
    let falling = SparklineChart::new(Rc::clone(&host), container, sparkline(&[9.0, 12.0, 3.0]))
        .expect("falling");
    assert_eq!(falling.get_stats().map(|stats| stats.trend), Some(Trend::Down));

    let flat = SparklineChart::new(host, container, sparkline(&[4.0, 1.0, 4.0])).expect("flat");
    assert_eq!(flat.get_stats().map(|stats| stats.trend), Some(Trend::Flat));
}

#[test]
fn empty_sparkline_has_no_stats_and_no_line() {
    let (host, container) = setup();
    let chart = SparklineChart::new(host, container, sparkline(&[])).expect("sparkline");
    assert_eq!(chart.get_stats(), None);
    let root = chart.get_svg().expect("root");
    assert!(root.collect_by_class("nc-line").is_empty());
    assert!(root.collect_by_class("nc-sparkline-end").is_empty());
}

#[test]
fn end_point_sits_on_the_right_edge() {
    let (host, container) = setup();
    let chart = SparklineChart::new(host, container, sparkline(&[1.0, 2.0, 3.0])).expect("sparkline");
    let root = chart.get_svg().expect("root");
    assert_eq!(root.collect_by_class("nc-line").len(), 1);
    let end = root.collect_by_class("nc-sparkline-end");
    assert_eq!(end.len(), 1);
    // 120 wide with 2px padding
    assert_eq!(end[0].get_attr("cx"), Some("118"));
}

#[test]
fn min_max_markers_and_area_are_optional() {
    let (host, container) = setup();
    let mut options = sparkline(&[3.0, 1.0, 7.0, 2.0]);
    options.show_min_max = true;
    options.fill_area = true;
    options.show_end_point = false;
    let chart = SparklineChart::new(host, container, options).expect("sparkline");
    let root = chart.get_svg().expect("root");
    assert_eq!(root.collect_by_class("nc-sparkline-min").len(), 1);
    assert_eq!(root.collect_by_class("nc-sparkline-max").len(), 1);
    assert_eq!(root.collect_by_class("nc-area").len(), 1);
    assert!(root.collect_by_class("nc-sparkline-end").is_empty());
    assert_eq!(root.count_tag("linearGradient"), 1);
}

#[test]
fn update_replaces_values() {
    let (host, container) = setup();
    let mut chart = SparklineChart::new(host, container, sparkline(&[1.0, 2.0])).expect("sparkline");

    chart
        .update(ChartData::Values(vec![5.0, 4.0, 3.0]))
        .expect("values");
    assert_eq!(chart.data(), &[5.0, 4.0, 3.0]);
    assert_eq!(chart.get_stats().map(|stats| stats.trend), Some(Trend::Down));

    chart
        .update(ChartData::Points(vec![DataPoint::new(0.0, 2.0), DataPoint::new(1.0, 6.0)]))
        .expect("points");
    assert_eq!(chart.data(), &[2.0, 6.0]);

    let result = chart.update(ChartData::Value(1.0));
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn typed_options_replace_everything() {
    let (host, container) = setup();
    let mut chart = SparklineChart::new(Rc::clone(&host), container, sparkline(&[1.0, 2.0]))
        .expect("sparkline");
    let mounts = host.borrow().mount_count(container);

    let mut options = sparkline(&[4.0, 9.0, 2.0]);
    options.show_min_max = true;
    chart.set_typed_options(options).expect("typed options");
    assert_eq!(chart.data(), &[4.0, 9.0, 2.0]);
    assert_eq!(host.borrow().mount_count(container), mounts + 1);
    assert_eq!(
        chart.get_svg().expect("root").collect_by_class("nc-sparkline-max").len(),
        1
    );
}
