use std::cell::RefCell;
use std::rc::Rc;

use neon_charts::api::{
    Chart, ChartData, ChartKind, LineOptions, SparklineOptions, SparklineChart, LineChart,
    create_chart,
};
use neon_charts::core::DataPoint;
use neon_charts::interaction::{ChartEventKind, EventData};
use neon_charts::platform::{ContainerId, HeadlessHost};
use neon_charts::ChartError;
use serde_json::json;

fn host_with_container() -> (Rc<RefCell<HeadlessHost>>, ContainerId) {
    let host = Rc::new(RefCell::new(HeadlessHost::new()));
    let container = host.borrow_mut().add_container(Some("#chart"), 600.0, 300.0);
    (host, container)
}

fn monthly_points() -> ChartData {
    ChartData::Points(vec![
        DataPoint::new("Jan", 10.0),
        DataPoint::new("Feb", 25.0),
        DataPoint::new("Mar", 18.0),
    ])
}

#[test]
fn every_chart_kind_renders_through_the_factory() {
    let (host, container) = host_with_container();
    for kind in ChartKind::ALL {
        let chart = create_chart(kind.as_str(), Rc::clone(&host), container, &json!({}))
            .expect("factory builds every kind");
        assert_eq!(chart.kind(), kind);
        assert_eq!(chart.dimensions(), kind.default_size());
        let markup = chart.to_svg().expect("rendered chart exports markup");
        assert!(markup.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert_eq!(host.borrow().mounted_markup(container), Some(markup));
    }
}

#[test]
fn factory_rejects_unknown_chart_type() {
    let (host, container) = host_with_container();
    let result = create_chart("radar", host, container, &json!({}));
    assert!(matches!(result, Err(ChartError::UnknownChartType(kind)) if kind == "radar"));
}

#[test]
fn missing_selector_is_an_error() {
    let (host, _) = host_with_container();
    let result = LineChart::new(host, "#missing", LineOptions::default());
    assert!(matches!(
        result,
        Err(ChartError::ContainerNotFound { selector }) if selector == "#missing"
    ));
}

#[test]
fn selector_resolves_to_registered_container() {
    let (host, container) = host_with_container();
    let chart = LineChart::new(Rc::clone(&host), "#chart", LineOptions::default())
        .expect("selector resolves");
    assert!(!host.borrow().is_empty(container));
    assert_eq!(chart.dimensions().width, 600.0);
}

#[test]
fn destroy_twice_leaves_container_empty() {
    let (host, container) = host_with_container();
    let options = LineOptions {
        data: monthly_points(),
        ..LineOptions::default()
    };
    let mut chart = LineChart::new(Rc::clone(&host), container, options).expect("line chart");
    assert!(!host.borrow().is_empty(container));

    chart.destroy();
    chart.destroy();

    assert!(chart.is_destroyed());
    assert!(host.borrow().is_empty(container));
    assert!(matches!(chart.get_svg(), Err(ChartError::NotInitialized)));
    assert!(matches!(chart.to_svg(), Err(ChartError::NotInitialized)));
}

#[test]
fn operations_after_destroy_are_ignored() {
    let (host, container) = host_with_container();
    let mut chart =
        SparklineChart::new(Rc::clone(&host), container, SparklineOptions::default()).expect("sparkline");
    chart.destroy();
    let mounts = host.borrow().mount_count(container);

    chart.update(ChartData::Values(vec![1.0, 2.0])).expect("no-op update");
    chart.set_options(json!({ "smooth": true })).expect("no-op options");
    chart.resize(Some(300.0), None).expect("no-op resize");
    chart.render().expect("no-op render");

    assert_eq!(host.borrow().mount_count(container), mounts);
    assert!(host.borrow().is_empty(container));
}

#[test]
fn resize_updates_dimensions_and_emits_event() {
    let (host, container) = host_with_container();
    let mut chart = LineChart::new(Rc::clone(&host), container, LineOptions::default())
        .expect("line chart");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    chart.on(
        ChartEventKind::Resize,
        Box::new(move |event| sink.borrow_mut().push(event.data.clone())),
    );

    chart.resize(Some(800.0), Some(400.0)).expect("resize");

    let root = chart.get_svg().expect("root");
    assert_eq!(root.get_attr("width"), Some("800"));
    assert_eq!(root.get_attr("height"), Some("400"));
    assert_eq!(root.get_attr("viewBox"), Some("0 0 800 400"));
    assert_eq!(chart.options().base.width, 800.0);
    assert_eq!(
        seen.borrow().as_slice(),
        &[EventData::Resize {
            width: 800.0,
            height: 400.0
        }]
    );
}

#[test]
fn resize_keeps_omitted_and_invalid_axes() {
    let (host, container) = host_with_container();
    let mut chart = LineChart::new(host, container, LineOptions::default()).expect("line chart");

    chart.resize(Some(720.0), None).expect("width only");
    assert_eq!(chart.dimensions().width, 720.0);
    assert_eq!(chart.dimensions().height, 300.0);

    chart.resize(Some(-5.0), Some(f64::NAN)).expect("invalid sizes fall back");
    assert_eq!(chart.dimensions().width, 720.0);
    assert_eq!(chart.dimensions().height, 300.0);
}

#[test]
fn invalid_initial_dimensions_fall_back_to_defaults() {
    let (host, container) = host_with_container();
    let options = LineOptions {
        base: neon_charts::api::BaseOptions::sized(0.0, f64::INFINITY),
        ..LineOptions::default()
    };
    let chart = LineChart::new(host, container, options).expect("line chart");
    assert_eq!(chart.dimensions(), ChartKind::Line.default_size());
}

#[test]
fn set_options_merges_nested_objects_one_level_deep() {
    let (host, container) = host_with_container();
    let mut chart = LineChart::new(host, container, LineOptions::default()).expect("line chart");

    chart
        .set_options(json!({ "animation": { "duration": 200.0 }, "padding": { "left": 80.0 } }))
        .expect("patch applies");

    let options = chart.options();
    assert_eq!(options.base.animation.duration, 200.0);
    assert!(options.base.animation.enabled);
    assert_eq!(options.base.padding.left, 80.0);
    assert_eq!(options.base.padding.top, LineOptions::default().base.padding.top);
}

#[test]
fn set_options_rejects_malformed_patches() {
    let (host, container) = host_with_container();
    let mut chart = LineChart::new(host, container, LineOptions::default()).expect("line chart");

    assert!(matches!(
        chart.set_options(json!(42)),
        Err(ChartError::InvalidOptions(_))
    ));
    assert!(matches!(
        chart.set_options(json!({ "width": "wide" })),
        Err(ChartError::InvalidOptions(_))
    ));
    assert_eq!(chart.dimensions().width, 600.0);
}

#[test]
fn reduced_motion_disables_declarative_animation() {
    let (host, container) = host_with_container();
    let options = LineOptions {
        data: monthly_points(),
        ..LineOptions::default()
    };
    let mut chart = LineChart::new(Rc::clone(&host), container, options).expect("line chart");
    assert!(chart.get_svg().expect("root").count_tag("animate") > 0);

    host.borrow_mut().set_reduced_motion(true);
    chart.render().expect("render");
    assert_eq!(chart.get_svg().expect("root").count_tag("animate"), 0);
}

#[test]
fn exported_markup_is_standalone() {
    let (host, container) = host_with_container();
    let options = LineOptions {
        data: monthly_points(),
        ..LineOptions::default()
    };
    let chart = LineChart::new(host, container, options).expect("line chart");
    let markup = chart.to_svg().expect("markup");
    assert!(markup.contains("<defs>"));
    assert!(markup.contains("role=\"img\""));
    assert!(!markup.contains("href=\"http"));
}

#[test]
fn tracing_initializes_at_most_once() {
    let _ = neon_charts::telemetry::init_default_tracing();
    assert!(!neon_charts::telemetry::init_default_tracing());
}

#[test]
fn export_is_identical_across_independent_hosts() {
    let build = || {
        let (host, container) = host_with_container();
        let options = LineOptions {
            data: monthly_points(),
            ..LineOptions::default()
        };
        LineChart::new(host, container, options)
            .expect("line chart")
            .to_svg()
            .expect("markup")
    };
    let first = build();
    let _unrelated = build();
    assert_eq!(first, build());
}
