use std::cell::RefCell;
use std::rc::Rc;

use neon_charts::api::{Chart, ChartData, LineChart, LineOptions};
use neon_charts::core::{DataPoint, DataSeries};
use neon_charts::interaction::{ChartEventKind, EventData, PointerInput};
use neon_charts::platform::{ContainerId, HeadlessHost};
use neon_charts::ChartError;
use serde_json::json;

fn setup() -> (Rc<RefCell<HeadlessHost>>, ContainerId) {
    let host = Rc::new(RefCell::new(HeadlessHost::new()));
    let container = host.borrow_mut().add_container(Some("#line"), 600.0, 300.0);
    (host, container)
}

fn monthly() -> Vec<DataPoint> {
    vec![
        DataPoint::new("Jan", 10.0),
        DataPoint::new("Feb", 25.0),
        DataPoint::new("Mar", 18.0),
    ]
}

fn line_with(data: ChartData) -> LineOptions {
    LineOptions {
        data,
        ..LineOptions::default()
    }
}

#[test]
fn categorical_points_render_one_line_and_three_markers() {
    let (host, container) = setup();
    let chart = LineChart::new(Rc::clone(&host), container, line_with(ChartData::Points(monthly())))
        .expect("line chart");

    let root = chart.get_svg().expect("root");
    assert_eq!(root.collect_by_class("nc-point").len(), 3);
    assert_eq!(root.collect_by_class("nc-line").len(), 1);

    let host = host.borrow();
    let mounted = host.mounted(container).expect("mounted");
    assert_eq!(mounted.collect_by_class("nc-point").len(), 3);
}

#[test]
fn categorical_labels_appear_on_the_x_axis() {
    let (host, container) = setup();
    let chart = LineChart::new(host, container, line_with(ChartData::Points(monthly())))
        .expect("line chart");
    let labels: Vec<String> = chart
        .get_svg()
        .expect("root")
        .collect_by_class("nc-axis-label")
        .into_iter()
        .filter_map(|node| node.text.clone())
        .collect();
    for month in ["Jan", "Feb", "Mar"] {
        assert!(labels.iter().any(|label| label == month), "missing {month}");
    }
}

#[test]
fn null_values_split_the_line_unless_connected() {
    let (host, container) = setup();
    let points = vec![
        DataPoint::new(0.0, 1.0),
        DataPoint::new(1.0, 2.0),
        DataPoint::gap(2.0),
        DataPoint::new(3.0, 4.0),
        DataPoint::new(4.0, 3.0),
    ];
    let mut chart = LineChart::new(host, container, line_with(ChartData::Points(points)))
        .expect("line chart");

    let split = chart.get_svg().expect("root").collect_by_class("nc-line")[0]
        .get_attr("d")
        .expect("path data")
        .matches('M')
        .count();
    assert_eq!(split, 2);
    assert_eq!(chart.get_svg().expect("root").collect_by_class("nc-point").len(), 4);

    chart.set_options(json!({ "connectNulls": true })).expect("patch");
    let joined = chart.get_svg().expect("root").collect_by_class("nc-line")[0]
        .get_attr("d")
        .expect("path data")
        .matches('M')
        .count();
    assert_eq!(joined, 1);
}

#[test]
fn long_series_are_simplified() {
    let (host, container) = setup();
    let points: Vec<DataPoint> = (0..5_000).map(|i| DataPoint::new(f64::from(i), 5.0)).collect();
    let chart = LineChart::new(host, container, line_with(ChartData::Points(points)))
        .expect("line chart");
    let markers = chart.get_svg().expect("root").collect_by_class("nc-point").len();
    assert!(markers < 100, "flat series should collapse, kept {markers}");
    assert!(markers >= 2);
}

#[test]
fn smooth_interpolation_emits_curves() {
    let (host, container) = setup();
    let mut options = line_with(ChartData::Points(monthly()));
    options.interpolation = neon_charts::api::Interpolation::Smooth;
    let chart = LineChart::new(host, container, options).expect("line chart");
    let d = chart.get_svg().expect("root").collect_by_class("nc-line")[0]
        .get_attr("d")
        .expect("path data")
        .to_owned();
    assert!(d.contains('C'));
}

#[test]
fn fill_area_adds_gradient_and_area_path() {
    let (host, container) = setup();
    let mut options = line_with(ChartData::Points(monthly()));
    options.fill_area = true;
    let chart = LineChart::new(host, container, options).expect("line chart");
    let root = chart.get_svg().expect("root");
    assert_eq!(root.collect_by_class("nc-area").len(), 1);
    assert_eq!(root.count_tag("linearGradient"), 1);
}

#[test]
fn point_hover_shows_tooltip_and_emits_event() {
    let (host, container) = setup();
    let mut chart = LineChart::new(Rc::clone(&host), container, line_with(ChartData::Points(monthly())))
        .expect("line chart");

    let hovered = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&hovered);
    chart.on(
        ChartEventKind::PointHover,
        Box::new(move |event| sink.borrow_mut().push((event.target.clone(), event.data.clone()))),
    );

    let key = chart.get_svg().expect("root").collect_by_class("nc-point")[1]
        .interaction_key()
        .expect("keyed marker")
        .to_owned();
    chart.handle_pointer(PointerInput::enter(key.clone(), 100.0, 80.0));

    {
        let host = host.borrow();
        let overlay = host.visible_overlay().expect("tooltip visible");
        assert!(overlay.html.contains("Feb"));
        assert!(overlay.html.contains("25"));
    }

    let events = hovered.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0.as_deref(), Some(key.as_str()));
    match &events[0].1 {
        EventData::Point { index, point, .. } => {
            assert_eq!(*index, 1);
            assert_eq!(point.y, Some(25.0));
        }
        other => panic!("unexpected payload {other:?}"),
    }
    drop(events);

    chart.handle_pointer(PointerInput::leave(key));
    assert!(host.borrow().visible_overlay().is_none());
}

#[test]
fn legend_click_toggles_series_and_emits_event() {
    let (host, container) = setup();
    let series = vec![
        DataSeries::new("a", "Alpha", monthly()),
        DataSeries::new("b", "Beta", monthly()),
    ];
    let mut chart = LineChart::new(host, container, line_with(ChartData::Series(series)))
        .expect("line chart");
    assert_eq!(chart.get_svg().expect("root").collect_by_class("nc-line").len(), 2);

    let toggles = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&toggles);
    chart.on(
        ChartEventKind::LegendClick,
        Box::new(move |event| sink.borrow_mut().push(event.data.clone())),
    );

    let legend_key = chart.get_svg().expect("root").collect_by_class("nc-legend-item")[1]
        .interaction_key()
        .expect("keyed legend item")
        .to_owned();
    chart.handle_pointer(PointerInput::click(legend_key.clone(), 0.0, 0.0));

    let root = chart.get_svg().expect("root");
    assert_eq!(root.collect_by_class("nc-line").len(), 1);
    assert_eq!(root.collect_by_class("nc-legend-item").len(), 2);
    assert_eq!(
        toggles.borrow().as_slice(),
        &[EventData::Legend {
            series_id: "b".to_owned(),
            visible: false
        }]
    );

    chart.handle_pointer(PointerInput::click(legend_key, 0.0, 0.0));
    assert_eq!(chart.get_svg().expect("root").collect_by_class("nc-line").len(), 2);
}

#[test]
fn single_series_has_no_legend() {
    let (host, container) = setup();
    let chart = LineChart::new(host, container, line_with(ChartData::Points(monthly())))
        .expect("line chart");
    assert!(chart.get_svg().expect("root").collect_by_class("nc-legend").is_empty());
}

#[test]
fn update_replaces_data_and_rejects_segments() {
    let (host, container) = setup();
    let mut chart = LineChart::new(host, container, LineOptions::default()).expect("line chart");
    assert!(chart.get_svg().expect("root").collect_by_class("nc-point").is_empty());

    chart.update(ChartData::Values(vec![3.0, 1.0, 4.0, 1.0, 5.0])).expect("update");
    assert_eq!(chart.get_svg().expect("root").collect_by_class("nc-point").len(), 5);
    assert_eq!(chart.series().len(), 1);

    let result = chart.update(ChartData::Value(3.0));
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn custom_formatter_replaces_tooltip_body() {
    let (host, container) = setup();
    let mut chart = LineChart::new(Rc::clone(&host), container, line_with(ChartData::Points(monthly())))
        .expect("line chart");
    chart.set_tooltip_formatter(Box::new(|series, point| {
        format!("{} <{}>", series.name, point.y.unwrap_or_default())
    }));

    let key = chart.get_svg().expect("root").collect_by_class("nc-point")[0]
        .interaction_key()
        .expect("keyed marker")
        .to_owned();
    chart.handle_pointer(PointerInput::enter(key, 10.0, 10.0));

    let host = host.borrow();
    let html = &host.visible_overlay().expect("tooltip").html;
    assert!(html.contains("Series 1 &lt;10&gt;"));
}

fn axis_bounds(root: &neon_charts::render::SvgNode, axis_class: &str, from: &str, to: &str) -> (f64, f64) {
    let axis = root.collect_by_class(axis_class)[0];
    let line = axis.collect_by_class("nc-axis-line")[0];
    let a: f64 = line.get_attr(from).expect("start").parse().expect("number");
    let b: f64 = line.get_attr(to).expect("end").parse().expect("number");
    (a.min(b), a.max(b))
}

fn label_positions(root: &neon_charts::render::SvgNode, axis_class: &str, attr: &str) -> Vec<f64> {
    root.collect_by_class(axis_class)[0]
        .collect_by_class("nc-axis-label")
        .into_iter()
        .map(|node| node.get_attr(attr).expect("position").parse().expect("number"))
        .collect()
}

#[test]
fn explicit_y_bounds_keep_labels_inside_the_plot() {
    let (host, container) = setup();
    let mut options = line_with(ChartData::Points(monthly()));
    options.y_min = Some(3.0);
    options.y_max = Some(97.0);
    let chart = LineChart::new(host, container, options).expect("line chart");
    let root = chart.get_svg().expect("root");

    let (top, bottom) = axis_bounds(root, "nc-axis-y", "y1", "y2");
    let positions = label_positions(root, "nc-axis-y", "y");
    assert!(!positions.is_empty());
    for y in positions {
        assert!(y >= top - 0.01 && y <= bottom + 0.01, "label at {y} outside [{top}, {bottom}]");
    }
    let labels: Vec<String> = root.collect_by_class("nc-axis-y")[0]
        .collect_by_class("nc-axis-label")
        .into_iter()
        .filter_map(|node| node.text.clone())
        .collect();
    assert!(!labels.iter().any(|label| label == "0" || label == "100"));
}

#[test]
fn time_axis_labels_stay_within_the_plot() {
    let (host, container) = setup();
    let points: Vec<DataPoint> = (0..=13)
        .map(|hour| {
            let time: chrono::DateTime<chrono::Utc> = format!("2024-03-01T{hour:02}:00:00Z")
                .parse()
                .expect("timestamp");
            DataPoint::new(time, f64::from(hour))
        })
        .collect();
    let chart = LineChart::new(host, container, line_with(ChartData::Points(points))).expect("line chart");
    let root = chart.get_svg().expect("root");

    let (left, right) = axis_bounds(root, "nc-axis-x", "x1", "x2");
    let positions = label_positions(root, "nc-axis-x", "x");
    assert!(!positions.is_empty());
    for x in positions {
        assert!(x >= left - 0.01 && x <= right + 0.01, "label at {x} outside [{left}, {right}]");
    }
}

#[test]
fn corrected_dimensions_survive_option_patches() {
    let (host, container) = setup();
    let mut options = line_with(ChartData::Points(monthly()));
    options.base.width = f64::NAN;
    let mut chart = LineChart::new(host, container, options).expect("line chart");
    assert_eq!(chart.dimensions().width, 600.0);
    assert_eq!(chart.options().base.width, 600.0);

    chart
        .set_options(json!({ "theme": "magenta" }))
        .expect("patch after corrected width");
    assert_eq!(chart.dimensions().width, 600.0);
}
