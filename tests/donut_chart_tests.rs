use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use neon_charts::api::{Chart, ChartData, DonutChart, DonutOptions, SegmentSort};
use neon_charts::core::{DataPoint, DonutSegment};
use neon_charts::interaction::{ChartEventKind, EventData, PointerInput};
use neon_charts::platform::{ContainerId, HeadlessHost};
use neon_charts::ChartError;

fn setup() -> (Rc<RefCell<HeadlessHost>>, ContainerId) {
    let host = Rc::new(RefCell::new(HeadlessHost::new()));
    let container = host.borrow_mut().add_container(Some("#donut"), 300.0, 300.0);
    (host, container)
}

fn segments() -> Vec<DonutSegment> {
    vec![
        DonutSegment::new("Rent", 50.0),
        DonutSegment::new("Food", 30.0),
        DonutSegment::new("Fun", 20.0),
    ]
}

fn donut_with(data: Vec<DonutSegment>) -> DonutOptions {
    DonutOptions {
        data,
        ..DonutOptions::default()
    }
}

#[test]
fn zero_total_renders_no_wedges() {
    let (host, container) = setup();
    let data = vec![DonutSegment::new("A", 0.0), DonutSegment::new("B", 0.0)];
    let chart = DonutChart::new(host, container, donut_with(data)).expect("donut");
    assert_eq!(chart.total(), 0.0);
    assert!(chart.layout().is_empty());
    assert!(chart.get_svg().expect("root").collect_by_class("nc-segment").is_empty());
}

#[test]
fn layout_is_proportional_with_pad_gaps() {
    let (host, container) = setup();
    let chart = DonutChart::new(host, container, donut_with(segments())).expect("donut");
    let arcs = chart.layout();
    assert_eq!(arcs.len(), 3);
    assert_relative_eq!(chart.total(), 100.0);

    assert_relative_eq!(arcs[0].percentage, 50.0);
    assert_relative_eq!(arcs[0].start_angle, 0.5);
    assert_relative_eq!(arcs[0].end_angle, 179.5);
    assert_relative_eq!(arcs[1].start_angle, 180.5);
    assert_relative_eq!(arcs[2].end_angle, 359.5);
    assert_eq!(chart.get_svg().expect("root").collect_by_class("nc-segment").len(), 3);
}

#[test]
fn single_segment_spans_the_full_circle() {
    let (host, container) = setup();
    let chart = DonutChart::new(host, container, donut_with(vec![DonutSegment::new("All", 7.0)]))
        .expect("donut");
    let arcs = chart.layout();
    assert_eq!(arcs.len(), 1);
    assert_relative_eq!(arcs[0].start_angle, 0.0);
    assert_relative_eq!(arcs[0].end_angle, 360.0);
    let d = chart.get_svg().expect("root").collect_by_class("nc-segment")[0]
        .get_attr("d")
        .expect("wedge path")
        .to_owned();
    assert!(!d.is_empty());
}

#[test]
fn sort_orders_segments_by_value() {
    let (host, container) = setup();
    let mut options = donut_with(vec![
        DonutSegment::new("small", 1.0),
        DonutSegment::new("large", 5.0),
        DonutSegment::new("medium", 3.0),
    ]);
    options.sort = SegmentSort::Desc;
    let chart = DonutChart::new(host, container, options).expect("donut");
    let labels: Vec<String> = chart.layout().into_iter().map(|arc| arc.label).collect();
    assert_eq!(labels, ["large", "medium", "small"]);
}

#[test]
fn center_text_needs_a_hole_and_supplied_text() {
    let (host, container) = setup();
    let chart = DonutChart::new(Rc::clone(&host), container, donut_with(segments())).expect("donut");
    assert!(chart.get_svg().expect("root").collect_by_class("nc-donut-center").is_empty());

    let empty = vec![DonutSegment::new("A", 0.0)];
    let chart = DonutChart::new(Rc::clone(&host), container, donut_with(empty)).expect("donut");
    assert!(chart.get_svg().expect("root").collect_by_class("nc-donut-center-text").is_empty());

    let mut labelled = donut_with(segments());
    labelled.center_text = Some("$1.2k".to_owned());
    labelled.center_subtext = Some("spent".to_owned());
    let chart = DonutChart::new(Rc::clone(&host), container, labelled).expect("donut");
    let root = chart.get_svg().expect("root");
    let center = root.collect_by_class("nc-donut-center-text");
    assert_eq!(center.len(), 1);
    assert_eq!(center[0].text.as_deref(), Some("$1.2k"));
    assert_eq!(root.collect_by_class("nc-donut-center-subtext").len(), 1);

    let mut pie = donut_with(segments());
    pie.inner_radius = 0.0;
    pie.center_text = Some("ignored".to_owned());
    let chart = DonutChart::new(host, container, pie).expect("pie");
    assert!(chart.get_svg().expect("root").collect_by_class("nc-donut-center").is_empty());
}

#[test]
fn hover_scales_segment_and_shows_percentage() {
    let (host, container) = setup();
    let mut chart = DonutChart::new(Rc::clone(&host), container, donut_with(segments())).expect("donut");

    let hovered = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&hovered);
    chart.on(
        ChartEventKind::SegmentHover,
        Box::new(move |event| sink.borrow_mut().push(event.data.clone())),
    );

    chart.handle_pointer(PointerInput::enter("segment-1", 150.0, 150.0));

    let transform = chart.get_svg().expect("root").collect_by_class("nc-segment")[1]
        .get_attr("transform")
        .expect("transform")
        .to_owned();
    assert!(transform.contains("scale(1.05)"));
    let html = host.borrow().visible_overlay().expect("tooltip").html.clone();
    assert!(html.contains("Food"));
    assert!(html.contains("30%"));
    assert_eq!(
        hovered.borrow().as_slice(),
        &[EventData::Segment {
            index: 1,
            label: "Food".to_owned(),
            value: 30.0,
            percentage: 30.0,
        }]
    );

    chart.handle_pointer(PointerInput::leave("segment-1"));
    let transform = chart.get_svg().expect("root").collect_by_class("nc-segment")[1]
        .get_attr("transform")
        .expect("transform")
        .to_owned();
    assert!(transform.contains("scale(1)"));
    assert!(host.borrow().visible_overlay().is_none());
}

#[test]
fn segment_click_emits_and_off_unsubscribes() {
    let (host, container) = setup();
    let mut chart = DonutChart::new(host, container, donut_with(segments())).expect("donut");
    let clicks = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&clicks);
    let id = chart.on(
        ChartEventKind::SegmentClick,
        Box::new(move |_| *sink.borrow_mut() += 1),
    );

    chart.handle_pointer(PointerInput::click("segment-0", 0.0, 0.0));
    assert_eq!(*clicks.borrow(), 1);

    chart.off(ChartEventKind::SegmentClick, Some(id));
    chart.handle_pointer(PointerInput::click("segment-0", 0.0, 0.0));
    assert_eq!(*clicks.borrow(), 1);
}

#[test]
fn legend_lists_every_segment() {
    let (host, container) = setup();
    let mut options = donut_with(segments());
    options.show_legend = true;
    let chart = DonutChart::new(host, container, options).expect("donut");
    assert_eq!(chart.get_svg().expect("root").collect_by_class("nc-legend-item").len(), 3);
}

#[test]
fn update_accepts_only_segments() {
    let (host, container) = setup();
    let mut chart = DonutChart::new(host, container, donut_with(segments())).expect("donut");
    chart
        .update(ChartData::Segments(vec![DonutSegment::new("Only", 1.0)]))
        .expect("segments");
    assert_eq!(chart.layout().len(), 1);

    let result = chart.update(ChartData::Points(vec![DataPoint::new(1.0, 2.0)]));
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}
