use approx::assert_abs_diff_eq;
use svg_chart_rs::api::{
    Axis, AxisChart, AxisConfig, AxisOrientation, AxisScale, Domain, TickFormat,
    calc_label_position,
};
use svg_chart_rs::core::{BandScale, DatumValue, LinearScale, Padding, Translate};
use svg_chart_rs::render::{TextHAlign, TextPrimitive};

fn chart() -> AxisChart {
    // Default padding is 40/50/40/50, leaving a 300 x 220 plot.
    AxisChart::new(
        400.0,
        300.0,
        Domain::continuous(0.0, 100.0),
        Domain::continuous(0.0, 10.0),
    )
    .expect("axis chart")
}

fn axis_label(axis: &Axis) -> TextPrimitive {
    let frame = axis.build_frame(chart().viewport()).expect("axis frame");
    frame
        .texts
        .iter()
        .find(|text| text.class_name.as_deref() == Some("axis-label"))
        .cloned()
        .expect("axis label")
}

#[test]
fn horizontal_labels_sit_in_half_the_padding() {
    let chart = chart();
    let bottom = chart
        .x_axis(None, AxisConfig::default().with_label("Year"))
        .expect("bottom axis");
    let label = axis_label(&bottom);
    assert_eq!((label.x, label.y, label.rotation_deg), (150.0, 240.0, 0.0));

    let top = chart
        .x_axis(Some(AxisOrientation::Top), AxisConfig::default().with_label("Year"))
        .expect("top axis");
    let label = axis_label(&top);
    assert_eq!((label.x, label.y, label.rotation_deg), (150.0, -20.0, 0.0));
}

#[test]
fn vertical_labels_are_rotated_beside_the_axis() {
    let chart = chart();
    let left = chart
        .y_axis(None, AxisConfig::default().with_label("Count"))
        .expect("left axis");
    let label = axis_label(&left);
    assert_abs_diff_eq!(label.x, -25.0, epsilon = 1e-9);
    assert_abs_diff_eq!(label.y, 110.0, epsilon = 1e-9);
    assert_eq!(label.rotation_deg, 270.0);

    let right = chart
        .y_axis(Some(AxisOrientation::Right), AxisConfig::default().with_label("Count"))
        .expect("right axis");
    let label = axis_label(&right);
    assert_abs_diff_eq!(label.x, 325.0, epsilon = 1e-9);
    assert_abs_diff_eq!(label.y, 110.0, epsilon = 1e-9);
    assert_eq!(label.rotation_deg, 90.0);
}

#[test]
fn label_position_table_for_every_orientation() {
    let padding = Padding::new(20.0, 30.0, 40.0, 50.0);
    let top = calc_label_position(AxisOrientation::Top, Translate::default(), padding, 75.0);
    assert_eq!((top.x, top.dy, top.rotate), (75.0, -10.0, 0.0));

    let bottom =
        calc_label_position(AxisOrientation::Bottom, Translate::new(0.0, 90.0), padding, 75.0);
    assert_eq!((bottom.y, bottom.dy), (90.0, 20.0));

    let left = calc_label_position(AxisOrientation::Left, Translate::default(), padding, 45.0);
    assert_eq!((left.x, left.dy, left.rotate), (-45.0, -25.0, 270.0));

    let right =
        calc_label_position(AxisOrientation::Right, Translate::new(150.0, 0.0), padding, 45.0);
    assert_eq!((right.x, right.y, right.dy, right.rotate), (45.0, -150.0, -15.0, 90.0));
}

#[test]
fn tick_anchors_follow_orientation() {
    let chart = chart();
    let left = chart.y_axis(None, AxisConfig::default()).expect("left axis");
    let frame = left.build_frame(chart.viewport()).expect("frame");
    let tick = frame
        .texts
        .iter()
        .find(|text| text.class_name.as_deref() == Some("tick"))
        .expect("tick text");
    assert_eq!(tick.h_align, TextHAlign::Right);
    assert_eq!(tick.x, -9.0);

    let right = chart
        .y_axis(Some(AxisOrientation::Right), AxisConfig::default())
        .expect("right axis");
    let frame = right.build_frame(chart.viewport()).expect("frame");
    let tick = frame
        .texts
        .iter()
        .find(|text| text.class_name.as_deref() == Some("tick"))
        .expect("tick text");
    assert_eq!(tick.h_align, TextHAlign::Left);
    assert_eq!(tick.x, 309.0);
}

#[test]
fn custom_tick_format_and_values_are_used() {
    let scale = LinearScale::new(0.0, 1.0)
        .and_then(|scale| scale.with_range(0.0, 100.0))
        .expect("scale");
    let config = AxisConfig::default()
        .with_tick_values(vec![DatumValue::Number(0.25), DatumValue::Number(0.75)])
        .with_tick_format(TickFormat::new(|value| {
            format!("{}%", value.as_number().unwrap_or_default() * 100.0)
        }));
    let axis = Axis::new(AxisOrientation::Bottom, AxisScale::Linear(scale), config).expect("axis");
    let ticks = axis.ticks().expect("ticks");
    let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, vec!["25%", "75%"]);
    assert_eq!(ticks[1].offset, 75.0);
}

#[test]
fn band_ticks_drop_values_outside_the_domain() {
    let scale = BandScale::new(["a", "b"])
        .and_then(|scale| scale.with_range(0.0, 100.0))
        .expect("band");
    let config = AxisConfig::default()
        .with_tick_values(vec![DatumValue::from("b"), DatumValue::from("zzz")]);
    let axis = Axis::new(AxisOrientation::Bottom, AxisScale::Band(scale), config).expect("axis");
    let ticks = axis.ticks().expect("ticks");
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0].offset, 75.0);
}
