use approx::assert_abs_diff_eq;
use serde_json::{Value, json};
use svg_chart_rs::api::{
    AxisScale, Bars, BarsAccessors, BarsProps, ChartScales, stack_layer_records, stacked_accessors,
};
use svg_chart_rs::core::{
    BandPadding, BandScale, BarLayout, DatumValue, LinearScale, Orientation, StackRow, Viewport,
    stack_layers, stacked_max,
};
use svg_chart_rs::interaction::InteractionState;
use svg_chart_rs::render::{CATEGORY10, Color, ColorScale};

fn vertical_scales(categories: &[&str]) -> ChartScales {
    ChartScales {
        x: AxisScale::Band(
            BandScale::new(categories.iter().copied())
                .and_then(|scale| scale.with_range(0.0, 200.0))
                .expect("band"),
        ),
        y: AxisScale::Linear(
            LinearScale::new(0.0, 10.0)
                .and_then(|scale| scale.with_range(100.0, 0.0))
                .expect("linear"),
        ),
    }
}

fn unpadded() -> BarsProps {
    BarsProps::default().with_band_padding(BandPadding::uniform(0.0))
}

fn simple_data() -> Vec<Value> {
    vec![
        json!({"name": "a", "total": 2}),
        json!({"name": "b", "total": 4}),
        json!({"name": "c", "total": 6}),
    ]
}

fn simple_bars() -> Bars {
    Bars::new(
        simple_data(),
        BarsAccessors::new("name").with_x("name").with_y("total"),
        unpadded(),
    )
    .expect("bars")
}

#[test]
fn selection_toggle_restores_original_frame() {
    let bars = simple_bars();
    let scales = vertical_scales(&["a", "b", "c"]);
    let viewport = Viewport::new(200, 100);
    let mut interaction = InteractionState::default();

    let original = bars.build_frame(viewport, &scales, &interaction).expect("frame");
    interaction.toggle("a");
    let selected = bars.build_frame(viewport, &scales, &interaction).expect("frame");
    let keys: Vec<&str> = selected.rects.iter().filter_map(|rect| rect.key.as_deref()).collect();
    assert_eq!(keys, vec!["b", "c", "a"]);
    assert_eq!(selected.rects[2].class_name.as_deref(), Some("selected"));

    interaction.toggle("a");
    let restored = bars.build_frame(viewport, &scales, &interaction).expect("frame");
    assert_eq!(restored, original);
}

#[test]
fn later_selections_paint_above_earlier_ones() {
    let bars = simple_bars();
    let scales = vertical_scales(&["a", "b", "c"]);
    let mut interaction = InteractionState::default();
    interaction.select("c");
    interaction.select("a");
    let projected = bars.project(&scales, &interaction).expect("project");
    let keys: Vec<&str> = projected.iter().map(|bar| bar.key.as_str()).collect();
    assert_eq!(keys, vec!["b", "c", "a"]);
}

#[test]
fn hit_test_returns_the_bar_under_the_point() {
    let bars = simple_bars();
    let scales = vertical_scales(&["a", "b", "c"]);
    let interaction = InteractionState::default();
    // Bar "c" spans x 133.3..200 and y 40..100.
    let hit = bars.hit_test(&scales, &interaction, 150.0, 90.0).expect("hit test");
    assert_eq!(hit.as_deref(), Some("c"));
    let miss = bars.hit_test(&scales, &interaction, 150.0, 10.0).expect("hit test");
    assert_eq!(miss, None);
}

#[test]
fn grouped_bars_offset_layers_inside_their_category() {
    let data = vec![
        json!({"id": "a-m", "age": "a", "sex": "m", "n": 2}),
        json!({"id": "a-f", "age": "a", "sex": "f", "n": 4}),
        json!({"id": "b-m", "age": "b", "sex": "m", "n": 6}),
        json!({"id": "b-f", "age": "b", "sex": "f", "n": 8}),
    ];
    let bars = Bars::new(
        data,
        BarsAccessors::new("id").with_x("age").with_y("n").with_layer("sex"),
        unpadded().with_layout(BarLayout::Grouped),
    )
    .expect("bars");
    let projected = bars
        .project(&vertical_scales(&["a", "b"]), &InteractionState::default())
        .expect("project");

    let step = 100.0 / 1.95;
    let b_f = &projected[3];
    assert_abs_diff_eq!(b_f.rect.x, 100.0 + step, epsilon = 1e-9);
    assert_abs_diff_eq!(b_f.rect.width, step * 0.95, epsilon = 1e-9);
    assert_abs_diff_eq!(b_f.rect.y, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(b_f.rect.height, 80.0, epsilon = 1e-9);

    let a_m = &projected[0];
    assert_abs_diff_eq!(a_m.rect.x, 0.0, epsilon = 1e-9);
}

#[test]
fn grouped_bars_honour_an_explicit_layer_scale() {
    let layers = BandScale::new(["m", "f"])
        .and_then(|scale| scale.with_range(0.0, 100.0))
        .expect("layers");
    let bars = Bars::new(
        vec![json!({"id": "a-f", "age": "a", "sex": "f", "n": 5})],
        BarsAccessors::new("id").with_x("age").with_y("n").with_layer("sex"),
        unpadded()
            .with_layout(BarLayout::Grouped)
            .with_layer_ordinal(layers),
    )
    .expect("bars");
    let projected = bars
        .project(&vertical_scales(&["a", "b"]), &InteractionState::default())
        .expect("project");
    assert_eq!((projected[0].rect.x, projected[0].rect.width), (50.0, 50.0));
}

#[test]
fn stacked_layers_become_contiguous_bars() {
    let rows = vec![
        StackRow {
            id: 0,
            category: DatumValue::from("a"),
            values: [("m".to_owned(), 2.0), ("f".to_owned(), 4.0)].into_iter().collect(),
        },
        StackRow {
            id: 1,
            category: DatumValue::from("b"),
            values: [("m".to_owned(), 1.0)].into_iter().collect(),
        },
    ];
    let layers = stack_layers(&rows, &["m".to_owned(), "f".to_owned()]);
    assert_eq!(stacked_max(&layers), 6.0);

    let bars = Bars::new(
        stack_layer_records(&layers),
        stacked_accessors(),
        unpadded().with_layout(BarLayout::Stacked),
    )
    .expect("bars");
    let projected = bars
        .project(&vertical_scales(&["a", "b"]), &InteractionState::default())
        .expect("project");
    let keys: Vec<&str> = projected.iter().map(|bar| bar.key.as_str()).collect();
    assert_eq!(keys, vec!["a-m", "b-m", "a-f", "b-f"]);

    let a_m = projected[0].normalized_rect();
    let a_f = projected[2].normalized_rect();
    assert_abs_diff_eq!(a_m.y, 80.0, epsilon = 1e-9);
    assert_abs_diff_eq!(a_m.height, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(a_f.y, 40.0, epsilon = 1e-9);
    assert_abs_diff_eq!(a_f.height, 40.0, epsilon = 1e-9);
    assert_abs_diff_eq!(a_f.y + a_f.height, a_m.y, epsilon = 1e-9);

    // Missing values stack with zero height on top of the previous layer.
    let b_f = projected[3].normalized_rect();
    assert_abs_diff_eq!(b_f.height, 0.0, epsilon = 1e-9);
}

#[test]
fn horizontal_bars_swap_scale_roles() {
    let scales = ChartScales {
        x: AxisScale::Linear(
            LinearScale::new(0.0, 10.0)
                .and_then(|scale| scale.with_range(0.0, 200.0))
                .expect("linear"),
        ),
        y: AxisScale::Band(
            BandScale::new(["a", "b", "c"])
                .and_then(|scale| scale.with_range(0.0, 90.0))
                .expect("band"),
        ),
    };
    let bars = Bars::new(
        simple_data(),
        BarsAccessors::new("name").with_x("name").with_y("total"),
        unpadded().with_orientation(Orientation::Horizontal),
    )
    .expect("bars");
    let projected = bars.project(&scales, &InteractionState::default()).expect("project");
    let c = projected[2].rect;
    assert_eq!((c.x, c.y, c.width, c.height), (0.0, 60.0, 120.0, 30.0));
}

#[test]
fn fill_comes_from_the_colour_scale_with_x_fallback() {
    let bars = Bars::new(
        simple_data(),
        BarsAccessors::new("name").with_x("name").with_y("total"),
        unpadded().with_color_scale(ColorScale::category10(["a", "b"]).expect("colours")),
    )
    .expect("bars");
    let projected = bars
        .project(&vertical_scales(&["a", "b", "c"]), &InteractionState::default())
        .expect("project");
    assert_eq!(projected[0].fill, Color::parse(CATEGORY10[0]).expect("colour"));
    assert_eq!(projected[1].fill, Color::parse(CATEGORY10[1]).expect("colour"));
    // "c" is outside the colour domain and keeps the default fill.
    assert_eq!(projected[2].fill, Color::STEELBLUE);
}

#[test]
fn category_translate_shifts_every_bar() {
    let bars = Bars::new(
        simple_data(),
        BarsAccessors::new("name").with_x("name").with_y("total"),
        unpadded().with_category_translate(15.0),
    )
    .expect("bars");
    let projected = bars
        .project(&vertical_scales(&["a", "b", "c"]), &InteractionState::default())
        .expect("project");
    assert_abs_diff_eq!(projected[0].rect.x, 15.0, epsilon = 1e-9);
}

#[test]
fn missing_value_field_is_reported() {
    let bars = Bars::new(
        vec![json!({"name": "a"})],
        BarsAccessors::new("name").with_x("name").with_y("total"),
        unpadded(),
    )
    .expect("bars");
    let err = bars
        .project(&vertical_scales(&["a"]), &InteractionState::default())
        .expect_err("missing total");
    assert!(matches!(err, svg_chart_rs::ChartError::MissingField { .. }));
}

#[test]
fn persisted_color_scale_with_empty_range_is_rejected() {
    let props: BarsProps = serde_json::from_value(json!({
        "color_scale": {"kind": "ordinal", "domain": ["a"], "range": []}
    }))
    .expect("props deserialize");
    let result = Bars::new(
        simple_data(),
        BarsAccessors::new("name").with_x("name").with_y("total"),
        props,
    );
    assert!(result.is_err());
}

#[test]
fn degenerate_linear_color_scale_is_rejected() {
    let props = unpadded().with_color_scale(ColorScale::Linear {
        domain: (4.0, 4.0),
        range: (Color::BLACK, Color::STEELBLUE),
    });
    let mut bars = simple_bars();
    assert!(bars.set_props(props).is_err());
}

#[test]
fn hit_test_agrees_with_painted_rects() {
    let bars = simple_bars();
    let scales = vertical_scales(&["a", "b", "c"]);
    let mut interaction = InteractionState::default();
    interaction.select("b");
    let frame = bars
        .build_frame(Viewport::new(200, 100), &scales, &interaction)
        .expect("frame");
    for rect in &frame.rects {
        let (x, y) = (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
        let hit = bars.hit_test(&scales, &interaction, x, y).expect("hit test");
        assert_eq!(hit, rect.key);
    }
}
