use serde_json::json;
use svg_chart_rs::api::{AxisScale, ChartScales, Line, Symbol, SymbolProps};
use svg_chart_rs::core::{
    BandScale, DataAccessor, LinearScale, SymbolType, Translate, Viewport, line_path, symbol_path,
};
use svg_chart_rs::render::{Color, Renderer, SvgRenderer};

#[test]
fn cross_matches_d3_reference() {
    assert_eq!(
        symbol_path(SymbolType::Cross, 80.0),
        "M-6,-2L-2,-2L-2,-6L2,-6L2,-2L6,-2L6,2L2,2L2,6L-2,6L-2,2L-6,2Z"
    );
}

#[test]
fn every_symbol_is_a_closed_path() {
    for kind in SymbolType::ALL {
        let path = symbol_path(kind, 64.0);
        assert!(path.starts_with('M'), "{kind:?} path `{path}`");
        if kind != SymbolType::Circle {
            assert!(path.ends_with('Z'), "{kind:?} path `{path}`");
        }
    }
}

#[test]
fn symbol_names_parse_with_circle_fallback() {
    assert_eq!(SymbolType::parse("Triangle"), SymbolType::Triangle);
    assert_eq!(SymbolType::parse("wye"), SymbolType::Wye);
    assert_eq!(SymbolType::parse("hexagon"), SymbolType::Circle);
}

#[test]
fn symbol_state_classes_and_styles() {
    let symbol = Symbol::new(
        SymbolProps::default()
            .with_symbol_type(SymbolType::Diamond)
            .with_translate(Translate::new(10.0, 20.0))
            .with_focused(true)
            .with_key("d"),
    )
    .expect("symbol");
    let path = symbol.to_primitive();
    assert_eq!(path.translate, Translate::new(10.0, 20.0));
    assert_eq!(path.fill, Some(Color::STEELBLUE));
    assert_eq!(path.style.stroke, Some(Color::from_rgb8(0x77, 0x77, 0x77)));
    assert_eq!(path.class_name.as_deref(), Some("focused"));
    assert_eq!(path.key.as_deref(), Some("d"));
}

#[test]
fn negative_symbol_size_is_rejected() {
    assert!(Symbol::new(SymbolProps::default().with_size(-1.0)).is_err());
}

#[test]
fn line_maps_data_through_chart_scales() {
    let scales = ChartScales {
        x: AxisScale::Band(
            BandScale::new(["q1", "q2"])
                .and_then(|scale| scale.with_range(0.0, 100.0))
                .expect("band"),
        ),
        y: AxisScale::Linear(
            LinearScale::new(0.0, 10.0)
                .and_then(|scale| scale.with_range(100.0, 0.0))
                .expect("linear"),
        ),
    };
    let data = vec![json!({"q": "q1", "v": 5}), json!({"q": "q2", "v": 10})];
    let line = Line::from_data(
        &data,
        &DataAccessor::field("q"),
        &DataAccessor::field("v"),
        &scales,
    )
    .expect("line");
    assert_eq!(line.points(), &[(25.0, 50.0), (75.0, 0.0)]);
    assert_eq!(line.path(), "M25,50L75,0");
    assert_eq!(line_path(&[]), "");
}

#[test]
fn symbols_render_as_svg_paths() {
    let symbol = Symbol::new(
        SymbolProps::default()
            .with_symbol_type(SymbolType::Square)
            .with_translate(Translate::new(8.0, 8.0)),
    )
    .expect("symbol");
    let mut renderer = SvgRenderer::new();
    renderer
        .render(&symbol.build_frame(Viewport::new(16, 16)))
        .expect("render");
    assert!(renderer.document().contains(
        r##"<path d="M-4,-4h8v8h-8Z" fill="#4682b4" transform="translate(8, 8)"/>"##
    ));
    assert_eq!(renderer.last_stats().paths_drawn, 1);
}
