use serde_json::json;
use svg_chart_rs::api::{HIERARCHY_INDENT_PX, Select, SelectOption, SelectProps, widest_label_width};
use svg_chart_rs::core::{DataAccessor, Translate, Viewport};

fn countries() -> Vec<SelectOption> {
    vec![
        SelectOption::new("Brazil", "br"),
        SelectOption::new("India", "in"),
        SelectOption::new("Russia", "ru"),
        SelectOption::new("Chile", "cl"),
    ]
}

#[test]
fn reset_values_and_placeholders_follow_mode() {
    let single = Select::new(SelectProps::new(countries())).expect("single");
    assert_eq!(single.value(), None);
    assert_eq!(single.display_text(), "Select...");

    let multi = Select::new(SelectProps::new(countries()).with_multi(true)).expect("multi");
    assert!(multi.values().is_empty());
    assert_eq!(multi.display_text(), "Add/Remove...");
    assert!(!multi.is_clearable());
}

#[test]
fn multi_select_keeps_order_and_clears() {
    let mut select = Select::new(SelectProps::new(countries()).with_multi(true)).expect("multi");
    assert!(select.select("ru").expect("select"));
    assert!(select.select("br").expect("select"));
    assert!(!select.select("br").expect("select again"));
    assert_eq!(select.values(), vec!["ru", "br"]);
    assert!(select.is_clearable());

    assert!(!select.toggle("ru").expect("toggle"));
    assert_eq!(select.values(), vec!["br"]);

    select.clear();
    assert!(select.values().is_empty());
}

#[test]
fn unknown_values_are_rejected() {
    let mut select = Select::new(SelectProps::new(countries())).expect("single");
    assert!(select.select("xx").is_err());
    assert_eq!(select.value(), None);
}

#[test]
fn search_is_case_insensitive() {
    let mut select = Select::new(SelectProps::new(countries())).expect("single");
    select.set_search("CHI");
    let labels: Vec<&str> = select
        .filtered_options()
        .iter()
        .map(|option| option.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Chile"]);
    assert!(select.is_open());
}

#[test]
fn menu_width_is_widest_label_plus_pad() {
    let options = vec![
        SelectOption::new("World", "w"),
        SelectOption::new("Europe", "eu").with_level(1),
        SelectOption::new("Spain", "es").with_level(2),
    ];
    let flat = widest_label_width(&options, false, 12.0);
    let nested = widest_label_width(&options, true, 12.0);
    assert!(nested >= flat);
    assert!(nested <= flat + 2.0 * HIERARCHY_INDENT_PX);

    let props = SelectProps::new(options)
        .with_hierarchical(true)
        .with_width(300.0);
    let select = Select::new(props).expect("select");
    let layout = select.layout();
    assert_eq!(layout.menu_width, nested + 60.0);
    assert_eq!(layout.control_width(), 300.0);
}

#[test]
fn width_changes_do_not_relayout_the_menu() {
    let mut select = Select::new(SelectProps::new(countries())).expect("select");
    let revision = select.layout_revision();
    let menu_width = select.layout().menu_width;

    assert!(!select.set_props(SelectProps::new(countries()).with_width(250.0)).expect("props"));
    assert_eq!(select.layout_revision(), revision);
    assert_eq!(select.layout().menu_width, menu_width);
    assert_eq!(select.layout().wrapper_width, Some(250.0));

    let mut more = countries();
    more.push(SelectOption::new("South Africa", "za"));
    assert!(select.set_props(SelectProps::new(more)).expect("props"));
    assert_eq!(select.layout_revision(), revision + 1);
    assert!(select.layout().menu_width > menu_width);
}

#[test]
fn dropped_options_drop_their_selection() {
    let mut select = Select::new(SelectProps::new(countries()).with_multi(true)).expect("multi");
    select.select("br").expect("select");
    select.select("in").expect("select");
    select
        .set_props(SelectProps::new(vec![SelectOption::new("India", "in")]).with_multi(true))
        .expect("props");
    assert_eq!(select.values(), vec!["in"]);
}

#[test]
fn upward_menu_is_drawn_above_the_control() {
    let mut select =
        Select::new(SelectProps::new(countries()).with_menu_upward(true)).expect("select");
    select.open();
    let frame = select
        .build_frame(Viewport::new(400, 400), Translate::new(0.0, 300.0))
        .expect("frame");
    let menu = frame
        .rects
        .iter()
        .find(|rect| rect.class_name.as_deref() == Some("select-menu"))
        .expect("menu");
    assert_eq!(menu.y + menu.height, 300.0);
    let option_rows = frame
        .rects
        .iter()
        .filter(|rect| {
            rect.class_name
                .as_deref()
                .is_some_and(|class| class.starts_with("select-option"))
        })
        .count();
    assert_eq!(option_rows, 4);
}

#[test]
fn empty_search_result_shows_no_results_row() {
    let mut select = Select::new(SelectProps::new(countries())).expect("select");
    select.set_search("zzz");
    let frame = select.build_frame(Viewport::new(400, 400), Translate::default()).expect("frame");
    assert!(frame.texts.iter().any(|text| text.text == "No results found"));
}

#[test]
fn options_can_be_read_from_records() {
    let records = vec![
        json!({"name": "Peru", "code": "pe"}),
        json!({"name": "Chad", "code": "td"}),
    ];
    let options = SelectOption::from_records(
        &records,
        &DataAccessor::field("name"),
        &DataAccessor::field("code"),
    )
    .expect("options");
    assert_eq!(options[1], SelectOption::new("Chad", "td"));
}

#[test]
fn duplicate_values_are_rejected() {
    let props = SelectProps::new(vec![SelectOption::new("A", "x"), SelectOption::new("B", "x")]);
    assert!(Select::new(props).is_err());
}
