use std::time::{Duration, Instant};

use dino_map::app::App;
use dino_map::data::{read_records, DinoType};
use dino_map::filter::{Filter, FADED_OPACITY, FILTER_TRANSITION};
use dino_map::glyph::{TypeMarker, DEFAULT_COLOR, HOVER_TRANSITION};
use ratatui::layout::Rect;

const TABLE: &str = "\
name,type,diet,length_m,max_ma,min_ma,lng,lat,region,family
Argentinosaurus,sauropod,herbivorous,20,96,92,-68,-39,Asia,Titanosauridae
Mamenchisaurus,sauropod,herbivorous,10,160,145,103,30,Asia,Mamenchisauridae
Iguanodon,ornithopod,herbivorous,5,126,122,4,50,Europe,
Pteranodon,pterosaur,piscivorous,4,86,84,-100,38,North America,Pteranodontidae
";

fn app() -> App {
    let records = read_records(TABLE.as_bytes()).unwrap();
    App::new(records, &[], Rect::new(0, 0, 140, 44))
}

#[test]
fn filter_then_stats_follow_completion() {
    let mut app = app();
    assert_eq!(app.stats().visible_count, 4);
    assert_eq!(app.stats().location_count, 3);

    let t0 = Instant::now();
    assert!(app.select_filter(&Filter::parse("sauropod"), t0));
    // Mid-transition nothing is recomputed yet
    assert!(!app.tick(t0 + Duration::from_millis(150)));
    assert_eq!(app.stats().visible_count, 4);

    assert!(app.tick(t0 + FILTER_TRANSITION));
    let stats = app.stats();
    assert_eq!(stats.visible_count, 2);
    assert_eq!(stats.location_count, 1);
    assert_eq!(stats.avg_length_label(), "15.0");

    for glyph in app.layer().glyphs() {
        let expected = if glyph.record.kind == DinoType::Sauropod { 1.0 } else { FADED_OPACITY };
        assert_eq!(glyph.opacity.value(), expected);
    }

    let t1 = t0 + FILTER_TRANSITION;
    assert!(app.select_filter(&Filter::All, t1));
    assert!(app.tick(t1 + FILTER_TRANSITION));
    assert!(app.layer().glyphs().iter().all(|g| g.opacity.value() == 1.0));
    assert_eq!(app.stats().visible_count, 4);
}

#[test]
fn unknown_type_is_drawn_with_defaults_and_filterable() {
    let mut app = app();
    let pterosaur = &app.layer().glyphs()[3];
    assert_eq!(pterosaur.color, DEFAULT_COLOR);
    assert_eq!(pterosaur.marker, TypeMarker::Emoji);

    let options: Vec<_> = app.filters().options().iter().map(Filter::data_value).collect();
    assert_eq!(options.last(), Some(&"pterosaur"));

    let t0 = Instant::now();
    assert!(app.select_filter_index(options.len() - 1, t0));
    assert!(app.tick(t0 + FILTER_TRANSITION));
    assert_eq!(app.stats().visible_count, 1);
    assert_eq!(app.stats().avg_length_label(), "4.0");
}

#[test]
fn hover_round_trip_restores_transform() {
    let mut app = app();
    let before = app.layer().glyphs()[2].transform();
    let t0 = Instant::now();

    app.set_hover(Some(2), t0);
    assert_eq!(app.detail().title(), Some("Iguanodon"));
    assert_eq!(app.detail().value("Family"), Some("Unknown"));
    assert_eq!(app.detail().value("Existed for"), Some("4.0 million years"));
    app.tick(t0 + HOVER_TRANSITION);
    assert_eq!(app.layer().glyphs()[2].transform().1, 1.45);

    let t1 = t0 + HOVER_TRANSITION;
    app.set_hover(None, t1);
    app.tick(t1 + HOVER_TRANSITION);
    assert_eq!(app.layer().glyphs()[2].transform(), before);
    assert_eq!(app.layer().draw_order().last(), Some(&2));
}
