//! Tests for JSON palette configuration.

use renderer::{hex_to_rgb, PaletteConfig, PaletteError};
use std::io::Write;

#[test]
fn test_hex_to_rgb() {
    assert_eq!(hex_to_rgb("#ff8000"), Some((255, 128, 0)));
    assert_eq!(hex_to_rgb("00FF7f"), Some((0, 255, 127)));
    assert_eq!(hex_to_rgb("#fff"), None);
    assert_eq!(hex_to_rgb("#gg0000"), None);
}

#[test]
fn test_parse_palette_json() {
    let json = r##"{
        "name": "prevalence",
        "stops": [
            { "color": "#ffffcc", "label": "low" },
            { "color": "#fd8d3c" },
            { "color": "#800026", "label": "high" }
        ]
    }"##;

    let config = PaletteConfig::from_json(json).unwrap();
    assert_eq!(config.name.as_deref(), Some("prevalence"));

    let palette = config.to_palette().unwrap();
    assert_eq!(
        palette.stops(),
        &[[255, 255, 204], [253, 141, 60], [128, 0, 38]]
    );
}

#[test]
fn test_single_stop_rejected() {
    let json = r##"{ "stops": [ { "color": "#000000" } ] }"##;
    let config = PaletteConfig::from_json(json).unwrap();
    assert!(matches!(
        config.to_palette(),
        Err(PaletteError::TooFewStops(1))
    ));
}

#[test]
fn test_bad_color_rejected() {
    let json = r##"{ "stops": [ { "color": "#000000" }, { "color": "blue" } ] }"##;
    let config = PaletteConfig::from_json(json).unwrap();
    match config.to_palette() {
        Err(PaletteError::InvalidColor(c)) => assert_eq!(c, "blue"),
        other => panic!("expected InvalidColor, got {:?}", other),
    }
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r##"{{ "stops": [ {{ "color": "#000000" }}, {{ "color": "#ffffff" }} ] }}"##
    )
    .unwrap();

    let config = PaletteConfig::from_file(file.path()).unwrap();
    assert_eq!(config.to_palette().unwrap().stops().len(), 2);
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        PaletteConfig::from_file("/nonexistent/palette.json"),
        Err(PaletteError::Io(_))
    ));
}
