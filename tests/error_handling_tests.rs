use concept_canvas::config::{load_config, CliArgs, ConfigError};
use concept_canvas::routing::route_tagged;
use concept_canvas::{
    export, source, AppConfig, CanvasError, CardGeometry, ConceptCanvas, ConceptNode, Forest,
    Layout, LayoutParams, Point, RouteError, StructuralError,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

mod common;
use common::*;

fn isolated_args() -> CliArgs {
    CliArgs {
        config: Some(PathBuf::from("/nonexistent/concept-canvas/config.toml")),
        ..CliArgs::default()
    }
}

#[test]
fn test_load_nonexistent_file() {
    let path = Path::new("tests/fixtures/does_not_exist.json");
    let result = source::load_file(path);

    assert!(matches!(result, Err(CanvasError::FileNotFound(p)) if p.as_path() == path));
}

#[test]
fn test_malformed_json() {
    let result = source::parse_forest(r#"[{"id": "A", "label": "Root", "children": ["#);
    assert!(matches!(result, Err(CanvasError::Json(_))));

    // Wrong shape: children must be objects.
    let result = source::parse_forest(r#"{"label": "Root", "children": [1, 2]}"#);
    assert!(matches!(result, Err(CanvasError::Json(_))));
}

#[test]
fn test_duplicate_identity_is_rejected() {
    let mut forest = Forest::new();
    let a = forest.add_root(ConceptNode::new("A", "Root"));
    forest.add_child(a, ConceptNode::new("B", "One"));
    forest.add_root(ConceptNode::new("B", "Other"));

    let mut canvas = ConceptCanvas::default();
    let err = canvas.replace_forest(forest).unwrap_err();
    assert_eq!(err, StructuralError::DuplicateIdentity("B".to_string()));
    assert!(canvas.forest().is_empty());
}

#[test]
fn test_identity_repeated_on_path_is_a_cycle() {
    let mut forest = Forest::new();
    let a = forest.add_root(ConceptNode::new("A", "Root"));
    let b = forest.add_child(a, ConceptNode::new("B", "Middle"));
    forest.add_child(b, ConceptNode::new("A", "Back to root"));

    let err = Layout::calculate(&forest, LayoutParams::default()).unwrap_err();
    assert_eq!(err, StructuralError::Cycle("A".to_string()));
    assert!(err.to_string().contains("root-to-leaf path"));
}

#[test]
fn test_rejected_forest_keeps_previous_canvas() {
    let (forest, ..) = create_test_forest();
    let mut canvas = ConceptCanvas::default();
    canvas.replace_forest(forest).unwrap();
    canvas.viewport.pan(10.0, 0.0);
    let transform = canvas.viewport.transform();

    let mut bad = Forest::new();
    bad.add_root(ConceptNode::new("X", "One"));
    bad.add_root(ConceptNode::new("X", "Two"));
    assert!(canvas.replace_forest(bad).is_err());

    assert_eq!(canvas.forest().len(), 3);
    assert_eq!(canvas.viewport.transform(), transform);
}

#[test]
fn test_unknown_connector_style() {
    let card = CardGeometry::default();
    let result = route_tagged(Point::new(0.0, 0.0), Point::new(350.0, 0.0), "zigzag", &card);
    assert_eq!(result.unwrap_err(), RouteError::InvalidStyle("zigzag".to_string()));

    let mut canvas = ConceptCanvas::default();
    let before = canvas.style();
    assert!(canvas.set_style_tag("dotted").is_err());
    assert_eq!(canvas.style(), before);

    let wrapped: CanvasError = RouteError::InvalidStyle("dotted".to_string()).into();
    assert!(wrapped.to_string().contains("dotted"));
}

#[test]
fn test_invalid_style_in_config() {
    let args = CliArgs {
        style: Some("wavy".to_string()),
        ..isolated_args()
    };
    assert!(matches!(
        load_config(&args),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_inverted_scale_bounds() {
    let args = CliArgs {
        min_scale: Some(3.0),
        max_scale: Some(1.0),
        ..isolated_args()
    };
    assert!(matches!(
        load_config(&args),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_bad_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "card_width = \"wide\"\n").unwrap();

    let args = CliArgs {
        config: Some(path),
        ..CliArgs::default()
    };
    assert!(matches!(
        load_config(&args),
        Err(ConfigError::ConfigFile(_))
    ));
}

#[test]
fn test_export_into_missing_directory() {
    let canvas = ConceptCanvas::from_config(&AppConfig::default());
    let path = Path::new("/nonexistent/concept-canvas/out.svg");

    assert!(matches!(
        export::save_svg(&canvas, path),
        Err(CanvasError::Io(_))
    ));
    assert!(matches!(
        export::save_snapshot(&canvas, &path.with_extension("json")),
        Err(CanvasError::Io(_))
    ));
}

#[test]
fn test_empty_input_is_not_an_error() {
    let forest = source::parse_forest("```json\n```").unwrap();
    assert!(forest.is_empty());

    let layout = Layout::calculate(&forest, LayoutParams::default()).unwrap();
    assert!(layout.is_empty());
}
