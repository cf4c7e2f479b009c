//! Tests for loading the editor configuration.
use routeflow::config::EditorConfig;
use routeflow::error::ConfigError;
use routeflow::graph::Position;
use std::path::Path;

#[test]
fn test_defaults_match_layout_constants() {
    let config = EditorConfig::default();
    assert_eq!(config.start_position, Position::new(150.0, 100.0));
    assert_eq!(config.loader.vertical_spacing, 200.0);
    assert_eq!(config.loader.provider_stack_offset, 90.0);
    assert_eq!(config.layout.vertical_spacing, 250.0);
    assert_eq!(config.layout.max_attempts, 10);
    assert_eq!(config.placer.clearance().x, 250.0);
    assert_eq!(config.placer.clearance().y, 170.0);
    assert_eq!(config.placer.spiral_steps, 16);
    assert_eq!(config.engine.base_url, "http://localhost:8080/v3");
}

#[test]
fn test_empty_toml_is_default() {
    assert_eq!(EditorConfig::from_toml_str("").unwrap(), EditorConfig::default());
}

#[test]
fn test_partial_toml_overrides_only_given_keys() {
    let config = EditorConfig::from_toml_str(
        r#"
            start_position = { x = 0.0, y = 0.0 }

            [layout]
            vertical_spacing = 300.0

            [engine]
            base_url = "https://routing.example.com/v3"
            timeout_secs = 5
        "#,
    )
    .unwrap();

    assert_eq!(config.start_position, Position::new(0.0, 0.0));
    assert_eq!(config.layout.vertical_spacing, 300.0);
    assert_eq!(config.layout.horizontal_spacing, 350.0);
    assert_eq!(config.engine.base_url, "https://routing.example.com/v3");
    assert_eq!(config.engine.timeout_secs, Some(5));
    assert_eq!(config.loader, EditorConfig::default().loader);
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let result = EditorConfig::from_toml_str("[layout]\nvertical_spacing = \"wide\"");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_missing_file_is_a_read_error() {
    let result = EditorConfig::load(Path::new("/nonexistent/routeflow.toml"));
    match result {
        Err(ConfigError::Read { path, .. }) => assert_eq!(path, "/nonexistent/routeflow.toml"),
        other => panic!("expected a read error, got {:?}", other),
    }
}
