use std::io::Write;

use lian_isle::config::generation::{load_generation_config, parse_generation_config};
use lian_isle::config::ConfigError;
use lian_isle::{generate, Error, RecordingSink};

fn resolve_err(json: &str) -> ConfigError {
    parse_generation_config(json).unwrap().resolve().unwrap_err()
}

#[test]
fn invalid_dimensions_fail_before_any_output() {
    let config = parse_generation_config(r#"{ "width": 10, "height": 0 }"#).unwrap();
    let mut sink = RecordingSink::new();
    let err = generate(&config, &mut sink).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::InvalidDimensions { .. })));
    assert!(sink.events.is_empty());
}

#[test]
fn enabled_generator_needs_variants() {
    let err = resolve_err(
        r#"{ "props": [ { "key": "tree", "model": { "kind": "percent", "density": 5 }, "variants": [] } ] }"#,
    );
    assert!(matches!(err, ConfigError::EmptyVariants { ref generator } if generator == "tree"));
}

#[test]
fn disabled_generator_may_have_no_variants() {
    let config = parse_generation_config(
        r#"{ "props": [ { "key": "tree", "enabled": false,
                          "model": { "kind": "percent", "density": 5 }, "variants": [] } ] }"#,
    )
    .unwrap();
    assert!(config.resolve().unwrap().props.is_empty());
}

#[test]
fn frequency_outside_useful_band_rejected() {
    let err = resolve_err(
        r#"{ "overlays": [ { "key": "grove", "claimed": "grove",
               "source": { "kind": "noise", "frequency": { "value": 0.5, "min": 0.4, "max": 0.6 } } } ] }"#,
    );
    assert!(matches!(err, ConfigError::InvalidFrequency { .. }));
}

#[test]
fn overlay_percent_over_100_rejected() {
    let err = resolve_err(
        r#"{ "overlays": [ { "key": "x", "claimed": "meadow", "source": { "kind": "percent", "percent": 120 } } ] }"#,
    );
    assert!(matches!(err, ConfigError::PercentOutOfRange { value: 120, .. }));
}

#[test]
fn random_seed_is_resolved_once_and_reported() {
    let config = parse_generation_config(r#"{ "width": 16, "height": 12, "use_random_seed": true }"#).unwrap();
    let params = config.resolve().unwrap();
    assert!(params.seed < lian_isle::core::random::RANDOM_SEED_LIMIT);

    let outcome = lian_isle::generate_with_params(&params, &mut RecordingSink::new()).unwrap();
    assert_eq!(outcome.seed, params.seed);
    assert_eq!(outcome.report.seed, params.seed);
}

#[test]
fn config_file_round_trip_through_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "width": 30, "height": 20, "seed": 8 }}"#).unwrap();
    let config = load_generation_config(file.path()).unwrap();
    assert_eq!((config.width, config.height, config.seed), (30, 20, 8));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = parse_generation_config("{ width: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
