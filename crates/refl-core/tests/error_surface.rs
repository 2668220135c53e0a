use std::io;
use std::path::Path;

use refl_core::errors::{ErrorInfo, ReflError};

#[test]
fn families_share_the_payload() {
    let info = ErrorInfo::new("layer-thickness", "negative thickness").with_context("layer", "Pt");
    let errors = [
        ReflError::Model(info.clone()),
        ReflError::Simulation(info.clone()),
        ReflError::Information(info.clone()),
        ReflError::Design(info.clone()),
    ];
    for err in &errors {
        assert_eq!(err.code(), "layer-thickness");
        assert_eq!(err.info().context["layer"], "Pt");
    }
}

#[test]
fn display_includes_context_and_hint() {
    let err = ReflError::Design(
        ErrorInfo::new("sample-unknown", "no such sample")
            .with_context("sample", "foo")
            .with_hint("simple_sample, YIG_sample"),
    );
    assert_eq!(
        err.to_string(),
        "design: [sample-unknown] no such sample (sample=foo); hint: simple_sample, YIG_sample"
    );
}

#[test]
fn io_errors_record_the_path() {
    let err = ReflError::io(
        "beam-read",
        Path::new("beam.csv"),
        io::Error::new(io::ErrorKind::NotFound, "missing"),
    );
    assert!(matches!(err, ReflError::Io(_)));
    assert_eq!(err.info().context["path"], "beam.csv");
}

#[test]
fn errors_round_trip_json() {
    let err = ReflError::Serde(ErrorInfo::new("plan-yaml", "unknown field"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Serde\""));
    let decoded: ReflError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
