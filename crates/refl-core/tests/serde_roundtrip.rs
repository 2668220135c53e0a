use refl_core::provenance::{RunProvenance, SchemaVersion};
use refl_core::{Parameter, ParameterSet};

#[test]
fn provenance_round_trip_json() {
    let provenance = RunProvenance::new("input", 99, "2023-10-31T00:00:00Z")
        .with_samples(["YIG_sample", "DMPC_bilayer", "YIG_sample"])
        .with_tool("refl-core", "0.1.0");
    assert_eq!(provenance.samples, vec!["DMPC_bilayer", "YIG_sample"]);
    let json = serde_json::to_string_pretty(&provenance).expect("serialize");
    let decoded: RunProvenance = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, provenance);
    assert_eq!(SchemaVersion::default().to_string(), "1.0.0");
}

#[test]
fn parameter_set_round_trip_json() {
    let set: ParameterSet = vec![
        Parameter::varying("Pt Magnetic SLD", 0.01, (0.0, 0.2)),
        Parameter::fixed("Air SLD", 0.0),
    ]
    .into_iter()
    .collect();
    let json = serde_json::to_string(&set).expect("serialize");
    let decoded: ParameterSet = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, set);
}
