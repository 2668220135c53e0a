use refl_model::library::{many_param_sample, simple_sample};
use refl_model::{standard_sample, Sample, STANDARD_SAMPLES};

#[test]
fn every_standard_sample_builds() {
    for name in STANDARD_SAMPLES {
        let sample = standard_sample(name).expect("sample");
        assert_eq!(sample.name(), name);
        let structure = sample.structure().expect("structure");
        structure.validate().expect("valid");
        assert_eq!(
            sample.parameters().len(),
            2 * structure.inner_layers().len()
        );
    }
}

#[test]
fn unknown_sample_is_rejected() {
    let err = standard_sample("no_such_sample").unwrap_err();
    assert_eq!(err.info().code, "sample-unknown");
}

#[test]
fn simple_sample_matches_reference_values() {
    let sample = simple_sample().unwrap();
    let structure = sample.structure().unwrap();
    let layers = structure.layers();
    assert_eq!(layers[1].sld, 4.0);
    assert_eq!(layers[2].thick, 150.0);
    assert_eq!(layers[3].sld, 2.047);
    assert_eq!(many_param_sample().unwrap().parameters().len(), 10);
}

#[test]
fn structures_serialize() {
    let structure = simple_sample().unwrap().structure().unwrap();
    let json = serde_json::to_string(&structure).unwrap();
    let decoded: refl_model::Structure = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, structure);
}
