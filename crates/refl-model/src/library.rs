//! Reference samples used to compare measurement designs.

use refl_core::errors::{ErrorInfo, ReflError};

use crate::layer::Layer;
use crate::sample::LayeredSample;
use crate::structure::Structure;

const SILICON_SLD: f64 = 2.047;

fn build(name: &str, layers: &[(&str, f64, f64, f64)]) -> Result<LayeredSample, ReflError> {
    let mut structure = Structure::from_layers(name, vec![Layer::new("Air", 0.0)]);
    for &(label, sld, thick, rough) in layers {
        structure = structure | Layer::new(label, sld).slab(thick, rough);
    }
    structure = structure | Layer::new("Substrate", SILICON_SLD).with_rough(2.0);
    LayeredSample::new(structure)
}

/// Two layers of contrasting SLD on silicon.
pub fn simple_sample() -> Result<LayeredSample, ReflError> {
    build(
        "simple_sample",
        &[("Layer 1", 4.0, 100.0, 2.0), ("Layer 2", 8.0, 150.0, 2.0)],
    )
}

/// Five layers, ten varying parameters.
pub fn many_param_sample() -> Result<LayeredSample, ReflError> {
    build(
        "many_param_sample",
        &[
            ("Layer 1", 2.0, 50.0, 6.0),
            ("Layer 2", 1.7, 15.0, 2.0),
            ("Layer 3", 0.8, 60.0, 2.0),
            ("Layer 4", 3.2, 40.0, 2.0),
            ("Layer 5", 4.0, 18.0, 2.0),
        ],
    )
}

/// Two layers, one of them only 6 Å thick.
pub fn thin_layer_sample_1() -> Result<LayeredSample, ReflError> {
    build(
        "thin_layer_sample_1",
        &[("Layer 1", 4.0, 200.0, 2.0), ("Layer 2", 6.0, 6.0, 2.0)],
    )
}

/// Three layers with a thin bottom layer.
pub fn thin_layer_sample_2() -> Result<LayeredSample, ReflError> {
    build(
        "thin_layer_sample_2",
        &[
            ("Layer 1", 4.0, 200.0, 2.0),
            ("Layer 2", 5.0, 30.0, 6.0),
            ("Layer 3", 6.0, 6.0, 2.0),
        ],
    )
}

/// Two layers of nearly identical SLD.
pub fn similar_sld_sample_1() -> Result<LayeredSample, ReflError> {
    build(
        "similar_sld_sample_1",
        &[("Layer 1", 0.9, 80.0, 2.0), ("Layer 2", 1.0, 50.0, 6.0)],
    )
}

/// Three layers, the lower two of similar SLD.
pub fn similar_sld_sample_2() -> Result<LayeredSample, ReflError> {
    build(
        "similar_sld_sample_2",
        &[
            ("Layer 1", 3.0, 50.0, 2.0),
            ("Layer 2", 5.5, 30.0, 6.0),
            ("Layer 3", 6.0, 35.0, 2.0),
        ],
    )
}

/// Names accepted by [`standard_sample`].
pub const STANDARD_SAMPLES: [&str; 6] = [
    "simple_sample",
    "many_param_sample",
    "thin_layer_sample_1",
    "thin_layer_sample_2",
    "similar_sld_sample_1",
    "similar_sld_sample_2",
];

/// Looks up a reference sample by name.
pub fn standard_sample(name: &str) -> Result<LayeredSample, ReflError> {
    match name {
        "simple_sample" => simple_sample(),
        "many_param_sample" => many_param_sample(),
        "thin_layer_sample_1" => thin_layer_sample_1(),
        "thin_layer_sample_2" => thin_layer_sample_2(),
        "similar_sld_sample_1" => similar_sld_sample_1(),
        "similar_sld_sample_2" => similar_sld_sample_2(),
        other => Err(ReflError::Model(
            ErrorInfo::new("sample-unknown", "no reference sample with this name")
                .with_context("name", other)
                .with_hint(STANDARD_SAMPLES.join(", ")),
        )),
    }
}
