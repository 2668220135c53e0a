use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;
use refl_core::RngHandle;
use refl_model::library::simple_sample;
use refl_model::{Sample, SampleYig};
use refl_sim::{
    joint_log_likelihood, log_likelihood, measurement_points, simulate, simulate_magnetic,
    AngleTime, Conditions, DirectBeam, SpinChannels,
};

fn plan() -> Vec<AngleTime> {
    vec![AngleTime::new(0.7, 100, 5.0), AngleTime::new(2.0, 100, 20.0)]
}

#[test]
fn model_reflectivity_is_positive() {
    let structure = simple_sample().unwrap().structure().unwrap();
    let mut rng = RngHandle::from_seed(1);
    let (model, data) = simulate(
        &structure,
        &plan(),
        Conditions::default(),
        &DirectBeam::offspec(),
        &mut rng,
    )
    .unwrap();
    let r = model.reflectivity(&data.q()).unwrap();
    assert!(!r.is_empty());
    assert!(r.iter().all(|&value| value > 0.0));
}

#[test]
fn counts_are_positive_and_sorted() {
    let structure = simple_sample().unwrap().structure().unwrap();
    let mut rng = RngHandle::from_seed(2);
    let plan = [AngleTime::new(0.3, 100, 1000.0)];
    let (_, data) = simulate(
        &structure,
        &plan,
        Conditions::default(),
        &DirectBeam::offspec(),
        &mut rng,
    )
    .unwrap();
    assert!(!data.is_empty());
    assert!(data.counts().iter().all(|&c| c > 0.0));
    assert!(data.dr().iter().all(|&dr| dr > 0.0));
    assert!(data.q().windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn same_seed_same_data() {
    let structure = simple_sample().unwrap().structure().unwrap();
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        simulate(
            &structure,
            &plan(),
            Conditions::default(),
            &DirectBeam::offspec(),
            &mut rng,
        )
        .unwrap()
        .1
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn custom_beam_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# wavelength, flux").unwrap();
    for i in 0..100 {
        let wavelength = 2.0 + 0.1 * i as f64;
        writeln!(file, "{wavelength}, 500").unwrap();
    }
    file.flush().unwrap();

    let beam = DirectBeam::from_csv(file.path()).unwrap();
    assert_eq!(beam.wavelengths.len(), 100);

    let structure = simple_sample().unwrap().structure().unwrap();
    let mut rng = RngHandle::from_seed(3);
    let plan = [AngleTime::new(0.5, 50, 100.0)];
    let (_, data) = simulate(&structure, &plan, Conditions::default(), &beam, &mut rng).unwrap();
    assert!(!data.is_empty());
    assert!(data.counts().iter().all(|&c| c > 0.0));
}

#[test]
fn malformed_beam_file_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "2.0, lots").unwrap();
    file.flush().unwrap();
    let err = DirectBeam::from_csv(file.path()).unwrap_err();
    assert_eq!(err.info().code, "beam-parse");
}

#[test]
fn measurement_points_follow_flux() {
    let beam = DirectBeam::offspec();
    let (q, counts) = measurement_points(&[AngleTime::new(0.7, 40, 10.0)], &beam).unwrap();
    assert_eq!(q.len(), counts.len());
    assert!(q.len() <= 40);
    let grid = beam.measurement_grid(0.7, 40).unwrap();
    let total: f64 = grid.flux.iter().sum::<f64>() * 10.0;
    approx::assert_relative_eq!(counts.iter().sum::<f64>(), total, max_relative = 1e-12);
}

#[test]
fn empty_plan_is_rejected() {
    let structure = simple_sample().unwrap().structure().unwrap();
    let mut rng = RngHandle::from_seed(4);
    let err = simulate(
        &structure,
        &[],
        Conditions::default(),
        &DirectBeam::offspec(),
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(err.info().code, "plan-empty");
}

#[test]
fn magnetic_channels_differ() {
    let sample = SampleYig::new();
    let structure = sample.structure().unwrap();
    let mut rng = RngHandle::from_seed(5);
    let (models, datasets) = simulate_magnetic(
        &structure,
        &plan(),
        sample.conditions(),
        &DirectBeam::offspec(),
        SpinChannels::non_spin_flip(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(datasets.len(), 2);
    let q = datasets[0].q();
    let pp = models[0].reflectivity(&q).unwrap();
    let mm = models[1].reflectivity(&q).unwrap();
    assert!(pp.iter().zip(&mm).any(|(a, b)| (a - b).abs() > 1e-9));
    let logl = joint_log_likelihood(&models, &datasets).unwrap();
    assert!(logl.is_finite());
}

#[test]
fn true_model_scores_better_than_a_wrong_one() {
    let sample = simple_sample().unwrap();
    let structure = sample.structure().unwrap();
    let mut rng = RngHandle::from_seed(6);
    let (model, data) = simulate(
        &structure,
        &[AngleTime::new(0.7, 100, 100.0), AngleTime::new(2.0, 100, 400.0)],
        Conditions::default(),
        &DirectBeam::offspec(),
        &mut rng,
    )
    .unwrap();
    let mut wrong = model.clone();
    wrong.structure.layers_mut()[1].sld += 1.0;
    assert!(log_likelihood(&model, &data).unwrap() > log_likelihood(&wrong, &data).unwrap());
}
