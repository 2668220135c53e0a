use approx::assert_relative_eq;
use refl_info::{
    angle_info, contrast_info, magnetic_info, min_eigenvalue, underlayer_info, FisherSummary,
    MagneticUnderlayerInfo,
};
use refl_model::library::simple_sample;
use refl_model::{BilayerDmpc, Sample, SampleYig, Underlayer, D2O_SLD, H2O_SLD};
use refl_sim::{AngleTime, Conditions, DirectBeam, SpinChannels};

fn plan(time_scale: f64) -> Vec<AngleTime> {
    vec![
        AngleTime::new(0.7, 100, 10.0 * time_scale),
        AngleTime::new(2.3, 100, 40.0 * time_scale),
    ]
}

#[test]
fn angle_info_covers_varying_parameters() {
    let sample = simple_sample().unwrap();
    let g = angle_info(&sample, &plan(1.0), Conditions::default(), &DirectBeam::offspec()).unwrap();
    let m = sample.parameters().varying().len();
    assert_eq!(g.shape(), (m, m));
    for i in 0..m {
        assert!(g[(i, i)] > 0.0);
        for j in 0..m {
            assert_relative_eq!(g[(i, j)], g[(j, i)], max_relative = 1e-9);
        }
    }
}

#[test]
fn information_grows_linearly_with_time() {
    let sample = simple_sample().unwrap();
    let beam = DirectBeam::offspec();
    let g1 = angle_info(&sample, &plan(1.0), Conditions::default(), &beam).unwrap();
    let g4 = angle_info(&sample, &plan(4.0), Conditions::default(), &beam).unwrap();
    assert_relative_eq!(min_eigenvalue(&g4), 4.0 * min_eigenvalue(&g1), max_relative = 1e-6);
}

#[test]
fn contrasts_add_information() {
    let bilayer = BilayerDmpc::new();
    let beam = DirectBeam::offspec();
    let conditions = bilayer.conditions();
    let d2o = contrast_info(&bilayer, &plan(1.0), &[D2O_SLD], &[], conditions, &beam).unwrap();
    let h2o = contrast_info(&bilayer, &plan(1.0), &[H2O_SLD], &[], conditions, &beam).unwrap();
    let both =
        contrast_info(&bilayer, &plan(1.0), &[D2O_SLD, H2O_SLD], &[], conditions, &beam).unwrap();
    let summed = &d2o + &h2o;
    for (a, b) in both.iter().zip(summed.iter()) {
        assert_relative_eq!(*a, *b, max_relative = 1e-9, epsilon = 1e-12);
    }
}

#[test]
fn contrast_list_must_not_be_empty() {
    let bilayer = BilayerDmpc::new();
    let err = contrast_info(
        &bilayer,
        &plan(1.0),
        &[],
        &[],
        bilayer.conditions(),
        &DirectBeam::offspec(),
    )
    .unwrap_err();
    assert_eq!(err.info().code, "contrasts-empty");
}

#[test]
fn underlayer_changes_bilayer_information() {
    let bilayer = BilayerDmpc::new();
    let beam = DirectBeam::offspec();
    let contrasts = [H2O_SLD, D2O_SLD];
    let bare = underlayer_info(&bilayer, &plan(1.0), &contrasts, &[], &beam).unwrap();
    let with = underlayer_info(
        &bilayer,
        &plan(1.0),
        &contrasts,
        &[Underlayer {
            thick: 127.1,
            sld: 5.39,
        }],
        &beam,
    )
    .unwrap();
    assert_eq!(bare.shape(), with.shape());
    assert!((min_eigenvalue(&bare) - min_eigenvalue(&with)).abs() > 0.0);
}

#[test]
fn pt_mag_information_is_positive() {
    let yig = SampleYig::new();
    let beam = DirectBeam::offspec();
    let g = yig
        .underlayer_info(&plan(1.0), 713.8, 21.08, &beam)
        .unwrap();
    assert_eq!(g.shape(), (1, 1));
    assert!(g[(0, 0)] > 0.0 && g[(0, 0)].is_finite());
    assert_eq!(yig.pt_mag(), 0.0);
}

#[test]
fn magnetic_info_is_square_over_varying_parameters() {
    let yig = SampleYig::new();
    let g = magnetic_info(
        &yig,
        &plan(1.0),
        SpinChannels::non_spin_flip(),
        &DirectBeam::offspec(),
    )
    .unwrap();
    let names = yig.parameters().names(&yig.parameters().varying());
    assert_eq!(g.nrows(), names.len());
    let summary = FisherSummary::new(names, &g);
    assert_eq!(summary.eigenvalues.len(), g.nrows());
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("min_eigenvalue"));
}
