use refl_exp::{
    angle_choice, calc_log_ratios, kinetics, linspace, magnetic_underlayer_sweep,
    optimise_kinetics, optimise_underlayers, optimise_yig_thickness, underlayer_choice,
    DesignTarget, DifferentialEvolutionOptions, LibrarySample, Scheduler,
};
use refl_model::library::simple_sample;
use refl_model::{BilayerDmpc, SampleYig, D2O_SLD, H2O_SLD};
use refl_sim::{AngleTime, DirectBeam};

fn short_plan() -> Vec<AngleTime> {
    vec![AngleTime::new(0.5, 40, 20.0), AngleTime::new(2.0, 40, 80.0)]
}

#[test]
fn magnetic_sweep_is_scheduling_independent() {
    let yig = SampleYig::new();
    let beam = DirectBeam::offspec();
    let yig_thicks = [400.0, 700.0];
    let pt_thicks = [15.0, 25.0, 30.0];
    let seq = magnetic_underlayer_sweep(
        &yig,
        &yig_thicks,
        &pt_thicks,
        &short_plan(),
        &beam,
        &Scheduler::sequential(),
    )
    .unwrap();
    let par = magnetic_underlayer_sweep(
        &yig,
        &yig_thicks,
        &pt_thicks,
        &short_plan(),
        &beam,
        &Scheduler::parallel(4),
    )
    .unwrap();
    assert_eq!(seq, par);
    assert_eq!(seq.values.len(), 2);
    assert!(seq.values.iter().all(|row| row.len() == 3));
    assert!(seq.values.iter().flatten().all(|&v| v > 0.0));
}

#[test]
fn underlayer_choice_reports_best_point() {
    let bilayer = BilayerDmpc::new();
    let choice = underlayer_choice(
        &bilayer,
        &[50.0, 150.0],
        &[2.0, 6.0],
        &[D2O_SLD, H2O_SLD],
        &short_plan(),
        &DirectBeam::offspec(),
        &Scheduler::default(),
    )
    .unwrap();
    let best = choice.best.unwrap();
    assert!([50.0, 150.0].contains(&best.x));
    assert!([2.0, 6.0].contains(&best.y));
    let max = choice
        .grid
        .values
        .iter()
        .flatten()
        .cloned()
        .fold(f64::MIN, f64::max);
    assert_eq!(best.value, max);
}

#[test]
fn angle_choice_picks_a_candidate() {
    let sample = simple_sample().unwrap();
    let angles = linspace(0.2, 2.3, 5);
    let choice = angle_choice(
        DesignTarget::Single(&sample),
        &[AngleTime::new(0.7, 40, 10.0)],
        &angles,
        40,
        20.0,
        &DirectBeam::offspec(),
        &Scheduler::default(),
    )
    .unwrap();
    assert_eq!(choice.series.values.len(), angles.len());
    assert!(angles.contains(&choice.best.unwrap()));
}

#[test]
fn contrast_targets_need_a_contrast_sample() {
    let library = LibrarySample::load("simple_sample").unwrap();
    let err = library.target(&[D2O_SLD]).unwrap_err();
    assert_eq!(err.info().code, "contrasts-unsupported");
    let bilayer = LibrarySample::load("DMPC_bilayer").unwrap();
    assert!(matches!(
        bilayer.target(&[D2O_SLD]).unwrap(),
        DesignTarget::Contrasts { .. }
    ));
}

#[test]
fn design_targets_debug_by_sample_name() {
    let simple = LibrarySample::load("simple_sample").unwrap();
    let single = format!("{:?}", simple.target(&[]).unwrap());
    assert_eq!(single, r#"Single("simple_sample")"#);
    let bilayer = LibrarySample::load("DMPC_bilayer").unwrap();
    let contrasts = format!("{:?}", bilayer.target(&[D2O_SLD]).unwrap());
    assert!(contrasts.starts_with(r#"Contrasts { sample: "DMPC_bilayer", contrasts: [6.36]"#));
}

#[test]
fn kinetics_grid_shape() {
    let bilayer = BilayerDmpc::new();
    let grid = kinetics(
        &bilayer,
        &[0.7, 2.0],
        &[H2O_SLD, D2O_SLD],
        &[45.0, 55.0],
        40,
        100.0,
        &DirectBeam::offspec(),
        &Scheduler::default(),
    )
    .unwrap();
    assert_eq!(grid.x, vec![H2O_SLD, D2O_SLD]);
    assert_eq!(grid.y, vec![0.7, 2.0]);
    assert!(grid.values.iter().flatten().all(|v| *v > 0.0));
}

#[test]
fn log_ratios_are_reproducible() {
    let yig = SampleYig::new();
    let beam = DirectBeam::offspec();
    let template = [AngleTime::new(0.5, 40, 1.0), AngleTime::new(2.0, 40, 4.0)];
    let times = [50.0, 200.0];
    let a = calc_log_ratios(&yig, &template, &times, 0.1, 2, 17, &beam).unwrap();
    let b = calc_log_ratios(&yig, &template, &times, 0.1, 2, 17, &beam).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.ratios.len(), 2);
    assert!(a.ratios.iter().all(|r| r.is_finite()));
    assert_eq!(yig.pt_mag(), 0.0);
}

#[test]
fn yig_thickness_optimum_respects_bounds() {
    let yig = SampleYig::new();
    let options = DifferentialEvolutionOptions {
        popsize: 3,
        max_generations: 2,
        ..Default::default()
    };
    let result = optimise_yig_thickness(
        &yig,
        &short_plan(),
        (400.0, 900.0),
        (15.0, 30.0),
        &DirectBeam::offspec(),
        &options,
        5,
    )
    .unwrap();
    assert!((400.0..=900.0).contains(&result.yig_thick));
    assert!((15.0..=30.0).contains(&result.pt_thick));
    assert!(result.objective > 0.0);
}

fn small_optimiser() -> DifferentialEvolutionOptions {
    DifferentialEvolutionOptions {
        popsize: 4,
        max_generations: 3,
        ..Default::default()
    }
}

#[test]
fn underlayer_optimum_respects_bounds_and_seed() {
    let bilayer = BilayerDmpc::new();
    let run = |seed| {
        optimise_underlayers(
            &bilayer,
            1,
            &short_plan(),
            &[D2O_SLD, H2O_SLD],
            (5.0, 500.0),
            (1.0, 9.0),
            &DirectBeam::offspec(),
            &small_optimiser(),
            seed,
        )
        .unwrap()
    };
    let result = run(11);
    assert_eq!(result.underlayers.len(), 1);
    let layer = result.underlayers[0];
    assert!((5.0..=500.0).contains(&layer.thick));
    assert!((1.0..=9.0).contains(&layer.sld));
    assert!(result.objective.is_finite());
    assert_eq!(result.objective, -result.result.fun);
    assert_eq!(run(11), result);
}

#[test]
fn kinetics_optimum_respects_bounds_and_seed() {
    let bilayer = BilayerDmpc::new();
    let run = |seed| {
        optimise_kinetics(
            &bilayer,
            (0.2, 4.0),
            (-0.56, 6.36),
            &[45.0, 55.0],
            40,
            100.0,
            &DirectBeam::offspec(),
            &small_optimiser(),
            seed,
        )
        .unwrap()
    };
    let result = run(23);
    assert!((0.2..=4.0).contains(&result.angle));
    assert!((-0.56..=6.36).contains(&result.contrast));
    assert!(result.objective > 0.0);
    assert_eq!(run(23), result);
}
