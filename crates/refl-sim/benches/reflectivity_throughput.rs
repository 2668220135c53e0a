use criterion::{criterion_group, criterion_main, Criterion};
use refl_model::library::many_param_sample;
use refl_model::Sample;
use refl_sim::{reflectivity, simulate, AngleTime, Conditions, DirectBeam, ReflectModel};
use refl_core::RngHandle;

fn bench_reflectivity(c: &mut Criterion) {
    let structure = many_param_sample()
        .expect("sample")
        .structure()
        .expect("structure");
    let model = ReflectModel::new(structure.clone(), Conditions::default());
    let q: Vec<f64> = (0..500).map(|i| 0.005 + 0.395 * i as f64 / 499.0).collect();
    c.bench_function("reflectivity_500_points", |b| {
        b.iter(|| {
            let _ = reflectivity(&q, &model).expect("reflectivity");
        });
    });

    let beam = DirectBeam::offspec();
    let plan = [AngleTime::new(0.7, 100, 5.0), AngleTime::new(2.0, 100, 20.0)];
    c.bench_function("simulate_two_angles", |b| {
        let mut rng = RngHandle::from_seed(11);
        b.iter(|| {
            let _ = simulate(&structure, &plan, Conditions::default(), &beam, &mut rng)
                .expect("simulate");
        });
    });
}

criterion_group!(benches, bench_reflectivity);
criterion_main!(benches);
