use criterion::{criterion_group, criterion_main, Criterion};
use refl_exp::{magnetic_underlayer_sweep, Scheduler};
use refl_model::SampleYig;
use refl_sim::{AngleTime, DirectBeam};

fn bench_sweep(c: &mut Criterion) {
    let yig = SampleYig::new();
    let beam = DirectBeam::offspec();
    let plan = [AngleTime::new(0.5, 100, 20.0), AngleTime::new(2.0, 100, 80.0)];
    let yig_thicks = [400.0, 550.0, 700.0, 850.0];
    let pt_thicks = [15.0, 20.0, 25.0, 30.0];
    for threads in [1, 4] {
        let scheduler = Scheduler::parallel(threads);
        c.bench_function(&format!("magnetic_sweep_4x4_{threads}_threads"), |b| {
            b.iter(|| {
                let _ = magnetic_underlayer_sweep(
                    &yig,
                    &yig_thicks,
                    &pt_thicks,
                    &plan,
                    &beam,
                    &scheduler,
                )
                .expect("sweep");
            });
        });
    }
}

criterion_group!(benches, bench_sweep);
criterion_main!(benches);
